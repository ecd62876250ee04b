//! Tabular export of uniform records.
//!
//! Records go through `serde_json` (with `preserve_order`) so any
//! `Serialize` struct or JSON object can be exported; the first record's
//! field order fixes the column order for every row.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{error, info};

use super::delivery::{Artifact, ArtifactSink, Delivery};
use crate::core::{DashboardError, Result};

pub const CSV_FILENAME: &str = "synthetic_data.csv";
pub const CSV_MIME: &str = "text/csv";

/// Serialize `records` and hand the result to `sink` as `synthetic_data.csv`.
///
/// Nothing reaches the sink when serialization fails.
pub fn export_csv<T, S>(records: &[T], sink: &S) -> Result<Delivery>
where
    T: Serialize,
    S: ArtifactSink + ?Sized,
{
    let csv = build_csv(records).inspect_err(|err| error!(%err, "CSV export rejected"))?;
    let delivery = sink
        .deliver(Artifact::new(CSV_FILENAME, CSV_MIME, csv.into_bytes()))
        .map_err(|cause| {
            error!(%cause, "CSV delivery failed");
            DashboardError::Delivery(cause)
        })?;
    info!(rows = records.len(), ?delivery, "CSV exported");
    Ok(delivery)
}

/// Header row plus one row per record, comma-separated, newline-joined,
/// without a trailing newline.
pub fn build_csv<T: Serialize>(records: &[T]) -> Result<String> {
    let rows = records
        .iter()
        .enumerate()
        .map(|(index, record)| as_row(record, index))
        .collect::<Result<Vec<_>>>()?;

    let headers: Vec<&String> = rows
        .first()
        .ok_or(DashboardError::EmptyDataset)?
        .keys()
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(join_fields(headers.iter().map(|header| header.as_str())));
    for row in &rows {
        let fields: Vec<String> = headers
            .iter()
            .map(|header| field_text(row.get(header.as_str())))
            .collect();
        lines.push(join_fields(fields.iter().map(String::as_str)));
    }

    Ok(lines.join("\n"))
}

fn as_row<T: Serialize>(record: &T, index: usize) -> Result<Map<String, Value>> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(DashboardError::MalformedRecord(index)),
    }
}

fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

fn join_fields<'a>(fields: impl Iterator<Item = &'a str>) -> String {
    fields.map(escape_csv).collect::<Vec<_>>().join(",")
}

fn escape_csv(value: &str) -> String {
    let needs_quotes = value.contains([',', '"', '\n', '\r']);
    if needs_quotes {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}
