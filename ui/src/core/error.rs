//! Error taxonomy shared by the dashboard core.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DashboardError {
    /// Tabular export was asked to serialize zero records.
    #[error("nothing to export: the dataset is empty")]
    EmptyDataset,

    /// A period identifier outside the fixed twelve-month enumeration.
    #[error("unknown period `{0}`")]
    InvalidPeriod(String),

    /// Rasterizing or delivering a chart surface failed.
    #[error("chart capture failed: {0}")]
    CaptureFailed(String),

    /// The record at this index did not serialize as a field map.
    #[error("record {0} is not a tabular record")]
    MalformedRecord(usize),

    /// The platform download primitive refused the artifact.
    #[error("delivery failed: {0}")]
    Delivery(String),
}
