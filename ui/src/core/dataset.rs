//! Synthetic metric generation.

use rand::Rng;
use serde::Serialize;

use super::period::Period;

pub const REAL_ACCURACY_RANGE: std::ops::Range<f64> = 0.8..0.9;
pub const SYNTHETIC_ACCURACY_RANGE: std::ops::Range<f64> = 0.85..0.90;
pub const THREATS_RANGE: std::ops::Range<u32> = 0..100;

/// One period's worth of metrics. Field order is the CSV column order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRecord {
    pub period: Period,
    pub real_accuracy: f64,
    pub synthetic_accuracy: f64,
    pub threats_detected: u32,
}

/// Exactly one record per period, in [`Period::ALL`] order.
pub type Dataset = Vec<MetricRecord>;

/// Build a fresh dataset from the thread-local generator.
pub fn generate() -> Dataset {
    generate_with(&mut rand::thread_rng())
}

pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Dataset {
    Period::ALL
        .into_iter()
        .map(|period| MetricRecord {
            period,
            real_accuracy: rng.gen_range(REAL_ACCURACY_RANGE),
            synthetic_accuracy: rng.gen_range(SYNTHETIC_ACCURACY_RANGE),
            threats_detected: rng.gen_range(THREATS_RANGE),
        })
        .collect()
}
