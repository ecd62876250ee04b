pub mod config;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod format;
pub mod period;

pub use config::ExportSettings;
pub use dataset::{generate, generate_with, Dataset, MetricRecord};
pub use error::{DashboardError, Result};
pub use filter::FilterState;
pub use period::Period;
