//! Shared UI crate for SynthDash: the data/export core plus the Dioxus
//! components both launchers mount.

pub mod charts;
pub mod core;
pub mod dashboard;
pub mod export;
pub mod views;

pub use crate::core::{DashboardError, Result};

/// Shared stylesheet, embedded by both launchers.
pub const THEME_CSS: &str = include_str!("../assets/theme/main.css");
