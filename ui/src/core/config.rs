//! Export settings resolved at startup.

use std::path::PathBuf;

/// Environment override for where desktop exports are written.
pub const EXPORT_DIR_ENV: &str = "SYNTHDASH_EXPORT_DIR";

const DEFAULT_RASTER_SCALE: f32 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    /// Target directory for saved artifacts. Unused in the browser, where the
    /// download prompt decides.
    pub export_dir: Option<PathBuf>,
    /// Device pixel ratio applied when rasterizing chart surfaces.
    pub raster_scale: f32,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            export_dir: None,
            raster_scale: DEFAULT_RASTER_SCALE,
        }
    }
}

impl ExportSettings {
    /// Settings for the running platform: env override first, then the
    /// per-user data directory.
    pub fn resolve() -> Self {
        let export_dir = std::env::var_os(EXPORT_DIR_ENV)
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from)
            .or_else(default_export_dir);

        Self {
            export_dir,
            ..Self::default()
        }
    }

    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = Some(dir.into());
        self
    }

    pub fn with_raster_scale(mut self, scale: f32) -> Self {
        if scale.is_finite() && scale > 0.0 {
            self.raster_scale = scale;
        }
        self
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn default_export_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "SynthDash", "SynthDash")
        .map(|dirs| dirs.data_dir().join("exports"))
}

#[cfg(target_arch = "wasm32")]
fn default_export_dir() -> Option<PathBuf> {
    None
}
