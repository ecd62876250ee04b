//! Export pipeline: CSV for the dataset, PNG for chart surfaces, and the
//! platform primitive that hands either to the user.

pub mod csv;
pub mod delivery;
pub mod raster;

pub use csv::{build_csv, export_csv, CSV_FILENAME};
pub use delivery::{Artifact, ArtifactSink, Delivery, PlatformSink};
pub use raster::{
    export_image, export_snapshot, ExportOutcome, PlatformRasterizer, Rasterizer, Surface,
    SurfaceHandle, ACCURACY_PNG, THREATS_PNG,
};
