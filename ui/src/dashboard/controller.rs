//! Owned dashboard state and the user actions that act on it.

use std::future::Future;

use tracing::{debug, info};

use crate::core::{generate, Dataset, ExportSettings, FilterState, MetricRecord, Period, Result};
use crate::export::{
    export_csv, export_snapshot, ArtifactSink, Delivery, ExportOutcome, PlatformRasterizer,
    PlatformSink, Rasterizer, SurfaceHandle,
};

/// Single owner of the dataset and the period filter.
///
/// Every mutation is synchronous. Chart exports return futures that own
/// everything they need, so the controller stays free to change while a
/// capture is in flight.
#[derive(Debug, Clone)]
pub struct DashboardController<R = PlatformRasterizer, S = PlatformSink> {
    dataset: Dataset,
    filter: FilterState,
    rasterizer: R,
    sink: S,
}

impl DashboardController {
    /// Controller wired to the running platform's exporters.
    pub fn for_platform() -> Self {
        let settings = ExportSettings::resolve();
        Self::new(
            PlatformRasterizer::new(&settings),
            PlatformSink::new(&settings),
        )
    }
}

impl<R, S> DashboardController<R, S> {
    /// Fresh dataset, every period selected.
    pub fn new(rasterizer: R, sink: S) -> Self {
        Self::with_dataset(generate(), rasterizer, sink)
    }

    pub fn with_dataset(dataset: Dataset, rasterizer: R, sink: S) -> Self {
        Self {
            dataset,
            filter: FilterState::all(),
            rasterizer,
            sink,
        }
    }

    pub fn dataset(&self) -> &[MetricRecord] {
        &self.dataset
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Records for the selected periods, recomputed on every call.
    pub fn filtered_view(&self) -> Vec<MetricRecord> {
        self.filter.apply(&self.dataset)
    }

    /// Replace the whole dataset. The period selection is kept.
    pub fn regenerate(&mut self) {
        self.dataset = generate();
        info!(records = self.dataset.len(), "dataset regenerated");
    }

    pub fn toggle_period(&mut self, identifier: &str) -> Result<Period> {
        let period = self.filter.toggle_named(identifier)?;
        debug!(
            %period,
            selected = self.filter.contains(period),
            visible = self.filter.len(),
            "period toggled"
        );
        Ok(period)
    }

    /// CSV of every generated record. The period filter does not apply.
    pub fn export_data(&self) -> Result<Delivery>
    where
        S: ArtifactSink,
    {
        export_csv(&self.dataset, &self.sink)
    }

    /// Snapshot `handle` now and capture it in the background.
    pub fn export_chart(
        &self,
        handle: &SurfaceHandle,
        filename: &str,
    ) -> impl Future<Output = Result<ExportOutcome>> + 'static
    where
        R: Rasterizer + Clone + 'static,
        S: ArtifactSink + Clone + 'static,
    {
        let snapshot = handle.snapshot();
        let rasterizer = self.rasterizer.clone();
        let sink = self.sink.clone();
        let filename = filename.to_string();
        async move { export_snapshot(snapshot, &filename, &rasterizer, &sink).await }
    }
}
