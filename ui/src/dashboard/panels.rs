use dioxus::prelude::*;

use super::{DashboardController, ExportStatus};
use crate::charts::{Chart, ChartSurface};
use crate::export::{ExportOutcome, SurfaceHandle};

/// A chart with its own export button. The surface handle lives as long as
/// the card is mounted.
#[component]
pub fn ChartCard(
    chart: Chart,
    controller: Signal<DashboardController>,
    status: Signal<ExportStatus>,
) -> Element {
    let mut status = status;
    let handle = use_hook(SurfaceHandle::default);
    let spec = chart.spec();
    let records = controller.read().filtered_view();

    let export_handler = {
        let handle = handle.clone();
        move |_| {
            status.set(ExportStatus::Working("Preparing PNG"));
            // Each click is an independent capture; nothing waits on earlier ones.
            let capture = controller.read().export_chart(&handle, spec.export_name);
            spawn(async move {
                match capture.await {
                    Ok(ExportOutcome::Delivered(delivery)) => {
                        status.set(ExportStatus::Done(delivery.describe("PNG")))
                    }
                    Ok(ExportOutcome::Skipped) => status.set(ExportStatus::Idle),
                    Err(err) => status.set(ExportStatus::Error(err.to_string())),
                }
            });
        }
    };

    rsx! {
        section { class: "dashboard-card dashboard-card--{chart:?}",
            div { class: "dashboard-card__header",
                h2 { "{spec.title}" }
                button {
                    r#type: "button",
                    class: "button button--ghost",
                    onclick: export_handler,
                    "Export PNG"
                }
            }
            ChartSurface { chart, records, handle }
        }
    }
}

/// Regenerate and CSV download. CSV always covers the full dataset.
#[component]
pub fn DataActions(
    controller: Signal<DashboardController>,
    status: Signal<ExportStatus>,
) -> Element {
    let mut controller = controller;
    let mut status = status;

    let regenerate_handler = move |_| {
        controller.write().regenerate();
        status.set(ExportStatus::Idle);
    };

    let csv_handler = move |_| {
        status.set(ExportStatus::Working("Preparing CSV"));
        let outcome = controller.read().export_data();
        match outcome {
            Ok(delivery) => status.set(ExportStatus::Done(delivery.describe("CSV"))),
            Err(err) => status.set(ExportStatus::Error(err.to_string())),
        }
    };

    rsx! {
        section { class: "dashboard-card dashboard-actions",
            div { class: "dashboard-actions__buttons",
                button {
                    r#type: "button",
                    class: "button button--primary",
                    onclick: regenerate_handler,
                    "Regenerate Synthetic Data"
                }
                button {
                    r#type: "button",
                    class: "button",
                    onclick: csv_handler,
                    "Download CSV"
                }
            }
        }
    }
}
