use dioxus::prelude::*;

use crate::charts::Chart;
use crate::dashboard::{
    ChartCard, DashboardController, DataActions, ExportStatus, PeriodPicker, StatusLine,
};

#[component]
pub fn Dashboard() -> Element {
    let controller = use_signal(DashboardController::for_platform);
    let status = use_signal(|| ExportStatus::Idle);

    rsx! {
        section { class: "page page-dashboard",
            h1 { "Synthetic Data Dashboard" }

            PeriodPicker { controller, status }

            div { class: "dashboard__charts",
                ChartCard { chart: Chart::Threats, controller, status }
                ChartCard { chart: Chart::Accuracy, controller, status }
            }

            DataActions { controller, status }
            StatusLine { status }
        }
    }
}
