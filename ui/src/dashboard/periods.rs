use dioxus::prelude::*;
use tracing::warn;

use super::{DashboardController, ExportStatus};
use crate::core::Period;

/// One checkbox per period; unticking hides that period from both charts.
#[component]
pub fn PeriodPicker(
    controller: Signal<DashboardController>,
    status: Signal<ExportStatus>,
) -> Element {
    let mut controller = controller;
    let mut status = status;
    let selected = controller.read().filter().clone();

    rsx! {
        fieldset { class: "period-picker",
            legend { class: "period-picker__label", "Select Months:" }
            for period in Period::ALL {
                label { key: "{period}", class: "period-picker__option",
                    input {
                        r#type: "checkbox",
                        value: period.name(),
                        checked: selected.contains(period),
                        onchange: move |_| {
                            if let Err(err) = controller.write().toggle_period(period.name()) {
                                warn!(%err, "period toggle rejected");
                                status.set(ExportStatus::Error(err.to_string()));
                            }
                        },
                    }
                    span { "{period}" }
                }
            }
        }
    }
}
