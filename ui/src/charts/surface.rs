use dioxus::prelude::*;
use tracing::warn;

use super::{make_svg_responsive, render_svg, Chart};
use crate::core::MetricRecord;
use crate::export::{Surface, SurfaceHandle};

/// Inline chart that publishes what it draws through `handle`.
#[component]
pub fn ChartSurface(chart: Chart, records: Vec<MetricRecord>, handle: SurfaceHandle) -> Element {
    let spec = chart.spec();

    {
        let handle = handle.clone();
        use_drop(move || handle.unbind());
    }

    // Rebind on every render so a capture always sees what is on screen.
    let markup = match render_svg(&spec, &records, spec.width, spec.height) {
        Ok(svg) => {
            let responsive = make_svg_responsive(&svg, spec.width, spec.height);
            handle.bind(Surface {
                svg,
                width: spec.width,
                height: spec.height,
            });
            responsive
        }
        Err(err) => {
            warn!(chart = spec.title, %err, "chart render failed");
            handle.unbind();
            String::new()
        }
    };

    rsx! {
        div {
            class: "chart-surface",
            style: "aspect-ratio: {spec.width} / {spec.height};",
            dangerous_inner_html: "{markup}"
        }
    }
}
