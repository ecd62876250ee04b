//! Chart surfaces for the dashboard.
//!
//! Charts are declarative: a [`ChartSpec`] maps record fields onto series and
//! the x channel is always the period. Rendering goes through plotters' SVG
//! backend so the same markup can be shown inline and rasterized on export.

use std::ops::Range;

use plotters::prelude::*;

use crate::core::{
    format::{format_count, format_percent},
    MetricRecord,
};
use crate::export::{ACCURACY_PNG, THREATS_PNG};

mod surface;
pub use surface::ChartSurface;

/// A numeric record field a series can plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    RealAccuracy,
    SyntheticAccuracy,
    ThreatsDetected,
}

impl Field {
    /// Serialized field name, matching the CSV header.
    pub fn key(self) -> &'static str {
        match self {
            Field::RealAccuracy => "realAccuracy",
            Field::SyntheticAccuracy => "syntheticAccuracy",
            Field::ThreatsDetected => "threatsDetected",
        }
    }

    pub fn value(self, record: &MetricRecord) -> f64 {
        match self {
            Field::RealAccuracy => record.real_accuracy,
            Field::SyntheticAccuracy => record.synthetic_accuracy,
            Field::ThreatsDetected => record.threats_detected as f64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
}

#[derive(Debug, Clone, Copy)]
pub struct Series {
    pub field: Field,
    pub label: &'static str,
    pub color: RGBColor,
}

#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub title: &'static str,
    pub kind: ChartKind,
    pub series: &'static [Series],
    pub y_domain: Range<f64>,
    pub width: u32,
    pub height: u32,
    /// Fixed download name for the PNG export.
    pub export_name: &'static str,
    y_tick: fn(f64) -> String,
}

const PURPLE: RGBColor = RGBColor(0x88, 0x84, 0xd8);
const GREEN: RGBColor = RGBColor(0x82, 0xca, 0x9d);

const THREATS_SERIES: &[Series] = &[Series {
    field: Field::ThreatsDetected,
    label: "Threats detected",
    color: PURPLE,
}];

const ACCURACY_SERIES: &[Series] = &[
    Series {
        field: Field::RealAccuracy,
        label: "Real Data",
        color: GREEN,
    },
    Series {
        field: Field::SyntheticAccuracy,
        label: "Synthetic Data",
        color: PURPLE,
    },
];

/// The two charts the dashboard shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chart {
    Threats,
    Accuracy,
}

impl Chart {
    pub fn spec(self) -> ChartSpec {
        match self {
            Chart::Threats => ChartSpec {
                title: "Threat Detection Over Time",
                kind: ChartKind::Line,
                series: THREATS_SERIES,
                y_domain: 0.0..100.0,
                width: 800,
                height: 300,
                export_name: THREATS_PNG,
                y_tick: format_count,
            },
            Chart::Accuracy => ChartSpec {
                title: "Real vs Synthetic Data Accuracy",
                kind: ChartKind::Bar,
                series: ACCURACY_SERIES,
                y_domain: 0.7..1.0,
                width: 600,
                height: 250,
                export_name: ACCURACY_PNG,
                y_tick: format_percent,
            },
        }
    }
}

/// Draw `view` according to `spec` into a standalone SVG document of the
/// given pixel size. An empty view renders the axes only.
pub fn render_svg(
    spec: &ChartSpec,
    view: &[MetricRecord],
    width: u32,
    height: u32,
) -> Result<String, String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        // One unit-wide slot per record, centred on its index.
        let slots = view.len().max(1);
        let x_range = -0.5..slots as f64 - 0.5;

        let mut chart = ChartBuilder::on(&root)
            .margin(12)
            .x_label_area_size(28)
            .y_label_area_size(48)
            .build_cartesian_2d(x_range, spec.y_domain.clone())
            .map_err(draw_err)?;

        let x_label = |x: &f64| slot_label(view, *x);
        let y_label = |y: &f64| (spec.y_tick)(*y);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(slots)
            .y_labels(6)
            .x_label_formatter(&x_label)
            .y_label_formatter(&y_label)
            .label_style(("sans-serif", 12))
            .draw()
            .map_err(draw_err)?;

        match spec.kind {
            ChartKind::Line => {
                for series in spec.series {
                    let points: Vec<(f64, f64)> = view
                        .iter()
                        .enumerate()
                        .map(|(idx, record)| (idx as f64, series.field.value(record)))
                        .collect();
                    let color = series.color;
                    chart
                        .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
                        .map_err(draw_err)?
                        .label(series.label)
                        .legend(move |(x, y)| {
                            PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(2))
                        });
                    chart
                        .draw_series(
                            points
                                .iter()
                                .map(|&point| Circle::new(point, 3, color.filled())),
                        )
                        .map_err(draw_err)?;
                }
            }
            ChartKind::Bar => {
                let floor = spec.y_domain.start;
                let band = 0.8 / spec.series.len().max(1) as f64;
                for (series_idx, series) in spec.series.iter().enumerate() {
                    let color = series.color;
                    let offset = -0.4 + band * series_idx as f64;
                    chart
                        .draw_series(view.iter().enumerate().map(|(idx, record)| {
                            let left = idx as f64 + offset;
                            let value = series.field.value(record).max(floor);
                            Rectangle::new(
                                [(left, floor), (left + band * 0.9, value)],
                                color.filled(),
                            )
                        }))
                        .map_err(draw_err)?
                        .label(series.label)
                        .legend(move |(x, y)| {
                            Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                        });
                }
            }
        }

        if spec.series.len() > 1 {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::LowerRight)
                .background_style(&WHITE.mix(0.85))
                .border_style(&BLACK.mix(0.3))
                .label_font(("sans-serif", 12))
                .draw()
                .map_err(draw_err)?;
        }

        root.present().map_err(draw_err)?;
    }

    Ok(svg)
}

fn slot_label(view: &[MetricRecord], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    view.get(idx as usize)
        .map(|record| record.period.short_name().to_string())
        .unwrap_or_default()
}

fn draw_err<E: std::fmt::Display>(err: E) -> String {
    format!("Chart rendering failed: {err}")
}

/// Swap fixed dimensions for a viewBox so the inline chart scales with its
/// container. Exports keep using the fixed-size markup.
pub fn make_svg_responsive(svg: &str, width: u32, height: u32) -> String {
    let needle = format!("width=\"{width}\" height=\"{height}\"");
    if !svg.contains(&needle) {
        return svg.to_string();
    }

    let fluid = "width=\"100%\" height=\"100%\" preserveAspectRatio=\"xMidYMid meet\"";
    let replacement = if svg.contains("viewBox=") {
        fluid.to_string()
    } else {
        format!("viewBox=\"0 0 {width} {height}\" {fluid}")
    };
    svg.replacen(&needle, &replacement, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{generate, FilterState, Period};

    #[test]
    fn field_keys_match_serialized_names() {
        let record = generate()[0];
        let json = serde_json::to_value(record).unwrap();
        for field in [
            Field::RealAccuracy,
            Field::SyntheticAccuracy,
            Field::ThreatsDetected,
        ] {
            let serialized = json[field.key()].as_f64().unwrap();
            assert_eq!(serialized, field.value(&record));
        }
    }

    #[test]
    fn renders_full_view_for_both_charts() {
        let data = generate();
        for chart in [Chart::Threats, Chart::Accuracy] {
            let spec = chart.spec();
            let svg = render_svg(&spec, &data, spec.width, spec.height).unwrap();
            assert!(svg.contains("<svg"));
            assert!(svg.contains("Jan"));
            assert!(svg.contains("Dec"));
        }
    }

    #[test]
    fn filtered_out_periods_are_not_labelled() {
        let data = generate();
        let view = FilterState::all().toggled(Period::March).apply(&data);
        let spec = Chart::Threats.spec();
        let svg = render_svg(&spec, &view, spec.width, spec.height).unwrap();
        assert!(has_label(&svg, "Feb"));
        assert!(has_label(&svg, "Apr"));
        assert!(!has_label(&svg, "Mar"));
    }

    fn has_label(svg: &str, label: &str) -> bool {
        svg.contains(&format!(">{label}<")) || svg.lines().any(|line| line.trim() == label)
    }

    #[test]
    fn empty_view_still_renders_axes() {
        let spec = Chart::Accuracy.spec();
        let svg = render_svg(&spec, &[], spec.width, spec.height).unwrap();
        assert!(svg.contains("</svg>"));
    }

    #[test]
    fn responsive_markup_uses_viewbox() {
        let svg = r#"<svg width="800" height="300" xmlns="http://www.w3.org/2000/svg"></svg>"#;
        let responsive = make_svg_responsive(svg, 800, 300);
        assert!(responsive.contains("viewBox=\"0 0 800 300\""));
        assert!(!responsive.contains("width=\"800\""));
        assert_eq!(make_svg_responsive(svg, 10, 10), svg);

        let boxed = r#"<svg width="800" height="300" viewBox="0 0 800 300"></svg>"#;
        assert_eq!(make_svg_responsive(boxed, 800, 300).matches("viewBox").count(), 1);
    }

    #[test]
    fn export_names_are_fixed() {
        assert_eq!(Chart::Threats.spec().export_name, "threats.png");
        assert_eq!(Chart::Accuracy.spec().export_name, "accuracy.png");
    }
}
