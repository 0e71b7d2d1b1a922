#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]
#![allow(clippy::cast_precision_loss)]

//! SVG chart rendering for the report figures.
//!
//! Three chart kinds cover every figure in the report: vertical bars for
//! the small categorical groupings, a line (with optional smoothed
//! overlay) for the long temporal series, and horizontal bars for the
//! neighbourhood and variable-importance rankings. Charts are assembled
//! directly as SVG markup; figures are terminal outputs and nothing
//! feeds back into the data.

pub mod svg;

use svg::{Anchor, Line, Polyline, Rect, Text};

/// Figure width in SVG user units.
const WIDTH: f64 = 720.0;
/// Figure height in SVG user units.
const HEIGHT: f64 = 420.0;
/// Left margin, wide enough for y-axis tick labels.
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 44.0;
const MARGIN_BOTTOM: f64 = 72.0;

/// Number of y-axis gridline intervals.
const Y_TICKS: usize = 4;

const BAR_FILL: &str = "#4e79a7";
const RAW_STROKE: &str = "#a6c8e4";
const SMOOTH_STROKE: &str = "#e15759";
const AXIS_COLOR: &str = "#333333";
const GRID_COLOR: &str = "#dddddd";
const LABEL_COLOR: &str = "#333333";

/// A vertical bar chart over a small categorical grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    /// Figure title.
    pub title: String,
    /// Y-axis label.
    pub y_label: String,
    /// One `(category label, value)` pair per bar, in display order.
    pub bars: Vec<(String, f64)>,
    /// Rotate x labels -40 degrees (for long category names).
    pub rotate_x_labels: bool,
}

impl BarChart {
    /// Renders the chart to a standalone SVG document.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let plot = PlotArea::new();
        let max = nice_max(self.bars.iter().map(|(_, v)| *v));

        let mut body = String::new();
        body.push_str(&title_svg(&self.title));
        body.push_str(&plot.y_axis_svg(max, &self.y_label));

        let slot = plot.width / self.bars.len().max(1) as f64;
        let bar_width = slot * 0.7;

        for (i, (label, value)) in self.bars.iter().enumerate() {
            let x = plot.left + i as f64 * slot + (slot - bar_width) / 2.0;
            let height = plot.height * value / max;
            body.push_str(
                &Rect {
                    x,
                    y: plot.bottom - height,
                    width: bar_width,
                    height,
                    fill: BAR_FILL,
                }
                .to_svg(),
            );

            let label_x = plot.left + (i as f64 + 0.5) * slot;
            body.push_str(
                &Text {
                    x: label_x,
                    y: plot.bottom + 16.0,
                    content: label.clone(),
                    size: 11.0,
                    anchor: if self.rotate_x_labels {
                        Anchor::End
                    } else {
                        Anchor::Middle
                    },
                    fill: LABEL_COLOR,
                    rotate: self.rotate_x_labels.then_some(-40.0),
                }
                .to_svg(),
            );
        }

        svg::document(WIDTH, HEIGHT, &body)
    }
}

/// A horizontal bar chart for ranked groupings (neighbourhoods,
/// variable importance).
#[derive(Debug, Clone, PartialEq)]
pub struct HorizontalBarChart {
    /// Figure title.
    pub title: String,
    /// X-axis label.
    pub x_label: String,
    /// One `(label, value)` pair per row, top row first.
    pub bars: Vec<(String, f64)>,
}

impl HorizontalBarChart {
    /// Renders the chart to a standalone SVG document.
    ///
    /// Row labels sit in a widened left margin; each bar carries its
    /// value at its right end.
    #[must_use]
    pub fn to_svg(&self) -> String {
        // Ranked charts need room for names, not tick labels.
        let left = 190.0;
        let height = (MARGIN_TOP + 28.0 + self.bars.len() as f64 * 24.0).max(HEIGHT / 2.0);
        let plot_width = WIDTH - left - MARGIN_RIGHT - 60.0;
        let max = nice_max(self.bars.iter().map(|(_, v)| *v));

        let mut body = String::new();
        body.push_str(&title_svg(&self.title));

        for (i, (label, value)) in self.bars.iter().enumerate() {
            let y = MARGIN_TOP + i as f64 * 24.0;
            let bar_width = plot_width * value / max;

            body.push_str(
                &Text {
                    x: left - 8.0,
                    y: y + 12.0,
                    content: label.clone(),
                    size: 11.0,
                    anchor: Anchor::End,
                    fill: LABEL_COLOR,
                    rotate: None,
                }
                .to_svg(),
            );
            body.push_str(
                &Rect {
                    x: left,
                    y,
                    width: bar_width,
                    height: 16.0,
                    fill: BAR_FILL,
                }
                .to_svg(),
            );
            body.push_str(
                &Text {
                    x: left + bar_width + 6.0,
                    y: y + 12.0,
                    content: fmt_value(*value),
                    size: 11.0,
                    anchor: Anchor::Start,
                    fill: LABEL_COLOR,
                    rotate: None,
                }
                .to_svg(),
            );
        }

        body.push_str(
            &Text {
                x: left + plot_width / 2.0,
                y: MARGIN_TOP + self.bars.len() as f64 * 24.0 + 20.0,
                content: self.x_label.clone(),
                size: 12.0,
                anchor: Anchor::Middle,
                fill: LABEL_COLOR,
                rotate: None,
            }
            .to_svg(),
        );

        svg::document(WIDTH, height + 32.0, &body)
    }
}

/// A line chart over a long ordered series, with an optional smoothed
/// overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    /// Figure title.
    pub title: String,
    /// Y-axis label.
    pub y_label: String,
    /// Raw series values, in x order.
    pub values: Vec<f64>,
    /// Smoothed overlay, same length as `values`, if any.
    pub smoothed: Option<Vec<f64>>,
    /// Sparse x-axis tick labels as `(index, label)` pairs.
    pub x_ticks: Vec<(usize, String)>,
}

impl LineChart {
    /// Renders the chart to a standalone SVG document.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let plot = PlotArea::new();
        let max = nice_max(
            self.values
                .iter()
                .chain(self.smoothed.iter().flatten())
                .copied(),
        );

        let mut body = String::new();
        body.push_str(&title_svg(&self.title));
        body.push_str(&plot.y_axis_svg(max, &self.y_label));

        body.push_str(
            &Polyline {
                points: plot.project(&self.values, max),
                stroke: RAW_STROKE,
                stroke_width: 1.0,
            }
            .to_svg(),
        );

        if let Some(smoothed) = &self.smoothed {
            body.push_str(
                &Polyline {
                    points: plot.project(smoothed, max),
                    stroke: SMOOTH_STROKE,
                    stroke_width: 2.0,
                }
                .to_svg(),
            );
            body.push_str(&legend_svg(&[
                ("raw", RAW_STROKE),
                ("smoothed", SMOOTH_STROKE),
            ]));
        }

        for (index, label) in &self.x_ticks {
            let x = plot.x_at(*index, self.values.len());
            body.push_str(
                &Line {
                    x1: x,
                    y1: plot.bottom,
                    x2: x,
                    y2: plot.bottom + 5.0,
                    stroke: AXIS_COLOR,
                    stroke_width: 1.0,
                }
                .to_svg(),
            );
            body.push_str(
                &Text {
                    x,
                    y: plot.bottom + 20.0,
                    content: label.clone(),
                    size: 11.0,
                    anchor: Anchor::Middle,
                    fill: LABEL_COLOR,
                    rotate: None,
                }
                .to_svg(),
            );
        }

        svg::document(WIDTH, HEIGHT, &body)
    }
}

/// The rectangular plotting region shared by the axis-based charts.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PlotArea {
    left: f64,
    bottom: f64,
    width: f64,
    height: f64,
}

impl PlotArea {
    const fn new() -> Self {
        Self {
            left: MARGIN_LEFT,
            bottom: HEIGHT - MARGIN_BOTTOM,
            width: WIDTH - MARGIN_LEFT - MARGIN_RIGHT,
            height: HEIGHT - MARGIN_TOP - MARGIN_BOTTOM,
        }
    }

    /// Renders gridlines, tick labels, the axis line, and the y label.
    fn y_axis_svg(&self, max: f64, label: &str) -> String {
        let mut out = String::new();

        for i in 0..=Y_TICKS {
            let value = max * i as f64 / Y_TICKS as f64;
            let y = self.bottom - self.height * i as f64 / Y_TICKS as f64;
            out.push_str(
                &Line {
                    x1: self.left,
                    y1: y,
                    x2: self.left + self.width,
                    y2: y,
                    stroke: GRID_COLOR,
                    stroke_width: 1.0,
                }
                .to_svg(),
            );
            out.push_str(
                &Text {
                    x: self.left - 8.0,
                    y: y + 4.0,
                    content: fmt_value(value),
                    size: 11.0,
                    anchor: Anchor::End,
                    fill: LABEL_COLOR,
                    rotate: None,
                }
                .to_svg(),
            );
        }

        out.push_str(
            &Line {
                x1: self.left,
                y1: self.bottom - self.height,
                x2: self.left,
                y2: self.bottom,
                stroke: AXIS_COLOR,
                stroke_width: 1.0,
            }
            .to_svg(),
        );
        out.push_str(
            &Text {
                x: 16.0,
                y: self.bottom - self.height / 2.0,
                content: label.to_owned(),
                size: 12.0,
                anchor: Anchor::Middle,
                fill: LABEL_COLOR,
                rotate: Some(-90.0),
            }
            .to_svg(),
        );

        out
    }

    /// X coordinate for the i-th of `len` evenly spaced points.
    fn x_at(&self, index: usize, len: usize) -> f64 {
        if len <= 1 {
            return self.left;
        }
        self.left + self.width * index as f64 / (len - 1) as f64
    }

    /// Projects a series into plot coordinates.
    fn project(&self, values: &[f64], max: f64) -> Vec<(f64, f64)> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (self.x_at(i, values.len()), self.bottom - self.height * v / max))
            .collect()
    }
}

/// Renders the figure title, centered at the top.
fn title_svg(title: &str) -> String {
    Text {
        x: WIDTH / 2.0,
        y: 22.0,
        content: title.to_owned(),
        size: 15.0,
        anchor: Anchor::Middle,
        fill: AXIS_COLOR,
        rotate: None,
    }
    .to_svg()
}

/// Renders a small legend in the top-right corner.
fn legend_svg(entries: &[(&str, &'static str)]) -> String {
    let mut out = String::new();
    let mut x = WIDTH - MARGIN_RIGHT - 150.0;
    for (label, color) in entries {
        out.push_str(
            &Line {
                x1: x,
                y1: MARGIN_TOP - 10.0,
                x2: x + 18.0,
                y2: MARGIN_TOP - 10.0,
                stroke: color,
                stroke_width: 2.0,
            }
            .to_svg(),
        );
        out.push_str(
            &Text {
                x: x + 24.0,
                y: MARGIN_TOP - 6.0,
                content: (*label).to_owned(),
                size: 11.0,
                anchor: Anchor::Start,
                fill: LABEL_COLOR,
                rotate: None,
            }
            .to_svg(),
        );
        x += 80.0;
    }
    out
}

/// Rounds the series maximum up to a 1/2/5 x 10^k ceiling so gridline
/// values land on round numbers. Returns 1 for empty or all-zero input
/// so projection never divides by zero.
fn nice_max<I: Iterator<Item = f64>>(values: I) -> f64 {
    let max = values.fold(0.0_f64, f64::max);
    if max <= 0.0 {
        return 1.0;
    }

    let magnitude = 10.0_f64.powf(max.log10().floor());
    let normalized = max / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Formats an axis value: integers without decimals, fractions with one.
fn fmt_value(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        format!("{value:.1}")
    }
}
