//! Builds the report's nine figures from the aggregation series.
//!
//! Eight descriptive charts over the incident table plus the
//! variable-importance chart from the model summary. Order here is
//! presentation order in the rendered document.

use shooting_report_chart::{BarChart, HorizontalBarChart, LineChart};
use shooting_report_gbm::ModelSummary;
use shooting_report_incident_models::Incident;

use crate::ReportConfig;

/// Approximate first ordinal day of each month, for day-of-year ticks.
const MONTH_TICKS: &[(usize, &str)] = &[
    (0, "Jan"),
    (31, "Feb"),
    (59, "Mar"),
    (90, "Apr"),
    (120, "May"),
    (151, "Jun"),
    (181, "Jul"),
    (212, "Aug"),
    (243, "Sep"),
    (273, "Oct"),
    (304, "Nov"),
    (334, "Dec"),
];

/// Number of x-axis ticks on the by-date chart.
const DATE_TICKS: usize = 6;

/// One rendered figure, ready for embedding or standalone output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Figure {
    /// File-name-safe identifier (e.g. `severity_by_hour`).
    pub slug: &'static str,
    /// Caption shown under the figure in the report.
    pub caption: &'static str,
    /// The rendered SVG document.
    pub svg: String,
}

/// Renders all nine figures in presentation order.
#[must_use]
pub fn build_figures(
    incidents: &[Incident],
    model: &ModelSummary,
    config: &ReportConfig,
) -> Vec<Figure> {
    vec![
        by_date(incidents),
        by_weekday(incidents),
        by_day_of_year(incidents, config.smoothing_window),
        by_hour(incidents),
        by_time_range(incidents),
        by_neighbourhood(incidents, config.top_neighbourhoods),
        by_division(incidents),
        score_distribution(incidents),
        importance(model),
    ]
}

fn by_date(incidents: &[Incident]) -> Figure {
    let series = shooting_report_analytics::score_by_date(incidents);
    let values: Vec<f64> = series.iter().map(|p| p.score as f64).collect();

    // Label a handful of evenly spaced dates along the x axis.
    let step = (series.len().saturating_sub(1) / DATE_TICKS.saturating_sub(1).max(1)).max(1);
    let x_ticks = series
        .iter()
        .enumerate()
        .step_by(step)
        .map(|(i, p)| (i, p.date.format("%Y-%m").to_string()))
        .collect();

    Figure {
        slug: "severity_by_date",
        caption: "Total severity score per occurrence date.",
        svg: LineChart {
            title: "Severity by date".to_owned(),
            y_label: "Total severity score".to_owned(),
            values,
            smoothed: None,
            x_ticks,
        }
        .to_svg(),
    }
}

fn by_weekday(incidents: &[Incident]) -> Figure {
    let series = shooting_report_analytics::score_by_weekday(incidents);
    Figure {
        slug: "severity_by_weekday",
        caption: "Total severity score per day of week.",
        svg: BarChart {
            title: "Severity by day of week".to_owned(),
            y_label: "Total severity score".to_owned(),
            bars: series
                .into_iter()
                .map(|p| (p.weekday.to_string(), p.score as f64))
                .collect(),
            rotate_x_labels: false,
        }
        .to_svg(),
    }
}

fn by_day_of_year(incidents: &[Incident], window: usize) -> Figure {
    let series = shooting_report_analytics::score_by_day_of_year(incidents, window);
    Figure {
        slug: "severity_by_day_of_year",
        caption: "Total severity score per day of year, with a centered moving average.",
        svg: LineChart {
            title: "Severity by day of year".to_owned(),
            y_label: "Total severity score".to_owned(),
            values: series.iter().map(|p| p.score as f64).collect(),
            smoothed: Some(series.iter().map(|p| p.smoothed).collect()),
            x_ticks: MONTH_TICKS
                .iter()
                .map(|&(i, label)| (i, label.to_owned()))
                .collect(),
        }
        .to_svg(),
    }
}

fn by_hour(incidents: &[Incident]) -> Figure {
    let series = shooting_report_analytics::score_by_hour(incidents);
    Figure {
        slug: "severity_by_hour",
        caption: "Total severity score per hour of day.",
        svg: BarChart {
            title: "Severity by hour of day".to_owned(),
            y_label: "Total severity score".to_owned(),
            bars: series
                .into_iter()
                .map(|p| (p.hour.to_string(), p.score as f64))
                .collect(),
            rotate_x_labels: false,
        }
        .to_svg(),
    }
}

fn by_time_range(incidents: &[Incident]) -> Figure {
    let series = shooting_report_analytics::score_by_time_range(incidents);
    Figure {
        slug: "severity_by_time_range",
        caption: "Total severity score per time-of-day range.",
        svg: BarChart {
            title: "Severity by time range".to_owned(),
            y_label: "Total severity score".to_owned(),
            bars: series
                .into_iter()
                .map(|p| (p.time_range.to_string(), p.score as f64))
                .collect(),
            rotate_x_labels: false,
        }
        .to_svg(),
    }
}

fn by_neighbourhood(incidents: &[Incident], top: usize) -> Figure {
    let series = shooting_report_analytics::score_by_neighbourhood(incidents, Some(top));
    Figure {
        slug: "severity_by_neighbourhood",
        caption: "Neighbourhoods with the highest total severity score.",
        svg: HorizontalBarChart {
            title: "Severity by neighbourhood".to_owned(),
            x_label: "Total severity score".to_owned(),
            bars: series
                .into_iter()
                .map(|p| (p.name, p.score as f64))
                .collect(),
        }
        .to_svg(),
    }
}

fn by_division(incidents: &[Incident]) -> Figure {
    let series = shooting_report_analytics::score_by_division(incidents);
    Figure {
        slug: "severity_by_division",
        caption: "Total severity score per police division.",
        svg: BarChart {
            title: "Severity by division".to_owned(),
            y_label: "Total severity score".to_owned(),
            bars: series
                .into_iter()
                .map(|p| (p.division.to_string(), p.score as f64))
                .collect(),
            rotate_x_labels: true,
        }
        .to_svg(),
    }
}

fn score_distribution(incidents: &[Incident]) -> Figure {
    let buckets = shooting_report_analytics::score_distribution(incidents);
    Figure {
        slug: "score_distribution",
        caption: "Number of incidents at each severity score value.",
        svg: BarChart {
            title: "Severity score distribution".to_owned(),
            y_label: "Incidents".to_owned(),
            bars: buckets
                .into_iter()
                .map(|b| (b.score.to_string(), b.incidents as f64))
                .collect(),
            rotate_x_labels: false,
        }
        .to_svg(),
    }
}

fn importance(model: &ModelSummary) -> Figure {
    Figure {
        slug: "variable_importance",
        caption: "Relative influence of each predictor in the fitted GBM.",
        svg: HorizontalBarChart {
            title: "GBM variable importance".to_owned(),
            x_label: "Relative influence (%)".to_owned(),
            bars: model
                .importance_ranking()
                .into_iter()
                .map(|p| (p.predictor.label().to_owned(), p.relative_influence))
                .collect(),
        }
        .to_svg(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike as _, NaiveDate};
    use shooting_report_incident_models::{Division, Neighbourhood, TimeRange};

    use super::*;

    fn incident(date: (i32, u32, u32), hour: u8, deaths: u32, injuries: u32) -> Incident {
        let occ_date = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
        Incident::new(
            occ_date,
            occ_date.weekday(),
            u16::try_from(occ_date.ordinal()).unwrap(),
            hour,
            TimeRange::Evening,
            Neighbourhood::new("Moss Park", Some(73)).unwrap(),
            Division::D51,
            deaths,
            injuries,
        )
        .unwrap()
    }

    fn model() -> ModelSummary {
        ModelSummary::from_json(include_str!("../../../data/model_summary.json")).unwrap()
    }

    #[test]
    fn builds_all_nine_figures() {
        let incidents = vec![
            incident((2023, 7, 14), 22, 1, 2),
            incident((2023, 7, 15), 19, 0, 1),
        ];
        let config = ReportConfig::embedded().unwrap();
        let figures = build_figures(&incidents, &model(), &config);
        assert_eq!(figures.len(), 9);

        let slugs: Vec<&str> = figures.iter().map(|f| f.slug).collect();
        assert!(slugs.contains(&"severity_by_date"));
        assert!(slugs.contains(&"variable_importance"));
        // Slugs are unique so figures can be written side by side.
        let mut deduped = slugs.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(slugs.len(), deduped.len());
    }

    #[test]
    fn every_figure_is_nonempty_svg() {
        let incidents = vec![incident((2023, 7, 14), 22, 1, 2)];
        let config = ReportConfig::embedded().unwrap();
        for figure in build_figures(&incidents, &model(), &config) {
            assert!(figure.svg.starts_with("<svg "), "{}", figure.slug);
            assert!(figure.svg.ends_with("</svg>"), "{}", figure.slug);
        }
    }

    #[test]
    fn importance_chart_ranks_descending() {
        let figure = importance(&model());
        let date_pos = figure.svg.find("Occurrence date").unwrap();
        let range_pos = figure.svg.find("Time range").unwrap();
        assert!(date_pos < range_pos);
    }
}
