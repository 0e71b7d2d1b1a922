#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]
#![allow(clippy::cast_precision_loss)]

//! Report composer: one forward pass from inputs to a rendered document.
//!
//! [`generate_report`] takes the data source, the model-summary source,
//! and the output target as explicit parameters (no module-level state),
//! loads and validates both inputs, runs every aggregation, renders the
//! nine figures, and writes a single self-contained HTML document with
//! the narrative text, the figures inline, the summary-statistics table,
//! and the GBM hyperparameter and importance summary.
//!
//! Report settings and narrative live in `report.toml`, embedded at
//! compile time the same way the data-source registry embeds its
//! definitions.

pub mod figures;

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};

pub use figures::{Figure, build_figures};
use serde::Deserialize;
use shooting_report_analytics::summary_stats;
use shooting_report_analytics_models::SummaryStats;
use shooting_report_chart::svg::escape;
use shooting_report_gbm::{ModelError, ModelSummary};
use shooting_report_incident_models::Incident;
use shooting_report_ingest::{IngestError, load_incidents};

/// Report settings TOML embedded at compile time.
const REPORT_TOML: &str = include_str!("../report.toml");

/// Figure slug that belongs in the model section, not the descriptive
/// section.
const IMPORTANCE_SLUG: &str = "variable_importance";

/// Report settings and narrative text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportConfig {
    /// Document title.
    pub title: String,
    /// Window (in days) for the day-of-year moving average.
    pub smoothing_window: usize,
    /// Number of neighbourhoods shown in the ranked chart.
    pub top_neighbourhoods: usize,
    /// Narrative paragraphs.
    pub narrative: Narrative,
}

/// The report's narrative paragraphs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Narrative {
    /// Opening paragraph.
    pub intro: String,
    /// Paragraph introducing the dataset and validation rules.
    pub data: String,
    /// Paragraph introducing the model summary.
    pub model: String,
}

impl ReportConfig {
    /// Parses the embedded report settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded TOML is malformed.
    pub fn embedded() -> Result<Self, ComposeError> {
        Ok(toml::from_str(REPORT_TOML)?)
    }
}

/// Errors that can occur while composing the report.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    /// The embedded report settings failed to parse.
    #[error("report config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Loading or validating the incident dataset failed.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Loading or validating the model artifact failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Generates the full report document.
///
/// Inputs are acquired at call start and the output file is flushed and
/// closed before returning; nothing is cached across calls.
///
/// # Errors
///
/// Returns an error if either input fails to load or validate, or if
/// the output cannot be written.
pub fn generate_report(
    data_source: &Path,
    model_source: &Path,
    output_target: &Path,
) -> Result<(), ComposeError> {
    let config = ReportConfig::embedded()?;
    let incidents = load_incidents(data_source)?;
    let model = ModelSummary::load(model_source)?;

    let html = render_report(&incidents, &model, &config)?;

    if let Some(parent) = output_target.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(output_target)?);
    writer.write_all(html.as_bytes())?;
    writer.flush()?;

    log::info!("Report written to {}", output_target.display());
    Ok(())
}

/// Renders every figure as a standalone SVG file under `out_dir`.
///
/// # Errors
///
/// Same failure modes as [`generate_report`].
pub fn write_figures(
    data_source: &Path,
    model_source: &Path,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, ComposeError> {
    let config = ReportConfig::embedded()?;
    let incidents = load_incidents(data_source)?;
    let model = ModelSummary::load(model_source)?;

    std::fs::create_dir_all(out_dir)?;

    let mut paths = Vec::new();
    for figure in build_figures(&incidents, &model, &config) {
        let path = out_dir.join(format!("{}.svg", figure.slug));
        std::fs::write(&path, &figure.svg)?;
        log::info!("Figure written to {}", path.display());
        paths.push(path);
    }

    Ok(paths)
}

/// Renders the report HTML from already-loaded inputs.
///
/// # Errors
///
/// Returns an error if the incident slice is empty (the loader never
/// produces one).
pub fn render_report(
    incidents: &[Incident],
    model: &ModelSummary,
    config: &ReportConfig,
) -> Result<String, ComposeError> {
    let stats = summary_stats(incidents).ok_or(ComposeError::Ingest(IngestError::EmptyDataset))?;
    let figures = build_figures(incidents, model, config);
    let (descriptive, model_figures): (Vec<&Figure>, Vec<&Figure>) = figures
        .iter()
        .partition(|f| f.slug != IMPORTANCE_SLUG);

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape(&config.title));
    html.push_str(STYLE);
    html.push_str("</head>\n<body>\n");

    let _ = writeln!(html, "<h1>{}</h1>", escape(&config.title));
    let _ = writeln!(html, "<p>{}</p>", escape(&config.narrative.intro));

    html.push_str("<h2>Data</h2>\n");
    let _ = writeln!(html, "<p>{}</p>", escape(&config.narrative.data));
    html.push_str(&summary_table(&stats));

    html.push_str("<h2>Descriptive figures</h2>\n");
    for figure in descriptive {
        html.push_str(&figure_html(figure));
    }

    html.push_str("<h2>Model</h2>\n");
    let _ = writeln!(html, "<p>{}</p>", escape(&config.narrative.model));
    html.push_str(&model_table(model));
    for figure in model_figures {
        html.push_str(&figure_html(figure));
    }
    let _ = writeln!(
        html,
        "<p>Cross-validated RMSE of the fitted model: <strong>{:.6}</strong>.</p>",
        model.cv_rmse
    );

    html.push_str("</body>\n</html>\n");
    Ok(html)
}

/// Minimal inline stylesheet so the document stands alone.
const STYLE: &str = "<style>\n\
    body { font-family: sans-serif; max-width: 780px; margin: 2em auto; color: #222; }\n\
    figure { margin: 1.5em 0; }\n\
    figcaption { font-size: 0.85em; color: #555; margin-top: 0.4em; }\n\
    table { border-collapse: collapse; margin: 1em 0; }\n\
    th, td { border: 1px solid #ccc; padding: 0.35em 0.7em; text-align: left; }\n\
    th { background: #f2f2f2; }\n\
    </style>\n";

fn figure_html(figure: &Figure) -> String {
    format!(
        "<figure id=\"{}\">\n{}\n<figcaption>{}</figcaption>\n</figure>\n",
        figure.slug, figure.svg, figure.caption
    )
}

fn summary_table(stats: &SummaryStats) -> String {
    let mut out = String::new();
    out.push_str("<table>\n<tbody>\n");
    let rows = [
        ("Incidents", stats.incidents.to_string()),
        ("First occurrence date", stats.first_date.to_string()),
        ("Last occurrence date", stats.last_date.to_string()),
        ("Total deaths", stats.total_deaths.to_string()),
        ("Total injuries", stats.total_injuries.to_string()),
        ("Total severity score", stats.total_score.to_string()),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "<tr><th>{label}</th><td>{value}</td></tr>");
    }
    out.push_str("</tbody>\n</table>\n");
    out
}

fn model_table(model: &ModelSummary) -> String {
    let mut out = String::new();
    out.push_str("<table>\n<tbody>\n");
    let config = &model.config;
    let rows = [
        ("Trees", config.n_trees.to_string()),
        ("Interaction depth", config.interaction_depth.to_string()),
        ("Shrinkage", config.shrinkage.to_string()),
        ("CV folds", config.cv_folds.to_string()),
        ("Response", config.response.clone()),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "<tr><th>{label}</th><td>{value}</td></tr>");
    }
    out.push_str("</tbody>\n</table>\n");

    out.push_str("<table>\n<thead>\n<tr><th>Predictor</th><th>Relative influence (%)</th></tr>\n</thead>\n<tbody>\n");
    for point in model.importance_ranking() {
        let _ = writeln!(
            out,
            "<tr><td>{}</td><td>{:.2}</td></tr>",
            point.predictor.label(),
            point.relative_influence
        );
    }
    out.push_str("</tbody>\n</table>\n");
    out
}
