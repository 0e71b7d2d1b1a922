#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! CLI entry point for the shooting severity report.
//!
//! `report` runs the full pass: load the incident CSV, load the
//! pre-fitted GBM summary, and write the rendered HTML document.
//! `charts` writes the nine figures as standalone SVG files, and
//! `validate` schema-checks both inputs without producing output.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "shooting_report", about = "Shooting severity report generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the full HTML report
    Report {
        /// Path to the cleaned incident CSV
        #[arg(long, default_value = "data/shootings.csv")]
        data: PathBuf,
        /// Path to the pre-fitted GBM summary artifact
        #[arg(long, default_value = "data/model_summary.json")]
        model: PathBuf,
        /// Output HTML path
        #[arg(long, default_value = "data/generated/report.html")]
        out: PathBuf,
    },
    /// Write the figures as standalone SVG files
    Charts {
        /// Path to the cleaned incident CSV
        #[arg(long, default_value = "data/shootings.csv")]
        data: PathBuf,
        /// Path to the pre-fitted GBM summary artifact
        #[arg(long, default_value = "data/model_summary.json")]
        model: PathBuf,
        /// Output directory for the SVG files
        #[arg(long, default_value = "data/generated/figures")]
        out: PathBuf,
    },
    /// Validate the inputs without writing anything
    Validate {
        /// Path to the cleaned incident CSV
        #[arg(long, default_value = "data/shootings.csv")]
        data: PathBuf,
        /// Path to the pre-fitted GBM summary artifact
        #[arg(long, default_value = "data/model_summary.json")]
        model: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Report { data, model, out } => {
            shooting_report_compose::generate_report(&data, &model, &out)?;
        }
        Commands::Charts { data, model, out } => {
            let paths = shooting_report_compose::write_figures(&data, &model, &out)?;
            log::info!("Wrote {} figures to {}", paths.len(), out.display());
        }
        Commands::Validate { data, model } => {
            let incidents = shooting_report_ingest::load_incidents(&data)?;
            let summary = shooting_report_gbm::ModelSummary::load(&model)?;
            log::info!(
                "Inputs valid: {} incidents, model fitted with {} trees (CV RMSE {:.6})",
                incidents.len(),
                summary.config.n_trees,
                summary.cv_rmse
            );
        }
    }

    Ok(())
}
