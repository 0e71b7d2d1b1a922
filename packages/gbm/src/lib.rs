#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loader for the pre-fitted GBM model summary artifact.
//!
//! The gradient-boosted ensemble itself is fitted outside this system;
//! what ships with the report is its exported summary: the frozen
//! hyperparameter configuration, the per-predictor relative influence,
//! and the cross-validated RMSE. This crate deserializes that artifact
//! and checks it for drift before the report renders anything from it.
//! There is no training, prediction, or hyperparameter search here.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Current artifact schema version. Bump this when the artifact format
/// changes in a backward-incompatible way.
pub const ARTIFACT_VERSION: u32 = 1;

/// Number of boosting iterations the reference model was fitted with.
pub const EXPECTED_N_TREES: u32 = 500;

/// Maximum interaction depth of each tree.
pub const EXPECTED_INTERACTION_DEPTH: u32 = 4;

/// Learning rate (shrinkage) of the reference model.
pub const EXPECTED_SHRINKAGE: f64 = 0.01;

/// Number of internal cross-validation folds.
pub const EXPECTED_CV_FOLDS: u32 = 5;

/// Response variable the model regresses on.
pub const EXPECTED_RESPONSE: &str = "weighted_score";

/// Tolerance when checking that relative influence sums to 100.
const INFLUENCE_SUM_TOLERANCE: f64 = 0.01;

/// Predictors the reference model was fitted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predictor {
    /// Occurrence date, numeric-encoded (days since epoch).
    OccDateNum,
    /// Day of week.
    OccDow,
    /// Day of year.
    OccDoy,
    /// Time-of-day range.
    OccTimeRange,
    /// 158-area neighbourhood.
    ///
    /// Renamed explicitly: `snake_case` would drop the underscore
    /// before the number, but the artifact spells it `neighbourhood_158`.
    #[serde(rename = "neighbourhood_158")]
    Neighbourhood158,
    /// Police division.
    Division,
}

impl Predictor {
    /// All predictors of the reference model.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::OccDateNum,
            Self::OccDow,
            Self::OccDoy,
            Self::OccTimeRange,
            Self::Neighbourhood158,
            Self::Division,
        ]
    }

    /// Human-readable axis label for the importance chart.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OccDateNum => "Occurrence date",
            Self::OccDow => "Day of week",
            Self::OccDoy => "Day of year",
            Self::OccTimeRange => "Time range",
            Self::Neighbourhood158 => "Neighbourhood",
            Self::Division => "Division",
        }
    }
}

/// Hyperparameter configuration the ensemble was fitted with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GbmConfig {
    /// Number of boosting iterations.
    pub n_trees: u32,
    /// Maximum interaction depth per tree.
    pub interaction_depth: u32,
    /// Learning rate.
    pub shrinkage: f64,
    /// Internal cross-validation folds.
    pub cv_folds: u32,
    /// Response variable name.
    pub response: String,
    /// Predictor set, in fitting order.
    pub predictors: Vec<Predictor>,
}

/// Relative influence of one predictor, on the 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfluencePoint {
    /// The predictor.
    pub predictor: Predictor,
    /// Relative influence (percent of total reduction in squared error).
    pub relative_influence: f64,
}

/// The exported summary of the pre-fitted ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSummary {
    /// Artifact schema version.
    pub version: u32,
    /// Hyperparameter configuration.
    pub config: GbmConfig,
    /// Per-predictor relative influence.
    pub relative_influence: Vec<InfluencePoint>,
    /// Cross-validated root mean squared error.
    pub cv_rmse: f64,
}

/// Errors that can occur while loading the model artifact.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// An I/O operation failed (typically: artifact file missing).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The artifact was written by an incompatible schema version.
    #[error("artifact version {found} does not match expected {ARTIFACT_VERSION}")]
    VersionMismatch {
        /// The version found in the artifact.
        found: u32,
    },

    /// A hyperparameter differs from the frozen reference configuration.
    #[error("hyperparameter drift: {field} is {found}, expected {expected}")]
    HyperparameterDrift {
        /// The drifted field name.
        field: &'static str,
        /// The value found in the artifact.
        found: String,
        /// The expected value.
        expected: String,
    },

    /// The predictor set differs from the reference model's.
    #[error("predictor set {found:?} does not match the reference model")]
    PredictorSetMismatch {
        /// The predictors found in the artifact.
        found: Vec<Predictor>,
    },

    /// The relative-influence table is malformed.
    #[error("invalid relative influence: {reason}")]
    InvalidInfluence {
        /// What is wrong with the table.
        reason: String,
    },
}

impl ModelSummary {
    /// Loads and validates the model summary from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// artifact drifted from the frozen reference configuration.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        log::info!("Loading model summary from {}", path.display());
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parses and validates a model summary from a JSON string.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ModelSummary::load`], minus file I/O.
    pub fn from_json(raw: &str) -> Result<Self, ModelError> {
        let summary: Self = serde_json::from_str(raw)?;
        summary.validate()?;
        Ok(summary)
    }

    /// Returns the influence table sorted by descending influence.
    #[must_use]
    pub fn importance_ranking(&self) -> Vec<InfluencePoint> {
        let mut ranking = self.relative_influence.clone();
        ranking.sort_by(|a, b| {
            b.relative_influence
                .partial_cmp(&a.relative_influence)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.predictor.cmp(&b.predictor))
        });
        ranking
    }

    /// Checks the artifact against the frozen reference configuration.
    fn validate(&self) -> Result<(), ModelError> {
        if self.version != ARTIFACT_VERSION {
            return Err(ModelError::VersionMismatch {
                found: self.version,
            });
        }

        let config = &self.config;
        check_drift("nTrees", config.n_trees, EXPECTED_N_TREES)?;
        check_drift(
            "interactionDepth",
            config.interaction_depth,
            EXPECTED_INTERACTION_DEPTH,
        )?;
        check_drift("cvFolds", config.cv_folds, EXPECTED_CV_FOLDS)?;

        if (config.shrinkage - EXPECTED_SHRINKAGE).abs() > f64::EPSILON {
            return Err(ModelError::HyperparameterDrift {
                field: "shrinkage",
                found: config.shrinkage.to_string(),
                expected: EXPECTED_SHRINKAGE.to_string(),
            });
        }

        if config.response != EXPECTED_RESPONSE {
            return Err(ModelError::HyperparameterDrift {
                field: "response",
                found: config.response.clone(),
                expected: EXPECTED_RESPONSE.to_owned(),
            });
        }

        let mut found: Vec<Predictor> = config.predictors.clone();
        found.sort_unstable();
        found.dedup();
        let mut expected: Vec<Predictor> = Predictor::all().to_vec();
        expected.sort_unstable();
        if found != expected || config.predictors.len() != Predictor::all().len() {
            return Err(ModelError::PredictorSetMismatch {
                found: config.predictors.clone(),
            });
        }

        self.validate_influence()
    }

    /// Checks the influence table: one entry per predictor, non-negative
    /// values, summing to 100.
    fn validate_influence(&self) -> Result<(), ModelError> {
        if self.relative_influence.len() != Predictor::all().len() {
            return Err(ModelError::InvalidInfluence {
                reason: format!(
                    "expected {} entries, found {}",
                    Predictor::all().len(),
                    self.relative_influence.len()
                ),
            });
        }

        let mut seen: Vec<Predictor> = self
            .relative_influence
            .iter()
            .map(|p| p.predictor)
            .collect();
        seen.sort_unstable();
        seen.dedup();
        if seen.len() != Predictor::all().len() {
            return Err(ModelError::InvalidInfluence {
                reason: "duplicate predictor entries".to_owned(),
            });
        }

        for point in &self.relative_influence {
            if point.relative_influence < 0.0 || !point.relative_influence.is_finite() {
                return Err(ModelError::InvalidInfluence {
                    reason: format!(
                        "{:?} has influence {}",
                        point.predictor, point.relative_influence
                    ),
                });
            }
        }

        let sum: f64 = self
            .relative_influence
            .iter()
            .map(|p| p.relative_influence)
            .sum();
        if (sum - 100.0).abs() > INFLUENCE_SUM_TOLERANCE {
            return Err(ModelError::InvalidInfluence {
                reason: format!("influence sums to {sum}, expected 100"),
            });
        }

        Ok(())
    }
}

fn check_drift(field: &'static str, found: u32, expected: u32) -> Result<(), ModelError> {
    if found == expected {
        Ok(())
    } else {
        Err(ModelError::HyperparameterDrift {
            field,
            found: found.to_string(),
            expected: expected.to_string(),
        })
    }
}
