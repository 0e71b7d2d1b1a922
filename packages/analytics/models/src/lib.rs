#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation result types for the shooting severity report.
//!
//! Each chart in the report is fed by one of these series shapes. All of
//! them carry summed `weighted_score` values (or, for the distribution,
//! incident counts per score value) over a single grouping key.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use shooting_report_incident_models::{Division, TimeRange};

/// Total severity score for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatePoint {
    /// The occurrence date.
    pub date: NaiveDate,
    /// Summed severity score across all incidents on this date.
    pub score: u64,
}

/// Total severity score for one day of the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayPoint {
    /// The day of week.
    pub weekday: Weekday,
    /// Summed severity score.
    pub score: u64,
}

/// Severity score for one ordinal day of the year, raw and smoothed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayOfYearPoint {
    /// Ordinal day of year (1-366).
    pub day: u16,
    /// Summed severity score on this day across all years.
    pub score: u64,
    /// Centered moving average of `score` over the smoothing window.
    pub smoothed: f64,
}

/// Total severity score for one hour of the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourPoint {
    /// Hour of day (0-23).
    pub hour: u8,
    /// Summed severity score.
    pub score: u64,
}

/// Total severity score for one time-of-day range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRangePoint {
    /// The time-of-day range.
    pub time_range: TimeRange,
    /// Summed severity score.
    pub score: u64,
}

/// Total severity score for one neighbourhood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighbourhoodPoint {
    /// Neighbourhood name.
    pub name: String,
    /// Summed severity score.
    pub score: u64,
}

/// Total severity score for one police division.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivisionPoint {
    /// The division code.
    pub division: Division,
    /// Summed severity score.
    pub score: u64,
}

/// Number of incidents observed at one severity score value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBucket {
    /// The severity score value.
    pub score: u32,
    /// Number of incidents with exactly this score.
    pub incidents: u64,
}

/// Headline statistics for the report's summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    /// Total number of incident records.
    pub incidents: u64,
    /// Earliest occurrence date in the dataset.
    pub first_date: NaiveDate,
    /// Latest occurrence date in the dataset.
    pub last_date: NaiveDate,
    /// Total fatalities across all incidents.
    pub total_deaths: u64,
    /// Total non-fatal injuries across all incidents.
    pub total_injuries: u64,
    /// Total severity score across all incidents.
    pub total_score: u64,
}
