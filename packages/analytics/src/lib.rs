#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Grouping and aggregation engine over the loaded incident table.
//!
//! Pure folds from an incident slice into the per-grouping series that
//! feed the report's charts. Every aggregate is the sum of
//! `weighted_score` over exactly the rows matching the grouping key, so
//! for any complete grouping the bucket totals partition the table: no
//! row is double-counted and none is dropped.
//!
//! Nothing here mutates the incident table; charts are terminal
//! consumers of these series.

use std::collections::BTreeMap;

use chrono::Weekday;
use shooting_report_analytics_models::{
    DatePoint, DayOfYearPoint, DivisionPoint, HourPoint, NeighbourhoodPoint, ScoreBucket,
    SummaryStats, TimeRangePoint, WeekdayPoint,
};
use shooting_report_incident_models::{Incident, TimeRange};

/// Days of the week in presentation order (Monday first).
const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Sums severity scores per calendar date, ascending, observed dates only.
#[must_use]
pub fn score_by_date(incidents: &[Incident]) -> Vec<DatePoint> {
    let mut buckets = BTreeMap::new();
    for incident in incidents {
        *buckets.entry(incident.occ_date).or_insert(0u64) += u64::from(incident.weighted_score);
    }
    buckets
        .into_iter()
        .map(|(date, score)| DatePoint { date, score })
        .collect()
}

/// Sums severity scores per day of the week, Monday through Sunday.
///
/// All seven buckets are present even when a weekday has no incidents.
#[must_use]
pub fn score_by_weekday(incidents: &[Incident]) -> Vec<WeekdayPoint> {
    let mut buckets: BTreeMap<usize, u64> = BTreeMap::new();
    for incident in incidents {
        let key = incident.occ_dow.num_days_from_monday() as usize;
        *buckets.entry(key).or_insert(0) += u64::from(incident.weighted_score);
    }
    WEEKDAYS
        .iter()
        .enumerate()
        .map(|(i, &weekday)| WeekdayPoint {
            weekday,
            score: buckets.get(&i).copied().unwrap_or(0),
        })
        .collect()
}

/// Sums severity scores per ordinal day of year and attaches a centered
/// moving average over the given window.
///
/// All 366 buckets are emitted (zero-filled) so the smoothing window is
/// contiguous; the window is clamped at the edges of the year rather
/// than wrapping.
#[must_use]
pub fn score_by_day_of_year(incidents: &[Incident], window: usize) -> Vec<DayOfYearPoint> {
    let mut scores = [0u64; 366];
    for incident in incidents {
        scores[usize::from(incident.occ_doy) - 1] += u64::from(incident.weighted_score);
    }

    let smoothed = moving_average(&scores, window);

    scores
        .iter()
        .zip(smoothed)
        .enumerate()
        .map(|(i, (&score, smoothed))| DayOfYearPoint {
            day: u16::try_from(i + 1).unwrap_or(u16::MAX),
            score,
            smoothed,
        })
        .collect()
}

/// Sums severity scores per hour of day. All 24 buckets are present.
#[must_use]
pub fn score_by_hour(incidents: &[Incident]) -> Vec<HourPoint> {
    let mut scores = [0u64; 24];
    for incident in incidents {
        scores[usize::from(incident.occ_hour)] += u64::from(incident.weighted_score);
    }
    scores
        .iter()
        .enumerate()
        .map(|(hour, &score)| HourPoint {
            hour: u8::try_from(hour).unwrap_or(u8::MAX),
            score,
        })
        .collect()
}

/// Sums severity scores per time-of-day range, in presentation order.
#[must_use]
pub fn score_by_time_range(incidents: &[Incident]) -> Vec<TimeRangePoint> {
    let mut buckets: BTreeMap<TimeRange, u64> = BTreeMap::new();
    for incident in incidents {
        *buckets.entry(incident.occ_time_range).or_insert(0) +=
            u64::from(incident.weighted_score);
    }
    TimeRange::all()
        .iter()
        .map(|&time_range| TimeRangePoint {
            time_range,
            score: buckets.get(&time_range).copied().unwrap_or(0),
        })
        .collect()
}

/// Sums severity scores per neighbourhood, descending, truncated to
/// `limit` entries when given.
///
/// Ties break alphabetically so the ordering is deterministic.
#[must_use]
pub fn score_by_neighbourhood(
    incidents: &[Incident],
    limit: Option<usize>,
) -> Vec<NeighbourhoodPoint> {
    let mut buckets: BTreeMap<&str, u64> = BTreeMap::new();
    for incident in incidents {
        *buckets.entry(&incident.neighbourhood.name).or_insert(0) +=
            u64::from(incident.weighted_score);
    }

    let mut points: Vec<NeighbourhoodPoint> = buckets
        .into_iter()
        .map(|(name, score)| NeighbourhoodPoint {
            name: name.to_owned(),
            score,
        })
        .collect();

    points.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));

    if let Some(limit) = limit {
        log::debug!(
            "Truncating neighbourhood series from {} to {limit} entries",
            points.len()
        );
        points.truncate(limit);
    }

    points
}

/// Sums severity scores per police division, descending.
#[must_use]
pub fn score_by_division(incidents: &[Incident]) -> Vec<DivisionPoint> {
    let mut buckets = BTreeMap::new();
    for incident in incidents {
        *buckets.entry(incident.division).or_insert(0u64) += u64::from(incident.weighted_score);
    }

    let mut points: Vec<DivisionPoint> = buckets
        .into_iter()
        .map(|(division, score)| DivisionPoint { division, score })
        .collect();

    points.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.division.cmp(&b.division))
    });

    points
}

/// Counts incidents per distinct severity score value, ascending.
#[must_use]
pub fn score_distribution(incidents: &[Incident]) -> Vec<ScoreBucket> {
    let mut buckets = BTreeMap::new();
    for incident in incidents {
        *buckets.entry(incident.weighted_score).or_insert(0u64) += 1;
    }
    buckets
        .into_iter()
        .map(|(score, count)| ScoreBucket {
            score,
            incidents: count,
        })
        .collect()
}

/// Computes the headline statistics for the report's summary table.
///
/// Returns `None` for an empty slice (the loader never produces one).
#[must_use]
pub fn summary_stats(incidents: &[Incident]) -> Option<SummaryStats> {
    let first = incidents.iter().map(|i| i.occ_date).min()?;
    let last = incidents.iter().map(|i| i.occ_date).max()?;

    Some(SummaryStats {
        incidents: incidents.len() as u64,
        first_date: first,
        last_date: last,
        total_deaths: incidents.iter().map(|i| u64::from(i.deaths)).sum(),
        total_injuries: incidents.iter().map(|i| u64::from(i.injuries)).sum(),
        total_score: incidents.iter().map(|i| u64::from(i.weighted_score)).sum(),
    })
}

/// Centered moving average with the window clamped at the series edges.
#[allow(clippy::cast_precision_loss)]
fn moving_average(values: &[u64], window: usize) -> Vec<f64> {
    let half = window.max(1) / 2;
    (0..values.len())
        .map(|i| {
            let start = i.saturating_sub(half);
            let end = usize::min(i + half, values.len() - 1);
            let slice = &values[start..=end];
            slice.iter().sum::<u64>() as f64 / slice.len() as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike as _, NaiveDate};
    use shooting_report_incident_models::{Division, Neighbourhood};

    use super::*;

    fn incident(date: (i32, u32, u32), hour: u8, hood: &str, division: Division, deaths: u32, injuries: u32) -> Incident {
        let occ_date = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
        let time_range = match hour {
            0..=5 => TimeRange::Night,
            6..=11 => TimeRange::Morning,
            12..=17 => TimeRange::Afternoon,
            _ => TimeRange::Evening,
        };
        Incident::new(
            occ_date,
            occ_date.weekday(),
            u16::try_from(occ_date.ordinal()).unwrap(),
            hour,
            time_range,
            Neighbourhood::new(hood, None).unwrap(),
            division,
            deaths,
            injuries,
        )
        .unwrap()
    }

    fn fixture() -> Vec<Incident> {
        vec![
            incident((2023, 7, 14), 22, "Moss Park", Division::D51, 1, 2),
            incident((2023, 7, 14), 2, "Moss Park", Division::D51, 0, 5),
            incident((2023, 7, 15), 9, "Regent Park", Division::D51, 3, 0),
            incident((2024, 1, 1), 15, "West Humber-Clairville", Division::D23, 0, 0),
        ]
    }

    fn total_score(incidents: &[Incident]) -> u64 {
        incidents.iter().map(|i| u64::from(i.weighted_score)).sum()
    }

    #[test]
    fn date_series_partitions_table() {
        let incidents = fixture();
        let series = score_by_date(&incidents);
        assert_eq!(series.len(), 3);
        let sum: u64 = series.iter().map(|p| p.score).sum();
        assert_eq!(sum, total_score(&incidents));
        // Ascending by date.
        assert!(series.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn date_series_sums_same_day_rows() {
        let incidents = fixture();
        let series = score_by_date(&incidents);
        let july_14 = NaiveDate::from_ymd_opt(2023, 7, 14).unwrap();
        let point = series.iter().find(|p| p.date == july_14).unwrap();
        assert_eq!(point.score, 4 + 5);
    }

    #[test]
    fn weekday_series_has_all_seven_buckets() {
        let incidents = fixture();
        let series = score_by_weekday(&incidents);
        assert_eq!(series.len(), 7);
        assert_eq!(series[0].weekday, Weekday::Mon);
        assert_eq!(series[6].weekday, Weekday::Sun);
        let sum: u64 = series.iter().map(|p| p.score).sum();
        assert_eq!(sum, total_score(&incidents));
    }

    #[test]
    fn day_of_year_series_covers_whole_year() {
        let incidents = fixture();
        let series = score_by_day_of_year(&incidents, 7);
        assert_eq!(series.len(), 366);
        assert_eq!(series[0].day, 1);
        // 2024-01-01 is day 1 and scores 0; 2023-07-14 is day 195.
        assert_eq!(series[194].score, 9);
        let sum: u64 = series.iter().map(|p| p.score).sum();
        assert_eq!(sum, total_score(&incidents));
    }

    #[test]
    fn smoothing_of_constant_series_is_constant() {
        let values = [5u64; 20];
        for smoothed in moving_average(&values, 7) {
            assert!((smoothed - 5.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn smoothing_clamps_at_edges() {
        let values = [10, 0, 0, 0, 0];
        let smoothed = moving_average(&values, 3);
        // First point averages itself and one right neighbour.
        assert!((smoothed[0] - 5.0).abs() < f64::EPSILON);
        // Interior points see a full 3-wide window.
        assert!((smoothed[1] - 10.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn hour_series_has_all_24_buckets() {
        let incidents = fixture();
        let series = score_by_hour(&incidents);
        assert_eq!(series.len(), 24);
        assert_eq!(series[22].score, 4);
        let sum: u64 = series.iter().map(|p| p.score).sum();
        assert_eq!(sum, total_score(&incidents));
    }

    #[test]
    fn time_range_series_in_presentation_order() {
        let incidents = fixture();
        let series = score_by_time_range(&incidents);
        let ranges: Vec<TimeRange> = series.iter().map(|p| p.time_range).collect();
        assert_eq!(ranges, TimeRange::all());
        let sum: u64 = series.iter().map(|p| p.score).sum();
        assert_eq!(sum, total_score(&incidents));
    }

    #[test]
    fn neighbourhood_series_is_descending_and_truncated() {
        let incidents = fixture();
        let all = score_by_neighbourhood(&incidents, None);
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(all[0].name, "Moss Park");

        let top = score_by_neighbourhood(&incidents, Some(2));
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn division_series_is_descending() {
        let incidents = fixture();
        let series = score_by_division(&incidents);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].division, Division::D51);
        assert_eq!(series[0].score, 15);
        assert_eq!(series[1].division, Division::D23);
        assert_eq!(series[1].score, 0);
    }

    #[test]
    fn distribution_counts_incidents_per_score() {
        let incidents = fixture();
        let buckets = score_distribution(&incidents);
        let total: u64 = buckets.iter().map(|b| b.incidents).sum();
        assert_eq!(total, incidents.len() as u64);
        let zero = buckets.iter().find(|b| b.score == 0).unwrap();
        assert_eq!(zero.incidents, 1);
    }

    #[test]
    fn summary_stats_totals() {
        let incidents = fixture();
        let stats = summary_stats(&incidents).unwrap();
        assert_eq!(stats.incidents, 4);
        assert_eq!(stats.first_date, NaiveDate::from_ymd_opt(2023, 7, 14).unwrap());
        assert_eq!(stats.last_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(stats.total_deaths, 4);
        assert_eq!(stats.total_injuries, 7);
        assert_eq!(stats.total_score, 15);
    }

    #[test]
    fn summary_stats_empty_is_none() {
        assert!(summary_stats(&[]).is_none());
    }
}
