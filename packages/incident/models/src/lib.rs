#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Shooting incident record types and severity scoring.
//!
//! This crate defines the canonical incident record used across the entire
//! shooting-report system, along with the categorical domains the Toronto
//! Police Service open data encodes: time-of-day ranges, police divisions,
//! and the city's 158-area neighbourhood partition. All loaders normalize
//! their raw rows into these shared types before anything downstream runs.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Number of areas in the City of Toronto neighbourhood partition.
pub const NEIGHBOURHOOD_COUNT: u16 = 158;

/// Computes the severity score for an incident.
///
/// Deaths are weighted twice as heavily as non-fatal injuries. The result
/// is deterministic given the two counts and depends on nothing else.
#[must_use]
pub const fn weighted_score(deaths: u32, injuries: u32) -> u32 {
    deaths * 2 + injuries
}

/// Time-of-day range an incident occurred in.
///
/// Derived upstream from the occurrence hour before the dataset reaches
/// us; we parse the label as-is rather than re-deriving it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum TimeRange {
    /// Roughly 06:00–11:59.
    Morning,
    /// Roughly 12:00–17:59.
    Afternoon,
    /// Roughly 18:00–23:59.
    Evening,
    /// Roughly 00:00–05:59.
    Night,
}

impl TimeRange {
    /// Returns all variants in presentation order (morning first).
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Morning, Self::Afternoon, Self::Evening, Self::Night]
    }
}

/// Toronto Police Service division codes.
///
/// The 16 operational divisions plus `NSA` ("Not Specified Area"), the
/// code the open dataset uses when an incident could not be attributed
/// to a division. Any other code in the source data is a validation
/// failure, not a new variant.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Division {
    D11,
    D12,
    D13,
    D14,
    D22,
    D23,
    D31,
    D32,
    D33,
    D41,
    D42,
    D43,
    D51,
    D52,
    D53,
    D55,
    /// Not Specified Area.
    Nsa,
}

impl Division {
    /// Parses a division code from its dataset label (e.g. `"D11"`).
    ///
    /// # Errors
    ///
    /// Returns an error if the code is not one of the known divisions.
    pub fn from_code(code: &str) -> Result<Self, InvalidDivisionError> {
        code.trim()
            .parse()
            .map_err(|_| InvalidDivisionError {
                code: code.to_owned(),
            })
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::D11,
            Self::D12,
            Self::D13,
            Self::D14,
            Self::D22,
            Self::D23,
            Self::D31,
            Self::D32,
            Self::D33,
            Self::D41,
            Self::D42,
            Self::D43,
            Self::D51,
            Self::D52,
            Self::D53,
            Self::D55,
            Self::Nsa,
        ]
    }
}

/// Error returned when a division code is not one of the known
/// [`Division`] values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized division code {code:?}: expected D11-D55 or NSA")]
pub struct InvalidDivisionError {
    /// The unrecognized code from the source data.
    pub code: String,
}

/// One area of the City of Toronto's 158-neighbourhood partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Neighbourhood {
    /// Human-readable neighbourhood name.
    pub name: String,
    /// Area number (1-158), when the source encodes one.
    pub area_id: Option<u16>,
}

impl Neighbourhood {
    /// Creates a validated neighbourhood.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty after trimming, or if the
    /// area id is outside 1-158.
    pub fn new(name: &str, area_id: Option<u16>) -> Result<Self, InvalidNeighbourhoodError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(InvalidNeighbourhoodError::EmptyName);
        }
        if let Some(id) = area_id
            && !(1..=NEIGHBOURHOOD_COUNT).contains(&id)
        {
            return Err(InvalidNeighbourhoodError::AreaIdOutOfRange { id });
        }
        Ok(Self {
            name: name.to_owned(),
            area_id,
        })
    }
}

/// Error returned when a neighbourhood fails validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidNeighbourhoodError {
    /// The neighbourhood name was missing or blank.
    #[error("neighbourhood name is empty")]
    EmptyName,

    /// The area id was outside the 158-area partition.
    #[error("neighbourhood area id {id} out of range: expected 1-{NEIGHBOURHOOD_COUNT}")]
    AreaIdOutOfRange {
        /// The out-of-range area id.
        id: u16,
    },
}

/// One shooting / firearm-discharge incident, validated and scored.
///
/// Records are immutable once constructed; [`Incident::new`] derives
/// `weighted_score` exactly once, so every consumer sees the same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Calendar date of occurrence.
    pub occ_date: NaiveDate,
    /// Day of week of occurrence.
    pub occ_dow: Weekday,
    /// Day of year of occurrence (1-366).
    pub occ_doy: u16,
    /// Hour of day of occurrence (0-23).
    pub occ_hour: u8,
    /// Time-of-day range, derived upstream from `occ_hour`.
    pub occ_time_range: TimeRange,
    /// Neighbourhood the incident occurred in.
    pub neighbourhood: Neighbourhood,
    /// Police division the incident occurred in.
    pub division: Division,
    /// Number of fatalities.
    pub deaths: u32,
    /// Number of non-fatal injuries.
    pub injuries: u32,
    /// Derived severity score: `deaths * 2 + injuries`.
    pub weighted_score: u32,
}

impl Incident {
    /// Creates a validated incident and derives its severity score.
    ///
    /// # Errors
    ///
    /// Returns an error if the hour or day-of-year is out of range, or
    /// if the day-of-week or day-of-year column disagrees with the
    /// occurrence date (a sign the source row is corrupt).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        occ_date: NaiveDate,
        occ_dow: Weekday,
        occ_doy: u16,
        occ_hour: u8,
        occ_time_range: TimeRange,
        neighbourhood: Neighbourhood,
        division: Division,
        deaths: u32,
        injuries: u32,
    ) -> Result<Self, IncidentValidationError> {
        if occ_hour > 23 {
            return Err(IncidentValidationError::HourOutOfRange { hour: occ_hour });
        }
        if !(1..=366).contains(&occ_doy) {
            return Err(IncidentValidationError::DayOfYearOutOfRange { doy: occ_doy });
        }
        let expected_doy = u16::try_from(occ_date.ordinal()).unwrap_or(u16::MAX);
        if occ_doy != expected_doy {
            return Err(IncidentValidationError::DayOfYearMismatch {
                date: occ_date,
                doy: occ_doy,
                expected: expected_doy,
            });
        }
        if occ_dow != occ_date.weekday() {
            return Err(IncidentValidationError::WeekdayMismatch {
                date: occ_date,
                dow: occ_dow,
                expected: occ_date.weekday(),
            });
        }

        Ok(Self {
            occ_date,
            occ_dow,
            occ_doy,
            occ_hour,
            occ_time_range,
            neighbourhood,
            division,
            deaths,
            injuries,
            weighted_score: weighted_score(deaths, injuries),
        })
    }
}

/// Error returned when an incident's temporal fields fail validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IncidentValidationError {
    /// The occurrence hour was outside 0-23.
    #[error("occurrence hour {hour} out of range: expected 0-23")]
    HourOutOfRange {
        /// The out-of-range hour.
        hour: u8,
    },

    /// The day-of-year was outside 1-366.
    #[error("day of year {doy} out of range: expected 1-366")]
    DayOfYearOutOfRange {
        /// The out-of-range day of year.
        doy: u16,
    },

    /// The day-of-year column disagrees with the occurrence date.
    #[error("day of year {doy} does not match date {date} (expected {expected})")]
    DayOfYearMismatch {
        /// The occurrence date.
        date: NaiveDate,
        /// The day-of-year value from the source row.
        doy: u16,
        /// The day-of-year the date implies.
        expected: u16,
    },

    /// The day-of-week column disagrees with the occurrence date.
    #[error("day of week {dow} does not match date {date} (expected {expected})")]
    WeekdayMismatch {
        /// The occurrence date.
        date: NaiveDate,
        /// The weekday from the source row.
        dow: Weekday,
        /// The weekday the date implies.
        expected: Weekday,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighbourhood() -> Neighbourhood {
        Neighbourhood::new("Moss Park", Some(73)).unwrap()
    }

    #[test]
    fn weighted_score_doubles_deaths() {
        assert_eq!(weighted_score(1, 2), 4);
        assert_eq!(weighted_score(0, 5), 5);
        assert_eq!(weighted_score(3, 0), 6);
    }

    #[test]
    fn weighted_score_zero_boundary() {
        assert_eq!(weighted_score(0, 0), 0);
    }

    #[test]
    fn weighted_score_dominates_components() {
        for deaths in 0..10 {
            for injuries in 0..10 {
                let score = weighted_score(deaths, injuries);
                assert!(score >= 2 * deaths);
                assert!(score >= injuries);
            }
        }
    }

    #[test]
    fn division_parses_known_codes() {
        assert_eq!(Division::from_code("D11").unwrap(), Division::D11);
        assert_eq!(Division::from_code(" d55 ").unwrap(), Division::D55);
        assert_eq!(Division::from_code("NSA").unwrap(), Division::Nsa);
    }

    #[test]
    fn division_rejects_unknown_codes() {
        let err = Division::from_code("D99").unwrap_err();
        assert_eq!(err.code, "D99");
        assert!(Division::from_code("").is_err());
    }

    #[test]
    fn division_all_covers_display_roundtrip() {
        for division in Division::all() {
            let code = division.to_string();
            assert_eq!(Division::from_code(&code).unwrap(), *division);
        }
    }

    #[test]
    fn neighbourhood_validates_area_id() {
        assert!(Neighbourhood::new("Moss Park", Some(1)).is_ok());
        assert!(Neighbourhood::new("Moss Park", Some(158)).is_ok());
        assert!(Neighbourhood::new("Moss Park", None).is_ok());
        assert!(matches!(
            Neighbourhood::new("Moss Park", Some(0)),
            Err(InvalidNeighbourhoodError::AreaIdOutOfRange { id: 0 })
        ));
        assert!(matches!(
            Neighbourhood::new("Moss Park", Some(159)),
            Err(InvalidNeighbourhoodError::AreaIdOutOfRange { id: 159 })
        ));
    }

    #[test]
    fn neighbourhood_rejects_blank_name() {
        assert!(matches!(
            Neighbourhood::new("   ", None),
            Err(InvalidNeighbourhoodError::EmptyName)
        ));
    }

    #[test]
    fn incident_derives_score_once() {
        let date = NaiveDate::from_ymd_opt(2023, 7, 14).unwrap();
        let incident = Incident::new(
            date,
            Weekday::Fri,
            195,
            22,
            TimeRange::Evening,
            neighbourhood(),
            Division::D51,
            1,
            2,
        )
        .unwrap();
        assert_eq!(incident.weighted_score, 4);
    }

    #[test]
    fn incident_rejects_hour_out_of_range() {
        let date = NaiveDate::from_ymd_opt(2023, 7, 14).unwrap();
        let err = Incident::new(
            date,
            Weekday::Fri,
            195,
            24,
            TimeRange::Evening,
            neighbourhood(),
            Division::D51,
            0,
            0,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            IncidentValidationError::HourOutOfRange { hour: 24 }
        ));
    }

    #[test]
    fn incident_rejects_day_of_year_mismatch() {
        let date = NaiveDate::from_ymd_opt(2023, 7, 14).unwrap();
        let err = Incident::new(
            date,
            Weekday::Fri,
            100,
            22,
            TimeRange::Evening,
            neighbourhood(),
            Division::D51,
            0,
            0,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            IncidentValidationError::DayOfYearMismatch { doy: 100, .. }
        ));
    }

    #[test]
    fn incident_rejects_weekday_mismatch() {
        // 2023-07-14 is a Friday.
        let date = NaiveDate::from_ymd_opt(2023, 7, 14).unwrap();
        let err = Incident::new(
            date,
            Weekday::Mon,
            195,
            22,
            TimeRange::Evening,
            neighbourhood(),
            Division::D51,
            0,
            0,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            IncidentValidationError::WeekdayMismatch {
                dow: Weekday::Mon,
                ..
            }
        ));
    }

    #[test]
    fn time_range_parses_dataset_labels() {
        assert_eq!(
            "MORNING".parse::<TimeRange>().unwrap(),
            TimeRange::Morning
        );
        assert_eq!("night".parse::<TimeRange>().unwrap(), TimeRange::Night);
        assert!("DUSK".parse::<TimeRange>().is_err());
    }
}
