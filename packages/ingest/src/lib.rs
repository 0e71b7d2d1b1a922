#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loads the cleaned shooting-incident CSV into validated [`Incident`]
//! records.
//!
//! Every row is schema-validated before the severity score is derived:
//! required fields must be present, counts must parse as non-negative
//! integers, and categorical fields must belong to their known domains.
//! A malformed row aborts the load with an error naming the 1-based data
//! row and the offending field rather than letting bad values propagate
//! into the charts or model summary.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use shooting_report_incident_models::{
    Division, Incident, IncidentValidationError, InvalidDivisionError,
    InvalidNeighbourhoodError, Neighbourhood, TimeRange,
};

/// Required CSV columns, in no particular order.
const REQUIRED_COLUMNS: &[&str] = &[
    "OCC_DATE",
    "OCC_DOW",
    "OCC_DOY",
    "OCC_HOUR",
    "OCC_TIME_RANGE",
    "DIVISION",
    "NEIGHBOURHOOD_158",
    "DEATH",
    "INJURIES",
];

/// Optional column carrying the numeric 1-158 neighbourhood area id.
const HOOD_ID_COLUMN: &str = "HOOD_158";

/// Errors that can occur while loading the incident dataset.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// An I/O operation failed (typically: input file missing).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row.
    #[error("missing required column {name:?}")]
    MissingColumn {
        /// The absent column name.
        name: String,
    },

    /// The file parsed but contained no data rows.
    #[error("dataset contains no incident rows")]
    EmptyDataset,

    /// A data row failed validation.
    #[error("row {row}: {source}")]
    Row {
        /// 1-based data row number (header excluded).
        row: usize,
        /// The underlying field failure.
        #[source]
        source: RowError,
    },
}

/// Validation failure for a single data row.
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    /// A required field was absent or blank.
    #[error("field {field} is missing or blank")]
    MissingField {
        /// The field name.
        field: &'static str,
    },

    /// A field did not parse as its expected type.
    #[error("field {field} value {value:?} is not a valid {expected}")]
    Parse {
        /// The field name.
        field: &'static str,
        /// The raw value from the source row.
        value: String,
        /// Human-readable description of the expected type.
        expected: &'static str,
    },

    /// A count field held a negative value.
    #[error("field {field} value {value} is negative")]
    Negative {
        /// The field name.
        field: &'static str,
        /// The negative value.
        value: i64,
    },

    /// The division code is outside the known set.
    #[error(transparent)]
    Division(#[from] InvalidDivisionError),

    /// The neighbourhood failed validation.
    #[error(transparent)]
    Neighbourhood(#[from] InvalidNeighbourhoodError),

    /// The temporal fields are internally inconsistent.
    #[error(transparent)]
    Incident(#[from] IncidentValidationError),
}

/// Loads and validates the incident dataset from a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a required column is
/// missing, the file holds no data rows, or any row fails validation.
pub fn load_incidents(path: &Path) -> Result<Vec<Incident>, IngestError> {
    log::info!("Loading incident dataset from {}", path.display());
    let file = File::open(path)?;
    let incidents = read_incidents(file)?;
    log::info!(
        "Loaded {} incidents from {}",
        incidents.len(),
        path.display()
    );
    Ok(incidents)
}

/// Reads and validates incident records from any CSV reader.
///
/// # Errors
///
/// Same failure modes as [`load_incidents`], minus file-open errors.
pub fn read_incidents<R: Read>(reader: R) -> Result<Vec<Incident>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    // Map trimmed header names to column indexes.
    let columns: BTreeMap<String, usize> = csv_reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_owned(), i))
        .collect();

    for name in REQUIRED_COLUMNS {
        if !columns.contains_key(*name) {
            return Err(IngestError::MissingColumn {
                name: (*name).to_owned(),
            });
        }
    }

    let mut incidents = Vec::new();

    for (i, result) in csv_reader.records().enumerate() {
        let record = result?;
        let row = i + 1;
        let incident = parse_row(&record, &columns)
            .map_err(|source| IngestError::Row { row, source })?;
        incidents.push(incident);
    }

    if incidents.is_empty() {
        return Err(IngestError::EmptyDataset);
    }

    Ok(incidents)
}

/// Parses and validates one CSV record into an [`Incident`].
fn parse_row(
    record: &csv::StringRecord,
    columns: &BTreeMap<String, usize>,
) -> Result<Incident, RowError> {
    let occ_date = parse_date(field(record, columns, "OCC_DATE")?)?;

    let dow_raw = field(record, columns, "OCC_DOW")?;
    let occ_dow = dow_raw.parse().map_err(|_| RowError::Parse {
        field: "OCC_DOW",
        value: dow_raw.to_owned(),
        expected: "day of week",
    })?;

    let occ_doy = parse_count(field(record, columns, "OCC_DOY")?, "OCC_DOY")
        .and_then(|v| {
            u16::try_from(v).map_err(|_| RowError::Parse {
                field: "OCC_DOY",
                value: v.to_string(),
                expected: "day of year (1-366)",
            })
        })?;

    let occ_hour = parse_count(field(record, columns, "OCC_HOUR")?, "OCC_HOUR")
        .and_then(|v| {
            u8::try_from(v).map_err(|_| RowError::Parse {
                field: "OCC_HOUR",
                value: v.to_string(),
                expected: "hour of day (0-23)",
            })
        })?;

    let range_raw = field(record, columns, "OCC_TIME_RANGE")?;
    let occ_time_range: TimeRange = range_raw.parse().map_err(|_| RowError::Parse {
        field: "OCC_TIME_RANGE",
        value: range_raw.to_owned(),
        expected: "time range (MORNING/AFTERNOON/EVENING/NIGHT)",
    })?;

    let division = Division::from_code(field(record, columns, "DIVISION")?)?;

    let area_id = match columns.get(HOOD_ID_COLUMN) {
        Some(&idx) => {
            let raw = record.get(idx).unwrap_or("").trim();
            if raw.is_empty() {
                None
            } else {
                let id = parse_count(raw, HOOD_ID_COLUMN).and_then(|v| {
                    u16::try_from(v).map_err(|_| RowError::Parse {
                        field: HOOD_ID_COLUMN,
                        value: v.to_string(),
                        expected: "area id (1-158)",
                    })
                })?;
                Some(id)
            }
        }
        None => None,
    };
    let neighbourhood =
        Neighbourhood::new(field(record, columns, "NEIGHBOURHOOD_158")?, area_id)?;

    let deaths = parse_count(field(record, columns, "DEATH")?, "DEATH")?;
    let injuries = parse_count(field(record, columns, "INJURIES")?, "INJURIES")?;

    let incident = Incident::new(
        occ_date,
        occ_dow,
        occ_doy,
        occ_hour,
        occ_time_range,
        neighbourhood,
        division,
        deaths,
        injuries,
    )?;

    Ok(incident)
}

/// Returns the trimmed value of a required field, rejecting blanks.
fn field<'a>(
    record: &'a csv::StringRecord,
    columns: &BTreeMap<String, usize>,
    name: &'static str,
) -> Result<&'a str, RowError> {
    let value = columns
        .get(name)
        .and_then(|&idx| record.get(idx))
        .map(str::trim)
        .unwrap_or("");

    if value.is_empty() {
        return Err(RowError::MissingField { field: name });
    }

    Ok(value)
}

/// Parses an occurrence date, accepting the formats the open-data
/// exports have used over the years (plain dates and datetime stamps).
fn parse_date(raw: &str) -> Result<NaiveDate, RowError> {
    // Datetime exports carry a time suffix; the date is the first token.
    let date_part = raw
        .split_once(|c: char| c == ' ' || c == 'T')
        .map_or(raw, |(date, _)| date);

    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(date_part, format) {
            return Ok(date);
        }
    }

    Err(RowError::Parse {
        field: "OCC_DATE",
        value: raw.to_owned(),
        expected: "date",
    })
}

/// Parses a count field as a non-negative integer.
fn parse_count(raw: &str, name: &'static str) -> Result<u32, RowError> {
    let value: i64 = raw.parse().map_err(|_| RowError::Parse {
        field: name,
        value: raw.to_owned(),
        expected: "integer",
    })?;

    if value < 0 {
        return Err(RowError::Negative { field: name, value });
    }

    u32::try_from(value).map_err(|_| RowError::Parse {
        field: name,
        value: raw.to_owned(),
        expected: "integer",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "OCC_DATE,OCC_DOW,OCC_DOY,OCC_HOUR,OCC_TIME_RANGE,DIVISION,HOOD_158,NEIGHBOURHOOD_158,DEATH,INJURIES";

    fn dataset(rows: &[&str]) -> String {
        let mut out = HEADER.to_owned();
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out
    }

    #[test]
    fn loads_valid_rows_and_derives_scores() {
        let csv = dataset(&[
            "2023-07-14,Friday,195,22,EVENING,D51,73,Moss Park,1,2",
            "2023-07-15,Saturday,196,2,NIGHT,D31,27,York University Heights,0,5",
        ]);
        let incidents = read_incidents(csv.as_bytes()).unwrap();
        assert_eq!(incidents.len(), 2);
        assert_eq!(incidents[0].weighted_score, 4);
        assert_eq!(incidents[1].weighted_score, 5);
        assert_eq!(incidents[0].division, Division::D51);
        assert_eq!(incidents[0].neighbourhood.area_id, Some(73));
    }

    #[test]
    fn accepts_datetime_stamped_dates() {
        let csv = dataset(&[
            "2023/07/14 22:15:00,Friday,195,22,EVENING,D51,73,Moss Park,0,1",
        ]);
        let incidents = read_incidents(csv.as_bytes()).unwrap();
        assert_eq!(
            incidents[0].occ_date,
            NaiveDate::from_ymd_opt(2023, 7, 14).unwrap()
        );
    }

    #[test]
    fn rejects_missing_column() {
        let csv = "OCC_DATE,OCC_DOW\n2023-07-14,Friday";
        let err = read_incidents(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { name } if name == "OCC_DOY"));
    }

    #[test]
    fn rejects_empty_dataset() {
        let csv = dataset(&[]);
        let err = read_incidents(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::EmptyDataset));
    }

    #[test]
    fn rejects_negative_death_count() {
        let csv = dataset(&["2023-07-14,Friday,195,22,EVENING,D51,73,Moss Park,-1,2"]);
        let err = read_incidents(csv.as_bytes()).unwrap_err();
        match err {
            IngestError::Row { row, source } => {
                assert_eq!(row, 1);
                assert!(matches!(
                    source,
                    RowError::Negative {
                        field: "DEATH",
                        value: -1
                    }
                ));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_blank_injuries() {
        let csv = dataset(&["2023-07-14,Friday,195,22,EVENING,D51,73,Moss Park,0,"]);
        let err = read_incidents(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::Row {
                row: 1,
                source: RowError::MissingField { field: "INJURIES" }
            }
        ));
    }

    #[test]
    fn rejects_unknown_division() {
        let csv = dataset(&["2023-07-14,Friday,195,22,EVENING,D99,73,Moss Park,0,1"]);
        let err = read_incidents(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::Row {
                row: 1,
                source: RowError::Division(_)
            }
        ));
    }

    #[test]
    fn rejects_out_of_range_area_id() {
        let csv = dataset(&["2023-07-14,Friday,195,22,EVENING,D51,500,Moss Park,0,1"]);
        let err = read_incidents(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::Row {
                row: 1,
                source: RowError::Neighbourhood(_)
            }
        ));
    }

    #[test]
    fn rejects_weekday_date_disagreement() {
        // 2023-07-14 is a Friday, not a Monday.
        let csv = dataset(&["2023-07-14,Monday,195,22,EVENING,D51,73,Moss Park,0,1"]);
        let err = read_incidents(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::Row {
                row: 1,
                source: RowError::Incident(_)
            }
        ));
    }

    #[test]
    fn error_message_names_row_and_field() {
        let csv = dataset(&[
            "2023-07-14,Friday,195,22,EVENING,D51,73,Moss Park,0,1",
            "2023-07-15,Saturday,196,9,MORNING,D32,36,Newtonbrook West,zero,1",
        ]);
        let err = read_incidents(csv.as_bytes()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("row 2"), "message was: {message}");
    }
}
