//! Visit dataset loading from the CSV export of the visit register.
//!
//! The register is read once at startup into an immutable [`VisitDataset`].
//! Cells that cannot be coerced to their column type become missing values;
//! only an unreadable file or a missing column aborts the load.

use crate::error::{CarevisError, Result};
use crate::types::{FamilyNumber, VisitRecord};
use crate::with_context;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Columns the register export must carry.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "PServdate",
    "ServName",
    "patsex",
    "PatAge",
    "nationality",
    "FamilyNbr",
    "cntname",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
];
const NAMED_MONTH_FORMAT: &str = "%d-%b-%Y";

#[derive(Debug)]
struct RawVisitRow {
    service_date: Option<String>,
    service_name: Option<String>,
    patient_sex: Option<String>,
    patient_age: Option<String>,
    nationality: Option<String>,
    family_number: Option<String>,
    clinic_name: Option<String>,
}

/// Positions of [`REQUIRED_COLUMNS`] in the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex([usize; REQUIRED_COLUMNS.len()]);

impl ColumnIndex {
    fn from_headers(headers: &csv::ByteRecord) -> Result<Self> {
        let mut positions = [0; REQUIRED_COLUMNS.len()];
        for (slot, column) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|header| header == column.as_bytes())
                .ok_or_else(|| {
                    CarevisError::data(format!(
                        "required column '{column}' is missing from the dataset header"
                    ))
                })?;
        }
        Ok(Self(positions))
    }

    /// Decodes one row. Cells that are not valid UTF-8 become missing.
    fn read(self, record: &csv::ByteRecord, report: &mut LoadReport) -> RawVisitRow {
        let mut cell = |column: usize| {
            let bytes = record.get(self.0[column])?;
            match std::str::from_utf8(bytes) {
                Ok(text) => Some(text.to_string()),
                Err(_) => {
                    report.undecodable_cells += 1;
                    None
                }
            }
        };
        RawVisitRow {
            service_date: cell(0),
            service_name: cell(1),
            patient_sex: cell(2),
            patient_age: cell(3),
            nationality: cell(4),
            family_number: cell(5),
            clinic_name: cell(6),
        }
    }
}

/// Counts of cells that were present but could not be coerced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Data rows read.
    pub rows: usize,
    /// Non-empty `PServdate` cells that did not parse as a date.
    pub unparseable_dates: usize,
    /// Non-empty `PatAge` cells that were not a non-negative number.
    pub invalid_ages: usize,
    /// Non-empty `FamilyNbr` cells that were not a non-negative integer.
    pub invalid_family_numbers: usize,
    /// Cells of any column that were not valid UTF-8.
    pub undecodable_cells: usize,
}

impl LoadReport {
    /// Total number of coerced cells.
    pub const fn coerced_cells(&self) -> usize {
        self.unparseable_dates
            + self.invalid_ages
            + self.invalid_family_numbers
            + self.undecodable_cells
    }
}

/// Immutable, cheaply clonable handle to the loaded visit records.
#[derive(Debug, Clone)]
pub struct VisitDataset {
    records: Arc<[VisitRecord]>,
}

impl VisitDataset {
    /// Wraps an owned list of records.
    pub fn new(records: Vec<VisitRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    /// All records in file order.
    pub fn records(&self) -> &[VisitRecord] {
        &self.records
    }

    /// Iterates records in file order.
    pub fn iter(&self) -> std::slice::Iter<'_, VisitRecord> {
        self.records.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct non-missing service names in first-encounter order.
    pub fn distinct_services(&self) -> Vec<&str> {
        distinct(self.records.iter().filter_map(VisitRecord::service))
    }

    /// Distinct non-missing nationalities in first-encounter order.
    pub fn distinct_nationalities(&self) -> Vec<&str> {
        distinct(self.records.iter().filter_map(VisitRecord::nationality))
    }
}

impl Default for VisitDataset {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl FromIterator<VisitRecord> for VisitDataset {
    fn from_iter<I: IntoIterator<Item = VisitRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a VisitDataset {
    type Item = &'a VisitRecord;
    type IntoIter = std::slice::Iter<'a, VisitRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    values.filter(|value| seen.insert(*value)).collect()
}

/// Loads the visit register export from disk.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    path: PathBuf,
}

impl DatasetLoader {
    /// Creates a loader for the given CSV path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path this loader reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the whole file.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn load(&self) -> Result<(VisitDataset, LoadReport)> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| with_context!(e, "Failed to read dataset {}", self.path.display()))?;
        debug!(bytes = bytes.len(), "Read dataset file");

        let (dataset, report) = Self::from_reader(bytes.as_slice())?;
        info!(
            records = dataset.len(),
            path = %self.path.display(),
            "Loaded visit dataset"
        );
        Ok((dataset, report))
    }

    /// Parses a CSV stream with a header row.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<(VisitDataset, LoadReport)> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let columns = ColumnIndex::from_headers(reader.byte_headers()?)?;

        let mut report = LoadReport::default();
        let mut records = Vec::new();
        for (index, record) in reader.byte_records().enumerate() {
            let record = record.map_err(|e| {
                let line = e.position().map_or(index as u64 + 2, csv::Position::line);
                CarevisError::data_at_row(format!("unreadable row: {e}"), line)
            })?;
            let row = columns.read(&record, &mut report);
            records.push(coerce_row(row, &mut report));
        }
        report.rows = records.len();

        if report.coerced_cells() > 0 {
            warn!(
                unparseable_dates = report.unparseable_dates,
                invalid_ages = report.invalid_ages,
                invalid_family_numbers = report.invalid_family_numbers,
                undecodable_cells = report.undecodable_cells,
                "Coerced malformed cells to missing values"
            );
        }

        Ok((VisitDataset::new(records), report))
    }
}

fn coerce_row(row: RawVisitRow, report: &mut LoadReport) -> VisitRecord {
    let service_date = non_empty(row.service_date).and_then(|raw| {
        let parsed = parse_service_date(&raw);
        if parsed.is_none() {
            report.unparseable_dates += 1;
        }
        parsed
    });

    let patient_age = non_empty(row.patient_age).and_then(|raw| {
        let parsed = parse_age(&raw);
        if parsed.is_none() {
            report.invalid_ages += 1;
        }
        parsed
    });

    let family_number = non_empty(row.family_number).and_then(|raw| {
        let parsed = parse_family_number(&raw);
        if parsed.is_none() {
            report.invalid_family_numbers += 1;
        }
        parsed
    });

    VisitRecord {
        service_date,
        service_name: non_empty(row.service_name),
        patient_sex: non_empty(row.patient_sex),
        patient_age,
        nationality: non_empty(row.nationality),
        family_number,
        clinic_name: non_empty(row.clinic_name),
    }
}

fn non_empty(cell: Option<String>) -> Option<String> {
    cell.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parses a service date cell, ignoring any time-of-day component.
///
/// Returns `None` for anything that is not one of the accepted encodings.
pub fn parse_service_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|datetime| datetime.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|datetime| datetime.date_naive())
        })
        .or_else(|| NaiveDate::parse_from_str(raw, NAMED_MONTH_FORMAT).ok())
}

fn parse_age(raw: &str) -> Option<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|age| age.is_finite() && *age >= 0.0)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_family_number(raw: &str) -> Option<FamilyNumber> {
    raw.parse::<u32>()
        .ok()
        .or_else(|| {
            raw.parse::<f64>()
                .ok()
                .filter(|value| {
                    value.is_finite()
                        && value.fract() == 0.0
                        && *value >= 0.0
                        && *value <= f64::from(u32::MAX)
                })
                .map(|value| value as u32)
        })
        .map(FamilyNumber)
}
