//! Test utilities and shared fixtures for the carevis workspace.
//!
//! Enabled for this crate's own tests and, through the `testing` feature,
//! for the tests of downstream crates.

#![allow(clippy::missing_panics_doc)]

use crate::dataset::REQUIRED_COLUMNS;
use crate::types::{FamilyNumber, VisitRecord};
use crate::VisitDataset;
use chrono::NaiveDate;
use std::io::Write;
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize logging for tests once per process.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Builder for a single visit record with every field missing by default.
#[derive(Debug, Clone, Default)]
pub struct VisitFixture {
    record: VisitRecord,
}

/// Starts a new visit fixture.
pub fn visit() -> VisitFixture {
    VisitFixture::default()
}

impl VisitFixture {
    /// Sets the service date.
    pub fn date(mut self, year: i32, month: u32, day: u32) -> Self {
        self.record.service_date =
            Some(NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date"));
        self
    }

    /// Sets the service name.
    pub fn service(mut self, name: &str) -> Self {
        self.record.service_name = Some(name.to_string());
        self
    }

    /// Sets the patient sex.
    pub fn sex(mut self, sex: &str) -> Self {
        self.record.patient_sex = Some(sex.to_string());
        self
    }

    /// Sets the patient age.
    pub fn age(mut self, age: f64) -> Self {
        self.record.patient_age = Some(age);
        self
    }

    /// Sets the nationality.
    pub fn nationality(mut self, nationality: &str) -> Self {
        self.record.nationality = Some(nationality.to_string());
        self
    }

    /// Sets the family number.
    pub fn family(mut self, number: u32) -> Self {
        self.record.family_number = Some(FamilyNumber(number));
        self
    }

    /// Sets the clinic name.
    pub fn clinic(mut self, name: &str) -> Self {
        self.record.clinic_name = Some(name.to_string());
        self
    }

    /// Finishes the record.
    pub fn build(self) -> VisitRecord {
        self.record
    }
}

/// Small register covering every view: three clinics, both sexes, all seasons.
pub fn sample_records() -> Vec<VisitRecord> {
    vec![
        visit().date(2023, 1, 10).service("Dental").sex("F").age(30.0).nationality("Lebanese").family(1).clinic("Tyre").build(),
        visit().date(2023, 1, 11).service("Dental").sex("M").age(40.0).nationality("Syrian").family(1).clinic("Tyre").build(),
        visit().date(2023, 4, 3).service("General Medicine").sex("F").age(25.0).nationality("Lebanese").family(2).clinic("Ankoun").build(),
        visit().date(2023, 7, 19).service("Pediatrics").sex("F").age(6.0).nationality("Syrian").family(2).clinic("Ankoun").build(),
        visit().date(2023, 7, 20).service("Pediatrics").sex("M").age(4.0).nationality("Syrian").family(3).clinic("Dar De Ghaya").build(),
        visit().date(2023, 10, 2).service("Dental").sex("F").age(52.0).nationality("Lebanese").family(3).clinic("Dar De Ghaya").build(),
        visit().date(2023, 12, 28).service("General Medicine").sex("M").age(61.0).nationality("Palestinian").family(4).clinic("Tyre").build(),
    ]
}

/// [`sample_records`] wrapped in a dataset.
pub fn sample_dataset() -> VisitDataset {
    VisitDataset::new(sample_records())
}

/// Renders records as CSV text with the register's header row.
pub fn records_to_csv(records: &[VisitRecord]) -> String {
    let mut out = REQUIRED_COLUMNS.join(",");
    out.push('\n');
    for record in records {
        let cells = [
            record
                .service_date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            record.service_name.clone().unwrap_or_default(),
            record.patient_sex.clone().unwrap_or_default(),
            record.patient_age.map(|age| age.to_string()).unwrap_or_default(),
            record.nationality.clone().unwrap_or_default(),
            record
                .family_number
                .map(|number| number.to_string())
                .unwrap_or_default(),
            record.clinic_name.clone().unwrap_or_default(),
        ];
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

/// Writes CSV text into a temporary file that is removed on drop.
pub fn write_temp_csv(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("Failed to create temporary file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temporary CSV");
    file.flush().expect("Failed to flush temporary CSV");
    file
}

/// Create a temporary directory for tests that automatically cleans up.
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Property-based testing strategies.
pub mod property_testing {
    use chrono::NaiveDate;
    use proptest::prelude::*;

    /// Strategy for calendar months.
    pub fn month_strategy() -> impl Strategy<Value = u32> {
        1u32..=12
    }

    /// Strategy for valid dates between 1990 and 2040.
    pub fn date_strategy() -> impl Strategy<Value = NaiveDate> {
        (1990i32..=2040, month_strategy(), 1u32..=28).prop_map(|(year, month, day)| {
            NaiveDate::from_ymd_opt(year, month, day).expect("day 1..=28 exists in every month")
        })
    }

    /// Strategy for plausible patient ages.
    pub fn age_strategy() -> impl Strategy<Value = f64> {
        0.0f64..110.0
    }
}
