//! Common type definitions and newtype wrappers for domain modeling.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a family unit in the visit register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FamilyNumber(pub u32);

impl fmt::Display for FamilyNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One recorded healthcare service visit.
///
/// Every column is optional: a cell that is blank or cannot be coerced to
/// the column's type is kept as `None` instead of rejecting the row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisitRecord {
    /// Date the service was rendered (`PServdate`).
    pub service_date: Option<NaiveDate>,
    /// Medical service category (`ServName`).
    pub service_name: Option<String>,
    /// Patient sex label (`patsex`).
    pub patient_sex: Option<String>,
    /// Patient age in years (`PatAge`), never negative.
    pub patient_age: Option<f64>,
    /// Patient nationality label (`nationality`).
    pub nationality: Option<String>,
    /// Family unit (`FamilyNbr`).
    pub family_number: Option<FamilyNumber>,
    /// Clinic or location name (`cntname`).
    pub clinic_name: Option<String>,
}

impl VisitRecord {
    /// Service name as a borrowed string, if present.
    pub fn service(&self) -> Option<&str> {
        self.service_name.as_deref()
    }

    /// Patient sex as a borrowed string, if present.
    pub fn sex(&self) -> Option<&str> {
        self.patient_sex.as_deref()
    }

    /// Nationality as a borrowed string, if present.
    pub fn nationality(&self) -> Option<&str> {
        self.nationality.as_deref()
    }

    /// Clinic name as a borrowed string, if present.
    pub fn clinic(&self) -> Option<&str> {
        self.clinic_name.as_deref()
    }
}

/// A clinic with known map coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicLocation {
    /// Clinic name exactly as it appears in the `cntname` column.
    pub name: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl ClinicLocation {
    /// Creates a new clinic location.
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }
}

/// Fixed lookup table from clinic name to coordinates.
///
/// Only clinics listed here take part in the location view.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClinicDirectory {
    locations: Vec<ClinicLocation>,
}

impl ClinicDirectory {
    /// Creates a directory from a list of locations.
    pub fn new(locations: Vec<ClinicLocation>) -> Self {
        Self { locations }
    }

    /// The three South Lebanon clinics of the visit register.
    pub fn south_lebanon() -> Self {
        Self::new(vec![
            ClinicLocation::new("Dar De Ghaya", 33.2267, 35.3317),
            ClinicLocation::new("Ankoun", 33.3648, 35.3033),
            ClinicLocation::new("Tyre", 33.2730, 35.1939),
        ])
    }

    /// Looks up a clinic by exact name.
    pub fn get(&self, name: &str) -> Option<&ClinicLocation> {
        self.locations.iter().find(|location| location.name == name)
    }

    /// Whether the clinic has known coordinates.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// All locations in configuration order.
    pub fn locations(&self) -> &[ClinicLocation] {
        &self.locations
    }

    /// Number of known clinics.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether the directory is empty.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}
