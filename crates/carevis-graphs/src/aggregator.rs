//! Aggregations over the visit dataset, one per dashboard view.
//!
//! Every function borrows the dataset, never mutates it, and returns
//! [`Outcome::NoData`] instead of an empty table. Rankings sort by count
//! with a stable sort, so ties keep the order in which the dataset first
//! mentions them.

use crate::season::Season;
use carevis_common::{ClinicDirectory, FamilyNumber, VisitDataset};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

/// Number of evaluation points of the age density curve.
pub const DENSITY_POINTS: usize = 100;

/// Result of an aggregation: a non-empty table, or the explicit no-data signal.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The aggregation produced data.
    Data(T),
    /// Nothing contributed to the aggregation.
    NoData,
}

impl<T> Outcome<T> {
    /// Whether this is the no-data signal.
    pub const fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }

    /// The data, if any.
    pub fn data(self) -> Option<T> {
        match self {
            Self::Data(data) => Some(data),
            Self::NoData => None,
        }
    }

    /// Borrows the data.
    pub const fn as_ref(&self) -> Outcome<&T> {
        match self {
            Self::Data(data) => Outcome::Data(data),
            Self::NoData => Outcome::NoData,
        }
    }

    /// Maps the data, keeping the no-data signal.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Data(data) => Outcome::Data(f(data)),
            Self::NoData => Outcome::NoData,
        }
    }
}

impl<T> Outcome<Vec<T>> {
    /// `NoData` for an empty list, `Data` otherwise.
    pub fn from_vec(items: Vec<T>) -> Self {
        if items.is_empty() {
            Self::NoData
        } else {
            Self::Data(items)
        }
    }
}

/// A service with its number of visits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCount {
    /// Service name
    pub service: String,
    /// Number of visits
    pub count: u32,
}

/// One service row of the service-by-sex table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceSexRow {
    /// Service name
    pub service: String,
    /// Every visit of the service, including those without a recorded sex
    pub visits: u32,
    /// Visits with a recorded sex
    pub total: u32,
    /// Visits per sex, aligned with [`ServiceSexTable::sexes`]
    pub counts: Vec<u32>,
}

/// Visit counts per service broken down by patient sex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceSexTable {
    /// Sex labels in first-encounter order
    pub sexes: Vec<String>,
    /// Rows sorted by visits, descending
    pub rows: Vec<ServiceSexRow>,
}

impl ServiceSexTable {
    /// Number of visits of `service` for `sex`, zero if either is absent.
    pub fn count(&self, service: &str, sex: &str) -> u32 {
        let Some(column) = self.sexes.iter().position(|s| s == sex) else {
            return 0;
        };
        self.rows
            .iter()
            .find(|row| row.service == service)
            .and_then(|row| row.counts.get(column).copied())
            .unwrap_or(0)
    }

    /// Sum of every cell.
    pub fn grand_total(&self) -> u32 {
        self.rows.iter().map(|row| row.total).sum()
    }
}

/// Mean patient age of a service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceAge {
    /// Service name
    pub service: String,
    /// Mean of the known ages
    pub mean_age: f64,
    /// Number of known ages
    pub samples: u32,
}

/// One equal-width histogram bin. The last bin includes its upper edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    /// Lower edge, inclusive
    pub lower: f64,
    /// Upper edge
    pub upper: f64,
    /// Number of values in the bin
    pub count: u32,
}

/// Age distribution of one service and nationality.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeDistribution {
    /// Selected service
    pub service: String,
    /// Selected nationality
    pub nationality: String,
    /// Known ages of the matching visits, in dataset order
    pub ages: Vec<f64>,
    /// Equal-width bins over the age range
    pub histogram: Vec<HistogramBin>,
    /// Gaussian kernel density estimate as `(age, density)` points
    pub density: Vec<(f64, f64)>,
}

impl AgeDistribution {
    /// Width of one histogram bin.
    pub fn bin_width(&self) -> f64 {
        self.histogram
            .first()
            .map_or(0.0, |bin| bin.upper - bin.lower)
    }
}

/// A ranked service at a clinic, placed on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClinicServiceMarker {
    /// Clinic name
    pub clinic: String,
    /// Service name
    pub service: String,
    /// Visits of the service at the clinic
    pub count: u32,
    /// Zero-based rank within the clinic
    pub rank: usize,
    /// Clinic latitude shifted north by the rank offset
    pub latitude: f64,
    /// Clinic longitude
    pub longitude: f64,
}

impl ClinicServiceMarker {
    /// Popup text shown for the marker.
    pub fn popup_text(&self) -> String {
        format!("{}<br>{}: {}", self.clinic, self.service, self.count)
    }
}

/// Top services of one season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonBucket {
    /// Season
    pub season: Season,
    /// Services ranked by visits, descending
    pub services: Vec<ServiceCount>,
}

/// First-encounter ordered counter.
#[derive(Debug, Default)]
struct Tally<'a> {
    counts: Vec<(&'a str, u32)>,
    index: HashMap<&'a str, usize>,
}

impl<'a> Tally<'a> {
    fn add(&mut self, key: &'a str) {
        if let Some(&position) = self.index.get(key) {
            self.counts[position].1 += 1;
        } else {
            self.index.insert(key, self.counts.len());
            self.counts.push((key, 1));
        }
    }

    fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    fn ranked(self, limit: usize) -> Vec<ServiceCount> {
        let mut counts = self.counts;
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
            .into_iter()
            .take(limit)
            .map(|(service, count)| ServiceCount {
                service: service.to_string(),
                count,
            })
            .collect()
    }
}

/// Visits per service and sex.
///
/// Only visits with both a service and a sex are counted into the table.
/// Rows are ranked by every visit of the service, so a service whose sex is
/// often unrecorded keeps its place in the overall ranking.
#[instrument(skip(dataset), fields(records = dataset.len()))]
pub fn count_by_service_and_sex(dataset: &VisitDataset) -> Outcome<ServiceSexTable> {
    let mut sexes: Vec<&str> = Vec::new();
    let mut sex_columns: HashMap<&str, usize> = HashMap::new();
    let mut rows: Vec<(&str, Vec<u32>)> = Vec::new();
    let mut row_index: HashMap<&str, usize> = HashMap::new();
    let mut visits: HashMap<&str, u32> = HashMap::new();

    for record in dataset {
        let Some(service) = record.service() else {
            continue;
        };
        *visits.entry(service).or_insert(0) += 1;
        let Some(sex) = record.sex() else {
            continue;
        };
        let column = *sex_columns.entry(sex).or_insert_with(|| {
            sexes.push(sex);
            sexes.len() - 1
        });
        let row = *row_index.entry(service).or_insert_with(|| {
            rows.push((service, Vec::new()));
            rows.len() - 1
        });
        let counts = &mut rows[row].1;
        if counts.len() <= column {
            counts.resize(column + 1, 0);
        }
        counts[column] += 1;
    }

    if rows.is_empty() {
        debug!("No visit has both a service and a sex");
        return Outcome::NoData;
    }

    let mut rows: Vec<ServiceSexRow> = rows
        .into_iter()
        .map(|(service, mut counts)| {
            counts.resize(sexes.len(), 0);
            ServiceSexRow {
                service: service.to_string(),
                visits: visits.get(service).copied().unwrap_or(0),
                total: counts.iter().sum(),
                counts,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.visits.cmp(&a.visits));

    debug!(services = rows.len(), sexes = sexes.len(), "Counted services by sex");
    Outcome::Data(ServiceSexTable {
        sexes: sexes.into_iter().map(ToString::to_string).collect(),
        rows,
    })
}

/// Mean known age per service. Services without any known age are left out.
#[instrument(skip(dataset), fields(records = dataset.len()))]
pub fn average_age_by_service(dataset: &VisitDataset) -> Outcome<Vec<ServiceAge>> {
    let mut sums: Vec<(&str, f64, u32)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in dataset {
        let (Some(service), Some(age)) = (record.service(), record.patient_age) else {
            continue;
        };
        let position = *index.entry(service).or_insert_with(|| {
            sums.push((service, 0.0, 0));
            sums.len() - 1
        });
        sums[position].1 += age;
        sums[position].2 += 1;
    }

    let mut averages: Vec<ServiceAge> = sums
        .into_iter()
        .map(|(service, sum, samples)| ServiceAge {
            service: service.to_string(),
            mean_age: sum / f64::from(samples),
            samples,
        })
        .collect();
    averages.sort_by(|a, b| b.mean_age.total_cmp(&a.mean_age));

    debug!(services = averages.len(), "Averaged ages by service");
    Outcome::from_vec(averages)
}

/// Histogram and density of the known ages of visits matching both filters.
#[instrument(skip(dataset), fields(records = dataset.len()))]
pub fn age_distribution(
    dataset: &VisitDataset,
    service: &str,
    nationality: &str,
    bins: usize,
) -> Outcome<AgeDistribution> {
    let ages: Vec<f64> = dataset
        .iter()
        .filter(|record| record.service() == Some(service))
        .filter(|record| record.nationality() == Some(nationality))
        .filter_map(|record| record.patient_age)
        .collect();

    if ages.is_empty() {
        debug!("No known age for this service and nationality");
        return Outcome::NoData;
    }

    let histogram = histogram(&ages, bins.max(1));
    let density = kernel_density(&ages, DENSITY_POINTS);
    debug!(ages = ages.len(), "Built age distribution");

    Outcome::Data(AgeDistribution {
        service: service.to_string(),
        nationality: nationality.to_string(),
        ages,
        histogram,
        density,
    })
}

/// Top services per clinic, restricted to clinics of the directory.
///
/// Clinics come out in ascending name order. The marker of rank `r` sits
/// `r * offset_step` degrees north of its clinic.
#[instrument(skip(dataset, directory), fields(records = dataset.len(), clinics = directory.len()))]
pub fn top_services_by_clinic(
    dataset: &VisitDataset,
    directory: &ClinicDirectory,
    limit: usize,
    offset_step: f64,
) -> Outcome<Vec<ClinicServiceMarker>> {
    let mut per_clinic: BTreeMap<&str, Tally<'_>> = BTreeMap::new();
    for record in dataset {
        let (Some(clinic), Some(service)) = (record.clinic(), record.service()) else {
            continue;
        };
        if directory.contains(clinic) {
            per_clinic.entry(clinic).or_default().add(service);
        }
    }

    let mut markers = Vec::new();
    for (clinic, tally) in per_clinic {
        let Some(location) = directory.get(clinic) else {
            continue;
        };
        for (rank, ranked) in tally.ranked(limit).into_iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let offset = rank as f64 * offset_step;
            markers.push(ClinicServiceMarker {
                clinic: clinic.to_string(),
                service: ranked.service,
                count: ranked.count,
                rank,
                latitude: location.latitude + offset,
                longitude: location.longitude,
            });
        }
    }

    debug!(markers = markers.len(), "Ranked services by clinic");
    Outcome::from_vec(markers)
}

/// Top services of one family unit. The list is never padded.
#[instrument(skip(dataset), fields(records = dataset.len()))]
pub fn top_services_by_family(
    dataset: &VisitDataset,
    family_number: FamilyNumber,
    limit: usize,
) -> Outcome<Vec<ServiceCount>> {
    let mut tally = Tally::default();
    let mut matched = 0usize;
    for record in dataset
        .iter()
        .filter(|record| record.family_number == Some(family_number))
    {
        matched += 1;
        if let Some(service) = record.service() {
            tally.add(service);
        }
    }

    if tally.is_empty() {
        debug!(matched, "No service recorded for this family");
        return Outcome::NoData;
    }

    let ranked = tally.ranked(limit);
    debug!(matched, services = ranked.len(), "Ranked services for family");
    Outcome::from_vec(ranked)
}

/// Top services per season, in Winter, Spring, Summer, Fall, Unknown order.
///
/// A season appears only if at least one visit with a service falls in it.
#[instrument(skip(dataset), fields(records = dataset.len()))]
pub fn top_services_by_season(dataset: &VisitDataset, limit: usize) -> Outcome<Vec<SeasonBucket>> {
    let mut tallies: BTreeMap<Season, Tally<'_>> = BTreeMap::new();
    for record in dataset {
        if let Some(service) = record.service() {
            tallies
                .entry(Season::classify(record.service_date))
                .or_default()
                .add(service);
        }
    }

    let buckets: Vec<SeasonBucket> = Season::REPORTING_ORDER
        .iter()
        .filter_map(|season| {
            tallies.remove(season).map(|tally| SeasonBucket {
                season: *season,
                services: tally.ranked(limit),
            })
        })
        .filter(|bucket| !bucket.services.is_empty())
        .collect();

    debug!(seasons = buckets.len(), "Ranked services by season");
    Outcome::from_vec(buckets)
}

/// Equal-width bins over `[min, max]` of non-empty `values`.
///
/// A zero-width range is widened by half a unit on each side.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let Some((min, max)) = min_max(values) else {
        return Vec::new();
    };
    let bins = bins.max(1);
    let (lower, upper) = if max > min {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    };
    let width = (upper - lower) / bins as f64;

    let mut counts = vec![0u32; bins];
    for value in values {
        let position = (((value - lower) / width).floor() as usize).min(bins - 1);
        counts[position] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: lower + i as f64 * width,
            upper: if i + 1 == bins {
                upper
            } else {
                lower + (i + 1) as f64 * width
            },
            count,
        })
        .collect()
}

/// Gaussian kernel density with Scott's bandwidth, evaluated on `points`
/// evenly spaced values over `[min, max]`.
///
/// Empty when fewer than two distinct values exist.
#[allow(clippy::cast_precision_loss)]
pub fn kernel_density(values: &[f64], points: usize) -> Vec<(f64, f64)> {
    let Some((min, max)) = min_max(values) else {
        return Vec::new();
    };
    if max <= min || points < 2 {
        return Vec::new();
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let bandwidth = variance.sqrt() * n.powf(-0.2);
    if !bandwidth.is_normal() {
        return Vec::new();
    }

    let norm = 1.0 / (n * bandwidth * std::f64::consts::TAU.sqrt());
    let step = (max - min) / (points - 1) as f64;
    (0..points)
        .map(|i| {
            let x = min + i as f64 * step;
            let sum: f64 = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                .sum();
            (x, norm * sum)
        })
        .collect()
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().fold(None, |acc, &value| match acc {
        None => Some((value, value)),
        Some((min, max)) => Some((min.min(value), max.max(value))),
    })
}
