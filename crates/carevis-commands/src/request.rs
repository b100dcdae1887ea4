//! View requests with their filter parameters.

use crate::menu::Visualization;
use carevis_common::{ensure, CarevisError, FamilyNumber, Result, VisitDataset};
use carevis_config::FamilyConfig;
use serde::Serialize;

/// A fully specified request for one view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "kebab-case")]
pub enum ViewRequest {
    /// Visit counts per service, split by sex.
    ServiceBySex,
    /// Mean patient age per service.
    AverageAge,
    /// Age histogram of one service and nationality.
    AgeDistribution {
        /// Selected service name.
        service: String,
        /// Selected nationality.
        nationality: String,
    },
    /// Top services per clinic.
    ClinicMap,
    /// Top services of one family.
    FamilyServices {
        /// Selected family number.
        family_number: FamilyNumber,
    },
    /// Top services per season.
    SeasonalServices,
}

/// Filter values picked by the user. Unset values take the selector default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Service for the age distribution.
    pub service: Option<String>,
    /// Nationality for the age distribution.
    pub nationality: Option<String>,
    /// Family number for the family view.
    pub family: Option<u32>,
}

impl ViewRequest {
    /// The menu entry this request belongs to.
    pub const fn visualization(&self) -> Visualization {
        match self {
            Self::ServiceBySex => Visualization::ServiceBySex,
            Self::AverageAge => Visualization::AverageAge,
            Self::AgeDistribution { .. } => Visualization::AgeDistribution,
            Self::ClinicMap => Visualization::ClinicMap,
            Self::FamilyServices { .. } => Visualization::FamilyServices,
            Self::SeasonalServices => Visualization::SeasonalServices,
        }
    }

    /// Request for an entry that takes no selection.
    pub const fn without_selection(visualization: Visualization) -> Option<Self> {
        match visualization {
            Visualization::ServiceBySex => Some(Self::ServiceBySex),
            Visualization::AverageAge => Some(Self::AverageAge),
            Visualization::ClinicMap => Some(Self::ClinicMap),
            Visualization::SeasonalServices => Some(Self::SeasonalServices),
            Visualization::AgeDistribution | Visualization::FamilyServices => None,
        }
    }

    /// Builds the request for `visualization` from a user selection.
    ///
    /// Missing service and nationality default to the first value present
    /// in the dataset; a missing family number defaults to the lowest
    /// selectable one. Selection values the entry does not use are ignored.
    pub fn from_selection(
        visualization: Visualization,
        selection: Selection,
        dataset: &VisitDataset,
        family: &FamilyConfig,
    ) -> Result<Self> {
        if let Some(request) = Self::without_selection(visualization) {
            return Ok(request);
        }

        match visualization {
            Visualization::AgeDistribution => {
                let service = selection
                    .service
                    .or_else(|| dataset.distinct_services().first().map(ToString::to_string));
                let nationality = selection.nationality.or_else(|| {
                    dataset
                        .distinct_nationalities()
                        .first()
                        .map(ToString::to_string)
                });
                let (Some(service), Some(nationality)) = (service, nationality) else {
                    return Err(CarevisError::validation(
                        "the dataset has no service and nationality to select",
                    ));
                };
                Ok(Self::AgeDistribution {
                    service,
                    nationality,
                })
            }
            _ => {
                let number = selection.family.unwrap_or(family.min);
                ensure!(
                    family.contains(number),
                    field = "family_number",
                    "family number {} is outside {}..={}",
                    number,
                    family.min,
                    family.max
                );
                Ok(Self::FamilyServices {
                    family_number: FamilyNumber(number),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carevis_common::test_utils::sample_dataset;

    #[test]
    fn test_every_entry_round_trips_to_its_visualization() {
        let dataset = sample_dataset();
        let family = FamilyConfig::default();
        for entry in Visualization::ALL {
            let request =
                ViewRequest::from_selection(entry, Selection::default(), &dataset, &family).unwrap();
            assert_eq!(request.visualization(), entry);
        }
    }

    #[test]
    fn test_defaults_follow_first_values() {
        let request = ViewRequest::from_selection(
            Visualization::AgeDistribution,
            Selection::default(),
            &sample_dataset(),
            &FamilyConfig::default(),
        )
        .unwrap();

        assert_eq!(
            request,
            ViewRequest::AgeDistribution {
                service: "Dental".into(),
                nationality: "Lebanese".into(),
            }
        );
    }

    #[test]
    fn test_explicit_selection_wins() {
        let selection = Selection {
            service: Some("Pediatrics".into()),
            nationality: Some("Syrian".into()),
            family: Some(7),
        };
        let dataset = sample_dataset();
        let family = FamilyConfig::default();

        let request = ViewRequest::from_selection(
            Visualization::AgeDistribution,
            selection.clone(),
            &dataset,
            &family,
        )
        .unwrap();
        assert!(matches!(request, ViewRequest::AgeDistribution { ref service, .. } if service == "Pediatrics"));

        let request =
            ViewRequest::from_selection(Visualization::FamilyServices, selection, &dataset, &family)
                .unwrap();
        assert_eq!(
            request,
            ViewRequest::FamilyServices {
                family_number: FamilyNumber(7)
            }
        );
    }

    #[test]
    fn test_family_outside_range_is_rejected() {
        let selection = Selection {
            family: Some(11),
            ..Selection::default()
        };
        let result = ViewRequest::from_selection(
            Visualization::FamilyServices,
            selection,
            &sample_dataset(),
            &FamilyConfig::default(),
        );
        assert!(matches!(
            result,
            Err(CarevisError::Validation { field: Some(ref f), .. }) if f == "family_number"
        ));
    }

    #[test]
    fn test_empty_dataset_has_nothing_to_select() {
        let result = ViewRequest::from_selection(
            Visualization::AgeDistribution,
            Selection::default(),
            &VisitDataset::default(),
            &FamilyConfig::default(),
        );
        assert!(result.is_err());
        assert!(ViewRequest::without_selection(Visualization::FamilyServices).is_none());
    }
}
