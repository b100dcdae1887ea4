//! The closed menu of visualizations.

use carevis_common::{CarevisError, Result};
use carevis_config::Config;
use carevis_i18n::{fluent_args, Localizer};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// One of the six dashboard views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Visualization {
    /// Visit counts per service, split by sex.
    ServiceBySex,
    /// Mean patient age per service.
    AverageAge,
    /// Age histogram for one service and nationality.
    AgeDistribution,
    /// Top services per clinic on a map.
    ClinicMap,
    /// Top services of one family.
    FamilyServices,
    /// Top services per season.
    SeasonalServices,
}

impl Visualization {
    /// Every entry in menu order.
    pub const ALL: [Self; 6] = [
        Self::ServiceBySex,
        Self::AverageAge,
        Self::AgeDistribution,
        Self::ClinicMap,
        Self::FamilyServices,
        Self::SeasonalServices,
    ];

    /// Stable identifier used on the command line and in output file names.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::ServiceBySex => "service-by-sex",
            Self::AverageAge => "average-age",
            Self::AgeDistribution => "age-distribution",
            Self::ClinicMap => "clinic-map",
            Self::FamilyServices => "family-services",
            Self::SeasonalServices => "seasonal-services",
        }
    }

    /// Message id of the menu label.
    pub const fn message_id(self) -> &'static str {
        match self {
            Self::ServiceBySex => "menu-service-by-sex",
            Self::AverageAge => "menu-average-age",
            Self::AgeDistribution => "menu-age-distribution",
            Self::ClinicMap => "menu-clinic-map",
            Self::FamilyServices => "menu-family-services",
            Self::SeasonalServices => "menu-seasonal-services",
        }
    }

    /// Message id of the chart title.
    pub const fn title_id(self) -> &'static str {
        match self {
            Self::ServiceBySex => "title-service-by-sex",
            Self::AverageAge => "title-average-age",
            Self::AgeDistribution => "title-age-distribution",
            Self::ClinicMap => "title-clinic-map",
            Self::FamilyServices => "title-family-services",
            Self::SeasonalServices => "title-seasonal-services",
        }
    }

    /// One-based position in the menu.
    pub const fn number(self) -> usize {
        match self {
            Self::ServiceBySex => 1,
            Self::AverageAge => 2,
            Self::AgeDistribution => 3,
            Self::ClinicMap => 4,
            Self::FamilyServices => 5,
            Self::SeasonalServices => 6,
        }
    }

    /// Whether the view takes user-selected filters.
    pub const fn needs_selection(self) -> bool {
        matches!(self, Self::AgeDistribution | Self::FamilyServices)
    }

    /// Localized menu label, e.g. `"4. Top 5 Services in South Lebanon (Map)"`.
    pub fn label(self, localizer: &Localizer, config: &Config) -> String {
        let text = match self {
            Self::ClinicMap => localizer.text_with(
                self.message_id(),
                &fluent_args(&[("limit", config.map.top_services.into())]),
            ),
            Self::SeasonalServices => localizer.text_with(
                self.message_id(),
                &fluent_args(&[("limit", config.charts.top_services.into())]),
            ),
            _ => localizer.text(self.message_id()),
        };
        format!("{}. {text}", self.number())
    }
}

impl fmt::Display for Visualization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Visualization {
    type Err = CarevisError;

    /// Accepts a slug or a menu number.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|entry| entry.slug().eq_ignore_ascii_case(s) || entry.number().to_string() == s)
            .ok_or_else(|| {
                let known: Vec<_> = Self::ALL.iter().map(|entry| entry.slug()).collect();
                CarevisError::validation_field(
                    format!("unknown visualization '{s}', expected one of: {}", known.join(", ")),
                    "visualization",
                )
            })
    }
}
