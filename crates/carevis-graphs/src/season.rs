//! Meteorological season of a visit date.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Season derived from a service date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Season {
    /// December, January, February
    Winter,
    /// March, April, May
    Spring,
    /// June, July, August
    Summer,
    /// September, October, November
    Fall,
    /// Missing or unparseable date
    Unknown,
}

impl Season {
    /// The four real seasons in calendar order starting at Winter.
    pub const CANONICAL: [Self; 4] = [Self::Winter, Self::Spring, Self::Summer, Self::Fall];

    /// Every season in reporting order, `Unknown` last.
    pub const REPORTING_ORDER: [Self; 5] = [
        Self::Winter,
        Self::Spring,
        Self::Summer,
        Self::Fall,
        Self::Unknown,
    ];

    /// Classifies an optional service date.
    pub fn classify(date: Option<NaiveDate>) -> Self {
        date.map_or(Self::Unknown, |date| Self::from_month(date.month()))
    }

    /// Classifies a 1-based month number; anything outside `1..=12` is `Unknown`.
    pub const fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Self::Winter,
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            9..=11 => Self::Fall,
            _ => Self::Unknown,
        }
    }

    /// Label text used in legends and logs.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Winter => "Winter",
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Fall => "Fall",
            Self::Unknown => "Unknown",
        }
    }

    /// Localization message id of the season name.
    pub const fn message_id(self) -> &'static str {
        match self {
            Self::Winter => "season-winter",
            Self::Spring => "season-spring",
            Self::Summer => "season-summer",
            Self::Fall => "season-fall",
            Self::Unknown => "season-unknown",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
