//! Fiscal period representation
//!
//! Budgets are sized for one of a fixed set of fiscal periods. Each period
//! maps to a date range within a fiscal year, except one-time budgets.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fiscal period a budget covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FiscalPeriod {
    #[serde(rename = "Monthly")]
    Monthly,
    #[serde(rename = "Q1 (Jan-Mar)")]
    Q1,
    #[serde(rename = "Q2 (Apr-Jun)")]
    Q2,
    #[serde(rename = "Q3 (Jul-Sep)")]
    Q3,
    #[serde(rename = "Q4 (Oct-Dec)")]
    Q4,
    #[serde(rename = "Semi-annual (H1)")]
    H1,
    #[serde(rename = "Semi-annual (H2)")]
    H2,
    #[serde(rename = "Annual")]
    Annual,
    #[default]
    #[serde(rename = "One-time")]
    OneTime,
}

impl FiscalPeriod {
    /// All periods in menu order
    pub fn all() -> &'static [FiscalPeriod] {
        &[
            Self::OneTime,
            Self::Monthly,
            Self::Q1,
            Self::Q2,
            Self::Q3,
            Self::Q4,
            Self::H1,
            Self::H2,
            Self::Annual,
        ]
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Monthly => "Monthly",
            Self::Q1 => "Q1 (Jan-Mar)",
            Self::Q2 => "Q2 (Apr-Jun)",
            Self::Q3 => "Q3 (Jul-Sep)",
            Self::Q4 => "Q4 (Oct-Dec)",
            Self::H1 => "Semi-annual (H1)",
            Self::H2 => "Semi-annual (H2)",
            Self::Annual => "Annual",
            Self::OneTime => "One-time",
        }
    }

    /// Date range (inclusive) covered in `year`, relative to `today` for monthly
    /// periods. One-time budgets have no range.
    pub fn date_range(&self, year: i32, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let (start_month, end_month) = match self {
            Self::OneTime => return None,
            Self::Monthly => (today.month(), today.month()),
            Self::Q1 => (1, 3),
            Self::Q2 => (4, 6),
            Self::Q3 => (7, 9),
            Self::Q4 => (10, 12),
            Self::H1 => (1, 6),
            Self::H2 => (7, 12),
            Self::Annual => (1, 12),
        };

        let start = NaiveDate::from_ymd_opt(year, start_month, 1)?;
        Some((start, last_day_of_month(year, end_month)?))
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next_month.map(|d| d - Duration::days(1))
}

impl fmt::Display for FiscalPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for FiscalPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let found = Self::all().iter().find(|p| {
            let short = format!("{:?}", p).to_lowercase();
            p.label().to_lowercase() == normalized || short == normalized
        });
        match (found, normalized.as_str()) {
            (Some(p), _) => Ok(*p),
            (None, "one-time" | "onetime" | "once") => Ok(Self::OneTime),
            _ => Err(format!("Unknown fiscal period: {}", s)),
        }
    }
}
