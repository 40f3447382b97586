//! Budget list rows
//!
//! A `BudgetSummary` is one row of the budget table. Its amounts are already
//! rolled up by whoever produced the row; the aggregator only sums rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::BudgetId;
use super::money::Money;
use super::period::FiscalPeriod;

/// Lifecycle status of a budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BudgetStatus {
    Active,
    Submitted,
    OnHold,
    Draft,
    Closed,
    Unknown,
}

impl BudgetStatus {
    /// Sort priority: active < submitted < draft < closed < anything else
    pub fn sort_priority(&self) -> u32 {
        match self {
            Self::Active => 1,
            Self::Submitted => 2,
            Self::Draft => 3,
            Self::Closed => 4,
            Self::OnHold | Self::Unknown => 999,
        }
    }
}

impl From<String> for BudgetStatus {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "active" => Self::Active,
            "submitted" => Self::Submitted,
            "on hold" => Self::OnHold,
            "draft" => Self::Draft,
            "closed" => Self::Closed,
            _ => Self::Unknown,
        }
    }
}

impl From<BudgetStatus> for String {
    fn from(status: BudgetStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Active => "active",
            Self::Submitted => "submitted",
            Self::OnHold => "on hold",
            Self::Draft => "draft",
            Self::Closed => "closed",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}

/// One row of the budget table, possibly with nested rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    #[serde(default)]
    pub id: BudgetId,
    pub name: String,
    pub status: BudgetStatus,
    #[serde(default)]
    pub period: FiscalPeriod,
    pub total_amount: Money,
    pub committed: Money,
    pub uncommitted: Money,
    /// Committed share of the total, in percent
    #[serde(default)]
    pub progress: u32,
    pub actually_spent: Money,
    pub remaining: Money,
    /// Amount originally requested; defaults to `total_amount`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_entity: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BudgetSummary>,
}

impl BudgetSummary {
    /// Create a row with the given total; everything is uncommitted and unspent
    pub fn new(name: impl Into<String>, status: BudgetStatus, total_amount: Money) -> Self {
        Self {
            id: BudgetId::new(),
            name: name.into(),
            status,
            period: FiscalPeriod::default(),
            total_amount,
            committed: Money::zero(),
            uncommitted: total_amount,
            progress: 0,
            actually_spent: Money::zero(),
            remaining: total_amount,
            initial_amount: None,
            due_date: None,
            owner: String::new(),
            vendor: None,
            property: None,
            legal_entity: None,
            children: Vec::new(),
        }
    }

    /// Initial amount, falling back to the total amount
    pub fn effective_initial_amount(&self) -> Money {
        self.initial_amount.unwrap_or(self.total_amount)
    }

    /// Spent share of the total, used for ordering; zero when the total is zero
    pub fn spent_ratio(&self) -> f64 {
        self.actually_spent
            .ratio_of(self.total_amount)
            .unwrap_or(0.0)
    }

    /// Spent share of the committed amount in whole percent; zero when nothing is committed
    pub fn spent_progress_percent(&self) -> i64 {
        if self.committed.is_positive() {
            self.actually_spent
                .ratio_of(self.committed)
                .map(|r| (r * 100.0).round() as i64)
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Whether this row has nested rows
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_priority_order() {
        assert!(BudgetStatus::Active.sort_priority() < BudgetStatus::Submitted.sort_priority());
        assert!(BudgetStatus::Submitted.sort_priority() < BudgetStatus::Draft.sort_priority());
        assert!(BudgetStatus::Draft.sort_priority() < BudgetStatus::Closed.sort_priority());
        assert!(BudgetStatus::Closed.sort_priority() < BudgetStatus::Unknown.sort_priority());
        assert_eq!(BudgetStatus::OnHold.sort_priority(), 999);
    }

    #[test]
    fn test_unknown_status_deserializes() {
        let status: BudgetStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(status, BudgetStatus::Unknown);
        let status: BudgetStatus = serde_json::from_str("\"on hold\"").unwrap();
        assert_eq!(status, BudgetStatus::OnHold);
    }

    #[test]
    fn test_initial_amount_defaults_to_total() {
        let mut row = BudgetSummary::new("IT upgrades", BudgetStatus::Active, Money::from_units(300));
        assert_eq!(row.effective_initial_amount(), Money::from_units(300));
        row.initial_amount = Some(Money::from_units(250));
        assert_eq!(row.effective_initial_amount(), Money::from_units(250));
    }

    #[test]
    fn test_spent_progress() {
        let mut row = BudgetSummary::new("Servers", BudgetStatus::Active, Money::from_units(100_000));
        assert_eq!(row.spent_progress_percent(), 0);
        assert_eq!(row.spent_ratio(), 0.0);

        row.committed = Money::from_units(95_000);
        row.actually_spent = Money::from_units(90_000);
        assert_eq!(row.spent_progress_percent(), 95);
        assert_eq!(row.spent_ratio(), 0.9);
    }

    #[test]
    fn test_zero_total_ratio() {
        let row = BudgetSummary::new("Empty", BudgetStatus::Draft, Money::zero());
        assert_eq!(row.spent_ratio(), 0.0);
    }
}
