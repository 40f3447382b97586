//! Budget draft model
//!
//! A draft is a budget being created or edited: its metadata, how its total
//! is sized, optional contingencies, and the line item tree. The total
//! budget itself is always derived, never stored.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{DraftId, ParentBudgetId};
use super::money::Money;
use super::period::FiscalPeriod;
use super::tree::LineItemTree;

/// Currencies a budget can be denominated in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
}

impl Currency {
    /// Currency symbol used when formatting amounts
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Usd => "$",
            Self::Eur => "€",
            Self::Gbp => "£",
        }
    }

    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
        }
    }

    /// Format an amount in this currency, e.g. "$1,500.00 USD"
    pub fn format(&self, amount: Money) -> String {
        format!("{} {}", amount.format_with_symbol(self.symbol()), self.code())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "GBP" => Ok(Self::Gbp),
            other => Err(format!("Unsupported currency: {}", other)),
        }
    }
}

/// How a budget's total size is determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SizingStrategy {
    /// A fixed amount entered by the user
    #[default]
    Fixed,
    /// A percentage of the parent budget's total amount
    Percentage,
    /// The sum of the top-level line items
    Sum,
}

impl fmt::Display for SizingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed => write!(f, "Fixed amount"),
            Self::Percentage => write!(f, "Percentage of parent"),
            Self::Sum => write!(f, "Sum of line items"),
        }
    }
}

impl FromStr for SizingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "percentage" | "percent" | "pct" => Ok(Self::Percentage),
            "sum" => Ok(Self::Sum),
            other => Err(format!("Unknown sizing strategy: {}", other)),
        }
    }
}

/// How a contingency value is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContingencyType {
    /// `value` is an amount in whole currency units
    #[default]
    Fixed,
    /// `value` is a percentage of the matching cost bucket
    Percentage,
}

impl FromStr for ContingencyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "percentage" | "percent" | "pct" => Ok(Self::Percentage),
            other => Err(format!("Unknown contingency type: {}", other)),
        }
    }
}

/// A soft or hard cost contingency layered on top of the line items
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Contingency {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub kind: ContingencyType,
    pub value: f64,
}

impl Contingency {
    /// An enabled contingency
    pub fn enabled(kind: ContingencyType, value: f64) -> Self {
        Self {
            enabled: true,
            kind,
            value,
        }
    }
}

/// A budget being created or edited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetDraft {
    pub id: DraftId,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub currency: Currency,

    #[serde(default)]
    pub period: FiscalPeriod,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_budget_id: Option<ParentBudgetId>,

    #[serde(default)]
    pub sizing_strategy: SizingStrategy,

    /// Raw sizing input; its meaning depends on `sizing_strategy`
    #[serde(default)]
    pub sizing_value: String,

    #[serde(default)]
    pub soft_contingency: Contingency,

    #[serde(default)]
    pub hard_contingency: Contingency,

    #[serde(default)]
    pub line_items: LineItemTree,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl BudgetDraft {
    /// Create an empty draft with a single blank line item
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: DraftId::new(),
            name: name.into(),
            description: String::new(),
            currency: Currency::default(),
            period: FiscalPeriod::default(),
            start_date: None,
            end_date: None,
            parent_budget_id: None,
            sizing_strategy: SizingStrategy::default(),
            sizing_value: String::new(),
            soft_contingency: Contingency::default(),
            hard_contingency: Contingency::default(),
            line_items: LineItemTree::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the line item tree
    pub fn set_line_items(&mut self, line_items: LineItemTree) {
        self.line_items = line_items;
        self.touch();
    }

    /// Mark the draft as modified
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Validate the draft's structural settings.
    ///
    /// Amount problems (overflows, exceeded ceilings) are not checked here;
    /// they belong to the sizing evaluation.
    pub fn validate(&self) -> Result<(), DraftValidationError> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(DraftValidationError::EndBeforeStart { start, end });
            }
        }

        if self.sizing_strategy == SizingStrategy::Percentage && self.parent_budget_id.is_none() {
            return Err(DraftValidationError::PercentageWithoutParent);
        }

        Ok(())
    }
}

impl fmt::Display for BudgetDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.name.is_empty() {
            "(untitled)"
        } else {
            &self.name
        };
        write!(f, "{} [{}, {}]", name, self.period, self.currency)
    }
}

/// Validation errors for draft settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftValidationError {
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    PercentageWithoutParent,
}

impl fmt::Display for DraftValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndBeforeStart { start, end } => {
                write!(f, "End date {} is before start date {}", end, start)
            }
            Self::PercentageWithoutParent => {
                write!(f, "Percentage sizing requires a parent budget")
            }
        }
    }
}

impl std::error::Error for DraftValidationError {}
