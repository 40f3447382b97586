//! Budget list aggregation and ordering
//!
//! Column totals over the flat list of top-level budgets (optionally only the
//! selected rows), plus the three-state column sort used by the budget table.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::models::{BudgetSummary, Money};

/// Column totals of the budget table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BudgetTotals {
    pub total_amount: Money,
    pub committed: Money,
    pub uncommitted: Money,
    pub actually_spent: Money,
    pub remaining: Money,
    pub initial_amount: Money,
}

impl BudgetTotals {
    /// Sum every column over the rows accepted by `filter` (all rows when `None`).
    ///
    /// A row without an initial amount contributes its total amount to the
    /// initial amount column.
    pub fn aggregate(
        budgets: &[BudgetSummary],
        filter: Option<&dyn Fn(&BudgetSummary) -> bool>,
    ) -> Self {
        budgets
            .iter()
            .filter(|budget| filter.map_or(true, |accept| accept(budget)))
            .fold(Self::default(), |mut totals, budget| {
                totals.add(budget);
                totals
            })
    }

    /// Add a single row to the totals
    pub fn add(&mut self, budget: &BudgetSummary) {
        self.total_amount += budget.total_amount;
        self.committed += budget.committed;
        self.uncommitted += budget.uncommitted;
        self.actually_spent += budget.actually_spent;
        self.remaining += budget.remaining;
        self.initial_amount += budget.effective_initial_amount();
    }
}

/// Checked rows of the budget table, keyed by budget name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    checked: BTreeSet<String>,
}

impl Selection {
    /// An empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Check or uncheck one row
    pub fn set(&mut self, name: impl Into<String>, checked: bool) {
        let name = name.into();
        if checked {
            self.checked.insert(name);
        } else {
            self.checked.remove(&name);
        }
    }

    /// Flip one row
    pub fn toggle(&mut self, name: &str) {
        let checked = self.is_checked(name);
        self.set(name, !checked);
    }

    /// Check or uncheck every row
    pub fn set_all(&mut self, budgets: &[BudgetSummary], checked: bool) {
        if checked {
            self.checked = budgets.iter().map(|b| b.name.clone()).collect();
        } else {
            self.checked.clear();
        }
    }

    pub fn is_checked(&self, name: &str) -> bool {
        self.checked.contains(name)
    }

    /// Number of checked rows
    pub fn count(&self) -> usize {
        self.checked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checked.is_empty()
    }

    /// Every row is checked (false for an empty table)
    pub fn is_all_checked(&self, budgets: &[BudgetSummary]) -> bool {
        !budgets.is_empty() && budgets.iter().all(|b| self.is_checked(&b.name))
    }

    /// Some, but not all, rows are checked
    pub fn is_partially_checked(&self, budgets: &[BudgetSummary]) -> bool {
        let checked = budgets.iter().filter(|b| self.is_checked(&b.name)).count();
        checked > 0 && checked < budgets.len()
    }

    /// Totals over the checked rows, or over every row when nothing is checked
    pub fn totals(&self, budgets: &[BudgetSummary]) -> BudgetTotals {
        if self.is_empty() {
            BudgetTotals::aggregate(budgets, None)
        } else {
            BudgetTotals::aggregate(budgets, Some(&|b: &BudgetSummary| self.is_checked(&b.name)))
        }
    }
}

/// Column a budget list can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Name,
    Status,
    Period,
    TotalAmount,
    Committed,
    Uncommitted,
    Progress,
    ActuallySpent,
    Remaining,
    InitialAmount,
    DueDate,
    Owner,
    /// Spent share of the total amount
    SpentProgress,
}

impl SortKey {
    /// All keys, in table column order
    pub fn all() -> &'static [SortKey] {
        &[
            Self::Name,
            Self::Status,
            Self::Period,
            Self::TotalAmount,
            Self::Committed,
            Self::Uncommitted,
            Self::Progress,
            Self::ActuallySpent,
            Self::Remaining,
            Self::InitialAmount,
            Self::DueDate,
            Self::Owner,
            Self::SpentProgress,
        ]
    }

    fn slug(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Status => "status",
            Self::Period => "period",
            Self::TotalAmount => "total",
            Self::Committed => "committed",
            Self::Uncommitted => "uncommitted",
            Self::Progress => "progress",
            Self::ActuallySpent => "spent",
            Self::Remaining => "remaining",
            Self::InitialAmount => "initial",
            Self::DueDate => "due",
            Self::Owner => "owner",
            Self::SpentProgress => "spent-progress",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase().replace('_', "-");
        Self::all()
            .iter()
            .copied()
            .find(|key| key.slug() == s)
            .ok_or_else(|| {
                let valid: Vec<_> = Self::all().iter().map(|k| k.slug()).collect();
                format!("Unknown sort key '{}'. Valid keys: {}", s, valid.join(", "))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Current ordering of the table; `direction == None` means unsorted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub key: Option<SortKey>,
    pub direction: Option<SortDirection>,
}

impl SortState {
    /// Unsorted
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorted by `key` in `direction`
    pub fn by(key: SortKey, direction: SortDirection) -> Self {
        Self {
            key: Some(key),
            direction: Some(direction),
        }
    }

    /// Advance the sort cycle for a column click.
    ///
    /// Same key: ascending -> descending -> unsorted. Any other key (or an
    /// unsorted table) starts at ascending.
    pub fn toggle(self, key: SortKey) -> Self {
        let direction = match (self.key, self.direction) {
            (Some(current), Some(SortDirection::Ascending)) if current == key => {
                Some(SortDirection::Descending)
            }
            (Some(current), Some(SortDirection::Descending)) if current == key => None,
            _ => Some(SortDirection::Ascending),
        };
        Self {
            key: Some(key),
            direction,
        }
    }

    /// Whether rows are actually reordered
    pub fn is_sorted(&self) -> bool {
        self.key.is_some() && self.direction.is_some()
    }
}

/// Compare two rows on a column in the given direction
pub fn compare(
    a: &BudgetSummary,
    b: &BudgetSummary,
    key: SortKey,
    direction: SortDirection,
) -> Ordering {
    let ordering = match key {
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::Status => a.status.sort_priority().cmp(&b.status.sort_priority()),
        SortKey::Period => a.period.label().cmp(b.period.label()),
        SortKey::TotalAmount => a.total_amount.cmp(&b.total_amount),
        SortKey::Committed => a.committed.cmp(&b.committed),
        SortKey::Uncommitted => a.uncommitted.cmp(&b.uncommitted),
        SortKey::Progress => a.progress.cmp(&b.progress),
        SortKey::ActuallySpent => a.actually_spent.cmp(&b.actually_spent),
        SortKey::Remaining => a.remaining.cmp(&b.remaining),
        SortKey::InitialAmount => a
            .effective_initial_amount()
            .cmp(&b.effective_initial_amount()),
        SortKey::DueDate => a.due_date.cmp(&b.due_date),
        SortKey::Owner => a.owner.cmp(&b.owner),
        SortKey::SpentProgress => a
            .spent_ratio()
            .partial_cmp(&b.spent_ratio())
            .unwrap_or(Ordering::Equal),
    };

    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

/// A new, ordered copy of the rows; unsorted state keeps the original order
pub fn sorted(budgets: &[BudgetSummary], state: SortState) -> Vec<BudgetSummary> {
    let mut rows = budgets.to_vec();
    if let (Some(key), Some(direction)) = (state.key, state.direction) {
        rows.sort_by(|a, b| compare(a, b, key, direction));
    }
    rows
}
