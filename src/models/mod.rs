//! Core data models for budget-planner
//!
//! This module contains the data structures of the budgeting domain: line
//! items and the allocation tree, budget drafts, reference data supplied by
//! the host, and the rows of the budget list.

pub mod draft;
pub mod ids;
pub mod line_item;
pub mod money;
pub mod period;
pub mod reference;
pub mod summary;
pub mod tree;

pub use draft::{
    BudgetDraft, Contingency, ContingencyType, Currency, DraftValidationError, SizingStrategy,
};
pub use ids::{BudgetId, DraftId, EntityId, LineItemId, ParentBudgetId};
pub use line_item::{CostType, LineItem, LineItemUpdate};
pub use money::{clamp_percent, parse_amount, parse_percent, Money};
pub use period::FiscalPeriod;
pub use reference::{Entity, EntityType, ParentBudget};
pub use summary::{BudgetStatus, BudgetSummary};
pub use tree::{CostSplit, LineItemTree};
