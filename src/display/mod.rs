//! Display formatting for terminal output
//!
//! Formats drafts, line item trees, evaluations and the budget list.

pub mod budget_list;
pub mod evaluation;
pub mod tree;

pub use budget_list::{format_budget_list, ListOptions};
pub use evaluation::{format_draft_details, format_evaluation};
pub use tree::format_line_item_tree;
