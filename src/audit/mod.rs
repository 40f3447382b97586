//! Audit logging for budget-planner
//!
//! Records draft, line item and budget changes with before/after values in an
//! append-only JSONL log.
//!
//! - `AuditEntry`: one operation on one entity, with optional before/after
//!   values and a change summary.
//! - `AuditLogger`: appends entries to the log file and reads them back.
//! - `generate_diff`: human-readable summary of the changed fields.
//!
//! # Example
//!
//! ```rust,ignore
//! use budget_planner::audit::{AuditEntry, AuditLogger, EntityType, generate_diff};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! let diff = generate_diff(&before_json, &after_json);
//! let entry = AuditEntry::update(
//!     EntityType::Draft,
//!     draft.id.to_string(),
//!     Some(draft.name.clone()),
//!     &before,
//!     &draft,
//!     diff,
//! );
//! logger.log(&entry)?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::{generate_detailed_diff, generate_diff};
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
