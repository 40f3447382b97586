//! budget-planner - Hierarchical budget drafting and budget list aggregation
//!
//! This library provides the core functionality of the budget-planner
//! application: drafting a budget as a tree of line items, sizing it against
//! a parent budget with soft and hard contingencies, validating the
//! allocation, and aggregating and sorting the resulting budget list.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (line item trees, drafts, budget rows)
//! - `services`: Sizing, validation, submission and list aggregation
//! - `storage`: JSON file storage layer
//! - `audit`: Audit logging system
//! - `display`: Terminal formatting
//! - `export`: CSV, JSON and YAML export
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use budget_planner::config::{paths::PlannerPaths, settings::Settings};
//!
//! let paths = PlannerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::PlannerError;
