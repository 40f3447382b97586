//! Configuration module for budget-planner
//!
//! This module provides configuration management including:
//! - Data directory resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::PlannerPaths;
pub use settings::Settings;
