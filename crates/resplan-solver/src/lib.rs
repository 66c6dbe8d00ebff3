//! # resplan-solver
//!
//! Date calculation and greedy resource assignment over task rows.
//!
//! This crate provides:
//! - Working-date calculation (`compute_dates`)
//! - Inclusive overlap detection against a resource's tasks
//! - First-fit assignment with capacity limits (`GreedyAssigner`)
//! - Per-resource workload summaries
//!
//! ## Example
//!
//! ```rust
//! use resplan_core::{rows_from_json, PlanConfig, PlannerConfig};
//! use resplan_solver::GreedyAssigner;
//! use serde_json::json;
//!
//! let config = PlannerConfig::builtin().unwrap();
//! let plan = PlanConfig::default();
//! let calendar = config.calendar();
//! let rows = rows_from_json(json!([
//!     { "abapDevelopmentTime": 8, "effortReadyDate": "2025-03-01", "grupo_dev": "ERP" }
//! ]))
//! .unwrap();
//!
//! let result = GreedyAssigner::new(&plan, &calendar, &config.catalog)
//!     .assign(&rows)
//!     .unwrap();
//! assert_eq!(result.rows[0]["plannedAbapDevStart"], "2025-03-03");
//! assert_eq!(result.stats.newly_assigned, 1);
//! ```

pub mod assign;
pub mod conflict;
pub mod dates;
pub mod summary;

pub use assign::{compute_assignments, AssignOptions, GreedyAssigner};
pub use conflict::has_conflict;
pub use dates::{
    add_working_days, compute_dates, count_working_days, working_days_for, HOURS_PER_DAY,
    MAX_WORKING_DAYS,
};
pub use summary::{summarize, ResourceSummary};
