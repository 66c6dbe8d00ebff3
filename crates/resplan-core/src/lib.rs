//! # resplan-core
//!
//! Core domain model for the resplan assignment engine.
//!
//! This crate provides:
//! - Calendar types: `Calendar`, `HolidaySet`, `DateSpan`
//! - Resource catalogs: `Resource`, `ResourcePool`, `ResourceCatalog`
//! - Plan configuration: `PlanType`, `PlanConfig`
//! - The row boundary: `Row`, `Task` and the canonical unassigned predicate
//! - Configuration loading (`PlannerConfig`)
//! - The `Planner` trait, assignment results and error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use resplan_core::{Calendar, HolidaySet};
//!
//! let mut holidays = HolidaySet::new();
//! holidays.insert(NaiveDate::from_ymd_opt(2025, 7, 28).unwrap(), "Independence Day");
//! let calendar = Calendar::new(holidays);
//!
//! assert!(!calendar.is_working_day(NaiveDate::from_ymd_opt(2025, 7, 28).unwrap()));
//! assert!(calendar.is_working_day(NaiveDate::from_ymd_opt(2025, 7, 30).unwrap()));
//! ```

pub mod calendar;
pub mod catalog;
pub mod config;
pub mod plan;
pub mod row;

pub use calendar::{Calendar, HolidaySet};
pub use catalog::{CatalogKey, Level, Resource, ResourceCatalog, ResourcePool, DEFAULT_MAX_TASKS};
pub use config::PlannerConfig;
pub use plan::{PlanConfig, PlanConfigPatch, PlanType, ResourceRole};
pub use row::{is_unassigned_value, resource_of, rows_from_json, Row, Task, DEFAULT_TASK_HOURS};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Unique name of a resource within a catalog
pub type ResourceName = String;

/// Name of a technical group (e.g. "GRID", "ERP")
pub type GroupName = String;

// ============================================================================
// Date Span
// ============================================================================

/// Inclusive range of calendar dates occupied by a task.
///
/// Spans built with `new` are ordered; spans read back from row cells keep
/// whatever order the cells had.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    /// Create a span. An `end` before `start` is clamped to `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Inclusive overlap test (`s1 <= e2 && e1 >= s2`): touching boundaries overlap.
    ///
    /// Compares the fields as given, so a reversed span read from cells is
    /// tested without reordering.
    pub fn overlaps(&self, other: &DateSpan) -> bool {
        self.start <= other.end && self.end >= other.start
    }
}

impl std::fmt::Display for DateSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

// ============================================================================
// Assignment Results
// ============================================================================

/// Counters describing what one assignment run did to the row set
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentStats {
    /// Rows that already carried a resource
    pub already_assigned: usize,
    /// Already-assigned rows whose missing dates were filled in
    pub backfilled: usize,
    /// Rows bound to a resource during this run
    pub newly_assigned: usize,
    /// Unassigned rows without a usable base date
    pub skipped_no_base_date: usize,
    /// Unassigned rows whose dates could not be computed (non-positive hours)
    pub skipped_no_dates: usize,
    /// Unassigned rows for which every candidate was full or conflicting
    pub unassigned_no_resource: usize,
    /// Overflow consultants created during the run
    pub overflow_created: usize,
}

impl AssignmentStats {
    /// Rows that are still unassigned after the run
    pub fn still_unassigned(&self) -> usize {
        self.skipped_no_base_date + self.skipped_no_dates + self.unassigned_no_resource
    }
}

/// Output of a planner run: the full row set in input order plus counters
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub rows: Vec<Row>,
    pub stats: AssignmentStats,
}

// ============================================================================
// Traits
// ============================================================================

/// Anything that can assign resources and dates to a row set
pub trait Planner {
    /// Assign resources to the unassigned rows and fill in missing dates.
    ///
    /// Fails only on structurally invalid input (an empty row set);
    /// rows that cannot be resolved are returned unchanged.
    fn plan(&self, rows: &[Row]) -> Result<Assignment, AssignError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Input-shape errors that reject a whole assignment call
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssignError {
    #[error("No rows to assign")]
    EmptyInput,

    #[error("Expected a sequence of rows, found {0}")]
    NotASequence(String),

    #[error("Row {index} is not a record")]
    RowNotAnObject { index: usize },
}

/// Configuration errors, raised when a planner configuration is loaded
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Resource '{resource}' in '{pool}' has no level")]
    MissingLevel { pool: String, resource: String },

    #[error("Resource '{resource}' in '{pool}' has unknown level '{level}'")]
    UnknownLevel {
        pool: String,
        resource: String,
        level: String,
    },

    #[error("Resource '{resource}' in '{pool}' has invalid capacity {max_tasks} (must be a positive integer)")]
    InvalidCapacity {
        pool: String,
        resource: String,
        max_tasks: i64,
    },

    #[error("Resource '{resource}' appears twice in '{pool}'")]
    DuplicateResource { pool: String, resource: String },

    #[error("Group '{0}' is defined more than once")]
    DuplicateGroup(String),

    #[error("Invalid holiday date '{0}' (expected YYYY-MM-DD)")]
    InvalidHolidayDate(String),

    #[error("Unknown plan type: {0}")]
    UnknownPlanType(String),

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
