//! Row boundary
//!
//! Rows arrive as string-keyed records whose cells are loosely typed: the
//! resource cell may hold `""`, `"None"` or `"nan"` to mean "unassigned",
//! hours may be strings, dates come in several textual forms. This module is
//! the only place that looks at raw cells; everything past it works on
//! `Task`, where absence is an `Option`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

use crate::{AssignError, DateSpan, PlanConfig, ResourceName};

/// One record of the task sheet
pub type Row = Map<String, Value>;

/// Hours assumed for scheduling when a row declares none
pub const DEFAULT_TASK_HOURS: f64 = 8.0;

const UNASSIGNED_SENTINELS: [&str; 3] = ["", "None", "nan"];

/// True for the textual values that mean "no resource"
pub fn is_unassigned_value(value: &str) -> bool {
    UNASSIGNED_SENTINELS.contains(&value.trim())
}

/// Resource bound to a row, or `None` when the cell is absent, null or a sentinel
pub fn resource_of(row: &Row, plan: &PlanConfig) -> Option<ResourceName> {
    text_cell(row.get(&plan.resource_col)?).filter(|name| !is_unassigned_value(name))
}

/// Convert a decoded JSON document into rows
pub fn rows_from_json(value: Value) -> Result<Vec<Row>, AssignError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Null => return Err(AssignError::NotASequence("null".into())),
        Value::Bool(_) => return Err(AssignError::NotASequence("a boolean".into())),
        Value::Number(_) => return Err(AssignError::NotASequence("a number".into())),
        Value::String(_) => return Err(AssignError::NotASequence("a string".into())),
        Value::Object(_) => return Err(AssignError::NotASequence("an object".into())),
    };
    if items.is_empty() {
        return Err(AssignError::EmptyInput);
    }
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(row) => Ok(row),
            _ => Err(AssignError::RowNotAnObject { index }),
        })
        .collect()
}

/// Cell as text. Numbers are rendered, null and containers yield `None`.
pub fn text_cell(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Cell as a finite number of hours. Numeric strings with a comma decimal are accepted.
pub fn hours_cell(value: &Value) -> Option<f64> {
    let hours = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok()?,
        _ => return None,
    };
    hours.is_finite().then_some(hours)
}

/// Parse the date forms seen in task sheets
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(text, "%d/%m/%Y").ok()
}

/// Cell as a date; numbers and unparseable text yield `None`
pub fn date_cell(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_date(s),
        _ => None,
    }
}

/// Typed view of one row, as seen by the assignment engine
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Task {
    /// Position of the row in the input
    pub index: usize,
    pub resource: Option<ResourceName>,
    pub hours: Option<f64>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// Available date, falling back to the planned date
    pub base_date: Option<NaiveDate>,
    pub group: Option<String>,
}

impl Task {
    /// Read a row through a plan's column layout
    pub fn from_row(index: usize, row: &Row, plan: &PlanConfig) -> Self {
        let cell = |col: &str| row.get(col);
        let non_empty_text = |col: &str| cell(col).and_then(text_cell).filter(|s| !s.is_empty());

        // The first non-empty candidate is used even if it does not parse.
        let base_date = non_empty_text(plan.available_date_col.as_str())
            .or_else(|| non_empty_text(plan.plan_date_col.as_str()))
            .and_then(|text| parse_date(&text));

        Self {
            index,
            resource: resource_of(row, plan),
            hours: cell(plan.hours_col.as_str()).and_then(hours_cell),
            start: cell(plan.start_date_col.as_str()).and_then(date_cell),
            end: cell(plan.end_date_col.as_str()).and_then(date_cell),
            base_date,
            group: non_empty_text(plan.group_col.as_str()),
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.resource.is_some()
    }

    pub fn is_bound_to(&self, name: &str) -> bool {
        self.resource.as_deref() == Some(name)
    }

    /// Scheduled dates exactly as the cells hold them, when both ends are known.
    ///
    /// A reversed pair (end before start) is kept as is.
    pub fn span(&self) -> Option<DateSpan> {
        Some(DateSpan {
            start: self.start?,
            end: self.end?,
        })
    }

    /// Hours used to compute dates
    pub fn scheduling_hours(&self) -> f64 {
        self.hours.unwrap_or(DEFAULT_TASK_HOURS)
    }

    /// Hours used to order unassigned rows
    pub fn priority_hours(&self) -> f64 {
        self.hours.unwrap_or(0.0)
    }

    pub fn set_span(&mut self, span: DateSpan) {
        self.start = Some(span.start);
        self.end = Some(span.end);
    }

    /// Write resource and dates back into a row. Absent values leave cells untouched.
    pub fn write_to(&self, row: &mut Row, plan: &PlanConfig) {
        if let Some(resource) = &self.resource {
            row.insert(plan.resource_col.clone(), Value::String(resource.clone()));
        }
        if let Some(start) = self.start {
            row.insert(plan.start_date_col.clone(), date_value(start));
        }
        if let Some(end) = self.end {
            row.insert(plan.end_date_col.clone(), date_value(end));
        }
    }
}

fn date_value(date: NaiveDate) -> Value {
    Value::String(date.format("%Y-%m-%d").to_string())
}

/// Make sure a row carries the resource and date columns, as null when missing
pub fn ensure_output_columns(row: &mut Row, plan: &PlanConfig) {
    for col in [&plan.resource_col, &plan.start_date_col, &plan.end_date_col] {
        row.entry(col.clone()).or_insert(Value::Null);
    }
}
