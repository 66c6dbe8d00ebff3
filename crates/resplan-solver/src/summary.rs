//! Per-resource workload summary over an assigned row set

use resplan_core::{PlanConfig, Row, Task};
use serde::{Deserialize, Serialize};

/// Workload of one resource
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceSummary {
    pub resource: String,
    pub task_count: usize,
    pub total_hours: f64,
    /// Mean hours per task, rounded to 2 decimals
    pub mean_hours: f64,
}

/// Group assigned rows by resource, in order of first appearance.
///
/// Unassigned rows are left out; rows without hours count as zero hours.
pub fn summarize(rows: &[Row], plan: &PlanConfig) -> Vec<ResourceSummary> {
    let mut out: Vec<ResourceSummary> = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        let task = Task::from_row(idx, row, plan);
        let Some(resource) = task.resource.as_deref() else {
            continue;
        };
        let hours = task.priority_hours();
        match out.iter_mut().find(|s| s.resource == resource) {
            Some(entry) => {
                entry.task_count += 1;
                entry.total_hours += hours;
            }
            None => out.push(ResourceSummary {
                resource: resource.to_string(),
                task_count: 1,
                total_hours: hours,
                mean_hours: 0.0,
            }),
        }
    }

    for entry in &mut out {
        entry.mean_hours = round2(entry.total_hours / entry.task_count as f64);
    }
    out
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn groups_by_resource_in_first_appearance_order() {
        let rows = resplan_core::rows_from_json(json!([
            { "abapAssigned": "bruno", "abapDevelopmentTime": 10 },
            { "abapAssigned": "ana", "abapDevelopmentTime": "5" },
            { "abapAssigned": "nan", "abapDevelopmentTime": 99 },
            { "abapAssigned": "bruno", "abapDevelopmentTime": 10 },
            { "abapAssigned": "bruno" },
        ]))
        .unwrap();

        let summary = summarize(&rows, &PlanConfig::default());
        assert_eq!(
            summary,
            vec![
                ResourceSummary {
                    resource: "bruno".into(),
                    task_count: 3,
                    total_hours: 20.0,
                    mean_hours: 6.67,
                },
                ResourceSummary {
                    resource: "ana".into(),
                    task_count: 1,
                    total_hours: 5.0,
                    mean_hours: 5.0,
                },
            ]
        );
    }

    #[test]
    fn nothing_assigned_gives_empty_summary() {
        let rows = resplan_core::rows_from_json(json!([{ "abapAssigned": "" }])).unwrap();
        assert!(summarize(&rows, &PlanConfig::default()).is_empty());
    }
}
