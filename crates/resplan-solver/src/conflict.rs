//! Conflict detection between a candidate span and a resource's current tasks

use resplan_core::{DateSpan, Task};

/// True if `candidate` overlaps any scheduled task in `existing`.
///
/// Overlap is inclusive (`s1 <= e2 && e1 >= s2`), evaluated on the existing
/// task's cells as written, even when its end precedes its start. Tasks
/// missing a start or an end date cannot conflict.
pub fn has_conflict<'a, I>(candidate: DateSpan, existing: I) -> bool
where
    I: IntoIterator<Item = &'a Task>,
{
    existing
        .into_iter()
        .filter_map(Task::span)
        .any(|span| candidate.overlaps(&span))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn span(from: (u32, u32), to: (u32, u32)) -> DateSpan {
        DateSpan::new(date(2025, from.0, from.1), date(2025, to.0, to.1))
    }

    fn scheduled(index: usize, s: DateSpan) -> Task {
        Task {
            index,
            resource: Some("dev".into()),
            start: Some(s.start),
            end: Some(s.end),
            ..Task::default()
        }
    }

    #[test]
    fn no_existing_tasks_no_conflict() {
        let existing: [Task; 0] = [];
        assert!(!has_conflict(span((3, 3), (3, 7)), &existing));
    }

    #[test]
    fn touching_boundaries_conflict() {
        let existing = [scheduled(0, span((3, 7), (3, 10)))];
        assert!(has_conflict(span((3, 3), (3, 7)), &existing));
        assert!(!has_conflict(span((3, 3), (3, 6)), &existing));
        assert!(!has_conflict(span((3, 11), (3, 12)), &existing));
    }

    #[test]
    fn containment_conflicts_both_ways() {
        let outer = span((3, 3), (3, 14));
        let inner = span((3, 5), (3, 6));
        assert!(has_conflict(outer, &[scheduled(0, inner)]));
        assert!(has_conflict(inner, &[scheduled(0, outer)]));
    }

    #[test]
    fn conflict_is_symmetric_and_reflexive() {
        let spans = [
            span((3, 3), (3, 5)),
            span((3, 5), (3, 9)),
            span((3, 10), (3, 10)),
            span((2, 20), (3, 31)),
        ];
        for a in spans {
            assert!(has_conflict(a, &[scheduled(0, a)]));
            for b in spans {
                assert_eq!(
                    has_conflict(a, &[scheduled(0, b)]),
                    has_conflict(b, &[scheduled(0, a)]),
                    "{} vs {}",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn unscheduled_tasks_are_ignored() {
        let candidate = span((3, 3), (3, 7));
        let only_start = Task {
            start: Some(date(2025, 3, 4)),
            ..Task::default()
        };
        let only_end = Task {
            end: Some(date(2025, 3, 4)),
            ..Task::default()
        };
        let neither = Task::default();
        assert!(!has_conflict(candidate, &[only_start, only_end, neither]));
    }

    #[test]
    fn reversed_existing_range_is_compared_as_written() {
        let reversed = Task {
            resource: Some("dev".into()),
            start: Some(date(2025, 3, 10)),
            end: Some(date(2025, 3, 5)),
            ..Task::default()
        };
        // 03-06 <= 03-05 fails, so no conflict
        assert!(!has_conflict(span((3, 6), (3, 10)), [&reversed]));
        // 03-03 <= 03-05 and 03-12 >= 03-10
        assert!(has_conflict(span((3, 3), (3, 12)), [&reversed]));
    }
}
