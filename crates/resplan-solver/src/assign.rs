//! Greedy first-fit resource assignment
//!
//! Single pass over the row set, no retries:
//!
//! 1. Partition rows into assigned / unassigned
//! 2. Backfill dates for assigned rows missing a start or end
//! 3. Order unassigned rows by declared hours, descending (stable)
//! 4. For each, pick the first resource in catalog order that is under
//!    capacity and has no overlapping task
//!
//! Output rows keep input order. Rows that cannot be resolved are returned
//! as they came in.

use resplan_core::{
    row::ensure_output_columns, Assignment, AssignError, AssignmentStats, Calendar, CatalogKey,
    DateSpan, HolidaySet, Level, PlanConfig, Planner, Resource, ResourceCatalog, ResourcePool,
    ResourceRole, Row, Task,
};
use tracing::{debug, info, trace};

use crate::conflict::has_conflict;
use crate::dates::compute_dates;

/// Switches that change how unplaceable rows are handled
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssignOptions {
    /// Create `Senior_NN` consultants for rows no catalog resource can take
    pub overflow_consultants: bool,
}

/// Outcome for a single unassigned row
#[derive(Debug, Clone, PartialEq, Eq)]
enum RowOutcome {
    Assigned { resource: String, span: DateSpan },
    NoBaseDate,
    NoDates,
    NoResource,
}

/// Greedy first-fit assigner over a static catalog
pub struct GreedyAssigner<'a> {
    plan: &'a PlanConfig,
    calendar: &'a Calendar,
    catalog: &'a ResourceCatalog,
    options: AssignOptions,
}

impl<'a> GreedyAssigner<'a> {
    pub fn new(plan: &'a PlanConfig, calendar: &'a Calendar, catalog: &'a ResourceCatalog) -> Self {
        Self {
            plan,
            calendar,
            catalog,
            options: AssignOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AssignOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the assignment over `rows`
    pub fn assign(&self, rows: &[Row]) -> Result<Assignment, AssignError> {
        if rows.is_empty() {
            return Err(AssignError::EmptyInput);
        }

        let mut tasks: Vec<Task> = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| Task::from_row(idx, row, self.plan))
            .collect();
        let mut dirty = vec![false; tasks.len()];
        let mut stats = AssignmentStats::default();

        for task in tasks.iter_mut().filter(|t| t.is_assigned()) {
            stats.already_assigned += 1;
            if task.start.is_some() && task.end.is_some() {
                continue;
            }
            if let Some(span) = compute_dates(self.calendar, task.base_date, task.scheduling_hours()) {
                trace!(row = task.index, %span, "backfilled dates");
                task.set_span(span);
                dirty[task.index] = true;
                stats.backfilled += 1;
            }
        }

        let mut queue: Vec<usize> = tasks
            .iter()
            .filter(|t| !t.is_assigned())
            .map(|t| t.index)
            .collect();
        // sort_by is stable: equal hours keep input order
        queue.sort_by(|a, b| tasks[*b].priority_hours().total_cmp(&tasks[*a].priority_hours()));

        let mut overflow = ResourcePool::new();
        for idx in queue {
            match self.place(&tasks[idx], &tasks, &mut overflow, &mut stats) {
                RowOutcome::Assigned { resource, span } => {
                    debug!(row = idx, resource = %resource, %span, "assigned");
                    let task = &mut tasks[idx];
                    task.resource = Some(resource);
                    task.set_span(span);
                    dirty[idx] = true;
                    stats.newly_assigned += 1;
                }
                RowOutcome::NoBaseDate => {
                    debug!(row = idx, "left unassigned: no base date");
                    stats.skipped_no_base_date += 1;
                }
                RowOutcome::NoDates => {
                    debug!(row = idx, "left unassigned: dates not computable");
                    stats.skipped_no_dates += 1;
                }
                RowOutcome::NoResource => {
                    debug!(row = idx, "left unassigned: no free resource");
                    stats.unassigned_no_resource += 1;
                }
            }
        }

        let mut out = rows.to_vec();
        for (row, task) in out.iter_mut().zip(&tasks) {
            ensure_output_columns(row, self.plan);
            if dirty[task.index] {
                task.write_to(row, self.plan);
            }
        }

        info!(
            rows = rows.len(),
            already_assigned = stats.already_assigned,
            backfilled = stats.backfilled,
            newly_assigned = stats.newly_assigned,
            still_unassigned = stats.still_unassigned(),
            "assignment finished"
        );

        Ok(Assignment { rows: out, stats })
    }

    /// Candidate pool for a row, in first-fit order
    pub fn candidates(&self, task: &Task) -> &'a ResourcePool {
        if self.plan.use_group_based_assignment {
            if let Some(group) = task.group.as_deref() {
                return self.catalog.resources_for(CatalogKey::Group(group));
            }
        }
        match self.plan.role() {
            ResourceRole::Developer => self.catalog.resources_for(CatalogKey::AllDevelopers),
            ResourceRole::Tester => self.catalog.resources_for(CatalogKey::Testers),
        }
    }

    fn place(
        &self,
        task: &Task,
        tasks: &[Task],
        overflow: &mut ResourcePool,
        stats: &mut AssignmentStats,
    ) -> RowOutcome {
        if task.base_date.is_none() {
            return RowOutcome::NoBaseDate;
        }
        // Dates do not depend on the resource; a row without dates is skipped outright.
        let Some(span) = compute_dates(self.calendar, task.base_date, task.scheduling_hours()) else {
            return RowOutcome::NoDates;
        };

        let chosen = self
            .candidates(task)
            .iter()
            .chain(overflow.iter())
            .find(|resource| is_available(resource, span, tasks))
            .map(|resource| resource.name.clone());

        if let Some(resource) = chosen {
            return RowOutcome::Assigned { resource, span };
        }

        if self.options.overflow_consultants {
            let consultant = overflow_consultant(overflow.len() + 1);
            debug!(resource = %consultant.name, "created overflow consultant");
            let resource = consultant.name.clone();
            overflow.upsert(consultant);
            stats.overflow_created += 1;
            return RowOutcome::Assigned { resource, span };
        }

        RowOutcome::NoResource
    }
}

impl Planner for GreedyAssigner<'_> {
    fn plan(&self, rows: &[Row]) -> Result<Assignment, AssignError> {
        self.assign(rows)
    }
}

/// Under capacity and free over `span`, counting every task currently bound to it
fn is_available(resource: &Resource, span: DateSpan, tasks: &[Task]) -> bool {
    let bound: Vec<&Task> = tasks.iter().filter(|t| t.is_bound_to(&resource.name)).collect();
    if bound.len() >= resource.max_tasks as usize {
        trace!(resource = %resource.name, load = bound.len(), "at capacity");
        return false;
    }
    !has_conflict(span, bound)
}

fn overflow_consultant(n: usize) -> Resource {
    Resource::new(format!("Senior_{:02}", n), Level::Senior)
}

/// Assign resources over `rows` with the default options.
///
/// Returns the full row set in input order.
pub fn compute_assignments(
    rows: &[Row],
    plan: &PlanConfig,
    holidays: &HolidaySet,
    catalog: &ResourceCatalog,
) -> Result<Vec<Row>, AssignError> {
    let calendar = Calendar::new(holidays.clone());
    GreedyAssigner::new(plan, &calendar, catalog)
        .assign(rows)
        .map(|assignment| assignment.rows)
}
