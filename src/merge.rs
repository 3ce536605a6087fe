//! Status merger: folds status records into the planning graph.

use crate::model::{PlanningGraph, Status, StatusRecord, TaskId, UpdateMarker};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// A status record whose task id is not in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrphanedUpdate {
    /// Zero-based position of the record in the merged batch.
    pub position: usize,
    pub record: StatusRecord,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Records applied to an existing task (including no-op overwrites).
    pub applied: usize,
    /// Tasks whose status differs from before the batch, in first-touch order.
    pub changed: Vec<TaskId>,
    pub orphans: Vec<OrphanedUpdate>,
}

impl MergeReport {
    pub fn orphan_ids(&self) -> Vec<&TaskId> {
        self.orphans.iter().map(|o| &o.record.task).collect()
    }
}

/// Apply `records` in order; the last record for a task wins.
///
/// Records for unknown tasks are collected as orphans and never abort the
/// batch. All summaries are recomputed afterwards.
pub fn merge_statuses(
    graph: &mut PlanningGraph,
    records: impl IntoIterator<Item = StatusRecord>,
) -> MergeReport {
    let mut report = MergeReport::default();
    let mut before: HashMap<TaskId, Status> = HashMap::new();
    let mut touched: Vec<TaskId> = Vec::new();

    for (position, record) in records.into_iter().enumerate() {
        match graph.task_mut(record.task.as_str()) {
            Some(task) => {
                if !before.contains_key(&task.id) {
                    before.insert(task.id.clone(), task.status);
                    touched.push(task.id.clone());
                }
                debug!(task = %task.id, from = %task.status, to = %record.status, "status update");
                task.status = record.status;
                task.last_update = Some(UpdateMarker {
                    updated: record.updated,
                    note: record.note,
                });
                report.applied += 1;
            }
            None => {
                warn!(task = %record.task, position, "status update for unknown task");
                report.orphans.push(OrphanedUpdate { position, record });
            }
        }
    }

    report.changed = touched
        .into_iter()
        .filter(|id| {
            graph
                .get_task(id.as_str())
                .map(|t| before.get(id) != Some(&t.status))
                .unwrap_or(false)
        })
        .collect();

    graph.refresh_summaries();

    info!(
        applied = report.applied,
        changed = report.changed.len(),
        orphans = report.orphans.len(),
        "merged status batch"
    );
    report
}
