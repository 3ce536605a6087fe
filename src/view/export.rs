//! Flat export rows, one per task in template order.

use crate::model::{PlanningGraph, Status, Task};
use serde::Serialize;

pub const EXPORT_COLUMNS: [&str; 7] = [
    "task_id",
    "source_id",
    "source_name",
    "product_id",
    "product_name",
    "category",
    "status",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub task_id: String,
    pub source_id: String,
    pub source_name: String,
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub status: Status,
}

impl ExportRow {
    /// Cell values in [`EXPORT_COLUMNS`] order.
    pub fn cells(&self) -> [&str; 7] {
        [
            self.task_id.as_str(),
            self.source_id.as_str(),
            self.source_name.as_str(),
            self.product_id.as_str(),
            self.product_name.as_str(),
            self.category.as_str(),
            self.status.as_str(),
        ]
    }
}

pub fn export_rows(graph: &PlanningGraph) -> Vec<ExportRow> {
    graph.tasks().iter().map(|t| row(graph, t)).collect()
}

/// Export rows whose status is one of `statuses`, in template order.
///
/// Backs `planreport export --only`; the dashboard filters the same rows
/// client-side.
pub fn rows_with_status(graph: &PlanningGraph, statuses: &[Status]) -> Vec<ExportRow> {
    graph
        .tasks()
        .iter()
        .filter(|t| statuses.contains(&t.status))
        .map(|t| row(graph, t))
        .collect()
}

fn row(graph: &PlanningGraph, t: &Task) -> ExportRow {
    // Tasks always resolve; the builder rejects graphs where they would not.
    let source_name = graph
        .get_source(t.source.as_str())
        .map(|s| s.name.clone())
        .unwrap_or_default();
    let product_name = graph
        .get_product(t.product.as_str())
        .map(|p| p.name.clone())
        .unwrap_or_default();
    ExportRow {
        task_id: t.id.to_string(),
        source_id: t.source.to_string(),
        source_name,
        product_id: t.product.to_string(),
        product_name,
        category: t.category.clone(),
        status: t.status,
    }
}
