//! Dashboard snapshot: histograms and the task table in one serializable value.

use crate::aggregate::{ProductSummary, SourceSummary};
use crate::model::{PlanningGraph, Status, StatusCounts};
use crate::view::export::{ExportRow, export_rows};
use crate::view::graph::ready_tasks;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusLegend {
    pub status: Status,
    pub label: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardData {
    pub legend: Vec<StatusLegend>,
    pub overall: StatusCounts,
    pub overall_status: Status,
    pub products: Vec<ProductSummary>,
    pub sources: Vec<SourceSummary>,
    pub rows: Vec<ExportRow>,
    pub ready: Vec<String>,
}

pub fn dashboard(graph: &PlanningGraph) -> DashboardData {
    let summaries = graph.summaries();
    DashboardData {
        legend: Status::ALL
            .iter()
            .map(|&status| StatusLegend {
                status,
                label: status.label(),
                color: status.color(),
            })
            .collect(),
        overall: summaries.overall.clone(),
        overall_status: summaries.overall_status,
        products: summaries.products.clone(),
        sources: summaries.sources.clone(),
        rows: export_rows(graph),
        ready: ready_tasks(graph).iter().map(|t| t.id.to_string()).collect(),
    }
}
