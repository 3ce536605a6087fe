//! View projections over a [`PlanningGraph`](crate::model::PlanningGraph).
//!
//! Every function here is a pure read of current graph state.

pub mod dashboard;
pub mod export;
pub mod graph;

pub use dashboard::{DashboardData, StatusLegend, dashboard};
pub use export::{EXPORT_COLUMNS, ExportRow, export_rows, rows_with_status};
pub use graph::{
    EdgeKind, EdgeView, GraphView, NodeKind, NodeView, full_graph, product_source_overview,
    product_subgraph, ready_tasks, source_subgraph, template_graph,
};
