//! Graph views handed to the HTML renderer.
//!
//! Node keys are namespaced by kind (`source:CRM`, `task:T1`, `product:1042`)
//! because ids of different kinds may collide.

use crate::Result;
use crate::model::{PlanningGraph, Product, Source, Status, Task};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Source,
    Task,
    Product,
}

impl NodeKind {
    pub fn shape(self) -> &'static str {
        match self {
            NodeKind::Source => "database",
            NodeKind::Task => "square",
            NodeKind::Product => "hexagon",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            NodeKind::Source => "#fbed8f",
            NodeKind::Task => "#73c4e5",
            NodeKind::Product => "#8962ad",
        }
    }

    /// Layout column: sources left, tasks middle, products right.
    pub fn column(self) -> u8 {
        match self {
            NodeKind::Source => 0,
            NodeKind::Task => 1,
            NodeKind::Product => 2,
        }
    }

    fn key(self, id: &str) -> String {
        let prefix = match self {
            NodeKind::Source => "source",
            NodeKind::Task => "task",
            NodeKind::Product => "product",
        };
        format!("{prefix}:{id}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    SourceTask,
    TaskProduct,
    SourceProduct,
    TaskDependency,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeView {
    pub key: String,
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    /// Task status, or the roll-up for sources and products.
    pub status: Status,
    pub shape: &'static str,
    pub color: &'static str,
    pub status_color: &'static str,
    pub column: u8,
    pub ready: bool,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeView {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphView {
    pub title: String,
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
}

impl GraphView {
    pub fn node(&self, key: &str) -> Option<&NodeView> {
        self.nodes.iter().find(|n| n.key == key)
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &NodeView> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }
}

/// How statuses are reported in a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusMode {
    Current,
    /// Every status reads as `Unknown`; used for the pre-status template picture.
    Template,
}

/// Everything: sources, tasks, products with task edges and dependencies.
pub fn full_graph(graph: &PlanningGraph) -> GraphView {
    let sources: Vec<&Source> = graph.sources().iter().collect();
    let products: Vec<&Product> = graph.products().iter().collect();
    let tasks: Vec<&Task> = graph.tasks().iter().collect();
    project(graph, "Migration plan", &sources, &tasks, &products, StatusMode::Current)
}

/// Same structure as [`full_graph`], statuses ignored.
pub fn template_graph(graph: &PlanningGraph) -> GraphView {
    let sources: Vec<&Source> = graph.sources().iter().collect();
    let products: Vec<&Product> = graph.products().iter().collect();
    let tasks: Vec<&Task> = graph.tasks().iter().collect();
    project(graph, "Task template", &sources, &tasks, &products, StatusMode::Template)
}

/// A product, its sources and the tasks linking them.
pub fn product_subgraph(graph: &PlanningGraph, id: &str) -> Result<GraphView> {
    let product = graph.get_product(id)?;
    let tasks = graph.tasks_of_product(id)?;

    let wanted: HashSet<&str> = product
        .sources
        .iter()
        .map(|s| s.as_str())
        .chain(tasks.iter().map(|t| t.source.as_str()))
        .collect();
    let sources: Vec<&Source> = graph
        .sources()
        .iter()
        .filter(|s| wanted.contains(s.id.as_str()))
        .collect();

    Ok(project(
        graph,
        &format!("Product {} - {}", product.id, product.name),
        &sources,
        &tasks,
        &[product],
        StatusMode::Current,
    ))
}

/// A source, the products it feeds and the tasks linking them.
pub fn source_subgraph(graph: &PlanningGraph, id: &str) -> Result<GraphView> {
    let source = graph.get_source(id)?;
    let tasks = graph.tasks_of_source(id)?;

    let products: Vec<&Product> = graph
        .products()
        .iter()
        .filter(|p| {
            p.sources.iter().any(|s| s.as_str() == id)
                || tasks.iter().any(|t| t.product == p.id)
        })
        .collect();

    Ok(project(
        graph,
        &format!("Source {}", source.name),
        &[source],
        &tasks,
        &products,
        StatusMode::Current,
    ))
}

/// Products and sources only, linked by the association rows.
pub fn product_source_overview(graph: &PlanningGraph) -> GraphView {
    let mut nodes = Vec::new();
    for s in graph.sources() {
        nodes.push(source_node(graph, s, StatusMode::Current));
    }
    for p in graph.products() {
        nodes.push(product_node(graph, p, StatusMode::Current));
    }
    let edges = graph
        .associations()
        .iter()
        .map(|(s, p)| EdgeView {
            from: NodeKind::Source.key(s.as_str()),
            to: NodeKind::Product.key(p.as_str()),
            kind: EdgeKind::SourceProduct,
        })
        .collect();
    GraphView {
        title: "Products and sources".to_string(),
        nodes,
        edges,
    }
}

/// Tasks that can start now: not yet started (or unreported), with at least
/// one dependency and every dependency complete.
pub fn ready_tasks(graph: &PlanningGraph) -> Vec<&Task> {
    graph.tasks().iter().filter(|t| is_ready(graph, t)).collect()
}

fn is_ready(graph: &PlanningGraph, task: &Task) -> bool {
    matches!(task.status, Status::NotStarted | Status::Unknown)
        && !task.depends_on.is_empty()
        && task.depends_on.iter().all(|d| {
            graph
                .get_task(d.as_str())
                .map(|t| t.status == Status::Complete)
                .unwrap_or(false)
        })
}

fn project(
    graph: &PlanningGraph,
    title: &str,
    sources: &[&Source],
    tasks: &[&Task],
    products: &[&Product],
    mode: StatusMode,
) -> GraphView {
    let mut nodes = Vec::with_capacity(sources.len() + tasks.len() + products.len());
    let mut edges = Vec::new();

    for s in sources {
        nodes.push(source_node(graph, s, mode));
    }

    let included: HashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
    for t in tasks {
        nodes.push(task_node(graph, t, mode));

        let key = NodeKind::Task.key(t.id.as_str());
        edges.push(EdgeView {
            from: NodeKind::Source.key(t.source.as_str()),
            to: key.clone(),
            kind: EdgeKind::SourceTask,
        });
        edges.push(EdgeView {
            from: key.clone(),
            to: NodeKind::Product.key(t.product.as_str()),
            kind: EdgeKind::TaskProduct,
        });
        for dep in t.depends_on.iter().filter(|d| included.contains(d.as_str())) {
            edges.push(EdgeView {
                from: NodeKind::Task.key(dep.as_str()),
                to: key.clone(),
                kind: EdgeKind::TaskDependency,
            });
        }
    }

    for p in products {
        nodes.push(product_node(graph, p, mode));
    }

    GraphView {
        title: title.to_string(),
        nodes,
        edges,
    }
}

fn node(kind: NodeKind, id: &str, label: String, status: Status, ready: bool, tooltip: String) -> NodeView {
    NodeView {
        key: kind.key(id),
        id: id.to_string(),
        kind,
        label,
        status,
        shape: kind.shape(),
        color: kind.color(),
        status_color: if ready { "violet" } else { status.color() },
        column: kind.column(),
        ready,
        tooltip,
    }
}

fn source_node(graph: &PlanningGraph, s: &Source, mode: StatusMode) -> NodeView {
    let status = match mode {
        StatusMode::Template => Status::Unknown,
        StatusMode::Current => graph
            .source_summary(s.id.as_str())
            .map(|sum| sum.overall)
            .unwrap_or_default(),
    };
    node(
        NodeKind::Source,
        s.id.as_str(),
        s.name.clone(),
        status,
        false,
        format!("System: {}\nStatus: {}", s.name, status.label()),
    )
}

fn product_node(graph: &PlanningGraph, p: &Product, mode: StatusMode) -> NodeView {
    let status = match mode {
        StatusMode::Template => Status::Unknown,
        StatusMode::Current => graph
            .product_summary(p.id.as_str())
            .map(|sum| sum.overall)
            .unwrap_or_default(),
    };
    let mut tooltip = format!("ID: {}\nName: {}\nStatus: {}", p.id, p.name, status.label());
    if let Some(lifecycle) = &p.lifecycle {
        tooltip.push_str(&format!("\nLifecycle: {lifecycle}"));
    }
    node(NodeKind::Product, p.id.as_str(), p.name.clone(), status, false, tooltip)
}

fn task_node(graph: &PlanningGraph, t: &Task, mode: StatusMode) -> NodeView {
    let (status, ready) = match mode {
        StatusMode::Template => (Status::Unknown, false),
        StatusMode::Current => (t.status, is_ready(graph, t)),
    };
    let mut tooltip = format!("ID: {}\nType: {}", t.id, t.category);
    if let Some(desc) = &t.description {
        tooltip.push_str(&format!("\nDescription: {desc}"));
    }
    tooltip.push_str(&format!("\nStatus: {}", status.label()));
    if mode == StatusMode::Current {
        if let Some(note) = t.last_update.as_ref().and_then(|u| u.note.as_ref()) {
            tooltip.push_str(&format!("\nNote: {note}"));
        }
    }
    node(NodeKind::Task, t.id.as_str(), t.id.to_string(), status, ready, tooltip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::merge_statuses;
    use crate::model::StatusRecord;
    use crate::model::fixtures::small_graph;
    use pretty_assertions::assert_eq;

    fn keys(view: &GraphView, kind: NodeKind) -> Vec<&str> {
        view.nodes_of_kind(kind).map(|n| n.key.as_str()).collect()
    }

    #[test]
    fn full_graph_holds_everything() {
        let g = small_graph();
        let v = full_graph(&g);
        assert_eq!(v.nodes.len(), 7);
        // 2 edges per task + the T1 -> T2 dependency.
        assert_eq!(v.edges.len(), 7);
        assert!(v.edges.contains(&EdgeView {
            from: "task:T1".into(),
            to: "task:T2".into(),
            kind: EdgeKind::TaskDependency,
        }));
    }

    #[test]
    fn template_view_ignores_merged_status() {
        let mut g = small_graph();
        merge_statuses(&mut g, vec![StatusRecord::new("T1", Status::Complete)]);

        let current = full_graph(&g);
        assert_eq!(current.node("task:T1").unwrap().status, Status::Complete);

        let template = template_graph(&g);
        assert!(template.nodes.iter().all(|n| n.status == Status::Unknown));
        assert!(template.nodes.iter().all(|n| !n.ready));
        assert_eq!(template.edges, current.edges);
    }

    #[test]
    fn product_subgraph_keeps_linking_tasks() {
        let g = small_graph();
        let v = product_subgraph(&g, "P1").unwrap();
        assert_eq!(keys(&v, NodeKind::Product), vec!["product:P1"]);
        assert_eq!(keys(&v, NodeKind::Source), vec!["source:S1", "source:S2"]);
        assert_eq!(keys(&v, NodeKind::Task), vec!["task:T1", "task:T3"]);
        assert!(v.edges.iter().all(|e| e.kind != EdgeKind::TaskDependency));
    }

    #[test]
    fn source_subgraph_is_symmetric() {
        let g = small_graph();
        let v = source_subgraph(&g, "S1").unwrap();
        assert_eq!(keys(&v, NodeKind::Source), vec!["source:S1"]);
        assert_eq!(keys(&v, NodeKind::Task), vec!["task:T1", "task:T2"]);
        assert_eq!(keys(&v, NodeKind::Product), vec!["product:P1", "product:P2"]);
        assert_eq!(
            v.edges.iter().filter(|e| e.kind == EdgeKind::TaskDependency).count(),
            1
        );
    }

    #[test]
    fn unknown_subgraph_ids_are_not_found() {
        let g = small_graph();
        assert!(product_subgraph(&g, "P9").is_err());
        assert!(source_subgraph(&g, "S9").is_err());
    }

    #[test]
    fn ready_once_dependencies_complete() {
        let mut g = small_graph();
        assert!(ready_tasks(&g).is_empty());

        merge_statuses(&mut g, vec![StatusRecord::new("T1", Status::Complete)]);
        let ready: Vec<&str> = ready_tasks(&g).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ready, vec!["T2"]);
        let node = full_graph(&g).node("task:T2").cloned().unwrap();
        assert!(node.ready);
        assert_eq!(node.status_color, "violet");
    }

    #[test]
    fn overview_uses_association_edges() {
        let g = small_graph();
        let v = product_source_overview(&g);
        assert_eq!(v.nodes.len(), 4);
        assert_eq!(v.edges.len(), 3);
        assert!(v.edges.iter().all(|e| e.kind == EdgeKind::SourceProduct));
    }
}
