//! Entity model: sources, products, tasks and the planning graph linking them.
//!
//! [`PlanningGraph`] is the context object every stage works on. The builder
//! creates it, the merger mutates task statuses through it, and the projector
//! reads from it. Summaries live on the graph and are rebuilt whenever a
//! status changes, so readers never see a stale roll-up.

pub mod ids;
pub mod status;

pub use ids::{ProductId, SourceId, TaskId};
pub use status::{Status, StatusCounts};

use crate::Result;
use crate::aggregate::{self, ProductSummary, SourceSummary, Summaries};
use crate::error::{EntityKind, PlanError};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    pub id: SourceId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Free-text lifecycle label from the product sheet, informational only.
    pub lifecycle: Option<String>,
    /// Associated sources, in association-row order.
    pub sources: Vec<SourceId>,
}

/// Where the current status of a task came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateMarker {
    pub updated: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: TaskId,
    pub source: SourceId,
    pub product: ProductId,
    pub category: String,
    pub description: Option<String>,
    /// Tasks that must be complete before this one can start.
    pub depends_on: Vec<TaskId>,
    pub status: Status,
    /// None until a status record touches the task.
    pub last_update: Option<UpdateMarker>,
}

/// A single incoming status update. Folded into its task by the merger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub task: TaskId,
    pub status: Status,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
}

impl StatusRecord {
    pub fn new(task: impl Into<TaskId>, status: Status) -> Self {
        Self {
            task: task.into(),
            status,
            note: None,
            updated: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanningGraph {
    sources: Vec<Source>,
    products: Vec<Product>,
    tasks: Vec<Task>,
    associations: Vec<(SourceId, ProductId)>,

    source_index: HashMap<SourceId, usize>,
    product_index: HashMap<ProductId, usize>,
    task_index: HashMap<TaskId, usize>,

    /// Task positions per source / product, in template order.
    tasks_by_source: HashMap<SourceId, Vec<usize>>,
    tasks_by_product: HashMap<ProductId, Vec<usize>>,

    summaries: Summaries,
}

impl PlanningGraph {
    /// Assemble a graph from already-validated parts.
    ///
    /// Callers (the builder) guarantee unique ids and that every task
    /// references an existing source and product.
    pub(crate) fn from_parts(
        sources: Vec<Source>,
        products: Vec<Product>,
        associations: Vec<(SourceId, ProductId)>,
        tasks: Vec<Task>,
    ) -> Self {
        let source_index = sources
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();
        let product_index = products
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();

        let mut task_index = HashMap::new();
        let mut tasks_by_source: HashMap<SourceId, Vec<usize>> = HashMap::new();
        let mut tasks_by_product: HashMap<ProductId, Vec<usize>> = HashMap::new();
        for (i, task) in tasks.iter().enumerate() {
            task_index.insert(task.id.clone(), i);
            tasks_by_source.entry(task.source.clone()).or_default().push(i);
            tasks_by_product
                .entry(task.product.clone())
                .or_default()
                .push(i);
        }

        let mut graph = Self {
            sources,
            products,
            tasks,
            associations,
            source_index,
            product_index,
            task_index,
            tasks_by_source,
            tasks_by_product,
            summaries: Summaries::default(),
        };
        graph.refresh_summaries();
        graph
    }

    pub fn get_source(&self, id: &str) -> Result<&Source> {
        self.source_index
            .get(id)
            .map(|&i| &self.sources[i])
            .ok_or_else(|| PlanError::not_found(EntityKind::Source, id))
    }

    pub fn get_product(&self, id: &str) -> Result<&Product> {
        self.product_index
            .get(id)
            .map(|&i| &self.products[i])
            .ok_or_else(|| PlanError::not_found(EntityKind::Product, id))
    }

    pub fn get_task(&self, id: &str) -> Result<&Task> {
        self.task_index
            .get(id)
            .map(|&i| &self.tasks[i])
            .ok_or_else(|| PlanError::not_found(EntityKind::Task, id))
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// All tasks in template order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Distinct (source, product) pairs from the association rows.
    pub fn associations(&self) -> &[(SourceId, ProductId)] {
        &self.associations
    }

    pub fn tasks_of_source(&self, id: &str) -> Result<Vec<&Task>> {
        self.get_source(id)?;
        Ok(self.indexed_tasks(self.tasks_by_source.get(id)))
    }

    pub fn tasks_of_product(&self, id: &str) -> Result<Vec<&Task>> {
        self.get_product(id)?;
        Ok(self.indexed_tasks(self.tasks_by_product.get(id)))
    }

    pub fn summaries(&self) -> &Summaries {
        &self.summaries
    }

    pub fn product_summary(&self, id: &str) -> Result<&ProductSummary> {
        self.product_index
            .get(id)
            .map(|&i| &self.summaries.products[i])
            .ok_or_else(|| PlanError::not_found(EntityKind::Product, id))
    }

    pub fn source_summary(&self, id: &str) -> Result<&SourceSummary> {
        self.source_index
            .get(id)
            .map(|&i| &self.summaries.sources[i])
            .ok_or_else(|| PlanError::not_found(EntityKind::Source, id))
    }

    pub(crate) fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        let i = *self.task_index.get(id)?;
        Some(&mut self.tasks[i])
    }

    /// Rebuild every product and source summary from current task statuses.
    pub(crate) fn refresh_summaries(&mut self) {
        self.summaries = aggregate::summarize(self);
    }

    fn indexed_tasks(&self, positions: Option<&Vec<usize>>) -> Vec<&Task> {
        positions
            .map(|ps| ps.iter().map(|&i| &self.tasks[i]).collect())
            .unwrap_or_default()
    }
}
