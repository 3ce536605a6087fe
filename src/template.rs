//! Task template: the list of migration tasks the graph is built from.
//!
//! JSON shape (both sections optional):
//! {
//!   "tasks": [
//!     { "task_id": "T1", "source_id": "CRM", "product_id": "1042",
//!       "category": "extract", "depends_on": [] }
//!   ],
//!   "per_association": [
//!     { "id": "load", "category": "PRODUCT", "depends_on": ["extract"] }
//!   ]
//! }
//!
//! `per_association` entries are stamped out once per (source, product)
//! association with ids `"{source}_{product}_{id}"`. A bare JSON array is read
//! as a list of `per_association` entries, which is the layout of the older
//! `tasks.json` files (`id_task`, `type_task`, `depends_on`). Unknown top-level
//! keys in the full layout are rejected.

use crate::model::{ProductId, SourceId, TaskId};
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskTemplate {
    #[serde(default)]
    pub tasks: Vec<TemplateTask>,

    #[serde(default)]
    pub per_association: Vec<GenericTask>,
}

/// A concrete task bound to one source and one product.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TemplateTask {
    #[serde(alias = "id_task")]
    pub task_id: TaskId,
    pub source_id: SourceId,
    pub product_id: ProductId,

    #[serde(default, alias = "type_task")]
    pub category: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub depends_on: Vec<TaskId>,
}

/// A task repeated for every source/product association.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenericTask {
    #[serde(alias = "id_task")]
    pub id: String,

    #[serde(default, alias = "type_task")]
    pub category: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Ids of other `per_association` entries.
    #[serde(default)]
    pub depends_on: Vec<String>,
}

impl TaskTemplate {
    /// Parse either layout. The first significant character decides which:
    /// `[` is the older bare list of generic tasks, anything else the full
    /// document. Serde errors keep their field name and line.
    pub fn from_json(text: &str) -> serde_json::Result<TaskTemplate> {
        if text.trim_start().starts_with('[') {
            let per_association: Vec<GenericTask> = serde_json::from_str(text)?;
            Ok(TaskTemplate {
                tasks: Vec::new(),
                per_association,
            })
        } else {
            serde_json::from_str(text)
        }
    }
}

/// One flattened template row, ready for validation by the builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    pub origin: String,
    pub task_id: TaskId,
    pub source_id: SourceId,
    pub product_id: ProductId,
    pub category: String,
    pub description: Option<String>,
    pub depends_on: Vec<TaskId>,
}

impl TaskTemplate {
    /// Flatten explicit tasks and expand generic ones over `associations`.
    ///
    /// Order: explicit tasks, then for each association every generic entry.
    /// Generic dependencies that do not name another generic entry are kept
    /// verbatim so the builder reports them as unknown.
    pub fn entries(&self, associations: &[(SourceId, ProductId)]) -> Vec<TemplateEntry> {
        let mut out = Vec::with_capacity(
            self.tasks.len() + associations.len() * self.per_association.len(),
        );

        for (i, t) in self.tasks.iter().enumerate() {
            out.push(TemplateEntry {
                origin: format!("tasks[{i}]"),
                task_id: t.task_id.clone(),
                source_id: t.source_id.clone(),
                product_id: t.product_id.clone(),
                category: t.category.clone(),
                description: t.description.clone(),
                depends_on: t.depends_on.clone(),
            });
        }

        for (source, product) in associations {
            let stamp = |id: &str| TaskId::new(format!("{source}_{product}_{id}"));
            for (i, g) in self.per_association.iter().enumerate() {
                let depends_on = g
                    .depends_on
                    .iter()
                    .map(|dep| {
                        if self.per_association.iter().any(|o| &o.id == dep) {
                            stamp(dep)
                        } else {
                            TaskId::new(dep.clone())
                        }
                    })
                    .collect();
                out.push(TemplateEntry {
                    origin: format!("per_association[{i}] ({source} -> {product})"),
                    task_id: stamp(&g.id),
                    source_id: source.clone(),
                    product_id: product.clone(),
                    category: g.category.clone(),
                    description: g.description.clone(),
                    depends_on,
                });
            }
        }

        out
    }
}
