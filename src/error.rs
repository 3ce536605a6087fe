//! Crate-wide error type.

use crate::model::{ProductId, SourceId, TaskId};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Source,
    Product,
    Task,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Source => "source",
            EntityKind::Product => "product",
            EntityKind::Task => "task",
        })
    }
}

/// One inconsistency found while building the graph from a template.
///
/// `origin` names the template row, e.g. `tasks[3]` or
/// `per_association[1] (CRM -> 1042)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildProblem {
    #[error("{origin}: duplicate task id '{task}' (first defined at {first})")]
    DuplicateTask {
        origin: String,
        task: TaskId,
        first: String,
    },

    #[error("{origin}: task '{task}' references unknown source '{source_id}'")]
    UnknownSource {
        origin: String,
        task: TaskId,
        source_id: SourceId,
    },

    #[error("{origin}: task '{task}' references unknown product '{product_id}'")]
    UnknownProduct {
        origin: String,
        task: TaskId,
        product_id: ProductId,
    },

    #[error("{origin}: task '{task}' depends on unknown task '{dependency}'")]
    UnknownDependency {
        origin: String,
        task: TaskId,
        dependency: TaskId,
    },

    #[error("{origin}: dependency cycle involving task '{task}'")]
    DependencyCycle { origin: String, task: TaskId },
}

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("task template rejected ({} problem(s)):\n{}", .0.len(), join_problems(.0))]
    InvalidTemplate(Vec<BuildProblem>),

    #[error("{kind} '{id}' not found")]
    NotFound { kind: EntityKind, id: String },

    #[error("{path}:{line}: {message}")]
    Row {
        path: String,
        line: usize,
        message: String,
    },

    #[error("{path}: missing required column '{column}'")]
    MissingColumn { path: String, column: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid task template {path}: {source}")]
    Template {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("no {0} input given (use --{0} or [inputs].{0})")]
    MissingInput(String),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to encode report data: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write output: {0}")]
    Write(#[from] std::io::Error),
}

impl PlanError {
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        PlanError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Build problems carried by an `InvalidTemplate` error, empty otherwise.
    pub fn problems(&self) -> &[BuildProblem] {
        match self {
            PlanError::InvalidTemplate(problems) => problems,
            _ => &[],
        }
    }
}

fn join_problems(problems: &[BuildProblem]) -> String {
    problems
        .iter()
        .map(|p| format!("  - {p}"))
        .collect::<Vec<_>>()
        .join("\n")
}
