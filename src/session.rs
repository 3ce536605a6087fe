//! A planning session: one graph plus the merge history of this run.
//!
//! The session is owned by whoever drives the run (the CLI, a test, a
//! dashboard process). It is not shared; callers that need concurrent access
//! must wrap it themselves.

use crate::Result;
use crate::build::{AssociationRow, build_graph};
use crate::config::Inputs;
use crate::load;
use crate::merge::{MergeReport, OrphanedUpdate, merge_statuses};
use crate::model::{PlanningGraph, StatusRecord};
use crate::template::TaskTemplate;

use tracing::info;

#[derive(Debug, Clone)]
pub struct PlanSession {
    graph: PlanningGraph,
    merges: Vec<MergeReport>,
}

impl PlanSession {
    pub fn new(template: &TaskTemplate, associations: &[AssociationRow]) -> Result<Self> {
        Ok(Self {
            graph: build_graph(template, associations)?,
            merges: Vec::new(),
        })
    }

    /// Load every input file, build the graph and merge status files in order.
    pub fn load(inputs: &Inputs) -> Result<Self> {
        let associations = load::load_associations(&inputs.associations)?;
        let template = load::load_template(&inputs.template)?;
        let mut session = Self::new(&template, &associations)?;

        for path in &inputs.statuses {
            let records = load::load_statuses(path)?;
            info!(path = %path.display(), records = records.len(), "merging status file");
            session.merge(records);
        }
        Ok(session)
    }

    pub fn merge(&mut self, records: impl IntoIterator<Item = StatusRecord>) -> &MergeReport {
        let report = merge_statuses(&mut self.graph, records);
        self.merges.push(report);
        &self.merges[self.merges.len() - 1]
    }

    pub fn graph(&self) -> &PlanningGraph {
        &self.graph
    }

    pub fn merges(&self) -> &[MergeReport] {
        &self.merges
    }

    /// Orphaned updates across every merge of this session.
    pub fn orphans(&self) -> impl Iterator<Item = &OrphanedUpdate> {
        self.merges.iter().flat_map(|m| m.orphans.iter())
    }
}
