//! Roll-up of task statuses into product and source summaries.
//!
//! Roll-up rule, applied to the set of task statuses of one product or source:
//! - no tasks: `Unknown`
//! - every task `Complete`: `Complete`
//! - any task `Blocked`: `Blocked`
//! - otherwise the least advanced incomplete status present
//!   (`Unknown` < `NotStarted` < `InProgress`).
//!
//! Summaries are always rebuilt from scratch.

use crate::model::{PlanningGraph, ProductId, SourceId, Status, StatusCounts, Task};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub counts: StatusCounts,
    pub overall: Status,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSummary {
    pub id: SourceId,
    pub name: String,
    pub counts: StatusCounts,
    pub overall: Status,
}

/// All roll-ups of one graph. `products` and `sources` follow the graph's
/// product and source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summaries {
    pub products: Vec<ProductSummary>,
    pub sources: Vec<SourceSummary>,
    pub overall: StatusCounts,
    pub overall_status: Status,
}

pub fn rollup(statuses: impl IntoIterator<Item = Status>) -> Status {
    rollup_counts(&StatusCounts::from_statuses(statuses))
}

pub fn rollup_counts(counts: &StatusCounts) -> Status {
    let total = counts.total();
    if total == 0 {
        return Status::Unknown;
    }
    if counts.get(Status::Complete) == total {
        return Status::Complete;
    }
    if counts.get(Status::Blocked) > 0 {
        return Status::Blocked;
    }
    counts
        .present()
        .filter(|s| *s != Status::Complete)
        .min_by_key(|s| s.stage())
        .unwrap_or(Status::Unknown)
}

pub fn summarize(graph: &PlanningGraph) -> Summaries {
    let counts_of = |tasks: Vec<&Task>| StatusCounts::from_statuses(tasks.iter().map(|t| t.status));

    let products = graph
        .products()
        .iter()
        .map(|p| {
            let counts = counts_of(graph.tasks_of_product(p.id.as_str()).unwrap_or_default());
            ProductSummary {
                id: p.id.clone(),
                name: p.name.clone(),
                overall: rollup_counts(&counts),
                counts,
            }
        })
        .collect();

    let sources = graph
        .sources()
        .iter()
        .map(|s| {
            let counts = counts_of(graph.tasks_of_source(s.id.as_str()).unwrap_or_default());
            SourceSummary {
                id: s.id.clone(),
                name: s.name.clone(),
                overall: rollup_counts(&counts),
                counts,
            }
        })
        .collect();

    let overall = StatusCounts::from_statuses(graph.tasks().iter().map(|t| t.status));
    Summaries {
        products,
        sources,
        overall_status: rollup_counts(&overall),
        overall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::small_graph;
    use Status::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn all_complete_rolls_up_to_complete() {
        assert_eq!(rollup([Complete, Complete, Complete]), Complete);
    }

    #[test]
    fn blocked_dominates() {
        assert_eq!(rollup([Complete, Blocked, InProgress]), Blocked);
        assert_eq!(rollup([Unknown, Blocked]), Blocked);
    }

    #[test]
    fn earliest_incomplete_stage_wins() {
        assert_eq!(rollup([NotStarted, InProgress]), NotStarted);
        assert_eq!(rollup([Complete, InProgress]), InProgress);
        assert_eq!(rollup([Complete, Unknown, NotStarted]), Unknown);
    }

    #[test]
    fn empty_set_is_unknown() {
        assert_eq!(rollup(Vec::<Status>::new()), Unknown);
    }

    #[test]
    fn summaries_follow_graph_order() {
        let g = small_graph();
        let s = summarize(&g);
        let ids: Vec<&str> = s.products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["P1", "P2"]);
        assert_eq!(s.products[0].counts.get(Unknown), 2);
        assert_eq!(s.sources[1].counts.total(), 1);
        assert_eq!(s.overall.total(), 3);
        assert_eq!(s.overall_status, Unknown);
    }
}
