//! Graph builder: association rows + task template -> base planning graph.
//!
//! Validation is strict. Every problem in the template is collected and the
//! whole graph is rejected if there is at least one, so the source data can be
//! fixed upstream in a single pass.

use crate::Result;
use crate::error::{BuildProblem, PlanError};
use crate::model::{PlanningGraph, Product, ProductId, Source, SourceId, Status, Task, TaskId};
use crate::template::{TaskTemplate, TemplateEntry};

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// One product <-> source association, as read from the product sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationRow {
    pub product_id: ProductId,
    pub product_name: String,
    pub product_lifecycle: Option<String>,
    pub source_id: SourceId,
    pub source_name: String,
}

/// Build the base graph. All task statuses start as [`Status::Unknown`].
pub fn build_graph(template: &TaskTemplate, associations: &[AssociationRow]) -> Result<PlanningGraph> {
    let (sources, products, pairs) = collect_entities(associations);

    let entries = template.entries(&pairs);
    let problems = validate_entries(&entries, &sources, &products);
    if !problems.is_empty() {
        warn!(problems = problems.len(), "task template rejected");
        return Err(PlanError::InvalidTemplate(problems));
    }

    let paired: HashSet<(&str, &str)> = pairs
        .iter()
        .map(|(s, p)| (s.as_str(), p.as_str()))
        .collect();

    let tasks: Vec<Task> = entries
        .into_iter()
        .map(|e| {
            if !paired.contains(&(e.source_id.as_str(), e.product_id.as_str())) {
                warn!(
                    task = %e.task_id,
                    source = %e.source_id,
                    product = %e.product_id,
                    "task links a source and product that are not associated in the product sheet"
                );
            }
            Task {
                id: e.task_id,
                source: e.source_id,
                product: e.product_id,
                category: e.category,
                description: e.description,
                depends_on: e.depends_on,
                status: Status::Unknown,
                last_update: None,
            }
        })
        .collect();

    info!(
        sources = sources.len(),
        products = products.len(),
        tasks = tasks.len(),
        "built planning graph"
    );

    Ok(PlanningGraph::from_parts(sources, products, pairs, tasks))
}

/// Deduplicate association rows into sources, products and distinct pairs,
/// each in first-seen order. A later row that renames an existing id is
/// ignored with a warning.
fn collect_entities(
    rows: &[AssociationRow],
) -> (Vec<Source>, Vec<Product>, Vec<(SourceId, ProductId)>) {
    let mut sources: Vec<Source> = Vec::new();
    let mut products: Vec<Product> = Vec::new();
    let mut pairs: Vec<(SourceId, ProductId)> = Vec::new();

    let mut source_pos: HashMap<SourceId, usize> = HashMap::new();
    let mut product_pos: HashMap<ProductId, usize> = HashMap::new();
    let mut seen_pairs: HashSet<(SourceId, ProductId)> = HashSet::new();

    for row in rows {
        match source_pos.get(&row.source_id) {
            Some(&i) => {
                if sources[i].name != row.source_name {
                    warn!(
                        source = %row.source_id,
                        kept = %sources[i].name,
                        ignored = %row.source_name,
                        "conflicting source names; keeping the first"
                    );
                }
            }
            None => {
                source_pos.insert(row.source_id.clone(), sources.len());
                sources.push(Source {
                    id: row.source_id.clone(),
                    name: row.source_name.clone(),
                });
            }
        }

        let pi = match product_pos.get(&row.product_id) {
            Some(&i) => {
                if products[i].name != row.product_name {
                    warn!(
                        product = %row.product_id,
                        kept = %products[i].name,
                        ignored = %row.product_name,
                        "conflicting product names; keeping the first"
                    );
                }
                i
            }
            None => {
                product_pos.insert(row.product_id.clone(), products.len());
                products.push(Product {
                    id: row.product_id.clone(),
                    name: row.product_name.clone(),
                    lifecycle: row.product_lifecycle.clone(),
                    sources: Vec::new(),
                });
                products.len() - 1
            }
        };

        let pair = (row.source_id.clone(), row.product_id.clone());
        if seen_pairs.insert(pair.clone()) {
            products[pi].sources.push(row.source_id.clone());
            pairs.push(pair);
        } else {
            debug!(source = %row.source_id, product = %row.product_id, "duplicate association row");
        }
    }

    (sources, products, pairs)
}

fn validate_entries(
    entries: &[TemplateEntry],
    sources: &[Source],
    products: &[Product],
) -> Vec<BuildProblem> {
    let source_ids: HashSet<&str> = sources.iter().map(|s| s.id.as_str()).collect();
    let product_ids: HashSet<&str> = products.iter().map(|p| p.id.as_str()).collect();

    let mut problems = Vec::new();

    // Phase 1: unique ids and resolvable references.
    let mut first_seen: HashMap<&str, &str> = HashMap::new();
    for e in entries {
        if let Some(first) = first_seen.get(e.task_id.as_str()) {
            problems.push(BuildProblem::DuplicateTask {
                origin: e.origin.clone(),
                task: e.task_id.clone(),
                first: first.to_string(),
            });
        } else {
            first_seen.insert(e.task_id.as_str(), e.origin.as_str());
        }
        if !source_ids.contains(e.source_id.as_str()) {
            problems.push(BuildProblem::UnknownSource {
                origin: e.origin.clone(),
                task: e.task_id.clone(),
                source_id: e.source_id.clone(),
            });
        }
        if !product_ids.contains(e.product_id.as_str()) {
            problems.push(BuildProblem::UnknownProduct {
                origin: e.origin.clone(),
                task: e.task_id.clone(),
                product_id: e.product_id.clone(),
            });
        }
    }

    // Phase 2: dependencies exist and form a DAG.
    // Edge direction: dependency -> dependent.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
    for e in entries {
        graph.add_node(e.task_id.as_str());
    }
    for e in entries {
        for dep in &e.depends_on {
            if first_seen.contains_key(dep.as_str()) {
                graph.add_edge(dep.as_str(), e.task_id.as_str(), ());
            } else {
                problems.push(BuildProblem::UnknownDependency {
                    origin: e.origin.clone(),
                    task: e.task_id.clone(),
                    dependency: dep.clone(),
                });
            }
        }
    }
    if let Err(cycle) = toposort(&graph, None) {
        let task = cycle.node_id();
        problems.push(BuildProblem::DependencyCycle {
            origin: first_seen.get(task).map(|o| o.to_string()).unwrap_or_default(),
            task: TaskId::new(task),
        });
    }

    problems
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builds_graph_with_unknown_statuses() {
        let (t, a) = example_inputs();
        let g = build_graph(&t, &a).unwrap();
        assert_eq!(g.tasks().len(), 3);
        assert_eq!(g.sources().len(), 2);
        assert_eq!(g.products().len(), 2);
        assert!(g.tasks().iter().all(|t| t.status == Status::Unknown));
        for task in g.tasks() {
            assert!(g.get_source(task.source.as_str()).is_ok());
            assert!(g.get_product(task.product.as_str()).is_ok());
        }
    }

    #[test]
    fn product_sources_follow_association_order() {
        let (t, a) = example_inputs();
        let g = build_graph(&t, &a).unwrap();
        let p1 = g.get_product("P1").unwrap();
        assert_eq!(p1.sources, vec![SourceId::new("S1"), SourceId::new("S2")]);
        assert_eq!(g.associations().len(), 3);
    }

    #[test]
    fn duplicate_association_rows_collapse() {
        let (t, mut a) = example_inputs();
        a.push(assoc("S1", "P1"));
        let g = build_graph(&t, &a).unwrap();
        assert_eq!(g.associations().len(), 3);
        assert_eq!(g.get_product("P1").unwrap().sources.len(), 2);
    }

    #[test]
    fn duplicate_task_id_rejects_whole_graph() {
        let (mut t, a) = example_inputs();
        t.tasks.push(task("T2", "S2", "P1"));
        let err = build_graph(&t, &a).unwrap_err();
        assert_eq!(
            err.problems(),
            &[BuildProblem::DuplicateTask {
                origin: "tasks[3]".into(),
                task: "T2".into(),
                first: "tasks[1]".into(),
            }]
        );
    }

    #[test]
    fn unresolved_references_are_all_reported() {
        let (mut t, a) = example_inputs();
        t.tasks.push(task("T4", "S9", "P1"));
        t.tasks.push(task("T5", "S1", "P9"));
        let err = build_graph(&t, &a).unwrap_err();
        let problems = err.problems();
        assert_eq!(problems.len(), 2);
        assert!(matches!(
            &problems[0],
            BuildProblem::UnknownSource { source_id, .. } if source_id.as_str() == "S9"
        ));
        assert!(matches!(
            &problems[1],
            BuildProblem::UnknownProduct { product_id, .. } if product_id.as_str() == "P9"
        ));
        let msg = err.to_string();
        assert!(msg.contains("tasks[3]"));
        assert!(msg.contains("unknown source 'S9'"));
    }

    #[test]
    fn unknown_dependency_is_fatal() {
        let (mut t, a) = example_inputs();
        t.tasks[1].depends_on = vec!["T7".into()];
        let err = build_graph(&t, &a).unwrap_err();
        assert!(matches!(
            err.problems(),
            [BuildProblem::UnknownDependency { dependency, .. }] if dependency.as_str() == "T7"
        ));
    }

    #[test]
    fn dependency_cycle_is_fatal() {
        let (mut t, a) = example_inputs();
        t.tasks[0].depends_on = vec!["T2".into()];
        t.tasks[1].depends_on = vec!["T1".into()];
        let err = build_graph(&t, &a).unwrap_err();
        assert!(matches!(
            err.problems(),
            [BuildProblem::DependencyCycle { .. }]
        ));
    }

    #[test]
    fn self_dependency_names_its_row() {
        let (mut t, a) = example_inputs();
        t.tasks[2].depends_on = vec!["T3".into()];
        let err = build_graph(&t, &a).unwrap_err();
        assert_eq!(
            err.problems(),
            &[BuildProblem::DependencyCycle {
                origin: "tasks[2]".into(),
                task: "T3".into(),
            }]
        );
        assert!(err.to_string().contains("tasks[2]: dependency cycle involving task 'T3'"));
    }

    #[test]
    fn empty_template_builds_empty_task_set() {
        let (_, a) = example_inputs();
        let g = build_graph(&template(vec![]), &a).unwrap();
        assert!(g.tasks().is_empty());
        assert_eq!(g.products().len(), 2);
    }
}
