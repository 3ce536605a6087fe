use planreport::config::RunConfig;
use planreport::error::{BuildProblem, PlanError};
use planreport::model::{Status, StatusRecord};
use planreport::render::{render_dashboard_html, render_export_tsv, render_graph_html};
use planreport::view::{self, EXPORT_COLUMNS, NodeKind};
use planreport::{PlanSession, load};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const PRODUCTS: &str = "product_id\tproduct_name\tsources\tproduct_status\n\
                        P1\tProduct one\tS1 | S2\tlive\n\
                        P2\tProduct two\tS1\tplanned\n";

const TEMPLATE: &str = r#"{
  "tasks": [
    { "task_id": "T1", "source_id": "S1", "product_id": "P1", "category": "extract" },
    { "task_id": "T2", "source_id": "S1", "product_id": "P2", "category": "extract" },
    { "task_id": "T3", "source_id": "S2", "product_id": "P1", "category": "load", "depends_on": ["T1"] }
  ]
}"#;

const STATUS: &str = "task\tstatus\tnote\n\
                      T1\tdone\n\
                      T2\tblocked\twaiting for credentials\n";

fn write_inputs(dir: &Path, template: &str, status: &str) {
    fs::write(dir.join("products.tsv"), PRODUCTS).unwrap();
    fs::write(dir.join("tasks.json"), template).unwrap();
    fs::write(dir.join("status.tsv"), status).unwrap();
    fs::write(
        dir.join("plan.toml"),
        "[inputs]\nassociations = \"products.tsv\"\ntemplate = \"tasks.json\"\nstatuses = [\"status.tsv\"]\n",
    )
    .unwrap();
}

fn open(dir: &TempDir) -> Result<PlanSession, PlanError> {
    let cfg = RunConfig::load(dir.path().join("plan.toml"))?;
    let inputs = cfg.resolve(None, None, vec![])?;
    PlanSession::load(&inputs)
}

#[test]
fn example_plan_from_files() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path(), TEMPLATE, STATUS);

    let session = open(&dir).unwrap();
    let g = session.graph();
    assert_eq!(g.tasks().len(), 3);
    assert_eq!(g.get_task("T3").unwrap().status, Status::Unknown);
    assert_eq!(
        g.get_task("T2").unwrap().last_update.as_ref().and_then(|u| u.note.as_deref()),
        Some("waiting for credentials")
    );

    assert_eq!(g.product_summary("P1").unwrap().overall, Status::Unknown);
    assert_eq!(g.product_summary("P2").unwrap().overall, Status::Blocked);
    assert_eq!(g.source_summary("S1").unwrap().overall, Status::Blocked);
    assert_eq!(g.source_summary("S2").unwrap().overall, Status::Unknown);
    assert_eq!(g.get_product("P2").unwrap().lifecycle.as_deref(), Some("planned"));

    let template = view::template_graph(g);
    assert!(
        template
            .nodes_of_kind(NodeKind::Task)
            .all(|n| n.status == Status::Unknown)
    );

    let ready: Vec<&str> = view::ready_tasks(g).iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ready, vec!["T3"]);
    assert_eq!(session.orphans().count(), 0);
}

#[test]
fn outputs_render_from_session() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path(), TEMPLATE, STATUS);
    let session = open(&dir).unwrap();
    let g = session.graph();

    let tsv = render_export_tsv(&view::export_rows(g)).unwrap();
    let lines: Vec<&str> = tsv.lines().collect();
    assert_eq!(lines[0], EXPORT_COLUMNS.join("\t"));
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[2], "T2\tS1\tS1\tP2\tProduct two\textract\tblocked");

    let page = render_graph_html(&view::product_subgraph(g, "P1").unwrap()).unwrap();
    assert!(page.contains("Product P1 - Product one"));
    let dash = render_dashboard_html(&view::dashboard(g)).unwrap();
    assert!(dash.contains("Migration Analytics"));
}

#[test]
fn filtered_export_keeps_matching_rows() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path(), TEMPLATE, STATUS);
    let session = open(&dir).unwrap();

    let rows = view::rows_with_status(session.graph(), &[Status::Blocked, Status::Complete]);
    let tsv = render_export_tsv(&rows).unwrap();
    let ids: Vec<&str> = tsv
        .lines()
        .skip(1)
        .filter_map(|l| l.split('\t').next())
        .collect();
    assert_eq!(ids, vec!["T1", "T2"]);

    let only: Vec<Status> = ["blocked"].iter().map(|s| s.parse().unwrap()).collect();
    assert_eq!(view::rows_with_status(session.graph(), &only).len(), 1);
}

#[test]
fn orphaned_rows_do_not_block_valid_ones() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path(), TEMPLATE, "task\tstatus\nT1\tdone\nT9\tdone\nT3\tin progress\n");
    let session = open(&dir).unwrap();

    let orphans: Vec<_> = session.orphans().collect();
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].record.task.as_str(), "T9");
    assert_eq!(orphans[0].position, 1);
    assert_eq!(session.merges()[0].applied, 2);
    assert_eq!(session.graph().get_task("T3").unwrap().status, Status::InProgress);
}

#[test]
fn nine_valid_and_one_orphan() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path(), TEMPLATE, "task\tstatus\n");
    let mut session = open(&dir).unwrap();

    let mut batch: Vec<StatusRecord> = (0..9)
        .map(|i| StatusRecord::new(["T1", "T2", "T3"][i % 3], Status::NotStarted))
        .collect();
    batch.push(StatusRecord::new("missing", Status::Complete));

    let report = session.merge(batch).clone();
    assert_eq!(report.applied, 9);
    assert_eq!(report.orphans.len(), 1);
    assert_eq!(view::export_rows(session.graph()).len(), 3);
}

#[test]
fn duplicate_task_in_template_fails_the_load() {
    let dir = tempfile::tempdir().unwrap();
    let template = r#"{ "tasks": [
        { "task_id": "T1", "source_id": "S1", "product_id": "P1" },
        { "task_id": "T1", "source_id": "S2", "product_id": "P1" }
    ] }"#;
    write_inputs(dir.path(), template, STATUS);

    let err = open(&dir).unwrap_err();
    assert!(matches!(
        err.problems(),
        [BuildProblem::DuplicateTask { task, .. }] if task.as_str() == "T1"
    ));
}

#[test]
fn unknown_source_fails_with_offending_row() {
    let dir = tempfile::tempdir().unwrap();
    let template = r#"{ "tasks": [
        { "task_id": "T1", "source_id": "S1", "product_id": "P1" },
        { "task_id": "T2", "source_id": "S7", "product_id": "P1" }
    ] }"#;
    write_inputs(dir.path(), template, STATUS);

    let err = open(&dir).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("tasks[1]"), "{msg}");
    assert!(msg.contains("S7"), "{msg}");
}

#[test]
fn generic_template_expands_over_associations() {
    let dir = tempfile::tempdir().unwrap();
    let template = r#"[
        { "id_task": "analyse", "type_task": "SOURCE", "depends_on": [] },
        { "id_task": "build", "type_task": "PRODUCT", "depends_on": ["analyse"] }
    ]"#;
    write_inputs(dir.path(), template, "task\tstatus\nS1_P1_analyse\tdone\n");
    let session = open(&dir).unwrap();
    let g = session.graph();

    // Three associations, two tasks each.
    assert_eq!(g.tasks().len(), 6);
    let ready: Vec<&str> = view::ready_tasks(g).iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ready, vec!["S1_P1_build"]);
}

#[test]
fn loaders_report_bad_files() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.tsv");
    assert!(matches!(
        load::load_statuses(&missing),
        Err(PlanError::Io { .. })
    ));

    let bad = dir.path().join("bad.json");
    fs::write(&bad, "{ not json").unwrap();
    assert!(matches!(
        load::load_template(&bad),
        Err(PlanError::Template { .. })
    ));
}

#[test]
fn misspelled_template_key_fails_the_load() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(
        dir.path(),
        r#"{ "task": [ { "task_id": "T1", "source_id": "S1", "product_id": "P1" } ] }"#,
        STATUS,
    );
    let err = open(&dir).unwrap_err();
    assert!(matches!(err, PlanError::Template { .. }));
    assert!(err.to_string().contains("tasks.json"));
}
