//! Status sheet: one status record per row.
//!
//! Columns (tab-separated, header required):
//! task  status  [note]  [updated]
//!
//! Rows are kept in file order; later rows for the same task win at merge time.

use crate::Result;
use crate::load::read_text;
use crate::load::table::{Table, cell, optional_cell};
use crate::model::{Status, StatusRecord, TaskId};

use std::path::Path;
use tracing::debug;

pub fn load_statuses(path: impl AsRef<Path>) -> Result<Vec<StatusRecord>> {
    let path = path.as_ref();
    let text = read_text(path)?;
    let records = parse_statuses(&path.display().to_string(), &text)?;
    debug!(path = %path.display(), records = records.len(), "loaded status sheet");
    Ok(records)
}

pub fn parse_statuses(label: &str, text: &str) -> Result<Vec<StatusRecord>> {
    let table = Table::parse(label, text)?;
    let task_col = table.column("task")?;
    let status_col = table.column("status")?;
    let note_col = table.optional_column("note");
    let updated_col = table.optional_column("updated");

    let mut out = Vec::new();
    for (lno, cells) in table.rows() {
        let task = cell(cells, task_col);
        if task.is_empty() {
            return Err(table.row_error(lno, "empty task id"));
        }
        let status: Status = cell(cells, status_col)
            .parse()
            .map_err(|msg: String| table.row_error(lno, msg))?;

        out.push(StatusRecord {
            task: TaskId::new(task),
            status,
            note: optional_cell(cells, note_col),
            updated: optional_cell(cells, updated_col),
        });
    }

    Ok(out)
}
