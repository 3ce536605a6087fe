//! Minimal reader for tab-separated sheets with a header row.

use crate::Result;
use crate::error::PlanError;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Table {
    label: String,
    columns: HashMap<String, usize>,
    /// (1-based line number, cells)
    rows: Vec<(usize, Vec<String>)>,
}

impl Table {
    /// Parse `text`. The first non-blank line is the header; header names are
    /// matched case-insensitively with spaces treated as `_`. A name that
    /// appears twice in the header is an error.
    pub fn parse(label: &str, text: &str) -> Result<Table> {
        let mut columns = HashMap::new();
        let mut rows = Vec::new();
        let mut have_header = false;

        for (lineno, line) in text.lines().enumerate() {
            let lno = lineno + 1;
            let line = line.trim_end_matches(['\r', '\n']);
            if line.trim().is_empty() {
                continue;
            }

            let cells: Vec<String> = line.split('\t').map(|c| c.trim().to_string()).collect();
            if !have_header {
                for (i, name) in cells.iter().enumerate() {
                    let name = normalize_header(name);
                    if name.is_empty() {
                        continue;
                    }
                    if columns.insert(name.clone(), i).is_some() {
                        return Err(PlanError::Row {
                            path: label.to_string(),
                            line: lno,
                            message: format!("duplicate column '{name}'"),
                        });
                    }
                }
                have_header = true;
                continue;
            }
            rows.push((lno, cells));
        }

        Ok(Table {
            label: label.to_string(),
            columns,
            rows,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Index of a required column.
    pub fn column(&self, name: &str) -> Result<usize> {
        self.columns
            .get(name)
            .copied()
            .ok_or_else(|| PlanError::MissingColumn {
                path: self.label.clone(),
                column: name.to_string(),
            })
    }

    pub fn optional_column(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.rows.iter().map(|(lno, cells)| (*lno, cells.as_slice()))
    }

    pub fn row_error(&self, line: usize, message: impl Into<String>) -> PlanError {
        PlanError::Row {
            path: self.label.clone(),
            line,
            message: message.into(),
        }
    }
}

/// Cell at `idx`, empty when the row is short.
pub fn cell(cells: &[String], idx: usize) -> &str {
    cells.get(idx).map(String::as_str).unwrap_or("")
}

/// Cell at an optional column, `None` when absent or empty.
pub fn optional_cell(cells: &[String], idx: Option<usize>) -> Option<String> {
    idx.map(|i| cell(cells, i))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_header_and_rows() {
        let t = Table::parse("x.tsv", "\nTask\tStatus\tNote\nT1\tdone\n\nT2\tblocked\tno access\n").unwrap();
        assert_eq!(t.column("task").unwrap(), 0);
        assert_eq!(t.optional_column("note"), Some(2));
        let rows: Vec<(usize, Vec<&str>)> = t
            .rows()
            .map(|(l, c)| (l, c.iter().map(String::as_str).collect()))
            .collect();
        assert_eq!(
            rows,
            vec![(3, vec!["T1", "done"]), (5, vec!["T2", "blocked", "no access"])]
        );
    }

    #[test]
    fn missing_column_is_reported() {
        let t = Table::parse("x.tsv", "task\n").unwrap();
        let err = t.column("status").unwrap_err();
        assert_eq!(err.to_string(), "x.tsv: missing required column 'status'");
    }

    #[test]
    fn repeated_header_is_rejected() {
        let err = Table::parse("x.tsv", "\ntask\tStatus\tstatus\nT1\tdone\tblocked\n").unwrap_err();
        assert_eq!(err.to_string(), "x.tsv:2: duplicate column 'status'");
    }

    #[test]
    fn short_rows_read_as_empty() {
        let cells = vec!["a".to_string()];
        assert_eq!(cell(&cells, 3), "");
        assert_eq!(optional_cell(&cells, Some(3)), None);
        assert_eq!(optional_cell(&cells, Some(0)), Some("a".to_string()));
    }
}
