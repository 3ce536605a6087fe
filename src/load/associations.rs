//! Product sheet: one row per product, sources as a `|`-separated list.
//!
//! Columns (tab-separated, header required):
//! product_id  product_name  sources  [product_status]  [source_names]
//!
//! Example:
//! 1042    Customer 360    CRM | ERP    live    Salesforce | SAP

use crate::Result;
use crate::build::AssociationRow;
use crate::load::read_text;
use crate::load::table::{Table, cell, optional_cell};
use crate::model::{ProductId, SourceId};

use regex::Regex;
use std::path::Path;
use tracing::debug;

const LIST_SEP_RE: &str = r"\s*\|\s*";

pub fn load_associations(path: impl AsRef<Path>) -> Result<Vec<AssociationRow>> {
    let path = path.as_ref();
    let text = read_text(path)?;
    let rows = parse_associations(&path.display().to_string(), &text)?;
    debug!(path = %path.display(), rows = rows.len(), "loaded product sheet");
    Ok(rows)
}

/// Explode the product sheet into one association row per (product, source).
pub fn parse_associations(label: &str, text: &str) -> Result<Vec<AssociationRow>> {
    let table = Table::parse(label, text)?;
    let id_col = table.column("product_id")?;
    let name_col = table.column("product_name")?;
    let sources_col = table.column("sources")?;
    let status_col = table.optional_column("product_status");
    let source_names_col = table.optional_column("source_names");

    let sep = Regex::new(LIST_SEP_RE)?;

    let mut out = Vec::new();
    for (lno, cells) in table.rows() {
        let product_id = cell(cells, id_col);
        if product_id.is_empty() {
            return Err(table.row_error(lno, "empty product_id"));
        }
        let product_name = match cell(cells, name_col) {
            "" => product_id,
            name => name,
        };
        let lifecycle = optional_cell(cells, status_col);

        let names: Vec<&str> = source_names_col
            .map(|i| sep.split(cell(cells, i)).collect())
            .unwrap_or_default();

        let sources: Vec<&str> = sep
            .split(cell(cells, sources_col))
            .map(str::trim)
            .collect();
        if sources.iter().all(|s| s.is_empty()) {
            debug!(product = product_id, line = lno, "product without sources");
        }

        for (i, source) in sources.into_iter().enumerate() {
            if source.is_empty() {
                continue;
            }
            let source_name = names
                .get(i)
                .map(|n| n.trim())
                .filter(|n| !n.is_empty())
                .unwrap_or(source);
            out.push(AssociationRow {
                product_id: ProductId::new(product_id),
                product_name: product_name.to_string(),
                product_lifecycle: lifecycle.clone(),
                source_id: SourceId::new(source),
                source_name: source_name.to_string(),
            });
        }
    }

    Ok(out)
}
