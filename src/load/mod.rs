//! Input loaders: typed records from the product sheet, the status sheet and
//! the task template.
//!
//! Sheets are tab-separated text exports with a header row. Everything is
//! validated here so the core only ever sees typed entities.

pub mod associations;
pub mod status;
pub mod table;

pub use associations::{load_associations, parse_associations};
pub use status::{load_statuses, parse_statuses};
pub use table::Table;

use crate::Result;
use crate::error::PlanError;
use crate::template::TaskTemplate;

use std::fs;
use std::path::Path;
use tracing::debug;

pub(crate) fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| PlanError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Read a task template JSON document.
pub fn load_template(path: impl AsRef<Path>) -> Result<TaskTemplate> {
    let path = path.as_ref();
    let text = read_text(path)?;
    let template = parse_template(&path.display().to_string(), &text)?;
    debug!(
        path = %path.display(),
        tasks = template.tasks.len(),
        per_association = template.per_association.len(),
        "loaded task template"
    );
    Ok(template)
}

pub fn parse_template(label: &str, text: &str) -> Result<TaskTemplate> {
    TaskTemplate::from_json(text).map_err(|source| PlanError::Template {
        path: label.to_string(),
        source,
    })
}
