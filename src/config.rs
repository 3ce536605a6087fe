//! Run configuration (TOML).
//!
//! ```toml
//! [inputs]
//! associations = "data/product_sources.tsv"
//! template     = "data/tasks.json"
//! statuses     = ["data/task_status.tsv"]
//!
//! [output]
//! dir = "out"
//! ```
//!
//! Relative paths resolve against the directory holding the config file.

use crate::Result;
use crate::error::PlanError;
use crate::load::read_text;

use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    #[serde(default)]
    pub inputs: InputsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputsConfig {
    pub associations: Option<PathBuf>,
    pub template: Option<PathBuf>,
    #[serde(default)]
    pub statuses: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

/// Fully resolved input paths for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inputs {
    pub associations: PathBuf,
    pub template: PathBuf,
    pub statuses: Vec<PathBuf>,
}

impl RunConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<RunConfig> {
        let path = path.as_ref();
        let text = read_text(path)?;
        let mut cfg: RunConfig = toml::from_str(&text).map_err(|source| PlanError::Config {
            path: path.display().to_string(),
            source,
        })?;
        cfg.rebase(&config_root_dir(path));
        Ok(cfg)
    }

    fn rebase(&mut self, root: &Path) {
        let join = |p: &PathBuf| {
            if p.is_absolute() {
                p.clone()
            } else {
                root.join(p)
            }
        };
        self.inputs.associations = self.inputs.associations.as_ref().map(join);
        self.inputs.template = self.inputs.template.as_ref().map(join);
        self.inputs.statuses = self.inputs.statuses.iter().map(join).collect();
        self.output.dir = join(&self.output.dir);
    }

    /// Combine with command-line overrides. Flags win over file values;
    /// status files from flags replace the configured list when non-empty.
    pub fn resolve(
        &self,
        associations: Option<PathBuf>,
        template: Option<PathBuf>,
        statuses: Vec<PathBuf>,
    ) -> Result<Inputs> {
        let missing = |what: &str| PlanError::MissingInput(what.to_string());
        Ok(Inputs {
            associations: associations
                .or_else(|| self.inputs.associations.clone())
                .ok_or_else(|| missing("associations"))?,
            template: template
                .or_else(|| self.inputs.template.clone())
                .ok_or_else(|| missing("template"))?,
            statuses: if statuses.is_empty() {
                self.inputs.statuses.clone()
            } else {
                statuses
            },
        })
    }
}

/// Directory holding the config file, `.` for a bare file name.
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
