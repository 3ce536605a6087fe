//! Migration planning report.
//!
//! Tracks which source systems feed which products, the tasks implementing
//! each migration and their status. Pipeline:
//! association rows + task template -> [`build`] -> [`merge`] status rows ->
//! [`aggregate`] roll-ups -> [`view`] projections -> [`render`] outputs.

pub mod aggregate;
pub mod build;
pub mod config;
pub mod error;
pub mod load;
pub mod logging;
pub mod merge;
pub mod model;
pub mod render;
pub mod session;
pub mod template;
pub mod view;

pub use error::PlanError;
pub use session::PlanSession;

pub type Result<T> = std::result::Result<T, PlanError>;
