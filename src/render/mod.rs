//! Output writers: HTML pages and the TSV export.

pub mod dashboard;
pub mod html;
pub mod tsv;

pub use dashboard::render_dashboard_html;
pub use html::render_graph_html;
pub use tsv::{render_export_tsv, write_export_tsv};
