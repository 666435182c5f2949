pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::{LocalStorage, SpreadsheetSource};
pub use crate::config::CliConfig;
pub use crate::core::{etl::EtlEngine, pipeline::FlowPipeline, transform::transform_matrix};
pub use crate::domain::model::{FlowEdge, FlowTable, LabeledMatrix};
pub use crate::utils::error::{EtlError, Result};

use crate::config::{DEFAULT_COLUMNS, DEFAULT_ROWS};
use crate::domain::ports::MatrixSource;
use std::path::Path;

/// Loads the flow matrix from `sheet_name` with the default column layout and
/// returns the finished Sankey edge list. Nothing is written.
pub fn process_flow_table<P: AsRef<Path>>(path: P, sheet_name: &str) -> Result<FlowTable> {
    let source = SpreadsheetSource::from_selection(DEFAULT_COLUMNS, Some(DEFAULT_ROWS))?;
    let matrix = source.load(path.as_ref(), sheet_name)?;
    Ok(transform_matrix(&matrix))
}
