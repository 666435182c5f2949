use crate::domain::model::{FlowTable, LabeledMatrix};
use crate::utils::error::Result;
use std::path::Path;

/// Reads a labeled flow matrix from a named sheet of a source file.
pub trait MatrixSource {
    fn load(&self, path: &Path, sheet_name: &str) -> Result<LabeledMatrix>;
}

pub trait Storage {
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider {
    fn input_path(&self) -> &str;
    fn sheet_name(&self) -> &str;
    fn column_selection(&self) -> &str;
    fn row_limit(&self) -> Option<usize>;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];

    /// File name for an output format, e.g. `flows.csv`.
    fn output_filename(&self, format: &str) -> String {
        format!("flows.{}", format)
    }
}

pub trait Pipeline {
    fn extract(&self) -> Result<LabeledMatrix>;
    fn transform(&self, matrix: LabeledMatrix) -> Result<FlowTable>;
    /// Persists the table, returning where it went.
    fn load(&self, table: &FlowTable) -> Result<String>;
}
