use crate::domain::model::FlowTable;
use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}

pub const SUPPORTED_FORMATS: [&str; 3] = ["csv", "tsv", "json"];

/// Serializes the edge list as `csv`, `tsv` or `json`.
pub fn encode_table(table: &FlowTable, format: &str) -> Result<Vec<u8>> {
    match format {
        "csv" => encode_delimited(table, b','),
        "tsv" => encode_delimited(table, b'\t'),
        "json" => Ok(serde_json::to_vec_pretty(table)?),
        other => Err(EtlError::InvalidConfigValueError {
            field: "output_formats".to_string(),
            value: other.to_string(),
            reason: format!(
                "Unsupported format. Valid formats: {}",
                SUPPORTED_FORMATS.join(", ")
            ),
        }),
    }
}

fn encode_delimited(table: &FlowTable, delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    for edge in table {
        writer.serialize(edge)?;
    }

    writer.into_inner().map_err(|e| EtlError::ProcessingError {
        message: format!("failed to flush delimited output: {}", e),
    })
}
