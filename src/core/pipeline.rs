use crate::adapters::storage::encode_table;
use crate::core::transform::transform_matrix;
use crate::core::{ConfigProvider, FlowTable, LabeledMatrix, MatrixSource, Pipeline, Storage};
use crate::utils::error::Result;
use std::path::Path;

/// Spreadsheet matrix in, Sankey edge files out.
pub struct FlowPipeline<M: MatrixSource, S: Storage, C: ConfigProvider> {
    source: M,
    storage: S,
    config: C,
}

impl<M: MatrixSource, S: Storage, C: ConfigProvider> FlowPipeline<M, S, C> {
    pub fn new(source: M, storage: S, config: C) -> Self {
        Self {
            source,
            storage,
            config,
        }
    }
}

impl<M: MatrixSource, S: Storage, C: ConfigProvider> Pipeline for FlowPipeline<M, S, C> {
    fn extract(&self) -> Result<LabeledMatrix> {
        let path = Path::new(self.config.input_path());
        tracing::debug!(
            "Loading sheet '{}' from {}",
            self.config.sheet_name(),
            path.display()
        );

        let matrix = self.source.load(path, self.config.sheet_name())?;
        tracing::debug!(
            "Loaded {:?} matrix with categories {:?}",
            matrix.shape(),
            matrix.column_labels
        );
        Ok(matrix)
    }

    fn transform(&self, matrix: LabeledMatrix) -> Result<FlowTable> {
        Ok(transform_matrix(&matrix))
    }

    fn load(&self, table: &FlowTable) -> Result<String> {
        let mut written = Vec::new();

        for format in self.config.output_formats() {
            let filename = self.config.output_filename(format);
            let data = encode_table(table, format)?;
            self.storage.write_file(&filename, &data)?;
            tracing::debug!("Wrote {} bytes to {}", data.len(), filename);
            written.push(filename);
        }

        let output_dir = Path::new(self.config.output_path());
        Ok(written
            .iter()
            .map(|f| output_dir.join(f).display().to_string())
            .collect::<Vec<_>>()
            .join(", "))
    }
}
