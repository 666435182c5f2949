use crate::core::{FlowTable, Pipeline};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitoring: bool,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitoring: bool) -> Self {
        Self {
            pipeline,
            monitoring,
        }
    }

    /// Extract and transform only; the table stays in memory.
    pub fn build_table(&self) -> Result<FlowTable> {
        let mut monitor = SystemMonitor::new(self.monitoring);
        self.extract_and_transform(&mut monitor)
    }

    /// Full run, returning where the output went.
    pub fn run(&self) -> Result<String> {
        let mut monitor = SystemMonitor::new(self.monitoring);
        tracing::info!("Starting flow table conversion");

        let table = self.extract_and_transform(&mut monitor)?;

        tracing::info!("Writing {} edges", table.len());
        let output = self.pipeline.load(&table)?;
        monitor.log_stats("Load");
        tracing::info!("Output saved to: {}", output);

        monitor.log_final_stats();
        Ok(output)
    }

    fn extract_and_transform(&self, monitor: &mut SystemMonitor) -> Result<FlowTable> {
        let matrix = self.pipeline.extract()?;
        let (rows, columns) = matrix.shape();
        tracing::info!("Extracted {}x{} flow matrix", rows, columns);
        monitor.log_stats("Extract");

        let table = self.pipeline.transform(matrix)?;
        tracing::info!("Transformed into {} edges", table.len());
        monitor.log_stats("Transform");

        Ok(table)
    }
}
