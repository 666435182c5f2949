pub mod toml_config;

use crate::adapters::spreadsheet::parse_column_selection;
use crate::adapters::storage::SUPPORTED_FORMATS;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SHEET: &str = "Steel flows";
pub const DEFAULT_COLUMNS: &str = "A:L,N:Q";
pub const DEFAULT_ROWS: usize = 13;

#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "sankey-flows"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Convert a material flow matrix into a Sankey edge list")
)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Workbook (.xlsx, .xls, .ods) or CSV export holding the flow matrix
    #[cfg_attr(feature = "cli", arg(long))]
    pub input: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = DEFAULT_SHEET))]
    pub sheet: String,

    /// Spreadsheet columns to read, first one holds the row labels
    #[cfg_attr(feature = "cli", arg(long, default_value = DEFAULT_COLUMNS))]
    pub columns: String,

    /// Data rows below the header
    #[cfg_attr(feature = "cli", arg(long, default_value_t = DEFAULT_ROWS))]
    pub rows: usize,

    #[cfg_attr(feature = "cli", arg(long, default_value = "./output"))]
    pub output_path: String,

    #[cfg_attr(feature = "cli", arg(long, value_delimiter = ',', default_value = "csv"))]
    pub formats: Vec<String>,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable verbose output"))]
    pub verbose: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Log CPU and memory usage per phase"))]
    pub monitor: bool,
}

impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn sheet_name(&self) -> &str {
        &self.sheet
    }

    fn column_selection(&self) -> &str {
        &self.columns
    }

    fn row_limit(&self) -> Option<usize> {
        Some(self.rows)
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_source(self)
    }
}

/// Checks shared by every [`ConfigProvider`].
pub fn validate_source<C: ConfigProvider>(config: &C) -> Result<()> {
    validation::validate_path("input", config.input_path())?;
    validation::validate_non_empty_string("sheet", config.sheet_name())?;
    parse_column_selection(config.column_selection())?;
    if let Some(rows) = config.row_limit() {
        validation::validate_positive_number("rows", rows, 1)?;
    }
    validation::validate_path("output_path", config.output_path())?;
    validation::validate_formats("output_formats", config.output_formats(), &SUPPORTED_FORMATS)?;
    Ok(())
}
