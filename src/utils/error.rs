use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Source file not found: {path}")]
    SourceNotFound { path: String },

    #[error("Sheet '{sheet}' not found (available: {})", .available.join(", "))]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    #[error("Unsupported input format: {path}")]
    UnsupportedFormat { path: String },

    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    #[error("Non-numeric cell at row '{row}', column '{column}': {value}")]
    InvalidCell {
        row: String,
        column: String,
        value: String,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Source,
    Data,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::SourceNotFound { .. }
            | EtlError::SheetNotFound { .. }
            | EtlError::UnsupportedFormat { .. }
            | EtlError::SpreadsheetError(_) => ErrorCategory::Source,
            EtlError::InvalidCell { .. }
            | EtlError::CsvError(_)
            | EtlError::ProcessingError { .. } => ErrorCategory::Data,
            EtlError::IoError(_) | EtlError::SerializationError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Source | ErrorCategory::Data => {
                ErrorSeverity::High
            }
            ErrorCategory::Output => match self {
                EtlError::IoError(_) => ErrorSeverity::Critical,
                _ => ErrorSeverity::Medium,
            },
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::SourceNotFound { path } => {
                format!("Check that '{}' exists and is readable", path)
            }
            EtlError::SheetNotFound { available, .. } => {
                format!("Use one of the workbook sheets: {}", available.join(", "))
            }
            EtlError::UnsupportedFormat { .. } => {
                "Provide an .xlsx, .xlsm, .xls, .ods or .csv file".to_string()
            }
            EtlError::SpreadsheetError(_) => {
                "Make sure the workbook is not corrupted or password protected".to_string()
            }
            EtlError::InvalidCell { .. } => {
                "Flow cells must be numeric or blank; check the column selection".to_string()
            }
            EtlError::CsvError(_) => "Check the CSV file for ragged or malformed rows".to_string(),
            EtlError::IoError(_) => {
                "Check file permissions and free disk space in the output directory".to_string()
            }
            EtlError::SerializationError(_) => "Report this as a bug".to_string(),
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => {
                "Review the command line arguments or the TOML configuration".to_string()
            }
            EtlError::ProcessingError { .. } => {
                "Inspect the input matrix with --verbose to locate the offending rows".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Source => format!("Could not load the flow matrix: {}", self),
            ErrorCategory::Data => format!("The flow matrix could not be processed: {}", self),
            ErrorCategory::Output => format!("Could not write the flow table: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
