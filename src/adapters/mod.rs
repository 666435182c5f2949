// Adapters layer: concrete implementations of the domain ports.

pub mod spreadsheet;
pub mod storage;

pub use spreadsheet::SpreadsheetSource;
pub use storage::LocalStorage;
