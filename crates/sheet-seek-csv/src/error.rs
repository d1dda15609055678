//! Failures while loading CSV text

use thiserror::Error;

/// Result type for CSV loading
pub type CsvResult<T> = std::result::Result<T, CsvError>;

/// Why a CSV file could not be turned into a single-sheet workbook
#[derive(Debug, Error)]
pub enum CsvError {
    /// The file could not be opened
    #[error("cannot read csv file: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be decoded, e.g. invalid UTF-8
    #[error("bad csv record: {0}")]
    Csv(#[from] csv::Error),

    /// A cell position was out of bounds
    #[error("workbook rejected csv data: {0}")]
    Core(#[from] sheet_seek_core::Error),
}
