//! # sheet-seek-csv
//!
//! Read-only CSV loader for sheet-seek. A CSV file becomes a single worksheet.

mod error;
mod options;
mod reader;

pub use error::{CsvError, CsvResult};
pub use options::CsvReadOptions;
pub use reader::CsvReader;
