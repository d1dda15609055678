//! # sheet-seek-core
//!
//! Core data structures for the sheet-seek spreadsheet search library.
//!
//! This crate provides the read-only model that searches run against:
//! - [`CellValue`] - The value of a cell (empty, number, text, boolean, error)
//! - [`CellAddress`] - A 1-based cell location (e.g., "A1" = row 1, column 1)
//! - [`Workbook`], [`Worksheet`] - Ordered, uniquely named sheets of sparse cells
//! - [`CellStore`] - The `(row, col) -> value` accessor searches are written against
//!
//! ## Example
//!
//! ```rust
//! use sheet_seek_core::{CellStore, CellValue, Workbook, Worksheet};
//!
//! let mut sheet = Worksheet::new("Sheet1");
//! sheet.set_value("A5", "Hoge").unwrap();
//! sheet.set_value_at(2, 3, 42.0).unwrap();
//!
//! let mut workbook = Workbook::new();
//! workbook.add_worksheet(sheet).unwrap();
//!
//! let sheet = workbook.worksheet_by_name("Sheet1").unwrap();
//! assert_eq!(sheet.value_at(5, 1).as_text(), Some("Hoge"));
//! assert_eq!(sheet.value_at(2, 3), &CellValue::Number(42.0));
//! assert!(sheet.value_at(9, 9).is_empty());
//! ```

pub mod cell;
pub mod error;
pub mod store;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use cell::{CellAddress, CellError, CellStorage, CellValue, SharedString, StringPool};
pub use error::{Error, Result};
pub use store::CellStore;
pub use workbook::Workbook;
pub use worksheet::Worksheet;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u32 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
