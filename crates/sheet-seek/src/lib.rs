//! # sheet-seek
//!
//! Predicate-driven search over spreadsheet workbooks.
//!
//! A workbook is loaded once (XLSX or CSV) and then searched with plain
//! closures over [`CellValue`]:
//!
//! - [`ExcelHandle::find_sheets`] - sheets holding a matching cell
//! - [`ExcelHandle::find_cell`] - first matching `(row, col)` of a sheet
//! - [`ExcelHandle::iterate_row_values`] - lazy rows of values, each ended by
//!   a row predicate
//!
//! Rows and columns are 1-based. Any `IntoIterator<Item = u32> + Clone` is a
//! range: `3..10`, `(3..10).rev()`, `2..`, `[9, 10]` or a [`RangeSpec`].
//!
//! ## Example
//!
//! ```rust
//! use sheet_seek::prelude::*;
//!
//! let mut sheet = Worksheet::new("Sheet1");
//! sheet.set_value("A5", "Hoge").unwrap();
//! sheet.set_value("B1", 1.0).unwrap();
//! sheet.set_value("C1", 2.0).unwrap();
//!
//! let mut workbook = Workbook::new();
//! workbook.add_worksheet(sheet).unwrap();
//! let book = ExcelHandle::from_workbook(workbook);
//!
//! assert_eq!(book.find_sheets(2..10, [1], text_eq("Hoge")), vec!["Sheet1"]);
//! assert_eq!(book.find_cell("Sheet1", 1..10, 1..3, text_eq("Hoge")).unwrap(), Some((5, 1)));
//!
//! // Columns 2, 3, ... until the first empty cell
//! let rows: Vec<_> = book
//!     .iterate_row_values("Sheet1", [1], 2.., any_empty())
//!     .unwrap()
//!     .collect();
//! assert_eq!(rows, vec![vec![CellValue::Number(1.0), CellValue::Number(2.0)]]);
//! ```

pub mod handle;
pub mod matcher;
pub mod prelude;
pub mod range;
pub mod search;

pub use handle::{ExcelHandle, OpenOptions, WorkbookExt};
pub use matcher::{Criteria, Matcher, RowMatcher};
pub use range::{RangeCursor, RangeSpec};
pub use search::{first_match, RowValues, SearchEngine};

// Re-export core types
pub use sheet_seek_core::{
    CellAddress, CellError, CellStore, CellValue, Error, Result, SharedString, Workbook,
    Worksheet, MAX_COLS, MAX_ROWS,
};

// Re-export I/O types
pub use sheet_seek_csv::{CsvError, CsvReadOptions, CsvReader};
pub use sheet_seek_xlsx::{XlsxError, XlsxReader};
