//! Prelude module - common imports for sheet-seek users
//!
//! ```rust
//! use sheet_seek::prelude::*;
//! ```

pub use crate::matcher::{
    all_empty, any_empty, is_empty, max_len, never, not_empty, number_where, text_eq,
};
pub use crate::{
    CellAddress, CellStore, CellValue, Criteria, Error, ExcelHandle, Matcher, OpenOptions,
    RangeSpec, Result, RowMatcher, SearchEngine, Workbook, WorkbookExt, Worksheet,
};
