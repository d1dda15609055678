//! # sheet-seek-xlsx
//!
//! Read-only XLSX (Office Open XML) loader for sheet-seek.
//!
//! Only cell values are loaded: shared strings, inline strings, numbers,
//! booleans, error values and the cached results of formula cells. Styles,
//! comments and formula text are skipped.

pub mod error;
pub mod reader;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
