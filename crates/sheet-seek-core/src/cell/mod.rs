//! Cell-related types
//!
//! This module contains:
//! - [`CellValue`] - The value stored in a cell
//! - [`CellAddress`] - A cell's 1-based location (e.g., "A1")
//! - [`CellStorage`] - Sparse row-major storage for one sheet

mod address;
mod storage;
mod value;

pub use address::CellAddress;
pub use storage::CellStorage;
pub use value::{CellError, CellValue, SharedString, StringPool};
