//! Read-only cell access

use crate::cell::CellValue;

static EMPTY: CellValue = CellValue::Empty;

/// Read-only `(row, col) -> value` accessor.
///
/// Indices are 1-based. Cells that were never written, and index 0, read as
/// [`CellValue::Empty`]; a store never fails a lookup.
pub trait CellStore {
    /// Get the value at a position
    fn value_at(&self, row: u32, col: u32) -> &CellValue;

    /// Collect the values of one row for the given columns, in order
    fn row_values<I>(&self, row: u32, cols: I) -> Vec<CellValue>
    where
        I: IntoIterator<Item = u32>,
    {
        cols.into_iter()
            .map(|col| self.value_at(row, col).clone())
            .collect()
    }
}

/// The shared empty value handed out for absent cells
pub fn empty_value() -> &'static CellValue {
    &EMPTY
}
