//! Worksheet type

use crate::cell::{CellAddress, CellStorage, CellValue};
use crate::error::{Error, Result};
use crate::store::{empty_value, CellStore};
use crate::{MAX_COLS, MAX_ROWS};

/// A worksheet (single sheet in a workbook)
#[derive(Debug)]
pub struct Worksheet {
    /// Sheet name
    name: String,
    /// Cell storage
    cells: CellStorage,
    /// Sheet is visible
    visible: bool,
}

impl Worksheet {
    /// Create a new worksheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cells: CellStorage::new(),
            visible: true,
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if the sheet is visible
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Set sheet visibility
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    // === Cell Access ===

    /// Get a cell value by address string (e.g., "A1")
    pub fn value(&self, address: &str) -> Result<&CellValue> {
        let addr = CellAddress::parse(address)?;
        Ok(self.value_at(addr.row, addr.col))
    }

    /// Number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.cells.cell_count()
    }

    /// Get the used range as `(top_left, bottom_right)`, or `None` for an empty sheet
    pub fn used_range(&self) -> Option<(CellAddress, CellAddress)> {
        self.cells
            .used_bounds()
            .map(|(min_row, min_col, max_row, max_col)| {
                (
                    CellAddress::new(min_row, min_col),
                    CellAddress::new(max_row, max_col),
                )
            })
    }

    // === Cell Modification ===

    /// Set a cell value by address string
    pub fn set_value<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_value_at(addr.row, addr.col, value)
    }

    /// Set a cell value by 1-based row and column indices
    ///
    /// Text is stored as given, so a [`SharedString`](crate::SharedString) from a
    /// loader's pool stays shared.
    pub fn set_value_at<V: Into<CellValue>>(&mut self, row: u32, col: u32, value: V) -> Result<()> {
        self.validate_cell_position(row, col)?;
        self.cells.set(row, col, value.into());
        Ok(())
    }

    fn validate_cell_position(&self, row: u32, col: u32) -> Result<()> {
        if row == 0 || row > MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS));
        }
        if col == 0 || col > MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col, MAX_COLS));
        }
        Ok(())
    }
}

impl CellStore for Worksheet {
    fn value_at(&self, row: u32, col: u32) -> &CellValue {
        self.cells.get(row, col).unwrap_or_else(|| empty_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::SharedString;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_and_read_values() {
        let mut ws = Worksheet::new("Data");
        ws.set_value("D7", "Foo").unwrap();
        ws.set_value_at(2, 1, 12.5).unwrap();
        ws.set_value_at(3, 1, true).unwrap();

        assert_eq!(ws.value("D7").unwrap(), &CellValue::string("Foo"));
        assert_eq!(ws.value_at(7, 4), &CellValue::string("Foo"));
        assert_eq!(ws.value_at(2, 1), &CellValue::Number(12.5));
        assert_eq!(ws.value_at(3, 1), &CellValue::Boolean(true));
        assert_eq!(ws.cell_count(), 3);
    }

    #[test]
    fn test_absent_and_zero_index_read_empty() {
        let ws = Worksheet::new("Data");
        assert!(ws.value_at(1, 1).is_empty());
        assert!(ws.value_at(0, 0).is_empty());
        assert!(ws.value_at(u32::MAX, u32::MAX).is_empty());
    }

    #[test]
    fn test_out_of_bounds_writes_rejected() {
        let mut ws = Worksheet::new("Data");
        assert!(matches!(
            ws.set_value_at(0, 1, 1.0),
            Err(Error::RowOutOfBounds(0, _))
        ));
        assert!(matches!(
            ws.set_value_at(1, MAX_COLS + 1, 1.0),
            Err(Error::ColumnOutOfBounds(_, _))
        ));
    }

    #[test]
    fn test_shared_text_stays_shared() {
        let shared = SharedString::new("same");
        let mut ws = Worksheet::new("Data");
        ws.set_value_at(1, 1, CellValue::String(shared.clone())).unwrap();
        ws.set_value_at(2, 1, CellValue::String(shared)).unwrap();

        match (ws.value_at(1, 1), ws.value_at(2, 1)) {
            (CellValue::String(a), CellValue::String(b)) => assert!(a.ptr_eq(b)),
            other => panic!("expected two strings, got {:?}", other),
        }
    }

    #[test]
    fn test_used_range_and_row_values() {
        let mut ws = Worksheet::new("Data");
        assert!(ws.used_range().is_none());

        ws.set_value_at(2, 3, 1.0).unwrap();
        ws.set_value_at(5, 2, 2.0).unwrap();
        assert_eq!(
            ws.used_range(),
            Some((CellAddress::new(2, 2), CellAddress::new(5, 3)))
        );

        assert_eq!(
            ws.row_values(2, 2..=4),
            vec![CellValue::Empty, CellValue::Number(1.0), CellValue::Empty]
        );
    }
}
