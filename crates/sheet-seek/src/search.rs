//! Predicate-driven search over a workbook
//!
//! All positions are 1-based `(row, col)`. Ranges are pulled lazily and scans
//! stop at the first match, so an unbounded range is fine as long as something
//! in it matches. When nothing does, the scan never ends.

use std::convert::Infallible;
use std::iter::FusedIterator;

use sheet_seek_core::{CellAddress, CellStore, CellValue, Result, Workbook, Worksheet};

use crate::matcher::{Matcher, RowMatcher};

/// Searches over a loaded workbook.
///
/// The engine only borrows the workbook, so any number of engines can search
/// the same workbook at once.
#[derive(Debug, Clone, Copy)]
pub struct SearchEngine<'wb> {
    workbook: &'wb Workbook,
}

impl<'wb> SearchEngine<'wb> {
    /// Create an engine over a workbook
    pub fn new(workbook: &'wb Workbook) -> Self {
        Self { workbook }
    }

    /// The workbook being searched
    pub fn workbook(&self) -> &'wb Workbook {
        self.workbook
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> Vec<&'wb str> {
        self.workbook.sheet_names().collect()
    }

    /// Names of the sheets holding at least one matching cell in
    /// `rows × cols`, in workbook order.
    ///
    /// Each sheet is scanned rows outer, columns inner, and is left at its
    /// first match.
    pub fn find_sheets<R, C, M>(&self, rows: R, cols: C, mut pred: M) -> Vec<String>
    where
        R: IntoIterator<Item = u32> + Clone,
        C: IntoIterator<Item = u32> + Clone,
        M: Matcher,
    {
        let found = self.try_find_sheets(rows, cols, |value: &CellValue| {
            Ok::<_, Infallible>(pred.matches(value))
        });
        into_ok(found)
    }

    /// [`find_sheets`](Self::find_sheets) with a fallible predicate.
    ///
    /// The first error returned by the predicate aborts the search.
    pub fn try_find_sheets<R, C, F, E>(
        &self,
        rows: R,
        cols: C,
        mut pred: F,
    ) -> std::result::Result<Vec<String>, E>
    where
        R: IntoIterator<Item = u32> + Clone,
        C: IntoIterator<Item = u32> + Clone,
        F: FnMut(&CellValue) -> std::result::Result<bool, E>,
    {
        let mut names = Vec::new();
        for sheet in self.workbook.worksheets() {
            if first_match(sheet, rows.clone(), &cols, &mut pred)?.is_some() {
                names.push(sheet.name().to_string());
            }
        }

        log::debug!(
            "find_sheets: {} of {} sheets matched",
            names.len(),
            self.workbook.sheet_count()
        );
        Ok(names)
    }

    /// First `(row, col)` of `sheet` in `rows × cols` whose value matches.
    ///
    /// Rows are visited in the order `rows` yields them, so a reversed row
    /// range finds the last match first. `Ok(None)` means no position matched.
    pub fn find_cell<R, C, M>(
        &self,
        sheet: &str,
        rows: R,
        cols: C,
        mut pred: M,
    ) -> Result<Option<(u32, u32)>>
    where
        R: IntoIterator<Item = u32>,
        C: IntoIterator<Item = u32> + Clone,
        M: Matcher,
    {
        self.try_find_cell(sheet, rows, cols, |value: &CellValue| {
            Ok(pred.matches(value))
        })
    }

    /// [`find_cell`](Self::find_cell) with a fallible predicate.
    ///
    /// The first error returned by the predicate is returned as is.
    pub fn try_find_cell<R, C, F>(
        &self,
        sheet: &str,
        rows: R,
        cols: C,
        mut pred: F,
    ) -> Result<Option<(u32, u32)>>
    where
        R: IntoIterator<Item = u32>,
        C: IntoIterator<Item = u32> + Clone,
        F: FnMut(&CellValue) -> Result<bool>,
    {
        let worksheet = self.workbook.sheet(sheet)?;
        let found = first_match(worksheet, rows, &cols, &mut pred)?;

        match found {
            Some((row, col)) => log::debug!("find_cell: '{}' matched at ({}, {})", sheet, row, col),
            None => log::debug!("find_cell: no match in '{}'", sheet),
        }
        Ok(found)
    }

    /// [`find_cell`](Self::find_cell) returning a [`CellAddress`]
    pub fn find_cell_address<R, C, M>(
        &self,
        sheet: &str,
        rows: R,
        cols: C,
        pred: M,
    ) -> Result<Option<CellAddress>>
    where
        R: IntoIterator<Item = u32>,
        C: IntoIterator<Item = u32> + Clone,
        M: Matcher,
    {
        Ok(self
            .find_cell(sheet, rows, cols, pred)?
            .map(CellAddress::from))
    }

    /// Lazily collect the values of each row in `rows` over `cols`.
    ///
    /// See [`RowValues`] for how `stop` ends a row.
    pub fn iterate_row_values<R, C, P>(
        &self,
        sheet: &str,
        rows: R,
        cols: C,
        stop: P,
    ) -> Result<RowValues<'wb, Worksheet, R::IntoIter, C, P>>
    where
        R: IntoIterator<Item = u32>,
        C: IntoIterator<Item = u32> + Clone,
        P: RowMatcher,
    {
        let worksheet = self.workbook.sheet(sheet)?;
        log::debug!("iterate_row_values: reading rows of '{}'", sheet);
        Ok(RowValues::new(worksheet, rows, cols, stop))
    }
}

/// Scan `rows × cols` of `store` row-major and return the first position whose
/// value satisfies `pred`.
///
/// `cols` is cloned once per row; nothing is pulled from either range after
/// the match.
pub fn first_match<S, R, C, F, E>(
    store: &S,
    rows: R,
    cols: &C,
    pred: &mut F,
) -> std::result::Result<Option<(u32, u32)>, E>
where
    S: CellStore + ?Sized,
    R: IntoIterator<Item = u32>,
    C: IntoIterator<Item = u32> + Clone,
    F: FnMut(&CellValue) -> std::result::Result<bool, E>,
{
    for row in rows {
        for col in cols.clone() {
            if pred(store.value_at(row, col))? {
                return Ok(Some((row, col)));
            }
        }
    }
    Ok(None)
}

fn into_ok<T>(result: std::result::Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// Lazy sequence of row values produced by
/// [`SearchEngine::iterate_row_values`].
///
/// For each row, columns are pulled one at a time. After each value is
/// appended, `stop` sees the values collected so far; when it returns `true`
/// the value just appended is dropped and the row is yielded without it. A
/// stop that first fires at the k-th column therefore yields k - 1 values.
/// A finite column range that runs out first yields the whole row.
///
/// Nothing is read until the iterator is advanced, and each call to `next`
/// reads exactly one row. With an unbounded column range a row only ends
/// when `stop` fires.
pub struct RowValues<'a, S: ?Sized, R, C, P> {
    store: &'a S,
    rows: R,
    cols: C,
    stop: P,
    yielded: usize,
}

impl<'a, S, I, C, P> RowValues<'a, S, I, C, P>
where
    S: CellStore + ?Sized,
    I: Iterator<Item = u32>,
    C: IntoIterator<Item = u32> + Clone,
    P: RowMatcher,
{
    /// Iterate rows of any cell store
    pub fn new<R>(store: &'a S, rows: R, cols: C, stop: P) -> Self
    where
        R: IntoIterator<Item = u32, IntoIter = I>,
    {
        Self {
            store,
            rows: rows.into_iter(),
            cols,
            stop,
            yielded: 0,
        }
    }
}

impl<S: ?Sized, R, C, P> RowValues<'_, S, R, C, P> {
    /// Number of rows produced so far
    pub fn rows_yielded(&self) -> usize {
        self.yielded
    }
}

impl<S, R, C, P> Iterator for RowValues<'_, S, R, C, P>
where
    S: CellStore + ?Sized,
    R: Iterator<Item = u32>,
    C: IntoIterator<Item = u32> + Clone,
    P: RowMatcher,
{
    type Item = Vec<CellValue>;

    fn next(&mut self) -> Option<Vec<CellValue>> {
        let row = self.rows.next()?;

        let mut values = Vec::new();
        for col in self.cols.clone() {
            values.push(self.store.value_at(row, col).clone());
            if self.stop.matches(&values) {
                values.pop();
                break;
            }
        }

        self.yielded += 1;
        Some(values)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl<S, R, C, P> FusedIterator for RowValues<'_, S, R, C, P>
where
    S: CellStore + ?Sized,
    R: FusedIterator<Item = u32>,
    C: IntoIterator<Item = u32> + Clone,
    P: RowMatcher,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{any_empty, never, text_eq};
    use crate::range::RangeSpec;
    use pretty_assertions::assert_eq;
    use sheet_seek_core::Error;

    fn workbook() -> Workbook {
        let mut sheet1 = Worksheet::new("Sheet1");
        sheet1.set_value("A5", "Hoge").unwrap();
        for (col, value) in [(2, 1.0), (3, 2.0), (4, 3.0)] {
            sheet1.set_value_at(1, col, value).unwrap();
        }

        let mut sheet2 = Worksheet::new("Sheet2");
        sheet2.set_value("D7", "Foo").unwrap();
        sheet2.set_value("F8", "Foo").unwrap();

        let mut wb = Workbook::new();
        wb.add_worksheet(sheet1).unwrap();
        wb.add_worksheet(sheet2).unwrap();
        wb
    }

    #[test]
    fn test_find_sheets() {
        let wb = workbook();
        let engine = SearchEngine::new(&wb);

        assert_eq!(engine.find_sheets(2..10, [1], text_eq("Hoge")), vec!["Sheet1"]);
        assert_eq!(
            engine.find_sheets(1..10, 1..10, text_eq("Foo")),
            vec!["Sheet2"]
        );
        assert!(engine.find_sheets(1..10, 1..10, text_eq("Bar")).is_empty());
    }

    #[test]
    fn test_find_cell_order_follows_rows() {
        let wb = workbook();
        let engine = SearchEngine::new(&wb);

        let forward = engine.find_cell("Sheet2", 3..10, 3..10, text_eq("Foo")).unwrap();
        let backward = engine
            .find_cell("Sheet2", (3..10).rev(), 3..10, text_eq("Foo"))
            .unwrap();
        assert_eq!(forward, Some((7, 4)));
        assert_eq!(backward, Some((8, 6)));

        let spec = RangeSpec::span(3, 10).reversed().unwrap();
        assert_eq!(
            engine.find_cell("Sheet2", &spec, 3..10, text_eq("Foo")).unwrap(),
            Some((8, 6))
        );
    }

    #[test]
    fn test_find_cell_unknown_sheet() {
        let wb = workbook();
        let err = SearchEngine::new(&wb)
            .find_cell("Nope", 1..2, 1..2, text_eq("x"))
            .unwrap_err();
        assert!(matches!(err, Error::SheetNotFound(name) if name == "Nope"));
    }

    #[test]
    fn test_find_cell_address() {
        let wb = workbook();
        let addr = SearchEngine::new(&wb)
            .find_cell_address("Sheet1", 1..10, 1..3, text_eq("Hoge"))
            .unwrap();
        assert_eq!(addr.map(|a| a.to_string()), Some("A5".to_string()));
    }

    #[test]
    fn test_try_find_cell_propagates_predicate_error() {
        let wb = workbook();
        let engine = SearchEngine::new(&wb);

        // Row 1 holds numbers from column 2 on; column 1 is empty
        let result = engine.try_find_cell("Sheet1", [1], 2..5, |v: &CellValue| {
            Ok(v.expect_number()? > 2.0)
        });
        assert_eq!(result.unwrap(), Some((1, 4)));

        let result = engine.try_find_cell("Sheet1", [1], 1..5, |v: &CellValue| {
            Ok(v.expect_number()? > 2.0)
        });
        assert!(matches!(
            result,
            Err(Error::InvalidValueType { expected: "number", .. })
        ));
    }

    #[test]
    fn test_first_match_stops_pulling() {
        let wb = workbook();
        let sheet = wb.sheet("Sheet1").unwrap();
        let mut pulled = Vec::new();
        let rows = (1..).inspect(|r| pulled.push(*r));

        let found = first_match(sheet, rows, &(1..3), &mut |v: &CellValue| {
            Ok::<_, Infallible>(v == "Hoge")
        })
        .unwrap();
        assert_eq!(found, Some((5, 1)));
        assert_eq!(pulled, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_row_values_stop_drops_trigger() {
        let wb = workbook();
        let engine = SearchEngine::new(&wb);

        let rows: Vec<_> = engine
            .iterate_row_values("Sheet1", [1, 5], 2.., any_empty())
            .unwrap()
            .collect();
        assert_eq!(
            rows,
            vec![
                vec![CellValue::Number(1.0), CellValue::Number(2.0), CellValue::Number(3.0)],
                vec![],
            ]
        );
    }

    #[test]
    fn test_row_values_finite_cols_without_stop() {
        let wb = workbook();
        let mut rows = SearchEngine::new(&wb)
            .iterate_row_values("Sheet1", vec![1], (2..5).step_by(2), never())
            .unwrap();
        assert_eq!(
            rows.next(),
            Some(vec![CellValue::Number(1.0), CellValue::Number(3.0)])
        );
        assert_eq!(rows.next(), None);
        assert_eq!(rows.rows_yielded(), 1);
    }
}
