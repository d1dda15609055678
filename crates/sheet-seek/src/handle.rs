//! Opening workbooks and searching them

use std::path::{Path, PathBuf};

use sheet_seek_core::{CellAddress, CellValue, Error, Result, Workbook, Worksheet};
use sheet_seek_csv::{CsvReadOptions, CsvReader};
use sheet_seek_xlsx::XlsxReader;

use crate::matcher::{Matcher, RowMatcher};
use crate::search::{RowValues, SearchEngine};

/// Options for [`ExcelHandle::open_with`]
#[derive(Debug, Clone)]
pub struct OpenOptions {
    /// How CSV files are parsed
    pub csv: CsvReadOptions,
    /// Name of the single sheet a CSV file is loaded into
    pub sheet_name_for_csv: String,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            csv: CsvReadOptions::default(),
            sheet_name_for_csv: "Sheet1".to_string(),
        }
    }
}

/// Extension trait for Workbook to add file loading
pub trait WorkbookExt {
    /// Open a workbook from a file
    fn open<P: AsRef<Path>>(path: P) -> Result<Workbook>;

    /// Open a workbook from a file with explicit options
    fn open_with<P: AsRef<Path>>(path: P, options: &OpenOptions) -> Result<Workbook>;
}

impl WorkbookExt for Workbook {
    fn open<P: AsRef<Path>>(path: P) -> Result<Workbook> {
        Self::open_with(path, &OpenOptions::default())
    }

    fn open_with<P: AsRef<Path>>(path: P, options: &OpenOptions) -> Result<Workbook> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension.as_deref() {
            Some("xlsx") | Some("xlsm") => {
                XlsxReader::read_file(path).map_err(|e| Error::other(e.to_string()))
            }
            Some("csv") => {
                let worksheet =
                    CsvReader::read_file(path, &options.sheet_name_for_csv, &options.csv)
                        .map_err(|e| Error::other(e.to_string()))?;

                let mut workbook = Workbook::new();
                workbook.add_worksheet(worksheet)?;
                Ok(workbook)
            }
            _ => Err(Error::other(format!(
                "Unsupported file format: {}",
                path.display()
            ))),
        }
    }
}

/// A workbook opened once and searched any number of times.
///
/// ```no_run
/// use sheet_seek::prelude::*;
///
/// let book = ExcelHandle::open("./sample.xlsx")?;
///
/// let sheets = book.find_sheets(2..10, [1], |x: &CellValue| x == "Hoge");
/// let address = book.find_cell("Sheet2", (3..10).rev(), 3..10, |x: &CellValue| x == "Foo")?;
///
/// for values in book.iterate_row_values("Sheet1", [1, 5, 6], 2.., any_empty())? {
///     println!("{:?}", values);
/// }
/// # Ok::<(), sheet_seek::Error>(())
/// ```
#[derive(Debug)]
pub struct ExcelHandle {
    workbook: Workbook,
    path: Option<PathBuf>,
}

impl ExcelHandle {
    /// Open a workbook file, choosing the reader by extension
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, &OpenOptions::default())
    }

    /// Open a workbook file with explicit options
    pub fn open_with<P: AsRef<Path>>(path: P, options: &OpenOptions) -> Result<Self> {
        let path = path.as_ref();
        let workbook = Workbook::open_with(path, options)?;
        log::debug!(
            "opened {} with {} sheets",
            path.display(),
            workbook.sheet_count()
        );
        Ok(Self {
            workbook,
            path: Some(path.to_path_buf()),
        })
    }

    /// Wrap a workbook that is already in memory
    pub fn from_workbook(workbook: Workbook) -> Self {
        Self {
            workbook,
            path: None,
        }
    }

    /// The file the workbook was loaded from
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The loaded workbook
    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    /// Take the loaded workbook back
    pub fn into_workbook(self) -> Workbook {
        self.workbook
    }

    /// A search engine over the loaded workbook
    pub fn engine(&self) -> SearchEngine<'_> {
        SearchEngine::new(&self.workbook)
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.engine().sheet_names()
    }

    /// See [`SearchEngine::find_sheets`]
    pub fn find_sheets<R, C, M>(&self, rows: R, cols: C, pred: M) -> Vec<String>
    where
        R: IntoIterator<Item = u32> + Clone,
        C: IntoIterator<Item = u32> + Clone,
        M: Matcher,
    {
        self.engine().find_sheets(rows, cols, pred)
    }

    /// See [`SearchEngine::try_find_sheets`]
    pub fn try_find_sheets<R, C, F>(&self, rows: R, cols: C, pred: F) -> Result<Vec<String>>
    where
        R: IntoIterator<Item = u32> + Clone,
        C: IntoIterator<Item = u32> + Clone,
        F: FnMut(&CellValue) -> Result<bool>,
    {
        self.engine().try_find_sheets(rows, cols, pred)
    }

    /// See [`SearchEngine::find_cell`]
    pub fn find_cell<R, C, M>(
        &self,
        sheet: &str,
        rows: R,
        cols: C,
        pred: M,
    ) -> Result<Option<(u32, u32)>>
    where
        R: IntoIterator<Item = u32>,
        C: IntoIterator<Item = u32> + Clone,
        M: Matcher,
    {
        self.engine().find_cell(sheet, rows, cols, pred)
    }

    /// See [`SearchEngine::try_find_cell`]
    pub fn try_find_cell<R, C, F>(
        &self,
        sheet: &str,
        rows: R,
        cols: C,
        pred: F,
    ) -> Result<Option<(u32, u32)>>
    where
        R: IntoIterator<Item = u32>,
        C: IntoIterator<Item = u32> + Clone,
        F: FnMut(&CellValue) -> Result<bool>,
    {
        self.engine().try_find_cell(sheet, rows, cols, pred)
    }

    /// See [`SearchEngine::find_cell_address`]
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
        self.engine().find_cell_address(sheet, rows, cols, pred)
    }

    /// See [`SearchEngine::iterate_row_values`]
    pub fn iterate_row_values<R, C, P>(
        &self,
        sheet: &str,
        rows: R,
        cols: C,
        stop: P,
    ) -> Result<RowValues<'_, Worksheet, R::IntoIter, C, P>>
    where
        R: IntoIterator<Item = u32>,
        C: IntoIterator<Item = u32> + Clone,
        P: RowMatcher,
    {
        self.engine().iterate_row_values(sheet, rows, cols, stop)
    }
}

impl From<Workbook> for ExcelHandle {
    fn from(workbook: Workbook) -> Self {
        Self::from_workbook(workbook)
    }
}
