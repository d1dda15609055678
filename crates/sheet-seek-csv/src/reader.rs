//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::CsvReadOptions;
use sheet_seek_core::{CellValue, StringPool, Worksheet};

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file into a worksheet with the given name
    pub fn read_file<P: AsRef<Path>>(
        path: P,
        sheet_name: &str,
        options: &CsvReadOptions,
    ) -> CsvResult<Worksheet> {
        let path = path.as_ref();
        log::debug!("opening csv file {}", path.display());
        let file = File::open(path)?;
        Self::read(file, sheet_name, options)
    }

    /// Read CSV from a reader into a worksheet with the given name
    ///
    /// Record `n` (1-based, header included) becomes row `n`; field `m` becomes
    /// column `m`. Rows may have different lengths.
    pub fn read<R: Read>(
        reader: R,
        sheet_name: &str,
        options: &CsvReadOptions,
    ) -> CsvResult<Worksheet> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut worksheet = Worksheet::new(sheet_name);
        let mut pool = StringPool::new();

        for (idx, result) in csv_reader.records().enumerate() {
            let record = result?;
            let row = idx as u32 + 1;
            let is_header = options.has_header && idx == 0;

            for (col, field) in record.iter().enumerate() {
                let value = if options.auto_detect_types && !is_header {
                    match Self::detect_type(field) {
                        CellValue::String(_) => CellValue::String(pool.intern(field)),
                        other => other,
                    }
                } else if field.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::String(pool.intern(field))
                };

                worksheet.set_value_at(row, col as u32 + 1, value)?;
            }
        }

        log::debug!("read {} csv cells", worksheet.cell_count());
        Ok(worksheet)
    }

    /// Detect the type of a field value
    fn detect_type(field: &str) -> CellValue {
        let trimmed = field.trim();

        if trimmed.is_empty() {
            return CellValue::Empty;
        }

        if trimmed.eq_ignore_ascii_case("true") {
            return CellValue::Boolean(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return CellValue::Boolean(false);
        }

        if let Ok(n) = trimmed.parse::<f64>() {
            if n.is_finite() {
                return CellValue::Number(n);
            }
        }

        CellValue::string(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheet_seek_core::CellStore;

    #[test]
    fn test_header_kept_as_text_row() {
        let data = "id,name,score\n1,Hoge,5.5\n2,,true\n";
        let ws = CsvReader::read(data.as_bytes(), "scores", &CsvReadOptions::default()).unwrap();

        assert_eq!(ws.name(), "scores");
        assert_eq!(ws.value_at(1, 1), &CellValue::string("id"));
        assert_eq!(ws.value_at(2, 1), &CellValue::Number(1.0));
        assert_eq!(ws.value_at(2, 2), &CellValue::string("Hoge"));
        assert_eq!(ws.value_at(2, 3), &CellValue::Number(5.5));
        assert!(ws.value_at(3, 2).is_empty());
        assert_eq!(ws.value_at(3, 3), &CellValue::Boolean(true));
    }

    #[test]
    fn test_repeated_text_is_shared() {
        let ws = CsvReader::read("city\nOslo\nOslo\n".as_bytes(), "Sheet1", &CsvReadOptions::default())
            .unwrap();

        match (ws.value_at(2, 1), ws.value_at(3, 1)) {
            (CellValue::String(a), CellValue::String(b)) => assert!(a.ptr_eq(b)),
            other => panic!("expected two strings, got {:?}", other),
        }
    }

    #[test]
    fn test_no_type_detection() {
        let options = CsvReadOptions {
            auto_detect_types: false,
            ..Default::default()
        };
        let ws = CsvReader::read("a\n42\n".as_bytes(), "Sheet1", &options).unwrap();
        assert_eq!(ws.value_at(2, 1), &CellValue::string("42"));
    }

    #[test]
    fn test_ragged_rows_and_delimiter() {
        let options = CsvReadOptions {
            delimiter: b';',
            has_header: false,
            ..Default::default()
        };
        let ws = CsvReader::read("1;2;3\n4\n".as_bytes(), "Sheet1", &options).unwrap();
        assert_eq!(ws.value_at(1, 3), &CellValue::Number(3.0));
        assert_eq!(ws.value_at(2, 1), &CellValue::Number(4.0));
        assert!(ws.value_at(2, 2).is_empty());
    }

    #[test]
    fn test_detect_type() {
        assert_eq!(CsvReader::detect_type(""), CellValue::Empty);
        assert_eq!(CsvReader::detect_type(" 7 "), CellValue::Number(7.0));
        assert_eq!(CsvReader::detect_type("FALSE"), CellValue::Boolean(false));
        assert_eq!(CsvReader::detect_type("NaN"), CellValue::string("NaN"));
        assert_eq!(CsvReader::detect_type("Foo"), CellValue::string("Foo"));
    }

    #[test]
    fn test_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "x\n3\n").unwrap();

        let ws = CsvReader::read_file(&path, "data", &CsvReadOptions::default()).unwrap();
        assert_eq!(ws.value_at(2, 1), &CellValue::Number(3.0));
    }
}
