//! CSV options

/// Options for reading CSV files
#[derive(Debug, Clone)]
pub struct CsvReadOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Quote character (default: double quote)
    pub quote: u8,
    /// Whether the first row is a header.
    ///
    /// The header row is still loaded as row 1, so addresses match what a
    /// spreadsheet application shows for the same file, but its fields are
    /// always kept as text.
    pub has_header: bool,
    /// Detect numbers and booleans instead of keeping every field as text
    pub auto_detect_types: bool,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            has_header: true,
            auto_detect_types: true,
        }
    }
}
