//! Failures while loading an XLSX package

use thiserror::Error;

/// Result type for XLSX loading
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Why an XLSX file could not be turned into a workbook
#[derive(Debug, Error)]
pub enum XlsxError {
    /// The file could not be opened or read
    #[error("cannot read xlsx file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a readable ZIP archive
    #[error("not a zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A package part holds malformed XML
    #[error("malformed xml in package: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The archive is not a spreadsheet package (no `[Content_Types].xml`)
    #[error("not an xlsx package: {0}")]
    InvalidFormat(String),

    /// A part the workbook or its relationships point at is absent
    #[error("package part missing: {0}")]
    MissingPart(String),

    /// A row number, cell reference or shared string index is unusable
    #[error("bad worksheet data: {0}")]
    Parse(String),

    /// A sheet name or cell position was rejected by the workbook
    #[error("workbook rejected sheet data: {0}")]
    Core(#[from] sheet_seek_core::Error),
}
