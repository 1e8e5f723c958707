//! Structured error types for xlwrite.
//!
//! Model mutations validate their input before touching any state, so every
//! error except [`XlwriteError::Packaging`] means nothing was changed.

/// All errors that can occur while building or saving a workbook.
#[derive(Debug, thiserror::Error)]
pub enum XlwriteError {
    /// A cell reference or range did not match `<letters><digits>`.
    #[error("Malformed cell reference: {0:?}")]
    MalformedReference(String),

    /// Column index outside `1..=16384`.
    #[error("Column {0} is outside 1..=16384")]
    ColumnOutOfRange(u32),

    /// Row index outside `1..=1048576`.
    #[error("Row {0} is outside 1..=1048576")]
    RowOutOfRange(u32),

    /// Sheet insertion index past the end of the sheet list.
    #[error("Invalid sheet index {index} (workbook has {count} sheets)")]
    InvalidIndex { index: usize, count: usize },

    /// Lookup or activation of a sheet that does not exist.
    #[error("Sheet not found at index {0}")]
    SheetNotFound(usize),

    /// Sheet name rejected by the naming rules.
    #[error("Invalid sheet name {name:?}: {reason}")]
    InvalidSheetName { name: String, reason: &'static str },

    /// Color that is not 6 or 8 hex digits.
    #[error("Invalid ARGB color: {0:?}")]
    InvalidColor(String),

    /// Font size that is not a positive decimal point size.
    #[error("Invalid font size: {0:?}")]
    InvalidFontSize(String),

    /// Unknown pattern or border style keyword.
    #[error("Invalid style keyword: {0:?}")]
    InvalidStyle(String),

    /// The package could not be rendered or written.
    #[error("Packaging failed: {0}")]
    Packaging(#[from] PackagingError),

    /// Workbook options could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Failures while producing the zip container.
#[derive(Debug, thiserror::Error)]
pub enum PackagingError {
    /// XML emission error from quick-xml.
    #[error("XML writer: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIP archive error.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error (temp file, rename, destination).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, XlwriteError>;

impl From<quick_xml::Error> for XlwriteError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Packaging(PackagingError::Xml(e))
    }
}

impl From<zip::result::ZipError> for XlwriteError {
    fn from(e: zip::result::ZipError) -> Self {
        Self::Packaging(PackagingError::Zip(e))
    }
}

impl From<std::io::Error> for XlwriteError {
    fn from(e: std::io::Error) -> Self {
        Self::Packaging(PackagingError::Io(e))
    }
}
