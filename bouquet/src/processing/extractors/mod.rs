//! Format-specific text extractors. Each one is a pure function over the
//! file's bytes.

pub mod csv;
pub mod docx;
pub mod pdf;
pub mod text;

pub use csv::CsvExtractor;
pub use docx::DocxExtractor;
pub use pdf::PdfExtractor;
pub use text::TextExtractor;

/// Strip a UTF-8 byte order mark if present
pub(crate) fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes)
}
