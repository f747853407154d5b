use crate::error::{BouquetError, Result};

/// Text-layer extraction for PDFs. Pages without a text layer contribute
/// nothing; there is no OCR fallback.
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn extract(bytes: &[u8]) -> Result<String> {
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| BouquetError::Parse(format!("PDF extraction failed: {e}")))
    }
}
