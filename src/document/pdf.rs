// src/document/pdf.rs
use crate::document::{Page, Table};
use crate::utils::error::DocumentError;
use pdfplumber::{Pdf, TableSettings, TextOptions};
use std::fs;
use std::path::Path;

/// An opened PDF whose pages are converted on demand.
pub struct PdfDocument {
    pdf: Pdf,
}

impl PdfDocument {
    pub fn open_file<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        tracing::info!("Opening PDF: {}", path.display());
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocumentError> {
        let pdf = Pdf::open(bytes, None).map_err(|e| DocumentError::Pdf(e.to_string()))?;
        Ok(Self { pdf })
    }

    pub fn page_count(&self) -> usize {
        self.pdf.page_count()
    }

    /// Lazily extracts pages in document order. A page is only parsed when
    /// the iterator reaches it, so stopping early skips the rest of the file.
    pub fn pages(&self) -> impl Iterator<Item = Result<Page, DocumentError>> + '_ {
        let text_options = TextOptions::default();
        let table_settings = TableSettings::default();

        self.pdf.pages_iter().enumerate().map(move |(index, result)| -> Result<Page, DocumentError> {
            let page = result.map_err(|e| DocumentError::Pdf(format!("page {}: {}", index + 1, e)))?;

            let text = page.extract_text(&text_options);
            let tables: Vec<Table> = page
                .find_tables(&table_settings)
                .into_iter()
                .map(|table| {
                    table
                        .rows
                        .into_iter()
                        .map(|cells| cells.into_iter().map(|cell| cell.text).collect())
                        .collect()
                })
                .collect();

            tracing::debug!("Page {}: {} chars of text, {} table(s)", index + 1, text.len(), tables.len());

            Ok(Page {
                index,
                text: if text.is_empty() { None } else { Some(text) },
                tables,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_pdf_bytes() {
        let result = PdfDocument::from_bytes(b"this is not a pdf");
        assert!(matches!(result, Err(DocumentError::Pdf(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("annex_extractor_definitely_missing.pdf");
        let result = PdfDocument::open_file(&path);
        assert!(matches!(result, Err(DocumentError::Io(_))));
    }
}
