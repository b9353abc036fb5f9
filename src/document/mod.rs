// src/document/mod.rs
pub mod download;
pub mod pdf;

pub use pdf::PdfDocument;

/// One table row; `None` marks a cell the PDF reader found no text for.
pub type Row = Vec<Option<String>>;
pub type Table = Vec<Row>;

/// A page as seen by the extractor: its text and its tables, nothing else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub index: usize, // 0-based position in the document
    pub text: Option<String>,
    pub tables: Vec<Table>,
}

impl Page {
    #[cfg(test)]
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self { index, text: Some(text.into()), tables: Vec::new() }
    }

    #[cfg(test)]
    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    /// 1-based page number for diagnostics.
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

/// Builds a row from string literals; an empty literal stays an empty cell.
#[cfg(test)]
pub fn row(cells: &[&str]) -> Row {
    cells.iter().map(|c| Some(c.to_string())).collect()
}
