// src/extractors/mod.rs
pub mod annex;
pub mod filter;
pub mod record;
pub mod section;

// Re-export key extraction types for convenience
#[allow(unused_imports)]
pub use annex::{ExtractionReport, RecordExtractor, SectionEntry};
pub use record::Record;
pub use section::SectionMarker;
