// src/storage/mod.rs
use crate::extractors::{ExtractionReport, Record};
use crate::utils::error::StorageError;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub struct StorageManager {
    output_path: PathBuf,
}

impl StorageManager {
    /// Creates a StorageManager writing to `output_path`, creating its
    /// parent directory if needed.
    pub fn new<P: AsRef<Path>>(output_path: P) -> Result<Self, StorageError> {
        let output_path = output_path.as_ref().to_path_buf();

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(StorageError::IoError)?;
            }
        }

        Ok(Self { output_path })
    }

    /// Path of the metadata sidecar: `<stem>_meta.json` next to the output.
    pub fn metadata_path(&self) -> PathBuf {
        let stem = self
            .output_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "records".to_string());
        self.output_path.with_file_name(format!("{}_meta.json", stem))
    }

    /// Saves the records as a pretty-printed JSON array
    pub fn save_records(&self, records: &[Record]) -> Result<PathBuf, StorageError> {
        let json = serde_json::to_string_pretty(records)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&self.output_path, json).map_err(StorageError::IoError)?;

        tracing::info!("Saved {} records to {}", records.len(), self.output_path.display());

        Ok(self.output_path.clone())
    }

    /// Saves run metadata in JSON format
    pub fn save_metadata(&self, report: &ExtractionReport, source: &str) -> Result<PathBuf, StorageError> {
        let file_path = self.metadata_path();

        let mut per_section: BTreeMap<&str, usize> = BTreeMap::new();
        for record in &report.records {
            *per_section.entry(record.list_type.as_str()).or_default() += 1;
        }

        let metadata = serde_json::json!({
            "source": source,
            "output": self.output_path.display().to_string(),
            "record_count": report.records.len(),
            "records_per_section": per_section,
            "pages_visited": report.pages_visited,
            "terminal_page": report.terminal_page,
            "section_entries": report.section_entries,
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, metadata_str).map_err(StorageError::IoError)?;

        tracing::info!("Saved metadata to {}", file_path.display());

        Ok(file_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::{SectionEntry, SectionMarker};

    fn temp_output(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("annex_extractor_storage_{}_{}", name, std::process::id()))
            .join("out.json")
    }

    #[test]
    fn test_save_records_writes_json_array() {
        let output = temp_output("records");
        let storage = StorageManager::new(&output).unwrap();
        let records = vec![Record::new(SectionMarker::UvFilter, "Octocrilène", "3 | Octocrilène | 10%".to_string())];

        let path = storage.save_records(&records).unwrap();
        let written = fs::read_to_string(&path).unwrap();

        assert!(written.contains("\"list_type\": \"UV_FILTER\""));
        assert!(written.contains("Octocrilène"), "non-ASCII must be written as-is");
        let back: Vec<Record> = serde_json::from_str(&written).unwrap();
        assert_eq!(back, records);

        fs::remove_dir_all(output.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_save_metadata_counts_sections() {
        let output = temp_output("meta");
        let storage = StorageManager::new(&output).unwrap();
        let report = ExtractionReport {
            records: vec![
                Record::new(SectionMarker::Prohibited, "Chloroform", "Chloroform".to_string()),
                Record::new(SectionMarker::Prohibited, "Bithionol", "Bithionol".to_string()),
                Record::new(SectionMarker::Restricted, "Boric acid", "Boric acid".to_string()),
            ],
            pages_visited: 9,
            terminal_page: Some(9),
            section_entries: vec![SectionEntry { page: 2, section: SectionMarker::Prohibited }],
        };

        let path = storage.save_metadata(&report, "annexes.pdf").unwrap();
        assert!(path.ends_with("out_meta.json"));

        let meta: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(meta["record_count"], 3);
        assert_eq!(meta["records_per_section"]["PROHIBITED"], 2);
        assert_eq!(meta["records_per_section"]["RESTRICTED"], 1);
        assert_eq!(meta["terminal_page"], 9);
        assert_eq!(meta["section_entries"][0]["section"], "PROHIBITED");
        assert_eq!(meta["source"], "annexes.pdf");

        fs::remove_dir_all(output.parent().unwrap()).unwrap();
    }
}
