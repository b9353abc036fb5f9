// src/extractors/annex.rs

// --- Imports ---
use crate::config::ExtractionRules;
use crate::document::{Page, Row};
use crate::extractors::filter::{join_details, normalize_row, rejection_reason, select_candidate};
use crate::extractors::record::Record;
use crate::extractors::section::{SectionMarker, SectionState};
use crate::utils::page_debug::PageDumper;
use serde::Serialize;
use std::convert::Infallible;

// --- Data Structures ---
/// A page on which a section marker was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionEntry {
    pub page: usize, // 1-based
    pub section: SectionMarker,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionReport {
    pub records: Vec<Record>,
    pub pages_visited: usize,
    /// 1-based page where the terminal marker stopped the scan.
    pub terminal_page: Option<usize>,
    pub section_entries: Vec<SectionEntry>,
}

// --- Main Extractor Structure ---
/// Single pass over document pages, turning annex table rows into records.
pub struct RecordExtractor<'r> {
    rules: &'r ExtractionRules,
    dumper: Option<PageDumper>,
}

impl<'r> RecordExtractor<'r> {
    pub fn new(rules: &'r ExtractionRules) -> Self {
        Self { rules, dumper: None }
    }

    /// Writes an annotated copy of every visited page's text.
    pub fn with_page_dumps(mut self, dumper: PageDumper) -> Self {
        self.dumper = Some(dumper);
        self
    }

    /// Extracts records from pages that are already in memory.
    pub fn extract<I>(&self, pages: I) -> Vec<Record>
    where
        I: IntoIterator<Item = Page>,
    {
        match self.run(pages.into_iter().map(Ok::<Page, Infallible>)) {
            Ok(report) => report.records,
            Err(never) => match never {},
        }
    }

    /// Walks pages in order. A page error aborts the run; everything that
    /// goes wrong inside a row only drops that row.
    pub fn run<I, E>(&self, pages: I) -> Result<ExtractionReport, E>
    where
        I: IntoIterator<Item = Result<Page, E>>,
    {
        let mut state = SectionState::default();
        let mut report = ExtractionReport::default();

        for page in pages {
            let page = page?;
            report.pages_visited += 1;

            let text = match page.text.as_deref() {
                Some(text) if !text.is_empty() => text,
                _ => {
                    tracing::trace!("Page {}: no text, skipping", page.number());
                    continue;
                }
            };

            if let Some(dumper) = &self.dumper {
                if let Err(e) = dumper.dump(page.number(), text, self.rules) {
                    tracing::warn!("Failed to write debug dump for page {}: {}", page.number(), e);
                }
            }

            if self.rules.is_terminal(text) {
                tracing::info!("Page {}: reached contact point list, stopping", page.number());
                report.terminal_page = Some(page.number());
                break;
            }

            let detected = self.rules.detect_section(text);
            if let Some(section) = detected {
                tracing::info!("--> Page {}: Entered section {}", page.number(), section);
                report.section_entries.push(SectionEntry { page: page.number(), section });
            }
            state = state.advance(detected);

            let Some(section) = state.current() else {
                continue;
            };

            tracing::debug!("Page {}: scanning {} table(s) under {}", page.number(), page.tables.len(), section);
            for table in &page.tables {
                for row in table {
                    if let Some(record) = self.classify_row(row, section) {
                        report.records.push(record);
                    }
                }
            }
        }

        tracing::info!(
            "Extraction finished: {} records from {} pages",
            report.records.len(),
            report.pages_visited
        );
        Ok(report)
    }

    /// Zero or one record for a raw table row.
    fn classify_row(&self, row: &Row, section: SectionMarker) -> Option<Record> {
        let rule = self.rules.column_rule(section)?;
        let cells = normalize_row(row);
        let candidate = select_candidate(&cells, rule)?;

        if let Some(reason) = rejection_reason(candidate, self.rules) {
            tracing::trace!("Rejected {:?} under {}: {:?}", candidate, section, reason);
            return None;
        }

        Some(Record::new(section, candidate, join_details(&cells)))
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::row;

    const PROHIBITED_HEADER: &str =
        "ANNEX II\nLIST OF SUBSTANCES WHICH MUST NOT FORM PART OF THE COMPOSITION OF COSMETIC PRODUCTS";
    const RESTRICTED_HEADER: &str =
        "ANNEX III\nLIST OF SUBSTANCES WHICH COSMETIC PRODUCTS MUST NOT CONTAIN EXCEPT SUBJECT TO THE RESTRICTIONS";
    const PRESERVATIVE_HEADER: &str = "ANNEX VI\nLIST OF PRESERVATIVES WHICH COSMETIC PRODUCTS MAY CONTAIN";

    fn rules() -> ExtractionRules {
        ExtractionRules::builtin().unwrap()
    }

    #[test]
    fn test_restricted_row_becomes_record() {
        let rules = rules();
        let pages = vec![Page::new(0, RESTRICTED_HEADER).with_table(vec![row(&["1", "Hydroquinone", "2%"])])];

        let records = RecordExtractor::new(&rules).extract(pages);

        assert_eq!(
            records,
            vec![Record {
                list_type: SectionMarker::Restricted,
                ingredient_name: "Hydroquinone".to_string(),
                risk: "Moderate (Restricted)".to_string(),
                details: "Hydroquinone | 2%".to_string(),
            }]
        );
    }

    #[test]
    fn test_rows_before_any_section_are_ignored() {
        let rules = rules();
        let pages = vec![
            Page::new(0, "Introduction").with_table(vec![row(&["1", "Hydroquinone"])]),
            Page::new(1, PROHIBITED_HEADER).with_table(vec![row(&["1", "Mercury compounds"])]),
        ];

        let records = RecordExtractor::new(&rules).extract(pages);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ingredient_name, "Mercury compounds");
        assert_eq!(records[0].risk, "High (Banned)");
    }

    #[test]
    fn test_section_is_sticky_across_pages() {
        let rules = rules();
        let pages = vec![
            Page::new(0, PRESERVATIVE_HEADER).with_table(vec![row(&["1", "(1)", "Benzoic acid"])]),
            Page::new(1, "continued").with_table(vec![row(&["2", "(2)", "Propionic acid"])]),
        ];

        let records = RecordExtractor::new(&rules).extract(pages);
        let names: Vec<_> = records.iter().map(|r| (r.list_type, r.ingredient_name.as_str())).collect();
        assert_eq!(
            names,
            vec![
                (SectionMarker::Preservative, "Benzoic acid"),
                (SectionMarker::Preservative, "Propionic acid"),
            ]
        );
    }

    #[test]
    fn test_later_marker_switches_section() {
        let rules = rules();
        let pages = vec![
            Page::new(0, PROHIBITED_HEADER).with_table(vec![row(&["1", "Lead acetate"])]),
            Page::new(1, RESTRICTED_HEADER).with_table(vec![row(&["1", "Boric acid", "5%"])]),
        ];

        let records = RecordExtractor::new(&rules).extract(pages);
        assert_eq!(records[0].list_type, SectionMarker::Prohibited);
        assert_eq!(records[1].list_type, SectionMarker::Restricted);
    }

    #[test]
    fn test_terminal_page_stops_scan() {
        let rules = rules();
        let pages = vec![
            Page::new(0, PROHIBITED_HEADER).with_table(vec![row(&["1", "Lead acetate"])]),
            Page::new(1, "List of Contact Points").with_table(vec![row(&["1", "Chloroform"])]),
            Page::new(2, "more rows").with_table(vec![row(&["2", "Bithionol"])]),
        ];

        let report = RecordExtractor::new(&rules)
            .run(pages.into_iter().map(Ok::<Page, Infallible>))
            .unwrap();

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].ingredient_name, "Lead acetate");
        assert_eq!(report.terminal_page, Some(2));
        assert_eq!(report.pages_visited, 2);
    }

    #[test]
    fn test_terminal_stop_never_pulls_later_pages() {
        let rules = rules();
        let pages: Vec<Result<Page, String>> = vec![
            Ok(Page::new(0, PROHIBITED_HEADER)),
            Ok(Page::new(1, "LIST OF CONTACT POINT")),
            Err("page 3 is corrupt".to_string()),
        ];

        let report = RecordExtractor::new(&rules).run(pages).unwrap();
        assert_eq!(report.terminal_page, Some(2));
    }

    #[test]
    fn test_page_error_aborts_run() {
        let rules = rules();
        let pages: Vec<Result<Page, String>> = vec![
            Ok(Page::new(0, PROHIBITED_HEADER)),
            Err("page 2 is corrupt".to_string()),
        ];

        let result = RecordExtractor::new(&rules).run(pages);
        assert_eq!(result, Err("page 2 is corrupt".to_string()));
    }

    #[test]
    fn test_empty_text_page_keeps_state_and_is_skipped() {
        let rules = rules();
        let blank = Page { index: 1, text: None, tables: vec![vec![row(&["1", "Chloroform"])]] };
        let pages = vec![
            Page::new(0, PROHIBITED_HEADER),
            blank,
            Page::new(2, "continued").with_table(vec![row(&["2", "Bithionol"])]),
        ];

        let records = RecordExtractor::new(&rules).extract(pages);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ingredient_name, "Bithionol");
        assert_eq!(records[0].list_type, SectionMarker::Prohibited);
    }

    #[test]
    fn test_filtered_rows_produce_nothing() {
        let rules = rules();
        let table = vec![
            row(&["", "THAILAND", "0.1%"]),
            row(&["Ref", "Reference number"]),
            row(&["3", "0.5%"]),
            row(&["4", "(12)"]),
            row(&["5", "Red"]),
            row(&["6"]),
            row(&["7", "Chloroform"]),
        ];
        let pages = vec![Page::new(0, PROHIBITED_HEADER).with_table(table)];

        let records = RecordExtractor::new(&rules).extract(pages);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ingredient_name, "Chloroform");
    }

    #[test]
    fn test_two_column_row_under_preservative_is_skipped() {
        let rules = rules();
        let pages = vec![Page::new(0, PRESERVATIVE_HEADER).with_table(vec![row(&["(2)", "Formaldehyde"])])];
        assert!(RecordExtractor::new(&rules).extract(pages).is_empty());
    }

    #[test]
    fn test_missing_cells_and_multiline_names() {
        let rules = rules();
        let table = vec![vec![None, Some("  Methylene\nchloride ".to_string()), None]];
        let pages = vec![Page::new(0, PROHIBITED_HEADER).with_table(table)];

        let records = RecordExtractor::new(&rules).extract(pages);
        assert_eq!(records[0].ingredient_name, "Methylene chloride");
        assert_eq!(records[0].details, "Methylene chloride");
    }

    #[test]
    fn test_report_tracks_section_entries() {
        let rules = rules();
        let pages = vec![
            Page::new(0, "cover"),
            Page::new(1, PROHIBITED_HEADER),
            Page::new(2, "continued"),
            Page::new(3, PRESERVATIVE_HEADER),
        ];

        let report = RecordExtractor::new(&rules)
            .run(pages.into_iter().map(Ok::<Page, Infallible>))
            .unwrap();

        assert_eq!(
            report.section_entries,
            vec![
                SectionEntry { page: 2, section: SectionMarker::Prohibited },
                SectionEntry { page: 4, section: SectionMarker::Preservative },
            ]
        );
        assert_eq!(report.pages_visited, 4);
        assert_eq!(report.terminal_page, None);
    }
}
