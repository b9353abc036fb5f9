// src/utils/page_debug.rs
use crate::config::ExtractionRules;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Wraps each highlighted span of `text` as `[[KIND>>...<<KIND]]`.
/// Spans overlapping an earlier span are dropped.
pub fn annotate_text(text: &str, highlights: &[(usize, usize, &str)]) -> String {
    let mut annotated = String::with_capacity(text.len() + highlights.len() * 24);
    let mut sorted_highlights = highlights.to_vec();
    sorted_highlights.sort_by_key(|h| h.0); // Sort by position

    let mut last_pos = 0;
    for (start, end, kind) in sorted_highlights {
        if start < last_pos || end > text.len() {
            continue;
        }
        annotated.push_str(&text[last_pos..start]);
        annotated.push_str(&format!("[[{}>>", kind));
        annotated.push_str(&text[start..end]);
        annotated.push_str(&format!("<<{}]]", kind));
        last_pos = end;
    }
    annotated.push_str(&text[last_pos..]);
    annotated
}

/// Writes one annotated text file per visited page into a debug directory.
#[derive(Debug, Clone)]
pub struct PageDumper {
    dir: PathBuf,
}

impl PageDumper {
    pub fn new<P: AsRef<Path>>(dir: P) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dump(&self, page_number: usize, text: &str, rules: &ExtractionRules) -> io::Result<PathBuf> {
        let highlights = rules.highlight_spans(text);
        let path = self.dir.join(format!("page_{:03}.txt", page_number));
        fs::write(&path, annotate_text(text, &highlights))?;
        tracing::trace!("Saved page dump to {}", path.display());
        Ok(path)
    }
}
