// src/config/mod.rs
//! Extraction rules: which page text opens each annex, which column holds the
//! ingredient name, and which strings are never ingredient names.
//!
//! The built-in defaults match the ASEAN cosmetic annex layout. A JSON rules
//! file may override any top-level field; omitted fields keep the defaults.

use crate::extractors::section::SectionMarker;
use crate::utils::error::RulesError;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable consulted when no `--rules` path is given.
pub const RULES_PATH_ENV: &str = "ANNEX_RULES_PATH";

const DEFAULT_TERMINAL_MARKER: &str = "LIST OF CONTACT POINT";
const DEFAULT_MIN_NAME_CHARS: usize = 4;

// --- Raw (serde) configuration ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionPattern {
    pub section: SectionMarker,
    pub pattern: String,
}

/// Where to find the name candidate in a row of a given section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRule {
    pub section: SectionMarker,
    /// Rows shorter than this yield no candidate.
    pub min_len: usize,
    pub column: usize,
    /// Used when `column` holds an empty cell.
    #[serde(default)]
    pub fallback_column: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Denylists {
    /// Exact-match lists.
    pub countries: Vec<String>,
    pub colors: Vec<String>,
    pub functions: Vec<String>,
    /// Substring-match list (table headers and boilerplate).
    pub junk: Vec<String>,
}

impl Default for Denylists {
    fn default() -> Self {
        Self {
            countries: owned(&[
                "THAILAND", "SINGAPORE", "MALAYSIA", "INDONESIA", "PHILIPPINES",
                "VIETNAM", "BRUNEI", "CAMBODIA", "LAO", "MYANMAR", "ASEAN",
            ]),
            colors: owned(&[
                "RED", "BLUE", "YELLOW", "GREEN", "WHITE", "BLACK", "VIOLET",
                "ORANGE", "BROWN", "COLOUR", "COLOR",
            ]),
            functions: owned(&[
                "ANTISEPTIC", "DEODORANT", "PRESERVATIVE", "UV FILTER", "HAIR DYE",
                "TOOTHPASTE", "SHAMPOO", "SOAP", "MOUTHWASH", "SKIN CARE", "NAIL",
                "ORAL HYGIENE", "ANTIDANDRUFF", "ANTI-DANDRUFF", "HAIR WAVING",
                "DEPILATORIES", "OXIDIZING", "ALKALINE", "ACID", "SALTS", "ESTERS",
            ]),
            junk: owned(&[
                "NUMBER", "REFERENCE", "SUBSTANCE", "MAXIMUM", "AUTHORIZED",
                "CONCENTRATION", "CONDITIONS", "WARNINGS", "LIMITATIONS",
                "REQUIREMENTS", "ANNEX", "APPENDIX", "PART",
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub sections: Vec<SectionPattern>,
    pub terminal_marker: String,
    pub columns: Vec<ColumnRule>,
    pub denylists: Denylists,
    pub min_name_chars: usize,
}

impl Default for RulesConfig {
    fn default() -> Self {
        let sections = [
            (SectionMarker::Prohibited, r"ANNEX\s+II.*LIST\s+OF\s+SUBSTANCES\s+WHICH\s+MUST\s+NOT"),
            (
                SectionMarker::Restricted,
                r"ANNEX\s+III.*LIST\s+OF\s+SUBSTANCES\s+WHICH\s+COSMETIC\s+PRODUCTS\s+MUST\s+NOT\s+CONTAIN\s+EXCEPT",
            ),
            (SectionMarker::Preservative, r"ANNEX\s+VI.*LIST\s+OF\s+PRESERVATIVES"),
            (SectionMarker::UvFilter, r"ANNEX\s+VII.*LIST\s+OF\s+UV\s+FILTERS"),
        ]
        .iter()
        .map(|(section, pattern)| SectionPattern { section: *section, pattern: pattern.to_string() })
        .collect();

        // Prohibited tables sometimes merge the reference and name columns,
        // leaving the name in column 0.
        let columns = vec![
            ColumnRule { section: SectionMarker::Prohibited, min_len: 2, column: 1, fallback_column: Some(0) },
            ColumnRule { section: SectionMarker::Restricted, min_len: 2, column: 1, fallback_column: None },
            ColumnRule { section: SectionMarker::Preservative, min_len: 3, column: 2, fallback_column: None },
            ColumnRule { section: SectionMarker::UvFilter, min_len: 3, column: 2, fallback_column: None },
        ];

        Self {
            sections,
            terminal_marker: DEFAULT_TERMINAL_MARKER.to_string(),
            columns,
            denylists: Denylists::default(),
            min_name_chars: DEFAULT_MIN_NAME_CHARS,
        }
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// --- Compiled rules ---

/// Rules with every pattern compiled and every denylist uppercased.
#[derive(Debug, Clone)]
pub struct ExtractionRules {
    patterns: Vec<(SectionMarker, Regex)>,
    terminal: Regex,
    columns: HashMap<SectionMarker, ColumnRule>,
    exact_denylist: HashSet<String>,
    substring_denylist: Vec<String>,
    min_name_chars: usize,
}

impl ExtractionRules {
    pub fn builtin() -> Result<Self, RulesError> {
        Self::compile(&RulesConfig::default())
    }

    /// Loads rules from a JSON file, or the built-in defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, RulesError> {
        match path {
            Some(path) => {
                tracing::debug!("Loading extraction rules from {}", path.display());
                let raw = fs::read_to_string(path)?;
                let config: RulesConfig = serde_json::from_str(&raw)?;
                Self::compile(&config)
            }
            None => {
                tracing::debug!("Using built-in extraction rules");
                Self::builtin()
            }
        }
    }

    pub fn compile(config: &RulesConfig) -> Result<Self, RulesError> {
        let mut patterns = Vec::with_capacity(config.sections.len());
        for entry in &config.sections {
            let re = RegexBuilder::new(&entry.pattern)
                .case_insensitive(true)
                .dot_matches_new_line(true)
                .build()
                .map_err(|e| RulesError::InvalidPattern {
                    name: entry.section.to_string(),
                    message: e.to_string(),
                })?;
            patterns.push((entry.section, re));
        }
        // Stable sort: several patterns for one section keep their file order.
        patterns.sort_by_key(|(section, _)| *section);

        let terminal = RegexBuilder::new(&regex::escape(&config.terminal_marker))
            .case_insensitive(true)
            .build()
            .map_err(|e| RulesError::InvalidPattern {
                name: "terminal_marker".to_string(),
                message: e.to_string(),
            })?;

        let columns: HashMap<SectionMarker, ColumnRule> =
            config.columns.iter().map(|rule| (rule.section, *rule)).collect();

        for section in SectionMarker::ALL {
            if !columns.contains_key(&section) || !patterns.iter().any(|(s, _)| *s == section) {
                return Err(RulesError::MissingSection(section.to_string()));
            }
        }

        let lists = &config.denylists;
        let exact_denylist = lists
            .countries
            .iter()
            .chain(&lists.colors)
            .chain(&lists.functions)
            .map(|s| s.to_uppercase())
            .collect();
        let substring_denylist = lists.junk.iter().map(|s| s.to_uppercase()).collect();

        Ok(Self {
            patterns,
            terminal,
            columns,
            exact_denylist,
            substring_denylist,
            min_name_chars: config.min_name_chars,
        })
    }

    /// First section whose pattern matches the page text, in marker order.
    pub fn detect_section(&self, text: &str) -> Option<SectionMarker> {
        self.patterns
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(section, _)| *section)
    }

    pub fn is_terminal(&self, text: &str) -> bool {
        self.terminal.is_match(text)
    }

    pub fn column_rule(&self, section: SectionMarker) -> Option<&ColumnRule> {
        self.columns.get(&section)
    }

    /// `upper` must already be uppercased.
    pub fn is_exact_denied(&self, upper: &str) -> bool {
        self.exact_denylist.contains(upper)
    }

    /// `upper` must already be uppercased.
    pub fn contains_junk(&self, upper: &str) -> bool {
        self.substring_denylist.iter().any(|junk| upper.contains(junk.as_str()))
    }

    pub fn min_name_chars(&self) -> usize {
        self.min_name_chars
    }

    /// Byte spans of every section and terminal match in `text`, labelled by kind.
    pub fn highlight_spans(&self, text: &str) -> Vec<(usize, usize, &'static str)> {
        let mut spans = Vec::new();
        for (section, re) in &self.patterns {
            for m in re.find_iter(text) {
                spans.push((m.start(), m.end(), section.as_str()));
            }
        }
        for m in self.terminal.find_iter(text) {
            spans.push((m.start(), m.end(), "TERMINAL"));
        }
        spans
    }
}

/// Resolves the rules file: explicit path first, then `ANNEX_RULES_PATH`.
pub fn resolve_rules_path(cli_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        return Some(path.to_path_buf());
    }
    match std::env::var(RULES_PATH_ENV) {
        Ok(value) if !value.trim().is_empty() => {
            tracing::debug!("Using rules path from {}: {}", RULES_PATH_ENV, value);
            Some(PathBuf::from(value))
        }
        _ => None,
    }
}
