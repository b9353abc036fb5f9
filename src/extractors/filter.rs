// src/extractors/filter.rs
//! Row-level heuristics: cell cleanup, name-column selection and the
//! validity filter that throws out concentrations, countries, colours,
//! product categories and table boilerplate.

use crate::config::{ColumnRule, ExtractionRules};
use once_cell::sync::Lazy;
use regex::Regex;

// Concentrations such as "0.1%", "10 %" anywhere in the candidate
static CONCENTRATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+(\.\d+)?\s*%").expect("Failed to compile CONCENTRATION_RE")
});

/// Why a candidate was discarded. Only used for trace logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Empty,
    Concentration,
    Denylisted,
    Junk,
    TooShort,
    AllDigits,
    Parenthetical,
}

/// Newlines become spaces, whitespace is trimmed, missing cells become "".
pub fn normalize_row(row: &[Option<String>]) -> Vec<String> {
    row.iter()
        .map(|cell| match cell {
            Some(text) => text.replace('\n', " ").trim().to_string(),
            None => String::new(),
        })
        .collect()
}

/// Picks the name candidate for a row. `None` when the row is too short.
pub fn select_candidate<'a>(row: &'a [String], rule: &ColumnRule) -> Option<&'a str> {
    if row.len() < rule.min_len {
        return None;
    }
    let primary = row.get(rule.column)?;
    if primary.is_empty() {
        if let Some(fallback) = rule.fallback_column {
            return row.get(fallback).map(String::as_str);
        }
    }
    Some(primary.as_str())
}

/// Returns the first check the candidate fails, or `None` if it looks like
/// an ingredient name.
pub fn rejection_reason(candidate: &str, rules: &ExtractionRules) -> Option<Rejection> {
    if candidate.is_empty() {
        return Some(Rejection::Empty);
    }

    let upper = candidate.to_uppercase();

    if CONCENTRATION_RE.is_match(candidate) || upper.contains("PPM") {
        return Some(Rejection::Concentration);
    }
    if rules.is_exact_denied(&upper) {
        return Some(Rejection::Denylisted);
    }
    if rules.contains_junk(&upper) {
        return Some(Rejection::Junk);
    }
    if candidate.chars().count() < rules.min_name_chars() {
        return Some(Rejection::TooShort);
    }
    if candidate.chars().all(|c| c.is_ascii_digit()) {
        return Some(Rejection::AllDigits);
    }
    if candidate.starts_with('(') && candidate.ends_with(')') {
        return Some(Rejection::Parenthetical);
    }

    None
}

/// Joins every cell longer than one character with " | ".
pub fn join_details(row: &[String]) -> String {
    row.iter()
        .filter(|cell| cell.chars().count() > 1)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" | ")
}
