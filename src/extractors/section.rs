// src/extractors/section.rs

// --- Imports ---
use serde::{Deserialize, Serialize};
use std::fmt;

// --- Section Markers ---
/// The annex categories recognised in the source document.
///
/// Declaration order is the order in which section patterns are tested
/// against a page; the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SectionMarker {
    Prohibited,
    Restricted,
    Preservative,
    UvFilter,
}

impl SectionMarker {
    pub const ALL: [SectionMarker; 4] = [
        SectionMarker::Prohibited,
        SectionMarker::Restricted,
        SectionMarker::Preservative,
        SectionMarker::UvFilter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionMarker::Prohibited => "PROHIBITED",
            SectionMarker::Restricted => "RESTRICTED",
            SectionMarker::Preservative => "PRESERVATIVE",
            SectionMarker::UvFilter => "UV_FILTER",
        }
    }

    /// Risk label attached to every record emitted under this section.
    pub fn risk(&self) -> &'static str {
        match self {
            SectionMarker::Prohibited => "High (Banned)",
            SectionMarker::Restricted => "Moderate (Restricted)",
            SectionMarker::Preservative | SectionMarker::UvFilter => "Low (Regulated)",
        }
    }
}

impl fmt::Display for SectionMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Section State ---
/// Where the scan currently is relative to the annexes.
///
/// Starts `Outside`. A detected marker moves it `Inside` that section, and
/// it stays there until another marker is detected. There is no transition
/// back to `Outside`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionState {
    #[default]
    Outside,
    Inside(SectionMarker),
}

impl SectionState {
    /// Applies the marker detected on a page (if any).
    pub fn advance(self, detected: Option<SectionMarker>) -> Self {
        match detected {
            Some(marker) => SectionState::Inside(marker),
            None => self,
        }
    }

    pub fn current(&self) -> Option<SectionMarker> {
        match self {
            SectionState::Outside => None,
            SectionState::Inside(marker) => Some(*marker),
        }
    }
}
