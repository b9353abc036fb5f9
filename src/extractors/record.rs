// src/extractors/record.rs
use crate::extractors::section::SectionMarker;
use serde::{Deserialize, Serialize};

/// One extracted ingredient. Field order is the JSON output order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub list_type: SectionMarker,
    pub ingredient_name: String,
    pub risk: String,
    pub details: String,
}

impl Record {
    pub fn new(list_type: SectionMarker, ingredient_name: &str, details: String) -> Self {
        Self {
            list_type,
            ingredient_name: ingredient_name.to_string(),
            risk: list_type.risk().to_string(),
            details,
        }
    }
}
