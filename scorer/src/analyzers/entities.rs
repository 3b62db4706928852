// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Pattern-based named entity extraction

use crate::error::ScorerResult;
use regex::Regex;
use serde::{Deserialize, Serialize};

const ORGANIZATION_PATTERN: &str = r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*(?:\s+(?:Inc|Corp|LLC|Ltd|Organization|Institute|University|College))\b";
const LOCATION_PATTERN: &str =
    r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*(?:\s+(?:City|State|Country|County|Province))\b";
const DATE_PATTERN: &str =
    r"\b(?:\d{1,2}[/-]\d{1,2}[/-]\d{2,4}|\d{4}[/-]\d{1,2}[/-]\d{1,2}|\w+\s+\d{1,2},?\s+\d{4})\b";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entities {
    pub organizations: Vec<String>,
    pub locations: Vec<String>,
    pub dates: Vec<String>,
}

impl Entities {
    pub fn is_empty(&self) -> bool {
        self.organizations.is_empty() && self.locations.is_empty() && self.dates.is_empty()
    }
}

#[derive(Debug, Clone)]
struct Patterns {
    organization: Regex,
    location: Regex,
    date: Regex,
}

impl Patterns {
    fn compile() -> ScorerResult<Self> {
        Ok(Self {
            organization: Regex::new(ORGANIZATION_PATTERN)?,
            location: Regex::new(LOCATION_PATTERN)?,
            date: Regex::new(DATE_PATTERN)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct EntityExtractor {
    patterns: Option<Patterns>,
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityExtractor {
    pub fn new() -> Self {
        let patterns = match Patterns::compile() {
            Ok(p) => Some(p),
            Err(e) => {
                tracing::error!("Entity extraction error: {}", e);
                None
            }
        };
        Self { patterns }
    }

    pub fn extract(&self, text: &str) -> Entities {
        let Some(p) = &self.patterns else {
            return Entities::default();
        };
        let all = |re: &Regex| -> Vec<String> { re.find_iter(text).map(|m| m.as_str().to_string()).collect() };
        Entities {
            organizations: all(&p.organization),
            locations: all(&p.location),
            dates: all(&p.date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_all_kinds() {
        let text = "Researchers at Stanford University said on March 5, 2024 that \
                    New York City officials met on 2024-01-15.";
        let entities = EntityExtractor::new().extract(text);
        assert_eq!(entities.organizations, vec!["Stanford University"]);
        assert_eq!(entities.locations, vec!["New York City"]);
        assert_eq!(entities.dates, vec!["March 5, 2024", "2024-01-15"]);
    }

    #[test]
    fn test_numeric_day_first_dates() {
        let entities = EntityExtractor::new().extract("Filed 12/05/2023 and amended 3-4-24.");
        assert_eq!(entities.dates, vec!["12/05/2023", "3-4-24"]);
    }

    #[test]
    fn test_plain_text_has_no_entities() {
        let entities = EntityExtractor::new().extract("nothing capitalized here at all");
        assert!(entities.is_empty());
    }
}
