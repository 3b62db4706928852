// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Keyword indicator analysis
//!
//! Overlaps with the heuristic scorer's phrase lists but is tuned separately
//! (different lists, ratio score instead of additive steps).

use serde::{Deserialize, Serialize};

pub const FAKE_KEYWORDS: [&str; 22] = [
    "breaking",
    "urgent",
    "shocking",
    "bombshell",
    "exposed",
    "leaked",
    "secret",
    "hidden",
    "conspiracy",
    "cover-up",
    "mainstream media",
    "deep state",
    "fake news",
    "hoax",
    "scam",
    "lies",
    "deception",
    "you won't believe",
    "doctors hate",
    "one simple trick",
    "this will blow your mind",
    "they don't want you to know",
];

pub const CREDIBLE_KEYWORDS: [&str; 17] = [
    "study",
    "research",
    "according to",
    "data shows",
    "evidence",
    "peer-reviewed",
    "university",
    "institution",
    "official",
    "government",
    "reuters",
    "associated press",
    "published",
    "journal",
    "investigation",
    "verified",
    "confirmed",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeywordReport {
    /// credible / (credible + fake), 0.5 when nothing matched
    pub score: f64,
    pub fake_indicators: Vec<String>,
    pub credible_indicators: Vec<String>,
    /// Fake indicators followed by credible ones
    pub indicators: Vec<String>,
}

impl Default for KeywordReport {
    fn default() -> Self {
        Self {
            score: 0.5,
            fake_indicators: Vec::new(),
            credible_indicators: Vec::new(),
            indicators: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordAnalyzer;

impl KeywordAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, text: &str) -> KeywordReport {
        let lower = text.to_lowercase();
        let matched = |list: &[&str]| -> Vec<String> {
            list.iter()
                .filter(|kw| lower.contains(*kw))
                .map(|kw| kw.to_string())
                .collect()
        };

        let fake_indicators = matched(&FAKE_KEYWORDS[..]);
        let credible_indicators = matched(&CREDIBLE_KEYWORDS[..]);

        let total = fake_indicators.len() + credible_indicators.len();
        let score = if total == 0 {
            0.5
        } else {
            credible_indicators.len() as f64 / total as f64
        };

        let indicators = fake_indicators
            .iter()
            .chain(credible_indicators.iter())
            .cloned()
            .collect();

        KeywordReport {
            score,
            fake_indicators,
            credible_indicators,
            indicators,
        }
    }
}
