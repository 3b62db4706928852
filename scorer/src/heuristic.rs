// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Rule-based credibility scorer
//!
//! Always available: no trained state, no configuration. Starts from a
//! neutral 0.5 and applies independent additive adjustments before clamping
//! to [0, 1]. The constants are calibration values and must not drift.

use serde::{Deserialize, Serialize};

pub const FAKE_INDICATORS: [&str; 18] = [
    "breaking:",
    "urgent:",
    "shocking",
    "bombshell",
    "exposed",
    "leaked",
    "secret",
    "hidden truth",
    "they don't want you to know",
    "mainstream media",
    "wake up",
    "sheeple",
    "conspiracy",
    "cover-up",
    "you won't believe",
    "doctors hate",
    "one simple trick",
    "this will blow your mind",
];

pub const REAL_INDICATORS: [&str; 12] = [
    "according to",
    "study shows",
    "research indicates",
    "data suggests",
    "reuters",
    "associated press",
    "government officials",
    "peer-reviewed",
    "university",
    "published in",
    "sources confirm",
    "investigation",
];

const BASELINE: f64 = 0.5;
pub(crate) const INDICATOR_STEP: f64 = 0.1;
const EXCLAMATION_LIMIT: usize = 3;
pub(crate) const EXCLAMATION_PENALTY: f64 = 0.15;
pub(crate) const CAPS_RATIO_LIMIT: f64 = 0.1;
pub(crate) const CAPS_PENALTY: f64 = 0.1;

/// True for tokens like "EXPOSED" or "BREAKING:": cased, no lowercase, longer than 2
pub fn is_shouted(token: &str) -> bool {
    token.chars().count() > 2
        && token.chars().any(char::is_uppercase)
        && !token.chars().any(char::is_lowercase)
}

/// Everything the rules saw in one text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeuristicBreakdown {
    pub fake_matches: Vec<String>,
    pub real_matches: Vec<String>,
    pub exclamation_count: usize,
    pub caps_words: usize,
    pub total_words: usize,
    pub exclamation_penalty: bool,
    pub caps_penalty: bool,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicScorer;

impl HeuristicScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, text: &str) -> f64 {
        self.breakdown(text).score
    }

    pub fn breakdown(&self, text: &str) -> HeuristicBreakdown {
        let lower = text.to_lowercase();

        let fake_matches: Vec<String> = FAKE_INDICATORS
            .iter()
            .filter(|p| lower.contains(*p))
            .map(|p| p.to_string())
            .collect();
        let real_matches: Vec<String> = REAL_INDICATORS
            .iter()
            .filter(|p| lower.contains(*p))
            .map(|p| p.to_string())
            .collect();

        let mut score = BASELINE;
        score -= fake_matches.len() as f64 * INDICATOR_STEP;
        score += real_matches.len() as f64 * INDICATOR_STEP;

        let exclamation_count = text.matches('!').count();
        let exclamation_penalty = exclamation_count > EXCLAMATION_LIMIT;
        if exclamation_penalty {
            score -= EXCLAMATION_PENALTY;
        }

        let words: Vec<&str> = text.split_whitespace().collect();
        let caps_words = words.iter().filter(|w| is_shouted(w)).count();
        let caps_penalty = caps_words as f64 > words.len() as f64 * CAPS_RATIO_LIMIT;
        if caps_penalty {
            score -= CAPS_PENALTY;
        }

        HeuristicBreakdown {
            fake_matches,
            real_matches,
            exclamation_count,
            caps_words,
            total_words: words.len(),
            exclamation_penalty,
            caps_penalty,
            score: score.clamp(0.0, 1.0),
        }
    }
}
