// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Readability and writing-style analysis

use crate::error::ScorerResult;
use crate::heuristic::is_shouted;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadabilityReport {
    /// Higher is better written, in [0, 1]
    pub score: f64,
    pub avg_sentence_length: f64,
    pub avg_word_length: f64,
    /// `!` characters per character of text
    pub exclamation_ratio: f64,
    /// Fraction of words that are shouted (all caps, longer than 2)
    pub caps_ratio: f64,
    /// Set when no metrics could be computed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ReadabilityReport {
    fn neutral(details: &str) -> Self {
        Self {
            score: 0.5,
            avg_sentence_length: 0.0,
            avg_word_length: 0.0,
            exclamation_ratio: 0.0,
            caps_ratio: 0.0,
            details: Some(details.to_string()),
        }
    }
}

/// Sentence and word tokenizer
#[derive(Debug, Clone)]
struct Tokenizer {
    sentence: Regex,
    word: Regex,
}

impl Tokenizer {
    fn new() -> ScorerResult<Self> {
        Ok(Self {
            sentence: Regex::new(r"[^.!?]+(?:[.!?]+|$)")?,
            word: Regex::new(r"\w+(?:['’-]\w+)*|[^\w\s]+")?,
        })
    }

    fn sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.sentence.find_iter(text).map(|m| m.as_str()).collect()
    }

    fn words<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.word.find_iter(text).map(|m| m.as_str()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct ReadabilityAnalyzer {
    tokenizer: Option<Tokenizer>,
}

impl ReadabilityAnalyzer {
    /// `enabled` is the startup capability flag; naive splitting is used otherwise
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            tracing::warn!("Tokenizer disabled; readability uses naive splitting");
            return Self { tokenizer: None };
        }
        match Tokenizer::new() {
            Ok(tokenizer) => Self {
                tokenizer: Some(tokenizer),
            },
            Err(e) => {
                tracing::warn!("Tokenizer unavailable ({}); readability uses naive splitting", e);
                Self { tokenizer: None }
            }
        }
    }

    pub fn has_tokenizer(&self) -> bool {
        self.tokenizer.is_some()
    }

    pub fn analyze(&self, text: &str) -> ReadabilityReport {
        let (sentences, words): (Vec<&str>, Vec<&str>) = match &self.tokenizer {
            Some(t) => (t.sentences(text), t.words(text)),
            None => (text.split('.').collect(), text.split_whitespace().collect()),
        };
        let sentences: Vec<&str> = sentences
            .into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if sentences.is_empty() || words.is_empty() {
            return ReadabilityReport::neutral("Insufficient text");
        }

        let text_len = text.chars().count() as f64;
        let avg_sentence_length = words.len() as f64 / sentences.len() as f64;
        let avg_word_length =
            words.iter().map(|w| w.chars().count()).sum::<usize>() as f64 / words.len() as f64;

        let exclamations = text.matches('!').count();
        let questions = text.matches('?').count();
        let caps_words = words.iter().filter(|w| is_shouted(w)).count();

        let mut score = 0.5;

        if (10.0..=25.0).contains(&avg_sentence_length) {
            score += 0.1;
        } else if avg_sentence_length > 35.0 {
            score -= 0.1;
        }

        let punct_ratio = (exclamations + questions) as f64 / text_len;
        if punct_ratio > 0.02 {
            score -= 0.15;
        }

        let caps_ratio = caps_words as f64 / words.len() as f64;
        if caps_ratio > 0.1 {
            score -= 0.1;
        }

        ReadabilityReport {
            score: f64::clamp(score, 0.0, 1.0),
            avg_sentence_length,
            avg_word_length,
            exclamation_ratio: exclamations as f64 / text_len,
            caps_ratio,
            details: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = "The city council approved the new budget on Monday after a long debate. \
        Officials said the plan increases funding for public transport and local schools. \
        The vote passed with a clear majority of the members present.";

    #[test]
    fn test_well_formed_article() {
        let report = ReadabilityAnalyzer::new(true).analyze(ARTICLE);
        assert!(report.avg_sentence_length >= 10.0 && report.avg_sentence_length <= 25.0);
        assert!((report.score - 0.6).abs() < 1e-12);
        assert_eq!(report.caps_ratio, 0.0);
        assert!(report.details.is_none());
    }

    #[test]
    fn test_shouting_text_is_penalized() {
        let report = ReadabilityAnalyzer::new(true).analyze("WAKE UP PEOPLE!!! Is this REAL?? WHY?!");
        assert!(report.caps_ratio > 0.1);
        assert!(report.exclamation_ratio > 0.0);
        assert!(report.score < 0.5);
    }

    #[test]
    fn test_insufficient_text() {
        for analyzer in [ReadabilityAnalyzer::new(true), ReadabilityAnalyzer::new(false)] {
            let report = analyzer.analyze("   ");
            assert_eq!(report.score, 0.5);
            assert_eq!(report.details.as_deref(), Some("Insufficient text"));
        }
    }

    #[test]
    fn test_naive_fallback() {
        let analyzer = ReadabilityAnalyzer::new(false);
        assert!(!analyzer.has_tokenizer());
        let report = analyzer.analyze(ARTICLE);
        // 36 whitespace-separated words over three sentences
        assert!((report.avg_sentence_length - 12.0).abs() < 1e-9);
        assert!((report.score - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_long_sentences_lose_points() {
        let sentence = vec!["word"; 40].join(" ");
        let report = ReadabilityAnalyzer::new(false).analyze(&format!("{}.", sentence));
        assert_eq!(report.avg_sentence_length, 40.0);
        assert!((report.score - 0.4).abs() < 1e-12);
    }
}
