// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Lexicon-based sentiment analysis
//!
//! Polarity comes from the VADER model and its full valence lexicon. The
//! compound polarity in [-1, 1] is mapped onto a label and a [0, 1] score.

use serde::{Deserialize, Serialize};
use vader_sentiment::SentimentIntensityAnalyzer;

const POSITIVE_THRESHOLD: f64 = 0.05;
const NEGATIVE_THRESHOLD: f64 = -0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn from_compound(compound: f64) -> Self {
        if compound >= POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if compound <= NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentimentReport {
    pub sentiment: SentimentLabel,
    /// Compound polarity mapped to [0, 1]; 0.5 is neutral
    pub score: f64,
    /// |compound|
    pub confidence: f64,
    /// Raw compound polarity, absent when the model is unavailable
    pub compound: Option<f64>,
}

impl Default for SentimentReport {
    fn default() -> Self {
        Self {
            sentiment: SentimentLabel::Neutral,
            score: 0.5,
            confidence: 0.0,
            compound: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SentimentAnalyzer {
    enabled: bool,
}

impl SentimentAnalyzer {
    /// `enabled` is the startup capability flag
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            tracing::warn!("Sentiment model unavailable; sentiment will be reported as neutral");
        }
        Self { enabled }
    }

    pub fn is_available(&self) -> bool {
        self.enabled
    }

    pub fn analyze(&self, text: &str) -> SentimentReport {
        if !self.enabled {
            return SentimentReport::default();
        }

        let compound = if text.trim().is_empty() {
            0.0
        } else {
            let analyzer = SentimentIntensityAnalyzer::new();
            let scores = analyzer.polarity_scores(text);
            match scores.get("compound") {
                Some(&c) => c,
                None => {
                    tracing::error!("Sentiment analysis error: no compound score");
                    return SentimentReport::default();
                }
            }
        };
        if !compound.is_finite() {
            tracing::error!("Sentiment analysis error: non-finite compound score");
            return SentimentReport::default();
        }
        let compound = compound.clamp(-1.0, 1.0);

        SentimentReport {
            sentiment: SentimentLabel::from_compound(compound),
            score: (compound + 1.0) / 2.0,
            confidence: compound.abs(),
            compound: Some(compound),
        }
    }
}
