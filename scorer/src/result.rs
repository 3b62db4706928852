// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Result of a full credibility analysis

use crate::analyzers::{Entities, ReadabilityReport, SentimentLabel};
use crate::blend::ScoringPath;
use crate::ensemble::ModelProbability;
use crate::explain::Explanation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sub-scores and metrics behind a credibility score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreDetails {
    pub keyword_score: f64,
    pub sentiment_score: f64,
    pub source_score: f64,
    pub keyword_indicators: Vec<String>,
    pub fake_indicators: Vec<String>,
    pub credible_indicators: Vec<String>,
    pub sentiment: SentimentLabel,
    pub sentiment_confidence: f64,
    pub readability: ReadabilityReport,
    pub entities: Entities,
    /// Characters
    pub length: usize,
    pub word_count: usize,
    pub heuristic_score: f64,
    /// Ensemble mean, absent on the heuristic-only path
    pub model_probability: Option<f64>,
    pub per_model: Vec<ModelProbability>,
    pub scoring_path: ScoringPath,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreResult {
    /// [0, 1], higher means more likely genuine
    pub credibility_score: f64,
    pub is_fake: bool,
    pub details: ScoreDetails,
    pub explanation: Explanation,
}

impl ScoreResult {
    /// Decision threshold on the credibility score
    pub const FAKE_THRESHOLD: f64 = 0.5;

    pub fn verdict(&self) -> &'static str {
        if self.is_fake {
            "likely fake"
        } else {
            "likely credible"
        }
    }

    /// Score as a whole percentage, as shown to users
    pub fn percentage(&self) -> u32 {
        (self.credibility_score * 100.0).round() as u32
    }
}
