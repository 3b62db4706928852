// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Credibility scoring for news text
//!
//! This crate provides:
//! - A TF-IDF vectorizer fitted on a built-in synthetic corpus
//! - Logistic regression and random forest classifiers behind one trait
//! - A rule-based heuristic scorer blended with the ensemble mean
//! - Auxiliary analyzers (keywords, sentiment, readability, source, entities)
//! - Explanations, a JSON Lines analysis history and CSV batch scoring
//!
//! Training happens once, in [`CredibilityDetector::new`]; the detector is
//! immutable afterwards and can be shared across threads.

pub mod analyzers;
pub mod batch;
pub mod blend;
pub mod classifier;
pub mod config;
pub mod corpus;
pub mod ensemble;
pub mod error;
pub mod explain;
pub mod forest;
pub mod heuristic;
pub mod history;
pub mod logistic;
pub mod pipeline;
pub mod preprocess;
pub mod result;
pub mod stopwords;
pub mod vectorizer;

pub use analyzers::{
    Entities, KeywordReport, ReadabilityReport, SentimentLabel, SentimentReport, SourceAssessment,
    SourceTier, TrustedDomainEntry,
};
pub use batch::{analyze_batch, BatchArticle, BatchItemResult};
pub use blend::ScoringPath;
pub use classifier::Classifier;
pub use config::ScorerConfig;
pub use corpus::{Label, TrainingCorpus};
pub use ensemble::{Ensemble, TrainingSummary};
pub use error::{ScorerError, ScorerResult};
pub use explain::{Evidence, EvidenceType, Explanation};
pub use heuristic::HeuristicScorer;
pub use history::{AnalysisExport, AnalysisRecord, HistoryStore};
pub use pipeline::{check_content, CredibilityDetector, ScoredPrediction};
pub use result::{ScoreDetails, ScoreResult};
