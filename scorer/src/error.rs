// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Error types for model training and inference
//!
//! None of these reach callers of the scoring operations: the detector turns
//! every failure into its documented fallback. They exist so that the
//! fallback decision is made in one place, with the cause logged.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScorerError {
    /// Training corpus had no documents.
    #[error("training corpus is empty")]
    EmptyCorpus,

    /// Document-frequency filters removed every token.
    #[error("vectorizer produced an empty vocabulary")]
    EmptyVocabulary,

    /// Vectorizer used before `fit`.
    #[error("vectorizer has not been fitted")]
    NotFitted,

    /// Training data was unusable for a classifier.
    #[error("training failed for {model}: {reason}")]
    Training { model: String, reason: String },

    /// Feature vector does not belong to the classifier's feature space.
    #[error("feature index {index} outside feature space of size {dimension}")]
    DimensionMismatch { index: usize, dimension: usize },

    /// NaN/Inf appeared in a computation.
    #[error("non-finite value in {0}")]
    NonFinite(String),

    /// A classifier failed while predicting.
    #[error("prediction failed for {model}: {reason}")]
    Prediction { model: String, reason: String },

    /// No classifier produced a usable probability.
    #[error("no classifier produced a prediction")]
    EnsembleUnavailable,

    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// Content rejected before scoring.
    #[error("content too short: {length} characters, at least {minimum} required")]
    ContentTooShort { length: usize, minimum: usize },
}

pub type ScorerResult<T> = Result<T, ScorerError>;
