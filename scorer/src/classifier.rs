// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Common interface for trained classifiers
//!
//! Every classifier answers one question: the probability that a feature
//! vector is real news. Models without a native probability estimate return
//! their hard label as 0.0 or 1.0 via [`label_probability`].

use crate::corpus::Label;
use crate::error::{ScorerError, ScorerResult};
use crate::vectorizer::FeatureVector;
use serde::{Deserialize, Serialize};

/// Trait for all models in the ensemble
pub trait Classifier: Send + Sync {
    /// Fit the model on vectorized training documents
    fn train(&mut self, features: &[FeatureVector], labels: &[Label]) -> ScorerResult<()>;

    /// Probability that the document is real, in [0, 1]
    fn predict_probability(&self, features: &FeatureVector) -> ScorerResult<f64>;

    /// Hard label derived from the probability
    fn predict_label(&self, features: &FeatureVector) -> ScorerResult<Label> {
        self.predict_probability(features).map(Label::from_probability)
    }

    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn is_trained(&self) -> bool;
}

/// Probability for a model that only produces a discrete label
pub fn label_probability(label: Label) -> f64 {
    f64::from(label.to_binary())
}

/// Check that a training set is usable: non-empty, aligned, one feature space, both classes
pub fn validate_training_set(model: &str, features: &[FeatureVector], labels: &[Label]) -> ScorerResult<usize> {
    let fail = |reason: String| ScorerError::Training {
        model: model.to_string(),
        reason,
    };

    if features.is_empty() {
        return Err(fail("no training samples".to_string()));
    }
    if features.len() != labels.len() {
        return Err(fail(format!(
            "{} feature vectors but {} labels",
            features.len(),
            labels.len()
        )));
    }

    let dimension = features[0].dimension();
    if dimension == 0 {
        return Err(fail("empty feature space".to_string()));
    }
    if let Some(fv) = features.iter().find(|f| f.dimension() != dimension) {
        return Err(fail(format!(
            "mixed feature spaces ({} and {})",
            dimension,
            fv.dimension()
        )));
    }
    if !labels.contains(&Label::Fake) || !labels.contains(&Label::Real) {
        return Err(fail("training labels contain a single class".to_string()));
    }

    Ok(dimension)
}

/// Per-model line of the training summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierSummary {
    pub name: String,
    pub description: String,
    /// Fraction of training documents classified correctly
    pub training_accuracy: f64,
}

/// Accuracy of a trained model on its own training data
pub fn training_accuracy(model: &dyn Classifier, features: &[FeatureVector], labels: &[Label]) -> f64 {
    if features.is_empty() {
        return 0.0;
    }
    let correct = features
        .iter()
        .zip(labels)
        .filter(|(fv, label)| matches!(model.predict_label(fv), Ok(l) if l == **label))
        .count();
    correct as f64 / features.len() as f64
}
