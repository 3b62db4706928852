// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Classifier ensemble over a shared TF-IDF feature space
//!
//! Trained once at startup and read-only afterwards. A classifier that fails
//! at prediction time is logged and left out of the average; if none
//! succeeds the ensemble reports itself unavailable for that text.

use crate::classifier::{training_accuracy, Classifier, ClassifierSummary};
use crate::config::ScorerConfig;
use crate::corpus::{Label, TrainingCorpus};
use crate::error::{ScorerError, ScorerResult};
use crate::forest::RandomForest;
use crate::logistic::LogisticRegression;
use crate::preprocess::Preprocessor;
use crate::vectorizer::{FeatureVector, TfIdfVectorizer};
use serde::{Deserialize, Serialize};

/// Probability reported by one ensemble member
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelProbability {
    pub model: String,
    pub probability: f64,
}

/// Ensemble output for one text
#[derive(Debug, Clone)]
pub struct EnsemblePrediction {
    /// Mean probability-of-real over the members that succeeded
    pub mean_probability: f64,
    pub per_model: Vec<ModelProbability>,
    /// Members that failed and were excluded
    pub skipped: Vec<String>,
    /// In-vocabulary n-grams of the input, heaviest first
    pub top_terms: Vec<(String, f64)>,
}

/// Facts about the startup fit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub documents: usize,
    pub vocabulary_size: usize,
    pub classifiers: Vec<ClassifierSummary>,
}

pub struct Ensemble {
    preprocessor: Preprocessor,
    vectorizer: TfIdfVectorizer,
    classifiers: Vec<Box<dyn Classifier>>,
    summary: TrainingSummary,
}

impl std::fmt::Debug for Ensemble {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ensemble")
            .field("vocabulary_size", &self.vectorizer.vocabulary_size())
            .field(
                "classifiers",
                &self.classifiers.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// The default members: logistic regression and random forest
pub fn default_classifiers(config: &ScorerConfig) -> Vec<Box<dyn Classifier>> {
    vec![
        Box::new(LogisticRegression::new(config.logistic.clone(), config.seed)),
        Box::new(RandomForest::new(config.forest.clone(), config.seed)),
    ]
}

impl Ensemble {
    /// Fit the vectorizer and the default classifiers on a corpus
    pub fn train(corpus: &TrainingCorpus, config: &ScorerConfig) -> ScorerResult<Self> {
        Self::train_with(corpus, config, default_classifiers(config))
    }

    /// Fit the vectorizer and the given classifiers on a corpus
    pub fn train_with(
        corpus: &TrainingCorpus,
        config: &ScorerConfig,
        mut classifiers: Vec<Box<dyn Classifier>>,
    ) -> ScorerResult<Self> {
        if corpus.is_empty() {
            return Err(ScorerError::EmptyCorpus);
        }
        let preprocessor = Preprocessor::new()?;

        let mut vectorizer = TfIdfVectorizer::new(config.vectorizer.clone())?;
        vectorizer.fit(&corpus.texts())?;

        let features: Vec<FeatureVector> = corpus
            .texts()
            .iter()
            .map(|t| vectorizer.transform(t))
            .collect::<ScorerResult<_>>()?;
        let labels: Vec<Label> = corpus.labels();

        let mut summaries = Vec::with_capacity(classifiers.len());
        for classifier in classifiers.iter_mut() {
            classifier.train(&features, &labels)?;
            if !classifier.is_trained() {
                return Err(ScorerError::Training {
                    model: classifier.name().to_string(),
                    reason: "model reports itself untrained after fitting".to_string(),
                });
            }
            let accuracy = training_accuracy(classifier.as_ref(), &features, &labels);
            tracing::info!("  {} training accuracy: {:.4}", classifier.name(), accuracy);
            summaries.push(ClassifierSummary {
                name: classifier.name().to_string(),
                description: classifier.description().to_string(),
                training_accuracy: accuracy,
            });
        }

        let summary = TrainingSummary {
            documents: corpus.len(),
            vocabulary_size: vectorizer.vocabulary_size(),
            classifiers: summaries,
        };

        Ok(Self {
            preprocessor,
            vectorizer,
            classifiers,
            summary,
        })
    }

    pub fn summary(&self) -> &TrainingSummary {
        &self.summary
    }

    pub fn classifier_names(&self) -> Vec<&str> {
        self.classifiers.iter().map(|c| c.name()).collect()
    }

    /// Normalize, vectorize and average member probabilities
    pub fn predict(&self, text: &str) -> ScorerResult<EnsemblePrediction> {
        let processed = self.preprocessor.normalize(text);
        let features = self.vectorizer.transform(&processed)?;

        let mut per_model = Vec::with_capacity(self.classifiers.len());
        let mut skipped = Vec::new();

        for classifier in &self.classifiers {
            match classifier.predict_probability(&features) {
                Ok(p) if p.is_finite() => per_model.push(ModelProbability {
                    model: classifier.name().to_string(),
                    probability: p.clamp(0.0, 1.0),
                }),
                Ok(p) => {
                    tracing::error!("Error with model {}: non-finite probability {}", classifier.name(), p);
                    skipped.push(classifier.name().to_string());
                }
                Err(e) => {
                    tracing::error!("Error with model {}: {}", classifier.name(), e);
                    skipped.push(classifier.name().to_string());
                }
            }
        }

        if per_model.is_empty() {
            return Err(ScorerError::EnsembleUnavailable);
        }

        let mean_probability =
            per_model.iter().map(|m| m.probability).sum::<f64>() / per_model.len() as f64;

        Ok(EnsemblePrediction {
            mean_probability,
            per_model,
            skipped,
            top_terms: self.vectorizer.named_features(&features).into_iter().take(5).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Returns its hard label only
    struct LabelOnly;

    impl Classifier for LabelOnly {
        fn train(&mut self, _features: &[FeatureVector], _labels: &[Label]) -> ScorerResult<()> {
            Ok(())
        }

        fn predict_probability(&self, features: &FeatureVector) -> ScorerResult<f64> {
            let label = if features.is_empty() { Label::Fake } else { Label::Real };
            Ok(crate::classifier::label_probability(label))
        }

        fn name(&self) -> &str {
            "LabelOnly"
        }

        fn description(&self) -> &str {
            "test"
        }

        fn is_trained(&self) -> bool {
            true
        }
    }

    struct Failing;

    impl Classifier for Failing {
        fn train(&mut self, _features: &[FeatureVector], _labels: &[Label]) -> ScorerResult<()> {
            Ok(())
        }

        fn predict_probability(&self, _features: &FeatureVector) -> ScorerResult<f64> {
            Err(ScorerError::Prediction {
                model: "Failing".to_string(),
                reason: "always fails".to_string(),
            })
        }

        fn name(&self) -> &str {
            "Failing"
        }

        fn description(&self) -> &str {
            "test"
        }

        fn is_trained(&self) -> bool {
            true
        }
    }

    struct NeverTrains;

    impl Classifier for NeverTrains {
        fn train(&mut self, _features: &[FeatureVector], _labels: &[Label]) -> ScorerResult<()> {
            Ok(())
        }

        fn predict_probability(&self, _features: &FeatureVector) -> ScorerResult<f64> {
            Ok(0.5)
        }

        fn name(&self) -> &str {
            "NeverTrains"
        }

        fn description(&self) -> &str {
            "test"
        }

        fn is_trained(&self) -> bool {
            false
        }
    }

    fn small_config() -> ScorerConfig {
        let mut config = ScorerConfig::default();
        config.forest.n_trees = 10;
        config
    }

    #[test]
    fn test_train_default_ensemble() {
        let corpus = TrainingCorpus::synthetic();
        let ensemble = Ensemble::train(&corpus, &small_config()).unwrap();

        assert_eq!(ensemble.classifier_names(), vec!["Logistic", "RandomForest"]);
        assert_eq!(ensemble.summary().documents, 400);
        assert!(ensemble.summary().vocabulary_size > 0);
        for c in &ensemble.summary().classifiers {
            assert!(c.training_accuracy > 0.9, "{} accuracy {}", c.name, c.training_accuracy);
        }
    }

    #[test]
    fn test_predictions_follow_training_patterns() {
        let corpus = TrainingCorpus::synthetic();
        let ensemble = Ensemble::train(&corpus, &small_config()).unwrap();

        let fake = ensemble.predict("Doctors hate this one simple trick").unwrap();
        let real = ensemble.predict("Reuters reports that officials confirmed the plan").unwrap();
        assert!(fake.mean_probability < real.mean_probability);
        assert_eq!(fake.per_model.len(), 2);
        assert!(fake.skipped.is_empty());
    }

    #[test]
    fn test_failing_member_is_excluded() {
        let corpus = TrainingCorpus::synthetic();
        let members: Vec<Box<dyn Classifier>> = vec![Box::new(LabelOnly), Box::new(Failing)];
        let ensemble = Ensemble::train_with(&corpus, &small_config(), members).unwrap();

        let prediction = ensemble.predict("official government press release").unwrap();
        assert_eq!(prediction.mean_probability, 1.0);
        assert_eq!(prediction.skipped, vec!["Failing".to_string()]);
    }

    #[test]
    fn test_all_members_failing_is_unavailable() {
        let corpus = TrainingCorpus::synthetic();
        let members: Vec<Box<dyn Classifier>> = vec![Box::new(Failing)];
        let ensemble = Ensemble::train_with(&corpus, &small_config(), members).unwrap();

        assert!(matches!(ensemble.predict("anything at all"), Err(ScorerError::EnsembleUnavailable)));
    }

    #[test]
    fn test_untrained_member_fails_training() {
        let corpus = TrainingCorpus::synthetic();
        let members: Vec<Box<dyn Classifier>> = vec![Box::new(LabelOnly), Box::new(NeverTrains)];
        let err = Ensemble::train_with(&corpus, &small_config(), members).unwrap_err();
        assert!(matches!(err, ScorerError::Training { ref model, .. } if model == "NeverTrains"));
    }

    #[test]
    fn test_empty_corpus_fails_training() {
        let corpus = TrainingCorpus::from_samples(Vec::new());
        assert!(matches!(
            Ensemble::train(&corpus, &small_config()),
            Err(ScorerError::EmptyCorpus)
        ));
    }
}
