// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Credibility detection pipeline
//!
//! Orchestrates:
//! - One-time training of the classifier ensemble
//! - Blending of the ensemble mean with the heuristic score
//! - Auxiliary analyzers (keywords, sentiment, readability, source, entities)
//! - Explanation building for full analyses
//!
//! The detector is built once and is read-only afterwards. Scoring never
//! returns an error: a missing or failing ensemble degrades to the
//! heuristic score, and analyzers fall back to neutral values.

use crate::analyzers::{
    Entities, EntityExtractor, KeywordAnalyzer, KeywordReport, ReadabilityAnalyzer,
    ReadabilityReport, SentimentAnalyzer, SentimentLabel, SentimentReport, SourceAnalyzer,
    SourceAssessment,
};
use crate::blend::{blend, ScoringPath};
use crate::config::ScorerConfig;
use crate::corpus::{Label, TrainingCorpus};
use crate::ensemble::{Ensemble, EnsemblePrediction, TrainingSummary};
use crate::error::{ScorerError, ScorerResult};
use crate::explain::{Explanation, ExplanationBuilder};
use crate::heuristic::{
    HeuristicBreakdown, HeuristicScorer, CAPS_PENALTY, CAPS_RATIO_LIMIT, EXCLAMATION_PENALTY,
    INDICATOR_STEP,
};
use crate::result::{ScoreDetails, ScoreResult};
use chrono::Utc;
use std::collections::HashMap;

/// Scores closer than this to 0.5 are flagged as uncertain
const BOUNDARY_MARGIN: f64 = 0.1;
/// Member probabilities further apart than this are flagged as disagreement
const DISAGREEMENT_SPREAD: f64 = 0.3;
/// Sentiment confidence above which tone counts as evidence
const STRONG_TONE: f64 = 0.5;

/// Reject content shorter than `min_len` characters once trimmed
pub fn check_content(text: &str, min_len: usize) -> ScorerResult<&str> {
    let trimmed = text.trim();
    let length = trimmed.chars().count();
    if length < min_len {
        return Err(ScorerError::ContentTooShort {
            length,
            minimum: min_len,
        });
    }
    Ok(trimmed)
}

/// A credibility score together with how it was reached
#[derive(Debug, Clone)]
pub struct ScoredPrediction {
    pub score: f64,
    pub path: ScoringPath,
    pub heuristic: HeuristicBreakdown,
    /// Present on the blended path
    pub ensemble: Option<EnsemblePrediction>,
}

#[derive(Debug)]
pub struct CredibilityDetector {
    config: ScorerConfig,
    ensemble: Option<Ensemble>,
    heuristic: HeuristicScorer,
    keywords: KeywordAnalyzer,
    sentiment: SentimentAnalyzer,
    readability: ReadabilityAnalyzer,
    source: SourceAnalyzer,
    entities: EntityExtractor,
}

impl CredibilityDetector {
    /// Train the ensemble on the synthetic corpus and build the analyzers
    ///
    /// A training failure leaves the detector in heuristic-only mode.
    pub fn new(config: ScorerConfig) -> Self {
        tracing::info!("Initializing credibility detector (seed {})", config.seed);
        let corpus = TrainingCorpus::synthetic();
        let ensemble = match Ensemble::train(&corpus, &config) {
            Ok(ensemble) => {
                let summary = ensemble.summary();
                tracing::info!(
                    "Models trained: {} documents, vocabulary {}, classifiers [{}]",
                    summary.documents,
                    summary.vocabulary_size,
                    ensemble.classifier_names().join(", ")
                );
                Some(ensemble)
            }
            Err(e) => {
                tracing::warn!("Error initializing models: {}; using heuristic scoring only", e);
                None
            }
        };
        Self::with_ensemble(config, ensemble)
    }

    /// Detector that never consults trained models
    pub fn heuristic_only(config: ScorerConfig) -> Self {
        tracing::warn!("Detector built without trained models; using heuristic scoring only");
        Self::with_ensemble(config, None)
    }

    pub fn with_ensemble(config: ScorerConfig, ensemble: Option<Ensemble>) -> Self {
        let detector = Self {
            heuristic: HeuristicScorer::new(),
            keywords: KeywordAnalyzer::new(),
            sentiment: SentimentAnalyzer::new(config.capabilities.sentiment),
            readability: ReadabilityAnalyzer::new(config.capabilities.tokenizer),
            source: SourceAnalyzer::new(&config.trusted_domains),
            entities: EntityExtractor::new(),
            ensemble,
            config,
        };
        tracing::info!(
            "Credibility detector ready (ensemble: {}, sentiment: {}, tokenizer: {}, trusted domains: {})",
            detector.is_ensemble_available(),
            detector.sentiment.is_available(),
            detector.readability.has_tokenizer(),
            detector.source.trusted_count()
        );
        detector
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    pub fn is_ensemble_available(&self) -> bool {
        self.ensemble.is_some()
    }

    pub fn training_summary(&self) -> Option<&TrainingSummary> {
        self.ensemble.as_ref().map(Ensemble::summary)
    }

    /// Credibility score in [0, 1]; higher means more likely genuine
    pub fn predict_credibility(&self, text: &str) -> f64 {
        self.score(text).score
    }

    /// Score `text` and report the path taken
    pub fn score(&self, text: &str) -> ScoredPrediction {
        let heuristic = self.heuristic.breakdown(text);

        let Some(ensemble) = &self.ensemble else {
            return ScoredPrediction {
                score: heuristic.score,
                path: ScoringPath::HeuristicOnly,
                heuristic,
                ensemble: None,
            };
        };

        match ensemble.predict(text) {
            Ok(prediction) => ScoredPrediction {
                score: blend(prediction.mean_probability, heuristic.score, &self.config.blend),
                path: ScoringPath::Blended,
                heuristic,
                ensemble: Some(prediction),
            },
            Err(e) => {
                tracing::error!("Prediction error: {}; falling back to heuristic score", e);
                ScoredPrediction {
                    score: heuristic.score,
                    path: ScoringPath::HeuristicOnly,
                    heuristic,
                    ensemble: None,
                }
            }
        }
    }

    pub fn analyze_keywords(&self, text: &str) -> KeywordReport {
        self.keywords.analyze(text)
    }

    pub fn analyze_sentiment(&self, text: &str) -> SentimentReport {
        self.sentiment.analyze(text)
    }

    pub fn analyze_readability(&self, text: &str) -> ReadabilityReport {
        self.readability.analyze(text)
    }

    pub fn analyze_source_credibility(&self, url: Option<&str>) -> f64 {
        self.source.analyze(url)
    }

    pub fn assess_source(&self, url: Option<&str>) -> SourceAssessment {
        self.source.assess(url)
    }

    pub fn extract_entities(&self, text: &str) -> Entities {
        self.entities.extract(text)
    }

    /// Check `text` against the configured minimum length
    pub fn check_content<'a>(&self, text: &'a str) -> ScorerResult<&'a str> {
        check_content(text, self.config.min_content_length)
    }

    /// Full analysis: score, verdict, sub-scores, entities and explanation
    pub fn analyze(&self, text: &str, url: Option<&str>) -> ScoreResult {
        let scored = self.score(text);
        let keywords = self.analyze_keywords(text);
        let sentiment = self.analyze_sentiment(text);
        let readability = self.analyze_readability(text);
        let source = self.assess_source(url);
        let entities = self.extract_entities(text);

        let explanation = self.explain(&scored, &keywords, &sentiment, &readability, &source, url);

        let (model_probability, per_model) = match &scored.ensemble {
            Some(p) => (Some(p.mean_probability), p.per_model.clone()),
            None => (None, Vec::new()),
        };

        let details = ScoreDetails {
            keyword_score: keywords.score,
            sentiment_score: sentiment.score,
            source_score: source.score,
            keyword_indicators: keywords.indicators,
            fake_indicators: keywords.fake_indicators,
            credible_indicators: keywords.credible_indicators,
            sentiment: sentiment.sentiment,
            sentiment_confidence: sentiment.confidence,
            readability,
            entities,
            length: text.chars().count(),
            word_count: text.split_whitespace().count(),
            heuristic_score: scored.heuristic.score,
            model_probability,
            per_model,
            scoring_path: scored.path,
            timestamp: Utc::now(),
        };

        ScoreResult {
            credibility_score: scored.score,
            is_fake: scored.score < ScoreResult::FAKE_THRESHOLD,
            details,
            explanation,
        }
    }

    fn explain(
        &self,
        scored: &ScoredPrediction,
        keywords: &KeywordReport,
        sentiment: &SentimentReport,
        readability: &ReadabilityReport,
        source: &SourceAssessment,
        url: Option<&str>,
    ) -> Explanation {
        let verdict = Label::from_probability(scored.score);
        let confidence = ((scored.score - 0.5).abs() * 2.0).min(1.0);
        let h = &scored.heuristic;

        let mut builder = ExplanationBuilder::new(verdict, confidence);

        for phrase in &h.fake_matches {
            builder = builder.with_rule(
                "fake_indicator",
                format!("Sensational phrase: '{}'", phrase),
                Label::Fake,
                INDICATOR_STEP,
            );
        }
        for phrase in &h.real_matches {
            builder = builder.with_rule(
                "real_indicator",
                format!("Sourcing phrase: '{}'", phrase),
                Label::Real,
                INDICATOR_STEP,
            );
        }
        if h.exclamation_penalty {
            builder = builder.with_rule(
                "exclamation_run",
                format!("{} exclamation marks", h.exclamation_count),
                Label::Fake,
                EXCLAMATION_PENALTY,
            );
        }
        if h.caps_penalty {
            builder = builder.with_rule(
                "shouting",
                format!("{} of {} words in all caps", h.caps_words, h.total_words),
                Label::Fake,
                CAPS_PENALTY,
            );
        }

        for keyword in keywords.fake_indicators.iter().filter(|k| !h.fake_matches.contains(*k)) {
            builder = builder.with_keyword_match(keyword, Label::Fake, 0.05);
        }
        for keyword in keywords.credible_indicators.iter().filter(|k| !h.real_matches.contains(*k)) {
            builder = builder.with_keyword_match(keyword, Label::Real, 0.05);
        }

        if let Some(domain) = source.domain.as_deref().filter(|d| !d.is_empty()) {
            builder = builder.with_source_credibility(domain, source.score);
        }

        if sentiment.sentiment != SentimentLabel::Neutral && sentiment.confidence >= STRONG_TONE {
            builder = builder.with_emotional_tone(&sentiment.sentiment.to_string(), sentiment.confidence);
        }

        if readability.details.is_none() {
            if readability.caps_ratio > CAPS_RATIO_LIMIT {
                builder = builder.with_linguistic_pattern("frequent all-caps words", readability.caps_ratio);
            }
            if readability.avg_sentence_length > 35.0 {
                builder = builder.with_anomaly(
                    format!(
                        "Unusually long sentences ({:.1} words on average)",
                        readability.avg_sentence_length
                    ),
                    0.1,
                );
            }
        }

        let mut premises: Vec<String> = h
            .fake_matches
            .iter()
            .map(|p| format!("fake phrase '{}'", p))
            .chain(h.real_matches.iter().map(|p| format!("real phrase '{}'", p)))
            .collect();
        if h.exclamation_penalty {
            premises.push(format!("{} exclamation marks", h.exclamation_count));
        }
        if h.caps_penalty {
            premises.push(format!("{} all-caps words", h.caps_words));
        }
        builder = builder.with_reasoning_step(
            "heuristic_rules",
            premises,
            &format!("heuristic score {:.3}", h.score),
            1.0,
        );

        match (&scored.ensemble, scored.path) {
            (Some(prediction), ScoringPath::Blended) => {
                for member in &prediction.per_model {
                    builder = builder.with_model_vote(&member.model, member.probability);
                }
                builder = builder
                    .with_reasoning_step(
                        "ensemble_mean",
                        prediction
                            .per_model
                            .iter()
                            .map(|m| format!("{} = {:.3}", m.model, m.probability))
                            .collect(),
                        &format!("mean probability {:.3}", prediction.mean_probability),
                        confidence,
                    )
                    .with_reasoning_step(
                        "blend",
                        vec![
                            format!("{} x model {:.3}", self.config.blend.model_weight, prediction.mean_probability),
                            format!("{} x heuristic {:.3}", self.config.blend.heuristic_weight, h.score),
                        ],
                        &format!("credibility score {:.3}", scored.score),
                        confidence,
                    )
                    .with_attributions(prediction.top_terms.iter().cloned().collect::<HashMap<_, _>>());

                if !prediction.skipped.is_empty() {
                    builder = builder.with_uncertainty(&format!(
                        "Models excluded after errors: {}",
                        prediction.skipped.join(", ")
                    ));
                }
                let (lo, hi) = prediction
                    .per_model
                    .iter()
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), m| {
                        (lo.min(m.probability), hi.max(m.probability))
                    });
                if hi - lo > DISAGREEMENT_SPREAD {
                    builder = builder.with_uncertainty("Trained models disagree on this text");
                }
            }
            _ => {
                builder = builder
                    .with_reasoning_step(
                        "heuristic_fallback",
                        vec!["trained models unavailable".to_string()],
                        &format!("credibility score {:.3}", scored.score),
                        confidence,
                    )
                    .with_uncertainty("Trained models unavailable; score uses heuristic rules only");
            }
        }

        if (scored.score - 0.5).abs() < BOUNDARY_MARGIN {
            builder = builder.with_uncertainty("Score is close to the decision boundary");
        }
        if url.map_or(true, |u| u.trim().is_empty()) {
            builder = builder.with_uncertainty("No source URL provided");
        }
        if !self.sentiment.is_available() {
            builder = builder.with_uncertainty("Sentiment model unavailable");
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classifier;
    use crate::vectorizer::FeatureVector;

    const SCENARIO_CREDIBLE: &str = "According to a study published in a peer-reviewed journal, \
                                     researchers confirmed the findings.";
    const SCENARIO_SENSATIONAL: &str =
        "BREAKING: Shocking truth EXPOSED!!!! They don't want you to know this secret!!!!";

    struct AlwaysFails;

    impl Classifier for AlwaysFails {
        fn train(&mut self, _features: &[FeatureVector], _labels: &[Label]) -> ScorerResult<()> {
            Ok(())
        }

        fn predict_probability(&self, _features: &FeatureVector) -> ScorerResult<f64> {
            Err(ScorerError::Prediction {
                model: "AlwaysFails".to_string(),
                reason: "broken".to_string(),
            })
        }

        fn name(&self) -> &str {
            "AlwaysFails"
        }

        fn description(&self) -> &str {
            "test"
        }

        fn is_trained(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_check_content() {
        assert!(matches!(
            check_content("too short", 50),
            Err(ScorerError::ContentTooShort { length: 9, minimum: 50 })
        ));
        let long = format!("  {}  ", "x".repeat(50));
        assert_eq!(check_content(&long, 50).map(str::len).ok(), Some(50));
    }

    #[test]
    fn test_heuristic_only_uses_heuristic_score() {
        let detector = CredibilityDetector::heuristic_only(ScorerConfig::default());
        assert!(!detector.is_ensemble_available());
        assert!(detector.training_summary().is_none());

        let heuristic = HeuristicScorer::new().score(SCENARIO_SENSATIONAL);
        let scored = detector.score(SCENARIO_SENSATIONAL);
        assert_eq!(scored.score, heuristic);
        assert_eq!(scored.path, ScoringPath::HeuristicOnly);
        assert!(scored.score <= 0.2);
    }

    #[test]
    fn test_failing_ensemble_falls_back() {
        let config = ScorerConfig::default();
        let corpus = TrainingCorpus::synthetic();
        let ensemble = Ensemble::train_with(&corpus, &config, vec![Box::new(AlwaysFails)]).ok();
        assert!(ensemble.is_some());

        let detector = CredibilityDetector::with_ensemble(config, ensemble);
        let scored = detector.score(SCENARIO_CREDIBLE);
        assert_eq!(scored.path, ScoringPath::HeuristicOnly);
        assert_eq!(scored.score, HeuristicScorer::new().score(SCENARIO_CREDIBLE));
    }

    #[test]
    fn test_heuristic_only_analysis_explains_fallback() {
        let detector = CredibilityDetector::heuristic_only(ScorerConfig::default());
        let result = detector.analyze(SCENARIO_SENSATIONAL, None);

        assert!(result.is_fake);
        assert_eq!(result.details.scoring_path, ScoringPath::HeuristicOnly);
        assert!(result.details.model_probability.is_none());
        assert_eq!(result.details.source_score, 0.5);
        assert_eq!(result.explanation.verdict, Label::Fake);
        assert!(result
            .explanation
            .uncertainty_factors
            .iter()
            .any(|f| f.contains("heuristic rules only")));
        assert!(result
            .explanation
            .uncertainty_factors
            .iter()
            .any(|f| f == "No source URL provided"));
        assert!(result
            .explanation
            .evidence
            .iter()
            .any(|e| e.source == "exclamation_run"));
    }

    #[test]
    fn test_rule_evidence_carries_heuristic_weights() {
        let detector = CredibilityDetector::heuristic_only(ScorerConfig::default());
        let result = detector.analyze(SCENARIO_SENSATIONAL, None);
        let weight_of = |rule: &str| {
            result
                .explanation
                .evidence
                .iter()
                .find(|e| e.source == rule)
                .map(|e| e.weight)
        };

        assert_eq!(weight_of("fake_indicator"), Some(INDICATOR_STEP));
        assert_eq!(weight_of("exclamation_run"), Some(EXCLAMATION_PENALTY));
        assert_eq!(weight_of("shouting"), Some(CAPS_PENALTY));
    }

    #[test]
    fn test_analysis_details() {
        let detector = CredibilityDetector::heuristic_only(ScorerConfig::default());
        let result = detector.analyze(SCENARIO_CREDIBLE, Some("https://www.reuters.com/science"));

        assert!(!result.is_fake);
        assert_eq!(result.details.source_score, 0.9);
        assert_eq!(result.details.length, SCENARIO_CREDIBLE.chars().count());
        assert_eq!(result.details.word_count, 13);
        assert!(result.details.credible_indicators.contains(&"study".to_string()));
        assert!(result
            .explanation
            .evidence
            .iter()
            .any(|e| e.description.contains("reuters.com")));
    }
}
