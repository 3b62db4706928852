// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

use credibility_scorer::blend::blend;
use credibility_scorer::{
    check_content, CredibilityDetector, HeuristicScorer, Label, ScorerConfig, ScorerError,
    ScoringPath,
};
use std::sync::{Arc, OnceLock};
use std::thread;

const CREDIBLE: &str = "According to a study published in a peer-reviewed journal, \
                        researchers confirmed the findings.";
const SENSATIONAL: &str =
    "BREAKING: Shocking truth EXPOSED!!!! They don't want you to know this secret!!!!";

fn trained() -> &'static CredibilityDetector {
    static DETECTOR: OnceLock<CredibilityDetector> = OnceLock::new();
    DETECTOR.get_or_init(|| CredibilityDetector::new(ScorerConfig::default()))
}

#[test]
fn test_ensemble_trains_on_synthetic_corpus() {
    let detector = trained();
    assert!(detector.is_ensemble_available());

    let summary = detector.training_summary().unwrap();
    assert_eq!(summary.documents, 400);
    assert!(summary.vocabulary_size > 0);
    let names: Vec<&str> = summary.classifiers.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Logistic", "RandomForest"]);
    for c in &summary.classifiers {
        assert!(c.training_accuracy > 0.9, "{} accuracy {}", c.name, c.training_accuracy);
    }
}

#[test]
fn test_scores_stay_in_unit_interval() {
    let detector = trained();
    let long = "word ".repeat(5000);
    let inputs = [
        "",
        "   ",
        "!!!!!!!!!!!!",
        "ÜBER ÄRGER ÖFFENTLICH 日本語のテキスト",
        CREDIBLE,
        SENSATIONAL,
        long.as_str(),
    ];
    for text in inputs {
        let score = detector.predict_credibility(text);
        assert!((0.0..=1.0).contains(&score), "{:?} scored {}", text, score);
    }
}

#[test]
fn test_prediction_is_idempotent() {
    let detector = trained();
    for text in [CREDIBLE, SENSATIONAL] {
        assert_eq!(detector.predict_credibility(text), detector.predict_credibility(text));
    }
}

#[test]
fn test_blended_score_matches_formula() {
    let detector = trained();
    let scored = detector.score(CREDIBLE);
    assert_eq!(scored.path, ScoringPath::Blended);

    let ensemble = scored.ensemble.as_ref().unwrap();
    assert_eq!(ensemble.per_model.len(), 2);
    assert!(ensemble.skipped.is_empty());

    let expected = blend(
        ensemble.mean_probability,
        scored.heuristic.score,
        &detector.config().blend,
    );
    assert!((scored.score - expected).abs() < 1e-12);
}

#[test]
fn test_credible_text_outscores_sensational_text() {
    let detector = trained();
    let heuristic = HeuristicScorer::new();
    assert!(heuristic.score(CREDIBLE) >= 0.5);
    assert!(heuristic.score(SENSATIONAL) <= 0.2);

    assert!(detector.predict_credibility(CREDIBLE) > detector.predict_credibility(SENSATIONAL));
}

#[test]
fn test_unavailable_ensemble_returns_heuristic_score() {
    let detector = CredibilityDetector::heuristic_only(ScorerConfig::default());
    let expected = HeuristicScorer::new().score(SENSATIONAL);
    assert_eq!(detector.predict_credibility(SENSATIONAL), expected);
}

#[test]
fn test_failed_training_degrades_to_heuristics() {
    let mut config = ScorerConfig::default();
    // every term appears in far fewer documents than this
    config.vectorizer.min_df = 10_000;
    let detector = CredibilityDetector::new(config);
    assert!(!detector.is_ensemble_available());
    assert_eq!(
        detector.predict_credibility(CREDIBLE),
        HeuristicScorer::new().score(CREDIBLE)
    );
}

#[test]
fn test_source_credibility() {
    let detector = trained();
    assert_eq!(detector.analyze_source_credibility(Some("https://www.reuters.com/article")), 0.9);
    assert_eq!(detector.analyze_source_credibility(Some("http://totallyrealtruth.blogspot.com")), 0.2);
    assert_eq!(detector.analyze_source_credibility(None), 0.5);
    assert_eq!(detector.analyze_source_credibility(Some("")), 0.5);
}

#[test]
fn test_short_content_is_rejected() {
    let detector = trained();
    let err = detector.check_content("Too short.").unwrap_err();
    assert!(matches!(err, ScorerError::ContentTooShort { length: 10, minimum: 50 }));
    assert!(check_content(CREDIBLE, 50).is_ok());
}

#[test]
fn test_full_analysis() {
    let detector = trained();
    let result = detector.analyze(CREDIBLE, Some("https://www.reuters.com/science"));

    assert_eq!(result.is_fake, result.credibility_score < 0.5);
    assert_eq!(result.details.scoring_path, ScoringPath::Blended);
    assert_eq!(result.details.per_model.len(), 2);
    assert_eq!(result.details.source_score, 0.9);
    assert_eq!(result.explanation.verdict == Label::Fake, result.is_fake);
    assert!(!result.explanation.reasoning_trace.is_empty());
    assert!(!result.explanation.feature_attributions.is_empty());
    assert!(!result.explanation.summary.is_empty());

    let json = serde_json::to_value(&result).unwrap();
    assert!(json["credibility_score"].is_number());
    assert_eq!(json["details"]["scoring_path"], "blended");
}

#[test]
fn test_detector_is_shared_across_threads() {
    let mut config = ScorerConfig::default();
    config.forest.n_trees = 10;
    let detector = Arc::new(CredibilityDetector::new(config));
    assert!(detector.is_ensemble_available());
    let expected: Vec<f64> = [CREDIBLE, SENSATIONAL]
        .iter()
        .map(|t| detector.predict_credibility(t))
        .collect();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let detector = Arc::clone(&detector);
            thread::spawn(move || {
                [CREDIBLE, SENSATIONAL]
                    .iter()
                    .map(|t| detector.score(t))
                    .map(|s| (s.path, s.score))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        let scored = handle.join().unwrap();
        for ((path, score), expected) in scored.into_iter().zip(&expected) {
            assert_eq!(path, ScoringPath::Blended);
            assert_eq!(score, *expected);
        }
    }

    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CredibilityDetector>();
}
