// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Explanations attached to credibility results
//!
//! Provides:
//! - Evidence items gathered from the rule scorer and the analyzers
//! - A trace of the scoring steps that produced the final number
//! - Term attributions from the fitted vocabulary
//! - A plain-text summary for display

use crate::corpus::Label;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kinds of evidence behind a verdict
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EvidenceType {
    /// Sensational phrasing, shouting, exclamation runs
    LinguisticPattern,
    /// Domain reputation of the article URL
    SourceCredibility,
    /// Strongly polarized tone
    EmotionalManipulation,
    /// Rule in the heuristic scorer fired
    SymbolicRule,
    /// Trained classifier output
    ModelVote,
    /// Keyword list match
    KeywordMatch,
    /// Readability metric outside the usual range
    StatisticalAnomaly,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Evidence {
    pub evidence_type: EvidenceType,
    pub description: String,
    /// Weight of this evidence (0.0 to 1.0)
    pub weight: f64,
    /// Component that produced it (rule name, analyzer, model)
    pub source: String,
}

/// One step from inputs to the final score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReasoningStep {
    pub rule: String,
    pub premises: Vec<String>,
    pub conclusion: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Explanation {
    pub verdict: Label,
    /// Distance of the score from the decision boundary, in [0, 1]
    pub confidence: f64,
    /// Evidence pointing towards the verdict
    pub evidence: Vec<Evidence>,
    /// Evidence pointing the other way
    pub counter_evidence: Vec<Evidence>,
    pub reasoning_trace: Vec<ReasoningStep>,
    /// Term -> TF-IDF weight in the scored document
    pub feature_attributions: HashMap<String, f64>,
    pub summary: String,
    pub uncertainty_factors: Vec<String>,
}

impl Explanation {
    pub fn new(verdict: Label, confidence: f64) -> Self {
        Self {
            verdict,
            confidence,
            evidence: Vec::new(),
            counter_evidence: Vec::new(),
            reasoning_trace: Vec::new(),
            feature_attributions: HashMap::new(),
            summary: String::new(),
            uncertainty_factors: Vec::new(),
        }
    }

    pub fn generate_summary(&mut self) {
        let mut summary_parts = Vec::new();

        let verdict = match self.verdict {
            Label::Fake => "likely fake or unreliable",
            Label::Real => "likely credible",
        };
        summary_parts.push(format!(
            "This content is {} (confidence: {:.1}%).",
            verdict,
            self.confidence * 100.0
        ));

        if !self.evidence.is_empty() {
            let mut sorted = self.evidence.clone();
            sorted.sort_by(|a, b| b.weight.total_cmp(&a.weight));
            summary_parts.push("Key indicators:".to_string());
            for ev in sorted.iter().take(3) {
                summary_parts.push(format!("  • {}", ev.description));
            }
        }

        if !self.counter_evidence.is_empty() {
            summary_parts.push(format!(
                "{} indicator(s) point the other way.",
                self.counter_evidence.len()
            ));
        }

        if !self.uncertainty_factors.is_empty() {
            summary_parts.push("Uncertainty factors:".to_string());
            for factor in &self.uncertainty_factors {
                summary_parts.push(format!("  • {}", factor));
            }
        }

        self.summary = summary_parts.join("\n");
    }

    /// The `n` highest-weighted terms
    pub fn top_features(&self, n: usize) -> Vec<(&String, &f64)> {
        let mut features: Vec<_> = self.feature_attributions.iter().collect();
        features.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));
        features.into_iter().take(n).collect()
    }
}

/// Builder for constructing explanations
///
/// Evidence is filed under `evidence` or `counter_evidence` depending on
/// whether it leans the same way as the verdict.
pub struct ExplanationBuilder {
    explanation: Explanation,
}

impl ExplanationBuilder {
    pub fn new(verdict: Label, confidence: f64) -> Self {
        Self {
            explanation: Explanation::new(verdict, confidence),
        }
    }

    /// Add evidence that leans towards `leans`
    pub fn with_evidence(mut self, evidence: Evidence, leans: Label) -> Self {
        if leans == self.explanation.verdict {
            self.explanation.evidence.push(evidence);
        } else {
            self.explanation.counter_evidence.push(evidence);
        }
        self
    }

    pub fn with_keyword_match(self, keyword: &str, leans: Label, weight: f64) -> Self {
        let description = match leans {
            Label::Fake => format!("Contains sensational phrase: '{}'", keyword),
            Label::Real => format!("Contains sourcing phrase: '{}'", keyword),
        };
        self.with_evidence(
            Evidence {
                evidence_type: EvidenceType::KeywordMatch,
                description,
                weight,
                source: "keyword_analyzer".to_string(),
            },
            leans,
        )
    }

    pub fn with_rule(self, rule: &str, description: String, leans: Label, weight: f64) -> Self {
        self.with_evidence(
            Evidence {
                evidence_type: EvidenceType::SymbolicRule,
                description,
                weight,
                source: rule.to_string(),
            },
            leans,
        )
    }

    pub fn with_linguistic_pattern(self, pattern: &str, weight: f64) -> Self {
        self.with_evidence(
            Evidence {
                evidence_type: EvidenceType::LinguisticPattern,
                description: format!("Linguistic pattern detected: {}", pattern),
                weight,
                source: "readability_analyzer".to_string(),
            },
            Label::Fake,
        )
    }

    pub fn with_source_credibility(self, domain: &str, credibility: f64) -> Self {
        let (description, leans) = if credibility > 0.7 {
            (format!("Source '{}' has high credibility rating", domain), Label::Real)
        } else if credibility > 0.4 {
            (format!("Source '{}' has mixed credibility rating", domain), Label::Real)
        } else {
            (format!("Source '{}' has low credibility rating", domain), Label::Fake)
        };
        let weight = if leans == Label::Real {
            credibility
        } else {
            1.0 - credibility
        };
        self.with_evidence(
            Evidence {
                evidence_type: EvidenceType::SourceCredibility,
                description,
                weight,
                source: "source_analyzer".to_string(),
            },
            leans,
        )
    }

    pub fn with_emotional_tone(self, label: &str, intensity: f64) -> Self {
        self.with_evidence(
            Evidence {
                evidence_type: EvidenceType::EmotionalManipulation,
                description: format!("Strongly {} tone (intensity {:.2})", label, intensity),
                weight: intensity,
                source: "sentiment_analyzer".to_string(),
            },
            Label::Fake,
        )
    }

    pub fn with_model_vote(self, model: &str, p_real: f64) -> Self {
        let leans = Label::from_probability(p_real);
        let weight = (p_real - 0.5).abs() * 2.0;
        self.with_evidence(
            Evidence {
                evidence_type: EvidenceType::ModelVote,
                description: format!("{} estimates P(credible) = {:.3}", model, p_real),
                weight,
                source: model.to_string(),
            },
            leans,
        )
    }

    pub fn with_anomaly(self, description: String, weight: f64) -> Self {
        self.with_evidence(
            Evidence {
                evidence_type: EvidenceType::StatisticalAnomaly,
                description,
                weight,
                source: "readability_analyzer".to_string(),
            },
            Label::Fake,
        )
    }

    pub fn with_reasoning_step(
        mut self,
        rule: &str,
        premises: Vec<String>,
        conclusion: &str,
        confidence: f64,
    ) -> Self {
        self.explanation.reasoning_trace.push(ReasoningStep {
            rule: rule.to_string(),
            premises,
            conclusion: conclusion.to_string(),
            confidence,
        });
        self
    }

    pub fn with_attributions(mut self, attributions: HashMap<String, f64>) -> Self {
        self.explanation.feature_attributions = attributions;
        self
    }

    pub fn with_uncertainty(mut self, factor: &str) -> Self {
        self.explanation.uncertainty_factors.push(factor.to_string());
        self
    }

    pub fn build(mut self) -> Explanation {
        self.explanation.generate_summary();
        self.explanation
    }
}
