// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Synthetic training corpus
//!
//! The ensemble is trained at startup on a small generated corpus: each
//! characteristic headline template is expanded into near-duplicate samples
//! by appending a constant trailing clause.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Binary credibility label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// Fabricated or misleading content
    Fake,
    /// Genuine reporting
    Real,
}

impl Label {
    /// Numeric class used by the classifiers (0 = fake, 1 = real)
    pub fn to_binary(&self) -> u8 {
        match self {
            Label::Fake => 0,
            Label::Real => 1,
        }
    }

    /// Label implied by a probability-of-real
    pub fn from_probability(p_real: f64) -> Self {
        if p_real >= 0.5 {
            Label::Real
        } else {
            Label::Fake
        }
    }
}

/// A single labelled training document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    pub id: String,
    pub text: String,
    pub label: Label,
}

pub const FAKE_TEMPLATES: [&str; 10] = [
    "BREAKING: Shocking truth revealed",
    "Doctors hate this one simple trick",
    "You won't believe what happened next",
    "This will blow your mind",
    "URGENT: Share before it's deleted",
    "Secret information they don't want you to know",
    "Mainstream media won't tell you this",
    "LEAKED: Confidential documents expose",
    "EXPOSED: The hidden agenda behind",
    "BOMBSHELL: Investigation reveals shocking",
];

pub const REAL_TEMPLATES: [&str; 10] = [
    "According to a study published in",
    "Reuters reports that officials confirmed",
    "The Associated Press has learned that",
    "Government data shows a trend of",
    "Research conducted by university scientists",
    "Official statements from the department",
    "Investigation by journalists revealed",
    "Data from the national statistics office",
    "Peer-reviewed research indicates that",
    "Official government press release states",
];

const FAKE_SUFFIX: &str =
    " and many people are concerned about the implications of these findings for the future.";
const REAL_SUFFIX: &str = " and the findings have been verified through multiple independent sources.";

/// Copies generated per template
pub const SAMPLES_PER_TEMPLATE: usize = 20;

/// Labelled documents the ensemble is fitted on
#[derive(Debug, Clone)]
pub struct TrainingCorpus {
    pub samples: Vec<Sample>,
}

impl TrainingCorpus {
    /// Build the fixed synthetic corpus: all fake samples first, then all real ones
    pub fn synthetic() -> Self {
        let fake = Self::expand(&FAKE_TEMPLATES, FAKE_SUFFIX, Label::Fake, "fake");
        let real = Self::expand(&REAL_TEMPLATES, REAL_SUFFIX, Label::Real, "real");

        let samples: Vec<Sample> = fake.into_iter().chain(real).collect();
        tracing::info!("Synthetic corpus built: {} documents", samples.len());

        Self { samples }
    }

    pub fn from_samples(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    fn expand(templates: &[&str], suffix: &str, label: Label, prefix: &str) -> Vec<Sample> {
        templates
            .iter()
            .enumerate()
            .flat_map(|(t, template)| {
                (0..SAMPLES_PER_TEMPLATE).map(move |i| Sample {
                    id: format!("{}_{}_{}", prefix, t, i),
                    text: format!("{}{}", template, suffix),
                    label,
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.samples.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn labels(&self) -> Vec<Label> {
        self.samples.iter().map(|s| s.label).collect()
    }

    /// Count of samples per label
    pub fn label_distribution(&self) -> HashMap<Label, usize> {
        let mut dist = HashMap::new();
        for sample in &self.samples {
            *dist.entry(sample.label).or_insert(0) += 1;
        }
        dist
    }
}
