// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Detector configuration
//!
//! Tunable settings with their defaults: training seed, vectorizer and model
//! parameters, blend weights, capabilities and limits. The heuristic rule
//! constants, readability rules and source tiers are fixed calibration values
//! kept next to the code that applies them. A JSON file may override any
//! subset of the fields here.

use crate::analyzers::source::TrustedDomainEntry;
use crate::error::{ScorerError, ScorerResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration, built once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// Random seed shared by every trained model
    pub seed: u64,
    pub vectorizer: VectorizerConfig,
    pub logistic: LogisticConfig,
    pub forest: ForestConfig,
    pub blend: BlendConfig,
    pub capabilities: Capabilities,
    /// Extra trusted domains merged over the built-in seed list
    pub trusted_domains: Vec<TrustedDomainEntry>,
    /// Minimum trimmed content length the host accepts
    pub min_content_length: usize,
    /// Maximum number of articles scored per batch
    pub batch_limit: usize,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            vectorizer: VectorizerConfig::default(),
            logistic: LogisticConfig::default(),
            forest: ForestConfig::default(),
            blend: BlendConfig::default(),
            capabilities: Capabilities::default(),
            trusted_domains: Vec::new(),
            min_content_length: 50,
            batch_limit: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    pub max_features: usize,
    /// Minimum number of documents a token must appear in
    pub min_df: usize,
    /// Maximum fraction of documents a token may appear in
    pub max_df: f64,
    /// Inclusive n-gram range
    pub ngram_range: (usize, usize),
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            max_features: 10_000,
            min_df: 2,
            max_df: 0.95,
            ngram_range: (1, 2),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticConfig {
    pub max_iter: usize,
    /// Inverse L2 regularization strength
    pub c: f64,
    /// Stop once the largest gradient component falls below this
    pub tolerance: f64,
    pub learning_rate: f64,
}

impl Default for LogisticConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            c: 1.0,
            tolerance: 1e-4,
            learning_rate: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 10,
            min_samples_split: 2,
        }
    }
}

/// Weights of the final blend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendConfig {
    pub model_weight: f64,
    pub heuristic_weight: f64,
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            model_weight: 0.7,
            heuristic_weight: 0.3,
        }
    }
}

/// Optional subsystems, decided once at startup
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    /// Lexicon-based sentiment model
    pub sentiment: bool,
    /// Sentence/word tokenizer for readability (naive split otherwise)
    pub tokenizer: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            sentiment: true,
            tokenizer: true,
        }
    }
}

impl ScorerConfig {
    /// Load configuration from a JSON file, filling missing fields with defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> ScorerResult<()> {
        let unit = |name: &str, v: f64| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(ScorerError::Config(format!("{} must be in [0, 1], got {}", name, v)))
            }
        };
        unit("blend.model_weight", self.blend.model_weight)?;
        unit("blend.heuristic_weight", self.blend.heuristic_weight)?;
        unit("vectorizer.max_df", self.vectorizer.max_df)?;

        let (lo, hi) = self.vectorizer.ngram_range;
        if lo == 0 || lo > hi {
            return Err(ScorerError::Config(format!("invalid ngram_range ({}, {})", lo, hi)));
        }
        if self.vectorizer.max_features == 0 {
            return Err(ScorerError::Config("vectorizer.max_features must be positive".to_string()));
        }
        if self.forest.n_trees == 0 || self.forest.max_depth == 0 {
            return Err(ScorerError::Config("forest needs at least one tree of depth >= 1".to_string()));
        }
        if self.logistic.c <= 0.0 || self.logistic.learning_rate <= 0.0 {
            return Err(ScorerError::Config("logistic.c and logistic.learning_rate must be positive".to_string()));
        }
        for entry in &self.trusted_domains {
            unit(&format!("trusted_domains[{}].weight", entry.domain), entry.weight)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = ScorerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.blend.model_weight, 0.7);
        assert_eq!(config.forest.n_trees, 100);
        assert_eq!(config.vectorizer.max_features, 10_000);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"seed": 7, "forest": {{"n_trees": 10}}}}"#).unwrap();

        let config = ScorerConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.forest.n_trees, 10);
        assert_eq!(config.forest.max_depth, 10);
        assert_eq!(config.min_content_length, 50);
    }

    #[test]
    fn test_rejects_bad_weights() {
        let mut config = ScorerConfig::default();
        config.blend.model_weight = 1.5;
        assert!(matches!(config.validate(), Err(ScorerError::Config(_))));

        let mut config = ScorerConfig::default();
        config.vectorizer.ngram_range = (2, 1);
        assert!(config.validate().is_err());
    }
}
