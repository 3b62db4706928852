// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Final score combination

use crate::config::BlendConfig;
use serde::{Deserialize, Serialize};

/// How the final score was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPath {
    /// Weighted blend of the ensemble mean and the heuristic score
    Blended,
    /// Models unavailable or every member failed
    HeuristicOnly,
}

impl std::fmt::Display for ScoringPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringPath::Blended => f.write_str("blended"),
            ScoringPath::HeuristicOnly => f.write_str("heuristic_only"),
        }
    }
}

/// `model_weight * mean + heuristic_weight * heuristic`, clamped to [0, 1]
pub fn blend(model_mean: f64, heuristic: f64, weights: &BlendConfig) -> f64 {
    (weights.model_weight * model_mean + weights.heuristic_weight * heuristic).clamp(0.0, 1.0)
}
