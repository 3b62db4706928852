// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! L2-regularized logistic regression
//!
//! Minimizes the mean log-loss plus `||w||^2 / (2 C n)` by full-batch gradient
//! descent. The intercept is not penalized. Weights start from a small seeded
//! perturbation so that runs with the same seed are identical.

use crate::classifier::{validate_training_set, Classifier};
use crate::config::LogisticConfig;
use crate::corpus::Label;
use crate::error::{ScorerError, ScorerResult};
use crate::vectorizer::FeatureVector;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const NAME: &str = "Logistic";

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    config: LogisticConfig,
    seed: u64,
    weights: Vec<f64>,
    intercept: f64,
    /// Iterations run by the last fit
    iterations: usize,
    converged: bool,
    trained: bool,
}

impl LogisticRegression {
    pub fn new(config: LogisticConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            weights: Vec::new(),
            intercept: 0.0,
            iterations: 0,
            converged: false,
            trained: false,
        }
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    fn decision(&self, features: &FeatureVector) -> f64 {
        features.dot(&self.weights) + self.intercept
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Classifier for LogisticRegression {
    fn train(&mut self, features: &[FeatureVector], labels: &[Label]) -> ScorerResult<()> {
        let dimension = validate_training_set(NAME, features, labels)?;
        let n = features.len() as f64;
        let targets: Vec<f64> = labels.iter().map(|l| f64::from(l.to_binary())).collect();

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.weights = (0..dimension).map(|_| rng.gen_range(-1e-3..1e-3)).collect();
        self.intercept = 0.0;
        self.converged = false;
        self.trained = false;

        let penalty = 1.0 / (self.config.c * n);
        let lr = self.config.learning_rate;
        let mut grad_w = vec![0.0; dimension];

        let mut iterations = 0;
        while iterations < self.config.max_iter {
            iterations += 1;
            grad_w.iter_mut().for_each(|g| *g = 0.0);
            let mut grad_b = 0.0;

            for (fv, y) in features.iter().zip(&targets) {
                let residual = sigmoid(self.decision(fv)) - y;
                for (i, x) in fv.iter() {
                    grad_w[*i] += residual * x;
                }
                grad_b += residual;
            }

            let mut max_grad = (grad_b / n).abs();
            for (g, w) in grad_w.iter_mut().zip(&self.weights) {
                *g = *g / n + penalty * w;
                max_grad = max_grad.max(g.abs());
            }

            if !max_grad.is_finite() {
                return Err(ScorerError::NonFinite("logistic regression gradient".to_string()));
            }
            if max_grad < self.config.tolerance {
                self.converged = true;
                break;
            }

            for (w, g) in self.weights.iter_mut().zip(&grad_w) {
                *w -= lr * g;
            }
            self.intercept -= lr * grad_b / n;
        }

        self.iterations = iterations;
        if !self.converged {
            tracing::warn!(
                "{} did not converge within {} iterations",
                NAME,
                self.config.max_iter
            );
        }
        self.trained = true;
        tracing::info!("{} trained on {} documents ({} iterations)", NAME, features.len(), iterations);
        Ok(())
    }

    fn predict_probability(&self, features: &FeatureVector) -> ScorerResult<f64> {
        if !self.trained {
            return Err(ScorerError::Prediction {
                model: NAME.to_string(),
                reason: "model is not trained".to_string(),
            });
        }
        if features.dimension() != self.weights.len() {
            return Err(ScorerError::DimensionMismatch {
                index: features.dimension(),
                dimension: self.weights.len(),
            });
        }
        let p = sigmoid(self.decision(features));
        if p.is_finite() {
            Ok(p)
        } else {
            Err(ScorerError::NonFinite("logistic regression probability".to_string()))
        }
    }

    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "L2-regularized logistic regression over TF-IDF features"
    }

    fn is_trained(&self) -> bool {
        self.trained
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_data() -> (Vec<FeatureVector>, Vec<Label>) {
        let features = vec![
            FeatureVector::new(2, vec![(0, 1.0)]).unwrap(),
            FeatureVector::new(2, vec![(0, 0.9), (1, 0.1)]).unwrap(),
            FeatureVector::new(2, vec![(1, 1.0)]).unwrap(),
            FeatureVector::new(2, vec![(0, 0.1), (1, 0.9)]).unwrap(),
        ];
        let labels = vec![Label::Fake, Label::Fake, Label::Real, Label::Real];
        (features, labels)
    }

    #[test]
    fn test_sigmoid_is_stable() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(800.0) <= 1.0);
        assert!(sigmoid(-800.0) >= 0.0);
    }

    #[test]
    fn test_learns_separable_data() {
        let (features, labels) = toy_data();
        let mut model = LogisticRegression::new(LogisticConfig::default(), 42);
        model.train(&features, &labels).unwrap();

        assert!(model.is_trained());
        assert!(model.iterations() <= 1000);
        assert!(model.predict_probability(&features[0]).unwrap() < 0.5);
        assert!(model.predict_probability(&features[2]).unwrap() > 0.5);
        assert_eq!(model.predict_label(&features[3]).unwrap(), Label::Real);
    }

    #[test]
    fn test_same_seed_same_model() {
        let (features, labels) = toy_data();
        let mut a = LogisticRegression::new(LogisticConfig::default(), 7);
        let mut b = LogisticRegression::new(LogisticConfig::default(), 7);
        a.train(&features, &labels).unwrap();
        b.train(&features, &labels).unwrap();
        assert_eq!(a.weights, b.weights);
        assert_eq!(a.intercept, b.intercept);
    }

    #[test]
    fn test_untrained_and_mismatched_predictions_fail() {
        let (features, labels) = toy_data();
        let mut model = LogisticRegression::new(LogisticConfig::default(), 42);
        assert!(model.predict_probability(&features[0]).is_err());

        model.train(&features, &labels).unwrap();
        let other_space = FeatureVector::new(5, vec![(4, 1.0)]).unwrap();
        assert!(matches!(
            model.predict_probability(&other_space),
            Err(ScorerError::DimensionMismatch { .. })
        ));
    }
}
