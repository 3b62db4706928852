// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Bagged decision-tree ensemble (random forest)
//!
//! Each tree is grown on a bootstrap resample of the training set with Gini
//! impurity splits. At every node features are drawn in random order until
//! `sqrt(n_features)` non-constant candidates have been examined. Leaves
//! store the fraction of real documents; the forest averages leaf
//! probabilities across trees.

use crate::classifier::{validate_training_set, Classifier};
use crate::config::ForestConfig;
use crate::corpus::Label;
use crate::error::{ScorerError, ScorerResult};
use crate::vectorizer::FeatureVector;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const NAME: &str = "RandomForest";

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        p_real: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Training data shared by all trees
struct TrainingView<'a> {
    features: &'a [FeatureVector],
    targets: Vec<u8>,
    dimension: usize,
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

fn gini(real: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let p = real as f64 / total as f64;
    1.0 - p * p - (1.0 - p) * (1.0 - p)
}

/// A single CART tree with an arena of nodes; node 0 is the root
#[derive(Debug, Clone, Default)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    fn fit(view: &TrainingView, samples: Vec<usize>, config: &ForestConfig, rng: &mut ChaCha8Rng) -> Self {
        let mut tree = Self::default();
        tree.grow(view, samples, 0, config, rng);
        tree
    }

    fn grow(
        &mut self,
        view: &TrainingView,
        samples: Vec<usize>,
        depth: usize,
        config: &ForestConfig,
        rng: &mut ChaCha8Rng,
    ) -> usize {
        let total = samples.len();
        let real = samples.iter().filter(|&&s| view.targets[s] == 1).count();
        let p_real = if total == 0 { 0.5 } else { real as f64 / total as f64 };

        let index = self.nodes.len();
        self.nodes.push(Node::Leaf { p_real });

        let pure = real == 0 || real == total;
        if depth >= config.max_depth || total < config.min_samples_split || pure {
            return index;
        }

        let Some(split) = Self::best_split(view, &samples, rng) else {
            return index;
        };

        let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = samples
            .into_iter()
            .partition(|&s| view.features[s].get(split.feature) <= split.threshold);

        let left = self.grow(view, left_samples, depth + 1, config, rng);
        let right = self.grow(view, right_samples, depth + 1, config, rng);
        self.nodes[index] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        index
    }

    fn best_split(view: &TrainingView, samples: &[usize], rng: &mut ChaCha8Rng) -> Option<SplitCandidate> {
        let max_features = ((view.dimension as f64).sqrt() as usize).max(1);
        let mut order: Vec<usize> = (0..view.dimension).collect();
        order.shuffle(rng);

        let mut best: Option<SplitCandidate> = None;
        let mut examined = 0;

        for feature in order {
            if examined >= max_features {
                break;
            }
            let Some(candidate) = Self::evaluate_feature(view, samples, feature) else {
                continue;
            };
            examined += 1;
            if best.map_or(true, |b| candidate.impurity < b.impurity) {
                best = Some(candidate);
            }
        }
        best
    }

    /// Best threshold on one feature; None when the feature is constant on the node
    fn evaluate_feature(view: &TrainingView, samples: &[usize], feature: usize) -> Option<SplitCandidate> {
        let mut values: Vec<(f64, u8)> = samples
            .iter()
            .map(|&s| (view.features[s].get(feature), view.targets[s]))
            .collect();
        values.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let first = values.first()?.0;
        let last = values.last()?.0;
        if first == last {
            return None;
        }

        let total = values.len();
        let total_real = values.iter().filter(|(_, t)| *t == 1).count();
        let mut left_real = 0;
        let mut best: Option<SplitCandidate> = None;

        for i in 0..total - 1 {
            if values[i].1 == 1 {
                left_real += 1;
            }
            if values[i].0 == values[i + 1].0 {
                continue;
            }
            let left_n = i + 1;
            let right_n = total - left_n;
            let impurity = (left_n as f64 * gini(left_real, left_n)
                + right_n as f64 * gini(total_real - left_real, right_n))
                / total as f64;

            if best.map_or(true, |b| impurity < b.impurity) {
                best = Some(SplitCandidate {
                    feature,
                    threshold: (values[i].0 + values[i + 1].0) / 2.0,
                    impurity,
                });
            }
        }
        best
    }

    fn predict(&self, features: &FeatureVector) -> ScorerResult<f64> {
        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(Node::Leaf { p_real }) => return Ok(*p_real),
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    index = if features.get(*feature) <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(ScorerError::Prediction {
                        model: NAME.to_string(),
                        reason: format!("dangling tree node {}", index),
                    })
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], index: usize) -> usize {
            match nodes.get(index) {
                Some(Node::Split { left, right, .. }) => 1 + walk(nodes, *left).max(walk(nodes, *right)),
                _ => 0,
            }
        }
        walk(&self.nodes, 0)
    }
}

#[derive(Debug, Clone)]
pub struct RandomForest {
    config: ForestConfig,
    seed: u64,
    trees: Vec<DecisionTree>,
    dimension: usize,
}

impl RandomForest {
    pub fn new(config: ForestConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            trees: Vec::new(),
            dimension: 0,
        }
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }
}

impl Classifier for RandomForest {
    fn train(&mut self, features: &[FeatureVector], labels: &[Label]) -> ScorerResult<()> {
        let dimension = validate_training_set(NAME, features, labels)?;
        let view = TrainingView {
            features,
            targets: labels.iter().map(|l| l.to_binary()).collect(),
            dimension,
        };

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let n = features.len();

        self.trees = (0..self.config.n_trees)
            .map(|_| {
                let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                let mut tree_rng = ChaCha8Rng::seed_from_u64(rng.gen());
                DecisionTree::fit(&view, bootstrap, &self.config, &mut tree_rng)
            })
            .collect();
        self.dimension = dimension;

        tracing::info!(
            "{} trained: {} trees, max depth {}",
            NAME,
            self.trees.len(),
            self.trees.iter().map(|t| t.depth()).max().unwrap_or(0)
        );
        Ok(())
    }

    fn predict_probability(&self, features: &FeatureVector) -> ScorerResult<f64> {
        if self.trees.is_empty() {
            return Err(ScorerError::Prediction {
                model: NAME.to_string(),
                reason: "model is not trained".to_string(),
            });
        }
        if features.dimension() != self.dimension {
            return Err(ScorerError::DimensionMismatch {
                index: features.dimension(),
                dimension: self.dimension,
            });
        }

        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.predict(features)?;
        }
        Ok(sum / self.trees.len() as f64)
    }

    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Bagged Gini decision trees over TF-IDF features"
    }

    fn is_trained(&self) -> bool {
        !self.trees.is_empty()
    }
}
