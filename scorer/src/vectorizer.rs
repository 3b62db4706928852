// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! TF-IDF feature extraction over word n-grams
//!
//! The vocabulary and IDF weights are fitted once on the training corpus and
//! frozen. Inference maps text into that fixed feature space; tokens outside
//! the vocabulary are dropped.

use crate::config::VectorizerConfig;
use crate::error::{ScorerError, ScorerResult};
use crate::stopwords;
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Sparse feature vector: (feature index, weight) pairs sorted by index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    dimension: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// Build from unsorted entries; zero weights are dropped
    pub fn new(dimension: usize, mut entries: Vec<(usize, f64)>) -> ScorerResult<Self> {
        entries.retain(|(_, w)| *w != 0.0);
        entries.sort_by_key(|(i, _)| *i);
        if let Some(&(index, _)) = entries.iter().find(|(i, _)| *i >= dimension) {
            return Err(ScorerError::DimensionMismatch { index, dimension });
        }
        if entries.iter().any(|(_, w)| !w.is_finite()) {
            return Err(ScorerError::NonFinite("feature vector".to_string()));
        }
        Ok(Self { dimension, entries })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Weight of a feature (0.0 when absent)
    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |(i, _)| *i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(usize, f64)> {
        self.entries.iter()
    }

    /// Number of non-zero features
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.entries
            .iter()
            .map(|(i, w)| weights.get(*i).copied().unwrap_or(0.0) * w)
            .sum()
    }
}

#[derive(Debug, Clone)]
struct Fitted {
    /// token -> feature index (indices follow alphabetical token order)
    vocabulary: HashMap<String, usize>,
    /// feature index -> token
    terms: Vec<String>,
    idf: Vec<f64>,
}

/// Word n-gram TF-IDF vectorizer with English stop-word removal
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    config: VectorizerConfig,
    token_pattern: Regex,
    stop_words: HashSet<&'static str>,
    fitted: Option<Fitted>,
}

impl TfIdfVectorizer {
    pub fn new(config: VectorizerConfig) -> ScorerResult<Self> {
        Ok(Self {
            config,
            token_pattern: Regex::new(r"\b\w\w+\b")?,
            stop_words: stopwords::english(),
            fitted: None,
        })
    }

    /// Lowercased tokens of two or more word characters, stop words removed
    fn tokenize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        self.token_pattern
            .find_iter(&lower)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(t))
            .map(|t| t.to_string())
            .collect()
    }

    /// Unigrams and longer n-grams over the filtered token stream
    fn ngrams(&self, text: &str) -> Vec<String> {
        let tokens = self.tokenize(text);
        let (min_n, max_n) = self.config.ngram_range;
        let mut grams = Vec::new();

        for n in min_n..=max_n {
            if n == 0 || n > tokens.len() {
                continue;
            }
            if n == 1 {
                grams.extend(tokens.iter().cloned());
            } else {
                grams.extend(tokens.windows(n).map(|w| w.join(" ")));
            }
        }
        grams
    }

    /// Fit vocabulary and IDF weights; replaces any previous fit
    pub fn fit(&mut self, corpus: &[&str]) -> ScorerResult<()> {
        if corpus.is_empty() {
            return Err(ScorerError::EmptyCorpus);
        }

        let mut df: HashMap<String, usize> = HashMap::new();
        let mut total_counts: HashMap<String, usize> = HashMap::new();

        for doc in corpus {
            let grams = self.ngrams(doc);
            let unique: HashSet<&String> = grams.iter().collect();
            for gram in unique {
                *df.entry(gram.clone()).or_insert(0) += 1;
            }
            for gram in grams {
                *total_counts.entry(gram).or_insert(0) += 1;
            }
        }

        let n_docs = corpus.len();
        let max_doc_count = self.config.max_df * n_docs as f64;

        let mut kept: Vec<(String, usize)> = df
            .iter()
            .filter(|(_, &count)| count >= self.config.min_df && count as f64 <= max_doc_count)
            .map(|(term, _)| (term.clone(), total_counts.get(term).copied().unwrap_or(0)))
            .collect();

        if kept.len() > self.config.max_features {
            kept.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            kept.truncate(self.config.max_features);
        }

        if kept.is_empty() {
            return Err(ScorerError::EmptyVocabulary);
        }

        let ordered: BTreeMap<String, usize> = kept
            .into_iter()
            .map(|(term, _)| {
                let doc_freq = df.get(&term).copied().unwrap_or(0);
                (term, doc_freq)
            })
            .collect();

        let mut vocabulary = HashMap::with_capacity(ordered.len());
        let mut terms = Vec::with_capacity(ordered.len());
        let mut idf = Vec::with_capacity(ordered.len());

        for (index, (term, doc_freq)) in ordered.into_iter().enumerate() {
            idf.push(((1.0 + n_docs as f64) / (1.0 + doc_freq as f64)).ln() + 1.0);
            vocabulary.insert(term.clone(), index);
            terms.push(term);
        }

        tracing::info!(
            "Vectorizer fitted: {} documents, {} features (from {} candidate n-grams)",
            n_docs,
            terms.len(),
            df.len()
        );

        self.fitted = Some(Fitted { vocabulary, terms, idf });
        Ok(())
    }

    /// Map text into the frozen feature space (L2-normalized TF-IDF)
    pub fn transform(&self, text: &str) -> ScorerResult<FeatureVector> {
        let fitted = self.fitted.as_ref().ok_or(ScorerError::NotFitted)?;

        let mut counts: HashMap<usize, usize> = HashMap::new();
        for gram in self.ngrams(text) {
            if let Some(&index) = fitted.vocabulary.get(&gram) {
                *counts.entry(index).or_insert(0) += 1;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(index, count)| (index, count as f64 * fitted.idf[index]))
            .collect();

        let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in entries.iter_mut() {
                *w /= norm;
            }
        }

        FeatureVector::new(fitted.terms.len(), entries)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.fitted.as_ref().map_or(0, |f| f.terms.len())
    }

    /// Token for a feature index
    pub fn term(&self, index: usize) -> Option<&str> {
        self.fitted.as_ref()?.terms.get(index).map(|s| s.as_str())
    }

    /// Features of a vector as (token, weight), heaviest first
    pub fn named_features(&self, features: &FeatureVector) -> Vec<(String, f64)> {
        let mut named: Vec<(String, f64)> = features
            .iter()
            .filter_map(|(i, w)| self.term(*i).map(|t| (t.to_string(), *w)))
            .collect();
        named.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        named
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::TrainingCorpus;

    fn fitted_on(docs: &[&str]) -> TfIdfVectorizer {
        let mut v = TfIdfVectorizer::new(VectorizerConfig::default()).unwrap();
        v.fit(docs).unwrap();
        v
    }

    #[test]
    fn test_tokenize_drops_stop_words_and_short_tokens() {
        let v = TfIdfVectorizer::new(VectorizerConfig::default()).unwrap();
        let tokens = v.tokenize("The Study of a cat in Paris");
        assert_eq!(tokens, vec!["study", "cat", "paris"]);
    }

    #[test]
    fn test_bigrams_skip_stop_words() {
        let v = TfIdfVectorizer::new(VectorizerConfig::default()).unwrap();
        let grams = v.ngrams("shocking truth of the secret");
        assert!(grams.contains(&"shocking truth".to_string()));
        assert!(grams.contains(&"truth secret".to_string()));
    }

    #[test]
    fn test_min_df_and_max_df_filters() {
        let config = VectorizerConfig {
            ngram_range: (1, 1),
            ..VectorizerConfig::default()
        };
        let mut v = TfIdfVectorizer::new(config).unwrap();
        v.fit(&["alpha common beta", "alpha common gamma", "delta common beta"]).unwrap();
        // "common" is in 3/3 docs (> 95%), "gamma"/"delta" in only one
        assert_eq!(v.vocabulary_size(), 2);
        assert!(v.fitted.as_ref().unwrap().vocabulary.contains_key("alpha"));
        assert!(v.fitted.as_ref().unwrap().vocabulary.contains_key("beta"));
    }

    #[test]
    fn test_empty_corpus_and_vocabulary() {
        let mut v = TfIdfVectorizer::new(VectorizerConfig::default()).unwrap();
        assert!(matches!(v.fit(&[]), Err(ScorerError::EmptyCorpus)));
        assert!(matches!(v.fit(&["unique words", "other things"]), Err(ScorerError::EmptyVocabulary)));
        assert!(matches!(v.transform("anything"), Err(ScorerError::NotFitted)));
    }

    #[test]
    fn test_transform_is_normalized_and_drops_unknown_tokens() {
        let corpus = TrainingCorpus::synthetic();
        let v = fitted_on(&corpus.texts());

        let fv = v.transform("shocking truth revealed about zebras").unwrap();
        assert!(!fv.is_empty());
        let norm: f64 = fv.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
        assert!(v.named_features(&fv).iter().all(|(t, _)| !t.contains("zebras")));

        let empty = v.transform("zebras giraffes").unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.dimension(), v.vocabulary_size());
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let config = VectorizerConfig {
            max_features: 1,
            ngram_range: (1, 1),
            ..VectorizerConfig::default()
        };
        let mut v = TfIdfVectorizer::new(config).unwrap();
        v.fit(&["apple apple pear", "apple pear", "kiwi", "kiwi"]).unwrap();
        assert_eq!(v.vocabulary_size(), 1);
        assert_eq!(v.term(0), Some("apple"));
    }

    #[test]
    fn test_feature_vector_rejects_out_of_range_index() {
        assert!(matches!(
            FeatureVector::new(2, vec![(5, 1.0)]),
            Err(ScorerError::DimensionMismatch { index: 5, dimension: 2 })
        ));
        let fv = FeatureVector::new(4, vec![(3, 0.5), (1, 0.25), (2, 0.0)]).unwrap();
        assert_eq!(fv.nnz(), 2);
        assert_eq!(fv.get(3), 0.5);
        assert_eq!(fv.get(2), 0.0);
    }
}
