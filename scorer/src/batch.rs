// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Batch scoring of articles read from CSV
//!
//! Input has `content` and `url` columns. At most `batch_limit` rows are
//! considered; rows without usable content are skipped, not reported.

use crate::history::preview;
use crate::pipeline::CredibilityDetector;
use crate::result::ScoreResult;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchArticle {
    pub content: Option<String>,
    pub url: Option<String>,
}

impl BatchArticle {
    pub fn new(content: impl Into<String>, url: Option<&str>) -> Self {
        Self {
            content: Some(content.into()),
            url: url.map(str::to_string),
        }
    }

    fn trimmed_content(&self) -> Option<&str> {
        self.content.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }

    fn trimmed_url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchItemResult {
    /// Content preview
    pub content: String,
    pub url: Option<String>,
    pub credibility_score: f64,
    pub is_fake: bool,
}

/// Read articles from a CSV file with a header row
pub fn read_articles(path: &Path) -> Result<Vec<BatchArticle>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open batch file: {}", path.display()))?;
    read_articles_from(file).with_context(|| format!("Failed to read batch file: {}", path.display()))
}

pub fn read_articles_from<R: Read>(reader: R) -> Result<Vec<BatchArticle>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut articles = Vec::new();
    for (idx, result) in reader.deserialize().enumerate() {
        let article: BatchArticle =
            result.with_context(|| format!("Failed to parse batch record {}", idx + 1))?;
        articles.push(article);
    }
    Ok(articles)
}

/// Score one article; `None` when it has no content long enough to score
pub fn score_article(detector: &CredibilityDetector, article: &BatchArticle) -> Option<BatchItemResult> {
    let url = article.trimmed_url();
    let Some(content) = article.trimmed_content() else {
        if url.is_some() {
            tracing::warn!("Skipping article with URL only; fetching is not supported: {:?}", url);
        }
        return None;
    };

    if let Err(e) = detector.check_content(content) {
        tracing::warn!("Batch analysis item error: {}", e);
        return None;
    }

    let score = detector.predict_credibility(content);
    Some(BatchItemResult {
        content: preview(content),
        url: url.map(str::to_string),
        credibility_score: score,
        is_fake: score < ScoreResult::FAKE_THRESHOLD,
    })
}

pub fn analyze_batch(detector: &CredibilityDetector, articles: &[BatchArticle]) -> Vec<BatchItemResult> {
    analyze_batch_with(detector, articles, |_| {})
}

/// Like [`analyze_batch`], calling `on_item` with the index of each row considered
pub fn analyze_batch_with(
    detector: &CredibilityDetector,
    articles: &[BatchArticle],
    mut on_item: impl FnMut(usize),
) -> Vec<BatchItemResult> {
    let limit = detector.config().batch_limit;
    if articles.len() > limit {
        tracing::warn!("Batch of {} articles truncated to {}", articles.len(), limit);
    }

    let mut results = Vec::new();
    for (idx, article) in articles.iter().take(limit).enumerate() {
        if let Some(result) = score_article(detector, article) {
            results.push(result);
        }
        on_item(idx);
    }
    tracing::info!("Batch analysis scored {} of {} articles", results.len(), articles.len().min(limit));
    results
}
