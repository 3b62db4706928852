// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Analysis history stored as JSON Lines
//!
//! One record per line, appended in id order. The file is only ever
//! appended to; a missing file is an empty history.

use crate::result::{ScoreDetails, ScoreResult};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Characters of content kept in previews
pub const PREVIEW_CHARS: usize = 200;

/// First [`PREVIEW_CHARS`] characters, with "..." when truncated
pub fn preview(content: &str) -> String {
    if content.chars().count() > PREVIEW_CHARS {
        content.chars().take(PREVIEW_CHARS).collect::<String>() + "..."
    } else {
        content.to_string()
    }
}

/// Hex-encoded SHA-256 of the content
pub fn content_digest(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisRecord {
    /// Assigned by the store on append
    pub id: u64,
    pub content: String,
    pub url: Option<String>,
    pub credibility_score: f64,
    pub is_fake: bool,
    pub keyword_score: f64,
    pub sentiment_score: f64,
    pub source_score: f64,
    pub details: ScoreDetails,
    pub created_at: DateTime<Utc>,
    pub content_sha256: String,
}

impl AnalysisRecord {
    pub fn from_result(content: &str, url: Option<&str>, result: &ScoreResult) -> Self {
        Self {
            id: 0,
            content: content.to_string(),
            url: url.map(str::to_string),
            credibility_score: result.credibility_score,
            is_fake: result.is_fake,
            keyword_score: result.details.keyword_score,
            sentiment_score: result.details.sentiment_score,
            source_score: result.details.source_score,
            details: result.details.clone(),
            created_at: result.details.timestamp,
            content_sha256: content_digest(content),
        }
    }
}

/// Export view of a record: content cut to a preview
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisExport {
    pub id: u64,
    pub content: String,
    pub url: Option<String>,
    pub credibility_score: f64,
    pub is_fake: bool,
    pub keyword_score: f64,
    pub sentiment_score: f64,
    pub source_score: f64,
    pub analysis_details: ScoreDetails,
    pub created_at: DateTime<Utc>,
}

impl From<&AnalysisRecord> for AnalysisExport {
    fn from(record: &AnalysisRecord) -> Self {
        Self {
            id: record.id,
            content: preview(&record.content),
            url: record.url.clone(),
            credibility_score: record.credibility_score,
            is_fake: record.is_fake,
            keyword_score: record.keyword_score,
            sentiment_score: record.sentiment_score,
            source_score: record.source_score,
            analysis_details: record.details.clone(),
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a record, assigning the next id; returns the stored record
    pub fn append(&self, mut record: AnalysisRecord) -> Result<AnalysisRecord> {
        let next_id = self.load_all()?.last().map_or(1, |r| r.id + 1);
        record.id = next_id;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create history directory: {}", parent.display()))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open history file: {}", self.path.display()))?;
        let line = serde_json::to_string(&record).context("Failed to serialize analysis record")?;
        writeln!(file, "{}", line)
            .with_context(|| format!("Failed to write history file: {}", self.path.display()))?;

        tracing::info!("Saved analysis {} to {}", record.id, self.path.display());
        Ok(record)
    }

    /// All records in append order
    pub fn load_all(&self) -> Result<Vec<AnalysisRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open history file: {}", self.path.display()))?;
        let reader = BufReader::new(file);

        let mut records = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.with_context(|| {
                format!("Failed to read line {} in {}", idx + 1, self.path.display())
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let record: AnalysisRecord = serde_json::from_str(&line).with_context(|| {
                format!("Malformed record on line {} in {}", idx + 1, self.path.display())
            })?;
            records.push(record);
        }
        Ok(records)
    }

    pub fn get(&self, id: u64) -> Result<Option<AnalysisRecord>> {
        Ok(self.load_all()?.into_iter().find(|r| r.id == id))
    }

    pub fn export(&self, id: u64) -> Result<Option<AnalysisExport>> {
        Ok(self.get(id)?.as_ref().map(AnalysisExport::from))
    }
}
