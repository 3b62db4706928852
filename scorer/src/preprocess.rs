// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Text normalization applied before vectorization
//!
//! Only the model path sees normalized text; the heuristic scorer and the
//! analyzers work on the raw input.

use crate::error::ScorerResult;
use regex::Regex;

#[derive(Debug, Clone)]
pub struct Preprocessor {
    whitespace: Regex,
    url: Regex,
}

impl Preprocessor {
    pub fn new() -> ScorerResult<Self> {
        Ok(Self {
            whitespace: Regex::new(r"\s+")?,
            url: Regex::new(r"http[s]?://(?:[a-zA-Z]|[0-9]|[$-_@.&+]|[!*\(\),]|(?:%[0-9a-fA-F][0-9a-fA-F]))+")?,
        })
    }

    /// Lowercase, collapse whitespace, then strip URLs
    pub fn normalize(&self, text: &str) -> String {
        let lower = text.to_lowercase();
        let collapsed = self.whitespace.replace_all(&lower, " ");
        self.url.replace_all(collapsed.trim(), "").into_owned()
    }
}
