// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Explanatory signal extractors
//!
//! These produce the sub-scores attached to a result. None of them feeds the
//! final credibility score, and none of them can fail: every error path
//! resolves to a documented neutral value.

pub mod entities;
pub mod keywords;
pub mod readability;
pub mod sentiment;
pub mod source;

pub use entities::{Entities, EntityExtractor};
pub use keywords::{KeywordAnalyzer, KeywordReport};
pub use readability::{ReadabilityAnalyzer, ReadabilityReport};
pub use sentiment::{SentimentAnalyzer, SentimentLabel, SentimentReport};
pub use source::{SourceAnalyzer, SourceAssessment, SourceTier, TrustedDomainEntry};
