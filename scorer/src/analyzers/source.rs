// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Source credibility from the article URL's domain

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::{ParseError, Url};

/// Trusted outlets scored at [`TRUSTED_WEIGHT`] unless configured otherwise
pub const TRUSTED_DOMAINS: [&str; 13] = [
    "reuters.com",
    "ap.org",
    "bbc.com",
    "cnn.com",
    "nytimes.com",
    "washingtonpost.com",
    "theguardian.com",
    "wsj.com",
    "npr.org",
    "abc.com",
    "cbsnews.com",
    "nbcnews.com",
    "usatoday.com",
];

/// Substrings that mark a domain as low-trust
pub const LOW_TRUST_PATTERNS: [&str; 11] = [
    "blogspot",
    "wordpress",
    "tumblr",
    "medium",
    "fake",
    "hoax",
    "conspiracy",
    "truth",
    "patriot",
    "freedom",
    "liberty",
];

pub const TRUSTED_WEIGHT: f64 = 0.9;
const LOW_TRUST_SCORE: f64 = 0.2;
const INSTITUTIONAL_SCORE: f64 = 0.8;
const COMMERCIAL_SCORE: f64 = 0.5;
const OTHER_SCORE: f64 = 0.4;
const UNKNOWN_SCORE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustedDomainEntry {
    pub domain: String,
    /// Trust weight in [0, 1]
    pub weight: f64,
}

impl TrustedDomainEntry {
    pub fn new(domain: impl Into<String>, weight: f64) -> Self {
        Self {
            domain: domain.into(),
            weight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTier {
    /// No URL given, or it could not be parsed
    Unknown,
    Trusted,
    LowTrust,
    /// .gov, .edu or .org
    Institutional,
    /// .com
    Commercial,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceAssessment {
    pub domain: Option<String>,
    pub tier: SourceTier,
    pub score: f64,
}

impl SourceAssessment {
    fn unknown() -> Self {
        Self {
            domain: None,
            tier: SourceTier::Unknown,
            score: UNKNOWN_SCORE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SourceAnalyzer {
    trusted: HashMap<String, f64>,
}

impl Default for SourceAnalyzer {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl SourceAnalyzer {
    /// Seed list plus `extra` entries; an extra entry overrides a seed weight
    pub fn new(extra: &[TrustedDomainEntry]) -> Self {
        let mut trusted: HashMap<String, f64> = TRUSTED_DOMAINS
            .iter()
            .map(|d| (d.to_string(), TRUSTED_WEIGHT))
            .collect();
        for entry in extra {
            trusted.insert(
                entry.domain.trim().to_lowercase().replace("www.", ""),
                entry.weight.clamp(0.0, 1.0),
            );
        }
        Self { trusted }
    }

    pub fn trusted_count(&self) -> usize {
        self.trusted.len()
    }

    /// Network location with `www.` removed, as the scorer compares it
    ///
    /// A URL without a scheme has no network location and yields `""`.
    /// Userinfo and port stay part of the location.
    pub fn domain_of(url: &str) -> Option<String> {
        let parsed = match Url::parse(&url.trim().to_lowercase()) {
            Ok(parsed) => parsed,
            Err(ParseError::RelativeUrlWithoutBase) => return Some(String::new()),
            Err(e) => {
                tracing::debug!("Unparseable source URL {:?}: {}", url, e);
                return None;
            }
        };

        let mut netloc = String::new();
        if !parsed.username().is_empty() || parsed.password().is_some() {
            netloc.push_str(parsed.username());
            if let Some(password) = parsed.password() {
                netloc.push(':');
                netloc.push_str(password);
            }
            netloc.push('@');
        }
        netloc.push_str(parsed.host_str().unwrap_or_default());
        if let Some(port) = parsed.port() {
            netloc.push_str(&format!(":{}", port));
        }
        Some(netloc.replace("www.", ""))
    }

    pub fn assess(&self, url: Option<&str>) -> SourceAssessment {
        let Some(url) = url.filter(|u| !u.trim().is_empty()) else {
            return SourceAssessment::unknown();
        };
        let Some(domain) = Self::domain_of(url) else {
            return SourceAssessment::unknown();
        };

        let (tier, score) = if let Some(weight) = self.trusted.get(&domain) {
            (SourceTier::Trusted, *weight)
        } else if LOW_TRUST_PATTERNS.iter().any(|p| domain.contains(p)) {
            (SourceTier::LowTrust, LOW_TRUST_SCORE)
        } else if [".gov", ".edu", ".org"].iter().any(|tld| domain.ends_with(tld)) {
            (SourceTier::Institutional, INSTITUTIONAL_SCORE)
        } else if domain.ends_with(".com") {
            (SourceTier::Commercial, COMMERCIAL_SCORE)
        } else {
            (SourceTier::Other, OTHER_SCORE)
        };

        SourceAssessment {
            domain: Some(domain),
            tier,
            score,
        }
    }

    pub fn analyze(&self, url: Option<&str>) -> f64 {
        self.assess(url).score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trusted_domain_strips_www() {
        let analyzer = SourceAnalyzer::default();
        let a = analyzer.assess(Some("https://www.reuters.com/world/story"));
        assert_eq!(a.domain.as_deref(), Some("reuters.com"));
        assert_eq!(a.tier, SourceTier::Trusted);
        assert_eq!(a.score, 0.9);
    }

    #[test]
    fn test_low_trust_beats_tld() {
        let analyzer = SourceAnalyzer::default();
        assert_eq!(analyzer.analyze(Some("https://truth-patriots.org/post")), 0.2);
        assert_eq!(analyzer.analyze(Some("http://someone.blogspot.com")), 0.2);
    }

    #[test]
    fn test_tld_tiers() {
        let analyzer = SourceAnalyzer::default();
        assert_eq!(analyzer.analyze(Some("https://www.cdc.gov/flu")), 0.8);
        assert_eq!(analyzer.analyze(Some("https://mit.edu")), 0.8);
        assert_eq!(analyzer.analyze(Some("https://example.com/a")), 0.5);
        assert_eq!(analyzer.analyze(Some("https://example.net/a")), 0.4);
    }

    #[test]
    fn test_missing_or_unparseable_url_is_neutral() {
        let analyzer = SourceAnalyzer::default();
        assert_eq!(analyzer.analyze(None), 0.5);
        assert_eq!(analyzer.analyze(Some("   ")), 0.5);
        assert_eq!(analyzer.assess(Some("http://[::1")).tier, SourceTier::Unknown);
        assert_eq!(analyzer.analyze(Some("http://[::1")), 0.5);
    }

    #[test]
    fn test_url_without_scheme_has_empty_domain() {
        let analyzer = SourceAnalyzer::default();
        for url in ["reuters.com/article", "www.bbc.com", "not a url"] {
            let a = analyzer.assess(Some(url));
            assert_eq!(a.domain.as_deref(), Some(""), "{}", url);
            assert_eq!(a.tier, SourceTier::Other);
            assert_eq!(a.score, 0.4);
        }
    }

    #[test]
    fn test_userinfo_is_part_of_domain() {
        let analyzer = SourceAnalyzer::default();
        let a = analyzer.assess(Some("http://user@reuters.com/x"));
        assert_eq!(a.domain.as_deref(), Some("user@reuters.com"));
        assert_eq!(a.tier, SourceTier::Commercial);
        assert_eq!(a.score, 0.5);
        assert_eq!(
            SourceAnalyzer::domain_of("https://user:pw@www.bbc.com:8080/").as_deref(),
            Some("user:pw@bbc.com:8080")
        );
    }

    #[test]
    fn test_port_is_part_of_domain() {
        let analyzer = SourceAnalyzer::default();
        let a = analyzer.assess(Some("https://reuters.com:8443/x"));
        assert_eq!(a.domain.as_deref(), Some("reuters.com:8443"));
        assert_eq!(a.tier, SourceTier::Other);
    }

    #[test]
    fn test_extra_entries_merge_with_seed_list() {
        let analyzer = SourceAnalyzer::new(&[
            TrustedDomainEntry::new("Local-Paper.net", 0.75),
            TrustedDomainEntry::new("bbc.com", 0.95),
        ]);
        assert_eq!(analyzer.trusted_count(), 14);
        assert_eq!(analyzer.analyze(Some("https://local-paper.net/news")), 0.75);
        assert_eq!(analyzer.analyze(Some("https://www.bbc.com/news")), 0.95);
    }

    #[test]
    fn test_extra_entry_with_www_prefix_matches() {
        let analyzer = SourceAnalyzer::new(&[TrustedDomainEntry::new("www.Local-Paper.net", 0.75)]);
        assert_eq!(analyzer.analyze(Some("https://www.local-paper.net/news")), 0.75);
        assert_eq!(analyzer.analyze(Some("https://local-paper.net/news")), 0.75);
    }
}
