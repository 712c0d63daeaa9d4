//! Stateless content scanning.
//!
//! Every call walks the whole input with fresh iterators; nothing carries
//! over between calls.

use crate::patterns::{Pattern, PLACEHOLDER_PATTERNS, TRUST_PATTERNS};
use serde::Serialize;
use sitegate_core::ViolationCategory;

/// A single pattern hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub category: ViolationCategory,
    /// Name of the pattern that fired
    pub pattern: &'static str,
    /// The matched literal text
    pub text: String,
    /// Byte offset into the scanned content
    pub offset: usize,
    /// 1-based line number
    pub line: usize,
}

impl Match {
    fn end(&self) -> usize {
        self.offset + self.text.len()
    }

    fn overlaps(&self, start: usize, end: usize) -> bool {
        self.offset < end && start < self.end()
    }
}

/// Scan `content` with `patterns`, returning matches ordered by offset.
///
/// Patterns are applied in slice order; a hit that overlaps one already
/// accepted from an earlier pattern is dropped.
pub fn scan(content: &str, patterns: &[Pattern]) -> Vec<Match> {
    let mut accepted: Vec<Match> = Vec::new();

    for pattern in patterns {
        for m in pattern.regex.find_iter(content) {
            if m.as_str().trim().is_empty() {
                continue;
            }
            if accepted.iter().any(|a| a.overlaps(m.start(), m.end())) {
                continue;
            }
            accepted.push(Match {
                category: pattern.category,
                pattern: pattern.name,
                text: m.as_str().to_string(),
                offset: m.start(),
                line: line_at(content, m.start()),
            });
        }
    }

    accepted.sort_by_key(|m| m.offset);
    accepted
}

/// Fabricated-trust claims in `content`
pub fn scan_trust_claims(content: &str) -> Vec<Match> {
    scan(content, &TRUST_PATTERNS)
}

/// Unresolved placeholders in `content`
pub fn scan_placeholders(content: &str) -> Vec<Match> {
    scan(content, &PLACEHOLDER_PATTERNS)
}

/// 1-based line of a byte offset
pub fn line_at(content: &str, offset: usize) -> usize {
    let end = offset.min(content.len());
    content.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

/// True when `matched` contains any non-blank approved claim, ignoring case.
pub fn is_approved(matched: &str, approved_claims: &[String]) -> bool {
    let haystack = matched.to_lowercase();
    approved_claims
        .iter()
        .map(|claim| claim.trim())
        .filter(|claim| !claim.is_empty())
        .any(|claim| haystack.contains(&claim.to_lowercase()))
}
