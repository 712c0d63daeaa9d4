//! Data Model: Violation, ValidationResult, RepairLog, PackageResult
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of a scanner finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationCategory {
    /// Large or round numbers attached to users, countries, percentages
    NumericClaim,
    /// Canned trust phrases ("trusted by", "award-winning", "#1 ...")
    TrustSignal,
    /// Compliance and security claims (SOC 2, HIPAA, bank-grade encryption)
    SecurityClaim,
    /// Quoted statements attributed to a named person
    Testimonial,
    /// Dollar-denominated outcome claims
    DollarClaim,
    /// Unresolved template content (lorem ipsum, `[TODO]`, generic brands)
    Placeholder,
}

impl ViolationCategory {
    /// Every trust category is critical except testimonials.
    pub fn is_critical(&self) -> bool {
        !matches!(self, Self::Testimonial)
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NumericClaim => "NUMERIC_CLAIM",
            Self::TrustSignal => "TRUST_SIGNAL",
            Self::SecurityClaim => "SECURITY_CLAIM",
            Self::Testimonial => "TESTIMONIAL",
            Self::DollarClaim => "DOLLAR_CLAIM",
            Self::Placeholder => "PLACEHOLDER",
        }
    }
}

impl std::fmt::Display for ViolationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected fabricated-trust claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub category: ViolationCategory,
    /// Path relative to the workspace root, `/`-separated
    pub file: String,
    /// 1-based line number
    pub line: usize,
    pub matched_text: String,
    pub is_critical: bool,
}

/// An unresolved placeholder token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placeholder {
    pub file: String,
    pub line: usize,
    pub matched_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Completeness {
    pub has_index: bool,
    /// Expected page names (as supplied by the caller) with no markup file
    pub missing_pages: Vec<String>,
    pub total_files: usize,
    pub html_file_count: usize,
}

/// Outcome of one validation pass over a workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub passed: bool,
    /// 0-100
    pub score: u32,
    pub violations: Vec<Violation>,
    pub completeness: Completeness,
    pub placeholders: Vec<Placeholder>,
    pub can_deploy: bool,
    pub blockers: Vec<String>,
}

impl ValidationResult {
    pub fn critical_count(&self) -> usize {
        self.violations.iter().filter(|v| v.is_critical).count()
    }

    pub fn non_critical_count(&self) -> usize {
        self.violations.len() - self.critical_count()
    }

    /// Violations plus placeholders still present
    pub fn issue_count(&self) -> usize {
        self.violations.len() + self.placeholders.len()
    }
}

/// One literal substitution performed by the repairer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairLogEntry {
    pub file: String,
    pub category: ViolationCategory,
    pub before: String,
    pub after: String,
    pub occurrences: usize,
}

/// Contents of `repair-log.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairLog {
    pub attempt: u32,
    pub generated_at: DateTime<Utc>,
    pub repaired_count: usize,
    /// Violations whose text was already gone from the file
    pub skipped: usize,
    pub entries: Vec<RepairLogEntry>,
}

/// Post-repair state, taken from the re-validation that follows a repair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairSummary {
    pub repaired_count: usize,
    pub remaining_count: usize,
    pub score: u32,
    pub can_deploy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub path: String,
    pub size: u64,
    /// Truncated content hash, text files only
    pub hash: Option<String>,
}

/// Contents of `file-tree.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageResult {
    pub manifest: Vec<ManifestEntry>,
    pub routes: Vec<String>,
    pub entry_point: Option<String>,
    pub total_files: usize,
    pub total_size: u64,
}

/// Contents of `preview-info.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewInfo {
    pub routes: Vec<String>,
    pub entry_point: Option<String>,
}

impl From<&PackageResult> for PreviewInfo {
    fn from(result: &PackageResult) -> Self {
        Self {
            routes: result.routes.clone(),
            entry_point: result.entry_point.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_testimonials_are_non_critical() {
        assert!(ViolationCategory::NumericClaim.is_critical());
        assert!(ViolationCategory::TrustSignal.is_critical());
        assert!(ViolationCategory::SecurityClaim.is_critical());
        assert!(ViolationCategory::DollarClaim.is_critical());
        assert!(!ViolationCategory::Testimonial.is_critical());
    }

    #[test]
    fn test_violation_serializes_camel_case() {
        let v = Violation {
            category: ViolationCategory::TrustSignal,
            file: "index.html".to_string(),
            line: 3,
            matched_text: "award-winning".to_string(),
            is_critical: true,
        };
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["category"], "TRUST_SIGNAL");
        assert_eq!(json["matchedText"], "award-winning");
        assert_eq!(json["isCritical"], true);
    }
}
