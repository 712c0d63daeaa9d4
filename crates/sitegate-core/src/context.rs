//! Pipeline Options: caller-supplied knobs shared by every stage
use crate::error::{Result, SitegateError};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_REPAIR_ATTEMPTS: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineOptions {
    /// Claims the customer has substantiated; matching findings are dropped
    pub approved_claims: Vec<String>,
    /// Page names the site must contain ("Home", "Pricing", ...)
    pub expected_pages: Vec<String>,
    /// Upper bound on repair/re-validate rounds
    pub max_repair_attempts: u32,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            approved_claims: Vec::new(),
            expected_pages: Vec::new(),
            max_repair_attempts: DEFAULT_MAX_REPAIR_ATTEMPTS,
        }
    }
}

impl PipelineOptions {
    pub fn with_expected_pages<I, S>(mut self, pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected_pages = pages.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_approved_claims<I, S>(mut self, claims: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.approved_claims = claims.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_repair_attempts(mut self, attempts: u32) -> Self {
        self.max_repair_attempts = attempts;
        self
    }

    /// Load options from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| SitegateError::Config(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SitegateError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_allow_two_repair_attempts() {
        let options = PipelineOptions::default();
        assert_eq!(options.max_repair_attempts, 2);
        assert!(options.expected_pages.is_empty());
    }

    #[test]
    fn test_loads_partial_yaml() {
        let options = PipelineOptions::from_yaml(
            "expectedPages:\n  - Home\n  - Pricing\napprovedClaims:\n  - SOC 2 Type II\n",
        )
        .unwrap();
        assert_eq!(options.expected_pages, vec!["Home", "Pricing"]);
        assert_eq!(options.approved_claims, vec!["SOC 2 Type II"]);
        assert_eq!(options.max_repair_attempts, DEFAULT_MAX_REPAIR_ATTEMPTS);
    }

    #[test]
    fn test_rejects_malformed_config() {
        let err = PipelineOptions::from_json("{ \"maxRepairAttempts\": \"lots\" }").unwrap_err();
        assert!(err.to_string().starts_with("CONFIG/"));
    }
}
