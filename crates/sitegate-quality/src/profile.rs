//! Penalty profile: fixed score deductions per issue kind

use serde::{Deserialize, Serialize};
use sitegate_core::{Result, SitegateError};

/// Score deductions applied by the deploy gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyProfile {
    /// Profile name (e.g., "standard@1.0")
    pub name: String,

    /// Per critical trust violation
    pub critical_violation: u32,

    /// Per non-critical trust violation (testimonials)
    pub non_critical_violation: u32,

    /// Per expected page with no markup file
    pub missing_page: u32,

    /// Per unresolved placeholder
    pub placeholder: u32,
}

impl PenaltyProfile {
    pub fn standard() -> Self {
        Self {
            name: "standard@1.0".to_string(),
            critical_violation: 10,
            non_critical_violation: 5,
            missing_page: 15,
            placeholder: 5,
        }
    }

    /// Load profile from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| SitegateError::Config(e.to_string()))
    }
}

impl Default for PenaltyProfile {
    fn default() -> Self {
        Self::standard()
    }
}
