//! Deploy gate evaluation for generated sites
//!
//! Turns scanner findings and the completeness block into a scored
//! `ValidationResult`. Every failing check becomes a blocker; the site may
//! deploy only when nothing blocks.

use super::profile::PenaltyProfile;
use serde::{Deserialize, Serialize};
use sitegate_core::{Completeness, Placeholder, ValidationResult, Violation};

/// Everything a validation pass found
#[derive(Debug, Clone, Default)]
pub struct Findings {
    pub violations: Vec<Violation>,
    pub placeholders: Vec<Placeholder>,
    pub completeness: Completeness,
}

/// Issue tallies the score is computed from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IssueCounts {
    pub critical: usize,
    pub non_critical: usize,
    pub missing_pages: usize,
    pub placeholders: usize,
}

impl IssueCounts {
    pub fn of(findings: &Findings) -> Self {
        let critical = findings.violations.iter().filter(|v| v.is_critical).count();
        Self {
            critical,
            non_critical: findings.violations.len() - critical,
            missing_pages: findings.completeness.missing_pages.len(),
            placeholders: findings.placeholders.len(),
        }
    }
}

/// Single check result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Check {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub impact: i64, // Score impact (negative)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    Ok,
    Warn,
    Fail,
}

/// Deploy gate that scores findings against a penalty profile
pub struct DeployGate {
    profile: PenaltyProfile,
}

impl DeployGate {
    pub fn new(profile: PenaltyProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &PenaltyProfile {
        &self.profile
    }

    /// 100 minus fixed penalties, clamped to 0..=100
    pub fn score(&self, counts: IssueCounts) -> u32 {
        let p = &self.profile;
        let penalty = counts.critical as i64 * p.critical_violation as i64
            + counts.non_critical as i64 * p.non_critical_violation as i64
            + counts.missing_pages as i64 * p.missing_page as i64
            + counts.placeholders as i64 * p.placeholder as i64;
        (100 - penalty).clamp(0, 100) as u32
    }

    pub fn checks(&self, findings: &Findings) -> Vec<Check> {
        let counts = IssueCounts::of(findings);
        let p = &self.profile;
        let mut checks = Vec::new();

        // === Structure ===
        if findings.completeness.has_index {
            checks.push(Check::ok("index", "index.html present"));
        } else {
            checks.push(Check {
                name: "index".to_string(),
                status: CheckStatus::Fail,
                message: "Missing index.html".to_string(),
                impact: 0,
            });
        }

        if findings.completeness.missing_pages.is_empty() {
            checks.push(Check::ok("pages", "All expected pages present"));
        } else {
            checks.push(Check {
                name: "pages".to_string(),
                status: CheckStatus::Fail,
                message: format!(
                    "Missing pages: {}",
                    findings.completeness.missing_pages.join(", ")
                ),
                impact: -(counts.missing_pages as i64 * p.missing_page as i64),
            });
        }

        // === Trust ===
        if counts.critical > 0 {
            checks.push(Check {
                name: "trust_claims".to_string(),
                status: CheckStatus::Fail,
                message: format!("{} critical trust violation(s)", counts.critical),
                impact: -(counts.critical as i64 * p.critical_violation as i64),
            });
        } else {
            checks.push(Check::ok("trust_claims", "No critical trust violations"));
        }

        if counts.non_critical > 0 {
            checks.push(Check {
                name: "testimonials".to_string(),
                status: CheckStatus::Warn,
                message: format!("{} unverified testimonial(s)", counts.non_critical),
                impact: -(counts.non_critical as i64 * p.non_critical_violation as i64),
            });
        }

        // === Placeholders ===
        if counts.placeholders > 0 {
            checks.push(Check {
                name: "placeholders".to_string(),
                status: CheckStatus::Fail,
                message: format!("{} unresolved placeholder(s)", counts.placeholders),
                impact: -(counts.placeholders as i64 * p.placeholder as i64),
            });
        } else {
            checks.push(Check::ok("placeholders", "No placeholders"));
        }

        checks
    }

    /// Score the findings and derive the deploy verdict
    pub fn evaluate(&self, findings: Findings) -> ValidationResult {
        let counts = IssueCounts::of(&findings);
        let blockers: Vec<String> = self
            .checks(&findings)
            .into_iter()
            .filter(|c| c.status == CheckStatus::Fail)
            .map(|c| c.message)
            .collect();

        ValidationResult {
            passed: counts.critical == 0 && counts.placeholders == 0,
            score: self.score(counts),
            can_deploy: blockers.is_empty(),
            blockers,
            violations: findings.violations,
            completeness: findings.completeness,
            placeholders: findings.placeholders,
        }
    }
}

impl Check {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            impact: 0,
        }
    }
}

impl Default for DeployGate {
    fn default() -> Self {
        Self::new(PenaltyProfile::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitegate_core::ViolationCategory;

    fn violation(category: ViolationCategory) -> Violation {
        Violation {
            category,
            file: "index.html".to_string(),
            line: 1,
            matched_text: "x".to_string(),
            is_critical: category.is_critical(),
        }
    }

    fn complete() -> Completeness {
        Completeness {
            has_index: true,
            missing_pages: vec![],
            total_files: 1,
            html_file_count: 1,
        }
    }

    #[test]
    fn test_clean_site_deploys() {
        let result = DeployGate::default().evaluate(Findings {
            completeness: complete(),
            ..Default::default()
        });
        assert_eq!(result.score, 100);
        assert!(result.passed);
        assert!(result.can_deploy);
        assert!(result.blockers.is_empty());
    }

    #[test]
    fn test_score_formula() {
        let gate = DeployGate::default();
        let counts = IssueCounts {
            critical: 2,
            non_critical: 1,
            missing_pages: 1,
            placeholders: 3,
        };
        assert_eq!(gate.score(counts), 100 - 20 - 5 - 15 - 15);
        assert_eq!(gate.score(IssueCounts { critical: 11, ..Default::default() }), 0);
    }

    #[test]
    fn test_testimonial_warns_but_deploys() {
        let result = DeployGate::default().evaluate(Findings {
            violations: vec![violation(ViolationCategory::Testimonial)],
            completeness: complete(),
            ..Default::default()
        });
        assert_eq!(result.score, 95);
        assert!(result.can_deploy);
    }

    #[test]
    fn test_blocker_order() {
        let result = DeployGate::default().evaluate(Findings {
            violations: vec![violation(ViolationCategory::DollarClaim)],
            placeholders: vec![Placeholder {
                file: "about.html".to_string(),
                line: 2,
                matched_text: "lorem ipsum".to_string(),
            }],
            completeness: Completeness {
                has_index: false,
                missing_pages: vec!["Pricing".to_string()],
                total_files: 1,
                html_file_count: 1,
            },
        });
        assert_eq!(
            result.blockers,
            vec![
                "Missing index.html",
                "Missing pages: Pricing",
                "1 critical trust violation(s)",
                "1 unresolved placeholder(s)",
            ]
        );
        assert!(!result.passed);
        assert!(!result.can_deploy);
        assert_eq!(result.score, 100 - 15 - 10 - 5);
    }
}
