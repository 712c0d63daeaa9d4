//! Repair stage: neutralize violations by literal substitution, then
//! re-validate.
//!
//! Each violation's exact matched text is escaped into a literal pattern and
//! every occurrence in its file is replaced. Identical text elsewhere in the
//! same file is replaced too.

use crate::validate::Validator;
use crate::StageOutput;
use chrono::Utc;
use regex::{NoExpand, Regex};
use sitegate_core::artifact::{write_json_artifact, REPAIR_LOG};
use sitegate_core::{
    RepairLog, RepairLogEntry, RepairSummary, Result, SitegateError, ValidationResult,
    ViolationCategory, Workspace,
};
use std::collections::BTreeMap;
use tracing::{debug, info};

pub const NUMERIC_REPLACEMENT: &str = "a growing community";
pub const TRUST_REPLACEMENT: &str = "Built with care";

/// Neutral text substituted for each category
pub fn replacement_for(category: ViolationCategory) -> &'static str {
    match category {
        ViolationCategory::NumericClaim => NUMERIC_REPLACEMENT,
        ViolationCategory::TrustSignal => TRUST_REPLACEMENT,
        ViolationCategory::SecurityClaim
        | ViolationCategory::Testimonial
        | ViolationCategory::DollarClaim
        | ViolationCategory::Placeholder => "",
    }
}

/// One repair pass and the validation that followed it
#[derive(Debug, Clone)]
pub struct RepairOutcome {
    pub summary: RepairSummary,
    pub log: RepairLog,
    pub validation: ValidationResult,
}

pub struct Repairer<'a> {
    validator: &'a Validator,
}

impl<'a> Repairer<'a> {
    pub fn new(validator: &'a Validator) -> Self {
        Self { validator }
    }

    /// Apply one repair pass for `result` and re-validate the workspace.
    pub async fn repair(
        &self,
        workspace: &Workspace,
        result: &ValidationResult,
        attempt: u32,
    ) -> Result<StageOutput<RepairOutcome>> {
        let mut contents: BTreeMap<String, String> = BTreeMap::new();
        let mut dirty: Vec<String> = Vec::new();
        let mut entries = Vec::new();
        let mut skipped = 0;

        for violation in &result.violations {
            if !contents.contains_key(&violation.file) {
                let text = workspace.read_to_string(&violation.file).await?;
                contents.insert(violation.file.clone(), text);
            }
            let Some(content) = contents.get_mut(&violation.file) else {
                continue;
            };

            let literal = Regex::new(&regex::escape(&violation.matched_text)).map_err(|e| {
                SitegateError::Stage {
                    stage: "repair".to_string(),
                    message: e.to_string(),
                }
            })?;

            let occurrences = literal.find_iter(content).count();
            if occurrences == 0 {
                // Already removed by an earlier substitution in this pass
                skipped += 1;
                continue;
            }

            let after = replacement_for(violation.category);
            *content = literal.replace_all(content, NoExpand(after)).into_owned();
            debug!(
                file = %violation.file,
                category = %violation.category,
                occurrences,
                "neutralized claim"
            );

            if !dirty.contains(&violation.file) {
                dirty.push(violation.file.clone());
            }
            entries.push(RepairLogEntry {
                file: violation.file.clone(),
                category: violation.category,
                before: violation.matched_text.clone(),
                after: after.to_string(),
                occurrences,
            });
        }

        for file in &dirty {
            if let Some(content) = contents.get(file) {
                workspace.write(file, content).await?;
            }
        }

        let log = RepairLog {
            attempt,
            generated_at: Utc::now(),
            repaired_count: entries.len(),
            skipped,
            entries,
        };
        let mut artifacts = vec![write_json_artifact(workspace, REPAIR_LOG, "repair-log", &log).await?];

        let revalidated = self.validator.validate(workspace).await?;
        artifacts.extend(revalidated.artifacts);
        let validation = revalidated.value;

        let summary = RepairSummary {
            repaired_count: log.repaired_count,
            remaining_count: validation.issue_count(),
            score: validation.score,
            can_deploy: validation.can_deploy,
        };
        info!(
            attempt,
            repaired = summary.repaired_count,
            skipped,
            remaining = summary.remaining_count,
            score = summary.score,
            "repair pass finished"
        );

        Ok(StageOutput {
            value: RepairOutcome {
                summary,
                log,
                validation,
            },
            artifacts,
        })
    }
}
