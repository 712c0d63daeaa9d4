//! Validate stage: scan every text file, check structure, score.

use crate::StageOutput;
use sitegate_core::artifact::{is_validation_metadata, write_json_artifact, VALIDATION_REPORT};
use sitegate_core::{
    PipelineOptions, Placeholder, Result, ValidationResult, Violation, Workspace,
};
use sitegate_quality::{check_completeness, DeployGate, Findings};
use sitegate_scan::{is_approved, scan_placeholders, scan_trust_claims};
use tracing::{debug, warn};

pub struct Validator {
    approved_claims: Vec<String>,
    expected_pages: Vec<String>,
    gate: DeployGate,
}

impl Validator {
    pub fn new(approved_claims: Vec<String>, expected_pages: Vec<String>) -> Self {
        Self {
            approved_claims,
            expected_pages,
            gate: DeployGate::default(),
        }
    }

    pub fn from_options(options: &PipelineOptions) -> Self {
        Self::new(options.approved_claims.clone(), options.expected_pages.clone())
    }

    pub fn with_gate(mut self, gate: DeployGate) -> Self {
        self.gate = gate;
        self
    }

    /// Compute the validation result without writing anything.
    pub async fn inspect(&self, workspace: &Workspace) -> Result<ValidationResult> {
        let files = workspace.walk().await?;

        let mut violations = Vec::new();
        let mut placeholders = Vec::new();
        let mut markup_paths = Vec::new();
        let mut total_files = 0;

        for file in files.iter().filter(|f| !is_validation_metadata(&f.rel_path)) {
            total_files += 1;
            if file.is_markup() {
                markup_paths.push(file.rel_path.clone());
            }
            if !file.is_text() {
                continue;
            }

            let content = match tokio::fs::read_to_string(&file.abs_path).await {
                Ok(content) => content,
                Err(e) => {
                    warn!(file = %file.rel_path, error = %e, "skipping unreadable file");
                    continue;
                }
            };

            for hit in scan_trust_claims(&content) {
                if is_approved(&hit.text, &self.approved_claims) {
                    debug!(file = %file.rel_path, claim = %hit.text, "approved claim");
                    continue;
                }
                violations.push(Violation {
                    category: hit.category,
                    file: file.rel_path.clone(),
                    line: hit.line,
                    is_critical: hit.category.is_critical(),
                    matched_text: hit.text,
                });
            }

            placeholders.extend(scan_placeholders(&content).into_iter().map(|hit| Placeholder {
                file: file.rel_path.clone(),
                line: hit.line,
                matched_text: hit.text,
            }));
        }

        let completeness = check_completeness(&markup_paths, total_files, &self.expected_pages);

        Ok(self.gate.evaluate(Findings {
            violations,
            placeholders,
            completeness,
        }))
    }

    /// Validate and persist `validation-report.json`.
    pub async fn validate(&self, workspace: &Workspace) -> Result<StageOutput<ValidationResult>> {
        let result = self.inspect(workspace).await?;
        debug!(
            score = result.score,
            violations = result.violations.len(),
            placeholders = result.placeholders.len(),
            can_deploy = result.can_deploy,
            "validation pass"
        );

        let artifact =
            write_json_artifact(workspace, VALIDATION_REPORT, "validation-report", &result).await?;

        Ok(StageOutput {
            value: result,
            artifacts: vec![artifact],
        })
    }
}
