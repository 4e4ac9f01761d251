//! Wraps raw scanner output in a summary that carries the normalized issues.

use serde::{de::IgnoredAny, Serialize};
use tracing::{debug, error};

use crate::{issue::Issue, oss, sarif};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMapper {
    /// Static analysis output in SARIF.
    Code,
    /// Open-source dependency scan output.
    Sca,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedScanResult {
    #[serde(skip)]
    pub original_output: String,
    pub success: bool,
    pub issue_count: usize,
    pub issues: Vec<Issue>,
}

impl EnhancedScanResult {
    fn new(original_output: &str, success: bool) -> Self {
        EnhancedScanResult {
            original_output: original_output.to_string(),
            success,
            ..Default::default()
        }
    }

    fn set_issues(&mut self, issues: Vec<Issue>) {
        self.issue_count = issues.len();
        self.issues = issues;
    }

    fn extract_sca_issues(&mut self, work_dir: &str, include_ignores: bool) {
        match oss::convert::convert_oss_json_to_issues(
            work_dir,
            self.original_output.as_bytes(),
            include_ignores,
        ) {
            Ok(issues) => self.set_issues(issues),
            Err(err) => error!(error = %err, "failed to read dependency scan output"),
        }
    }

    fn extract_sast_issues(&mut self, work_dir: &str, include_ignores: bool) {
        match sarif::convert::convert_sarif_json_to_issues(
            self.original_output.as_bytes(),
            work_dir,
            include_ignores,
        ) {
            Ok(conversion) => self.set_issues(conversion.issues),
            Err(err) => debug!(error = %err, "scan output is not a SARIF log"),
        }
    }
}

pub fn is_json(text: &str) -> bool {
    serde_json::from_str::<IgnoredAny>(text).is_ok()
}

/// Re-encodes scanner `output` as an [`EnhancedScanResult`]. Output that is
/// not JSON comes back unchanged.
pub fn map_scan_response(
    mapper: OutputMapper,
    output: &str,
    success: bool,
    work_dir: &str,
    include_ignores: bool,
) -> String {
    if !is_json(output) {
        return output.to_string();
    }

    let mut result = EnhancedScanResult::new(output, success);
    match mapper {
        OutputMapper::Code => result.extract_sast_issues(work_dir, include_ignores),
        OutputMapper::Sca => result.extract_sca_issues(work_dir, include_ignores),
    }

    serde_json::to_string(&result).unwrap_or_else(|_| output.to_string())
}
