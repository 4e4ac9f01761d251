use std::collections::HashSet;

use tracing::debug;

use crate::{
    error::ParseError,
    issue::{truncate_message, Issue, Severity},
};

use super::{lockfile, parse_scan_results, OssIssue, ScanResult};

const MAX_MESSAGE_CHARS: usize = 200;
const TRUNCATION_SUFFIX: &str = "... (Snyk)";

/// Converts open-source dependency scan output (one result or an array of
/// them) into issues located at the scanned manifest.
pub fn convert_oss_json_to_issues(
    work_dir: &str,
    oss_json: &[u8],
    include_ignores: bool,
) -> Result<Vec<Issue>, ParseError> {
    let scan_results = parse_scan_results(oss_json)?;
    Ok(convert_to_issues(work_dir, &scan_results, include_ignores))
}

/// One issue per distinct manifest, finding id and package across every
/// scan result.
pub fn convert_to_issues(
    work_dir: &str,
    scan_results: &[ScanResult],
    include_ignores: bool,
) -> Vec<Issue> {
    let mut issues = vec![];
    let mut seen: HashSet<String> = HashSet::new();

    for scan_result in scan_results {
        let target_file_path =
            lockfile::target_file_path(work_dir, &scan_result.display_target_file);
        for finding in &scan_result.vulnerabilities {
            if finding.is_ignored && !include_ignores {
                continue;
            }
            let key = format!(
                "{}|{}|{}",
                target_file_path, finding.id, finding.package_name
            );
            if !seen.insert(key) {
                continue;
            }
            issues.push(to_issue(finding, &target_file_path));
        }
    }

    debug!(
        scan_results = scan_results.len(),
        issues = issues.len(),
        "converted dependency scan results"
    );
    issues
}

fn to_issue(finding: &OssIssue, target_file_path: &str) -> Issue {
    let remediation = finding.remediation();
    let message = format!(
        "{} affecting package {}. {}",
        finding.title, finding.package_name, remediation
    );
    Issue {
        id: finding.id.clone(),
        title: finding.title.clone(),
        severity: Severity::from_sca(&finding.severity),
        message: truncate_message(&message, MAX_MESSAGE_CHARS, TRUNCATION_SUFFIX),
        cwes: finding.identifiers.cwe.clone(),
        cves: finding.identifiers.cve.clone(),
        package_name: finding.package_name.clone(),
        version: finding.version.clone(),
        ecosystem: finding.package_manager.clone(),
        fixed_in: finding.fixed_in.clone(),
        remediation,
        file_path: target_file_path.to_string(),
        line: finding
            .line_number
            .filter(|line| *line > 0)
            .and_then(|line| usize::try_from(line).ok()),
        is_ignored: finding.is_ignored,
        ..Default::default()
    }
}
