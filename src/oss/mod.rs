//! Open-source dependency scan output: one scan result per manifest, either
//! as a single JSON object or as an array of them.

use serde::Deserialize;

use crate::{
    error::{InputFormat, ParseError},
    util::nullable,
};

pub mod convert;
pub mod lockfile;
pub mod remediation;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScanResult {
    #[serde(deserialize_with = "nullable")]
    pub vulnerabilities: Vec<OssIssue>,
    #[serde(deserialize_with = "nullable")]
    pub display_target_file: String,
    #[serde(deserialize_with = "nullable")]
    pub package_manager: String,
    #[serde(deserialize_with = "nullable")]
    pub project_name: String,
}

/// One step of an upgrade path. The first step is `false` when the root
/// project itself cannot be upgraded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum UpgradeStep {
    Package(String),
    Flag(bool),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Identifiers {
    #[serde(rename = "CWE", deserialize_with = "nullable")]
    pub cwe: Vec<String>,
    #[serde(rename = "CVE", deserialize_with = "nullable")]
    pub cve: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OssIssue {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    #[serde(deserialize_with = "nullable")]
    pub severity: String,
    #[serde(deserialize_with = "nullable")]
    pub package_name: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub version: String,
    #[serde(deserialize_with = "nullable")]
    pub package_manager: String,
    /// Dependency chain from the project down to the vulnerable package.
    #[serde(deserialize_with = "nullable")]
    pub from: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub upgrade_path: Vec<UpgradeStep>,
    #[serde(deserialize_with = "nullable")]
    pub is_upgradable: bool,
    #[serde(deserialize_with = "nullable")]
    pub is_patchable: bool,
    #[serde(deserialize_with = "nullable")]
    pub fixed_in: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub identifiers: Identifiers,
    pub line_number: Option<i64>,
    #[serde(deserialize_with = "nullable")]
    pub is_ignored: bool,
}

fn starts_with_array(data: &[u8]) -> bool {
    data.iter().find(|byte| !byte.is_ascii_whitespace()) == Some(&b'[')
}

/// Parses one scan result or an array of them, sniffing the first non-blank byte.
pub fn parse_scan_results(data: &[u8]) -> Result<Vec<ScanResult>, ParseError> {
    let parsed = if starts_with_array(data) {
        serde_json::from_slice::<Vec<ScanResult>>(data)
    } else {
        serde_json::from_slice::<ScanResult>(data).map(|result| vec![result])
    };
    parsed.map_err(|source| ParseError::new(InputFormat::Oss, data, source))
}
