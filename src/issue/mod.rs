use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub mod severity;

pub use severity::Severity;

/// Zero-based line/character pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: i64,
    pub character: i64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataflowElement {
    /// Index in the deduplicated flow, starting at 0.
    pub position: usize,
    pub file_path: String,
    pub flow_range: Range,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SuppressionStatus {
    Rejected,
    UnderReview,
    Accepted,
}

/// Whether a suppression date was read from the report or substituted with the conversion time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateSource {
    #[default]
    Parsed,
    Fallback,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IgnoreDetails {
    pub category: String,
    pub reason: String,
    /// RFC 3339, or empty when the suppression never expires.
    pub expiration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_source: Option<DateSource>,
    pub ignored_on: DateTime<FixedOffset>,
    #[serde(default)]
    pub ignored_on_source: DateSource,
    pub ignored_by: String,
    pub status: SuppressionStatus,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    pub title: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dataflow: Vec<DataflowElement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cwes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cves: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub package_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ecosystem: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fixed_in: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub remediation: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file_path: String,
    /// One-based.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// One-based.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    #[serde(default, rename = "fingerPrint", skip_serializing_if = "String::is_empty")]
    pub fingerprint: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_ignored: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_details: Option<IgnoreDetails>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Cuts `text` to `max_chars` characters and appends `suffix` when it was longer.
pub fn truncate_message(text: &str, max_chars: usize, suffix: &str) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], suffix),
        None => text.to_string(),
    }
}

/// Stable key for a finding at a given place: hex of the first 16 bytes of a SHA-256.
pub fn issue_key(rule_id: &str, path: &str, range: &Range) -> String {
    let mut hasher = Sha256::new();
    hasher.update(rule_id.as_bytes());
    hasher.update(path.as_bytes());
    for value in [
        range.start.line,
        range.end.line,
        range.start.character,
        range.end.character,
    ] {
        hasher.update(value.to_string().as_bytes());
    }
    hex::encode(&hasher.finalize()[..16])
}
