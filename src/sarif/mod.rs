//! Lenient typed view of the SARIF 2.1.0 subset produced by code scans.
//!
//! Only the fields the converter reads are modelled. Absent or `null` values
//! fall back to their zero value so that a sparse report still converts.

use std::{borrow::Cow, collections::BTreeMap};

use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{InputFormat, ParseError},
    util::nullable,
};

pub mod convert;
pub mod dataflow;
pub mod suppression;

/// Fingerprint entry treated as the finding's identity across scans.
pub const PRIMARY_FINGERPRINT: &str = "1";

/// Key under which some scanners wrap the log.
const ENVELOPE_KEY: &str = "sarif";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SarifDocument {
    #[serde(deserialize_with = "nullable")]
    pub runs: Vec<Run>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Run {
    #[serde(deserialize_with = "nullable")]
    pub tool: Tool,
    #[serde(deserialize_with = "nullable")]
    pub results: Vec<SarifResult>,
}

impl Run {
    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.tool.driver.rules.iter().find(|rule| rule.id == id)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Tool {
    #[serde(deserialize_with = "nullable")]
    pub driver: Driver,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Driver {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Rule {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    pub short_description: Option<MessageString>,
    #[serde(deserialize_with = "nullable")]
    pub properties: RuleProperties,
}

impl Rule {
    pub fn short_description(&self) -> &str {
        self.short_description
            .as_ref()
            .map_or("", |description| description.text.as_str())
    }

    pub fn is_security(&self) -> bool {
        self.properties
            .categories
            .iter()
            .any(|category| category.eq_ignore_ascii_case("security"))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MessageString {
    #[serde(deserialize_with = "nullable")]
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RuleProperties {
    #[serde(deserialize_with = "nullable")]
    pub categories: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub cwe: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub tags: Vec<String>,
}

/// Result level: a SARIF level name or a numeric severity code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Level {
    Code(i64),
    Name(String),
}

impl Level {
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Level::Code(code) => Cow::Owned(code.to_string()),
            Level::Name(name) => Cow::Borrowed(name),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SarifResult {
    #[serde(deserialize_with = "nullable")]
    pub rule_id: String,
    pub level: Option<Level>,
    #[serde(deserialize_with = "nullable")]
    pub message: Message,
    #[serde(deserialize_with = "nullable")]
    pub locations: Vec<Location>,
    #[serde(deserialize_with = "nullable")]
    pub fingerprints: BTreeMap<String, String>,
    #[serde(deserialize_with = "nullable")]
    pub code_flows: Vec<CodeFlow>,
    #[serde(deserialize_with = "nullable")]
    pub suppressions: Vec<Suppression>,
}

impl SarifResult {
    pub fn primary_fingerprint(&self) -> &str {
        self.fingerprints
            .get(PRIMARY_FINGERPRINT)
            .map_or("", String::as_str)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Message {
    #[serde(deserialize_with = "nullable")]
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Location {
    #[serde(deserialize_with = "nullable")]
    pub physical_location: PhysicalLocation,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhysicalLocation {
    #[serde(deserialize_with = "nullable")]
    pub artifact_location: ArtifactLocation,
    #[serde(deserialize_with = "nullable")]
    pub region: Region,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArtifactLocation {
    #[serde(deserialize_with = "nullable")]
    pub uri: String,
}

/// One-based region bounds; a missing bound reads as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Region {
    pub start_line: Option<i64>,
    pub start_column: Option<i64>,
    pub end_line: Option<i64>,
    pub end_column: Option<i64>,
}

impl Region {
    pub fn start_line(&self) -> i64 {
        self.start_line.unwrap_or_default()
    }

    pub fn start_column(&self) -> i64 {
        self.start_column.unwrap_or_default()
    }

    pub fn end_line(&self) -> i64 {
        self.end_line.unwrap_or_default()
    }

    pub fn end_column(&self) -> i64 {
        self.end_column.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CodeFlow {
    #[serde(deserialize_with = "nullable")]
    pub thread_flows: Vec<ThreadFlow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThreadFlow {
    #[serde(deserialize_with = "nullable")]
    pub locations: Vec<ThreadFlowLocation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThreadFlowLocation {
    #[serde(deserialize_with = "nullable")]
    pub location: Location,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Suppression {
    #[serde(deserialize_with = "nullable")]
    pub justification: String,
    /// `accepted`, `underReview` or `rejected`. Absent means accepted.
    pub status: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub properties: SuppressionProperties,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SuppressionProperties {
    #[serde(deserialize_with = "nullable")]
    pub category: String,
    pub expiration: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub ignored_on: String,
    #[serde(deserialize_with = "nullable")]
    pub ignored_by: IgnoredBy,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IgnoredBy {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub email: String,
}

/// Parses a SARIF log, bare or wrapped as `{"sarif": {...}}`.
pub fn parse_sarif(data: &[u8]) -> Result<SarifDocument, ParseError> {
    let parse = || -> Result<SarifDocument, serde_json::Error> {
        let mut value: Value = serde_json::from_slice(data)?;
        let document = match value.get_mut(ENVELOPE_KEY).map(Value::take) {
            Some(inner) if !inner.is_null() => inner,
            _ => value,
        };
        serde_json::from_value(document)
    };
    parse().map_err(|source| ParseError::new(InputFormat::Sarif, data, source))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn document() -> serde_json::Value {
        json!({
            "version": "2.1.0",
            "runs": [{
                "tool": {"driver": {"name": "SnykCode", "rules": [{
                    "id": "javascript/Sqli",
                    "shortDescription": {"text": "SQL Injection"},
                    "properties": {"categories": ["Security"], "cwe": ["CWE-89"]}
                }]}},
                "results": [{
                    "ruleId": "javascript/Sqli",
                    "level": "error",
                    "message": {"text": "Unsanitized input flows into query"},
                    "locations": [{"physicalLocation": {
                        "artifactLocation": {"uri": "src/db.js"},
                        "region": {"startLine": 5, "startColumn": 3, "endLine": 5, "endColumn": 10}
                    }}],
                    "fingerprints": {"0": "zero", "1": "primary", "identity": "id"}
                }]
            }]
        })
    }

    #[test]
    fn parses_bare_and_wrapped_documents() {
        let bare = serde_json::to_vec(&document()).unwrap();
        let wrapped = serde_json::to_vec(&json!({"type": "sast", "sarif": document()})).unwrap();
        for data in [bare, wrapped] {
            let sarif = parse_sarif(&data).unwrap();
            assert_eq!(sarif.runs.len(), 1);
            let run = &sarif.runs[0];
            assert_eq!(run.tool.driver.name, "SnykCode");
            let result = &run.results[0];
            assert_eq!(result.primary_fingerprint(), "primary");
            assert_eq!(result.level, Some(Level::Name("error".to_string())));
            assert_eq!(
                result.locations[0].physical_location.region.end_column(),
                10
            );
            assert!(run.rule("javascript/Sqli").unwrap().is_security());
            assert!(run.rule("missing").is_none());
        }
    }

    #[test]
    fn nulls_and_gaps_read_as_zero_values() {
        let data = br#"{"runs": [{"tool": null, "results": [{
            "ruleId": null, "level": 3, "message": null, "locations": [{"physicalLocation": {"region": {"startLine": null}}}],
            "codeFlows": null, "suppressions": null, "fingerprints": null
        }]}]}"#;
        let sarif = parse_sarif(data).unwrap();
        let result = &sarif.runs[0].results[0];
        assert_eq!(result.rule_id, "");
        assert_eq!(result.level.as_ref().unwrap().as_text(), "3");
        assert_eq!(result.primary_fingerprint(), "");
        assert_eq!(result.locations[0].physical_location.region, Region::default());
        assert_eq!(result.locations[0].physical_location.artifact_location.uri, "");
        assert!(sarif.runs[0].tool.driver.rules.is_empty());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let error = parse_sarif(b"{\"runs\": [").unwrap_err();
        assert_eq!(error.format, InputFormat::Sarif);
        assert_eq!(error.payload, "{\"runs\": [");
    }

    #[test]
    fn bad_field_inside_envelope_is_a_parse_error() {
        let mut inner = document();
        inner["runs"][0]["results"][0]["level"] = json!(2.5);
        let data = serde_json::to_vec(&json!({"sarif": inner})).unwrap();
        let error = parse_sarif(&data).unwrap_err();
        assert_eq!(error.format, InputFormat::Sarif);
    }

    #[test]
    fn null_envelope_reads_as_bare_document() {
        let mut bare = document();
        bare["sarif"] = json!(null);
        let data = serde_json::to_vec(&bare).unwrap();
        assert_eq!(parse_sarif(&data).unwrap().runs.len(), 1);
    }

    #[test]
    fn empty_object_has_no_runs() {
        assert!(parse_sarif(b"{}").unwrap().runs.is_empty());
    }
}
