use std::collections::HashSet;

use tracing::{debug, error};

use crate::{
    error::{Conversion, ParseError},
    issue::{truncate_message, Issue, Position, Range, Severity},
    path,
};

use super::{dataflow, parse_sarif, suppression, Region, Rule, Run, SarifDocument, SarifResult};

const MAX_MESSAGE_CHARS: usize = 100;
const TRUNCATION_SUFFIX: &str = "...";

/// Converts a SARIF log into security issues.
///
/// `base_path` is the directory the scan ran in; artifact URIs are resolved
/// against it. Locations that cannot be resolved are skipped and reported in
/// [`Conversion::errors`] next to the issues that were produced.
pub fn convert_sarif_json_to_issues(
    sarif_json: &[u8],
    base_path: &str,
    include_ignores: bool,
) -> Result<Conversion, ParseError> {
    let sarif = parse_sarif(sarif_json)?;
    Ok(SarifConverter::new(sarif).to_issues(base_path, include_ignores))
}

/// Primary issue range: SARIF's one-based region made zero-based, with the
/// end line never before the start line and the end column never negative.
pub fn issue_range(region: &Region) -> Range {
    let start = Position {
        line: region.start_line().saturating_sub(1),
        character: region.start_column().saturating_sub(1),
    };
    Range {
        start,
        end: Position {
            line: region.end_line().saturating_sub(1).max(start.line),
            character: region.end_column().saturating_sub(1).max(0),
        },
    }
}

pub struct SarifConverter {
    sarif: SarifDocument,
}

impl SarifConverter {
    pub fn new(sarif: SarifDocument) -> Self {
        SarifConverter { sarif }
    }

    fn message(result: &SarifResult, rule: &Rule) -> String {
        let text = match rule.short_description() {
            "" => result.message.text.clone(),
            short => format!("{}: {}", short, result.message.text),
        };
        truncate_message(&text, MAX_MESSAGE_CHARS, TRUNCATION_SUFFIX)
    }

    fn title(rule: &Rule) -> String {
        match rule.short_description() {
            "" => rule.id.clone(),
            short => short.to_string(),
        }
    }

    /// Only the first run is converted.
    pub fn to_issues(&self, base_dir: &str, include_ignores: bool) -> Conversion {
        let mut conversion = Conversion::default();
        let Some(run) = self.sarif.runs.first() else {
            return conversion;
        };
        if self.sarif.runs.len() > 1 {
            debug!(runs = self.sarif.runs.len(), "ignoring SARIF runs after the first");
        }

        let mut seen: HashSet<(String, i64)> = HashSet::new();
        for result in &run.results {
            self.convert_result(run, result, base_dir, include_ignores, &mut seen, &mut conversion);
        }

        debug!(
            issues = conversion.issues.len(),
            skipped_locations = conversion.errors.len(),
            "converted SARIF results"
        );
        conversion
    }

    fn convert_result(
        &self,
        run: &Run,
        result: &SarifResult,
        base_dir: &str,
        include_ignores: bool,
        seen: &mut HashSet<(String, i64)>,
        conversion: &mut Conversion,
    ) {
        let missing_rule = Rule::default();
        let rule = run.rule(&result.rule_id).unwrap_or(&missing_rule);

        for location in &result.locations {
            let physical_location = &location.physical_location;
            let uri = &physical_location.artifact_location.uri;
            let file_path = match path::resolve_uri(base_dir, uri) {
                Ok(file_path) => file_path,
                Err(err) => {
                    error!(base_dir, uri = uri.as_str(), error = %err, "skipping result location");
                    conversion.errors.push(err);
                    continue;
                }
            };

            if !rule.is_security() {
                continue;
            }

            let (is_ignored, ignore_details) =
                suppression::ignore_details_from_suppressions(&result.suppressions);
            if is_ignored && !include_ignores {
                continue;
            }

            let region = &physical_location.region;
            if !seen.insert((file_path.clone(), region.start_line())) {
                continue;
            }

            let range = issue_range(region);
            let (line, column) = if range.start.line >= 0 && range.start.character >= 0 {
                (
                    Some(range.start.line as usize + 1),
                    Some(range.start.character as usize + 1),
                )
            } else {
                (None, None)
            };

            let severity = result
                .level
                .as_ref()
                .map_or(Severity::Low, |level| Severity::from_sarif_level(&level.as_text()));

            conversion.issues.push(Issue {
                id: result.rule_id.clone(),
                title: Self::title(rule),
                severity,
                message: Self::message(result, rule),
                dataflow: dataflow::code_flow(result, base_dir),
                cwes: rule.properties.cwe.clone(),
                file_path,
                line,
                column,
                fingerprint: result.primary_fingerprint().to_string(),
                is_ignored,
                ignore_details,
                ..Default::default()
            });
        }
    }
}
