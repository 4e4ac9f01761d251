mod common;

use common::{bytes, location, result, rule, sarif_log, set_categories, set_result_field, WORK_DIR};
use scan_issues::issue::{DateSource, Position, SuppressionStatus};
use scan_issues::sarif::{convert::issue_range, Region};
use scan_issues::{convert_sarif_json_to_issues, Issue, Severity};
use serde_json::{json, Value};

fn convert(log: &Value, include_ignores: bool) -> Vec<Issue> {
    let conversion = convert_sarif_json_to_issues(&bytes(log), WORK_DIR, include_ignores).unwrap();
    assert!(!conversion.is_partial());
    conversion.issues
}

fn sqli_log(text: &str, region: (i64, i64, i64, i64)) -> Value {
    let mut log = sarif_log(
        vec![rule("javascript/Sqli", "SQL Injection")],
        vec![result(
            "javascript/Sqli",
            text,
            vec![location("src/db.js", region)],
        )],
    );
    set_categories(&mut log, 0, &["Security"]);
    set_result_field(&mut log, 0, "level", json!("error"));
    log
}

fn accepted_suppression() -> Value {
    json!([{
        "kind": "external",
        "status": "accepted",
        "justification": "Input is validated upstream",
        "properties": {
            "category": "wont-fix",
            "expiration": "2030-01-01T00:00:00Z",
            "ignoredOn": "2024-03-01T12:00:00Z",
            "ignoredBy": {"name": "Dana", "email": "dana@example.com"}
        }
    }])
}

#[test]
fn only_security_rules_produce_issues() {
    let mut log = sarif_log(
        vec![
            rule("javascript/Sqli", "SQL Injection"),
            rule("javascript/NoUnusedVars", "Unused variable"),
            rule("javascript/Xss", "Cross-site Scripting"),
        ],
        vec![
            result("javascript/Sqli", "sqli", vec![location("a.js", (1, 1, 1, 5))]),
            result("javascript/NoUnusedVars", "unused", vec![location("b.js", (2, 1, 2, 5))]),
            result("javascript/Xss", "xss", vec![location("c.js", (3, 1, 3, 5))]),
            result("javascript/Missing", "no rule", vec![location("d.js", (4, 1, 4, 5))]),
        ],
    );
    set_categories(&mut log, 0, &["Security"]);
    set_categories(&mut log, 1, &["Defect", "Maintainability"]);
    set_categories(&mut log, 2, &["SECURITY"]);

    let ids: Vec<String> = convert(&log, false).into_iter().map(|i| i.id).collect();
    assert_eq!(ids, vec!["javascript/Sqli", "javascript/Xss"]);
}

#[test]
fn primary_range_and_position() {
    let issues = convert(&sqli_log("sqli", (5, 3, 5, 10)), false);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].line, Some(5));
    assert_eq!(issues[0].column, Some(3));
    assert_eq!(issues[0].file_path, "/work/project/src/db.js");

    let range = issue_range(&Region {
        start_line: Some(5),
        start_column: Some(3),
        end_line: Some(5),
        end_column: Some(10),
    });
    assert_eq!(range.start, Position { line: 4, character: 2 });
    assert_eq!(range.end, Position { line: 4, character: 9 });
}

#[test]
fn maps_title_severity_and_message() {
    let issues = convert(&sqli_log("Unsanitized input flows into query", (1, 1, 1, 2)), false);
    let issue = &issues[0];
    assert_eq!(issue.title, "SQL Injection");
    assert_eq!(issue.severity, Severity::High);
    assert_eq!(issue.message, "SQL Injection: Unsanitized input flows into query");
    assert_eq!(issue.cwes, vec!["CWE-89".to_string()]);
    assert!(issue.package_name.is_empty());
}

#[test]
fn long_messages_are_cut_to_one_hundred_characters() {
    // "SQL Injection: " is 15 characters.
    let body = "q".repeat(135);
    let issues = convert(&sqli_log(&body, (1, 1, 1, 2)), false);
    assert_eq!(issues[0].message.chars().count(), 103);
    assert!(issues[0].message.ends_with("..."));
}

#[test]
fn same_file_and_line_is_reported_once() {
    let mut log = sarif_log(
        vec![rule("javascript/Sqli", "SQL Injection")],
        vec![
            result(
                "javascript/Sqli",
                "first",
                vec![
                    location("a.js", (10, 1, 10, 5)),
                    location("a.js", (10, 7, 10, 9)),
                    location("a.js", (11, 1, 11, 5)),
                ],
            ),
            result("javascript/Sqli", "second", vec![location("a.js", (10, 2, 10, 3))]),
        ],
    );
    set_categories(&mut log, 0, &["Security"]);
    let lines: Vec<Option<usize>> = convert(&log, false).iter().map(|i| i.line).collect();
    assert_eq!(lines, vec![Some(10), Some(11)]);
}

#[test]
fn accepted_suppressions_follow_include_ignores() {
    let mut log = sqli_log("sqli", (1, 1, 1, 2));
    set_result_field(&mut log, 0, "suppressions", accepted_suppression());

    assert!(convert(&log, false).is_empty());

    let issues = convert(&log, true);
    assert_eq!(issues.len(), 1);
    assert!(issues[0].is_ignored);
    let details = issues[0].ignore_details.as_ref().unwrap();
    assert_eq!(details.status, SuppressionStatus::Accepted);
    assert_eq!(details.category, "wont-fix");
    assert_eq!(details.reason, "Input is validated upstream");
    assert_eq!(details.ignored_by, "Dana");
    assert_eq!(details.expiration, "2030-01-01T00:00:00Z");
    assert_eq!(details.ignored_on_source, DateSource::Parsed);
}

#[test]
fn pending_suppressions_keep_the_issue_visible() {
    let mut log = sqli_log("sqli", (1, 1, 1, 2));
    let mut suppression = accepted_suppression();
    suppression[0]["status"] = json!("underReview");
    set_result_field(&mut log, 0, "suppressions", suppression);

    let issues = convert(&log, false);
    assert_eq!(issues.len(), 1);
    assert!(!issues[0].is_ignored);
    assert_eq!(
        issues[0].ignore_details.as_ref().map(|d| d.status),
        Some(SuppressionStatus::UnderReview)
    );
}

#[test]
fn code_flows_become_deduplicated_dataflow() {
    let mut log = sqli_log("sqli", (3, 1, 3, 2));
    let step = |uri: &str, line: i64| {
        json!({"location": {"physicalLocation": {
            "artifactLocation": {"uri": uri},
            "region": {"startLine": line, "startColumn": 2, "endLine": line, "endColumn": 8}
        }}})
    };
    set_result_field(
        &mut log,
        0,
        "codeFlows",
        json!([{"threadFlows": [{"locations": [
            step("a.js", 10),
            step("a.js", 10),
            step("src/db.js", 3),
            step("a.js", 10),
        ]}]}]),
    );
    let issues = convert(&log, false);
    let flow = &issues[0].dataflow;
    assert_eq!(flow.len(), 2);
    assert_eq!(flow[0].file_path, "/work/project/a.js");
    assert_eq!(flow[0].flow_range.end, Position { line: 9, character: 8 });
    assert_eq!(flow[1].position, 1);
}

#[test]
fn fingerprint_and_numeric_level() {
    let mut log = sqli_log("sqli", (1, 1, 1, 2));
    set_result_field(&mut log, 0, "level", json!(2));
    set_result_field(
        &mut log,
        0,
        "fingerprints",
        json!({"0": "ignored", "1": "9f1c2e", "identity": "other"}),
    );
    let issues = convert(&log, false);
    assert_eq!(issues[0].severity, Severity::Medium);
    assert_eq!(issues[0].fingerprint, "9f1c2e");
}

#[test]
fn encoded_uris_are_decoded_and_bad_ones_reported() {
    let mut log = sarif_log(
        vec![rule("javascript/Sqli", "SQL Injection")],
        vec![result(
            "javascript/Sqli",
            "sqli",
            vec![
                location("src/my%20file.js", (1, 1, 1, 2)),
                location("src/bad%zzfile.js", (2, 1, 2, 2)),
            ],
        )],
    );
    set_categories(&mut log, 0, &["Security"]);

    let conversion = convert_sarif_json_to_issues(&bytes(&log), WORK_DIR, false).unwrap();
    assert!(conversion.is_partial());
    assert_eq!(conversion.issues.len(), 1);
    assert_eq!(conversion.issues[0].file_path, "/work/project/src/my file.js");
    assert_eq!(conversion.errors.len(), 1);
    assert_eq!(conversion.errors[0].uri, "src/bad%zzfile.js");

    let err = conversion.into_result().unwrap_err();
    assert!(err.to_string().contains("src/bad%zzfile.js"));
}

#[test]
fn wrapped_logs_are_accepted() {
    let log = json!({"sarif": sqli_log("sqli", (1, 1, 1, 2))});
    assert_eq!(convert(&log, false).len(), 1);
}

#[test]
fn bad_result_inside_wrapped_log_is_an_error() {
    let mut inner = sqli_log("sqli", (1, 1, 1, 2));
    let mut broken = inner["runs"][0]["results"][0].clone();
    broken["level"] = json!(2.5);
    inner["runs"][0]["results"]
        .as_array_mut()
        .unwrap()
        .push(broken);
    let log = json!({"sarif": inner});
    assert!(convert_sarif_json_to_issues(&bytes(&log), WORK_DIR, false).is_err());
}

#[test]
fn invalid_json_keeps_the_input() {
    let err = convert_sarif_json_to_issues(b"{\"runs\": [", WORK_DIR, false).unwrap_err();
    assert!(err.to_string().contains("Input: {\"runs\": ["));
}
