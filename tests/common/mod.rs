#![allow(dead_code)]

use serde_json::{json, Value};
use serde_sarif::sarif::{
    self, ArtifactLocationBuilder, LocationBuilder, MessageBuilder,
    MultiformatMessageStringBuilder, PhysicalLocationBuilder, RegionBuilder,
    ReportingDescriptorBuilder, ResultBuilder, RunBuilder, SarifBuilder, ToolBuilder,
    ToolComponentBuilder,
};

pub const WORK_DIR: &str = "/work/project";

pub fn rule(id: &str, short_description: &str) -> sarif::ReportingDescriptor {
    ReportingDescriptorBuilder::default()
        .id(id)
        .short_description(
            MultiformatMessageStringBuilder::default()
                .text(short_description)
                .build()
                .unwrap(),
        )
        .build()
        .unwrap()
}

pub fn location(uri: &str, region: (i64, i64, i64, i64)) -> sarif::Location {
    let (start_line, start_column, end_line, end_column) = region;
    let region = RegionBuilder::default()
        .start_line(start_line)
        .start_column(start_column)
        .end_line(end_line)
        .end_column(end_column)
        .build()
        .unwrap();
    let artifact = ArtifactLocationBuilder::default().uri(uri).build().unwrap();
    let physical = PhysicalLocationBuilder::default()
        .artifact_location(artifact)
        .region(region)
        .build()
        .unwrap();
    LocationBuilder::default()
        .physical_location(physical)
        .build()
        .unwrap()
}

pub fn result(rule_id: &str, text: &str, locations: Vec<sarif::Location>) -> sarif::Result {
    ResultBuilder::default()
        .rule_id(rule_id)
        .message(MessageBuilder::default().text(text).build().unwrap())
        .locations(locations)
        .build()
        .unwrap()
}

/// A one-run SARIF log as JSON, ready for patching fields the builders do not cover.
pub fn sarif_log(rules: Vec<sarif::ReportingDescriptor>, results: Vec<sarif::Result>) -> Value {
    let tool = ToolBuilder::default()
        .driver(
            ToolComponentBuilder::default()
                .name("SnykCode")
                .rules(rules)
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();
    let run = RunBuilder::default()
        .tool(tool)
        .results(results)
        .build()
        .unwrap();
    let log = SarifBuilder::default()
        .version("2.1.0")
        .runs(vec![run])
        .build()
        .unwrap();
    serde_json::to_value(log).unwrap()
}

pub fn set_categories(log: &mut Value, rule_index: usize, categories: &[&str]) {
    log["runs"][0]["tool"]["driver"]["rules"][rule_index]["properties"] =
        json!({"categories": categories, "cwe": ["CWE-89"]});
}

pub fn set_result_field(log: &mut Value, result_index: usize, field: &str, value: Value) {
    log["runs"][0]["results"][result_index][field] = value;
}

pub fn bytes(value: &Value) -> Vec<u8> {
    serde_json::to_vec(value).unwrap()
}

pub fn oss_finding(id: &str, package: &str) -> Value {
    json!({
        "id": id,
        "title": "Prototype Pollution",
        "severity": "high",
        "packageName": package,
        "name": package,
        "version": "1.0.0",
        "packageManager": "npm",
        "from": ["project@0.1.0", format!("{package}@1.0.0")],
        "upgradePath": [false, format!("{package}@1.0.1")],
        "isUpgradable": true,
        "isPatchable": false,
        "fixedIn": ["1.0.1"],
        "identifiers": {"CWE": ["CWE-1321"], "CVE": []}
    })
}

pub fn oss_scan(display_target_file: &str, vulnerabilities: Vec<Value>) -> Value {
    json!({
        "vulnerabilities": vulnerabilities,
        "displayTargetFile": display_target_file,
        "packageManager": "npm",
        "projectName": "project"
    })
}
