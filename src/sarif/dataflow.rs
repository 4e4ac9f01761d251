use std::collections::HashSet;

use tracing::error;

use crate::{
    issue::{DataflowElement, Position, Range},
    path,
};

use super::{Region, SarifResult};

/// Flow-step range. Unlike the primary issue range the end column is kept
/// as reported and no bound is clamped.
pub fn dataflow_range(region: &Region) -> Range {
    Range {
        start: Position {
            line: region.start_line().saturating_sub(1),
            character: region.start_column().saturating_sub(1),
        },
        end: Position {
            line: region.end_line().saturating_sub(1),
            character: region.end_column(),
        },
    }
}

/// Flattens every thread-flow step of `result` into one ordered flow, keeping
/// the first step seen per file and start line.
pub fn code_flow(result: &SarifResult, base_dir: &str) -> Vec<DataflowElement> {
    let mut dataflow: Vec<DataflowElement> = vec![];
    let mut seen: HashSet<String> = HashSet::new();
    let steps = result
        .code_flows
        .iter()
        .flat_map(|code_flow| &code_flow.thread_flows)
        .flat_map(|thread_flow| &thread_flow.locations)
        .map(|step| &step.location.physical_location);

    for physical_location in steps {
        let uri = &physical_location.artifact_location.uri;
        let file_path = match path::resolve_uri(base_dir, uri) {
            Ok(file_path) => file_path,
            Err(err) => {
                error!(base_dir, uri = uri.as_str(), error = %err, "skipping dataflow step");
                continue;
            }
        };
        let region = &physical_location.region;
        let key = format!("{}L{:04}", file_path, region.start_line());
        if !seen.insert(key) {
            continue;
        }
        dataflow.push(DataflowElement {
            position: dataflow.len(),
            file_path,
            flow_range: dataflow_range(region),
            content: None,
        });
    }
    dataflow
}
