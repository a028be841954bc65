//! Purpose: JSON rendering of an unpack run summary for `--json` output.
//! Exports: `summary_json`.
//! Invariants: Stable key names; new keys are additive-only.
//! Invariants: Optional failure context keys are omitted when absent.

use serde_json::{Map, Value, json};
use widget_unpack::api::{Failure, Summary};

pub(crate) fn summary_json(output_dir: &str, summary: &Summary) -> Value {
    let mut map = Map::new();
    map.insert("output".to_string(), json!(output_dir));
    map.insert("files".to_string(), json!(summary.files_total));
    map.insert("skipped_files".to_string(), json!(summary.skipped_files()));
    map.insert("widgets".to_string(), json!(summary.widgets));
    map.insert("bundles".to_string(), json!(summary.bundles));
    map.insert("files_written".to_string(), json!(summary.files_written));
    map.insert("failed_writes".to_string(), json!(summary.failed_writes()));
    map.insert("actions".to_string(), json!(summary.actions));
    map.insert("images".to_string(), json!(summary.images));
    let failures = summary.failures.iter().map(failure_json).collect::<Vec<_>>();
    map.insert("failures".to_string(), Value::Array(failures));
    Value::Object(map)
}

fn failure_json(failure: &Failure) -> Value {
    let mut map = Map::new();
    map.insert("stage".to_string(), json!(failure.stage.as_str()));
    map.insert("kind".to_string(), json!(failure.kind.as_str()));
    if let Some(path) = &failure.path {
        map.insert("path".to_string(), json!(path.display().to_string()));
    }
    if let Some(widget) = &failure.widget {
        map.insert("widget".to_string(), json!(widget));
    }
    map.insert("message".to_string(), json!(failure.message));
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::summary_json;
    use widget_unpack::api::{Error, ErrorKind, FailureStage, Summary};

    #[test]
    fn summary_json_has_counts_and_failures() {
        let mut summary = Summary {
            files_total: 2,
            widgets: 1,
            files_written: 6,
            ..Summary::default()
        };
        summary.record(
            FailureStage::ParseInput,
            &Error::new(ErrorKind::Parse).with_path("bad.json"),
        );

        let value = summary_json("out", &summary);
        assert_eq!(value["output"], "out");
        assert_eq!(value["files"], 2);
        assert_eq!(value["skipped_files"], 1);
        assert_eq!(value["widgets"], 1);
        assert_eq!(value["files_written"], 6);
        let failure = &value["failures"][0];
        assert_eq!(failure["stage"], "parse-input");
        assert_eq!(failure["kind"], "Parse");
        assert_eq!(failure["path"], "bad.json");
        assert!(failure.get("widget").is_none());
    }
}
