//! Purpose: Load one input file as a JSON value.
//! Exports: `load_json`.
//! Role: Single decode boundary for input files; callers skip `None` results.
//! Notes: Read and parse failures are recorded with the file path for context.
use std::path::Path;

use serde_json::Value;

use super::error::{Error, ErrorKind, io_error};
use super::report::{FailureStage, Summary};

pub fn load_json(path: &Path, summary: &mut Summary) -> Option<Value> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            summary.record(
                FailureStage::ReadInput,
                &io_error(err, "failed to read input file", path),
            );
            return None;
        }
    };

    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(err) => {
            summary.record(
                FailureStage::ParseInput,
                &Error::new(ErrorKind::Parse)
                    .with_message(format!(
                        "input is not valid JSON (line {}, column {})",
                        err.line(),
                        err.column()
                    ))
                    .with_path(path)
                    .with_source(err),
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::load_json;
    use crate::core::error::ErrorKind;
    use crate::core::report::{FailureStage, Summary};

    #[test]
    fn parses_valid_json() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("w.json");
        std::fs::write(&path, r#"{"name":"Gauge"}"#).expect("write");

        let mut summary = Summary::default();
        let value = load_json(&path, &mut summary).expect("value");
        assert_eq!(value["name"], "Gauge");
        assert!(summary.is_clean());
    }

    #[test]
    fn invalid_json_is_recorded_as_parse_failure() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("bad.json");
        std::fs::write(&path, "{ not json").expect("write");

        let mut summary = Summary::default();
        assert!(load_json(&path, &mut summary).is_none());
        assert_eq!(summary.failures[0].stage, FailureStage::ParseInput);
        assert_eq!(summary.failures[0].kind, ErrorKind::Parse);
        assert_eq!(summary.skipped_files(), 1);
    }

    #[test]
    fn missing_file_is_recorded_as_read_failure() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut summary = Summary::default();
        assert!(load_json(&temp.path().join("nope.json"), &mut summary).is_none());
        assert_eq!(summary.failures[0].stage, FailureStage::ReadInput);
        assert_eq!(summary.failures[0].kind, ErrorKind::NotFound);
    }
}
