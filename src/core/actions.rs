//! Purpose: Extract custom action handlers embedded in a widget's `defaultConfig`.
//! Exports: `action_config`, `extract_actions`.
//! Invariants: `custom` writes `<norm>.js`; `customPretty` writes `<norm>.html` and
//!   `<norm>.css` only.
//! Invariants: Other action types are ignored; a config that does not decode yields no actions.
//! Invariants: A malformed group or entry is recorded and skipped; its siblings still extract.
use serde_json::Value;

use super::error::{Error, ErrorKind};
use super::extract::Unpacker;
use super::layout::check_segment;
use super::model::{Action, ActionConfig, ActionType, WidgetDefinition};
use super::normalize::normalize;
use super::report::FailureStage;

/// Decode `defaultConfig`, which is normally a JSON document encoded as a string.
pub fn action_config(default_config: &Value) -> Result<ActionConfig, Error> {
    let decoded = match default_config {
        Value::Null => return Ok(ActionConfig::default()),
        Value::String(text) if text.trim().is_empty() => return Ok(ActionConfig::default()),
        Value::String(text) => serde_json::from_str::<Value>(text).map_err(|err| {
            Error::new(ErrorKind::Parse)
                .with_message("defaultConfig is not valid JSON")
                .with_source(err)
        })?,
        Value::Object(_) => default_config.clone(),
        _ => {
            return Err(Error::new(ErrorKind::Invalid)
                .with_message("defaultConfig is neither a JSON string nor an object"));
        }
    };
    if decoded.is_null() {
        return Ok(ActionConfig::default());
    }
    serde_json::from_value(decoded).map_err(|err| {
        Error::new(ErrorKind::Invalid)
            .with_message("defaultConfig actions have an unexpected shape")
            .with_source(err)
    })
}

pub(crate) fn extract_actions(unpacker: &mut Unpacker, widget: &WidgetDefinition) {
    let config = match action_config(&widget.descriptor.default_config) {
        Ok(config) => config,
        Err(err) => {
            unpacker.summary_mut().record(
                FailureStage::DefaultConfig,
                &err.with_widget(widget.name.as_str()),
            );
            return;
        }
    };

    for (group, entries) in config.groups() {
        let Some(entries) = entries.as_array() else {
            let err = Error::new(ErrorKind::Invalid)
                .with_message(format!("action group {group:?} is not a list"))
                .with_widget(widget.name.as_str());
            unpacker.summary_mut().record(FailureStage::DefaultConfig, &err);
            continue;
        };
        for (index, entry) in entries.iter().enumerate() {
            let action = match Action::from_entry(entry) {
                Ok(action) => action,
                Err(source) => {
                    let err = Error::new(ErrorKind::Invalid)
                        .with_message(format!("action {index} in group {group:?} is malformed"))
                        .with_widget(widget.name.as_str())
                        .with_source(source);
                    unpacker.summary_mut().record(FailureStage::DefaultConfig, &err);
                    continue;
                }
            };
            if action.kind == ActionType::Other {
                continue;
            }
            extract_action(unpacker, &widget.name, group, &action);
        }
    }
}

fn extract_action(unpacker: &mut Unpacker, widget: &str, group: &str, action: &Action) {
    for segment in [group, action.name.as_str()] {
        if let Err(reason) = check_segment(segment) {
            let message = format!("action {} ({segment:?} in group {group:?})", reason.describe());
            let err = Error::new(ErrorKind::Invalid)
                .with_message(message)
                .with_widget(widget);
            unpacker.summary_mut().record(FailureStage::InvalidName, &err);
            return;
        }
    }

    let dir = unpacker.layout().action_dir(widget, group, &action.name);
    if !unpacker.create_dir(&dir, Some(widget)) {
        return;
    }
    let stem = normalize(&action.name);
    let files: Vec<(&str, &str)> = match action.kind {
        ActionType::Custom => vec![(".js", action.custom_function.as_str())],
        ActionType::CustomPretty => vec![
            (".html", action.custom_html.as_str()),
            (".css", action.custom_css.as_str()),
        ],
        ActionType::Other => return,
    };
    let mut written = true;
    for (suffix, content) in files {
        let path = dir.join(format!("{stem}{suffix}"));
        written &= unpacker.write_file(&path, content.as_bytes(), Some(widget));
    }
    if !written {
        return;
    }
    unpacker.summary_mut().actions += 1;
    tracing::debug!(widget, group, action = %action.name, "action extracted");
}

#[cfg(test)]
mod tests {
    use super::{action_config, extract_actions};
    use crate::core::error::ErrorKind;
    use crate::core::extract::{UnpackConfig, Unpacker};
    use crate::core::model::{Action, ActionType, WidgetDefinition};
    use crate::core::report::FailureStage;
    use serde_json::{Value, json};

    fn widget_with_actions(actions: Value) -> WidgetDefinition {
        let default_config = json!({ "actions": actions }).to_string();
        serde_json::from_value(json!({
            "name": "Gauge",
            "descriptor": { "defaultConfig": default_config },
        }))
        .expect("widget")
    }

    #[test]
    fn string_encoded_config_yields_groups_in_name_order() {
        let encoded = json!({
            "actions": {
                "onClick": [{ "name": "Run", "type": "custom", "customFunction": "return 1;" }],
                "headerButton": [{ "name": "Pretty", "type": "customPretty" }],
                "rowClick": null,
            },
            "showTitle": true,
        })
        .to_string();
        let config = action_config(&Value::String(encoded)).expect("config");
        let groups: Vec<(&str, usize)> = config
            .groups()
            .map(|(group, entries)| (group, entries.as_array().map_or(0, Vec::len)))
            .collect();
        assert_eq!(groups, vec![("headerButton", 1), ("onClick", 1)]);

        let (_, on_click) = config.groups().nth(1).expect("onClick");
        let run = Action::from_entry(&on_click[0]).expect("action");
        assert_eq!(run.kind, ActionType::Custom);
        assert_eq!(run.custom_function, "return 1;");
    }

    #[test]
    fn empty_or_missing_config_has_no_actions() {
        for value in [
            Value::Null,
            json!(""),
            json!("  "),
            json!("null"),
            json!("{}"),
            json!({}),
        ] {
            let config = action_config(&value).expect("config");
            assert_eq!(config.groups().count(), 0, "value: {value}");
        }
    }

    #[test]
    fn malformed_config_is_an_error() {
        let err = action_config(&json!("{ broken")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);

        let err = action_config(&json!(42)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);

        let err = action_config(&json!("{\"actions\": 7}")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);
    }

    #[test]
    fn odd_entries_do_not_hide_valid_actions() {
        let temp = tempfile::tempdir().expect("tempdir");
        let out = temp.path().join("out");
        let mut unpacker = Unpacker::new(UnpackConfig::new(&out));
        let widget = widget_with_actions(json!({
            "onClick": [{ "name": "Good", "type": "custom", "customFunction": "return 1;" }],
            "rowClick": [{ "name": "Odd", "type": 7 }, "stray"],
            "cellClick": 7,
        }));
        extract_actions(&mut unpacker, &widget);
        let summary = unpacker.finish();

        assert_eq!(summary.actions, 1);
        let good = out
            .join("Widgets")
            .join("Gauge")
            .join("Actions")
            .join("onClick")
            .join("Good")
            .join("good.js");
        assert_eq!(std::fs::read_to_string(good).expect("read"), "return 1;");
        let stages: Vec<FailureStage> = summary.failures.iter().map(|f| f.stage).collect();
        assert_eq!(
            stages,
            vec![FailureStage::DefaultConfig, FailureStage::DefaultConfig]
        );
        assert!(summary.failures[0].message.contains("cellClick"));
        assert!(summary.failures[1].message.contains("rowClick"));
    }

    #[test]
    fn failed_writes_do_not_count_the_action() {
        let temp = tempfile::tempdir().expect("tempdir");
        let out = temp.path().join("out");
        let blocked = out
            .join("Widgets")
            .join("Gauge")
            .join("Actions")
            .join("onClick")
            .join("Run")
            .join("run.js");
        std::fs::create_dir_all(&blocked).expect("mkdir");

        let mut unpacker = Unpacker::new(UnpackConfig::new(&out));
        let widget = widget_with_actions(json!({
            "onClick": [{ "name": "Run", "type": "custom", "customFunction": "return 1;" }],
        }));
        extract_actions(&mut unpacker, &widget);
        let summary = unpacker.finish();

        assert_eq!(summary.actions, 0);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].stage, FailureStage::WriteFile);
    }
}
