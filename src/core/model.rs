//! Purpose: Typed read-only views over exported widget and bundle JSON.
//! Exports: `WidgetDefinition`, `Descriptor`, `Resource`, `ResourceType`, `Action`,
//!   `ActionType`, `ActionConfig`, `BundleInfo`, `text_field`.
//! Role: Decoding boundary; extraction reads these views and re-serializes the raw value.
//! Invariants: Missing or `null` text fields decode as empty strings, never as errors.
//! Invariants: Unknown fields are ignored here; the raw JSON keeps them for `src/` output.
//! Invariants: `type` tags of any JSON shape decode; unrecognized ones become `Other`.
//! Invariants: Resource entries that are not objects are skipped; action entries stay raw
//!   so one malformed action cannot hide its siblings.
use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Field names that mark a top-level value as a bundle export.
pub const BUNDLE_WIDGETS_FIELD: &str = "widgetTypes";
pub const BUNDLE_INFO_FIELD: &str = "widgetsBundle";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WidgetDefinition {
    #[serde(deserialize_with = "text_field")]
    pub name: String,
    #[serde(deserialize_with = "text_field")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub descriptor: Descriptor,
    #[serde(deserialize_with = "object_entries")]
    pub resources: Vec<Resource>,
}

impl WidgetDefinition {
    /// First `IMAGE` resource, if any.
    pub fn image(&self) -> Option<&Resource> {
        self.resources
            .iter()
            .find(|resource| resource.kind == ResourceType::Image)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Descriptor {
    #[serde(deserialize_with = "text_field")]
    pub controller_script: String,
    #[serde(deserialize_with = "text_field")]
    pub template_css: String,
    #[serde(deserialize_with = "text_field")]
    pub template_html: String,
    #[serde(deserialize_with = "text_field")]
    pub settings_schema: String,
    #[serde(deserialize_with = "text_field")]
    pub data_key_settings_schema: String,
    /// Kept as raw JSON: exports usually carry an encoded string, some carry an object.
    pub default_config: Value,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ResourceType {
    Image,
    #[default]
    Other,
}

impl<'de> Deserialize<'de> for ResourceType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)?.as_str() {
            Some("IMAGE") => ResourceType::Image,
            _ => ResourceType::Other,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Resource {
    #[serde(rename = "type")]
    pub kind: ResourceType,
    #[serde(deserialize_with = "text_field")]
    pub title: String,
    #[serde(deserialize_with = "text_field")]
    pub data: String,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ActionType {
    Custom,
    CustomPretty,
    #[default]
    Other,
}

impl<'de> Deserialize<'de> for ActionType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)?.as_str() {
            Some("custom") => ActionType::Custom,
            Some("customPretty") => ActionType::CustomPretty,
            _ => ActionType::Other,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Action {
    #[serde(deserialize_with = "text_field")]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ActionType,
    #[serde(deserialize_with = "text_field")]
    pub custom_function: String,
    #[serde(deserialize_with = "text_field")]
    pub custom_html: String,
    #[serde(deserialize_with = "text_field")]
    pub custom_css: String,
}

/// The part of a decoded `defaultConfig` that carries actions, keyed by group name.
/// Group contents stay raw; each entry is decoded on its own with [`Action::from_entry`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ActionConfig {
    #[serde(deserialize_with = "null_as_default")]
    actions: BTreeMap<String, Value>,
}

impl ActionConfig {
    /// Action groups in name order; `null` groups are skipped.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.actions
            .iter()
            .filter(|(_, entries)| !entries.is_null())
            .map(|(group, entries)| (group.as_str(), entries))
    }
}

impl Action {
    pub fn from_entry(entry: &Value) -> Result<Self, serde_json::Error> {
        Action::deserialize(entry)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BundleInfo {
    #[serde(deserialize_with = "text_field")]
    pub alias: String,
    #[serde(deserialize_with = "text_field")]
    pub title: String,
}

impl BundleInfo {
    /// File stem for the persisted bundle: `alias`, then `title`, then `bundle`.
    pub fn identifier(&self) -> &str {
        [self.alias.as_str(), self.title.as_str()]
            .into_iter()
            .find(|candidate| !candidate.is_empty())
            .unwrap_or("bundle")
    }
}

/// Decode a text slot: strings pass through, `null` is empty, other values become compact JSON.
pub fn text_field<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    })
}

/// Decode a list, keeping only entries that decode; a non-list is empty.
fn object_entries<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let entries = match Value::deserialize(deserializer)? {
        Value::Array(entries) => entries,
        _ => return Ok(Vec::new()),
    };
    Ok(entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
