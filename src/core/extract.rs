//! Purpose: Materialize widget and bundle exports into the output tree.
//! Exports: `UnpackConfig`, `ReadmeMode`, `Unpacker`, `unpack`.
//! Role: The one authoritative extraction path; actions and README sections hang off it.
//! Invariants: Every filesystem failure is recorded in the `Summary` and never aborts the run.
//! Invariants: Per-widget files are overwritten on each run; the README only grows
//!   unless `ReadmeMode::Overwrite` is selected.
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use super::actions::extract_actions;
use super::collect::{CollectRequest, collect};
use super::error::{Error, ErrorKind, io_error};
use super::layout::{OutputLayout, check_segment};
use super::load::load_json;
use super::model::{BUNDLE_INFO_FIELD, BUNDLE_WIDGETS_FIELD, BundleInfo, WidgetDefinition};
use super::normalize::normalize;
use super::readme::document_widget;
use super::report::{FailureStage, Summary};

/// What to do with an existing `README.md` at the start of a run.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ReadmeMode {
    /// Keep earlier sections; repeated runs add duplicate sections.
    #[default]
    Append,
    /// Truncate once, at the first section written by this run.
    Overwrite,
}

#[derive(Clone, Debug)]
pub struct UnpackConfig {
    pub output_dir: PathBuf,
    pub readme: ReadmeMode,
}

impl UnpackConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            readme: ReadmeMode::Append,
        }
    }

    pub fn with_readme(mut self, readme: ReadmeMode) -> Self {
        self.readme = readme;
        self
    }
}

/// Collect inputs and extract every one of them. `files_total == 0` means nothing was given.
pub fn unpack(request: &CollectRequest, config: UnpackConfig) -> Summary {
    let mut unpacker = Unpacker::new(config);
    let paths = collect(request, unpacker.summary_mut());
    unpacker.unpack_files(&paths);
    unpacker.finish()
}

#[derive(Debug)]
pub struct Unpacker {
    layout: OutputLayout,
    readme_truncate_pending: bool,
    summary: Summary,
}

impl Unpacker {
    pub fn new(config: UnpackConfig) -> Self {
        Self {
            layout: OutputLayout::new(config.output_dir),
            readme_truncate_pending: config.readme == ReadmeMode::Overwrite,
            summary: Summary::default(),
        }
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn summary_mut(&mut self) -> &mut Summary {
        &mut self.summary
    }

    pub fn finish(self) -> Summary {
        self.summary
    }

    pub fn unpack_files(&mut self, paths: &[PathBuf]) {
        for path in paths {
            self.summary.files_total += 1;
            let Some(value) = load_json(path, &mut self.summary) else {
                continue;
            };
            self.dispatch(&value, path);
        }
    }

    /// Route one parsed input: bundles fan out to their widgets, anything else is a widget.
    pub fn dispatch(&mut self, value: &Value, origin: &Path) {
        if value.get(BUNDLE_WIDGETS_FIELD).is_some() {
            self.extract_bundle(value, origin);
        } else {
            self.extract_widget(value, origin);
        }
    }

    pub fn extract_bundle(&mut self, bundle: &Value, origin: &Path) {
        if let Some(widgets) = bundle.get(BUNDLE_WIDGETS_FIELD).and_then(Value::as_array) {
            for widget in widgets {
                self.extract_widget(widget, origin);
            }
        }

        let info = self.bundle_info(bundle, origin);
        let identifier = bundle_identifier(&info);

        let widgets_dir = self.layout.widgets_dir();
        self.create_dir(&widgets_dir, None);
        let path = self.layout.bundle_file(&identifier);
        if self.write_json(&path, bundle, None) {
            self.summary.bundles += 1;
            tracing::info!(bundle = %identifier, "bundle saved");
        }
    }

    /// Bundle metadata; a malformed `widgetsBundle` is recorded and treated as absent.
    fn bundle_info(&mut self, bundle: &Value, origin: &Path) -> BundleInfo {
        let Some(value) = bundle.get(BUNDLE_INFO_FIELD).filter(|value| !value.is_null()) else {
            return BundleInfo::default();
        };
        match BundleInfo::deserialize(value) {
            Ok(info) => info,
            Err(err) => {
                self.summary.record(
                    FailureStage::InvalidBundle,
                    &Error::new(ErrorKind::Invalid)
                        .with_message(format!("{BUNDLE_INFO_FIELD} has an unexpected shape"))
                        .with_path(origin)
                        .with_source(err),
                );
                BundleInfo::default()
            }
        }
    }

    pub fn extract_widget(&mut self, raw: &Value, origin: &Path) {
        if !raw.is_object() {
            self.summary.record(
                FailureStage::InvalidWidget,
                &Error::new(ErrorKind::Invalid)
                    .with_message("widget definition is not a JSON object")
                    .with_path(origin),
            );
            return;
        }
        let widget = match serde_json::from_value::<WidgetDefinition>(raw.clone()) {
            Ok(widget) => widget,
            Err(err) => {
                self.summary.record(
                    FailureStage::InvalidWidget,
                    &Error::new(ErrorKind::Invalid)
                        .with_message("widget definition has an unexpected shape")
                        .with_path(origin)
                        .with_source(err),
                );
                return;
            }
        };
        if let Err(reason) = check_segment(&widget.name) {
            self.summary.record(
                FailureStage::InvalidName,
                &Error::new(ErrorKind::Invalid)
                    .with_message(format!("widget {}", reason.describe()))
                    .with_widget(widget.name.as_str())
                    .with_path(origin),
            );
            return;
        }

        let name = widget.name.as_str();
        let stem = normalize(name);
        for dir in [
            self.layout.assets_dir(),
            self.layout.widget_dir(name),
            self.layout.widget_src_dir(name),
        ] {
            self.create_dir(&dir, Some(name));
        }
        tracing::info!(widget = name, "widget created");

        let descriptor = &widget.descriptor;
        let fields = [
            (".js", &descriptor.controller_script),
            (".css", &descriptor.template_css),
            (".html", &descriptor.template_html),
            (".settings.json", &descriptor.settings_schema),
            (".datakey.settings.json", &descriptor.data_key_settings_schema),
        ];
        for (suffix, content) in fields {
            let path = self.layout.widget_file(name, &stem, suffix);
            self.write_file(&path, content.as_bytes(), Some(name));
        }
        let source = self.layout.widget_source(name, &stem);
        self.write_json(&source, raw, Some(name));

        extract_actions(self, &widget);
        document_widget(self, &widget, &stem);
        self.summary.widgets += 1;
    }

    pub(crate) fn create_dir(&mut self, path: &Path, widget: Option<&str>) -> bool {
        match fs::create_dir_all(path) {
            Ok(()) => true,
            Err(err) => {
                let err = with_widget(io_error(err, "failed to create directory", path), widget);
                self.summary.record(FailureStage::CreateDirectory, &err);
                false
            }
        }
    }

    pub(crate) fn write_file(
        &mut self,
        path: &Path,
        contents: &[u8],
        widget: Option<&str>,
    ) -> bool {
        match fs::write(path, contents) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote file");
                self.summary.files_written += 1;
                true
            }
            Err(err) => {
                let err = with_widget(io_error(err, "failed to write file", path), widget);
                self.summary.record(FailureStage::WriteFile, &err);
                false
            }
        }
    }

    fn write_json(&mut self, path: &Path, value: &Value, widget: Option<&str>) -> bool {
        match serde_json::to_string_pretty(value) {
            Ok(text) => self.write_file(path, text.as_bytes(), widget),
            Err(err) => {
                let err = Error::new(ErrorKind::Internal)
                    .with_message("failed to encode JSON")
                    .with_path(path)
                    .with_source(err);
                self.summary.record(FailureStage::WriteFile, &with_widget(err, widget));
                false
            }
        }
    }

    /// Append (or, once per run in overwrite mode, replace) README text.
    pub(crate) fn append_readme(&mut self, text: &str, widget: &str) -> bool {
        let path = self.layout.readme();
        let root = self.layout.root().to_path_buf();
        if !self.create_dir(&root, Some(widget)) {
            return false;
        }
        let mut options = OpenOptions::new();
        options.create(true);
        if self.readme_truncate_pending {
            options.write(true).truncate(true);
        } else {
            options.append(true);
        }
        let result = options
            .open(&path)
            .and_then(|mut file| file.write_all(text.as_bytes()));
        match result {
            Ok(()) => {
                self.readme_truncate_pending = false;
                true
            }
            Err(err) => {
                let err = io_error(err, "failed to update README", &path).with_widget(widget);
                self.summary.record(FailureStage::WriteFile, &err);
                false
            }
        }
    }
}

fn bundle_identifier(info: &BundleInfo) -> String {
    let identifier = info.identifier();
    if check_segment(identifier).is_ok() {
        return identifier.to_string();
    }
    let normalized = normalize(identifier);
    if normalized.is_empty() {
        "bundle".to_string()
    } else {
        normalized
    }
}

fn with_widget(err: Error, widget: Option<&str>) -> Error {
    match widget {
        Some(widget) => err.with_widget(widget),
        None => err,
    }
}
