//! Purpose: Output tree path resolution rooted at one configurable directory.
//! Exports: `OutputLayout`, `check_segment`, `SegmentError`, `image_file_name`,
//!   `source_link`, `image_link`.
//! Role: Keep every on-disk location derived from a single base directory.
//! Invariants: Raw names used as directory segments must not contain path separators.
//! Invariants: README links use `/` separators regardless of platform.

use std::path::{Path, PathBuf};

pub const README_FILE: &str = "README.md";
pub const WIDGETS_DIR: &str = "Widgets";
pub const ACTIONS_DIR: &str = "Actions";
pub const SRC_DIR: &str = "src";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SegmentError {
    Empty,
    ContainsPathSeparator,
    Relative,
}

impl SegmentError {
    pub fn describe(self) -> &'static str {
        match self {
            SegmentError::Empty => "name is empty",
            SegmentError::ContainsPathSeparator => "name contains a path separator",
            SegmentError::Relative => "name is a relative path component",
        }
    }
}

/// Accept a raw name as a single directory segment.
pub fn check_segment(name: &str) -> Result<&str, SegmentError> {
    if name.is_empty() {
        return Err(SegmentError::Empty);
    }
    if name.contains('/') || name.contains('\\') {
        return Err(SegmentError::ContainsPathSeparator);
    }
    if name == "." || name == ".." {
        return Err(SegmentError::Relative);
    }
    Ok(name)
}

/// Asset file name for an image resource title; `.png` is appended unless present.
pub fn image_file_name(title: &str) -> String {
    if title.ends_with(".png") {
        title.to_string()
    } else {
        format!("{title}.png")
    }
}

#[derive(Clone, Debug)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn readme(&self) -> PathBuf {
        self.root.join(README_FILE)
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.root.join("_assets").join("imgs")
    }

    pub fn image(&self, file_name: &str) -> PathBuf {
        self.assets_dir().join(file_name)
    }

    pub fn widgets_dir(&self) -> PathBuf {
        self.root.join(WIDGETS_DIR)
    }

    pub fn widget_dir(&self, widget: &str) -> PathBuf {
        self.widgets_dir().join(widget)
    }

    pub fn widget_src_dir(&self, widget: &str) -> PathBuf {
        self.widget_dir(widget).join(SRC_DIR)
    }

    pub fn widget_file(&self, widget: &str, stem: &str, suffix: &str) -> PathBuf {
        self.widget_dir(widget).join(format!("{stem}{suffix}"))
    }

    pub fn widget_source(&self, widget: &str, stem: &str) -> PathBuf {
        self.widget_src_dir(widget).join(format!("{stem}.json"))
    }

    pub fn action_dir(&self, widget: &str, group: &str, action: &str) -> PathBuf {
        self.widget_dir(widget)
            .join(ACTIONS_DIR)
            .join(group)
            .join(action)
    }

    pub fn bundle_file(&self, identifier: &str) -> PathBuf {
        self.widgets_dir().join(format!("{identifier}.bundle.json"))
    }
}

/// README-relative link to a widget's saved JSON source.
pub fn source_link(widget: &str, stem: &str) -> String {
    format!("{WIDGETS_DIR}/{widget}/{SRC_DIR}/{stem}.json")
}

/// README-relative link to an image asset.
pub fn image_link(file_name: &str) -> String {
    format!("_assets/imgs/{file_name}")
}

#[cfg(test)]
mod tests {
    use super::{OutputLayout, SegmentError, check_segment, image_file_name, source_link};
    use std::path::Path;

    #[test]
    fn paths_hang_off_the_configured_root() {
        let layout = OutputLayout::new("out");
        assert_eq!(layout.readme(), Path::new("out/README.md"));
        assert_eq!(layout.image("icon.png"), Path::new("out/_assets/imgs/icon.png"));
        assert_eq!(
            layout.widget_file("My Gauge", "my_gauge", ".datakey.settings.json"),
            Path::new("out/Widgets/My Gauge/my_gauge.datakey.settings.json")
        );
        assert_eq!(
            layout.widget_source("My Gauge", "my_gauge"),
            Path::new("out/Widgets/My Gauge/src/my_gauge.json")
        );
        assert_eq!(
            layout.action_dir("Gauge", "onClick", "Open Popup"),
            Path::new("out/Widgets/Gauge/Actions/onClick/Open Popup")
        );
        assert_eq!(
            layout.bundle_file("charts"),
            Path::new("out/Widgets/charts.bundle.json")
        );
    }

    #[test]
    fn segments_reject_traversal() {
        assert_eq!(check_segment("Gauge"), Ok("Gauge"));
        assert_eq!(check_segment(""), Err(SegmentError::Empty));
        assert_eq!(check_segment("a/b"), Err(SegmentError::ContainsPathSeparator));
        assert_eq!(check_segment("a\\b"), Err(SegmentError::ContainsPathSeparator));
        assert_eq!(check_segment(".."), Err(SegmentError::Relative));
    }

    #[test]
    fn image_names_gain_png_suffix_once() {
        assert_eq!(image_file_name("icon"), "icon.png");
        assert_eq!(image_file_name("icon.png"), "icon.png");
        assert_eq!(image_file_name("icon.jpg"), "icon.jpg.png");
    }

    #[test]
    fn links_use_forward_slashes() {
        assert_eq!(source_link("Gauge", "gauge"), "Widgets/Gauge/src/gauge.json");
    }
}
