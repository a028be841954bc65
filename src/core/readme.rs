//! Purpose: Per-widget README sections and preview image assets.
//! Exports: `render_section`, `decode_image`, `document_widget`.
//! Invariants: One section per extracted widget, in processing order; no de-duplication.
//! Invariants: Only the first IMAGE resource is saved; undecodable data reads as no image.
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use super::error::{Error, ErrorKind};
use super::extract::Unpacker;
use super::layout::{check_segment, image_file_name, image_link, source_link};
use super::model::WidgetDefinition;
use super::report::FailureStage;

pub const NO_IMAGE_LINE: &str = "NO IMAGE PROVIDED";

/// Markdown for one widget. `image` is the asset file name when a preview was saved.
pub fn render_section(name: &str, stem: &str, description: &str, image: Option<&str>) -> String {
    let mut section = format!(
        "### {name} [(source code)](<{}>)\n\n",
        source_link(name, stem)
    );
    if !description.is_empty() {
        section.push_str(description);
        section.push_str("\n\n");
    }
    match image {
        Some(file_name) => {
            section.push_str(&format!("![{file_name}](<{}>)\n\n", image_link(file_name)));
        }
        None => {
            section.push_str(NO_IMAGE_LINE);
            section.push_str("\n\n");
        }
    }
    section
}

/// Decode resource data, accepting an optional `data:<mime>;base64,` prefix.
pub fn decode_image(data: &str) -> Result<Vec<u8>, Error> {
    let payload = match data.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => data,
    };
    let compact: String = payload.chars().filter(|ch| !ch.is_whitespace()).collect();
    STANDARD.decode(compact.as_bytes()).map_err(|err| {
        Error::new(ErrorKind::Parse)
            .with_message("image resource is not valid base64")
            .with_source(err)
    })
}

pub(crate) fn document_widget(unpacker: &mut Unpacker, widget: &WidgetDefinition, stem: &str) {
    let name = widget.name.as_str();
    let image = save_image(unpacker, widget, stem);
    let section = render_section(name, stem, &widget.description, image.as_deref());
    unpacker.append_readme(&section, name);
}

fn save_image(unpacker: &mut Unpacker, widget: &WidgetDefinition, stem: &str) -> Option<String> {
    let resource = widget.image()?;
    if resource.data.is_empty() {
        return None;
    }
    let name = widget.name.as_str();
    let bytes = match decode_image(&resource.data) {
        Ok(bytes) => bytes,
        Err(err) => {
            unpacker
                .summary_mut()
                .record(FailureStage::DecodeImage, &err.with_widget(name));
            return None;
        }
    };

    let title = if check_segment(&resource.title).is_ok() {
        resource.title.as_str()
    } else if !stem.is_empty() {
        stem
    } else {
        "image"
    };
    let file_name = image_file_name(title);
    let assets = unpacker.layout().assets_dir();
    if !unpacker.create_dir(&assets, Some(name)) {
        return None;
    }
    let path = unpacker.layout().image(&file_name);
    if !unpacker.write_file(&path, &bytes, Some(name)) {
        return None;
    }
    unpacker.summary_mut().images += 1;
    Some(file_name)
}
