use std::path::Path;

use anyhow::{Context, Result};
use dicom::core::Tag;
use dicom::object::{open_file, DefaultDicomObject};

use crate::models::ValidationSummary;
use crate::registry::CommandContext;

const REQUIRED_TAGS: [(Tag, &str); 5] = [
    (Tag(0x0008, 0x0016), "SOP Class UID"),
    (Tag(0x0008, 0x0018), "SOP Instance UID"),
    (Tag(0x0008, 0x0060), "Modality"),
    (Tag(0x0028, 0x0010), "Rows"),
    (Tag(0x0028, 0x0011), "Columns"),
];

/// Check an already-open object for the attributes an image instance needs.
pub fn validate_obj(obj: &DefaultDicomObject) -> ValidationSummary {
    let missing_tags: Vec<String> = REQUIRED_TAGS
        .iter()
        .filter(|(tag, _)| obj.element(*tag).is_err())
        .map(|(_, name)| name.to_string())
        .collect();
    let has_pixel_data = obj.element(Tag(0x7fe0, 0x0010)).is_ok();

    ValidationSummary {
        valid: missing_tags.is_empty(),
        missing_tags,
        has_pixel_data,
    }
}

pub fn validate_file(path: &Path) -> Result<ValidationSummary> {
    let obj = open_file(path).context("Falha ao abrir arquivo DICOM")?;
    Ok(validate_obj(&obj))
}

/// Parse the input and report which required attributes are present.
pub fn check(ctx: &CommandContext) -> Result<()> {
    println!("--- [Inspect] Validation ---");
    let obj = open_file(&ctx.input_path).context("Falha ao abrir arquivo DICOM")?;
    let summary = validate_obj(&obj);

    println!("  Arquivo válido: {}", summary.valid);
    println!("  Transfer Syntax: {}", obj.meta().transfer_syntax());
    println!(
        "  Pixel Data: {}",
        if summary.has_pixel_data {
            "present"
        } else {
            "absent"
        }
    );
    for tag in &summary.missing_tags {
        println!("  Missing: {tag}");
    }

    Ok(())
}
