//
// json.rs
// dicom-suite
//
// Exports a DICOM dataset as DICOM-JSON for the inspection suite.
//
// Thales Matheus Mendonça Santos - March 2026

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dicom::object::{open_file, InMemDicomObject, StandardDataDictionary};
use dicom_json::DicomJson;

use crate::registry::CommandContext;

/// Convert a DICOM file into a pretty JSON string without touching the filesystem.
pub fn to_json_string(input: &Path) -> Result<String> {
    let obj = open_file(input).context("Falha ao abrir arquivo DICOM")?;

    // The in-memory object implements serde-friendly conversions via dicom-json.
    let inner: &InMemDicomObject<StandardDataDictionary> = &*obj;
    let json_obj = DicomJson::from(inner);

    serde_json::to_string_pretty(&json_obj).context("Failed to serialize to JSON")
}

/// Write the DICOM-JSON rendition of the input to `<stem>.json`.
pub fn json_report(ctx: &CommandContext) -> Result<()> {
    println!("--- [Inspect] JSON Export ---");
    let json_string = to_json_string(&ctx.input_path)?;

    let stem = ctx
        .input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset");
    let output = ctx.output_dir.join(format!("{stem}.json"));
    fs::write(&output, json_string).context("Failed to write JSON to file")?;
    println!("  JSON saved to {:?}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom::core::{DataElement, PrimitiveValue, Tag, VR};

    #[test]
    fn serialized_dataset_uses_dicom_json_tag_keys() {
        let mut obj: InMemDicomObject<StandardDataDictionary> = InMemDicomObject::new_empty();
        obj.put(DataElement::new(
            Tag(0x0010, 0x0010),
            VR::PN,
            PrimitiveValue::from("Test^Patient"),
        ));

        let json_val = serde_json::to_value(DicomJson::from(&obj)).unwrap();
        assert!(json_val.get("00100010").is_some());
    }
}
