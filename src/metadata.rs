//
// metadata.rs
// dicom-suite
//
// Reads common patient/study/image tags and renders the tags report for the inspection suite.
//
// Thales Matheus Mendonça Santos - March 2026

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dicom::core::Tag;
use dicom::object::{open_file, DefaultDicomObject};

use crate::models::{BasicMetadata, DetailedMetadata};
use crate::registry::CommandContext;

fn element_str(obj: &DefaultDicomObject, tag: Tag) -> Option<String> {
    obj.element(tag)
        .ok()
        .and_then(|e| e.to_str().ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn element_u32(obj: &DefaultDicomObject, tag: Tag) -> Option<u32> {
    obj.element(tag).ok().and_then(|e| e.to_int::<u32>().ok())
}

fn insert_if(map: &mut BTreeMap<String, String>, label: &str, value: Option<String>) {
    if let Some(value) = value {
        map.insert(label.to_string(), value);
    }
}

pub fn extract_basic_metadata(obj: &DefaultDicomObject) -> BasicMetadata {
    BasicMetadata {
        patient_name: element_str(obj, Tag(0x0010, 0x0010)),
        patient_id: element_str(obj, Tag(0x0010, 0x0020)),
        study_date: element_str(obj, Tag(0x0008, 0x0020)),
        modality: element_str(obj, Tag(0x0008, 0x0060)),
        sop_class_uid: element_str(obj, Tag(0x0008, 0x0016)),
        has_pixel_data: obj.element(Tag(0x7fe0, 0x0010)).is_ok(),
        transfer_syntax: Some(obj.meta().transfer_syntax().to_string()),
        rows: element_u32(obj, Tag(0x0028, 0x0010)),
        columns: element_u32(obj, Tag(0x0028, 0x0011)),
    }
}

pub fn extract_detailed_metadata(obj: &DefaultDicomObject) -> DetailedMetadata {
    let mut patient = BTreeMap::new();
    insert_if(&mut patient, "Name", element_str(obj, Tag(0x0010, 0x0010)));
    insert_if(&mut patient, "ID", element_str(obj, Tag(0x0010, 0x0020)));
    insert_if(
        &mut patient,
        "Birth Date",
        element_str(obj, Tag(0x0010, 0x0030)),
    );
    insert_if(&mut patient, "Sex", element_str(obj, Tag(0x0010, 0x0040)));

    let mut study = BTreeMap::new();
    insert_if(&mut study, "Date", element_str(obj, Tag(0x0008, 0x0020)));
    insert_if(&mut study, "Time", element_str(obj, Tag(0x0008, 0x0030)));
    insert_if(
        &mut study,
        "Description",
        element_str(obj, Tag(0x0008, 0x1030)),
    );
    insert_if(
        &mut study,
        "Accession Number",
        element_str(obj, Tag(0x0008, 0x0050)),
    );

    let mut image = BTreeMap::new();
    insert_if(&mut image, "Modality", element_str(obj, Tag(0x0008, 0x0060)));
    insert_if(&mut image, "Rows", element_str(obj, Tag(0x0028, 0x0010)));
    insert_if(&mut image, "Columns", element_str(obj, Tag(0x0028, 0x0011)));
    insert_if(
        &mut image,
        "Photometric Interpretation",
        element_str(obj, Tag(0x0028, 0x0004)),
    );
    insert_if(
        &mut image,
        "Bits Allocated",
        element_str(obj, Tag(0x0028, 0x0100)),
    );

    let mut misc = BTreeMap::new();
    insert_if(
        &mut misc,
        "SOP Class UID",
        element_str(obj, Tag(0x0008, 0x0016)),
    );
    insert_if(
        &mut misc,
        "SOP Instance UID",
        element_str(obj, Tag(0x0008, 0x0018)),
    );
    insert_if(
        &mut misc,
        "Transfer Syntax",
        Some(obj.meta().transfer_syntax().to_string()),
    );

    DetailedMetadata {
        patient,
        study,
        image,
        misc,
    }
}

pub fn read_basic_metadata(path: &Path) -> Result<BasicMetadata> {
    let obj = open_file(path).context("Falha ao abrir arquivo DICOM")?;
    Ok(extract_basic_metadata(&obj))
}

fn render_section(out: &mut String, title: &str, entries: &BTreeMap<String, String>) {
    let _ = writeln!(out, "{title}");
    if entries.is_empty() {
        let _ = writeln!(out, "  (no tags present)");
    }
    for (label, value) in entries {
        let _ = writeln!(out, "  {label}: {value}");
    }
    let _ = writeln!(out);
}

/// Inspect common tags, print the patient identifiers, and write the full
/// categorized report to `tags.txt` in the output directory.
pub fn tags_report(ctx: &CommandContext) -> Result<()> {
    let obj = open_file(&ctx.input_path).context("Falha ao abrir arquivo DICOM")?;
    let basic = extract_basic_metadata(&obj);
    let detailed = extract_detailed_metadata(&obj);

    println!("--- [Inspect] Tag Inspection ---");
    println!(
        "  Patient: {} ({})",
        basic.patient_name.as_deref().unwrap_or("N/A"),
        basic.patient_id.as_deref().unwrap_or("N/A")
    );
    println!("  Modality: {}", basic.modality.as_deref().unwrap_or("N/A"));
    if ctx.verbose {
        println!(
            "  SOP Class: {}",
            basic.sop_class_uid.as_deref().unwrap_or("N/A")
        );
        println!(
            "  Transfer Syntax: {}",
            basic.transfer_syntax.as_deref().unwrap_or("N/A")
        );
    }

    let mut report = String::new();
    let _ = writeln!(report, "Tag report for {:?}", ctx.input_path.file_name());
    let _ = writeln!(report);
    render_section(&mut report, "PATIENT", &detailed.patient);
    render_section(&mut report, "STUDY", &detailed.study);
    render_section(&mut report, "IMAGE", &detailed.image);
    render_section(&mut report, "MISC", &detailed.misc);

    let output = ctx.output_dir.join("tags.txt");
    fs::write(&output, report).context("Failed to write tag report")?;
    println!("  Report written to {:?}", output);
    Ok(())
}
