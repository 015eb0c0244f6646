//
// command_suites.rs
// dicom-suite
//
// Integration tests driving the assembled registry end to end: inspection, anonymization,
// transcoding, pixel commands, and the "all" aggregate against a synthetic DICOM instance.
//
// Thales Matheus Mendonça Santos - March 2026

use std::fs;
use std::path::PathBuf;

use dicom::core::{DataElement, PrimitiveValue, Tag, VR};
use dicom::dictionary_std::StandardDataDictionary;
use dicom::object::{open_file, FileDicomObject, FileMetaTableBuilder, InMemDicomObject};
use dicom::transfer_syntax::entries::{EXPLICIT_VR_LITTLE_ENDIAN, IMPLICIT_VR_LITTLE_ENDIAN};
use dicom_suite::registry::CommandContext;
use dicom_suite::{dispatch, metadata, pixels, suites, validate};
use tempfile::{tempdir, TempDir};

fn build_test_dicom() -> (TempDir, PathBuf) {
    // A tiny Secondary Capture instance with predictable pixel values:
    // raw [0, 64, 128, 255], rescale slope 2 and intercept -1024.
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("sample.dcm");

    let mut obj = InMemDicomObject::new_empty_with_dict(StandardDataDictionary);
    let put_str = |obj: &mut InMemDicomObject<StandardDataDictionary>, tag, vr, value: &str| {
        obj.put(DataElement::new(tag, vr, PrimitiveValue::from(value)));
    };
    let put_u16 = |obj: &mut InMemDicomObject<StandardDataDictionary>, tag, value: u16| {
        obj.put(DataElement::new(tag, VR::US, PrimitiveValue::from(value)));
    };

    put_str(&mut obj, Tag(0x0010, 0x0010), VR::PN, "Test^Patient");
    put_str(&mut obj, Tag(0x0010, 0x0020), VR::LO, "PAT123");
    put_str(&mut obj, Tag(0x0010, 0x0030), VR::DA, "19800101");
    put_str(&mut obj, Tag(0x0008, 0x0060), VR::CS, "OT");
    put_str(&mut obj, Tag(0x0008, 0x0020), VR::DA, "20240101");
    put_str(&mut obj, Tag(0x0008, 0x0016), VR::UI, "1.2.840.10008.5.1.4.1.1.7");
    put_str(
        &mut obj,
        Tag(0x0008, 0x0018),
        VR::UI,
        "1.2.826.0.1.3680043.2.1125.1",
    );
    put_str(
        &mut obj,
        Tag(0x0020, 0x000D),
        VR::UI,
        "1.2.826.0.1.3680043.2.1125.2",
    );
    put_str(
        &mut obj,
        Tag(0x0020, 0x000E),
        VR::UI,
        "1.2.826.0.1.3680043.2.1125.3",
    );

    put_u16(&mut obj, Tag(0x0028, 0x0010), 2); // Rows
    put_u16(&mut obj, Tag(0x0028, 0x0011), 2); // Columns
    put_u16(&mut obj, Tag(0x0028, 0x0002), 1); // Samples per Pixel
    put_u16(&mut obj, Tag(0x0028, 0x0100), 8); // Bits Allocated
    put_u16(&mut obj, Tag(0x0028, 0x0101), 8); // Bits Stored
    put_u16(&mut obj, Tag(0x0028, 0x0102), 7); // High Bit
    put_u16(&mut obj, Tag(0x0028, 0x0103), 0); // Pixel Representation
    put_str(&mut obj, Tag(0x0028, 0x0004), VR::CS, "MONOCHROME2");
    put_str(&mut obj, Tag(0x0028, 0x0008), VR::IS, "1"); // Number of Frames
    put_str(&mut obj, Tag(0x0028, 0x1052), VR::DS, "-1024"); // Rescale Intercept
    put_str(&mut obj, Tag(0x0028, 0x1053), VR::DS, "2"); // Rescale Slope

    obj.put(DataElement::new(
        Tag(0x7fe0, 0x0010),
        VR::OB,
        PrimitiveValue::from(vec![0u8, 64, 128, 255]),
    ));

    let meta = FileMetaTableBuilder::new()
        .transfer_syntax(EXPLICIT_VR_LITTLE_ENDIAN.uid())
        .media_storage_sop_class_uid("1.2.840.10008.5.1.4.1.1.7")
        .media_storage_sop_instance_uid("1.2.826.0.1.3680043.2.1125.1")
        .build()
        .expect("meta");

    let mut file_obj = FileDicomObject::new_empty_with_dict_and_meta(StandardDataDictionary, meta);
    for elem in obj {
        file_obj.put(elem);
    }
    file_obj.write_to_file(&path).expect("write test dicom");

    (dir, path)
}

fn test_context(input: &PathBuf) -> (TempDir, CommandContext) {
    let out = tempdir().expect("output tempdir");
    let ctx = CommandContext {
        input_path: input.clone(),
        output_dir: out.path().to_path_buf(),
        verbose: false,
    };
    (out, ctx)
}

#[test]
fn registry_assembles_all_backend_suites_plus_aggregate() {
    let registry = dispatch::assemble(&suites::sources());

    for suite in dispatch::EXPECTED_SUITES {
        assert!(registry.exists(suite), "missing suite {suite}");
    }
    assert!(registry.exists("all"));

    // 6 inspect + 3 anon + 3 transcode + 4 pixels + the aggregate.
    assert_eq!(registry.len(), 17);

    let mut listing = Vec::new();
    registry.list(&mut listing).expect("list");
    let text = String::from_utf8(listing).unwrap();
    assert!(text.contains("[Inspect]"));
    assert!(text.contains("[Anonymize]"));
    assert!(text.contains("[Transcode]"));
    assert!(text.contains("[Pixels]"));
    assert!(text.contains("[General]\n  - all:"));
}

#[test]
fn tag_inspection_writes_report_and_metadata_is_populated() {
    let (_dir, path) = build_test_dicom();
    let (_out, ctx) = test_context(&path);
    let registry = dispatch::assemble(&suites::sources());

    assert_eq!(registry.run("inspect:tags", &ctx), 0);
    let report = fs::read_to_string(ctx.output_dir.join("tags.txt")).expect("tags.txt");
    assert!(report.contains("Test^Patient"));
    assert!(report.contains("PAT123"));

    let basic = metadata::read_basic_metadata(&path).expect("basic metadata");
    assert_eq!(basic.patient_name.as_deref(), Some("Test^Patient"));
    assert_eq!(basic.modality.as_deref(), Some("OT"));
    assert_eq!(basic.rows, Some(2));
    assert_eq!(basic.columns, Some(2));
    assert!(basic.has_pixel_data);
    assert!(basic.transfer_syntax.is_some());
}

#[test]
fn validation_covers_required_tags() {
    let (_dir, path) = build_test_dicom();
    let summary = validate::validate_file(&path).expect("validate");
    assert!(summary.valid);
    assert!(summary.missing_tags.is_empty());
    assert!(summary.has_pixel_data);
}

#[test]
fn dump_and_json_exports_land_in_the_output_dir() {
    let (_dir, path) = build_test_dicom();
    let (_out, ctx) = test_context(&path);
    let registry = dispatch::assemble(&suites::sources());

    assert_eq!(registry.run("inspect:dump", &ctx), 0);
    let dump = fs::read_to_string(ctx.output_dir.join("dump.txt")).expect("dump.txt");
    assert!(dump.contains("PatientName"));
    assert!(dump.contains("(0010,0010)"));

    assert_eq!(registry.run("inspect:json", &ctx), 0);
    let json = fs::read_to_string(ctx.output_dir.join("sample.json")).expect("sample.json");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert!(value.get("00100010").is_some());
}

#[test]
fn scan_indexes_the_sample_directory() {
    let (_dir, path) = build_test_dicom();
    let (_out, ctx) = test_context(&path);
    let registry = dispatch::assemble(&suites::sources());

    assert_eq!(registry.run("inspect:scan", &ctx), 0);
    let index = fs::read_to_string(ctx.output_dir.join("index.csv")).expect("index.csv");
    assert!(index.contains("path,patient_id,study_date,modality,rows,columns"));
    assert!(index.contains("PAT123"));
    assert!(index.contains("20240101"));
}

#[test]
fn anonymization_creates_clean_copy() {
    let (_dir, path) = build_test_dicom();
    let (_out, ctx) = test_context(&path);
    let registry = dispatch::assemble(&suites::sources());

    assert_eq!(registry.run("anon:strip", &ctx), 0);
    let anon = open_file(ctx.output_dir.join("sample_anon.dcm")).expect("open anon");

    let patient_name = anon
        .element(Tag(0x0010, 0x0010))
        .expect("name")
        .to_str()
        .unwrap();
    assert_eq!(patient_name, "ANONYMOUS^PATIENT");

    let patient_id = anon
        .element(Tag(0x0010, 0x0020))
        .expect("id")
        .to_str()
        .unwrap();
    assert_eq!(patient_id, dicom_suite::anonymize::anonymized_id("PAT123"));

    assert!(anon.element(Tag(0x0010, 0x0030)).is_err(), "birth date kept");
}

#[test]
fn uid_rewrite_regenerates_instance_uids() {
    let (_dir, path) = build_test_dicom();
    let (_out, ctx) = test_context(&path);
    let registry = dispatch::assemble(&suites::sources());

    assert_eq!(registry.run("anon:retag-uids", &ctx), 0);
    let retagged = open_file(ctx.output_dir.join("sample_retag.dcm")).expect("open retagged");

    // UI values may be NUL-padded to even length on disk.
    let sop_uid = retagged
        .element(Tag(0x0008, 0x0018))
        .expect("sop uid")
        .to_str()
        .unwrap()
        .trim_end_matches('\0')
        .to_string();
    assert_ne!(sop_uid, "1.2.826.0.1.3680043.2.1125.1");
    assert!(sop_uid.starts_with("1.2.826.0.1.3680043.2.1125."));
    // File meta must follow the rewritten SOP Instance UID.
    assert_eq!(
        retagged
            .meta()
            .media_storage_sop_instance_uid
            .trim_end_matches('\0'),
        sop_uid
    );
}

#[test]
fn transcode_changes_meta_and_keeps_pixels_intact() {
    let (_dir, path) = build_test_dicom();
    let (_out, ctx) = test_context(&path);
    let registry = dispatch::assemble(&suites::sources());

    assert_eq!(registry.run("transcode:implicit-vr", &ctx), 0);
    let output = ctx.output_dir.join("sample_implicit.dcm");

    let transcoded = open_file(&output).expect("open transcoded");
    assert_eq!(
        transcoded.meta().transfer_syntax(),
        IMPLICIT_VR_LITTLE_ENDIAN.uid()
    );

    let baseline = pixels::pixel_statistics_for_file(&path).expect("baseline stats");
    let rewritten = pixels::pixel_statistics_for_file(&output).expect("transcoded stats");
    assert_eq!(baseline.total_pixels, rewritten.total_pixels);
    assert!((baseline.min - rewritten.min).abs() < f32::EPSILON);
    assert!((baseline.max - rewritten.max).abs() < f32::EPSILON);
}

#[test]
fn pixel_statistics_respect_the_modality_lut() {
    let (_dir, path) = build_test_dicom();

    // Raw [0, 64, 128, 255] with slope 2, intercept -1024.
    let stats = pixels::pixel_statistics_for_file(&path).expect("stats");
    assert_eq!(stats.total_pixels, 4);
    assert!((stats.min - -1024.0).abs() < f32::EPSILON);
    assert!((stats.max - -514.0).abs() < f32::EPSILON);
    assert!((stats.mean - -800.5).abs() < 0.1);
    assert!(stats.median > -834.0 && stats.median < -830.0);
}

#[test]
fn histogram_counts_align_with_pixels() {
    let (_dir, path) = build_test_dicom();
    let histogram = pixels::histogram_for_file(&path, 8).expect("histogram");
    let total: u64 = histogram.bins.iter().sum();
    assert_eq!(total, 4);
    assert!(histogram.max >= histogram.min);
}

#[test]
fn preview_command_writes_a_png() {
    let (_dir, path) = build_test_dicom();
    let (_out, ctx) = test_context(&path);
    let registry = dispatch::assemble(&suites::sources());

    assert_eq!(registry.run("pixels:preview", &ctx), 0);
    let png = fs::read(ctx.output_dir.join("sample_preview.png")).expect("preview png");
    assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
}

#[test]
fn aggregate_runs_every_available_suite() {
    let (_dir, path) = build_test_dicom();
    let (_out, ctx) = test_context(&path);
    let registry = dispatch::assemble(&suites::sources());

    assert_eq!(registry.run("all", &ctx), 0);

    // One artifact per suite proves each constituent actually ran.
    assert!(ctx.output_dir.join("tags.txt").exists());
    assert!(ctx.output_dir.join("sample_anon.dcm").exists());
    assert!(ctx.output_dir.join("sample_explicit.dcm").exists());
    assert!(ctx.output_dir.join("stats.txt").exists());
}

#[test]
fn unknown_command_yields_the_sentinel_status() {
    let (_dir, path) = build_test_dicom();
    let (_out, ctx) = test_context(&path);
    let registry = dispatch::assemble(&suites::sources());

    assert_eq!(
        registry.run("does-not-exist", &ctx),
        dicom_suite::registry::UNKNOWN_COMMAND_STATUS
    );
    assert_eq!(fs::read_dir(&ctx.output_dir).unwrap().count(), 0);
}
