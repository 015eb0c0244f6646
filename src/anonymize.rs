use std::path::PathBuf;

use anyhow::{Context, Result};
use dicom::core::value::PrimitiveValue;
use dicom::core::{DataElement, Tag, VR};
use dicom::object::{open_file, FileDicomObject, FileMetaTableBuilder};
use sha2::{Digest, Sha256};

use crate::registry::CommandContext;

fn generate_hash(original: &str) -> String {
    let digest = Sha256::digest(original.as_bytes());
    hex::encode(digest)[..16].to_uppercase()
}

/// Derive a deterministic replacement UID from the original value. The root
/// is a generic org root; the suffix is 64 bits of the seed's digest, which
/// keeps the result well under the 64-character UID limit.
fn hashed_uid(seed: &str) -> String {
    let digest = Sha256::digest(seed.as_bytes());
    let mut suffix = [0u8; 8];
    suffix.copy_from_slice(&digest[..8]);
    format!("1.2.826.0.1.3680043.2.1125.{}", u64::from_be_bytes(suffix))
}

fn output_path(ctx: &CommandContext, suffix: &str) -> PathBuf {
    let stem = ctx
        .input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dicom");
    ctx.output_dir.join(format!("{stem}_{suffix}.dcm"))
}

fn element_string(obj: &dicom::object::DefaultDicomObject, tag: Tag) -> Option<String> {
    obj.element(tag)
        .ok()
        .and_then(|e| e.to_str().ok())
        .map(|s| s.into_owned())
}

/// Replace PHI fields with anonymized values and write `<stem>_anon.dcm`.
pub fn strip_phi(ctx: &CommandContext) -> Result<()> {
    println!("--- [Anonymize] PHI Strip ---");
    let mut obj = open_file(&ctx.input_path).context("Falha ao abrir arquivo DICOM")?;

    let original_id =
        element_string(&obj, Tag(0x0010, 0x0020)).unwrap_or_else(|| "UNKNOWN".into());
    let anon_id = anonymized_id(&original_id);

    let replacements = [
        (Tag(0x0010, 0x0010), "ANONYMOUS^PATIENT"), // PatientName
        (Tag(0x0010, 0x0020), anon_id.as_str()),    // PatientID
        (Tag(0x0008, 0x0080), "ANONYMIZED"),        // InstitutionName
        (Tag(0x0008, 0x0090), "ANONYMIZED"),        // ReferringPhysicianName
    ];
    for (tag, value) in replacements {
        obj.put(DataElement::new(tag, VR::LO, PrimitiveValue::from(value)));
    }
    obj.remove_element(Tag(0x0010, 0x0030)); // PatientBirthDate

    let output = output_path(ctx, "anon");
    obj.write_to_file(&output)
        .context("Failed to write anonymized file")?;
    println!("  Arquivo anonimizado salvo em: {:?}", output);
    if ctx.verbose {
        println!("  Patient ID mapped to {anon_id}");
    }
    Ok(())
}

/// Regenerate Study/Series/SOP Instance UIDs and write `<stem>_retag.dcm`.
/// The file meta group is rebuilt so it stays consistent with the new SOP
/// Instance UID.
pub fn regenerate_uids(ctx: &CommandContext) -> Result<()> {
    println!("--- [Anonymize] UID Rewrite ---");
    let obj = open_file(&ctx.input_path).context("Falha ao abrir arquivo DICOM")?;
    let transfer_syntax = obj.meta().transfer_syntax().to_string();
    let sop_class_uid = element_string(&obj, Tag(0x0008, 0x0016))
        .unwrap_or_else(|| "1.2.840.10008.5.1.4.1.1.7".into());

    let uid_tags = [
        Tag(0x0020, 0x000D), // StudyInstanceUID
        Tag(0x0020, 0x000E), // SeriesInstanceUID
        Tag(0x0008, 0x0018), // SOPInstanceUID
    ];

    let mut dataset = obj.into_inner();
    let mut new_sop_instance_uid = hashed_uid(&format!("{}:sop", ctx.input_path.display()));
    for tag in uid_tags {
        let original = dataset
            .element(tag)
            .ok()
            .and_then(|e| e.to_str().ok())
            .map(|s| s.into_owned())
            .unwrap_or_else(|| format!("{}:{}", ctx.input_path.display(), tag));
        let rewritten = hashed_uid(&original);
        if tag == Tag(0x0008, 0x0018) {
            new_sop_instance_uid = rewritten.clone();
        }
        dataset.put(DataElement::new(tag, VR::UI, PrimitiveValue::from(rewritten)));
    }

    let file_meta = FileMetaTableBuilder::new()
        .transfer_syntax(&transfer_syntax)
        .media_storage_sop_class_uid(&sop_class_uid)
        .media_storage_sop_instance_uid(&new_sop_instance_uid)
        .build()
        .context("Failed to rebuild file meta")?;

    let mut file_obj = FileDicomObject::new_empty_with_dict_and_meta(
        dicom::dictionary_std::StandardDataDictionary,
        file_meta,
    );
    for elem in dataset {
        file_obj.put(elem);
    }

    let output = output_path(ctx, "retag");
    file_obj
        .write_to_file(&output)
        .context("Failed to write retagged file")?;
    println!("  UIDs regenerados, salvo em: {:?}", output);
    Ok(())
}

/// Deterministic replacement for a patient ID.
pub fn anonymized_id(original: &str) -> String {
    format!("ANON_{}", generate_hash(original))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymized_ids_are_deterministic_and_prefixed() {
        let a = anonymized_id("PAT123");
        let b = anonymized_id("PAT123");
        assert_eq!(a, b);
        assert!(a.starts_with("ANON_"));
        assert_eq!(a.len(), "ANON_".len() + 16);
    }

    #[test]
    fn hashed_uids_fit_the_dicom_limit() {
        let uid = hashed_uid("1.2.840.113619.2.55.3");
        assert!(uid.len() <= 64);
        assert!(uid.starts_with("1.2.826.0.1.3680043.2.1125."));
        assert_ne!(uid, hashed_uid("some other uid"));
    }
}
