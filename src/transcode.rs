//
// transcode.rs
// dicom-suite
//
// Rewrites DICOM files to uncompressed transfer syntaxes while preserving raw pixel meaning.
//
// Thales Matheus Mendonça Santos - March 2026

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dicom::core::{DataElement, PrimitiveValue, Tag, VR};
use dicom::object::{open_file, FileDicomObject, FileMetaTableBuilder};
use dicom::pixeldata::PixelDecoder;
use dicom::transfer_syntax::entries::{EXPLICIT_VR_LITTLE_ENDIAN, IMPLICIT_VR_LITTLE_ENDIAN};
use dicom_pixeldata::{ConvertOptions, ModalityLutOption, VoiLutOption};

use crate::registry::CommandContext;

/// Supported uncompressed target transfer syntaxes.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UncompressedTransferSyntax {
    ExplicitVRLittleEndian,
    ImplicitVRLittleEndian,
}

impl UncompressedTransferSyntax {
    fn uid(self) -> &'static str {
        match self {
            UncompressedTransferSyntax::ExplicitVRLittleEndian => EXPLICIT_VR_LITTLE_ENDIAN.uid(),
            UncompressedTransferSyntax::ImplicitVRLittleEndian => IMPLICIT_VR_LITTLE_ENDIAN.uid(),
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            UncompressedTransferSyntax::ExplicitVRLittleEndian => "explicit",
            UncompressedTransferSyntax::ImplicitVRLittleEndian => "implicit",
        }
    }
}

/// Transcode a DICOM file to an uncompressed transfer syntax.
pub fn transcode(
    input: &Path,
    output: &Path,
    target_ts: UncompressedTransferSyntax,
) -> Result<()> {
    let obj = open_file(input).context("Falha ao abrir arquivo DICOM")?;

    // Decode pixel data without LUTs so pixel meaning survives the rewrite;
    // dicom-pixeldata decompresses any encapsulated stream for us.
    let decoded = obj
        .decode_pixel_data()
        .context("Failed to decode pixel data")?;
    let convert_options = ConvertOptions::new()
        .with_modality_lut(ModalityLutOption::None)
        .with_voi_lut(VoiLutOption::Identity);

    let bits_allocated = decoded.bits_allocated();
    let pixel_bytes = if bits_allocated > 8 {
        let words = decoded
            .to_vec_with_options::<u16>(&convert_options)
            .context("Failed to convert decoded pixels to vector")?;
        words
            .into_iter()
            .flat_map(|v| v.to_le_bytes())
            .collect::<Vec<u8>>()
    } else {
        decoded
            .to_vec_with_options::<u8>(&convert_options)
            .context("Failed to convert decoded pixels to vector")?
    };

    // Release the borrow on obj so it can be consumed below.
    drop(decoded);
    let mut dataset = obj.into_inner();

    let vr = if bits_allocated > 8 { VR::OW } else { VR::OB };
    dataset.put(DataElement::new(
        Tag(0x7FE0, 0x0010),
        vr,
        PrimitiveValue::from(pixel_bytes),
    ));

    let sop_class_uid = dataset
        .element(Tag(0x0008, 0x0016))
        .ok()
        .and_then(|e| e.to_str().ok())
        .unwrap_or(Cow::Borrowed("1.2.840.10008.5.1.4.1.1.7"));
    let sop_instance_uid = dataset
        .element(Tag(0x0008, 0x0018))
        .ok()
        .and_then(|e| e.to_str().ok())
        .unwrap_or(Cow::Borrowed("1.2.3.4.5"));

    let file_meta = FileMetaTableBuilder::new()
        .transfer_syntax(target_ts.uid())
        .media_storage_sop_class_uid(sop_class_uid.as_ref())
        .media_storage_sop_instance_uid(sop_instance_uid.as_ref())
        .build()?;

    let mut file_obj = FileDicomObject::new_empty_with_dict_and_meta(
        dicom::dictionary_std::StandardDataDictionary,
        file_meta,
    );
    for elem in dataset {
        file_obj.put(elem);
    }

    file_obj
        .write_to_file(output)
        .context("Failed to write output file")?;
    println!("  Transcoded to {}: {:?}", target_ts.uid(), output);
    Ok(())
}

fn rewrite(ctx: &CommandContext, target_ts: UncompressedTransferSyntax) -> Result<()> {
    println!("--- [Transcode] {} VR Little Endian ---", target_ts.suffix());
    let output = output_path(ctx, target_ts);
    transcode(&ctx.input_path, &output, target_ts)
}

fn output_path(ctx: &CommandContext, target_ts: UncompressedTransferSyntax) -> PathBuf {
    let stem = ctx
        .input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dicom");
    ctx.output_dir
        .join(format!("{stem}_{}.dcm", target_ts.suffix()))
}

/// Rewrite the input as Explicit VR Little Endian.
pub fn to_explicit_vr(ctx: &CommandContext) -> Result<()> {
    rewrite(ctx, UncompressedTransferSyntax::ExplicitVRLittleEndian)
}

/// Rewrite the input as Implicit VR Little Endian.
pub fn to_implicit_vr(ctx: &CommandContext) -> Result<()> {
    rewrite(ctx, UncompressedTransferSyntax::ImplicitVRLittleEndian)
}
