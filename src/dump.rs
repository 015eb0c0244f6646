//
// dump.rs
// dicom-suite
//
// Renders a human-readable dump of a DICOM dataset, including sequences, for the inspection suite.
//
// Thales Matheus Mendonça Santos - March 2026

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dicom::core::dictionary::DataDictionary;
use dicom::core::value::Value;
use dicom::core::{PrimitiveValue, Tag};
use dicom::dictionary_std::StandardDataDictionary;
use dicom::object::{open_file, InMemDicomObject};

use crate::registry::CommandContext;

/// Rendering limits for the dump output.
#[derive(Debug, Copy, Clone)]
pub struct DumpOptions {
    pub max_depth: usize,
    pub max_value_len: usize,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            max_depth: 4,
            max_value_len: 64,
        }
    }
}

impl DumpOptions {
    /// Verbose runs widen the value previews instead of adding a flag per limit.
    pub fn for_context(ctx: &CommandContext) -> Self {
        let mut options = Self::default();
        if ctx.verbose {
            options.max_value_len = 256;
        }
        options
    }
}

pub fn dump_to_string(path: &Path, options: DumpOptions) -> Result<String> {
    let obj = open_file(path).context("Falha ao abrir arquivo DICOM")?;
    let mut out = String::new();
    dump_object(&obj, 0, options, &mut out);
    Ok(out)
}

/// Write a verbose dataset dump to `dump.txt` in the output directory.
pub fn dump_report(ctx: &CommandContext) -> Result<()> {
    println!("--- [Inspect] Dataset Dump ---");
    let text = dump_to_string(&ctx.input_path, DumpOptions::for_context(ctx))?;

    let output = ctx.output_dir.join("dump.txt");
    fs::write(&output, &text).context("Failed to write dataset dump")?;
    println!(
        "  {} line(s) written to {:?}",
        text.lines().count(),
        output
    );
    Ok(())
}

fn dump_object(
    obj: &InMemDicomObject<StandardDataDictionary>,
    depth: usize,
    options: DumpOptions,
    out: &mut String,
) {
    let indent = "  ".repeat(depth);
    for elem in obj.iter() {
        let tag = elem.header().tag;
        let vr = elem.header().vr;
        let name = tag_name(tag);

        match elem.value() {
            Value::Primitive(p) => {
                let preview = preview_primitive(p, options.max_value_len);
                let _ = writeln!(out, "{indent}{} {name} {vr} {preview}", format_tag(tag));
            }
            Value::Sequence(seq) => {
                let _ = writeln!(
                    out,
                    "{indent}{} {name} {vr} [sequence: {} item(s)]",
                    format_tag(tag),
                    seq.items().len()
                );
                if depth < options.max_depth {
                    for (idx, item) in seq.items().iter().enumerate() {
                        let _ = writeln!(out, "{indent}  Item {}", idx + 1);
                        dump_object(item, depth + 2, options, out);
                    }
                }
            }
            Value::PixelSequence(p) => {
                // Encapsulated pixel data is summarized to avoid massive output.
                let _ = writeln!(
                    out,
                    "{indent}{} {name} {vr} [encapsulated: {} fragment(s)]",
                    format_tag(tag),
                    p.fragments().len()
                );
            }
        }
    }
}

fn preview_primitive(value: &PrimitiveValue, max_value_len: usize) -> String {
    let text = value.to_str();
    if !text.is_empty() {
        return truncate(&text, max_value_len);
    }
    format!("{} bytes", value.to_bytes().len())
}

fn truncate(input: &str, limit: usize) -> String {
    if input.len() <= limit {
        return input.to_string();
    }
    // Back off to a char boundary so multi-byte values cannot split mid-char.
    let mut cut = limit;
    while !input.is_char_boundary(cut) {
        cut -= 1;
    }
    let mut truncated = input[..cut].to_string();
    truncated.push('…');
    truncated
}

fn format_tag(tag: Tag) -> String {
    format!("({:04X},{:04X})", tag.group(), tag.element())
}

fn tag_name(tag: Tag) -> String {
    StandardDataDictionary::default()
        .by_tag(tag)
        .map(|e| e.alias.to_string())
        .unwrap_or_else(|| "UnknownTag".to_string())
}
