//
// scan.rs
// dicom-suite
//
// Indexes every DICOM file under a directory into a CSV summary, reading files in parallel.
//
// Thales Matheus Mendonça Santos - March 2026

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::fsutil;
use crate::metadata;
use crate::registry::CommandContext;

fn csv_field(value: Option<&str>) -> String {
    // Commas inside tag values would break the row layout.
    value.unwrap_or("").replace(',', ";")
}

/// Scan the input directory (or the input file's directory) and write an
/// `index.csv` with one row per readable DICOM file. Unreadable files are
/// logged and skipped so a single corrupt instance does not sink the scan.
pub fn scan_directory(ctx: &CommandContext) -> Result<()> {
    let root = fsutil::series_directory(&ctx.input_path);
    println!("--- [Inspect] Directory Scan ---");
    println!("  Scanning {:?}", root);

    let files: Vec<PathBuf> = WalkDir::new(&root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file() && e.path().extension().map_or(false, |ext| ext == "dcm")
        })
        .map(|e| e.into_path())
        .collect();

    let mut rows: Vec<String> = files
        .par_iter()
        .filter_map(|path| match metadata::read_basic_metadata(path) {
            Ok(meta) => Some(format!(
                "{},{},{},{},{},{}",
                csv_field(path.to_str()),
                csv_field(meta.patient_id.as_deref()),
                csv_field(meta.study_date.as_deref()),
                csv_field(meta.modality.as_deref()),
                meta.rows.map(|v| v.to_string()).unwrap_or_default(),
                meta.columns.map(|v| v.to_string()).unwrap_or_default(),
            )),
            Err(err) => {
                tracing::warn!("Skipping unreadable file {:?}: {err:#}", path);
                None
            }
        })
        .collect();
    rows.sort();

    let mut index = String::new();
    index.push_str(&format!("# generated {}\n", Utc::now().to_rfc3339()));
    index.push_str("path,patient_id,study_date,modality,rows,columns\n");
    for row in &rows {
        index.push_str(row);
        index.push('\n');
    }

    let output = ctx.output_dir.join("index.csv");
    fs::write(&output, index).context("Failed to write scan index")?;
    println!(
        "  {} of {} file(s) indexed to {:?}",
        rows.len(),
        files.len(),
        output
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_fields_never_carry_commas() {
        assert_eq!(csv_field(Some("a,b,c")), "a;b;c");
        assert_eq!(csv_field(None), "");
    }
}
