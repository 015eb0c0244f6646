use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use walkdir::WalkDir;

/// Locate the first `.dcm` file under `dir`, searching recursively.
pub fn find_first_dicom(dir: impl AsRef<Path>) -> Option<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .find(|e| {
            e.file_type().is_file() && e.path().extension().map_or(false, |ext| ext == "dcm")
        })
        .map(|e| e.into_path())
}

/// Create the output directory if needed, rejecting a non-directory path.
pub fn ensure_output_dir(path: &Path) -> Result<()> {
    if path.exists() && !path.is_dir() {
        bail!(
            "Output path exists but is not a directory: {}",
            path.display()
        );
    }
    fs::create_dir_all(path)
        .with_context(|| format!("Falha ao criar diretório de saída {}", path.display()))?;
    Ok(())
}

/// Directory to scan for a command: the input itself when it is a directory,
/// otherwise its parent.
pub fn series_directory(input: &Path) -> PathBuf {
    if input.is_dir() {
        input.to_path_buf()
    } else {
        input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn finds_nested_dicom_files_and_ignores_others() {
        let dir = tempdir().expect("tmpdir");
        fs::create_dir_all(dir.path().join("nested")).expect("nested dir");
        fs::write(dir.path().join("notes.txt"), b"not dicom").expect("txt");
        fs::write(dir.path().join("nested/scan.dcm"), b"DICM").expect("dcm");

        let found = find_first_dicom(dir.path()).expect("should find the .dcm");
        assert_eq!(found.file_name().unwrap(), "scan.dcm");

        assert!(find_first_dicom(dir.path().join("missing")).is_none());
    }

    #[test]
    fn ensure_output_dir_creates_and_rejects_files() {
        let dir = tempdir().expect("tmpdir");
        let target = dir.path().join("out/run1");
        ensure_output_dir(&target).expect("create nested output");
        assert!(target.is_dir());

        let file = dir.path().join("occupied");
        fs::write(&file, b"x").expect("write file");
        assert!(ensure_output_dir(&file).is_err());
    }

    #[test]
    fn series_directory_resolves_files_to_their_parent() {
        let dir = tempdir().expect("tmpdir");
        let file = dir.path().join("a.dcm");
        fs::write(&file, b"DICM").expect("write");

        assert_eq!(series_directory(dir.path()), dir.path());
        assert_eq!(series_directory(&file), dir.path());
    }
}
