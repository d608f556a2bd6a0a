use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use intake_core::SelectedFile;
use intake_logging::intake_debug;

/// Collect candidate files from the command line: file paths are taken
/// as-is, directories are scanned one level deep for regular files.
/// Validation happens later in the core; this only gathers metadata.
pub(crate) fn collect_files(paths: &[PathBuf]) -> io::Result<Vec<SelectedFile>> {
    let mut files = Vec::new();
    for path in paths {
        let metadata = fs::metadata(path)?;
        if metadata.is_dir() {
            scan_directory(path, &mut files)?;
        } else {
            files.push(selected(path, metadata.len()));
        }
    }
    Ok(files)
}

fn scan_directory(dir: &Path, files: &mut Vec<SelectedFile>) -> io::Result<()> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .collect::<io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.path())
        .collect();
    // Deterministic selection order regardless of directory iteration order.
    entries.sort();

    for path in entries {
        let metadata = fs::metadata(&path)?;
        if metadata.is_file() {
            files.push(selected(&path, metadata.len()));
        } else {
            intake_debug!("Skipping non-file entry {:?}", path);
        }
    }
    Ok(())
}

fn selected(path: &Path, size: u64) -> SelectedFile {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    SelectedFile {
        path: path.to_path_buf(),
        name,
        size,
    }
}
