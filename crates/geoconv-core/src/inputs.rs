use crate::error::ConvertError;
use crate::extraction::SourceKind;
use std::path::{Path, PathBuf};

/// Office lock files ("~$plot.xlsx") sit beside open workbooks.
fn is_lock_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("~$"))
}

fn is_supported(path: &Path) -> bool {
    !is_lock_file(path) && SourceKind::from_path(path).is_ok()
}

/// Expand a path into the source files to convert.
///
/// A file yields itself when its extension is supported. A directory yields
/// its supported files (not recursive), sorted by name.
pub fn collect_inputs(path: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    if path.is_file() {
        return Ok(if is_supported(path) {
            vec![path.to_path_buf()]
        } else {
            Vec::new()
        });
    }

    if !path.is_dir() {
        return Err(ConvertError::SourceUnreadable {
            path: path.to_path_buf(),
            reason: "no such file or directory".into(),
        });
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let entry_path = entry?.path();
        if entry_path.is_file() && is_supported(&entry_path) {
            files.push(entry_path);
        }
    }
    files.sort();
    Ok(files)
}
