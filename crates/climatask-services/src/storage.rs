//! Whole-file JSON writes shared by the file-backed stores.

use climatask_core::PersistenceError;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Ensure the parent directory of `path` exists.
pub(crate) fn ensure_parent(path: &Path) -> Result<(), PersistenceError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|e| PersistenceError::write(dir, e))
        }
        _ => Ok(()),
    }
}

/// Serialize `value` as pretty JSON into a sibling temp file, then rename it over `path`.
pub(crate) fn write_json_atomic<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<(), PersistenceError> {
    let json = serde_json::to_vec_pretty(value)
        .map_err(|e| PersistenceError::Serialize(e.to_string()))?;

    ensure_parent(path)?;
    let tmp = temp_path(path);
    {
        let mut file = fs::File::create(&tmp).map_err(|e| PersistenceError::write(&tmp, e))?;
        file.write_all(&json)
            .and_then(|_| file.sync_all())
            .map_err(|e| PersistenceError::write(&tmp, e))?;
    }
    fs::rename(&tmp, path).map_err(|e| PersistenceError::write(path, e))
}
