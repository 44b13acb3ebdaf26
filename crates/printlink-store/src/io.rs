//! JSON file I/O and atomic file operations

use serde::de::DeserializeOwned;
use std::path::Path;

use crate::StoreError;

/// Read a JSON document, returning `None` when the file does not exist
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    if contents.trim().is_empty() {
        return Ok(None);
    }
    let value = serde_json::from_str(&contents).map_err(|e| StoreError::json(path, e))?;
    Ok(Some(value))
}

/// Write data atomically using temp file + rename
pub fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    std::fs::write(&temp_path, data)?;
    std::fs::rename(temp_path, path)?;
    Ok(())
}
