//! Importing a script into the editor and exporting the editor to disk.

use crate::error::{LuapadError, LuapadResult};
use std::path::{Path, PathBuf};

pub const SCRIPT_EXTENSION: &str = "lua";

/// Reads any file as text. Bytes that are not UTF-8 are replaced.
pub fn import(path: &Path) -> LuapadResult<String> {
    let bytes = std::fs::read(path).map_err(|e| LuapadError::io(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Where `export` writes: `default_name` inside a directory, otherwise `target` with a `.lua` extension.
pub fn export_path(target: &Path, default_name: &str) -> PathBuf {
    if target.is_dir() {
        return target.join(default_name);
    }
    match target.extension().and_then(|e| e.to_str()) {
        Some(SCRIPT_EXTENSION) => target.to_path_buf(),
        _ => target.with_extension(SCRIPT_EXTENSION),
    }
}

/// Writes `text` and returns the path actually written.
pub fn export(text: &str, target: &Path, default_name: &str) -> LuapadResult<PathBuf> {
    let path = export_path(target, default_name);
    std::fs::write(&path, text).map_err(|e| LuapadError::io(&path, e))?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "exported script");
    Ok(path)
}
