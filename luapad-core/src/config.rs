//! Playground settings, loaded from YAML.
//!
//! Every field has a default, so an empty file (or no file at all) yields a working config.

use crate::error::{LuapadError, LuapadResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming a config file when `--config` is not given.
pub const CONFIG_ENV_VAR: &str = "LUAPAD_CONFIG";

/// Lua heap limit per session: 16 MB.
pub const DEFAULT_MEMORY_LIMIT_BYTES: usize = 16 * 1024 * 1024;

/// Console keeps at most this much text; older output is dropped first.
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 1024 * 1024;

pub const DEFAULT_MIN_PANEL_WIDTH: f64 = 200.0;

pub const DEFAULT_EXPORT_FILE_NAME: &str = "code.lua";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaygroundConfig {
    pub memory_limit_bytes: usize,
    /// Luau sandbox: read-only libraries and globals, writes go to a per-session proxy.
    pub sandbox: bool,
    /// Name used in error messages, e.g. `code.lua:3: boom`.
    pub chunk_name: String,
    /// Wall-clock budget for one start/resume step. None = unbounded.
    pub step_timeout_ms: Option<u64>,
    pub max_output_bytes: usize,
    pub min_panel_width: f64,
    pub export_file_name: String,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            memory_limit_bytes: DEFAULT_MEMORY_LIMIT_BYTES,
            sandbox: true,
            chunk_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            step_timeout_ms: None,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
            min_panel_width: DEFAULT_MIN_PANEL_WIDTH,
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
        }
    }
}

impl PlaygroundConfig {
    pub fn from_yaml_str(yaml: &str) -> LuapadResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: &Path) -> LuapadResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| LuapadError::io(path, e))?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&text).map_err(|source| LuapadError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Explicit path first, then `LUAPAD_CONFIG`, then defaults.
    pub fn resolve(explicit: Option<&Path>) -> LuapadResult<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));
        match path {
            Some(p) => {
                tracing::debug!(path = %p.display(), "loading playground config");
                Self::load(&p)
            }
            None => Ok(Self::default()),
        }
    }
}
