use std::path::PathBuf;
use thiserror::Error;

pub type LuapadResult<T> = Result<T, LuapadError>;

#[derive(Error, Debug)]
pub enum LuapadError {
    #[error("Lua error: {0}")]
    Lua(#[from] mlua::Error),

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config '{path}': {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
}

impl LuapadError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LuapadError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Why a script session ended without completing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("{0}")]
    Compile(String),

    #[error("{0}")]
    Runtime(String),

    #[error("execution cancelled")]
    Cancelled,

    #[error("execution timed out after {timeout_ms}ms")]
    TimedOut { timeout_ms: u64 },
}

impl ScriptError {
    /// Builds a runtime error from whatever the interpreter raised, keeping only the message text.
    pub fn runtime(err: &mlua::Error) -> Self {
        ScriptError::Runtime(describe_lua_error(err))
    }

    pub fn compile(err: &mlua::Error) -> Self {
        ScriptError::Compile(describe_lua_error(err))
    }
}

/// Marker mlua appends before the Lua traceback of an error raised inside a thread.
const TRACEBACK_MARKER: &str = "\nstack traceback:";

/// Strips mlua's "runtime error:" / "syntax error:" prefixes, callback wrapping and tracebacks,
/// leaving the error value the script raised.
pub fn describe_lua_error(err: &mlua::Error) -> String {
    match err {
        mlua::Error::SyntaxError { message, .. } => message.clone(),
        mlua::Error::RuntimeError(message) => strip_traceback(message).to_string(),
        mlua::Error::MemoryError(message) => format!("out of memory: {}", message),
        mlua::Error::CallbackError { cause, .. } => describe_lua_error(cause),
        other => other.to_string(),
    }
}

fn strip_traceback(message: &str) -> &str {
    message
        .find(TRACEBACK_MARKER)
        .map_or(message, |at| &message[..at])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_runtime_error_keeps_message() {
        let err = mlua::Error::RuntimeError("code.lua:1: boom".to_string());
        assert_eq!(describe_lua_error(&err), "code.lua:1: boom");
    }

    #[test]
    fn test_describe_runtime_error_drops_traceback() {
        let err = mlua::Error::RuntimeError(
            "code.lua:1: boom\nstack traceback:\n\t[C]: in function 'error'\n\tcode.lua:1: in function <code.lua:1>"
                .to_string(),
        );
        assert_eq!(describe_lua_error(&err), "code.lua:1: boom");
    }

    #[test]
    fn test_describe_callback_error_unwraps_cause() {
        let err = mlua::Error::CallbackError {
            traceback: "stack traceback:".to_string(),
            cause: std::sync::Arc::new(mlua::Error::RuntimeError("inner".to_string())),
        };
        assert_eq!(describe_lua_error(&err), "inner");
    }

    #[test]
    fn test_script_error_display() {
        assert_eq!(ScriptError::Cancelled.to_string(), "execution cancelled");
        assert_eq!(
            ScriptError::TimedOut { timeout_ms: 50 }.to_string(),
            "execution timed out after 50ms"
        );
        assert_eq!(ScriptError::Runtime("x".into()).to_string(), "x");
    }
}
