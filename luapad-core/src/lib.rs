//! luapad: a Lua playground core.
//!
//! User code runs in a fresh Luau state per session. The script's `io_read()`
//! suspends it until the host answers, so a single-threaded front end can
//! interleave script execution with user input.

pub mod bridge;
pub mod config;
pub mod error;
pub mod files;
pub mod help;
pub mod layout;
pub mod lua_api;
pub mod runtime;
pub mod samples;
pub mod session;
pub mod shell;

pub use bridge::{BridgeHost, Completion, CompletionStatus, ExecutionBridge};
pub use config::PlaygroundConfig;
pub use error::{LuapadError, LuapadResult, ScriptError};
pub use runtime::CancelHandle;
pub use session::{Session, Step};
pub use shell::Shell;
