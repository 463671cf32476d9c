pub mod context;
pub mod io_api;
pub mod os_api;

use mlua::{Lua, Result, Table};

/// Register every host capability (`print`, `io_read`, `os_time`) on a session's Lua state.
/// Returns the token that `io_read` yields, so the caller can tell its suspensions apart.
pub fn register_all(lua: &Lua) -> Result<Table> {
    let read_token = io_api::register(lua)?;
    os_api::register(lua)?;
    Ok(read_token)
}
