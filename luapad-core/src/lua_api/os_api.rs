use mlua::{Lua, Result};

/// Register `os_time()` -> integer seconds since the Unix epoch (host wall clock).
pub fn register(lua: &Lua) -> Result<()> {
    lua.globals().set(
        "os_time",
        lua.create_function(|_, ()| Ok(chrono::Utc::now().timestamp()))?,
    )?;
    Ok(())
}
