use super::context::SessionContext;
use mlua::{Function, Lua, Result, Table, Value, Variadic};

/// `io_read` is a Lua closure over `coroutine.yield`, so the suspension happens in Lua code and
/// never crosses a Rust frame. It yields a private token table that only the host can compare against.
const READ_WRAPPER: &str = r#"
local token, note_read = ...
local yield = coroutine.yield
return function()
    note_read()
    -- one result: an empty resume reads as nil
    return (yield(token))
end
"#;

/// Register `print(...)` and `io_read()` (also bound as `read`). Returns the token yielded by `io_read`.
pub fn register(lua: &Lua) -> Result<Table> {
    // print(...) -> tostring() every arg, join with tabs, newline at end, append to session output.
    let print_fn = lua.create_function(|lua, args: Variadic<Value>| {
        let tostring: Function = lua.globals().get("tostring")?;
        let mut parts = Vec::with_capacity(args.len());
        for v in args.iter() {
            let part = match tostring.call::<Value>(v.clone())? {
                Value::String(s) => s.to_string_lossy(),
                _ => "nil".to_string(),
            };
            parts.push(part);
        }
        let line = parts.join("\t") + "\n";
        // tostring may run user __tostring code (which may print), so borrow the context only now.
        let mut ctx = lua
            .app_data_mut::<SessionContext>()
            .ok_or_else(|| mlua::Error::runtime("No session context"))?;
        ctx.output.push_str(&line);
        Ok(())
    })?;
    lua.globals().set("print", print_fn)?;

    let note_read = lua.create_function(|lua, ()| {
        let mut ctx = lua
            .app_data_mut::<SessionContext>()
            .ok_or_else(|| mlua::Error::runtime("No session context"))?;
        ctx.reads += 1;
        tracing::trace!(session = %ctx.session_id, reads = ctx.reads, "io_read suspending");
        Ok(())
    })?;

    let token = lua.create_table()?;
    let read_fn: Function = lua
        .load(READ_WRAPPER)
        .set_name("=io_read")
        .call((token.clone(), note_read))?;
    lua.globals().set("io_read", read_fn.clone())?;
    lua.globals().set("read", read_fn)?;

    Ok(token)
}
