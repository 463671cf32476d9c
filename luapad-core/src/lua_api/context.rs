use uuid::Uuid;

/// Per-session state set via `lua.set_app_data()` when the session's Lua state is built.
/// Each session owns its own Lua state, so nothing here is shared between sessions.
pub struct SessionContext {
    pub session_id: Uuid,
    /// Text written by `print` since the host last drained it.
    pub output: String,
    /// Number of `io_read` calls made so far.
    pub reads: u64,
}

impl SessionContext {
    pub fn new(session_id: Uuid) -> Self {
        Self {
            session_id,
            output: String::new(),
            reads: 0,
        }
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}
