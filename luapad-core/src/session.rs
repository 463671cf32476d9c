use crate::config::PlaygroundConfig;
use crate::error::ScriptError;
use crate::lua_api::context::SessionContext;
use crate::runtime::{self, CancelHandle, Tripped, Watchdog};
use mlua::{Lua, MultiValue, Table, Thread, ThreadStatus, Value};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Outcome of one start/resume step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Completed,
    Errored(ScriptError),
    /// Suspended inside `io_read`; feed the answer to the next `resume`.
    AwaitingInput,
}

/// One run of user code: its own Lua state plus the thread holding the suspended execution.
pub struct Session {
    pub id: Uuid,
    // Lua values are declared before the state so they drop first.
    thread: Thread,
    read_token: Table,
    lua: Lua,
    watchdog: Arc<Watchdog>,
    awaiting_input: bool,
    started: Instant,
}

impl Session {
    /// Builds the Lua state and compiles `code`. Nothing runs until the first `resume`.
    pub fn compile(
        config: &PlaygroundConfig,
        code: &str,
        cancel: CancelHandle,
    ) -> Result<Self, ScriptError> {
        let id = Uuid::new_v4();
        let watchdog = Arc::new(Watchdog::new(cancel, config.step_timeout_ms));
        let (lua, read_token) = runtime::create_session_lua(config, id, watchdog.clone())
            .map_err(|e| ScriptError::Runtime(e.to_string()))?;

        let func = lua
            .load(code)
            .set_name(format!("={}", config.chunk_name))
            .into_function()
            .map_err(|e| ScriptError::compile(&e))?;
        let thread = lua
            .create_thread(func)
            .map_err(|e| ScriptError::runtime(&e))?;

        tracing::debug!(session = %id, "session compiled");
        Ok(Self {
            id,
            thread,
            read_token,
            lua,
            watchdog,
            awaiting_input: false,
            started: Instant::now(),
        })
    }

    /// Runs until the script completes, fails, or suspends in `io_read`.
    /// `input` becomes the return value of the pending `io_read` (None = nil).
    pub fn resume(&mut self, input: Option<&str>) -> Step {
        if self.thread.status() != ThreadStatus::Resumable {
            return Step::Errored(ScriptError::Runtime(
                "cannot resume a finished session".to_string(),
            ));
        }
        self.awaiting_input = false;
        self.watchdog.start_step();

        let result = match input {
            Some(value) => self.thread.resume::<MultiValue>(value),
            None => self.thread.resume::<MultiValue>(()),
        };

        let step = match result {
            Err(err) => Step::Errored(self.classify(&err)),
            Ok(yielded) => match self.thread.status() {
                ThreadStatus::Resumable if self.is_read_yield(&yielded) => {
                    self.awaiting_input = true;
                    Step::AwaitingInput
                }
                ThreadStatus::Resumable => Step::Errored(ScriptError::Runtime(
                    "attempt to yield outside of io_read".to_string(),
                )),
                _ => Step::Completed,
            },
        };

        match &step {
            Step::Completed => tracing::debug!(
                session = %self.id,
                elapsed_ms = self.started.elapsed().as_millis() as u64,
                "session completed"
            ),
            Step::Errored(err) => tracing::warn!(session = %self.id, error = %err, "session failed"),
            Step::AwaitingInput => tracing::debug!(session = %self.id, "session awaiting input"),
        }
        step
    }

    pub fn is_awaiting_input(&self) -> bool {
        self.awaiting_input
    }

    /// Drains text printed since the last call.
    pub fn take_output(&self) -> String {
        self.lua
            .app_data_mut::<SessionContext>()
            .map(|mut ctx| ctx.take_output())
            .unwrap_or_default()
    }

    /// How many times the script has called `io_read`.
    pub fn reads(&self) -> u64 {
        self.lua
            .app_data_ref::<SessionContext>()
            .map(|ctx| ctx.reads)
            .unwrap_or(0)
    }

    fn is_read_yield(&self, yielded: &MultiValue) -> bool {
        matches!(
            yielded.iter().next(),
            Some(Value::Table(t)) if t.to_pointer() == self.read_token.to_pointer()
        )
    }

    fn classify(&self, err: &mlua::Error) -> ScriptError {
        match self.watchdog.tripped() {
            Some(Tripped::Cancelled) => ScriptError::Cancelled,
            Some(Tripped::TimedOut(timeout_ms)) => ScriptError::TimedOut { timeout_ms },
            None => ScriptError::runtime(err),
        }
    }
}
