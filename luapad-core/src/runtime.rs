//! Per-session Lua state: Luau sandbox, host capabilities, memory limit and an interrupt watchdog.

use crate::config::PlaygroundConfig;
use crate::error::LuapadResult;
use crate::lua_api;
use crate::lua_api::context::SessionContext;
use mlua::{Lua, Table, VmState};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Cloneable flag that stops a session from any thread.
///
/// A running script observes it through the Luau interrupt; a suspended one
/// is cancelled on the next resume.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub(crate) fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Why the interrupt aborted the script, if it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tripped {
    Cancelled,
    TimedOut(u64),
}

/// State read by the interrupt callback. The session restarts the step clock before each resume.
#[derive(Debug)]
pub struct Watchdog {
    cancel: CancelHandle,
    timeout_ms: Option<u64>,
    step_started_ms: AtomicU64,
    cancelled: AtomicBool,
    timed_out: AtomicBool,
}

impl Watchdog {
    pub fn new(cancel: CancelHandle, timeout_ms: Option<u64>) -> Self {
        Self {
            cancel,
            timeout_ms,
            step_started_ms: AtomicU64::new(now_ms()),
            cancelled: AtomicBool::new(false),
            timed_out: AtomicBool::new(false),
        }
    }

    pub fn start_step(&self) {
        self.step_started_ms.store(now_ms(), Ordering::Relaxed);
        self.cancelled.store(false, Ordering::Relaxed);
        self.timed_out.store(false, Ordering::Relaxed);
    }

    pub fn cancel_handle(&self) -> &CancelHandle {
        &self.cancel
    }

    /// Checked from the interrupt: cancellation wins over the time budget.
    pub fn check(&self) -> Option<Tripped> {
        if self.cancel.is_cancelled() {
            self.cancelled.store(true, Ordering::Relaxed);
            return Some(Tripped::Cancelled);
        }
        let timeout = self.timeout_ms?;
        let elapsed = now_ms().saturating_sub(self.step_started_ms.load(Ordering::Relaxed));
        if elapsed > timeout {
            self.timed_out.store(true, Ordering::Relaxed);
            return Some(Tripped::TimedOut(timeout));
        }
        None
    }

    /// What the interrupt aborted during the last step. A cancel request that arrived after the
    /// script had already failed on its own does not count.
    pub fn tripped(&self) -> Option<Tripped> {
        if self.cancelled.load(Ordering::Relaxed) {
            Some(Tripped::Cancelled)
        } else if self.timed_out.load(Ordering::Relaxed) {
            self.timeout_ms.map(Tripped::TimedOut)
        } else {
            None
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Creates a fully configured Lua state for one session: APIs, SessionContext, sandbox,
/// interrupt and memory limit. Returns the state and the `io_read` token.
pub fn create_session_lua(
    config: &PlaygroundConfig,
    session_id: Uuid,
    watchdog: Arc<Watchdog>,
) -> LuapadResult<(Lua, Table)> {
    let lua = Lua::new();
    lua.set_app_data(SessionContext::new(session_id));
    let read_token = lua_api::register_all(&lua)?;

    if config.sandbox {
        lua.sandbox(true)?;
    }

    lua.set_interrupt(move |_| match watchdog.check() {
        None => Ok(VmState::Continue),
        Some(Tripped::Cancelled) => Err(mlua::Error::runtime("execution cancelled")),
        Some(Tripped::TimedOut(ms)) => Err(mlua::Error::runtime(format!(
            "execution timed out after {}ms",
            ms
        ))),
    });

    lua.set_memory_limit(config.memory_limit_bytes)?;
    Ok((lua, read_token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_handle_clones_share_flag() {
        let a = CancelHandle::new();
        let b = a.clone();
        assert!(!a.is_cancelled());
        b.cancel();
        assert!(a.is_cancelled());
        a.reset();
        assert!(!b.is_cancelled());
    }

    #[test]
    fn test_watchdog_without_timeout_only_trips_on_cancel() {
        let cancel = CancelHandle::new();
        let dog = Watchdog::new(cancel.clone(), None);
        assert_eq!(dog.check(), None);
        cancel.cancel();
        assert_eq!(dog.check(), Some(Tripped::Cancelled));
        assert_eq!(dog.tripped(), Some(Tripped::Cancelled));
    }

    #[test]
    fn test_watchdog_cancel_not_observed_by_interrupt_is_not_a_trip() {
        let cancel = CancelHandle::new();
        let dog = Watchdog::new(cancel.clone(), None);
        cancel.cancel();
        assert_eq!(dog.tripped(), None);
        assert_eq!(dog.check(), Some(Tripped::Cancelled));
        assert_eq!(dog.tripped(), Some(Tripped::Cancelled));
        dog.start_step();
        assert_eq!(dog.tripped(), None);
    }

    #[test]
    fn test_watchdog_zero_budget_times_out() {
        let dog = Watchdog::new(CancelHandle::new(), Some(0));
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert_eq!(dog.check(), Some(Tripped::TimedOut(0)));
        assert_eq!(dog.tripped(), Some(Tripped::TimedOut(0)));
        dog.start_step();
        assert_eq!(dog.tripped(), None);
    }

    #[test]
    fn test_session_lua_has_capabilities() {
        let dog = Arc::new(Watchdog::new(CancelHandle::new(), None));
        let (lua, _) = create_session_lua(&PlaygroundConfig::default(), Uuid::nil(), dog).unwrap();
        let kinds: (String, String, String) = lua
            .load("return type(print), type(io_read), type(os_time)")
            .eval()
            .unwrap();
        assert_eq!(kinds, ("function".into(), "function".into(), "function".into()));
    }

    #[test]
    fn test_interrupt_aborts_loop_when_cancelled() {
        let cancel = CancelHandle::new();
        cancel.cancel();
        let dog = Arc::new(Watchdog::new(cancel, None));
        let (lua, _) = create_session_lua(&PlaygroundConfig::default(), Uuid::nil(), dog).unwrap();
        let err = lua.load("while true do end").exec().unwrap_err();
        assert!(err.to_string().contains("execution cancelled"));
    }
}
