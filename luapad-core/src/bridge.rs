//! Execution bridge: the single owner of the active script session.
//!
//! `start` compiles and runs code until it completes, fails, or suspends in
//! `io_read`. A suspended session waits for `resume` (feeding the read result
//! back) or `cancel`. Everything the script produces reaches the host through
//! [`BridgeHost`] callbacks, in order: output first, then the step's outcome.

use crate::config::PlaygroundConfig;
use crate::error::ScriptError;
use crate::runtime::CancelHandle;
use crate::session::{Session, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    Ok,
    Error,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub status: CompletionStatus,
    pub message: Option<String>,
}

impl Completion {
    pub fn ok() -> Self {
        Self {
            status: CompletionStatus::Ok,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: CompletionStatus::Error,
            message: Some(message.into()),
        }
    }

    pub fn cancelled() -> Self {
        Self {
            status: CompletionStatus::Cancelled,
            message: None,
        }
    }

    fn from_script_error(err: ScriptError) -> Self {
        match err {
            ScriptError::Cancelled => Self::cancelled(),
            other => Self::error(other.to_string()),
        }
    }
}

/// Callbacks from the bridge to whatever renders the playground.
pub trait BridgeHost {
    /// A new session is starting; previous output should go.
    fn clear_output(&mut self);
    fn append_output(&mut self, text: &str);
    /// The script is blocked in `io_read` until `resume` is called.
    fn request_input(&mut self);
    /// The session is gone. Emitted exactly once per `start` that was not a no-op.
    fn completion(&mut self, completion: Completion);
}

pub struct ExecutionBridge<H: BridgeHost> {
    config: PlaygroundConfig,
    host: H,
    session: Option<Session>,
    cancel: CancelHandle,
}

impl<H: BridgeHost> ExecutionBridge<H> {
    pub fn new(config: PlaygroundConfig, host: H) -> Self {
        Self {
            config,
            host,
            session: None,
            cancel: CancelHandle::new(),
        }
    }

    pub fn config(&self) -> &PlaygroundConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Tears down any session and hands back the host.
    pub fn into_host(mut self) -> H {
        self.session = None;
        self.host
    }

    /// Handle that stops the active session from another thread.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_awaiting_input(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_awaiting_input)
    }

    /// Starts a session. No-op while another one is active.
    pub fn start(&mut self, code: &str) {
        if self.session.is_some() {
            tracing::debug!("start ignored: a session is already active");
            return;
        }
        self.host.clear_output();
        self.cancel.reset();

        match Session::compile(&self.config, code, self.cancel.clone()) {
            Ok(session) => {
                self.session = Some(session);
                self.step(None);
            }
            Err(err) => {
                tracing::warn!(error = %err, "compile failed");
                self.host.completion(Completion::from_script_error(err));
            }
        }
    }

    /// Answers the pending `io_read`. No-op unless the session is awaiting input.
    pub fn resume(&mut self, value: Option<&str>) {
        if !self.is_awaiting_input() {
            return;
        }
        if self.cancel.is_cancelled() {
            self.cancel();
            return;
        }
        self.step(value);
    }

    /// Drops the active session. The host receives a `Cancelled` completion; nothing more
    /// is ever emitted for that session.
    pub fn cancel(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::debug!(session = %session.id, "session cancelled");
            drop(session);
            self.host.completion(Completion::cancelled());
        }
    }

    fn step(&mut self, input: Option<&str>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let step = session.resume(input);
        let output = session.take_output();
        if !output.is_empty() {
            self.host.append_output(&output);
        }

        match step {
            Step::AwaitingInput => self.host.request_input(),
            Step::Completed => {
                self.session = None;
                self.host.completion(Completion::ok());
            }
            Step::Errored(err) => {
                self.session = None;
                self.host.completion(Completion::from_script_error(err));
            }
        }
    }
}
