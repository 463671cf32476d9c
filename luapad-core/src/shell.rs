//! The playground window as plain state: editor, console, controls, help modal, split layout.
//!
//! A front end renders these fields and forwards user actions to the methods
//! here; the shell drives the [`ExecutionBridge`] and turns its callbacks into
//! console text and control visibility.

use crate::bridge::{BridgeHost, Completion, CompletionStatus, ExecutionBridge};
use crate::config::PlaygroundConfig;
use crate::error::LuapadResult;
use crate::files;
use crate::layout::SplitLayout;
use crate::runtime::CancelHandle;
use crate::samples;
use std::path::{Path, PathBuf};

pub const NO_CODE_MESSAGE: &str = "No code entered.";
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown runtime error";
pub const INTERRUPTED_BANNER: &str = "\n\n--- Execution interrupted ---";

/// Output console plus the run/stop/input controls.
#[derive(Debug, Clone)]
pub struct Console {
    output: String,
    /// Text not yet shown by a streaming front end (see [`Shell::take_unrendered`]).
    unrendered: String,
    max_output_bytes: usize,
    pub error_style: bool,
    pub run_visible: bool,
    pub stop_visible: bool,
    pub input_visible: bool,
    pub input_value: String,
    last_completion: Option<Completion>,
}

impl Console {
    pub fn new(max_output_bytes: usize) -> Self {
        Self {
            output: String::new(),
            unrendered: String::new(),
            max_output_bytes,
            error_style: false,
            run_visible: true,
            stop_visible: false,
            input_visible: false,
            input_value: String::new(),
            last_completion: None,
        }
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn last_completion(&self) -> Option<&Completion> {
        self.last_completion.as_ref()
    }

    fn push(&mut self, text: &str) {
        self.output.push_str(text);
        self.unrendered.push_str(text);
        truncate_front(&mut self.output, self.max_output_bytes);
        truncate_front(&mut self.unrendered, self.max_output_bytes);
    }

    /// Typed input goes into the transcript but not to a terminal, which already echoed it.
    fn echo_input(&mut self, value: &str) {
        self.output.push_str(value);
        self.output.push('\n');
        truncate_front(&mut self.output, self.max_output_bytes);
    }

    fn show_running(&mut self) {
        self.output.clear();
        self.error_style = false;
        self.last_completion = None;
        self.run_visible = false;
        self.stop_visible = true;
    }

    fn show_idle(&mut self) {
        self.input_visible = false;
        self.input_value.clear();
        self.run_visible = true;
        self.stop_visible = false;
    }
}

impl BridgeHost for Console {
    fn clear_output(&mut self) {
        self.output.clear();
    }

    fn append_output(&mut self, text: &str) {
        self.push(text);
    }

    fn request_input(&mut self) {
        self.input_visible = true;
    }

    fn completion(&mut self, completion: Completion) {
        match completion.status {
            CompletionStatus::Ok => {}
            CompletionStatus::Error => {
                let message = completion
                    .message
                    .as_deref()
                    .filter(|m| !m.is_empty())
                    .unwrap_or(UNKNOWN_ERROR_MESSAGE);
                self.push(&format!("\nError: {}", message));
                self.error_style = true;
            }
            CompletionStatus::Cancelled => self.push(INTERRUPTED_BANNER),
        }
        self.show_idle();
        self.last_completion = Some(completion);
    }
}

/// Drops the oldest text so `s` fits in `max` bytes, cutting at a char boundary.
fn truncate_front(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut cut = s.len() - max;
    while !s.is_char_boundary(cut) {
        cut += 1;
    }
    s.drain(..cut);
}

pub struct Shell {
    bridge: ExecutionBridge<Console>,
    editor: String,
    help_open: bool,
    layout: SplitLayout,
}

impl Shell {
    /// Opens with the sample program in the editor.
    pub fn new(config: PlaygroundConfig) -> Self {
        let console = Console::new(config.max_output_bytes);
        let layout = SplitLayout::new(config.min_panel_width);
        Self {
            bridge: ExecutionBridge::new(config, console),
            editor: samples::GUESSING_GAME.to_string(),
            help_open: false,
            layout,
        }
    }

    pub fn console(&self) -> &Console {
        self.bridge.host()
    }

    pub fn output(&self) -> &str {
        self.console().output()
    }

    /// Output appended since the last call, for front ends that stream to a terminal.
    pub fn take_unrendered(&mut self) -> String {
        std::mem::take(&mut self.bridge.host_mut().unrendered)
    }

    pub fn editor(&self) -> &str {
        &self.editor
    }

    pub fn set_editor(&mut self, text: impl Into<String>) {
        self.editor = text.into();
    }

    pub fn layout(&self) -> &SplitLayout {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut SplitLayout {
        &mut self.layout
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.bridge.cancel_handle()
    }

    pub fn is_running(&self) -> bool {
        self.bridge.is_active()
    }

    pub fn is_awaiting_input(&self) -> bool {
        self.bridge.is_awaiting_input()
    }

    /// Run button.
    pub fn run(&mut self) {
        if self.bridge.is_active() {
            return;
        }
        self.bridge.host_mut().show_running();
        if self.editor.trim().is_empty() {
            let console = self.bridge.host_mut();
            console.push(NO_CODE_MESSAGE);
            console.show_idle();
            return;
        }
        let code = self.editor.clone();
        self.bridge.start(&code);
    }

    /// Stop button. The console gets the interruption banner.
    pub fn stop(&mut self) {
        self.bridge.cancel();
    }

    /// Input field edited.
    pub fn set_input(&mut self, value: impl Into<String>) {
        self.bridge.host_mut().input_value = value.into();
    }

    /// Submit button / Enter: answers the pending `io_read` with the input field's text.
    pub fn submit_input(&mut self) {
        if !self.bridge.is_awaiting_input() {
            return;
        }
        let console = self.bridge.host_mut();
        let value = std::mem::take(&mut console.input_value);
        console.input_visible = false;
        console.echo_input(&value);
        self.bridge.resume(Some(&value));
    }

    pub fn submit(&mut self, value: impl Into<String>) {
        self.set_input(value);
        self.submit_input();
    }

    /// End of input: the pending `io_read` returns nil.
    pub fn submit_eof(&mut self) {
        if !self.bridge.is_awaiting_input() {
            return;
        }
        let console = self.bridge.host_mut();
        console.input_value.clear();
        console.input_visible = false;
        self.bridge.resume(None);
    }

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub fn open_help(&mut self) {
        self.help_open = true;
    }

    pub fn close_help(&mut self) {
        self.help_open = false;
    }

    /// Clicks on the modal backdrop close it; clicks inside the dialog do not.
    pub fn modal_clicked(&mut self, on_backdrop: bool) {
        if on_backdrop {
            self.close_help();
        }
    }

    pub fn import_text(&mut self, text: impl Into<String>) {
        self.editor = text.into();
    }

    pub fn import_file(&mut self, path: &Path) -> LuapadResult<()> {
        self.editor = files::import(path)?;
        tracing::debug!(path = %path.display(), "imported script");
        Ok(())
    }

    /// Saves the editor. A directory target gets the configured file name (`code.lua`).
    pub fn export_to(&self, target: &Path) -> LuapadResult<PathBuf> {
        files::export(&self.editor, target, &self.bridge.config().export_file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell_with(code: &str) -> Shell {
        let mut shell = Shell::new(PlaygroundConfig::default());
        shell.set_editor(code);
        shell
    }

    #[test]
    fn test_new_shell_starts_idle_with_sample() {
        let shell = Shell::new(PlaygroundConfig::default());
        assert_eq!(shell.editor(), samples::GUESSING_GAME);
        assert!(shell.console().run_visible);
        assert!(!shell.console().stop_visible);
        assert!(!shell.console().input_visible);
        assert!(!shell.help_open());
    }

    #[test]
    fn test_blank_editor_reports_no_code() {
        let mut shell = shell_with("   \n");
        shell.run();
        assert_eq!(shell.output(), NO_CODE_MESSAGE);
        assert!(shell.console().run_visible);
        assert!(!shell.is_running());
    }

    #[test]
    fn test_waiting_for_input_shows_input_and_stop() {
        let mut shell = shell_with("print(io_read())");
        shell.run();
        assert!(shell.is_awaiting_input());
        assert!(shell.console().input_visible);
        assert!(shell.console().stop_visible);
        assert!(!shell.console().run_visible);
    }

    #[test]
    fn test_submit_echoes_and_resumes() {
        let mut shell = shell_with("print('>' .. io_read())");
        shell.run();
        shell.set_input("abc");
        shell.submit_input();
        assert_eq!(shell.output(), "abc\n>abc\n");
        assert!(!shell.console().input_visible);
        assert_eq!(shell.console().input_value, "");
        assert!(shell.console().run_visible);
    }

    #[test]
    fn test_submit_when_idle_is_ignored() {
        let mut shell = shell_with("print(1)");
        shell.submit("x");
        assert_eq!(shell.output(), "");
    }

    #[test]
    fn test_error_appends_marker_and_sets_style() {
        let mut shell = shell_with("print('before')\nerror('boom')");
        shell.run();
        assert_eq!(shell.output(), "before\n\nError: code.lua:2: boom");
        assert!(shell.console().error_style);
        assert_eq!(
            shell.console().last_completion().map(|c| c.status),
            Some(CompletionStatus::Error)
        );
    }

    #[test]
    fn test_rerun_clears_error_style() {
        let mut shell = shell_with("error('x')");
        shell.run();
        assert!(shell.console().error_style);
        shell.set_editor("print('ok')");
        shell.run();
        assert!(!shell.console().error_style);
        assert_eq!(shell.output(), "ok\n");
    }

    #[test]
    fn test_stop_appends_banner_and_frees_slot() {
        let mut shell = shell_with("print('waiting')\nprint(io_read())");
        shell.run();
        shell.stop();
        assert_eq!(shell.output(), format!("waiting\n{}", INTERRUPTED_BANNER));
        assert!(!shell.is_running());
        assert!(!shell.console().input_visible);
        shell.set_editor("print('again')");
        shell.run();
        assert_eq!(shell.output(), "again\n");
    }

    #[test]
    fn test_stop_when_idle_does_nothing() {
        let mut shell = shell_with("print(1)");
        shell.run();
        shell.stop();
        assert_eq!(shell.output(), "1\n");
    }

    #[test]
    fn test_eof_reads_nil() {
        let mut shell = shell_with("print(io_read() == nil)");
        shell.run();
        shell.submit_eof();
        assert_eq!(shell.output(), "true\n");
    }

    #[test]
    fn test_unrendered_skips_echo() {
        let mut shell = shell_with("print('q'); print(io_read())");
        shell.run();
        assert_eq!(shell.take_unrendered(), "q\n");
        shell.submit("a");
        assert_eq!(shell.take_unrendered(), "a\n");
        assert_eq!(shell.output(), "q\na\na\n");
    }

    #[test]
    fn test_help_modal() {
        let mut shell = Shell::new(PlaygroundConfig::default());
        shell.open_help();
        shell.modal_clicked(false);
        assert!(shell.help_open());
        shell.modal_clicked(true);
        assert!(!shell.help_open());
        shell.open_help();
        shell.close_help();
        assert!(!shell.help_open());
    }

    #[test]
    fn test_output_is_bounded() {
        let config = PlaygroundConfig {
            max_output_bytes: 8,
            ..PlaygroundConfig::default()
        };
        let mut shell = Shell::new(config);
        shell.set_editor("print('0123456789')");
        shell.run();
        assert_eq!(shell.output(), "3456789\n");
    }

    #[test]
    fn test_truncate_front_respects_char_boundary() {
        let mut s = "aé".repeat(3);
        truncate_front(&mut s, 4);
        assert_eq!(s, "aé");
    }

    #[test]
    fn test_import_and_export() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("in.lua");
        std::fs::write(&src, "print('imported')").unwrap();
        let mut shell = Shell::new(PlaygroundConfig::default());
        shell.import_file(&src).unwrap();
        assert_eq!(shell.editor(), "print('imported')");
        let out = shell.export_to(dir.path()).unwrap();
        assert_eq!(out, dir.path().join("code.lua"));
        assert_eq!(std::fs::read_to_string(out).unwrap(), "print('imported')");
    }
}
