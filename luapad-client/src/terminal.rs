//! Drives a [`Shell`] against a line-oriented terminal.

use luapad_core::Shell;
use std::io::{self, BufRead, Write};

pub const PROMPT: &str = "> ";

/// Runs the editor's program: streams console output to `out` and answers every
/// `io_read` with one line from `input` (end of input answers nil).
pub fn run_program<R: BufRead, W: Write>(shell: &mut Shell, mut input: R, out: &mut W) -> io::Result<()> {
    let cancel = shell.cancel_handle();
    shell.run();

    loop {
        write!(out, "{}", shell.take_unrendered())?;
        if !shell.is_awaiting_input() {
            break;
        }
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let mut line = String::new();
        let n = input.read_line(&mut line)?;
        if cancel.is_cancelled() {
            shell.stop();
            continue;
        }
        if n == 0 {
            shell.submit_eof();
        } else {
            shell.submit(line.trim_end_matches(['\r', '\n']));
        }
    }

    if !shell.output().ends_with('\n') && !shell.output().is_empty() {
        writeln!(out)?;
    }
    out.flush()
}
