//! Streaming message renderer
//!
//! [`TerminalObserver`] follows the session controller and prints the
//! assistant reply as it streams. Text is formatted a line at a time, so a
//! line appears once its `\n` arrives (or when the reply settles).

use crate::output::console::ConsoleFormatter;
use crate::progress::spinner::ThinkingSpinner;
use bizbrain_application::{ExchangeOutcome, SessionObserver};
use bizbrain_domain::{Message, Role, StreamingFormatter};
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct RenderState {
    formatter: StreamingFormatter,
    spinner: Option<ThinkingSpinner>,
}

impl RenderState {
    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.stop();
        }
    }
}

/// Prints streamed replies to a writer (stdout by default).
pub struct TerminalObserver<W: Write + Send = io::Stdout> {
    out: Mutex<W>,
    state: Mutex<RenderState>,
    show_spinner: bool,
}

impl TerminalObserver<io::Stdout> {
    pub fn stdout(show_spinner: bool) -> Self {
        Self::with_writer(io::stdout(), show_spinner)
    }
}

impl<W: Write + Send> TerminalObserver<W> {
    pub fn with_writer(out: W, show_spinner: bool) -> Self {
        Self {
            out: Mutex::new(out),
            state: Mutex::new(RenderState::default()),
            show_spinner,
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn state(&self) -> MutexGuard<'_, RenderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_lines(&self, lines: &[String]) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        for line in lines {
            let _ = writeln!(out, "{line}");
        }
        let _ = out.flush();
    }
}

impl<W: Write + Send> SessionObserver for TerminalObserver<W> {
    fn on_message_appended(&self, message: &Message) {
        if message.role != Role::Assistant {
            return;
        }
        {
            let mut state = self.state();
            state.stop_spinner();
            state.formatter = StreamingFormatter::new();
        }
        self.write_lines(&[String::new(), ConsoleFormatter::role_label(message.role)]);
        if self.show_spinner && message.is_empty() {
            self.state().spinner = Some(ThinkingSpinner::start());
        }
    }

    fn on_fragment(&self, _message_id: &str, fragment: &str) {
        let nodes = {
            let mut state = self.state();
            state.stop_spinner();
            state.formatter.push(fragment)
        };
        let lines: Vec<String> = nodes.iter().map(ConsoleFormatter::render_node).collect();
        if !lines.is_empty() {
            self.write_lines(&lines);
        }
    }

    fn on_settled(&self, message: &Message, outcome: ExchangeOutcome) {
        let formatter = {
            let mut state = self.state();
            state.stop_spinner();
            std::mem::take(&mut state.formatter)
        };

        let mut lines = Vec::new();
        match outcome {
            ExchangeOutcome::Complete => {
                if !formatter.pending().is_empty() {
                    lines.push(ConsoleFormatter::render_node(&formatter.finish()));
                }
            }
            ExchangeOutcome::Errored => {
                lines.push(ConsoleFormatter::error_line(&message.content));
            }
        }
        lines.push(String::new());
        self.write_lines(&lines);
    }
}
