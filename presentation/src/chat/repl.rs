//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::chat::command::{ProfileAction, ReplCommand};
use crate::config::ReplConfig;
use crate::output::console::ConsoleFormatter;
use bizbrain_application::{SessionController, SubmitOutcome, TranscriptSink};
use bizbrain_domain::{ConsultantPrompt, Role, suggested_prompt};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const PROMPT: &str = ">>> ";
const CONTINUATION_PROMPT: &str = "... ";

/// Submit `text`, cancelling the exchange if Ctrl-C arrives before it settles.
pub async fn send_with_interrupt(controller: &SessionController, text: &str) -> SubmitOutcome {
    let cancel = CancellationToken::new();
    let watcher = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    let outcome = controller.submit_with_cancel(text, cancel).await;
    watcher.abort();
    outcome
}

/// Append `line` to `buffer`; returns true when the line ends in `\` and
/// the message continues on the next line.
fn append_line(buffer: &mut String, line: &str) -> bool {
    match line.strip_suffix('\\') {
        Some(head) => {
            buffer.push_str(head);
            buffer.push('\n');
            true
        }
        None => {
            buffer.push_str(line);
            false
        }
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Interactive chat REPL
pub struct ChatRepl {
    controller: Arc<SessionController>,
    sink: Arc<dyn TranscriptSink>,
    config: ReplConfig,
}

impl ChatRepl {
    /// Create a new ChatRepl
    pub fn new(controller: Arc<SessionController>, sink: Arc<dyn TranscriptSink>) -> Self {
        Self {
            controller,
            sink,
            config: ReplConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ReplConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        // Try to load history
        let history_path = self.config.history_path();
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        if self.config.show_welcome {
            print!(
                "{}",
                ConsoleFormatter::welcome(
                    &self.controller.client().settings().model,
                    &self.controller.profile(),
                    self.controller.messages().len(),
                )
            );
        }

        loop {
            let input = match Self::read_message(&mut rl) {
                Ok(input) => input,
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            };

            let trimmed = input.trim();
            if trimmed.is_empty() {
                continue;
            }
            let _ = rl.add_history_entry(trimmed);

            if trimmed.starts_with('/') {
                match ReplCommand::parse(trimmed) {
                    Ok(command) => {
                        if self.handle_command(&mut rl, command).await {
                            break;
                        }
                    }
                    Err(message) => println!("{}", message),
                }
                continue;
            }

            self.send(&input).await;
        }

        // Save history
        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    /// Read one message, following `\` continuations.
    fn read_message(rl: &mut DefaultEditor) -> RlResult<String> {
        let mut buffer = String::new();
        let mut prompt = PROMPT;
        loop {
            let line = rl.readline(prompt)?;
            if !append_line(&mut buffer, &line) {
                return Ok(buffer);
            }
            prompt = CONTINUATION_PROMPT;
        }
    }

    async fn send(&self, text: &str) {
        match send_with_interrupt(&self.controller, text).await {
            SubmitOutcome::Settled { outcome, .. } => debug!(?outcome, "Exchange settled"),
            SubmitOutcome::Ignored(reason) => debug!(?reason, "Submission ignored"),
        }
    }

    /// Handle slash commands. Returns true if should exit.
    async fn handle_command(&self, rl: &mut DefaultEditor, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ReplCommand::Help => print!("{}", ConsoleFormatter::help()),
            ReplCommand::Industries => print!("{}", ConsoleFormatter::industries()),
            ReplCommand::Sizes => print!("{}", ConsoleFormatter::company_sizes()),
            ReplCommand::Prompts => print!("\n{}", ConsoleFormatter::prompts()),
            ReplCommand::History => {
                println!();
                print!("{}", ConsoleFormatter::history(&self.controller.messages()));
            }
            ReplCommand::Profile(action) => self.handle_profile(action).await,
            ReplCommand::Prompt(index) => {
                if let Some(suggested) = suggested_prompt(index) {
                    println!("{} {}", ConsoleFormatter::role_label(Role::User), suggested.prompt);
                    self.send(suggested.prompt).await;
                }
            }
            ReplCommand::Export(dir) => self.export(dir.as_deref()),
            ReplCommand::Clear => self.clear(rl).await,
            ReplCommand::Context => self.show_context().await,
        }
        false
    }

    async fn handle_profile(&self, action: ProfileAction) {
        let result = match &action {
            ProfileAction::Show => {
                print!("{}", ConsoleFormatter::profile(&self.controller.profile()));
                return;
            }
            ProfileAction::Set(field, value) => self.controller.update_profile(*field, value),
            ProfileAction::Unset(field) => self.controller.update_profile(*field, ""),
        };

        match result {
            Ok(()) => {
                let profile = self.controller.profile();
                let summary = ConsoleFormatter::profile_summary(&profile);
                println!(
                    "Profile updated: {}",
                    if summary.is_empty() { "(empty)".to_string() } else { summary }
                );
                if self.controller.client().has_active_session().await {
                    println!(
                        "{}",
                        ConsoleFormatter::notice(
                            "The current conversation keeps its original context; /clear to apply the new profile."
                        )
                    );
                }
            }
            Err(e) => {
                println!("{}", ConsoleFormatter::error_line(&e.to_string()));
                if let ProfileAction::Set(field, _) = action
                    && let Some(choices) = field.choices()
                {
                    print!("{}", ConsoleFormatter::choices(field.label(), choices));
                }
            }
        }
    }

    fn export(&self, dir: Option<&Path>) {
        let dir = dir.map(expand_home);
        match self.controller.export_to_dir(self.sink.as_ref(), dir.as_deref()) {
            Ok(path) => println!("Conversation exported to {}", path.display()),
            Err(e) => {
                warn!(error = %e, "Export failed");
                println!("{}", ConsoleFormatter::error_line(&format!("Export failed: {e}")));
            }
        }
    }

    async fn clear(&self, rl: &mut DefaultEditor) {
        let confirmed = match rl.readline("Clear all chat history? This cannot be undone. [y/N] ") {
            Ok(answer) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        };
        if confirmed {
            self.controller.clear_history().await;
            println!("Chat history cleared. The next message starts a new conversation.");
        } else {
            println!("Cancelled.");
        }
    }

    async fn show_context(&self) {
        match self.controller.client().current_system_instruction().await {
            Some(instruction) => {
                println!("\n{}", ConsoleFormatter::notice("Active conversation context:"));
                println!("{}\n", instruction);
            }
            None => {
                println!(
                    "\n{}",
                    ConsoleFormatter::notice(
                        "No active conversation yet. The next message starts one with:"
                    )
                );
                println!(
                    "{}\n",
                    ConsultantPrompt::system_instruction(&self.controller.profile())
                );
            }
        }
    }
}
