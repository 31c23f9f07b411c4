//! Slash command parsing for the chat REPL

use bizbrain_domain::{ProfileField, SUGGESTED_PROMPTS};
use std::path::PathBuf;

/// What `/profile` should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileAction {
    Show,
    Set(ProfileField, String),
    Unset(ProfileField),
}

/// A parsed slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Profile(ProfileAction),
    Industries,
    Sizes,
    Prompts,
    /// 1-based index into the suggested prompts
    Prompt(usize),
    History,
    Export(Option<PathBuf>),
    Clear,
    Context,
    Quit,
}

impl ReplCommand {
    /// Parse a line starting with `/`. The error is a message for the user.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        match name {
            "/help" | "/h" | "/?" => Ok(Self::Help),
            "/quit" | "/exit" | "/q" => Ok(Self::Quit),
            "/industries" => Ok(Self::Industries),
            "/sizes" => Ok(Self::Sizes),
            "/prompts" => Ok(Self::Prompts),
            "/history" => Ok(Self::History),
            "/clear" => Ok(Self::Clear),
            "/context" => Ok(Self::Context),
            "/export" => Ok(Self::Export(
                (!rest.is_empty()).then(|| PathBuf::from(rest)),
            )),
            "/prompt" => parse_prompt_index(rest).map(Self::Prompt),
            "/profile" => parse_profile(rest).map(Self::Profile),
            _ => Err(format!(
                "Unknown command: {name}\nType /help for available commands"
            )),
        }
    }
}

fn parse_prompt_index(arg: &str) -> Result<usize, String> {
    let usage = || format!("Usage: /prompt <1-{}>", SUGGESTED_PROMPTS.len());
    let index: usize = arg.parse().map_err(|_| usage())?;
    if (1..=SUGGESTED_PROMPTS.len()).contains(&index) {
        Ok(index)
    } else {
        Err(usage())
    }
}

fn parse_profile(args: &str) -> Result<ProfileAction, String> {
    if args.is_empty() {
        return Ok(ProfileAction::Show);
    }
    let (field, value) = match args.split_once(char::is_whitespace) {
        Some((field, value)) => (field, value.trim()),
        None => (args, ""),
    };
    let field: ProfileField = field.parse().map_err(|e| format!("{e}"))?;
    if value.is_empty() {
        Ok(ProfileAction::Unset(field))
    } else {
        Ok(ProfileAction::Set(field, value.to_string()))
    }
}
