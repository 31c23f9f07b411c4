//! Console output formatter for chat content

use bizbrain_domain::{
    BusinessProfile, COMPANY_SIZES, DisplayNode, INDUSTRIES, InlineSpan, Message, Model,
    ProfileField, Role, SUGGESTED_PROMPTS, format,
};
use colored::Colorize;

/// Formats display nodes, messages and REPL screens for the console
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Turn colored output off for the whole process.
    pub fn set_color(enabled: bool) {
        if !enabled {
            colored::control::set_override(false);
        }
    }

    /// Render one display node as a single terminal line (no trailing newline).
    pub fn render_node(node: &DisplayNode) -> String {
        match node {
            DisplayNode::Heading { level: 1, text } => text.bold().underline().to_string(),
            DisplayNode::Heading { level: 2, text } => text.bold().cyan().to_string(),
            DisplayNode::Heading { text, .. } => text.bold().to_string(),
            DisplayNode::ListItem { spans } => {
                format!("  {} {}", "•".cyan(), Self::render_spans(spans))
            }
            DisplayNode::Paragraph { spans } => Self::render_spans(spans),
        }
    }

    pub fn render_spans(spans: &[InlineSpan]) -> String {
        spans
            .iter()
            .map(|span| {
                if span.emphasized {
                    span.text.bold().to_string()
                } else {
                    span.text.clone()
                }
            })
            .collect()
    }

    /// Render a whole text block, one line per display node.
    pub fn render_text(text: &str) -> String {
        format(text)
            .iter()
            .map(Self::render_node)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn role_label(role: Role) -> String {
        match role {
            Role::User => "You".green().bold().to_string(),
            Role::Assistant => "BizBrain".cyan().bold().to_string(),
            Role::System => "System".yellow().bold().to_string(),
        }
    }

    pub fn error_line(text: &str) -> String {
        text.red().to_string()
    }

    pub fn notice(text: &str) -> String {
        text.dimmed().to_string()
    }

    /// Banner shown when the REPL starts.
    pub fn welcome(model: &Model, profile: &BusinessProfile, restored: usize) -> String {
        let mut output = String::new();
        output.push('\n');
        output.push_str("╭─────────────────────────────────────────────╮\n");
        output.push_str("│     BizBrain - AI Business Consultant       │\n");
        output.push_str("╰─────────────────────────────────────────────╯\n\n");
        output.push_str(&format!("{} {}\n", "Model:".cyan().bold(), model));

        if profile.is_empty() {
            output.push_str(&format!(
                "{} not set (try {})\n",
                "Profile:".cyan().bold(),
                "/profile industry <n>".bold()
            ));
        } else {
            output.push_str(&format!(
                "{} {}\n",
                "Profile:".cyan().bold(),
                Self::profile_summary(profile)
            ));
        }
        output.push('\n');

        if restored == 0 {
            output.push_str(&Self::prompts());
        } else {
            output.push_str(&format!(
                "{} messages restored from your last session. /history to review, /clear to start over.\n",
                restored
            ));
        }
        output.push_str(&format!(
            "\n{}\n",
            Self::notice("Type /help for commands. End a line with \\ to continue it.")
        ));
        output
    }

    /// One-line profile summary, skipping unset fields.
    pub fn profile_summary(profile: &BusinessProfile) -> String {
        ProfileField::ALL
            .iter()
            .map(|f| profile.get(*f))
            .filter(|v| !v.is_empty())
            .collect::<Vec<_>>()
            .join(" · ")
    }

    /// The profile editor view.
    pub fn profile(profile: &BusinessProfile) -> String {
        let mut output = format!("\n{}\n", "Business Profile".cyan().bold());
        for field in ProfileField::ALL {
            let value = profile.get(field);
            let shown = if value.is_empty() {
                "(not set)".dimmed().to_string()
            } else {
                value.to_string()
            };
            output.push_str(&format!(
                "  {:<14} {}  {}\n",
                format!("{}:", field.label()),
                shown,
                Self::notice(&format!("[{}]", field.as_str()))
            ));
        }
        output.push_str(&format!(
            "\n{}\n",
            Self::notice("Edit with /profile <field> <value>; omit the value to clear it.")
        ));
        output
    }

    /// Numbered list of a catalogue.
    pub fn choices(title: &str, items: &[&str]) -> String {
        let mut output = format!("\n{}\n", title.cyan().bold());
        for (i, item) in items.iter().enumerate() {
            output.push_str(&format!("  {:>2}. {}\n", i + 1, item));
        }
        output
    }

    pub fn industries() -> String {
        Self::choices("Industries", INDUSTRIES)
    }

    pub fn company_sizes() -> String {
        Self::choices("Company sizes", COMPANY_SIZES)
    }

    /// Suggested quick-action prompts.
    pub fn prompts() -> String {
        let mut output = format!("{}\n", "Suggested prompts:".cyan().bold());
        for (i, prompt) in SUGGESTED_PROMPTS.iter().enumerate() {
            output.push_str(&format!(
                "  /prompt {}  {}\n",
                i + 1,
                prompt.label.bold()
            ));
        }
        output
    }

    /// Full chat log, each message under its role label.
    pub fn history(messages: &[Message]) -> String {
        if messages.is_empty() {
            return format!("{}\n", Self::notice("No messages yet."));
        }
        messages
            .iter()
            .map(|m| format!("{}\n{}\n", Self::role_label(m.role), Self::render_text(&m.content)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn help() -> String {
        let mut output = format!("\n{}\n", "Commands:".cyan().bold());
        for (usage, description) in [
            ("/help, /h, /?", "Show this help"),
            ("/profile", "Show your business profile"),
            ("/profile <field> <value>", "Set industry, size, market or goal"),
            ("/profile <field>", "Clear a profile field"),
            ("/industries", "List industries (use name or number)"),
            ("/sizes", "List company sizes (use name or number)"),
            ("/prompts", "List suggested prompts"),
            ("/prompt <n>", "Send suggested prompt n"),
            ("/history", "Show the conversation so far"),
            ("/export [dir]", "Save the conversation as a text file"),
            ("/clear", "Clear history and start a new conversation"),
            ("/context", "Show the active system instruction"),
            ("/quit, /exit, /q", "Exit"),
        ] {
            output.push_str(&format!("  {:<26} - {}\n", usage, description));
        }
        output.push_str(&format!(
            "\n{} {}\n",
            "Known models:".cyan().bold(),
            Model::known_models()
                .iter()
                .map(|m| m.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ));
        output.push_str(&format!(
            "{}\n",
            Self::notice("Profile changes apply to the next conversation (after /clear).")
        ));
        output
    }
}
