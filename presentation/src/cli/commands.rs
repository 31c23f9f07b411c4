//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for bizbrain
#[derive(Parser, Debug)]
#[command(name = "bizbrain")]
#[command(author, version, about = "BizBrain - an AI business consultant in your terminal")]
#[command(long_about = r#"
BizBrain chats with a Gemini model set up as a business strategy consultant.
Advice is tailored to your business profile (industry, company size, target
market, primary goal), which is kept together with the chat history between
runs.

Without a question, an interactive session starts. Type /help inside it for
commands. End a line with \ to continue on the next line.

The API key is read from GEMINI_API_KEY (or API_KEY).

Configuration files are loaded from (in priority order):
1. BIZBRAIN_* env vars    e.g. BIZBRAIN_GEMINI__MODEL=gemini-2.5-pro
2. --config <path>        Explicit config file
3. ./bizbrain.toml        Project-level config
4. ~/.config/bizbrain/config.toml   Global config

Example:
  bizbrain
  bizbrain "Give me 3 ways to reduce churn for a small SaaS"
  bizbrain --model gemini-2.5-pro --temperature 0.3
  bizbrain --export
"#)]
pub struct Cli {
    /// Send a single question, print the answer, and exit
    pub question: Option<String>,

    /// Model to use (e.g. gemini-3-flash-preview, gemini-2.5-pro)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Sampling temperature (0.0 - 2.0)
    #[arg(short, long, value_name = "TEMP")]
    pub temperature: Option<f32>,

    /// Directory for the saved profile and chat history
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Export the chat history as a text transcript and exit
    #[arg(long)]
    pub export: bool,

    /// Clear the chat history and exit
    #[arg(long)]
    pub clear: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the welcome banner and thinking indicator
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
