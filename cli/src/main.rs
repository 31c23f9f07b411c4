//! CLI entrypoint for BizBrain
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, anyhow, bail};
use bizbrain_application::{
    ChatSessionClient, ChatSettings, ConversationLogger, ExchangeOutcome, IgnoreReason,
    NoConversationLogger, SessionController, SessionState, StateStore, SubmitOutcome,
    TranscriptSink,
};
use bizbrain_domain::Model;
use bizbrain_infrastructure::{
    ConfigLoader, DEFAULT_API_BASE, FileConfig, FileGeminiConfig, FileStateStore, GeminiConfig,
    GeminiGateway, JsonlConversationLogger, TranscriptWriter, config::expand_path,
};
use bizbrain_presentation::{
    ChatRepl, Cli, ConsoleFormatter, ReplConfig, TerminalObserver, send_with_interrupt,
};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the stderr subscriber and, when `log_dir` is set, a
/// non-blocking file writer. The guard must live until exit.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Initialize logging based on verbosity level; RUST_LOG wins when set
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = |default: &str| {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter(level));

    let Some(dir) = log_dir else {
        tracing_subscriber::registry().with(stderr_layer).init();
        return None;
    };

    if let Err(e) = std::fs::create_dir_all(dir) {
        tracing_subscriber::registry().with(stderr_layer).init();
        warn!("Could not create log directory {}: {}", dir.display(), e);
        return None;
    }

    let appender = tracing_appender::rolling::never(dir, "bizbrain.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(filter(if verbose == 0 { "info" } else { level }));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Some(guard)
}

/// Model and temperature: CLI flags over the config file.
fn chat_settings(cli: &Cli, config: &FileGeminiConfig) -> Result<ChatSettings> {
    let model = match cli.model.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => {
            let Ok(model) = name.parse::<Model>();
            model
        }
        Some(_) => bail!("--model cannot be empty"),
        None => config.parse_model(),
    };

    let temperature = match cli.temperature {
        Some(t) if FileGeminiConfig::TEMPERATURE_RANGE.contains(&t) => t,
        Some(t) => bail!("--temperature must be between 0.0 and 2.0 (got {t})"),
        None => config.temperature(),
    };

    Ok(ChatSettings::new(model).with_temperature(temperature))
}

fn gemini_config(config: &FileGeminiConfig) -> GeminiConfig {
    let api_key = GeminiConfig::api_key_from_env()
        .or_else(|| config.api_key.clone())
        .unwrap_or_default();
    let api_base = config
        .api_base
        .clone()
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

    GeminiConfig::new(api_key)
        .with_api_base(api_base)
        .with_timeout(config.timeout())
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    if cli.no_config {
        return Ok(ConfigLoader::load_defaults());
    }
    ConfigLoader::load(cli.config.as_ref())
        .map_err(|e| anyhow!("Failed to load configuration: {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let config = load_config(&cli)?;
    let data_dir: PathBuf = cli
        .data_dir
        .clone()
        .or_else(|| config.storage.data_dir())
        .unwrap_or_else(FileStateStore::default_dir);

    let log_dir = config.logging.file.then(|| data_dir.join("logs"));
    let _log_guard = init_logging(cli.verbose, log_dir.as_deref());

    info!("Starting BizBrain");
    for issue in config.validate() {
        warn!("Config: {}", issue);
    }
    ConsoleFormatter::set_color(config.output.color && !cli.no_color);

    // === Dependency Injection ===
    let settings = chat_settings(&cli, &config.gemini)?;
    let gateway = Arc::new(GeminiGateway::new(gemini_config(&config.gemini))?);

    let store: Arc<dyn StateStore> = Arc::new(FileStateStore::new(&data_dir));
    info!(data_dir = %data_dir.display(), "Loading session state");
    let state = SessionState::load(store);

    let conversation_logger: Arc<dyn ConversationLogger> = if config.logging.conversation_log {
        match JsonlConversationLogger::in_data_dir(&data_dir) {
            Some(logger) => Arc::new(logger),
            None => Arc::new(NoConversationLogger),
        }
    } else {
        Arc::new(NoConversationLogger)
    };

    let controller = Arc::new(
        SessionController::new(ChatSessionClient::new(gateway, settings), state)
            .with_observer(Arc::new(TerminalObserver::stdout(!cli.quiet)))
            .with_conversation_logger(conversation_logger),
    );
    let sink: Arc<dyn TranscriptSink> = Arc::new(TranscriptWriter::new(config.storage.export_dir()));

    // Maintenance flags run and exit
    if cli.export || cli.clear {
        if cli.export {
            let path = controller.export_to_dir(sink.as_ref(), None)?;
            println!("Conversation exported to {}", path.display());
        }
        if cli.clear {
            controller.clear_history().await;
            println!("Chat history cleared.");
        }
        return Ok(());
    }

    // One-shot mode
    if let Some(question) = cli.question.as_deref() {
        return match send_with_interrupt(&controller, question).await {
            SubmitOutcome::Settled {
                outcome: ExchangeOutcome::Complete,
                ..
            } => Ok(()),
            SubmitOutcome::Settled { .. } => {
                bail!("The request to Gemini failed (run with -v for details)")
            }
            SubmitOutcome::Ignored(IgnoreReason::Blank) => bail!("The question is empty"),
            SubmitOutcome::Ignored(IgnoreReason::Busy) => bail!("Another request is in flight"),
        };
    }

    let repl_config = ReplConfig {
        show_welcome: config.repl.show_welcome && !cli.quiet,
        history_file: config.repl.history_file.as_deref().map(expand_path),
    };
    ChatRepl::new(controller, sink)
        .with_config(repl_config)
        .run()
        .await?;

    Ok(())
}
