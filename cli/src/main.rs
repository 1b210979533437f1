//! CLI entrypoint for tripvote
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use tripvote_application::{
    ActivityLogger, ConsensusConfig, NoScenarioProgress, RunScenarioUseCase, ScenarioProgress,
};
use tripvote_domain::{OutputFormat, PromotionEvent, QuorumRule};
use tripvote_infrastructure::{
    BroadcastPresence, ConfigLoader, ConflictMode, FileConfig, JsonlActivityLogger,
    MemoryCandidateCatalog, MemoryItineraryStore, MemoryMembershipStore, MemoryVoteLedger,
    ScenarioLoader,
};
use tripvote_presentation::{Cli, Command, ConsoleFormatter, ProgressReporter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    // Load configuration before logging so `[logging] file` can take effect
    let config = if cli.no_config {
        Ok(ConfigLoader::load_defaults())
    } else {
        ConfigLoader::load(cli.config.as_ref())
    };
    let log_file = config
        .as_ref()
        .ok()
        .and_then(|c| c.logging.file_path());
    let _log_guard = init_tracing(cli.verbose, log_file.as_deref())?;

    let config = config.map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    check_config(&config)?;
    info!("Starting tripvote");

    if !config.output.color {
        ConsoleFormatter::set_color(false);
    }

    match cli.command {
        Some(Command::Simulate {
            file,
            output,
            quiet,
        }) => {
            let format = config.output.resolve_format(output.map(OutputFormat::from));
            simulate(&config, &file, format, quiet).await
        }
        Some(Command::Threshold { members, rule }) => {
            let rule = match rule {
                Some(rule) => rule
                    .parse::<QuorumRule>()
                    .with_context(|| format!("Invalid --rule '{}'", rule))?,
                None => config.quorum.parse_rule().0,
            };
            println!("{}", ConsoleFormatter::format_thresholds(&rule, &members));
            Ok(())
        }
        None => bail!("A command is required. Run `tripvote --help` for usage."),
    }
}

/// Initialize logging based on verbosity level, plus an optional log file
fn init_tracing(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            let name = path
                .file_name()
                .with_context(|| format!("Invalid log file path: {}", path.display()))?;
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Could not create log directory {}", dir.display()))?;

            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Report configuration issues; errors stop the program
fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in issues.iter().filter(|i| !i.is_error()) {
        warn!("{}", issue);
    }
    if FileConfig::has_errors(&issues) {
        let messages: Vec<String> = issues
            .iter()
            .filter(|i| i.is_error())
            .map(|i| i.to_string())
            .collect();
        bail!("Invalid configuration:\n  {}", messages.join("\n  "));
    }
    Ok(())
}

async fn simulate(
    config: &FileConfig,
    file: &Path,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let scenario = ScenarioLoader::load(file)?;
    let (rule, _) = config.quorum.parse_rule();

    // === Dependency Injection ===
    let membership = Arc::new(MemoryMembershipStore::new());
    let ledger = Arc::new(MemoryVoteLedger::new());
    let itinerary = Arc::new(MemoryItineraryStore::new().with_conflict_mode(ConflictMode::Reject));
    let catalog = Arc::new(MemoryCandidateCatalog::new());
    let presence = Arc::new(BroadcastPresence::new(config.presence.channel_capacity));

    // A connected client listening for promotions on the scenario's trip
    let mut listener = presence.subscribe(&scenario.trip.id)?;

    let mut use_case = RunScenarioUseCase::new(membership, ledger, itinerary, catalog)
        .with_config(ConsensusConfig::new(rule))
        .with_fanout(presence.clone());

    if let Some(path) = config.logging.activity_log_path() {
        match JsonlActivityLogger::new(&path) {
            Some(logger) => {
                info!("Writing activity log to {}", logger.path().display());
                let logger: Arc<dyn ActivityLogger> = Arc::new(logger);
                use_case = use_case.with_activity_logger(logger);
            }
            None => warn!("Activity log disabled: cannot open {}", path.display()),
        }
    }

    let show_progress = !quiet && format != OutputFormat::Json;
    let progress: Box<dyn ScenarioProgress> = if show_progress {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(NoScenarioProgress)
    };

    let report = use_case
        .execute_with_progress(scenario, progress.as_ref())
        .await?;

    let broadcasts = drain_promotions(&mut listener);
    info!(broadcasts, "Promotion events received by listener");

    let output = match format {
        OutputFormat::Full => {
            let mut text = ConsoleFormatter::format(&report);
            text.push_str(&format!(
                "Broadcast {} promotion event(s) to connected members\n",
                broadcasts
            ));
            text
        }
        OutputFormat::Itinerary => ConsoleFormatter::format_itinerary_only(&report),
        OutputFormat::Json => ConsoleFormatter::format_json(&report),
    };
    println!("{}", output);

    Ok(())
}

/// Count the promotion events waiting on a listener
fn drain_promotions(listener: &mut broadcast::Receiver<PromotionEvent>) -> usize {
    let mut received = 0;
    loop {
        match listener.try_recv() {
            Ok(event) => {
                info!(trip = %event.trip, candidate = %event.candidate, "Listener saw promotion");
                received += 1;
            }
            Err(broadcast::error::TryRecvError::Lagged(missed)) => {
                warn!(missed, "Listener lagged behind the presence channel");
                received += missed as usize;
            }
            Err(_) => return received,
        }
    }
}
