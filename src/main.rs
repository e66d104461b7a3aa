//! Time Tracker CLI - a terminal Pomodoro work/break timer
//!
//! Alternates between a work session and a break:
//! - 25 minutes of work, 5 minutes of break by default
//! - A chime on every phase change
//! - The timer state survives restarts

use std::path::Path;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tokio::task::LocalSet;

use time_tracker::cli::{run_session, AlertKind, Cli, Commands, Display};
use time_tracker::notifier::{BellNotifier, Notifier, SilentNotifier};
use time_tracker::scheduler::IntervalScheduler;
use time_tracker::sound::{resolve_sound, try_create_notifier};
use time_tracker::storage::{default_data_dir, FileStorage};
use time_tracker::store::{TimerStore, TimerStoreBuilder};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Ticks are spawned as local tasks, so everything runs inside a LocalSet
    let local = LocalSet::new();
    let code = match local.run_until(execute(cli)).await {
        Ok(()) => 0,
        Err(e) => {
            Display::show_error(&format!("{:#}", e));
            1
        }
    };

    // A pending stdin read would otherwise block runtime shutdown
    std::process::exit(code);
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    let config = cli.config();
    config.validate().map_err(anyhow::Error::msg)?;

    let data_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => default_data_dir()?,
    };
    tracing::debug!("Data directory: {}", data_dir.display());

    match cli.command.clone().unwrap_or(Commands::Run) {
        Commands::Run => {
            let notifier = create_notifier(&cli.alert(), &data_dir);
            let store = open_store(&cli, &data_dir)?.notifier(notifier).build();
            Display::show_help();
            run_session(&store).await?;
        }
        Commands::Status => {
            let store = open_store(&cli, &data_dir)?.build();
            Display::show_status(&store.snapshot());
        }
        Commands::SetWork { minutes } => {
            let store = open_store(&cli, &data_dir)?.build();
            store.set_work_length(minutes);
            Display::show_status(&store.snapshot());
        }
        Commands::SetBreak { minutes } => {
            let store = open_store(&cli, &data_dir)?.build();
            store.set_break_length(minutes);
            Display::show_status(&store.snapshot());
        }
        Commands::Reset => {
            let store = open_store(&cli, &data_dir)?.build();
            store.reset();
            Display::show_status(&store.snapshot());
        }
        Commands::Completions { shell } => {
            generate_completions(shell);
        }
    }

    Ok(())
}

/// Opens the storage file and prepares a store over it.
fn open_store(cli: &Cli, data_dir: &Path) -> Result<TimerStoreBuilder> {
    let storage = FileStorage::open(data_dir)
        .with_context(|| format!("Failed to open storage in {}", data_dir.display()))?;
    tracing::debug!("Storage file: {}", storage.path().display());

    Ok(TimerStore::builder(
        cli.config().initial_data(),
        storage,
        IntervalScheduler::new(),
    ))
}

/// Creates the notifier selected on the command line.
///
/// Audio falls back to the terminal bell when no output device is available.
fn create_notifier(alert: &AlertKind, data_dir: &Path) -> Box<dyn Notifier> {
    match alert {
        AlertKind::Silent => Box::new(SilentNotifier),
        AlertKind::Bell => Box::new(BellNotifier),
        AlertKind::Audio(explicit) => {
            let source = resolve_sound(explicit.as_deref(), data_dir);
            match try_create_notifier(source) {
                Some(notifier) => {
                    tracing::debug!("Alert sound: {}", notifier.source().name());
                    Box::new(notifier)
                }
                None => Box::new(BellNotifier),
            }
        }
    }
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
