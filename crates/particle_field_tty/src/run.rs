//! Main entrypoint for running the particle field

use clap::Parser as _;
use color_eyre::eyre::{ContextCompat as _, Result};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _, Layer as _};

use crate::cli_args::CliArgs;
use crate::config::{Config, LogLevel};
use crate::raw_input::RawInput;
use crate::screen::Screen;

/// How many unread messages the protocol channel holds before the slowest listener starts
/// missing them.
const PROTOCOL_CAPACITY: usize = 1024;

/// The env variable for setting custom log filters, in the same format as `RUST_LOG`.
const LOG_FILTERS_ENV: &str = "PARTICLE_FIELD_LOG";

/// Commands to control the various tasks/threads
#[derive(Clone, Debug)]
pub(crate) enum Protocol {
    /// The entire application is exiting.
    End,
    /// Parsed input from STDIN.
    Input(termwiz::input::InputEvent),
}

/// What the user might want to know once the particle field has exited.
#[derive(Debug, Default)]
pub(crate) struct Summary {
    /// Where the logs were written, if logging was enabled.
    pub log_path: Option<std::path::PathBuf>,
}

/// Main entrypoint
pub(crate) async fn run() -> Result<Summary> {
    let (protocol_tx, protocol_rx) = tokio::sync::broadcast::channel(PROTOCOL_CAPACITY);
    let (config, is_logging) = setup()?;
    let summary = Summary {
        log_path: is_logging.then(|| config.log_path.clone()),
    };

    let input_thread_handle = RawInput::start(protocol_tx.clone());
    let result = Screen::start(config, protocol_rx).await;
    broadcast_protocol_end(&protocol_tx);

    if input_thread_handle.is_finished() {
        // The STDIN loop blocks on reads, so it can't be told to exit. Therefore we only join it
        // if it has already finished of its own accord.
        input_thread_handle
            .join()
            .map_err(|err| color_eyre::eyre::eyre!("STDIN handle: {err:?}"))??;
    }
    result?;

    tracing::trace!("Leaving the main `run()` function");
    Ok(summary)
}

/// Signal all task/thread loops to exit.
///
/// We keep it in its own function because we need to handle the error separately. If the error
/// were to be bubbled with `?` as usual, there's a chance it would never be logged, because the
/// protocol end signal is itself what allows the central error handler to even be reached.
pub(crate) fn broadcast_protocol_end(protocol_tx: &tokio::sync::broadcast::Sender<Protocol>) {
    tracing::debug!("Broadcasting the protocol `End` message to all listeners");
    let result = protocol_tx.send(Protocol::End);
    if let Err(error) = result {
        tracing::error!("{error:?}");
    }
}

/// Prepare the application to start.
fn setup() -> Result<(Config, bool)> {
    let cli_args = CliArgs::parse();

    let config_result = Config::load(cli_args.config_dir.clone());
    let mut config = match config_result {
        Ok(config) => config,
        Err(config_error) => {
            color_eyre::eyre::bail!("Bad config file: {config_error:?}");
        }
    };
    config.apply_cli_args(&cli_args);

    let is_logging = setup_logging(&config)?;

    // Assuming true colour keeps rendering simple. The vast majority of terminals support it.
    std::env::set_var("COLORTERM", "truecolor");

    tracing::info!("Starting the particle field");
    tracing::debug!("Loaded config: {config:?}");

    Ok((config, is_logging))
}

/// Setup logging to a file. Returns whether anything will be logged.
fn setup_logging(config: &Config) -> Result<bool> {
    let are_log_filters_manually_set = std::env::var(LOG_FILTERS_ENV).is_ok();
    let level = &config.log_level;
    let level_as_string = format!("{level:?}").to_lowercase();

    let is_loggable = !matches!(level, LogLevel::Off) || are_log_filters_manually_set;
    if !is_loggable {
        return Ok(false);
    }

    let directory = config
        .log_path
        .parent()
        .context("Couldn't get log path's parent")?;
    std::fs::create_dir_all(directory)?;
    let file = std::fs::File::create(&config.log_path)?;

    let filters = if are_log_filters_manually_set {
        tracing_subscriber::EnvFilter::builder()
            .with_default_directive("error".parse()?)
            .with_env_var(LOG_FILTERS_ENV)
            .from_env_lossy()
    } else {
        tracing_subscriber::EnvFilter::builder()
            .with_default_directive("off".parse()?)
            .parse_lossy("")
            // Both the library and the `particle-field` binary log under this target.
            .add_directive(format!("particle_field={level_as_string}").parse()?)
    };

    let logfile_layer = tracing_subscriber::fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_filter(filters);
    tracing_subscriber::registry().with(logfile_layer).init();

    Ok(true)
}
