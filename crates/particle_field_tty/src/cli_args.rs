//! All the CLI arguments for the particle field

use particle_field::Mode;

use crate::config::LogLevel;

/// The name of the config file inside the config directory.
pub(crate) const DEFAULT_CONFIG_FILE_NAME: &str = "config.toml";

/// Particles that swirl, scatter and glow around your mouse pointer, right in your terminal.
#[derive(clap::Parser, Debug, Clone, Default)]
#[command(version, about, long_about = None)]
#[non_exhaustive]
pub(crate) struct CliArgs {
    /// The force-field mode to start in.
    #[arg(short, long)]
    pub mode: Option<Mode>,

    /// How far the pointer's influence reaches, from 20 to 100.
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(20..=100))]
    pub intensity: Option<u8>,

    /// The number of particles.
    #[arg(short, long)]
    pub particles: Option<usize>,

    /// Use a different directory for the config file.
    #[arg(long)]
    pub config_dir: Option<std::path::PathBuf>,

    /// Verbosity of logs.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Path to the log file.
    #[arg(long)]
    pub log_path: Option<std::path::PathBuf>,
}
