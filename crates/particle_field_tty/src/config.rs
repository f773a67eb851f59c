//! All of the user config for the terminal particle field.

use color_eyre::eyre::ContextCompat as _;
use color_eyre::eyre::Result;
use particle_field::Mode;

use crate::cli_args::{CliArgs, DEFAULT_CONFIG_FILE_NAME};

/// A copy of the default config file. It gets copied to the user's config folder the first time
/// they start the particle field.
static DEFAULT_CONFIG: &str = include_str!("../default_config.toml");

/// The name of the directory, inside the system's config and state directories, where all our
/// files live.
const APP_DIRECTORY_NAME: &str = "particle-field";

/// The valid log levels. Based on our `tracing` crate.
#[derive(serde::Serialize, serde::Deserialize, clap::ValueEnum, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub(crate) enum LogLevel {
    /// Error
    Error,
    /// Warnings
    Warn,
    /// Info
    Info,
    /// Debug
    Debug,
    /// Trace
    Trace,
    /// No logging
    Off,
}

/// Managing user config.
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub(crate) struct Config {
    /// The maximum log level
    pub log_level: LogLevel,
    /// The location of the log file.
    pub log_path: std::path::PathBuf,
    /// Target frame rate
    pub frame_rate: u32,
    /// The force-field mode at startup
    pub mode: Mode,
    /// The size of the pointer's influence at startup
    pub intensity: f64,
    /// Canvas pixels per unit of simulation space. A terminal cell is 1 pixel wide and 2 tall.
    pub scale: f64,
    /// How long after the last mouse event the pointer is considered to have left.
    pub pointer_timeout_ms: u64,
    /// Whether to show the mode and intensity in the top-left of the terminal.
    pub show_status: bool,
    /// Step the particles on all CPU cores.
    pub parallel: bool,
    /// The simulation's constants
    pub simulation: particle_field::Config,
}

impl Default for Config {
    fn default() -> Self {
        let log_directory = match dirs::state_dir() {
            Some(directory) => directory,
            None => std::path::PathBuf::new().join("./"),
        };
        let log_path = log_directory
            .join(APP_DIRECTORY_NAME)
            .join("particle-field.log");

        Self {
            log_level: LogLevel::Off,
            log_path,
            frame_rate: 30,
            mode: Mode::Attraction,
            intensity: 50.0,
            scale: 0.125,
            pointer_timeout_ms: 2000,
            show_status: true,
            parallel: false,
            simulation: particle_field::Config::default(),
        }
    }
}

impl Config {
    /// Get the stable location of our config directory on the user's system.
    pub fn default_directory() -> Result<std::path::PathBuf> {
        Ok(dirs::config_dir()
            .context("Couldn't get standard config directory")?
            .join(APP_DIRECTORY_NAME))
    }

    /// Load the config from the given directory, or the default one. The directory is created,
    /// and the default config written into it, if they don't exist yet.
    pub fn load(maybe_custom_directory: Option<std::path::PathBuf>) -> Result<Self> {
        let directory = match maybe_custom_directory {
            None => Self::default_directory()?,
            Some(path) => path,
        };
        std::fs::create_dir_all(&directory)?;

        let config_path = directory.join(DEFAULT_CONFIG_FILE_NAME);
        if !config_path.exists() {
            std::fs::write(&config_path, DEFAULT_CONFIG)?;
        }

        Self::load_from(&config_path)
    }

    /// Parse a single config file.
    pub fn load_from(config_path: &std::path::Path) -> Result<Self> {
        tracing::info!("Loading config from: {config_path:?}");
        let result = std::fs::read_to_string(config_path);
        match result {
            Ok(data) => {
                tracing::trace!("Using config file:\n{data}");
                let config = toml::from_str::<Self>(&data)?;
                config.simulation.validate()?;
                Ok(config)
            }
            Err(err) => {
                tracing::error!("Loading config: {err:?}");
                color_eyre::eyre::bail!("Couldn't load config at {config_path:?}: {err}");
            }
        }
    }

    /// CLI arguments take precedence over anything in the config file.
    pub fn apply_cli_args(&mut self, cli_args: &CliArgs) {
        if let Some(mode) = cli_args.mode {
            self.mode = mode;
        }
        if let Some(intensity) = cli_args.intensity {
            self.intensity = f64::from(intensity);
        }
        if let Some(particles) = cli_args.particles {
            self.simulation.particle_count = particles;
        }
        if let Some(log_level) = &cli_args.log_level {
            self.log_level = log_level.clone();
        }
        if let Some(log_path) = &cli_args.log_path {
            self.log_path.clone_from(log_path);
        }
    }

    /// The frame rate, never less than 1.
    pub fn frame_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(1) / self.frame_rate.max(1)
    }

    /// How long the pointer lingers without any mouse events.
    pub const fn pointer_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.pointer_timeout_ms)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn shipped_config_matches_defaults() {
        let shipped = toml::from_str::<Config>(DEFAULT_CONFIG).unwrap();
        assert_eq!(shipped, Config::default());
    }

    #[test]
    fn first_load_writes_the_default_config() {
        let directory = tempfile::tempdir().unwrap();
        let config_directory = directory.path().join("nested");

        let config = Config::load(Some(config_directory.clone())).unwrap();

        let written = std::fs::read_to_string(config_directory.join(DEFAULT_CONFIG_FILE_NAME));
        assert_eq!(written.unwrap(), DEFAULT_CONFIG);
        assert_eq!(config.mode, Mode::Attraction);
        assert_eq!(config.simulation.particle_count, 120);
    }

    #[test]
    fn user_config_is_not_overwritten() {
        let directory = tempfile::tempdir().unwrap();
        let config_path = directory.path().join(DEFAULT_CONFIG_FILE_NAME);
        std::fs::write(
            &config_path,
            "mode = \"wave\"\nintensity = 80.0\n\n[simulation]\nparticle_count = 40\n",
        )
        .unwrap();

        let config = Config::load(Some(directory.path().to_path_buf())).unwrap();

        assert_eq!(config.mode, Mode::Wave);
        assert!((config.intensity - 80.0).abs() < f64::EPSILON);
        assert_eq!(config.simulation.particle_count, 40);
        assert_eq!(config.simulation.trail_length, 8);
        assert_eq!(config.frame_rate, 30);
    }

    #[test]
    fn bad_config_is_an_error() {
        let directory = tempfile::tempdir().unwrap();
        let config_path = directory.path().join(DEFAULT_CONFIG_FILE_NAME);
        std::fs::write(&config_path, "mode = \"gravity\"").unwrap();

        assert!(Config::load_from(&config_path).is_err());
    }

    #[test]
    fn out_of_range_simulation_settings_are_an_error() {
        let directory = tempfile::tempdir().unwrap();
        let config_path = directory.path().join(DEFAULT_CONFIG_FILE_NAME);
        std::fs::write(&config_path, "[simulation]\ninitial_speed = nan\n").unwrap();

        let error = Config::load_from(&config_path).unwrap_err();
        assert!(error.to_string().contains("initial_speed"));
    }

    #[test]
    fn cli_args_override_config() {
        let mut config = Config::default();
        let cli_args = CliArgs {
            mode: Some(Mode::Orbital),
            intensity: Some(90),
            particles: Some(7),
            log_level: Some(LogLevel::Trace),
            ..Default::default()
        };

        config.apply_cli_args(&cli_args);

        assert_eq!(config.mode, Mode::Orbital);
        assert!((config.intensity - 90.0).abs() < f64::EPSILON);
        assert_eq!(config.simulation.particle_count, 7);
        assert_eq!(config.log_level, LogLevel::Trace);
    }

    #[test]
    fn frame_interval_survives_a_zero_frame_rate() {
        let mut config = Config::default();
        config.frame_rate = 0;
        assert_eq!(config.frame_interval(), std::time::Duration::from_secs(1));
    }
}
