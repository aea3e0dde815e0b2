//! Bot configuration.
//!
//! Sources in order of precedence (later sources override earlier):
//! 1. Bundled defaults (`reactrole.toml` shipped with the crate)
//! 2. User config in home directory (`~/.config/reactrole/reactrole.toml`)
//! 3. User config in current directory (`./reactrole.toml`)
//! 4. An explicit file passed on the command line
//! 5. `REACTROLE_*` environment variables

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use derive_setters::Setters;
use reactrole_error::{ConfigError, ReactroleError, ReactroleResult};
use reactrole_storage::CorruptStatePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../reactrole.toml");

/// Prefix for environment overrides, e.g. `REACTROLE_DATA_FILE`.
const ENV_PREFIX: &str = "REACTROLE";

/// Runtime settings for the bot.
///
/// The Discord token is not part of the file config. The CLI reads it from
/// `DISCORD_BOT_TOKEN`.
///
/// # Example
///
/// ```
/// use reactrole::{BotConfig, CorruptStatePolicy};
///
/// let config = BotConfig::default()
///     .with_data_file("/var/lib/reactrole/roles.json")
///     .with_corrupt_state(CorruptStatePolicy::Refuse);
/// assert_eq!(config.event_queue_capacity, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Setters)]
#[setters(prefix = "with_", into)]
#[serde(default)]
pub struct BotConfig {
    /// JSON file holding mappings and role-message pointers
    pub data_file: PathBuf,
    /// What to do when the data file cannot be parsed
    pub corrupt_state: CorruptStatePolicy,
    /// Bound of the queue between gateway callbacks and the dispatcher
    pub event_queue_capacity: usize,
    /// Register slash commands globally when the gateway is ready
    pub register_commands: bool,
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit JSON-formatted logs
    pub json_logs: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("role_data.json"),
            corrupt_state: CorruptStatePolicy::Reset,
            event_queue_capacity: 64,
            register_commands: true,
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl BotConfig {
    /// Bundled defaults only, ignoring user files and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled file does not parse.
    pub fn bundled() -> ReactroleResult<Self> {
        finish(Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml)))
    }

    /// Load configuration from a specific file path on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> ReactroleResult<Self> {
        debug!("Loading configuration from file");

        let path = path.as_ref();
        Config::builder()
            .add_source(File::from(path))
            .build()
            .map_err(|e| {
                ReactroleError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.display(),
                    e
                )))
            })?
            .try_deserialize::<Self>()
            .map_err(|e| {
                ReactroleError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?
            .validated()
    }

    fn validated(self) -> ReactroleResult<Self> {
        if self.event_queue_capacity == 0 {
            return Err(ConfigError::new("event_queue_capacity must be positive").into());
        }
        Ok(self)
    }

    /// Load configuration with the full precedence chain.
    ///
    /// User config files are optional and skipped when missing. An
    /// `explicit` file, when given, must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if a present source cannot be read or the merged
    /// values do not deserialize.
    #[instrument]
    pub fn load(explicit: Option<&Path>) -> ReactroleResult<Self> {
        let home_config = dirs::home_dir().map(|home| home.join(".config/reactrole/reactrole.toml"));
        Self::load_from(home_config.as_deref(), Path::new("reactrole.toml"), explicit)
    }

    /// Same chain as [`load`](Self::load) with the user file locations given
    /// explicitly.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn load_from(
        home_config: Option<&Path>,
        local_config: &Path,
        explicit: Option<&Path>,
    ) -> ReactroleResult<Self> {
        debug!("Loading configuration with precedence: env > explicit > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = home_config {
            builder = builder.add_source(File::from(home).required(false));
        }
        builder = builder.add_source(File::from(local_config).required(false));
        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        finish(builder)
    }
}

fn finish(builder: ConfigBuilder<DefaultState>) -> ReactroleResult<BotConfig> {
    builder
        .build()
        .map_err(|e| {
            ReactroleError::from(ConfigError::new(format!(
                "Failed to build configuration: {}",
                e
            )))
        })?
        .try_deserialize::<BotConfig>()
        .map_err(|e| {
            ReactroleError::from(ConfigError::new(format!(
                "Failed to parse configuration: {}",
                e
            )))
        })?
        .validated()
}
