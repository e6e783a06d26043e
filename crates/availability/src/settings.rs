//! Polling settings.
//!
//! Every value has a default matching the stock polling behaviour, so the
//! settings file is optional and may be partial.

use std::time::Duration;
use std::{env, fmt, fs, path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {}", .0.display())]
    ReadFailed(path::PathBuf, #[source] std::io::Error),
    #[error("failed to write settings file {}", .0.display())]
    WriteFailed(path::PathBuf, #[source] std::io::Error),
    #[error("failed to parse settings file {}", .0.display())]
    ParseFailed(path::PathBuf, #[source] toml::de::Error),
    #[error("failed to serialize settings")]
    SerializeFailed(#[from] toml::ser::Error),
    #[error("no settings path available: neither XDG_CONFIG_HOME nor HOME is set")]
    ConfigPathUnavailable,
    #[error("invalid setting: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub polling: Polling,
    pub output: Output,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Polling {
    /// Pause after each round
    pub interval_seconds: u64,
    /// Per-request timeout
    pub timeout_seconds: u64,
    /// Attempts must finish strictly below this to count as healthy
    pub latency_threshold_ms: u64,
    /// Probes in flight per round, 1 keeps rounds strictly sequential
    pub concurrency: usize,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Output {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl Default for Polling {
    fn default() -> Self {
        Self {
            interval_seconds: 15,
            timeout_seconds: 5,
            latency_threshold_ms: 500,
            concurrency: 1,
            user_agent: concat!("uppe-availability/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl Polling {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn latency_threshold(&self) -> Duration {
        Duration::from_millis(self.latency_threshold_ms)
    }
}

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().map(|ext| ext != "toml").unwrap_or(true) {
        path.set_extension("toml");
    }
    path
}

/// Get default settings path ($XDG_CONFIG_HOME/uppe/availability.toml or
/// $HOME/.config/...)
fn default_config_path() -> Result<path::PathBuf, SettingsError> {
    let path = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else if let Some(home_dir) = env::home_dir() {
        home_dir.join(".config")
    } else {
        return Err(SettingsError::ConfigPathUnavailable);
    };

    Ok(path.join("uppe/availability.toml"))
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_title_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str| {
                writeln!(f, "{:indent$}{}", "", label, indent = level * 2)
            }
        };

        let write_title_1 = write_title_indented(1);
        let write_1 = write_indented(1);

        writeln!(f, "Current Polling Settings:")?;
        write_title_1(f, "Polling")?;
        write_1(f, "Interval (s)", &self.polling.interval_seconds)?;
        write_1(f, "Timeout (s)", &self.polling.timeout_seconds)?;
        write_1(f, "Latency Threshold (ms)", &self.polling.latency_threshold_ms)?;
        write_1(f, "Concurrency", &self.polling.concurrency)?;
        write_1(f, "User Agent", &self.polling.user_agent)?;
        write_title_1(f, "Output")?;
        write_1(f, "Format", &self.output.format)?;

        Ok(())
    }
}

impl Settings {
    /// Generate Settings from file
    ///
    /// Reads ~/.config/uppe/availability.toml or the specified path. A missing
    /// file means defaults; nothing is written.
    ///
    /// ```no_run
    /// let settings = availability::Settings::from_config(None::<&std::path::Path>)?;
    /// println!("{}", settings);
    /// # Ok::<(), availability::SettingsError>(())
    /// ```
    pub fn from_config(
        optional_path: Option<impl AsRef<path::Path>>,
    ) -> Result<Self, SettingsError> {
        let config_path = match optional_path {
            Some(path) => normalize_toml_path(path.as_ref()),
            None => match default_config_path() {
                Ok(path) => path,
                Err(SettingsError::ConfigPathUnavailable) => return Ok(Self::default()),
                Err(error) => return Err(error),
            },
        };

        let settings = if config_path.exists() {
            let raw_string = fs::read_to_string(&config_path)
                .map_err(|err| SettingsError::ReadFailed(config_path.clone(), err))?;
            toml::from_str(raw_string.as_str())
                .map_err(|err| SettingsError::ParseFailed(config_path.clone(), err))?
        } else {
            tracing::debug!("No settings at {}, using defaults", config_path.display());
            Self::default()
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Write the defaults to the settings path unless a file is already there
    ///
    /// Returns the path that now holds the settings.
    pub fn init_config(
        optional_path: Option<impl AsRef<path::Path>>,
    ) -> Result<path::PathBuf, SettingsError> {
        let config_path: path::PathBuf = if let Some(path) = optional_path {
            normalize_toml_path(path.as_ref())
        } else {
            default_config_path()?
        };

        if !config_path.exists() {
            Self::default().write_config(&config_path)?;
        }

        Ok(config_path)
    }

    /// Serialize and write the settings to a file
    pub fn write_config(&self, path: &path::Path) -> Result<(), SettingsError> {
        let config_str: String = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| SettingsError::WriteFailed(path.to_path_buf(), err))?;
        }

        fs::write(path, config_str).map_err(|err| SettingsError::WriteFailed(path.to_path_buf(), err))
    }

    /// Reject values the poller cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        const MIN_TIMEOUT: u64 = 1;
        const MAX_TIMEOUT: u64 = 300; // 5 minutes

        let polling = &self.polling;

        if polling.interval_seconds == 0 {
            return Err(SettingsError::Invalid("interval_seconds must be at least 1".into()));
        }

        if !(MIN_TIMEOUT..=MAX_TIMEOUT).contains(&polling.timeout_seconds) {
            return Err(SettingsError::Invalid(format!(
                "timeout_seconds must be between {MIN_TIMEOUT} and {MAX_TIMEOUT}, got {}",
                polling.timeout_seconds
            )));
        }

        if polling.latency_threshold_ms == 0 {
            return Err(SettingsError::Invalid("latency_threshold_ms must be at least 1".into()));
        }

        if polling.concurrency == 0 {
            return Err(SettingsError::Invalid("concurrency must be at least 1".into()));
        }

        Ok(())
    }
}
