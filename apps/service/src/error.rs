use availability::{ConfigError, SettingsError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Targets(#[from] ConfigError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("failed to build HTTP client: {0:#}")]
    Client(anyhow::Error),
}
