//! Availability - per-domain uptime polling for Uppe
//!
//! This library polls a configured list of HTTP targets in rounds and keeps a
//! cumulative availability percentage for every domain it has seen.

pub mod aggregator;
pub mod config;
pub mod domain;
pub mod probe;
pub mod scheduler;
pub mod settings;

// Re-export main types
pub use aggregator::{AvailabilityTracker, DomainAvailability, DomainStats};
pub use config::{ConfigError, Target, load_targets};
pub use domain::{DomainError, extract_domain};
pub use probe::{HttpProber, Probe, ProbeError, ProbeResult};
pub use scheduler::{Monitor, RoundReport};
pub use settings::{OutputFormat, Settings, SettingsError};

/// Re-export common error types
pub use anyhow;

/// Targets file read when no path is given on the command line
pub const DEFAULT_TARGETS_PATH: &str = "sample2.yaml";
