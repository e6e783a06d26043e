pub mod http;
/// Probe execution
///
/// This module is responsible for:
/// - Issuing exactly one request per target and attempt
/// - Measuring wall-clock latency of the attempt
/// - Tagging failures so callers can tell timeouts from bad requests
pub mod types;

pub use http::HttpProber;
pub use types::{ProbeError, ProbeResult};

use crate::config::Target;

/// Probe trait for anything that can attempt a target once
#[async_trait::async_trait]
pub trait Probe: Send + Sync {
    /// Attempt `target` once and report the outcome with its latency
    async fn probe(&self, target: &Target) -> ProbeResult;
}
