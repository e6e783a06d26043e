use std::time::Duration;

use thiserror::Error;

/// Why a probe produced no status code
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// The request could not be built (bad method, header or URL)
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other transport failure (TLS, protocol, body)
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ProbeError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ProbeError::Timeout
        } else if error.is_builder() {
            ProbeError::InvalidRequest(error.to_string())
        } else if error.is_connect() {
            ProbeError::Connect(error.to_string())
        } else {
            ProbeError::Transport(error.to_string())
        }
    }
}

/// Outcome of a single probe attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// HTTP status code, or why there is none
    pub status: Result<u16, ProbeError>,

    /// Wall-clock time spent on the attempt
    pub latency: Duration,
}

impl ProbeResult {
    pub fn status(status: u16, latency: Duration) -> Self {
        Self { status: Ok(status), latency }
    }

    pub fn failed(error: ProbeError, latency: Duration) -> Self {
        Self { status: Err(error), latency }
    }

    /// Healthy means a 2xx status that arrived strictly below `latency_threshold`
    pub fn is_healthy(&self, latency_threshold: Duration) -> bool {
        matches!(self.status, Ok(code) if (200..=299).contains(&code))
            && self.latency < latency_threshold
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status.as_ref().ok().copied()
    }

    pub fn error(&self) -> Option<&ProbeError> {
        self.status.as_ref().err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: Duration = Duration::from_millis(500);

    #[test]
    fn test_healthy_boundaries() {
        assert!(ProbeResult::status(200, Duration::from_millis(499)).is_healthy(THRESHOLD));
        assert!(ProbeResult::status(299, Duration::from_millis(10)).is_healthy(THRESHOLD));
        assert!(!ProbeResult::status(200, Duration::from_millis(500)).is_healthy(THRESHOLD));
        assert!(
            ProbeResult::status(204, Duration::from_micros(499_999)).is_healthy(THRESHOLD)
        );
    }

    #[test]
    fn test_unhealthy_status_codes() {
        for code in [100, 199, 300, 301, 404, 500, 503] {
            assert!(
                !ProbeResult::status(code, Duration::from_millis(1)).is_healthy(THRESHOLD),
                "status {code} should not be healthy"
            );
        }
    }

    #[test]
    fn test_errors_are_never_healthy() {
        let result = ProbeResult::failed(ProbeError::Timeout, Duration::from_millis(1));

        assert!(!result.is_healthy(THRESHOLD));
        assert_eq!(result.status_code(), None);
        assert_eq!(result.error(), Some(&ProbeError::Timeout));
    }
}
