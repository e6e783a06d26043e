//! Domain extraction from target URLs.

use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("URL has no host: {0}")]
    MissingHost(String),
}

/// Extract the host of `url` without its port
///
/// - `https://www.example.com:8080/path` → `www.example.com`
/// - `http://sub.domain.com/page` → `sub.domain.com`
///
/// Scheme-relative URLs (`//example.com/x`) are read as if they were `http:`.
/// Hosts come back in the normalised form `url` gives them: lower-cased, and
/// punycode for internationalised names.
pub fn extract_domain(url: &str) -> Result<String, DomainError> {
    let parsed = if url.starts_with("//") {
        Url::parse(&format!("http:{url}"))?
    } else {
        Url::parse(url)?
    };

    // host_str never carries the port
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(host.to_string()),
        _ => Err(DomainError::MissingHost(url.to_string())),
    }
}
