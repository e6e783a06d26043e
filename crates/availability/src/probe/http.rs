//! HTTP probe execution.

use std::time::{Duration, Instant};

use anyhow::Result;
use reqwest::Method;
use url::Url;

use super::Probe;
use super::types::{ProbeError, ProbeResult};
use crate::config::Target;

/// HTTP/HTTPS prober sharing one client across every attempt
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).user_agent(user_agent).build()?;

        Ok(Self { client })
    }

    /// Wrap an already configured client; its timeout bounds every probe
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Send the request and keep only its status code
    async fn send(&self, target: &Target) -> Result<u16, ProbeError> {
        let method = Method::from_bytes(target.method.as_bytes()).map_err(|_| {
            ProbeError::InvalidRequest(format!("unsupported HTTP method: {}", target.method))
        })?;
        let url = Url::parse(&target.url)
            .map_err(|e| ProbeError::InvalidRequest(format!("invalid URL {}: {e}", target.url)))?;

        let mut request = self.client.request(method.clone(), url);

        if let Some(headers) = &target.headers {
            for (key, value) in headers {
                request = request.header(key, value);
            }
        }

        if is_write_method(&method) {
            if let Some(body) = target.body.as_deref().filter(|body| !body.is_empty()) {
                request = request.body(body.to_owned());
            }
        }

        // The response is dropped here, body unread
        let response = request.send().await?;
        Ok(response.status().as_u16())
    }
}

#[async_trait::async_trait]
impl Probe for HttpProber {
    async fn probe(&self, target: &Target) -> ProbeResult {
        let start = Instant::now();
        let status = self.send(target).await;
        let latency = start.elapsed();

        ProbeResult { status, latency }
    }
}

/// Methods that carry the configured body
fn is_write_method(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT || *method == Method::PATCH
}
