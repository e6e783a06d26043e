//! Polling rounds.
//!
//! The monitor owns the targets, the prober and the tracker outright; nothing
//! else touches the counters, so no locking is involved.

use std::io::{self, Write};

use futures::{StreamExt, stream};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aggregator::{AvailabilityTracker, DomainAvailability};
use crate::config::Target;
use crate::domain::extract_domain;
use crate::probe::Probe;
use crate::settings::{OutputFormat, Settings};

/// Availability after one completed round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReport {
    /// 1-based round number
    pub round: u64,
    /// Attempts made this round
    pub attempts: usize,
    /// Healthy attempts this round
    pub healthy: usize,
    /// Cumulative availability per domain, sorted by domain
    pub availability: Vec<DomainAvailability>,
}

#[derive(Serialize)]
struct JsonLine<'a> {
    round: u64,
    #[serde(flatten)]
    availability: &'a DomainAvailability,
}

impl RoundReport {
    /// Write one line per domain in the requested format
    pub fn write_to(&self, format: OutputFormat, out: &mut impl Write) -> io::Result<()> {
        for availability in &self.availability {
            match format {
                OutputFormat::Text => writeln!(out, "{availability}")?,
                OutputFormat::Json => {
                    let line = JsonLine { round: self.round, availability };
                    serde_json::to_writer(&mut *out, &line)?;
                    writeln!(out)?;
                }
            }
        }
        out.flush()
    }
}

/// A target paired with the domain its attempts count against
#[derive(Debug, Clone)]
struct Scheduled {
    target: Target,
    domain: String,
}

/// Drives polling rounds over a fixed set of targets
pub struct Monitor<P> {
    targets: Vec<Scheduled>,
    prober: P,
    tracker: AvailabilityTracker,
    settings: Settings,
    rounds: u64,
}

impl<P: Probe> Monitor<P> {
    pub fn new(targets: Vec<Target>, prober: P, settings: Settings) -> Self {
        let targets = targets
            .into_iter()
            .map(|target| {
                // Unparsable URLs all land in the same empty-named bucket
                let domain = extract_domain(&target.url).unwrap_or_else(|error| {
                    warn!(
                        target_name = %target.name,
                        "Counting {} under the empty domain: {error}",
                        target.url
                    );
                    String::new()
                });
                Scheduled { target, domain }
            })
            .collect();

        Self { targets, prober, tracker: AvailabilityTracker::new(), settings, rounds: 0 }
    }

    pub fn tracker(&self) -> &AvailabilityTracker {
        &self.tracker
    }

    /// Rounds completed so far
    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    /// Probe every target exactly once and fold the outcomes into the tracker
    ///
    /// With a concurrency of 1 each probe finishes before the next starts.
    /// Higher values keep up to that many probes in flight; outcomes are
    /// still recorded in target order once the round has been joined.
    pub async fn run_round(&mut self) -> RoundReport {
        let threshold = self.settings.polling.latency_threshold();
        let concurrency = self.settings.polling.concurrency.max(1);
        let prober = &self.prober;

        let outcomes: Vec<_> = stream::iter(self.targets.iter())
            .map(|scheduled| async move { (scheduled, prober.probe(&scheduled.target).await) })
            .buffered(concurrency)
            .collect()
            .await;

        let mut healthy = 0;
        for (scheduled, result) in &outcomes {
            let is_healthy = result.is_healthy(threshold);
            self.tracker.record(&scheduled.domain, is_healthy);

            if is_healthy {
                healthy += 1;
            }

            let latency_ms = result.latency.as_millis() as u64;
            match &result.status {
                Ok(status) => debug!(
                    target_name = %scheduled.target.name,
                    latency_ms,
                    status,
                    healthy = is_healthy,
                    "Probed {}",
                    scheduled.target.url
                ),
                Err(error) => debug!(
                    target_name = %scheduled.target.name,
                    latency_ms,
                    "Probe of {} failed: {error}",
                    scheduled.target.url
                ),
            }
        }

        self.rounds += 1;
        debug!("Round {} finished: {healthy}/{} healthy", self.rounds, outcomes.len());

        RoundReport {
            round: self.rounds,
            attempts: outcomes.len(),
            healthy,
            availability: self.tracker.report(),
        }
    }

    /// Poll forever, or until `max_rounds` rounds have completed
    ///
    /// The configured interval is a pause after each round, not a fixed
    /// tick, so a slow round pushes every later round back.
    ///
    /// A report that cannot be written is logged and dropped; polling goes on.
    pub async fn run(&mut self, max_rounds: Option<u64>, out: &mut impl Write) {
        info!(
            "Polling {} targets every {}s",
            self.targets.len(),
            self.settings.polling.interval_seconds
        );

        loop {
            let report = self.run_round().await;
            if let Err(error) = report.write_to(self.settings.output.format, out) {
                warn!("Failed to write report for round {}: {error}", report.round);
            }

            if max_rounds.is_some_and(|max| self.rounds >= max) {
                return;
            }

            tokio::time::sleep(self.settings.polling.interval()).await;
        }
    }
}
