//! Per-domain availability accounting.
//!
//! Counters are cumulative for the lifetime of the tracker: every attempt ever
//! recorded stays in the denominator.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Attempt counters for one domain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DomainStats {
    /// Attempts observed
    pub count: u64,
    /// Attempts classified healthy, never more than `count`
    pub up: u64,
}

impl DomainStats {
    fn record(&mut self, healthy: bool) {
        self.count += 1;
        if healthy {
            self.up += 1;
        }
    }

    /// `round(100 * up / count)`, or `None` before the first attempt
    pub fn percentage(&self) -> Option<u8> {
        if self.count == 0 {
            return None;
        }

        let ratio = self.up as f64 / self.count as f64;
        Some((ratio * 100.0).round() as u8)
    }
}

/// One line of the availability report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainAvailability {
    pub domain: String,
    pub up: u64,
    pub count: u64,
    pub percentage: u8,
}

impl fmt::Display for DomainAvailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} has {}% availability percentage", self.domain, self.percentage)
    }
}

/// Availability counters keyed by domain
///
/// Targets that share a domain share one entry. Entries are created on the
/// first attempt and never removed.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityTracker {
    domains: BTreeMap<String, DomainStats>,
}

impl AvailabilityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one attempt against `domain`
    pub fn record(&mut self, domain: &str, healthy: bool) {
        match self.domains.get_mut(domain) {
            Some(stats) => stats.record(healthy),
            None => {
                let mut stats = DomainStats::default();
                stats.record(healthy);
                self.domains.insert(domain.to_string(), stats);
            }
        }
    }

    pub fn stats(&self, domain: &str) -> Option<DomainStats> {
        self.domains.get(domain).copied()
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Current availability of every domain with at least one attempt,
    /// sorted by domain
    pub fn report(&self) -> Vec<DomainAvailability> {
        self.domains
            .iter()
            .filter_map(|(domain, stats)| {
                stats.percentage().map(|percentage| DomainAvailability {
                    domain: domain.clone(),
                    up: stats.up,
                    count: stats.count,
                    percentage,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_rounding() {
        let stats = DomainStats { count: 3, up: 2 };
        assert_eq!(stats.percentage(), Some(67));

        let stats = DomainStats { count: 3, up: 1 };
        assert_eq!(stats.percentage(), Some(33));

        // Halves round away from zero
        let stats = DomainStats { count: 8, up: 1 };
        assert_eq!(stats.percentage(), Some(13));

        let stats = DomainStats { count: 200, up: 1 };
        assert_eq!(stats.percentage(), Some(1));
    }

    #[test]
    fn test_percentage_bounds() {
        assert_eq!(DomainStats { count: 5, up: 5 }.percentage(), Some(100));
        assert_eq!(DomainStats { count: 5, up: 0 }.percentage(), Some(0));
        assert_eq!(DomainStats::default().percentage(), None);
    }

    #[test]
    fn test_first_sighting_counts_attempt() {
        let mut tracker = AvailabilityTracker::new();
        tracker.record("example.com", false);

        assert_eq!(tracker.stats("example.com"), Some(DomainStats { count: 1, up: 0 }));
    }

    #[test]
    fn test_shared_domain_shares_counters() {
        let mut tracker = AvailabilityTracker::new();
        tracker.record("a.example.com", true);
        tracker.record("a.example.com", false);
        tracker.record("b.example.com", true);

        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.stats("a.example.com"), Some(DomainStats { count: 2, up: 1 }));
        assert_eq!(tracker.stats("b.example.com"), Some(DomainStats { count: 1, up: 1 }));
    }

    #[test]
    fn test_up_never_exceeds_count() {
        let mut tracker = AvailabilityTracker::new();
        for i in 0..50 {
            tracker.record("example.com", i % 3 != 0);
            let stats = tracker.stats("example.com").unwrap();
            assert!(stats.up <= stats.count);
        }
        assert_eq!(tracker.stats("example.com").unwrap().count, 50);
    }

    #[test]
    fn test_report_is_sorted_and_formatted() {
        let mut tracker = AvailabilityTracker::new();
        tracker.record("zeta.test", true);
        tracker.record("alpha.test", false);
        tracker.record("", false);

        let lines: Vec<String> = tracker.report().iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec![
                " has 0% availability percentage".to_string(),
                "alpha.test has 0% availability percentage".to_string(),
                "zeta.test has 100% availability percentage".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_tracker_reports_nothing() {
        let tracker = AvailabilityTracker::new();
        assert!(tracker.is_empty());
        assert!(tracker.report().is_empty());
    }

    #[test]
    fn test_report_serializes() {
        let mut tracker = AvailabilityTracker::new();
        tracker.record("good.test", true);

        let json = serde_json::to_value(&tracker.report()[0]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"domain": "good.test", "up": 1, "count": 1, "percentage": 100})
        );
    }
}
