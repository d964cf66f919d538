//! Session statistics for the churn form.
//!
//! Purely observational: nothing here is read back by the prediction path.

use crate::types::verdict::Verdict;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Counters and latencies for one run of the form
pub struct SessionMetrics {
    /// Successful predictions
    pub predictions: AtomicU64,
    pub churn: AtomicU64,
    pub no_churn: AtomicU64,
    /// Predictions that returned an error
    pub failures: AtomicU64,
    /// Inference times (in microseconds)
    latencies: RwLock<Vec<u64>>,
    start_time: Instant,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self {
            predictions: AtomicU64::new(0),
            churn: AtomicU64::new(0),
            no_churn: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            latencies: RwLock::new(Vec::with_capacity(64)),
            start_time: Instant::now(),
        }
    }

    /// Record a successful prediction
    pub fn record_prediction(&self, elapsed: Duration, verdict: Verdict) {
        self.predictions.fetch_add(1, Ordering::Relaxed);
        match verdict {
            Verdict::Churn => self.churn.fetch_add(1, Ordering::Relaxed),
            Verdict::NoChurn => self.no_churn.fetch_add(1, Ordering::Relaxed),
        };

        if let Ok(mut times) = self.latencies.write() {
            times.push(elapsed.as_micros() as u64);
            // Keep only the most recent 10000
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }
    }

    /// Record a prediction that returned an error
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get inference latency statistics
    pub fn latency_stats(&self) -> LatencyStats {
        let Ok(times) = self.latencies.read() else {
            return LatencyStats::default();
        };
        if times.is_empty() {
            return LatencyStats::default();
        }

        let mut sorted = times.clone();
        sorted.sort_unstable();

        let count = sorted.len();
        let sum: u64 = sorted.iter().sum();
        let percentile = |p: f64| sorted[((count as f64 * p) as usize).min(count - 1)];

        LatencyStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: percentile(0.50),
            p99_us: percentile(0.99),
            max_us: sorted[count - 1],
        }
    }

    /// Share of successful predictions that were churn, in percent
    pub fn churn_rate(&self) -> f64 {
        let total = self.predictions.load(Ordering::Relaxed);
        if total == 0 {
            return 0.0;
        }
        self.churn.load(Ordering::Relaxed) as f64 / total as f64 * 100.0
    }

    /// Log summary statistics
    pub fn print_summary(&self) {
        let latency = self.latency_stats();

        info!(
            session_secs = self.start_time.elapsed().as_secs(),
            predictions = self.predictions.load(Ordering::Relaxed),
            churn = self.churn.load(Ordering::Relaxed),
            no_churn = self.no_churn.load(Ordering::Relaxed),
            failures = self.failures.load(Ordering::Relaxed),
            churn_rate = format!("{:.1}%", self.churn_rate()),
            "Session summary"
        );
        if latency.count > 0 {
            info!(
                mean_us = latency.mean_us,
                p50_us = latency.p50_us,
                p99_us = latency.p99_us,
                max_us = latency.max_us,
                "Inference latency"
            );
        }
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Inference latency statistics
#[derive(Debug, Default, PartialEq)]
pub struct LatencyStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}
