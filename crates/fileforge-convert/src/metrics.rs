//! In-process conversion metrics.
//!
//! Counters are atomics, safe for concurrent requests. These feed logs
//! and status surfaces; exporting to a metrics sink is someone else's job.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use fileforge_entity::FailureKind;

/// Conversion metrics collector.
#[derive(Debug, Default)]
pub struct ConversionMetrics {
    started: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    timed_out: AtomicU64,
    cancelled: AtomicU64,
    total_input_bytes: AtomicU64,
    total_output_bytes: AtomicU64,
    total_duration_ms: AtomicU64,
}

impl ConversionMetrics {
    /// Create a new empty metrics collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a conversion start and its input size.
    pub fn record_started(&self, input_bytes: u64) {
        self.started.fetch_add(1, Ordering::Relaxed);
        self.total_input_bytes.fetch_add(input_bytes, Ordering::Relaxed);
    }

    /// Record a successful conversion with its duration and output size.
    pub fn record_success(&self, duration: Duration, output_bytes: u64) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
        self.total_output_bytes
            .fetch_add(output_bytes, Ordering::Relaxed);
        self.total_duration_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Record a failed conversion by its classification.
    pub fn record_failure(&self, kind: FailureKind) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        match kind {
            FailureKind::ConverterTimedOut => {
                self.timed_out.fetch_add(1, Ordering::Relaxed);
            }
            FailureKind::Cancelled => {
                self.cancelled.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }
    }

    /// Get the current snapshot of metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let succeeded = self.succeeded.load(Ordering::Relaxed);
        let total_duration_ms = self.total_duration_ms.load(Ordering::Relaxed);

        MetricsSnapshot {
            started: self.started.load(Ordering::Relaxed),
            succeeded,
            failed: self.failed.load(Ordering::Relaxed),
            timed_out: self.timed_out.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
            total_input_bytes: self.total_input_bytes.load(Ordering::Relaxed),
            total_output_bytes: self.total_output_bytes.load(Ordering::Relaxed),
            mean_duration_ms: if succeeded > 0 {
                Some(total_duration_ms / succeeded)
            } else {
                None
            },
        }
    }
}

/// A point-in-time snapshot of conversion metrics.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MetricsSnapshot {
    /// Total conversions started.
    pub started: u64,
    /// Total successful conversions.
    pub succeeded: u64,
    /// Total failed conversions (includes timeouts and cancellations).
    pub failed: u64,
    /// Total timed-out conversions.
    pub timed_out: u64,
    /// Total cancelled conversions.
    pub cancelled: u64,
    /// Total payload bytes accepted for conversion.
    pub total_input_bytes: u64,
    /// Total artifact bytes produced.
    pub total_output_bytes: u64,
    /// Mean duration of successful conversions in milliseconds.
    pub mean_duration_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counting() {
        let m = ConversionMetrics::new();
        m.record_started(100);
        m.record_started(50);
        m.record_success(Duration::from_millis(400), 2000);
        m.record_failure(FailureKind::IoError);

        let snap = m.snapshot();
        assert_eq!(snap.started, 2);
        assert_eq!(snap.succeeded, 1);
        assert_eq!(snap.failed, 1);
        assert_eq!(snap.total_input_bytes, 150);
        assert_eq!(snap.total_output_bytes, 2000);
        assert_eq!(snap.mean_duration_ms, Some(400));
    }

    #[test]
    fn test_timeout_and_cancel_increment_failed_too() {
        let m = ConversionMetrics::new();
        m.record_failure(FailureKind::ConverterTimedOut);
        m.record_failure(FailureKind::Cancelled);

        let snap = m.snapshot();
        assert_eq!(snap.failed, 2);
        assert_eq!(snap.timed_out, 1);
        assert_eq!(snap.cancelled, 1);
    }

    #[test]
    fn test_mean_is_none_without_successes() {
        let snap = ConversionMetrics::new().snapshot();
        assert_eq!(snap.mean_duration_ms, None);
    }

    #[test]
    fn test_snapshot_serialization() {
        let m = ConversionMetrics::new();
        m.record_started(10);
        m.record_success(Duration::from_millis(30), 20);
        let json = serde_json::to_string(&m.snapshot()).expect("serialize");
        let deser: MetricsSnapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(deser.succeeded, 1);
    }
}
