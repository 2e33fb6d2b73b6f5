// src/pipeline/metrics.rs
//
// Monitor observability. Tracks per-tick counts and inference timing
// for the detection loop. Exported via the periodic log summary.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct MonitorMetrics {
    pub ticks_processed: Arc<AtomicU64>,
    pub objects_detected: Arc<AtomicU64>,
    pub first_sightings: Arc<AtomicU64>,
    pub alerts_raised: Arc<AtomicU64>,
    pub ticks_dropped: Arc<AtomicU64>,
    pub detection_reads: Arc<AtomicU64>,
    pub alert_reads: Arc<AtomicU64>,
    pub inference_time_us: Arc<AtomicU64>,
    pub started_at: Instant,
}

impl MonitorMetrics {
    pub fn new() -> Self {
        Self {
            ticks_processed: Arc::new(AtomicU64::new(0)),
            objects_detected: Arc::new(AtomicU64::new(0)),
            first_sightings: Arc::new(AtomicU64::new(0)),
            alerts_raised: Arc::new(AtomicU64::new(0)),
            ticks_dropped: Arc::new(AtomicU64::new(0)),
            detection_reads: Arc::new(AtomicU64::new(0)),
            alert_reads: Arc::new(AtomicU64::new(0)),
            inference_time_us: Arc::new(AtomicU64::new(0)),
            started_at: Instant::now(),
        }
    }

    pub fn inc(&self, counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add(&self, counter: &AtomicU64, amount: u64) {
        counter.fetch_add(amount, Ordering::Relaxed);
    }

    pub fn set_timing(&self, counter: &AtomicU64, duration_us: u64) {
        counter.store(duration_us, Ordering::Relaxed);
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            ticks_processed: self.ticks_processed.load(Ordering::Relaxed),
            objects_detected: self.objects_detected.load(Ordering::Relaxed),
            first_sightings: self.first_sightings.load(Ordering::Relaxed),
            alerts_raised: self.alerts_raised.load(Ordering::Relaxed),
            ticks_dropped: self.ticks_dropped.load(Ordering::Relaxed),
            detection_reads: self.detection_reads.load(Ordering::Relaxed),
            alert_reads: self.alert_reads.load(Ordering::Relaxed),
            last_inference_us: self.inference_time_us.load(Ordering::Relaxed),
            elapsed_secs: self.started_at.elapsed().as_secs_f64(),
        }
    }
}

impl Default for MonitorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSummary {
    pub ticks_processed: u64,
    pub objects_detected: u64,
    pub first_sightings: u64,
    pub alerts_raised: u64,
    pub ticks_dropped: u64,
    pub detection_reads: u64,
    pub alert_reads: u64,
    pub last_inference_us: u64,
    pub elapsed_secs: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let metrics = MonitorMetrics::new();

        metrics.inc(&metrics.ticks_processed);
        metrics.inc(&metrics.ticks_processed);
        metrics.add(&metrics.objects_detected, 3);
        metrics.set_timing(&metrics.inference_time_us, 1500);

        let summary = metrics.summary();
        assert_eq!(summary.ticks_processed, 2);
        assert_eq!(summary.objects_detected, 3);
        assert_eq!(summary.last_inference_us, 1500);
    }
}
