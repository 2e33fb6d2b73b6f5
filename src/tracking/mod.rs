// src/tracking/mod.rs
//
// Consecutive-sighting tracking. Signal flow:
//   DetectionTick objects → streaks::StreakTracker.update() → alerts::AlertLedger
//
// One update per polling interval; the tracker owns the streak records,
// the ledger owns whatever alerts those streaks produced.

pub mod alerts;
pub mod streaks;

pub use alerts::{Alert, AlertLedger};
pub use streaks::{StreakRecord, StreakTracker, TickSummary, TrackerConfig};

use crate::types::DetectedObject;

/// Tracker and ledger behind one lock. Producer mutation and reader
/// snapshots must never interleave mid-update, so the two live together
/// and callers share `Arc<Mutex<TrackingShared>>`.
pub struct TrackingShared {
    pub tracker: StreakTracker,
    pub ledger: AlertLedger,
}

impl TrackingShared {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            tracker: StreakTracker::new(config),
            ledger: AlertLedger::new(),
        }
    }

    /// Apply one tick's detections to the tracker and ledger.
    pub fn apply_tick(&mut self, objects: &[DetectedObject], now: f64) -> TickSummary {
        self.tracker.update(objects, now, &mut self.ledger)
    }
}
