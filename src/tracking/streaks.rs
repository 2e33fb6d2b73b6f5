// src/tracking/streaks.rs
//
// Consecutive-detection streak tracking. One update per polling tick:
// every object class seen in the tick either starts a streak, extends
// one, or resets one, and streaks that go quiet long enough are dropped.

use crate::tracking::alerts::{Alert, AlertLedger};
use crate::types::DetectedObject;
use std::collections::HashMap;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Max gap between sightings for them to count as consecutive.
    pub consecutive_window_secs: f64,
    /// Streak records older than this are pruned at tick boundaries.
    pub expiry_secs: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            consecutive_window_secs: 60.0,
            expiry_secs: 120.0,
        }
    }
}

/// Streak state for one object class.
#[derive(Debug, Clone, PartialEq)]
pub struct StreakRecord {
    pub last_detection: f64,
    pub consecutive_count: u32,
}

/// Informational counts from one tick's update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickSummary {
    pub first_sightings: u32,
    pub alerts_raised: u32,
}

pub struct StreakTracker {
    config: TrackerConfig,
    records: HashMap<String, StreakRecord>,
}

impl StreakTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            records: HashMap::new(),
        }
    }

    /// Ingest one tick's detections and update streaks in place.
    ///
    /// Objects are processed in the order the detector produced them;
    /// a class appearing twice in one tick re-applies the rules to the
    /// record it just updated. An empty tick is a no-op that still runs
    /// the expiry pass.
    ///
    /// When a streak reaches exactly 2 inside the consecutive window, an
    /// alert is appended to the ledger and every alert for that class is
    /// then cleared in the same step. A reader only observes the alert if
    /// its snapshot lands between the append and the clear, which cannot
    /// happen when both run under one lock.
    pub fn update(
        &mut self,
        objects: &[DetectedObject],
        now: f64,
        ledger: &mut AlertLedger,
    ) -> TickSummary {
        let mut summary = TickSummary::default();

        for obj in objects {
            let name = &obj.class_name;
            let previous = self
                .records
                .get(name)
                .map(|r| (r.last_detection, r.consecutive_count));

            match previous {
                None => {
                    self.records.insert(
                        name.clone(),
                        StreakRecord {
                            last_detection: now,
                            consecutive_count: 1,
                        },
                    );
                    info!("Object detected: {}", name);
                    summary.first_sightings += 1;
                }
                Some((prev_time, count)) => {
                    if now - prev_time < self.config.consecutive_window_secs {
                        self.records.insert(
                            name.clone(),
                            StreakRecord {
                                last_detection: now,
                                consecutive_count: count + 1,
                            },
                        );

                        // Alert on the second consecutive sighting, then
                        // clear every alert for this class. The clear wins:
                        // ledger readers see zero alerts for the class once
                        // the tick's update completes.
                        if count == 1 {
                            ledger.append(Alert {
                                object: name.clone(),
                                consecutive_count: count + 1,
                                last_detection: now,
                            });
                            warn!("🚨 ALERT: {} detected in consecutive checks!", name);
                            summary.alerts_raised += 1;

                            ledger.remove_all(name);
                            info!("Cleared alerts for {}", name);
                        }
                    } else {
                        // Too long since the last sighting; streak broken.
                        self.records.insert(
                            name.clone(),
                            StreakRecord {
                                last_detection: now,
                                consecutive_count: 1,
                            },
                        );
                    }
                }
            }
        }

        self.expire_stale(now);
        summary
    }

    fn expire_stale(&mut self, now: f64) {
        let expiry = self.config.expiry_secs;
        self.records.retain(|name, record| {
            let keep = now - record.last_detection <= expiry;
            if !keep {
                debug!("Streak expired: {}", name);
            }
            keep
        });
    }

    pub fn get(&self, class_name: &str) -> Option<&StreakRecord> {
        self.records.get(class_name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(name: &str) -> DetectedObject {
        DetectedObject {
            class_id: 16,
            class_name: name.to_string(),
            confidence: 0.9,
        }
    }

    fn tracker() -> StreakTracker {
        StreakTracker::new(TrackerConfig::default())
    }

    #[test]
    fn test_first_sighting_creates_record_with_count_one() {
        let mut tracker = tracker();
        let mut ledger = AlertLedger::new();

        let summary = tracker.update(&[obj("dog")], 0.0, &mut ledger);

        let record = tracker.get("dog").unwrap();
        assert_eq!(record.consecutive_count, 1);
        assert_eq!(record.last_detection, 0.0);
        assert_eq!(summary.first_sightings, 1);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_sighting_within_window_increments_count() {
        let mut tracker = tracker();
        let mut ledger = AlertLedger::new();

        tracker.update(&[obj("dog")], 0.0, &mut ledger);
        tracker.update(&[obj("dog")], 10.0, &mut ledger);

        let record = tracker.get("dog").unwrap();
        assert_eq!(record.consecutive_count, 2);
        assert_eq!(record.last_detection, 10.0);
    }

    #[test]
    fn test_alert_on_second_sighting_is_cleared_in_same_update() {
        let mut tracker = tracker();
        let mut ledger = AlertLedger::new();

        tracker.update(&[obj("dog")], 0.0, &mut ledger);
        let summary = tracker.update(&[obj("dog")], 10.0, &mut ledger);

        // The alert fired and was wiped before update returned.
        assert_eq!(summary.alerts_raised, 1);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_third_sighting_increments_without_alerting() {
        let mut tracker = tracker();
        let mut ledger = AlertLedger::new();

        tracker.update(&[obj("dog")], 0.0, &mut ledger);
        tracker.update(&[obj("dog")], 10.0, &mut ledger);
        tracker.update(&[obj("dog")], 20.0, &mut ledger);

        assert_eq!(tracker.get("dog").unwrap().consecutive_count, 3);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_gap_at_window_boundary_resets_count() {
        let mut tracker = tracker();
        let mut ledger = AlertLedger::new();

        tracker.update(&[obj("dog")], 0.0, &mut ledger);
        // Exactly 60s later: not consecutive (window is strict).
        tracker.update(&[obj("dog")], 60.0, &mut ledger);

        let record = tracker.get("dog").unwrap();
        assert_eq!(record.consecutive_count, 1);
        assert_eq!(record.last_detection, 60.0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_streak_resumes_after_reset() {
        let mut tracker = tracker();
        let mut ledger = AlertLedger::new();

        tracker.update(&[obj("dog")], 0.0, &mut ledger);
        tracker.update(&[obj("dog")], 70.0, &mut ledger); // reset
        tracker.update(&[obj("dog")], 80.0, &mut ledger); // back to 2

        assert_eq!(tracker.get("dog").unwrap().consecutive_count, 2);
    }

    #[test]
    fn test_record_expires_after_long_silence() {
        let mut tracker = tracker();
        let mut ledger = AlertLedger::new();

        tracker.update(&[obj("dog")], 0.0, &mut ledger);
        // Empty tick still prunes.
        tracker.update(&[], 121.0, &mut ledger);

        assert!(tracker.get("dog").is_none());
    }

    #[test]
    fn test_record_survives_exactly_at_expiry_boundary() {
        let mut tracker = tracker();
        let mut ledger = AlertLedger::new();

        tracker.update(&[obj("dog")], 0.0, &mut ledger);
        tracker.update(&[], 120.0, &mut ledger);

        assert!(tracker.get("dog").is_some());
    }

    #[test]
    fn test_empty_tick_is_noop_besides_pruning() {
        let mut tracker = tracker();
        let mut ledger = AlertLedger::new();

        tracker.update(&[obj("dog")], 0.0, &mut ledger);
        tracker.update(&[], 30.0, &mut ledger);

        let record = tracker.get("dog").unwrap();
        assert_eq!(record.consecutive_count, 1);
        assert_eq!(record.last_detection, 0.0);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_duplicate_labels_in_one_tick_apply_sequentially() {
        let mut tracker = tracker();
        let mut ledger = AlertLedger::new();

        // Two dogs in one frame: the second detection sees the record the
        // first one just created (gap 0) and extends the streak.
        tracker.update(&[obj("dog"), obj("dog")], 0.0, &mut ledger);

        assert_eq!(tracker.get("dog").unwrap().consecutive_count, 2);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_labels_are_tracked_independently() {
        let mut tracker = tracker();
        let mut ledger = AlertLedger::new();

        tracker.update(&[obj("dog"), obj("person")], 0.0, &mut ledger);
        tracker.update(&[obj("dog")], 10.0, &mut ledger);

        assert_eq!(tracker.get("dog").unwrap().consecutive_count, 2);
        assert_eq!(tracker.get("person").unwrap().consecutive_count, 1);
    }

    #[test]
    fn test_update_sees_stale_record_before_expiry_pass() {
        let mut tracker = tracker();
        let mut ledger = AlertLedger::new();

        tracker.update(&[obj("dog")], 0.0, &mut ledger);
        tracker.update(&[obj("dog")], 10.0, &mut ledger);
        assert_eq!(tracker.get("dog").unwrap().consecutive_count, 2);

        // 190s of silence. The update still finds the old record (gap
        // >= 60 resets it to 1), and the expiry pass that follows uses
        // the refreshed timestamp, so the record survives.
        tracker.update(&[obj("dog")], 200.0, &mut ledger);

        let record = tracker.get("dog").unwrap();
        assert_eq!(record.consecutive_count, 1);
        assert_eq!(record.last_detection, 200.0);
    }
}
