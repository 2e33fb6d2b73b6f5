// src/tracking/alerts.rs

use serde::{Deserialize, Serialize};

/// A repeated-sighting alert raised by the streak tracker.
///
/// `consecutive_count` is the streak length at the moment the alert fired
/// (always 2 under the current trigger rule) and `last_detection` is the
/// unix timestamp of the sighting that fired it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub object: String,
    pub consecutive_count: u32,
    pub last_detection: f64,
}

/// Ordered collection of active alerts.
///
/// Alerts are keyed loosely by `object`: duplicates can coexist if the
/// trigger fires more than once between removals. There is no time-based
/// expiry here; removal is driven entirely by the tracker's trigger rule.
#[derive(Debug, Default)]
pub struct AlertLedger {
    alerts: Vec<Alert>,
}

impl AlertLedger {
    pub fn new() -> Self {
        Self { alerts: Vec::new() }
    }

    pub fn append(&mut self, alert: Alert) {
        self.alerts.push(alert);
    }

    /// Remove every alert for the given label.
    pub fn remove_all(&mut self, object: &str) {
        self.alerts.retain(|a| a.object != object);
    }

    /// Point-in-time copy for API readers.
    pub fn snapshot(&self) -> Vec<Alert> {
        self.alerts.clone()
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(object: &str, ts: f64) -> Alert {
        Alert {
            object: object.to_string(),
            consecutive_count: 2,
            last_detection: ts,
        }
    }

    #[test]
    fn test_append_and_snapshot_preserve_order() {
        let mut ledger = AlertLedger::new();
        ledger.append(alert("dog", 10.0));
        ledger.append(alert("person", 20.0));
        ledger.append(alert("dog", 30.0));

        let snap = ledger.snapshot();
        assert_eq!(snap.len(), 3);
        assert_eq!(snap[0].object, "dog");
        assert_eq!(snap[1].object, "person");
        assert_eq!(snap[2].object, "dog");
    }

    #[test]
    fn test_remove_all_only_touches_matching_label() {
        let mut ledger = AlertLedger::new();
        ledger.append(alert("dog", 10.0));
        ledger.append(alert("person", 20.0));
        ledger.append(alert("dog", 30.0));

        ledger.remove_all("dog");

        let snap = ledger.snapshot();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].object, "person");
    }

    #[test]
    fn test_remove_all_on_empty_ledger_is_noop() {
        let mut ledger = AlertLedger::new();
        ledger.remove_all("dog");
        assert!(ledger.is_empty());
    }
}
