// src/api.rs
//
// Read-only HTTP surface. Two endpoints, both GET:
//   /api/detections — destructive poll of the result buffer
//   /api/alerts     — snapshot of the alert ledger

use crate::monitor::unix_now;
use crate::pipeline::{MonitorMetrics, ResultBuffer};
use crate::tracking::{Alert, TrackingShared};
use crate::types::DetectionTick;
use anyhow::Result;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub struct ApiState {
    pub tracking: Arc<Mutex<TrackingShared>>,
    pub result_buffer: Arc<Mutex<ResultBuffer>>,
    pub metrics: MonitorMetrics,
}

#[derive(Debug, Serialize)]
pub struct AlertsResponse {
    pub timestamp: f64,
    pub alerts: Vec<Alert>,
}

/// Latest pending detection tick, or the empty shape when none is queued.
/// Consumption is at-most-once: whichever caller polls first takes the tick.
async fn get_detections(State(state): State<ApiState>) -> Json<DetectionTick> {
    let now = unix_now();
    let tick = state
        .result_buffer
        .lock()
        .expect("result buffer lock poisoned")
        .poll(now);
    state.metrics.inc(&state.metrics.detection_reads);
    Json(tick)
}

/// Current alert ledger, non-destructive.
async fn get_alerts(State(state): State<ApiState>) -> Json<AlertsResponse> {
    let alerts = state
        .tracking
        .lock()
        .expect("tracking lock poisoned")
        .ledger
        .snapshot();
    state.metrics.inc(&state.metrics.alert_reads);
    Json(AlertsResponse {
        timestamp: unix_now(),
        alerts,
    })
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/detections", get(get_detections))
        .route("/api/alerts", get(get_alerts))
        .with_state(state)
}

pub async fn serve(bind_addr: &str, state: ApiState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("🌐 API listening on {}", bind_addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::TrackerConfig;
    use crate::types::DetectedObject;

    fn state() -> ApiState {
        ApiState {
            tracking: Arc::new(Mutex::new(TrackingShared::new(TrackerConfig::default()))),
            result_buffer: Arc::new(Mutex::new(ResultBuffer::new())),
            metrics: MonitorMetrics::new(),
        }
    }

    fn dog() -> DetectedObject {
        DetectedObject {
            class_id: 16,
            class_name: "dog".to_string(),
            confidence: 0.9,
        }
    }

    #[tokio::test]
    async fn test_detections_endpoint_is_destructive() {
        let state = state();
        state
            .result_buffer
            .lock()
            .unwrap()
            .offer(DetectionTick {
                timestamp: 100.0,
                objects: vec![dog()],
            });

        let Json(first) = get_detections(State(state.clone())).await;
        assert_eq!(first.timestamp, 100.0);
        assert_eq!(first.objects.len(), 1);

        // Buffer drained: second read gets the empty shape stamped "now".
        let Json(second) = get_detections(State(state)).await;
        assert!(second.objects.is_empty());
        assert!(second.timestamp > 100.0);
    }

    #[tokio::test]
    async fn test_alerts_endpoint_is_nondestructive_snapshot() {
        let state = state();
        state.tracking.lock().unwrap().ledger.append(Alert {
            object: "dog".to_string(),
            consecutive_count: 2,
            last_detection: 50.0,
        });

        let Json(first) = get_alerts(State(state.clone())).await;
        let Json(second) = get_alerts(State(state)).await;
        assert_eq!(first.alerts.len(), 1);
        assert_eq!(second.alerts.len(), 1);
        assert_eq!(first.alerts[0].object, "dog");
    }

    #[tokio::test]
    async fn test_alerts_empty_after_full_trigger_cycle() {
        let state = state();
        {
            let mut tracking = state.tracking.lock().unwrap();
            tracking.apply_tick(&[dog()], 0.0);
            tracking.apply_tick(&[dog()], 30.0);
        }

        let Json(resp) = get_alerts(State(state)).await;
        assert!(resp.alerts.is_empty());
    }

    #[test]
    fn test_detection_payload_shape() {
        let tick = DetectionTick {
            timestamp: 12.5,
            objects: vec![dog()],
        };
        let json = serde_json::to_value(&tick).unwrap();
        assert_eq!(json["timestamp"], 12.5);
        assert_eq!(json["objects"][0]["class_id"], 16);
        assert_eq!(json["objects"][0]["class_name"], "dog");
    }
}
