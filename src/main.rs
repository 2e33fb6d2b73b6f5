// src/main.rs

mod api;
mod config;
mod labels;
mod monitor;
mod object_detection;
mod pipeline;
mod tracking;
mod types;
mod video_capture;

use anyhow::Result;
use api::ApiState;
use monitor::Monitor;
use object_detection::YoloDetector;
use pipeline::{MonitorMetrics, ResultBuffer};
use std::sync::{Arc, Mutex};
use tracking::{TrackerConfig, TrackingShared};
use tracing::{error, info};
use video_capture::CameraCapture;

#[tokio::main]
async fn main() -> Result<()> {
    let config = types::Config::load("config.yaml")?;

    tracing_subscriber::fmt()
        .with_env_filter(format!("animal_sentinel={},ort=warn", config.logging.level))
        .init();

    info!("🦌 Animal Sentinel starting");
    info!("✓ Configuration loaded");
    info!(
        "Check interval: {:.0}s | consecutive window: {:.0}s | streak expiry: {:.0}s",
        config.detection.check_interval_secs,
        config.tracking.consecutive_window_secs,
        config.tracking.expiry_secs
    );

    let detector = YoloDetector::new(&config.model, &config.inference, &config.detection)?;
    let capture = CameraCapture::open(&config.video)?;

    let tracking = Arc::new(Mutex::new(TrackingShared::new(TrackerConfig {
        consecutive_window_secs: config.tracking.consecutive_window_secs,
        expiry_secs: config.tracking.expiry_secs,
    })));
    let result_buffer = Arc::new(Mutex::new(ResultBuffer::with_capacity(
        config.api.result_buffer_capacity,
    )));
    let metrics = MonitorMetrics::new();

    let state = ApiState {
        tracking: tracking.clone(),
        result_buffer: result_buffer.clone(),
        metrics: metrics.clone(),
    };

    let bind_addr = config.api.bind_addr.clone();
    let monitor = Monitor::new(config, detector, capture, tracking, result_buffer, metrics);

    // The monitor loop is synchronous (OpenCV + ONNX Runtime), so it gets
    // a blocking task. If it dies, the API keeps serving last-known state.
    tokio::task::spawn_blocking(move || {
        if let Err(e) = monitor.run() {
            error!("Detection loop terminated: {:#}", e);
        }
    });

    api::serve(&bind_addr, state).await
}
