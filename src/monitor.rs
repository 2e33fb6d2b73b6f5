// src/monitor.rs
//
// Producer loop. Reads the camera continuously so the driver buffer
// stays fresh, runs detection once per check interval, and pushes the
// results into the result buffer and the streak tracker. One failed
// detection tick is not retried; the next scheduled tick covers it.

use crate::object_detection::YoloDetector;
use crate::pipeline::{MonitorMetrics, ResultBuffer};
use crate::tracking::TrackingShared;
use crate::types::{Config, DetectedObject, DetectionTick, Frame};
use crate::video_capture::CameraCapture;
use anyhow::Result;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::{error, info, warn};

/// Idle delay between camera reads when no detection is due.
const FRAME_POLL_DELAY: Duration = Duration::from_millis(100);

/// Log a metrics summary every this many ticks.
const SUMMARY_EVERY_TICKS: u64 = 20;

pub fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

pub struct Monitor {
    config: Config,
    detector: YoloDetector,
    capture: CameraCapture,
    tracking: Arc<Mutex<TrackingShared>>,
    result_buffer: Arc<Mutex<ResultBuffer>>,
    metrics: MonitorMetrics,
}

impl Monitor {
    pub fn new(
        config: Config,
        detector: YoloDetector,
        capture: CameraCapture,
        tracking: Arc<Mutex<TrackingShared>>,
        result_buffer: Arc<Mutex<ResultBuffer>>,
        metrics: MonitorMetrics,
    ) -> Self {
        Self {
            config,
            detector,
            capture,
            tracking,
            result_buffer,
            metrics,
        }
    }

    /// Run until the capture device fails. Detection errors on a single
    /// tick are logged and skipped; capture read failure is fatal and
    /// the loop returns, leaving the API serving last-known state.
    pub fn run(mut self) -> Result<()> {
        let interval = self.config.detection.check_interval_secs;
        info!(
            "👁  Monitor loop started: checking every {:.0}s, confidence > {:.2}",
            interval, self.config.detection.confidence_threshold
        );

        let mut last_check = unix_now();

        loop {
            let now = unix_now();

            let frame = match self.capture.read_frame(now) {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    error!("Failed to read frame from capture device, stopping monitor");
                    anyhow::bail!("capture device returned no frame");
                }
                Err(e) => {
                    error!("Capture error, stopping monitor: {:#}", e);
                    return Err(e);
                }
            };

            if now - last_check >= interval {
                if let Err(e) = self.process_tick(&frame, now) {
                    warn!("Detection tick failed, waiting for next interval: {:#}", e);
                }
                last_check = now;
            }

            std::thread::sleep(FRAME_POLL_DELAY);
        }
    }

    fn process_tick(&mut self, frame: &Frame, now: f64) -> Result<()> {
        let started = Instant::now();
        let detections = self.detector.detect(
            &frame.data,
            frame.width,
            frame.height,
            self.config.detection.confidence_threshold,
        )?;
        self.metrics.set_timing(
            &self.metrics.inference_time_us,
            started.elapsed().as_micros() as u64,
        );

        let objects: Vec<DetectedObject> = detections
            .iter()
            .map(|d| DetectedObject {
                class_id: d.class_id as i64,
                class_name: d.class_name.clone(),
                confidence: d.confidence,
            })
            .collect();

        info!("🔍 Check complete: {} object(s) in frame", objects.len());

        let tick = DetectionTick {
            timestamp: now,
            objects: objects.clone(),
        };

        {
            let mut buffer = self
                .result_buffer
                .lock()
                .expect("result buffer lock poisoned");
            if !buffer.offer(tick) {
                self.metrics.inc(&self.metrics.ticks_dropped);
            }
        }

        let summary = {
            let mut tracking = self.tracking.lock().expect("tracking lock poisoned");
            tracking.apply_tick(&objects, now)
        };

        self.metrics.inc(&self.metrics.ticks_processed);
        self.metrics
            .add(&self.metrics.objects_detected, objects.len() as u64);
        self.metrics
            .add(&self.metrics.first_sightings, summary.first_sightings as u64);
        self.metrics
            .add(&self.metrics.alerts_raised, summary.alerts_raised as u64);

        let ticks = self
            .metrics
            .ticks_processed
            .load(std::sync::atomic::Ordering::Relaxed);
        if ticks % SUMMARY_EVERY_TICKS == 0 {
            let s = self.metrics.summary();
            info!(
                "📊 {} ticks | {} objects | {} alerts | {} dropped | last inference {}us",
                s.ticks_processed,
                s.objects_detected,
                s.alerts_raised,
                s.ticks_dropped,
                s.last_inference_us
            );
        }

        Ok(())
    }
}
