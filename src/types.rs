use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub model: ModelConfig,
    pub inference: InferenceConfig,
    pub detection: DetectionConfig,
    pub tracking: TrackingConfig,
    pub video: VideoConfig,
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub path: String,
    pub input_size: usize,
    pub num_classes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    pub use_cuda: bool,
    pub num_threads: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    pub confidence_threshold: f32,
    pub nms_iou_threshold: f32,
    pub check_interval_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    pub consecutive_window_secs: f64,
    pub expiry_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    pub capture_index: i32,
    pub frame_width: usize,
    pub frame_height: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub bind_addr: String,
    pub result_buffer_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub data: Vec<u8>,
    pub width: usize,
    pub height: usize,
    pub timestamp: f64,
}

/// One object the model saw in a sampled frame, above the confidence cutoff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedObject {
    pub class_id: i64,
    pub class_name: String,
    pub confidence: f32,
}

/// Everything detected in one polling interval. The most recent ticks wait
/// in the result buffer until an API consumer polls them off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionTick {
    pub timestamp: f64,
    pub objects: Vec<DetectedObject>,
}

impl DetectionTick {
    /// Shape returned to API consumers when no tick is pending.
    pub fn empty(now: f64) -> Self {
        Self {
            timestamp: now,
            objects: Vec::new(),
        }
    }
}
