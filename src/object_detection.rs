// src/object_detection.rs

use crate::labels::class_id_to_name;
use crate::types::{DetectionConfig, InferenceConfig, ModelConfig};
use anyhow::Result;
use ort::{
    execution_providers::CUDAExecutionProvider,
    session::{builder::GraphOptimizationLevel, Session},
};
use tracing::{debug, info};

/// One raw model detection, in original image coordinates.
#[derive(Debug, Clone)]
pub struct Detection {
    pub bbox: [f32; 4], // [x1, y1, x2, y2]
    pub confidence: f32,
    pub class_id: usize,
    pub class_name: String,
}

pub struct YoloDetector {
    session: Session,
    input_size: usize,
    num_classes: usize,
    nms_iou_threshold: f32,
}

impl YoloDetector {
    pub fn new(
        model: &ModelConfig,
        inference: &InferenceConfig,
        detection: &DetectionConfig,
    ) -> Result<Self> {
        info!("Loading YOLO model: {}", model.path);

        let mut builder = Session::builder()?;
        if inference.use_cuda {
            builder = builder
                .with_execution_providers([CUDAExecutionProvider::default()
                    .with_device_id(0)
                    .build()])?;
        }
        let session = builder
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(inference.num_threads)?
            .commit_from_file(&model.path)?;

        info!("✓ YOLO detector initialized");
        Ok(Self {
            session,
            input_size: model.input_size,
            num_classes: model.num_classes,
            nms_iou_threshold: detection.nms_iou_threshold,
        })
    }

    /// YOLOv8 prediction count for the configured input size
    /// (one anchor per cell at strides 8, 16 and 32).
    fn num_predictions(&self) -> usize {
        let s = self.input_size;
        (s / 8) * (s / 8) + (s / 16) * (s / 16) + (s / 32) * (s / 32)
    }

    pub fn detect(
        &mut self,
        frame: &[u8],
        width: usize,
        height: usize,
        confidence_threshold: f32,
    ) -> Result<Vec<Detection>> {
        // 1. Preprocess (letterbox + normalize)
        let (input, scale, pad_x, pad_y) = self.preprocess(frame, width, height);

        // 2. Run inference
        let output = self.infer(&input)?;

        // 3. Postprocess (parse detections + NMS)
        let detections = self.postprocess(&output, scale, pad_x, pad_y, confidence_threshold);

        debug!("Detected {} objects", detections.len());
        Ok(detections)
    }

    fn preprocess(&self, src: &[u8], src_w: usize, src_h: usize) -> (Vec<f32>, f32, f32, f32) {
        let target_size = self.input_size;

        // Scale to fit inside the square input while keeping aspect ratio
        let scale = (target_size as f32 / src_w as f32).min(target_size as f32 / src_h as f32);
        let scaled_w = (src_w as f32 * scale) as usize;
        let scaled_h = (src_h as f32 * scale) as usize;

        // Padding to center the image
        let pad_x = (target_size - scaled_w) as f32 / 2.0;
        let pad_y = (target_size - scaled_h) as f32 / 2.0;

        let resized = resize_bilinear(src, src_w, src_h, scaled_w, scaled_h);

        // Padded canvas, gray background
        let mut canvas = vec![114u8; target_size * target_size * 3];
        for y in 0..scaled_h {
            for x in 0..scaled_w {
                let src_idx = (y * scaled_w + x) * 3;
                let dst_x = x + pad_x as usize;
                let dst_y = y + pad_y as usize;
                let dst_idx = (dst_y * target_size + dst_x) * 3;
                canvas[dst_idx..dst_idx + 3].copy_from_slice(&resized[src_idx..src_idx + 3]);
            }
        }

        // Normalize [0, 255] -> [0, 1] and convert HWC -> CHW
        let mut input = vec![0.0f32; 3 * target_size * target_size];
        for c in 0..3 {
            for h in 0..target_size {
                for w in 0..target_size {
                    let hwc_idx = (h * target_size + w) * 3 + c;
                    let chw_idx = c * target_size * target_size + h * target_size + w;
                    input[chw_idx] = canvas[hwc_idx] as f32 / 255.0;
                }
            }
        }

        (input, scale, pad_x, pad_y)
    }

    fn infer(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        let shape = [1_usize, 3, self.input_size, self.input_size];
        let input_value =
            ort::value::Value::from_array((shape.as_slice(), input.to_vec().into_boxed_slice()))?;

        let outputs = self.session.run(ort::inputs!["images" => input_value])?;
        let output = &outputs[0];
        let (_, data) = output.try_extract_tensor::<f32>()?;

        Ok(data.to_vec())
    }

    fn postprocess(
        &self,
        output: &[f32],
        scale: f32,
        pad_x: f32,
        pad_y: f32,
        conf_thresh: f32,
    ) -> Vec<Detection> {
        let num_preds = self.num_predictions();
        let mut detections = Vec::new();

        // YOLOv8 output layout: [1, 4 + num_classes, num_preds], transposed
        // so that attribute k of prediction i lives at output[num_preds * k + i]
        for i in 0..num_preds {
            let cx = output[i];
            let cy = output[num_preds + i];
            let w = output[num_preds * 2 + i];
            let h = output[num_preds * 3 + i];

            // Find best class
            let mut max_conf = 0.0f32;
            let mut best_class = 0;
            for c in 0..self.num_classes {
                let conf = output[num_preds * (4 + c) + i];
                if conf > max_conf {
                    max_conf = conf;
                    best_class = c;
                }
            }

            if max_conf < conf_thresh {
                continue;
            }

            // Center format -> corner format, then reverse the letterbox
            let x1 = (cx - w / 2.0 - pad_x) / scale;
            let y1 = (cy - h / 2.0 - pad_y) / scale;
            let x2 = (cx + w / 2.0 - pad_x) / scale;
            let y2 = (cy + h / 2.0 - pad_y) / scale;

            detections.push(Detection {
                bbox: [x1, y1, x2, y2],
                confidence: max_conf,
                class_id: best_class,
                class_name: class_id_to_name(best_class),
            });
        }

        nms(detections, self.nms_iou_threshold)
    }
}

fn resize_bilinear(src: &[u8], src_w: usize, src_h: usize, dst_w: usize, dst_h: usize) -> Vec<u8> {
    let mut dst = vec![0u8; dst_h * dst_w * 3];
    let x_ratio = src_w as f32 / dst_w as f32;
    let y_ratio = src_h as f32 / dst_h as f32;

    for dy in 0..dst_h {
        for dx in 0..dst_w {
            let sx = dx as f32 * x_ratio;
            let sy = dy as f32 * y_ratio;
            let sx0 = sx.floor() as usize;
            let sy0 = sy.floor() as usize;
            let sx1 = (sx0 + 1).min(src_w - 1);
            let sy1 = (sy0 + 1).min(src_h - 1);
            let fx = sx - sx0 as f32;
            let fy = sy - sy0 as f32;

            for c in 0..3 {
                let p00 = src[(sy0 * src_w + sx0) * 3 + c] as f32;
                let p10 = src[(sy0 * src_w + sx1) * 3 + c] as f32;
                let p01 = src[(sy1 * src_w + sx0) * 3 + c] as f32;
                let p11 = src[(sy1 * src_w + sx1) * 3 + c] as f32;

                let val = p00 * (1.0 - fx) * (1.0 - fy)
                    + p10 * fx * (1.0 - fy)
                    + p01 * (1.0 - fx) * fy
                    + p11 * fx * fy;

                dst[(dy * dst_w + dx) * 3 + c] = val.round() as u8;
            }
        }
    }
    dst
}

fn nms(mut detections: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    if detections.is_empty() {
        return detections;
    }

    detections.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep = Vec::new();
    while !detections.is_empty() {
        let current = detections.remove(0);
        detections.retain(|det| calculate_iou(&current.bbox, &det.bbox) < iou_threshold);
        keep.push(current);
    }

    keep
}

fn calculate_iou(box1: &[f32; 4], box2: &[f32; 4]) -> f32 {
    let x1 = box1[0].max(box2[0]);
    let y1 = box1[1].max(box2[1]);
    let x2 = box1[2].min(box2[2]);
    let y2 = box1[3].min(box2[3]);

    let intersection = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    let area1 = (box1[2] - box1[0]) * (box1[3] - box1[1]);
    let area2 = (box2[2] - box2[0]) * (box2[3] - box2[1]);
    let union = area1 + area2 - intersection;

    if union > 0.0 {
        intersection / union
    } else {
        0.0
    }
}
