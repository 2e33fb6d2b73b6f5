// src/video_capture.rs

use crate::types::{Frame, VideoConfig};
use anyhow::Result;
use opencv::{
    core::Mat,
    imgproc,
    prelude::*,
    videoio::{self, VideoCapture},
};
use tracing::info;

/// Live camera wrapper. Frames come back as packed RGB with the
/// capture timestamp the caller supplies.
pub struct CameraCapture {
    cap: VideoCapture,
    width: usize,
    height: usize,
}

impl CameraCapture {
    pub fn open(config: &VideoConfig) -> Result<Self> {
        info!("Opening capture device {}", config.capture_index);

        let mut cap = VideoCapture::new(config.capture_index, videoio::CAP_ANY)?;
        if !cap.is_opened()? {
            anyhow::bail!(
                "Could not open video capture device {}",
                config.capture_index
            );
        }

        cap.set(videoio::CAP_PROP_FRAME_WIDTH, config.frame_width as f64)?;
        cap.set(videoio::CAP_PROP_FRAME_HEIGHT, config.frame_height as f64)?;

        // The driver may not honor the requested size; trust what it reports.
        let width = cap.get(videoio::CAP_PROP_FRAME_WIDTH)? as usize;
        let height = cap.get(videoio::CAP_PROP_FRAME_HEIGHT)? as usize;

        info!("Capture ready: {}x{}", width, height);

        Ok(Self { cap, width, height })
    }

    /// Grab one frame. `Ok(None)` means the device produced nothing,
    /// which the monitor loop treats as fatal.
    pub fn read_frame(&mut self, timestamp: f64) -> Result<Option<Frame>> {
        let mut mat = Mat::default();

        if !self.cap.read(&mut mat)? || mat.empty() {
            return Ok(None);
        }

        let mut rgb_mat = Mat::default();
        imgproc::cvt_color(&mat, &mut rgb_mat, imgproc::COLOR_BGR2RGB, 0)?;

        let data = rgb_mat.data_bytes()?.to_vec();

        Ok(Some(Frame {
            data,
            width: self.width,
            height: self.height,
            timestamp,
        }))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}
