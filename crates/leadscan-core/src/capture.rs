use std::sync::Arc;

use leadscan_types::{CaptureOptions, CapturedImage, FlashMode};
use uuid::Uuid;

use crate::error::CaptureError;

/// Device camera as seen by the capture surface
#[async_trait::async_trait]
pub trait CameraBackend: Send + Sync {
    /// Resolves once the preview is running and pictures can be taken
    async fn wait_ready(&self) -> Result<(), CaptureError>;

    /// Take a picture, returning its URI. `Ok(None)` means the device
    /// produced nothing.
    async fn take_picture(&self, options: CaptureOptions) -> Result<Option<String>, CaptureError>;
}

/// Capture surface state. Only created once the readiness controller has
/// reported every capability granted.
pub struct CaptureSession {
    backend: Arc<dyn CameraBackend>,
    camera_ready: bool,
    flash: FlashMode,
    quality: f32,
    /// Last capture, until the user acknowledges it
    pending: Option<CapturedImage>,
}

impl CaptureSession {
    pub fn new(backend: Arc<dyn CameraBackend>, quality: f32, flash: FlashMode) -> Self {
        Self {
            backend,
            camera_ready: false,
            flash,
            quality: quality.clamp(0.0, 1.0),
            pending: None,
        }
    }

    pub fn backend(&self) -> Arc<dyn CameraBackend> {
        self.backend.clone()
    }

    pub fn is_camera_ready(&self) -> bool {
        self.camera_ready
    }

    pub fn mark_camera_ready(&mut self) {
        if !self.camera_ready {
            tracing::info!("Camera ready");
            self.camera_ready = true;
        }
    }

    pub fn flash(&self) -> FlashMode {
        self.flash
    }

    pub fn toggle_flash(&mut self) -> FlashMode {
        self.flash = self.flash.toggled();
        tracing::debug!("Flash {:?}", self.flash);
        self.flash
    }

    pub fn pending(&self) -> Option<&CapturedImage> {
        self.pending.as_ref()
    }

    pub async fn capture(&mut self) -> Result<CapturedImage, CaptureError> {
        if !self.camera_ready {
            return Err(CaptureError::NotReady);
        }

        let options = CaptureOptions {
            quality: self.quality,
            base64: false,
            skip_processing: false,
            flash: self.flash,
        };

        let uri = self
            .backend
            .take_picture(options)
            .await?
            .filter(|uri| !uri.is_empty())
            .ok_or(CaptureError::NoImage)?;

        let image = CapturedImage {
            id: Uuid::new_v4(),
            uri,
            flash: self.flash,
            quality: self.quality,
        };
        tracing::info!("Image captured: {}", image.uri);
        self.pending = Some(image.clone());
        Ok(image)
    }

    /// Clear the pending capture after the user dismissed the notice
    pub fn acknowledge(&mut self) -> Option<CapturedImage> {
        self.pending.take()
    }
}
