use std::path::PathBuf;
use std::time::Duration;

use leadscan_config::capture::CaptureConfig;
use leadscan_core::{CameraBackend, CaptureError};
use leadscan_types::CaptureOptions;
use uuid::Uuid;

/// Camera that warms up for a fixed delay and writes empty placeholder
/// frames; no sensor data is produced.
pub struct SimulatedCamera {
    output_dir: PathBuf,
    warmup: Duration,
}

impl SimulatedCamera {
    pub fn new(config: &CaptureConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            warmup: Duration::from_millis(config.warmup_ms),
        }
    }
}

#[async_trait::async_trait]
impl CameraBackend for SimulatedCamera {
    async fn wait_ready(&self) -> Result<(), CaptureError> {
        tokio::time::sleep(self.warmup).await;
        Ok(())
    }

    async fn take_picture(&self, options: CaptureOptions) -> Result<Option<String>, CaptureError> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| {
                CaptureError::Backend(format!("create {}: {e}", self.output_dir.display()))
            })?;

        let path = self.output_dir.join(format!("capture-{}.jpg", Uuid::new_v4()));
        tokio::fs::write(&path, b"")
            .await
            .map_err(|e| CaptureError::Backend(format!("write {}: {e}", path.display())))?;

        tracing::debug!(
            "Frame written to {} (quality {:.2}, flash {:?})",
            path.display(),
            options.quality,
            options.flash
        );
        Ok(Some(format!("file://{}", path.display())))
    }
}
