use std::path::PathBuf;

use leadscan_types::FlashMode;
use serde::{Deserialize, Serialize};

fn default_quality() -> f32 {
    0.8
}

fn default_output_dir() -> PathBuf {
    std::env::temp_dir().join("leadscan").join("captures")
}

fn default_warmup_ms() -> u64 {
    300
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CaptureConfig {
    #[serde(default = "default_quality")]
    pub quality: f32,
    pub flash: FlashMode,
    /// Where captured images are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Delay before the camera reports ready
    #[serde(default = "default_warmup_ms")]
    pub warmup_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            quality: default_quality(),
            flash: FlashMode::Off,
            output_dir: default_output_dir(),
            warmup_ms: default_warmup_ms(),
        }
    }
}
