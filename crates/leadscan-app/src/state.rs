use std::sync::Arc;

use leadscan_config::Config;
use leadscan_core::{CameraBackend, CapabilityProvider};
use leadscan_device::{SimulatedCamera, SimulatedPlatform};
use tokio::sync::RwLock;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub platform: Arc<dyn CapabilityProvider>,
    pub camera: Arc<dyn CameraBackend>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let platform = Arc::new(SimulatedPlatform::new(&config.platform));
        let camera = Arc::new(SimulatedCamera::new(&config.capture));
        Self::with_devices(config, platform, camera)
    }

    pub fn with_devices(
        config: Config,
        platform: Arc<dyn CapabilityProvider>,
        camera: Arc<dyn CameraBackend>,
    ) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            platform,
            camera,
        }
    }
}
