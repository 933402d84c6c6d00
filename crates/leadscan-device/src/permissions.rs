use std::time::Duration;

use leadscan_config::platform::{GrantConfig, PlatformConfig};
use leadscan_core::{CapabilityError, CapabilityProvider};
use leadscan_types::Capability;
use tokio::sync::Mutex;

/// Permission store standing in for the OS settings database
pub struct SimulatedPlatform {
    camera: Mutex<GrantConfig>,
    media_storage: Mutex<GrantConfig>,
    prompt_delay: Duration,
}

impl SimulatedPlatform {
    pub fn new(config: &PlatformConfig) -> Self {
        Self {
            camera: Mutex::new(config.camera),
            media_storage: Mutex::new(config.media_storage),
            prompt_delay: Duration::from_millis(config.prompt_delay_ms),
        }
    }

    fn slot(&self, capability: Capability) -> &Mutex<GrantConfig> {
        match capability {
            Capability::Camera => &self.camera,
            Capability::MediaStorage => &self.media_storage,
        }
    }

    async fn current(&self, capability: Capability) -> Result<bool, CapabilityError> {
        let grant = *self.slot(capability).lock().await;
        if grant.fail_query {
            return Err(CapabilityError::unavailable(
                capability,
                "permission service not responding",
            ));
        }
        Ok(grant.granted)
    }

    async fn prompt(&self, capability: Capability) -> Result<bool, CapabilityError> {
        let mut grant = self.slot(capability).lock().await;
        if grant.fail_request {
            return Err(CapabilityError::unavailable(
                capability,
                "permission prompt could not be shown",
            ));
        }
        if grant.granted {
            return Ok(true);
        }

        tracing::info!("Showing {} permission prompt", capability.label());
        tokio::time::sleep(self.prompt_delay).await;
        grant.granted = grant.grant_on_request;
        tracing::info!(
            "{} permission {}",
            capability.label(),
            if grant.granted { "granted" } else { "denied" }
        );
        Ok(grant.granted)
    }
}

#[async_trait::async_trait]
impl CapabilityProvider for SimulatedPlatform {
    async fn camera_grant(&self) -> Result<bool, CapabilityError> {
        self.current(Capability::Camera).await
    }

    async fn request_camera_grant(&self) -> Result<bool, CapabilityError> {
        self.prompt(Capability::Camera).await
    }

    async fn storage_grant(&self) -> Result<bool, CapabilityError> {
        self.current(Capability::MediaStorage).await
    }

    async fn request_storage_grant(&self) -> Result<bool, CapabilityError> {
        self.prompt(Capability::MediaStorage).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(camera: GrantConfig, media_storage: GrantConfig) -> PlatformConfig {
        PlatformConfig {
            camera,
            media_storage,
            prompt_delay_ms: 0,
        }
    }

    #[tokio::test]
    async fn prompt_applies_configured_answer() {
        let denied_on_request = GrantConfig {
            grant_on_request: false,
            ..GrantConfig::default()
        };
        let platform = SimulatedPlatform::new(&config(GrantConfig::default(), denied_on_request));

        assert!(!platform.camera_grant().await.unwrap());
        assert!(platform.request_camera_grant().await.unwrap());
        assert!(platform.camera_grant().await.unwrap());

        assert!(!platform.request_storage_grant().await.unwrap());
        assert!(!platform.storage_grant().await.unwrap());
    }

    #[tokio::test]
    async fn granted_request_is_a_no_op() {
        let granted = GrantConfig {
            granted: true,
            grant_on_request: false,
            ..GrantConfig::default()
        };
        let platform = SimulatedPlatform::new(&config(granted, granted));

        assert!(platform.request_camera_grant().await.unwrap());
        assert!(platform.request_storage_grant().await.unwrap());
    }

    #[tokio::test]
    async fn injected_failures_surface_as_unavailable() {
        let broken = GrantConfig {
            fail_query: true,
            fail_request: true,
            ..GrantConfig::default()
        };
        let platform = SimulatedPlatform::new(&config(broken, GrantConfig::default()));

        assert!(matches!(
            platform.camera_grant().await,
            Err(CapabilityError::Unavailable { capability: Capability::Camera, .. })
        ));
        assert!(platform.request_camera_grant().await.is_err());
        assert!(platform.request_storage_grant().await.unwrap());
    }
}
