use std::sync::Arc;

use leadscan_types::Capability;

use crate::error::CapabilityError;

/// Platform permission APIs for the capabilities the capture screen needs.
///
/// Requesting a grant that is already held must not prompt again; it returns
/// the existing grant.
#[async_trait::async_trait]
pub trait CapabilityProvider: Send + Sync {
    async fn camera_grant(&self) -> Result<bool, CapabilityError>;

    async fn request_camera_grant(&self) -> Result<bool, CapabilityError>;

    async fn storage_grant(&self) -> Result<bool, CapabilityError>;

    async fn request_storage_grant(&self) -> Result<bool, CapabilityError>;

    /// Current grant for `capability`
    async fn grant(&self, capability: Capability) -> Result<bool, CapabilityError> {
        match capability {
            Capability::Camera => self.camera_grant().await,
            Capability::MediaStorage => self.storage_grant().await,
        }
    }

    /// Show the permission prompt for `capability`
    async fn request_grant(&self, capability: Capability) -> Result<bool, CapabilityError> {
        match capability {
            Capability::Camera => self.request_camera_grant().await,
            Capability::MediaStorage => self.request_storage_grant().await,
        }
    }
}

#[async_trait::async_trait]
impl<T: CapabilityProvider + ?Sized> CapabilityProvider for Arc<T> {
    async fn camera_grant(&self) -> Result<bool, CapabilityError> {
        (**self).camera_grant().await
    }

    async fn request_camera_grant(&self) -> Result<bool, CapabilityError> {
        (**self).request_camera_grant().await
    }

    async fn storage_grant(&self) -> Result<bool, CapabilityError> {
        (**self).storage_grant().await
    }

    async fn request_storage_grant(&self) -> Result<bool, CapabilityError> {
        (**self).request_storage_grant().await
    }
}
