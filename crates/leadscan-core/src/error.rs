use leadscan_types::Capability;

/// A platform capability query or request could not be completed
#[derive(Debug, Clone, thiserror::Error)]
pub enum CapabilityError {
    #[error("{capability:?} capability unavailable: {reason}")]
    Unavailable {
        capability: Capability,
        reason: String,
    },
}

impl CapabilityError {
    pub fn unavailable(capability: Capability, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            capability,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CaptureError {
    #[error("Camera not ready")]
    NotReady,

    #[error("Failed to capture photo")]
    NoImage,

    #[error("Camera backend error: {0}")]
    Backend(String),
}

impl CaptureError {
    /// Text shown to the user for this failure
    pub fn user_message(&self) -> &'static str {
        match self {
            CaptureError::NotReady => {
                "Camera not ready. Please wait for the camera to initialize."
            }
            CaptureError::NoImage | CaptureError::Backend(_) => {
                "Failed to capture photo. Please try again."
            }
        }
    }
}
