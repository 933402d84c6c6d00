pub mod capability;
pub mod capture;
pub mod controller;
pub mod error;

pub use capability::CapabilityProvider;
pub use capture::{CameraBackend, CaptureSession};
pub use controller::{ReadinessController, ReadyListener};
pub use error::{CapabilityError, CaptureError};
