use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// User interaction forwarded from the presenter
    UiEvent(UiEvent),
    /// Fresh snapshot published by the readiness controller
    StatusUpdate {
        phase: Phase,
        status: CapabilityStatus,
    },
    /// Authorization request settled with at least one capability still denied
    PermissionsDenied(CapabilityStatus),
    /// Both capabilities granted, capture surface may be mounted
    CaptureSurfaceMounted,
    CameraReady,
    FlashChanged(FlashMode),
    ImageCaptured(CapturedImage),
    CaptureFailed(String),
    CaptureCleared,
    Abandoned,
    BackendReady,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    UserRequestedAuthorization,
    RetryQuery,
    Abandon,
    Capture,
    ToggleFlash,
    AcknowledgeCapture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Camera,
    MediaStorage,
}

impl Capability {
    pub const ALL: [Capability; 2] = [Capability::Camera, Capability::MediaStorage];

    pub fn label(&self) -> &'static str {
        match self {
            Capability::Camera => "Camera",
            Capability::MediaStorage => "Photo Library",
        }
    }

    /// Why the app needs the grant, shown next to the label
    pub fn purpose(&self) -> &'static str {
        match self {
            Capability::Camera => "To scan business cards",
            Capability::MediaStorage => "To save scanned images",
        }
    }
}

/// Grant snapshot for the two capabilities the capture screen needs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityStatus {
    pub camera: bool,
    pub media_storage: bool,
}

impl CapabilityStatus {
    pub const DENIED: CapabilityStatus = CapabilityStatus {
        camera: false,
        media_storage: false,
    };

    pub fn new(camera: bool, media_storage: bool) -> Self {
        Self {
            camera,
            media_storage,
        }
    }

    pub fn is_granted(&self, capability: Capability) -> bool {
        match capability {
            Capability::Camera => self.camera,
            Capability::MediaStorage => self.media_storage,
        }
    }

    pub fn readiness(&self) -> ReadinessState {
        if self.camera && self.media_storage {
            ReadinessState::Ready
        } else {
            ReadinessState::NotReady
        }
    }

    pub fn is_ready(&self) -> bool {
        self.readiness() == ReadinessState::Ready
    }

    /// Capabilities that are still not granted
    pub fn missing(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL
            .into_iter()
            .filter(move |c| !self.is_granted(*c))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadinessState {
    Ready,
    NotReady,
}

/// Controller state machine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Initial query outstanding
    Checking,
    NotReady,
    /// Authorization prompts outstanding
    Requesting,
    Ready,
}

impl Phase {
    pub fn readiness(&self) -> ReadinessState {
        match self {
            Phase::Ready => ReadinessState::Ready,
            _ => ReadinessState::NotReady,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, Phase::Checking | Phase::Requesting)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashMode {
    #[default]
    Off,
    On,
}

impl FlashMode {
    pub fn toggled(self) -> Self {
        match self {
            FlashMode::Off => FlashMode::On,
            FlashMode::On => FlashMode::Off,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CaptureOptions {
    /// JPEG quality in 0.0..=1.0
    pub quality: f32,
    pub base64: bool,
    pub skip_processing: bool,
    pub flash: FlashMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapturedImage {
    pub id: Uuid,
    pub uri: String,
    pub flash: FlashMode,
    pub quality: f32,
}
