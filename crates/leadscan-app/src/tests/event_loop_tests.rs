//! Event loop driven end to end over channels, with the simulated platform

use std::sync::Arc;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender, unbounded_async};
use leadscan_config::Config;
use leadscan_config::platform::GrantConfig;
use leadscan_device::{SimulatedCamera, SimulatedPlatform};
use leadscan_types::{AppEvent, CapabilityStatus, FlashMode, Phase, UiEvent};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::events::event_loop;
use crate::state::AppState;

struct Harness {
    to_app: AsyncSender<AppEvent>,
    from_app: AsyncReceiver<AppEvent>,
    cancel: CancellationToken,
    task: JoinHandle<anyhow::Result<()>>,
}

impl Harness {
    fn start(camera: GrantConfig, media_storage: GrantConfig) -> Self {
        let mut config = Config::default();
        config.platform.camera = camera;
        config.platform.media_storage = media_storage;
        config.platform.prompt_delay_ms = 0;
        config.capture.warmup_ms = 0;
        config.capture.output_dir =
            std::env::temp_dir().join(format!("leadscan-test-{}", uuid::Uuid::new_v4()));

        let platform = Arc::new(SimulatedPlatform::new(&config.platform));
        let camera = Arc::new(SimulatedCamera::new(&config.capture));
        let state = Arc::new(AppState::with_devices(config, platform, camera));

        let (to_app, ui_to_app_rx) = unbounded_async();
        let (app_to_ui_tx, from_app) = unbounded_async();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(event_loop(state, ui_to_app_rx, app_to_ui_tx, cancel.clone()));

        Self {
            to_app,
            from_app,
            cancel,
            task,
        }
    }

    async fn send(&self, event: UiEvent) {
        self.to_app.send(AppEvent::UiEvent(event)).await.expect("send failed");
    }

    /// Skip events until one matches
    async fn expect<F: Fn(&AppEvent) -> bool>(&self, what: &str, pred: F) -> AppEvent {
        let result = timeout(Duration::from_secs(2), async {
            loop {
                let event = self.from_app.recv().await.expect("channel closed");
                if pred(&event) {
                    return event;
                }
            }
        })
        .await;
        result.unwrap_or_else(|_| panic!("Timeout waiting for {what}"))
    }

    async fn stop(self) {
        self.cancel.cancel();
        let result = timeout(Duration::from_secs(2), self.task).await;
        assert!(matches!(result, Ok(Ok(Ok(())))), "event loop did not stop cleanly");
    }
}

fn granted() -> GrantConfig {
    GrantConfig {
        granted: true,
        ..GrantConfig::default()
    }
}

#[tokio::test]
async fn pre_granted_mounts_capture_surface() {
    let app = Harness::start(granted(), granted());

    app.expect("backend ready", |e| matches!(e, AppEvent::BackendReady)).await;
    app.expect("ready status", |e| {
        matches!(e, AppEvent::StatusUpdate { phase: Phase::Ready, .. })
    })
    .await;
    app.expect("mount", |e| matches!(e, AppEvent::CaptureSurfaceMounted)).await;
    app.expect("camera ready", |e| matches!(e, AppEvent::CameraReady)).await;

    app.send(UiEvent::ToggleFlash).await;
    app.expect("flash on", |e| matches!(e, AppEvent::FlashChanged(FlashMode::On))).await;

    app.send(UiEvent::Capture).await;
    let captured = app.expect("capture", |e| matches!(e, AppEvent::ImageCaptured(_))).await;
    if let AppEvent::ImageCaptured(image) = captured {
        assert!(image.uri.starts_with("file://"));
        assert_eq!(image.flash, FlashMode::On);
    }

    app.send(UiEvent::AcknowledgeCapture).await;
    app.expect("cleared", |e| matches!(e, AppEvent::CaptureCleared)).await;

    app.stop().await;
}

#[tokio::test]
async fn denied_request_offers_choice_and_blocks_capture() {
    let storage_refused = GrantConfig {
        grant_on_request: false,
        ..GrantConfig::default()
    };
    let app = Harness::start(GrantConfig::default(), storage_refused);

    app.expect("not ready", |e| {
        matches!(e, AppEvent::StatusUpdate { phase: Phase::NotReady, .. })
    })
    .await;

    app.send(UiEvent::Capture).await;
    app.expect("capture refused", |e| matches!(e, AppEvent::CaptureFailed(_))).await;

    app.send(UiEvent::UserRequestedAuthorization).await;
    app.expect("requesting", |e| {
        matches!(e, AppEvent::StatusUpdate { phase: Phase::Requesting, .. })
    })
    .await;
    let denied = app.expect("denied", |e| matches!(e, AppEvent::PermissionsDenied(_))).await;
    if let AppEvent::PermissionsDenied(status) = denied {
        assert_eq!(status, CapabilityStatus::new(true, false));
    }

    app.send(UiEvent::RetryQuery).await;
    app.expect("still not ready", |e| {
        matches!(
            e,
            AppEvent::StatusUpdate {
                phase: Phase::NotReady,
                status
            } if *status == CapabilityStatus::new(true, false)
        )
    })
    .await;

    app.send(UiEvent::Abandon).await;
    app.expect("abandoned", |e| matches!(e, AppEvent::Abandoned)).await;

    app.stop().await;
}

#[tokio::test]
async fn granting_from_not_ready_mounts_once() {
    let app = Harness::start(GrantConfig::default(), GrantConfig::default());

    app.expect("not ready", |e| {
        matches!(e, AppEvent::StatusUpdate { phase: Phase::NotReady, .. })
    })
    .await;

    app.send(UiEvent::UserRequestedAuthorization).await;
    app.expect("mount", |e| matches!(e, AppEvent::CaptureSurfaceMounted)).await;

    // Further requests and retries settle as Ready without mounting again
    app.send(UiEvent::UserRequestedAuthorization).await;
    app.send(UiEvent::RetryQuery).await;
    app.send(UiEvent::ToggleFlash).await;

    let mut mounts = 0;
    let result = timeout(Duration::from_secs(2), async {
        loop {
            match app.from_app.recv().await.expect("channel closed") {
                AppEvent::CaptureSurfaceMounted => mounts += 1,
                AppEvent::FlashChanged(_) => break,
                _ => {}
            }
        }
    })
    .await;
    assert!(result.is_ok(), "Timeout waiting for flash change");
    assert_eq!(mounts, 0);

    app.stop().await;
}
