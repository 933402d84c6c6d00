use std::sync::Arc;

use kanal::AsyncSender;
use leadscan_core::{CaptureError, CaptureSession};
use leadscan_types::{AppEvent, UiEvent};

use crate::state::AppState;

/// Create the capture session and start warming the camera up. The result
/// of the warm-up is delivered on `warmup_tx`.
pub async fn mount_capture_surface(
    state: &Arc<AppState>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    warmup_tx: AsyncSender<Result<(), CaptureError>>,
) -> anyhow::Result<CaptureSession> {
    let (quality, flash) = {
        let config = state.config.read().await;
        (config.capture.quality, config.capture.flash)
    };

    let session = CaptureSession::new(state.camera.clone(), quality, flash);
    let backend = session.backend();
    tokio::spawn(async move {
        let result = backend.wait_ready().await;
        if let Err(e) = warmup_tx.send(result).await {
            tracing::warn!("Failed to report camera warm-up: {}", e);
        }
    });

    app_to_ui_tx.send(AppEvent::CaptureSurfaceMounted).await?;
    Ok(session)
}

pub async fn handle_capture(
    session: Option<&mut CaptureSession>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    event: UiEvent,
) -> anyhow::Result<()> {
    let Some(session) = session else {
        tracing::warn!("{:?} before the capture surface is mounted", event);
        app_to_ui_tx
            .send(AppEvent::CaptureFailed(
                "Camera and photo library access are required first.".to_string(),
            ))
            .await?;
        return Ok(());
    };

    match event {
        UiEvent::Capture => match session.capture().await {
            Ok(image) => {
                app_to_ui_tx.send(AppEvent::ImageCaptured(image)).await?;
            }
            Err(e) => {
                tracing::error!("Error capturing photo: {}", e);
                app_to_ui_tx
                    .send(AppEvent::CaptureFailed(e.user_message().to_string()))
                    .await?;
            }
        },
        UiEvent::ToggleFlash => {
            let flash = session.toggle_flash();
            app_to_ui_tx.send(AppEvent::FlashChanged(flash)).await?;
        }
        UiEvent::AcknowledgeCapture => {
            if session.acknowledge().is_some() {
                app_to_ui_tx.send(AppEvent::CaptureCleared).await?;
            }
        }
        _ => {}
    }

    Ok(())
}
