use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use leadscan_core::{CaptureError, CaptureSession, ReadinessController};
use leadscan_types::{AppEvent, UiEvent};
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

pub mod authorization;
pub mod capture;

use authorization::handle_authorization;
use capture::{handle_capture, mount_capture_surface};

/// App's main loop: owns the readiness controller and, once every
/// capability is granted, the capture session.
pub async fn event_loop(
    state: Arc<AppState>,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let (controller, mut ready) = ReadinessController::new(state.platform.clone());
    let mut controller = controller.with_updates(app_to_ui_tx.clone());
    let mut session: Option<CaptureSession> = None;
    let mut ready_seen = false;

    // Warm-up results come back here; the sender half stays alive for the whole loop
    let (warmup_tx, warmup_rx) = kanal::bounded_async::<Result<(), CaptureError>>(1);

    app_to_ui_tx.send(AppEvent::BackendReady).await?;
    controller.query_status().await;

    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        // Ready is polled ahead of UI events: queued capture requests need a mounted surface
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("[EVENT_LOOP] Cancelled");
                break;
            }
            status = &mut ready, if !ready_seen => {
                ready_seen = true;
                if let Some(status) = status {
                    tracing::info!("All capabilities granted: {:?}", status);
                    let mounted =
                        mount_capture_surface(&state, &app_to_ui_tx, warmup_tx.clone()).await?;
                    session = Some(mounted);
                }
            }
            result = warmup_rx.recv() => {
                match result? {
                    Ok(()) => {
                        if let Some(session) = session.as_mut() {
                            session.mark_camera_ready();
                            app_to_ui_tx.send(AppEvent::CameraReady).await?;
                        }
                    }
                    Err(e) => {
                        tracing::error!("Camera failed to start: {}", e);
                        app_to_ui_tx.send(AppEvent::CaptureFailed(e.to_string())).await?;
                    }
                }
            }
            event = ui_to_app_rx.recv() => {
                let event = match event {
                    Ok(event) => event,
                    Err(_) => {
                        tracing::info!("[EVENT_LOOP] UI channel closed");
                        break;
                    }
                };
                handle_events(&mut controller, &mut session, &app_to_ui_tx, event).await?;
            }
        }
    }

    Ok(())
}

async fn handle_events(
    controller: &mut ReadinessController,
    session: &mut Option<CaptureSession>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    event: AppEvent,
) -> anyhow::Result<()> {
    match event {
        AppEvent::UiEvent(event) => {
            tracing::debug!("UI event: {:?}", event);
            match event {
                UiEvent::UserRequestedAuthorization | UiEvent::RetryQuery | UiEvent::Abandon => {
                    handle_authorization(controller, event).await;
                }
                UiEvent::Capture | UiEvent::ToggleFlash | UiEvent::AcknowledgeCapture => {
                    handle_capture(session.as_mut(), app_to_ui_tx, event).await?;
                }
            }
        }
        // App-to-UI notifications, never expected from the presenter
        other => {
            tracing::debug!("Ignoring {:?} on ui_to_app", std::mem::discriminant(&other));
        }
    }

    Ok(())
}
