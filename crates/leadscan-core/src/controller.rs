use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use kanal::AsyncSender;
use leadscan_types::{AppEvent, Capability, CapabilityStatus, Phase, ReadinessState};
use tokio::sync::oneshot;

use crate::capability::CapabilityProvider;
use crate::error::CapabilityError;

/// Resolves once, with the first snapshot that has every capability granted.
///
/// Resolves to `None` if the controller is dropped before becoming ready.
pub struct ReadyListener {
    rx: oneshot::Receiver<CapabilityStatus>,
}

impl Future for ReadyListener {
    type Output = Option<CapabilityStatus>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(Result::ok)
    }
}

/// Tracks whether camera and media storage are authorized and drives the
/// user through the platform prompts when they are not.
///
/// Call [`query_status`](Self::query_status) once before
/// [`request_authorization`](Self::request_authorization); the order is not
/// checked.
pub struct ReadinessController {
    provider: Arc<dyn CapabilityProvider>,
    phase: Phase,
    status: CapabilityStatus,
    /// Set when a request left a capability denied, until retry or abandon
    awaiting_choice: bool,
    ready_tx: Option<oneshot::Sender<CapabilityStatus>>,
    updates: Option<AsyncSender<AppEvent>>,
}

impl ReadinessController {
    pub fn new(provider: Arc<dyn CapabilityProvider>) -> (Self, ReadyListener) {
        let (ready_tx, rx) = oneshot::channel();
        let controller = Self {
            provider,
            phase: Phase::Checking,
            status: CapabilityStatus::DENIED,
            awaiting_choice: false,
            ready_tx: Some(ready_tx),
            updates: None,
        };
        (controller, ReadyListener { rx })
    }

    /// Publish every settled snapshot to `tx`
    pub fn with_updates(mut self, tx: AsyncSender<AppEvent>) -> Self {
        self.updates = Some(tx);
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Latest snapshot
    pub fn status(&self) -> CapabilityStatus {
        self.status
    }

    pub fn readiness(&self) -> ReadinessState {
        self.status.readiness()
    }

    pub fn awaiting_choice(&self) -> bool {
        self.awaiting_choice
    }

    /// Ask the platform for the current grants. Never fails: a capability
    /// whose query fails is reported as not granted.
    pub async fn query_status(&mut self) -> CapabilityStatus {
        let provider = &self.provider;
        let (camera, storage) = tokio::join!(
            provider.grant(Capability::Camera),
            provider.grant(Capability::MediaStorage),
        );

        let status = CapabilityStatus::new(
            fail_closed(Capability::Camera, "query", camera),
            fail_closed(Capability::MediaStorage, "query", storage),
        );
        tracing::debug!(?status, "capability query settled");

        self.settle(status).await
    }

    /// Show both platform prompts and wait for both answers.
    ///
    /// If a capability is still denied afterwards the user gets to choose
    /// between [`retry`](Self::retry) and [`abandon`](Self::abandon).
    pub async fn request_authorization(&mut self) -> CapabilityStatus {
        if self.phase != Phase::Ready {
            self.transition(Phase::Requesting);
            self.publish(AppEvent::StatusUpdate {
                phase: self.phase,
                status: self.status,
            })
            .await;
        }

        let provider = &self.provider;
        let (camera, storage) = tokio::join!(
            provider.request_grant(Capability::Camera),
            provider.request_grant(Capability::MediaStorage),
        );

        let status = CapabilityStatus::new(
            fail_closed(Capability::Camera, "request", camera),
            fail_closed(Capability::MediaStorage, "request", storage),
        );
        tracing::debug!(?status, "authorization request settled");

        let status = self.settle(status).await;
        if !status.is_ready() {
            let missing: Vec<&str> = status.missing().map(|c| c.label()).collect();
            tracing::info!("Permissions still missing after request: {}", missing.join(", "));
            self.awaiting_choice = true;
            self.publish(AppEvent::PermissionsDenied(status)).await;
        }
        status
    }

    /// Re-query after the user chose to retry
    pub async fn retry(&mut self) -> CapabilityStatus {
        self.awaiting_choice = false;
        self.query_status().await
    }

    /// The user declined to grant. What happens next is up to the caller.
    pub async fn abandon(&mut self) {
        self.awaiting_choice = false;
        tracing::info!("User abandoned authorization in {:?}", self.phase);
        self.publish(AppEvent::Abandoned).await;
    }

    async fn settle(&mut self, status: CapabilityStatus) -> CapabilityStatus {
        self.status = status;

        if status.is_ready() {
            if self.phase != Phase::Ready {
                self.transition(Phase::Ready);
                self.awaiting_choice = false;
                if let Some(tx) = self.ready_tx.take() {
                    // Listener may already be gone; readiness is still published below
                    let _ = tx.send(status);
                }
            }
        } else if self.phase != Phase::Ready {
            self.transition(Phase::NotReady);
        }

        self.publish(AppEvent::StatusUpdate {
            phase: self.phase,
            status,
        })
        .await;
        status
    }

    fn transition(&mut self, next: Phase) {
        if self.phase != next {
            tracing::info!("Readiness {:?} -> {:?}", self.phase, next);
            self.phase = next;
        }
    }

    async fn publish(&self, event: AppEvent) {
        if let Some(tx) = &self.updates {
            if let Err(e) = tx.send(event).await {
                tracing::warn!("Failed to publish readiness update: {}", e);
            }
        }
    }
}

fn fail_closed(
    capability: Capability,
    action: &str,
    result: Result<bool, CapabilityError>,
) -> bool {
    match result {
        Ok(granted) => granted,
        Err(e) => {
            tracing::warn!(
                "{} {} failed, treating as not granted: {}",
                capability.label(),
                action,
                e
            );
            false
        }
    }
}
