use leadscan_core::ReadinessController;
use leadscan_types::UiEvent;

pub async fn handle_authorization(controller: &mut ReadinessController, event: UiEvent) {
    match event {
        UiEvent::UserRequestedAuthorization => {
            let status = controller.request_authorization().await;
            tracing::debug!("Authorization settled: {:?}", status);
        }
        UiEvent::RetryQuery => {
            if !controller.awaiting_choice() {
                tracing::debug!("Retry without a pending denial, re-querying anyway");
            }
            controller.retry().await;
        }
        UiEvent::Abandon => controller.abandon().await,
        _ => {}
    }
}
