use std::io::BufRead;

use kanal::{AsyncReceiver, AsyncSender};
use leadscan_types::{AppEvent, Capability, CapabilityStatus, Phase, UiEvent};
use tokio_util::sync::CancellationToken;

const DENIED_NOTICE: &str = "Camera and photo library access are required to scan business cards. \
Please enable these permissions in your device settings.";

const CONTACTS_PLACEHOLDER: &str = "Contacts Library\nScanned Business Cards\n\
This screen will display the list of scanned contacts with search, filtering, \
and management capabilities.";

const HELP: &str = "Commands: grant, retry, cancel, capture, flash, ok, contacts, help, quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ui(UiEvent),
    Contacts,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Option<Command> {
    let command = match line.trim().to_ascii_lowercase().as_str() {
        "grant" | "g" => Command::Ui(UiEvent::UserRequestedAuthorization),
        "retry" | "settings" | "r" => Command::Ui(UiEvent::RetryQuery),
        "cancel" | "abandon" => Command::Ui(UiEvent::Abandon),
        "capture" | "c" => Command::Ui(UiEvent::Capture),
        "flash" | "f" => Command::Ui(UiEvent::ToggleFlash),
        "ok" => Command::Ui(UiEvent::AcknowledgeCapture),
        "contacts" => Command::Contacts,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => return None,
    };
    Some(command)
}

/// Permission screen for a not-ready snapshot
pub fn render_status(phase: Phase, status: &CapabilityStatus) -> String {
    if phase.is_busy() {
        return "Checking permissions...".to_string();
    }
    if phase == Phase::Ready {
        return "Camera permissions granted! Ready to scan business cards.".to_string();
    }

    let mut out = String::from("Permissions Required\nLead Scanner needs access to:\n");
    for capability in Capability::ALL {
        let mark = if status.is_granted(capability) {
            "Granted"
        } else {
            "Not granted"
        };
        out.push_str(&format!(
            "  {} - {}: {}\n",
            capability.label(),
            capability.purpose(),
            mark
        ));
    }
    out.push_str("[grant] Grant Permissions");
    out
}

/// Text for an app event, `None` when there is nothing to show
pub fn render_event(event: &AppEvent) -> Option<String> {
    let text = match event {
        AppEvent::StatusUpdate { phase, status } => render_status(*phase, status),
        AppEvent::PermissionsDenied(_) => {
            format!("Permissions Required\n{DENIED_NOTICE}\n[cancel] Cancel  [retry] Settings")
        }
        AppEvent::CaptureSurfaceMounted => {
            "Position the business card within the frame\n[capture] Capture  [flash] Flash"
                .to_string()
        }
        AppEvent::CameraReady => "Camera ready".to_string(),
        AppEvent::FlashChanged(flash) => format!("Flash {:?}", flash),
        AppEvent::ImageCaptured(image) => format!(
            "Image Captured!\nBusiness card image has been captured successfully ({}). \
Processing will be implemented in the next phase.\n[ok] OK",
            image.uri
        ),
        AppEvent::CaptureFailed(message) => format!("Camera Error: {message}"),
        AppEvent::CaptureCleared => "Ready for the next card".to_string(),
        AppEvent::Abandoned => {
            "Permissions not granted. Type 'grant' at any time to try again.".to_string()
        }
        AppEvent::BackendReady | AppEvent::UiEvent(_) => return None,
    };
    Some(text)
}

/// Console presenter: renders app events on stdout and turns stdin lines
/// into UI events.
pub async fn ui_loop(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    ui_to_app_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let lines = spawn_stdin_reader();
    println!("{HELP}");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            event = app_to_ui_rx.recv() => {
                let event = event?;
                if let Some(text) = render_event(&event) {
                    println!("\n{text}");
                }
            }
            line = lines.recv() => {
                let Ok(line) = line else {
                    tracing::info!("stdin closed");
                    break;
                };
                match parse_command(&line) {
                    Some(Command::Ui(event)) => ui_to_app_tx.send(AppEvent::UiEvent(event)).await?,
                    Some(Command::Contacts) => println!("\n{CONTACTS_PLACEHOLDER}"),
                    Some(Command::Help) => println!("{HELP}"),
                    Some(Command::Quit) => {
                        cancel.cancel();
                        break;
                    }
                    None if line.trim().is_empty() => {}
                    None => println!("Unknown command '{}'. {HELP}", line.trim()),
                }
            }
        }
    }

    Ok(())
}

/// Blocking stdin reads live on their own thread so shutdown never waits on
/// a pending read.
fn spawn_stdin_reader() -> AsyncReceiver<String> {
    let (tx, rx) = kanal::bounded::<String>(16);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx.to_async()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_map_to_events() {
        assert_eq!(
            parse_command(" Grant "),
            Some(Command::Ui(UiEvent::UserRequestedAuthorization))
        );
        assert_eq!(parse_command("retry"), Some(Command::Ui(UiEvent::RetryQuery)));
        assert_eq!(parse_command("cancel"), Some(Command::Ui(UiEvent::Abandon)));
        assert_eq!(parse_command("q"), Some(Command::Quit));
        assert_eq!(parse_command("scan everything"), None);
    }

    #[test]
    fn not_ready_lists_each_capability() {
        let text = render_status(Phase::NotReady, &CapabilityStatus::new(true, false));
        assert!(text.contains("Camera - To scan business cards: Granted"));
        assert!(text.contains("Photo Library - To save scanned images: Not granted"));
        assert!(text.contains("Grant Permissions"));
    }

    #[test]
    fn busy_phases_show_checking() {
        for phase in [Phase::Checking, Phase::Requesting] {
            assert_eq!(render_status(phase, &CapabilityStatus::DENIED), "Checking permissions...");
        }
    }

    #[test]
    fn denial_offers_retry_and_cancel() {
        let text = render_event(&AppEvent::PermissionsDenied(CapabilityStatus::DENIED)).unwrap();
        assert!(text.contains("[retry]"));
        assert!(text.contains("[cancel]"));
        assert!(render_event(&AppEvent::BackendReady).is_none());
    }
}
