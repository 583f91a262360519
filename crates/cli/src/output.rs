//! Terminal output.

use std::io::Write;

use winner_admin::{Notification, Notifier};

/// Write text to stdout, adding a trailing newline if missing.
pub fn print(text: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    if text.ends_with('\n') {
        stdout.write_all(text.as_bytes())
    } else {
        writeln!(stdout, "{text}")
    }
}

/// Prints console notifications as they are raised.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        if let Err(e) = print(&notification.to_string()) {
            tracing::warn!(error = %e, "Failed to print notification");
        }
    }
}
