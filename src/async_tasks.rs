//! Background work for the URL actions of the memo editor
//!
//! Copying and opening are fire-and-forget. Results come back to the event
//! loop as [`TaskMessage`]s; tasks never touch modal or app state.

use crate::bookmarks::BookmarkManager;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use crossterm::execute;
use crossterm::style::Print;
use std::io;
use std::process::{Command, Stdio};
use tokio::sync::mpsc;

/// Messages sent from background tasks to the main thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskMessage {
    /// The terminal was asked to put the URL on the clipboard
    UrlCopied { url: String },

    CopyFailed { error: String },

    /// The platform opener was launched
    UrlOpened { url: String },

    OpenFailed { url: String, error: String },
}

/// Spawns background tasks and hands their results to the event loop
pub struct AsyncTaskRunner {
    tx: mpsc::UnboundedSender<TaskMessage>,
}

impl AsyncTaskRunner {
    pub fn new(tx: mpsc::UnboundedSender<TaskMessage>) -> Self {
        Self { tx }
    }

    /// Copy text to the system clipboard through an OSC 52 escape sequence
    pub fn spawn_copy(&self, url: String) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let sequence = osc52_sequence(&url);
            let result = tokio::task::spawn_blocking(move || {
                let mut stdout = io::stdout();
                execute!(stdout, Print(sequence))
            })
            .await;

            let message = match result {
                Ok(Ok(())) => {
                    tracing::info!("Copied URL to clipboard: {}", url);
                    TaskMessage::UrlCopied { url }
                }
                Ok(Err(e)) => {
                    tracing::error!("Clipboard write failed: {}", e);
                    TaskMessage::CopyFailed {
                        error: e.to_string(),
                    }
                }
                Err(e) => {
                    tracing::error!("Task join error during copy: {}", e);
                    TaskMessage::CopyFailed {
                        error: format!("Task join error: {}", e),
                    }
                }
            };
            let _ = tx.send(message);
        });
    }

    /// Open a URL with the platform's default handler
    pub fn spawn_open_url(&self, url: String) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let target = url.clone();
            let result = tokio::task::spawn_blocking(move || open_url(&target)).await;

            let message = match result {
                Ok(Ok(())) => {
                    tracing::info!("Opened URL: {}", url);
                    TaskMessage::UrlOpened { url }
                }
                Ok(Err(error)) => {
                    tracing::warn!("Failed to open {}: {}", url, error);
                    TaskMessage::OpenFailed { url, error }
                }
                Err(e) => TaskMessage::OpenFailed {
                    url,
                    error: format!("Task join error: {}", e),
                },
            };
            let _ = tx.send(message);
        });
    }
}

pub fn osc52_sequence(text: &str) -> String {
    let encoded = STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x1b\\")
}

fn open_url(url: &str) -> Result<(), String> {
    if BookmarkManager::normalize_url(url).as_deref() != Some(url.trim()) {
        return Err("Only http and https URLs can be opened".to_string());
    }

    let mut command = opener_command(url.trim());
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|e| e.to_string())
}

#[cfg(target_os = "macos")]
fn opener_command(url: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(url);
    command
}

#[cfg(target_os = "windows")]
fn opener_command(url: &str) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", "", url]);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command(url: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(url);
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_osc52_sequence() {
        assert_eq!(osc52_sequence("hi"), "\x1b]52;c;aGk=\x1b\\");
    }

    #[test]
    fn test_open_rejects_other_schemes() {
        assert!(open_url("file:///etc/passwd").is_err());
        assert!(open_url("   ").is_err());
    }
}
