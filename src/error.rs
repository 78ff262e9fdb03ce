//! Top-level error taxonomy for the session orchestrator.

use thiserror::Error;

/// Fatal orchestrator errors. Validation failures are reported separately by
/// [`crate::settings::SettingsValidator`] before any window is created;
/// cleanup and automation failures are best-effort and never surface here.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("No monitors available")]
    NoMonitors,

    #[error("Window creation failed: {0}")]
    WindowCreation(String),

    #[error("Webview creation failed: {0}")]
    WebviewCreation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
