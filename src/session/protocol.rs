//! Event/command protocol between the controller and the embedded engine.

use std::time::Duration;

/// Why a script evaluation was issued. Tags the completion callback so the
/// controller can route the result without inspecting the script text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalKind {
    /// Boolean probe for a visible password field.
    LoginProbe,
    /// Credential-filling injection.
    LoginInject,
    /// Caller-supplied result script on close.
    ExitResult,
}

/// Engine callbacks, delivered serialized on the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Engine finished initializing; observers are attached.
    Initialized,
    /// The page source (URL) changed.
    SourceChanged(String),
    /// The document title changed.
    TitleChanged(String),
    /// The page's DOM is parsed; fires on every completed navigation.
    ContentLoaded,
    /// A navigation finished.
    NavigationCompleted,
    /// The page asked for a new window (e.g. `target="_blank"`).
    NewWindowRequested(String),
    /// The background refresh timer fired.
    RefreshTick,
    /// The user (or the controller itself) asked to close the window.
    CloseRequested,
    /// An evaluation issued earlier has completed.
    EvalCompleted {
        kind: EvalKind,
        result: Result<String, String>,
    },
}

/// Engine work ordered by the controller in response to an event.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Navigate the (single) webview to the URL.
    Navigate(String),
    /// Update the window title.
    SetWindowTitle(String),
    /// Evaluate a script; completion must come back as
    /// [`SessionEvent::EvalCompleted`] with the same kind.
    Evaluate { kind: EvalKind, script: String },
    /// Simulate an OS-level Enter key press after the given settle delay.
    PressEnterAfter(Duration),
    /// Write one line to the output sink (stdout).
    EmitResult(String),
    /// Stop the background refresh timer.
    CancelRefresh,
    /// Re-issue a close request (second phase of the two-phase close).
    RequestClose,
    /// Let the pending close proceed; the UI loop may exit.
    AllowClose,
}
