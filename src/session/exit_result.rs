//! Exit-result extraction with a two-phase close.
//!
//! The first close attempt is cancelled while the result script runs; the
//! second attempt, with the result captured, proceeds. An explicit
//! three-state flag guards the round trip so a close delivered while the
//! evaluation is still in flight stays cancelled instead of slipping
//! through.

use tracing::warn;

/// Capture progress for the exit result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCapture {
    NotStarted,
    InProgress,
    Done,
}

/// What the close handler should do with the current close attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum CloseDecision {
    /// No script configured, or the result is already captured.
    Proceed,
    /// Cancel this close, evaluate the script, then close again.
    Defer(String),
    /// An evaluation is already in flight; stay cancelled.
    AlreadyPending,
}

/// Evaluates the caller-supplied result script exactly once, against the
/// page state at the moment the user chose to close.
pub struct ExitResultExtractor {
    script: Option<String>,
    capture: ExitCapture,
}

impl ExitResultExtractor {
    pub fn new(script: Option<String>) -> Self {
        Self {
            script,
            capture: ExitCapture::NotStarted,
        }
    }

    pub fn capture(&self) -> ExitCapture {
        self.capture
    }

    /// Whether a result script was configured at all. When false, the final
    /// URL is the program result instead.
    pub fn has_script(&self) -> bool {
        self.script.is_some()
    }

    /// Gate a close attempt.
    pub fn on_close_requested(&mut self) -> CloseDecision {
        match (&self.script, self.capture) {
            (None, _) | (_, ExitCapture::Done) => CloseDecision::Proceed,
            (Some(_), ExitCapture::InProgress) => CloseDecision::AlreadyPending,
            (Some(script), ExitCapture::NotStarted) => {
                self.capture = ExitCapture::InProgress;
                CloseDecision::Defer(script.clone())
            }
        }
    }

    /// Record the evaluation outcome. Returns the value to emit, if any;
    /// a failed evaluation still completes the capture so the close can
    /// proceed (best-effort, nothing written to the output sink).
    pub fn on_result(&mut self, result: Result<String, String>) -> Option<String> {
        if self.capture != ExitCapture::InProgress {
            return None;
        }
        self.capture = ExitCapture::Done;
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("result script evaluation failed: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "exit_result_tests.rs"]
mod tests;
