//! Session orchestration: lifecycle state machine, auto-login automation,
//! and exit-result extraction.
//!
//! The controller is pure: engine callbacks come in as [`SessionEvent`]s and
//! engine work goes out as [`SessionCommand`]s, so every transition is
//! testable without a live webview. The `webview` module binds the real
//! engine on one side of this protocol.

mod autologin;
mod controller;
mod exit_result;
mod protocol;

pub use autologin::{AutoLoginAutomator, AutoLoginState, Injection, ENTER_DELAY_MS};
pub use controller::{SessionController, SessionPhase};
pub use exit_result::{CloseDecision, ExitCapture, ExitResultExtractor};
pub use protocol::{EvalKind, SessionCommand, SessionEvent};
