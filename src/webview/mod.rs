//! Real engine binding: a `tao` event loop and window hosting a `wry`
//! webview scoped to the session's user-data directory.
//!
//! Engine callbacks are marshalled onto the UI loop through the event-loop
//! proxy and fed to the [`crate::session::SessionController`]; the commands
//! it returns are executed against the live window and webview.

mod host;
mod input;

pub use host::{SessionOutcome, WebviewHost};
