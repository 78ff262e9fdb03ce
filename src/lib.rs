//! # webpane
//!
//! Opens a single top-level window hosting an embedded webview pointed at a
//! caller-supplied URL, places it DPI-aware on a chosen monitor, optionally
//! auto-fills a login form, optionally evaluates a result script when the
//! window is closed, and removes the session's user-data directory on exit.
//!
//! The process writes exactly one line to standard output: the evaluated
//! result-script value if one was configured, otherwise the final browser URL
//! at close time. All diagnostics go to stderr via `tracing`.

pub mod cleanup;
pub mod error;
pub mod geometry;
pub mod paths;
pub mod session;
pub mod settings;
pub mod store;

#[cfg(feature = "gui")]
pub mod webview;

pub use error::HostError;
pub use geometry::{MonitorInfo, WindowBounds};
pub use session::SessionController;
pub use settings::LaunchSettings;
