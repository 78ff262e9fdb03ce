//! Launch settings: spec parsing, normalization, and validation.
//!
//! Settings are validated once, atomically, before any window or session is
//! created. An invalid setting aborts the run with no side effects.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use url::Url;

/// Zoom factor bounds for the web content.
pub const ZOOM_MIN: f64 = 0.1;
pub const ZOOM_MAX: f64 = 3.0;

/// Upper bound for the automatic refresh interval (24 hours).
pub const REFRESH_MAX_SECS: u64 = 86_400;

/// Fallback window size applied when "Last" is requested with no prior
/// bounds on record.
pub const DEFAULT_WIDTH: u32 = 1280;
pub const DEFAULT_HEIGHT: u32 = 720;

/// Spec string parse failures, surfaced before validation proper.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SpecError {
    #[error("invalid window size (allowed values: \"<w>x<h>\" | \"Last\")")]
    InvalidSize,

    #[error("invalid window location (allowed values: \"<x>,<y>\" | \"Last\" | \"Center\")")]
    InvalidLocation,

    #[error("invalid window state (allowed values: \"Normal\" | \"Minimized\" | \"Maximized\")")]
    InvalidState,
}

/// Requested window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeSpec {
    /// Logical `WxH` literal, scaled by the monitor DPI factor.
    Literal { width: u32, height: u32 },
    /// Reuse the stored size from the previous run, unscaled.
    Last,
}

impl FromStr for SizeSpec {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("last") {
            return Ok(SizeSpec::Last);
        }
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or(SpecError::InvalidSize)?;
        let width = w.trim().parse().map_err(|_| SpecError::InvalidSize)?;
        let height = h.trim().parse().map_err(|_| SpecError::InvalidSize)?;
        Ok(SizeSpec::Literal { width, height })
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeSpec::Literal { width, height } => write!(f, "{width}x{height}"),
            SizeSpec::Last => write!(f, "Last"),
        }
    }
}

/// Requested window location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSpec {
    /// Explicit offset from the target monitor's working-area top-left.
    Offset { x: i32, y: i32 },
    /// Center within the target monitor's working area.
    Center,
    /// Reuse the stored location from the previous run.
    Last,
}

impl FromStr for LocationSpec {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("center") {
            return Ok(LocationSpec::Center);
        }
        if s.eq_ignore_ascii_case("last") {
            return Ok(LocationSpec::Last);
        }
        let (x, y) = s.split_once(',').ok_or(SpecError::InvalidLocation)?;
        let x = x.trim().parse().map_err(|_| SpecError::InvalidLocation)?;
        let y = y.trim().parse().map_err(|_| SpecError::InvalidLocation)?;
        Ok(LocationSpec::Offset { x, y })
    }
}

impl fmt::Display for LocationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationSpec::Offset { x, y } => write!(f, "{x},{y}"),
            LocationSpec::Center => write!(f, "Center"),
            LocationSpec::Last => write!(f, "Last"),
        }
    }
}

/// Initial window state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowStateSpec {
    #[default]
    Normal,
    Minimized,
    Maximized,
}

impl FromStr for WindowStateSpec {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("normal") {
            Ok(WindowStateSpec::Normal)
        } else if s.eq_ignore_ascii_case("minimized") {
            Ok(WindowStateSpec::Minimized)
        } else if s.eq_ignore_ascii_case("maximized") {
            Ok(WindowStateSpec::Maximized)
        } else {
            Err(SpecError::InvalidState)
        }
    }
}

/// Engine options applied at session creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Allow single sign-on with the OS primary account where the engine
    /// supports it.
    pub allow_sso: bool,
    /// Prefer a dark window/content theme.
    pub prefer_dark_mode: bool,
    /// Ignore TLS certificate errors where the engine supports it.
    pub ignore_cert_errors: bool,
}

/// Immutable launch parameters for one session.
#[derive(Debug, Clone)]
pub struct LaunchSettings {
    /// Target URL (http/https only).
    pub url: String,
    /// Explicit window title; the document title is used when absent.
    pub title: Option<String>,
    pub size: SizeSpec,
    pub location: LocationSpec,
    pub window_state: WindowStateSpec,
    /// Target monitor index; `-1` selects the primary monitor.
    pub monitor_index: i32,
    /// Content zoom factor, validated to 0.1..=3.0.
    pub zoom_factor: f64,
    /// Keep the window above all others.
    pub top_most: bool,
    /// Create the window without decorations.
    pub borderless: bool,
    /// Retain the user-data directory on exit.
    pub keep_user_data: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Automatic reload period in seconds; 0 disables the refresh timer.
    pub refresh_interval_secs: u64,
    /// Script evaluated against the page when the window is closed; its
    /// value becomes the program result.
    pub result_script: Option<String>,
    /// Namespace for persisted state and the partition name.
    pub environment: Option<String>,
    pub session: SessionOptions,
}

impl LaunchSettings {
    /// Minimal settings for the given URL; everything else at defaults.
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            size: SizeSpec::Literal {
                width: DEFAULT_WIDTH,
                height: DEFAULT_HEIGHT,
            },
            location: LocationSpec::Center,
            window_state: WindowStateSpec::Normal,
            monitor_index: -1,
            zoom_factor: 1.0,
            top_most: false,
            borderless: false,
            keep_user_data: false,
            username: None,
            password: None,
            refresh_interval_secs: 0,
            result_script: None,
            environment: None,
            session: SessionOptions::default(),
        }
    }
}

/// Turn blank or whitespace-only optional inputs into `None`.
pub fn opt_nonblank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

// ============================================================================
// Validation
// ============================================================================

/// A validation error, tied to the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A non-fatal validation warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validation outcome: all errors and warnings, collected in one pass.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// Settings validator.
pub struct SettingsValidator;

impl SettingsValidator {
    /// Validate the settings against the monitor snapshot.
    pub fn validate(settings: &LaunchSettings, monitor_count: usize) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_url(settings, &mut result);
        Self::validate_monitor(settings, monitor_count, &mut result);
        Self::validate_zoom(settings, &mut result);
        Self::validate_credentials(settings, &mut result);
        Self::validate_refresh(settings, &mut result);
        Self::validate_environment(settings, &mut result);

        result
    }

    fn validate_url(settings: &LaunchSettings, result: &mut ValidationResult) {
        let lower = settings.url.to_ascii_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            result.add_error(ValidationError::new(
                "url",
                "must start with \"http://\" or \"https://\"",
            ));
            return;
        }
        if let Err(e) = Url::parse(&settings.url) {
            result.add_error(ValidationError::new("url", format!("not a valid URL: {e}")));
        }
    }

    fn validate_monitor(
        settings: &LaunchSettings,
        monitor_count: usize,
        result: &mut ValidationResult,
    ) {
        let index = settings.monitor_index;
        if index < -1 || index >= monitor_count as i32 {
            result.add_error(ValidationError::new(
                "monitor",
                format!(
                    "monitor number out of range (monitors available: {monitor_count}, \
                     value must be -1 or 0..={})",
                    monitor_count.saturating_sub(1)
                ),
            ));
        }
    }

    fn validate_zoom(settings: &LaunchSettings, result: &mut ValidationResult) {
        let zoom = settings.zoom_factor;
        if !zoom.is_finite() || zoom < ZOOM_MIN || zoom > ZOOM_MAX {
            result.add_error(ValidationError::new(
                "zoomfactor",
                format!("zoom factor must be in range {ZOOM_MIN} .. {ZOOM_MAX}"),
            ));
        }
    }

    fn validate_credentials(settings: &LaunchSettings, result: &mut ValidationResult) {
        if settings.password.is_some() && settings.username.is_none() {
            result.add_error(ValidationError::new(
                "password",
                "password given without a username",
            ));
        }
    }

    fn validate_refresh(settings: &LaunchSettings, result: &mut ValidationResult) {
        if settings.refresh_interval_secs > REFRESH_MAX_SECS {
            result.add_error(ValidationError::new(
                "refresh",
                format!("refresh interval must be in range 0 .. {REFRESH_MAX_SECS} seconds"),
            ));
        } else if settings.refresh_interval_secs > 3600 {
            result.add_warning(ValidationWarning::new(
                "refresh",
                "refresh interval is longer than an hour",
            ));
        }
    }

    fn validate_environment(settings: &LaunchSettings, result: &mut ValidationResult) {
        if let Some(env) = &settings.environment {
            let ok = !env.is_empty()
                && env
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            if !ok {
                result.add_error(ValidationError::new(
                    "environment",
                    "environment name may only contain ASCII letters, digits, '-' and '_'",
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
