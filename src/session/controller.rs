//! Session lifecycle controller.
//!
//! Owns the phase machine and the two event-driven hooks (auto-login,
//! exit-result). Runs entirely on the UI thread: events arrive serialized,
//! so no transition needs locking.

use std::time::Duration;

use tracing::{debug, info};

use crate::settings::LaunchSettings;

use super::autologin::{AutoLoginAutomator, ENTER_DELAY_MS};
use super::exit_result::{CloseDecision, ExitResultExtractor};
use super::protocol::{EvalKind, SessionCommand, SessionEvent};

/// Session lifecycle phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Created,
    Initializing,
    Ready,
    Navigating,
    Loaded,
    Closing,
    Closed,
}

/// Turns engine events into engine commands for one session.
pub struct SessionController {
    phase: SessionPhase,
    initial_url: String,
    current_url: String,
    has_explicit_title: bool,
    refresh_active: bool,
    autologin: AutoLoginAutomator,
    exit: ExitResultExtractor,
}

impl SessionController {
    pub fn new(settings: &LaunchSettings) -> Self {
        Self {
            phase: SessionPhase::Created,
            initial_url: settings.url.clone(),
            current_url: settings.url.clone(),
            has_explicit_title: settings.title.is_some(),
            refresh_active: settings.refresh_interval_secs > 0,
            autologin: AutoLoginAutomator::new(
                settings.username.clone(),
                settings.password.clone(),
            ),
            exit: ExitResultExtractor::new(settings.result_script.clone()),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// URL of the page currently shown (tracked via source-changed events).
    pub fn current_url(&self) -> &str {
        &self.current_url
    }

    /// Engine allocation has started.
    pub fn engine_starting(&mut self) {
        self.set_phase(SessionPhase::Initializing);
    }

    /// The engine is disposed; the partition directory may still be locked
    /// briefly, which the cleanup retries absorb.
    pub fn mark_closed(&mut self) {
        self.set_phase(SessionPhase::Closed);
    }

    /// Handle one engine event and return the commands it triggers.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<SessionCommand> {
        match event {
            SessionEvent::Initialized => self.on_initialized(),
            SessionEvent::SourceChanged(url) => {
                self.current_url = url;
                Vec::new()
            }
            SessionEvent::TitleChanged(title) => self.on_title_changed(title),
            SessionEvent::ContentLoaded => self.on_content_loaded(),
            SessionEvent::NavigationCompleted => self.on_navigation_completed(),
            SessionEvent::NewWindowRequested(url) => self.on_new_window(url),
            SessionEvent::RefreshTick => self.on_refresh_tick(),
            SessionEvent::CloseRequested => self.on_close_requested(),
            SessionEvent::EvalCompleted { kind, result } => self.on_eval_completed(kind, result),
        }
    }

    // ========================================================================
    // Event handlers
    // ========================================================================

    fn on_initialized(&mut self) -> Vec<SessionCommand> {
        self.set_phase(SessionPhase::Ready);
        self.set_phase(SessionPhase::Navigating);
        vec![SessionCommand::Navigate(self.initial_url.clone())]
    }

    fn on_title_changed(&mut self, title: String) -> Vec<SessionCommand> {
        if self.has_explicit_title || self.is_closing() {
            Vec::new()
        } else {
            vec![SessionCommand::SetWindowTitle(title)]
        }
    }

    fn on_content_loaded(&mut self) -> Vec<SessionCommand> {
        if self.is_closing() {
            return Vec::new();
        }
        match self.autologin.on_content_loaded() {
            Some(probe) => vec![SessionCommand::Evaluate {
                kind: EvalKind::LoginProbe,
                script: probe.to_string(),
            }],
            None => Vec::new(),
        }
    }

    fn on_navigation_completed(&mut self) -> Vec<SessionCommand> {
        if !self.is_closing() {
            // Loaded fires on every completed navigation, including the
            // refresh timer's reloads.
            self.set_phase(SessionPhase::Loaded);
        }
        Vec::new()
    }

    fn on_new_window(&mut self, url: String) -> Vec<SessionCommand> {
        if self.is_closing() {
            return Vec::new();
        }
        // Exactly one window/session pair per run: popups are redirected
        // into the existing webview.
        debug!("redirecting new-window request into the current session: {url}");
        vec![SessionCommand::Navigate(url)]
    }

    fn on_refresh_tick(&mut self) -> Vec<SessionCommand> {
        if self.phase == SessionPhase::Loaded {
            vec![SessionCommand::Navigate(self.current_url.clone())]
        } else {
            Vec::new()
        }
    }

    fn on_close_requested(&mut self) -> Vec<SessionCommand> {
        if self.is_closing() {
            return Vec::new();
        }
        let mut commands = Vec::new();
        if self.refresh_active {
            self.refresh_active = false;
            commands.push(SessionCommand::CancelRefresh);
        }
        match self.exit.on_close_requested() {
            CloseDecision::Proceed => {
                if !self.exit.has_script() {
                    commands.push(SessionCommand::EmitResult(self.current_url.clone()));
                }
                self.set_phase(SessionPhase::Closing);
                commands.push(SessionCommand::AllowClose);
            }
            CloseDecision::Defer(script) => {
                info!("close deferred while the result script runs");
                commands.push(SessionCommand::Evaluate {
                    kind: EvalKind::ExitResult,
                    script,
                });
            }
            CloseDecision::AlreadyPending => {}
        }
        commands
    }

    fn on_eval_completed(
        &mut self,
        kind: EvalKind,
        result: Result<String, String>,
    ) -> Vec<SessionCommand> {
        match kind {
            EvalKind::LoginProbe => {
                let result = result.as_deref().map_err(|e| e.as_str());
                match self.autologin.on_probe_result(result) {
                    // The Enter press is queued once the injection
                    // completes, not here.
                    Some(injection) => vec![SessionCommand::Evaluate {
                        kind: EvalKind::LoginInject,
                        script: injection.script,
                    }],
                    None => Vec::new(),
                }
            }
            EvalKind::LoginInject => {
                let result = result.as_deref().map_err(|e| e.as_str());
                if self.autologin.on_inject_result(result) {
                    vec![SessionCommand::PressEnterAfter(Duration::from_millis(
                        ENTER_DELAY_MS,
                    ))]
                } else {
                    Vec::new()
                }
            }
            EvalKind::ExitResult => {
                let mut commands = Vec::new();
                if let Some(value) = self.exit.on_result(result) {
                    commands.push(SessionCommand::EmitResult(value));
                }
                commands.push(SessionCommand::RequestClose);
                commands
            }
        }
    }

    // ========================================================================
    // Phase bookkeeping
    // ========================================================================

    fn is_closing(&self) -> bool {
        matches!(self.phase, SessionPhase::Closing | SessionPhase::Closed)
    }

    fn set_phase(&mut self, next: SessionPhase) {
        if self.phase != next {
            debug!("session phase {:?} -> {:?}", self.phase, next);
            self.phase = next;
        }
    }
}
