//! Best-effort scripted auto-login.
//!
//! One probe, at most one injection per session. Absence of a password field
//! is the normal non-login-page case, not an error.

use tracing::{debug, warn};

/// Settle delay applied inside the injection script before the password
/// field is written.
pub const FIELD_SETTLE_MS: u64 = 1000;

/// Delay before the simulated Enter press, measured from injection
/// completion so it lands after the in-page password settle delay.
pub const ENTER_DELAY_MS: u64 = 2000;

/// Boolean probe: a password-typed input exists and is not CSS-hidden.
const LOGIN_PROBE_JS: &str = r#"(function () {
    const el = document.querySelector("input[type='password']");
    return el !== null && window.getComputedStyle(el).visibility !== 'hidden';
})()"#;

/// Credential-filling script. `{username}`, `{password}` and `{settle}` are
/// replaced before evaluation; the credentials land as JSON string literals.
const AUTO_LOGIN_TEMPLATE: &str = r#"(function () {
    const inputs = Array.from(document.getElementsByTagName('input'));
    const pwd = inputs.find(function (el) { return el.type === 'password'; });
    if (!pwd) { return false; }
    let form = pwd.parentNode;
    while (form && form.nodeName.toLowerCase() !== 'form') {
        form = form.parentNode;
    }
    if (!form) { return false; }
    let user = null;
    for (const el of form.getElementsByTagName('input')) {
        if (el.type === 'text' || el.type === 'email') { user = el; }
    }
    if (!user) { return false; }
    user.focus({ preventScroll: true });
    user.value = {username};
    const secret = {password};
    setTimeout(function () {
        pwd.focus({ preventScroll: secret.length > 0 });
        pwd.value = secret;
    }, {settle});
    return true;
})()"#;

/// Auto-login progress; `Injected` and `Skipped` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoLoginState {
    Idle,
    Polling,
    Injected,
    Skipped,
}

/// A prepared injection: the script to evaluate plus whether a trusted
/// Enter press should follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Injection {
    pub script: String,
    pub press_enter: bool,
}

/// Drives the auto-login sequence off content-loaded events.
pub struct AutoLoginAutomator {
    state: AutoLoginState,
    username: Option<String>,
    password: Option<String>,
    enter_pending: bool,
}

impl AutoLoginAutomator {
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        Self {
            state: AutoLoginState::Idle,
            username,
            password,
            enter_pending: false,
        }
    }

    pub fn state(&self) -> AutoLoginState {
        self.state
    }

    /// React to a content-loaded event. Returns the probe script on the
    /// first event when credentials were supplied; later events (redirect
    /// reloads, refresh timers) are no-ops.
    pub fn on_content_loaded(&mut self) -> Option<&'static str> {
        if self.state != AutoLoginState::Idle {
            return None;
        }
        if self.username.is_none() {
            self.state = AutoLoginState::Skipped;
            return None;
        }
        self.state = AutoLoginState::Polling;
        Some(LOGIN_PROBE_JS)
    }

    /// React to the probe result. A visible password field yields the
    /// injection; anything else (non-login page, probe failure) skips.
    pub fn on_probe_result(&mut self, result: Result<&str, &str>) -> Option<Injection> {
        if self.state != AutoLoginState::Polling {
            return None;
        }
        match result {
            Ok(value) if parse_bool(value) => {
                self.state = AutoLoginState::Injected;
                let injection = self.build_injection();
                self.enter_pending = injection.press_enter;
                Some(injection)
            }
            Ok(_) => {
                debug!("no visible password field, skipping auto-login");
                self.state = AutoLoginState::Skipped;
                None
            }
            Err(e) => {
                warn!("login probe failed: {e}");
                self.state = AutoLoginState::Skipped;
                None
            }
        }
    }

    /// React to the injection completing. Returns true when the trusted
    /// Enter press should fire; the script reports false when the form
    /// structure it expects is missing.
    pub fn on_inject_result(&mut self, result: Result<&str, &str>) -> bool {
        let filled = match result {
            Ok(value) if parse_bool(value) => true,
            Ok(_) => {
                debug!("login form structure not found during injection");
                false
            }
            Err(e) => {
                warn!("auto-login injection failed: {e}");
                false
            }
        };
        let press = filled && self.enter_pending;
        self.enter_pending = false;
        press
    }

    fn build_injection(&self) -> Injection {
        let username = self.username.as_deref().unwrap_or("");
        let password = self.password.as_deref().unwrap_or("");
        let script = AUTO_LOGIN_TEMPLATE
            .replace("{username}", &js_string(username))
            .replace("{password}", &js_string(password))
            .replace("{settle}", &FIELD_SETTLE_MS.to_string());
        Injection {
            script,
            press_enter: self.password.is_some(),
        }
    }
}

/// Encode a value as a JavaScript string literal (JSON escaping).
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Engine evaluation results come back JSON-serialized; a bare or quoted
/// `true` both count.
fn parse_bool(value: &str) -> bool {
    value.trim().trim_matches('"').eq_ignore_ascii_case("true")
}

#[cfg(test)]
#[path = "autologin_tests.rs"]
mod tests;
