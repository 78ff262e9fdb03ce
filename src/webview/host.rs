//! Webview host: window construction, event-loop pumping, and command
//! execution for one session.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tao::dpi::{PhysicalPosition, PhysicalSize};
use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoop, EventLoopBuilder, EventLoopProxy};
use tao::platform::run_return::EventLoopExtRunReturn;
use tao::window::{Theme, Window, WindowBuilder};
use tracing::{debug, info, warn};
use wry::{PageLoadEvent, WebContext, WebView, WebViewBuilder};

use crate::error::HostError;
use crate::geometry::{MonitorInfo, WindowBounds};
use crate::session::{SessionCommand, SessionController, SessionEvent};
use crate::settings::{LaunchSettings, WindowStateSpec};

use super::input;

/// What the UI loop left behind after the window closed.
#[derive(Debug, Clone, Copy)]
pub struct SessionOutcome {
    /// Window rectangle at close time, for the bounds store. `None` when
    /// the platform could not report it.
    pub final_bounds: Option<WindowBounds>,
}

/// Owns the native event loop and the monitor snapshot taken at startup.
pub struct WebviewHost {
    event_loop: EventLoop<SessionEvent>,
    monitors: Vec<MonitorInfo>,
}

impl WebviewHost {
    /// Create the event loop and snapshot the monitor layout.
    ///
    /// `work_area` equals the monitor bounds on platforms where the
    /// windowing layer exposes no taskbar-excluded rectangle.
    pub fn new() -> Result<Self, HostError> {
        let event_loop = EventLoopBuilder::<SessionEvent>::with_user_event().build();
        let primary_position = event_loop.primary_monitor().map(|m| m.position());

        let monitors: Vec<MonitorInfo> = event_loop
            .available_monitors()
            .map(|m| {
                let position = m.position();
                let size = m.size();
                let bounds = WindowBounds {
                    x: position.x,
                    y: position.y,
                    width: size.width,
                    height: size.height,
                };
                MonitorInfo {
                    bounds,
                    work_area: bounds,
                    scale_factor: m.scale_factor(),
                    is_primary: primary_position.map(|p| p == position).unwrap_or(false),
                }
            })
            .collect();
        if monitors.is_empty() {
            return Err(HostError::NoMonitors);
        }

        Ok(Self {
            event_loop,
            monitors,
        })
    }

    pub fn monitors(&self) -> &[MonitorInfo] {
        &self.monitors
    }

    /// Run one session to completion: build the window and webview at the
    /// resolved bounds, pump the UI loop until the controller allows the
    /// close, then dispose the engine.
    pub fn run(
        self,
        settings: &LaunchSettings,
        bounds: WindowBounds,
        partition_dir: &Path,
    ) -> Result<SessionOutcome, HostError> {
        let mut event_loop = self.event_loop;
        let proxy = event_loop.create_proxy();

        let mut controller = SessionController::new(settings);
        controller.engine_starting();

        let initial_title = settings
            .title
            .clone()
            .unwrap_or_else(|| settings.url.to_lowercase());

        let window = WindowBuilder::new()
            .with_title(initial_title)
            .with_position(PhysicalPosition::new(bounds.x, bounds.y))
            .with_inner_size(PhysicalSize::new(bounds.width, bounds.height))
            .with_always_on_top(settings.top_most)
            .with_decorations(!settings.borderless)
            .with_theme(if settings.session.prefer_dark_mode {
                Some(Theme::Dark)
            } else {
                None
            })
            .build(&event_loop)
            .map_err(|e| HostError::WindowCreation(e.to_string()))?;
        match settings.window_state {
            WindowStateSpec::Normal => {}
            WindowStateSpec::Minimized => window.set_minimized(true),
            WindowStateSpec::Maximized => window.set_maximized(true),
        }

        if settings.session.allow_sso {
            debug!("single sign-on with the OS primary account is not supported by this engine");
        }
        if settings.session.ignore_cert_errors {
            debug!("certificate errors cannot be ignored with this engine");
        }

        info!(
            "opening {} in partition {}",
            settings.url,
            partition_dir.display()
        );
        let mut web_context = WebContext::new(Some(partition_dir.to_path_buf()));
        let webview = build_webview(&mut web_context, &window, &proxy)?;
        if let Err(e) = webview.zoom(settings.zoom_factor) {
            warn!("could not apply zoom factor: {e}");
        }

        // Observers are attached; hand control to the session machine.
        let _ = proxy.send_event(SessionEvent::Initialized);

        let refresh_cancel = Arc::new(AtomicBool::new(false));
        if settings.refresh_interval_secs > 0 {
            spawn_refresh_timer(
                proxy.clone(),
                refresh_cancel.clone(),
                Duration::from_secs(settings.refresh_interval_secs),
            );
        }

        let mut final_bounds: Option<WindowBounds> = None;
        event_loop.run_return(|event, _, control_flow| {
            *control_flow = ControlFlow::Wait;

            let session_event = match event {
                Event::WindowEvent {
                    event: WindowEvent::CloseRequested,
                    ..
                } => Some(SessionEvent::CloseRequested),
                Event::UserEvent(ev) => Some(ev),
                _ => None,
            };
            let Some(session_event) = session_event else {
                return;
            };

            for command in controller.handle(session_event) {
                match command {
                    SessionCommand::Navigate(url) => {
                        if let Err(e) = webview.load_url(&url) {
                            warn!("navigation to {url} failed: {e}");
                        }
                    }
                    SessionCommand::SetWindowTitle(title) => window.set_title(&title),
                    SessionCommand::Evaluate { kind, script } => {
                        let callback_proxy = proxy.clone();
                        let issued = webview.evaluate_script_with_callback(&script, move |value| {
                            // The engine serializes the result as JSON; an
                            // empty string means the script produced no
                            // value (threw or returned undefined).
                            let result = if value.is_empty() {
                                Err("script produced no value".to_string())
                            } else {
                                Ok(value)
                            };
                            let _ = callback_proxy
                                .send_event(SessionEvent::EvalCompleted { kind, result });
                        });
                        if let Err(e) = issued {
                            let _ = proxy.send_event(SessionEvent::EvalCompleted {
                                kind,
                                result: Err(e.to_string()),
                            });
                        }
                    }
                    SessionCommand::PressEnterAfter(delay) => spawn_enter_press(delay),
                    SessionCommand::EmitResult(value) => println!("{value}"),
                    SessionCommand::CancelRefresh => {
                        refresh_cancel.store(true, Ordering::Relaxed);
                    }
                    SessionCommand::RequestClose => {
                        let _ = proxy.send_event(SessionEvent::CloseRequested);
                    }
                    SessionCommand::AllowClose => {
                        final_bounds = window_bounds(&window);
                        *control_flow = ControlFlow::Exit;
                    }
                }
            }
        });

        refresh_cancel.store(true, Ordering::Relaxed);

        // Dispose the webview before cleanup can touch the partition
        // directory; residual engine locks are absorbed by the cleanup
        // retries.
        drop(webview);
        drop(web_context);
        controller.mark_closed();

        Ok(SessionOutcome { final_bounds })
    }
}

/// Build the webview with all observers wired to the event-loop proxy.
fn build_webview(
    web_context: &mut WebContext,
    window: &Window,
    proxy: &EventLoopProxy<SessionEvent>,
) -> Result<WebView, HostError> {
    let source_proxy = proxy.clone();
    let load_proxy = proxy.clone();
    let title_proxy = proxy.clone();
    let popup_proxy = proxy.clone();

    // No initial URL: navigation is a controller command once the session
    // reports Initialized. Some platforms still emit events for an implicit
    // blank document, which must not consume the one-shot login probe.
    let builder = WebViewBuilder::with_web_context(web_context)
        .with_navigation_handler(move |url| {
            if url != "about:blank" {
                let _ = source_proxy.send_event(SessionEvent::SourceChanged(url));
            }
            true
        })
        .with_on_page_load_handler(move |event, url| {
            if matches!(event, PageLoadEvent::Finished) && url != "about:blank" {
                let _ = load_proxy.send_event(SessionEvent::ContentLoaded);
                let _ = load_proxy.send_event(SessionEvent::NavigationCompleted);
            }
        })
        .with_document_title_changed_handler(move |title| {
            let _ = title_proxy.send_event(SessionEvent::TitleChanged(title));
        })
        .with_new_window_req_handler(move |url| {
            let _ = popup_proxy.send_event(SessionEvent::NewWindowRequested(url));
            // Deny the popup; the controller navigates the existing
            // session instead.
            false
        });

    #[cfg(not(target_os = "linux"))]
    let webview = builder
        .build(window)
        .map_err(|e| HostError::WebviewCreation(e.to_string()))?;
    #[cfg(target_os = "linux")]
    let webview = {
        use tao::platform::unix::WindowExtUnix;
        use wry::WebViewBuilderExtUnix;
        let vbox = window
            .default_vbox()
            .ok_or_else(|| HostError::WebviewCreation("window has no gtk container".to_string()))?;
        builder
            .build_gtk(vbox)
            .map_err(|e| HostError::WebviewCreation(e.to_string()))?
    };

    Ok(webview)
}

/// Periodic reload ticks, marshalled onto the UI loop through the proxy.
/// The first tick waits one extra second beyond the interval.
fn spawn_refresh_timer(
    proxy: EventLoopProxy<SessionEvent>,
    cancel: Arc<AtomicBool>,
    interval: Duration,
) {
    thread::spawn(move || {
        thread::sleep(interval + Duration::from_secs(1));
        loop {
            if cancel.load(Ordering::Relaxed) {
                break;
            }
            if proxy.send_event(SessionEvent::RefreshTick).is_err() {
                break;
            }
            thread::sleep(interval);
        }
    });
}

/// Trusted Enter press on a worker thread after the settle delay. The key
/// goes to the OS input layer, never to the session, so no marshalling back
/// is needed.
fn spawn_enter_press(delay: Duration) {
    thread::spawn(move || {
        thread::sleep(delay);
        if let Err(e) = input::press_enter() {
            warn!("enter key simulation failed: {e}");
        }
    });
}

fn window_bounds(window: &Window) -> Option<WindowBounds> {
    let position = match window.outer_position() {
        Ok(position) => position,
        Err(e) => {
            debug!("window position unavailable: {e}");
            return None;
        }
    };
    let size = window.outer_size();
    Some(WindowBounds {
        x: position.x,
        y: position.y,
        width: size.width,
        height: size.height,
    })
}
