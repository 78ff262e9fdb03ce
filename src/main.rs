//! webpane - single-window web page host.
//!
//! Main entry point: argument parsing, logging setup, and the open/cleanup
//! command flows.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use webpane::cleanup::CleanupManager;
use webpane::geometry::{self, GeometryError, WindowBounds};
use webpane::paths;
use webpane::settings::{
    opt_nonblank, LaunchSettings, LocationSpec, SessionOptions, SettingsValidator, SizeSpec,
    WindowStateSpec, DEFAULT_HEIGHT, DEFAULT_WIDTH,
};
use webpane::store::{BoundsStore, JsonBoundsStore};
use webpane::webview::WebviewHost;

const EXIT_OK: u8 = 0;
const EXIT_FATAL: u8 = 1;
const EXIT_VALIDATION: u8 = 2;

/// webpane CLI.
#[derive(Parser)]
#[command(name = "webpane")]
#[command(about = "Open a URL in a single embedded browser window")]
#[command(version)]
struct Cli {
    /// URL to open (http/https only)
    url: Option<String>,

    /// Text for the window title (default: the document title)
    #[arg(short = 't', long)]
    title: Option<String>,

    /// Window size, e.g. "1024x768", or "Last"
    #[arg(short = 's', long, default_value = "1280x720")]
    size: SizeSpec,

    /// Window location, e.g. "100,80", or "Last" | "Center"
    #[arg(short = 'l', long, default_value = "Center")]
    location: LocationSpec,

    /// Window state: "Normal" | "Minimized" | "Maximized"
    #[arg(short = 'w', long = "windowstate", default_value = "Normal")]
    window_state: WindowStateSpec,

    /// Target monitor number (-1 for the primary monitor)
    #[arg(short = 'm', long, default_value_t = -1, allow_hyphen_values = true)]
    monitor: i32,

    /// Zoom factor for the web content (0.1 .. 3.0)
    #[arg(short = 'z', long = "zoomfactor", default_value_t = 1.0)]
    zoom_factor: f64,

    /// Keep the window on top of all other windows
    #[arg(short = 'o', long = "ontop")]
    on_top: bool,

    /// Create the window without decorations
    #[arg(long)]
    borderless: bool,

    /// Keep the user data directory on exit
    #[arg(short = 'k', long = "keepuserdata")]
    keep_user_data: bool,

    /// User name for auto-login on the web page
    #[arg(short = 'u', long)]
    user: Option<String>,

    /// Password for auto-login on the web page
    #[arg(short = 'p', long)]
    password: Option<String>,

    /// Automatic reload interval in seconds (0 disables)
    #[arg(short = 'r', long = "refresh", default_value_t = 0)]
    refresh: u64,

    /// Script evaluated against the page on close; its value becomes the
    /// program output instead of the final URL
    #[arg(long = "result-script")]
    result_script: Option<String>,

    /// Environment name namespacing persisted state and the partition
    #[arg(short = 'e', long)]
    environment: Option<String>,

    /// Allow single sign-on with the OS primary account where supported
    #[arg(long = "allow-sso")]
    allow_sso: bool,

    /// Prefer a dark window theme
    #[arg(long)]
    dark: bool,

    /// Ignore TLS certificate errors where supported
    #[arg(long = "ignore-cert-errors")]
    ignore_cert_errors: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove all of the current user's partition directories and the
    /// persisted window bounds
    Cleanup,
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    let code = match &cli.command {
        Some(Commands::Cleanup) => run_cleanup(),
        None => run_open(cli),
    };
    ExitCode::from(code)
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("WEBPANE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    // Stdout carries exactly one result line; all diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_open(cli: Cli) -> u8 {
    let Some(url) = cli.url else {
        error!("a URL argument is required (see --help)");
        return EXIT_VALIDATION;
    };

    let settings = LaunchSettings {
        url: url.trim().to_string(),
        title: opt_nonblank(cli.title),
        size: cli.size,
        location: cli.location,
        window_state: cli.window_state,
        monitor_index: cli.monitor,
        zoom_factor: cli.zoom_factor,
        top_most: cli.on_top,
        borderless: cli.borderless,
        keep_user_data: cli.keep_user_data,
        username: opt_nonblank(cli.user),
        password: opt_nonblank(cli.password),
        refresh_interval_secs: cli.refresh,
        result_script: opt_nonblank(cli.result_script),
        environment: opt_nonblank(cli.environment),
        session: SessionOptions {
            allow_sso: cli.allow_sso,
            prefer_dark_mode: cli.dark,
            ignore_cert_errors: cli.ignore_cert_errors,
        },
    };

    let host = match WebviewHost::new() {
        Ok(host) => host,
        Err(e) => {
            error!("{e}");
            return EXIT_FATAL;
        }
    };

    // Settings are checked once, before any window or session exists; an
    // invalid setting aborts with no side effects.
    let validation = SettingsValidator::validate(&settings, host.monitors().len());
    for warning in &validation.warnings {
        warn!("{}: {}", warning.field, warning.message);
    }
    if !validation.is_valid() {
        for error in &validation.errors {
            error!("{error}");
        }
        return EXIT_VALIDATION;
    }

    let Some(monitor) = geometry::select_monitor(host.monitors(), settings.monitor_index).copied()
    else {
        error!("monitor {} not found", settings.monitor_index);
        return EXIT_VALIDATION;
    };

    let mut store = JsonBoundsStore::open_default();
    let last = store.load(settings.environment.as_deref());
    let bounds = match geometry::resolve_bounds(&monitor, &settings.size, &settings.location, last.as_ref())
    {
        Ok(bounds) => bounds,
        Err(GeometryError::NoStoredBounds) => {
            warn!(
                "no window bounds stored from a previous run; \
                 using the {DEFAULT_WIDTH}x{DEFAULT_HEIGHT} centered default"
            );
            let fallback = SizeSpec::Literal {
                width: DEFAULT_WIDTH,
                height: DEFAULT_HEIGHT,
            };
            geometry::resolve_bounds(&monitor, &fallback, &LocationSpec::Center, None).unwrap_or(
                WindowBounds {
                    x: monitor.work_area.x,
                    y: monitor.work_area.y,
                    width: DEFAULT_WIDTH,
                    height: DEFAULT_HEIGHT,
                },
            )
        }
    };

    let partition = paths::partition_name(settings.environment.as_deref());
    let partition_dir = paths::partition_dir(&partition);

    let outcome = match host.run(&settings, bounds, &partition_dir) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("session failed: {e}");
            return EXIT_FATAL;
        }
    };

    if let Some(final_bounds) = outcome.final_bounds {
        if let Err(e) = store.save(settings.environment.as_deref(), &final_bounds) {
            warn!("could not persist window bounds: {e}");
        }
    }

    if settings.keep_user_data {
        info!("keeping user data at {}", partition_dir.display());
    } else {
        CleanupManager::default().remove_partition(&partition_dir);
    }

    EXIT_OK
}

fn run_cleanup() -> u8 {
    let removed = CleanupManager::default().sweep_user_data();
    info!("removed {removed} partition directories");
    EXIT_OK
}
