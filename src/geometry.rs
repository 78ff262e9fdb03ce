//! DPI-aware window geometry across a multi-monitor environment.
//!
//! Pure calculations only; the monitor snapshot is taken once at startup by
//! the windowing layer and handed in read-only.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settings::{LocationSpec, SizeSpec};

/// An absolute window rectangle in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowBounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Read-only snapshot of one monitor.
///
/// `work_area` is the usable rectangle excluding OS-reserved regions; on
/// platforms where the windowing layer does not expose it, it equals
/// `bounds`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorInfo {
    pub bounds: WindowBounds,
    pub work_area: WindowBounds,
    /// Effective DPI divided by 96 (1.0 at standard density).
    pub scale_factor: f64,
    pub is_primary: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// "Last" was requested but no bounds were ever persisted. The caller
    /// decides the fallback; the calculator never invents defaults.
    #[error("no stored window bounds from a previous run")]
    NoStoredBounds,
}

/// Scale a logical size to physical pixels, rounding to nearest.
pub fn scaled_size(width: u32, height: u32, scale_factor: f64) -> (u32, u32) {
    (
        (width as f64 * scale_factor).round() as u32,
        (height as f64 * scale_factor).round() as u32,
    )
}

/// Resolve the requested size and location into an absolute rectangle on the
/// given monitor.
///
/// A `WxH` literal is scaled by the monitor's DPI factor; stored bounds are
/// already physical pixels and are used unscaled. The result is not clamped
/// to the monitor: a too-large window may extend off-screen.
pub fn resolve_bounds(
    monitor: &MonitorInfo,
    size: &SizeSpec,
    location: &LocationSpec,
    last: Option<&WindowBounds>,
) -> Result<WindowBounds, GeometryError> {
    let (width, height) = match size {
        SizeSpec::Literal { width, height } => {
            scaled_size(*width, *height, monitor.scale_factor)
        }
        SizeSpec::Last => {
            let stored = last.ok_or(GeometryError::NoStoredBounds)?;
            (stored.width, stored.height)
        }
    };

    let area = &monitor.work_area;
    let (x, y) = match location {
        LocationSpec::Center => (
            (area.x as i64 + (area.width as i64 - width as i64) / 2) as i32,
            (area.y as i64 + (area.height as i64 - height as i64) / 2) as i32,
        ),
        LocationSpec::Last => {
            let stored = last.ok_or(GeometryError::NoStoredBounds)?;
            (stored.x, stored.y)
        }
        LocationSpec::Offset { x, y } => (area.x + x, area.y + y),
    };

    Ok(WindowBounds {
        x,
        y,
        width,
        height,
    })
}

/// Pick the target monitor from the snapshot. `-1` resolves to the primary
/// monitor regardless of enumeration order; other indices are positional and
/// assumed validated.
pub fn select_monitor(monitors: &[MonitorInfo], index: i32) -> Option<&MonitorInfo> {
    if index < 0 {
        monitors
            .iter()
            .find(|m| m.is_primary)
            .or_else(|| monitors.first())
    } else {
        monitors.get(index as usize)
    }
}

#[cfg(test)]
#[path = "geometry_tests.rs"]
mod tests;
