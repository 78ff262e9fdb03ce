use super::*;

fn monitor(x: i32, y: i32, width: u32, height: u32, scale_factor: f64) -> MonitorInfo {
    let bounds = WindowBounds {
        x,
        y,
        width,
        height,
    };
    MonitorInfo {
        bounds,
        work_area: bounds,
        scale_factor,
        is_primary: false,
    }
}

#[test]
fn test_scaled_size_rounds_to_nearest() {
    for scale in [0.5, 1.0, 1.25, 1.5, 1.75, 2.0] {
        let (w, h) = scaled_size(1024, 768, scale);
        assert_eq!(w, (1024.0 * scale).round() as u32);
        assert_eq!(h, (768.0 * scale).round() as u32);
    }
    // Fractional products round rather than truncate.
    assert_eq!(scaled_size(999, 999, 1.1), (1099, 1099));
}

#[test]
fn test_center_on_full_hd() {
    let mon = monitor(0, 0, 1920, 1080, 1.0);
    let bounds = resolve_bounds(
        &mon,
        &SizeSpec::Literal {
            width: 800,
            height: 600,
        },
        &LocationSpec::Center,
        None,
    )
    .unwrap();
    assert_eq!(
        bounds,
        WindowBounds {
            x: 560,
            y: 240,
            width: 800,
            height: 600
        }
    );
}

#[test]
fn test_center_respects_work_area_origin() {
    // Secondary monitor to the right of a primary one.
    let mon = monitor(1920, 200, 1920, 1080, 1.0);
    let bounds = resolve_bounds(
        &mon,
        &SizeSpec::Literal {
            width: 800,
            height: 600,
        },
        &LocationSpec::Center,
        None,
    )
    .unwrap();
    assert_eq!(bounds.x, 1920 + 560);
    assert_eq!(bounds.y, 200 + 240);
}

#[test]
fn test_explicit_offset_is_relative_to_work_area() {
    let mon = monitor(1920, 0, 2560, 1440, 1.0);
    let bounds = resolve_bounds(
        &mon,
        &SizeSpec::Literal {
            width: 640,
            height: 480,
        },
        &LocationSpec::Offset { x: 100, y: 80 },
        None,
    )
    .unwrap();
    assert_eq!((bounds.x, bounds.y), (2020, 80));
}

#[test]
fn test_literal_size_is_dpi_scaled() {
    let mon = monitor(0, 0, 3840, 2160, 2.0);
    let bounds = resolve_bounds(
        &mon,
        &SizeSpec::Literal {
            width: 1280,
            height: 720,
        },
        &LocationSpec::Center,
        None,
    )
    .unwrap();
    assert_eq!((bounds.width, bounds.height), (2560, 1440));
    assert_eq!((bounds.x, bounds.y), (640, 360));
}

#[test]
fn test_last_size_is_used_unscaled() {
    let mon = monitor(0, 0, 1920, 1080, 2.0);
    let stored = WindowBounds {
        x: 10,
        y: 20,
        width: 900,
        height: 700,
    };
    let bounds = resolve_bounds(&mon, &SizeSpec::Last, &LocationSpec::Center, Some(&stored))
        .unwrap();
    // Stored bounds are already physical pixels; no second scaling.
    assert_eq!((bounds.width, bounds.height), (900, 700));
}

#[test]
fn test_last_location_is_used_verbatim() {
    let mon = monitor(0, 0, 1920, 1080, 1.0);
    let stored = WindowBounds {
        x: -50,
        y: 999,
        width: 640,
        height: 480,
    };
    let bounds = resolve_bounds(
        &mon,
        &SizeSpec::Literal {
            width: 640,
            height: 480,
        },
        &LocationSpec::Last,
        Some(&stored),
    )
    .unwrap();
    assert_eq!((bounds.x, bounds.y), (-50, 999));
}

#[test]
fn test_last_without_stored_bounds_is_surfaced() {
    let mon = monitor(0, 0, 1920, 1080, 1.0);
    assert_eq!(
        resolve_bounds(&mon, &SizeSpec::Last, &LocationSpec::Center, None),
        Err(GeometryError::NoStoredBounds)
    );
    assert_eq!(
        resolve_bounds(
            &mon,
            &SizeSpec::Literal {
                width: 10,
                height: 10
            },
            &LocationSpec::Last,
            None
        ),
        Err(GeometryError::NoStoredBounds)
    );
}

#[test]
fn test_oversized_window_extends_off_screen() {
    let mon = monitor(0, 0, 1920, 1080, 1.0);
    let bounds = resolve_bounds(
        &mon,
        &SizeSpec::Literal {
            width: 2400,
            height: 1400,
        },
        &LocationSpec::Center,
        None,
    )
    .unwrap();
    // No clamping: centering a too-large window yields negative origins but
    // keeps the size intact.
    assert_eq!((bounds.x, bounds.y), (-240, -160));
    assert_eq!((bounds.width, bounds.height), (2400, 1400));
}

#[test]
fn test_select_monitor_primary() {
    let mut first = monitor(0, 0, 1920, 1080, 1.0);
    let mut second = monitor(1920, 0, 1920, 1080, 1.0);
    second.is_primary = true;

    // Primary wins for -1 regardless of ordering.
    let monitors = vec![first, second];
    let chosen = select_monitor(&monitors, -1).unwrap();
    assert!(chosen.is_primary);
    assert_eq!(chosen.bounds.x, 1920);

    // Positional indexing is unaffected.
    assert_eq!(select_monitor(&monitors, 0).unwrap().bounds.x, 0);
    assert_eq!(select_monitor(&monitors, 1).unwrap().bounds.x, 1920);
    assert!(select_monitor(&monitors, 2).is_none());

    // Snapshot with no primary flag falls back to the first monitor.
    second.is_primary = false;
    first.is_primary = false;
    let monitors = vec![first, second];
    assert_eq!(select_monitor(&monitors, -1).unwrap().bounds.x, 0);
}
