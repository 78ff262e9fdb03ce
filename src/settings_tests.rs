use super::*;

fn valid_settings() -> LaunchSettings {
    LaunchSettings::for_url("https://example.com/")
}

// ============================================================================
// Spec parsing
// ============================================================================

#[test]
fn test_size_spec_literal() {
    assert_eq!(
        "1024x768".parse::<SizeSpec>().unwrap(),
        SizeSpec::Literal {
            width: 1024,
            height: 768
        }
    );
    assert_eq!(
        "800X600".parse::<SizeSpec>().unwrap(),
        SizeSpec::Literal {
            width: 800,
            height: 600
        }
    );
}

#[test]
fn test_size_spec_last_case_insensitive() {
    assert_eq!("Last".parse::<SizeSpec>().unwrap(), SizeSpec::Last);
    assert_eq!("last".parse::<SizeSpec>().unwrap(), SizeSpec::Last);
    assert_eq!("LAST".parse::<SizeSpec>().unwrap(), SizeSpec::Last);
}

#[test]
fn test_size_spec_rejects_garbage() {
    assert_eq!("1024".parse::<SizeSpec>(), Err(SpecError::InvalidSize));
    assert_eq!("x768".parse::<SizeSpec>(), Err(SpecError::InvalidSize));
    assert_eq!("ax b".parse::<SizeSpec>(), Err(SpecError::InvalidSize));
    assert_eq!("-10x20".parse::<SizeSpec>(), Err(SpecError::InvalidSize));
}

#[test]
fn test_location_spec_named_values() {
    assert_eq!("Center".parse::<LocationSpec>().unwrap(), LocationSpec::Center);
    assert_eq!("center".parse::<LocationSpec>().unwrap(), LocationSpec::Center);
    assert_eq!("Last".parse::<LocationSpec>().unwrap(), LocationSpec::Last);
}

#[test]
fn test_location_spec_offset() {
    assert_eq!(
        "100,80".parse::<LocationSpec>().unwrap(),
        LocationSpec::Offset { x: 100, y: 80 }
    );
    assert_eq!(
        "-20, 40".parse::<LocationSpec>().unwrap(),
        LocationSpec::Offset { x: -20, y: 40 }
    );
}

#[test]
fn test_location_spec_rejects_garbage() {
    assert_eq!("10".parse::<LocationSpec>(), Err(SpecError::InvalidLocation));
    assert_eq!("a,b".parse::<LocationSpec>(), Err(SpecError::InvalidLocation));
    assert_eq!("middle".parse::<LocationSpec>(), Err(SpecError::InvalidLocation));
}

#[test]
fn test_window_state_spec() {
    assert_eq!("Normal".parse::<WindowStateSpec>().unwrap(), WindowStateSpec::Normal);
    assert_eq!(
        "minimized".parse::<WindowStateSpec>().unwrap(),
        WindowStateSpec::Minimized
    );
    assert_eq!(
        "MAXIMIZED".parse::<WindowStateSpec>().unwrap(),
        WindowStateSpec::Maximized
    );
    assert_eq!("docked".parse::<WindowStateSpec>(), Err(SpecError::InvalidState));
}

#[test]
fn test_opt_nonblank() {
    assert_eq!(opt_nonblank(None), None);
    assert_eq!(opt_nonblank(Some("".to_string())), None);
    assert_eq!(opt_nonblank(Some("   ".to_string())), None);
    assert_eq!(opt_nonblank(Some(" x ".to_string())), Some("x".to_string()));
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_valid_settings_pass() {
    let result = SettingsValidator::validate(&valid_settings(), 1);
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_url_scheme_is_required() {
    let mut settings = valid_settings();
    settings.url = "ftp://example.com".to_string();
    let result = SettingsValidator::validate(&settings, 1);
    assert!(!result.is_valid());
    assert_eq!(result.errors[0].field, "url");
}

#[test]
fn test_url_must_parse() {
    let mut settings = valid_settings();
    settings.url = "http://".to_string();
    let result = SettingsValidator::validate(&settings, 1);
    assert!(!result.is_valid());
}

#[test]
fn test_monitor_index_bounds() {
    let mut settings = valid_settings();

    settings.monitor_index = -1;
    assert!(SettingsValidator::validate(&settings, 2).is_valid());

    settings.monitor_index = 1;
    assert!(SettingsValidator::validate(&settings, 2).is_valid());

    // Index equal to the monitor count is a validation error, not a fault.
    settings.monitor_index = 2;
    let result = SettingsValidator::validate(&settings, 2);
    assert!(!result.is_valid());
    assert_eq!(result.errors[0].field, "monitor");

    settings.monitor_index = -2;
    assert!(!SettingsValidator::validate(&settings, 2).is_valid());
}

#[test]
fn test_zoom_factor_range() {
    let mut settings = valid_settings();

    settings.zoom_factor = ZOOM_MIN;
    assert!(SettingsValidator::validate(&settings, 1).is_valid());

    settings.zoom_factor = ZOOM_MAX;
    assert!(SettingsValidator::validate(&settings, 1).is_valid());

    settings.zoom_factor = 0.05;
    assert!(!SettingsValidator::validate(&settings, 1).is_valid());

    settings.zoom_factor = 3.5;
    assert!(!SettingsValidator::validate(&settings, 1).is_valid());

    settings.zoom_factor = f64::NAN;
    assert!(!SettingsValidator::validate(&settings, 1).is_valid());
}

#[test]
fn test_password_requires_username() {
    let mut settings = valid_settings();
    settings.password = Some("secret".to_string());
    let result = SettingsValidator::validate(&settings, 1);
    assert!(!result.is_valid());
    assert_eq!(result.errors[0].field, "password");

    settings.username = Some("alice".to_string());
    assert!(SettingsValidator::validate(&settings, 1).is_valid());
}

#[test]
fn test_refresh_interval_bounds() {
    let mut settings = valid_settings();

    settings.refresh_interval_secs = REFRESH_MAX_SECS;
    assert!(SettingsValidator::validate(&settings, 1).is_valid());

    settings.refresh_interval_secs = REFRESH_MAX_SECS + 1;
    assert!(!SettingsValidator::validate(&settings, 1).is_valid());
}

#[test]
fn test_long_refresh_interval_warns() {
    let mut settings = valid_settings();
    settings.refresh_interval_secs = 7200;
    let result = SettingsValidator::validate(&settings, 1);
    assert!(result.is_valid());
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].field, "refresh");
}

#[test]
fn test_environment_name_characters() {
    let mut settings = valid_settings();

    settings.environment = Some("prod-2".to_string());
    assert!(SettingsValidator::validate(&settings, 1).is_valid());

    settings.environment = Some("prod/2".to_string());
    assert!(!SettingsValidator::validate(&settings, 1).is_valid());

    settings.environment = Some(String::new());
    assert!(!SettingsValidator::validate(&settings, 1).is_valid());
}

#[test]
fn test_errors_are_collected_not_short_circuited() {
    let mut settings = valid_settings();
    settings.url = "nope".to_string();
    settings.zoom_factor = 9.0;
    settings.password = Some("secret".to_string());
    let result = SettingsValidator::validate(&settings, 1);
    assert_eq!(result.errors.len(), 3);
}
