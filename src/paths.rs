//! Partition naming and on-disk locations for per-user session state.

use std::env;
use std::path::PathBuf;

/// Fixed suffix appended to the OS user name to form the partition name.
const PARTITION_SUFFIX: &str = "webpane";

/// Root directory for all persistent program state.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".webpane")
}

/// Partition name identifying one isolated browsing session.
///
/// Derived from the current OS user plus an optional environment suffix so
/// that concurrent instances with distinct environments never share a
/// user-data directory.
pub fn partition_name(environment: Option<&str>) -> String {
    let user = current_user();
    match environment {
        Some(env) => format!("{user}.{PARTITION_SUFFIX}.{env}"),
        None => format!("{user}.{PARTITION_SUFFIX}"),
    }
}

/// Prefix shared by every partition of the current user, regardless of
/// environment suffix. Used by the cleanup sweep.
pub fn partition_prefix() -> String {
    format!("{}.{PARTITION_SUFFIX}", current_user())
}

/// User-data directory backing the given partition.
pub fn partition_dir(partition: &str) -> PathBuf {
    app_data_dir().join(partition)
}

/// Location of the persisted window-bounds file.
pub fn bounds_file() -> PathBuf {
    app_data_dir().join("bounds.json")
}

fn current_user() -> String {
    env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .unwrap_or_else(|_| "default".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_name_without_environment() {
        let name = partition_name(None);
        assert!(name.ends_with(".webpane"));
        assert!(!name.starts_with('.'));
    }

    #[test]
    fn test_partition_name_with_environment() {
        let name = partition_name(Some("staging"));
        assert!(name.ends_with(".webpane.staging"));
    }

    #[test]
    fn test_partition_names_are_distinct_per_environment() {
        assert_ne!(partition_name(None), partition_name(Some("prod")));
        assert_ne!(partition_name(Some("prod")), partition_name(Some("test")));
    }

    #[test]
    fn test_partition_prefix_matches_names() {
        let prefix = partition_prefix();
        assert!(partition_name(None).starts_with(&prefix));
        assert!(partition_name(Some("e")).starts_with(&prefix));
    }

    #[test]
    fn test_partition_dir_is_under_app_data_dir() {
        let dir = partition_dir("alice.webpane");
        assert!(dir.starts_with(app_data_dir()));
    }
}
