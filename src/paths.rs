//! Path utilities for locating bridge data and the Things database.
//!
//! Bridge-owned files (configuration and the log) live in `~/.tasknote-bridge/`.
//! The Things database lives inside the Things group container and is found
//! by scanning for its `ThingsData-*` directory.

use std::path::{Path, PathBuf};

/// The base directory name for bridge data.
const DATA_DIR_NAME: &str = ".tasknote-bridge";

/// The configuration filename.
pub const CONFIG_FILENAME: &str = "config.yaml";

/// The log filename.
pub const LOG_FILENAME: &str = "bridge.log";

/// Environment variable that overrides the Things database location.
pub const THINGS_DB_ENV: &str = "THINGSDB";

/// Group container holding the Things data directories.
const THINGS_CONTAINER: &str = "Library/Group Containers/JLMPQHK86H.com.culturedcode.ThingsMac";

/// Prefix of the per-account data directory inside the container.
const THINGS_DATA_PREFIX: &str = "ThingsData-";

/// Database file path relative to a `ThingsData-*` directory.
const THINGS_DB_RELATIVE: &str = "Things Database.thingsdatabase/main.sqlite";

/// Get the base data directory for the bridge.
///
/// Returns `~/.tasknote-bridge/` or `None` if the home directory
/// cannot be determined.
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DATA_DIR_NAME))
}

/// Default configuration file path.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join(CONFIG_FILENAME))
}

/// Default log file path.
#[must_use]
pub fn log_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join(LOG_FILENAME))
}

/// Locate the Things database.
///
/// The explicit path wins, then the `THINGSDB` environment variable, then the
/// first `ThingsData-*` directory in the group container under the home directory.
#[must_use]
pub fn things_db_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(THINGS_DB_ENV).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().and_then(|home| find_things_db(&home.join(THINGS_CONTAINER)))
}

/// Find `main.sqlite` under the first `ThingsData-*` directory of a container.
fn find_things_db(container: &Path) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(container)
        .ok()?
        .flatten()
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(THINGS_DATA_PREFIX))
        .map(|entry| entry.path().join(THINGS_DB_RELATIVE))
        .filter(|path| path.exists())
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_data_dir_returns_home_based_path() {
        if let Some(home) = dirs::home_dir() {
            let data = data_dir().unwrap();
            assert_eq!(data, home.join(".tasknote-bridge"));
        }
    }

    #[test]
    fn test_config_and_log_live_in_data_dir() {
        if let (Some(config), Some(log)) = (config_path(), log_path()) {
            assert!(config.ends_with(".tasknote-bridge/config.yaml"));
            assert!(log.ends_with(".tasknote-bridge/bridge.log"));
        }
    }

    #[test]
    fn test_explicit_path_wins() {
        let path = things_db_path(Some(Path::new("/tmp/things.sqlite")));
        assert_eq!(path, Some(PathBuf::from("/tmp/things.sqlite")));
    }

    #[test]
    fn test_find_things_db_in_container() {
        let dir = TempDir::new().unwrap();
        let db_dir = dir.path().join("ThingsData-ABC12").join("Things Database.thingsdatabase");
        std::fs::create_dir_all(&db_dir).unwrap();
        std::fs::write(db_dir.join("main.sqlite"), b"").unwrap();
        std::fs::create_dir_all(dir.path().join("Unrelated")).unwrap();

        let found = find_things_db(dir.path()).unwrap();
        assert_eq!(found, db_dir.join("main.sqlite"));
    }

    #[test]
    fn test_find_things_db_ignores_empty_data_dirs() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("ThingsData-EMPTY")).unwrap();
        assert!(find_things_db(dir.path()).is_none());
    }

    #[test]
    fn test_find_things_db_missing_container() {
        assert!(find_things_db(Path::new("/definitely/not/a/container")).is_none());
    }
}
