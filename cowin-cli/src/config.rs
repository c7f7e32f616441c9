//! Locating and loading the JSON configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use cowin_core::config::{Config, ConfigError};

const APP_DIR: &str = "cowin-cowboy";
const CONFIG_FILE: &str = "config.json";

/// `config.json` inside the platform's user configuration directory.
pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
        .ok_or(ConfigError::NoConfigDir)
}

/// The custom path when given, otherwise [`default_path`].
pub(crate) fn resolve_path(custom: Option<&Path>) -> Result<PathBuf, ConfigError> {
    custom.map_or_else(default_path, |path| Ok(path.to_path_buf()))
}

/// Read and validate the configuration file at `path`.
pub(crate) fn load(path: &Path) -> Result<Config, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = Config::from_json(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    config.locations()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn custom_path_wins() {
        let custom = PathBuf::from("/etc/cowin.json");
        assert_eq!(
            resolve_path(Some(&custom)).ok(),
            Some(custom),
            "custom path kept"
        );
    }

    #[test]
    fn default_path_ends_in_app_config() {
        if let Ok(path) = default_path() {
            assert!(
                path.ends_with("cowin-cowboy/config.json"),
                "unexpected default {}",
                path.display()
            );
        }
    }

    #[test]
    fn loads_a_valid_file() {
        let file = config_file(r#"{"locations": {"pincodes": ["560001"]}, "weeks": 2}"#);
        let config = load(file.path()).expect("valid config");
        assert_eq!(config.weeks_to_check(), 2, "weeks");
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = load(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))), "not found");
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let file = config_file("{ locations: ");
        assert!(
            matches!(load(file.path()), Err(ConfigError::Parse { .. })),
            "parse error"
        );
    }

    #[test]
    fn missing_locations_is_rejected() {
        let file = config_file(r#"{"filters": {"age": 45}}"#);
        assert!(
            matches!(load(file.path()), Err(ConfigError::MissingLocations)),
            "locations required"
        );
    }
}
