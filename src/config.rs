// Configuration store: persists the service credentials and the chosen
// environment to a JSON file, and reads them back before every query. The
// file is small and single-user, so it is rewritten wholesale on each save
// rather than patched in place.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ConfigError;

/// Base URL of the test endpoint of the traceability service.
pub const TEST_BASE_URL: &str = "https://test.senasa.gov.ar/agrotraza/src/api/";

/// Base URL of the production endpoint of the traceability service.
pub const PRODUCTION_BASE_URL: &str = "https://aps2.senasa.gov.ar/agrotraza/src/api/";

/// File name of the stored configuration, kept as a dotfile in the user's
/// home directory.
const CONFIG_FILE_NAME: &str = ".agrotraza_config.json";

/// The two deployment targets of the service. Each owns one literal base
/// URL; there is no third option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Test,
    Production,
}

impl Environment {
    /// The literal base URL this environment queries against.
    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Test => TEST_BASE_URL,
            Environment::Production => PRODUCTION_BASE_URL,
        }
    }

    /// Re-derives the environment from a stored URL, for files written
    /// before the explicit `environment` tag existed: a URL with `test`
    /// anywhere in it is the test endpoint, anything else counts as
    /// production. A URL matching neither marker therefore also lands on
    /// production; the tag written on every save avoids relying on this.
    pub fn infer_from_url(url: &str) -> Environment {
        if url.contains("test") {
            Environment::Test
        } else {
            Environment::Production
        }
    }
}

/// The persisted configuration. Field names match the JSON keys of the
/// stored file (`cuit`, `user`, `password`, `url`); the `environment` tag is
/// written on every save but is optional on load so files without it still
/// parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub cuit: String,
    pub user: String,
    pub password: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    environment: Option<Environment>,
}

impl Config {
    /// The environment this configuration points at: the stored tag when
    /// present, otherwise inferred from the URL.
    pub fn environment(&self) -> Environment {
        self.environment
            .unwrap_or_else(|| Environment::infer_from_url(&self.url))
    }

    fn is_complete(&self) -> bool {
        !self.cuit.is_empty()
            && !self.user.is_empty()
            && !self.password.is_empty()
            && !self.url.is_empty()
    }
}

/// Owns the path of the configuration file and the save/load/validity
/// operations against it.
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Creates a store over an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ConfigStore { path: path.into() }
    }

    /// Creates a store over the default location: a dotfile in the user's
    /// home directory, falling back to the current directory when no home
    /// is available.
    pub fn default_location() -> Self {
        let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        ConfigStore {
            path: dir.join(CONFIG_FILE_NAME),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validates and persists a configuration, overwriting any previous
    /// file. The three text inputs are trimmed first; if any of them ends up
    /// empty nothing is written and the previous file is left untouched. The
    /// base URL is selected from the chosen environment, never typed in.
    pub fn save(
        &self,
        cuit: &str,
        user: &str,
        password: &str,
        environment: Environment,
    ) -> Result<Config, ConfigError> {
        let cuit = cuit.trim();
        let user = user.trim();
        let password = password.trim();

        if cuit.is_empty() || user.is_empty() || password.is_empty() {
            return Err(ConfigError::MissingFields);
        }

        let config = Config {
            cuit: cuit.to_string(),
            user: user.to_string(),
            password: password.to_string(),
            url: environment.base_url().to_string(),
            environment: Some(environment),
        };

        let json = serde_json::to_string_pretty(&config)?;
        std::fs::write(&self.path, json)?;
        debug!("configuration saved to {}", self.path.display());
        Ok(config)
    }

    /// Reads the stored configuration back. A missing file is reported as
    /// `NotFound` so callers can tell "never configured" apart from an
    /// unreadable or corrupt file.
    pub fn load(&self) -> Result<Config, ConfigError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound
            } else {
                ConfigError::Io(e)
            }
        })?;
        let config: Config = serde_json::from_str(&raw)?;
        debug!("configuration loaded from {}", self.path.display());
        Ok(config)
    }

    /// Whether a query may run: a load must succeed and all four stored
    /// fields must be non-empty. Every failure mode collapses to `false`.
    pub fn is_valid(&self) -> bool {
        self.load().map(|c| c.is_complete()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> ConfigStore {
        ConfigStore::new(dir.path().join("config.json"))
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let saved = store
            .save("20-12345678-9", "inspector", "secreto", Environment::Test)
            .unwrap();
        assert_eq!(saved.url, TEST_BASE_URL);

        let loaded = store.load().unwrap();
        assert_eq!(loaded.cuit, "20-12345678-9");
        assert_eq!(loaded.user, "inspector");
        assert_eq!(loaded.password, "secreto");
        assert_eq!(loaded.environment(), Environment::Test);
    }

    #[test]
    fn save_selects_url_per_environment() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store
            .save("20-1", "u", "p", Environment::Production)
            .unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.url, PRODUCTION_BASE_URL);
        assert_eq!(loaded.environment(), Environment::Production);
    }

    #[test]
    fn save_trims_text_inputs() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store
            .save("  20-1  ", " inspector ", " secreto ", Environment::Test)
            .unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.cuit, "20-1");
        assert_eq!(loaded.user, "inspector");
        assert_eq!(loaded.password, "secreto");
    }

    #[test]
    fn save_rejects_empty_fields_without_touching_previous_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save("20-1", "u", "p", Environment::Test).unwrap();
        let before = std::fs::read_to_string(store.path()).unwrap();

        let err = store
            .save("", "u", "p", Environment::Production)
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingFields));

        let after = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn save_rejects_whitespace_only_password_without_creating_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let err = store
            .save("20-1", "u", "   ", Environment::Test)
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingFields));
        assert!(!store.path().exists());
    }

    #[test]
    fn load_without_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(matches!(store.load().unwrap_err(), ConfigError::NotFound));
    }

    #[test]
    fn load_with_corrupt_file_is_malformed() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.load().unwrap_err(), ConfigError::Malformed(_)));
    }

    #[test]
    fn environment_is_inferred_for_files_without_tag() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let legacy = format!(
            r#"{{"cuit": "20-1", "user": "u", "password": "p", "url": "{}"}}"#,
            TEST_BASE_URL
        );
        std::fs::write(store.path(), legacy).unwrap();
        assert_eq!(store.load().unwrap().environment(), Environment::Test);

        let legacy = format!(
            r#"{{"cuit": "20-1", "user": "u", "password": "p", "url": "{}"}}"#,
            PRODUCTION_BASE_URL
        );
        std::fs::write(store.path(), legacy).unwrap();
        assert_eq!(store.load().unwrap().environment(), Environment::Production);
    }

    #[test]
    fn unrecognized_url_infers_production() {
        assert_eq!(
            Environment::infer_from_url("https://example.com/api/"),
            Environment::Production
        );
    }

    #[test]
    fn is_valid_requires_file_and_complete_fields() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(!store.is_valid());

        store.save("20-1", "u", "p", Environment::Test).unwrap();
        assert!(store.is_valid());

        let incomplete = format!(
            r#"{{"cuit": "20-1", "user": "", "password": "p", "url": "{}"}}"#,
            TEST_BASE_URL
        );
        std::fs::write(store.path(), incomplete).unwrap();
        assert!(!store.is_valid());

        std::fs::write(store.path(), "{not json").unwrap();
        assert!(!store.is_valid());
    }
}
