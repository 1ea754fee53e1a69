//! Configuration management for breathship.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::EntityKind;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "breathship";

/// Default local store file name.
const DATABASE_FILE_NAME: &str = "store.db";

/// Shown in place of a configured secret.
const REDACTED: &str = "(set)";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `BREATHSHIP_`, `__` between levels)
/// 2. TOML config file at `~/.config/breathship/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which backend serves the data.
    pub source: SourceConfig,
    /// REST backend settings.
    pub rest: RestConfig,
    /// Local store settings.
    pub local: LocalConfig,
    /// Spreadsheet backend settings.
    pub sheet: SheetConfig,
    /// Forms intake settings.
    pub forms: FormsConfig,
    /// Admin surface settings.
    pub admin: AdminConfig,
    /// Refresh bus settings.
    pub events: EventsConfig,
}

/// The available backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// `PostgREST`-style REST resource store.
    Rest,
    /// Embedded local store.
    #[default]
    Local,
    /// Published spreadsheets read as CSV.
    Sheet,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rest => write!(f, "rest"),
            Self::Local => write!(f, "local"),
            Self::Sheet => write!(f, "sheet"),
        }
    }
}

/// Backend selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// The backend wired to the data source contract.
    pub backend: Backend,
}

/// REST backend configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestConfig {
    /// Project URL; tables live under `{base_url}/rest/v1/`.
    pub base_url: String,
    /// Key sent as both `apikey` and bearer token.
    pub api_key: String,
    /// Per-request timeout in seconds. 0 disables the timeout.
    pub timeout_secs: u64,
}

/// Local store configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    /// Path to the store file.
    /// Defaults to `~/.local/share/breathship/store.db`
    pub database_path: Option<PathBuf>,
}

/// Spreadsheet backend configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Base URL that sheet ids are appended to.
    pub base_url: String,
    /// Sheet id of the content table.
    pub content_sheet: String,
    /// Sheet id of the sessions table.
    pub sessions_sheet: String,
    /// Sheet id of the blogs table.
    pub blogs_sheet: String,
    /// Sheet id of the testimonials table.
    pub testimonials_sheet: String,
}

/// Forms intake configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormsConfig {
    /// Endpoint that accepts the JSON form posts.
    pub endpoint: String,
    /// Value stamped into every submission's `source` field.
    pub source: String,
}

/// Admin surface configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Four-digit code that unlocks the admin commands.
    pub access_code: String,
}

/// Refresh bus configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Events buffered per subscriber.
    pub capacity: usize,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            base_url: "https://docs.google.com/spreadsheets/d".to_string(),
            content_sheet: String::new(),
            sessions_sheet: String::new(),
            blogs_sheet: String::new(),
            testimonials_sheet: String::new(),
        }
    }
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            source: "Breathship Website".to_string(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            access_code: "1234".to_string(),
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            capacity: crate::events::DEFAULT_CAPACITY,
        }
    }
}

impl SheetConfig {
    /// Sheet id configured for an entity kind, if any.
    #[must_use]
    pub fn sheet_id(&self, kind: EntityKind) -> Option<&str> {
        let id = match kind {
            EntityKind::Content => &self.content_sheet,
            EntityKind::Sessions => &self.sessions_sheet,
            EntityKind::Blogs => &self.blogs_sheet,
            EntityKind::Testimonials => &self.testimonials_sheet,
        };
        (!id.is_empty()).then_some(id.as_str())
    }
}

fn check_url(field: &str, value: &str) -> Result<()> {
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|e| Error::config(format!("{field} is not a valid URL ({value}): {e}")))
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("BREATHSHIP_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// Only the selected backend has to be fully configured.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let code = &self.admin.access_code;
        if code.len() != 4 || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::config("admin.access_code must be exactly four digits"));
        }

        if self.events.capacity == 0 {
            return Err(Error::config("events.capacity must be greater than 0"));
        }

        match self.source.backend {
            Backend::Rest => {
                if self.rest.base_url.is_empty() {
                    return Err(Error::config("rest.base_url is required for the rest backend"));
                }
                check_url("rest.base_url", &self.rest.base_url)?;
                if self.rest.api_key.is_empty() {
                    return Err(Error::config("rest.api_key is required for the rest backend"));
                }
            }
            Backend::Sheet => {
                check_url("sheet.base_url", &self.sheet.base_url)?;
                if self.sheet.content_sheet.is_empty() {
                    return Err(Error::config(
                        "sheet.content_sheet is required for the sheet backend",
                    ));
                }
            }
            Backend::Local => {}
        }

        if !self.forms.endpoint.is_empty() {
            check_url("forms.endpoint", &self.forms.endpoint)?;
        }

        Ok(())
    }

    /// Get the local store path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.local
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the REST request timeout, if one is configured.
    #[must_use]
    pub fn rest_timeout(&self) -> Option<Duration> {
        if self.rest.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.rest.timeout_secs))
        }
    }

    /// Copy with the REST key and admin code masked, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        for secret in [&mut config.rest.api_key, &mut config.admin.access_code] {
            if !secret.is_empty() {
                *secret = REDACTED.to_string();
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rest_config() -> Config {
        let mut config = Config::default();
        config.source.backend = Backend::Rest;
        config.rest.base_url = "https://project.example.co".to_string();
        config.rest.api_key = "anon-key".to_string();
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.source.backend, Backend::Local);
        assert_eq!(config.admin.access_code, "1234");
        assert_eq!(config.forms.source, "Breathship Website");
        assert_eq!(config.events.capacity, crate::events::DEFAULT_CAPACITY);
        assert!(config.rest_timeout().is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
        assert!(rest_config().validate().is_ok());
    }

    #[test]
    fn test_validate_access_code_shape() {
        for code in ["123", "12345", "12a4", ""] {
            let mut config = Config::default();
            config.admin.access_code = code.to_string();
            let err = config.validate().unwrap_err().to_string();
            assert!(err.contains("access_code"), "{code}");
        }
    }

    #[test]
    fn test_validate_zero_capacity() {
        let mut config = Config::default();
        config.events.capacity = 0;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("events.capacity"));
    }

    #[test]
    fn test_validate_rest_requires_url_and_key() {
        let mut config = rest_config();
        config.rest.api_key.clear();
        assert!(config.validate().unwrap_err().to_string().contains("api_key"));

        let mut config = rest_config();
        config.rest.base_url = "not a url".to_string();
        assert!(config.validate().unwrap_err().to_string().contains("base_url"));
    }

    #[test]
    fn test_validate_sheet_requires_content_sheet() {
        let mut config = Config::default();
        config.source.backend = Backend::Sheet;
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("content_sheet"));

        config.sheet.content_sheet = "abc123".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_forms_endpoint() {
        let mut config = Config::default();
        config.forms.endpoint = "nope".to_string();
        assert!(config.validate().is_err());
        config.forms.endpoint = "https://forms.example.com/f/abc".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sheet_id_lookup() {
        let mut sheet = SheetConfig::default();
        sheet.sessions_sheet = "s-1".to_string();
        assert_eq!(sheet.sheet_id(EntityKind::Sessions), Some("s-1"));
        assert_eq!(sheet.sheet_id(EntityKind::Blogs), None);
    }

    #[test]
    fn test_database_path_default() {
        let config = Config::default();
        assert!(config.database_path().to_string_lossy().contains("store.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.local.database_path = Some(PathBuf::from("/custom/path/store.db"));
        assert_eq!(config.database_path(), PathBuf::from("/custom/path/store.db"));
    }

    #[test]
    fn test_rest_timeout() {
        let mut config = rest_config();
        config.rest.timeout_secs = 15;
        assert_eq!(config.rest_timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_redacted_masks_secrets() {
        let mut config = rest_config();
        config.admin.access_code = "4821".to_string();

        let shown = serde_json::to_string(&config.redacted()).unwrap();
        assert!(!shown.contains("anon-key"));
        assert!(!shown.contains("4821"));
        assert!(shown.contains("project.example.co"));

        let mut keyless = Config::default();
        keyless.admin.access_code = String::new();
        let redacted = keyless.redacted();
        assert!(redacted.rest.api_key.is_empty());
        assert!(redacted.admin.access_code.is_empty());
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("breathship"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[source]
backend = "sheet"

[sheet]
content_sheet = "content-id"
sessions_sheet = "sessions-id"

[admin]
access_code = "9876"
"#,
        )
        .unwrap();

        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(config.source.backend, Backend::Sheet);
        assert_eq!(config.sheet.sheet_id(EntityKind::Content), Some("content-id"));
        assert_eq!(config.admin.access_code, "9876");
    }

    #[test]
    fn test_backend_serialize() {
        let json = serde_json::to_string(&Backend::Rest).unwrap();
        assert_eq!(json, "\"rest\"");
        assert_eq!(Backend::Sheet.to_string(), "sheet");
    }
}
