use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::error::Result;

const CONFIG_DIR_NAME: &str = "vendor-console";
const CONFIG_FILE_NAME: &str = "config.toml";
const FALLBACK_CONFIG_PATH: &str = "/etc/vendor-console/config.toml";

pub const DEFAULT_BASE_URL: &str = "https://hfg-onboard.onrender.com";
/// Collaborators and products are served by a separate deployment
pub const DEFAULT_CATALOG_URL: &str = "https://hfg-onboard-hqqb.onrender.com";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub general: GeneralConfig,
    pub api: ApiConfig,
}

impl ConsoleConfig {
    /// Per-user config path, falling back to the system-wide one when the
    /// platform has no config directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(FALLBACK_CONFIG_PATH))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path())
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: ConsoleConfig = toml::from_str(&content)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load `path` (or the default path) and apply command line overrides.
    /// An unreadable or malformed file is an error, never a silent fallback
    /// to defaults that could point a destructive call at production.
    pub fn resolve(path: Option<&str>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };
        config.apply(overrides);
        Ok(config)
    }

    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(ref url) = overrides.api_url {
            self.api.base_url = url.clone();
        }
        if let Some(ref url) = overrides.catalog_url {
            self.api.catalog_url = url.clone();
        }
        if overrides.dryrun {
            self.general.dryrun = true;
        }
    }
}

/// Values given on the command line, which win over the file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub catalog_url: Option<String>,
    pub dryrun: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub title: String,
    /// Simulate every backend call instead of talking to the API
    pub dryrun: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            title: "Vendor Deboard".to_string(),
            dryrun: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Scheme and host of the onboarding API, without a trailing `/api`
    pub base_url: String,
    /// Host serving collaborator and product records
    pub catalog_url: String,
    /// Unset means requests wait for as long as the server takes
    pub request_timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConsoleError;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConsoleConfig::load_from(dir.path().join("nope.toml")).unwrap();

        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.catalog_url, DEFAULT_CATALOG_URL);
        assert!(!config.general.dryrun);
        assert!(config.api.request_timeout().is_none());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"http://localhost:8080\"\nrequest_timeout_secs = 15"
        )
        .unwrap();

        let config = ConsoleConfig::load_from(file.path()).unwrap();

        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.request_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.general.title, "Vendor Deboard");
        assert_eq!(config.api.catalog_url, DEFAULT_CATALOG_URL);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api\nbase_url = ").unwrap();

        assert!(ConsoleConfig::load_from(file.path()).is_err());
    }

    #[test]
    fn bad_value_does_not_fall_back_to_live_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[general]\ndryrun = true\n\n[api]\nrequest_timeout_secs = \"ten\""
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let result = ConsoleConfig::resolve(Some(path), &ConfigOverrides::default());
        assert!(matches!(result, Err(ConsoleError::TomlParse(_))));
    }

    #[test]
    fn overrides_win_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"http://file.local\"\ncatalog_url = \"http://catalog.file.local\""
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let overrides = ConfigOverrides {
            api_url: Some("http://flag.local".to_string()),
            catalog_url: None,
            dryrun: true,
        };
        let config = ConsoleConfig::resolve(Some(path), &overrides).unwrap();

        assert_eq!(config.api.base_url, "http://flag.local");
        assert_eq!(config.api.catalog_url, "http://catalog.file.local");
        assert!(config.general.dryrun);
    }
}
