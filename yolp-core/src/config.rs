use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const PLACE_URL: &str = "https://map.yahooapis.jp/weather/V1/place";
pub const ZIP_CODE_SEARCH_URL: &str = "https://map.yahooapis.jp/search/zip/V1/zipCodeSearch";
pub const STATIC_MAP_URL: &str = "https://map.yahooapis.jp/map/V1/static";

/// Endpoint URLs the client talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub place: String,
    pub zip_code_search: String,
    pub static_map: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            place: PLACE_URL.to_string(),
            zip_code_search: ZIP_CODE_SEARCH_URL.to_string(),
            static_map: STATIC_MAP_URL.to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Yahoo! JAPAN application id sent as `appid`.
    pub app_id: Option<String>,

    /// Example TOML:
    /// [endpoints]
    /// place = "https://map.yahooapis.jp/weather/V1/place"
    #[serde(default)]
    pub endpoints: Endpoints,
}

impl Config {
    /// Return the configured application id.
    pub fn app_id(&self) -> Result<&str> {
        self.app_id.as_deref().filter(|id| !id.is_empty()).ok_or_else(|| {
            anyhow!(
                "No YOLP application id configured.\n\
                 Hint: set `app_id` in {}",
                Self::config_file_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|_| "config.toml".to_string())
            )
        })
    }

    pub fn set_app_id(&mut self, app_id: impl Into<String>) {
        self.app_id = Some(app_id.into());
    }

    /// Load the config from the platform config dir.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load a config file; a missing file is an empty config.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse a config from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid YOLP configuration")
    }

    /// Save the config to the platform config dir.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Write the config as TOML, creating missing parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        }

        let contents =
            toml::to_string_pretty(self).context("Failed to serialize YOLP configuration")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("jp", "yolp", "yolp")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
