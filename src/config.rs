//! Configuration management for tresor-manifests

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding the YAML mapping files
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Flat directory of `{oclcNumber}.json` records
    pub cache_dir: PathBuf,
    pub log_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DlcsConfig {
    /// Prefix the DLCS id is appended to
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WorldCatConfig {
    pub api_base_url: String,
    pub token_url: String,
    /// Public record page, the OCLC number is appended to it
    pub public_base_url: String,
    pub scope: String,
    /// `key:secret` pair for the client-credentials grant
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub dlcs: DlcsConfig,
    pub worldcat: WorldCatConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Environment variables with prefix TRESOR_, e.g. TRESOR_PATHS__OUTPUT_DIR
            .add_source(
                Environment::with_prefix("TRESOR")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option(
                "worldcat.api_key",
                env::var("OCLC_SEARCH_API_TOKEN").ok(),
            )?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
            cache_dir: PathBuf::from(".cache"),
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl Default for DlcsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://dlc.services/iiif-resource/7/string1string2string3/".to_string(),
        }
    }
}

impl Default for WorldCatConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://americas.discovery.api.oclc.org/worldcat/search/v2".to_string(),
            token_url: "https://oauth.oclc.org/token".to_string(),
            public_base_url: "https://tudelft.on.worldcat.org/oclc/".to_string(),
            scope: "wcapi".to_string(),
            api_key: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
