use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const LEDGER_FILE_NAME: &str = "data_records.csv";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(rename = "cache-dir", alias = "CACHE-DIR")]
    pub cache: CacheConfig,
    #[serde(rename = "synthetic-dir", alias = "SYNTHETIC-DIR")]
    pub source: SourceConfig,
    #[serde(
        default,
        rename = "panel",
        alias = "PANEL",
        alias = "display",
        alias = "DISPLAY"
    )]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory that holds the ledger file.
    pub cache: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Directory of images to review.
    pub root: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_accent")]
    pub accent: String,
    #[serde(default = "default_window")]
    pub window: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            accent: default_accent(),
            window: default_window(),
        }
    }
}

fn default_accent() -> String {
    "#0072b5".to_string()
}

fn default_window() -> usize {
    5
}

impl AppConfig {
    pub fn ledger_path(&self) -> PathBuf {
        PathBuf::from(&self.cache.cache).join(LEDGER_FILE_NAME)
    }

    pub fn source_dir(&self) -> PathBuf {
        PathBuf::from(&self.source.root)
    }
}

pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/config").required(false));
    }
    let cfg = settings.build().context("read config")?;
    cfg.try_deserialize()
        .context("config needs [CACHE-DIR] cache and [SYNTHETIC-DIR] root")
}
