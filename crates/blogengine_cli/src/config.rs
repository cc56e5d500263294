//! Runtime configuration loaded from TOML.
//!
//! Every key is optional; missing keys take the defaults below. Command-line
//! flags are applied on top by the caller.

use anyhow::{Context, Result};
use blogengine_web::SiteSettings;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "blogengine.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub log_level: String,
    /// Relative paths resolve against the working directory.
    pub log_dir: PathBuf,
    pub bind_addr: String,
    pub site: SiteConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub posts_per_page: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("blogengine.sqlite3"),
            log_level: blogengine_core::default_log_level().to_string(),
            log_dir: PathBuf::from("logs"),
            bind_addr: "127.0.0.1:8000".to_string(),
            site: SiteConfig::default(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        let site = SiteSettings::default();
        Self {
            title: site.title,
            posts_per_page: site.posts_per_page,
        }
    }
}

impl AppConfig {
    /// Loads `path`, or `./blogengine.toml` when present, or the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config `{}`", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("invalid config `{}`", path.display()))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Absolute log directory.
    pub fn resolved_log_dir(&self) -> Result<PathBuf> {
        if self.log_dir.is_absolute() {
            return Ok(self.log_dir.clone());
        }
        let cwd = std::env::current_dir().context("failed to resolve working directory")?;
        Ok(cwd.join(&self.log_dir))
    }

    pub fn site_settings(&self) -> SiteSettings {
        SiteSettings {
            title: self.site.title.clone(),
            posts_per_page: self.site.posts_per_page,
        }
    }
}
