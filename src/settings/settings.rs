use crate::domain_model::{
    CookieConfig, CookieConfigError, DEFAULT_COOKIE_DURATION, DEFAULT_COOKIE_NAME,
    DEFAULT_COOKIE_PATH,
};
use anyhow::{Result, anyhow};
use config::{Config, File, FileFormat};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub http: Http,
    pub log: Log,
    #[serde(default)]
    pub session: Session,
    #[serde(default)]
    pub permissions: Permissions,
    #[serde(default)]
    pub users: Vec<DemoUser>,
}

#[derive(Debug, Deserialize)]
pub struct Http {
    pub address: String,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Session {
    pub cookie_name: String,
    pub cookie_path: String,
    pub cookie_duration_secs: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            cookie_path: DEFAULT_COOKIE_PATH.to_string(),
            cookie_duration_secs: DEFAULT_COOKIE_DURATION.as_secs(),
        }
    }
}

impl TryFrom<&Session> for CookieConfig {
    type Error = CookieConfigError;

    fn try_from(session: &Session) -> Result<Self, Self::Error> {
        let config = CookieConfig {
            name: session.cookie_name.clone(),
            path: session.cookie_path.clone(),
            duration: Duration::from_secs(session.cookie_duration_secs),
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Permissions {
    /// Permission required by the admin route.
    pub admin: String,
}

impl Default for Permissions {
    fn default() -> Self {
        Self {
            admin: "admin".to_string(),
        }
    }
}

/// Entry of the demo credential table. Plain-text passwords; demo only.
#[derive(Debug, Clone, Deserialize)]
pub struct DemoUser {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    Config::builder()
        .add_source(File::with_name(path))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))
}

pub fn parse_settings_str(toml: &str) -> Result<Settings> {
    Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))
}
