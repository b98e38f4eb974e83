//! Configuration loading for akapurge.
//!
//! Reads the `--config-file` (Java-style properties, or TOML when the file
//! ends in `.toml`), layers `AKAPURGE_*` environment variables on top, and
//! flattens the result into the core [`Settings`] map. Core never touches
//! disk or the environment -- it receives a pre-built `Settings`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use akapurge_core::Settings;

mod properties;

pub use properties::{PropertiesError, parse as parse_properties};

/// Environment variables with this prefix override file keys
/// (`AKAPURGE_FASTPURGE_HOST` → `fastpurge_host`).
pub const ENV_PREFIX: &str = "AKAPURGE_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed properties file {}: {source}", .path.display())]
    Properties {
        path: PathBuf,
        #[source]
        source: PropertiesError,
    },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── File formats ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `java.util.Properties` text format.
    Properties,
    /// Flat TOML table of scalar values.
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Properties,
        }
    }
}

// ── Loading ─────────────────────────────────────────────────────────

/// Scalars a config value may arrive as; all end up as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Integer(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

/// `AKAPURGE_*` variables, prefix stripped and lowercased.
///
/// Values stay exactly as set: a plain `Env` provider would read `007`
/// as the integer 7, which breaks digit-only secrets.
fn env_overrides() -> BTreeMap<String, String> {
    Env::prefixed(ENV_PREFIX)
        .iter()
        .map(|(key, value)| (key.as_str().to_ascii_lowercase(), value))
        .collect()
}

/// Load the config file at `path` plus environment overrides.
///
/// A missing or unreadable file is an error; nothing is defaulted.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let format = ConfigFormat::from_path(path);
    debug!(path = %path.display(), ?format, "loading config");

    let figment = match format {
        ConfigFormat::Toml => Figment::from(Toml::string(&text)),
        ConfigFormat::Properties => {
            let map = parse_properties(&text).map_err(|source| ConfigError::Properties {
                path: path.to_path_buf(),
                source,
            })?;
            Figment::from(Serialized::defaults(map))
        }
    }
    .merge(Serialized::defaults(env_overrides()));

    let raw: BTreeMap<String, Scalar> = figment.extract()?;
    let settings: Settings = raw
        .into_iter()
        .map(|(key, value)| (key, value.into_string()))
        .collect();

    debug!(keys = settings.len(), "config loaded");
    Ok(settings)
}
