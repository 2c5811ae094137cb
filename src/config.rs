//! Service configuration.
//!
//! Precedence: CLI > environment (`LEADSIFT_*`) > config files > defaults. Config files
//! are looked up in order (`--config`, `$LEADSIFT_CONFIG`, `~/.config/leadsift.toml`,
//! `./leadsift.toml`); for each key the first file that sets it wins.

use crate::errors::LeadsError;
use crate::filter::EmailExclusion;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Mongo,
    Memory,
}

impl Default for Backend {
    fn default() -> Self {
        if cfg!(feature = "mongo") { Self::Mongo } else { Self::Memory }
    }
}

impl std::str::FromStr for Backend {
    type Err = LeadsError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(Self::Mongo),
            "memory" | "mem" => Ok(Self::Memory),
            other => Err(LeadsError::Config(format!("unknown store backend: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: Backend,
    pub uri: String,
    pub database: String,
    pub collection: String,
    pub app_name: String,
    /// NDJSON or JSON-array file the memory backend loads at startup.
    pub data_file: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            uri: "mongodb://localhost:27017".into(),
            database: "RawLeads".into(),
            collection: "RawLeads".into(),
            app_name: "leadsift".into(),
            data_file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind: String,
    pub store: StoreConfig,
    pub email_exclusion: EmailExclusion,
    pub log_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".into(),
            store: StoreConfig::default(),
            email_exclusion: EmailExclusion::default(),
            log_dir: None,
            log_level: None,
        }
    }
}

/// Config file candidates, highest precedence first.
#[must_use]
pub fn find_config_paths(cli_cfg: Option<&Path>) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = vec![];
    if let Some(p) = cli_cfg {
        paths.push(p.to_path_buf());
    }
    if let Ok(p) = std::env::var("LEADSIFT_CONFIG") {
        paths.push(PathBuf::from(p));
    }
    if let Some(dir) = dirs_next::config_dir() {
        paths.push(dir.join("leadsift.toml"));
    }
    if let Ok(cur) = std::env::current_dir() {
        paths.push(cur.join("leadsift.toml"));
    }
    paths
}

/// Loads configuration from the standard locations and the process environment.
///
/// # Errors
/// Returns `LeadsError::Config` if a config file exists but cannot be parsed, or if an
/// environment override has an invalid value.
pub fn load_config(cli_cfg: Option<&Path>) -> Result<AppConfig, LeadsError> {
    load_config_from(&find_config_paths(cli_cfg), |k| std::env::var(k).ok())
}

/// Like [`load_config`] with explicit file candidates and environment lookup.
///
/// # Errors
/// See [`load_config`].
pub fn load_config_from<F>(paths: &[PathBuf], env: F) -> Result<AppConfig, LeadsError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut merged = toml::Table::new();
    for p in paths.iter().filter(|p| p.exists()) {
        let s = std::fs::read_to_string(p)?;
        let table: toml::Table =
            toml::from_str(&s).map_err(|e| LeadsError::Config(format!("{}: {e}", p.display())))?;
        for key in scan_toml_for_secrets(&toml::Value::Table(table.clone())) {
            log::warn!("{}: `{key}` holds a credential; prefer LEADSIFT_MONGODB_URI", p.display());
        }
        fill_missing(&mut merged, table);
    }
    let mut cfg: AppConfig = toml::Value::Table(merged)
        .try_into()
        .map_err(|e: toml::de::Error| LeadsError::Config(e.to_string()))?;
    apply_env(&mut cfg, env)?;
    Ok(cfg)
}

fn fill_missing(base: &mut toml::Table, other: toml::Table) {
    for (k, v) in other {
        match (base.get_mut(&k), v) {
            (Some(toml::Value::Table(b)), toml::Value::Table(o)) => fill_missing(b, o),
            (Some(_), _) => {}
            (None, v) => {
                base.insert(k, v);
            }
        }
    }
}

fn apply_env<F>(cfg: &mut AppConfig, env: F) -> Result<(), LeadsError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(s) = env("LEADSIFT_BIND") {
        cfg.bind = s;
    }
    if let Some(s) = env("LEADSIFT_STORE") {
        cfg.store.backend = s.parse()?;
    }
    if let Some(s) = env("LEADSIFT_MONGODB_URI") {
        cfg.store.uri = s;
    }
    if let Some(s) = env("LEADSIFT_DATABASE") {
        cfg.store.database = s;
    }
    if let Some(s) = env("LEADSIFT_COLLECTION") {
        cfg.store.collection = s;
    }
    if let Some(s) = env("LEADSIFT_DATA_FILE") {
        cfg.store.data_file = Some(PathBuf::from(s));
    }
    if let Some(s) = env("LEADSIFT_EMAIL_EXCLUSION") {
        cfg.email_exclusion = s.parse()?;
    }
    if let Some(s) = env("LEADSIFT_LOG_DIR") {
        cfg.log_dir = Some(PathBuf::from(s));
    }
    if let Some(s) = env("LEADSIFT_LOG_LEVEL") {
        cfg.log_level = Some(s);
    }
    Ok(())
}

fn is_secret_key(key: &str) -> bool {
    let k = key.to_ascii_lowercase();
    k.contains("password") || k.contains("passwd") || k.contains("secret") || k.contains("token")
}

/// Dotted paths of keys in `val` that look like they hold credentials, including
/// connection strings with an embedded user.
#[must_use]
pub fn scan_toml_for_secrets(val: &toml::Value) -> Vec<String> {
    let mut secrets = Vec::new();
    let mut q = VecDeque::new();
    q.push_back((String::new(), val));
    while let Some((prefix, v)) = q.pop_front() {
        match v {
            toml::Value::Table(map) => {
                for (k, vv) in map {
                    let full = if prefix.is_empty() { k.clone() } else { format!("{prefix}.{k}") };
                    let inline_user = vv.as_str().is_some_and(|s| redact_uri(s) != s);
                    if is_secret_key(k) || inline_user {
                        secrets.push(full.clone());
                    }
                    q.push_back((full, vv));
                }
            }
            toml::Value::Array(arr) => {
                for (i, vv) in arr.iter().enumerate() {
                    q.push_back((format!("{prefix}[{i}]"), vv));
                }
            }
            _ => {}
        }
    }
    secrets
}

/// Replaces the user-info part of a connection string with `***`.
#[must_use]
pub fn redact_uri(uri: &str) -> String {
    let Some(scheme_end) = uri.find("://") else { return uri.to_string() };
    let rest = &uri[scheme_end + 3..];
    let authority_end = rest.find('/').unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{}***{}", &uri[..scheme_end + 3], &rest[at..]),
        None => uri.to_string(),
    }
}
