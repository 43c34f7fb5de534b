//! Configuration types and loading logic.
//!
//! `Config` is a direct 1-to-1 mapping of `config.toml`.  Every field has a
//! `Default` impl so the file is entirely optional: running `scrum` without
//! any config file stores entries under `<data_dir>/scrum` on local disk.
//!
//! # File format
//!
//! ```toml
//! [storage]
//! backend  = "s3"           # "fs" (default) or "s3"
//! root     = "/mnt/scrum"   # fs: directory holding the `stor/` tree
//! bucket   = "team-scrum"   # s3: bucket name (or $AWS_BUCKET)
//! endpoint = "https://minio.lan:9000"
//! region   = "us-east-1"
//! allow_http = false
//!
//! [get]
//! use_pager = true
//! utc       = false
//!
//! [ignore]
//! users = ["scrumbot", "root"]
//!
//! [log]
//! level = "warn"
//! color = true
//! ```

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

// ─── Top-level ────────────────────────────────────────────────────────────────

/// Root configuration object, deserialised from `config.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    /// Defaults for `scrum get`; flags override them.
    #[serde(default)]
    pub get: GetConfig,

    /// Accounts hidden from `scrum get --all`.
    #[serde(default)]
    pub ignore: IgnoreConfig,

    #[serde(default)]
    pub log: LogConfig,
}

// ─── [storage] ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// A local (or mounted) directory tree.
    #[default]
    Fs,
    /// Any S3-compatible object store.
    S3,
}

/// Where scrum entries are kept.
#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: Backend,

    /// Directory that holds the `stor/` tree when `backend = "fs"`.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Bucket name for `backend = "s3"`.  Falls back to `$AWS_BUCKET`.
    #[serde(default)]
    pub bucket: Option<String>,

    /// Custom endpoint for S3-compatible services (MinIO, RustFS, ...).
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub region: Option<String>,

    /// Permit plain-HTTP endpoints.
    #[serde(default)]
    pub allow_http: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            root: default_root(),
            bucket: None,
            endpoint: None,
            region: None,
            allow_http: false,
        }
    }
}

// ─── [get] ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GetConfig {
    /// Page output through `$PAGER` (or `less`/`more`).
    #[serde(default = "default_true")]
    pub use_pager: bool,

    /// Show modification times in UTC instead of the local zone.
    #[serde(default)]
    pub utc: bool,
}

impl Default for GetConfig {
    fn default() -> Self {
        Self {
            use_pager: true,
            utc: false,
        }
    }
}

// ─── [ignore] ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct IgnoreConfig {
    #[serde(default)]
    pub users: Vec<String>,
}

/// Usernames skipped by `get --all`.  Built once at startup.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet(BTreeSet<String>);

impl IgnoreSet {
    pub fn contains(&self, user: &str) -> bool {
        self.0.contains(user)
    }
}

impl From<&IgnoreConfig> for IgnoreSet {
    fn from(cfg: &IgnoreConfig) -> Self {
        Self(cfg.users.iter().map(|u| u.trim().to_string()).collect())
    }
}

// ─── [log] ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LogConfig {
    /// `tracing` filter directive, e.g. `"info"` or `"scrum=debug"`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Colourise logs and `get` headers.
    #[serde(default = "default_true")]
    pub color: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            color: true,
        }
    }
}

// ─── Defaults ─────────────────────────────────────────────────────────────────

pub fn default_root() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("scrum"))
        .unwrap_or_else(|| PathBuf::from(".scrum"))
}

pub fn default_log_level() -> String {
    "warn".into()
}

fn default_true() -> bool {
    true
}

// ─── Loader ───────────────────────────────────────────────────────────────────

/// `~/.config/scrum/config.toml` (or the platform equivalent).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("scrum").join("config.toml"))
}

/// Read and parse a `Config` from `path`.
///
/// Returns `Ok(None)` if the file does not exist, so the caller can warn once
/// logging is up and fall back to `Config::default()`.  A file that exists
/// but cannot be read or is not valid TOML is an error.
pub fn load_config(path: &Path) -> Result<Option<Config>> {
    if !path.exists() {
        return Ok(None);
    }

    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    toml::from_str(&text)
        .map(Some)
        .with_context(|| format!("parsing {}", path.display()))
}

// ─── Tests ────────────────────────────────────────────────────────────────────
