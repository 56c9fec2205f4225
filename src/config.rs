//! Configuration types for file-archiver
//!
//! The configuration is a static options struct read once at startup. The
//! flat JSON layout used by earlier deployments loads unchanged:
//!
//! ```json
//! {
//!   "port": "8080",
//!   "allowed_extensions": [".pdf", ".jpeg"],
//!   "max_files_per_task": 3,
//!   "max_concurrent_tasks": 3
//! }
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
    time::Duration,
};

/// Archive job settings (allow-list, thresholds, output location)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Permitted file extensions, lower-case with leading dot (default: .pdf, .jpeg, .jpg)
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,

    /// Number of files after which a task starts processing (default: 3)
    #[serde(default = "default_max_files_per_task")]
    pub max_files_per_task: usize,

    /// Maximum processing passes running at once (default: 3)
    #[serde(default = "default_max_concurrent_tasks")]
    pub max_concurrent_tasks: usize,

    /// Directory archives are written to and served from (default: ".")
    #[serde(default = "default_archive_dir")]
    pub archive_dir: PathBuf,

    /// Refuse to create new tasks while every processing slot is held (default: true)
    #[serde(default = "default_true")]
    pub reject_new_tasks_when_busy: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: default_allowed_extensions(),
            max_files_per_task: default_max_files_per_task(),
            max_concurrent_tasks: default_max_concurrent_tasks(),
            archive_dir: default_archive_dir(),
            reject_new_tasks_when_busy: true,
        }
    }
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Address to bind to (default: 0.0.0.0)
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on, as a number or a numeric string (default: 8080)
    #[serde(default = "default_port", with = "port_serde")]
    pub port: u16,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,

    /// Seconds in-flight requests get to finish after a shutdown signal (default: 5)
    #[serde(default = "default_shutdown_grace", with = "duration_serde")]
    pub shutdown_grace: Duration,
}

impl ApiConfig {
    /// Socket address composed from `host` and `port`
    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
            shutdown_grace: default_shutdown_grace(),
        }
    }
}

/// Periodic sweep of expired archive files
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CleanupConfig {
    /// Run the sweep at all (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Seconds between sweeps (default: 60)
    #[serde(default = "default_cleanup_interval", with = "duration_serde")]
    pub interval: Duration,

    /// Archives older than this many seconds are deleted (default: 600)
    #[serde(default = "default_cleanup_max_age", with = "duration_serde")]
    pub max_age: Duration,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: default_cleanup_interval(),
            max_age: default_cleanup_max_age(),
        }
    }
}

/// Main configuration for FileArchiver
///
/// Sub-configs are flattened so the JSON file stays a single flat object,
/// except for `cleanup` which is nested.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Archive job settings
    #[serde(flatten)]
    pub archive: ArchiveConfig,

    /// REST API settings
    #[serde(flatten)]
    pub api: ApiConfig,

    /// Expired archive sweep settings
    #[serde(default)]
    pub cleanup: CleanupConfig,
}

impl Config {
    /// Load, normalize, and validate a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("failed to read {}: {}", path.display(), e),
            key: None,
        })?;
        Self::from_json(&raw)
    }

    /// Parse, normalize, and validate configuration from a JSON string
    pub fn from_json(raw: &str) -> Result<Self> {
        let mut config: Config = serde_json::from_str(raw).map_err(|e| Error::Config {
            message: format!("failed to parse configuration: {}", e),
            key: None,
        })?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Lower-case the allow-list and make sure every entry carries a leading dot
    pub fn normalize(&mut self) {
        self.archive.allowed_extensions = self
            .archive
            .allowed_extensions
            .iter()
            .map(|ext| ext.trim().to_lowercase())
            .filter(|ext| !ext.is_empty() && ext != ".")
            .map(|ext| {
                if ext.starts_with('.') {
                    ext
                } else {
                    format!(".{}", ext)
                }
            })
            .collect();
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.archive.max_files_per_task == 0 {
            return Err(Error::Config {
                message: "max_files_per_task must be at least 1".to_string(),
                key: Some("max_files_per_task".to_string()),
            });
        }
        if self.archive.max_concurrent_tasks == 0 {
            return Err(Error::Config {
                message: "max_concurrent_tasks must be at least 1".to_string(),
                key: Some("max_concurrent_tasks".to_string()),
            });
        }
        if self.cleanup.enabled && self.cleanup.interval.is_zero() {
            return Err(Error::Config {
                message: "cleanup.interval must be greater than zero".to_string(),
                key: Some("cleanup.interval".to_string()),
            });
        }
        Ok(())
    }
}

fn default_allowed_extensions() -> Vec<String> {
    vec![".pdf".into(), ".jpeg".into(), ".jpg".into()]
}

fn default_max_files_per_task() -> usize {
    3
}

fn default_max_concurrent_tasks() -> usize {
    3
}

fn default_archive_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}

fn default_shutdown_grace() -> Duration {
    Duration::from_secs(5)
}

fn default_cleanup_interval() -> Duration {
    Duration::from_secs(60)
}

fn default_cleanup_max_age() -> Duration {
    Duration::from_secs(10 * 60)
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Port accepts both `8080` and `"8080"`
mod port_serde {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PortRepr {
        Number(u16),
        Text(String),
    }

    pub fn serialize<S>(port: &u16, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u16(*port)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u16, D::Error>
    where
        D: Deserializer<'de>,
    {
        match PortRepr::deserialize(deserializer)? {
            PortRepr::Number(port) => Ok(port),
            PortRepr::Text(text) => text
                .trim()
                .parse()
                .map_err(|e| D::Error::custom(format!("invalid port {:?}: {}", text, e))),
        }
    }
}
