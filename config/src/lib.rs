//! Configuration loading for proofpad.
//!
//! Settings come from an optional TOML file in the data directory, with
//! `PROOFPAD_*` environment variables overriding individual fields. Every
//! field is optional in the file; resolution to effective values (defaults,
//! dev fallbacks) happens through the accessor methods so the file can stay
//! minimal.

use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

/// Default checker endpoint used in `dev` when none is configured.
pub const DEFAULT_DEV_ENDPOINT: &str = "http://localhost:8000/api/check";

/// Default bound on one verification round-trip.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const CONFIG_FILENAME: &str = "config.toml";

/// Deployment environment.
///
/// In `dev`, a missing endpoint falls back to [`DEFAULT_DEV_ENDPOINT`]. In
/// `prod`, a missing endpoint is a configuration error surfaced to the user
/// instead of an attempted connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Dev,
    Prod,
}

impl Environment {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Prod => "prod",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "dev" => Some(Environment::Dev),
            "prod" => Some(Environment::Prod),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Default, Deserialize)]
pub struct ProofpadConfig {
    pub environment: Option<Environment>,
    /// Checker endpoint URL, e.g. `https://checker.example.com/api/check`.
    pub endpoint: Option<String>,
    /// Bearer token sent with every check request, if the backend requires one.
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
    /// Display label for the backend's checker build.
    pub verifier_version: Option<String>,
    pub data_dir: Option<PathBuf>,
}

// Manual Debug impl to prevent leaking the API key in logs.
impl std::fmt::Debug for ProofpadConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProofpadConfig")
            .field("environment", &self.environment)
            .field("endpoint", &self.endpoint)
            .field(
                "api_key",
                &if self.api_key.is_some() {
                    "[REDACTED]"
                } else {
                    "None"
                },
            )
            .field("timeout_secs", &self.timeout_secs)
            .field("verifier_version", &self.verifier_version)
            .field("data_dir", &self.data_dir)
            .finish()
    }
}

impl ProofpadConfig {
    /// Load the config file (if present) and apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match config_path() {
            Some(path) if path.exists() => Self::load_file(&path)?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `PROOFPAD_*` overrides from the given lookup (the environment in
    /// production; injected in tests).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup("PROOFPAD_ENVIRONMENT") {
            match Environment::parse(&raw) {
                Some(environment) => self.environment = Some(environment),
                None => tracing::warn!("Ignoring invalid PROOFPAD_ENVIRONMENT value: {raw}"),
            }
        }
        if let Some(endpoint) = lookup("PROOFPAD_ENDPOINT") {
            self.endpoint = Some(endpoint);
        }
        if let Some(api_key) = lookup("PROOFPAD_API_KEY") {
            self.api_key = Some(api_key);
        }
        if let Some(raw) = lookup("PROOFPAD_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.timeout_secs = Some(secs),
                _ => tracing::warn!("Ignoring invalid PROOFPAD_TIMEOUT_SECS value: {raw}"),
            }
        }
        if let Some(version) = lookup("PROOFPAD_VERIFIER_VERSION") {
            self.verifier_version = Some(version);
        }
        if let Some(dir) = lookup("PROOFPAD_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(dir));
        }
    }

    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment.unwrap_or_default()
    }

    #[must_use]
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    #[must_use]
    pub fn verifier_version(&self) -> String {
        self.verifier_version
            .clone()
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Directory holding the history slot and the config file itself.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    /// Path of the persisted history slot.
    #[must_use]
    pub fn history_path(&self) -> PathBuf {
        self.data_dir().join("history.json")
    }
}

/// Default location of the config file, if a data directory can be resolved.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    if let Ok(dir) = env::var("PROOFPAD_DATA_DIR") {
        return Some(PathBuf::from(dir).join(CONFIG_FILENAME));
    }
    Some(default_data_dir().join(CONFIG_FILENAME))
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".proofpad"))
        .unwrap_or_else(|| PathBuf::from(".proofpad"))
}
