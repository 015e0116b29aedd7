use crate::checker::chunker::DEFAULT_MAX_CHUNK_LENGTH;
use crate::checker::remote::{DEFAULT_CALLBACK, DEFAULT_ENDPOINT};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_REDIRECT_URL: &str = "http://speller.cs.pusan.ac.kr/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Call the spell-check service directly
    #[default]
    Api,
    /// Copy the text and open a spell-checker website instead
    Redirect,
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "api" => Ok(Strategy::Api),
            "redirect" => Ok(Strategy::Redirect),
            _ => Err(format!("Unknown strategy: {}", s)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Api => write!(f, "api"),
            Strategy::Redirect => write!(f, "redirect"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: String,
    pub callback: String,

    /// Longest accepted input, in characters
    pub max_input_length: usize,
    pub max_chunk_length: usize,

    pub max_attempts: u32,
    pub retry_backoff_ms: u64,
    /// Pause between successive chunk submissions
    pub request_delay_ms: u64,
    pub timeout_ms: u64,

    pub strategy: Strategy,
    pub redirect_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            callback: DEFAULT_CALLBACK.to_string(),
            max_input_length: 8000,
            max_chunk_length: DEFAULT_MAX_CHUNK_LENGTH,
            max_attempts: 3,
            retry_backoff_ms: 500,
            request_delay_ms: 500,
            timeout_ms: 10_000,
            strategy: Strategy::Api,
            redirect_url: DEFAULT_REDIRECT_URL.to_string(),
        }
    }
}

/// One configuration file; only the keys it actually sets are present
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigLayer {
    pub endpoint: Option<String>,
    pub callback: Option<String>,
    pub max_input_length: Option<usize>,
    pub max_chunk_length: Option<usize>,
    pub max_attempts: Option<u32>,
    pub retry_backoff_ms: Option<u64>,
    pub request_delay_ms: Option<u64>,
    pub timeout_ms: Option<u64>,
    pub strategy: Option<Strategy>,
    pub redirect_url: Option<String>,
}

impl ConfigLayer {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

impl Config {
    /// Load configuration with priority: CLI args > explicit file > local config > global config > defaults
    pub fn load(explicit: Option<&Path>, strategy: Option<Strategy>) -> Result<Self> {
        let mut config = Self::default();

        // Load global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                config = config.merge(ConfigLayer::from_file(&global_path)?);
            }
        }

        // Load local config (overrides global)
        let local_path = PathBuf::from(".textcheck.toml");
        if local_path.exists() {
            config = config.merge(ConfigLayer::from_file(&local_path)?);
        }

        if let Some(path) = explicit {
            config = config.merge(ConfigLayer::from_file(path)?);
        }

        // Apply CLI overrides
        if let Some(strategy) = strategy {
            config.strategy = strategy;
        }

        Ok(config)
    }

    /// A single file applied over the defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::default().merge(ConfigLayer::from_file(path)?))
    }

    /// Every key present in `layer` wins, including ones set back to a default
    fn merge(mut self, layer: ConfigLayer) -> Self {
        if let Some(endpoint) = layer.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(callback) = layer.callback {
            self.callback = callback;
        }
        if let Some(max_input_length) = layer.max_input_length {
            self.max_input_length = max_input_length;
        }
        if let Some(max_chunk_length) = layer.max_chunk_length {
            self.max_chunk_length = max_chunk_length;
        }
        if let Some(max_attempts) = layer.max_attempts {
            self.max_attempts = max_attempts;
        }
        if let Some(retry_backoff_ms) = layer.retry_backoff_ms {
            self.retry_backoff_ms = retry_backoff_ms;
        }
        if let Some(request_delay_ms) = layer.request_delay_ms {
            self.request_delay_ms = request_delay_ms;
        }
        if let Some(timeout_ms) = layer.timeout_ms {
            self.timeout_ms = timeout_ms;
        }
        if let Some(strategy) = layer.strategy {
            self.strategy = strategy;
        }
        if let Some(redirect_url) = layer.redirect_url {
            self.redirect_url = redirect_url;
        }
        self
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "textcheck").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
