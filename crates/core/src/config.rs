//! Configuration management for the askstack backend.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Environment variables
//! - Command-line flags
//! - An optional YAML config file
//!
//! Precedence is CLI flags over environment variables over the config file
//! over built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Main application configuration.
///
/// This struct holds all global configuration options that affect
/// backend behavior across requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port the HTTP server listens on
    pub port: u16,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// LLM provider (currently "gemini")
    pub provider: String,

    /// Model identifier passed to the provider
    pub model: String,

    /// API key for the LLM provider
    pub api_key: Option<String>,

    /// Override base URL for the LLM provider (mainly for tests)
    pub llm_endpoint: Option<String>,

    /// Path to the local Q&A JSON file, if one is configured
    pub local_data: Option<PathBuf>,

    /// Streamed dataset identifier on the Hugging Face hub
    pub dataset: String,

    /// Dataset configuration name
    pub dataset_config: String,

    /// Dataset split to stream
    pub split: String,

    /// Base URL of the datasets-server rows API
    pub hf_endpoint: String,

    /// Scan behavior defaults applied when a request omits them
    pub scan: ScanDefaults,

    /// Capacity of the search memoization cache
    pub cache_capacity: usize,

    /// Log level override
    pub log_level: Option<String>,

    /// Disable colored output
    pub no_color: bool,

    /// Emit logs as newline-delimited JSON instead of the console format
    pub log_json: bool,
}

/// Default scan parameters for search requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanDefaults {
    /// How many ranked results a search returns at most
    pub max_results: usize,

    /// How many source items one scan may inspect
    pub max_items_scanned: usize,

    /// Emit a progress event every this many scanned items
    pub progress_every: usize,

    /// Abandon a scan after this many seconds, if set
    pub timeout_secs: Option<u64>,
}

impl Default for ScanDefaults {
    fn default() -> Self {
        Self {
            max_results: 3,
            max_items_scanned: 2000,
            progress_every: 100,
            timeout_secs: None,
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    server: Option<ServerSection>,
    llm: Option<LlmSection>,
    retrieval: Option<RetrievalSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ServerSection {
    port: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LlmSection {
    provider: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RetrievalSection {
    dataset: Option<String>,
    config: Option<String>,
    split: Option<String>,
    endpoint: Option<String>,
    local_data: Option<PathBuf>,
    max_results: Option<usize>,
    max_items_scanned: Option<usize>,
    progress_every: Option<usize>,
    timeout_secs: Option<u64>,
    cache_capacity: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
    json: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            config_file: None,
            provider: "gemini".to_string(),
            model: "gemini-pro".to_string(),
            api_key: None,
            llm_endpoint: None,
            local_data: None,
            dataset: "mikex86/stackoverflow-posts".to_string(),
            dataset_config: "default".to_string(),
            split: "train".to_string(),
            hf_endpoint: "https://datasets-server.huggingface.co".to_string(),
            scan: ScanDefaults::default(),
            cache_capacity: 128,
            log_level: None,
            no_color: false,
            log_json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `ASKSTACK_PORT` (or `PORT`): HTTP listen port
    /// - `ASKSTACK_CONFIG`: Path to a YAML config file
    /// - `ASKSTACK_PROVIDER`: LLM provider
    /// - `ASKSTACK_MODEL`: Model identifier
    /// - `GEMINI_API_KEY`: API key for the Gemini provider
    /// - `ASKSTACK_DATA`: Path to the local Q&A JSON file
    /// - `ASKSTACK_DATASET`: Streamed dataset identifier
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    /// - `ASKSTACK_LOG_JSON`: Emit JSON logs
    ///
    /// # Example
    /// ```no_run
    /// use askstack_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Listening on port {}", config.port);
    /// ```
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(config_file) = std::env::var("ASKSTACK_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        // Load from YAML config file if one is present
        if let Some(path) = config.config_file.clone() {
            if !path.exists() {
                return Err(AppError::Config(format!(
                    "Config file does not exist: {:?}",
                    path
                )));
            }
            config = config.merge_yaml(&path)?;
        }

        // Environment variables override YAML config
        for var in ["ASKSTACK_PORT", "PORT"] {
            if let Ok(port) = std::env::var(var) {
                config.port = port
                    .parse()
                    .map_err(|_| AppError::Config(format!("Invalid {}: {}", var, port)))?;
                break;
            }
        }

        if let Ok(provider) = std::env::var("ASKSTACK_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("ASKSTACK_MODEL") {
            config.model = model;
        }

        if let Ok(dataset) = std::env::var("ASKSTACK_DATASET") {
            config.dataset = dataset;
        }

        if let Ok(data) = std::env::var("ASKSTACK_DATA") {
            config.local_data = Some(PathBuf::from(data));
        }

        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            config.api_key = Some(key);
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        if std::env::var("ASKSTACK_LOG_JSON").is_ok() {
            config.log_json = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(server) = config_file.server {
            if let Some(port) = server.port {
                result.port = port;
            }
        }

        if let Some(llm) = config_file.llm {
            if let Some(provider) = llm.provider {
                result.provider = provider;
            }
            if let Some(model) = llm.model {
                result.model = model;
            }
            if llm.endpoint.is_some() {
                result.llm_endpoint = llm.endpoint;
            }
        }

        if let Some(retrieval) = config_file.retrieval {
            if let Some(dataset) = retrieval.dataset {
                result.dataset = dataset;
            }
            if let Some(dataset_config) = retrieval.config {
                result.dataset_config = dataset_config;
            }
            if let Some(split) = retrieval.split {
                result.split = split;
            }
            if let Some(endpoint) = retrieval.endpoint {
                result.hf_endpoint = endpoint;
            }
            if retrieval.local_data.is_some() {
                result.local_data = retrieval.local_data;
            }
            if let Some(max_results) = retrieval.max_results {
                result.scan.max_results = max_results;
            }
            if let Some(max_items) = retrieval.max_items_scanned {
                result.scan.max_items_scanned = max_items;
            }
            if let Some(every) = retrieval.progress_every {
                result.scan.progress_every = every;
            }
            if retrieval.timeout_secs.is_some() {
                result.scan.timeout_secs = retrieval.timeout_secs;
            }
            if let Some(capacity) = retrieval.cache_capacity {
                result.cache_capacity = capacity;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
            if let Some(json) = logging.json {
                result.log_json = json;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// This method merges command-line flags with the loaded configuration,
    /// giving precedence to CLI flags over environment variables.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        port: Option<u16>,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        local_data: Option<PathBuf>,
        log_level: Option<String>,
        no_color: bool,
        log_json: bool,
    ) -> AppResult<Self> {
        if let Some(config_file) = config_file {
            self = self.merge_yaml(&config_file)?;
            self.config_file = Some(config_file);
        }

        if let Some(port) = port {
            self.port = port;
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(local_data) = local_data {
            self.local_data = Some(local_data);
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if no_color {
            self.no_color = true;
        }

        if log_json {
            self.log_json = true;
        }

        Ok(self)
    }

    /// Validate configuration for the active provider.
    pub fn validate(&self) -> AppResult<()> {
        let known_providers = ["gemini"];

        if !known_providers.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                known_providers.join(", ")
            )));
        }

        if self.provider == "gemini" && self.api_key.is_none() {
            return Err(AppError::Config(
                "Gemini requires an API key; set GEMINI_API_KEY".to_string(),
            ));
        }

        if self.port == 0 {
            return Err(AppError::Config("Port must be non-zero".to_string()));
        }

        if self.cache_capacity == 0 {
            return Err(AppError::Config(
                "Cache capacity must be non-zero".to_string(),
            ));
        }

        Ok(())
    }
}
