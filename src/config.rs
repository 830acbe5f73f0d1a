use anyhow::{Context, Result};
use log::{debug, info};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use toml::Value;

use crate::pipeline::PipelineConfig;

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV_VAR: &str = "HANDOFF_CONFIG";

/// Configuration storage - section_name -> key -> value
pub type Configuration = HashMap<String, HashMap<String, String>>;

/// Configuration manager
#[derive(Debug)]
pub struct ConfigManager {
    config: Configuration,
    config_file_path: Option<PathBuf>,
    selected_section: Option<String>,
}

impl ConfigManager {
    /// Create a new ConfigManager from a Configuration (primarily for testing)
    pub fn from_config(config: Configuration) -> Self {
        Self {
            config,
            config_file_path: None,
            selected_section: None,
        }
    }

    /// Load configuration using discovery hierarchy
    pub fn load() -> Result<Self> {
        debug!("Starting configuration discovery");

        for path in discover_config_files() {
            debug!("Attempting to load config from: {}", path.display());
            if path.exists() {
                info!("Loading configuration from: {}", path.display());
                return Self::load_from_file(path);
            }
        }

        info!("No configuration file found, using defaults");
        Ok(Self::from_config(Configuration::new()))
    }

    /// Load configuration from explicit file path
    pub fn load_from_file(path: PathBuf) -> Result<Self> {
        debug!("Loading configuration from file: {}", path.display());

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = parse_toml_config(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(Self {
            config,
            config_file_path: Some(path),
            selected_section: None,
        })
    }

    /// Path of the file this configuration came from, if any
    pub fn config_file_path(&self) -> Option<&PathBuf> {
        self.config_file_path.as_ref()
    }

    /// Get value from configuration with section fallback
    pub fn get_value(&self, section: &str, key: &str) -> Option<&String> {
        // Priority: selected_section -> specified section -> base
        if let Some(selected) = &self.selected_section {
            if let Some(value) = self.config.get(selected).and_then(|s| s.get(key)) {
                return Some(value);
            }
        }

        if let Some(value) = self.config.get(section).and_then(|s| s.get(key)) {
            return Some(value);
        }

        self.config.get("base").and_then(|s| s.get(key))
    }

    /// Get value from the root level (stored under [base])
    pub fn get_value_root(&self, key: &str) -> Option<&String> {
        self.get_value("base", key)
    }

    /// Select configuration section for --config-name
    pub fn select_section(&mut self, section: String) {
        debug!("Selecting configuration section: {}", section);
        self.selected_section = Some(section);
    }

    /// Get boolean value with type conversion
    pub fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>> {
        match self.get_value(section, key) {
            Some(value) => match value.to_lowercase().as_str() {
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                _ => Err(anyhow::anyhow!("Invalid boolean value for {}.{}: {}", section, key, value)),
            },
            None => Ok(None),
        }
    }

    /// Get numeric value with type conversion
    pub fn get_number<N>(&self, section: &str, key: &str) -> Result<Option<N>>
    where
        N: std::str::FromStr,
        N::Err: std::error::Error + Send + Sync + 'static,
    {
        match self.get_value(section, key) {
            Some(value) => value
                .parse::<N>()
                .map(Some)
                .with_context(|| format!("Invalid numeric value for {}.{}: {}", section, key, value)),
            None => Ok(None),
        }
    }

    /// Get log level value with type conversion
    pub fn get_log_level(&self, section: &str, key: &str) -> Result<Option<log::LevelFilter>> {
        match self.get_value(section, key) {
            Some(value) => Ok(Some(crate::logging::parse_log_level(value)?)),
            None => Ok(None),
        }
    }

    /// Get path value with type conversion
    pub fn get_path(&self, section: &str, key: &str) -> Option<PathBuf> {
        self.get_value(section, key).map(PathBuf::from)
    }

    /// Build the pipeline configuration from the `[pipeline]` section
    pub fn get_pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = PipelineConfig::default();

        if let Some(capacity) = self.get_number::<usize>("pipeline", "capacity")? {
            config.capacity = capacity;
        }
        if let Some(timeout) = self.get_number::<u64>("pipeline", "put-timeout-ms")? {
            config.producer.put_timeout_ms = Some(timeout);
        }
        if let Some(retries) = self.get_number::<u32>("pipeline", "max-retries")? {
            config.producer.max_retries = retries;
        }
        if let Some(timeout) = self.get_number::<u64>("pipeline", "get-timeout-ms")? {
            config.consumer.get_timeout_ms = Some(timeout);
        }
        if let Some(retries) = self.get_number::<u32>("pipeline", "max-idle-retries")? {
            config.consumer.max_idle_retries = retries;
        }

        config
            .validate()
            .context("Pipeline configuration validation failed")?;

        Ok(config)
    }
}

/// Discover configuration files in order of precedence
fn discover_config_files() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // 1. Environment variable $HANDOFF_CONFIG
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        paths.push(PathBuf::from(env_path));
    }

    // 2. XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("handoff").join("config.toml"));
    }

    // 3. Home directory
    if let Some(home_dir) = dirs::home_dir() {
        paths.push(home_dir.join(".handoff.toml"));
    }

    // 4. Project local
    paths.push(PathBuf::from("./.handoff.toml"));

    debug!("Config discovery paths: {:?}", paths);
    paths
}

/// Parse TOML content to string-based configuration
fn parse_toml_config(content: &str) -> Result<Configuration> {
    let toml_value: Value = content.parse().context("Failed to parse TOML content")?;

    let mut config = Configuration::new();

    if let Value::Table(table) = toml_value {
        flatten_toml_table(&table, String::new(), &mut config);
    }

    debug!("Parsed configuration: {:?}", config);
    Ok(config)
}

/// Recursively flatten TOML tables into section.subsection format
fn flatten_toml_table(table: &toml::Table, prefix: String, config: &mut Configuration) {
    for (key, value) in table {
        let section_name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            Value::Table(subtable) => {
                if subtable.values().all(|v| !matches!(v, Value::Table(_))) {
                    // Leaf table: a configuration section
                    config.entry(section_name).or_default().extend(
                        subtable
                            .iter()
                            .map(|(subkey, subvalue)| (subkey.clone(), toml_value_to_string(subvalue))),
                    );
                } else {
                    flatten_toml_table(subtable, section_name, config);
                }
            }
            _ => {
                // Top-level keys land in [base]
                config
                    .entry("base".to_string())
                    .or_default()
                    .insert(key.clone(), toml_value_to_string(value));
            }
        }
    }
}

/// Convert TOML Value to string representation
fn toml_value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}
