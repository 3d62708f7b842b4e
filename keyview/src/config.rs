use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{
    CONFIG_FILENAME, DEFAULT_CAPABILITIES, DEFAULT_KEY_COMPONENT, DEFAULT_TRANSFORM_METHODS,
    DEFAULT_VALUE_COMPONENT,
};

#[derive(Debug, Deserialize, Default, Clone)]
/// Top-level configuration struct.
pub struct Config {
    #[serde(default)]
    /// The main configuration section for keyview.
    pub keyview: KeyviewConfig,
    /// The path to the configuration file this was loaded from.
    /// Set during `load_from_path`, `None` if using defaults or programmatic config.
    #[serde(skip)]
    pub config_file_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
/// Configuration options for keyview.
pub struct KeyviewConfig {
    /// Transform combinators to inspect, as `Namespace.Container.Method`.
    pub transform_methods: Option<Vec<String>>,
    /// Interfaces marking a receiver as a key/value collection.
    pub capabilities: Option<Vec<String>>,
    /// Pair member naming the key of an entry.
    pub key_component: Option<String>,
    /// Pair member naming the value of an entry.
    pub value_component: Option<String>,
    /// List of folders to exclude.
    pub exclude_folders: Option<Vec<String>>,
    /// Whether generated sources (`*.g.cs`, `<auto-generated>`) are analyzed.
    pub analyze_generated: Option<bool>,
    /// Semantic model file, relative to the configuration file.
    pub model: Option<PathBuf>,
}

impl KeyviewConfig {
    /// Configured transform methods, or the defaults.
    #[must_use]
    pub fn transform_methods(&self) -> Vec<String> {
        self.transform_methods.clone().unwrap_or_else(|| {
            DEFAULT_TRANSFORM_METHODS
                .iter()
                .map(|&m| m.to_owned())
                .collect()
        })
    }

    /// Configured capabilities, or the defaults.
    #[must_use]
    pub fn capabilities(&self) -> Vec<String> {
        self.capabilities.clone().unwrap_or_else(|| {
            DEFAULT_CAPABILITIES
                .iter()
                .map(|&c| c.to_owned())
                .collect()
        })
    }

    /// Configured key component, or `Key`.
    #[must_use]
    pub fn key_component(&self) -> &str {
        self.key_component.as_deref().unwrap_or(DEFAULT_KEY_COMPONENT)
    }

    /// Configured value component, or `Value`.
    #[must_use]
    pub fn value_component(&self) -> &str {
        self.value_component
            .as_deref()
            .unwrap_or(DEFAULT_VALUE_COMPONENT)
    }

    /// Whether generated sources are analyzed (default: true).
    #[must_use]
    pub fn analyze_generated(&self) -> bool {
        self.analyze_generated.unwrap_or(true)
    }
}

impl Config {
    /// Loads configuration starting from a specific path and traversing up.
    ///
    /// A config file that fails to parse is reported and skipped.
    #[must_use]
    pub fn load_from_path(path: &Path) -> Self {
        let mut current = path.to_path_buf();
        if current.is_file() {
            current.pop();
        }

        loop {
            let keyview_toml = current.join(CONFIG_FILENAME);
            if keyview_toml.exists() {
                match fs::read_to_string(&keyview_toml)
                    .map_err(|e| e.to_string())
                    .and_then(|content| {
                        toml::from_str::<Config>(&content).map_err(|e| e.to_string())
                    }) {
                    Ok(mut config) => {
                        tracing::debug!(path = %keyview_toml.display(), "loaded configuration");
                        config.config_file_path = Some(keyview_toml);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!(path = %keyview_toml.display(), "ignoring invalid configuration: {e}");
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        Config::default()
    }

    /// Model file path, resolved against the directory of the configuration file.
    #[must_use]
    pub fn model_path(&self) -> Option<PathBuf> {
        let model = self.keyview.model.as_ref()?;
        if model.is_absolute() {
            return Some(model.clone());
        }
        let base = self
            .config_file_path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or_else(|| Path::new("."));
        Some(base.join(model))
    }
}
