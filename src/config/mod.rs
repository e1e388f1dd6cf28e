use crate::cli::ConfigShape;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse JSON config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Config root is not a JSON object")]
    RootNotObject,
    #[error("Missing required section `{0}`")]
    MissingSection(&'static str),
    #[error("`{0}` is not a JSON object")]
    NotAnObject(String),
    #[error("Invalid category `{name}`: {source}")]
    Category {
        name: String,
        source: serde_json::Error,
    },
}

/// Per-category logger settings as they appear in the config file.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CategoryConfig {
    /// File path of the category's log file.
    pub path: String,
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_backup")]
    pub backup: u32,
    #[serde(default = "default_max_size")]
    pub max_size: u64,
}

fn default_level() -> String {
    "INFO".to_string()
}

fn default_backup() -> u32 {
    5
}

fn default_max_size() -> u64 {
    1_073_741_824 // 1 GiB
}

/// One discovered logger category: the name it is registered under and its
/// settings. For the nested shape the name is the leaf segment, with the
/// namespace segment stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySpec {
    pub name: String,
    pub config: CategoryConfig,
}

/// Parsed configuration file. Holds the required top-level `logger` section;
/// category discovery walks it at a fixed depth per shape.
#[derive(Debug, Clone)]
pub struct Config {
    logger: serde_json::Map<String, Value>,
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let mut root = match serde_json::from_str::<Value>(content)? {
            Value::Object(map) => map,
            _ => return Err(ConfigError::RootNotObject),
        };
        let logger = match root.remove("logger") {
            Some(Value::Object(map)) => map,
            Some(_) => return Err(ConfigError::NotAnObject("logger".to_string())),
            None => return Err(ConfigError::MissingSection("logger")),
        };
        Ok(Self { logger })
    }

    /// Discover logger categories for the given shape, in file order.
    ///
    /// Flat: every child of `logger` is one category. Nested: every child of
    /// `logger` is a namespace object whose children are the categories,
    /// registered under their leaf names.
    pub fn categories(&self, shape: ConfigShape) -> Result<Vec<CategorySpec>, ConfigError> {
        let mut specs = Vec::new();
        match shape {
            ConfigShape::Flat => {
                for (name, value) in &self.logger {
                    specs.push(category_spec(name, name, value)?);
                }
            }
            ConfigShape::Nested => {
                for (namespace, value) in &self.logger {
                    let children = value.as_object().ok_or_else(|| {
                        ConfigError::NotAnObject(format!("logger.{}", namespace))
                    })?;
                    for (name, value) in children {
                        let prefix = format!("{}.{}", namespace, name);
                        specs.push(category_spec(&prefix, name, value)?);
                    }
                }
            }
        }
        Ok(specs)
    }
}

fn category_spec(prefix: &str, name: &str, value: &Value) -> Result<CategorySpec, ConfigError> {
    if !value.is_object() {
        return Err(ConfigError::NotAnObject(format!("logger.{}", prefix)));
    }
    let config = serde_json::from_value(value.clone()).map_err(|source| ConfigError::Category {
        name: prefix.to_string(),
        source,
    })?;
    Ok(CategorySpec {
        name: name.to_string(),
        config,
    })
}
