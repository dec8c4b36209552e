use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{IconizeError, Result};
use crate::resolver::ResolveOptions;

const CONFIG_FILE: &str = "config.toml";
const DEFAULT_DATA_FILE: &str = "data.json";

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# iconize configuration file
# Location: ~/.iconize/config.toml

[data]
# Data file holding icon assignments and custom rules.
# Relative paths are resolved against the base directory.
# Default: "data.json"
file = "data.json"

[rules]
# Check a rule's target (everything/files/folders) when resolving entries
# whose type is known. Default: true
enforce_scope = true

# Leave rules with an emoji icon out of path resolution. Default: true
skip_emoji = true
"#;

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub rules: RulesConfig,
}

/// Data file location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_file")]
    pub file: PathBuf,
}

/// Rule resolution switches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default = "default_true")]
    pub enforce_scope: bool,

    #[serde(default = "default_true")]
    pub skip_emoji: bool,
}

fn default_data_file() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_FILE)
}

fn default_true() -> bool {
    true
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            file: default_data_file(),
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            enforce_scope: true,
            skip_emoji: true,
        }
    }
}

impl Config {
    /// Load config from base directory
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content).map_err(|e| IconizeError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Save config to base directory
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        let content = toml::to_string_pretty(self).map_err(|e| IconizeError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        fs::write(&path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn path(base_dir: &Path) -> PathBuf {
        base_dir.join(CONFIG_FILE)
    }

    /// Initialize config with default template (rich comments)
    pub fn init(base_dir: &Path) -> Result<PathBuf> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        if !path.exists() {
            fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path)
    }

    /// Absolute location of the data file
    pub fn data_path(&self, base_dir: &Path) -> PathBuf {
        if self.data.file.is_absolute() {
            self.data.file.clone()
        } else {
            base_dir.join(&self.data.file)
        }
    }

    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            enforce_scope: self.rules.enforce_scope,
            skip_emoji: self.rules.skip_emoji,
        }
    }

    /// Get a config value by dot-notation key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "data.file" => Some(self.data.file.display().to_string()),
            "rules.enforce_scope" => Some(self.rules.enforce_scope.to_string()),
            "rules.skip_emoji" => Some(self.rules.skip_emoji.to_string()),
            _ => None,
        }
    }

    /// Set a config value by dot-notation key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "data.file" => {
                let trimmed = value.trim().trim_matches('"');
                if trimmed.is_empty() {
                    return Err(invalid_value(key, value));
                }
                self.data.file = PathBuf::from(trimmed);
                Ok(())
            }
            "rules.enforce_scope" => {
                self.rules.enforce_scope = parse_bool(key, value)?;
                Ok(())
            }
            "rules.skip_emoji" => {
                self.rules.skip_emoji = parse_bool(key, value)?;
                Ok(())
            }
            _ => Err(IconizeError::ConfigKeyNotFound {
                key: key.to_string(),
            }),
        }
    }

    /// List all config keys with their current values
    pub fn list(&self) -> Vec<(String, String)> {
        ["data.file", "rules.enforce_scope", "rules.skip_emoji"]
            .into_iter()
            .filter_map(|key| self.get(key).map(|value| (key.to_string(), value)))
            .collect()
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(invalid_value(key, value)),
    }
}

fn invalid_value(key: &str, value: &str) -> IconizeError {
    IconizeError::InvalidConfigValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("k", "Yes").unwrap());
        assert!(!parse_bool("k", "0").unwrap());
        assert!(matches!(
            parse_bool("k", "maybe"),
            Err(IconizeError::InvalidConfigValue { .. })
        ));
    }

    #[test]
    fn test_config_get_set() {
        let mut config = Config::default();

        config.set("rules.enforce_scope", "false").unwrap();
        assert!(!config.rules.enforce_scope);
        assert_eq!(config.get("rules.enforce_scope").unwrap(), "false");

        config.set("data.file", "icons.json").unwrap();
        assert_eq!(config.data.file, PathBuf::from("icons.json"));

        assert!(matches!(
            config.set("rules.unknown", "true"),
            Err(IconizeError::ConfigKeyNotFound { .. })
        ));
    }

    #[test]
    fn test_template_parses_to_defaults() {
        let temp = TempDir::new().unwrap();
        Config::init(temp.path()).unwrap();

        let config = Config::load(temp.path()).unwrap();
        assert_eq!(config.data.file, PathBuf::from("data.json"));
        assert!(config.rules.enforce_scope);
        assert!(config.rules.skip_emoji);
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.set("rules.skip_emoji", "no").unwrap();
        config.save(temp.path()).unwrap();

        let loaded = Config::load(temp.path()).unwrap();
        assert!(!loaded.rules.skip_emoji);
        assert!(!loaded.resolve_options().skip_emoji);
    }

    #[test]
    fn test_data_path() {
        let base = Path::new("/home/user/.iconize");
        let mut config = Config::default();
        assert_eq!(config.data_path(base), base.join("data.json"));

        config.data.file = PathBuf::from("/srv/vault/data.json");
        assert_eq!(config.data_path(base), PathBuf::from("/srv/vault/data.json"));
    }

    #[test]
    fn test_list() {
        let keys: Vec<_> = Config::default().list().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["data.file", "rules.enforce_scope", "rules.skip_emoji"]);
    }
}
