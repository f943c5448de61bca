use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{GitTidyError, Result};

/// Name of the configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".git-tidy.toml";

/// Name of the configuration file looked up in the user config directory.
pub const USER_CONFIG_FILE: &str = "git-tidy.toml";

/// Represents the complete configuration for git-tidy.
///
/// Every section is optional; missing values fall back to the built-in defaults.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default)]
    pub tags: TagsConfig,

    #[serde(default)]
    pub branches: BranchesConfig,
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_keep() -> usize {
    50
}

fn default_months() -> u32 {
    6
}

fn default_issues_file() -> String {
    "issues.csv".to_string()
}

/// Retention policy defaults for numeric release tags.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TagsConfig {
    /// Number of newest valid tags always kept
    #[serde(default = "default_keep")]
    pub keep: usize,

    /// Minimum age in calendar months before a tag may be deleted
    #[serde(default = "default_months")]
    pub months: u32,
}

impl Default for TagsConfig {
    fn default() -> Self {
        TagsConfig {
            keep: default_keep(),
            months: default_months(),
        }
    }
}

/// Settings for merged-branch cleanup.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BranchesConfig {
    /// Path of the optional issue-tracker export
    #[serde(default = "default_issues_file")]
    pub issues_file: String,

    /// Extra branch names that are never deleted
    #[serde(default)]
    pub protected: Vec<String>,
}

impl Default for BranchesConfig {
    fn default() -> Self {
        BranchesConfig {
            issues_file: default_issues_file(),
            protected: Vec::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            remote: default_remote(),
            tags: TagsConfig::default(),
            branches: BranchesConfig::default(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `.git-tidy.toml` in current directory
/// 3. `git-tidy.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(LOCAL_CONFIG_FILE).exists() {
        fs::read_to_string(LOCAL_CONFIG_FILE)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(USER_CONFIG_FILE);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parses a TOML document into a [Config].
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config =
        toml::from_str(content).map_err(|e| GitTidyError::config(e.to_string()))?;
    if config.remote.trim().is_empty() {
        return Err(GitTidyError::config("remote name must not be empty"));
    }
    Ok(config)
}
