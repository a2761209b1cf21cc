use etcetera::BaseStrategy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::{EnvProvider, non_empty_var};

const CONFIG_FILE_ENV: &str = "JIRA_CONFIG_FILE";
const AUTH_TYPE_ENV: &str = "JIRA_AUTH_TYPE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InstallationType {
    #[default]
    #[serde(alias = "cloud", alias = "CLOUD")]
    Cloud,
    #[serde(alias = "local", alias = "LOCAL")]
    Local,
}

impl InstallationType {
    /// REST API version used when reading issue data. Cloud serves rich documents on v3.
    pub fn read_api_version(&self) -> u8 {
        match self {
            InstallationType::Cloud => 3,
            InstallationType::Local => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    #[default]
    #[serde(alias = "Basic")]
    Basic,
    #[serde(alias = "Bearer", alias = "pat")]
    Bearer,
}

impl std::str::FromStr for AuthType {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(AuthType::Basic),
            "bearer" | "pat" => Ok(AuthType::Bearer),
            other => Err(ConfigurationError::InvalidAuthType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub server: String,
    pub login: String,
    pub installation: InstallationType,
    pub auth_type: AuthType,
    pub project: Project,
}

impl Configuration {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigurationError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let mut configuration: Configuration = serde_yaml::from_str(&content)?;
        configuration.server = configuration.server.trim().trim_end_matches('/').to_string();
        configuration.project.key = configuration.project.key.trim().to_string();

        if configuration.server.is_empty() {
            return Err(ConfigurationError::MissingServer(path.to_path_buf()));
        }

        log::debug!(
            "Loaded configuration from {}: server={}, project={:?}",
            path.display(),
            configuration.server,
            configuration.project.key
        );

        Ok(configuration)
    }

    /// Loads the configuration and applies environment overrides.
    pub fn load(
        explicit: Option<PathBuf>,
        env: &impl EnvProvider,
    ) -> Result<Self, ConfigurationError> {
        let path = determine_config_path(explicit, env)?;
        let mut configuration = Self::from_path(&path)?;

        if let Some(auth_type) = non_empty_var(env, AUTH_TYPE_ENV) {
            configuration.auth_type = auth_type.parse()?;
            log::debug!("Auth type overridden from {AUTH_TYPE_ENV}");
        }

        Ok(configuration)
    }

    pub fn project_key(&self) -> &str {
        &self.project.key
    }
}

/// Resolves the configuration file: explicit path, then `JIRA_CONFIG_FILE`, then the user config dir.
pub fn determine_config_path(
    explicit: Option<PathBuf>,
    env: &impl EnvProvider,
) -> Result<PathBuf, ConfigurationError> {
    if let Some(path) = explicit {
        return Ok(path);
    }

    if let Some(path) = non_empty_var(env, CONFIG_FILE_ENV) {
        log::debug!("Using configuration file from {CONFIG_FILE_ENV}: {path}");
        return Ok(PathBuf::from(path));
    }

    let strategy =
        etcetera::choose_base_strategy().map_err(|_| ConfigurationError::NoConfigDir)?;
    Ok(strategy.config_dir().join(".jira").join(".config.yml"))
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigurationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    YamlParser(#[from] serde_yaml::Error),
    #[error("Configuration file not found at {0:?}. Create it or pass --config")]
    NotFound(PathBuf),
    #[error("Configuration file {0:?} does not define a `server`")]
    MissingServer(PathBuf),
    #[error("Invalid auth type: {0}. Expected `basic` or `bearer`")]
    InvalidAuthType(String),
    #[error("Could not determine the user configuration directory")]
    NoConfigDir,
}
