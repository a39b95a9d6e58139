//! Environment configuration for stack composition.
//!
//! Plain immutable key/value data supplied at graph-construction time and
//! validated only for presence and shape; the composition core never
//! interprets any of it.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{StacksError, StacksResult};

/// External repository coordinates for the hosting stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub owner: String,
    pub name: String,
    #[serde(default = "default_branch")]
    pub branch: String,
}

fn default_branch() -> String {
    "main".to_string()
}

impl RepositoryConfig {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            branch: default_branch(),
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }
}

/// Feature toggles selecting which optional stacks get composed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StackFeatures {
    #[serde(default)]
    pub storage: bool,
    #[serde(default)]
    pub hosting: bool,
}

impl StackFeatures {
    pub fn all() -> Self {
        Self {
            storage: true,
            hosting: true,
        }
    }
}

/// Configuration for one target environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Environment name (for example "dev" or "prod").
    pub name: String,
    /// Application name used to derive resource names.
    pub app_name: String,
    /// Origins allowed to access the file storage bucket.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    /// Repository coordinates, required when hosting is enabled.
    #[serde(default)]
    pub repository: Option<RepositoryConfig>,
    /// Literal environment variables passed to the hosting stack.
    #[serde(default)]
    pub environment_variables: BTreeMap<String, String>,
    /// Optional stack toggles.
    #[serde(default)]
    pub features: StackFeatures,
}

impl EnvironmentConfig {
    /// Create a configuration for the given environment and application.
    pub fn new(name: impl Into<String>, app_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            app_name: app_name.into(),
            allowed_origins: Vec::new(),
            repository: None,
            environment_variables: BTreeMap::new(),
            features: StackFeatures::default(),
        }
    }

    /// Allow an origin to access file storage.
    pub fn with_allowed_origin(mut self, origin: impl Into<String>) -> Self {
        self.allowed_origins.push(origin.into());
        self
    }

    /// Set the hosted repository coordinates.
    pub fn with_repository(mut self, repository: RepositoryConfig) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Add a literal environment variable for the hosting stack.
    pub fn with_env_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment_variables.insert(key.into(), value.into());
        self
    }

    /// Select which optional stacks to compose.
    pub fn with_features(mut self, features: StackFeatures) -> Self {
        self.features = features;
        self
    }

    /// Validate presence and shape of required fields.
    pub fn validate(&self) -> StacksResult<()> {
        if self.name.trim().is_empty() {
            return Err(StacksError::InvalidConfig(
                "environment name must not be empty".to_string(),
            ));
        }
        if self.app_name.trim().is_empty() {
            return Err(StacksError::InvalidConfig(
                "app_name must not be empty".to_string(),
            ));
        }
        if self.features.hosting && self.repository.is_none() {
            return Err(StacksError::MissingRepository);
        }
        Ok(())
    }

    /// Load a configuration from a YAML file.
    pub fn from_yaml_file(path: &Path) -> StacksResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save the configuration to a YAML file.
    pub fn to_yaml_file(&self, path: &Path) -> StacksResult<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
