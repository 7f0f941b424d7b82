use crate::error::{Result, UpdateError};
use crate::npm::NpmRegistry;
use crate::npm::registry::{DEFAULT_REGISTRY, default_registry_for};
use crate::utils::pattern::PatternMatcher;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_NPM: &str = "npm";
pub const DEFAULT_FILTER: &str = "steamer*";
pub const NPM_ENV_VAR: &str = "STEAMER_NPM";

/// Settings for a single update run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateConfig {
    /// Package manager binary used for listing and installing
    pub npm: String,
    /// Registry queried for latest versions
    pub registry: String,
    /// Glob selecting the package family to check
    pub filter: String,
    pub spinner: bool,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            npm: DEFAULT_NPM.to_string(),
            registry: DEFAULT_REGISTRY.to_string(),
            filter: DEFAULT_FILTER.to_string(),
            spinner: true,
        }
    }
}

/// On-disk configuration, `~/.steamer/config.toml` by default
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default, alias = "NPM")]
    pub npm: Option<String>,
    #[serde(default)]
    pub registry: Option<String>,
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub spinner: Option<bool>,
}

/// Values supplied on the command line; these win over everything else
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub npm: Option<String>,
    pub registry: Option<String>,
    pub filter: Option<String>,
    pub no_spinner: bool,
}

impl ConfigFile {
    /// Load the file if it exists. A missing file yields the empty config.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No config file at {}", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            UpdateError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|e| {
            UpdateError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".steamer").join("config.toml"))
    }
}

impl UpdateConfig {
    /// Merge overrides, environment and file settings, in that precedence order
    pub fn resolve(
        file: ConfigFile,
        env_npm: Option<String>,
        overrides: &ConfigOverrides,
    ) -> Result<Self> {
        let defaults = Self::default();

        let npm = first_non_empty([overrides.npm.clone(), env_npm, file.npm])
            .unwrap_or(defaults.npm);
        let registry = first_non_empty([overrides.registry.clone(), file.registry])
            .unwrap_or_else(|| default_registry_for(&npm).to_string());
        let filter = first_non_empty([overrides.filter.clone(), file.filter])
            .unwrap_or(defaults.filter);
        let spinner = !overrides.no_spinner && file.spinner.unwrap_or(defaults.spinner);

        let config = Self {
            npm,
            registry,
            filter,
            spinner,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.npm.chars().any(char::is_whitespace) {
            return Err(UpdateError::Config(format!(
                "Package manager name '{}' must not contain whitespace",
                self.npm
            )));
        }

        NpmRegistry::validate_registry_url(&self.registry)?;
        PatternMatcher::new(&self.filter)?;
        Ok(())
    }
}

fn first_non_empty<const N: usize>(values: [Option<String>; N]) -> Option<String> {
    values
        .into_iter()
        .flatten()
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}
