use crate::error::{Result, UpdateError};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org/";
pub const CNPM_REGISTRY: &str = "https://registry.npmmirror.com/";

/// Registry a package manager publishes to unless told otherwise
pub fn default_registry_for(npm: &str) -> &'static str {
    match npm {
        "cnpm" => CNPM_REGISTRY,
        _ => DEFAULT_REGISTRY,
    }
}

/// The subset of a published package manifest the updater cares about
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LatestManifest {
    pub version: String,
    #[serde(default)]
    pub homepage: Option<String>,
}

/// Source of "latest published" information for a package
pub trait RegistryClient: Send + Sync {
    /// Fetch the manifest tagged `latest`, or `None` when the registry does
    /// not know the package.
    fn fetch_latest(&self, name: &str) -> Result<Option<LatestManifest>>;
}

/// npm-compatible registry client
pub struct NpmRegistry {
    client: Client,
    base_url: Url,
}

impl NpmRegistry {
    pub fn new(registry: &str) -> Result<Self> {
        let base_url = Self::validate_registry_url(registry)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("steamer-update/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpdateError::Io(std::io::Error::other(e)))?;

        Ok(Self { client, base_url })
    }

    /// URL of the `latest` dist-tag document for a package
    ///
    /// Scoped names keep their `@` but have the separating slash encoded,
    /// e.g. `@scope/pkg` becomes `@scope%2Fpkg/latest`.
    pub fn latest_url(&self, name: &str) -> Result<Url> {
        let encoded = name.replace('/', "%2F");
        self.base_url
            .join(&format!("{encoded}/latest"))
            .map_err(|e| UpdateError::InspectionFailed(format!("Invalid package name '{name}': {e}")))
    }

    pub fn validate_registry_url(registry: &str) -> Result<Url> {
        let trimmed = registry.trim();
        let with_slash = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        };

        let parsed = Url::parse(&with_slash)
            .map_err(|_| UpdateError::Config(format!("Invalid registry URL: {registry}")))?;

        match parsed.scheme() {
            "https" | "http" => Ok(parsed),
            scheme => Err(UpdateError::Config(format!(
                "Unsupported registry scheme: {scheme}"
            ))),
        }
    }
}

impl RegistryClient for NpmRegistry {
    fn fetch_latest(&self, name: &str) -> Result<Option<LatestManifest>> {
        let url = self.latest_url(name)?;
        tracing::debug!("Fetching: {url}");

        let response = self
            .client
            .get(url.clone())
            .header("Accept", "application/json")
            .send()
            .map_err(|e| UpdateError::InspectionFailed(format!("Request to {url} failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!("Registry has no package named {name}");
            return Ok(None);
        }

        if !status.is_success() {
            return Err(UpdateError::InspectionFailed(format!(
                "HTTP {status} from {url}"
            )));
        }

        let manifest = response.json::<LatestManifest>().map_err(|e| {
            UpdateError::InspectionFailed(format!("Failed to decode manifest for {name}: {e}"))
        })?;

        Ok(Some(manifest))
    }
}
