use crate::error::{Result, UpdateError};
use crate::npm::{PackageRecord, RegistryClient};
use crate::utils::pattern::PatternMatcher;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

/// Lists globally installed packages together with their latest releases
pub trait PackageInspector {
    fn list_global_packages(&self, filter: &PatternMatcher) -> Result<Vec<PackageRecord>>;
}

/// A top-level package found in the global install tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    pub name: String,
    pub version: Option<String>,
}

/// PackageInspectorAgent asks the package manager what is installed globally
/// and the registry what is published.
pub struct PackageInspectorAgent {
    npm: String,
    registry: Arc<dyn RegistryClient>,
    spinner: bool,
}

impl PackageInspectorAgent {
    pub fn new(npm: impl Into<String>, registry: Arc<dyn RegistryClient>, spinner: bool) -> Self {
        Self {
            npm: npm.into(),
            registry,
            spinner,
        }
    }

    /// Run `<npm> ls -g --depth=0 --json` and parse its output
    pub fn list_installed(&self) -> Result<Vec<InstalledPackage>> {
        let args = ["ls", "-g", "--depth=0", "--json"];
        tracing::debug!("Executing: {} {}", self.npm, args.join(" "));

        let output = Command::new(&self.npm).args(args).output().map_err(|e| {
            UpdateError::InspectionFailed(format!(
                "Failed to execute '{} {}': {e}",
                self.npm,
                args.join(" ")
            ))
        })?;

        // npm exits non-zero for extraneous or invalid trees but still prints
        // the listing, so only the output decides.
        if !output.status.success() {
            tracing::debug!(
                "{} ls exited with {}: {}",
                self.npm,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            return Err(UpdateError::InspectionFailed(format!(
                "'{} ls' produced no output: {}",
                self.npm,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        parse_global_listing(&stdout)
    }

    /// Attach latest-release information to every installed package the
    /// filter accepts.
    pub fn resolve_records(
        &self,
        installed: Vec<InstalledPackage>,
        filter: &PatternMatcher,
    ) -> Result<Vec<PackageRecord>> {
        let matching: Vec<InstalledPackage> = installed
            .into_iter()
            .filter(|pkg| filter.matches(&pkg.name))
            .collect();

        tracing::debug!(
            "{} installed package(s) match '{}'",
            matching.len(),
            filter.as_str()
        );

        let pb = self.spinner();
        let mut records = Vec::with_capacity(matching.len());

        for pkg in matching {
            pb.set_message(format!("Checking {}", pkg.name));

            let manifest = match self.registry.fetch_latest(&pkg.name) {
                Ok(manifest) => manifest,
                Err(e) => {
                    pb.finish_and_clear();
                    return Err(e);
                }
            };

            let (latest_version, homepage) = match manifest {
                Some(manifest) => (Some(manifest.version), manifest.homepage),
                None => (None, None),
            };

            records.push(PackageRecord {
                name: pkg.name,
                installed_version: pkg.version,
                latest_version,
                homepage,
            });
        }
        pb.finish_and_clear();

        Ok(records)
    }

    fn spinner(&self) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if !self.spinner {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }
        let style = ProgressStyle::default_spinner()
            .template("  {spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

impl PackageInspector for PackageInspectorAgent {
    fn list_global_packages(&self, filter: &PatternMatcher) -> Result<Vec<PackageRecord>> {
        let installed = self.list_installed()?;
        self.resolve_records(installed, filter)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GlobalListing {
    Tree(ListingNode),
    // pnpm prints one node per global directory
    Trees(Vec<ListingNode>),
}

#[derive(Debug, Default, Deserialize)]
struct ListingNode {
    #[serde(default)]
    dependencies: Option<BTreeMap<String, ListingDependency>>,
    #[serde(default)]
    error: Option<ListingError>,
}

#[derive(Debug, Deserialize)]
struct ListingError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListingDependency {
    #[serde(default)]
    version: Option<String>,
}

/// Parse the JSON printed by `ls -g --depth=0 --json`, sorted by name
pub fn parse_global_listing(json: &str) -> Result<Vec<InstalledPackage>> {
    let listing: GlobalListing = serde_json::from_str(json).map_err(|e| {
        UpdateError::InspectionFailed(format!("Failed to parse global package listing: {e}"))
    })?;

    let nodes = match listing {
        GlobalListing::Tree(node) => vec![node],
        GlobalListing::Trees(nodes) => nodes,
    };

    let mut merged = BTreeMap::new();
    for node in nodes {
        // A tree with problems (ELSPROBLEMS) still lists its dependencies;
        // an error without them means nothing could be read.
        let dependencies = match (node.dependencies, node.error) {
            (Some(dependencies), _) => dependencies,
            (None, Some(error)) => {
                return Err(UpdateError::InspectionFailed(format!(
                    "{}: {}",
                    error.code.as_deref().unwrap_or("unknown error"),
                    error.summary.as_deref().unwrap_or("no summary")
                )));
            }
            (None, None) => continue,
        };

        for (name, dep) in dependencies {
            merged.entry(name).or_insert(dep.version);
        }
    }

    Ok(merged
        .into_iter()
        .map(|(name, version)| InstalledPackage { name, version })
        .collect())
}
