/// A globally installed package as reported by the inspector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRecord {
    pub name: String,
    pub installed_version: Option<String>,
    pub latest_version: Option<String>,
    pub homepage: Option<String>,
}

#[allow(dead_code)]
impl PackageRecord {
    pub fn new(
        name: impl Into<String>,
        installed_version: Option<&str>,
        latest_version: Option<&str>,
    ) -> Self {
        Self {
            name: name.into(),
            installed_version: installed_version.map(str::to_string),
            latest_version: latest_version.map(str::to_string),
            homepage: None,
        }
    }

    pub fn with_homepage(mut self, homepage: impl Into<String>) -> Self {
        self.homepage = Some(homepage.into());
        self
    }
}

/// A package whose installed version is older than the latest release
///
/// Only the update filter builds these, so both versions are always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCandidate {
    name: String,
    installed_version: String,
    latest_version: String,
    homepage: Option<String>,
}

impl UpdateCandidate {
    pub(crate) fn new(
        name: String,
        installed_version: String,
        latest_version: String,
        homepage: Option<String>,
    ) -> Self {
        Self {
            name,
            installed_version,
            latest_version,
            homepage,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn installed_version(&self) -> &str {
        &self.installed_version
    }

    pub fn latest_version(&self) -> &str {
        &self.latest_version
    }

    pub fn homepage(&self) -> Option<&str> {
        self.homepage.as_deref()
    }

    /// Install token pinning the package to its latest release
    pub fn install_spec(&self) -> String {
        format!("{}@{}", self.name, self.latest_version)
    }
}

impl From<UpdateCandidate> for PackageRecord {
    fn from(candidate: UpdateCandidate) -> Self {
        Self {
            name: candidate.name,
            installed_version: Some(candidate.installed_version),
            latest_version: Some(candidate.latest_version),
            homepage: candidate.homepage,
        }
    }
}
