use crate::error::{Result, UpdateError};
use semver::Version;
use std::cmp::Ordering;

/// Semantic-version ordering between an installed and a published release
pub struct VersionComparator;

impl VersionComparator {
    /// Check whether `installed` strictly precedes `latest`.
    ///
    /// Unparseable input on either side is never treated as an update.
    pub fn is_older(installed: &str, latest: &str) -> bool {
        match Self::try_is_older(installed, latest) {
            Ok(older) => older,
            Err(e) => {
                tracing::debug!("Skipping version pair {installed} / {latest}: {e}");
                false
            }
        }
    }

    /// Like [`VersionComparator::is_older`], but reports malformed versions.
    pub fn try_is_older(installed: &str, latest: &str) -> Result<bool> {
        let installed = Self::parse(installed)?;
        let latest = Self::parse(latest)?;
        Ok(Self::cmp_precedence(&installed, &latest) == Ordering::Less)
    }

    /// Parse a version the way npm writes them, tolerating a `v` or `=` prefix
    pub fn parse(version: &str) -> Result<Version> {
        let trimmed = version.trim();
        let stripped = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('='))
            .unwrap_or(trimmed);

        Version::parse(stripped)
            .map_err(|e| UpdateError::InvalidVersionFormat(format!("'{version}': {e}")))
    }

    // Build metadata takes no part in precedence.
    fn cmp_precedence(a: &Version, b: &Version) -> Ordering {
        (a.major, a.minor, a.patch)
            .cmp(&(b.major, b.minor, b.patch))
            .then_with(|| a.pre.cmp(&b.pre))
    }
}
