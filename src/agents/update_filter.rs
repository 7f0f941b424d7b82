use crate::npm::{PackageRecord, UpdateCandidate, VersionComparator};

/// Keep the records whose installed version is older than the latest one.
///
/// Records missing either version, or carrying one that is not valid semver,
/// are dropped. Input order is preserved.
pub fn select_updatable(records: &[PackageRecord]) -> Vec<UpdateCandidate> {
    records.iter().filter_map(to_candidate).collect()
}

fn to_candidate(record: &PackageRecord) -> Option<UpdateCandidate> {
    let installed = record.installed_version.as_deref()?;
    let latest = record.latest_version.as_deref()?;

    if !VersionComparator::is_older(installed, latest) {
        return None;
    }

    Some(UpdateCandidate::new(
        record.name.clone(),
        installed.to_string(),
        latest.to_string(),
        record.homepage.clone(),
    ))
}
