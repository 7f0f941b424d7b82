pub mod installer;
pub mod package_inspector;
pub mod selector;
pub mod update_filter;

#[cfg(test)]
pub(crate) mod test_support;

pub use installer::{InstallOutcome, InstallerAgent};
pub use package_inspector::{PackageInspector, PackageInspectorAgent};
pub use selector::{CheckboxPrompt, DialoguerPrompt, UpdateSelector};
pub use update_filter::select_updatable;
