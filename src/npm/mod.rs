pub mod package;
pub mod registry;
pub mod version;

pub use package::{PackageRecord, UpdateCandidate};
pub use registry::{NpmRegistry, RegistryClient};
pub use version::VersionComparator;
