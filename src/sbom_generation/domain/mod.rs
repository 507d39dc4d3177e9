pub mod checksum;
pub mod component;
pub mod cpe;
pub mod dependency;
pub mod license;
pub mod sbom;
pub mod sbom_metadata;

pub use checksum::{Checksum, ChecksumAlgorithm};
pub use component::{Component, ComponentMetadata, SourceInfo};
pub use cpe::Cpe;
pub use dependency::DependencyDescriptor;
pub use license::License;
pub use sbom::{Sbom, SourceKind};
pub use sbom_metadata::SbomMetadata;
