use crate::sbom_generation::domain::DependencyDescriptor;
use std::path::PathBuf;

/// What an SBOM should be generated for
#[derive(Debug, Clone)]
pub enum SbomTarget {
    /// Existing directory or regular file, scanned by the cataloger
    Path(PathBuf),
    /// A single declared dependency, labelled by the caller
    Dependency {
        descriptor: DependencyDescriptor,
        label: String,
    },
}

/// SbomRequest - Internal request DTO for SBOM generation use case
#[derive(Debug, Clone)]
pub struct SbomRequest {
    pub target: SbomTarget,
    /// Raw format specs such as `application/spdx+json;version=2.2`
    pub formats: Vec<String>,
}

impl SbomRequest {
    pub fn new(target: SbomTarget, formats: Vec<String>) -> Self {
        Self { target, formats }
    }

    /// Request for scanning `path`
    pub fn for_path(path: impl Into<PathBuf>, formats: Vec<String>) -> Self {
        Self::new(SbomTarget::Path(path.into()), formats)
    }

    /// Request for a single dependency
    pub fn for_dependency(
        descriptor: DependencyDescriptor,
        label: impl Into<String>,
        formats: Vec<String>,
    ) -> Self {
        Self::new(
            SbomTarget::Dependency {
                descriptor,
                label: label.into(),
            },
            formats,
        )
    }
}
