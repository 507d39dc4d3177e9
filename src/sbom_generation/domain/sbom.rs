use super::component::Component;
use super::sbom_metadata::SbomMetadata;
use std::fmt;

/// Kind of target an SBOM was generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Directory,
    File,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Directory => "directory",
            SourceKind::File => "file",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Internal SBOM model
///
/// Format-agnostic and immutable once built. It owns its components and is
/// consumed by a single `in_formats` call.
#[derive(Debug, Clone, PartialEq)]
pub struct Sbom {
    components: Vec<Component>,
    source_target: String,
    source_kind: SourceKind,
    metadata: SbomMetadata,
}

impl Sbom {
    pub fn new(
        components: Vec<Component>,
        source_target: impl Into<String>,
        source_kind: SourceKind,
        metadata: SbomMetadata,
    ) -> Self {
        Self {
            components,
            source_target: source_target.into(),
            source_kind,
            metadata,
        }
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Scanned path, or the caller-supplied label for dependency SBOMs
    pub fn source_target(&self) -> &str {
        &self.source_target
    }

    pub fn source_kind(&self) -> SourceKind {
        self.source_kind
    }

    pub fn metadata(&self) -> &SbomMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbom_generation::domain::ComponentMetadata;

    #[test]
    fn test_source_kind_as_str() {
        assert_eq!(SourceKind::Directory.as_str(), "directory");
        assert_eq!(SourceKind::File.to_string(), "file");
    }

    #[test]
    fn test_sbom_accessors() {
        let metadata = SbomMetadata::new(
            "2024-01-01T00:00:00Z".to_string(),
            "sbom-export".to_string(),
            "0.4.0".to_string(),
        );
        let sbom = Sbom::new(
            vec![Component::new("requests", ComponentMetadata::default())],
            "/workspace",
            SourceKind::Directory,
            metadata.clone(),
        );

        assert_eq!(sbom.components().len(), 1);
        assert_eq!(sbom.source_target(), "/workspace");
        assert_eq!(sbom.source_kind(), SourceKind::Directory);
        assert_eq!(sbom.metadata(), &metadata);
    }
}
