use super::checksum::Checksum;
use chrono::{DateTime, Utc};

/// Origin artifact of a component (e.g. the source tarball a binary was built from)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceInfo {
    pub name: String,
    pub checksum: Option<Checksum>,
    pub upstream_version: String,
    pub uri: String,
}

impl SourceInfo {
    /// True when the source can be neither located nor verified
    ///
    /// A name or version alone does not identify an upstream artifact.
    pub fn is_empty(&self) -> bool {
        self.uri.is_empty() && self.checksum.is_none()
    }
}

/// Descriptive metadata of a single component
///
/// Empty strings mean "unknown"; encoders omit them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentMetadata {
    pub architecture: String,
    pub cpe: String,
    pub deprecation_date: Option<DateTime<Utc>>,
    pub licenses: Vec<String>,
    pub purl: String,
    pub checksum: Option<Checksum>,
    pub summary: String,
    pub uri: String,
    pub version: String,
    pub source: Option<SourceInfo>,
}

/// One discovered or declared piece of software
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    name: String,
    metadata: ComponentMetadata,
}

impl Component {
    pub fn new(name: impl Into<String>, metadata: ComponentMetadata) -> Self {
        Self {
            name: name.into(),
            metadata,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.metadata.version
    }

    pub fn metadata(&self) -> &ComponentMetadata {
        &self.metadata
    }

    /// `name@version`, or just the name when the version is unknown
    pub fn coordinate(&self) -> String {
        if self.metadata.version.is_empty() {
            self.name.clone()
        } else {
            format!("{}@{}", self.name, self.metadata.version)
        }
    }
}
