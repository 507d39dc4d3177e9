use crate::ports::outbound::{CatalogedPackage, Cataloger};
use crate::sbom_generation::domain::{
    Checksum, ChecksumAlgorithm, Component, ComponentMetadata, Cpe, DependencyDescriptor, Sbom,
    SbomMetadata, SourceInfo, SourceKind,
};
use crate::shared::error::SbomError;
use crate::shared::Result;
use chrono::{SecondsFormat, Utc};
use std::fs;
use std::io;
use std::path::Path;

/// SbomGenerator service for building the internal SBOM model
///
/// Two entry points: a filesystem path (enumeration delegated to a
/// [`Cataloger`]) and a single declared dependency (direct field mapping).
pub struct SbomGenerator;

impl SbomGenerator {
    /// Generates SBOM metadata with the current timestamp
    pub fn generate_metadata(tool_name: &str, tool_version: &str) -> SbomMetadata {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

        SbomMetadata::new(timestamp, tool_name.to_string(), tool_version.to_string())
    }

    /// Generates SBOM metadata naming this crate as the producing tool
    pub fn generate_default_metadata() -> SbomMetadata {
        Self::generate_metadata(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    /// Generates an SBOM for a directory or regular file
    ///
    /// # Errors
    /// - [`SbomError::NotFound`] if `path` does not exist
    /// - [`SbomError::FileReadError`] if its metadata cannot be read
    /// - any error reported by the cataloger
    pub fn generate_from_path<C>(path: &Path, cataloger: &C) -> Result<Sbom>
    where
        C: Cataloger + ?Sized,
    {
        let metadata = fs::metadata(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => SbomError::NotFound {
                path: path.to_path_buf(),
                source,
            },
            _ => SbomError::FileReadError {
                path: path.to_path_buf(),
                details: source.to_string(),
            },
        })?;

        let source_kind = if metadata.is_dir() {
            SourceKind::Directory
        } else {
            SourceKind::File
        };

        let components = cataloger
            .scan(path)?
            .into_iter()
            .map(Self::component_from_package)
            .collect();

        Ok(Sbom::new(
            components,
            path.display().to_string(),
            source_kind,
            Self::generate_default_metadata(),
        ))
    }

    /// Generates a single-component SBOM from an explicit dependency
    ///
    /// The CPE, when present, is the only field validated. The resulting
    /// SBOM is labelled with `label` rather than the dependency's own URI.
    ///
    /// # Errors
    /// - [`SbomError::InvalidCpe`] for a malformed CPE
    /// - [`SbomError::UnsupportedAlgorithm`] for an unknown checksum algorithm
    /// - a validation error for an unreadable deprecation date
    pub fn generate_from_dependency(dependency: &DependencyDescriptor, label: &str) -> Result<Sbom> {
        if !dependency.cpe.is_empty() {
            Cpe::parse(&dependency.cpe)?;
        }

        let source = SourceInfo {
            name: file_name_of(&dependency.source),
            checksum: dependency.source_checksum()?,
            upstream_version: dependency.version.clone(),
            uri: dependency.source.clone(),
        };

        let metadata = ComponentMetadata {
            architecture: String::new(),
            cpe: dependency.cpe.clone(),
            deprecation_date: dependency.deprecation_date()?,
            licenses: dependency.licenses.clone(),
            purl: dependency.purl.clone(),
            checksum: dependency.primary_checksum()?,
            summary: String::new(),
            uri: dependency.uri.clone(),
            version: dependency.version.clone(),
            source: (!source.is_empty()).then_some(source),
        };

        Ok(Sbom::new(
            vec![Component::new(dependency.name.clone(), metadata)],
            label,
            SourceKind::Directory,
            Self::generate_default_metadata(),
        ))
    }

    /// Maps a cataloger item; fields the model cannot hold are dropped
    fn component_from_package(package: CatalogedPackage) -> Component {
        let checksum = package.checksum.and_then(|raw| {
            ChecksumAlgorithm::resolve(&raw.algorithm)
                .ok()
                .map(|algorithm| Checksum::new(algorithm, raw.hash))
        });

        let metadata = ComponentMetadata {
            cpe: package
                .identifiers
                .cpes
                .into_iter()
                .next()
                .unwrap_or_default(),
            licenses: package.licenses,
            purl: package.identifiers.purl.unwrap_or_default(),
            checksum,
            version: package.version,
            ..Default::default()
        };

        Component::new(package.name, metadata)
    }
}

fn file_name_of(uri: &str) -> String {
    uri.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or_default()
        .to_string()
}
