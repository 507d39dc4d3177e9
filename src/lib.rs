//! sbom-export - SBOM generation and multi-format export
//!
//! This library builds a format-agnostic Software Bill of Materials from a
//! directory, a single file or one explicitly declared dependency, and
//! renders it as Syft, CycloneDX or SPDX JSON in any supported schema
//! version. It follows a hexagonal layout.
//!
//! # Architecture
//!
//! - **Domain Layer** (`sbom_generation`): SBOM model, checksum algorithms, CPEs, generators
//! - **Application Layer** (`application`): format resolution, formatter, use cases
//! - **Ports** (`ports`): Cataloger, OutputPresenter and ProgressReporter interfaces
//! - **Adapters** (`adapters`): lockfile cataloger, encoders, console and filesystem output
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use sbom_export::prelude::*;
//! use std::io::Read;
//! use std::path::Path;
//!
//! # fn main() -> Result<()> {
//! let sbom = SbomGenerator::generate_from_path(Path::new("."), &LockfileCataloger::new())?;
//!
//! let formatter = sbom.in_formats([
//!     "application/vnd.syft+json",
//!     "application/spdx+json;version=2.2",
//! ])?;
//!
//! for mut output in formatter {
//!     let mut content = String::new();
//!     output.read_to_string(&mut content)?;
//!     println!("{}: {} bytes", output.extension(), content.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod ports;
pub mod sbom_generation;
pub mod shared;

use std::path::Path;

/// Generates an SBOM for `path` using the bundled lockfile cataloger
///
/// # Errors
/// See [`SbomGenerator::generate_from_path`](sbom_generation::services::SbomGenerator::generate_from_path).
pub fn generate(path: impl AsRef<Path>) -> shared::Result<sbom_generation::domain::Sbom> {
    sbom_generation::services::SbomGenerator::generate_from_path(
        path.as_ref(),
        &adapters::outbound::catalogers::LockfileCataloger::new(),
    )
}

/// Generates a single-component SBOM for `dependency`, labelled `label`
///
/// # Errors
/// See [`SbomGenerator::generate_from_dependency`](sbom_generation::services::SbomGenerator::generate_from_dependency).
pub fn generate_from_dependency(
    dependency: &sbom_generation::domain::DependencyDescriptor,
    label: &str,
) -> shared::Result<sbom_generation::domain::Sbom> {
    sbom_generation::services::SbomGenerator::generate_from_dependency(dependency, label)
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::catalogers::LockfileCataloger;
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{FileSystemWriter, StdoutPresenter};
    pub use crate::application::dto::{FormatSpec, SbomRequest, SbomResponse, SbomTarget};
    pub use crate::application::factories::{
        FormatRegistry, PresenterFactory, PresenterType, CYCLONEDX_FORMAT, SPDX_FORMAT,
        SYFT_FORMAT,
    };
    pub use crate::application::formatter::{Formatter, ResolvedFormat};
    pub use crate::application::use_cases::GenerateSbomUseCase;
    pub use crate::ports::outbound::{
        CatalogedPackage, Cataloger, OutputPresenter, PackageIdentifiers, ProgressReporter,
        RawChecksum,
    };
    pub use crate::sbom_generation::domain::{
        Checksum, ChecksumAlgorithm, Component, ComponentMetadata, Cpe, DependencyDescriptor,
        Sbom, SbomMetadata, SourceInfo, SourceKind,
    };
    pub use crate::sbom_generation::services::SbomGenerator;
    pub use crate::shared::error::SbomError;
    pub use crate::shared::Result;
}
