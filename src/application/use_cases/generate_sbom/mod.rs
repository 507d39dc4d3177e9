use crate::application::dto::{SbomRequest, SbomResponse, SbomTarget};
use crate::ports::outbound::{Cataloger, ProgressReporter};
use crate::sbom_generation::domain::Sbom;
use crate::sbom_generation::services::SbomGenerator;
use crate::shared::Result;
use std::path::Path;

/// GenerateSbomUseCase - Core use case for SBOM generation and export
///
/// This use case orchestrates generation from a path or a single
/// dependency, then resolves the requested output formats, using generic
/// dependency injection for all infrastructure dependencies.
///
/// # Type Parameters
/// * `C` - Cataloger implementation
/// * `PR` - ProgressReporter implementation
pub struct GenerateSbomUseCase<C, PR> {
    cataloger: C,
    progress_reporter: PR,
}

impl<C, PR> GenerateSbomUseCase<C, PR>
where
    C: Cataloger,
    PR: ProgressReporter,
{
    /// Creates a new GenerateSbomUseCase with injected dependencies
    pub fn new(cataloger: C, progress_reporter: PR) -> Self {
        Self {
            cataloger,
            progress_reporter,
        }
    }

    /// Executes the SBOM generation use case
    ///
    /// Format specs are resolved only after generation succeeds, and a
    /// single bad spec fails the whole request.
    ///
    /// # Arguments
    /// * `request` - Generation target plus the raw format specs
    ///
    /// # Returns
    /// SbomResponse holding the resolved, not yet encoded, outputs
    pub fn execute(&self, request: SbomRequest) -> Result<SbomResponse> {
        // Step 1: Build the internal model
        let sbom = match &request.target {
            SbomTarget::Path(path) => self.generate_from_path(path)?,
            SbomTarget::Dependency { descriptor, label } => {
                self.progress_reporter.report(&format!(
                    "📦 Generating SBOM for dependency {} {}",
                    descriptor.name, descriptor.version
                ));
                SbomGenerator::generate_from_dependency(descriptor, label)?
            }
        };

        let component_count = sbom.components().len();
        let source_target = sbom.source_target().to_string();
        self.progress_reporter
            .report(&format!("✅ Detected {} component(s)", component_count));

        // Step 2: Resolve every requested format before encoding anything
        self.progress_reporter.report(&format!(
            "📝 Resolving {} output format(s)...",
            request.formats.len()
        ));
        let formatter = sbom.in_formats(&request.formats)?;

        Ok(SbomResponse::new(formatter, component_count, source_target))
    }

    fn generate_from_path(&self, path: &Path) -> Result<Sbom> {
        self.progress_reporter
            .report(&format!("🔍 Scanning: {}", path.display()));

        SbomGenerator::generate_from_path(path, &self.cataloger)
    }
}

#[cfg(test)]
mod tests;
