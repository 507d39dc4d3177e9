use crate::application::formatter::Formatter;

/// SbomResponse - Internal response DTO from SBOM generation use case
///
/// Carries the resolved outputs plus the counts reported to the user.
#[derive(Debug)]
pub struct SbomResponse {
    pub formatter: Formatter,
    pub component_count: usize,
    /// Scanned path or dependency label
    pub source_target: String,
}

impl SbomResponse {
    pub fn new(formatter: Formatter, component_count: usize, source_target: String) -> Self {
        Self {
            formatter,
            component_count,
            source_target,
        }
    }
}
