use crate::application::formatter::ResolvedFormat;
use crate::shared::Result;

/// OutputPresenter port for delivering encoded SBOMs
///
/// This port abstracts where each resolved output ends up (a file next to
/// its siblings, stdout, ...). Implementations pull the bytes through
/// [`ResolvedFormat::write_to`], so encoding faults surface here per output.
pub trait OutputPresenter {
    /// Writes one resolved output to the destination
    ///
    /// # Returns
    /// A human-readable description of where the output went
    ///
    /// # Errors
    /// Returns an error if encoding fails or the destination cannot be written.
    fn present(&self, output: &ResolvedFormat) -> Result<String>;
}
