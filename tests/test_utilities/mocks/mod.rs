/// Mock implementations for testing
mod mock_cataloger;
mod mock_progress_reporter;

#[allow(unused_imports)]
pub use mock_cataloger::MockCataloger;
#[allow(unused_imports)]
pub use mock_progress_reporter::MockProgressReporter;
