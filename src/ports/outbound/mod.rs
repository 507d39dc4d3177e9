/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (content scanners, file system, console).
pub mod cataloger;
pub mod output_presenter;
pub mod progress_reporter;

pub use cataloger::{CatalogedPackage, Cataloger, PackageIdentifiers, RawChecksum};
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
