/// Data Transfer Objects for application layer
///
/// DTOs are used to transfer data between the application layer
/// and adapters, keeping the domain layer isolated.
mod format_spec;
mod sbom_request;
mod sbom_response;

pub use format_spec::FormatSpec;
pub use sbom_request::{SbomRequest, SbomTarget};
pub use sbom_response::SbomResponse;
