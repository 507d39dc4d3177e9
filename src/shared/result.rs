/// Result alias used by every fallible operation in the crate.
///
/// Concrete failure kinds are [`SbomError`](crate::shared::error::SbomError)
/// values wrapped in `anyhow::Error`; recover them with `downcast_ref`.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
