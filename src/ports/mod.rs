/// Ports module defining interfaces for hexagonal architecture
///
/// Only outbound (driven) ports exist: the library entry points themselves
/// are the inbound surface.
pub mod outbound;
