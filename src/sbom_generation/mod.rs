/// Domain layer - the internal SBOM model and the services that build it
pub mod domain;
pub mod services;
