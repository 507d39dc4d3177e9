mod sbom_generator;

pub use sbom_generator::SbomGenerator;
