use crate::shared::Result;
use std::path::Path;

/// Identifiers a cataloger reports for one package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageIdentifiers {
    pub purl: Option<String>,
    pub cpes: Vec<String>,
}

/// Checksum exactly as the cataloger spelled it; resolved later
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChecksum {
    pub algorithm: String,
    pub hash: String,
}

/// One item of installed software found by a cataloger
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogedPackage {
    pub name: String,
    pub version: String,
    pub licenses: Vec<String>,
    pub identifiers: PackageIdentifiers,
    pub checksum: Option<RawChecksum>,
}

/// Cataloger port for enumerating installed software
///
/// This port abstracts the content-scanning engine that walks a directory
/// or inspects a single file. Implementations must not mutate shared state;
/// the generator treats `scan` as a pure function.
pub trait Cataloger {
    /// Lists the packages found at `path`
    ///
    /// # Arguments
    /// * `path` - Existing directory or regular file to scan
    ///
    /// # Errors
    /// Any error aborts the whole generation call.
    fn scan(&self, path: &Path) -> Result<Vec<CatalogedPackage>>;
}
