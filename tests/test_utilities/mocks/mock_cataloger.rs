use sbom_export::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Mock Cataloger returning canned packages and recording scanned paths
#[derive(Default, Clone)]
pub struct MockCataloger {
    packages: Vec<CatalogedPackage>,
    failure: Option<String>,
    pub scanned: Arc<Mutex<Vec<PathBuf>>>,
}

#[allow(dead_code)]
impl MockCataloger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package(mut self, name: &str, version: &str, purl: &str) -> Self {
        self.packages.push(CatalogedPackage {
            name: name.to_string(),
            version: version.to_string(),
            identifiers: PackageIdentifiers {
                purl: Some(purl.to_string()),
                cpes: Vec::new(),
            },
            ..Default::default()
        });
        self
    }

    pub fn with_raw_package(mut self, package: CatalogedPackage) -> Self {
        self.packages.push(package);
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn scanned_paths(&self) -> Vec<PathBuf> {
        self.scanned.lock().unwrap().clone()
    }
}

impl Cataloger for MockCataloger {
    fn scan(&self, path: &Path) -> Result<Vec<CatalogedPackage>> {
        self.scanned.lock().unwrap().push(path.to_path_buf());
        if let Some(message) = &self.failure {
            anyhow::bail!("{}", message);
        }
        Ok(self.packages.clone())
    }
}
