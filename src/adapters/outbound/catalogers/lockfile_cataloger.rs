use crate::ports::outbound::{CatalogedPackage, Cataloger, PackageIdentifiers, RawChecksum};
use crate::shared::security::{read_bounded_to_string, MAX_FILE_SIZE};
use crate::shared::Result;
use anyhow::Context;
use packageurl::PackageUrl;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Default directory depth searched below the scan root
const DEFAULT_MAX_DEPTH: usize = 8;

/// Directories never descended into
const SKIPPED_DIRECTORIES: [&str; 4] = [".git", "node_modules", "target", ".venv"];

/// Lockfiles this cataloger understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LockfileKind {
    Uv,
    Cargo,
    Npm,
}

impl LockfileKind {
    fn detect(path: &Path) -> Option<Self> {
        match path.file_name()?.to_str()? {
            "uv.lock" => Some(Self::Uv),
            "Cargo.lock" => Some(Self::Cargo),
            "package-lock.json" => Some(Self::Npm),
            _ => None,
        }
    }

    fn parse(self, content: &str) -> Result<Vec<CatalogedPackage>> {
        match self {
            Self::Uv => parse_uv_lock(content),
            Self::Cargo => parse_cargo_lock(content),
            Self::Npm => parse_package_lock(content),
        }
    }
}

/// LockfileCataloger adapter for enumerating locked dependencies
///
/// This adapter implements the Cataloger port by reading `uv.lock`,
/// `Cargo.lock` and `package-lock.json` files. Symbolic links are never
/// followed and files larger than [`MAX_FILE_SIZE`] are skipped.
pub struct LockfileCataloger {
    max_depth: usize,
}

impl LockfileCataloger {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Recognized lockfiles below `dir`, in file-name order
    fn find_lockfiles(&self, dir: &Path) -> Vec<(LockfileKind, DirEntry)> {
        WalkDir::new(dir)
            .follow_links(false)
            .max_depth(self.max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_skipped_directory(e))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| LockfileKind::detect(e.path()).map(|kind| (kind, e)))
            .collect()
    }

    fn catalog_file(&self, kind: LockfileKind, path: &Path) -> Result<Vec<CatalogedPackage>> {
        let size = path.metadata().map(|m| m.len()).unwrap_or(0);
        if size > MAX_FILE_SIZE {
            return Ok(Vec::new());
        }

        let content = read_bounded_to_string(path, "lockfile")?;
        kind.parse(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }
}

impl Default for LockfileCataloger {
    fn default() -> Self {
        Self::new()
    }
}

impl Cataloger for LockfileCataloger {
    fn scan(&self, path: &Path) -> Result<Vec<CatalogedPackage>> {
        if path.is_file() {
            return match LockfileKind::detect(path) {
                Some(kind) => self.catalog_file(kind, path),
                None => Ok(Vec::new()),
            };
        }

        let mut packages = Vec::new();
        for (kind, entry) in self.find_lockfiles(path) {
            packages.extend(self.catalog_file(kind, entry.path())?);
        }
        Ok(packages)
    }
}

fn is_skipped_directory(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRECTORIES.contains(&name))
}

fn build_purl(ty: &str, namespace: Option<&str>, name: &str, version: &str) -> Option<String> {
    let mut purl = PackageUrl::new(ty, name).ok()?;
    if let Some(namespace) = namespace {
        purl.with_namespace(namespace);
    }
    if !version.is_empty() {
        purl.with_version(version);
    }
    Some(purl.to_string())
}

/// Splits `sha256:abcd` into a raw checksum
fn split_checksum(value: &str) -> Option<RawChecksum> {
    let (algorithm, hash) = value.split_once(':')?;
    Some(RawChecksum {
        algorithm: algorithm.to_string(),
        hash: hash.to_string(),
    })
}

#[derive(Debug, Deserialize)]
struct UvLock {
    #[serde(default)]
    package: Vec<UvPackage>,
}

#[derive(Debug, Deserialize)]
struct UvPackage {
    name: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    source: BTreeMap<String, toml::Value>,
    sdist: Option<UvArtifact>,
}

#[derive(Debug, Deserialize)]
struct UvArtifact {
    hash: Option<String>,
}

fn parse_uv_lock(content: &str) -> Result<Vec<CatalogedPackage>> {
    let lockfile: UvLock = toml::from_str(content).context("Failed to parse uv.lock file")?;

    Ok(lockfile
        .package
        .into_iter()
        // The project itself and path dependencies are not installed software
        .filter(|p| !p.source.contains_key("editable") && !p.source.contains_key("virtual"))
        .map(|p| CatalogedPackage {
            identifiers: PackageIdentifiers {
                purl: build_purl("pypi", None, &p.name, &p.version),
                cpes: Vec::new(),
            },
            checksum: p
                .sdist
                .and_then(|sdist| sdist.hash)
                .and_then(|hash| split_checksum(&hash)),
            name: p.name,
            version: p.version,
            licenses: Vec::new(),
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct CargoLock {
    #[serde(default)]
    package: Vec<CargoPackage>,
}

#[derive(Debug, Deserialize)]
struct CargoPackage {
    name: String,
    version: String,
    source: Option<String>,
    checksum: Option<String>,
}

fn parse_cargo_lock(content: &str) -> Result<Vec<CatalogedPackage>> {
    let lockfile: CargoLock = toml::from_str(content).context("Failed to parse Cargo.lock file")?;

    Ok(lockfile
        .package
        .into_iter()
        // Workspace members carry no source
        .filter(|p| p.source.is_some())
        .map(|p| CatalogedPackage {
            identifiers: PackageIdentifiers {
                purl: build_purl("cargo", None, &p.name, &p.version),
                cpes: Vec::new(),
            },
            checksum: p.checksum.map(|hash| RawChecksum {
                algorithm: "sha256".to_string(),
                hash,
            }),
            name: p.name,
            version: p.version,
            licenses: Vec::new(),
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct PackageLock {
    /// lockfileVersion 2 and 3
    #[serde(default)]
    packages: BTreeMap<String, NpmPackage>,
    /// lockfileVersion 1
    #[serde(default)]
    dependencies: BTreeMap<String, NpmPackage>,
}

#[derive(Debug, Deserialize)]
struct NpmPackage {
    #[serde(default)]
    version: String,
    license: Option<String>,
    #[serde(default)]
    link: bool,
}

fn parse_package_lock(content: &str) -> Result<Vec<CatalogedPackage>> {
    let lockfile: PackageLock =
        serde_json::from_str(content).context("Failed to parse package-lock.json file")?;

    let entries: Vec<(String, NpmPackage)> = if lockfile.packages.is_empty() {
        lockfile.dependencies.into_iter().collect()
    } else {
        lockfile
            .packages
            .into_iter()
            // "" is the root project
            .filter(|(key, p)| !key.is_empty() && !p.link)
            .filter_map(|(key, p)| {
                let name = key.rsplit("node_modules/").next()?.to_string();
                Some((name, p))
            })
            .collect()
    };

    Ok(entries
        .into_iter()
        .map(|(name, p)| {
            let (namespace, short_name) = match name.split_once('/') {
                Some((scope, short)) if scope.starts_with('@') => (Some(scope), short),
                _ => (None, name.as_str()),
            };

            CatalogedPackage {
                identifiers: PackageIdentifiers {
                    purl: build_purl("npm", namespace, short_name, &p.version),
                    cpes: Vec::new(),
                },
                // npm integrity values are base64 SRI strings, not hex digests
                checksum: None,
                licenses: p.license.into_iter().collect(),
                version: p.version,
                name,
            }
        })
        .collect())
}
