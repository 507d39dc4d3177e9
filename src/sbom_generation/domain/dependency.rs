use super::checksum::{Checksum, ChecksumAlgorithm, SHA256};
use crate::shared::error::SbomError;
use crate::shared::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

/// A single explicitly declared dependency, as listed in a buildpack manifest
///
/// Platform/stack tags are carried through but never interpreted.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case", default)]
pub struct DependencyDescriptor {
    pub id: String,
    pub name: String,
    pub version: String,
    pub licenses: Vec<String>,
    pub cpe: String,
    pub purl: String,
    /// `<algorithm>:<hash>`, e.g. `sha256:ca9ef23a...`
    pub checksum: String,
    /// Legacy SHA-256 digest, used only when `checksum` is empty
    pub sha256: String,
    pub source: String,
    pub source_checksum: String,
    pub source_sha256: String,
    pub stacks: Vec<String>,
    pub uri: String,
    pub deprecation_date: Option<toml::Value>,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    metadata: ManifestMetadata,
}

#[derive(Debug, Deserialize)]
struct ManifestMetadata {
    #[serde(default)]
    dependencies: Vec<DependencyDescriptor>,
}

impl DependencyDescriptor {
    /// Parses a descriptor from TOML
    ///
    /// Accepts either a bare dependency table or a buildpack manifest with
    /// `[[metadata.dependencies]]` entries. For a manifest, `id` selects the
    /// entry; it may be omitted when the manifest lists exactly one.
    ///
    /// # Errors
    /// Returns a validation error for malformed TOML or an ambiguous/missing
    /// manifest entry.
    pub fn from_toml(content: &str, id: Option<&str>) -> Result<Self> {
        let value: toml::Value = toml::from_str(content).map_err(|e| SbomError::Validation {
            message: format!("failed to parse dependency descriptor: {}", e),
        })?;

        let is_manifest = value
            .get("metadata")
            .and_then(|m| m.get("dependencies"))
            .is_some();

        if !is_manifest {
            return value.try_into().map_err(|e: toml::de::Error| {
                SbomError::Validation {
                    message: format!("invalid dependency descriptor: {}", e),
                }
                .into()
            });
        }

        let manifest: Manifest = value.try_into().map_err(|e: toml::de::Error| {
            SbomError::Validation {
                message: format!("invalid buildpack manifest: {}", e),
            }
        })?;
        let mut candidates: Vec<DependencyDescriptor> = manifest
            .metadata
            .dependencies
            .into_iter()
            .filter(|d| id.map_or(true, |id| d.id == id))
            .collect();

        match (candidates.len(), id) {
            (1, _) => Ok(candidates.remove(0)),
            (0, Some(id)) => Err(SbomError::Validation {
                message: format!("no dependency with id '{}' in manifest", id),
            }
            .into()),
            (0, None) => Err(SbomError::Validation {
                message: "manifest lists no dependencies".to_string(),
            }
            .into()),
            (n, _) => Err(SbomError::Validation {
                message: format!(
                    "manifest matches {} dependencies; select one with an id",
                    n
                ),
            }
            .into()),
        }
    }

    /// Primary artifact checksum: `checksum` first, then the legacy `sha256`
    ///
    /// # Errors
    /// Returns [`SbomError::UnsupportedAlgorithm`] for an unknown algorithm prefix.
    pub fn primary_checksum(&self) -> Result<Option<Checksum>> {
        resolve_checksum(&self.checksum, &self.sha256)
    }

    /// Upstream source checksum: `source-checksum` first, then `source-sha256`
    ///
    /// # Errors
    /// Returns [`SbomError::UnsupportedAlgorithm`] for an unknown algorithm prefix.
    pub fn source_checksum(&self) -> Result<Option<Checksum>> {
        resolve_checksum(&self.source_checksum, &self.source_sha256)
    }

    /// Deprecation date given either as a TOML datetime, an RFC 3339 string
    /// or a plain `YYYY-MM-DD` date
    ///
    /// # Errors
    /// Returns a validation error when the value cannot be read as a date.
    pub fn deprecation_date(&self) -> Result<Option<DateTime<Utc>>> {
        let raw = match &self.deprecation_date {
            None => return Ok(None),
            Some(toml::Value::String(s)) if s.is_empty() => return Ok(None),
            Some(toml::Value::String(s)) => s.clone(),
            Some(toml::Value::Datetime(d)) => d.to_string(),
            Some(other) => {
                return Err(SbomError::Validation {
                    message: format!("deprecation-date must be a date, found {}", other),
                }
                .into())
            }
        };

        if let Ok(date_time) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(Some(date_time.with_timezone(&Utc)));
        }

        NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Some(naive.and_utc()))
            .ok_or_else(|| {
                SbomError::Validation {
                    message: format!("deprecation-date '{}' is not a valid date", raw),
                }
                .into()
            })
    }
}

fn resolve_checksum(checksum: &str, legacy_sha256: &str) -> Result<Option<Checksum>> {
    if !checksum.is_empty() {
        return Checksum::parse(checksum).map(Some);
    }
    if !legacy_sha256.is_empty() {
        let algorithm = ChecksumAlgorithm::resolve(SHA256)?;
        return Ok(Some(Checksum::new(algorithm, legacy_sha256)));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
api = "0.7"

[buildpack]
id = "paketo-buildpacks/go-dist"

[[metadata.dependencies]]
id = "go"
name = "Go"
version = "1.16.9"
licenses = ["BSD-3-Clause"]
cpe = "cpe:2.3:a:golang:go:1.16.9:*:*:*:*:*:*:*"
checksum = "sha256:ca9ef23a5db944b116102b87c1ae9344b27e011dae7157d2f1e501abd39e9829"
source = "https://dl.google.com/go/go1.16.9.src.tar.gz"
source-checksum = "sha256:0a1cc7fd7bd20448f71ebed64d846138850d5099b18cf5cc10a4fc45160d8c3d"
stacks = ["io.buildpacks.stacks.bionic"]
uri = "https://deps.example.com/go/go_go1.16.9_linux_x64_bionic_ca9ef23a.tgz"
deprecation-date = 2022-08-16T00:00:00Z

[[metadata.dependencies]]
id = "go"
name = "Go"
version = "1.17.2"

[[metadata.dependencies]]
id = "node"
name = "Node Engine"
version = "16.13.0"
"#;

    #[test]
    fn test_from_toml_bare_table() {
        let descriptor = DependencyDescriptor::from_toml(
            r#"
id = "node"
name = "Node Engine"
version = "16.13.0"
sha256 = "abc123"
"#,
            None,
        )
        .unwrap();

        assert_eq!(descriptor.name, "Node Engine");
        assert_eq!(descriptor.version, "16.13.0");
        let checksum = descriptor.primary_checksum().unwrap().unwrap();
        assert_eq!(checksum.algorithm().as_str(), "SHA-256");
        assert_eq!(checksum.hash(), "abc123");
    }

    #[test]
    fn test_from_toml_manifest_by_id() {
        let descriptor = DependencyDescriptor::from_toml(MANIFEST, Some("node")).unwrap();
        assert_eq!(descriptor.name, "Node Engine");
    }

    #[test]
    fn test_from_toml_manifest_ambiguous() {
        let err = DependencyDescriptor::from_toml(MANIFEST, Some("go")).unwrap_err();
        assert!(err.to_string().contains("matches 2 dependencies"));

        let err = DependencyDescriptor::from_toml(MANIFEST, None).unwrap_err();
        assert!(err.to_string().contains("matches 3 dependencies"));
    }

    #[test]
    fn test_from_toml_manifest_missing_id() {
        let err = DependencyDescriptor::from_toml(MANIFEST, Some("ruby")).unwrap_err();
        assert!(err.to_string().contains("no dependency with id 'ruby'"));
    }

    #[test]
    fn test_from_toml_invalid() {
        let err = DependencyDescriptor::from_toml("name = [[[", None).unwrap_err();
        assert!(err.to_string().contains("failed to parse dependency descriptor"));
    }

    #[test]
    fn test_deprecation_date_formats() {
        let manifest = MANIFEST.replace(
            "[[metadata.dependencies]]\nid = \"go\"\nname = \"Go\"\nversion = \"1.17.2\"\n",
            "",
        );
        let descriptor = DependencyDescriptor::from_toml(&manifest, Some("go")).unwrap();
        let date = descriptor.deprecation_date().unwrap().unwrap();
        assert_eq!(date.to_rfc3339(), "2022-08-16T00:00:00+00:00");

        let plain = DependencyDescriptor {
            deprecation_date: Some(toml::Value::String("2023-01-31".to_string())),
            ..Default::default()
        };
        let date = plain.deprecation_date().unwrap().unwrap();
        assert_eq!(date.format("%Y-%m-%d").to_string(), "2023-01-31");

        let invalid = DependencyDescriptor {
            deprecation_date: Some(toml::Value::String("soon".to_string())),
            ..Default::default()
        };
        assert!(invalid.deprecation_date().is_err());

        assert!(DependencyDescriptor::default()
            .deprecation_date()
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_checksum_prefers_explicit_algorithm() {
        let descriptor = DependencyDescriptor {
            checksum: "sha512:ffff".to_string(),
            sha256: "eeee".to_string(),
            ..Default::default()
        };
        let checksum = descriptor.primary_checksum().unwrap().unwrap();
        assert_eq!(checksum.algorithm().as_str(), "SHA-512");
        assert_eq!(checksum.hash(), "ffff");
    }

    #[test]
    fn test_source_checksum_unsupported_algorithm() {
        let descriptor = DependencyDescriptor {
            source_checksum: "crc32:ffff".to_string(),
            ..Default::default()
        };
        let err = descriptor.source_checksum().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SbomError>(),
            Some(SbomError::UnsupportedAlgorithm { .. })
        ));
    }

    #[test]
    fn test_no_checksum() {
        let descriptor = DependencyDescriptor::default();
        assert!(descriptor.primary_checksum().unwrap().is_none());
        assert!(descriptor.source_checksum().unwrap().is_none());
    }
}
