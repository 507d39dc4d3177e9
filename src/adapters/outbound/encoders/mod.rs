/// Encoder adapters, one module per external SBOM format family
///
/// Every public `encode_*` function has the [`EncodeFn`] shape and renders
/// exactly one schema version.
pub mod cyclonedx;
pub mod spdx;
pub mod syft;

use crate::sbom_generation::domain::{Component, Sbom};
use serde::Serialize;
use std::io::{self, Write};
use uuid::Uuid;

/// Pure function from the SBOM model to one encoded document
pub type EncodeFn = fn(&Sbom, &mut dyn Write) -> io::Result<()>;

/// Writes `document` as pretty-printed JSON followed by a newline
fn write_json<T: Serialize>(writer: &mut dyn Write, document: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, document)?;
    writer.write_all(b"\n")
}

/// UUIDv5 in the URL namespace; identical input yields identical ids
fn stable_uuid(input: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, input.as_bytes())
}

/// Identifier of the `index`-th component, unique within one document
///
/// Catalogers may report the same `name@version` more than once (nested
/// npm copies, several lockfiles), so the position is part of the input.
fn component_uuid(index: usize, component: &Component) -> Uuid {
    stable_uuid(&format!("{}#{}", component.coordinate(), index))
}

/// Stable digest of an SBOM's identity: label, timestamp and components
fn sbom_fingerprint(sbom: &Sbom) -> String {
    let mut fingerprint = format!("{}|{}", sbom.source_target(), sbom.metadata().timestamp());
    for component in sbom.components() {
        fingerprint.push('|');
        fingerprint.push_str(&component.coordinate());
    }
    fingerprint
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::sbom_generation::domain::{
        Checksum, ChecksumAlgorithm, Component, ComponentMetadata, Sbom, SbomMetadata,
        SourceInfo, SourceKind,
    };
    use chrono::{TimeZone, Utc};

    pub const GO_CPE: &str = "cpe:2.3:a:golang:go:1.16.9:*:*:*:*:*:*:*";
    pub const GO_PURL: &str = "pkg:generic/go@go1.16.9?checksum=0a1cc7fd7bd20448f71ebed64d846138850d5099b18cf5cc10a4fc45160d8c3d&download_url=https://dl.google.com/go/go1.16.9.src.tar.gz";

    pub fn metadata() -> SbomMetadata {
        SbomMetadata::new(
            "2024-01-01T00:00:00Z".to_string(),
            "sbom-export".to_string(),
            "0.1.0".to_string(),
        )
    }

    pub fn go_sbom() -> Sbom {
        let checksum = |alg: &str, hash: &str| {
            Checksum::new(ChecksumAlgorithm::resolve(alg).unwrap(), hash)
        };

        let component = Component::new(
            "Go",
            ComponentMetadata {
                version: "1.16.9".to_string(),
                licenses: vec!["BSD-3-Clause".to_string()],
                cpe: GO_CPE.to_string(),
                purl: GO_PURL.to_string(),
                checksum: Some(checksum("sha256", "ca9ef23a")),
                uri: "https://deps.example.com/go.tgz".to_string(),
                deprecation_date: Some(Utc.with_ymd_and_hms(2022, 8, 16, 0, 0, 0).unwrap()),
                source: Some(SourceInfo {
                    name: "go1.16.9.src.tar.gz".to_string(),
                    checksum: Some(checksum("sha256", "0a1cc7fd")),
                    upstream_version: "1.16.9".to_string(),
                    uri: "https://dl.google.com/go/go1.16.9.src.tar.gz".to_string(),
                }),
                ..Default::default()
            },
        );

        Sbom::new(vec![component], "some-path", SourceKind::Directory, metadata())
    }

    pub fn render(encode: super::EncodeFn, sbom: &Sbom) -> serde_json::Value {
        let mut buffer = Vec::new();
        encode(sbom, &mut buffer).unwrap();
        serde_json::from_slice(&buffer).unwrap()
    }
}
