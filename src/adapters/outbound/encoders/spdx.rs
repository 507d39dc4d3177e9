use super::{component_uuid, sbom_fingerprint, stable_uuid, write_json};
use crate::sbom_generation::domain::checksum::{
    BLAKE2B_256, BLAKE2B_384, BLAKE2B_512, BLAKE3, MD5, SHA1, SHA256, SHA384, SHA3_256, SHA3_384,
    SHA3_512, SHA512,
};
use crate::sbom_generation::domain::{Checksum, Component, License, Sbom};
use chrono::SecondsFormat;
use serde::Serialize;
use std::io::{self, Write};

const DOCUMENT_ID: &str = "SPDXRef-DOCUMENT";
const NOASSERTION: &str = "NOASSERTION";
const NAMESPACE_BASE: &str = "https://spdx.org/spdxdocs";
const LICENSE_REF_PREFIX: &str = "LicenseRef-";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    #[serde(rename = "SPDXID")]
    spdx_id: &'static str,
    spdx_version: String,
    data_license: &'static str,
    name: String,
    document_namespace: String,
    creation_info: CreationInfo,
    packages: Vec<Package>,
    relationships: Vec<Relationship>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    has_extracted_licensing_infos: Vec<ExtractedLicense>,
}

/// Declaration backing a `LicenseRef-` used for free-text licenses
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExtractedLicense {
    license_id: String,
    extracted_text: String,
    name: String,
}

#[derive(Debug, Serialize)]
struct CreationInfo {
    created: String,
    creators: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Package {
    #[serde(rename = "SPDXID")]
    spdx_id: String,
    name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    version_info: String,
    download_location: String,
    files_analyzed: bool,
    license_concluded: String,
    license_declared: String,
    copyright_text: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    checksums: Vec<PackageChecksum>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    external_refs: Vec<ExternalRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    primary_package_purpose: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    valid_until_date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PackageChecksum {
    algorithm: &'static str,
    checksum_value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExternalRef {
    reference_category: &'static str,
    reference_type: &'static str,
    reference_locator: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Relationship {
    spdx_element_id: &'static str,
    relationship_type: &'static str,
    related_spdx_element: String,
}

/// Schema features that differ between supported SPDX versions
#[derive(Debug, Clone, Copy)]
struct SpecVersion {
    number: &'static str,
    /// 2.3 added SHA3, BLAKE2b and BLAKE3 checksums
    extended_checksums: bool,
    /// 2.3 added `primaryPackagePurpose` and `validUntilDate`
    package_lifecycle: bool,
}

const V2_2: SpecVersion = SpecVersion {
    number: "2.2",
    extended_checksums: false,
    package_lifecycle: false,
};

const V2_3: SpecVersion = SpecVersion {
    number: "2.3",
    extended_checksums: true,
    package_lifecycle: true,
};

/// Encodes SPDX 2.2 JSON
pub fn encode_2_2(sbom: &Sbom, writer: &mut dyn Write) -> io::Result<()> {
    write_json(writer, &build_document(sbom, V2_2))
}

/// Encodes SPDX 2.3 JSON
pub fn encode_2_3(sbom: &Sbom, writer: &mut dyn Write) -> io::Result<()> {
    write_json(writer, &build_document(sbom, V2_3))
}

fn build_document(sbom: &Sbom, spec: SpecVersion) -> Document {
    let metadata = sbom.metadata();
    let packages: Vec<Package> = sbom
        .components()
        .iter()
        .enumerate()
        .map(|(index, c)| build_package(index, c, spec))
        .collect();

    let relationships = packages
        .iter()
        .map(|p| Relationship {
            spdx_element_id: DOCUMENT_ID,
            relationship_type: "DESCRIBES",
            related_spdx_element: p.spdx_id.clone(),
        })
        .collect();

    Document {
        spdx_id: DOCUMENT_ID,
        spdx_version: format!("SPDX-{}", spec.number),
        data_license: "CC0-1.0",
        name: sbom.source_target().to_string(),
        document_namespace: format!(
            "{}/{}-{}",
            NAMESPACE_BASE,
            metadata.tool_name(),
            stable_uuid(&sbom_fingerprint(sbom))
        ),
        creation_info: CreationInfo {
            created: metadata.timestamp().to_string(),
            creators: vec![format!(
                "Tool: {}-{}",
                metadata.tool_name(),
                metadata.tool_version()
            )],
        },
        packages,
        relationships,
        has_extracted_licensing_infos: extracted_licenses(sbom),
    }
}

/// One declaration per distinct free-text license, in first-seen order
fn extracted_licenses(sbom: &Sbom) -> Vec<ExtractedLicense> {
    let mut extracted: Vec<ExtractedLicense> = Vec::new();
    for component in sbom.components() {
        for license in License::classify_all(&component.metadata().licenses) {
            if let License::Name(name) = license {
                let license_id = license_ref(&name);
                if extracted.iter().all(|e| e.license_id != license_id) {
                    extracted.push(ExtractedLicense {
                        license_id,
                        extracted_text: name.clone(),
                        name,
                    });
                }
            }
        }
    }
    extracted
}

fn build_package(index: usize, component: &Component, spec: SpecVersion) -> Package {
    let metadata = component.metadata();
    let license = license_expression(&License::classify_all(&metadata.licenses));

    let mut external_refs = Vec::new();
    if !metadata.cpe.is_empty() {
        external_refs.push(ExternalRef {
            reference_category: "SECURITY",
            reference_type: if metadata.cpe.starts_with("cpe:/") {
                "cpe22Type"
            } else {
                "cpe23Type"
            },
            reference_locator: metadata.cpe.clone(),
        });
    }
    if !metadata.purl.is_empty() {
        external_refs.push(ExternalRef {
            reference_category: "PACKAGE_MANAGER",
            reference_type: "purl",
            reference_locator: metadata.purl.clone(),
        });
    }

    let source_info = metadata
        .source
        .as_ref()
        .filter(|s| !s.uri.is_empty())
        .map(|s| {
            let mut line = format!("built from upstream source {}", s.uri);
            if !s.upstream_version.is_empty() {
                line.push_str(&format!(" (version {})", s.upstream_version));
            }
            line
        });

    Package {
        spdx_id: format!("SPDXRef-Package-{}", component_uuid(index, component)),
        name: component.name().to_string(),
        version_info: component.version().to_string(),
        download_location: if metadata.uri.is_empty() {
            NOASSERTION.to_string()
        } else {
            metadata.uri.clone()
        },
        files_analyzed: false,
        license_concluded: license.clone(),
        license_declared: license,
        copyright_text: NOASSERTION,
        checksums: metadata
            .checksum
            .iter()
            .filter_map(|c| build_checksum(c, spec))
            .collect(),
        external_refs,
        summary: (!metadata.summary.is_empty()).then(|| metadata.summary.clone()),
        source_info,
        primary_package_purpose: spec.package_lifecycle.then_some("LIBRARY"),
        valid_until_date: metadata
            .deprecation_date
            .filter(|_| spec.package_lifecycle)
            .map(|date| date.to_rfc3339_opts(SecondsFormat::Secs, true)),
    }
}

/// Conjunction of every declared license
///
/// Compound expressions are parenthesized when combined so `AND` cannot
/// change their grouping; free text becomes a `LicenseRef-`.
fn license_expression(licenses: &[License]) -> String {
    let term = |license: &License, combined: bool| match license {
        License::Id(id) => id.clone(),
        License::Expression(expression) if combined => parenthesize(expression),
        License::Expression(expression) => expression.clone(),
        License::Name(name) => license_ref(name),
    };

    match licenses {
        [] => NOASSERTION.to_string(),
        [single] => term(single, false),
        several => several
            .iter()
            .map(|l| term(l, true))
            .collect::<Vec<_>>()
            .join(" AND "),
    }
}

/// Wraps `expression` in parentheses unless one pair already encloses it
fn parenthesize(expression: &str) -> String {
    let mut depth = 0usize;
    let mut enclosed = expression.starts_with('(');
    for (position, c) in expression.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 && position + 1 < expression.len() {
                    enclosed = false;
                }
            }
            _ => {}
        }
    }

    if enclosed {
        expression.to_string()
    } else {
        format!("({})", expression)
    }
}

/// `LicenseRef-` id for free text; only letters, digits, `.` and `-` survive
fn license_ref(name: &str) -> String {
    let idstring: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    format!("{}{}", LICENSE_REF_PREFIX, idstring)
}

/// SPDX spelling of a checksum algorithm, if `spec` knows it
fn build_checksum(checksum: &Checksum, spec: SpecVersion) -> Option<PackageChecksum> {
    let algorithm = match checksum.algorithm().as_str() {
        MD5 => "MD5",
        SHA1 => "SHA1",
        SHA256 => "SHA256",
        SHA384 => "SHA384",
        SHA512 => "SHA512",
        _ if !spec.extended_checksums => return None,
        SHA3_256 => "SHA3-256",
        SHA3_384 => "SHA3-384",
        SHA3_512 => "SHA3-512",
        BLAKE2B_256 => "BLAKE2b-256",
        BLAKE2B_384 => "BLAKE2b-384",
        BLAKE2B_512 => "BLAKE2b-512",
        BLAKE3 => "BLAKE3",
        _ => return None,
    };

    Some(PackageChecksum {
        algorithm,
        checksum_value: checksum.hash().to_string(),
    })
}
