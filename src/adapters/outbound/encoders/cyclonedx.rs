use super::{component_uuid, sbom_fingerprint, stable_uuid, write_json};
use crate::sbom_generation::domain::{Checksum, Component as SbomComponent, License, Sbom};
use serde::Serialize;
use std::io::{self, Write};

const TOOL_VENDOR: &str = "sbom-export";
const PROPERTY_PREFIX: &str = "sbom-export";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Bom {
    #[serde(rename = "$schema")]
    schema: String,
    bom_format: &'static str,
    spec_version: String,
    serial_number: String,
    version: u32,
    metadata: Metadata,
    components: Vec<Component>,
}

#[derive(Debug, Serialize)]
struct Metadata {
    timestamp: String,
    tools: Vec<Tool>,
    component: MetadataComponent,
}

#[derive(Debug, Serialize)]
struct Tool {
    vendor: String,
    name: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct MetadataComponent {
    #[serde(rename = "type")]
    component_type: &'static str,
    name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Component {
    #[serde(rename = "bom-ref")]
    bom_ref: String,
    #[serde(rename = "type")]
    component_type: &'static str,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    licenses: Vec<LicenseChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cpe: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    purl: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    hashes: Vec<Hash>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    external_references: Vec<ExternalReference>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    properties: Vec<Property>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum LicenseChoice {
    License { license: LicenseContent },
    Expression { expression: String },
}

/// Exactly one of `id` (SPDX list member) or `name` (free text) is set
#[derive(Debug, Serialize)]
struct LicenseContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
struct Hash {
    alg: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ExternalReference {
    #[serde(rename = "type")]
    reference_type: &'static str,
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    hashes: Vec<Hash>,
}

#[derive(Debug, Serialize)]
struct Property {
    name: String,
    value: String,
}

/// Schema features that differ between supported spec versions
#[derive(Debug, Clone, Copy)]
struct SpecVersion {
    number: &'static str,
    /// `externalReferences[].hashes` exists from 1.4 on
    reference_hashes: bool,
    /// `components[].version` is required before 1.4
    version_required: bool,
}

const V1_3: SpecVersion = SpecVersion {
    number: "1.3",
    reference_hashes: false,
    version_required: true,
};

const V1_4: SpecVersion = SpecVersion {
    number: "1.4",
    reference_hashes: true,
    version_required: false,
};

/// Encodes CycloneDX 1.3 JSON
pub fn encode_1_3(sbom: &Sbom, writer: &mut dyn Write) -> io::Result<()> {
    write_json(writer, &build_bom(sbom, V1_3))
}

/// Encodes CycloneDX 1.4 JSON
pub fn encode_1_4(sbom: &Sbom, writer: &mut dyn Write) -> io::Result<()> {
    write_json(writer, &build_bom(sbom, V1_4))
}

fn build_bom(sbom: &Sbom, spec: SpecVersion) -> Bom {
    let metadata = sbom.metadata();

    Bom {
        schema: format!("http://cyclonedx.org/schema/bom-{}.schema.json", spec.number),
        bom_format: "CycloneDX",
        spec_version: spec.number.to_string(),
        serial_number: format!("urn:uuid:{}", stable_uuid(&sbom_fingerprint(sbom))),
        version: 1,
        metadata: Metadata {
            timestamp: metadata.timestamp().to_string(),
            tools: vec![Tool {
                vendor: TOOL_VENDOR.to_string(),
                name: metadata.tool_name().to_string(),
                version: metadata.tool_version().to_string(),
            }],
            // 1.3 and 1.4 have no "directory" component type
            component: MetadataComponent {
                component_type: "file",
                name: sbom.source_target().to_string(),
            },
        },
        components: sbom
            .components()
            .iter()
            .enumerate()
            .map(|(index, c)| build_component(index, c, spec))
            .collect(),
    }
}

fn build_component(index: usize, component: &SbomComponent, spec: SpecVersion) -> Component {
    let metadata = component.metadata();

    let mut external_references = Vec::new();
    if !metadata.uri.is_empty() {
        external_references.push(ExternalReference {
            reference_type: "distribution",
            url: metadata.uri.clone(),
            comment: None,
            hashes: Vec::new(),
        });
    }
    if let Some(source) = metadata.source.as_ref().filter(|s| !s.uri.is_empty()) {
        let hashes = if spec.reference_hashes {
            source.checksum.iter().map(build_hash).collect()
        } else {
            Vec::new()
        };
        external_references.push(ExternalReference {
            reference_type: "distribution",
            url: source.uri.clone(),
            comment: Some("upstream source".to_string()),
            hashes,
        });
    }

    let mut properties = Vec::new();
    if !metadata.architecture.is_empty() {
        properties.push(Property {
            name: format!("{}:architecture", PROPERTY_PREFIX),
            value: metadata.architecture.clone(),
        });
    }
    if let Some(date) = metadata.deprecation_date {
        properties.push(Property {
            name: format!("{}:deprecation-date", PROPERTY_PREFIX),
            value: date.to_rfc3339(),
        });
    }

    Component {
        bom_ref: component_uuid(index, component).to_string(),
        component_type: "library",
        name: component.name().to_string(),
        version: if spec.version_required {
            Some(component.version().to_string())
        } else {
            non_empty(component.version())
        },
        description: non_empty(&metadata.summary),
        licenses: License::classify_all(&metadata.licenses)
            .into_iter()
            .map(build_license)
            .collect(),
        cpe: non_empty(&metadata.cpe),
        purl: non_empty(&metadata.purl),
        hashes: metadata.checksum.iter().map(build_hash).collect(),
        external_references,
        properties,
    }
}

fn build_license(license: License) -> LicenseChoice {
    match license {
        License::Id(id) => LicenseChoice::License {
            license: LicenseContent {
                id: Some(id),
                name: None,
            },
        },
        License::Expression(expression) => LicenseChoice::Expression { expression },
        License::Name(name) => LicenseChoice::License {
            license: LicenseContent {
                id: None,
                name: Some(name),
            },
        },
    }
}

/// Canonical algorithm names are the CycloneDX `alg` spellings
fn build_hash(checksum: &Checksum) -> Hash {
    Hash {
        alg: checksum.algorithm().as_str(),
        content: checksum.hash().to_string(),
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{go_sbom, metadata, render, GO_CPE, GO_PURL};
    use super::*;
    use crate::sbom_generation::domain::{ComponentMetadata, SourceKind};

    #[test]
    fn test_encode_1_4() {
        let doc = render(encode_1_4, &go_sbom());

        assert_eq!(doc["bomFormat"], "CycloneDX");
        assert_eq!(doc["specVersion"], "1.4");
        assert_eq!(doc["version"], 1);
        assert_eq!(
            doc["$schema"],
            "http://cyclonedx.org/schema/bom-1.4.schema.json"
        );
        assert!(doc["serialNumber"]
            .as_str()
            .unwrap()
            .starts_with("urn:uuid:"));

        assert_eq!(doc["metadata"]["timestamp"], "2024-01-01T00:00:00Z");
        assert_eq!(doc["metadata"]["component"]["type"], "file");
        assert_eq!(doc["metadata"]["component"]["name"], "some-path");
        assert_eq!(doc["metadata"]["tools"][0]["name"], "sbom-export");

        let components = doc["components"].as_array().unwrap();
        assert_eq!(components.len(), 1);
        let go = &components[0];
        assert_eq!(go["type"], "library");
        assert_eq!(go["name"], "Go");
        assert_eq!(go["version"], "1.16.9");
        assert_eq!(
            go["licenses"],
            serde_json::json!([{"license": {"id": "BSD-3-Clause"}}])
        );
        assert_eq!(go["cpe"], GO_CPE);
        assert_eq!(go["purl"], GO_PURL);
        assert_eq!(
            go["hashes"],
            serde_json::json!([{"alg": "SHA-256", "content": "ca9ef23a"}])
        );

        let references = go["externalReferences"].as_array().unwrap();
        assert_eq!(references.len(), 2);
        assert_eq!(references[0]["url"], "https://deps.example.com/go.tgz");
        assert_eq!(
            references[1]["url"],
            "https://dl.google.com/go/go1.16.9.src.tar.gz"
        );
        assert_eq!(references[1]["hashes"][0]["content"], "0a1cc7fd");

        assert_eq!(
            go["properties"][0]["name"],
            "sbom-export:deprecation-date"
        );
    }

    #[test]
    fn test_encode_1_3_omits_reference_hashes() {
        let doc = render(encode_1_3, &go_sbom());

        assert_eq!(doc["specVersion"], "1.3");
        let references = doc["components"][0]["externalReferences"]
            .as_array()
            .unwrap();
        assert!(references.iter().all(|r| r.get("hashes").is_none()));
        // Component-level hashes predate 1.3
        assert!(doc["components"][0]["hashes"].is_array());
    }

    #[test]
    fn test_encode_1_3_always_emits_version() {
        let sbom = Sbom::new(
            vec![SbomComponent::new("tini", ComponentMetadata::default())],
            "some-path",
            SourceKind::Directory,
            metadata(),
        );

        let v1_3 = render(encode_1_3, &sbom);
        assert_eq!(v1_3["components"][0]["version"], "");

        let v1_4 = render(encode_1_4, &sbom);
        assert!(v1_4["components"][0].get("version").is_none());
    }

    #[test]
    fn test_licenses_are_classified() {
        let sbom = Sbom::new(
            vec![SbomComponent::new(
                "dual",
                ComponentMetadata {
                    version: "1.0.0".to_string(),
                    licenses: vec![
                        "(MIT OR Apache-2.0)".to_string(),
                        "BSD-3-Clause".to_string(),
                        "Custom: see LICENSE.txt".to_string(),
                    ],
                    ..Default::default()
                },
            )],
            "package-lock.json",
            SourceKind::File,
            metadata(),
        );
        let doc = render(encode_1_4, &sbom);

        assert_eq!(
            doc["components"][0]["licenses"],
            serde_json::json!([
                {"expression": "(MIT OR Apache-2.0)"},
                {"license": {"id": "BSD-3-Clause"}},
                {"license": {"name": "Custom: see LICENSE.txt"}}
            ])
        );
    }

    #[test]
    fn test_repeated_components_get_distinct_bom_refs() {
        let lodash = || {
            SbomComponent::new(
                "lodash",
                ComponentMetadata {
                    version: "4.17.21".to_string(),
                    purl: "pkg:npm/lodash@4.17.21".to_string(),
                    ..Default::default()
                },
            )
        };
        let sbom = Sbom::new(
            vec![lodash(), lodash()],
            "package-lock.json",
            SourceKind::File,
            metadata(),
        );
        let doc = render(encode_1_4, &sbom);

        let components = doc["components"].as_array().unwrap();
        assert_eq!(components.len(), 2);
        assert_ne!(components[0]["bom-ref"], components[1]["bom-ref"]);
    }

    #[test]
    fn test_encode_file_target_and_sparse_component() {
        let sbom = Sbom::new(
            vec![SbomComponent::new("left-pad", ComponentMetadata::default())],
            "package-lock.json",
            SourceKind::File,
            metadata(),
        );
        let doc = render(encode_1_4, &sbom);

        assert_eq!(doc["metadata"]["component"]["type"], "file");
        let component = &doc["components"][0];
        assert!(component.get("version").is_none());
        assert!(component.get("licenses").is_none());
        assert!(component.get("cpe").is_none());
        assert!(component.get("purl").is_none());
        assert!(component.get("hashes").is_none());
        assert!(component.get("externalReferences").is_none());
    }

    #[test]
    fn test_serial_number_is_stable() {
        let first = render(encode_1_4, &go_sbom());
        let second = render(encode_1_3, &go_sbom());
        assert_eq!(first["serialNumber"], second["serialNumber"]);
    }
}
