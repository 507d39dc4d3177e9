use super::{component_uuid, stable_uuid, write_json};
use crate::sbom_generation::domain::{Component, Sbom};
use packageurl::PackageUrl;
use serde::Serialize;
use std::io::{self, Write};
use std::str::FromStr;

const SCHEMA_URL_BASE: &str = "https://raw.githubusercontent.com/anchore/syft/main/schema/json";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    artifacts: Vec<Artifact>,
    artifact_relationships: Vec<Relationship>,
    source: Source,
    distro: Distro,
    descriptor: Descriptor,
    schema: Schema,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Artifact {
    id: String,
    name: String,
    version: String,
    #[serde(rename = "type")]
    package_type: &'static str,
    found_by: String,
    locations: Vec<Location>,
    licenses: Vec<String>,
    language: &'static str,
    cpes: Vec<String>,
    purl: String,
}

#[derive(Debug, Serialize)]
struct Location {
    path: String,
}

#[derive(Debug, Serialize)]
struct Relationship {
    parent: String,
    child: String,
    #[serde(rename = "type")]
    relationship_type: String,
}

#[derive(Debug, Serialize)]
struct Source {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(rename = "type")]
    source_type: &'static str,
    target: String,
}

#[derive(Debug, Default, Serialize)]
struct Distro {}

#[derive(Debug, Serialize)]
struct Descriptor {
    name: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct Schema {
    version: String,
    url: String,
}

/// Schema layout families; 3.x added a source identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    V2,
    V3,
}

/// Encodes the 2.0.2 schema
pub fn encode_2_0_2(sbom: &Sbom, writer: &mut dyn Write) -> io::Result<()> {
    write_json(writer, &build_document(sbom, "2.0.2", Layout::V2))
}

/// Encodes the 3.0.1 schema
pub fn encode_3_0_1(sbom: &Sbom, writer: &mut dyn Write) -> io::Result<()> {
    write_json(writer, &build_document(sbom, "3.0.1", Layout::V3))
}

fn build_document(sbom: &Sbom, schema_version: &str, layout: Layout) -> Document {
    let metadata = sbom.metadata();

    Document {
        artifacts: sbom
            .components()
            .iter()
            .enumerate()
            .map(|(index, c)| build_artifact(index, c, metadata.tool_name()))
            .collect(),
        artifact_relationships: Vec::new(),
        source: Source {
            id: (layout == Layout::V3)
                .then(|| stable_uuid(sbom.source_target()).to_string()),
            source_type: sbom.source_kind().as_str(),
            target: sbom.source_target().to_string(),
        },
        distro: Distro::default(),
        descriptor: Descriptor {
            name: metadata.tool_name().to_string(),
            version: metadata.tool_version().to_string(),
        },
        schema: Schema {
            version: schema_version.to_string(),
            url: format!("{}/schema-{}.json", SCHEMA_URL_BASE, schema_version),
        },
    }
}

fn build_artifact(index: usize, component: &Component, found_by: &str) -> Artifact {
    let metadata = component.metadata();
    let (package_type, language) = classify(&metadata.purl);

    Artifact {
        id: component_uuid(index, component).to_string(),
        name: component.name().to_string(),
        version: component.version().to_string(),
        package_type,
        found_by: found_by.to_string(),
        locations: Vec::new(),
        licenses: metadata.licenses.clone(),
        language,
        cpes: if metadata.cpe.is_empty() {
            Vec::new()
        } else {
            vec![metadata.cpe.clone()]
        },
        purl: metadata.purl.clone(),
    }
}

/// Package type and language for a PURL; unparseable PURLs are unknown
fn classify(purl: &str) -> (&'static str, &'static str) {
    let ty = PackageUrl::from_str(purl)
        .map(|p| p.ty().to_ascii_lowercase())
        .unwrap_or_default();

    match ty.as_str() {
        "pypi" => ("python", "python"),
        "npm" => ("npm", "javascript"),
        "cargo" => ("rust-crate", "rust"),
        "golang" => ("go-module", "go"),
        _ => ("UnknownPackage", ""),
    }
}
