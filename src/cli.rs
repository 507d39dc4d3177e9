use clap::{Parser, Subcommand};
use sbom_export::application::factories::{CYCLONEDX_FORMAT, SPDX_FORMAT, SYFT_FORMAT};
use std::path::PathBuf;

/// Short names accepted in place of the full format identifiers
const FORMAT_ALIASES: [(&str, &str); 3] = [
    ("syft", SYFT_FORMAT),
    ("cyclonedx", CYCLONEDX_FORMAT),
    ("spdx", SPDX_FORMAT),
];

/// Generate SBOMs for directories, files or single dependencies
#[derive(Parser, Debug)]
#[command(name = "sbom-export")]
#[command(version)]
#[command(
    about = "Generate SBOMs for directories, files or single dependencies",
    long_about = "Generate SBOMs for directories, files or single dependencies and export them \
                  as Syft, CycloneDX and SPDX JSON.\n\n\
                  Formats are given as `name[;version=X]`, e.g. \
                  `application/vnd.cyclonedx+json;version=1.3` or `spdx;version=2.2`."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Output format, optionally with `;version=X`; repeat for several outputs
    #[arg(short, long = "format", value_name = "SPEC", global = true)]
    pub formats: Vec<String>,

    /// Directory receiving one file per format (stdout when omitted)
    #[arg(short, long, value_name = "DIR", global = true)]
    pub output_dir: Option<PathBuf>,

    /// File name (without extension) used inside the output directory
    #[arg(long, value_name = "NAME", global = true)]
    pub file_stem: Option<String>,

    /// Path to a config file (defaults to ./sbom-export.config.yml if present)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan a directory or a single lockfile
    Scan {
        /// Directory or file to scan
        path: PathBuf,
    },
    /// Describe one dependency from a TOML descriptor or buildpack manifest
    Dependency {
        /// Dependency table or buildpack.toml with [[metadata.dependencies]]
        descriptor: PathBuf,

        /// Dependency id to select from a manifest
        #[arg(long)]
        id: Option<String>,

        /// Name recorded as the SBOM's source (defaults to the dependency id)
        #[arg(short, long)]
        label: Option<String>,
    },
    /// List supported formats and versions
    Formats,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Replaces a short format alias with its full identifier
///
/// Parameters after the first `;` are kept untouched; anything that is not
/// an alias is returned as given and validated later.
pub fn expand_format_alias(raw: &str) -> String {
    let (name, params) = match raw.split_once(';') {
        Some((name, params)) => (name, Some(params)),
        None => (raw, None),
    };

    let expanded = FORMAT_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(name.trim()))
        .map(|(_, full)| *full);

    match (expanded, params) {
        (Some(full), Some(params)) => format!("{};{}", full, params),
        (Some(full), None) => full.to_string(),
        (None, _) => raw.to_string(),
    }
}
