use crate::adapters::outbound::encoders::{cyclonedx, spdx, syft, EncodeFn};
use crate::application::dto::FormatSpec;
use crate::shared::error::SbomError;
use crate::shared::Result;
use semver::Version;
use std::fmt;

/// Generic catalog format (Syft JSON)
pub const SYFT_FORMAT: &str = "application/vnd.syft+json";
/// Component exchange format (CycloneDX JSON)
pub const CYCLONEDX_FORMAT: &str = "application/vnd.cyclonedx+json";
/// Package exchange format (SPDX JSON)
pub const SPDX_FORMAT: &str = "application/spdx+json";

/// One registered (format, version) pair
///
/// The extension depends on the format only, never on the version.
#[derive(Clone, Copy)]
pub struct Encoder {
    pub format: &'static str,
    pub version: &'static str,
    pub extension: &'static str,
    pub encode: EncodeFn,
}

impl fmt::Debug for Encoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encoder")
            .field("format", &self.format)
            .field("version", &self.version)
            .field("extension", &self.extension)
            .finish_non_exhaustive()
    }
}

const ENCODERS: &[Encoder] = &[
    Encoder {
        format: SYFT_FORMAT,
        version: "2.0.2",
        extension: "syft.json",
        encode: syft::encode_2_0_2,
    },
    Encoder {
        format: SYFT_FORMAT,
        version: "3.0.1",
        extension: "syft.json",
        encode: syft::encode_3_0_1,
    },
    Encoder {
        format: CYCLONEDX_FORMAT,
        version: "1.3",
        extension: "cdx.json",
        encode: cyclonedx::encode_1_3,
    },
    Encoder {
        format: CYCLONEDX_FORMAT,
        version: "1.4",
        extension: "cdx.json",
        encode: cyclonedx::encode_1_4,
    },
    Encoder {
        format: SPDX_FORMAT,
        version: "2.2",
        extension: "spdx.json",
        encode: spdx::encode_2_2,
    },
    Encoder {
        format: SPDX_FORMAT,
        version: "2.3",
        extension: "spdx.json",
        encode: spdx::encode_2_3,
    },
];

/// Registry of every supported (format, version) encoder
///
/// This factory selects an encoder adapter for a parsed format request,
/// the same way the presenter factory selects an output adapter.
pub struct FormatRegistry;

impl FormatRegistry {
    /// Resolves a format request to exactly one encoder
    ///
    /// An explicit version must equal a registered version string. Without
    /// one, the greatest registered version by semantic-version order wins.
    ///
    /// # Errors
    /// - [`SbomError::UnsupportedFormat`] if the name is not registered
    /// - [`SbomError::UnsupportedVersion`] if the explicit version is not
    pub fn resolve(spec: &FormatSpec) -> Result<Encoder> {
        let candidates: Vec<&Encoder> = ENCODERS
            .iter()
            .filter(|e| e.format == spec.name())
            .collect();

        if candidates.is_empty() {
            return Err(SbomError::UnsupportedFormat {
                format: spec.name().to_string(),
            }
            .into());
        }

        let selected = match spec.version() {
            Some(version) => candidates
                .into_iter()
                .find(|e| e.version == version)
                .ok_or_else(|| SbomError::UnsupportedVersion {
                    format: spec.name().to_string(),
                    version: version.to_string(),
                })?,
            None => candidates
                .into_iter()
                .max_by_key(|e| padded_version(e.version))
                .ok_or_else(|| SbomError::UnsupportedFormat {
                    format: spec.name().to_string(),
                })?,
        };

        Ok(*selected)
    }

    /// Registered format names, in registration order
    pub fn formats() -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Vec::new();
        for encoder in ENCODERS {
            if !names.contains(&encoder.format) {
                names.push(encoder.format);
            }
        }
        names
    }

    /// Registered versions of `format`, in registration order
    pub fn versions(format: &str) -> Vec<&'static str> {
        ENCODERS
            .iter()
            .filter(|e| e.format == format)
            .map(|e| e.version)
            .collect()
    }
}

/// Parses `1.3` as `1.3.0` so short versions order correctly
fn padded_version(raw: &str) -> Option<Version> {
    let mut parts: Vec<&str> = raw.split('.').collect();
    while parts.len() < 3 {
        parts.push("0");
    }
    Version::parse(&parts.join(".")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(raw: &str) -> Result<Encoder> {
        FormatRegistry::resolve(&FormatSpec::parse(raw)?)
    }

    #[test]
    fn test_resolve_latest_versions() {
        let syft = resolve(SYFT_FORMAT).unwrap();
        assert_eq!(syft.version, "3.0.1");
        assert_eq!(syft.extension, "syft.json");

        let cyclonedx = resolve(CYCLONEDX_FORMAT).unwrap();
        assert_eq!(cyclonedx.version, "1.4");
        assert_eq!(cyclonedx.extension, "cdx.json");

        let spdx = resolve(SPDX_FORMAT).unwrap();
        assert_eq!(spdx.version, "2.3");
        assert_eq!(spdx.extension, "spdx.json");
    }

    #[test]
    fn test_resolve_explicit_version() {
        let encoder = resolve("application/vnd.syft+json;version=2.0.2").unwrap();
        assert_eq!(encoder.format, SYFT_FORMAT);
        assert_eq!(encoder.version, "2.0.2");

        let encoder = resolve("application/vnd.cyclonedx+json;version=1.3").unwrap();
        assert_eq!(encoder.version, "1.3");
    }

    #[test]
    fn test_resolve_requires_exact_version_match() {
        // 1.3.0 is semantically equal to 1.3 but not registered as such
        let err = resolve("application/vnd.cyclonedx+json;version=1.3.0").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SbomError>(),
            Some(SbomError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn test_resolve_unsupported_format() {
        let err = resolve("unknown-format").unwrap_err();
        match err.downcast_ref::<SbomError>() {
            Some(SbomError::UnsupportedFormat { format }) => assert_eq!(format, "unknown-format"),
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }
        assert_eq!(err.to_string(), "unsupported SBOM format: 'unknown-format'");
    }

    #[test]
    fn test_resolve_unsupported_version() {
        let err = resolve("application/vnd.syft+json;version=0.0.0").unwrap_err();
        match err.downcast_ref::<SbomError>() {
            Some(SbomError::UnsupportedVersion { format, version }) => {
                assert_eq!(format, SYFT_FORMAT);
                assert_eq!(version, "0.0.0");
            }
            other => panic!("expected UnsupportedVersion, got {:?}", other),
        }
    }

    #[test]
    fn test_extension_is_fixed_per_format() {
        for format in FormatRegistry::formats() {
            let extensions: Vec<&str> = ENCODERS
                .iter()
                .filter(|e| e.format == format)
                .map(|e| e.extension)
                .collect();
            assert!(extensions.windows(2).all(|w| w[0] == w[1]), "{}", format);
        }
    }

    #[test]
    fn test_formats_and_versions() {
        assert_eq!(
            FormatRegistry::formats(),
            vec![SYFT_FORMAT, CYCLONEDX_FORMAT, SPDX_FORMAT]
        );
        assert_eq!(FormatRegistry::versions(SPDX_FORMAT), vec!["2.2", "2.3"]);
        assert!(FormatRegistry::versions("unknown").is_empty());
    }

    #[test]
    fn test_padded_version() {
        assert_eq!(padded_version("1.3"), Some(Version::new(1, 3, 0)));
        assert_eq!(padded_version("3.0.1"), Some(Version::new(3, 0, 1)));
        assert!(padded_version("1.10") > padded_version("1.9"));
        assert_eq!(padded_version("abc"), None);
    }
}
