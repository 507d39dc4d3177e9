//! License string classification.
//!
//! Catalogers and descriptors report licenses as free text. Encoders need to
//! know whether a string is a bare SPDX identifier, a compound SPDX
//! expression, or neither; the `spdx` crate decides.

/// A declared license, classified against the SPDX license list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum License {
    /// A single SPDX license identifier in its canonical spelling, e.g. `MIT`
    Id(String),
    /// A valid SPDX expression other than a bare identifier,
    /// e.g. `MIT OR Apache-2.0` or `GPL-2.0-only WITH Classpath-exception-2.0`
    Expression(String),
    /// Free text that is not a valid SPDX expression
    Name(String),
}

impl License {
    /// Classifies a raw license string; blank input yields `None`
    pub fn classify(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        // license_id ignores a trailing '+', which must stay an expression
        if let Some(id) =
            spdx::license_id(trimmed).filter(|id| id.name.eq_ignore_ascii_case(trimmed))
        {
            return Some(License::Id(id.name.to_string()));
        }

        Some(match spdx::Expression::parse(trimmed) {
            Ok(_) => License::Expression(trimmed.to_string()),
            Err(_) => License::Name(trimmed.to_string()),
        })
    }

    /// Classifies every non-blank entry, keeping order
    pub fn classify_all(raw: &[String]) -> Vec<Self> {
        raw.iter().filter_map(|l| Self::classify(l)).collect()
    }
}
