use crate::shared::error::SbomError;
use crate::shared::Result;
use std::fmt;
use std::str::FromStr;

const VERSION_KEY: &str = "version";

/// A parsed format request: `name[;version=X]`
///
/// Parsing is purely syntactic. Whether the name and version are registered
/// is decided later by the format registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    name: String,
    version: Option<String>,
}

impl FormatSpec {
    pub fn new(name: impl Into<String>, version: Option<String>) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    /// Parses `name(;key=value)*`
    ///
    /// Whitespace around the name and each parameter is ignored.
    ///
    /// # Errors
    /// Returns [`SbomError::MalformedFormatSpec`] for an empty name, an empty
    /// or `=`-less parameter, an empty value, an unknown key or a repeated
    /// `version`.
    pub fn parse(raw: &str) -> Result<Self> {
        let malformed = |details: &str| SbomError::MalformedFormatSpec {
            spec: raw.to_string(),
            details: details.to_string(),
        };

        let mut parts = raw.split(';');
        let name = parts.next().unwrap_or_default().trim();
        if name.is_empty() {
            return Err(malformed("format name is empty").into());
        }

        let mut version = None;
        for param in parts {
            let param = param.trim();
            if param.is_empty() {
                return Err(malformed("empty parameter").into());
            }

            let (key, value) = param
                .split_once('=')
                .ok_or_else(|| malformed(&format!("parameter '{}' is missing '='", param)))?;
            let (key, value) = (key.trim(), value.trim());

            if key != VERSION_KEY {
                return Err(malformed(&format!("unknown parameter '{}'", key)).into());
            }
            if value.is_empty() {
                return Err(malformed("version value is empty").into());
            }
            if version.replace(value.to_string()).is_some() {
                return Err(malformed("version given more than once").into());
            }
        }

        Ok(Self::new(name, version))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

impl FromStr for FormatSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for FormatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{};{}={}", self.name, VERSION_KEY, version),
            None => f.write_str(&self.name),
        }
    }
}
