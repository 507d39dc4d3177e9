use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between different
/// types of failures and successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - every requested SBOM format was written
    Success = 0,
    /// Application error (unsupported format, invalid CPE, file I/O error, etc.)
    ApplicationError = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::ApplicationError => write!(f, "Application Error (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
        }
    }
}

/// Application-specific errors for SBOM generation and export.
///
/// Library functions return `anyhow::Result`; callers that need to branch on
/// the failure kind use `err.downcast_ref::<SbomError>()`.
#[derive(Debug, Error)]
pub enum SbomError {
    /// The generation target does not exist. The OS error is kept verbatim.
    #[error("{}: {source}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CPE: {details}")]
    InvalidCpe { cpe: String, details: String },

    #[error("failed to get supported BOM checksum algorithm: {input} is not valid")]
    UnsupportedAlgorithm { input: String },

    #[error("unsupported SBOM format: '{format}'")]
    UnsupportedFormat { format: String },

    #[error("version '{version}' is not supported for SBOM format '{format}'")]
    UnsupportedVersion { format: String, version: String },

    #[error("invalid SBOM format specification '{spec}': {details}")]
    MalformedFormatSpec { spec: String, details: String },

    #[error("failed to encode SBOM as '{format}' (version {version}): {source}")]
    EncodingIo {
        format: String,
        version: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    /// Validation error for builder patterns and descriptors
    #[error("Validation error: {message}")]
    Validation { message: String },
}
