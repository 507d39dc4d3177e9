use crate::shared::error::SbomError;
use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Maximum size of a manifest or lockfile that will be read into memory (100 MB)
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Validates that a path is not a symbolic link
///
/// Uses `symlink_metadata()` so the link itself is inspected, not its target.
///
/// # Errors
/// Returns an error if the path is a symbolic link or if metadata cannot be read
pub fn validate_not_symlink(path: &Path, operation: &str) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to read metadata for {} operation on {}: {}",
            operation,
            path.display(),
            e
        )
    })?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} is a symbolic link. {} operations on symbolic links are not allowed.",
            path.display(),
            operation
        );
    }

    Ok(())
}

/// Validates file size is within acceptable limits
///
/// # Errors
/// Returns an error if the file size exceeds the maximum
pub fn validate_file_size(file_size: u64, path: &Path, max_size: u64) -> Result<()> {
    if file_size > max_size {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            path.display(),
            file_size,
            max_size
        );
    }
    Ok(())
}

/// Reads a regular, non-symlinked file of bounded size into a string
///
/// # Arguments
/// * `path` - File to read
/// * `file_description` - Human-readable description used in error messages
///   (e.g. "Cargo.lock", "dependency descriptor")
///
/// # Errors
/// Returns [`SbomError::FileReadError`] if the file is missing, is a symlink,
/// is not a regular file, exceeds [`MAX_FILE_SIZE`] or cannot be decoded.
pub fn read_bounded_to_string(path: &Path, file_description: &str) -> Result<String> {
    let read_error = |details: String| SbomError::FileReadError {
        path: path.to_path_buf(),
        details,
    };

    let metadata = fs::symlink_metadata(path)
        .map_err(|e| read_error(format!("Failed to read {} metadata: {}", file_description, e)))?;

    if metadata.is_symlink() {
        return Err(read_error(format!(
            "Security: {} is a symbolic link. Symbolic links are not allowed.",
            file_description
        ))
        .into());
    }

    if !metadata.is_file() {
        return Err(read_error(format!("{} is not a regular file", file_description)).into());
    }

    validate_file_size(metadata.len(), path, MAX_FILE_SIZE)
        .map_err(|e| read_error(e.to_string()))?;

    fs::read_to_string(path)
        .map_err(|e| read_error(format!("Failed to read {}: {}", file_description, e)).into())
}
