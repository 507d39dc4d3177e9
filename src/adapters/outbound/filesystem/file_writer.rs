use crate::application::formatter::ResolvedFormat;
use crate::ports::outbound::OutputPresenter;
use crate::shared::error::SbomError;
use crate::shared::Result;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// FileSystemWriter adapter for writing each output to its own file
///
/// This adapter implements the OutputPresenter port. Every output lands in
/// `<output_dir>/<file_stem>.<extension>`, so siblings of different formats
/// never overwrite each other.
pub struct FileSystemWriter {
    output_dir: PathBuf,
    file_stem: String,
}

impl FileSystemWriter {
    pub fn new(output_dir: PathBuf, file_stem: impl Into<String>) -> Self {
        Self {
            output_dir,
            file_stem: file_stem.into(),
        }
    }

    /// Destination of an output with the given extension
    pub fn path_for(&self, extension: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", self.file_stem, extension))
    }

    /// Validates that the output directory exists
    fn validate_output_directory(&self, path: &Path) -> Result<()> {
        if !self.output_dir.is_dir() {
            return Err(SbomError::FileWriteError {
                path: path.to_path_buf(),
                details: format!(
                    "Output directory does not exist: {}",
                    self.output_dir.display()
                ),
            }
            .into());
        }
        Ok(())
    }

    /// Rejects an existing output path that is a symbolic link
    fn validate_output_security(&self, path: &Path) -> Result<()> {
        match fs::symlink_metadata(path) {
            Ok(metadata) if metadata.is_symlink() => Err(SbomError::FileWriteError {
                path: path.to_path_buf(),
                details: "Security: Output path is a symbolic link. For security reasons, writing to symbolic links is not allowed.".to_string(),
            }
            .into()),
            _ => Ok(()),
        }
    }
}

impl OutputPresenter for FileSystemWriter {
    fn present(&self, output: &ResolvedFormat) -> Result<String> {
        let path = self.path_for(output.extension());

        // Security validations
        self.validate_output_directory(&path)?;
        self.validate_output_security(&path)?;

        let write_error = |e: io::Error| SbomError::FileWriteError {
            path: path.clone(),
            details: e.to_string(),
        };

        let file = File::create(&path).map_err(write_error)?;
        let mut writer = BufWriter::new(file);

        let written = output
            .write_to(&mut writer)
            .and_then(|()| writer.flush().map_err(|e| write_error(e).into()));
        if let Err(e) = written {
            // Leave no truncated document behind
            let _ = fs::remove_file(&path);
            return Err(e);
        }

        Ok(path.display().to_string())
    }
}

/// StdoutPresenter adapter for writing outputs to stdout
///
/// This adapter implements the OutputPresenter port for stdout output.
/// Multiple outputs are written back to back.
pub struct StdoutPresenter;

impl StdoutPresenter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdoutPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputPresenter for StdoutPresenter {
    fn present(&self, output: &ResolvedFormat) -> Result<String> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        output.write_to(&mut handle)?;
        handle
            .flush()
            .map_err(|e| anyhow::anyhow!("Failed to write to stdout: {}", e))?;
        Ok("stdout".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::factories::{CYCLONEDX_FORMAT, SPDX_FORMAT};
    use crate::sbom_generation::domain::DependencyDescriptor;
    use crate::sbom_generation::services::SbomGenerator;
    use tempfile::TempDir;

    fn outputs(formats: &[&str]) -> Vec<ResolvedFormat> {
        let dependency = DependencyDescriptor {
            name: "Go".to_string(),
            version: "1.16.9".to_string(),
            ..Default::default()
        };
        SbomGenerator::generate_from_dependency(&dependency, "go")
            .unwrap()
            .in_formats(formats)
            .unwrap()
            .into_formats()
    }

    #[test]
    fn test_file_writer_success() {
        let temp_dir = TempDir::new().unwrap();
        let writer = FileSystemWriter::new(temp_dir.path().to_path_buf(), "sbom");

        for output in outputs(&[SPDX_FORMAT, CYCLONEDX_FORMAT]) {
            let destination = writer.present(&output).unwrap();
            assert!(destination.ends_with(output.extension()));
        }

        let spdx = fs::read_to_string(temp_dir.path().join("sbom.spdx.json")).unwrap();
        assert!(spdx.contains("SPDX-2.3"));
        let cdx = fs::read_to_string(temp_dir.path().join("sbom.cdx.json")).unwrap();
        assert!(cdx.contains("CycloneDX"));
    }

    #[test]
    fn test_file_writer_output_directory_not_found() {
        let writer = FileSystemWriter::new(PathBuf::from("/nonexistent/directory"), "sbom");
        let output = outputs(&[SPDX_FORMAT]).remove(0);

        let err = writer.present(&output).unwrap_err();
        assert!(err.to_string().contains("Output directory does not exist"));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_writer_rejects_symlink() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("elsewhere.json");
        fs::write(&target, "").unwrap();
        std::os::unix::fs::symlink(&target, temp_dir.path().join("sbom.spdx.json")).unwrap();

        let writer = FileSystemWriter::new(temp_dir.path().to_path_buf(), "sbom");
        let err = writer.present(&outputs(&[SPDX_FORMAT]).remove(0)).unwrap_err();
        assert!(err.to_string().contains("symbolic link"));
        assert_eq!(fs::read_to_string(&target).unwrap(), "");
    }

    #[test]
    fn test_path_for() {
        let writer = FileSystemWriter::new(PathBuf::from("out"), "go");
        assert_eq!(writer.path_for("syft.json"), PathBuf::from("out/go.syft.json"));
    }

    #[test]
    fn test_stdout_presenter_success() {
        let presenter = StdoutPresenter::new();
        let destination = presenter.present(&outputs(&[SPDX_FORMAT]).remove(0)).unwrap();
        assert_eq!(destination, "stdout");
    }
}
