use crate::adapters::outbound::filesystem::{FileSystemWriter, StdoutPresenter};
use crate::ports::outbound::OutputPresenter;
use std::path::PathBuf;

/// Presenter type enumeration for factory pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterType {
    Stdout,
    /// One file per output, named `<file_stem>.<extension>` inside `dir`
    Directory { dir: PathBuf, file_stem: String },
}

/// Factory for creating output presenters
///
/// This factory encapsulates the creation logic for different presenter implementations,
/// following the Factory Pattern. It belongs in the application layer as it orchestrates
/// the selection of infrastructure adapters based on application needs.
pub struct PresenterFactory;

impl PresenterFactory {
    /// Creates a presenter instance for the specified type
    ///
    /// # Examples
    /// ```
    /// use sbom_export::application::factories::{PresenterFactory, PresenterType};
    ///
    /// let presenter = PresenterFactory::create(PresenterType::Stdout);
    /// ```
    pub fn create(presenter_type: PresenterType) -> Box<dyn OutputPresenter> {
        match presenter_type {
            PresenterType::Stdout => Box::new(StdoutPresenter::new()),
            PresenterType::Directory { dir, file_stem } => {
                Box::new(FileSystemWriter::new(dir, file_stem))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbom_generation::domain::DependencyDescriptor;
    use crate::sbom_generation::services::SbomGenerator;
    use tempfile::TempDir;

    #[test]
    fn test_create_directory_presenter_writes_named_file() {
        let temp_dir = TempDir::new().unwrap();
        let presenter = PresenterFactory::create(PresenterType::Directory {
            dir: temp_dir.path().to_path_buf(),
            file_stem: "go".to_string(),
        });

        let dependency = DependencyDescriptor {
            name: "Go".to_string(),
            ..Default::default()
        };
        let formatter = SbomGenerator::generate_from_dependency(&dependency, "go")
            .unwrap()
            .in_formats(["application/vnd.syft+json"])
            .unwrap();

        presenter.present(&formatter.formats()[0]).unwrap();
        assert!(temp_dir.path().join("go.syft.json").exists());
    }

    #[test]
    fn test_presenter_type_equality() {
        assert_eq!(PresenterType::Stdout, PresenterType::Stdout);

        let first = PresenterType::Directory {
            dir: PathBuf::from("/tmp"),
            file_stem: "a".to_string(),
        };
        let second = PresenterType::Directory {
            dir: PathBuf::from("/tmp"),
            file_stem: "b".to_string(),
        };
        assert_ne!(first, second);
        assert_eq!(first.clone(), first);
    }
}
