use super::*;
use crate::application::factories::{CYCLONEDX_FORMAT, SPDX_FORMAT, SYFT_FORMAT};
use crate::ports::outbound::{CatalogedPackage, PackageIdentifiers};
use crate::sbom_generation::domain::DependencyDescriptor;
use crate::shared::error::SbomError;
use std::cell::RefCell;
use tempfile::TempDir;

// Mock implementations for testing
struct MockCataloger {
    packages: Vec<CatalogedPackage>,
}

impl Cataloger for MockCataloger {
    fn scan(&self, _path: &Path) -> Result<Vec<CatalogedPackage>> {
        Ok(self.packages.clone())
    }
}

#[derive(Default)]
struct MockProgressReporter {
    messages: RefCell<Vec<String>>,
}

impl ProgressReporter for MockProgressReporter {
    fn report(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }

    fn report_progress(&self, _current: usize, _total: usize, _message: Option<&str>) {}

    fn report_error(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }

    fn report_completion(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

fn use_case(
    packages: Vec<CatalogedPackage>,
) -> GenerateSbomUseCase<MockCataloger, MockProgressReporter> {
    GenerateSbomUseCase::new(
        MockCataloger { packages },
        MockProgressReporter::default(),
    )
}

fn requests_package() -> CatalogedPackage {
    CatalogedPackage {
        name: "requests".to_string(),
        version: "2.31.0".to_string(),
        licenses: vec!["Apache-2.0".to_string()],
        identifiers: PackageIdentifiers {
            purl: Some("pkg:pypi/requests@2.31.0".to_string()),
            cpes: vec![],
        },
        checksum: None,
    }
}

#[test]
fn test_execute_for_path() {
    let temp_dir = TempDir::new().unwrap();
    let use_case = use_case(vec![requests_package()]);

    let request = SbomRequest::for_path(
        temp_dir.path(),
        vec![SYFT_FORMAT.to_string(), CYCLONEDX_FORMAT.to_string()],
    );
    let response = use_case.execute(request).unwrap();

    assert_eq!(response.component_count, 1);
    assert_eq!(response.formatter.len(), 2);
    assert_eq!(
        response.source_target,
        temp_dir.path().display().to_string()
    );

    let messages = use_case.progress_reporter.messages.borrow();
    assert!(messages.iter().any(|m| m.contains("Scanning")));
    assert!(messages.iter().any(|m| m.contains("1 component(s)")));
}

#[test]
fn test_execute_for_dependency() {
    let use_case = use_case(vec![]);
    let descriptor = DependencyDescriptor {
        name: "Go".to_string(),
        version: "1.16.9".to_string(),
        ..Default::default()
    };

    let request =
        SbomRequest::for_dependency(descriptor, "some-path", vec![SPDX_FORMAT.to_string()]);
    let response = use_case.execute(request).unwrap();

    assert_eq!(response.component_count, 1);
    assert_eq!(response.source_target, "some-path");
    let output = &response.formatter.formats()[0];
    assert_eq!(output.extension(), "spdx.json");

    let content = String::from_utf8(output.to_bytes().unwrap()).unwrap();
    assert!(content.contains("\"name\": \"Go\""));
}

#[test]
fn test_execute_unsupported_format_fails_whole_request() {
    let temp_dir = TempDir::new().unwrap();
    let use_case = use_case(vec![requests_package()]);

    let request = SbomRequest::for_path(
        temp_dir.path(),
        vec![SYFT_FORMAT.to_string(), "unknown-format".to_string()],
    );
    let err = use_case.execute(request).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<SbomError>(),
        Some(SbomError::UnsupportedFormat { .. })
    ));
}

#[test]
fn test_execute_missing_path() {
    let use_case = use_case(vec![]);
    let request = SbomRequest::for_path("/definitely/not/here", vec![SYFT_FORMAT.to_string()]);

    let err = use_case.execute(request).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SbomError>(),
        Some(SbomError::NotFound { .. })
    ));
}

#[test]
fn test_execute_invalid_cpe() {
    let use_case = use_case(vec![]);
    let descriptor = DependencyDescriptor {
        name: "Go".to_string(),
        cpe: "not a valid CPE".to_string(),
        ..Default::default()
    };

    let request =
        SbomRequest::for_dependency(descriptor, "some-path", vec![SYFT_FORMAT.to_string()]);
    let err = use_case.execute(request).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SbomError>(),
        Some(SbomError::InvalidCpe { .. })
    ));
}
