mod cli;
mod config;

use cli::{expand_format_alias, Args, Command};
use config::{discover_config, load_config_from_path, ConfigFile};
use sbom_export::adapters::outbound::catalogers::LockfileCataloger;
use sbom_export::adapters::outbound::console::StderrProgressReporter;
use sbom_export::application::dto::{SbomRequest, SbomTarget};
use sbom_export::application::factories::{
    FormatRegistry, PresenterFactory, PresenterType, CYCLONEDX_FORMAT, SPDX_FORMAT, SYFT_FORMAT,
};
use sbom_export::application::use_cases::GenerateSbomUseCase;
use sbom_export::ports::outbound::ProgressReporter;
use sbom_export::sbom_generation::domain::DependencyDescriptor;
use sbom_export::shared::error::{ExitCode, SbomError};
use sbom_export::shared::security::read_bounded_to_string;
use sbom_export::shared::Result;
use std::path::Path;
use std::process;

/// File name used for path scans when no stem is given
const DEFAULT_FILE_STEM: &str = "sbom";

fn main() {
    if let Err(e) = run() {
        eprintln!("\n❌ An error occurred:\n");
        eprintln!("{}", e);

        // Display error chain
        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("\nCaused by: {}", err);
            source = err.source();
        }

        eprintln!();
        process::exit(ExitCode::ApplicationError.as_i32());
    }
}

fn run() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    let (target, default_stem) = match args.command {
        Command::Formats => {
            print_supported_formats();
            return Ok(());
        }
        Command::Scan { ref path } => (
            SbomTarget::Path(path.clone()),
            DEFAULT_FILE_STEM.to_string(),
        ),
        Command::Dependency {
            ref descriptor,
            ref id,
            ref label,
        } => {
            let content = read_bounded_to_string(descriptor, "dependency descriptor")?;
            let dependency = DependencyDescriptor::from_toml(&content, id.as_deref())?;
            let label = label.clone().unwrap_or_else(|| default_label(&dependency));
            let stem = file_stem_for(&label);
            (
                SbomTarget::Dependency {
                    descriptor: dependency,
                    label,
                },
                stem,
            )
        }
    };

    let config = match &args.config {
        Some(path) => load_config_from_path(path)?,
        None => discover_config(Path::new("."))?.unwrap_or_default(),
    };

    // CLI values take precedence over the config file
    let output_dir = args.output_dir.clone().or_else(|| config.output_dir.clone());
    let formats = resolve_format_list(&args, &config, output_dir.is_some())?;
    let request = SbomRequest::new(target, formats);

    // Create adapters (Dependency Injection)
    let use_case = GenerateSbomUseCase::new(LockfileCataloger::new(), StderrProgressReporter::new());
    let response = use_case.execute(request)?;

    if output_dir.is_some() {
        if let Some(extension) = response.formatter.repeated_extension() {
            return Err(SbomError::Validation {
                message: format!(
                    "'{}' would be written more than once; \
                     request one version per format when writing to a directory",
                    extension
                ),
            }
            .into());
        }
    }

    let presenter_type = match output_dir {
        Some(dir) => PresenterType::Directory {
            dir,
            file_stem: args.file_stem.unwrap_or(default_stem),
        },
        None => PresenterType::Stdout,
    };
    let presenter = PresenterFactory::create(presenter_type);

    // Each output succeeds or fails on its own
    let reporter = StderrProgressReporter::new();
    let total = response.formatter.len();
    let mut failures = 0;
    for (index, output) in response.formatter.formats().iter().enumerate() {
        reporter.report_progress(index, total, Some(output.format()));
        match presenter.present(output) {
            Ok(destination) => reporter.report(&format!(
                "📝 {} {} → {}",
                output.format(),
                output.version(),
                destination
            )),
            Err(e) => {
                failures += 1;
                reporter.report_error(&format!(
                    "⚠️  Warning: Failed to write {} {}: {}",
                    output.format(),
                    output.version(),
                    e
                ));
            }
        }
    }

    if failures > 0 {
        return Err(SbomError::Validation {
            message: format!("{} of {} output(s) could not be written", failures, total),
        }
        .into());
    }

    reporter.report_completion(&format!(
        "✅ Wrote {} SBOM output(s) for {} component(s) from {}",
        total, response.component_count, response.source_target
    ));
    Ok(())
}

/// Format specs from the CLI, else the config file, else the defaults
///
/// Without an output directory only one document can be written, so the
/// default is CycloneDX alone; with a directory every format is written.
fn resolve_format_list(args: &Args, config: &ConfigFile, has_output_dir: bool) -> Result<Vec<String>> {
    let requested: Vec<String> = if !args.formats.is_empty() {
        args.formats.clone()
    } else if let Some(formats) = config.formats.as_ref().filter(|f| !f.is_empty()) {
        formats.clone()
    } else if has_output_dir {
        vec![
            SYFT_FORMAT.to_string(),
            CYCLONEDX_FORMAT.to_string(),
            SPDX_FORMAT.to_string(),
        ]
    } else {
        vec![CYCLONEDX_FORMAT.to_string()]
    };

    if !has_output_dir && requested.len() > 1 {
        return Err(SbomError::Validation {
            message: format!(
                "{} formats were requested but only one can be written to stdout; \
                 use --output-dir to write one file per format",
                requested.len()
            ),
        }
        .into());
    }

    Ok(requested.iter().map(|f| expand_format_alias(f)).collect())
}

fn print_supported_formats() {
    for format in FormatRegistry::formats() {
        println!("{} (versions: {})", format, FormatRegistry::versions(format).join(", "));
    }
}

fn default_label(dependency: &DependencyDescriptor) -> String {
    if dependency.id.is_empty() {
        dependency.name.clone()
    } else {
        dependency.id.clone()
    }
}

/// Turns a label into a safe file name component
fn file_stem_for(label: &str) -> String {
    let stem: String = label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let stem = stem.trim_matches('.');
    if stem.is_empty() {
        DEFAULT_FILE_STEM.to_string()
    } else {
        stem.to_string()
    }
}
