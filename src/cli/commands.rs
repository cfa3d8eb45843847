//! CLI command implementations
//!
//! Each command loads a symbol model, wires the host pieces together and returns a `CliResult<ExitCode>`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{CliError, CliResult, ExitCode};
use crate::backend::artifact::GeneratedArtifact;
use crate::config::{self, FieldNamePolicy, ProcessorConfig};
use crate::frontend::metadata;
use crate::frontend::symbols::{Elements, SymbolTable};
use crate::host::filer::{FsFiler, MemoryFiler};
use crate::host::messager::{CollectingMessager, ConsoleMessager};
use crate::host::round::RoundDriver;
use crate::processor::generator::GetterFieldProcessor;
use crate::processor::observer::DebugProcessor;

/// Merge `-A` options with explicit flags. Flags win over options.
pub fn resolve_config(
    output_dir: Option<PathBuf>,
    marker: Option<String>,
    observe: bool,
    field_names: Option<FieldNamePolicy>,
    raw_options: &[String],
) -> CliResult<ProcessorConfig> {
    let options = raw_options
        .iter()
        .map(|raw| config::parse_option(raw))
        .collect::<Result<BTreeMap<_, _>, _>>()
        .map_err(CliError::diagnostic)?;
    let mut config = ProcessorConfig::from_options(options).map_err(CliError::diagnostic)?;

    if let Some(dir) = output_dir {
        config = config.with_output_dir(dir);
    }
    if let Some(marker) = marker {
        config = config.with_checked_marker(marker).map_err(CliError::diagnostic)?;
    }
    if let Some(policy) = field_names {
        config = config.with_field_name_policy(policy);
    }
    Ok(config.with_observe(observe))
}

fn load_model(path: &Path) -> CliResult<SymbolTable> {
    SymbolTable::from_path(path).map_err(CliError::diagnostic)
}

/// Reject output directories that escape the working tree.
fn validate_output_dir(out_dir: &Path) -> CliResult<()> {
    for component in out_dir.components() {
        if let std::path::Component::ParentDir = component {
            return Err(CliError::failure(format!(
                "Output directory '{}' contains path traversal (..)",
                out_dir.display()
            )));
        }
    }

    if out_dir.is_absolute() {
        tracing::warn!(
            "Using absolute output path: {}. Consider using a relative path.",
            out_dir.display()
        );
    }

    Ok(())
}

/// Run the observer (optionally) and the generator, writing sources under the configured output directory.
pub fn process_model(model: &Path, config: &ProcessorConfig) -> CliResult<ExitCode> {
    validate_output_dir(&config.output_dir)?;
    let table = load_model(model)?;

    let mut driver = RoundDriver::new().with_options(config.options.clone());
    if config.observe {
        driver.register(Box::new(DebugProcessor::new()));
    }
    driver.register(Box::new(GetterFieldProcessor::from_config(config)));

    let mut filer = FsFiler::new(&config.output_dir);
    let mut messager = ConsoleMessager::stderr();
    let summary = driver
        .run(&table, &mut filer, &mut messager)
        .map_err(CliError::diagnostic)?;

    tracing::info!(
        rounds = summary.rounds,
        generated = filer.created().len(),
        output_dir = %config.output_dir.display(),
        "processing finished"
    );
    println!(
        "Generated {} source file(s) in {}",
        filer.created().len(),
        config.output_dir.display()
    );

    if messager.has_errors() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Print the observer report for `model` to stdout.
pub fn inspect_model(model: &Path) -> CliResult<ExitCode> {
    let table = load_model(model)?;
    let report = inspect_table(&table)?;
    if report.is_empty() {
        println!("No annotations found");
    } else {
        print!("{report}");
    }
    Ok(ExitCode::SUCCESS)
}

/// Observer report for an already loaded model; empty when nothing is annotated.
pub fn inspect_table(table: &SymbolTable) -> CliResult<String> {
    let mut driver = RoundDriver::new();
    driver.register(Box::new(DebugProcessor::new()));

    let mut messager = CollectingMessager::new();
    driver
        .run(table, &mut MemoryFiler::new(), &mut messager)
        .map_err(CliError::diagnostic)?;
    Ok(messager.notes().concat())
}

/// Print the source that would be generated for `type_name`.
pub fn emit_type(model: &Path, type_name: &str, config: &ProcessorConfig) -> CliResult<ExitCode> {
    let table = load_model(model)?;
    print!("{}", render_type(&table, type_name, config)?);
    Ok(ExitCode::SUCCESS)
}

/// Render the companion of `type_name` without touching any file store.
pub fn render_type(table: &SymbolTable, type_name: &str, config: &ProcessorConfig) -> CliResult<String> {
    let element = table
        .lookup_type(type_name)
        .ok_or_else(|| CliError::failure(format!("Type '{type_name}' not found in the symbol model")))?;
    let marker = table
        .lookup_type(&config.marker_annotation)
        .filter(|marker| table.annotations_of(element).contains(marker))
        .ok_or_else(|| {
            CliError::failure(format!(
                "Type '{type_name}' is not annotated with '{}'",
                config.marker_annotation
            ))
        })?;

    let described = metadata::extract(table, marker, element).map_err(CliError::diagnostic)?;
    let artifact = GeneratedArtifact::render(&described, config.field_name_policy).map_err(CliError::diagnostic)?;
    Ok(artifact.body)
}
