//! CLI module for aptgen
//!
//! This module provides the command-line front end over the processing engine.
//!
//! ## Commands
//!
//! - `process <model>` - Run the observer and the generator over a symbol model and write generated sources
//! - `inspect <model>` - Run only the observer and print its report
//! - `emit <model> <type>` - Print the source that would be generated for one type
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use crate::config::FieldNamePolicy;
use crate::version::APTGEN_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Render a diagnostic with its code, help and cause chain.
    pub fn diagnostic(err: impl miette::Diagnostic + Send + Sync + 'static) -> Self {
        Self::failure(format!("{:?}", miette::Report::new(err)))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Annotation-driven companion source generator
#[derive(Parser, Debug)]
#[command(name = "aptgen")]
#[command(version = APTGEN_VERSION)]
#[command(about = "Generate companion sources for annotated types in a symbol model", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the processors over a symbol model and write generated sources
    Process {
        /// Symbol model (JSON)
        #[arg(value_name = "MODEL")]
        model: PathBuf,
        /// Output directory (default: target/aptgen/generated)
        #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
        output_dir: Option<PathBuf>,
        /// Qualified name of the marker annotation
        #[arg(long, value_name = "NAME")]
        marker: Option<String>,
        /// Do not run the observer
        #[arg(long)]
        no_observe: bool,
        /// Field name validation policy
        #[arg(long = "field-names", value_name = "POLICY")]
        field_names: Option<FieldNamePolicy>,
        /// Processor option (repeatable)
        #[arg(short = 'A', value_name = "KEY=VALUE")]
        options: Vec<String>,
    },

    /// Print the observer report for a symbol model
    Inspect {
        /// Symbol model (JSON)
        #[arg(value_name = "MODEL")]
        model: PathBuf,
    },

    /// Print the generated source for one type
    Emit {
        /// Symbol model (JSON)
        #[arg(value_name = "MODEL")]
        model: PathBuf,
        /// Qualified name of the annotated type
        #[arg(value_name = "TYPE")]
        type_name: String,
        /// Qualified name of the marker annotation
        #[arg(long, value_name = "NAME")]
        marker: Option<String>,
        /// Field name validation policy
        #[arg(long = "field-names", value_name = "POLICY")]
        field_names: Option<FieldNamePolicy>,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Process {
            model,
            output_dir,
            marker,
            no_observe,
            field_names,
            options,
        } => {
            let config = commands::resolve_config(output_dir, marker, !no_observe, field_names, &options)?;
            commands::process_model(&model, &config)
        }
        Command::Inspect { model } => commands::inspect_model(&model),
        Command::Emit {
            model,
            type_name,
            marker,
            field_names,
        } => {
            let config = commands::resolve_config(None, marker, false, field_names, &[])?;
            commands::emit_type(&model, &type_name, &config)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
