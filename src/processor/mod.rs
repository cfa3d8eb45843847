//! Annotation processors
//!
//! A [`Processor`] declares which annotation types it is interested in and is invoked once per round with the subset
//! the host offers it. Two strategies share the same extractor:
//!
//! - [`observer::DebugProcessor`] reports every annotation usage and never claims anything.
//! - [`generator::GetterFieldProcessor`] generates a companion type per marked element and claims its marker.

pub mod generator;
pub mod observer;
pub mod round_log;

use miette::Diagnostic;
use thiserror::Error;

use crate::frontend::metadata::ExtractionError;
use crate::host::ProcessingEnvironment;
use crate::host::round::RoundEnvironment;

/// Whether a processor has fully handled the annotations it was offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// No later processor sees these annotation types.
    Claimed,
    NotClaimed,
}

impl Claim {
    pub fn is_claimed(self) -> bool {
        self == Claim::Claimed
    }
}

/// A failure that aborts processing.
#[derive(Debug, Error, Diagnostic)]
pub enum ProcessError {
    #[error("processor '{processor}' failed")]
    #[diagnostic(code(aptgen::process::extraction))]
    Extraction {
        processor: String,
        #[source]
        source: ExtractionError,
    },
}

/// A round-driven annotation processor.
pub trait Processor {
    fn name(&self) -> &str;

    /// Qualified annotation names this processor handles, or the wildcard `"*"`.
    fn supported_annotation_types(&self) -> Vec<String>;

    /// Process one round. `annotations` are the qualified names offered to this processor.
    fn process(
        &mut self,
        annotations: &[String],
        round: &RoundEnvironment,
        env: &mut ProcessingEnvironment<'_>,
    ) -> Result<Claim, ProcessError>;
}
