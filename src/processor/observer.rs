//! Observer strategy
//!
//! Reports every annotation usage of the round as a single note and never claims anything, so other processors still
//! see the same elements. An element that cannot be described aborts the round for this processor.

use aptgen_core::lang::conventions::{PROCESSOR_HEADER_MARK, WILDCARD_ANNOTATION};

use super::round_log::RoundLog;
use super::{Claim, ProcessError, Processor};
use crate::frontend::metadata;
use crate::host::ProcessingEnvironment;
use crate::host::round::RoundEnvironment;

/// Logs the annotations of each round and the elements carrying them.
#[derive(Debug, Default)]
pub struct DebugProcessor;

impl DebugProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Build the round report without emitting it.
    pub fn report(
        &self,
        annotations: &[String],
        round: &RoundEnvironment,
        env: &ProcessingEnvironment<'_>,
    ) -> Result<RoundLog, ProcessError> {
        let mut log = RoundLog::new();
        log.info(format!("{PROCESSOR_HEADER_MARK} {} {PROCESSOR_HEADER_MARK}", self.name()));
        log.info("Annotations found:");
        for annotation in annotations {
            log.info(format!("\t- annotation: {annotation}"));
        }

        for annotation in annotations {
            log.info(format!("Elements that are annotated with the annotation '{annotation}' found"));
            let Some(annotation_id) = round.annotation_element(annotation) else {
                continue;
            };
            for &element in round.elements_annotated_with(annotation) {
                let described = metadata::extract(env.elements, annotation_id, element).map_err(|source| {
                    ProcessError::Extraction {
                        processor: self.name().to_string(),
                        source,
                    }
                })?;
                log.info(described.to_string());
            }
        }
        Ok(log)
    }
}

impl Processor for DebugProcessor {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn supported_annotation_types(&self) -> Vec<String> {
        vec![WILDCARD_ANNOTATION.to_string()]
    }

    #[tracing::instrument(skip_all, fields(processor = "observer", annotations = annotations.len()))]
    fn process(
        &mut self,
        annotations: &[String],
        round: &RoundEnvironment,
        env: &mut ProcessingEnvironment<'_>,
    ) -> Result<Claim, ProcessError> {
        if annotations.is_empty() {
            return Ok(Claim::NotClaimed);
        }
        let log = self.report(annotations, round, env)?;
        log.flush(env.messager);
        Ok(Claim::NotClaimed)
    }
}
