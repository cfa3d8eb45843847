//! Generator strategy
//!
//! For every element carrying the marker annotation: extract its metadata, render the companion source, and publish it
//! through the file store. A failing element is recorded in the round's error buffer and the next element is still
//! processed. The marker is claimed whenever at least one element carried it.

use aptgen_core::lang::conventions::{FOUND_MARK, PROCESSOR_HEADER_MARK};
use miette::Diagnostic;
use thiserror::Error;

use super::round_log::RoundLog;
use super::{Claim, ProcessError, Processor};
use crate::backend::artifact::{self, GeneratedArtifact, PublishError};
use crate::backend::codegen::{FieldNamePolicy, GenerationError};
use crate::config::ProcessorConfig;
use crate::frontend::metadata::{self, ExtractionError};
use crate::frontend::symbols::ElementId;
use crate::host::ProcessingEnvironment;
use crate::host::round::RoundEnvironment;

/// Why one element produced no artifact.
#[derive(Debug, Error, Diagnostic)]
pub enum ElementError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Publish(#[from] PublishError),
}

/// Generates `<Name>Generated` with one static field per getter for each marked element.
#[derive(Debug, Clone)]
pub struct GetterFieldProcessor {
    marker: String,
    policy: FieldNamePolicy,
}

impl GetterFieldProcessor {
    pub fn new(marker: impl Into<String>, policy: FieldNamePolicy) -> Self {
        Self {
            marker: marker.into(),
            policy,
        }
    }

    pub fn from_config(config: &ProcessorConfig) -> Self {
        Self::new(config.marker_annotation.clone(), config.field_name_policy)
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Extract, render and publish one element, logging each step.
    fn process_element(
        &self,
        annotation: ElementId,
        element: ElementId,
        env: &mut ProcessingEnvironment<'_>,
        log: &mut RoundLog,
    ) -> Result<(), ElementError> {
        let described = metadata::extract(env.elements, annotation, element)?;
        let rendered = GeneratedArtifact::render(&described, self.policy)?;
        log.info(format!(
            "Generating: targetClassName: '{}', targetClassNameWithPackage: '{}'",
            rendered.target.name,
            rendered.target.qualified_name()
        ));

        let report = artifact::publish(env.filer, &rendered, element)?;
        log.info(format!(
            "sourceFileObject: {}, fileExists: {}",
            report.stale.resource, report.stale.existed
        ));
        log.append_info(&rendered.body);
        Ok(())
    }
}

impl Processor for GetterFieldProcessor {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn supported_annotation_types(&self) -> Vec<String> {
        vec![self.marker.clone()]
    }

    #[tracing::instrument(skip_all, fields(processor = "generator", marker = %self.marker))]
    fn process(
        &mut self,
        annotations: &[String],
        round: &RoundEnvironment,
        env: &mut ProcessingEnvironment<'_>,
    ) -> Result<Claim, ProcessError> {
        let pairs: Vec<(ElementId, ElementId)> = annotations
            .iter()
            .filter(|a| **a == self.marker)
            .filter_map(|a| round.annotation_element(a).map(|id| (a, id)))
            .flat_map(|(a, id)| round.elements_annotated_with(a).iter().map(move |&e| (id, e)))
            .collect();
        if pairs.is_empty() {
            return Ok(Claim::NotClaimed);
        }

        let mut log = RoundLog::new();
        log.info(format!("{PROCESSOR_HEADER_MARK} {} {PROCESSOR_HEADER_MARK}", self.name()));

        for (annotation, element) in pairs {
            log.info(format!(
                "{FOUND_MARK} found @{} at {}",
                env.elements.simple_name(annotation),
                env.elements.qualified_name(element)
            ));
            if let Err(err) = self.process_element(annotation, element, env, &mut log) {
                tracing::warn!(element = %env.elements.qualified_name(element), error = %err, "element skipped");
                log.record_error(&err);
            }
        }

        log.flush(env.messager);
        Ok(Claim::Claimed)
    }
}
