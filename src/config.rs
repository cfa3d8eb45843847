//! Processor configuration
//!
//! Defaults can be overridden by host options (`-A key=value`):
//!
//! | option               | effect                                   |
//! |----------------------|------------------------------------------|
//! | `aptgen.outputDir`   | root directory for generated sources     |
//! | `aptgen.marker`      | qualified name of the marker annotation  |
//! | `aptgen.fieldNames`  | `strict` or `verbatim` field validation  |
//!
//! Unknown keys are kept in [`ProcessorConfig::options`] and otherwise ignored.

use std::collections::BTreeMap;
use std::path::PathBuf;

use aptgen_core::lang::conventions::DEFAULT_MARKER_ANNOTATION;
use aptgen_core::naming;
use miette::Diagnostic;
use thiserror::Error;

pub use crate::backend::codegen::FieldNamePolicy;
use crate::backend::codegen::ParsePolicyError;

pub const OPTION_OUTPUT_DIR: &str = "aptgen.outputDir";
pub const OPTION_MARKER: &str = "aptgen.marker";
pub const OPTION_FIELD_NAMES: &str = "aptgen.fieldNames";

/// Default root for generated sources.
pub const DEFAULT_OUTPUT_DIR: &str = "target/aptgen/generated";

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("malformed processor option '{0}'")]
    #[diagnostic(code(aptgen::config::malformed_option), help("options are written as key=value"))]
    MalformedOption(String),

    #[error("invalid value for '{OPTION_FIELD_NAMES}'")]
    #[diagnostic(code(aptgen::config::field_names))]
    FieldNames(#[source] ParsePolicyError),

    #[error("'{0}' is not a qualified annotation name")]
    #[diagnostic(code(aptgen::config::marker))]
    InvalidMarker(String),
}

/// Settings shared by the processors of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorConfig {
    /// Annotation that selects elements for generation.
    pub marker_annotation: String,
    /// Where the directory-backed file store writes.
    pub output_dir: PathBuf,
    pub field_name_policy: FieldNamePolicy,
    /// Every host option, including ones this crate does not interpret.
    pub options: BTreeMap<String, String>,
    /// Whether the observer runs alongside the generator.
    pub observe: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            marker_annotation: DEFAULT_MARKER_ANNOTATION.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            field_name_policy: FieldNamePolicy::default(),
            options: BTreeMap::new(),
            observe: true,
        }
    }
}

impl ProcessorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_marker_annotation(mut self, marker: impl Into<String>) -> Self {
        self.marker_annotation = marker.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_field_name_policy(mut self, policy: FieldNamePolicy) -> Self {
        self.field_name_policy = policy;
        self
    }

    /// Like [`Self::with_marker_annotation`], but rejects names that are not dotted identifier sequences.
    pub fn with_checked_marker(self, marker: impl Into<String>) -> Result<Self, ConfigError> {
        let marker = marker.into();
        if !naming::is_qualified_name(&marker) {
            return Err(ConfigError::InvalidMarker(marker));
        }
        Ok(self.with_marker_annotation(marker))
    }

    pub fn with_observe(mut self, observe: bool) -> Self {
        self.observe = observe;
        self
    }

    /// Apply host options on top of the defaults.
    pub fn from_options(options: BTreeMap<String, String>) -> Result<Self, ConfigError> {
        Self::default().apply_options(options)
    }

    /// Apply host options on top of this configuration.
    pub fn apply_options(mut self, options: BTreeMap<String, String>) -> Result<Self, ConfigError> {
        if let Some(dir) = options.get(OPTION_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(marker) = options.get(OPTION_MARKER) {
            self = self.with_checked_marker(marker.clone())?;
        }
        if let Some(policy) = options.get(OPTION_FIELD_NAMES) {
            self.field_name_policy = policy.parse().map_err(ConfigError::FieldNames)?;
        }
        self.options.extend(options);
        Ok(self)
    }
}

/// Split a `key=value` option. A bare key maps to an empty value.
pub fn parse_option(raw: &str) -> Result<(String, String), ConfigError> {
    let (key, value) = raw.split_once('=').unwrap_or((raw, ""));
    if key.trim().is_empty() {
        return Err(ConfigError::MalformedOption(raw.to_string()));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_defaults() {
        let config = ProcessorConfig::default();
        assert_eq!(config.marker_annotation, "sample.annotation.MySampleAnnotation");
        assert_eq!(config.output_dir, PathBuf::from("target/aptgen/generated"));
        assert_eq!(config.field_name_policy, FieldNamePolicy::Strict);
        assert!(config.observe);
    }

    #[test]
    fn test_builder() {
        let config = ProcessorConfig::new()
            .with_marker_annotation("a.B")
            .with_output_dir("out")
            .with_field_name_policy(FieldNamePolicy::Verbatim)
            .with_observe(false);
        assert_eq!(config.marker_annotation, "a.B");
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.field_name_policy, FieldNamePolicy::Verbatim);
        assert!(!config.observe);
    }

    #[test]
    fn test_from_options() {
        let config = ProcessorConfig::from_options(options(&[
            ("aptgen.outputDir", "gen"),
            ("aptgen.marker", "x.Mark"),
            ("aptgen.fieldNames", "verbatim"),
            ("other.key", "kept"),
        ]))
        .unwrap();
        assert_eq!(config.output_dir, PathBuf::from("gen"));
        assert_eq!(config.marker_annotation, "x.Mark");
        assert_eq!(config.field_name_policy, FieldNamePolicy::Verbatim);
        assert_eq!(config.options.get("other.key").map(String::as_str), Some("kept"));
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let err = ProcessorConfig::from_options(options(&[("aptgen.fieldNames", "loose")])).unwrap_err();
        assert!(matches!(err, ConfigError::FieldNames(ParsePolicyError(ref v)) if v == "loose"));
    }

    #[test]
    fn test_invalid_marker_rejected() {
        assert!(matches!(
            ProcessorConfig::from_options(options(&[("aptgen.marker", "not a name")])),
            Err(ConfigError::InvalidMarker(_))
        ));
        assert!(matches!(
            ProcessorConfig::default().with_checked_marker("x..Mark"),
            Err(ConfigError::InvalidMarker(ref m)) if m == "x..Mark"
        ));
        let config = ProcessorConfig::default().with_checked_marker("x.Mark").unwrap();
        assert_eq!(config.marker_annotation, "x.Mark");
    }

    #[test]
    fn test_parse_option() {
        assert_eq!(parse_option("a=b=c").unwrap(), ("a".to_string(), "b=c".to_string()));
        assert_eq!(parse_option("flag").unwrap(), ("flag".to_string(), String::new()));
        assert!(parse_option("=x").is_err());
    }
}
