//! Companion source generation
//!
//! Renders an [`ElementMetadata`] into the source of its generated companion type:
//!
//! ```text
//! package <pkg>;
//! public final class <Name>Generated {
//!   public static int <field>;
//! }
//! ```
//!
//! One field per getter, in getter order, named after the getter with its prefix removed. Rendering is pure and
//! deterministic. Field-name validation is a separate, policy-driven step ([`check_fields`]) so the rendering itself
//! never special-cases odd getters.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use aptgen_core::lang::conventions::GENERATED_FIELD_TYPE;
use aptgen_core::naming;
use miette::Diagnostic;
use thiserror::Error;

use super::java_emitter::JavaEmitter;
use crate::frontend::metadata::ElementMetadata;

/// How getter-derived field names are validated before anything is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldNamePolicy {
    /// Reject empty, reserved, malformed and repeated field names.
    #[default]
    Strict,
    /// Emit every derived field name as is.
    Verbatim,
}

impl FieldNamePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldNamePolicy::Strict => "strict",
            FieldNamePolicy::Verbatim => "verbatim",
        }
    }
}

impl fmt::Display for FieldNamePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown field-name policy spelling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown field name policy '{0}' (expected 'strict' or 'verbatim')")]
pub struct ParsePolicyError(pub String);

impl FromStr for FieldNamePolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(FieldNamePolicy::Strict),
            "verbatim" => Ok(FieldNamePolicy::Verbatim),
            other => Err(ParsePolicyError(other.to_string())),
        }
    }
}

/// A getter-derived field name that cannot be declared.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum GenerationError {
    #[error("getter '{getter}' yields an empty field name")]
    #[diagnostic(
        code(aptgen::codegen::empty_field_name),
        help("rename the method or pass `--field-names verbatim` to emit it anyway")
    )]
    EmptyFieldName { getter: String },

    #[error("getter '{getter}' yields '{field}', which is not a valid field name")]
    #[diagnostic(code(aptgen::codegen::invalid_field_name))]
    InvalidFieldName { getter: String, field: String },

    #[error("getters '{first}' and '{second}' both yield field '{field}'")]
    #[diagnostic(
        code(aptgen::codegen::duplicate_field_name),
        help("overloaded or inherited getters with the same name map to one field")
    )]
    DuplicateFieldName {
        field: String,
        first: String,
        second: String,
    },
}

/// Render the generated source for `metadata` as the type `target_name`.
#[tracing::instrument(skip_all, fields(type_name = target_name, fields = metadata.getter_names.len()))]
pub fn generate(metadata: &ElementMetadata, target_name: &str) -> String {
    let mut emitter = JavaEmitter::new();
    emitter.package_decl(&metadata.enclosing_package);
    emitter.final_class(target_name, |e| {
        for getter in &metadata.getter_names {
            e.static_field(GENERATED_FIELD_TYPE, naming::getter_field_name(getter));
        }
    });
    emitter.finish()
}

/// Validate the field names `metadata` would produce under `policy`.
pub fn check_fields(metadata: &ElementMetadata, policy: FieldNamePolicy) -> Result<(), GenerationError> {
    if policy == FieldNamePolicy::Verbatim {
        return Ok(());
    }

    let mut seen: HashMap<&str, &str> = HashMap::new();
    for getter in &metadata.getter_names {
        let field = naming::getter_field_name(getter);
        if field.is_empty() {
            return Err(GenerationError::EmptyFieldName { getter: getter.clone() });
        }
        if !naming::is_identifier(field) {
            return Err(GenerationError::InvalidFieldName {
                getter: getter.clone(),
                field: field.to_string(),
            });
        }
        if let Some(first) = seen.insert(field, getter.as_str()) {
            return Err(GenerationError::DuplicateFieldName {
                field: field.to_string(),
                first: first.to_string(),
                second: getter.clone(),
            });
        }
    }
    Ok(())
}

/// Validate under `policy`, then render.
pub fn generate_checked(
    metadata: &ElementMetadata,
    target_name: &str,
    policy: FieldNamePolicy,
) -> Result<String, GenerationError> {
    check_fields(metadata, policy)?;
    Ok(generate(metadata, target_name))
}
