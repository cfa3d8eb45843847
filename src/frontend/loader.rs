//! Symbol model loading
//!
//! Builds a [`SymbolTable`] from a JSON description of a resolved program:
//!
//! ```json
//! { "packages": [ { "name": "sample", "types": [
//!     { "name": "Hello", "annotations": ["sample.annotation.MySampleAnnotation"],
//!       "members": [ { "name": "getGreeting" } ] } ] } ] }
//! ```
//!
//! Top-level declarations default to `class`, members default to `method`. A member whose kind is a type kind is a
//! nested type; a type declared among a method's members is a local type.

use std::fs;
use std::path::{Path, PathBuf};

use aptgen_core::lang::element_kind::{self, ElementKindId};
use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;

use super::symbols::{ElementId, Elements, SymbolError, SymbolTable};

/// Errors raised while loading a symbol model.
#[derive(Debug, Error, Diagnostic)]
pub enum ModelError {
    #[error("failed to read symbol model '{path}'")]
    #[diagnostic(code(aptgen::model::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed symbol model")]
    #[diagnostic(code(aptgen::model::parse))]
    Parse(#[from] serde_json::Error),

    #[error("unknown element kind '{kind}' on '{name}'")]
    #[diagnostic(
        code(aptgen::model::unknown_kind),
        help("use one of: class, interface, enum, record, annotation, method, constructor, field")
    )]
    UnknownKind { name: String, kind: String },

    #[error("'{name}' extends unknown type '{target}'")]
    #[diagnostic(code(aptgen::model::unresolved_superclass))]
    UnresolvedSuperclass { name: String, target: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Symbol(#[from] SymbolError),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModelFile {
    #[serde(default)]
    packages: Vec<PackageDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PackageDecl {
    #[serde(default)]
    name: String,
    #[serde(default)]
    types: Vec<Decl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Decl {
    name: String,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    annotations: Vec<String>,
    #[serde(default)]
    extends: Option<String>,
    #[serde(default)]
    parameters: Vec<String>,
    #[serde(default)]
    members: Vec<Decl>,
}

/// Work deferred until every type has been declared.
#[derive(Default)]
struct Pending<'a> {
    annotations: Vec<(ElementId, &'a str)>,
    superclasses: Vec<(ElementId, &'a str)>,
}

impl SymbolTable {
    /// Load a symbol model from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&source)
    }

    /// Load a symbol model from JSON text.
    #[tracing::instrument(skip_all, fields(source_len = source.len()))]
    pub fn from_json(source: &str) -> Result<Self, ModelError> {
        let file: ModelFile = serde_json::from_str(source)?;
        let mut table = SymbolTable::new();
        let mut pending = Pending::default();

        for package in &file.packages {
            let package_id = table.package(&package.name);
            for decl in &package.types {
                declare(&mut table, &mut pending, decl, package_id, ElementKindId::Class)?;
            }
        }

        for (element, target) in pending.superclasses {
            let superclass = table
                .lookup_type(target)
                .ok_or_else(|| ModelError::UnresolvedSuperclass {
                    name: table.qualified_name(element),
                    target: target.to_string(),
                })?;
            table.set_superclass(element, superclass)?;
        }
        for (element, annotation) in pending.annotations {
            let annotation = table.annotation_type(annotation)?;
            table.annotate(element, annotation);
        }

        tracing::debug!(elements = table.len(), "loaded symbol model");
        Ok(table)
    }
}

fn declare<'a>(
    table: &mut SymbolTable,
    pending: &mut Pending<'a>,
    decl: &'a Decl,
    enclosing: ElementId,
    default_kind: ElementKindId,
) -> Result<ElementId, ModelError> {
    let kind = match decl.kind.as_deref() {
        None => default_kind,
        Some(spelling) => element_kind::from_str(spelling)
            .filter(|k| !k.is_package())
            .ok_or_else(|| ModelError::UnknownKind {
                name: decl.name.clone(),
                kind: spelling.to_string(),
            })?,
    };

    let id = if kind.is_executable() {
        table.declare_executable(kind, &decl.name, decl.parameters.clone(), enclosing)?
    } else {
        table.declare(kind, &decl.name, enclosing)?
    };

    pending
        .annotations
        .extend(decl.annotations.iter().map(|a| (id, a.as_str())));
    if let Some(target) = decl.extends.as_deref() {
        pending.superclasses.push((id, target));
    }
    for member in &decl.members {
        declare(table, pending, member, id, ElementKindId::Method)?;
    }
    Ok(id)
}
