//! Element metadata extraction
//!
//! Turns one annotated element into an [`ElementMetadata`] record by naming convention:
//! kind and simple name are read directly, the package is the directly enclosing scope, and the getters are every
//! method among the element's full member list (inherited members included) whose name carries the getter prefix.
//!
//! Extraction is purely descriptive over host-owned data. It fails instead of guessing when the element does not sit
//! directly in a package (nested or local types), so callers decide whether to propagate or record the failure.

use std::fmt;

use aptgen_core::lang::element_kind::ElementKindId;
use aptgen_core::naming;
use miette::Diagnostic;
use thiserror::Error;

use super::symbols::{ElementId, Elements, SymbolError};

/// Why an element could not be described.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ExtractionError {
    #[error("'{element}' is enclosed by {enclosing_kind} '{enclosing}', not by a package")]
    #[diagnostic(
        code(aptgen::extract::not_in_package),
        help("only top-level types can be processed; move the annotation to a type declared directly in a package")
    )]
    NotInPackage {
        element: String,
        enclosing: String,
        enclosing_kind: ElementKindId,
    },

    #[error("'{element}' has no enclosing scope")]
    #[diagnostic(code(aptgen::extract::no_enclosing_scope))]
    NoEnclosingScope { element: String },

    #[error("failed to list the members of '{element}'")]
    #[diagnostic(code(aptgen::extract::members))]
    Members {
        element: String,
        #[source]
        source: SymbolError,
    },
}

/// Structural description of one annotated element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementMetadata {
    pub kind: ElementKindId,
    pub simple_name: String,
    /// Qualified name of the enclosing package (`""` for the unnamed package).
    pub enclosing_package: String,
    /// Every member method whose name starts with the getter prefix, in member order.
    pub getter_names: Vec<String>,
}

/// Describe `element`, which was selected in this round because it carries `annotation`.
#[tracing::instrument(
    skip_all,
    fields(annotation = %elements.qualified_name(annotation), element = %elements.qualified_name(element))
)]
pub fn extract(
    elements: &dyn Elements,
    annotation: ElementId,
    element: ElementId,
) -> Result<ElementMetadata, ExtractionError> {
    let kind = elements.kind(element);
    let simple_name = elements.simple_name(element).to_string();
    let enclosing_package = enclosing_package(elements, element)?;

    let getter_names = elements
        .all_members(element)
        .map_err(|source| ExtractionError::Members {
            element: elements.qualified_name(element),
            source,
        })?
        .into_iter()
        .filter(|&member| elements.kind(member) == ElementKindId::Method)
        .map(|member| elements.simple_name(member))
        .filter(|name| naming::is_getter_name(name))
        .map(str::to_string)
        .collect();

    Ok(ElementMetadata {
        kind,
        simple_name,
        enclosing_package,
        getter_names,
    })
}

/// Resolve the package one level up the enclosing-scope chain.
fn enclosing_package(elements: &dyn Elements, element: ElementId) -> Result<String, ExtractionError> {
    let Some(enclosing) = elements.enclosing_element(element) else {
        return Err(ExtractionError::NoEnclosingScope {
            element: elements.qualified_name(element),
        });
    };
    let enclosing_kind = elements.kind(enclosing);
    if !enclosing_kind.is_package() {
        return Err(ExtractionError::NotInPackage {
            element: elements.qualified_name(element),
            enclosing: elements.qualified_name(enclosing),
            enclosing_kind,
        });
    }
    Ok(elements.qualified_name(enclosing))
}

impl fmt::Display for ElementMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "\t- annotated element: annotatedClassName='{}', annotatedPackageName='{}', annotatedElementKind='{}'",
            self.simple_name, self.enclosing_package, self.kind
        )?;
        write!(f, "\t- getter methods: [{}]", self.getter_names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::symbols::SymbolTable;

    fn table_with(members: &[&str]) -> (SymbolTable, ElementId, ElementId) {
        let mut table = SymbolTable::new();
        let marker = table.annotation_type("sample.annotation.MySampleAnnotation").unwrap();
        let sample = table.package("sample");
        let hello = table.declare(ElementKindId::Class, "Hello", sample).unwrap();
        table.annotate(hello, marker);
        for name in members {
            table
                .declare_executable(ElementKindId::Method, name, vec![], hello)
                .unwrap();
        }
        (table, marker, hello)
    }

    #[test]
    fn test_extract_hello() {
        let (table, marker, hello) = table_with(&["main", "getGreeting", "saySomething"]);
        let metadata = extract(&table, marker, hello).unwrap();

        assert_eq!(
            metadata,
            ElementMetadata {
                kind: ElementKindId::Class,
                simple_name: "Hello".to_string(),
                enclosing_package: "sample".to_string(),
                getter_names: vec!["getGreeting".to_string()],
            }
        );
    }

    #[test]
    fn test_prefix_boundaries() {
        let (table, marker, hello) = table_with(&["Getter", "geT", "get", "getter", "getX"]);
        let metadata = extract(&table, marker, hello).unwrap();
        assert_eq!(metadata.getter_names, vec!["get", "getter", "getX"]);
    }

    #[test]
    fn test_fields_and_nested_types_are_not_getters() {
        let (mut table, marker, hello) = table_with(&["getA"]);
        table.declare(ElementKindId::Field, "getB", hello).unwrap();
        table.declare(ElementKindId::Class, "getC", hello).unwrap();

        let metadata = extract(&table, marker, hello).unwrap();
        assert_eq!(metadata.getter_names, vec!["getA"]);
    }

    #[test]
    fn test_inherited_getters_follow_own_members() {
        let (mut table, marker, hello) = table_with(&["getOwn"]);
        let sample = table.package("sample");
        let base = table.declare(ElementKindId::Class, "Base", sample).unwrap();
        table
            .declare_executable(ElementKindId::Method, "getInherited", vec![], base)
            .unwrap();
        table.set_superclass(hello, base).unwrap();

        let metadata = extract(&table, marker, hello).unwrap();
        assert_eq!(metadata.getter_names, vec!["getOwn", "getInherited"]);
    }

    #[test]
    fn test_nested_type_fails() {
        let (mut table, marker, hello) = table_with(&[]);
        let inner = table.declare(ElementKindId::Class, "Inner", hello).unwrap();
        table.annotate(inner, marker);

        let err = extract(&table, marker, inner).unwrap_err();
        assert_eq!(
            err,
            ExtractionError::NotInPackage {
                element: "sample.Hello.Inner".to_string(),
                enclosing: "sample.Hello".to_string(),
                enclosing_kind: ElementKindId::Class,
            }
        );
    }

    #[test]
    fn test_package_element_fails() {
        let (table, marker, hello) = table_with(&[]);
        let sample = table.enclosing_element(hello).unwrap();
        assert!(matches!(
            extract(&table, marker, sample),
            Err(ExtractionError::NoEnclosingScope { .. })
        ));
    }

    #[test]
    fn test_member_enumeration_failure_propagates() {
        let (mut table, marker, hello) = table_with(&[]);
        table.set_superclass(hello, hello).unwrap();
        assert!(matches!(
            extract(&table, marker, hello),
            Err(ExtractionError::Members {
                source: SymbolError::SuperclassCycle { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_display_matches_report_layout() {
        let metadata = ElementMetadata {
            kind: ElementKindId::Class,
            simple_name: "Hello".to_string(),
            enclosing_package: "sample".to_string(),
            getter_names: vec!["getGreeting".to_string(), "getName".to_string()],
        };
        assert_eq!(
            metadata.to_string(),
            "\t- annotated element: annotatedClassName='Hello', annotatedPackageName='sample', \
             annotatedElementKind='CLASS'\n\t- getter methods: [getGreeting, getName]"
        );
    }
}
