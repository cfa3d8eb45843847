//! Program element kind vocabulary.
//!
//! The host hands the processors a polymorphic symbol model (packages, types, methods, fields). Rather than inspecting
//! host objects at runtime, every element carries one closed [`ElementKindId`] and callers branch on that.
//!
//! ## Notes
//! - Canonical spellings are upper-case (`"CLASS"`, `"METHOD"`), matching what processors print in diagnostics.
//! - Lower-case aliases exist so symbol-model files can spell kinds naturally (`"class"`).

/// Stable identifier for an element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKindId {
    Package,

    // Type declarations
    Class,
    Interface,
    Enum,
    Record,
    Annotation,

    // Members
    Method,
    Constructor,
    Field,

    /// Anything the processors have no specific behavior for.
    Other,
}

/// Metadata for an element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementKindInfo {
    pub id: ElementKindId,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
}

/// Registry of all element kinds.
pub const ELEMENT_KINDS: &[ElementKindInfo] = &[
    info(ElementKindId::Package, "PACKAGE", &["package"], "A named package scope."),
    info(ElementKindId::Class, "CLASS", &["class"], "A class declaration."),
    info(ElementKindId::Interface, "INTERFACE", &["interface"], "An interface declaration."),
    info(ElementKindId::Enum, "ENUM", &["enum"], "An enum declaration."),
    info(ElementKindId::Record, "RECORD", &["record"], "A record declaration."),
    info(
        ElementKindId::Annotation,
        "ANNOTATION_TYPE",
        &["annotation"],
        "An annotation type declaration.",
    ),
    info(ElementKindId::Method, "METHOD", &["method"], "A method of a type."),
    info(ElementKindId::Constructor, "CONSTRUCTOR", &["constructor"], "A constructor of a type."),
    info(ElementKindId::Field, "FIELD", &["field"], "A field of a type."),
    info(ElementKindId::Other, "OTHER", &["other"], "Any other element."),
];

/// Resolve a spelling (canonical or alias) to an [`ElementKindId`].
///
/// ## Returns
/// - `Some(ElementKindId)` if `name` matches a known kind.
/// - `None` otherwise.
pub fn from_str(name: &str) -> Option<ElementKindId> {
    ELEMENT_KINDS
        .iter()
        .find(|k| k.canonical == name || k.aliases.contains(&name))
        .map(|k| k.id)
}

/// Return the canonical spelling for a kind.
pub fn as_str(id: ElementKindId) -> &'static str {
    info_for(id).canonical
}

/// Return the full metadata entry for a kind.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: ElementKindId) -> &'static ElementKindInfo {
    ELEMENT_KINDS
        .iter()
        .find(|k| k.id == id)
        .expect("element kind info missing")
}

impl ElementKindId {
    /// Type declarations: the only kinds that own members.
    pub fn is_type(self) -> bool {
        matches!(
            self,
            ElementKindId::Class
                | ElementKindId::Interface
                | ElementKindId::Enum
                | ElementKindId::Record
                | ElementKindId::Annotation
        )
    }

    pub fn is_package(self) -> bool {
        self == ElementKindId::Package
    }

    /// Methods and constructors.
    pub fn is_executable(self) -> bool {
        matches!(self, ElementKindId::Method | ElementKindId::Constructor)
    }
}

impl std::fmt::Display for ElementKindId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(as_str(*self))
    }
}

const fn info(
    id: ElementKindId,
    canonical: &'static str,
    aliases: &'static [&'static str],
    description: &'static str,
) -> ElementKindInfo {
    ElementKindInfo {
        id,
        canonical,
        aliases,
        description,
    }
}
