//! Symbol model for aptgen
//!
//! The host owns a resolved model of the program: packages, types and their members. Processors only ever read it
//! through the [`Elements`] capability trait, so the same extractor works against any host that can answer those
//! questions.
//!
//! [`SymbolTable`] is the in-process host model: an arena of [`Element`]s addressed by [`ElementId`].

use std::collections::{HashMap, HashSet};

use aptgen_core::lang::element_kind::ElementKindId;
use aptgen_core::naming;
use miette::Diagnostic;
use thiserror::Error;

/// Unique identifier for elements
pub type ElementId = usize;

/// Errors raised while building or querying the symbol model.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum SymbolError {
    #[error("type '{name}' is declared more than once")]
    #[diagnostic(code(aptgen::symbols::duplicate_type))]
    DuplicateType { name: String },

    #[error("'{name}' is a {kind}, not a type")]
    #[diagnostic(code(aptgen::symbols::not_a_type))]
    NotAType { name: String, kind: ElementKindId },

    #[error("superclass chain of '{name}' is cyclic")]
    #[diagnostic(
        code(aptgen::symbols::superclass_cycle),
        help("a type cannot extend itself, directly or through its supertypes")
    )]
    SuperclassCycle { name: String },
}

/// A single program element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub kind: ElementKindId,
    /// Simple name. Packages store their full qualified name here.
    pub name: String,
    pub enclosing: Option<ElementId>,
    /// Enclosed elements in declaration order.
    pub enclosed: Vec<ElementId>,
    /// Parameter type names (methods and constructors only).
    pub parameters: Vec<String>,
    /// Annotation types attached to this element.
    pub annotations: Vec<ElementId>,
    pub superclass: Option<ElementId>,
}

impl Element {
    fn new(kind: ElementKindId, name: &str, enclosing: Option<ElementId>) -> Self {
        Self {
            kind,
            name: name.to_string(),
            enclosing,
            enclosed: Vec::new(),
            parameters: Vec::new(),
            annotations: Vec::new(),
            superclass: None,
        }
    }
}

/// Read-only view of the host's symbol model.
///
/// Ids passed to these methods must have been handed out by the same model.
pub trait Elements {
    fn kind(&self, id: ElementId) -> ElementKindId;

    fn simple_name(&self, id: ElementId) -> &str;

    /// The scope that directly encloses `id`; `None` for packages.
    fn enclosing_element(&self, id: ElementId) -> Option<ElementId>;

    fn qualified_name(&self, id: ElementId) -> String;

    /// Directly enclosed elements, in declaration order.
    fn enclosed_elements(&self, id: ElementId) -> &[ElementId];

    fn parameters(&self, id: ElementId) -> &[String];

    fn annotations_of(&self, id: ElementId) -> &[ElementId];

    /// All members of a type, inherited ones included.
    ///
    /// Own members come first in declaration order, followed by members of each superclass in turn. An inherited
    /// method is skipped when a member with the same name and parameter list was already listed; constructors are
    /// never inherited.
    fn all_members(&self, id: ElementId) -> Result<Vec<ElementId>, SymbolError>;
}

/// Arena-backed symbol model.
#[derive(Debug, Default)]
pub struct SymbolTable {
    elements: Vec<Element>,
    packages: HashMap<String, ElementId>,
    types: HashMap<String, ElementId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create a package. The unnamed package is spelled `""`.
    pub fn package(&mut self, name: &str) -> ElementId {
        if let Some(&id) = self.packages.get(name) {
            return id;
        }
        let id = self.push(Element::new(ElementKindId::Package, name, None));
        self.packages.insert(name.to_string(), id);
        id
    }

    /// Declare an element inside `enclosing`.
    ///
    /// Type declarations are registered under their qualified name and must be unique.
    pub fn declare(&mut self, kind: ElementKindId, name: &str, enclosing: ElementId) -> Result<ElementId, SymbolError> {
        let qualified = naming::qualify(&self.qualified_name(enclosing), name);
        if kind.is_type() && self.types.contains_key(&qualified) {
            return Err(SymbolError::DuplicateType { name: qualified });
        }
        let id = self.push(Element::new(kind, name, Some(enclosing)));
        self.elements[enclosing].enclosed.push(id);
        if kind.is_type() {
            self.types.insert(qualified, id);
        }
        Ok(id)
    }

    /// Declare a method (or constructor) with its parameter type names.
    pub fn declare_executable(
        &mut self,
        kind: ElementKindId,
        name: &str,
        parameters: Vec<String>,
        enclosing: ElementId,
    ) -> Result<ElementId, SymbolError> {
        let id = self.declare(kind, name, enclosing)?;
        self.elements[id].parameters = parameters;
        Ok(id)
    }

    /// Resolve an annotation type by qualified name, declaring it in its package on first use.
    pub fn annotation_type(&mut self, qualified: &str) -> Result<ElementId, SymbolError> {
        if let Some(id) = self.lookup_type(qualified) {
            return Ok(id);
        }
        let (package, name) = qualified.rsplit_once('.').unwrap_or(("", qualified));
        let package = self.package(package);
        self.declare(ElementKindId::Annotation, name, package)
    }

    /// Attach `annotation` to `element`. Repeating an annotation already present has no effect.
    pub fn annotate(&mut self, element: ElementId, annotation: ElementId) {
        let annotations = &mut self.elements[element].annotations;
        if !annotations.contains(&annotation) {
            annotations.push(annotation);
        }
    }

    pub fn set_superclass(&mut self, ty: ElementId, superclass: ElementId) -> Result<(), SymbolError> {
        let kind = self.elements[superclass].kind;
        if !kind.is_type() {
            return Err(SymbolError::NotAType {
                name: self.qualified_name(superclass),
                kind,
            });
        }
        self.elements[ty].superclass = Some(superclass);
        Ok(())
    }

    pub fn lookup_type(&self, qualified: &str) -> Option<ElementId> {
        self.types.get(qualified).copied()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Types declared directly in a package, in declaration order.
    pub fn root_elements(&self) -> Vec<ElementId> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.kind.is_type())
            .filter(|(_, e)| e.enclosing.is_some_and(|p| self.elements[p].kind.is_package()))
            .map(|(id, _)| id)
            .collect()
    }

    fn push(&mut self, element: Element) -> ElementId {
        let id = self.elements.len();
        self.elements.push(element);
        id
    }
}

impl Elements for SymbolTable {
    fn kind(&self, id: ElementId) -> ElementKindId {
        self.elements[id].kind
    }

    fn simple_name(&self, id: ElementId) -> &str {
        let element = &self.elements[id];
        if element.kind.is_package() {
            element.name.rsplit('.').next().unwrap_or("")
        } else {
            &element.name
        }
    }

    fn enclosing_element(&self, id: ElementId) -> Option<ElementId> {
        self.elements[id].enclosing
    }

    fn qualified_name(&self, id: ElementId) -> String {
        let element = &self.elements[id];
        match element.enclosing {
            Some(enclosing) if !element.kind.is_package() => {
                naming::qualify(&self.qualified_name(enclosing), &element.name)
            }
            _ => element.name.clone(),
        }
    }

    fn enclosed_elements(&self, id: ElementId) -> &[ElementId] {
        &self.elements[id].enclosed
    }

    fn parameters(&self, id: ElementId) -> &[String] {
        &self.elements[id].parameters
    }

    fn annotations_of(&self, id: ElementId) -> &[ElementId] {
        &self.elements[id].annotations
    }

    fn all_members(&self, id: ElementId) -> Result<Vec<ElementId>, SymbolError> {
        let kind = self.kind(id);
        if !kind.is_type() {
            return Err(SymbolError::NotAType {
                name: self.qualified_name(id),
                kind,
            });
        }

        let mut members = Vec::new();
        let mut methods: HashSet<(&str, &[String])> = HashSet::new();
        let mut visited: HashSet<ElementId> = HashSet::new();
        let mut current = Some(id);
        let mut inherited = false;

        while let Some(ty) = current {
            if !visited.insert(ty) {
                return Err(SymbolError::SuperclassCycle {
                    name: self.qualified_name(id),
                });
            }
            for &member in &self.elements[ty].enclosed {
                let element = &self.elements[member];
                match element.kind {
                    ElementKindId::Constructor if inherited => continue,
                    ElementKindId::Method => {
                        if !methods.insert((element.name.as_str(), element.parameters.as_slice())) && inherited {
                            continue;
                        }
                    }
                    _ => {}
                }
                members.push(member);
            }
            current = self.elements[ty].superclass;
            inherited = true;
        }

        Ok(members)
    }
}
