//! aptgen vocabulary registries.
//!
//! Callers work with stable IDs (e.g. [`element_kind::ElementKindId`]) and look up spellings via the registry tables
//! instead of comparing strings ad hoc.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no symbol-model types, no IO, no side effects.
//!
//! ## Examples
//! ```rust
//! use aptgen_core::lang::element_kind::{self, ElementKindId};
//!
//! assert_eq!(element_kind::from_str("CLASS"), Some(ElementKindId::Class));
//! assert_eq!(element_kind::as_str(ElementKindId::Method), "METHOD");
//! ```

pub mod conventions;
pub mod element_kind;
pub mod java_keywords;
