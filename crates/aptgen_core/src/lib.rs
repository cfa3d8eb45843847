//! Provide the shared vocabulary and naming conventions for the aptgen annotation processors.
//!
//! This crate is intentionally small and dependency-free. It holds the deterministic rules that the extractor, the
//! code generator and the artifact lifecycle all have to agree on:
//! - which member names count as getters and which field name each getter turns into,
//! - how a generated type is named from the annotated type,
//! - what a valid identifier / qualified name looks like in the generated language,
//! - the canonical spellings of element kinds.
//!
//! ## Notes
//!
//! - This is a “semantic core” crate: **no IO**, no global state, and no symbol-model types.

pub mod lang;
pub mod naming;
