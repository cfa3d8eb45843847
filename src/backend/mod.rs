//! aptgen backend
//!
//! This module turns element metadata into generated sources and writes them to the host file store.
//!
//! The pipeline is:
//! 1. `ElementMetadata` from the frontend → field-name check → rendered source text
//! 2. Stale artifact at the target coordinates is removed
//! 3. The new source file is created and written through the `Filer`
//!
//! ## Module Organization
//!
//! - `java_emitter.rs` - Low-level source string builder
//! - `codegen.rs` - Companion type rendering and field-name policy
//! - `artifact.rs` - Target coordinates and delete-before-create publishing

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod artifact;
pub mod codegen;
pub mod java_emitter;

pub use artifact::{ArtifactTarget, GeneratedArtifact};
pub use codegen::generate;
