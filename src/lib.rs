#![forbid(unsafe_code)]
//! aptgen: annotation-driven companion source generation
//!
//! Works over an already resolved symbol model supplied by a build host. Elements carrying a marker annotation are
//! described by naming convention and a companion `<Name>Generated` source is produced for each of them.
//!
//! - `frontend`: the symbol model, its JSON loader, and metadata extraction.
//! - `backend`: source rendering and the artifact lifecycle.
//! - `host`: the file store, diagnostic sink and round model a host provides.
//! - `processor`: the observer and generator strategies.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `backend` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a bug (logic error), use `.expect("INVARIANT: reason")` with a clear
//!   explanation.

pub mod backend;
pub mod cli;
pub mod config;
pub mod frontend;
pub mod host;
pub mod processor;
pub mod version;

pub use frontend::metadata::{ElementMetadata, ExtractionError, extract};
pub use frontend::symbols;

pub use backend::artifact::{ArtifactTarget, GeneratedArtifact, PublishError, publish};
pub use backend::codegen::{FieldNamePolicy, GenerationError, generate};

pub use config::ProcessorConfig;
pub use host::round::RoundDriver;
pub use processor::{Claim, Processor};
