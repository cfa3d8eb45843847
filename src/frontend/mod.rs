//! aptgen frontend
//!
//! This module contains the read side of processing:
//! - `symbols`: the host-owned symbol model and the `Elements` capability trait
//! - `loader`: building a symbol model from its JSON description
//! - `metadata`: describing one annotated element by naming convention

pub mod loader;
pub mod metadata;
pub mod symbols;
