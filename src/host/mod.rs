//! Host side of the processing contract
//!
//! The pieces a build host supplies to processors: a file store, a diagnostic sink, and the round model that decides
//! which annotated elements each processor sees.

pub mod filer;
pub mod messager;
pub mod round;

use std::collections::BTreeMap;

use crate::frontend::symbols::Elements;
use filer::Filer;
use messager::Messager;

/// Host facilities handed to a processor for one invocation.
pub struct ProcessingEnvironment<'a> {
    pub elements: &'a dyn Elements,
    pub filer: &'a mut dyn Filer,
    pub messager: &'a mut dyn Messager,
    /// Host options (`-A key=value`).
    pub options: &'a BTreeMap<String, String>,
}
