//! Generated artifact lifecycle
//!
//! Publishing an artifact is delete-before-create:
//!
//! 1. resolve the target coordinates `(package, <Name>Generated.java)` in the file store;
//! 2. if a file already exists there (left by an earlier round or build), delete it;
//! 3. create the new source file on behalf of the originating element and write the body.
//!
//! The writer is released when it goes out of scope, whether the write succeeded or not. There is no content diff:
//! an existing artifact is always replaced.

use std::io::{self, Write};
use std::path::PathBuf;

use aptgen_core::lang::conventions::SOURCE_EXTENSION;
use aptgen_core::naming;
use miette::Diagnostic;
use thiserror::Error;

use super::codegen::{self, FieldNamePolicy, GenerationError};
use crate::frontend::metadata::ElementMetadata;
use crate::frontend::symbols::ElementId;
use crate::host::filer::{FileObject, Filer, FilerError};

/// Where a generated artifact lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactTarget {
    /// Package of the generated type, `""` for the unnamed package.
    pub package: String,
    /// Simple name of the generated type.
    pub name: String,
}

impl ArtifactTarget {
    /// The companion of the described element: same package, `<SimpleName>Generated`.
    pub fn for_metadata(metadata: &ElementMetadata) -> Self {
        Self {
            package: metadata.enclosing_package.clone(),
            name: naming::generated_type_name(&metadata.simple_name),
        }
    }

    pub fn qualified_name(&self) -> String {
        naming::qualify(&self.package, &self.name)
    }

    /// File name inside the package directory.
    pub fn relative_name(&self) -> String {
        format!("{}{SOURCE_EXTENSION}", self.name)
    }
}

/// A rendered artifact waiting to be published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub target: ArtifactTarget,
    pub body: String,
}

impl GeneratedArtifact {
    /// Validate field names under `policy` and render the companion source.
    pub fn render(metadata: &ElementMetadata, policy: FieldNamePolicy) -> Result<Self, GenerationError> {
        let target = ArtifactTarget::for_metadata(metadata);
        let body = codegen::generate_checked(metadata, &target.name, policy)?;
        Ok(Self { target, body })
    }
}

/// A file-store failure while publishing one artifact.
#[derive(Debug, Error, Diagnostic)]
pub enum PublishError {
    #[error("failed to look up the previous artifact for '{target}'")]
    #[diagnostic(code(aptgen::publish::lookup))]
    Lookup {
        target: String,
        #[source]
        source: FilerError,
    },

    #[error("failed to delete stale artifact '{resource}'")]
    #[diagnostic(code(aptgen::publish::delete))]
    Delete {
        resource: FileObject,
        #[source]
        source: FilerError,
    },

    #[error("failed to create source file for '{target}'")]
    #[diagnostic(code(aptgen::publish::create))]
    Create {
        target: String,
        #[source]
        source: FilerError,
    },

    #[error("failed to write source file for '{target}'")]
    #[diagnostic(code(aptgen::publish::write))]
    Write {
        target: String,
        #[source]
        source: io::Error,
    },
}

/// What the stale-artifact check found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleCheck {
    /// Resolved location of the artifact.
    pub resource: FileObject,
    /// Whether a previous artifact existed there (and was deleted).
    pub existed: bool,
}

/// Outcome of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub stale: StaleCheck,
    pub qualified_name: String,
}

impl PublishReport {
    pub fn path(&self) -> PathBuf {
        self.stale.resource.path().to_path_buf()
    }
}

/// Delete whatever a previous run left at `target`'s coordinates.
pub fn remove_stale(filer: &mut dyn Filer, target: &ArtifactTarget) -> Result<StaleCheck, PublishError> {
    let resource = filer
        .get_resource(&target.package, &target.relative_name())
        .map_err(|source| PublishError::Lookup {
            target: target.qualified_name(),
            source,
        })?;

    let existed = filer.exists(&resource);
    if existed {
        filer.delete(&resource).map_err(|source| PublishError::Delete {
            resource: resource.clone(),
            source,
        })?;
        tracing::debug!(resource = %resource, "deleted stale artifact");
    }
    Ok(StaleCheck { resource, existed })
}

/// Replace the artifact at `artifact.target` with `artifact.body`.
#[tracing::instrument(skip_all, fields(artifact = %artifact.target.qualified_name(), source_element = source_element))]
pub fn publish(
    filer: &mut dyn Filer,
    artifact: &GeneratedArtifact,
    source_element: ElementId,
) -> Result<PublishReport, PublishError> {
    let stale = remove_stale(filer, &artifact.target)?;
    let qualified_name = artifact.target.qualified_name();

    let mut writer = filer
        .create_source_file(&qualified_name, source_element)
        .map_err(|source| PublishError::Create {
            target: qualified_name.clone(),
            source,
        })?;
    let written = writer
        .write_all(artifact.body.as_bytes())
        .and_then(|()| writer.flush());
    drop(writer);

    written.map_err(|source| PublishError::Write {
        target: qualified_name.clone(),
        source,
    })?;

    tracing::debug!(artifact = %qualified_name, replaced = stale.existed, "published artifact");
    Ok(PublishReport { stale, qualified_name })
}
