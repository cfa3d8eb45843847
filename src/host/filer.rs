//! File-store contract for generated sources
//!
//! Generated artifacts are addressed by `(package, name)` coordinates. A [`Filer`] resolves those coordinates to a
//! [`FileObject`], answers whether something already exists there, deletes it, and opens new source files for
//! writing. Writers are scoped resources: they are released when dropped, on every exit path.
//!
//! Two stores are provided:
//! - [`FsFiler`] writes under a root directory (`<root>/<package as dirs>/<Name>.java`).
//! - [`MemoryFiler`] keeps contents in memory and journals every operation, for tests and dry runs.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use aptgen_core::lang::conventions::SOURCE_EXTENSION;
use aptgen_core::naming;
use miette::Diagnostic;
use thiserror::Error;

use crate::frontend::symbols::ElementId;

/// Errors raised by a file store.
#[derive(Debug, Error, Diagnostic)]
pub enum FilerError {
    #[error("'{0}' is not a valid name for a generated source")]
    #[diagnostic(code(aptgen::filer::invalid_name))]
    InvalidName(String),

    #[error("'{}' already exists", path.display())]
    #[diagnostic(
        code(aptgen::filer::already_exists),
        help("stale artifacts must be removed before the source file is recreated")
    )]
    AlreadyExists { path: PathBuf },

    #[error("I/O error on '{}'", path.display())]
    #[diagnostic(code(aptgen::filer::io))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A resolved location in a file store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FileObject {
    path: PathBuf,
}

impl FileObject {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for FileObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Host file-creation and resource-lookup facility.
pub trait Filer {
    /// Resolve `relative_name` inside `package` without touching the store.
    fn get_resource(&self, package: &str, relative_name: &str) -> Result<FileObject, FilerError>;

    /// Whether a file currently exists at `file`.
    fn exists(&self, file: &FileObject) -> bool;

    fn delete(&mut self, file: &FileObject) -> Result<(), FilerError>;

    /// Open a new source file for the type `qualified_name`, generated on behalf of `originating`.
    ///
    /// Fails with [`FilerError::AlreadyExists`] if the store already holds that file.
    fn create_source_file(
        &mut self,
        qualified_name: &str,
        originating: ElementId,
    ) -> Result<Box<dyn Write + '_>, FilerError>;
}

/// Split `package.Name` into its package (possibly empty) and simple name.
fn split_qualified(qualified_name: &str) -> Result<(&str, &str), FilerError> {
    if !naming::is_qualified_name(qualified_name) {
        return Err(FilerError::InvalidName(qualified_name.to_string()));
    }
    Ok(qualified_name.rsplit_once('.').unwrap_or(("", qualified_name)))
}

fn relative_path(package: &str, relative_name: &str) -> Result<PathBuf, FilerError> {
    let package_ok = package.is_empty() || naming::is_qualified_name(package);
    let name_ok = !relative_name.is_empty() && !relative_name.contains(['/', '\\']) && relative_name != "..";
    if !package_ok || !name_ok {
        return Err(FilerError::InvalidName(naming::qualify(package, relative_name)));
    }
    let mut path: PathBuf = package.split('.').filter(|s| !s.is_empty()).collect();
    path.push(relative_name);
    Ok(path)
}

// ============================================================================
// Directory-backed store
// ============================================================================

/// File store rooted at a directory.
#[derive(Debug)]
pub struct FsFiler {
    root: PathBuf,
    created: Vec<(FileObject, ElementId)>,
}

impl FsFiler {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            created: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Files created through this filer, with the element each was generated for.
    pub fn created(&self) -> &[(FileObject, ElementId)] {
        &self.created
    }
}

impl Filer for FsFiler {
    fn get_resource(&self, package: &str, relative_name: &str) -> Result<FileObject, FilerError> {
        Ok(FileObject::new(self.root.join(relative_path(package, relative_name)?)))
    }

    fn exists(&self, file: &FileObject) -> bool {
        file.path().is_file()
    }

    fn delete(&mut self, file: &FileObject) -> Result<(), FilerError> {
        fs::remove_file(file.path()).map_err(|source| FilerError::Io {
            path: file.path().to_path_buf(),
            source,
        })
    }

    fn create_source_file(
        &mut self,
        qualified_name: &str,
        originating: ElementId,
    ) -> Result<Box<dyn Write + '_>, FilerError> {
        let (package, name) = split_qualified(qualified_name)?;
        let file = self.get_resource(package, &format!("{name}{SOURCE_EXTENSION}"))?;
        let path = file.path().to_path_buf();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| FilerError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let handle = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|source| match source.kind() {
                io::ErrorKind::AlreadyExists => FilerError::AlreadyExists { path: path.clone() },
                _ => FilerError::Io {
                    path: path.clone(),
                    source,
                },
            })?;

        tracing::debug!(path = %path.display(), originating, "created source file");
        self.created.push((file, originating));
        Ok(Box::new(BufWriter::new(handle)))
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// One operation observed by a [`MemoryFiler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilerOp {
    Lookup(PathBuf),
    Delete(PathBuf),
    Create(PathBuf),
    Write(PathBuf),
    Close(PathBuf),
}

/// In-memory file store with an operation journal and fault injection.
#[derive(Debug, Default)]
pub struct MemoryFiler {
    files: BTreeMap<PathBuf, String>,
    journal: RefCell<Vec<FilerOp>>,
    fail_lookups: bool,
    fail_creates: bool,
    fail_writes: bool,
}

impl MemoryFiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a source left behind by an earlier run.
    pub fn with_source(mut self, qualified_name: &str, contents: &str) -> Self {
        if let Ok(path) = Self::source_path(qualified_name) {
            self.files.insert(path, contents.to_string());
        }
        self
    }

    /// Make every resource lookup fail.
    pub fn fail_lookups(&mut self, fail: bool) {
        self.fail_lookups = fail;
    }

    /// Make every source-file creation fail.
    pub fn fail_creates(&mut self, fail: bool) {
        self.fail_creates = fail;
    }

    /// Make every write on newly created files fail.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Contents of the generated source for `qualified_name`, if present.
    pub fn source(&self, qualified_name: &str) -> Option<&str> {
        let path = Self::source_path(qualified_name).ok()?;
        self.files.get(&path).map(String::as_str)
    }

    pub fn files(&self) -> &BTreeMap<PathBuf, String> {
        &self.files
    }

    /// Every operation observed so far, in order.
    pub fn journal(&self) -> Vec<FilerOp> {
        self.journal.borrow().clone()
    }

    pub fn clear_journal(&mut self) {
        self.journal.get_mut().clear();
    }

    fn source_path(qualified_name: &str) -> Result<PathBuf, FilerError> {
        let (package, name) = split_qualified(qualified_name)?;
        relative_path(package, &format!("{name}{SOURCE_EXTENSION}"))
    }
}

impl Filer for MemoryFiler {
    fn get_resource(&self, package: &str, relative_name: &str) -> Result<FileObject, FilerError> {
        let path = relative_path(package, relative_name)?;
        self.journal.borrow_mut().push(FilerOp::Lookup(path.clone()));
        if self.fail_lookups {
            return Err(FilerError::Io {
                path,
                source: io::Error::other("resource lookup unavailable"),
            });
        }
        Ok(FileObject::new(path))
    }

    fn exists(&self, file: &FileObject) -> bool {
        self.files.contains_key(file.path())
    }

    fn delete(&mut self, file: &FileObject) -> Result<(), FilerError> {
        self.journal.get_mut().push(FilerOp::Delete(file.path().to_path_buf()));
        match self.files.remove(file.path()) {
            Some(_) => Ok(()),
            None => Err(FilerError::Io {
                path: file.path().to_path_buf(),
                source: io::Error::from(io::ErrorKind::NotFound),
            }),
        }
    }

    fn create_source_file(
        &mut self,
        qualified_name: &str,
        _originating: ElementId,
    ) -> Result<Box<dyn Write + '_>, FilerError> {
        let path = Self::source_path(qualified_name)?;
        if self.files.contains_key(&path) {
            return Err(FilerError::AlreadyExists { path });
        }
        if self.fail_creates {
            return Err(FilerError::Io {
                path,
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            });
        }
        self.journal.get_mut().push(FilerOp::Create(path.clone()));
        self.files.insert(path.clone(), String::new());

        let MemoryFiler {
            files,
            journal,
            fail_writes,
            ..
        } = self;
        Ok(Box::new(MemoryWriter {
            path,
            buffer: Vec::new(),
            files,
            journal,
            fail: *fail_writes,
        }))
    }
}

/// Writer handed out by [`MemoryFiler`]; commits its buffer on drop.
struct MemoryWriter<'a> {
    path: PathBuf,
    buffer: Vec<u8>,
    files: &'a mut BTreeMap<PathBuf, String>,
    journal: &'a RefCell<Vec<FilerOp>>,
    fail: bool,
}

impl Write for MemoryWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.journal.borrow_mut().push(FilerOp::Write(self.path.clone()));
        if self.fail {
            return Err(io::Error::other("injected write failure"));
        }
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for MemoryWriter<'_> {
    fn drop(&mut self) {
        let contents = String::from_utf8_lossy(&self.buffer).into_owned();
        self.files.insert(self.path.clone(), contents);
        self.journal.borrow_mut().push(FilerOp::Close(self.path.clone()));
    }
}
