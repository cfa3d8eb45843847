//! Diagnostic sink for the build user
//!
//! Processors report findings and failures through a [`Messager`] as `(severity, text)` pairs. This channel is separate
//! from `tracing`: it is what the person running the build reads.

use std::fmt;
use std::io::{self, Write};

/// Severity of one diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    Note,
    Warning,
    Error,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Note => write!(f, "note"),
            DiagnosticKind::Warning => write!(f, "warning"),
            DiagnosticKind::Error => write!(f, "error"),
        }
    }
}

/// Host diagnostic channel.
pub trait Messager {
    fn print_message(&mut self, kind: DiagnosticKind, message: &str);
}

/// Stores every message, for tests and for callers that render later.
#[derive(Debug, Default)]
pub struct CollectingMessager {
    messages: Vec<(DiagnosticKind, String)>,
}

impl CollectingMessager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[(DiagnosticKind, String)] {
        &self.messages
    }

    fn of_kind(&self, kind: DiagnosticKind) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, m)| m.as_str())
            .collect()
    }

    pub fn notes(&self) -> Vec<&str> {
        self.of_kind(DiagnosticKind::Note)
    }

    pub fn errors(&self) -> Vec<&str> {
        self.of_kind(DiagnosticKind::Error)
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl Messager for CollectingMessager {
    fn print_message(&mut self, kind: DiagnosticKind, message: &str) {
        self.messages.push((kind, message.to_string()));
    }
}

/// Renders `note:` / `error:` blocks to a terminal stream and counts errors.
pub struct ConsoleMessager<W: Write> {
    out: W,
    color: bool,
    error_count: usize,
}

impl ConsoleMessager<io::Stderr> {
    /// Coloured output on stderr.
    pub fn stderr() -> Self {
        Self::new(io::stderr(), true)
    }
}

impl<W: Write> ConsoleMessager<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            error_count: 0,
        }
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Messager for ConsoleMessager<W> {
    fn print_message(&mut self, kind: DiagnosticKind, message: &str) {
        if kind == DiagnosticKind::Error {
            self.error_count += 1;
        }

        let (bold, reset) = if self.color { ("\x1b[1m", "\x1b[0m") } else { ("", "") };
        let kind_color = match (self.color, kind) {
            (false, _) => "",
            (true, DiagnosticKind::Note) => "\x1b[36m",
            (true, DiagnosticKind::Warning) => "\x1b[33m",
            (true, DiagnosticKind::Error) => "\x1b[31m",
        };

        // Write failures on the diagnostic stream are ignored.
        let _ = writeln!(self.out, "{bold}{kind_color}{kind}{reset}{bold}:{reset} {message}");
    }
}
