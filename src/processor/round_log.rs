//! Per-round diagnostic buffers
//!
//! A [`RoundLog`] lives for one processor invocation. Entries accumulate in an info buffer and an error buffer and are
//! forwarded to the host at the end of the round as at most one note and one error, never one message per element.

use std::error::Error;
use std::fmt::Write as _;

use aptgen_core::lang::conventions::{ERROR_BANNER, NOTE_BANNER};

use crate::host::messager::{DiagnosticKind, Messager};

/// Info and error text collected during one round.
#[derive(Debug, Default)]
pub struct RoundLog {
    info: String,
    errors: String,
}

impl RoundLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line to the info buffer.
    pub fn info(&mut self, line: impl AsRef<str>) {
        self.info.push_str(line.as_ref());
        self.info.push('\n');
    }

    /// Append text to the info buffer as is.
    pub fn append_info(&mut self, text: &str) {
        self.info.push_str(text);
    }

    /// Append one line to the error buffer.
    pub fn error(&mut self, line: impl AsRef<str>) {
        self.errors.push_str(line.as_ref());
        self.errors.push('\n');
    }

    /// Record `err` and every error in its `source()` chain.
    pub fn record_error(&mut self, err: &dyn Error) {
        self.error(err.to_string());
        let mut cause = err.source();
        while let Some(inner) = cause {
            let _ = writeln!(self.errors, "  caused by: {inner}");
            cause = inner.source();
        }
    }

    pub fn info_text(&self) -> &str {
        &self.info
    }

    pub fn error_text(&self) -> &str {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.info.is_empty() && self.errors.is_empty()
    }

    /// Forward both buffers to `messager`, consuming the log.
    pub fn flush(self, messager: &mut dyn Messager) {
        flush(&self.info, &self.errors, messager);
    }
}

/// Emit one note for non-empty `info` and one error for non-empty `errors`.
pub fn flush(info: &str, errors: &str, messager: &mut dyn Messager) {
    if !info.is_empty() {
        messager.print_message(DiagnosticKind::Note, &format!("{NOTE_BANNER}\n{info}"));
    }
    if !errors.is_empty() {
        messager.print_message(DiagnosticKind::Error, &format!("{ERROR_BANNER}\n{errors}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::messager::CollectingMessager;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("outer")]
    struct Outer(#[source] Middle);

    #[derive(Debug, Error)]
    #[error("middle")]
    struct Middle(#[source] std::io::Error);

    #[test]
    fn test_empty_log_emits_nothing() {
        let mut messager = CollectingMessager::new();
        RoundLog::new().flush(&mut messager);
        assert!(messager.messages().is_empty());
    }

    #[test]
    fn test_one_message_per_buffer() {
        let mut log = RoundLog::new();
        log.info("first");
        log.info("second");
        log.error("broken");
        log.error("also broken");

        let mut messager = CollectingMessager::new();
        log.flush(&mut messager);
        assert_eq!(messager.notes(), vec!["🚀\nfirst\nsecond\n"]);
        assert_eq!(messager.errors(), vec!["🔥\nbroken\nalso broken\n"]);
    }

    #[test]
    fn test_info_only() {
        let mut messager = CollectingMessager::new();
        flush("x", "", &mut messager);
        assert_eq!(messager.messages(), [(DiagnosticKind::Note, "🚀\nx".to_string())]);
    }

    #[test]
    fn test_error_only() {
        let mut messager = CollectingMessager::new();
        flush("", "x", &mut messager);
        assert_eq!(messager.messages(), [(DiagnosticKind::Error, "🔥\nx".to_string())]);
    }

    #[test]
    fn test_record_error_includes_cause_chain() {
        let mut log = RoundLog::new();
        let err = Outer(Middle(std::io::Error::other("disk full")));
        log.record_error(&err);
        assert_eq!(
            log.error_text(),
            "outer\n  caused by: middle\n  caused by: disk full\n"
        );
        assert!(log.info_text().is_empty());
        assert!(!log.is_empty());
    }
}
