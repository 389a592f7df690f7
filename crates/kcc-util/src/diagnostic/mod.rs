//! Diagnostic bookkeeping.
//!
//! Every recogniser and parser in the pipeline appends diagnostics as it
//! goes rather than unwinding; the [`Handler`] is an append-only, ordered
//! log shared (via `&Handler`, never `&mut`) by every stage of one
//! compilation unit. Diagnostics are rendered in the exact order they were
//! appended, which is lexical, then syntactic, then executed — see
//! [`Handler::render_all`].
//!
//! # Examples
//!
//! ```
//! use kcc_util::diagnostic::{DiagnosticBuilder, DiagnosticCode, Handler};
//! use kcc_util::FileLocation;
//! use std::rc::Rc;
//!
//! let handler = Handler::new();
//! let loc = FileLocation::new(Rc::from("a.c"), 1, 0, 1);
//! DiagnosticBuilder::error("stray '9' in octal constant")
//!     .code(DiagnosticCode::ErrInvalidConstant)
//!     .at(loc)
//!     .emit(&handler);
//!
//! assert!(handler.has_errors());
//! ```

mod builder;
mod codes;

pub use builder::{DiagnosticBuilder, SourceSnippet};
pub use codes::DiagnosticCode;

use crate::location::FileLocation;
use std::cell::RefCell;
use std::fmt;

/// ANSI colour codes used by [`Handler::render_all`].
mod ansi {
    pub const RED: &str = "\x1B[31m";
    pub const GREEN: &str = "\x1B[32m";
    pub const YELLOW: &str = "\x1B[33m";
    pub const RESET: &str = "\x1B[0m";
}

/// Severity of a diagnostic. Colours mirror the severity when rendered:
/// red errors, green warnings, yellow messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    Error,
    Warning,
    Message,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Error => write!(f, "error"),
            DiagnosticKind::Warning => write!(f, "warning"),
            DiagnosticKind::Message => write!(f, "message"),
        }
    }
}

/// A single bookkept diagnostic, bound to a source location.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub location: FileLocation,
    pub code: Option<DiagnosticCode>,
    pub notes: Vec<String>,
    pub helps: Vec<String>,
    pub snippets: Vec<SourceSnippet>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, location: FileLocation) -> Self {
        Self {
            kind,
            message: message.into(),
            location,
            code: None,
            notes: Vec::new(),
            helps: Vec::new(),
            snippets: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>, location: FileLocation) -> Self {
        Self::new(DiagnosticKind::Error, message, location)
    }

    pub fn warning(message: impl Into<String>, location: FileLocation) -> Self {
        Self::new(DiagnosticKind::Warning, message, location)
    }

    pub fn with_code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Renders one line in the form
    /// `kcc:<kind>:err<N>:<file>:<line>:<col>:<message>`, with the source
    /// line and a caret+tilde underline appended if a snippet is present.
    pub fn render(&self) -> String {
        let colour = match self.kind {
            DiagnosticKind::Error => ansi::RED,
            DiagnosticKind::Warning => ansi::GREEN,
            DiagnosticKind::Message => ansi::YELLOW,
        };
        let code_number = self.code.map(DiagnosticCode::number).unwrap_or(0);
        let mut out = format!(
            "{colour}kcc:{kind}:err{code}:{file}:{line}:{col}:{message}{reset}",
            colour = colour,
            kind = self.kind,
            code = code_number,
            file = self.location.file_name(),
            line = self.location.line(),
            col = self.location.column(),
            message = self.message,
            reset = ansi::RESET,
        );
        for snippet in &self.snippets {
            out.push('\n');
            out.push_str(&snippet.format());
        }
        out
    }
}

/// Ordered, append-only collector of diagnostics for one compilation unit.
///
/// Owned by exactly one compilation; not `Sync`, interior mutability via
/// `RefCell` since the whole pipeline runs on one thread.
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
    panic_on_error: bool,
}

impl Handler {
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
            panic_on_error: false,
        }
    }

    /// A handler that panics the moment an error is emitted; useful in
    /// tests that want to assert no error occurs at all.
    pub fn new_panicking() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
            panic_on_error: true,
        }
    }

    pub fn emit_diagnostic(&self, diagnostic: Diagnostic) {
        if self.panic_on_error && diagnostic.kind == DiagnosticKind::Error {
            panic!("diagnostic error: {}", diagnostic.message);
        }
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|d| d.kind == DiagnosticKind::Error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.kind == DiagnosticKind::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.kind == DiagnosticKind::Warning)
            .count()
    }

    /// Snapshot of every diagnostic appended so far, in append order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    pub fn clear(&self) {
        self.diagnostics.borrow_mut().clear();
    }

    /// Renders every diagnostic, in append order, joined by blank lines.
    pub fn render_all(&self) -> String {
        self.diagnostics
            .borrow()
            .iter()
            .map(Diagnostic::render)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Default for Handler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn loc() -> FileLocation {
        FileLocation::new(Rc::from("a.c"), 1, 0, 1)
    }

    #[test]
    fn kind_display_matches_lowercase_names() {
        assert_eq!(format!("{}", DiagnosticKind::Error), "error");
        assert_eq!(format!("{}", DiagnosticKind::Warning), "warning");
        assert_eq!(format!("{}", DiagnosticKind::Message), "message");
    }

    #[test]
    fn diagnostic_error_sets_kind() {
        let diag = Diagnostic::error("bad", loc());
        assert_eq!(diag.kind, DiagnosticKind::Error);
    }

    #[test]
    fn handler_starts_empty() {
        let handler = Handler::new();
        assert!(!handler.has_errors());
        assert_eq!(handler.error_count(), 0);
        assert_eq!(handler.warning_count(), 0);
    }

    #[test]
    fn handler_emit_diagnostic_tracks_counts() {
        let handler = Handler::new();
        handler.emit_diagnostic(Diagnostic::error("e", loc()));
        handler.emit_diagnostic(Diagnostic::warning("w", loc()));
        assert_eq!(handler.error_count(), 1);
        assert_eq!(handler.warning_count(), 1);
    }

    #[test]
    fn handler_preserves_append_order() {
        let handler = Handler::new();
        handler.emit_diagnostic(Diagnostic::error("first", loc()));
        handler.emit_diagnostic(Diagnostic::error("second", loc()));
        let diags = handler.diagnostics();
        assert_eq!(diags[0].message, "first");
        assert_eq!(diags[1].message, "second");
    }

    #[test]
    fn handler_clear_empties_the_log() {
        let handler = Handler::new();
        handler.emit_diagnostic(Diagnostic::error("e", loc()));
        handler.clear();
        assert!(!handler.has_errors());
    }

    #[test]
    fn handler_panicking_panics_on_error() {
        let handler = Handler::new_panicking();
        let result = std::panic::catch_unwind(|| {
            handler.emit_diagnostic(Diagnostic::error("boom", loc()));
        });
        assert!(result.is_err());
    }

    #[test]
    fn handler_panicking_allows_warnings() {
        let handler = Handler::new_panicking();
        handler.emit_diagnostic(Diagnostic::warning("fine", loc()));
        assert_eq!(handler.warning_count(), 1);
    }

    #[test]
    fn render_contains_code_file_line_column_and_message() {
        let diag = Diagnostic::error("stray 9 in octal constant", loc())
            .with_code(DiagnosticCode::ErrInvalidConstant);
        let rendered = diag.render();
        assert!(rendered.contains("kcc:error:err9:a.c:1:0:stray 9 in octal constant"));
        assert!(rendered.starts_with("\x1B[31m"));
        assert!(rendered.ends_with("\x1B[0m"));
    }

    #[test]
    fn render_warning_uses_green() {
        let diag = Diagnostic::warning("note", loc());
        assert!(diag.render().starts_with("\x1B[32m"));
    }

    #[test]
    fn render_appends_snippet_underline() {
        let diag = Diagnostic::error("bad", loc())
            .with_code(DiagnosticCode::ErrInvalidConstant);
        let mut diag = diag;
        diag.snippets.push(SourceSnippet::point("09", 1, 0));
        let rendered = diag.render();
        assert!(rendered.contains("09\n^"));
    }

    #[test]
    fn render_all_joins_in_append_order() {
        let handler = Handler::new();
        handler.emit_diagnostic(Diagnostic::error("a", loc()));
        handler.emit_diagnostic(Diagnostic::warning("b", loc()));
        let rendered = handler.render_all();
        let a_pos = rendered.find("a.c:1:0:a").unwrap();
        let b_pos = rendered.find("a.c:1:0:b").unwrap();
        assert!(a_pos < b_pos);
    }
}
