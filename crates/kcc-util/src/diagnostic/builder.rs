//! Fluent construction of [`Diagnostic`] values.

use super::{Diagnostic, DiagnosticCode, DiagnosticKind, Handler};
use crate::location::FileLocation;

/// A single line of source quoted underneath a diagnostic, with a caret and
/// tilde underline spanning the offending lexeme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSnippet {
    pub line: String,
    pub line_number: u32,
    pub start_column: u32,
    pub end_column: u32,
}

impl SourceSnippet {
    pub fn new(line: impl Into<String>, line_number: u32, start_column: u32, end_column: u32) -> Self {
        Self {
            line: line.into(),
            line_number,
            start_column,
            end_column,
        }
    }

    /// A snippet that underlines a single point (a one-character span).
    pub fn point(line: impl Into<String>, line_number: u32, column: u32) -> Self {
        Self::new(line, line_number, column, column + 1)
    }

    /// Renders the quoted line followed by a caret+tilde underline.
    pub fn format(&self) -> String {
        let start = self.start_column as usize;
        let width = (self.end_column.saturating_sub(self.start_column)).max(1) as usize;
        let mut underline = " ".repeat(start);
        underline.push('^');
        underline.push_str(&"~".repeat(width.saturating_sub(1)));
        format!("{}\n{}", self.line, underline)
    }
}

/// Fluent builder for a [`Diagnostic`].
pub struct DiagnosticBuilder {
    kind: DiagnosticKind,
    message: String,
    location: Option<FileLocation>,
    code: Option<DiagnosticCode>,
    notes: Vec<String>,
    helps: Vec<String>,
    snippets: Vec<SourceSnippet>,
}

impl DiagnosticBuilder {
    fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: None,
            code: None,
            notes: Vec::new(),
            helps: Vec::new(),
            snippets: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, message)
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Message, message)
    }

    pub fn code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn at(mut self, location: FileLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.helps.push(help.into());
        self
    }

    pub fn with_note(self, note: impl Into<String>) -> Self {
        self.note(note)
    }

    pub fn with_help(self, help: impl Into<String>) -> Self {
        self.help(help)
    }

    pub fn snippet(mut self, snippet: SourceSnippet) -> Self {
        self.snippets.push(snippet);
        self
    }

    /// Finishes the diagnostic. `location` must have been set; this is a
    /// precondition of every call site in the front-end (every token has a
    /// location), so an unset location is a programmer error.
    pub fn build(self) -> Diagnostic {
        Diagnostic {
            kind: self.kind,
            message: self.message,
            location: self.location.expect("diagnostic built without a location"),
            code: self.code,
            notes: self.notes,
            helps: self.helps,
            snippets: self.snippets,
        }
    }

    /// Finishes the diagnostic and appends it to `handler`.
    pub fn emit(self, handler: &Handler) {
        handler.emit_diagnostic(self.build());
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
    fn snippet_point_underlines_single_column() {
        let s = SourceSnippet::point("int x;", 1, 4);
        assert_eq!(s.format(), "int x;\n    ^");
    }

    #[test]
    fn snippet_format_underlines_full_lexeme_width() {
        let s = SourceSnippet::new("int x;", 1, 4, 5);
        assert_eq!(s.format(), "int x;\n    ^");
    }

    #[test]
    fn builder_sets_kind_and_message() {
        let diag = DiagnosticBuilder::error("bad token").at(loc()).build();
        assert_eq!(diag.kind, DiagnosticKind::Error);
        assert_eq!(diag.message, "bad token");
    }

    #[test]
    fn builder_collects_notes_and_helps_in_order() {
        let diag = DiagnosticBuilder::error("x")
            .at(loc())
            .note("n1")
            .note("n2")
            .help("h1")
            .build();
        assert_eq!(diag.notes, vec!["n1", "n2"]);
        assert_eq!(diag.helps, vec!["h1"]);
    }

    #[test]
    #[should_panic]
    fn builder_panics_without_location() {
        DiagnosticBuilder::error("x").build();
    }

    #[test]
    fn builder_emit_appends_to_handler() {
        let handler = Handler::new();
        DiagnosticBuilder::error("oops")
            .at(loc())
            .code(DiagnosticCode::ErrInvalidConstant)
            .emit(&handler);
        assert_eq!(handler.error_count(), 1);
    }
}
