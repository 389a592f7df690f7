//! Source-position bookkeeping.
//!
//! A [`FileLocation`] is a plain, immutable value: it records where a lexeme
//! was found, not how to get there. The cursor that walks raw source bytes
//! and advances line/column/tab state lives in `kcc-pp`; this type only
//! stores the result of that advancing.

use std::fmt;
use std::rc::Rc;

/// Column width a tab character advances to the next multiple of.
pub const TAB_WIDTH: usize = 4;

/// A single point (plus a run length) in a source file.
///
/// `line` is 1-based. `column` is 0-based. `lexeme_length` is the number of
/// characters the associated lexeme spans starting at `column`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileLocation {
    file_name: Rc<str>,
    line: u32,
    column: u32,
    lexeme_length: u32,
}

impl FileLocation {
    /// Builds a location from already-computed coordinates.
    pub fn new(file_name: Rc<str>, line: u32, column: u32, lexeme_length: u32) -> Self {
        Self {
            file_name,
            line,
            column,
            lexeme_length,
        }
    }

    /// A zero-length location at the start of `file_name`, used for
    /// diagnostics that aren't anchored to a specific lexeme (e.g. "file
    /// ended inside a conditional block").
    pub fn start_of_file(file_name: Rc<str>) -> Self {
        Self::new(file_name, 1, 0, 0)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn lexeme_length(&self) -> u32 {
        self.lexeme_length
    }

    /// Column one past the end of the lexeme, for callers that want a
    /// half-open range rather than a start + length pair.
    pub fn end_column(&self) -> u32 {
        self.column + self.lexeme_length
    }

    /// Advances `column` past a tab character: rounds up to the next
    /// multiple of [`TAB_WIDTH`].
    pub fn tab_stop(column: u32) -> u32 {
        (column / TAB_WIDTH as u32 + 1) * TAB_WIDTH as u32
    }

    /// Returns a copy of this location with `lexeme_length` replaced.
    pub fn with_length(&self, lexeme_length: u32) -> Self {
        Self {
            file_name: Rc::clone(&self.file_name),
            line: self.line,
            column: self.column,
            lexeme_length,
        }
    }
}

impl fmt::Display for FileLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file_name, self.line, self.column)
    }
}
