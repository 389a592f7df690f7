//! PP lexer (component 4): turns raw source characters into pp-tokens.
//!
//! Whitespace (space, tab, carriage return) and comments are consumed
//! between pp-tokens; newlines are not — they terminate the current line
//! and are surfaced to the parser as [`LexItem::NewLine`] rather than
//! being folded into a token's surrounding whitespace. Header-name
//! recognition is only attempted immediately after an `include` directive
//! keyword, matching the spec's note that `<...>`/`"..."` is ambiguous
//! with a relational-operator-and-string-literal reading everywhere else.

use kcc_util::diagnostic::DiagnosticBuilder;
use kcc_util::{DiagnosticCode, FileLocation, Handler, LexemaPool, PpForm, PpName, PreprocessingToken, Punctuator};
use std::rc::Rc;

/// One item of the flat pre-scan: either a classified pp-token or a
/// structural newline. Pretokenizing the whole file up front (rather than
/// re-driving character-level scanning with backtracking) lets the PP
/// parser's backtracking work purely over this array, which is where the
/// spec's work-stack discipline actually lives (§4.3, §9).
#[derive(Debug, Clone)]
pub enum LexItem {
    Token(PreprocessingToken),
    NewLine,
}

/// `LexItem::Token` plus whether it was preceded by intra-line whitespace,
/// which the parser needs exactly once: to tell a function-like macro's
/// `(` (no space before it) from an object-like replacement list that
/// happens to start with `(`.
struct ScannedToken {
    token: PreprocessingToken,
    space_before: bool,
}

pub struct PpLexOutput {
    pub items: Vec<LexItem>,
    pub space_before: Vec<bool>,
}

struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: u32,
    column: u32,
    file_name: Rc<str>,
    pool: &'a mut LexemaPool,
    handler: &'a Handler,
    expect_header_name: bool,
    after_hash_at_line_start: bool,
    at_line_start: bool,
}

/// Tokenises an entire translation unit.
pub fn tokenize(source: &str, file_name: Rc<str>, pool: &mut LexemaPool, handler: &Handler) -> PpLexOutput {
    let mut scanner = Scanner {
        bytes: source.as_bytes(),
        pos: 0,
        line: 1,
        column: 0,
        file_name,
        pool,
        handler,
        expect_header_name: false,
        after_hash_at_line_start: false,
        at_line_start: true,
    };
    let mut items = Vec::new();
    let mut space_before = Vec::new();
    loop {
        let had_space = scanner.skip_intraline_whitespace_and_comments();
        if scanner.at_eof() {
            let loc = scanner.location(0);
            let lexeme = scanner.pool.intern("");
            items.push(LexItem::Token(PreprocessingToken::new(
                lexeme,
                PpName::EndOfFile,
                loc,
                PpForm::EndOfFile,
            )));
            space_before.push(had_space);
            break;
        }
        if scanner.peek_byte() == Some(b'\n') {
            scanner.advance_byte();
            items.push(LexItem::NewLine);
            space_before.push(had_space);
            scanner.after_hash_at_line_start = false;
            scanner.at_line_start = true;
            continue;
        }
        let was_after_hash = scanner.after_hash_at_line_start;
        let scanned = scanner.scan_token(had_space);
        if was_after_hash && scanned.token.is_identifier_with_text(scanner.pool, "include") {
            scanner.expect_header_name = true;
        }
        items.push(LexItem::Token(scanned.token));
        space_before.push(scanned.space_before);
    }
    PpLexOutput { items, space_before }
}

impl<'a> Scanner<'a> {
    fn at_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn advance_byte(&mut self) -> Option<u8> {
        let b = self.peek_byte()?;
        self.pos += 1;
        match b {
            b'\n' => {
                self.line += 1;
                self.column = 0;
            }
            b'\t' => self.column = FileLocation::tab_stop(self.column),
            b'\r' => self.column = 0,
            _ => self.column += 1,
        }
        Some(b)
    }

    fn location(&self, len: usize) -> FileLocation {
        FileLocation::new(Rc::clone(&self.file_name), self.line, self.column, len as u32)
    }

    /// Builds a location anchored at a snapshotted `(line, column)` rather
    /// than the scanner's current position, for recognisers that take the
    /// coordinates before advancing past the lexeme (the location's column
    /// must be where the lexeme *starts*, per §3, not where it ends).
    fn location_at(&self, line: u32, column: u32, len: usize) -> FileLocation {
        FileLocation::new(Rc::clone(&self.file_name), line, column, len as u32)
    }

    /// Consumes spaces, tabs, carriage returns, block comments and line
    /// comments. Stops at (without consuming) a bare `\n` or EOF. Returns
    /// whether anything was actually skipped.
    fn skip_intraline_whitespace_and_comments(&mut self) -> bool {
        let start = self.pos;
        loop {
            match self.peek_byte() {
                Some(b' ') | Some(b'\t') | Some(b'\r') => {
                    self.advance_byte();
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while !self.at_eof() && self.peek_byte() != Some(b'\n') {
                        self.advance_byte();
                    }
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    self.advance_byte();
                    self.advance_byte();
                    loop {
                        if self.at_eof() {
                            DiagnosticBuilder::error("unterminated block comment")
                                .code(DiagnosticCode::ErrPpInvalidPunctuator)
                                .at(self.location(0))
                                .emit(self.handler);
                            break;
                        }
                        if self.peek_byte() == Some(b'*') && self.peek_at(1) == Some(b'/') {
                            self.advance_byte();
                            self.advance_byte();
                            break;
                        }
                        self.advance_byte();
                    }
                }
                _ => break,
            }
        }
        self.pos != start
    }

    fn scan_token(&mut self, space_before: bool) -> ScannedToken {
        let c = self.peek_byte().unwrap();

        // Header-name recognition only gets one shot: the token immediately
        // after `#include`. Whether or not it actually looks like a header
        // name, the context is spent — a later unrelated `<` or `"` must not
        // be misread as one.
        let try_header_name = self.expect_header_name;
        self.expect_header_name = false;
        if try_header_name && (c == b'<' || c == b'"') {
            return ScannedToken {
                token: self.scan_header_name(),
                space_before,
            };
        }

        let is_hash = c == b'#';
        let token = if is_hash {
            self.scan_punctuator()
        } else if c.is_ascii_digit() || (c == b'.' && self.peek_at(1).map(|d| d.is_ascii_digit()).unwrap_or(false)) {
            self.scan_pp_number()
        } else if is_identifier_start(c) {
            self.scan_identifier()
        } else if c == b'\'' || (c == b'L' && self.peek_at(1) == Some(b'\'')) {
            self.scan_character_constant()
        } else if c == b'"' || (c == b'L' && self.peek_at(1) == Some(b'"')) {
            self.scan_string_literal()
        } else {
            self.scan_punctuator()
        };
        // `#` only primes the "might be #include" context when it is the
        // first pp-token on the line; any other token clears the context.
        self.after_hash_at_line_start = is_hash && self.at_line_start;
        self.at_line_start = false;
        ScannedToken { token, space_before }
    }

    fn scan_identifier(&mut self) -> PreprocessingToken {
        let start = self.pos;
        let (start_line, start_col) = (self.line, self.column);
        while let Some(b) = self.peek_byte() {
            if is_identifier_continue(b) {
                self.advance_byte();
            } else {
                break;
            }
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or("");
        let loc = self.location_at(start_line, start_col, self.pos - start);
        let lexeme = self.pool.intern(text);
        PreprocessingToken::new(lexeme, PpName::Identifier, loc, PpForm::Identifier)
    }

    fn scan_pp_number(&mut self) -> PreprocessingToken {
        let start = self.pos;
        let (start_line, start_col) = (self.line, self.column);
        if self.peek_byte() == Some(b'.') {
            self.advance_byte();
        }
        loop {
            match self.peek_byte() {
                Some(b'e') | Some(b'E') | Some(b'p') | Some(b'P')
                    if matches!(self.peek_at(1), Some(b'+') | Some(b'-')) =>
                {
                    self.advance_byte();
                    self.advance_byte();
                }
                Some(b) if b.is_ascii_digit() || is_identifier_continue(b) || b == b'.' => {
                    self.advance_byte();
                }
                _ => break,
            }
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or("");
        let loc = self.location_at(start_line, start_col, self.pos - start);
        let lexeme = self.pool.intern(text);
        PreprocessingToken::new(lexeme, PpName::PpNumber, loc, PpForm::PpNumber)
    }

    fn scan_character_constant(&mut self) -> PreprocessingToken {
        let start = self.pos;
        let (start_line, start_col) = (self.line, self.column);
        if self.peek_byte() == Some(b'L') {
            self.advance_byte();
        }
        self.advance_byte(); // opening quote
        let mut closed = false;
        loop {
            match self.peek_byte() {
                None | Some(b'\n') => break,
                Some(b'\'') => {
                    self.advance_byte();
                    closed = true;
                    break;
                }
                Some(b'\\') => {
                    self.advance_byte();
                    if self.peek_byte().is_some() {
                        self.advance_byte();
                    }
                }
                Some(_) => {
                    self.advance_byte();
                }
            }
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or("");
        let len = self.pos - start;
        let loc = self.location_at(start_line, start_col, len);
        let lexeme = self.pool.intern(text);
        let ppname = if closed { PpName::CharacterConstant } else { PpName::Error };
        if !closed {
            DiagnosticBuilder::error("unterminated character constant")
                .code(DiagnosticCode::ErrPpInvalidConstant)
                .at(loc.clone())
                .emit(self.handler);
        }
        PreprocessingToken::new(lexeme, ppname, loc, PpForm::CharacterConstant)
    }

    fn scan_string_literal(&mut self) -> PreprocessingToken {
        let start = self.pos;
        let (start_line, start_col) = (self.line, self.column);
        if self.peek_byte() == Some(b'L') {
            self.advance_byte();
        }
        self.advance_byte(); // opening quote
        let mut closed = false;
        loop {
            match self.peek_byte() {
                None | Some(b'\n') => break,
                Some(b'"') => {
                    self.advance_byte();
                    closed = true;
                    break;
                }
                Some(b'\\') => {
                    self.advance_byte();
                    if self.peek_byte().is_some() {
                        self.advance_byte();
                    }
                }
                Some(_) => {
                    self.advance_byte();
                }
            }
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or("");
        let len = self.pos - start;
        let loc = self.location_at(start_line, start_col, len);
        let lexeme = self.pool.intern(text);
        let ppname = if closed { PpName::StringLiteral } else { PpName::Error };
        if !closed {
            DiagnosticBuilder::error("unterminated string literal")
                .code(DiagnosticCode::ErrPpInvalidStringLiteral)
                .at(loc.clone())
                .emit(self.handler);
        }
        PreprocessingToken::new(lexeme, ppname, loc, PpForm::StringLiteral)
    }

    fn scan_header_name(&mut self) -> PreprocessingToken {
        let start = self.pos;
        let (start_line, start_col) = (self.line, self.column);
        let angle = self.peek_byte() == Some(b'<');
        let closing = if angle { b'>' } else { b'"' };
        self.advance_byte();
        let mut closed = false;
        loop {
            match self.peek_byte() {
                None | Some(b'\n') => break,
                Some(b) if b == closing => {
                    self.advance_byte();
                    closed = true;
                    break;
                }
                Some(_) => {
                    self.advance_byte();
                }
            }
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or("");
        let len = self.pos - start;
        let loc = self.location_at(start_line, start_col, len);
        let lexeme = self.pool.intern(text);
        if !closed {
            DiagnosticBuilder::error("invalid header name")
                .code(DiagnosticCode::ErrPpInvalidHeader)
                .at(loc.clone())
                .emit(self.handler);
            return PreprocessingToken::new(lexeme, PpName::Error, loc, PpForm::Error);
        }
        let form = if angle { PpForm::HeaderName1 } else { PpForm::HeaderName2 };
        PreprocessingToken::new(lexeme, PpName::HeaderName, loc, form)
    }

    fn scan_punctuator(&mut self) -> PreprocessingToken {
        let start = self.pos;
        let (start_line, start_col) = (self.line, self.column);
        let remaining = std::str::from_utf8(&self.bytes[self.pos..]).unwrap_or("");
        let mut best: Option<(Punctuator, usize)> = None;
        for p in Punctuator::ALL {
            let spelling = p.spelling();
            if remaining.starts_with(spelling) {
                if best.map(|(_, len)| spelling.len() > len).unwrap_or(true) {
                    best = Some((*p, spelling.len()));
                }
            }
        }
        match best {
            Some((p, len)) => {
                for _ in 0..len {
                    self.advance_byte();
                }
                let text = &self.bytes[start..self.pos];
                let text = std::str::from_utf8(text).unwrap_or("");
                let loc = self.location_at(start_line, start_col, len);
                let lexeme = self.pool.intern(text);
                PreprocessingToken::new(lexeme, PpName::Punctuator, loc, PpForm::Punctuator(p))
            }
            None => {
                self.advance_byte();
                let text = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or("?");
                let loc = self.location_at(start_line, start_col, self.pos - start);
                let lexeme = self.pool.intern(text);
                DiagnosticBuilder::error(format!("invalid punctuator '{}'", text))
                    .code(DiagnosticCode::ErrPpInvalidPunctuator)
                    .at(loc.clone())
                    .emit(self.handler);
                PreprocessingToken::new(lexeme, PpName::Error, loc, PpForm::Error)
            }
        }
    }
}

fn is_identifier_start(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphabetic()
}

fn is_identifier_continue(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str) -> (Vec<LexItem>, LexemaPool, Handler) {
        let mut pool = LexemaPool::new();
        let handler = Handler::new();
        let out = tokenize(source, Rc::from("t.c"), &mut pool, &handler);
        (out.items, pool, handler)
    }

    fn token_texts(items: &[LexItem], pool: &LexemaPool) -> Vec<String> {
        items
            .iter()
            .filter_map(|i| match i {
                LexItem::Token(t) if !t.is_eof() => Some(pool.resolve(t.lexeme).to_string()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn simple_declaration_tokenises_in_order() {
        let (items, pool, _h) = run("int x = 0xDEADBEEF;");
        assert_eq!(token_texts(&items, &pool), vec!["int", "x", "=", "0xDEADBEEF", ";"]);
    }

    #[test]
    fn line_comment_consumed_as_whitespace() {
        let (items, pool, _h) = run("int x; // trailing\n");
        assert_eq!(token_texts(&items, &pool), vec!["int", "x", ";"]);
    }

    #[test]
    fn block_comment_spanning_lines_does_not_emit_newline() {
        let (items, _pool, _h) = run("a /* \n multi \n line */ b\n");
        let newlines = items.iter().filter(|i| matches!(i, LexItem::NewLine)).count();
        assert_eq!(newlines, 1);
    }

    #[test]
    fn e7_maximal_munch_over_shift_assign() {
        let (items, pool, _h) = run("<<=");
        assert_eq!(token_texts(&items, &pool), vec!["<<="]);
    }

    #[test]
    fn header_name_recognised_only_after_include() {
        let (items, pool, _h) = run("#include <stdio.h>\n");
        assert_eq!(token_texts(&items, &pool), vec!["#", "include", "<stdio.h>"]);
    }

    #[test]
    fn tab_advances_column_to_next_multiple_of_four() {
        let mut pool = LexemaPool::new();
        let handler = Handler::new();
        let out = tokenize("\tx", Rc::from("t.c"), &mut pool, &handler);
        if let LexItem::Token(t) = &out.items[0] {
            assert_eq!(t.location.column(), 4);
        } else {
            panic!("expected token");
        }
    }
}
