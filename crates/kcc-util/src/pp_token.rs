//! Preprocessing-token data model.
//!
//! A [`PreprocessingToken`] is the lexical atom that flows between the PP
//! lexer, PP parser, PP executor and PP emitter (all in `kcc-pp`) and the
//! language lexer (`kcc-lex`). It lives here, rather than in either of
//! those crates, because both depend on it and neither may depend on the
//! other: `kcc-pp` calls into `kcc-lex` to classify the operand of an
//! `#if`, so `kcc-lex` cannot in turn depend on `kcc-pp`'s token type.

use crate::lexema::Lexema;
use crate::location::FileLocation;

/// The seven pp-token categories plus the lexer's own error marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PpName {
    Error,
    HeaderName,
    Identifier,
    PpNumber,
    CharacterConstant,
    StringLiteral,
    Punctuator,
    EndOfFile,
}

/// Sub-variant of a [`PpName`]. Most categories have exactly one form;
/// `HeaderName` has two (angle vs. quoted) and `Punctuator` has one form
/// per punctuator spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PpForm {
    HeaderName1, // <...>
    HeaderName2, // "..."
    Identifier,
    PpNumber,
    CharacterConstant,
    StringLiteral,
    EndOfFile,
    Error,
    Punctuator(Punctuator),
}

/// The full C99 punctuator set, including the bigraph spellings, ordered so
/// that declaration order breaks maximal-munch ties the same way in both
/// the PP lexer and the language lexer's punctuator recogniser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Punctuator {
    LBracket,
    RBracket,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Dot,
    Arrow,
    Increment,
    Decrement,
    Ampersand,
    Star,
    Plus,
    Minus,
    Tilde,
    Bang,
    Slash,
    Percent,
    LeftShift,
    RightShift,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    EqualEqual,
    NotEqual,
    Caret,
    Pipe,
    AmpAmp,
    PipePipe,
    Question,
    Colon,
    Semicolon,
    Ellipsis,
    Assign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    PlusAssign,
    MinusAssign,
    LeftShiftAssign,
    RightShiftAssign,
    AmpAssign,
    CaretAssign,
    PipeAssign,
    Comma,
    Hash,
    HashHash,
    Digraph1, // <:
    Digraph2, // :>
    Digraph3, // <%
    Digraph4, // %>
    Digraph5, // %:
    Digraph6, // %:%:
}

impl Punctuator {
    /// The canonical spelling, used by the PP lexer/language lexer tables
    /// and by diagnostic rendering.
    pub fn spelling(self) -> &'static str {
        use Punctuator::*;
        match self {
            LBracket => "[",
            RBracket => "]",
            LParen => "(",
            RParen => ")",
            LBrace => "{",
            RBrace => "}",
            Dot => ".",
            Arrow => "->",
            Increment => "++",
            Decrement => "--",
            Ampersand => "&",
            Star => "*",
            Plus => "+",
            Minus => "-",
            Tilde => "~",
            Bang => "!",
            Slash => "/",
            Percent => "%",
            LeftShift => "<<",
            RightShift => ">>",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            EqualEqual => "==",
            NotEqual => "!=",
            Caret => "^",
            Pipe => "|",
            AmpAmp => "&&",
            PipePipe => "||",
            Question => "?",
            Colon => ":",
            Semicolon => ";",
            Ellipsis => "...",
            Assign => "=",
            StarAssign => "*=",
            SlashAssign => "/=",
            PercentAssign => "%=",
            PlusAssign => "+=",
            MinusAssign => "-=",
            LeftShiftAssign => "<<=",
            RightShiftAssign => ">>=",
            AmpAssign => "&=",
            CaretAssign => "^=",
            PipeAssign => "|=",
            Comma => ",",
            Hash => "#",
            HashHash => "##",
            Digraph1 => "<:",
            Digraph2 => ":>",
            Digraph3 => "<%",
            Digraph4 => "%>",
            Digraph5 => "%:",
            Digraph6 => "%:%:",
        }
    }

    /// All punctuators, in declaration order (the order maximal-munch ties
    /// are broken by). Longest spellings must still be tried first; this
    /// order is only the tiebreaker among equal-length candidates.
    pub const ALL: &'static [Punctuator] = &[
        Punctuator::Ellipsis,
        Punctuator::LeftShiftAssign,
        Punctuator::RightShiftAssign,
        Punctuator::Digraph6,
        Punctuator::Arrow,
        Punctuator::Increment,
        Punctuator::Decrement,
        Punctuator::LeftShift,
        Punctuator::RightShift,
        Punctuator::LessEqual,
        Punctuator::GreaterEqual,
        Punctuator::EqualEqual,
        Punctuator::NotEqual,
        Punctuator::AmpAmp,
        Punctuator::PipePipe,
        Punctuator::StarAssign,
        Punctuator::SlashAssign,
        Punctuator::PercentAssign,
        Punctuator::PlusAssign,
        Punctuator::MinusAssign,
        Punctuator::AmpAssign,
        Punctuator::CaretAssign,
        Punctuator::PipeAssign,
        Punctuator::HashHash,
        Punctuator::Digraph1,
        Punctuator::Digraph2,
        Punctuator::Digraph3,
        Punctuator::Digraph4,
        Punctuator::Digraph5,
        Punctuator::LBracket,
        Punctuator::RBracket,
        Punctuator::LParen,
        Punctuator::RParen,
        Punctuator::LBrace,
        Punctuator::RBrace,
        Punctuator::Dot,
        Punctuator::Ampersand,
        Punctuator::Star,
        Punctuator::Plus,
        Punctuator::Minus,
        Punctuator::Tilde,
        Punctuator::Bang,
        Punctuator::Slash,
        Punctuator::Percent,
        Punctuator::Less,
        Punctuator::Greater,
        Punctuator::Caret,
        Punctuator::Pipe,
        Punctuator::Question,
        Punctuator::Colon,
        Punctuator::Semicolon,
        Punctuator::Assign,
        Punctuator::Comma,
        Punctuator::Hash,
    ];
}

/// One pp-token: a classified, located, interned lexeme produced by the PP
/// lexer. Does not own `lexeme` — it borrows from the per-compilation
/// [`crate::lexema::LexemaPool`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreprocessingToken {
    pub lexeme: Lexema,
    pub ppname: PpName,
    pub location: FileLocation,
    pub ppform: PpForm,
}

impl PreprocessingToken {
    pub fn new(lexeme: Lexema, ppname: PpName, location: FileLocation, ppform: PpForm) -> Self {
        Self {
            lexeme,
            ppname,
            location,
            ppform,
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.ppname, PpName::EndOfFile)
    }

    pub fn is_identifier_with_text(&self, pool: &crate::lexema::LexemaPool, text: &str) -> bool {
        matches!(self.ppname, PpName::Identifier) && pool.resolve(self.lexeme) == text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexema::LexemaPool;
    use std::rc::Rc;

    #[test]
    fn punctuator_spelling_round_trips_for_every_entry() {
        for p in Punctuator::ALL {
            assert!(!p.spelling().is_empty());
        }
    }

    #[test]
    fn identifier_with_text_matches_interned_lexeme() {
        let mut pool = LexemaPool::new();
        let handle = pool.intern("include");
        let loc = FileLocation::new(Rc::from("a.c"), 1, 1, 7);
        let tok = PreprocessingToken::new(handle, PpName::Identifier, loc, PpForm::Identifier);
        assert!(tok.is_identifier_with_text(&pool, "include"));
        assert!(!tok.is_identifier_with_text(&pool, "define"));
    }
}
