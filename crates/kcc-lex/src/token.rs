//! Classified-token data model (component 10 in the design: "token model").

use kcc_util::{FileLocation, Lexema, Punctuator};

/// The five language-token categories, plus the lexer's own failure marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenName {
    Keyword,
    Identifier,
    Constant,
    StringLiteral,
    Punctuator,
    Error,
}

/// Sub-variant of a [`TokenName`]. `Keyword` carries one form per C99
/// keyword; `Constant` distinguishes integer vs. floating vs. character;
/// `Punctuator` reuses [`Punctuator`] directly so the two tables the spec
/// asks for (PP-level and language-level) never drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenForm {
    Keyword(Keyword),
    Identifier,
    IntegerConstant,
    FloatingConstant,
    CharacterConstant,
    StringLiteral,
    Punctuator(Punctuator),
    Error,
}

/// The 37 C99 keywords, `_Bool`/`_Complex`/`_Imaginary` included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Auto,
    Break,
    Case,
    Char,
    Const,
    Continue,
    Default,
    Do,
    Double,
    Else,
    Enum,
    Extern,
    Float,
    For,
    Goto,
    If,
    Inline,
    Int,
    Long,
    Register,
    Restrict,
    Return,
    Short,
    Signed,
    Sizeof,
    Static,
    Struct,
    Switch,
    Typedef,
    Union,
    Unsigned,
    Void,
    Volatile,
    While,
    Bool,
    Complex,
    Imaginary,
}

impl Keyword {
    /// All 37 keywords paired with their spelling, used to build the
    /// keyword DFA and as the reverse lookup for diagnostics/tests.
    pub const ALL: &'static [(&'static str, Keyword)] = &[
        ("auto", Keyword::Auto),
        ("break", Keyword::Break),
        ("case", Keyword::Case),
        ("char", Keyword::Char),
        ("const", Keyword::Const),
        ("continue", Keyword::Continue),
        ("default", Keyword::Default),
        ("do", Keyword::Do),
        ("double", Keyword::Double),
        ("else", Keyword::Else),
        ("enum", Keyword::Enum),
        ("extern", Keyword::Extern),
        ("float", Keyword::Float),
        ("for", Keyword::For),
        ("goto", Keyword::Goto),
        ("if", Keyword::If),
        ("inline", Keyword::Inline),
        ("int", Keyword::Int),
        ("long", Keyword::Long),
        ("register", Keyword::Register),
        ("restrict", Keyword::Restrict),
        ("return", Keyword::Return),
        ("short", Keyword::Short),
        ("signed", Keyword::Signed),
        ("sizeof", Keyword::Sizeof),
        ("static", Keyword::Static),
        ("struct", Keyword::Struct),
        ("switch", Keyword::Switch),
        ("typedef", Keyword::Typedef),
        ("union", Keyword::Union),
        ("unsigned", Keyword::Unsigned),
        ("void", Keyword::Void),
        ("volatile", Keyword::Volatile),
        ("while", Keyword::While),
        ("_Bool", Keyword::Bool),
        ("_Complex", Keyword::Complex),
        ("_Imaginary", Keyword::Imaginary),
    ];
}

/// The tagged numeric value carried by a `CONSTANT` token. Integer
/// constants keep their exact two's-complement bit pattern in `i64`;
/// floating constants are stored as `f64` ("long floating value" in the
/// spec's words — `f64` is the widest portable stdlib float).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
}

/// A fully classified language token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub name: TokenName,
    pub form: TokenForm,
    pub value: Option<Value>,
    pub lexeme: Lexema,
    pub location: FileLocation,
}

impl Token {
    pub fn new(
        name: TokenName,
        form: TokenForm,
        value: Option<Value>,
        lexeme: Lexema,
        location: FileLocation,
    ) -> Self {
        Self {
            name,
            form,
            value,
            lexeme,
            location,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.name, TokenName::Error)
    }
}
