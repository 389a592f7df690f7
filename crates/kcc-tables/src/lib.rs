//! kcc-tables - lookahead tables (component 9).
//!
//! FIRST-sets over `(TokenName × TokenForm)`, used by the downstream
//! syntactic parser (out of scope, §1) for O(1) lookahead decisions. The
//! table type here is the in-scope, constructible half of that contract:
//! a dense bitset plus the `single`/`union` combinators the spec asks for.
//! Construction is purely functional — no table is ever mutated after
//! `union` returns it — so tables built once at parser-construction time
//! can be shared freely without interior mutability.

use kcc_lex::{Keyword, TokenForm, TokenName};
use kcc_util::Punctuator;

/// Every concrete `(TokenName, TokenForm)` shape a token can take, densely
/// enumerated so a [`LookaheadTable`] can be a flat bitset rather than a
/// hash set. Order is arbitrary but fixed: it only has to agree with
/// itself between `index` and `ALL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenShape {
    Keyword(Keyword),
    Identifier,
    IntegerConstant,
    FloatingConstant,
    CharacterConstant,
    StringLiteral,
    Punctuator(Punctuator),
    Error,
}

impl TokenShape {
    pub fn from_form(name: TokenName, form: TokenForm) -> Option<Self> {
        Some(match (name, form) {
            (TokenName::Keyword, TokenForm::Keyword(k)) => TokenShape::Keyword(k),
            (TokenName::Identifier, TokenForm::Identifier) => TokenShape::Identifier,
            (TokenName::Constant, TokenForm::IntegerConstant) => TokenShape::IntegerConstant,
            (TokenName::Constant, TokenForm::FloatingConstant) => TokenShape::FloatingConstant,
            (TokenName::Constant, TokenForm::CharacterConstant) => TokenShape::CharacterConstant,
            (TokenName::StringLiteral, TokenForm::StringLiteral) => TokenShape::StringLiteral,
            (TokenName::Punctuator, TokenForm::Punctuator(p)) => TokenShape::Punctuator(p),
            (TokenName::Error, _) => TokenShape::Error,
            _ => return None,
        })
    }

    fn index(self) -> usize {
        Self::all().iter().position(|s| *s == self).expect("shape must be in ALL")
    }

    /// All representable shapes, in a fixed order: every keyword, then
    /// identifier, the three constant forms, string literal, every
    /// punctuator, and the error shape.
    pub fn all() -> Vec<TokenShape> {
        let mut v: Vec<TokenShape> = Keyword::ALL.iter().map(|(_, k)| TokenShape::Keyword(*k)).collect();
        v.push(TokenShape::Identifier);
        v.push(TokenShape::IntegerConstant);
        v.push(TokenShape::FloatingConstant);
        v.push(TokenShape::CharacterConstant);
        v.push(TokenShape::StringLiteral);
        v.extend(Punctuator::ALL.iter().map(|p| TokenShape::Punctuator(*p)));
        v.push(TokenShape::Error);
        v
    }
}

/// A dense boolean matrix over token shapes: the FIRST-set of one
/// non-terminal. `lookup` is O(1); `union` builds a new table (functional
/// construction, per spec §4.7/§9).
#[derive(Debug, Clone)]
pub struct LookaheadTable {
    bits: Vec<bool>,
}

impl LookaheadTable {
    fn empty() -> Self {
        Self {
            bits: vec![false; TokenShape::all().len()],
        }
    }

    /// A table containing exactly one shape.
    pub fn single(shape: TokenShape) -> Self {
        let mut t = Self::empty();
        t.bits[shape.index()] = true;
        t
    }

    /// A table containing every shape for a given `TokenName`, e.g. every
    /// keyword or every punctuator — used when a non-terminal's FIRST set
    /// is "any keyword" rather than one specific spelling.
    pub fn all_of(name: TokenName) -> Self {
        let mut t = Self::empty();
        for (i, shape) in TokenShape::all().into_iter().enumerate() {
            let matches = matches!(
                (name, shape),
                (TokenName::Keyword, TokenShape::Keyword(_))
                    | (TokenName::Identifier, TokenShape::Identifier)
                    | (
                        TokenName::Constant,
                        TokenShape::IntegerConstant | TokenShape::FloatingConstant | TokenShape::CharacterConstant
                    )
                    | (TokenName::StringLiteral, TokenShape::StringLiteral)
                    | (TokenName::Punctuator, TokenShape::Punctuator(_))
                    | (TokenName::Error, TokenShape::Error)
            );
            t.bits[i] = matches;
        }
        t
    }

    /// Set union over any number of tables.
    pub fn union<'a>(tables: impl IntoIterator<Item = &'a LookaheadTable>) -> Self {
        let mut out = Self::empty();
        for table in tables {
            for (i, bit) in table.bits.iter().enumerate() {
                out.bits[i] |= *bit;
            }
        }
        out
    }

    /// O(1) membership test.
    pub fn contains(&self, shape: TokenShape) -> bool {
        self.bits[shape.index()]
    }

    pub fn lookup(table: &LookaheadTable, name: TokenName, form: TokenForm) -> bool {
        match TokenShape::from_form(name, form) {
            Some(shape) => table.contains(shape),
            None => false,
        }
    }
}

/// A handful of FIRST-sets for the fragment of the C grammar this core
/// actually touches (constant-expressions, via `kcc-par`). The rest of the
/// grammar's non-terminals belong to the external syntactic parser and are
/// not tabulated here.
pub mod first_sets {
    use super::*;

    /// FIRST(primary-expression): identifier, any constant, string
    /// literal, or `(`.
    pub fn primary_expression() -> LookaheadTable {
        LookaheadTable::union([
            &LookaheadTable::single(TokenShape::Identifier),
            &LookaheadTable::single(TokenShape::IntegerConstant),
            &LookaheadTable::single(TokenShape::FloatingConstant),
            &LookaheadTable::single(TokenShape::CharacterConstant),
            &LookaheadTable::single(TokenShape::StringLiteral),
            &LookaheadTable::single(TokenShape::Punctuator(Punctuator::LParen)),
        ])
    }

    /// FIRST(unary-expression): FIRST(primary-expression) plus the unary
    /// operators and `sizeof`.
    pub fn unary_expression() -> LookaheadTable {
        LookaheadTable::union([
            &primary_expression(),
            &LookaheadTable::single(TokenShape::Punctuator(Punctuator::Plus)),
            &LookaheadTable::single(TokenShape::Punctuator(Punctuator::Minus)),
            &LookaheadTable::single(TokenShape::Punctuator(Punctuator::Bang)),
            &LookaheadTable::single(TokenShape::Punctuator(Punctuator::Tilde)),
            &LookaheadTable::single(TokenShape::Punctuator(Punctuator::Increment)),
            &LookaheadTable::single(TokenShape::Punctuator(Punctuator::Decrement)),
            &LookaheadTable::single(TokenShape::Punctuator(Punctuator::Ampersand)),
            &LookaheadTable::single(TokenShape::Punctuator(Punctuator::Star)),
            &LookaheadTable::single(TokenShape::Keyword(Keyword::Sizeof)),
        ])
    }
}
