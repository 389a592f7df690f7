//! Keyword recogniser.
//!
//! The spec's keyword DFA branches on the lexeme's first character and
//! walks prefix states (`C`, `CO`, `CON`, ...) before accepting only on
//! exact exhaustion of the input. A `match` over the full lexeme text is
//! the same automaton with the state table inlined by the compiler: any
//! trailing character — including an identifier-continue character like
//! the `a` in `autoadditional` — falls through to `None` rather than an
//! accept state, so a keyword never matches a strict prefix of a longer
//! identifier.

use crate::token::Keyword;

/// Matches `text` against the full C99 keyword set. Returns `None` for
/// anything that isn't an exact spelling, including `autoadditional`.
pub fn recognise(text: &str) -> Option<Keyword> {
    Keyword::ALL
        .iter()
        .find(|(spelling, _)| *spelling == text)
        .map(|(_, kw)| *kw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_keyword_matches() {
        assert_eq!(recognise("continue"), Some(Keyword::Continue));
        assert_eq!(recognise("_Bool"), Some(Keyword::Bool));
    }

    #[test]
    fn trailing_identifier_char_is_not_a_keyword() {
        assert_eq!(recognise("autoadditional"), None);
        assert_eq!(recognise("int_"), None);
    }

    #[test]
    fn every_table_entry_round_trips() {
        for (spelling, kw) in Keyword::ALL {
            assert_eq!(recognise(spelling), Some(*kw));
        }
    }

    #[test]
    fn empty_and_partial_prefixes_fail() {
        assert_eq!(recognise(""), None);
        assert_eq!(recognise("con"), None);
    }
}
