//! Punctuator recogniser: maximal munch over the 53-entry C99 punctuator
//! table (three-character `<<=`/`>>=`/`...`, two-character forms, the
//! bigraphs `<:`/`:>`/`<%`/`%>`/`%:`/`%:%:`, and every single-character
//! punctuator). The PP lexer already performed maximal munch while
//! scanning raw characters; this recogniser re-derives the same answer
//! from the lexeme text alone so the language lexer doesn't have to trust
//! the pp-token's classification.

use kcc_util::Punctuator;

/// Finds the punctuator that matches the longest prefix of `text`,
/// breaking ties between equal-length candidates by table declaration
/// order. Returns `None`, plus the attempted length, when nothing
/// matches.
pub fn recognise(text: &str) -> Option<Punctuator> {
    let mut best: Option<Punctuator> = None;
    let mut best_len = 0usize;
    for p in Punctuator::ALL {
        let spelling = p.spelling();
        if text.starts_with(spelling) && spelling.len() > best_len {
            best_len = spelling.len();
            best = Some(*p);
        }
    }
    // Full-lexeme match only: a punctuator pp-token's lexeme never carries
    // trailing characters beyond the punctuator itself.
    if best_len == text.len() {
        best
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maximal_munch_prefers_three_char_form() {
        assert_eq!(recognise("<<="), Some(Punctuator::LeftShiftAssign));
    }

    #[test]
    fn maximal_munch_prefers_two_char_over_one() {
        assert_eq!(recognise("++"), Some(Punctuator::Increment));
        assert_eq!(recognise("<="), Some(Punctuator::LessEqual));
    }

    #[test]
    fn single_char_forms_recognised() {
        assert_eq!(recognise(";"), Some(Punctuator::Semicolon));
        assert_eq!(recognise("+"), Some(Punctuator::Plus));
    }

    #[test]
    fn bigraphs_recognised() {
        assert_eq!(recognise("<:"), Some(Punctuator::Digraph1));
        assert_eq!(recognise("%:%:"), Some(Punctuator::Digraph6));
    }

    #[test]
    fn unknown_text_fails() {
        assert_eq!(recognise("@"), None);
        assert_eq!(recognise(""), None);
    }
}
