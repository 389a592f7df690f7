//! Stable diagnostic codes.
//!
//! This is a closed set: these are the only conditions the front-end ever
//! reports, and the numeric value attached to each is part of the
//! user-visible contract (it appears in rendered output as `err<N>`), so
//! variants are never renumbered once added.

use std::fmt;

/// A stable, user-visible diagnostic code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    Undefined,
    ErrUnrecognisedIdentifier,
    ErrMissingSemicolon,
    ErrPpInvalidHeader,
    ErrPpInvalidIdentifier,
    ErrPpInvalidPpNumber,
    ErrPpInvalidPunctuator,
    ErrPpInvalidConstant,
    ErrPpInvalidStringLiteral,
    ErrInvalidConstant,
    ErrInvalidIdentifier,
    ErrInvalidStringLiteral,
    ErrInvalidPunctuator,
    ErrParserInvalidTranslationUnit,
}

impl DiagnosticCode {
    /// The numeric value rendered as `err<N>`.
    pub fn number(self) -> u32 {
        match self {
            DiagnosticCode::Undefined => 0,
            DiagnosticCode::ErrUnrecognisedIdentifier => 1,
            DiagnosticCode::ErrMissingSemicolon => 2,
            DiagnosticCode::ErrPpInvalidHeader => 3,
            DiagnosticCode::ErrPpInvalidIdentifier => 4,
            DiagnosticCode::ErrPpInvalidPpNumber => 5,
            DiagnosticCode::ErrPpInvalidPunctuator => 6,
            DiagnosticCode::ErrPpInvalidConstant => 7,
            DiagnosticCode::ErrPpInvalidStringLiteral => 8,
            DiagnosticCode::ErrInvalidConstant => 9,
            DiagnosticCode::ErrInvalidIdentifier => 10,
            DiagnosticCode::ErrInvalidStringLiteral => 11,
            DiagnosticCode::ErrInvalidPunctuator => 12,
            DiagnosticCode::ErrParserInvalidTranslationUnit => 13,
        }
    }

    /// The bare identifier, e.g. `ERR_PP_INVALID_HEADER`.
    pub fn name(self) -> &'static str {
        match self {
            DiagnosticCode::Undefined => "UNDEFINED",
            DiagnosticCode::ErrUnrecognisedIdentifier => "ERR_UNRECOGNISED_IDENTIFIER",
            DiagnosticCode::ErrMissingSemicolon => "ERR_MISSING_SEMICOLON",
            DiagnosticCode::ErrPpInvalidHeader => "ERR_PP_INVALID_HEADER",
            DiagnosticCode::ErrPpInvalidIdentifier => "ERR_PP_INVALID_IDENTIFIER",
            DiagnosticCode::ErrPpInvalidPpNumber => "ERR_PP_INVALID_PP_NUMBER",
            DiagnosticCode::ErrPpInvalidPunctuator => "ERR_PP_INVALID_PUNCTUATOR",
            DiagnosticCode::ErrPpInvalidConstant => "ERR_PP_INVALID_CONSTANT",
            DiagnosticCode::ErrPpInvalidStringLiteral => "ERR_PP_INVALID_STRING_LITERAL",
            DiagnosticCode::ErrInvalidConstant => "ERR_INVALID_CONSTANT",
            DiagnosticCode::ErrInvalidIdentifier => "ERR_INVALID_IDENTIFIER",
            DiagnosticCode::ErrInvalidStringLiteral => "ERR_INVALID_STRING_LITERAL",
            DiagnosticCode::ErrInvalidPunctuator => "ERR_INVALID_PUNCTUATOR",
            DiagnosticCode::ErrParserInvalidTranslationUnit => "ERR_PARSER_INVALID_TRANSLATION_UNIT",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "err{}", self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_is_zero() {
        assert_eq!(DiagnosticCode::Undefined.number(), 0);
    }

    #[test]
    fn display_renders_err_prefix_plus_number() {
        assert_eq!(format!("{}", DiagnosticCode::ErrInvalidConstant), "err9");
    }

    #[test]
    fn every_code_has_a_distinct_number() {
        let all = [
            DiagnosticCode::Undefined,
            DiagnosticCode::ErrUnrecognisedIdentifier,
            DiagnosticCode::ErrMissingSemicolon,
            DiagnosticCode::ErrPpInvalidHeader,
            DiagnosticCode::ErrPpInvalidIdentifier,
            DiagnosticCode::ErrPpInvalidPpNumber,
            DiagnosticCode::ErrPpInvalidPunctuator,
            DiagnosticCode::ErrPpInvalidConstant,
            DiagnosticCode::ErrPpInvalidStringLiteral,
            DiagnosticCode::ErrInvalidConstant,
            DiagnosticCode::ErrInvalidIdentifier,
            DiagnosticCode::ErrInvalidStringLiteral,
            DiagnosticCode::ErrInvalidPunctuator,
            DiagnosticCode::ErrParserInvalidTranslationUnit,
        ];
        let mut numbers: Vec<u32> = all.iter().map(|c| c.number()).collect();
        numbers.sort_unstable();
        numbers.dedup();
        assert_eq!(numbers.len(), all.len());
    }
}
