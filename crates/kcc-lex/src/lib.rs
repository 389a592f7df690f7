//! kcc-lex - the language lexer.
//!
//! Classifies each pp-token the preprocessor hands it into a language
//! [`Token`]: keyword vs. identifier, integer vs. floating vs. character
//! constant (with its numeric value), string literal, punctuator. Every
//! recogniser is a small deterministic automaton over the pp-token's
//! lexeme text; none of them look at neighbouring tokens.
//!
//! This crate is also one of the preprocessor's collaborators (§6):
//! `kcc-pp` calls [`lex`] to classify the operand tokens of `#if` before
//! handing them to the constant-expression evaluator in `kcc-par`.

pub mod lexer;
pub mod token;

pub use token::{Keyword, Token, TokenForm, TokenName, Value};

use kcc_util::diagnostic::DiagnosticBuilder;
use kcc_util::{DiagnosticCode, Handler, LexemaPool, PpForm, PpName, PreprocessingToken};

/// Classifies a whole pp-token stream into language tokens. `END_OF_FILE`
/// pp-tokens produce no output token (table in §4.6: "no output,
/// terminates") and the function stops scanning at the first one,
/// matching the spec's pipeline contract of an implicit terminator rather
/// than an explicit `Token` for EOF.
pub fn lex(
    pp_tokens: &[PreprocessingToken],
    pool: &mut LexemaPool,
    handler: &Handler,
) -> Vec<Token> {
    let mut out = Vec::with_capacity(pp_tokens.len());
    for pp in pp_tokens {
        if pp.is_eof() {
            break;
        }
        out.push(lex_one(pp, pool, handler));
    }
    out
}

/// Classifies a single pp-token. Exposed separately from [`lex`] so the
/// preprocessor's `#if` evaluation can classify just the operand tokens
/// without building a throwaway slice copy.
pub fn lex_one(pp: &PreprocessingToken, pool: &mut LexemaPool, handler: &Handler) -> Token {
    let text = pool.resolve(pp.lexeme).to_string();
    match pp.ppname {
        PpName::Identifier => lex_identifier(pp, &text),
        PpName::PpNumber => lex_number(pp, &text, handler),
        PpName::CharacterConstant => lex_character_constant(pp, &text, handler),
        PpName::StringLiteral => lex_string_literal(pp, &text, handler),
        PpName::Punctuator => lex_punctuator(pp, &text, handler),
        PpName::HeaderName | PpName::Error | PpName::EndOfFile => error_token(pp, &text, handler),
    }
}

fn lex_identifier(pp: &PreprocessingToken, text: &str) -> Token {
    match lexer::keyword::recognise(text) {
        Some(kw) => Token::new(
            TokenName::Keyword,
            TokenForm::Keyword(kw),
            None,
            pp.lexeme,
            pp.location.clone(),
        ),
        None => Token::new(
            TokenName::Identifier,
            TokenForm::Identifier,
            None,
            pp.lexeme,
            pp.location.clone(),
        ),
    }
}

fn lex_number(pp: &PreprocessingToken, text: &str, handler: &Handler) -> Token {
    use lexer::constant::ConstantResult;
    let result = lexer::constant::recognise_number(text);
    let form = match &result {
        ConstantResult::Integer(_) => TokenForm::IntegerConstant,
        ConstantResult::Float(_) => TokenForm::FloatingConstant,
        _ => TokenForm::Error,
    };
    let name = if matches!(result, ConstantResult::Invalid) {
        DiagnosticBuilder::error(format!("invalid numeric constant '{}'", text))
            .code(DiagnosticCode::ErrInvalidConstant)
            .at(pp.location.clone())
            .emit(handler);
        TokenName::Error
    } else {
        TokenName::Constant
    };
    Token::new(name, form, result.into_value(), pp.lexeme, pp.location.clone())
}

fn lex_character_constant(pp: &PreprocessingToken, text: &str, handler: &Handler) -> Token {
    use lexer::constant::ConstantResult;
    let result = lexer::constant::recognise_character_constant(text);
    if matches!(result, ConstantResult::Invalid) {
        DiagnosticBuilder::error(format!("invalid character constant '{}'", text))
            .code(DiagnosticCode::ErrInvalidConstant)
            .at(pp.location.clone())
            .emit(handler);
        return Token::new(
            TokenName::Error,
            TokenForm::CharacterConstant,
            None,
            pp.lexeme,
            pp.location.clone(),
        );
    }
    Token::new(
        TokenName::Constant,
        TokenForm::CharacterConstant,
        result.into_value(),
        pp.lexeme,
        pp.location.clone(),
    )
}

fn lex_string_literal(pp: &PreprocessingToken, text: &str, handler: &Handler) -> Token {
    if !lexer::string::recognise(text) {
        DiagnosticBuilder::error(format!("invalid or unterminated string literal {}", text))
            .code(DiagnosticCode::ErrInvalidStringLiteral)
            .at(pp.location.clone())
            .emit(handler);
        return Token::new(
            TokenName::Error,
            TokenForm::StringLiteral,
            None,
            pp.lexeme,
            pp.location.clone(),
        );
    }
    Token::new(
        TokenName::StringLiteral,
        TokenForm::StringLiteral,
        None,
        pp.lexeme,
        pp.location.clone(),
    )
}

fn lex_punctuator(pp: &PreprocessingToken, text: &str, handler: &Handler) -> Token {
    match lexer::punctuator::recognise(text) {
        Some(p) => Token::new(
            TokenName::Punctuator,
            TokenForm::Punctuator(p),
            None,
            pp.lexeme,
            pp.location.clone(),
        ),
        None => {
            DiagnosticBuilder::error(format!("invalid punctuator '{}'", text))
                .code(DiagnosticCode::ErrInvalidPunctuator)
                .at(pp.location.clone())
                .emit(handler);
            Token::new(
                TokenName::Error,
                TokenForm::Error,
                None,
                pp.lexeme,
                pp.location.clone(),
            )
        }
    }
}

fn error_token(pp: &PreprocessingToken, text: &str, handler: &Handler) -> Token {
    DiagnosticBuilder::error(format!("invalid token '{}'", text))
        .code(DiagnosticCode::ErrInvalidIdentifier)
        .at(pp.location.clone())
        .emit(handler);
    Token::new(TokenName::Error, TokenForm::Error, None, pp.lexeme, pp.location.clone())
}
