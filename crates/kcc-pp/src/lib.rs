//! kcc-pp - the preprocessor: components 4-7 of the core (PP lexer, PP
//! parser, PP executor, PP emitter).
//!
//! The four stages are strictly sequential (§5: "strict serial
//! composition of passes"): raw source text is tokenised into pp-items,
//! parsed into a directive tree, executed against a fresh macro symbol
//! table (invoking `kcc-lex`/`kcc-par` for `#if`/`#elif` operands), and
//! flattened back into the pp-token stream the language lexer consumes.
//! [`preprocess`] drives all four in order and is the one entry point
//! `kcc-drv` calls.

pub mod ast;
pub mod emitter;
pub mod executor;
pub mod parser;
pub mod pp_lexer;
pub mod symtab;

use kcc_util::{Handler, LexemaPool, PreprocessingToken};
use std::rc::Rc;

pub use ast::{NodeId, Tree};
pub use executor::ExecutionOutput;
pub use symtab::{MacroDefinition, SymbolTable};

/// Runs the whole preprocessor pipeline over one translation unit: tokenise
/// (§4.2), parse into a directive tree (§4.3), execute directives and
/// macro expansion against a fresh symbol table (§4.4), then flatten the
/// surviving group-parts into a pp-token stream terminated by
/// `END_OF_FILE` (§4.5). Diagnostics raised by any stage are appended to
/// `handler` in the order they are detected, matching §5's ordering
/// guarantee (lexical, then parse, then execute).
pub fn preprocess(source: &str, file_name: Rc<str>, pool: &mut LexemaPool, handler: &Handler) -> PreprocessOutput {
    let lexed = pp_lexer::tokenize(source, file_name, pool, handler);
    let (tree, root) = parser::parse(&lexed.items, &lexed.space_before, pool);
    let executed = executor::execute(&tree, root, pool, handler);
    let tokens = emitter::emit(&executed.tree, executed.root, pool);
    PreprocessOutput {
        tokens,
        symtab: executed.symtab,
    }
}

/// The preprocessor's external contract (§6): a flat pp-token stream ready
/// for the language lexer, plus the macro symbol table as it stood at the
/// end of execution (exposed for callers that want to report which macros
/// ended up defined, e.g. a `-dM`-style listing).
pub struct PreprocessOutput {
    pub tokens: Vec<PreprocessingToken>,
    pub symtab: SymbolTable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preprocess_runs_all_four_stages_end_to_end() {
        let mut pool = LexemaPool::new();
        let handler = Handler::new();
        let out = preprocess("#define N 42\nN+N\n", Rc::from("t.c"), &mut pool, &handler);
        let texts: Vec<&str> = out.tokens.iter().filter(|t| !t.is_eof()).map(|t| pool.resolve(t.lexeme)).collect();
        assert_eq!(texts, vec!["42", "+", "42"]);
        assert!(out.symtab.is_macro(pool.intern("N")));
        assert!(!handler.has_errors());
    }

    #[test]
    fn preprocess_terminates_the_stream_with_end_of_file() {
        let mut pool = LexemaPool::new();
        let handler = Handler::new();
        let out = preprocess("x\n", Rc::from("t.c"), &mut pool, &handler);
        assert!(out.tokens.last().unwrap().is_eof());
    }
}
