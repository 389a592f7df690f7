//! PP emitter (component 7): flattens the executed tree's surviving
//! `TEXT_LINE` / `NON_DIRECTIVE` group-parts into the linear pp-token
//! stream the language lexer consumes, terminated by an explicit
//! `END_OF_FILE` pp-token (§4.5).

use crate::ast::{NodeId, Tree};
use kcc_util::{Lexema, LexemaPool, PpForm, PpName, PreprocessingToken};

/// Flattens `tree` (the [`crate::executor::execute`] output) into a single
/// pp-token sequence. Reuses [`Tree::flatten_tokens`] — by construction an
/// executed tree's `PpTokenLeaf` terminals are exactly the survivors, since
/// `IfSection`/`ControlLine` group-parts never appear in it.
pub fn emit(tree: &Tree, root: NodeId, pool: &mut LexemaPool) -> Vec<PreprocessingToken> {
    let mut out = Vec::new();
    tree.flatten_tokens(root, &mut out);
    out.push(end_of_file_token(pool));
    out
}

fn end_of_file_token(pool: &mut LexemaPool) -> PreprocessingToken {
    let lexeme: Lexema = pool.intern("");
    let loc = kcc_util::FileLocation::start_of_file(std::rc::Rc::from(""));
    PreprocessingToken::new(lexeme, PpName::EndOfFile, loc, PpForm::EndOfFile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::execute;
    use crate::parser::parse;
    use crate::pp_lexer::tokenize;
    use kcc_util::Handler;
    use std::rc::Rc;

    fn run(src: &str) -> (Vec<PreprocessingToken>, LexemaPool) {
        let mut pool = LexemaPool::new();
        let handler = Handler::new();
        let lexed = tokenize(src, Rc::from("t.c"), &mut pool, &handler);
        let (tree, root) = parse(&lexed.items, &lexed.space_before, &pool);
        let executed = execute(&tree, root, &mut pool, &handler);
        let tokens = emit(&executed.tree, executed.root, &mut pool);
        (tokens, pool)
    }

    #[test]
    fn emits_surviving_tokens_followed_by_end_of_file() {
        let (tokens, _pool) = run("a b;\n");
        assert_eq!(tokens.len(), 4);
        assert!(tokens.last().unwrap().is_eof());
    }

    #[test]
    fn emits_only_end_of_file_for_a_directive_only_file() {
        let (tokens, _pool) = run("#define N 1\n");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_eof());
    }

    #[test]
    fn preserves_source_order_across_a_suppressed_conditional() {
        let (tokens, pool) = run("first\n#if 0\nskipped\n#endif\nlast\n");
        let texts: Vec<&str> = tokens.iter().filter(|t| !t.is_eof()).map(|t| pool.resolve(t.lexeme)).collect();
        assert_eq!(texts, vec!["first", "last"]);
    }
}
