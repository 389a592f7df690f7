//! PP executor (component 6): walks the parsed directive tree, maintains
//! the macro symbol table, evaluates `#if`/`#elif` controlling expressions
//! via the language lexer and the external constant-expression
//! collaborators, and produces a fresh *executed* tree containing only the
//! surviving group-parts (§4.4). Each pass allocates a new [`Tree`] rather
//! than mutating the parsed one in place.

use crate::ast::{ControlLineAlt, IfGroupAlt, NodeId, NodeName, Tree};
use crate::symtab::{MacroDefinition, SymbolTable};
use kcc_util::diagnostic::DiagnosticBuilder;
use kcc_util::{DiagnosticCode, FileLocation, Handler, LexemaPool, PpForm, PpName, PreprocessingToken, Punctuator};
use std::rc::Rc;

pub struct ExecutionOutput {
    pub tree: Tree,
    pub root: NodeId,
    pub symtab: SymbolTable,
}

/// Executes a whole parsed translation unit, starting with an empty macro
/// table (§6: "an empty symbol table" is part of the external contract).
pub fn execute(src: &Tree, root: NodeId, pool: &mut LexemaPool, handler: &Handler) -> ExecutionOutput {
    let mut ex = Executor {
        pool,
        handler,
        symtab: SymbolTable::new(),
        out: Tree::new(),
    };
    let survivors = match src.find_child(root, NodeName::Group) {
        Some(group) => ex.execute_group(src, group),
        None => Vec::new(),
    };
    let group_id = (!survivors.is_empty()).then(|| ex.out.interior(NodeName::Group, survivors));
    let new_root = ex.out.interior(NodeName::PreprocessingFile, group_id.into_iter().collect());
    ExecutionOutput {
        tree: ex.out,
        root: new_root,
        symtab: ex.symtab,
    }
}

struct Executor<'a> {
    pool: &'a mut LexemaPool,
    handler: &'a Handler,
    symtab: SymbolTable,
    out: Tree,
}

impl<'a> Executor<'a> {
    /// `group := group-part | group group-part`, executed left to right;
    /// each part contributes zero or more survivors which are concatenated
    /// in order (§4.4 "Group execution").
    fn execute_group(&mut self, src: &Tree, group_id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        for part in src.get(group_id).children.clone() {
            out.extend(self.execute_group_part(src, part));
        }
        out
    }

    fn execute_group_part(&mut self, src: &Tree, part_id: NodeId) -> Vec<NodeId> {
        match src.get(part_id).name {
            NodeName::IfSection => self.execute_if_section(src, part_id),
            NodeName::ControlLine => {
                self.execute_control_line(src, part_id);
                Vec::new()
            }
            NodeName::TextLine => vec![self.execute_text_line(src, part_id)],
            NodeName::NonDirective => vec![self.execute_non_directive(src, part_id)],
            _ => Vec::new(),
        }
    }

    /// Exactly one branch survives (or none): `if-group`, then each
    /// `elif-group` in order, then `else-group`. `endif-line` contributes
    /// nothing to the survivor tree.
    fn execute_if_section(&mut self, src: &Tree, if_section_id: NodeId) -> Vec<NodeId> {
        let if_group_id = src.get(if_section_id).children[0];
        if self.evaluate_if_group(src, if_group_id) {
            return self.execute_optional_group_child(src, if_group_id);
        }
        if let Some(elif_groups_id) = src.find_child(if_section_id, NodeName::ElifGroups) {
            for elif_id in src.get(elif_groups_id).children.clone() {
                if self.evaluate_constant_expression_child(src, elif_id) {
                    return self.execute_optional_group_child(src, elif_id);
                }
            }
        }
        if let Some(else_id) = src.find_child(if_section_id, NodeName::ElseGroup) {
            return self.execute_optional_group_child(src, else_id);
        }
        Vec::new()
    }

    fn execute_optional_group_child(&mut self, src: &Tree, parent: NodeId) -> Vec<NodeId> {
        match src.find_child(parent, NodeName::Group) {
            Some(group) => self.execute_group(src, group),
            None => Vec::new(),
        }
    }

    fn evaluate_if_group(&mut self, src: &Tree, if_group_id: NodeId) -> bool {
        let node = src.get(if_group_id);
        match node.if_group_alt {
            Some(IfGroupAlt::If) => self.evaluate_constant_expression_child(src, if_group_id),
            Some(IfGroupAlt::Ifdef) => {
                let ident = src.get(node.children[0]).terminal.clone().unwrap();
                self.symtab.is_macro(ident.lexeme)
            }
            Some(IfGroupAlt::Ifndef) => {
                let ident = src.get(node.children[0]).terminal.clone().unwrap();
                !self.symtab.is_macro(ident.lexeme)
            }
            None => false,
        }
    }

    /// Shared by `#if`'s `if-group` and every `#elif`'s `elif-group`:
    /// flatten the controlling `constant-expression`'s pp-tokens, macro
    /// expand them (with `defined` operands protected from expansion),
    /// classify via the language lexer, parse and fold via the external
    /// collaborators (§4.4's five-step `#if` evaluation).
    fn evaluate_constant_expression_child(&mut self, src: &Tree, parent: NodeId) -> bool {
        let Some(ce) = src.find_child(parent, NodeName::ConstantExpression) else {
            return false;
        };
        let Some(pp_tokens) = src.find_child(ce, NodeName::PpTokens) else {
            return false;
        };
        let mut tokens = Vec::new();
        src.flatten_tokens(pp_tokens, &mut tokens);
        let expanded = self.expand_tokens(&tokens, true);
        let lexed = kcc_lex::lex(&expanded, self.pool, self.handler);
        match kcc_par::parse_constant_expression(&lexed, self.pool) {
            Ok(ast) => kcc_par::fold_constant(&ast, &self.symtab) != 0,
            Err(_) => {
                let loc = tokens
                    .first()
                    .map(|t| t.location.clone())
                    .unwrap_or_else(|| FileLocation::start_of_file(Rc::from("<unknown>")));
                DiagnosticBuilder::error("malformed constant-expression in preprocessing conditional")
                    .code(DiagnosticCode::ErrParserInvalidTranslationUnit)
                    .at(loc)
                    .emit(self.handler);
                false
            }
        }
    }

    fn execute_control_line(&mut self, src: &Tree, id: NodeId) {
        let node = src.get(id);
        match node.control_line_alt {
            Some(ControlLineAlt::DefineObject) => {
                let name = src.get(node.children[0]).terminal.clone().unwrap();
                let mut replacement = Vec::new();
                if let Some(r) = src.find_child(id, NodeName::ReplacementList) {
                    src.flatten_tokens(r, &mut replacement);
                }
                self.symtab.define(
                    name.lexeme,
                    MacroDefinition {
                        replacement,
                        parameters: None,
                        variadic: false,
                    },
                );
            }
            Some(ControlLineAlt::DefineFunction) => {
                let name = src.get(node.children[0]).terminal.clone().unwrap();
                let params = src
                    .find_child(id, NodeName::IdentifierList)
                    .map(|p| {
                        src.get(p)
                            .children
                            .iter()
                            .map(|c| src.get(*c).terminal.clone().unwrap().lexeme)
                            .collect::<Vec<_>>()
                    })
                    .unwrap_or_default();
                let variadic = node.children.iter().any(|c| {
                    src.get(*c)
                        .terminal
                        .as_ref()
                        .map(|t| t.ppname == PpName::Punctuator && self.pool.resolve(t.lexeme) == "...")
                        .unwrap_or(false)
                });
                let mut replacement = Vec::new();
                if let Some(r) = src.find_child(id, NodeName::ReplacementList) {
                    src.flatten_tokens(r, &mut replacement);
                }
                self.symtab.define(
                    name.lexeme,
                    MacroDefinition {
                        replacement,
                        parameters: Some(params),
                        variadic,
                    },
                );
            }
            Some(ControlLineAlt::Undef) => {
                let name = src.get(node.children[0]).terminal.clone().unwrap();
                self.symtab.undefine(name.lexeme);
            }
            // #include / #line / #error / #pragma / empty: parsed and then
            // dropped from the emitted stream, per §4.4 and §9 open
            // question 2 (no semantic effect implemented in the source).
            _ => {}
        }
    }

    fn execute_text_line(&mut self, src: &Tree, id: NodeId) -> NodeId {
        let tokens = src
            .find_child(id, NodeName::PpTokens)
            .map(|t| {
                let mut v = Vec::new();
                src.flatten_tokens(t, &mut v);
                v
            })
            .unwrap_or_default();
        let expanded = self.expand_tokens(&tokens, false);
        self.build_surviving_line(NodeName::TextLine, expanded)
    }

    fn execute_non_directive(&mut self, src: &Tree, id: NodeId) -> NodeId {
        let mut tokens = Vec::new();
        if let Some(t) = src.find_child(id, NodeName::PpTokens) {
            src.flatten_tokens(t, &mut tokens);
        }
        let expanded = self.expand_tokens(&tokens, false);
        self.build_surviving_line(NodeName::NonDirective, expanded)
    }

    fn build_surviving_line(&mut self, name: NodeName, tokens: Vec<PreprocessingToken>) -> NodeId {
        let mut children = Vec::new();
        if !tokens.is_empty() {
            let leaves: Vec<NodeId> = tokens.into_iter().map(|t| self.out.leaf(NodeName::PpTokenLeaf, Some(t))).collect();
            children.push(self.out.interior(NodeName::PpTokens, leaves));
        }
        children.push(self.out.leaf(NodeName::NewLine, None));
        self.out.interior(name, children)
    }

    /// One macro-expansion pass over `tokens` (§4.4: "one expansion pass
    /// over surviving pp-tokens; no re-expansion of the just-inserted
    /// replacement"). When `protect_defined` is set (used for `#if`/`#elif`
    /// operands), the identifier operand of `defined` / `defined(...)` is
    /// copied through untouched rather than macro-substituted.
    fn expand_tokens(&mut self, tokens: &[PreprocessingToken], protect_defined: bool) -> Vec<PreprocessingToken> {
        let mut out = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let tok = &tokens[i];
            if protect_defined && tok.ppname == PpName::Identifier && self.pool.resolve(tok.lexeme) == "defined" {
                out.push(tok.clone());
                i += 1;
                if i < tokens.len() && self.is_punct(&tokens[i], "(") {
                    out.push(tokens[i].clone());
                    i += 1;
                    if i < tokens.len() {
                        out.push(tokens[i].clone());
                        i += 1;
                    }
                    if i < tokens.len() && self.is_punct(&tokens[i], ")") {
                        out.push(tokens[i].clone());
                        i += 1;
                    }
                } else if i < tokens.len() {
                    out.push(tokens[i].clone());
                    i += 1;
                }
                continue;
            }
            if tok.ppname == PpName::Identifier {
                if let Some(def) = self.symtab.lookup(tok.lexeme).cloned() {
                    if def.is_function_like() {
                        if i + 1 < tokens.len() && self.is_punct(&tokens[i + 1], "(") {
                            let (args, consumed) = self.scan_macro_args(&tokens[i + 2..]);
                            out.extend(self.substitute_function_like(&def, &args));
                            i += 2 + consumed;
                            continue;
                        }
                    } else {
                        out.extend(def.replacement);
                        i += 1;
                        continue;
                    }
                }
            }
            out.push(tok.clone());
            i += 1;
        }
        out
    }

    fn is_punct(&self, tok: &PreprocessingToken, spelling: &str) -> bool {
        tok.ppname == PpName::Punctuator && self.pool.resolve(tok.lexeme) == spelling
    }

    /// Splits the tokens following a function-like macro's `(` into
    /// comma-separated arguments at parenthesis depth 1, per §4.4.
    /// Returns the arguments and how many input tokens were consumed,
    /// including the matching closing `)`.
    fn scan_macro_args(&self, rest: &[PreprocessingToken]) -> (Vec<Vec<PreprocessingToken>>, usize) {
        let mut args: Vec<Vec<PreprocessingToken>> = vec![Vec::new()];
        let mut depth = 1usize;
        let mut idx = 0;
        while idx < rest.len() {
            let tok = &rest[idx];
            if self.is_punct(tok, "(") {
                depth += 1;
                args.last_mut().unwrap().push(tok.clone());
            } else if self.is_punct(tok, ")") {
                depth -= 1;
                if depth == 0 {
                    idx += 1;
                    break;
                }
                args.last_mut().unwrap().push(tok.clone());
            } else if depth == 1 && self.is_punct(tok, ",") {
                args.push(Vec::new());
            } else {
                args.last_mut().unwrap().push(tok.clone());
            }
            idx += 1;
        }
        if args.len() == 1 && args[0].is_empty() {
            args.clear();
        }
        (args, idx)
    }

    /// Substitutes `args` for `def`'s parameters in its replacement list.
    /// `__VA_ARGS__` receives the comma-joined trailing arguments when
    /// `def` is variadic (§4.4).
    fn substitute_function_like(&mut self, def: &MacroDefinition, args: &[Vec<PreprocessingToken>]) -> Vec<PreprocessingToken> {
        let params = def.parameters.clone().unwrap_or_default();
        let va_args_lexeme = self.pool.intern("__VA_ARGS__");
        let mut out = Vec::new();
        for tok in &def.replacement {
            if tok.ppname == PpName::Identifier {
                if let Some(pos) = params.iter().position(|p| *p == tok.lexeme) {
                    if let Some(arg) = args.get(pos) {
                        out.extend(arg.clone());
                    }
                    continue;
                }
                if def.variadic && tok.lexeme == va_args_lexeme {
                    let extra = &args[params.len().min(args.len())..];
                    for (i, arg) in extra.iter().enumerate() {
                        if i > 0 {
                            out.push(self.comma_token_at(tok));
                        }
                        out.extend(arg.clone());
                    }
                    continue;
                }
            }
            out.push(tok.clone());
        }
        out
    }

    fn comma_token_at(&mut self, at: &PreprocessingToken) -> PreprocessingToken {
        let lexeme = self.pool.intern(",");
        PreprocessingToken::new(lexeme, PpName::Punctuator, at.location.clone(), PpForm::Punctuator(Punctuator::Comma))
    }
}
