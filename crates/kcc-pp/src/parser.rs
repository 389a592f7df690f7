//! PP parser (component 5): recursive-descent with backtracking over the
//! flat [`LexItem`] array the PP lexer produced, building the directive
//! tree described in `ast.rs`.
//!
//! Backtracking discipline: every `parse_*` function snapshots `self.pos`
//! on entry and restores it on failure; the work-stack of ≤16 child
//! handles the source keeps per non-terminal (§4.3, §9) is modelled here as
//! a plain `Vec<NodeId>` local to each function, released by simply
//! dropping it when the function returns `None`.

use crate::ast::{ControlLineAlt, IfGroupAlt, NodeId, NodeName, Tree};
use crate::pp_lexer::LexItem;
use kcc_util::{LexemaPool, PreprocessingToken};

const DIRECTIVE_NAMES: &[&str] = &[
    "if", "ifdef", "ifndef", "elif", "else", "endif", "include", "define", "undef", "line", "error", "pragma",
];

struct Parser<'a> {
    items: &'a [LexItem],
    space_before: &'a [bool],
    pos: usize,
    pool: &'a LexemaPool,
    tree: Tree,
}

/// Parses a whole translation unit's pp-item stream into a directive tree,
/// returning the tree and the root `preprocessing-file` node. `space_before`
/// is [`crate::pp_lexer::PpLexOutput::space_before`], aligned index-for-index
/// with `items`; the parser only consults it to tell a function-like
/// macro's `(` (no space before it, C99 §6.10.3) from an object-like
/// replacement list that happens to start with `(`.
pub fn parse(items: &[LexItem], space_before: &[bool], pool: &LexemaPool) -> (Tree, NodeId) {
    let mut p = Parser {
        items,
        space_before,
        pos: 0,
        pool,
        tree: Tree::new(),
    };
    let group = p.parse_group();
    let root = p.tree.interior(NodeName::PreprocessingFile, group.into_iter().collect());
    (p.tree, root)
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a LexItem> {
        self.items.get(self.pos)
    }

    fn peek_token(&self) -> Option<&'a PreprocessingToken> {
        match self.peek() {
            Some(LexItem::Token(t)) => Some(t),
            _ => None,
        }
    }

    fn peek_token_at(&self, offset: usize) -> Option<&'a PreprocessingToken> {
        match self.items.get(self.pos + offset) {
            Some(LexItem::Token(t)) => Some(t),
            _ => None,
        }
    }

    fn at_eof(&self) -> bool {
        self.peek_token().map(|t| t.is_eof()).unwrap_or(false)
    }

    fn is_newline(&self) -> bool {
        matches!(self.peek(), Some(LexItem::NewLine))
    }

    fn advance(&mut self) -> Option<&'a LexItem> {
        let item = self.items.get(self.pos);
        if item.is_some() {
            self.pos += 1;
        }
        item
    }

    fn text_at(&self, offset: usize) -> Option<&'a str> {
        self.peek_token_at(offset).map(|t| self.pool.resolve(t.lexeme))
    }

    fn is_hash_here(&self) -> bool {
        matches!(self.peek_token(), Some(t) if t.ppname == kcc_util::PpName::Punctuator && self.pool.resolve(t.lexeme) == "#")
    }

    /// Consumes a single pp-token and wraps it as a `PpTokenLeaf` node.
    fn consume_token_leaf(&mut self) -> NodeId {
        let LexItem::Token(tok) = self.advance().cloned().expect("caller checked a token is present") else {
            unreachable!()
        };
        self.tree.leaf(NodeName::PpTokenLeaf, Some(tok))
    }

    /// `new-line := '\n'`. Also accepted at end-of-file, since a file
    /// lacking a trailing newline still closes its last line.
    fn parse_new_line(&mut self) -> Option<NodeId> {
        if self.is_newline() {
            self.advance();
            return Some(self.tree.leaf(NodeName::NewLine, None));
        }
        if self.at_eof() {
            return Some(self.tree.leaf(NodeName::NewLine, None));
        }
        None
    }

    /// `pp-tokens := preprocessing-token | pp-tokens preprocessing-token`,
    /// consumed up to (not including) the line's terminating new-line.
    /// Returns `None` (no node) when the line has zero tokens, matching
    /// the grammar's `pp-tokens?` optionality at call sites.
    fn parse_pp_tokens(&mut self) -> Option<NodeId> {
        let mut children = Vec::new();
        while !self.is_newline() && !self.at_eof() {
            children.push(self.consume_token_leaf());
        }
        if children.is_empty() {
            None
        } else {
            Some(self.tree.interior(NodeName::PpTokens, children))
        }
    }

    fn parse_identifier_list(&mut self) -> Option<NodeId> {
        let start = self.pos;
        let mut children = Vec::new();
        loop {
            match self.peek_token() {
                Some(t) if t.ppname == kcc_util::PpName::Identifier => {
                    children.push(self.consume_token_leaf());
                }
                _ => break,
            }
            if self.punct_here(",") && !self.text_at(1).map(|s| s == "...").unwrap_or(false) {
                self.advance();
                continue;
            }
            break;
        }
        if children.is_empty() {
            self.pos = start;
            return None;
        }
        Some(self.tree.interior(NodeName::IdentifierList, children))
    }

    fn punct_here(&self, spelling: &str) -> bool {
        matches!(self.peek_token(), Some(t) if t.ppname == kcc_util::PpName::Punctuator && self.pool.resolve(t.lexeme) == spelling)
    }

    /// `group := group-part | group group-part`, represented as a single
    /// `Group` node whose children are the group-parts in source order —
    /// semantically equivalent to the source's left-recursive pairing
    /// (survivor concatenation is associative either way) and simpler to
    /// walk.
    fn parse_group(&mut self) -> Option<NodeId> {
        let mut parts = Vec::new();
        while let Some(part) = self.parse_group_part() {
            parts.push(part);
        }
        if parts.is_empty() {
            None
        } else {
            Some(self.tree.interior(NodeName::Group, parts))
        }
    }

    /// A `group` stops (without consuming) at EOF or at a `#elif` /
    /// `#else` / `#endif` line, which belong to the enclosing `if-section`.
    fn parse_group_part(&mut self) -> Option<NodeId> {
        if self.at_eof() {
            return None;
        }
        if self.is_hash_here() {
            if let Some(name) = self.text_at(1) {
                if matches!(name, "elif" | "else" | "endif") {
                    return None;
                }
            }
        }
        self.parse_if_section()
            .or_else(|| self.parse_control_line())
            .or_else(|| self.parse_text_line())
            .or_else(|| self.parse_non_directive())
    }

    fn parse_if_section(&mut self) -> Option<NodeId> {
        let start = self.pos;
        let if_group = self.parse_if_group()?;
        let mut children = vec![if_group];
        if let Some(elif_groups) = self.parse_elif_groups() {
            children.push(elif_groups);
        }
        if let Some(else_group) = self.parse_else_group() {
            children.push(else_group);
        }
        match self.parse_endif_line() {
            Some(endif) => {
                children.push(endif);
                Some(self.tree.interior(NodeName::IfSection, children))
            }
            None => {
                self.pos = start;
                None
            }
        }
    }

    fn parse_if_group(&mut self) -> Option<NodeId> {
        let start = self.pos;
        if !self.is_hash_here() {
            return None;
        }
        let name = self.text_at(1)?;
        let alt = match name {
            "if" => IfGroupAlt::If,
            "ifdef" => IfGroupAlt::Ifdef,
            "ifndef" => IfGroupAlt::Ifndef,
            _ => return None,
        };
        self.advance(); // #
        self.advance(); // if/ifdef/ifndef
        let mut children = Vec::new();
        match alt {
            IfGroupAlt::If => {
                let Some(expr_tokens) = self.parse_pp_tokens() else {
                    self.pos = start;
                    return None;
                };
                children.push(self.tree.interior(NodeName::ConstantExpression, vec![expr_tokens]));
            }
            IfGroupAlt::Ifdef | IfGroupAlt::Ifndef => {
                if self.peek_token().map(|t| t.ppname != kcc_util::PpName::Identifier).unwrap_or(true) {
                    self.pos = start;
                    return None;
                }
                children.push(self.consume_token_leaf());
            }
        }
        let Some(newline) = self.parse_new_line() else {
            self.pos = start;
            return None;
        };
        children.push(newline);
        if let Some(group) = self.parse_group() {
            children.push(group);
        }
        Some(self.tree.if_group(alt, children))
    }

    fn parse_elif_groups(&mut self) -> Option<NodeId> {
        let mut groups = Vec::new();
        while let Some(g) = self.parse_elif_group() {
            groups.push(g);
        }
        if groups.is_empty() {
            None
        } else {
            Some(self.tree.interior(NodeName::ElifGroups, groups))
        }
    }

    fn parse_elif_group(&mut self) -> Option<NodeId> {
        let start = self.pos;
        if !(self.is_hash_here() && self.text_at(1) == Some("elif")) {
            return None;
        }
        self.advance();
        self.advance();
        let Some(expr_tokens) = self.parse_pp_tokens() else {
            self.pos = start;
            return None;
        };
        let mut children = vec![self.tree.interior(NodeName::ConstantExpression, vec![expr_tokens])];
        let Some(newline) = self.parse_new_line() else {
            self.pos = start;
            return None;
        };
        children.push(newline);
        if let Some(group) = self.parse_group() {
            children.push(group);
        }
        Some(self.tree.interior(NodeName::ElifGroup, children))
    }

    fn parse_else_group(&mut self) -> Option<NodeId> {
        let start = self.pos;
        if !(self.is_hash_here() && self.text_at(1) == Some("else")) {
            return None;
        }
        self.advance();
        self.advance();
        let Some(newline) = self.parse_new_line() else {
            self.pos = start;
            return None;
        };
        let mut children = vec![newline];
        if let Some(group) = self.parse_group() {
            children.push(group);
        }
        Some(self.tree.interior(NodeName::ElseGroup, children))
    }

    fn parse_endif_line(&mut self) -> Option<NodeId> {
        let start = self.pos;
        if !(self.is_hash_here() && self.text_at(1) == Some("endif")) {
            return None;
        }
        self.advance();
        self.advance();
        let Some(newline) = self.parse_new_line() else {
            self.pos = start;
            return None;
        };
        Some(self.tree.interior(NodeName::EndifLine, vec![newline]))
    }

    fn parse_control_line(&mut self) -> Option<NodeId> {
        let start = self.pos;
        if !self.is_hash_here() {
            return None;
        }
        let name = self.text_at(1);
        match name {
            Some("include") => self.parse_control_line_pp_tokens(ControlLineAlt::Include, true),
            Some("line") => self.parse_control_line_pp_tokens(ControlLineAlt::Line, true),
            Some("error") => self.parse_control_line_pp_tokens(ControlLineAlt::Error, false),
            Some("pragma") => self.parse_control_line_pp_tokens(ControlLineAlt::Pragma, false),
            Some("define") => self.parse_define(),
            Some("undef") => self.parse_undef(),
            None if self.is_newline() || self.at_eof_after_hash() => {
                self.advance(); // #
                let Some(newline) = self.parse_new_line() else {
                    self.pos = start;
                    return None;
                };
                Some(self.tree.control_line(ControlLineAlt::Empty, vec![newline]))
            }
            _ => None,
        }
    }

    fn at_eof_after_hash(&self) -> bool {
        matches!(self.items.get(self.pos + 1), Some(LexItem::Token(t)) if t.is_eof())
    }

    fn parse_control_line_pp_tokens(&mut self, alt: ControlLineAlt, required: bool) -> Option<NodeId> {
        let start = self.pos;
        self.advance(); // #
        self.advance(); // directive name
        let tokens = self.parse_pp_tokens();
        if required && tokens.is_none() {
            self.pos = start;
            return None;
        }
        let Some(newline) = self.parse_new_line() else {
            self.pos = start;
            return None;
        };
        let mut children: Vec<NodeId> = tokens.into_iter().collect();
        children.push(newline);
        Some(self.tree.control_line(alt, children))
    }

    fn parse_undef(&mut self) -> Option<NodeId> {
        let start = self.pos;
        self.advance(); // #
        self.advance(); // undef
        if self.peek_token().map(|t| t.ppname != kcc_util::PpName::Identifier).unwrap_or(true) {
            self.pos = start;
            return None;
        }
        let ident = self.consume_token_leaf();
        let Some(newline) = self.parse_new_line() else {
            self.pos = start;
            return None;
        };
        Some(self.tree.control_line(ControlLineAlt::Undef, vec![ident, newline]))
    }

    /// `#define` has two shapes distinguished only by whether `(` follows
    /// the macro name with *no* intervening whitespace (C99 §6.10.3).
    fn parse_define(&mut self) -> Option<NodeId> {
        let start = self.pos;
        self.advance(); // #
        self.advance(); // define
        if self.peek_token().map(|t| t.ppname != kcc_util::PpName::Identifier).unwrap_or(true) {
            self.pos = start;
            return None;
        }
        let name = self.consume_token_leaf();
        let is_function_like = self.punct_here("(") && !self.space_before.get(self.pos).copied().unwrap_or(true);
        if is_function_like {
            self.advance(); // (
            let lparen = self.tree.leaf(NodeName::Lparen, None);
            let params = self.parse_identifier_list();
            if self.punct_here(",") && self.text_at(1) == Some("...") {
                self.advance(); // comma preceding a trailing `...`
            }
            let variadic = self.punct_here("...");
            let ellipsis = if variadic {
                Some(self.consume_token_leaf())
            } else {
                None
            };
            if !self.punct_here(")") {
                self.pos = start;
                return None;
            }
            self.advance(); // )
            let replacement = self.parse_replacement_list();
            let Some(newline) = self.parse_new_line() else {
                self.pos = start;
                return None;
            };
            let mut children = vec![name, lparen];
            children.extend(params);
            children.extend(ellipsis);
            children.extend(replacement);
            children.push(newline);
            Some(self.tree.control_line(ControlLineAlt::DefineFunction, children))
        } else {
            let replacement = self.parse_replacement_list();
            let Some(newline) = self.parse_new_line() else {
                self.pos = start;
                return None;
            };
            let mut children = vec![name];
            children.extend(replacement);
            children.push(newline);
            Some(self.tree.control_line(ControlLineAlt::DefineObject, children))
        }
    }

    fn parse_replacement_list(&mut self) -> Option<NodeId> {
        self.parse_pp_tokens().map(|toks| self.tree.interior(NodeName::ReplacementList, vec![toks]))
    }

    fn parse_text_line(&mut self) -> Option<NodeId> {
        if self.is_hash_here() {
            return None;
        }
        let tokens = self.parse_pp_tokens();
        let Some(newline) = self.parse_new_line() else {
            return None;
        };
        let mut children: Vec<NodeId> = tokens.into_iter().collect();
        children.push(newline);
        Some(self.tree.interior(NodeName::TextLine, children))
    }

    fn parse_non_directive(&mut self) -> Option<NodeId> {
        let start = self.pos;
        if !self.is_hash_here() {
            return None;
        }
        self.advance(); // #
        let Some(tokens) = self.parse_pp_tokens() else {
            self.pos = start;
            return None;
        };
        let Some(newline) = self.parse_new_line() else {
            self.pos = start;
            return None;
        };
        Some(self.tree.interior(NodeName::NonDirective, vec![tokens, newline]))
    }
}

#[allow(unused)]
fn directive_is_known(name: &str) -> bool {
    DIRECTIVE_NAMES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pp_lexer::tokenize;
    use kcc_util::Handler;
    use std::rc::Rc;

    fn parse_source(src: &str) -> (Tree, NodeId, LexemaPool) {
        let mut pool = LexemaPool::new();
        let handler = Handler::new();
        let out = tokenize(src, Rc::from("t.c"), &mut pool, &handler);
        let (tree, root) = parse(&out.items, &out.space_before, &pool);
        (tree, root, pool)
    }

    #[test]
    fn parses_simple_text_line() {
        let (tree, root, _pool) = parse_source("x;\n");
        let group = tree.find_child(root, NodeName::Group).unwrap();
        let parts = &tree.get(group).children;
        assert_eq!(parts.len(), 1);
        assert_eq!(tree.get(parts[0]).name, NodeName::TextLine);
    }

    #[test]
    fn parses_object_like_define() {
        let (tree, root, _pool) = parse_source("#define N 42\n");
        let group = tree.find_child(root, NodeName::Group).unwrap();
        let control = tree.get(group).children[0];
        let node = tree.get(control);
        assert_eq!(node.name, NodeName::ControlLine);
        assert_eq!(node.control_line_alt, Some(ControlLineAlt::DefineObject));
    }

    #[test]
    fn parses_if_else_endif() {
        let (tree, root, _pool) = parse_source("#if 0\nA\n#else\nB\n#endif\n");
        let group = tree.find_child(root, NodeName::Group).unwrap();
        let part = tree.get(group).children[0];
        assert_eq!(tree.get(part).name, NodeName::IfSection);
    }

    #[test]
    fn parses_function_like_define_with_params() {
        let (tree, root, _pool) = parse_source("#define ADD(a, b) a + b\n");
        let group = tree.find_child(root, NodeName::Group).unwrap();
        let control = tree.get(group).children[0];
        let node = tree.get(control);
        assert_eq!(node.control_line_alt, Some(ControlLineAlt::DefineFunction));
        assert!(tree.find_child(control, NodeName::IdentifierList).is_some());
    }
}
