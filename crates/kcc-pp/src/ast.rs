//! The directive tree (component 5's product): `PreprocessingAstNode` in
//! spec terms, here an arena of [`Node`] values addressed by [`NodeId`].
//!
//! The tree is built bottom-up by the parser and then replaced wholesale by
//! the executor (§4.4: "executor steps REPLACE subtrees rather than
//! mutating in place") — each execution pass allocates a fresh [`Tree`]
//! rather than mutating the parsed one, so the parsed tree always remains a
//! valid, inspectable record of the input.

use kcc_util::index_vec::{define_idx, IndexVec};
use kcc_util::PreprocessingToken;

define_idx!(NodeId);

/// The non-terminal a node represents. Matches the grammar in the PP
/// parser's doc comment one-for-one; `PpTokenLeaf` is the wrapped-terminal
/// case (`PREPROCESSING_TOKEN` in the source grammar).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeName {
    PreprocessingFile,
    Group,
    GroupPart,
    IfSection,
    IfGroup,
    ElifGroups,
    ElifGroup,
    ElseGroup,
    EndifLine,
    ControlLine,
    TextLine,
    NonDirective,
    Lparen,
    ReplacementList,
    PpTokens,
    PpTokenLeaf,
    NewLine,
    IdentifierList,
    ConstantExpression,
}

/// Which production built a [`NodeName::ControlLine`] node. The other
/// directions a `control-line` can take (`#line`/`#error`/`#pragma`/empty)
/// are distinguished the same way but only `Include`/`Define*`/`Undef`
/// carry semantics the executor actually acts on; the rest are recorded
/// for round-tripping and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlLineAlt {
    Include,
    DefineObject,
    DefineFunction,
    Undef,
    Line,
    Error,
    Pragma,
    Empty,
}

/// Which production built a [`NodeName::IfGroup`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IfGroupAlt {
    If,
    Ifdef,
    Ifndef,
}

/// One node of the directive tree. Per the spec's data model, exactly one
/// of `terminal` / `children` is meaningful for a given node: leaves
/// (`PpTokenLeaf`, `NewLine`) carry `terminal` and no children; interior
/// nodes carry ordered `children` and `terminal = None`.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: NodeName,
    pub terminal: Option<PreprocessingToken>,
    pub children: Vec<NodeId>,
    pub control_line_alt: Option<ControlLineAlt>,
    pub if_group_alt: Option<IfGroupAlt>,
}

/// Arena owning every node of one parsed translation unit. Dropped whole
/// at the end of a pass, matching §5's "AST nodes ... are arena-allocated
/// per compilation and released together".
#[derive(Debug, Default)]
pub struct Tree {
    nodes: IndexVec<NodeId, Node>,
}

impl Tree {
    pub fn new() -> Self {
        Self { nodes: IndexVec::new() }
    }

    pub fn leaf(&mut self, name: NodeName, terminal: Option<PreprocessingToken>) -> NodeId {
        self.nodes.push(Node {
            name,
            terminal,
            children: Vec::new(),
            control_line_alt: None,
            if_group_alt: None,
        })
    }

    pub fn interior(&mut self, name: NodeName, children: Vec<NodeId>) -> NodeId {
        self.nodes.push(Node {
            name,
            terminal: None,
            children,
            control_line_alt: None,
            if_group_alt: None,
        })
    }

    pub fn control_line(&mut self, alt: ControlLineAlt, children: Vec<NodeId>) -> NodeId {
        let id = self.interior(NodeName::ControlLine, children);
        self.nodes[id].control_line_alt = Some(alt);
        id
    }

    pub fn if_group(&mut self, alt: IfGroupAlt, children: Vec<NodeId>) -> NodeId {
        let id = self.interior(NodeName::IfGroup, children);
        self.nodes[id].if_group_alt = Some(alt);
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// The first child (in order) carrying the given [`NodeName`], if any.
    /// The executor uses this instead of fixed positional indexing since
    /// several control-line alternatives have optional middle children
    /// (e.g. `#define`'s optional identifier-list).
    pub fn find_child(&self, id: NodeId, name: NodeName) -> Option<NodeId> {
        self.get(id).children.iter().copied().find(|c| self.get(*c).name == name)
    }

    pub fn find_children(&self, id: NodeId, name: NodeName) -> Vec<NodeId> {
        self.get(id)
            .children
            .iter()
            .copied()
            .filter(|c| self.get(*c).name == name)
            .collect()
    }

    /// Collects every [`PreprocessingToken`] under `id`'s `PpTokens`
    /// subtree, in source order — the emitter's and `#if` evaluator's
    /// shared flattening primitive.
    pub fn flatten_tokens(&self, id: NodeId, out: &mut Vec<PreprocessingToken>) {
        let node = self.get(id);
        if let Some(t) = &node.terminal {
            if node.name == NodeName::PpTokenLeaf {
                out.push(t.clone());
            }
            return;
        }
        for child in &node.children {
            self.flatten_tokens(*child, out);
        }
    }
}
