//! kcc-par - constant-expression collaborator.
//!
//! The full syntactic parser for the downstream C grammar, and the
//! semantic annotator that type-checks and folds arbitrary expressions,
//! are external collaborators out of scope for this core (§1, §6): they
//! are specified here only through the slice of their interface the
//! preprocessor actually calls — `parse_constant_expression` and
//! `fold_constant` — restricted to the constant-expression grammar that
//! can appear after `#if`/`#elif`.
//!
//! ```text
//! constant-expression := conditional-expression
//! conditional-expression := logical-or-expression ('?' expression ':' conditional-expression)?
//! ```
//! down through the usual C precedence chain to primary expressions
//! (integer/character constants, `defined` operator, parenthesised
//! sub-expressions, and bare identifiers — which fold to `0` per C99
//! §6.10.1p4, since an undefined-macro identifier reaching this point is
//! never itself a macro invocation).

pub mod ast;
pub mod expr;
pub mod fold;

pub use ast::ConstExpr;
pub use expr::{parse_constant_expression, ParseError};
pub use fold::{fold_constant, MacroDefined};
