//! Constant folding: the external semantic annotator's entry point,
//! `fold_constant`, restricted to the constant-expression grammar.

use crate::ast::{BinOp, ConstExpr, UnOp};
use kcc_util::Lexema;

/// What `fold_constant` needs from the preprocessor's macro symbol table
/// to evaluate `defined`. Kept as a trait, rather than taking `kcc-pp`'s
/// concrete symbol table, so this crate never depends on `kcc-pp` (which
/// itself depends on this crate to evaluate `#if`).
pub trait MacroDefined {
    fn is_defined(&self, lexeme: Lexema) -> bool;
}

/// Folds a constant-expression AST to its `i64` value under `symtab`.
/// Integer semantics throughout (C99 `#if` operands are integer
/// constant-expressions); a folded float is truncated toward zero, matching
/// C's usual arithmetic-conversion-to-controlling-expression behaviour.
pub fn fold_constant(expr: &ConstExpr, symtab: &dyn MacroDefined) -> i64 {
    match expr {
        ConstExpr::IntegerLiteral(i) => *i,
        ConstExpr::FloatLiteral(f) => *f as i64,
        ConstExpr::Identifier(_) => 0,
        ConstExpr::Defined(lexeme) => i64::from(symtab.is_defined(*lexeme)),
        ConstExpr::Unary(op, inner) => {
            let v = fold_constant(inner, symtab);
            match op {
                UnOp::Plus => v,
                UnOp::Minus => v.wrapping_neg(),
                UnOp::Not => i64::from(v == 0),
                UnOp::BitNot => !v,
            }
        }
        ConstExpr::Binary(op, lhs, rhs) => {
            let l = fold_constant(lhs, symtab);
            // Short-circuit && / || without evaluating the other side's
            // side effects (there are none here, but this matches C's
            // evaluation-order guarantee for these two operators).
            match op {
                BinOp::LogAnd => return i64::from(l != 0 && fold_constant(rhs, symtab) != 0),
                BinOp::LogOr => return i64::from(l != 0 || fold_constant(rhs, symtab) != 0),
                _ => {}
            }
            let r = fold_constant(rhs, symtab);
            match op {
                BinOp::Mul => l.wrapping_mul(r),
                BinOp::Div => {
                    if r == 0 {
                        0
                    } else {
                        l.wrapping_div(r)
                    }
                }
                BinOp::Rem => {
                    if r == 0 {
                        0
                    } else {
                        l.wrapping_rem(r)
                    }
                }
                BinOp::Add => l.wrapping_add(r),
                BinOp::Sub => l.wrapping_sub(r),
                BinOp::Shl => l.wrapping_shl(r as u32),
                BinOp::Shr => l.wrapping_shr(r as u32),
                BinOp::Lt => i64::from(l < r),
                BinOp::Gt => i64::from(l > r),
                BinOp::Le => i64::from(l <= r),
                BinOp::Ge => i64::from(l >= r),
                BinOp::Eq => i64::from(l == r),
                BinOp::Ne => i64::from(l != r),
                BinOp::BitAnd => l & r,
                BinOp::BitXor => l ^ r,
                BinOp::BitOr => l | r,
                BinOp::LogAnd | BinOp::LogOr => unreachable!("handled above"),
            }
        }
        ConstExpr::Conditional(cond, then_branch, else_branch) => {
            if fold_constant(cond, symtab) != 0 {
                fold_constant(then_branch, symtab)
            } else {
                fold_constant(else_branch, symtab)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoMacros;
    impl MacroDefined for NoMacros {
        fn is_defined(&self, _lexeme: Lexema) -> bool {
            false
        }
    }

    struct AllMacros;
    impl MacroDefined for AllMacros {
        fn is_defined(&self, _lexeme: Lexema) -> bool {
            true
        }
    }

    fn lit(v: i64) -> ConstExpr {
        ConstExpr::IntegerLiteral(v)
    }

    #[test]
    fn folds_arithmetic() {
        let expr = ConstExpr::Binary(BinOp::Add, Box::new(lit(1)), Box::new(lit(2)));
        assert_eq!(fold_constant(&expr, &NoMacros), 3);
    }

    #[test]
    fn logical_and_short_circuits_without_panicking_on_div_by_zero() {
        let rhs = ConstExpr::Binary(BinOp::Div, Box::new(lit(1)), Box::new(lit(0)));
        let expr = ConstExpr::Binary(BinOp::LogAnd, Box::new(lit(0)), Box::new(rhs));
        assert_eq!(fold_constant(&expr, &NoMacros), 0);
    }

    #[test]
    fn conditional_picks_correct_branch() {
        let expr = ConstExpr::Conditional(Box::new(lit(0)), Box::new(lit(10)), Box::new(lit(20)));
        assert_eq!(fold_constant(&expr, &NoMacros), 20);
    }

    #[test]
    fn defined_consults_symbol_table() {
        let lexeme = kcc_util::LexemaPool::new().intern("X");
        assert_eq!(fold_constant(&ConstExpr::Defined(lexeme), &NoMacros), 0);
        assert_eq!(fold_constant(&ConstExpr::Defined(lexeme), &AllMacros), 1);
    }

    #[test]
    fn division_by_zero_folds_to_zero_rather_than_panicking() {
        let expr = ConstExpr::Binary(BinOp::Div, Box::new(lit(5)), Box::new(lit(0)));
        assert_eq!(fold_constant(&expr, &NoMacros), 0);
    }
}
