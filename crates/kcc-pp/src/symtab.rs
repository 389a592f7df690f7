//! The preprocessor's macro symbol table (component 6's state).
//!
//! Exclusive to the PP executor and freed after emission (§5). Backed by
//! an `FxHashMap` keyed on interned [`Lexema`] handles — comparisons are
//! `u32` equality, never string comparison, per the lexema pool's
//! pointer-equality guarantee.

use kcc_par::MacroDefined;
use kcc_util::{Lexema, PreprocessingToken};
use rustc_hash::FxHashMap;

/// One macro binding. Object-like macros have `parameters = None`;
/// function-like macros (including variadic ones) have `Some(params)`.
#[derive(Debug, Clone)]
pub struct MacroDefinition {
    pub replacement: Vec<PreprocessingToken>,
    pub parameters: Option<Vec<Lexema>>,
    pub variadic: bool,
}

impl MacroDefinition {
    pub fn is_function_like(&self) -> bool {
        self.parameters.is_some()
    }
}

/// `identifier_lexeme -> MACRO_NAME` bindings, per §3's `SymbolTable`.
#[derive(Debug, Default)]
pub struct SymbolTable {
    macros: FxHashMap<Lexema, MacroDefinition>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// `#define`. Redefinition policy is last-writer-wins (§4.4, §9: no
    /// diagnostic required).
    pub fn define(&mut self, name: Lexema, definition: MacroDefinition) {
        self.macros.insert(name, definition);
    }

    /// `#undef`; a no-op if `name` is not bound.
    pub fn undefine(&mut self, name: Lexema) {
        self.macros.remove(&name);
    }

    pub fn lookup(&self, name: Lexema) -> Option<&MacroDefinition> {
        self.macros.get(&name)
    }

    pub fn is_macro(&self, name: Lexema) -> bool {
        self.macros.contains_key(&name)
    }
}

impl MacroDefined for SymbolTable {
    fn is_defined(&self, lexeme: Lexema) -> bool {
        self.is_macro(lexeme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kcc_util::LexemaPool;

    #[test]
    fn define_then_undef_round_trips() {
        let mut pool = LexemaPool::new();
        let n = pool.intern("N");
        let mut table = SymbolTable::new();
        assert!(!table.is_macro(n));
        table.define(
            n,
            MacroDefinition {
                replacement: Vec::new(),
                parameters: None,
                variadic: false,
            },
        );
        assert!(table.is_macro(n));
        table.undefine(n);
        assert!(!table.is_macro(n));
    }

    #[test]
    fn redefinition_is_last_writer_wins() {
        let mut pool = LexemaPool::new();
        let n = pool.intern("N");
        let one = pool.intern("1");
        let two = pool.intern("2");
        let loc = kcc_util::FileLocation::start_of_file(std::rc::Rc::from("t.c"));
        let mut table = SymbolTable::new();
        table.define(
            n,
            MacroDefinition {
                replacement: vec![PreprocessingToken::new(
                    one,
                    kcc_util::PpName::PpNumber,
                    loc.clone(),
                    kcc_util::PpForm::PpNumber,
                )],
                parameters: None,
                variadic: false,
            },
        );
        table.define(
            n,
            MacroDefinition {
                replacement: vec![PreprocessingToken::new(two, kcc_util::PpName::PpNumber, loc, kcc_util::PpForm::PpNumber)],
                parameters: None,
                variadic: false,
            },
        );
        assert_eq!(table.lookup(n).unwrap().replacement[0].lexeme, two);
    }

    #[test]
    fn undef_of_absent_name_is_a_no_op() {
        let mut pool = LexemaPool::new();
        let n = pool.intern("GHOST");
        let mut table = SymbolTable::new();
        table.undefine(n);
        assert!(!table.is_macro(n));
    }
}
