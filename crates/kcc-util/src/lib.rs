//! kcc-util - Foundation types shared by every stage of the compiler front-end.
//!
//! ============================================================================
//! MODULE OVERVIEW
//! ============================================================================
//!
//! This crate holds the types that have no business living inside any one
//! compiler phase because every phase needs them: source coordinates, lexeme
//! interning, diagnostics, and a small typed-index vector used for arena-style
//! storage of tree nodes.
//!
//! DESIGN PRINCIPLES:
//! ------------------
//! 1. PER-COMPILATION LIFETIME
//!    Unlike a long-running global symbol table, the [`lexema::LexemaPool`],
//!    [`diagnostic::Handler`] and macro symbol table (see `kcc-pp`) are each
//!    owned by exactly one compilation unit and dropped together with it.
//!    Nothing here reaches for `once_cell`/global statics.
//!
//! 2. SINGLE-THREADED
//!    The front-end is a strict serial pipeline (no worker pools, no async).
//!    Interior mutability where it is convenient (the diagnostic handler) uses
//!    `RefCell`, not `Mutex`/`RwLock`.
//!
//! 3. POINTER-EQUALITY LEXEMES
//!    Two lexemes compare equal if and only if they were interned from the
//!    same bytes; comparison is a `u32` equality check on the returned handle,
//!    never a byte-by-byte comparison after the first intern.

pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod lexema;
pub mod location;
pub mod pp_token;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticCode, DiagnosticKind, Handler};
pub use error::{IndexVecError, SourceError, UtilResult};
pub use index_vec::{Idx, IndexVec};
pub use lexema::{Lexema, LexemaPool, LexemaPoolStats};
pub use location::FileLocation;
pub use pp_token::{PpForm, PpName, PreprocessingToken, Punctuator};
