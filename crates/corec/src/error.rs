//! Plumbing failures.
//!
//! These are distinct from the semantic [`Diagnostic`](crate::diag::Diagnostic)s
//! produced by analysis (spec §7 is explicit that semantic problems are
//! accumulated, not raised as exceptions). `CoreError` covers the handful of
//! conditions that mean the core itself cannot continue: a hard structural
//! limit was exceeded, or the caller asked for an id that doesn't exist.

use thiserror::Error;

/// Result alias for fallible core operations that are not semantic
/// diagnostics, mirroring `ouros::exception_private::RunResult`'s role as
/// the crate's one plumbing-error alias.
pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The lexical scope stack (spec §4.5, `MAX_SCOPE_DEPTH`) is full.
    #[error("scope nesting exceeds the maximum depth of {max}")]
    ScopeDepthExceeded { max: usize },

    /// Attempted to pop a scope frame with none pushed.
    #[error("scope stack underflow: no enclosing scope to exit")]
    ScopeStackUnderflow,

    /// A caller asked the Type Store to dereference a `TypeId`/`DeclId`
    /// that does not belong to it.
    #[error("invalid handle into {arena} arena")]
    InvalidHandle { arena: &'static str },

    /// `Scope::const_mode` was entered while already in const mode, or
    /// exited while not in const mode. Indicates a bug in the analyser's
    /// own call discipline, not a user-facing semantic error.
    #[error("const-expression mode mismanaged: {0}")]
    ConstModeMisuse(&'static str),
}
