//! Arena index newtypes.
//!
//! Spec §9 calls for replacing the original's manual owning pointers and
//! sibling raw back-pointers with one owning arena per category (Decls,
//! Stmts, Exprs, Types) plus integer indices for cross-references — the
//! same redesign `ouros::namespace::NamespaceId` and `ouros::heap::HeapId`
//! apply to namespace slots and heap objects. These four newtypes are that
//! redesign applied to the AST and Type Store.

use std::fmt;

macro_rules! arena_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub(crate) fn new(index: usize) -> Self {
                Self(index.try_into().expect(concat!(stringify!($name), " index overflowed u32")))
            }

            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

arena_id!(DeclId, "Index into an [`Ast`](crate::ast::Ast)'s declaration arena.");
arena_id!(StmtId, "Index into an [`Ast`](crate::ast::Ast)'s statement arena.");
arena_id!(ExprId, "Index into an [`Ast`](crate::ast::Ast)'s expression arena.");
arena_id!(TypeId, "Index into a [`TypeStore`](crate::types::TypeStore)'s type arena.");
