//! The Type Store (spec §3, §4.1).
//!
//! A per-translation-unit factory producing canonical type handles. Builtin,
//! pointer, array, and function types are interned so that two structurally
//! identical types share one [`TypeId`] (invariant (a) in spec §3); struct,
//! enum, and user-type references are *not* interned — they are mutable
//! handles the caller fills in after allocation, matching the factory
//! surface described in spec §4.1 (`user()`, `struct(..)`, `enum()` each
//! return a handle to a not-yet-complete [`Type`]).
//!
//! This module replaces the original's raw `QualType` (a tagged pointer into
//! a `TypeContext`) with an owning arena plus integer [`TypeId`]s, per the
//! redesign called for in spec §9.

pub mod conversion;

use std::collections::HashMap;

use crate::ids::{DeclId, ExprId, TypeId};
use crate::intern::StringId;

/// The built-in scalar types, in the exact order the conversion matrix
/// (spec §4.5.3) is indexed by. Do not reorder without updating
/// [`conversion::MATRIX`](conversion) to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinKind {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    /// Unsuffixed integer literal type; width is target-dependent, treated
    /// as `I32` for conversion purposes (spec §4.5.3).
    Int,
    Bool,
    Str,
    Void,
}

impl BuiltinKind {
    pub const ALL: [BuiltinKind; 14] = [
        BuiltinKind::U8,
        BuiltinKind::U16,
        BuiltinKind::U32,
        BuiltinKind::U64,
        BuiltinKind::I8,
        BuiltinKind::I16,
        BuiltinKind::I32,
        BuiltinKind::I64,
        BuiltinKind::F32,
        BuiltinKind::F64,
        BuiltinKind::Int,
        BuiltinKind::Bool,
        BuiltinKind::Str,
        BuiltinKind::Void,
    ];

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            BuiltinKind::U8
                | BuiltinKind::U16
                | BuiltinKind::U32
                | BuiltinKind::U64
                | BuiltinKind::I8
                | BuiltinKind::I16
                | BuiltinKind::I32
                | BuiltinKind::I64
                | BuiltinKind::Int
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, BuiltinKind::F32 | BuiltinKind::F64)
    }

    pub fn name(self) -> &'static str {
        match self {
            BuiltinKind::U8 => "u8",
            BuiltinKind::U16 => "u16",
            BuiltinKind::U32 => "u32",
            BuiltinKind::U64 => "u64",
            BuiltinKind::I8 => "i8",
            BuiltinKind::I16 => "i16",
            BuiltinKind::I32 => "i32",
            BuiltinKind::I64 => "i64",
            BuiltinKind::F32 => "f32",
            BuiltinKind::F64 => "f64",
            BuiltinKind::Int => "int",
            BuiltinKind::Bool => "bool",
            BuiltinKind::Str => "string",
            BuiltinKind::Void => "void",
        }
    }
}

/// Qualifier bits, accumulated monotonically (spec §3: "Qualifiers are
/// accumulated at construction and carried through resolution").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Qualifiers(u8);

impl Qualifiers {
    const CONST: u8 = 0b01;
    const VOLATILE: u8 = 0b10;

    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_const(self) -> bool {
        self.0 & Self::CONST != 0
    }

    pub fn is_volatile(self) -> bool {
        self.0 & Self::VOLATILE != 0
    }

    pub fn add_const(&mut self) {
        self.0 |= Self::CONST;
    }

    pub fn add_volatile(&mut self) {
        self.0 |= Self::VOLATILE;
    }
}

/// A [`TypeId`] paired with qualifier bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QualType {
    pub ty: TypeId,
    pub quals: Qualifiers,
}

impl QualType {
    pub fn new(ty: TypeId) -> Self {
        Self { ty, quals: Qualifiers::none() }
    }

    pub fn is_const(self) -> bool {
        self.quals.is_const()
    }

    #[must_use]
    pub fn with_const(mut self) -> Self {
        self.quals.add_const();
        self
    }

    #[must_use]
    pub fn with_volatile(mut self) -> Self {
        self.quals.add_volatile();
        self
    }
}

/// An array type's element count, when known. `None` models a parameter
/// written `elem[]`, whose size is supplied by the initializer or caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayType {
    pub element: QualType,
    /// The size expression, if written explicitly. Resolved in const
    /// context (spec §4.5.2) before codegen.
    pub size: Option<ExprId>,
}

/// An as-yet-unresolved reference to a named type, written in source as a
/// bare identifier or a qualified `pkg.name` (spec §3).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserType {
    /// The `Identifier` or `Member` expression spelling out the reference.
    pub name: ExprId,
    /// Filled in by [`crate::scope::FileScope::check_type`] once resolved.
    pub resolved: Option<QualType>,
}

/// A struct or union type. Anonymous inner structs are permitted (`name`
/// is `None`); `decl` is filled in once the owning `StructTypeDecl` exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructType {
    pub is_union: bool,
    pub name: Option<StringId>,
    pub decl: Option<DeclId>,
}

/// An enum type. `members` and `underlying` are filled in as the enum body
/// is parsed and analysed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumType {
    pub name: Option<StringId>,
    pub underlying: Option<QualType>,
    pub members: Vec<DeclId>,
}

/// A type value. Builtin, Pointer, Array, and Func variants are canonical
/// (interned); User, Struct, and Enum are mutable handles filled in after
/// allocation (spec §3 invariant (a)).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Builtin(BuiltinKind),
    Pointer(QualType),
    Array(ArrayType),
    User(UserType),
    Struct(StructType),
    Enum(EnumType),
    Func(DeclId),
}

impl Type {
    pub fn as_builtin(&self) -> Option<BuiltinKind> {
        match self {
            Type::Builtin(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn as_pointer(&self) -> Option<QualType> {
        match self {
            Type::Pointer(referent) => Some(*referent),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayType> {
        match self {
            Type::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_user(&self) -> Option<&UserType> {
        match self {
            Type::User(user) => Some(user),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructType> {
        match self {
            Type::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumType> {
        match self {
            Type::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_func(&self) -> Option<DeclId> {
        match self {
            Type::Func(decl) => Some(*decl),
            _ => None,
        }
    }
}

/// Per-translation-unit factory and owner of all [`Type`] values.
#[derive(Debug)]
pub struct TypeStore {
    arena: Vec<Type>,
    builtins: HashMap<BuiltinKind, TypeId>,
    interned: HashMap<Type, TypeId>,
}

impl TypeStore {
    pub fn new() -> Self {
        let mut store = Self { arena: Vec::new(), builtins: HashMap::new(), interned: HashMap::new() };
        for kind in BuiltinKind::ALL {
            let id = store.push(Type::Builtin(kind));
            store.builtins.insert(kind, id);
        }
        store
    }

    fn push(&mut self, ty: Type) -> TypeId {
        let id = TypeId::new(self.arena.len());
        self.arena.push(ty);
        id
    }

    /// Returns the canonical, unqualified handle for a builtin kind.
    pub fn builtin(&self, kind: BuiltinKind) -> QualType {
        QualType::new(self.builtins[&kind])
    }

    /// Returns (interning) the canonical pointer-to-`referent` type.
    pub fn pointer(&mut self, referent: QualType) -> QualType {
        QualType::new(self.intern(Type::Pointer(referent)))
    }

    /// Returns (interning) the canonical function type for `decl`.
    pub fn function(&mut self, decl: DeclId) -> QualType {
        QualType::new(self.intern(Type::Func(decl)))
    }

    /// Returns (interning) the canonical array type. Two arrays with equal
    /// element type and equal (or absent) size expression share a handle.
    pub fn array(&mut self, element: QualType, size: Option<ExprId>) -> QualType {
        QualType::new(self.intern(Type::Array(ArrayType { element, size })))
    }

    fn intern(&mut self, ty: Type) -> TypeId {
        if let Some(id) = self.interned.get(&ty) {
            return *id;
        }
        let id = self.push(ty.clone());
        self.interned.insert(ty, id);
        id
    }

    /// Allocates a fresh, unresolved user-type reference. Not interned:
    /// every occurrence of `foo` in source is a distinct reference until
    /// resolved, even though they'll likely resolve to the same declaration.
    pub fn new_user(&mut self, name: ExprId) -> TypeId {
        self.push(Type::User(UserType { name, resolved: None }))
    }

    /// Allocates a fresh struct/union type with no members yet.
    pub fn new_struct(&mut self, is_union: bool, name: Option<StringId>) -> TypeId {
        self.push(Type::Struct(StructType { is_union, name, decl: None }))
    }

    /// Allocates a fresh enum type with no members yet.
    pub fn new_enum(&mut self, name: Option<StringId>) -> TypeId {
        self.push(Type::Enum(EnumType { name, underlying: None, members: Vec::new() }))
    }

    pub fn get(&self, id: TypeId) -> &Type {
        &self.arena[id.index()]
    }

    pub fn get_mut(&mut self, id: TypeId) -> &mut Type {
        &mut self.arena[id.index()]
    }
}

impl Default for TypeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_singletons() {
        let store = TypeStore::new();
        assert_eq!(store.builtin(BuiltinKind::I32).ty, store.builtin(BuiltinKind::I32).ty);
        assert_ne!(store.builtin(BuiltinKind::I32).ty, store.builtin(BuiltinKind::I64).ty);
    }

    #[test]
    fn pointers_are_interned() {
        let mut store = TypeStore::new();
        let i32_ty = store.builtin(BuiltinKind::I32);
        let p1 = store.pointer(i32_ty);
        let p2 = store.pointer(i32_ty);
        assert_eq!(p1.ty, p2.ty);
    }

    #[test]
    fn struct_types_are_not_interned() {
        let mut store = TypeStore::new();
        let s1 = store.new_struct(false, None);
        let s2 = store.new_struct(false, None);
        assert_ne!(s1, s2, "anonymous struct types must be distinct handles even with identical shape");
    }

    #[test]
    fn qualifiers_accumulate_monotonically() {
        let mut q = Qualifiers::none();
        assert!(!q.is_const());
        q.add_const();
        assert!(q.is_const());
        q.add_volatile();
        assert!(q.is_const() && q.is_volatile());
    }
}
