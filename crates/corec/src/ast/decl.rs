//! Declarations (spec §3 "Declarations").
//!
//! `Decl` replaces the original's `Decl` base class + `DeclKind` RTTI tag
//! with a tagged sum type (spec §9): each variant carries exactly the
//! fields that kind needs, with the fields every declaration shares pulled
//! out into [`DeclHeader`].

use crate::ids::{DeclId, ExprId, StmtId, TypeId};
use crate::intern::StringId;
use crate::span::SourceLoc;
use crate::types::QualType;

/// Fields every declaration kind carries (spec §3: "All declarations carry
/// `name`, `source location`, `is_public`").
#[derive(Debug, Clone, Copy)]
pub struct DeclHeader {
    pub name: StringId,
    pub loc: SourceLoc,
    pub is_public: bool,
}

#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub header: DeclHeader,
    pub return_type: QualType,
    pub params: Vec<DeclId>,
    pub is_variadic: bool,
    pub has_default_args: bool,
    /// `None` for a forward declaration.
    pub body: Option<StmtId>,
    /// The function type handle, cached once the Type Store has interned
    /// it; `None` until `actOnFuncDecl` finishes building the signature.
    pub func_type: Option<QualType>,
}

#[derive(Debug, Clone)]
pub struct VarDecl {
    pub header: DeclHeader,
    pub ty: QualType,
    pub init: Option<ExprId>,
    pub has_local_qualifier: bool,
    /// Incremental-array extensions attached to this declaration, in
    /// source order (spec glossary: "Incremental array").
    pub incremental: Vec<DeclId>,
}

/// One `+=`-style extension of a file-scope array variable.
#[derive(Debug, Clone)]
pub struct ArrayValueDecl {
    pub header: DeclHeader,
    pub value: ExprId,
}

#[derive(Debug, Clone)]
pub struct EnumConstantDecl {
    pub header: DeclHeader,
    pub enum_type: crate::ids::TypeId,
    pub init: Option<ExprId>,
    /// Resolved by the Function Analyser per the assignment rule in
    /// `SPEC_FULL.md` supplement 3; `None` until analysis runs.
    pub value: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct TypeAliasDecl {
    pub header: DeclHeader,
    pub aliased: QualType,
}

#[derive(Debug, Clone)]
pub struct StructTypeDecl {
    pub header: DeclHeader,
    pub is_union: bool,
    pub is_global: bool,
    /// `VarDecl` and nested `StructTypeDecl` ids, in source order.
    pub members: Vec<DeclId>,
    /// This declaration's own `Type::Struct` handle in the Type Store,
    /// allocated alongside it by `actOnStructType`.
    pub ty: TypeId,
}

#[derive(Debug, Clone)]
pub struct FunctionTypeDecl {
    pub header: DeclHeader,
    pub function: DeclId,
    /// The `Type::Func` handle wrapping `function`, allocated by
    /// `actOnFuncTypeDecl`.
    pub ty: TypeId,
}

#[derive(Debug, Clone)]
pub struct UseDecl {
    pub header: DeclHeader,
    pub target: StringId,
    pub alias: Option<StringId>,
    pub is_local: bool,
}

/// A declaration. See spec §3 and §9 — this is the tagged-sum-type
/// replacement for the original's class hierarchy.
#[derive(Debug, Clone)]
pub enum Decl {
    Function(FunctionDecl),
    Var(VarDecl),
    EnumConstant(EnumConstantDecl),
    TypeAlias(TypeAliasDecl),
    StructType(StructTypeDecl),
    FunctionType(FunctionTypeDecl),
    ArrayValue(ArrayValueDecl),
    Use(UseDecl),
}

impl Decl {
    pub fn header(&self) -> &DeclHeader {
        match self {
            Decl::Function(d) => &d.header,
            Decl::Var(d) => &d.header,
            Decl::EnumConstant(d) => &d.header,
            Decl::TypeAlias(d) => &d.header,
            Decl::StructType(d) => &d.header,
            Decl::FunctionType(d) => &d.header,
            Decl::ArrayValue(d) => &d.header,
            Decl::Use(d) => &d.header,
        }
    }

    pub fn name(&self) -> StringId {
        self.header().name
    }

    pub fn is_public(&self) -> bool {
        self.header().is_public
    }

    pub fn loc(&self) -> SourceLoc {
        self.header().loc
    }

    /// Whether this declaration kind denotes a type (used by the resolver's
    /// `checkType`/`checkUserType`, spec §4.4).
    pub fn is_typename(&self) -> bool {
        matches!(self, Decl::TypeAlias(_) | Decl::StructType(_) | Decl::FunctionType(_))
    }

    pub fn as_function(&self) -> Option<&FunctionDecl> {
        match self {
            Decl::Function(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_var(&self) -> Option<&VarDecl> {
        match self {
            Decl::Var(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_struct_type(&self) -> Option<&StructTypeDecl> {
        match self {
            Decl::StructType(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_use(&self) -> Option<&UseDecl> {
        match self {
            Decl::Use(d) => Some(d),
            _ => None,
        }
    }
}
