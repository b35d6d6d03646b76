//! The AST: one translation unit's owned tree of declarations, statements
//! and expressions, plus its symbol table (spec §3, §4.2).

pub mod decl;
pub mod expr;
pub mod stmt;

pub use decl::{
    ArrayValueDecl, Decl, DeclHeader, EnumConstantDecl, FunctionDecl, FunctionTypeDecl, StructTypeDecl, TypeAliasDecl,
    UseDecl, VarDecl,
};
pub use expr::{BinaryOp, BuiltinExprKind, Expr, ExprKind, IdentifierBinding, UnaryOp};
pub use stmt::{Stmt, StmtKind};

use indexmap::IndexMap;

use crate::ids::{DeclId, ExprId, StmtId};
use crate::intern::StringId;

/// One translation unit: a package name, three owning arenas (spec §9's
/// "one owning arena per category" redesign, replacing manual owning
/// pointers with `Vec` + integer index), the ordered top-level declaration
/// list, and the name → declaration symbol table (spec §4.2).
#[derive(Debug)]
pub struct Ast {
    package_name: StringId,
    decls: Vec<Decl>,
    stmts: Vec<Stmt>,
    exprs: Vec<Expr>,
    /// Top-level declarations in source order. `UseDecl`s precede all other
    /// kinds (enforced by `SemanticActions`, not re-checked here).
    top_level: Vec<DeclId>,
    /// Name → declaration, enforcing spec §4.2's "within one package the
    /// symbol map has unique keys" at the single-AST level; cross-AST
    /// aggregation (same package name, multiple files) is `Package`'s job.
    symbols: IndexMap<StringId, DeclId>,
}

impl Ast {
    pub fn new(package_name: StringId) -> Self {
        Self {
            package_name,
            decls: Vec::new(),
            stmts: Vec::new(),
            exprs: Vec::new(),
            top_level: Vec::new(),
            symbols: IndexMap::new(),
        }
    }

    pub fn package_name(&self) -> StringId {
        self.package_name
    }

    pub fn alloc_decl(&mut self, decl: Decl) -> DeclId {
        let id = DeclId::new(self.decls.len());
        self.decls.push(decl);
        id
    }

    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::new(self.stmts.len());
        self.stmts.push(stmt);
        id
    }

    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(self.exprs.len());
        self.exprs.push(expr);
        id
    }

    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id.index()]
    }

    pub fn decl_mut(&mut self, id: DeclId) -> &mut Decl {
        &mut self.decls[id.index()]
    }

    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    pub fn stmt_mut(&mut self, id: StmtId) -> &mut Stmt {
        &mut self.stmts[id.index()]
    }

    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    pub fn expr_mut(&mut self, id: ExprId) -> &mut Expr {
        &mut self.exprs[id.index()]
    }

    pub fn top_level(&self) -> &[DeclId] {
        &self.top_level
    }

    /// Registers a top-level declaration. Returns the previously-registered
    /// `DeclId` when `name` is already bound, so the caller can emit the
    /// `err_duplicate_definition` / `note_previous_definition` pair (spec
    /// §4.2's invariant) without a second lookup.
    pub fn register_top_level(&mut self, name: StringId, decl: DeclId) -> Result<(), DeclId> {
        self.top_level.push(decl);
        match self.symbols.entry(name) {
            indexmap::map::Entry::Occupied(entry) => Err(*entry.get()),
            indexmap::map::Entry::Vacant(entry) => {
                entry.insert(decl);
                Ok(())
            }
        }
    }

    /// Looks up a top-level symbol by name, irrespective of visibility —
    /// visibility filtering is `Package::find_symbol`'s job (spec §4.2).
    pub fn find_local_symbol(&self, name: StringId) -> Option<DeclId> {
        self.symbols.get(&name).copied()
    }

    pub fn symbols(&self) -> impl Iterator<Item = (StringId, DeclId)> + '_ {
        self.symbols.iter().map(|(name, decl)| (*name, *decl))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::SourceLoc;

    fn dummy_header(name: StringId) -> DeclHeader {
        DeclHeader { name, loc: SourceLoc::DUMMY, is_public: false }
    }

    #[test]
    fn registering_a_duplicate_name_returns_the_prior_decl() {
        let mut interner = crate::intern::Interner::new();
        let name = interner.intern("foo");
        let mut ast = Ast::new(interner.intern("pkg"));

        let first = ast.alloc_decl(Decl::TypeAlias(TypeAliasDecl {
            header: dummy_header(name),
            aliased: crate::types::QualType::new(crate::ids::TypeId::new(0)),
        }));
        assert!(ast.register_top_level(name, first).is_ok());

        let second = ast.alloc_decl(Decl::TypeAlias(TypeAliasDecl {
            header: dummy_header(name),
            aliased: crate::types::QualType::new(crate::ids::TypeId::new(0)),
        }));
        let prior = ast.register_top_level(name, second).unwrap_err();
        assert_eq!(prior, first);
    }
}
