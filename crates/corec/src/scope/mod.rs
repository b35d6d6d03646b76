//! File Scope / Resolver (spec §4.4).
//!
//! Owned by each translation unit. Maps imported-package short names
//! (alias or real name) to the real package name, and tracks which imports
//! are `local` — grounded on the original's `Scope::addPackage` /
//! `Scope::findSymbol` / `Scope::findSymbolInUsed` (`Scope.cpp`).

use indexmap::IndexMap;

use crate::ast::{Ast, Decl, ExprKind};
use crate::diag::{Diagnostic, DiagnosticId, DiagnosticSink};
use crate::ids::{DeclId, TypeId};
use crate::intern::StringId;
use crate::package::PackageRegistry;
use crate::span::SourceLoc;
use crate::types::{QualType, Type, TypeStore};

#[derive(Debug, Clone, Copy)]
struct ImportEntry {
    real_name: StringId,
    is_local: bool,
}

/// The outcome of a symbol lookup (spec §4.4's `ScopeResult`).
#[derive(Debug)]
pub struct ScopeResult<'a> {
    /// Set when `name` matched a package short name directly.
    pub package: Option<StringId>,
    /// Set when `name` matched a declaration in some locally-used (or, for
    /// `find_symbol_in_used`, any imported) package.
    pub decl: Option<(&'a Ast, DeclId)>,
    pub ambiguous: bool,
    /// Whether the hit came from a package other than the querying scope's
    /// own package.
    pub external: bool,
    pub visible: bool,
}

impl ScopeResult<'_> {
    pub fn ok(&self) -> bool {
        !self.ambiguous && (self.package.is_some() || (self.decl.is_some() && self.visible))
    }
}

/// The file-level import table and resolution algorithm (spec §4.4).
#[derive(Debug)]
pub struct FileScope {
    own_package: StringId,
    /// Short name (alias, or real name when no alias) → import entry.
    imports: IndexMap<StringId, ImportEntry>,
}

impl FileScope {
    pub fn new(own_package: StringId) -> Self {
        Self { own_package, imports: IndexMap::new() }
    }

    pub fn own_package(&self) -> StringId {
        self.own_package
    }

    /// Registers a validated import (duplicate/alias checks are Semantic
    /// Actions' job, spec §4.3 — this trusts the caller).
    pub fn add_import(&mut self, short_name: StringId, real_name: StringId, is_local: bool) {
        self.imports.insert(short_name, ImportEntry { real_name, is_local });
    }

    /// Builds the import table for one file from its already-built `Use`
    /// declarations, wiring each one into the resolver the way a driver sits
    /// between Semantic Actions and the Function Analyser (spec §4.4).
    pub fn from_ast(ast: &Ast) -> Self {
        let mut scope = Self::new(ast.package_name());
        for &decl_id in ast.top_level() {
            if let Decl::Use(use_decl) = ast.decl(decl_id) {
                scope.add_import(use_decl.header.name, use_decl.target, use_decl.is_local);
            }
        }
        scope
    }

    /// Package names searched by plain `find_symbol`: this file's own
    /// package, plus every non-`local` import (`SPEC_FULL.md` supplement
    /// 2).
    fn locally_used(&self) -> impl Iterator<Item = StringId> + '_ {
        std::iter::once(self.own_package).chain(self.imports.values().filter(|e| !e.is_local).map(|e| e.real_name))
    }

    pub fn find_symbol<'a>(&self, name: StringId, registry: &'a PackageRegistry) -> ScopeResult<'a> {
        if let Some(entry) = self.imports.get(&name) {
            return ScopeResult {
                package: Some(entry.real_name),
                decl: None,
                ambiguous: false,
                external: entry.real_name != self.own_package,
                visible: true,
            };
        }

        let mut best: Option<(bool, &'a Ast, DeclId)> = None;
        let mut ambiguous = false;
        for pkg_name in self.locally_used() {
            let Some(pkg) = registry.package(pkg_name) else { continue };
            let Some((ast, decl)) = pkg.find_any_symbol(name) else { continue };
            let external = pkg_name != self.own_package;
            let visible = !(external && !ast.decl(decl).is_public());
            best = Some(match best {
                None => (visible, ast, decl),
                Some((prev_visible, prev_ast, prev_decl)) => {
                    if visible == prev_visible {
                        ambiguous = true;
                        (prev_visible, prev_ast, prev_decl)
                    } else if visible {
                        ambiguous = false;
                        (visible, ast, decl)
                    } else {
                        (prev_visible, prev_ast, prev_decl)
                    }
                }
            });
        }

        match best {
            None => ScopeResult { package: None, decl: None, ambiguous: false, external: false, visible: false },
            Some((visible, ast, decl)) => {
                let external = ast.package_name() != self.own_package;
                ScopeResult { package: None, decl: Some((ast, decl)), ambiguous, external, visible }
            }
        }
    }

    /// Identical traversal but over every imported package (`local` or
    /// not), first match wins, no ambiguity tracking — used to offer "did
    /// you mean `pkg.name`?" suggestions (spec §4.4).
    pub fn find_symbol_in_used<'a>(&self, name: StringId, registry: &'a PackageRegistry) -> ScopeResult<'a> {
        for entry in self.imports.values() {
            let Some(pkg) = registry.package(entry.real_name) else { continue };
            if let Some((ast, decl)) = pkg.find_any_symbol(name) {
                let external = entry.real_name != self.own_package;
                let visible = !(external && !ast.decl(decl).is_public());
                return ScopeResult { package: None, decl: Some((ast, decl)), ambiguous: false, external, visible };
            }
        }
        ScopeResult { package: None, decl: None, ambiguous: false, external: false, visible: false }
    }

    /// Recursively validates a `QualType`, resolving any `UserType` it
    /// reaches by reading the name expression out of `ast` (spec §4.4
    /// "Type-reference checking"). Returns the number of errors emitted.
    pub fn check_type(
        &self,
        qual_type: QualType,
        used_public: bool,
        ast: &Ast,
        registry: &PackageRegistry,
        types: &mut TypeStore,
        sink: &mut dyn DiagnosticSink,
    ) -> usize {
        let ty = types.get(qual_type.ty).clone();
        match ty {
            Type::Pointer(referent) => self.check_type(referent, used_public, ast, registry, types, sink),
            Type::Array(array) => self.check_type(array.element, used_public, ast, registry, types, sink),
            Type::User(user) => {
                let name_expr = ast.expr(user.name);
                let loc = name_expr.loc;
                let resolved = match &name_expr.kind {
                    ExprKind::Identifier { name, .. } => self.resolve_bare_type(*name, used_public, registry, loc, sink),
                    ExprKind::Member { base, member, .. } => {
                        let ExprKind::Identifier { name: pkg_short_name, .. } = &ast.expr(*base).kind else {
                            sink.report(Diagnostic::new(DiagnosticId::err_unknown_package, loc));
                            return 1;
                        };
                        self.resolve_qualified_type(*pkg_short_name, *member, used_public, registry, loc, sink)
                    }
                    _ => {
                        sink.report(Diagnostic::new(DiagnosticId::err_unknown_typename, loc));
                        return 1;
                    }
                };
                match resolved {
                    Some(resolved_type) => {
                        Self::attach_resolved(types, qual_type.ty, resolved_type);
                        0
                    }
                    None => 1,
                }
            }
            Type::Builtin(_) | Type::Struct(_) | Type::Enum(_) | Type::Func(_) => 0,
        }
    }

    /// Resolves a bare (unqualified) type reference: looks it up via
    /// `find_symbol`, requires a typename hit, and (when `used_public`)
    /// requires it to be public.
    fn resolve_bare_type(
        &self,
        name: StringId,
        used_public: bool,
        registry: &PackageRegistry,
        loc: SourceLoc,
        sink: &mut dyn DiagnosticSink,
    ) -> Option<QualType> {
        let result = self.find_symbol(name, registry);
        if result.ambiguous {
            sink.report(Diagnostic::new(DiagnosticId::err_ambiguous_symbol, loc));
            return None;
        }
        let (ast, decl_id) = result.decl?;
        if !result.visible {
            // `find_symbol` only ever clears `visible` for an external hit
            // that isn't public (see its own `visible = !(external &&
            // !is_public)` computation) — the own-package case is handled
            // below via `used_public`.
            sink.report(Diagnostic::new(DiagnosticId::err_not_public, loc));
            return None;
        }
        let decl = ast.decl(decl_id);
        if !decl.is_typename() {
            sink.report(Diagnostic::new(DiagnosticId::err_not_a_typename, loc));
            return None;
        }
        if used_public && !decl.is_public() {
            sink.report(Diagnostic::new(DiagnosticId::err_non_public_type, loc));
            return None;
        }
        decl_type_of(decl)
    }

    /// Resolves a qualified `pkg.name` type reference.
    fn resolve_qualified_type(
        &self,
        pkg_short_name: StringId,
        name: StringId,
        used_public: bool,
        registry: &PackageRegistry,
        loc: SourceLoc,
        sink: &mut dyn DiagnosticSink,
    ) -> Option<QualType> {
        let entry = match self.imports.get(&pkg_short_name) {
            Some(entry) => *entry,
            None => {
                // Not bound under this name at all. If it's an import's
                // *real* name used where the import actually bound an
                // alias under some other short name, that's a more
                // specific diagnostic (spec §8 invariant 10) than a plain
                // unknown package.
                let bound_under_alias = self.imports.values().any(|e| e.real_name == pkg_short_name);
                if bound_under_alias {
                    sink.report(Diagnostic::new(DiagnosticId::err_package_has_alias, loc));
                } else {
                    sink.report(Diagnostic::new(DiagnosticId::err_unknown_package, loc));
                }
                return None;
            }
        };
        let Some(pkg) = registry.package(entry.real_name) else {
            sink.report(Diagnostic::new(DiagnosticId::err_unknown_package, loc));
            return None;
        };
        let Some((ast, decl_id)) = pkg.find_any_symbol(name) else {
            sink.report(Diagnostic::new(DiagnosticId::err_unknown_package_symbol, loc));
            return None;
        };
        let decl = ast.decl(decl_id);
        let external = entry.real_name != self.own_package;
        if !decl.is_typename() {
            sink.report(Diagnostic::new(DiagnosticId::err_not_a_typename, loc));
            return None;
        }
        if external && !decl.is_public() {
            sink.report(Diagnostic::new(DiagnosticId::err_not_public, loc));
            return None;
        }
        if used_public && !external && !decl.is_public() {
            sink.report(Diagnostic::new(DiagnosticId::err_non_public_type, loc));
            return None;
        }
        decl_type_of(decl)
    }

    /// Attaches a successfully-resolved type to a `UserType` node, per spec
    /// §4.4's "Success" clause.
    fn attach_resolved(types: &mut TypeStore, user_type_id: TypeId, resolved: QualType) {
        if let Type::User(user) = types.get_mut(user_type_id) {
            user.resolved = Some(resolved);
        }
    }

    /// Drives [`Self::check_type`] over every type-bearing position in one
    /// file's top-level declarations — function return/parameter types,
    /// variable types, struct members (recursively), and type aliases —
    /// before the Function Analyser runs over function bodies. `used_public`
    /// is true wherever the reference sits in a declaration's public
    /// interface (spec §4.4), so a private function's body never holds its
    /// argument types to the public-visibility bar.
    pub fn check_all_types(
        &self,
        ast: &Ast,
        registry: &PackageRegistry,
        types: &mut TypeStore,
        sink: &mut dyn DiagnosticSink,
    ) -> usize {
        let mut errors = 0;
        for &decl_id in ast.top_level() {
            errors += self.check_decl_types(ast.decl(decl_id), ast, registry, types, sink);
        }
        errors
    }

    fn check_decl_types(
        &self,
        decl: &Decl,
        ast: &Ast,
        registry: &PackageRegistry,
        types: &mut TypeStore,
        sink: &mut dyn DiagnosticSink,
    ) -> usize {
        let used_public = decl.is_public();
        match decl {
            Decl::Function(f) => {
                let mut errors = self.check_type(f.return_type, used_public, ast, registry, types, sink);
                for &param in &f.params {
                    errors += self.check_decl_types(ast.decl(param), ast, registry, types, sink);
                }
                errors
            }
            Decl::Var(v) => self.check_type(v.ty, used_public, ast, registry, types, sink),
            Decl::TypeAlias(alias) => self.check_type(alias.aliased, used_public, ast, registry, types, sink),
            Decl::StructType(s) => {
                let mut errors = 0;
                for &member in &s.members {
                    errors += self.check_decl_types(ast.decl(member), ast, registry, types, sink);
                }
                errors
            }
            Decl::FunctionType(f) => self.check_decl_types(ast.decl(f.function), ast, registry, types, sink),
            Decl::EnumConstant(_) | Decl::ArrayValue(_) | Decl::Use(_) => 0,
        }
    }
}

/// The `QualType` a resolved typename declaration denotes, used once a type
/// reference has passed every visibility/kind check. Enums have no
/// dedicated `Decl` kind (spec §3 does not list one); an enum type is
/// always named through a `TypeAliasDecl` whose `aliased` field points at
/// the `Type::Enum` the Type Store allocated for it.
fn decl_type_of(decl: &crate::ast::Decl) -> Option<QualType> {
    match decl {
        crate::ast::Decl::TypeAlias(alias) => Some(alias.aliased),
        crate::ast::Decl::StructType(s) => Some(QualType::new(s.ty)),
        crate::ast::Decl::FunctionType(f) => Some(QualType::new(f.ty)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Decl, DeclHeader, TypeAliasDecl};
    use crate::diag::DiagnosticBag;
    use crate::intern::Interner;
    use crate::types::BuiltinKind;

    fn alias_decl(name: StringId, is_public: bool, aliased: QualType) -> Decl {
        Decl::TypeAlias(TypeAliasDecl { header: DeclHeader { name, loc: SourceLoc::DUMMY, is_public }, aliased })
    }

    #[test]
    fn same_visibility_hits_are_ambiguous() {
        let mut interner = Interner::new();
        let pkg_a = interner.intern("a");
        let pkg_b = interner.intern("b");
        let pkg_c = interner.intern("c");
        let name = interner.intern("widget");
        let types = TypeStore::new();
        let i32_ty = types.builtin(BuiltinKind::I32);

        let mut ast_a = Ast::new(pkg_a);
        let decl_a = ast_a.alloc_decl(alias_decl(name, true, i32_ty));
        ast_a.register_top_level(name, decl_a).unwrap();

        let mut ast_b = Ast::new(pkg_b);
        let decl_b = ast_b.alloc_decl(alias_decl(name, true, i32_ty));
        ast_b.register_top_level(name, decl_b).unwrap();

        let mut registry = PackageRegistry::new();
        registry.insert_ast(ast_a);
        registry.insert_ast(ast_b);

        let mut scope = FileScope::new(pkg_c);
        scope.add_import(pkg_a, pkg_a, false);
        scope.add_import(pkg_b, pkg_b, false);

        let result = scope.find_symbol(name, &registry);
        assert!(result.ambiguous);
    }

    #[test]
    fn a_later_visible_hit_overrides_an_earlier_invisible_one() {
        let mut interner = Interner::new();
        let pkg_a = interner.intern("a");
        let pkg_b = interner.intern("b");
        let pkg_c = interner.intern("c");
        let name = interner.intern("widget");
        let types = TypeStore::new();
        let i32_ty = types.builtin(BuiltinKind::I32);

        let mut ast_a = Ast::new(pkg_a);
        let decl_a = ast_a.alloc_decl(alias_decl(name, false, i32_ty));
        ast_a.register_top_level(name, decl_a).unwrap();

        let mut ast_b = Ast::new(pkg_b);
        let decl_b = ast_b.alloc_decl(alias_decl(name, true, i32_ty));
        ast_b.register_top_level(name, decl_b).unwrap();

        let mut registry = PackageRegistry::new();
        registry.insert_ast(ast_a);
        registry.insert_ast(ast_b);

        let mut scope = FileScope::new(pkg_c);
        scope.add_import(pkg_a, pkg_a, false);
        scope.add_import(pkg_b, pkg_b, false);

        let result = scope.find_symbol(name, &registry);
        assert!(!result.ambiguous);
        assert!(result.visible);
        assert_eq!(result.decl.unwrap().1, decl_b);
    }

    #[test]
    fn local_qualified_import_is_absent_from_plain_lookup() {
        let mut interner = Interner::new();
        let pkg_a = interner.intern("a");
        let pkg_b = interner.intern("b");
        let name = interner.intern("widget");
        let types = TypeStore::new();
        let i32_ty = types.builtin(BuiltinKind::I32);

        let mut ast_a = Ast::new(pkg_a);
        let decl_a = ast_a.alloc_decl(alias_decl(name, true, i32_ty));
        ast_a.register_top_level(name, decl_a).unwrap();

        let mut registry = PackageRegistry::new();
        registry.insert_ast(ast_a);

        let mut scope = FileScope::new(pkg_b);
        scope.add_import(pkg_a, pkg_a, true);

        assert!(scope.find_symbol(name, &registry).decl.is_none());
        assert!(scope.find_symbol_in_used(name, &registry).decl.is_some());
    }

    #[test]
    fn bare_type_reference_resolves_through_check_type() {
        let mut interner = Interner::new();
        let pkg_a = interner.intern("a");
        let widget = interner.intern("Widget");
        let mut types = TypeStore::new();
        let i32_ty = types.builtin(BuiltinKind::I32);

        let mut ast = Ast::new(pkg_a);
        let alias = ast.alloc_decl(alias_decl(widget, true, i32_ty));
        ast.register_top_level(widget, alias).unwrap();

        let name_expr = ast.alloc_expr(crate::ast::Expr::new(
            ExprKind::Identifier { name: widget, binding: Default::default() },
            SourceLoc::DUMMY,
        ));
        let user_type_id = types.new_user(name_expr);

        let mut registry = PackageRegistry::new();
        registry.insert_ast(ast);
        let ast = &registry.package(pkg_a).unwrap().files()[0];

        let scope = FileScope::new(pkg_a);
        let mut sink = DiagnosticBag::new();
        let errors = scope.check_type(QualType::new(user_type_id), false, ast, &registry, &mut types, &mut sink);
        assert_eq!(errors, 0);
        let Type::User(user) = types.get(user_type_id) else { unreachable!() };
        assert_eq!(user.resolved.unwrap().ty, i32_ty.ty);
    }
}
