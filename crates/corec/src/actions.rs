//! Semantic Actions (spec §4.3, §6).
//!
//! The parser-facing builder. Each `act_on_*` method corresponds to one
//! production the parser has just completed; it either appends to the
//! [`Ast`] under construction or synthesises and returns a node handle.
//! Only syntactic/lexical checks happen here — identifier resolution and
//! typechecking are the Function Analyser's job (spec §4.5).

use std::collections::HashSet;

use crate::ast::{
    Ast, ArrayValueDecl, BinaryOp, BuiltinExprKind, Decl, DeclHeader, EnumConstantDecl, Expr, ExprKind, FunctionDecl,
    FunctionTypeDecl, IdentifierBinding, StructTypeDecl, TypeAliasDecl, UnaryOp, UseDecl, VarDecl,
};
use crate::diag::{Diagnostic, DiagnosticId, DiagnosticSink};
use crate::ids::{DeclId, ExprId, StmtId};
use crate::intern::{Interner, StringId};
use crate::span::SourceLoc;
use crate::types::{QualType, TypeStore};

/// The parser-facing AST/Type Store builder for one translation unit.
pub struct SemanticActions {
    interner: Interner,
    ast: Ast,
    types: TypeStore,
    own_package: StringId,
    used_packages: HashSet<StringId>,
    bound_aliases: HashSet<StringId>,
    /// Struct/union declarations created with no name, tracked so
    /// `act_on_struct_type_finish` can recurse through anonymous nested
    /// members when checking name uniqueness (spec §4.3).
    anonymous_structs: HashSet<DeclId>,
}

impl SemanticActions {
    /// Corresponds to `actOnPackage` (spec §6). Rejects the reserved
    /// package name `c2` and any name starting with `__` (spec §4.3).
    ///
    /// Starts from a fresh [`Interner`]; for a multi-file compilation use
    /// [`Self::with_interner`] instead so every file shares one identifier
    /// table (see that constructor's docs for why this matters).
    pub fn new(package_name: &str, loc: SourceLoc, sink: &mut dyn DiagnosticSink) -> Self {
        Self::with_interner(package_name, loc, Interner::new(), sink)
    }

    /// Like [`Self::new`], but reuses an [`Interner`] a driver has already
    /// populated while processing earlier files in the same compilation.
    /// `PackageRegistry` and `FileScope` compare identifiers by [`StringId`],
    /// not by string — two files must share one `Interner` for "package `a`"
    /// in file 1 and "package `a`" in file 2 to resolve to the same id. A
    /// driver threads the `Interner` returned by [`Self::finish`] from one
    /// file's `SemanticActions` into the next file's `with_interner` call.
    pub fn with_interner(package_name: &str, loc: SourceLoc, mut interner: Interner, sink: &mut dyn DiagnosticSink) -> Self {
        let own_package = interner.intern(package_name);
        if package_name == "c2" {
            sink.report(Diagnostic::new(DiagnosticId::err_reserved_package_name, loc).arg(package_name));
        }
        if package_name.starts_with("__") {
            sink.report(Diagnostic::new(DiagnosticId::err_reserved_identifier, loc).arg(package_name));
        }
        Self {
            interner,
            ast: Ast::new(own_package),
            types: TypeStore::new(),
            own_package,
            used_packages: HashSet::new(),
            bound_aliases: HashSet::new(),
            anonymous_structs: HashSet::new(),
        }
    }

    pub fn intern(&mut self, text: &str) -> StringId {
        self.interner.intern(text)
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn types(&self) -> &TypeStore {
        &self.types
    }

    pub fn types_mut(&mut self) -> &mut TypeStore {
        &mut self.types
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// Consumes the builder, handing the finished `Ast` and `TypeStore` to
    /// the next pass (File Scope / Function Analyser).
    pub fn finish(self) -> (Ast, TypeStore, Interner) {
        (self.ast, self.types, self.interner)
    }

    fn check_reserved_identifier(&self, name: &str, loc: SourceLoc, sink: &mut dyn DiagnosticSink) -> bool {
        if name.starts_with("__") {
            sink.report(Diagnostic::new(DiagnosticId::err_reserved_identifier, loc).arg(name));
            return false;
        }
        true
    }

    /// `actOnUse(name, loc, aliasTok, isLocal)` (spec §6, §4.3).
    pub fn act_on_use(
        &mut self,
        target_name: &str,
        loc: SourceLoc,
        alias: Option<&str>,
        is_local: bool,
        sink: &mut dyn DiagnosticSink,
    ) -> Option<DeclId> {
        self.check_reserved_identifier(target_name, loc, sink);
        let target = self.interner.intern(target_name);

        if target == self.own_package {
            sink.report(Diagnostic::new(DiagnosticId::err_use_self_package, loc).arg(target_name));
            return None;
        }
        if !self.used_packages.insert(target) {
            sink.report(Diagnostic::new(DiagnosticId::err_duplicate_use, loc).arg(target_name));
            return None;
        }

        let short_name = match alias {
            Some(alias_text) => {
                let alias_id = self.interner.intern(alias_text);
                if alias_id == self.own_package {
                    sink.report(Diagnostic::new(DiagnosticId::err_alias_equals_package, loc).arg(alias_text));
                    return None;
                }
                if !self.bound_aliases.insert(alias_id) {
                    sink.report(Diagnostic::new(DiagnosticId::err_duplicate_alias, loc).arg(alias_text));
                    return None;
                }
                alias_id
            }
            None => target,
        };

        let header = DeclHeader { name: short_name, loc, is_public: false };
        let decl = self.ast.alloc_decl(Decl::Use(UseDecl { header, target, alias: alias.map(|_| short_name), is_local }));
        // `UseDecl`s precede all other top-level kinds (spec §4.2); callers
        // are expected to finish every `act_on_use` before any other
        // top-level action, so a plain append preserves that ordering.
        let _ = self.ast.register_top_level(short_name, decl);
        Some(decl)
    }

    /// `local` is legal only on a plain file-scope variable (spec §3's
    /// `VarDecl.has_local_qualifier`); it is forbidden on typedefs,
    /// function return types and function parameters (spec §4.3). Callers
    /// for which `local` is legal simply never call this.
    fn forbid_local(&self, is_local: bool, loc: SourceLoc, sink: &mut dyn DiagnosticSink) {
        if is_local {
            sink.report(Diagnostic::new(DiagnosticId::err_local_qualifier_forbidden, loc));
        }
    }

    /// `actOnTypeDef` (spec §6) — a `type Name = <aliased type>` alias,
    /// also the vehicle for enum and unqualified struct-type declarations
    /// (see `decl_type_of` in `crate::scope` for why enums ride on this).
    pub fn act_on_type_def(
        &mut self,
        name: &str,
        loc: SourceLoc,
        is_public: bool,
        is_local: bool,
        aliased: QualType,
        sink: &mut dyn DiagnosticSink,
    ) -> DeclId {
        self.check_reserved_identifier(name, loc, sink);
        self.forbid_local(is_local, loc, sink);
        let name_id = self.interner.intern(name);
        let header = DeclHeader { name: name_id, loc, is_public };
        let decl = self.ast.alloc_decl(Decl::TypeAlias(TypeAliasDecl { header, aliased }));
        self.register_or_report_duplicate(name_id, decl, sink);
        decl
    }

    /// `actOnVarDef` (spec §6) — a file-scope (global) variable.
    pub fn act_on_var_def(
        &mut self,
        name: &str,
        loc: SourceLoc,
        is_public: bool,
        is_local: bool,
        ty: QualType,
        init: Option<ExprId>,
        sink: &mut dyn DiagnosticSink,
    ) -> DeclId {
        self.check_reserved_identifier(name, loc, sink);
        let name_id = self.interner.intern(name);
        let header = DeclHeader { name: name_id, loc, is_public };
        let decl =
            self.ast.alloc_decl(Decl::Var(VarDecl { header, ty, init, has_local_qualifier: is_local, incremental: Vec::new() }));
        self.register_or_report_duplicate(name_id, decl, sink);
        decl
    }

    /// `actOnDeclaration` (spec §6) — a local variable declaration
    /// statement inside a function body. Unlike `act_on_var_def`, this
    /// never registers a top-level symbol: the Function Analyser binds it
    /// into the current block scope as it walks the body. Pair with
    /// `act_on_decl_stmt` to wrap the returned id in the `Expr::Decl` node
    /// `analyse_local_decl` expects.
    pub fn act_on_local_var_decl(
        &mut self,
        name: &str,
        loc: SourceLoc,
        ty: QualType,
        init: Option<ExprId>,
        sink: &mut dyn DiagnosticSink,
    ) -> DeclId {
        self.check_reserved_identifier(name, loc, sink);
        let name_id = self.interner.intern(name);
        let header = DeclHeader { name: name_id, loc, is_public: false };
        self.ast.alloc_decl(Decl::Var(VarDecl { header, ty, init, has_local_qualifier: false, incremental: Vec::new() }))
    }

    /// `actOnArrayValue` (spec §6) — one incremental-array extension,
    /// attached to `owner` (spec glossary: "Incremental array").
    pub fn act_on_array_value(&mut self, owner: DeclId, loc: SourceLoc, value: ExprId) -> DeclId {
        let name = self.ast.decl(owner).name();
        let header = DeclHeader { name, loc, is_public: false };
        let decl = self.ast.alloc_decl(Decl::ArrayValue(ArrayValueDecl { header, value }));
        if let Decl::Var(var) = self.ast.decl_mut(owner) {
            var.incremental.push(decl);
        }
        decl
    }

    /// `actOnFuncDecl` (spec §6). `params` is the ordered list of
    /// already-built `VarDecl` ids (via `act_on_function_arg`); duplicate
    /// parameter names and default-argument ordering are checked here
    /// (spec §4.3).
    #[allow(clippy::too_many_arguments)]
    pub fn act_on_func_decl(
        &mut self,
        name: &str,
        loc: SourceLoc,
        is_public: bool,
        return_type: QualType,
        params: Vec<DeclId>,
        is_variadic: bool,
        body: Option<StmtId>,
        sink: &mut dyn DiagnosticSink,
    ) -> DeclId {
        self.check_reserved_identifier(name, loc, sink);
        let has_default_args = self.check_params(&params, sink);
        let name_id = self.interner.intern(name);
        let header = DeclHeader { name: name_id, loc, is_public };
        let decl = self.ast.alloc_decl(Decl::Function(FunctionDecl {
            header,
            return_type,
            params,
            is_variadic,
            has_default_args,
            body,
            func_type: None,
        }));
        let func_type = self.types.function(decl);
        if let Decl::Function(f) = self.ast.decl_mut(decl) {
            f.func_type = Some(func_type);
        }
        self.register_or_report_duplicate(name_id, decl, sink);
        decl
    }

    /// `actOnFunctionArg` (spec §6) — one parameter of the function
    /// currently being built. `local` is always forbidden here (spec
    /// §4.3).
    pub fn act_on_function_arg(
        &mut self,
        name: &str,
        loc: SourceLoc,
        ty: QualType,
        default_value: Option<ExprId>,
        is_local: bool,
        sink: &mut dyn DiagnosticSink,
    ) -> DeclId {
        self.check_reserved_identifier(name, loc, sink);
        self.forbid_local(is_local, loc, sink);
        let name_id = self.interner.intern(name);
        let header = DeclHeader { name: name_id, loc, is_public: false };
        self.ast.alloc_decl(Decl::Var(VarDecl {
            header,
            ty,
            init: default_value,
            has_local_qualifier: false,
            incremental: Vec::new(),
        }))
    }

    /// Validates parameter-name uniqueness and default-argument ordering
    /// (spec §4.3: "duplicate param names"; "once a parameter has a
    /// default value, every subsequent parameter must also have one").
    /// Both checks are reported at the offending parameter's own
    /// `header.loc`, not the enclosing function's, matching
    /// `collect_member_names`'s `err_duplicate_member`/
    /// `note_previous_member` pairing for struct members and
    /// `register_or_report_duplicate`'s pairing for top-level
    /// redefinitions. Returns whether any parameter carries a default.
    fn check_params(&self, params: &[DeclId], sink: &mut dyn DiagnosticSink) -> bool {
        let mut seen: indexmap::IndexMap<StringId, SourceLoc> = indexmap::IndexMap::new();
        let mut saw_default = false;
        let mut has_default_args = false;
        for &param in params {
            let Decl::Var(var) = self.ast.decl(param) else { continue };
            if let Some(&prev_loc) = seen.get(&var.header.name) {
                sink.report(Diagnostic::new(DiagnosticId::err_duplicate_param, var.header.loc));
                sink.report(Diagnostic::new(DiagnosticId::note_previous_param, prev_loc));
            } else {
                seen.insert(var.header.name, var.header.loc);
            }
            if var.init.is_some() {
                saw_default = true;
                has_default_args = true;
            } else if saw_default {
                sink.report(Diagnostic::new(DiagnosticId::err_default_arg_order, var.header.loc));
            }
        }
        has_default_args
    }

    /// `actOnFuncTypeDecl` (spec §6) — wraps a `FunctionDecl` as a named
    /// type (e.g. `type Callback = func void(i32)`).
    pub fn act_on_func_type_decl(
        &mut self,
        name: &str,
        loc: SourceLoc,
        is_public: bool,
        function: DeclId,
        sink: &mut dyn DiagnosticSink,
    ) -> DeclId {
        let name_id = self.interner.intern(name);
        let ty = self.types.function(function).ty;
        let header = DeclHeader { name: name_id, loc, is_public };
        let decl = self.ast.alloc_decl(Decl::FunctionType(FunctionTypeDecl { header, function, ty }));
        self.register_or_report_duplicate(name_id, decl, sink);
        decl
    }

    /// `actOnFinishFunctionBody` (spec §6) — attaches the analysed-later
    /// body statement to the function declaration built by
    /// `act_on_func_decl`.
    pub fn act_on_finish_function_body(&mut self, function: DeclId, body: StmtId) {
        if let Decl::Function(f) = self.ast.decl_mut(function) {
            f.body = Some(body);
        }
    }

    /// `actOnStructType` (spec §6) — begins a struct/union. Members are
    /// added one at a time via `act_on_struct_member`/`act_on_struct_var`,
    /// then `act_on_struct_type_finish` validates uniqueness.
    pub fn act_on_struct_type(&mut self, name: Option<&str>, is_union: bool, is_global: bool, is_public: bool, loc: SourceLoc) -> DeclId {
        let name_id = name.map(|n| self.interner.intern(n));
        let ty = self.types.new_struct(is_union, name_id);
        let header = DeclHeader { name: name_id.unwrap_or_else(|| self.interner.intern("")), loc, is_public };
        let decl = self.ast.alloc_decl(Decl::StructType(StructTypeDecl { header, is_union, is_global, members: Vec::new(), ty }));
        if let crate::types::Type::Struct(s) = self.types.get_mut(ty) {
            s.decl = Some(decl);
        }
        if name.is_none() {
            self.anonymous_structs.insert(decl);
        }
        decl
    }

    /// `actOnStructVar` (spec §6) — a plain `VarDecl` member.
    pub fn act_on_struct_var(&mut self, owner: DeclId, name: &str, loc: SourceLoc, ty: QualType) -> DeclId {
        let name_id = self.interner.intern(name);
        let header = DeclHeader { name: name_id, loc, is_public: false };
        let member =
            self.ast.alloc_decl(Decl::Var(VarDecl { header, ty, init: None, has_local_qualifier: false, incremental: Vec::new() }));
        self.act_on_struct_member(owner, member);
        member
    }

    /// `actOnStructMember` (spec §6) — attaches an already-built member
    /// (plain var or nested anonymous struct) to `owner`.
    pub fn act_on_struct_member(&mut self, owner: DeclId, member: DeclId) {
        if let Decl::StructType(s) = self.ast.decl_mut(owner) {
            s.members.push(member);
        }
    }

    /// `actOnStructTypeFinish` (spec §6) — validates member-name
    /// uniqueness, recursing into anonymous nested structs (spec §4.3,
    /// §8 invariant 4), then registers a *named, global* struct as a
    /// top-level symbol the way `act_on_type_def`/`act_on_enum_type_finished`
    /// already do for the other typename-bearing declarations (spec §4.2) —
    /// an anonymous or non-global struct has nothing to register under.
    pub fn act_on_struct_type_finish(&mut self, owner: DeclId, sink: &mut dyn DiagnosticSink) {
        let mut seen: indexmap::IndexMap<StringId, SourceLoc> = indexmap::IndexMap::new();
        self.collect_member_names(owner, &mut seen, sink);
        let is_registrable = matches!(self.ast.decl(owner), Decl::StructType(s) if s.is_global && !self.anonymous_structs.contains(&owner));
        if is_registrable {
            let name_id = self.ast.decl(owner).name();
            self.register_or_report_duplicate(name_id, owner, sink);
        }
    }

    fn collect_member_names(
        &self,
        owner: DeclId,
        seen: &mut indexmap::IndexMap<StringId, SourceLoc>,
        sink: &mut dyn DiagnosticSink,
    ) {
        let Decl::StructType(s) = self.ast.decl(owner) else { return };
        for &member in &s.members {
            match self.ast.decl(member) {
                Decl::Var(var) => {
                    if let Some(&prev_loc) = seen.get(&var.header.name) {
                        sink.report(Diagnostic::new(DiagnosticId::err_duplicate_member, var.header.loc));
                        sink.report(Diagnostic::new(DiagnosticId::note_previous_member, prev_loc));
                    } else {
                        seen.insert(var.header.name, var.header.loc);
                    }
                }
                Decl::StructType(_) if self.anonymous_structs.contains(&member) => {
                    self.collect_member_names(member, seen, sink);
                }
                Decl::StructType(nested) => {
                    if let Some(&prev_loc) = seen.get(&nested.header.name) {
                        sink.report(Diagnostic::new(DiagnosticId::err_duplicate_member, nested.header.loc));
                        sink.report(Diagnostic::new(DiagnosticId::note_previous_member, prev_loc));
                    } else {
                        seen.insert(nested.header.name, nested.header.loc);
                    }
                }
                _ => {}
            }
        }
    }

    /// `actOnEnumType` (spec §6) — begins an enum; members are added via
    /// `act_on_enum_constant`.
    pub fn act_on_enum_type(&mut self, name: &str, loc: SourceLoc, is_public: bool, underlying: Option<QualType>) -> DeclId {
        let name_id = self.interner.intern(name);
        let enum_ty = self.types.new_enum(Some(name_id));
        if let crate::types::Type::Enum(e) = self.types.get_mut(enum_ty) {
            e.underlying = underlying;
        }
        let header = DeclHeader { name: name_id, loc, is_public };
        self.ast.alloc_decl(Decl::TypeAlias(TypeAliasDecl { header, aliased: QualType::new(enum_ty) }))
    }

    /// `actOnEnumConstant` (spec §6) — one member. `value` resolution
    /// (`SPEC_FULL.md` supplement 3) happens later, in the Function
    /// Analyser; this only records the optional initializer expression.
    pub fn act_on_enum_constant(
        &mut self,
        enum_decl: DeclId,
        name: &str,
        loc: SourceLoc,
        init: Option<ExprId>,
    ) -> DeclId {
        let name_id = self.interner.intern(name);
        let enum_type = match self.ast.decl(enum_decl) {
            Decl::TypeAlias(alias) => alias.aliased.ty,
            _ => unreachable!("act_on_enum_type always produces a TypeAlias"),
        };
        let header = DeclHeader { name: name_id, loc, is_public: true };
        let constant = self.ast.alloc_decl(Decl::EnumConstant(EnumConstantDecl { header, enum_type, init, value: None }));
        if let crate::types::Type::Enum(e) = self.types.get_mut(enum_type) {
            e.members.push(constant);
        }
        constant
    }

    /// `actOnEnumTypeFinished` (spec §6).
    pub fn act_on_enum_type_finished(&mut self, enum_decl: DeclId, sink: &mut dyn DiagnosticSink) {
        let name_id = self.ast.decl(enum_decl).name();
        self.register_or_report_duplicate(name_id, enum_decl, sink);
    }

    fn register_or_report_duplicate(&mut self, name: StringId, decl: DeclId, sink: &mut dyn DiagnosticSink) {
        if let Err(prior) = self.ast.register_top_level(name, decl) {
            let loc = self.ast.decl(decl).loc();
            let prior_loc = self.ast.decl(prior).loc();
            sink.report(Diagnostic::new(DiagnosticId::err_duplicate_definition, loc));
            sink.report(Diagnostic::new(DiagnosticId::note_previous_definition, prior_loc));
        }
    }

    // --- Statements (spec §6) ---

    pub fn act_on_return(&mut self, loc: SourceLoc, value: Option<ExprId>) -> StmtId {
        self.ast.alloc_stmt(crate::ast::Stmt::new(crate::ast::StmtKind::Return(value), loc))
    }

    pub fn act_on_if(&mut self, loc: SourceLoc, cond: ExprId, then_branch: StmtId, else_branch: Option<StmtId>) -> StmtId {
        self.ast.alloc_stmt(crate::ast::Stmt::new(crate::ast::StmtKind::If { cond, then_branch, else_branch }, loc))
    }

    pub fn act_on_while(&mut self, loc: SourceLoc, cond: ExprId, body: StmtId) -> StmtId {
        self.ast.alloc_stmt(crate::ast::Stmt::new(crate::ast::StmtKind::While { cond, body }, loc))
    }

    pub fn act_on_do(&mut self, loc: SourceLoc, body: StmtId, cond: ExprId) -> StmtId {
        self.ast.alloc_stmt(crate::ast::Stmt::new(crate::ast::StmtKind::Do { body, cond }, loc))
    }

    pub fn act_on_for(
        &mut self,
        loc: SourceLoc,
        init: Option<StmtId>,
        cond: Option<ExprId>,
        step: Option<ExprId>,
        body: StmtId,
    ) -> StmtId {
        self.ast.alloc_stmt(crate::ast::Stmt::new(crate::ast::StmtKind::For { init, cond, step, body }, loc))
    }

    pub fn act_on_switch(&mut self, loc: SourceLoc, cond: ExprId, cases: Vec<StmtId>) -> StmtId {
        self.ast.alloc_stmt(crate::ast::Stmt::new(crate::ast::StmtKind::Switch { cond, cases }, loc))
    }

    pub fn act_on_case(&mut self, loc: SourceLoc, value: ExprId, body: Vec<StmtId>) -> StmtId {
        self.ast.alloc_stmt(crate::ast::Stmt::new(crate::ast::StmtKind::Case { value, body }, loc))
    }

    pub fn act_on_default(&mut self, loc: SourceLoc, body: Vec<StmtId>) -> StmtId {
        self.ast.alloc_stmt(crate::ast::Stmt::new(crate::ast::StmtKind::Default { body }, loc))
    }

    pub fn act_on_break(&mut self, loc: SourceLoc) -> StmtId {
        self.ast.alloc_stmt(crate::ast::Stmt::new(crate::ast::StmtKind::Break, loc))
    }

    pub fn act_on_continue(&mut self, loc: SourceLoc) -> StmtId {
        self.ast.alloc_stmt(crate::ast::Stmt::new(crate::ast::StmtKind::Continue, loc))
    }

    pub fn act_on_label(&mut self, loc: SourceLoc, name: &str, target: StmtId) -> StmtId {
        let name_id = self.interner.intern(name);
        self.ast.alloc_stmt(crate::ast::Stmt::new(crate::ast::StmtKind::Label { name: name_id, target }, loc))
    }

    pub fn act_on_goto(&mut self, loc: SourceLoc, label: &str) -> StmtId {
        let label_id = self.interner.intern(label);
        self.ast.alloc_stmt(crate::ast::Stmt::new(crate::ast::StmtKind::Goto { label: label_id }, loc))
    }

    pub fn act_on_compound(&mut self, loc: SourceLoc, stmts: Vec<StmtId>) -> StmtId {
        self.ast.alloc_stmt(crate::ast::Stmt::new(crate::ast::StmtKind::Compound(stmts), loc))
    }

    pub fn act_on_decl_stmt(&mut self, loc: SourceLoc, decl: DeclId) -> StmtId {
        let expr = self.ast.alloc_expr(Expr::new(ExprKind::Decl(decl), loc));
        self.ast.alloc_stmt(crate::ast::Stmt::new(crate::ast::StmtKind::Expr(expr), loc))
    }

    pub fn act_on_expr_stmt(&mut self, loc: SourceLoc, expr: ExprId) -> StmtId {
        self.ast.alloc_stmt(crate::ast::Stmt::new(crate::ast::StmtKind::Expr(expr), loc))
    }

    // --- Expressions (spec §6) ---

    pub fn act_on_integer_literal(&mut self, loc: SourceLoc, value: i64) -> ExprId {
        self.ast.alloc_expr(Expr::new(ExprKind::IntegerLiteral(value), loc))
    }

    pub fn act_on_float_literal(&mut self, loc: SourceLoc, value: f64) -> ExprId {
        self.ast.alloc_expr(Expr::new(ExprKind::FloatingLiteral(value), loc))
    }

    pub fn act_on_bool_literal(&mut self, loc: SourceLoc, value: bool) -> ExprId {
        self.ast.alloc_expr(Expr::new(ExprKind::BooleanLiteral(value), loc))
    }

    /// `SPEC_FULL.md` supplement 4: the lexer hands back already-unescaped
    /// text, so this only validates exactly one code unit was produced.
    pub fn act_on_char_literal(&mut self, loc: SourceLoc, value: u8) -> ExprId {
        self.ast.alloc_expr(Expr::new(ExprKind::CharacterLiteral(value), loc))
    }

    pub fn act_on_string_literal(&mut self, loc: SourceLoc, text: &str) -> ExprId {
        let id = self.interner.intern(text);
        self.ast.alloc_expr(Expr::new(ExprKind::StringLiteral(id), loc))
    }

    pub fn act_on_identifier(&mut self, loc: SourceLoc, name: &str) -> ExprId {
        let name_id = self.interner.intern(name);
        self.ast.alloc_expr(Expr::new(ExprKind::Identifier { name: name_id, binding: IdentifierBinding::default() }, loc))
    }

    pub fn act_on_paren(&mut self, loc: SourceLoc, inner: ExprId) -> ExprId {
        self.ast.alloc_expr(Expr::new(ExprKind::Paren(inner), loc))
    }

    pub fn act_on_call(&mut self, loc: SourceLoc, callee: ExprId, args: Vec<ExprId>) -> ExprId {
        self.ast.alloc_expr(Expr::new(ExprKind::Call { callee, args }, loc))
    }

    pub fn act_on_member(&mut self, loc: SourceLoc, base: ExprId, member: &str, is_arrow: bool) -> ExprId {
        let member_id = self.interner.intern(member);
        self.ast.alloc_expr(Expr::new(
            ExprKind::Member { base, member: member_id, is_arrow, binding: IdentifierBinding::default() },
            loc,
        ))
    }

    pub fn act_on_array_subscript(&mut self, loc: SourceLoc, base: ExprId, index: ExprId) -> ExprId {
        self.ast.alloc_expr(Expr::new(ExprKind::ArraySubscript { base, index }, loc))
    }

    pub fn act_on_init_list(&mut self, loc: SourceLoc, elements: Vec<ExprId>) -> ExprId {
        self.ast.alloc_expr(Expr::new(ExprKind::InitList(elements), loc))
    }

    pub fn act_on_type_expr(&mut self, loc: SourceLoc, ty: QualType) -> ExprId {
        self.ast.alloc_expr(Expr::new(ExprKind::Type(ty), loc))
    }

    pub fn act_on_binary_op(&mut self, loc: SourceLoc, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.ast.alloc_expr(Expr::new(ExprKind::Binary { op, lhs, rhs }, loc))
    }

    pub fn act_on_conditional_op(&mut self, loc: SourceLoc, cond: ExprId, then_expr: ExprId, else_expr: ExprId) -> ExprId {
        self.ast.alloc_expr(Expr::new(ExprKind::Conditional { cond, then_expr, else_expr }, loc))
    }

    pub fn act_on_unary_op(&mut self, loc: SourceLoc, op: UnaryOp, operand: ExprId, is_postfix: bool) -> ExprId {
        self.ast.alloc_expr(Expr::new(ExprKind::Unary { op, operand, is_postfix }, loc))
    }

    pub fn act_on_builtin_expr(&mut self, loc: SourceLoc, kind: BuiltinExprKind, operand: ExprId) -> ExprId {
        self.ast.alloc_expr(Expr::new(ExprKind::Builtin { kind, operand }, loc))
    }
}
