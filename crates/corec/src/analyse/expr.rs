//! `analyseExpr` (spec §4.5): the per-expression-kind type assignment and
//! diagnostic dispatch, plus member-access resolution (spec §4.5.1).

use super::FunctionAnalyser;
use crate::ast::{BinaryOp, BuiltinExprKind, Decl, ExprKind, IdentifierBinding, UnaryOp};
use crate::diag::{Diagnostic, DiagnosticId};
use crate::ids::{DeclId, ExprId};
use crate::intern::StringId;
use crate::span::SourceLoc;
use crate::types::{BuiltinKind, QualType, Type};

impl FunctionAnalyser<'_> {
    /// Visits `id`, assigning its `ty` field exactly once (spec §3's
    /// lifecycle). Re-visiting an already-analysed node (e.g. an
    /// initializer shared by an incremental-array chain) just returns the
    /// cached type.
    pub(crate) fn analyse_expr(&mut self, id: ExprId) -> Option<QualType> {
        if let Some(ty) = self.ast.expr(id).ty {
            return Some(ty);
        }
        let kind = self.ast.expr(id).kind.clone();
        let loc = self.ast.expr(id).loc;
        let ty = match kind {
            ExprKind::IntegerLiteral(_) => Some(self.types.builtin(BuiltinKind::Int)),
            ExprKind::FloatingLiteral(_) => Some(self.types.builtin(BuiltinKind::F32)),
            ExprKind::BooleanLiteral(_) => Some(self.types.builtin(BuiltinKind::Bool)),
            ExprKind::CharacterLiteral(_) => Some(self.types.builtin(BuiltinKind::I8)),
            ExprKind::StringLiteral(_) => {
                let i8_const = self.types.builtin(BuiltinKind::I8).with_const();
                Some(self.types.pointer(i8_const))
            }
            ExprKind::Identifier { name, .. } => self.analyse_identifier(id, name, loc),
            ExprKind::Paren(inner) => self.analyse_expr(inner),
            ExprKind::Call { callee, args } => self.analyse_call(callee, &args, loc),
            ExprKind::Member { base, member, is_arrow, .. } => self.analyse_member(id, base, member, is_arrow, loc),
            ExprKind::ArraySubscript { base, index } => self.analyse_subscript(base, index, loc),
            ExprKind::InitList(items) => {
                for item in items {
                    self.analyse_expr(item);
                }
                None
            }
            ExprKind::Decl(decl_id) => {
                self.analyse_local_decl(decl_id);
                None
            }
            ExprKind::Type(qual) => Some(qual),
            ExprKind::Binary { op, lhs, rhs } => self.analyse_binary(op, lhs, rhs, loc),
            ExprKind::Conditional { cond, then_expr, else_expr } => self.analyse_conditional(cond, then_expr, else_expr),
            ExprKind::Unary { op, operand, is_postfix } => self.analyse_unary(op, operand, is_postfix, loc),
            ExprKind::Builtin { kind, operand } => self.analyse_builtin(kind, operand, loc),
        };
        self.ast.expr_mut(id).ty = ty;
        ty
    }

    /// Introduces a local variable (spec §3: `Expr::Decl`), analysing its
    /// initializer against its declared type before binding the name so a
    /// self-referential initializer (`int x = x;`) sees the enclosing
    /// scope's `x`, not the one being declared.
    pub(crate) fn analyse_local_decl(&mut self, decl_id: DeclId) {
        let Decl::Var(v) = self.ast.decl(decl_id).clone() else { return };
        if let Some(init) = v.init {
            let init_ty = self.analyse_expr(init);
            let loc = self.ast.expr(init).loc;
            self.check_init(v.ty, init_ty, loc);
        }
        self.scopes.declare(v.header.name, decl_id);
    }

    fn report_undeclared(&mut self, name: StringId, loc: SourceLoc) {
        let rendered = self.interner.resolve(name).to_string();
        self.sink.report(Diagnostic::new(DiagnosticId::err_undeclared_var_use, loc).arg(rendered.clone()));
        if let Some((pkg_name, ast, decl)) = self.registry.suggest_symbol(name) {
            let qualified = format!("{}.{}", self.interner.resolve(pkg_name), rendered);
            let decl_loc = ast.decl(decl).loc();
            self.sink.report(Diagnostic::new(DiagnosticId::note_function_suggestion, decl_loc).arg(qualified));
        }
    }

    fn set_binding(&mut self, id: ExprId, decl: Option<DeclId>, package: Option<StringId>) {
        if let ExprKind::Identifier { binding, .. } | ExprKind::Member { binding, .. } = &mut self.ast.expr_mut(id).kind {
            *binding = IdentifierBinding { decl, package };
        }
    }

    /// Resolves a bare identifier: local scope first, then this file's own
    /// top-level declarations (the current file sits behind `&mut Ast`, not
    /// `registry`, while it's under analysis — see
    /// [`super::FunctionAnalyser`]'s own doc comment — so a same-file
    /// top-level reference would otherwise be invisible to `FileScope`),
    /// then `FileScope` for everything else (spec §4.4/§4.5). A hit that
    /// denotes a package short name (the base of a later `Member`) carries
    /// no value type of its own.
    fn analyse_identifier(&mut self, id: ExprId, name: StringId, loc: SourceLoc) -> Option<QualType> {
        if let Some(decl_id) = self.scopes.find_symbol(name) {
            self.set_binding(id, Some(decl_id), None);
            let is_const = self.is_const_decl(self.ast.decl(decl_id));
            if !is_const {
                self.require_const(loc);
            }
            return self.decl_value_type(self.ast, decl_id);
        }

        if let Some(decl_id) = self.ast.find_local_symbol(name) {
            self.set_binding(id, Some(decl_id), None);
            let is_const = self.is_const_decl(self.ast.decl(decl_id));
            if !is_const {
                self.require_const(loc);
            }
            return self.decl_value_type(self.ast, decl_id);
        }

        let result = self.file_scope.find_symbol(name, self.registry);
        if result.ambiguous {
            self.sink.report(Diagnostic::new(DiagnosticId::err_ambiguous_symbol, loc));
            return None;
        }
        if let Some(pkg) = result.package {
            self.set_binding(id, None, Some(pkg));
            return None;
        }
        if let Some((ast, decl_id)) = result.decl {
            if !result.visible {
                self.sink.report(Diagnostic::new(DiagnosticId::err_not_public, loc));
                return None;
            }
            let pkg = result.external.then(|| ast.package_name());
            self.set_binding(id, Some(decl_id), pkg);
            let is_const = self.is_const_decl(ast.decl(decl_id));
            if !is_const {
                self.require_const(loc);
            }
            return self.decl_value_type(ast, decl_id);
        }

        self.report_undeclared(name, loc);
        None
    }

    /// The `QualType` a resolved declaration denotes when it appears as a
    /// *value* (as opposed to `scope::decl_type_of`, which only covers
    /// typename declarations).
    fn decl_value_type(&self, ast: &crate::ast::Ast, decl_id: DeclId) -> Option<QualType> {
        match ast.decl(decl_id) {
            Decl::Function(f) => f.func_type,
            Decl::Var(v) => Some(v.ty),
            Decl::EnumConstant(ec) => Some(QualType::new(ec.enum_type)),
            _ => None,
        }
    }

    /// Member access (spec §4.5.1). Two cases: the base names a package
    /// (`pkg.symbol`), or the base is a value whose type must resolve to a
    /// struct/union, possibly through one level of pointer dereference.
    fn analyse_member(&mut self, id: ExprId, base: ExprId, member: StringId, is_arrow: bool, loc: SourceLoc) -> Option<QualType> {
        let base_is_local = if let ExprKind::Identifier { name, .. } = &self.ast.expr(base).kind {
            self.scopes.find_symbol(*name).is_some() || self.ast.find_local_symbol(*name).is_some()
        } else {
            false
        };
        if let ExprKind::Identifier { name: base_name, .. } = &self.ast.expr(base).kind {
            let base_name = *base_name;
            let base_result = self.file_scope.find_symbol(base_name, self.registry);
            if !base_is_local && let Some(pkg_name) = base_result.package {
                self.set_binding(base, None, Some(pkg_name));
                if is_arrow {
                    self.sink.report(Diagnostic::new(DiagnosticId::err_unknown_package_misuse, loc));
                }
                let Some(pkg) = self.registry.package(pkg_name) else {
                    self.sink.report(Diagnostic::new(DiagnosticId::err_unknown_package_symbol, loc));
                    return None;
                };
                let Some((ast, decl_id)) = pkg.find_any_symbol(member) else {
                    self.sink.report(Diagnostic::new(DiagnosticId::err_unknown_package_symbol, loc));
                    return None;
                };
                let same_package = pkg_name == self.file_scope.own_package();
                if !ast.decl(decl_id).is_public() && !same_package {
                    self.sink.report(Diagnostic::new(DiagnosticId::err_not_public, loc));
                    return None;
                }
                self.set_binding(id, Some(decl_id), Some(pkg_name));
                return self.decl_value_type(ast, decl_id);
            }
        }

        let base_ty = self.analyse_expr(base)?;
        let resolved = self.resolve_through_user(base_ty);
        let struct_ty = if is_arrow {
            let Some(referent) = self.types.get(resolved.ty).as_pointer() else {
                self.sink.report(Diagnostic::new(DiagnosticId::err_expected_pointer, loc));
                return None;
            };
            self.resolve_through_user(referent)
        } else if let Some(referent) = self.types.get(resolved.ty).as_pointer() {
            // Lenient auto-deref: `.` on a pointer behaves like `->`.
            self.resolve_through_user(referent)
        } else {
            resolved
        };

        let Type::Struct(s) = self.types.get(struct_ty.ty) else {
            self.sink.report(Diagnostic::new(DiagnosticId::err_not_struct_or_union, loc));
            return None;
        };
        let Some(struct_decl) = s.decl else {
            self.sink.report(Diagnostic::new(DiagnosticId::err_not_struct_or_union, loc));
            return None;
        };
        match self.find_member(struct_decl, member) {
            Some(member_decl) => {
                self.set_binding(id, Some(member_decl), None);
                self.decl_value_type(self.ast, member_decl)
            }
            None => {
                self.sink.report(Diagnostic::new(DiagnosticId::err_no_member, loc));
                None
            }
        }
    }

    /// Recurses into anonymous nested structs/unions so their members are
    /// visible as if flattened into the enclosing type (spec §4.5.1).
    fn find_member(&self, struct_decl: DeclId, member: StringId) -> Option<DeclId> {
        let Decl::StructType(s) = self.ast.decl(struct_decl) else { return None };
        for &m in &s.members {
            match self.ast.decl(m) {
                Decl::Var(v) if v.header.name == member => return Some(m),
                Decl::StructType(nested) => {
                    let is_anonymous = self.types.get(nested.ty).as_struct().is_some_and(|st| st.name.is_none());
                    if is_anonymous {
                        if let Some(found) = self.find_member(m, member) {
                            return Some(found);
                        }
                    } else if nested.header.name == member {
                        return Some(m);
                    }
                }
                _ => {}
            }
        }
        None
    }

    fn analyse_subscript(&mut self, base: ExprId, index: ExprId, loc: SourceLoc) -> Option<QualType> {
        let base_ty = self.analyse_expr(base)?;
        self.analyse_expr(index);
        let resolved = self.resolve_through_user(base_ty);
        match self.types.get(resolved.ty) {
            Type::Array(array) => Some(array.element),
            Type::Pointer(referent) => Some(*referent),
            _ => {
                self.sink.report(Diagnostic::new(DiagnosticId::err_not_subscriptable, loc));
                None
            }
        }
    }

    /// Resolves the callee to a `(declaring Ast, DeclId)` pair *independent*
    /// of any cached `Type::Func` handle — `Type::Func` wraps a bare
    /// `DeclId` with no record of which `Ast` arena it indexes, so re-deriving
    /// the callable from the callee expression's own shape here (instead of
    /// trusting the cross-file `Type::Func` the callee's own type carries)
    /// sidesteps the question of which arena that `DeclId` belongs to.
    fn resolve_callee<'s>(&'s self, callee: ExprId) -> Option<(&'s crate::ast::Ast, DeclId)> {
        match &self.ast.expr(callee).kind {
            ExprKind::Identifier { name, .. } => {
                if let Some(decl_id) = self.scopes.find_symbol(*name) {
                    return Some((self.ast, decl_id));
                }
                if let Some(decl_id) = self.ast.find_local_symbol(*name) {
                    return Some((self.ast, decl_id));
                }
                self.file_scope.find_symbol(*name, self.registry).decl
            }
            ExprKind::Member { base, member, .. } => {
                let ExprKind::Identifier { name: base_name, .. } = &self.ast.expr(*base).kind else { return None };
                let pkg_name = self.file_scope.find_symbol(*base_name, self.registry).package?;
                self.registry.package(pkg_name)?.find_any_symbol(*member)
            }
            _ => None,
        }
    }

    fn analyse_call(&mut self, callee: ExprId, args: &[ExprId], loc: SourceLoc) -> Option<QualType> {
        self.analyse_expr(callee);
        let Some((ast, decl_id)) = self.resolve_callee(callee) else {
            for &arg in args {
                self.analyse_expr(arg);
            }
            return None;
        };
        let Decl::Function(f) = ast.decl(decl_id) else {
            for &arg in args {
                self.analyse_expr(arg);
            }
            return None;
        };
        let return_type = f.return_type;
        let is_variadic = f.is_variadic;
        let declared = f.params.len();
        let required = f
            .params
            .iter()
            .take_while(|&&p| !matches!(ast.decl(p), Decl::Var(v) if v.init.is_some()))
            .count();

        for &arg in args.iter().take(declared) {
            self.analyse_expr(arg);
        }
        if args.len() > declared {
            for &arg in &args[declared..] {
                self.analyse_expr(arg);
            }
            if !is_variadic {
                self.sink.report(Diagnostic::new(DiagnosticId::err_too_many_args, loc));
            }
        } else if args.len() < required {
            self.sink.report(Diagnostic::new(DiagnosticId::err_too_few_args, loc));
        }
        Some(return_type)
    }

    fn analyse_conditional(&mut self, cond: ExprId, then_expr: ExprId, else_expr: ExprId) -> Option<QualType> {
        self.analyse_expr(cond);
        let then_ty = self.analyse_expr(then_expr);
        let else_ty = self.analyse_expr(else_expr);
        then_ty.or(else_ty)
    }

    fn analyse_unary(&mut self, op: UnaryOp, operand: ExprId, _is_postfix: bool, loc: SourceLoc) -> Option<QualType> {
        let ty = self.analyse_expr(operand)?;
        match op {
            UnaryOp::AddrOf => Some(self.types.pointer(ty)),
            UnaryOp::Deref => {
                let resolved = self.resolve_through_user(ty);
                match self.types.get(resolved.ty).as_pointer() {
                    Some(referent) => Some(referent),
                    None => {
                        self.sink.report(Diagnostic::new(DiagnosticId::err_expected_pointer, loc));
                        None
                    }
                }
            }
            UnaryOp::LogNot => Some(self.types.builtin(BuiltinKind::Bool)),
            UnaryOp::Inc | UnaryOp::Dec => {
                self.require_const(loc);
                Some(ty)
            }
            UnaryOp::Plus | UnaryOp::Minus | UnaryOp::BitNot => Some(ty),
        }
    }

    fn analyse_binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId, loc: SourceLoc) -> Option<QualType> {
        let lhs_ty = self.analyse_expr(lhs);
        let rhs_ty = self.analyse_expr(rhs);

        if op.is_assign() {
            let lhs_ty = lhs_ty?;
            self.require_const(loc);
            self.check_assignment(lhs_ty, rhs_ty, loc);
            return Some(lhs_ty);
        }
        if op.is_comparison() {
            return Some(self.types.builtin(BuiltinKind::Bool));
        }
        if op.is_shift() || op.is_bitwise() {
            return lhs_ty;
        }
        if op.is_arithmetic() {
            // The wider of the two operand types; conservatively falls back
            // to the unsuffixed integer type rather than computing true
            // integer promotion (spec §4.5's own allowance).
            return lhs_ty.or(rhs_ty).or_else(|| Some(self.types.builtin(BuiltinKind::Int)));
        }
        lhs_ty.or(rhs_ty)
    }

    fn analyse_builtin(&mut self, kind: BuiltinExprKind, operand: ExprId, loc: SourceLoc) -> Option<QualType> {
        match kind {
            BuiltinExprKind::SizeOf => {
                // Operand may be a value expression or a bare type reference
                // (`ExprKind::Type`); either way `sizeof` never requires the
                // const-mode check since it's always compile-time.
                self.analyse_expr(operand);
                Some(self.types.builtin(BuiltinKind::U64))
            }
            BuiltinExprKind::ElemsOf => {
                let ty = self.analyse_expr(operand);
                let valid = ty.is_some_and(|t| {
                    matches!(self.types.get(self.resolve_through_user(t).ty), Type::Array(_) | Type::Enum(_))
                });
                if !valid {
                    self.sink.report(Diagnostic::new(DiagnosticId::err_invalid_elemsof_type, loc));
                }
                Some(self.types.builtin(BuiltinKind::U64))
            }
        }
    }
}
