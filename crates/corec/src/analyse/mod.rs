//! Function Analyser (spec §4.5).
//!
//! Runs once parsing and `FileScope` resolution have finished for a
//! translation unit. Walks every function body and file-scope variable
//! initializer, assigning each `Expr` node its `QualType` (spec §3's
//! lifecycle: written exactly once, read-only thereafter) and consulting the
//! conversion matrix (`types::conversion`) at assignment and condition
//! points.
//!
//! Split into submodules the way `dannys-code-corner-incan`'s typechecker
//! splits `check_decl`/`check_expr`/`check_stmt`: [`scope_stack`] owns the
//! nested-block bookkeeping, [`expr`] and [`stmt`] hold the two dispatch
//! tables as `impl` blocks on [`FunctionAnalyser`].

pub mod expr;
pub mod scope_stack;
pub mod stmt;

pub use scope_stack::{ScopeFlags, ScopeStack, MAX_SCOPE_DEPTH};

use crate::ast::{Ast, Decl, FunctionDecl, VarDecl};
use crate::diag::{Diagnostic, DiagnosticId, DiagnosticSink};
use crate::error::CoreResult;
use crate::ids::DeclId;
use crate::intern::Interner;
use crate::package::PackageRegistry;
use crate::scope::FileScope;
use crate::span::SourceLoc;
use crate::types::{BuiltinKind, QualType, Type, TypeStore};

/// RAII guard for the const-expression context (spec §4.5.2): while held,
/// [`FunctionAnalyser::require_const`] reports `diag_id` at the location of
/// any non-constant construct the analyser visits. Grounded on the teacher's
/// `heap::HeapGuard` — entering stashes the previous state, and `Drop`
/// restores it unconditionally, so an early return or a nested const context
/// can never leave the flag set past its scope.
struct ConstGuard<'a> {
    slot: &'a mut Option<DiagnosticId>,
    previous: Option<DiagnosticId>,
}

impl<'a> ConstGuard<'a> {
    fn enter(slot: &'a mut Option<DiagnosticId>, diag_id: DiagnosticId) -> Self {
        let previous = slot.replace(diag_id);
        Self { slot, previous }
    }
}

impl Drop for ConstGuard<'_> {
    fn drop(&mut self) {
        *self.slot = self.previous;
    }
}

/// Walks one translation unit's function bodies and file-scope initializers.
///
/// Holds `&mut Ast` for the file under analysis, plus `&PackageRegistry` for
/// every *other* file this compilation contributes. The current file is
/// expected to have been removed from `registry` via
/// [`crate::package::Package::take_file`] before constructing this analyser
/// and restored with `put_file` afterwards — own-file top-level symbols are
/// looked up directly against `ast`, not through `registry` (see
/// [`Self::resolve_identifier`]).
pub struct FunctionAnalyser<'a> {
    ast: &'a mut Ast,
    types: &'a mut TypeStore,
    file_scope: &'a FileScope,
    registry: &'a PackageRegistry,
    interner: &'a Interner,
    sink: &'a mut dyn DiagnosticSink,
    scopes: ScopeStack,
    const_mode: Option<DiagnosticId>,
    return_type: Option<QualType>,
}

impl<'a> FunctionAnalyser<'a> {
    pub fn new(
        ast: &'a mut Ast,
        types: &'a mut TypeStore,
        file_scope: &'a FileScope,
        registry: &'a PackageRegistry,
        interner: &'a Interner,
        sink: &'a mut dyn DiagnosticSink,
    ) -> Self {
        Self { ast, types, file_scope, registry, interner, sink, scopes: ScopeStack::new(), const_mode: None, return_type: None }
    }

    /// Runs every analysis pass over the file under analysis: enum constant
    /// values first (`SPEC_FULL.md` supplement 3), then each function body
    /// and each file-scope variable's initializer.
    pub fn analyse_file(&mut self) -> CoreResult<()> {
        self.resolve_enum_constants();
        for decl_id in self.ast.top_level().to_vec() {
            match self.ast.decl(decl_id).clone() {
                Decl::Function(f) => self.analyse_function(&f)?,
                Decl::Var(v) => self.analyse_file_var(&v),
                _ => {}
            }
        }
        Ok(())
    }

    fn analyse_function(&mut self, f: &FunctionDecl) -> CoreResult<()> {
        let Some(body) = f.body else { return Ok(()) };
        let previous_return_type = self.return_type.replace(f.return_type);
        self.scopes.enter(ScopeFlags::new(ScopeFlags::FN_SCOPE | ScopeFlags::DECL_SCOPE))?;
        for &param in &f.params {
            if let Decl::Var(p) = self.ast.decl(param) {
                self.scopes.declare(p.header.name, param);
            }
        }
        self.analyse_stmt(body)?;
        let result = self.scopes.exit();
        self.return_type = previous_return_type;
        result
    }

    /// `return`'s value, if any, flows into the enclosing function's return
    /// type through the same conversion matrix as assignment, but without
    /// assignment's const-destination check (a return type being
    /// `const`-qualified doesn't forbid returning a value into it).
    fn check_return(&mut self, value: Option<QualType>, loc: SourceLoc) {
        if let (Some(value), Some(declared)) = (value, self.return_type) {
            self.check_conversion(value, declared, loc);
        }
    }

    /// A file-scope variable's initializer is itself a constant-expression
    /// context (spec §4.5.2: array sizes and file-scope initializers are
    /// evaluated at compile time).
    fn analyse_file_var(&mut self, v: &VarDecl) {
        let Some(init) = v.init else { return };
        let declared = v.ty;
        let init_ty = {
            let _guard = self.enter_const_mode(DiagnosticId::err_non_constant_expr);
            self.analyse_expr(init)
        };
        self.check_init(declared, init_ty, self.ast.expr(init).loc);
    }

    /// Assigns `EnumConstantDecl::value` for every enum in the file: the
    /// first constant (no explicit initializer) is `0`, each subsequent one
    /// is the previous value plus one, and an explicit initializer resets
    /// the counter from that point on (`SPEC_FULL.md` supplement 3,
    /// recovered from the original's enum-lowering pass).
    fn resolve_enum_constants(&mut self) {
        let enum_members: Vec<Vec<DeclId>> = self
            .ast
            .top_level()
            .iter()
            .filter_map(|&decl_id| match self.ast.decl(decl_id) {
                Decl::TypeAlias(alias) => match self.types.get(alias.aliased.ty) {
                    Type::Enum(e) => Some(e.members.clone()),
                    _ => None,
                },
                _ => None,
            })
            .collect();
        for members in enum_members {
            let mut next_value: i64 = 0;
            for member in members {
                let Decl::EnumConstant(ec) = self.ast.decl(member).clone() else { continue };
                let value = match ec.init {
                    Some(init) => {
                        let evaluated = {
                            let _guard = self.enter_const_mode(DiagnosticId::err_non_constant_expr);
                            self.analyse_expr(init)
                        };
                        let _ = evaluated;
                        self.eval_const_int(init).unwrap_or(next_value)
                    }
                    None => next_value,
                };
                if let Decl::EnumConstant(ec) = self.ast.decl_mut(member) {
                    ec.value = Some(value);
                }
                next_value = value + 1;
            }
        }
    }

    fn enter_const_mode(&mut self, diag_id: DiagnosticId) -> ConstGuard<'_> {
        ConstGuard::enter(&mut self.const_mode, diag_id)
    }

    /// Reports the active const-context violation, if any (spec §4.5.2).
    fn require_const(&mut self, loc: SourceLoc) {
        if let Some(diag_id) = self.const_mode {
            self.sink.report(Diagnostic::new(diag_id, loc));
        }
    }

    /// Follows `Type::User.resolved` to the type it ultimately denotes,
    /// stopping at an unresolved user-type (nothing better to do) or any
    /// non-user type.
    fn resolve_through_user(&self, qt: QualType) -> QualType {
        let mut qt = qt;
        loop {
            match self.types.get(qt.ty) {
                Type::User(user) => match user.resolved {
                    Some(resolved) => qt = resolved,
                    None => return qt,
                },
                _ => return qt,
            }
        }
    }

    fn as_builtin(&self, qt: QualType) -> Option<BuiltinKind> {
        self.types.get(self.resolve_through_user(qt).ty).as_builtin()
    }

    /// Consults the conversion matrix (spec §4.5.3) when both sides resolve
    /// to a builtin type; non-builtin conversions are out of this version's
    /// scope, matching `conversion::convert`'s own doc comment.
    fn check_conversion(&mut self, from: QualType, to: QualType, loc: SourceLoc) {
        if let (Some(from), Some(to)) = (self.as_builtin(from), self.as_builtin(to)) {
            let rule = crate::types::conversion::convert(from, to);
            if let Some(diag_id) = rule.diagnostic_id() {
                self.sink.report(Diagnostic::new(diag_id, loc));
            }
        }
    }

    /// Plain-assignment check (spec §4.5.3): rejects writing to a
    /// `const`-qualified destination, then consults the conversion matrix.
    /// A declaration's own initializer is never const-checked here — it
    /// goes through [`Self::check_init`] instead, since `const i32 x = 3;`
    /// is exactly how a const gets its one legal write.
    fn check_assignment(&mut self, declared: QualType, value: Option<QualType>, loc: SourceLoc) {
        if declared.is_const() {
            self.sink.report(Diagnostic::new(DiagnosticId::err_typecheck_assign_const, loc));
        }
        self.check_init(declared, value, loc);
    }

    /// Conversion-only check for a declaration's initializer (local var,
    /// file-scope var, enum constant): the destination's const-ness is not
    /// itself an error here, unlike [`Self::check_assignment`].
    fn check_init(&mut self, declared: QualType, value: Option<QualType>, loc: SourceLoc) {
        if let Some(value) = value {
            self.check_conversion(value, declared, loc);
        }
    }

    /// Evaluates an expression already known to sit in const context as an
    /// integer, for enum constant lowering. Only the handful of node shapes
    /// an enum initializer can realistically use are handled; anything else
    /// yields `None` and the caller falls back to the running counter.
    fn eval_const_int(&self, id: crate::ids::ExprId) -> Option<i64> {
        use crate::ast::{ExprKind, UnaryOp};
        match &self.ast.expr(id).kind {
            ExprKind::IntegerLiteral(v) => Some(*v),
            ExprKind::Paren(inner) => self.eval_const_int(*inner),
            ExprKind::Unary { op: UnaryOp::Minus, operand, .. } => self.eval_const_int(*operand).map(|v| -v),
            ExprKind::Unary { op: UnaryOp::Plus, operand, .. } => self.eval_const_int(*operand),
            ExprKind::Binary { op, lhs, rhs } => {
                let (l, r) = (self.eval_const_int(*lhs)?, self.eval_const_int(*rhs)?);
                match op {
                    crate::ast::BinaryOp::Add => Some(l + r),
                    crate::ast::BinaryOp::Sub => Some(l - r),
                    crate::ast::BinaryOp::Mul => Some(l * r),
                    crate::ast::BinaryOp::Div if r != 0 => Some(l / r),
                    crate::ast::BinaryOp::Shl => Some(l << r),
                    crate::ast::BinaryOp::Shr => Some(l >> r),
                    crate::ast::BinaryOp::BitOr => Some(l | r),
                    crate::ast::BinaryOp::BitAnd => Some(l & r),
                    crate::ast::BinaryOp::BitXor => Some(l ^ r),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn is_const_decl(&self, decl: &Decl) -> bool {
        match decl {
            Decl::Var(v) => v.ty.is_const(),
            Decl::EnumConstant(_) => true,
            _ => false,
        }
    }
}
