//! `analyseStmt` (spec §4.5): statement-level dispatch and the scope frames
//! each control-flow construct opens around its sub-statements.

use super::{FunctionAnalyser, ScopeFlags};
use crate::ast::StmtKind;
use crate::diag::{Diagnostic, DiagnosticId};
use crate::error::CoreResult;
use crate::ids::StmtId;

impl FunctionAnalyser<'_> {
    pub(crate) fn analyse_stmt(&mut self, id: StmtId) -> CoreResult<()> {
        let kind = self.ast.stmt(id).kind.clone();
        let loc = self.ast.stmt(id).loc;
        match kind {
            StmtKind::Return(value) => {
                let value_ty = value.and_then(|v| self.analyse_expr(v));
                self.check_return(value_ty, loc);
            }
            StmtKind::Expr(e) => {
                self.analyse_expr(e);
            }
            StmtKind::Compound(stmts) => {
                self.scopes.enter(ScopeFlags::new(ScopeFlags::DECL_SCOPE))?;
                for stmt in stmts {
                    self.analyse_stmt(stmt)?;
                }
                self.scopes.exit()?;
            }
            StmtKind::If { cond, then_branch, else_branch } => {
                self.analyse_expr(cond);
                self.analyse_branch(ScopeFlags::new(ScopeFlags::DECL_SCOPE), then_branch)?;
                if let Some(else_branch) = else_branch {
                    self.analyse_branch(ScopeFlags::new(ScopeFlags::DECL_SCOPE), else_branch)?;
                }
            }
            StmtKind::While { cond, body } => {
                self.analyse_expr(cond);
                self.analyse_branch(loop_flags(), body)?;
            }
            StmtKind::Do { body, cond } => {
                self.analyse_branch(ScopeFlags::new(ScopeFlags::BREAK_SCOPE | ScopeFlags::CONTINUE_SCOPE | ScopeFlags::DECL_SCOPE), body)?;
                self.analyse_expr(cond);
            }
            StmtKind::For { init, cond, step, body } => {
                // The init-clause's declaration(s) must stay visible to the
                // condition, step, and body, so the whole construct shares
                // one frame rather than nesting body inside init's scope.
                self.scopes.enter(loop_flags())?;
                if let Some(init) = init {
                    self.analyse_stmt(init)?;
                }
                if let Some(cond) = cond {
                    self.analyse_expr(cond);
                }
                if let Some(step) = step {
                    self.analyse_expr(step);
                }
                self.analyse_stmt(body)?;
                self.scopes.exit()?;
            }
            StmtKind::Switch { cond, cases } => {
                self.analyse_expr(cond);
                self.scopes.enter(ScopeFlags::new(ScopeFlags::BREAK_SCOPE | ScopeFlags::SWITCH_SCOPE))?;
                for case in cases {
                    self.analyse_stmt(case)?;
                }
                self.scopes.exit()?;
            }
            StmtKind::Case { value, body } => {
                self.analyse_expr(value);
                for stmt in body {
                    self.analyse_stmt(stmt)?;
                }
            }
            StmtKind::Default { body } => {
                for stmt in body {
                    self.analyse_stmt(stmt)?;
                }
            }
            StmtKind::Label { target, .. } => self.analyse_stmt(target)?,
            StmtKind::Break => {
                if !self.scopes.has_flag(ScopeFlags::BREAK_SCOPE) {
                    self.sink.report(Diagnostic::new(DiagnosticId::err_break_outside_loop, loc));
                }
            }
            StmtKind::Continue => {
                if !self.scopes.has_flag(ScopeFlags::CONTINUE_SCOPE) {
                    self.sink.report(Diagnostic::new(DiagnosticId::err_continue_outside_loop, loc));
                }
            }
            StmtKind::Goto { .. } => {}
        }
        Ok(())
    }

    /// Opens a fresh frame around a single-statement branch (an `if`'s
    /// then/else, a loop's body) so a declaration inside it doesn't leak
    /// into the enclosing block.
    fn analyse_branch(&mut self, flags: ScopeFlags, stmt_id: StmtId) -> CoreResult<()> {
        self.scopes.enter(flags)?;
        self.analyse_stmt(stmt_id)?;
        self.scopes.exit()
    }
}

fn loop_flags() -> ScopeFlags {
    ScopeFlags::new(ScopeFlags::BREAK_SCOPE | ScopeFlags::CONTINUE_SCOPE | ScopeFlags::DECL_SCOPE | ScopeFlags::CONTROL_SCOPE)
}
