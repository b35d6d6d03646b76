//! Statements (spec §3 "Statements & Expressions").

use crate::ids::{ExprId, StmtId};
use crate::intern::StringId;
use crate::span::SourceLoc;

#[derive(Debug, Clone)]
pub enum StmtKind {
    Return(Option<ExprId>),
    If { cond: ExprId, then_branch: StmtId, else_branch: Option<StmtId> },
    While { cond: ExprId, body: StmtId },
    Do { body: StmtId, cond: ExprId },
    For { init: Option<StmtId>, cond: Option<ExprId>, step: Option<ExprId>, body: StmtId },
    Switch { cond: ExprId, cases: Vec<StmtId> },
    Case { value: ExprId, body: Vec<StmtId> },
    Default { body: Vec<StmtId> },
    Break,
    Continue,
    Label { name: StringId, target: StmtId },
    Goto { label: StringId },
    Compound(Vec<StmtId>),
    /// A free expression or a local `Decl` introduction used as a statement
    /// (spec §3: "Expr-as-statement, wrapping a declaration or free
    /// expression"). Local declarations are represented by `Expr::Decl`, so
    /// this variant covers both cases uniformly.
    Expr(ExprId),
}

#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub loc: SourceLoc,
}

impl Stmt {
    pub fn new(kind: StmtKind, loc: SourceLoc) -> Self {
        Self { kind, loc }
    }
}
