//! Expressions (spec §3 "Statements & Expressions", §4.5).

use crate::ids::{DeclId, ExprId};
use crate::intern::StringId;
use crate::span::SourceLoc;
use crate::types::QualType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Shl,
    Shr,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    LogAnd,
    LogOr,
    BitAnd,
    BitOr,
    BitXor,
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    ShlAssign,
    ShrAssign,
    AndAssign,
    OrAssign,
    XorAssign,
}

impl BinaryOp {
    pub fn is_arithmetic(self) -> bool {
        matches!(self, BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod)
    }

    pub fn is_shift(self) -> bool {
        matches!(self, BinaryOp::Shl | BinaryOp::Shr)
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Lt
                | BinaryOp::Le
                | BinaryOp::Gt
                | BinaryOp::Ge
                | BinaryOp::Eq
                | BinaryOp::Ne
                | BinaryOp::LogAnd
                | BinaryOp::LogOr
        )
    }

    pub fn is_bitwise(self) -> bool {
        matches!(self, BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor)
    }

    pub fn is_plain_assign(self) -> bool {
        matches!(self, BinaryOp::Assign)
    }

    pub fn is_compound_assign(self) -> bool {
        matches!(
            self,
            BinaryOp::AddAssign
                | BinaryOp::SubAssign
                | BinaryOp::MulAssign
                | BinaryOp::DivAssign
                | BinaryOp::ModAssign
                | BinaryOp::ShlAssign
                | BinaryOp::ShrAssign
                | BinaryOp::AndAssign
                | BinaryOp::OrAssign
                | BinaryOp::XorAssign
        )
    }

    pub fn is_assign(self) -> bool {
        self.is_plain_assign() || self.is_compound_assign()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    AddrOf,
    Deref,
    Plus,
    Minus,
    LogNot,
    BitNot,
    Inc,
    Dec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinExprKind {
    SizeOf,
    ElemsOf,
}

/// Resolver bindings attached to an identifier once analysed (spec §3:
/// "Each `IdentifierExpr` additionally carries `decl` and `package`").
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentifierBinding {
    pub decl: Option<DeclId>,
    /// The owning package, set when the identifier resolved to (or through)
    /// a package other than the bare-lookup path — used for diagnostics and
    /// for member access on package-qualified names.
    pub package: Option<StringId>,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    IntegerLiteral(i64),
    FloatingLiteral(f64),
    BooleanLiteral(bool),
    /// One code unit, per `SPEC_FULL.md` supplement 4.
    CharacterLiteral(u8),
    StringLiteral(StringId),
    Identifier { name: StringId, binding: IdentifierBinding },
    Paren(ExprId),
    Call { callee: ExprId, args: Vec<ExprId> },
    Member { base: ExprId, member: StringId, is_arrow: bool, binding: IdentifierBinding },
    ArraySubscript { base: ExprId, index: ExprId },
    InitList(Vec<ExprId>),
    /// Local variable introduction (spec §3: "Decl (local variable
    /// introduction)").
    Decl(DeclId),
    /// A type appearing in expression position, e.g. the operand of a cast
    /// or of `sizeof`.
    Type(QualType),
    Binary { op: BinaryOp, lhs: ExprId, rhs: ExprId },
    Conditional { cond: ExprId, then_expr: ExprId, else_expr: ExprId },
    Unary { op: UnaryOp, operand: ExprId, is_postfix: bool },
    Builtin { kind: BuiltinExprKind, operand: ExprId },
}

/// An expression node. `ty` is `None` until the Function Analyser visits
/// it; per spec §3's lifecycle, it is written exactly once and read-only
/// thereafter.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub loc: SourceLoc,
    pub ty: Option<QualType>,
}

impl Expr {
    pub fn new(kind: ExprKind, loc: SourceLoc) -> Self {
        Self { kind, loc, ty: None }
    }

    pub fn is_analysed(&self) -> bool {
        self.ty.is_some()
    }
}
