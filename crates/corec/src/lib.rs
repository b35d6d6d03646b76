#![doc = include_str!("../../../README.md")]

pub mod actions;
pub mod analyse;
pub mod ast;
pub mod diag;
pub mod error;
pub mod ids;
pub mod intern;
pub mod package;
pub mod scope;
pub mod span;
pub mod types;

pub use actions::SemanticActions;
pub use analyse::{FunctionAnalyser, ScopeFlags, ScopeStack, MAX_SCOPE_DEPTH};
pub use ast::{Ast, Decl};
pub use diag::{Diagnostic, DiagnosticBag, DiagnosticId, DiagnosticSink, Severity};
pub use error::{CoreError, CoreResult};
pub use ids::{DeclId, ExprId, StmtId, TypeId};
pub use intern::{Interner, StringId};
pub use package::{Package, PackageRegistry};
pub use scope::{FileScope, ScopeResult};
pub use span::SourceLoc;
pub use types::{ArrayType, BuiltinKind, EnumType, QualType, Qualifiers, StructType, Type, TypeStore, UserType};
