//! Demo driver for the `corec` semantic core.
//!
//! There is no lexer/parser in this workspace (spec §1), so this binary
//! builds a couple of hand-picked translation units directly through
//! [`SemanticActions`], runs them through [`FileScope`] and
//! [`FunctionAnalyser`] exactly the way `FunctionAnalyser::new`'s own doc
//! comment prescribes, and prints whatever diagnostics fall out. It exists
//! to exercise the pipeline end-to-end and give the diagnostics sink a real
//! consumer, not to parse real source files.

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use corec::{
    BuiltinKind, Diagnostic, DiagnosticBag, FileScope, FunctionAnalyser, Interner, PackageRegistry, SemanticActions,
    Severity, SourceLoc,
};

#[derive(Parser)]
#[command(name = "corec", about = "Runs a built-in demo translation unit through the semantic core")]
struct Cli {
    #[arg(value_enum, default_value_t = Scenario::ConstAssign)]
    scenario: Scenario,
}

#[derive(Clone, Copy, ValueEnum)]
enum Scenario {
    /// A `const` local being reassigned: `err_typecheck_assign_const`.
    ConstAssign,
    /// An `i32` narrowed into an `i8`: `warn_impcast_integer_precision`.
    Narrowing,
    /// A call to an undeclared symbol whose name matches a public function
    /// in another package: `err_undeclared_var_use` plus a suggestion note.
    UndeclaredWithSuggestion,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut bag = DiagnosticBag::new();
    let diagnostics = match cli.scenario {
        Scenario::ConstAssign => run_const_assign(&mut bag),
        Scenario::Narrowing => run_narrowing(&mut bag),
        Scenario::UndeclaredWithSuggestion => run_undeclared_with_suggestion(&mut bag),
    };

    print_diagnostics(&diagnostics);
    if bag.is_usable() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        println!("no diagnostics");
        return;
    }
    for diag in diagnostics {
        println!("{diag}");
    }
    let errors = diagnostics.iter().filter(|d| d.severity() >= Severity::Error).count();
    println!("{errors} error(s), {} total diagnostic(s)", diagnostics.len());
}

/// Builds one package through `SemanticActions`, resolves it with
/// `FileScope`, then runs the `FunctionAnalyser` over it. Mirrors the
/// `take_file`/`put_file` dance `FunctionAnalyser::new` documents: the file
/// under analysis is pulled out of the registry so it can be borrowed
/// mutably while the rest of the registry stays borrowed immutably.
fn analyse_single_package(package_name: &str, bag: &mut DiagnosticBag, build: impl FnOnce(&mut SemanticActions, &mut DiagnosticBag)) -> Vec<Diagnostic> {
    let mut registry = PackageRegistry::new();
    let mut actions = SemanticActions::new(package_name, SourceLoc::DUMMY, bag);
    build(&mut actions, bag);
    let (ast, mut types, interner) = actions.finish();
    let package_name = ast.package_name();
    registry.insert_ast(ast);

    let mut ast = registry.package_mut(package_name).take_file(0);
    let file_scope = FileScope::from_ast(&ast);
    file_scope.check_all_types(&ast, &registry, &mut types, bag);
    {
        let mut analyser = FunctionAnalyser::new(&mut ast, &mut types, &file_scope, &registry, &interner, bag);
        if let Err(err) = analyser.analyse_file() {
            eprintln!("internal error: {err}");
        }
    }
    registry.package_mut(package_name).put_file(0, ast);

    std::mem::take(bag).into_diagnostics()
}

/// `const i32 x = 3; x = 4;` inside `run()`.
fn run_const_assign(bag: &mut DiagnosticBag) -> Vec<Diagnostic> {
    analyse_single_package("demo", bag, |actions, bag| {
        let const_i32 = actions.types().builtin(BuiltinKind::I32).with_const();
        let three = actions.act_on_integer_literal(SourceLoc(1), 3);
        let x = actions.act_on_local_var_decl("x", SourceLoc(1), const_i32, Some(three), bag);
        let decl_stmt = actions.act_on_decl_stmt(SourceLoc(1), x);

        let x_ref = actions.act_on_identifier(SourceLoc(2), "x");
        let four = actions.act_on_integer_literal(SourceLoc(2), 4);
        let assign = actions.act_on_binary_op(SourceLoc(2), corec::ast::BinaryOp::Assign, x_ref, four);
        let assign_stmt = actions.act_on_expr_stmt(SourceLoc(2), assign);

        let body = actions.act_on_compound(SourceLoc(0), vec![decl_stmt, assign_stmt]);
        let void_ty = actions.types().builtin(BuiltinKind::Void);
        actions.act_on_func_decl("run", SourceLoc(0), false, void_ty, vec![], false, Some(body), bag);
    })
}

/// `i32 a = 300000; i8 b = a;` inside `run()`.
fn run_narrowing(bag: &mut DiagnosticBag) -> Vec<Diagnostic> {
    analyse_single_package("demo", bag, |actions, bag| {
        let i32_ty = actions.types().builtin(BuiltinKind::I32);
        let i8_ty = actions.types().builtin(BuiltinKind::I8);
        let lit = actions.act_on_integer_literal(SourceLoc(1), 300_000);
        let a = actions.act_on_local_var_decl("a", SourceLoc(1), i32_ty, Some(lit), bag);
        let a_decl_stmt = actions.act_on_decl_stmt(SourceLoc(1), a);

        let a_ref = actions.act_on_identifier(SourceLoc(2), "a");
        let b = actions.act_on_local_var_decl("b", SourceLoc(2), i8_ty, Some(a_ref), bag);
        let b_decl_stmt = actions.act_on_decl_stmt(SourceLoc(2), b);

        let body = actions.act_on_compound(SourceLoc(0), vec![a_decl_stmt, b_decl_stmt]);
        let void_ty = actions.types().builtin(BuiltinKind::Void);
        actions.act_on_func_decl("run", SourceLoc(0), false, void_ty, vec![], false, Some(body), bag);
    })
}

/// Two packages, `a` and `b`: `a` declares a public `greet()`, `b` calls
/// `greet()` without a `use a;` import, so the resolver reports
/// `err_undeclared_var_use` with a "did you mean `a.greet`?" note.
fn run_undeclared_with_suggestion(bag: &mut DiagnosticBag) -> Vec<Diagnostic> {
    let mut registry = PackageRegistry::new();
    let mut interner = Interner::new();
    let mut pending = Vec::new();

    let mut actions = SemanticActions::with_interner("a", SourceLoc::DUMMY, interner, bag);
    let void_ty = actions.types().builtin(BuiltinKind::Void);
    let body = actions.act_on_compound(SourceLoc(1), vec![]);
    actions.act_on_func_decl("greet", SourceLoc(1), true, void_ty, vec![], false, Some(body), bag);
    let (ast, types, returned_interner) = actions.finish();
    interner = returned_interner;
    pending.push((ast.package_name(), types));
    registry.insert_ast(ast);

    // Deliberately no `use a;` in `b`.
    let mut actions = SemanticActions::with_interner("b", SourceLoc::DUMMY, interner, bag);
    let void_ty = actions.types().builtin(BuiltinKind::Void);
    let callee = actions.act_on_identifier(SourceLoc(2), "greet");
    let call = actions.act_on_call(SourceLoc(2), callee, vec![]);
    let stmt = actions.act_on_expr_stmt(SourceLoc(2), call);
    let body = actions.act_on_compound(SourceLoc(2), vec![stmt]);
    actions.act_on_func_decl("test", SourceLoc(2), false, void_ty, vec![], false, Some(body), bag);
    let (ast, types, interner) = actions.finish();
    pending.push((ast.package_name(), types));
    registry.insert_ast(ast);

    for (package_name, mut types) in pending {
        let mut ast = registry.package_mut(package_name).take_file(0);
        let file_scope = FileScope::from_ast(&ast);
        file_scope.check_all_types(&ast, &registry, &mut types, bag);
        {
            let mut analyser = FunctionAnalyser::new(&mut ast, &mut types, &file_scope, &registry, &interner, bag);
            if let Err(err) = analyser.analyse_file() {
                eprintln!("internal error: {err}");
            }
        }
        registry.package_mut(package_name).put_file(0, ast);
    }

    std::mem::take(bag).into_diagnostics()
}
