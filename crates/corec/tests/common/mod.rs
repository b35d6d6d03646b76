//! Shared scaffolding for the end-to-end scenario tests (spec §8).
//!
//! There is no lexer/parser in scope for this crate, so every scenario is
//! built directly through `SemanticActions`, exactly as a parser's
//! `act_on_*` call sequence would, then driven through `FileScope` and
//! `FunctionAnalyser` the way `FunctionAnalyser::new`'s own doc comment
//! describes: take the file out of its `Package`, analyse it against the
//! rest of the registry, put it back.

use corec::{DiagnosticBag, FileScope, FunctionAnalyser, Interner, PackageRegistry, SemanticActions, SourceLoc};

pub fn loc(n: u32) -> SourceLoc {
    SourceLoc(n)
}

type Builder = Box<dyn FnOnce(&mut SemanticActions, &mut DiagnosticBag)>;

/// One translation unit: a package name plus the `act_on_*` calls that
/// build it.
pub fn unit(package_name: &'static str, build: impl FnOnce(&mut SemanticActions, &mut DiagnosticBag) + 'static) -> (&'static str, Builder) {
    (package_name, Box::new(build))
}

/// Builds every unit (sharing one `Interner` so cross-package `StringId`s
/// line up), then runs File Scope resolution and the Function Analyser
/// over each file in turn.
pub fn analyse(units: Vec<(&'static str, Builder)>) -> Vec<corec::Diagnostic> {
    let mut bag = DiagnosticBag::new();
    let mut interner = Interner::new();
    let mut registry = PackageRegistry::new();
    let mut pending = Vec::new();

    for (package_name, build) in units {
        let mut actions = SemanticActions::with_interner(package_name, SourceLoc::DUMMY, interner, &mut bag);
        build(&mut actions, &mut bag);
        let (ast, types, returned_interner) = actions.finish();
        interner = returned_interner;
        pending.push((ast.package_name(), types));
        registry.insert_ast(ast);
    }

    for (package_name, mut types) in pending {
        let mut ast = registry.package_mut(package_name).take_file(0);
        let file_scope = FileScope::from_ast(&ast);
        file_scope.check_all_types(&ast, &registry, &mut types, &mut bag);
        {
            let mut analyser = FunctionAnalyser::new(&mut ast, &mut types, &file_scope, &registry, &interner, &mut bag);
            analyser.analyse_file().expect("scope depth stays well under MAX_SCOPE_DEPTH in these fixtures");
        }
        registry.package_mut(package_name).put_file(0, ast);
    }

    bag.into_diagnostics()
}

/// Convenience for single-package scenarios.
pub fn analyse_one(package_name: &'static str, build: impl FnOnce(&mut SemanticActions, &mut DiagnosticBag) + 'static) -> Vec<corec::Diagnostic> {
    analyse(vec![unit(package_name, build)])
}
