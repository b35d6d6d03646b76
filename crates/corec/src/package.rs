//! Package Registry (spec §4.2).
//!
//! A `Package` aggregates every [`Ast`] sharing a package name (a language
//! may split one package across several files); the registry maps package
//! name to `Package`.

use std::collections::HashMap;

use crate::ast::Ast;
use crate::ids::DeclId;
use crate::intern::StringId;

/// One or more [`Ast`]s sharing a package name.
#[derive(Debug, Default)]
pub struct Package {
    files: Vec<Ast>,
}

impl Package {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, ast: Ast) {
        self.files.push(ast);
    }

    pub fn files(&self) -> &[Ast] {
        &self.files
    }

    /// Removes and returns one file, so a caller (the Function Analyser
    /// driver) can hold `&mut Ast` on it while the rest of this package —
    /// and the whole registry — stays borrowed immutably for cross-file and
    /// cross-package symbol lookups. Pair with [`Self::put_file`].
    pub fn take_file(&mut self, index: usize) -> Ast {
        self.files.remove(index)
    }

    /// Restores a file removed by [`Self::take_file`].
    pub fn put_file(&mut self, index: usize, ast: Ast) {
        self.files.insert(index, ast);
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Finds a top-level symbol by name across every file in this package,
    /// returning the owning file alongside its id so the caller can fetch
    /// the `Decl` itself. `requester_package` is the package name of the
    /// querying File Scope; private declarations are only returned when it
    /// matches this package's name (spec §4.2: "private declarations are
    /// visible only when the querying File Scope has the same package
    /// name").
    pub fn find_symbol(&self, name: StringId, requester_package: StringId, own_name: StringId) -> Option<(&Ast, DeclId)> {
        let same_package = requester_package == own_name;
        for ast in &self.files {
            if let Some(decl) = ast.find_local_symbol(name) {
                if ast.decl(decl).is_public() || same_package {
                    return Some((ast, decl));
                }
            }
        }
        None
    }

    /// Finds a top-level symbol by name without any visibility filtering.
    /// Used by [`crate::scope::FileScope`], which needs to see private hits
    /// too in order to compute the ambiguity/shadowing rules of spec §4.4
    /// itself, rather than have this package silently hide them.
    pub fn find_any_symbol(&self, name: StringId) -> Option<(&Ast, DeclId)> {
        for ast in &self.files {
            if let Some(decl) = ast.find_local_symbol(name) {
                return Some((ast, decl));
            }
        }
        None
    }
}

/// Maps package name → [`Package`], the top-level container for a whole
/// compilation (spec §2: "Maps package name → set of top-level
/// declarations").
#[derive(Debug, Default)]
pub struct PackageRegistry {
    packages: HashMap<StringId, Package>,
}

impl PackageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn package(&self, name: StringId) -> Option<&Package> {
        self.packages.get(&name)
    }

    pub fn package_mut(&mut self, name: StringId) -> &mut Package {
        self.packages.entry(name).or_insert_with(Package::new)
    }

    pub fn contains(&self, name: StringId) -> bool {
        self.packages.contains_key(&name)
    }

    /// Adds `ast` to the package named by its own `package_name`,
    /// registering a new `Package` on first use.
    pub fn insert_ast(&mut self, ast: Ast) {
        self.package_mut(ast.package_name()).add_file(ast);
    }

    /// Searches every package in the whole compilation for `name`, first hit
    /// wins, no ambiguity or visibility filtering — used only to build "did
    /// you mean `pkg.name`?" notes for an otherwise-undeclared identifier.
    ///
    /// Grounded on the original's `FunctionAnalyser::analyseIdentifier`
    /// calling `globalScope.findSymbolInUsed`, where `globalScope` is a
    /// scope that has every package in the build registered, not just the
    /// querying file's own `use` imports — that's what lets the suggestion
    /// fire even when the file never imported the package it's pointing at
    /// (`FunctionAnalyser.cpp`).
    pub fn suggest_symbol(&self, name: StringId) -> Option<(StringId, &Ast, DeclId)> {
        for (&pkg_name, pkg) in &self.packages {
            if let Some((ast, decl)) = pkg.find_any_symbol(name) {
                return Some((pkg_name, ast, decl));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Decl, DeclHeader, TypeAliasDecl};
    use crate::ids::TypeId;
    use crate::span::SourceLoc;
    use crate::types::QualType;

    fn make_alias(name: crate::intern::StringId, is_public: bool) -> Decl {
        Decl::TypeAlias(TypeAliasDecl {
            header: DeclHeader { name, loc: SourceLoc::DUMMY, is_public },
            aliased: QualType::new(TypeId::new(0)),
        })
    }

    #[test]
    fn private_decl_is_hidden_from_other_packages() {
        let mut interner = crate::intern::Interner::new();
        let pkg_a = interner.intern("a");
        let pkg_b = interner.intern("b");
        let foo = interner.intern("foo");

        let mut ast = Ast::new(pkg_a);
        let decl = ast.alloc_decl(make_alias(foo, false));
        ast.register_top_level(foo, decl).unwrap();

        let mut pkg = Package::new();
        pkg.add_file(ast);

        assert!(pkg.find_symbol(foo, pkg_b, pkg_a).is_none());
        assert!(pkg.find_symbol(foo, pkg_a, pkg_a).is_some());
    }

    #[test]
    fn public_decl_is_visible_everywhere() {
        let mut interner = crate::intern::Interner::new();
        let pkg_a = interner.intern("a");
        let pkg_b = interner.intern("b");
        let bar = interner.intern("bar");

        let mut ast = Ast::new(pkg_a);
        let decl = ast.alloc_decl(make_alias(bar, true));
        ast.register_top_level(bar, decl).unwrap();

        let mut pkg = Package::new();
        pkg.add_file(ast);

        assert!(pkg.find_symbol(bar, pkg_b, pkg_a).is_some());
    }
}
