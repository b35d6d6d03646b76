//! Diagnostics.
//!
//! The diagnostics *engine* — formatting, rendering, suppression policy — is
//! an external collaborator (spec §1, §6): this crate only produces plain
//! records and pushes them into a sink. `Diagnostic` is the record; the
//! [`DiagnosticSink`] trait is the seam a driver plugs a real engine into;
//! [`DiagnosticBag`] is the `Vec`-backed sink this crate's own tests and the
//! CLI use.
//!
//! This follows the redesign in spec §9: no `DiagnosticBuilder`-style handle
//! threaded through call sites, just `sink.report(Diagnostic { .. })`.

use std::fmt;

use strum::{Display, EnumString, IntoStaticStr};

use crate::span::SourceLoc;

/// Severity of a single diagnostic, per the taxonomy in spec §7.
///
/// `Fatal` is reserved for parser-level failures and is never produced by
/// this crate, but is kept in the enum so a driver combining this crate's
/// diagnostics with the parser's can sort/filter uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display)]
pub enum Severity {
    Note,
    Warning,
    Error,
    Fatal,
}

/// The catalogue of diagnostic IDs this crate can raise.
///
/// Variant names match the `diag::` identifiers named throughout spec §4 and
/// §7 so the two documents stay trivially cross-referenceable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[allow(non_camel_case_types)]
pub enum DiagnosticId {
    // --- lexical / Semantic Actions (spec §4.3) ---
    err_reserved_package_name,
    err_reserved_identifier,
    err_use_self_package,
    err_duplicate_use,
    err_alias_equals_package,
    err_duplicate_alias,
    err_local_qualifier_forbidden,
    err_duplicate_member,
    note_previous_member,
    err_duplicate_param,
    note_previous_param,
    err_default_arg_order,
    err_duplicate_definition,
    note_previous_definition,

    // --- resolver (spec §4.4) ---
    err_unknown_typename,
    err_ambiguous_symbol,
    err_not_a_typename,
    err_non_public_type,
    err_not_public,
    err_unknown_package,
    err_package_not_used,
    err_package_has_alias,
    err_unknown_package_symbol,

    // --- function analyser (spec §4.5) ---
    err_undeclared_var_use,
    note_function_suggestion,
    err_too_many_args,
    err_too_few_args,
    err_typecheck_assign_const,
    err_not_subscriptable,
    err_expected_pointer,
    err_not_struct_or_union,
    err_no_member,
    err_unknown_package_misuse,
    err_invalid_elemsof_type,
    err_non_constant_expr,
    err_break_outside_loop,
    err_continue_outside_loop,

    // --- conversion matrix (spec §4.5.3) ---
    warn_impcast_integer_precision,
    warn_impcast_integer_sign,
    warn_impcast_float_integer,
    warn_impcast_float_precision,
    err_illegal_type_conversion,
}

impl DiagnosticId {
    /// The severity every occurrence of this ID is reported at.
    ///
    /// Fixed per-ID rather than per-call-site, matching the original's
    /// `clang::DiagnosticsEngine` table-driven severities.
    pub fn severity(self) -> Severity {
        use DiagnosticId::*;
        match self {
            note_previous_member | note_previous_definition | note_previous_param | note_function_suggestion => {
                Severity::Note
            }
            warn_impcast_integer_precision
            | warn_impcast_integer_sign
            | warn_impcast_float_integer
            | warn_impcast_float_precision => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// A single diagnostic: a location, an ID, and the formatted arguments that
/// fill in the ID's message template.
///
/// `args` are pre-formatted strings rather than a typed payload per ID —
/// this crate doesn't own message rendering, so there is no benefit to a
/// richer payload type the engine would just `Display` anyway.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub id: DiagnosticId,
    pub loc: SourceLoc,
    pub args: Vec<String>,
}

impl Diagnostic {
    pub fn new(id: DiagnosticId, loc: SourceLoc) -> Self {
        Self { id, loc, args: Vec::new() }
    }

    #[must_use]
    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn severity(&self) -> Severity {
        self.id.severity()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity(), self.id)?;
        if !self.args.is_empty() {
            write!(f, " ({})", self.args.join(", "))?;
        }
        Ok(())
    }
}

/// Receiver for diagnostics produced by the core.
///
/// A real engine implements this directly; `DiagnosticBag` is a minimal
/// in-memory implementation for tests and the CLI.
pub trait DiagnosticSink {
    fn report(&mut self, diag: Diagnostic);
}

/// `Vec`-backed [`DiagnosticSink`] that also tracks the error count used by
/// spec §7's "usable by codegen only if error count is zero" rule.
#[derive(Debug, Default)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn is_usable(&self) -> bool {
        self.error_count == 0
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for DiagnosticBag {
    fn report(&mut self, diag: Diagnostic) {
        if diag.severity() >= Severity::Error {
            self.error_count += 1;
        }
        tracing::debug!(id = %diag.id, severity = %diag.severity(), "diagnostic reported");
        self.diagnostics.push(diag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_are_counted_but_notes_are_not() {
        let mut bag = DiagnosticBag::new();
        bag.report(Diagnostic::new(DiagnosticId::err_not_public, SourceLoc::DUMMY));
        bag.report(Diagnostic::new(DiagnosticId::note_previous_definition, SourceLoc::DUMMY));
        assert_eq!(bag.error_count(), 1);
        assert!(!bag.is_usable());
        assert_eq!(bag.diagnostics().len(), 2);
    }

    #[test]
    fn warnings_do_not_block_codegen() {
        let mut bag = DiagnosticBag::new();
        bag.report(Diagnostic::new(DiagnosticId::warn_impcast_integer_precision, SourceLoc::DUMMY));
        assert!(bag.is_usable());
    }
}
