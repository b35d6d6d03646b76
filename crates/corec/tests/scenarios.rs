//! End-to-end scenarios S1-S6 (spec §8), built directly through
//! `SemanticActions` and driven through `FileScope`/`FunctionAnalyser`.

mod common;

use common::{analyse, analyse_one, loc, unit};
use corec::ast::{BinaryOp, BuiltinExprKind};
use corec::{BuiltinKind, DiagnosticId};

fn count(diagnostics: &[corec::Diagnostic], id: DiagnosticId) -> usize {
    diagnostics.iter().filter(|d| d.id == id).count()
}

#[test]
fn s1_private_function_called_from_another_package_is_flagged_not_public() {
    let diagnostics = analyse(vec![
        unit("a", |actions, bag| {
            let i32_ty = actions.types().builtin(BuiltinKind::I32);
            let zero = actions.act_on_integer_literal(loc(1), 0);
            let ret = actions.act_on_return(loc(1), Some(zero));
            let body = actions.act_on_compound(loc(1), vec![ret]);
            actions.act_on_func_decl("foo", loc(1), false, i32_ty, vec![], false, Some(body), bag);

            let zero2 = actions.act_on_integer_literal(loc(2), 0);
            let ret2 = actions.act_on_return(loc(2), Some(zero2));
            let body2 = actions.act_on_compound(loc(2), vec![ret2]);
            actions.act_on_func_decl("bar", loc(2), true, i32_ty, vec![], false, Some(body2), bag);
        }),
        unit("b", |actions, bag| {
            actions.act_on_use("a", loc(3), None, false, bag);
            let void_ty = actions.types().builtin(BuiltinKind::Void);
            let base = actions.act_on_identifier(loc(4), "a");
            let callee = actions.act_on_member(loc(4), base, "foo", false);
            let call = actions.act_on_call(loc(4), callee, vec![]);
            let stmt = actions.act_on_expr_stmt(loc(4), call);
            let body = actions.act_on_compound(loc(4), vec![stmt]);
            actions.act_on_func_decl("test", loc(4), false, void_ty, vec![], false, Some(body), bag);
        }),
    ]);

    assert_eq!(count(&diagnostics, DiagnosticId::err_not_public), 1);
}

#[test]
fn s2_assigning_into_a_const_variable_is_rejected_but_its_own_initializer_is_not() {
    let diagnostics = analyse_one("p", |actions, bag| {
        let const_i32 = actions.types().builtin(BuiltinKind::I32).with_const();
        let three = actions.act_on_integer_literal(loc(1), 3);
        let x = actions.act_on_local_var_decl("x", loc(1), const_i32, Some(three), bag);
        let decl_stmt = actions.act_on_decl_stmt(loc(1), x);

        let x_ref = actions.act_on_identifier(loc(2), "x");
        let four = actions.act_on_integer_literal(loc(2), 4);
        let assign = actions.act_on_binary_op(loc(2), BinaryOp::Assign, x_ref, four);
        let assign_stmt = actions.act_on_expr_stmt(loc(2), assign);

        let body = actions.act_on_compound(loc(0), vec![decl_stmt, assign_stmt]);
        let void_ty = actions.types().builtin(BuiltinKind::Void);
        actions.act_on_func_decl("run", loc(0), false, void_ty, vec![], false, Some(body), bag);
    });

    assert_eq!(count(&diagnostics, DiagnosticId::err_typecheck_assign_const), 1);
}

#[test]
fn s3_narrowing_an_i32_into_an_i8_warns_about_precision_loss() {
    let diagnostics = analyse_one("p", |actions, bag| {
        let i32_ty = actions.types().builtin(BuiltinKind::I32);
        let i8_ty = actions.types().builtin(BuiltinKind::I8);
        let lit = actions.act_on_integer_literal(loc(1), 300_000);
        let a = actions.act_on_local_var_decl("a", loc(1), i32_ty, Some(lit), bag);
        let a_decl_stmt = actions.act_on_decl_stmt(loc(1), a);

        let a_ref = actions.act_on_identifier(loc(2), "a");
        let b = actions.act_on_local_var_decl("b", loc(2), i8_ty, Some(a_ref), bag);
        let b_decl_stmt = actions.act_on_decl_stmt(loc(2), b);

        let body = actions.act_on_compound(loc(0), vec![a_decl_stmt, b_decl_stmt]);
        let void_ty = actions.types().builtin(BuiltinKind::Void);
        actions.act_on_func_decl("run", loc(0), false, void_ty, vec![], false, Some(body), bag);
    });

    assert_eq!(count(&diagnostics, DiagnosticId::warn_impcast_integer_precision), 1);
}

#[test]
fn s4_unknown_symbol_gets_a_suggestion_even_from_an_unused_package() {
    let diagnostics = analyse(vec![
        unit("a", |actions, bag| {
            let void_ty = actions.types().builtin(BuiltinKind::Void);
            let body = actions.act_on_compound(loc(1), vec![]);
            actions.act_on_func_decl("greet", loc(1), true, void_ty, vec![], false, Some(body), bag);
        }),
        unit("b", |actions, bag| {
            // Deliberately no `use a;` here.
            let callee = actions.act_on_identifier(loc(2), "greet");
            let call = actions.act_on_call(loc(2), callee, vec![]);
            let stmt = actions.act_on_expr_stmt(loc(2), call);
            let body = actions.act_on_compound(loc(2), vec![stmt]);
            let void_ty = actions.types().builtin(BuiltinKind::Void);
            actions.act_on_func_decl("test", loc(2), false, void_ty, vec![], false, Some(body), bag);
        }),
    ]);

    assert_eq!(count(&diagnostics, DiagnosticId::err_undeclared_var_use), 1);
    let suggestion = diagnostics.iter().find(|d| d.id == DiagnosticId::note_function_suggestion);
    let suggestion = suggestion.expect("an unused package's public symbol should still be suggested");
    assert_eq!(suggestion.args, vec!["a.greet".to_string()]);
}

#[test]
fn s5_duplicate_struct_member_is_flagged_with_a_note_on_the_first() {
    let diagnostics = analyse_one("p", |actions, bag| {
        let i32_ty = actions.types().builtin(BuiltinKind::I32);
        let s = actions.act_on_struct_type(Some("S"), false, true, false, loc(1));
        actions.act_on_struct_var(s, "x", loc(2), i32_ty);
        actions.act_on_struct_var(s, "x", loc(3), i32_ty);
        actions.act_on_struct_type_finish(s, bag);
    });

    assert_eq!(count(&diagnostics, DiagnosticId::err_duplicate_member), 1);
    assert_eq!(count(&diagnostics, DiagnosticId::note_previous_member), 1);
    let note = diagnostics.iter().find(|d| d.id == DiagnosticId::note_previous_member).unwrap();
    assert_eq!(note.loc, loc(2), "the note should point at the first `x`, not the duplicate");
}

#[test]
fn s6_elemsof_on_a_plain_scalar_is_rejected() {
    let diagnostics = analyse_one("p", |actions, bag| {
        let i32_ty = actions.types().builtin(BuiltinKind::I32);
        let five = actions.act_on_integer_literal(loc(1), 5);
        let n = actions.act_on_local_var_decl("n", loc(1), i32_ty, Some(five), bag);
        let n_decl_stmt = actions.act_on_decl_stmt(loc(1), n);

        let n_ref = actions.act_on_identifier(loc(2), "n");
        let elemsof = actions.act_on_builtin_expr(loc(2), BuiltinExprKind::ElemsOf, n_ref);
        let m = actions.act_on_local_var_decl("m", loc(2), i32_ty, Some(elemsof), bag);
        let m_decl_stmt = actions.act_on_decl_stmt(loc(2), m);

        let body = actions.act_on_compound(loc(0), vec![n_decl_stmt, m_decl_stmt]);
        let void_ty = actions.types().builtin(BuiltinKind::Void);
        actions.act_on_func_decl("run", loc(0), false, void_ty, vec![], false, Some(body), bag);
    });

    assert_eq!(count(&diagnostics, DiagnosticId::err_invalid_elemsof_type), 1);
}

#[test]
fn break_and_continue_outside_any_loop_are_rejected() {
    let diagnostics = analyse_one("p", |actions, bag| {
        let brk = actions.act_on_break(loc(1));
        let cont = actions.act_on_continue(loc(2));
        let body = actions.act_on_compound(loc(0), vec![brk, cont]);
        let void_ty = actions.types().builtin(BuiltinKind::Void);
        actions.act_on_func_decl("run", loc(0), false, void_ty, vec![], false, Some(body), bag);
    });

    assert_eq!(count(&diagnostics, DiagnosticId::err_break_outside_loop), 1);
    assert_eq!(count(&diagnostics, DiagnosticId::err_continue_outside_loop), 1);
}

#[test]
fn break_inside_a_while_loop_is_accepted() {
    let diagnostics = analyse_one("p", |actions, bag| {
        let cond = actions.act_on_bool_literal(loc(1), true);
        let brk = actions.act_on_break(loc(2));
        let loop_body = actions.act_on_compound(loc(2), vec![brk]);
        let while_stmt = actions.act_on_while(loc(1), cond, loop_body);
        let body = actions.act_on_compound(loc(0), vec![while_stmt]);
        let void_ty = actions.types().builtin(BuiltinKind::Void);
        actions.act_on_func_decl("run", loc(0), false, void_ty, vec![], false, Some(body), bag);
    });

    assert_eq!(count(&diagnostics, DiagnosticId::err_break_outside_loop), 0);
}

#[test]
fn calling_a_function_with_too_many_arguments_is_rejected() {
    let diagnostics = analyse_one("p", |actions, bag| {
        let i32_ty = actions.types().builtin(BuiltinKind::I32);
        let param = actions.act_on_function_arg("x", loc(2), i32_ty, None, false, bag);
        let fn_body = actions.act_on_compound(loc(2), vec![]);
        actions.act_on_func_decl("needs_one", loc(2), false, i32_ty, vec![param], false, Some(fn_body), bag);

        let callee = actions.act_on_identifier(loc(3), "needs_one");
        let a1 = actions.act_on_integer_literal(loc(3), 1);
        let a2 = actions.act_on_integer_literal(loc(3), 2);
        let call = actions.act_on_call(loc(3), callee, vec![a1, a2]);
        let stmt = actions.act_on_expr_stmt(loc(3), call);
        let void_ty = actions.types().builtin(BuiltinKind::Void);
        let caller_body = actions.act_on_compound(loc(3), vec![stmt]);
        actions.act_on_func_decl("caller", loc(3), false, void_ty, vec![], false, Some(caller_body), bag);
    });

    assert_eq!(count(&diagnostics, DiagnosticId::err_too_many_args), 1);
}
