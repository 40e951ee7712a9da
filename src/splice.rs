//! Splicer (spec §4.2): mutates the session file to add a classified input,
//! recording a pre-splice snapshot so the controller can roll back on a
//! hard failure.

use crate::ast::{print_stmt, AssignStmt, Decl, Expr, File, FuncDecl, GenKeyword, Stmt, MAIN_NAME};
use crate::classify::Splice;

/// A shallow copy of the mutable parts of the session file, taken before
/// every splice (spec §3 "snapshot", §9 "structural shallow copy").
#[derive(Debug, Clone)]
pub struct Snapshot {
    main_body: Vec<Stmt>,
    decls: Vec<Decl>,
}

pub fn snapshot(file: &File) -> Snapshot {
    Snapshot { main_body: file.main().body.clone(), decls: file.decls.clone() }
}

/// Restores `file` to `snap`. Per spec §4.2: the main body is restored
/// wholesale; for every non-`main` function declaration that existed before
/// the snapshot, its prior version is restored, and anything added after
/// the snapshot (including brand-new function declarations) is discarded.
pub fn rollback(file: &mut File, snap: Snapshot) {
    file.decls = snap.decls;
    file.main_mut().body = snap.main_body;
}

/// Applies `splice` to `file`. Returns the pre-splice snapshot so the
/// caller can roll back later if the run fails.
pub fn apply(file: &mut File, splice: Splice) -> Snapshot {
    let snap = snapshot(file);
    match splice {
        Splice::Expression(expr) => apply_expression(file, expr),
        Splice::Statements(stmts) => apply_statements(file, stmts),
        Splice::FuncDecl(decl) => apply_func_decl(file, decl),
    }
    snap
}

fn apply_expression(file: &mut File, expr: Expr) {
    file.main_mut().body.push(print_stmt(vec![expr]));
}

/// Statement splice (spec §4.2): every parsed statement is appended as-is;
/// additionally, for the *last* statement only, an assignment or non-type
/// value declaration gets a following `PRINT` echo of the names it bound,
/// and a `type` declaration is moved out of `main` to the top level
/// (regardless of position, since a local type declaration can never be
/// echoed meaningfully).
fn apply_statements(file: &mut File, stmts: Vec<Stmt>) {
    let n = stmts.len();
    for (i, stmt) in stmts.into_iter().enumerate() {
        let is_last = i + 1 == n;
        match stmt {
            Stmt::Decl(decl) if decl.keyword == GenKeyword::Type => {
                file.decls.push(Decl::Gen(decl));
            }
            Stmt::Assign(assign) if is_last => {
                let names = non_blank_names(&assign.lhs);
                file.main_mut().body.push(Stmt::Assign(assign));
                push_echo(file, names);
            }
            Stmt::Decl(decl) if is_last => {
                let names = non_blank_names(&decl.names);
                file.main_mut().body.push(Stmt::Decl(decl));
                push_echo(file, names);
            }
            other => file.main_mut().body.push(other),
        }
    }
}

fn non_blank_names(names: &[String]) -> Vec<String> {
    names.iter().filter(|n| n.as_str() != "_").cloned().collect()
}

fn push_echo(file: &mut File, names: Vec<String>) {
    if names.is_empty() {
        return;
    }
    let args = names.into_iter().map(Expr::Ident).collect();
    file.main_mut().body.push(print_stmt(args));
}

/// Function-declaration splice (spec §4.2): redefinition replaces the prior
/// declaration of the same name; `main` itself is never redefined.
fn apply_func_decl(file: &mut File, decl: FuncDecl) {
    if decl.name == MAIN_NAME {
        return;
    }
    file.decls.retain(|d| !matches!(d, Decl::Func(f) if f.name == decl.name));
    file.decls.push(Decl::Func(decl));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{CallExpr, GenDecl, ImportSpec, PRINT_NAME};

    fn fresh_file() -> File {
        File {
            imports: vec![ImportSpec::new("fmt")],
            decls: vec![
                Decl::Func(FuncDecl { name: PRINT_NAME.into(), signature: "(xs ...any)".into(), body: vec![] }),
                Decl::Func(FuncDecl { name: MAIN_NAME.into(), signature: "()".into(), body: vec![] }),
            ],
        }
    }

    #[test]
    fn expression_splice_wraps_in_print() {
        let mut f = fresh_file();
        apply(&mut f, Splice::Expression(Expr::ident("x")));
        assert_eq!(f.main().body.len(), 1);
        match &f.main().body[0] {
            Stmt::Expr(Expr::Call(CallExpr { callee, args })) => {
                assert_eq!(**callee, Expr::Ident(PRINT_NAME.into()));
                assert_eq!(args, &[Expr::ident("x")]);
            }
            _ => panic!("expected PRINT call"),
        }
    }

    #[test]
    fn last_assignment_gets_echoed() {
        let mut f = fresh_file();
        let stmts = vec![Stmt::Assign(AssignStmt { lhs: vec!["x".into()], define: true, rhs: vec![Expr::Literal("10".into())] })];
        apply(&mut f, Splice::Statements(stmts));
        assert_eq!(f.main().body.len(), 2);
        assert!(matches!(f.main().body[0], Stmt::Assign(_)));
        let args = crate::ast::as_print_args(&f.main().body[1]).unwrap();
        assert_eq!(args, &[Expr::ident("x")]);
    }

    #[test]
    fn blank_identifier_is_not_echoed() {
        let mut f = fresh_file();
        let stmts = vec![Stmt::Assign(AssignStmt { lhs: vec!["_".into()], define: true, rhs: vec![Expr::Literal("10".into())] })];
        apply(&mut f, Splice::Statements(stmts));
        assert_eq!(f.main().body.len(), 1);
    }

    #[test]
    fn non_last_assignment_is_not_echoed() {
        let mut f = fresh_file();
        let stmts = vec![
            Stmt::Assign(AssignStmt { lhs: vec!["x".into()], define: true, rhs: vec![Expr::Literal("1".into())] }),
            Stmt::Expr(Expr::ident("println")),
        ];
        apply(&mut f, Splice::Statements(stmts));
        // x := 1 ; println  (no echo statement inserted for x)
        assert_eq!(f.main().body.len(), 2);
    }

    #[test]
    fn type_decl_moves_to_top_level() {
        let mut f = fresh_file();
        let decl = GenDecl { keyword: GenKeyword::Type, names: vec!["Point".into()], type_text: Some("struct{}".into()), values: vec![], raw: "type Point struct{}".into() };
        apply(&mut f, Splice::Statements(vec![Stmt::Decl(decl)]));
        assert_eq!(f.main().body.len(), 0);
        assert!(f.decls.iter().any(|d| matches!(d, Decl::Gen(g) if g.names == vec!["Point".to_string()])));
    }

    #[test]
    fn func_redefinition_replaces_prior() {
        let mut f = fresh_file();
        apply(&mut f, Splice::FuncDecl(FuncDecl { name: "f".into(), signature: "() int".into(), body: vec![Stmt::Raw("return 100".into())] }));
        apply(&mut f, Splice::FuncDecl(FuncDecl { name: "f".into(), signature: "() int".into(), body: vec![Stmt::Raw("return 200".into())] }));
        let fs: Vec<_> = f.decls.iter().filter(|d| matches!(d, Decl::Func(fd) if fd.name == "f")).collect();
        assert_eq!(fs.len(), 1);
    }

    #[test]
    fn main_is_never_redefined() {
        let mut f = fresh_file();
        apply(&mut f, Splice::FuncDecl(FuncDecl { name: MAIN_NAME.into(), signature: "()".into(), body: vec![Stmt::Raw("panic(1)".into())] }));
        assert_eq!(f.main().body.len(), 0);
    }

    #[test]
    fn rollback_restores_pre_splice_state() {
        let mut f = fresh_file();
        let snap = apply(&mut f, Splice::Expression(Expr::ident("x")));
        assert_eq!(f.main().body.len(), 1);
        rollback(&mut f, snap);
        assert_eq!(f.main().body.len(), 0);
    }
}
