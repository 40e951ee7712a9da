//! Quick-Fix Engine (spec §4.3): normalizes the session file before each
//! type-check, then iteratively rewrites it in response to the three
//! recoverable error shapes until the host toolchain is satisfied or the
//! engine gives up. Ported from `original_source/quickfix.go`.

use std::path::Path;

use crate::ast::{as_print_args, CallExpr, Expr, File, Stmt, PRINT_NAME};
use crate::printer::{self, PositionMap};
use crate::purity::is_pure;
use crate::typecheck::{TypeCheckError, TypeChecker, TypeError};

const MAX_ATTEMPTS: usize = 10;

#[derive(Debug)]
pub enum QuickFixOutcome {
    /// The type checker reported no errors.
    Fixed,
    /// The loop exhausted its attempts, or hit an error shape it doesn't
    /// know how to rewrite; the caller (Session Controller) surfaces the
    /// remaining diagnostics and, per spec §4.8, the Runner's subsequent
    /// failing run communicates the error to the user.
    GaveUp(Vec<TypeError>),
}

/// Reverses the engine's own previous rewrites (spec §4.3 "normalization
/// pass"): un-blanks every import, drops every `_ = expr` discard, and
/// collapses `PRINT(args...)` statements added purely to echo a result —
/// fully, if every argument is pure; otherwise demoting impure arguments to
/// `_ = arg` discards and dropping the pure ones.
pub fn clear_quick_fix(file: &mut File) {
    for imp in &mut file.imports {
        imp.blank = false;
    }

    let old = std::mem::take(&mut file.main_mut().body);
    let mut new_body = Vec::with_capacity(old.len());
    for stmt in old {
        match stmt {
            Stmt::Discard(_) => continue,
            Stmt::Expr(Expr::Call(CallExpr { callee, args })) if is_print_callee(&callee) => {
                if args.iter().all(is_pure) {
                    continue;
                }
                for arg in args {
                    if !is_pure(&arg) {
                        new_body.push(Stmt::Discard(arg));
                    }
                }
            }
            other => new_body.push(other),
        }
    }
    file.main_mut().body = new_body;
}

fn is_print_callee(callee: &Expr) -> bool {
    matches!(callee, Expr::Ident(name) if name == PRINT_NAME)
}

/// Runs the bounded rewrite loop. Writes the rendered session file to
/// `dir/session_file_name` before every type-check attempt, since the
/// external toolchain only sees what is on disk.
///
/// Does NOT call `clear_quick_fix` itself: the Session Controller runs that
/// normalization exactly once per `eval`, before the splice is applied
/// (spec §4.8 step 1), matching `original_source/session.go::Eval` calling
/// `clearQuickFix` up front rather than from inside the rewrite loop —
/// calling it here too would immediately strip the echo statement the
/// current input's splice just added.
pub fn do_quick_fix(
    file: &mut File,
    checker: &dyn TypeChecker,
    dir: &Path,
    session_file_name: &str,
    extra_files: &[String],
) -> Result<QuickFixOutcome, TypeCheckError> {
    for _ in 0..MAX_ATTEMPTS {
        let rendered = printer::render(file, false);
        let path = dir.join(session_file_name);
        std::fs::write(&path, &rendered.source).map_err(TypeCheckError::Spawn)?;

        let errors = checker.check(dir, session_file_name, extra_files)?;
        let Some(first) = errors.first() else {
            return Ok(QuickFixOutcome::Fixed);
        };

        if !try_rewrite(file, first, &rendered.positions) {
            return Ok(QuickFixOutcome::GaveUp(errors));
        }
    }

    let rendered = printer::render(file, false);
    let path = dir.join(session_file_name);
    std::fs::write(&path, &rendered.source).map_err(TypeCheckError::Spawn)?;
    let errors = checker.check(dir, session_file_name, extra_files)?;
    if errors.is_empty() {
        Ok(QuickFixOutcome::Fixed)
    } else {
        Ok(QuickFixOutcome::GaveUp(errors))
    }
}

/// Applies one of the three rewrite triggers from spec §4.3. Returns
/// whether a rewrite was made (i.e. progress); `false` means the engine
/// doesn't recognize this error shape and should give up.
fn try_rewrite(file: &mut File, err: &TypeError, positions: &PositionMap) -> bool {
    if let Some(ident) = err.message.strip_suffix(" declared and not used") {
        file.main_mut().body.push(Stmt::Discard(Expr::ident(ident)));
        return true;
    }
    if let Some(quoted) = err.message.strip_suffix(" imported and not used") {
        let path = quoted.trim_matches('"');
        if let Some(imp) = file.find_import_mut(path) {
            imp.blank = true;
            return true;
        }
        return false;
    }
    if err.message.ends_with(" used as value") {
        if let Some(idx) = positions.stmt_at_line(err.line) {
            if let Some(args) = as_print_args(&file.main().body[idx]) {
                let new_stmts: Vec<Stmt> = args.iter().cloned().map(Stmt::Expr).collect();
                file.main_mut().body.splice(idx..idx + 1, new_stmts);
                return true;
            }
        }
        return false;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AssignStmt, Decl, FuncDecl, ImportSpec, MAIN_NAME};
    use crate::printer::render;
    use crate::typecheck::TypeCheckError;
    use std::cell::RefCell;

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
    fn clear_quick_fix_unblanks_imports() {
        let mut f = fresh_file();
        f.imports[0].blank = true;
        clear_quick_fix(&mut f);
        assert!(!f.imports[0].blank);
    }

    #[test]
    fn clear_quick_fix_removes_discards() {
        let mut f = fresh_file();
        f.main_mut().body.push(Stmt::Discard(Expr::ident("x")));
        clear_quick_fix(&mut f);
        assert!(f.main().body.is_empty());
    }

    #[test]
    fn clear_quick_fix_drops_all_pure_print_call() {
        let mut f = fresh_file();
        f.main_mut().body.push(Stmt::Expr(Expr::call(Expr::ident(PRINT_NAME), vec![Expr::ident("x")])));
        clear_quick_fix(&mut f);
        assert!(f.main().body.is_empty());
    }

    #[test]
    fn clear_quick_fix_demotes_impure_args_to_discards() {
        let mut f = fresh_file();
        let impure_call = Expr::call(Expr::ident("log.SetPrefix"), vec![]);
        f.main_mut().body.push(Stmt::Expr(Expr::call(Expr::ident(PRINT_NAME), vec![impure_call.clone()])));
        clear_quick_fix(&mut f);
        assert_eq!(f.main().body, vec![Stmt::Discard(impure_call)]);
    }

    struct ScriptedChecker {
        responses: RefCell<Vec<Vec<TypeError>>>,
    }

    impl TypeChecker for ScriptedChecker {
        fn check(&self, _dir: &Path, _main_file: &str, _extra: &[String]) -> Result<Vec<TypeError>, TypeCheckError> {
            Ok(self.responses.borrow_mut().remove(0))
        }
    }

    #[test]
    fn rewrites_declared_and_not_used() {
        let mut f = fresh_file();
        f.main_mut().body.push(Stmt::Assign(AssignStmt { lhs: vec!["x".into()], define: true, rhs: vec![Expr::Literal("1".into())] }));
        let checker = ScriptedChecker {
            responses: RefCell::new(vec![
                vec![TypeError { file: "s.go".into(), line: 1, col: 1, message: "x declared and not used".into() }],
                vec![],
            ]),
        };
        let dir = tempfile::tempdir().unwrap();
        let outcome = do_quick_fix(&mut f, &checker, dir.path(), "s.go", &[]).unwrap();
        assert!(matches!(outcome, QuickFixOutcome::Fixed));
        assert!(f.main().body.iter().any(|s| matches!(s, Stmt::Discard(Expr::Ident(n)) if n == "x")));
    }

    #[test]
    fn rewrites_imported_and_not_used() {
        let mut f = fresh_file();
        let checker = ScriptedChecker {
            responses: RefCell::new(vec![
                vec![TypeError { file: "s.go".into(), line: 1, col: 1, message: "\"fmt\" imported and not used".into() }],
                vec![],
            ]),
        };
        let dir = tempfile::tempdir().unwrap();
        do_quick_fix(&mut f, &checker, dir.path(), "s.go", &[]).unwrap();
        assert!(f.find_import("fmt").unwrap().blank);
    }

    #[test]
    fn unwraps_used_as_value() {
        let mut f = fresh_file();
        f.main_mut().body.push(Stmt::Expr(Expr::call(Expr::ident(PRINT_NAME), vec![Expr::call(Expr::ident("log.SetPrefix"), vec![Expr::Literal("\"\"".into())])])));
        let rendered = render(&f, false);
        let line = rendered.positions.main_stmt_lines[0].0;
        let checker = ScriptedChecker {
            responses: RefCell::new(vec![
                vec![TypeError { file: "s.go".into(), line, col: 1, message: "log.SetPrefix(\"\") (no value) used as value".into() }],
                vec![],
            ]),
        };
        let dir = tempfile::tempdir().unwrap();
        do_quick_fix(&mut f, &checker, dir.path(), "s.go", &[]).unwrap();
        assert_eq!(f.main().body.len(), 1);
        assert!(matches!(&f.main().body[0], Stmt::Expr(Expr::Call(_))));
    }

    #[test]
    fn gives_up_on_unrecognized_error() {
        let mut f = fresh_file();
        let checker = ScriptedChecker { responses: RefCell::new(vec![vec![TypeError { file: "s.go".into(), line: 1, col: 1, message: "syntax error".into() }]]) };
        let dir = tempfile::tempdir().unwrap();
        let outcome = do_quick_fix(&mut f, &checker, dir.path(), "s.go", &[]).unwrap();
        assert!(matches!(outcome, QuickFixOutcome::GaveUp(_)));
    }
}
