//! Command Dispatcher (spec §4.6). Grounded on `original_source/commands.go`,
//! with the full eight-command set spec.md names (the original snapshot
//! wired only three and left the rest as TODOs).

use std::path::{Path, PathBuf};

use crate::ast::{File, GenDecl, GenKeyword, Stmt};
use crate::command_name::CommandName;
use crate::printer;
use crate::splice;
use crate::typecheck::TypeChecker;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("arg required")]
    ArgRequired,
    #[error("could not import {0:?}: {1}")]
    Import(String, String),
    #[error("command not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    TypeCheck(#[from] crate::typecheck::TypeCheckError),
}

/// What the dispatcher did, for the Session Controller to surface to the
/// user (spec §4.8's `CmdRun` sentinel carries this back up).
pub enum CommandOutcome {
    /// Nothing further to print; the action already wrote what it needed to.
    Done,
    /// Text the REPL should print (e.g. `:help`, `:type`'s resolved type).
    Print(String),
    /// `:quit` was issued.
    Quit,
}

struct CommandSpec {
    name: CommandName,
    usage: &'static str,
    help: &'static str,
}

const COMMANDS: &[CommandSpec] = &[
    CommandSpec { name: CommandName("i[mport]"), usage: "<path...>", help: "import a package" },
    CommandSpec { name: CommandName("t[ype]"), usage: "<expr>", help: "print the type of an expression" },
    CommandSpec { name: CommandName("print"), usage: "", help: "print current source" },
    CommandSpec { name: CommandName("w[rite]"), usage: "[file]", help: "write out the current source" },
    CommandSpec { name: CommandName("clear"), usage: "", help: "clear the session" },
    CommandSpec { name: CommandName("d[oc]"), usage: "<expr|pkg>", help: "show documentation" },
    CommandSpec { name: CommandName("h[elp]"), usage: "", help: "list commands" },
    CommandSpec { name: CommandName("q[uit]"), usage: "", help: "quit the session" },
];

fn resolve(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|c| c.name.matches(name))
}

/// Dispatches `name`/`arg` against `file`. The caller owns type-checking,
/// the scratch directory, and rollback semantics for commands that require
/// them (`type`, `doc` per spec §4.6 "commands that inspect types always
/// rollback").
pub fn dispatch(
    name: &str,
    arg: &str,
    file: &mut File,
    checker: &dyn TypeChecker,
    dir: &Path,
    session_file_name: &str,
    extra_files: &[String],
    project_dir: &Path,
) -> Result<CommandOutcome, CommandError> {
    let spec = resolve(name).ok_or_else(|| CommandError::NotFound(name.to_string()))?;
    match spec.name.display().as_str() {
        "import" => action_import(arg, file, checker, dir, session_file_name, extra_files).map(|_| CommandOutcome::Done),
        "type" => action_type(arg, file, checker, dir, session_file_name, extra_files),
        "print" => Ok(CommandOutcome::Print(printer::render(file, true).source)),
        "write" => action_write(arg, file).map(CommandOutcome::Print),
        "clear" => action_clear(file, project_dir).map(|_| CommandOutcome::Done),
        "doc" => action_doc(arg, file),
        "help" => Ok(CommandOutcome::Print(help_text())),
        "quit" => Ok(CommandOutcome::Quit),
        other => Err(CommandError::NotFound(other.to_string())),
    }
}

fn action_import(
    arg: &str,
    file: &mut File,
    checker: &dyn TypeChecker,
    dir: &Path,
    session_file_name: &str,
    extra_files: &[String],
) -> Result<(), CommandError> {
    if arg.trim().is_empty() {
        return Err(CommandError::ArgRequired);
    }
    for path in arg.split_whitespace() {
        let path = path.trim_matches('"');
        if file.find_import(path).is_none() {
            file.imports.push(crate::ast::ImportSpec::new(path));
        }

        let rendered = printer::render(file, false);
        std::fs::write(dir.join(session_file_name), &rendered.source)?;
        let errors = checker.check(dir, session_file_name, extra_files)?;
        if !errors.is_empty() {
            file.imports.retain(|i| i.path != path);
            let message = errors.first().map(|e| e.message.clone()).unwrap_or_default();
            return Err(CommandError::Import(path.to_string(), message));
        }
    }
    Ok(())
}

/// A type no ordinary expression the user types will ever actually have;
/// assigning an expression to a variable declared with this type forces the
/// host toolchain to name the expression's real type in its mismatch
/// diagnostic.
const TYPE_PROBE_SENTINEL: &str = "chan<- struct{}";

/// `:type <expr>` (spec §4.6): this engine has no embedded `go/types`, so it
/// cannot read `TypeInfo.TypeOf` the way upstream gore does. Instead it
/// splices a deliberate type mismatch against `TYPE_PROBE_SENTINEL` and
/// recovers the expression's real type from the resulting `cannot use ...
/// as ... value` diagnostic text, then rolls back unconditionally (commands
/// that inspect types always rollback).
fn action_type(
    arg: &str,
    file: &mut File,
    checker: &dyn TypeChecker,
    dir: &Path,
    session_file_name: &str,
    extra_files: &[String],
) -> Result<CommandOutcome, CommandError> {
    if arg.trim().is_empty() {
        return Err(CommandError::ArgRequired);
    }
    let tokens = crate::lexer::lex(arg.trim()).map_err(|_| CommandError::ArgRequired)?;
    let expr = crate::parser::parse_expr_complete(&tokens).map_err(|_| CommandError::ArgRequired)?;

    let snap = splice::snapshot(file);
    let probe = GenDecl {
        keyword: GenKeyword::Var,
        names: vec!["_gore_type_probe".into()],
        type_text: Some(TYPE_PROBE_SENTINEL.into()),
        values: vec![expr.clone()],
        raw: format!("var _gore_type_probe {} = {}", TYPE_PROBE_SENTINEL, expr.render()),
    };
    file.main_mut().body.push(Stmt::Decl(probe));

    let rendered = printer::render(file, false);
    std::fs::write(dir.join(session_file_name), &rendered.source)?;
    let errors = checker.check(dir, session_file_name, extra_files)?;

    splice::rollback(file, snap);

    let Some(err) = errors.first() else {
        return Ok(CommandOutcome::Print(TYPE_PROBE_SENTINEL.to_string()));
    };
    match type_from_mismatch(&err.message) {
        Some(ty) => Ok(CommandOutcome::Print(ty)),
        None => Ok(CommandOutcome::Print(err.message.clone())),
    }
}

/// Pulls the real type out of a `cannot use ... as ... value` mismatch
/// diagnostic, e.g. `cannot use x (variable of type int) as chan<- struct{}
/// value in variable declaration` yields `int`, and `cannot use 1 (untyped
/// int constant) as ...` yields `untyped int`.
fn type_from_mismatch(message: &str) -> Option<String> {
    if let Some(idx) = message.find("variable of type ") {
        let rest = &message[idx + "variable of type ".len()..];
        let end = rest.find(')')?;
        return Some(rest[..end].to_string());
    }
    if let Some(idx) = message.find("value of type ") {
        let rest = &message[idx + "value of type ".len()..];
        let end = rest.find(')')?;
        return Some(rest[..end].to_string());
    }
    if let Some(idx) = message.find("(untyped ") {
        let rest = &message[idx + "(untyped ".len()..];
        let end = rest.find(" constant)")?;
        return Some(format!("untyped {}", &rest[..end]));
    }
    None
}

fn action_write(arg: &str, file: &File) -> Result<String, CommandError> {
    let rendered = printer::render(file, false);
    let filename = if arg.trim().is_empty() {
        default_write_filename()
    } else {
        arg.trim().to_string()
    };
    std::fs::write(&filename, &rendered.source)?;
    Ok(format!("Source wrote to {}", filename))
}

fn default_write_filename() -> String {
    format!("gore_session_{}.go", chrono::Local::now().format("%Y%m%d_%H%M%S"))
}

/// `:clear` (spec §4.6): re-initializes the session file in place, keeping
/// the scratch directory so the host toolchain's module cache survives.
fn action_clear(file: &mut File, _project_dir: &Path) -> Result<(), CommandError> {
    *file = crate::session::initial_file();
    Ok(())
}

fn action_doc(arg: &str, _file: &File) -> Result<CommandOutcome, CommandError> {
    if arg.trim().is_empty() {
        return Err(CommandError::ArgRequired);
    }
    let output = std::process::Command::new("go").args(["doc", arg.trim()]).output()?;
    Ok(CommandOutcome::Print(String::from_utf8_lossy(&output.stdout).into_owned()))
}

fn help_text() -> String {
    COMMANDS
        .iter()
        .map(|c| format!(":{} {}\n    {}", c.name.0, c.usage, c.help))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Completion for `:import <prefix>`: walks `GOROOT`'s (and `GOPATH`'s) src
/// directories looking for subdirectories whose name has `prefix`'s last
/// path segment as a prefix, suppressing the trailing `/` for directories
/// that are themselves package roots of a VCS repository.
pub fn complete_import(prefix: &str, src_dirs: &[PathBuf]) -> Vec<String> {
    let (dir_part, name_part) = match prefix.rfind('/') {
        Some(idx) => (&prefix[..=idx], &prefix[idx + 1..]),
        None => ("", prefix),
    };

    let mut seen = std::collections::HashSet::new();
    let mut result = Vec::new();
    for src_dir in src_dirs {
        let dir = src_dir.join(dir_part);
        let Ok(entries) = std::fs::read_dir(&dir) else { continue };
        for entry in entries.flatten() {
            let Ok(file_type) = entry.file_type() else { continue };
            if !file_type.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || name.starts_with('_') || name == "testdata" {
                continue;
            }
            if !name.starts_with(name_part) {
                continue;
            }
            let mut candidate = format!("{}{}", dir_part, name);
            if !is_repo_root(&dir.join(&name)) {
                candidate.push('/');
            }
            if seen.insert(candidate.clone()) {
                result.push(candidate);
            }
        }
    }
    result
}

fn is_repo_root(dir: &Path) -> bool {
    ["/.git", "/.hg", "/.svn", "/.bzr"].iter().any(|vcs| dir.join(&vcs[1..]).exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Decl, FuncDecl, ImportSpec, MAIN_NAME, PRINT_NAME};
    use crate::typecheck::{TypeCheckError, TypeError};
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

    struct ScriptedChecker {
        responses: RefCell<Vec<Vec<TypeError>>>,
    }

    impl TypeChecker for ScriptedChecker {
        fn check(&self, _dir: &Path, _main_file: &str, _extra: &[String]) -> Result<Vec<TypeError>, TypeCheckError> {
            Ok(self.responses.borrow_mut().remove(0))
        }
    }

    #[test]
    fn type_from_mismatch_reads_variable_type() {
        let msg = "cannot use x (variable of type int) as chan<- struct{} value in variable declaration";
        assert_eq!(type_from_mismatch(msg), Some("int".to_string()));
    }

    #[test]
    fn type_from_mismatch_reads_untyped_constant() {
        let msg = "cannot use 1 (untyped int constant) as chan<- struct{} value in variable declaration";
        assert_eq!(type_from_mismatch(msg), Some("untyped int".to_string()));
    }

    #[test]
    fn type_from_mismatch_returns_none_for_unrelated_message() {
        assert_eq!(type_from_mismatch("syntax error: unexpected newline"), None);
    }

    #[test]
    fn type_command_reports_the_type_read_from_the_mismatch() {
        let mut f = fresh_file();
        let checker = ScriptedChecker {
            responses: RefCell::new(vec![vec![TypeError {
                file: "s.go".into(),
                line: 3,
                col: 2,
                message: "cannot use x (variable of type int) as chan<- struct{} value in variable declaration".into(),
            }]]),
        };
        let dir = tempfile::tempdir().unwrap();
        let outcome = action_type("1 + 1", &mut f, &checker, dir.path(), "s.go", &[]).unwrap();
        match outcome {
            CommandOutcome::Print(text) => assert_eq!(text, "int"),
            _ => panic!("expected Print outcome"),
        }
    }

    #[test]
    fn type_command_rolls_back_the_probe_statement() {
        let mut f = fresh_file();
        let checker = ScriptedChecker {
            responses: RefCell::new(vec![vec![TypeError {
                file: "s.go".into(),
                line: 3,
                col: 2,
                message: "cannot use 1 (untyped int constant) as chan<- struct{} value in variable declaration".into(),
            }]]),
        };
        let dir = tempfile::tempdir().unwrap();
        action_type("1", &mut f, &checker, dir.path(), "s.go", &[]).unwrap();
        assert!(f.main().body.is_empty());
    }

    #[test]
    fn resolve_accepts_abbreviations() {
        assert_eq!(resolve("i").unwrap().name.display(), "import");
        assert_eq!(resolve("imp").unwrap().name.display(), "import");
        assert_eq!(resolve("q").unwrap().name.display(), "quit");
    }

    #[test]
    fn resolve_rejects_unknown_commands() {
        assert!(resolve("frobnicate").is_none());
    }

    #[test]
    fn resolve_requires_exact_match_for_unbracketed_names() {
        assert!(resolve("pri").is_none());
        assert!(resolve("print").is_some());
    }

    #[test]
    fn help_text_lists_every_command() {
        let text = help_text();
        for c in COMMANDS {
            assert!(text.contains(c.name.0));
        }
    }

    #[test]
    fn complete_import_filters_by_last_segment_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("net");
        std::fs::create_dir_all(&src).unwrap();
        let matches = complete_import("ne", &[dir.path().to_path_buf()]);
        assert_eq!(matches, vec!["net/".to_string()]);
    }
}
