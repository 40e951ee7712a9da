//! Renders the in-memory session file back to source text.
//!
//! Two renderings are needed (spec §4.6 `print`/`write`): a space-indented
//! one for on-screen display, and a tab-indented one for files written to
//! disk, mirroring `original_source/session.go::source(space bool)`.
//!
//! Also produces a `PositionMap`, the "position set shared by all parsed
//! artifacts" from spec §3: a mapping from rendered line number to the
//! `main` body statement that produced it, so the quick-fix engine can
//! translate the host toolchain's `file:line:col` diagnostics back into AST
//! mutations without the engine maintaining byte-accurate spans itself.

use crate::ast::{Decl, File, FuncDecl, GenKeyword, Stmt};

pub struct Rendered {
    pub source: String,
    pub positions: PositionMap,
}

/// Maps a 1-based rendered line number to the index of the `main`-body
/// statement rendered on that line.
#[derive(Debug, Default, Clone)]
pub struct PositionMap {
    pub main_stmt_lines: Vec<(usize, usize)>,
}

impl PositionMap {
    pub fn stmt_at_line(&self, line: usize) -> Option<usize> {
        self.main_stmt_lines.iter().find(|(l, _)| *l == line).map(|(_, idx)| *idx)
    }
}

fn indent_unit(space: bool) -> &'static str {
    if space {
        "    "
    } else {
        "\t"
    }
}

/// Renders `file`, returning the source text and a line/statement position
/// map. `space` selects space-indentation (`print`) vs tab-indentation
/// (`write`), per spec §4.6.
pub fn render(file: &File, space: bool) -> Rendered {
    let indent = indent_unit(space);
    let mut out = String::new();
    let mut line = 1usize;
    let mut positions = PositionMap::default();

    out.push_str("package main\n\n");
    line += 2;

    if !file.imports.is_empty() {
        out.push_str("import (\n");
        line += 1;
        for imp in &file.imports {
            if imp.blank {
                out.push_str(&format!("{}_ \"{}\"\n", indent, imp.path));
            } else {
                out.push_str(&format!("{}\"{}\"\n", indent, imp.path));
            }
            line += 1;
        }
        out.push_str(")\n\n");
        line += 2;
    }

    for decl in &file.decls {
        match decl {
            Decl::Func(f) => {
                render_func(f, indent, &mut out, &mut line, &mut positions);
            }
            Decl::Gen(g) => {
                out.push_str(&g.raw);
                out.push_str("\n\n");
                line += count_newlines(&g.raw) + 2;
            }
        }
    }

    Rendered { source: out, positions }
}

fn render_func(f: &FuncDecl, indent: &str, out: &mut String, line: &mut usize, positions: &mut PositionMap) {
    out.push_str(&format!("func {}{} {{\n", f.name, spaced_signature(&f.signature)));
    *line += 1;
    let is_main = f.name == crate::ast::MAIN_NAME;
    for (idx, stmt) in f.body.iter().enumerate() {
        let text = render_stmt(stmt);
        for (i, raw_line) in text.lines().enumerate() {
            out.push_str(indent);
            out.push_str(raw_line);
            out.push('\n');
            if is_main && i == 0 {
                positions.main_stmt_lines.push((*line, idx));
            }
            *line += 1;
        }
        if text.is_empty() {
            out.push('\n');
            *line += 1;
        }
    }
    out.push_str("}\n\n");
    *line += 2;
}

fn render_stmt(stmt: &Stmt) -> String {
    match stmt {
        Stmt::Decl(d) if d.keyword == GenKeyword::Type => d.raw.clone(),
        other => other.render(),
    }
}

fn spaced_signature(sig: &str) -> String {
    if sig.starts_with('(') {
        format!("{}", sig)
    } else {
        format!(" {}", sig)
    }
}

fn count_newlines(s: &str) -> usize {
    s.matches('\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;

    fn sample_file() -> File {
        File {
            imports: vec![ImportSpec::new("fmt")],
            decls: vec![
                Decl::Func(FuncDecl {
                    name: PRINT_NAME.into(),
                    signature: "(xs ...any)".into(),
                    body: vec![Stmt::Raw("for _, x := range xs { fmt.Printf(\"%#v\\n\", x) }".into())],
                }),
                Decl::Func(FuncDecl {
                    name: MAIN_NAME.into(),
                    signature: "()".into(),
                    body: vec![Stmt::Assign(AssignStmt { lhs: vec!["x".into()], define: true, rhs: vec![Expr::Literal("10".into())] })],
                }),
            ],
        }
    }

    #[test]
    fn renders_package_and_import() {
        let r = render(&sample_file(), true);
        assert!(r.source.starts_with("package main\n\n"));
        assert!(r.source.contains("import (\n    \"fmt\"\n)"));
    }

    #[test]
    fn tracks_main_body_line_positions() {
        let r = render(&sample_file(), true);
        assert_eq!(r.positions.main_stmt_lines.len(), 1);
        let (_, idx) = r.positions.main_stmt_lines[0];
        assert_eq!(idx, 0);
    }

    #[test]
    fn tab_indent_uses_tabs() {
        let r = render(&sample_file(), false);
        assert!(r.source.contains("\t\"fmt\"\n"));
    }
}
