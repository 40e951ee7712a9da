//! In-memory model of the session's synthetic source file.
//!
//! This mirrors just enough of a Go-like host language's declaration,
//! statement, and expression grammar for the REPL to splice user input into
//! a single growing `main` function body. Full type information always comes
//! from the external host toolchain (see `typecheck`); this module only
//! models syntax shape.

pub const PRINT_NAME: &str = "PRINT";
pub const MAIN_NAME: &str = "main";

#[derive(Debug, Clone, PartialEq)]
pub struct File {
    pub imports: Vec<ImportSpec>,
    pub decls: Vec<Decl>,
}

impl File {
    pub fn main(&self) -> &FuncDecl {
        self.func(MAIN_NAME).expect("session file always has main")
    }

    pub fn main_mut(&mut self) -> &mut FuncDecl {
        self.func_mut(MAIN_NAME).expect("session file always has main")
    }

    pub fn func(&self, name: &str) -> Option<&FuncDecl> {
        self.decls.iter().find_map(|d| match d {
            Decl::Func(f) if f.name == name => Some(f),
            _ => None,
        })
    }

    pub fn func_mut(&mut self, name: &str) -> Option<&mut FuncDecl> {
        self.decls.iter_mut().find_map(|d| match d {
            Decl::Func(f) if f.name == name => Some(f),
            _ => None,
        })
    }

    pub fn find_import(&self, path: &str) -> Option<&ImportSpec> {
        self.imports.iter().find(|i| i.path == path)
    }

    pub fn find_import_mut(&mut self, path: &str) -> Option<&mut ImportSpec> {
        self.imports.iter_mut().find(|i| i.path == path)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpec {
    pub path: String,
    /// rendered as `_ "path"` when true
    pub blank: bool,
}

impl ImportSpec {
    pub fn new(path: impl Into<String>) -> Self {
        ImportSpec { path: path.into(), blank: false }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Func(FuncDecl),
    Gen(GenDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: String,
    /// parameter/result list, raw text, e.g. "()" or "(n int) string"
    pub signature: String,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenKeyword {
    Type,
    Const,
    Var,
}

impl GenKeyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenKeyword::Type => "type",
            GenKeyword::Const => "const",
            GenKeyword::Var => "var",
        }
    }
}

/// A `type`/`const`/`var` declaration, either at top level or as a statement
/// inside a function body. `names` is empty for a `type` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct GenDecl {
    pub keyword: GenKeyword,
    pub names: Vec<String>,
    pub type_text: Option<String>,
    pub values: Vec<Expr>,
    /// full source text, always valid for rendering regardless of whether
    /// `names`/`values` were successfully decomposed
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(Expr),
    Assign(AssignStmt),
    Decl(GenDecl),
    /// `_ = expr`: silences "declared and not used" (expr an ident) or
    /// preserves a formerly-printed impure expression's side effect while
    /// dropping its value (quick-fix's clear-quick-fix demotion).
    Discard(Expr),
    /// opaque statement text the splicer/quick-fix never need to inspect
    /// structurally (if/for/switch/select/go/defer/return/branch statements).
    Raw(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub lhs: Vec<String>,
    /// `:=` when true, `=` when false
    pub define: bool,
    pub rhs: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(String),
    /// numeric, string, or rune literal, kept verbatim
    Literal(String),
    Call(CallExpr),
    Selector { recv: Box<Expr>, field: String },
    Index { recv: Box<Expr>, index: Box<Expr> },
    Slice { recv: Box<Expr>, low: Option<Box<Expr>>, high: Option<Box<Expr>>, max: Option<Box<Expr>> },
    Unary { op: String, expr: Box<Expr> },
    Binary { op: String, lhs: Box<Expr>, rhs: Box<Expr> },
    Paren(Box<Expr>),
    /// `Type{...}`, kept as raw text including the braces
    CompositeLit(String),
    /// `func(...) ... { ... }`, kept as raw text
    FuncLit(String),
    TypeAssert { expr: Box<Expr>, ty: String },
    /// fallback for type literals (slice/map/chan/struct/interface types,
    /// pointer types outside of unary `*`) that the splicer and quick-fix
    /// engine never need to decompose; always pure per spec §4.3.
    TypeExpr(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub args: Vec<Expr>,
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Expr {
        Expr::Ident(name.into())
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Expr {
        Expr::Call(CallExpr { callee: Box::new(callee), args })
    }

    /// Best-effort reconstruction of source text for this expression. Used
    /// both by the printer and by the parser when fusing a primary
    /// expression with a following raw span (composite literals, type
    /// assertions parsed from trailing tokens).
    pub fn render(&self) -> String {
        match self {
            Expr::Ident(s) => s.clone(),
            Expr::Literal(s) => s.clone(),
            Expr::Call(CallExpr { callee, args }) => {
                let args = args.iter().map(Expr::render).collect::<Vec<_>>().join(", ");
                format!("{}({})", callee.render(), args)
            }
            Expr::Selector { recv, field } => format!("{}.{}", recv.render(), field),
            Expr::Index { recv, index } => format!("{}[{}]", recv.render(), index.render()),
            Expr::Slice { recv, low, high, max } => {
                let l = low.as_ref().map(|e| e.render()).unwrap_or_default();
                let h = high.as_ref().map(|e| e.render()).unwrap_or_default();
                match max {
                    Some(m) => format!("{}[{}:{}:{}]", recv.render(), l, h, m.render()),
                    None => format!("{}[{}:{}]", recv.render(), l, h),
                }
            }
            Expr::Unary { op, expr } => format!("{}{}", op, expr.render()),
            Expr::Binary { op, lhs, rhs } => format!("{} {} {}", lhs.render(), op, rhs.render()),
            Expr::Paren(e) => format!("({})", e.render()),
            Expr::CompositeLit(s) => s.clone(),
            Expr::FuncLit(s) => s.clone(),
            Expr::TypeAssert { expr, ty } => format!("{}.({})", expr.render(), ty),
            Expr::TypeExpr(s) => s.clone(),
        }
    }
}

impl AssignStmt {
    pub fn render(&self) -> String {
        let op = if self.define { ":=" } else { "=" };
        let lhs = self.lhs.join(", ");
        let rhs = self.rhs.iter().map(Expr::render).collect::<Vec<_>>().join(", ");
        format!("{} {} {}", lhs, op, rhs)
    }
}

impl Stmt {
    pub fn render(&self) -> String {
        match self {
            Stmt::Expr(e) => e.render(),
            Stmt::Assign(a) => a.render(),
            Stmt::Decl(d) => d.raw.clone(),
            Stmt::Discard(e) => format!("_ = {}", e.render()),
            Stmt::Raw(s) => s.clone(),
        }
    }
}

/// Builds a `PRINT(args...)` call statement, the engine's echo mechanism.
pub fn print_stmt(args: Vec<Expr>) -> Stmt {
    Stmt::Expr(Expr::call(Expr::ident(PRINT_NAME), args))
}

/// True iff `stmt` is exactly a `PRINT(...)` expression statement; returns
/// its arguments.
pub fn as_print_args(stmt: &Stmt) -> Option<&[Expr]> {
    match stmt {
        Stmt::Expr(Expr::Call(CallExpr { callee, args })) => match callee.as_ref() {
            Expr::Ident(name) if name == PRINT_NAME => Some(args),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_file() -> File {
        File {
            imports: vec![],
            decls: vec![
                Decl::Func(FuncDecl { name: PRINT_NAME.into(), signature: "(xs ...any)".into(), body: vec![] }),
                Decl::Func(FuncDecl { name: MAIN_NAME.into(), signature: "()".into(), body: vec![] }),
            ],
        }
    }

    #[test]
    fn main_and_print_lookup() {
        let f = empty_file();
        assert_eq!(f.main().name, MAIN_NAME);
        assert!(f.func(PRINT_NAME).is_some());
        assert!(f.func("nonexistent").is_none());
    }

    #[test]
    fn print_stmt_roundtrip() {
        let stmt = print_stmt(vec![Expr::ident("x")]);
        let args = as_print_args(&stmt).expect("is a PRINT call");
        assert_eq!(args, &[Expr::ident("x")]);
    }

    #[test]
    fn non_print_call_is_not_print_args() {
        let stmt = Stmt::Expr(Expr::call(Expr::ident("fmt.Println"), vec![Expr::ident("x")]));
        assert!(as_print_args(&stmt).is_none());
    }
}
