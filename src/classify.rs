//! Input Classifier (spec §4.1): decide whether a raw line is a command, an
//! expression, a statement list, a function declaration, or incomplete.

use crate::ast::{Expr, FuncDecl, Stmt};
use crate::lexer::{self, LexError};
use crate::parser;

#[derive(Debug, Clone, PartialEq)]
pub enum Splice {
    Expression(Expr),
    Statements(Vec<Stmt>),
    FuncDecl(FuncDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Command { name: String, arg: String },
    Splice(Splice),
    /// the editor should keep accepting continuation lines
    Continue,
}

#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum ClassifyError {
    #[error("invalid token: {0:?}")]
    InvalidToken(char),
}

impl From<LexError> for ClassifyError {
    fn from(e: LexError) -> Self {
        match e {
            LexError::InvalidToken(c) => ClassifyError::InvalidToken(c),
        }
    }
}

/// Classifies `line` per the ordering in spec §4.1: command prefix first,
/// then expression, then statement list, then function declaration; a
/// lexically invalid line surfaces as an error rather than "continue",
/// while any other parse failure falls through to "continue" so the editor
/// keeps accumulating lines.
pub fn classify(line: &str) -> Result<Classification, ClassifyError> {
    let trimmed = line.trim();
    if trimmed.starts_with(':') {
        let (name, arg) = split_command(trimmed);
        return Ok(Classification::Command { name, arg });
    }

    let tokens = lexer::lex(trimmed)?;
    if tokens.is_empty() {
        return Ok(Classification::Continue);
    }

    if let Ok(expr) = parser::parse_expr_complete(&tokens) {
        return Ok(Classification::Splice(Splice::Expression(expr)));
    }
    if let Ok(stmts) = parser::parse_stmt_list_complete(&tokens) {
        return Ok(Classification::Splice(Splice::Statements(stmts)));
    }
    if let Ok(decl) = parser::parse_func_decl_complete(&tokens) {
        return Ok(Classification::Splice(Splice::FuncDecl(decl)));
    }
    Ok(Classification::Continue)
}

fn split_command(trimmed: &str) -> (String, String) {
    let stripped = trimmed.trim_start_matches(|c: char| c == ':' || c.is_whitespace());
    match stripped.split_once(char::is_whitespace) {
        Some((name, rest)) => (name.to_string(), rest.trim().to_string()),
        None => (stripped.to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_command() {
        let c = classify(":import encoding/json").unwrap();
        assert_eq!(c, Classification::Command { name: "import".into(), arg: "encoding/json".into() });
    }

    #[test]
    fn classifies_bare_expression() {
        let c = classify("x").unwrap();
        assert!(matches!(c, Classification::Splice(Splice::Expression(_))));
    }

    #[test]
    fn classifies_assignment_as_statement() {
        let c = classify("x := 10").unwrap();
        assert!(matches!(c, Classification::Splice(Splice::Statements(_))));
    }

    #[test]
    fn classifies_func_decl() {
        let c = classify("func f() int { return 100 }").unwrap();
        assert!(matches!(c, Classification::Splice(Splice::FuncDecl(_))));
    }

    #[test]
    fn unmatched_brace_is_continue() {
        let c = classify("func h() {").unwrap();
        assert_eq!(c, Classification::Continue);
    }

    #[test]
    fn illegal_token_is_an_error() {
        let err = classify("$ + 3").unwrap_err();
        assert_eq!(err, ClassifyError::InvalidToken('$'));
    }
}
