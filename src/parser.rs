//! Recursive-descent parser driving the three stages of the Input Classifier:
//! a single expression, a statement list inside a synthetic function body,
//! and a single top-level function declaration.
//!
//! Grammar pieces that the engine never needs to inspect structurally (if/for
//! /switch/select/go/defer/return/branch statements, type literals, function
//! literal bodies) are captured as opaque raw token spans rather than fully
//! modeled, matching the AST's `Raw`/`TypeExpr`/`FuncLit` escape hatches.

use crate::ast::*;
use crate::lexer::{Keyword, Token};

#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum ParseError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unexpected token: {0:?}")]
    UnexpectedToken(Token),
    #[error("trailing tokens after parse")]
    TrailingTokens,
    #[error("expected function declaration")]
    NotAFuncDecl,
}

pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

type PResult<T> = Result<T, ParseError>;

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let t = self.tokens.get(self.pos);
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn expect(&mut self, want: &Token) -> PResult<()> {
        match self.advance() {
            Some(t) if t == want => Ok(()),
            Some(t) => Err(ParseError::UnexpectedToken(t.clone())),
            None => Err(ParseError::UnexpectedEof),
        }
    }

    fn expect_ident(&mut self) -> PResult<String> {
        match self.advance() {
            Some(Token::Ident(s)) => Ok(s.clone()),
            Some(t) => Err(ParseError::UnexpectedToken(t.clone())),
            None => Err(ParseError::UnexpectedEof),
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    // ---- expressions, by ascending precedence ----

    pub fn parse_expr(&mut self) -> PResult<Expr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_and()?;
        while matches!(self.peek(), Some(Token::Op(op)) if op == "||") {
            self.advance();
            let rhs = self.parse_and()?;
            lhs = Expr::Binary { op: "||".into(), lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_cmp()?;
        while matches!(self.peek(), Some(Token::Op(op)) if op == "&&") {
            self.advance();
            let rhs = self.parse_cmp()?;
            lhs = Expr::Binary { op: "&&".into(), lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }

    fn parse_cmp(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_add()?;
        const OPS: &[&str] = &["==", "!=", "<=", ">=", "<", ">"];
        while let Some(Token::Op(op)) = self.peek() {
            if OPS.contains(&op.as_str()) {
                let op = op.clone();
                self.advance();
                let rhs = self.parse_add()?;
                lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
            } else {
                break;
            }
        }
        Ok(lhs)
    }

    fn parse_add(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_mul()?;
        const OPS: &[&str] = &["+", "-", "|", "^"];
        while let Some(Token::Op(op)) = self.peek() {
            if OPS.contains(&op.as_str()) {
                let op = op.clone();
                self.advance();
                let rhs = self.parse_mul()?;
                lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
            } else {
                break;
            }
        }
        Ok(lhs)
    }

    fn parse_mul(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_unary()?;
        const OPS: &[&str] = &["*", "/", "%", "<<", ">>", "&", "&^"];
        while let Some(Token::Op(op)) = self.peek() {
            if OPS.contains(&op.as_str()) {
                let op = op.clone();
                self.advance();
                let rhs = self.parse_unary()?;
                lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
            } else {
                break;
            }
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        const OPS: &[&str] = &["+", "-", "!", "^", "*", "&", "<-"];
        if let Some(Token::Op(op)) = self.peek() {
            if OPS.contains(&op.as_str()) {
                let op = op.clone();
                self.advance();
                let expr = self.parse_unary()?;
                return Ok(Expr::Unary { op, expr: Box::new(expr) });
            }
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> PResult<Expr> {
        let mut e = self.parse_primary()?;
        loop {
            match self.peek() {
                Some(Token::Dot) => {
                    self.advance();
                    if matches!(self.peek(), Some(Token::LParen)) {
                        self.advance();
                        let ty = self.consume_raw_until_matching(Token::LParen, Token::RParen)?;
                        e = Expr::TypeAssert { expr: Box::new(e), ty };
                    } else {
                        let field = self.expect_ident()?;
                        e = Expr::Selector { recv: Box::new(e), field };
                    }
                }
                Some(Token::LParen) => {
                    self.advance();
                    let args = self.parse_expr_list(&Token::RParen)?;
                    self.expect(&Token::RParen)?;
                    e = Expr::Call(CallExpr { callee: Box::new(e), args });
                }
                Some(Token::LBracket) => {
                    self.advance();
                    e = self.parse_index_or_slice(e)?;
                }
                Some(Token::LBrace) => {
                    let raw = self.consume_balanced(Token::LBrace, Token::RBrace)?;
                    e = Expr::CompositeLit(format!("{}{}", e.render(), raw));
                }
                _ => break,
            }
        }
        Ok(e)
    }

    fn parse_index_or_slice(&mut self, recv: Expr) -> PResult<Expr> {
        let low = if matches!(self.peek(), Some(Token::Colon)) { None } else { Some(Box::new(self.parse_expr()?)) };
        if matches!(self.peek(), Some(Token::Colon)) {
            self.advance();
            let high = if matches!(self.peek(), Some(Token::Colon) | Some(Token::RBracket)) {
                None
            } else {
                Some(Box::new(self.parse_expr()?))
            };
            let max = if matches!(self.peek(), Some(Token::Colon)) {
                self.advance();
                Some(Box::new(self.parse_expr()?))
            } else {
                None
            };
            self.expect(&Token::RBracket)?;
            Ok(Expr::Slice { recv: Box::new(recv), low, high, max })
        } else {
            let index = low.ok_or(ParseError::UnexpectedEof)?;
            self.expect(&Token::RBracket)?;
            Ok(Expr::Index { recv: Box::new(recv), index })
        }
    }

    fn parse_expr_list(&mut self, terminator: &Token) -> PResult<Vec<Expr>> {
        let mut out = Vec::new();
        if self.peek() == Some(terminator) {
            return Ok(out);
        }
        out.push(self.parse_expr()?);
        while matches!(self.peek(), Some(Token::Comma)) {
            self.advance();
            if self.peek() == Some(terminator) {
                break;
            }
            out.push(self.parse_expr()?);
        }
        Ok(out)
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        match self.advance().cloned() {
            Some(Token::Ident(name)) => Ok(Expr::Ident(name)),
            Some(Token::Int(s)) => Ok(Expr::Literal(s)),
            Some(Token::Float(s)) => Ok(Expr::Literal(s)),
            Some(Token::Str(s)) => Ok(Expr::Literal(format!("\"{}\"", s))),
            Some(Token::RawStr(s)) => Ok(Expr::Literal(format!("`{}`", s))),
            Some(Token::Rune(s)) => Ok(Expr::Literal(format!("'{}'", s))),
            Some(Token::LParen) => {
                let inner = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                Ok(Expr::Paren(Box::new(inner)))
            }
            Some(Token::Keyword(Keyword::Func)) => {
                self.pos -= 1;
                self.parse_func_lit()
            }
            Some(Token::Keyword(Keyword::Map | Keyword::Struct | Keyword::Interface | Keyword::Chan)) => {
                self.pos -= 1;
                self.parse_type_expr_fallback()
            }
            Some(Token::LBracket) => {
                self.pos -= 1;
                self.parse_type_expr_fallback()
            }
            Some(t) => Err(ParseError::UnexpectedToken(t)),
            None => Err(ParseError::UnexpectedEof),
        }
    }

    /// Captures `[N]T{...}`, `[]T{...}`, `map[K]V{...}`, `[]T(x)` and similar
    /// type-expression-led forms as opaque text; always treated as pure by
    /// the quick-fix engine's purity analysis.
    fn parse_type_expr_fallback(&mut self) -> PResult<Expr> {
        let start = self.pos;
        // consume the type head: balanced brackets/parens, plus bare idents/dots,
        // stopping once we reach a top-level '{' (composite lit) or '(' (conversion)
        // that begins the value part, or a delimiter that ends the expression.
        let mut depth = 0i32;
        loop {
            match self.peek() {
                Some(Token::LBracket) => {
                    depth += 1;
                    self.advance();
                }
                Some(Token::RBracket) => {
                    depth -= 1;
                    self.advance();
                }
                Some(Token::LBrace) if depth == 0 => break,
                Some(Token::LParen) if depth == 0 => break,
                Some(Token::Ident(_)) | Some(Token::Dot) | Some(Token::Keyword(_)) => {
                    self.advance();
                }
                _ if depth > 0 => {
                    self.advance();
                }
                _ => break,
            }
        }
        let head = render_tokens(&self.tokens[start..self.pos]);
        match self.peek() {
            Some(Token::LBrace) => {
                let raw = self.consume_balanced(Token::LBrace, Token::RBrace)?;
                Ok(Expr::CompositeLit(format!("{}{}", head, raw)))
            }
            Some(Token::LParen) => {
                self.advance();
                let args = self.parse_expr_list(&Token::RParen)?;
                self.expect(&Token::RParen)?;
                let args_text = args.iter().map(Expr::render).collect::<Vec<_>>().join(", ");
                Ok(Expr::TypeExpr(format!("{}({})", head, args_text)))
            }
            _ => Ok(Expr::TypeExpr(head)),
        }
    }

    fn parse_func_lit(&mut self) -> PResult<Expr> {
        let start = self.pos;
        self.expect(&Token::Keyword(Keyword::Func))?;
        let brace_idx = self.find_top_level_lbrace()?;
        self.pos = brace_idx;
        let body_raw = self.consume_balanced(Token::LBrace, Token::RBrace)?;
        let head = render_tokens(&self.tokens[start..brace_idx]);
        Ok(Expr::FuncLit(format!("{} {}", head, body_raw)))
    }

    /// Scans forward (without consuming) to the index of the first `{` whose
    /// enclosing paren depth (counting only `(`/`)`) is zero — the function
    /// literal's body brace, as opposed to a brace inside its signature
    /// (which cannot occur for parameter lists, but guards against odd
    /// input instead of panicking).
    fn find_top_level_lbrace(&self) -> PResult<usize> {
        let mut depth = 0i32;
        let mut i = self.pos;
        while i < self.tokens.len() {
            match &self.tokens[i] {
                Token::LParen => depth += 1,
                Token::RParen => depth -= 1,
                Token::LBrace if depth <= 0 => return Ok(i),
                _ => {}
            }
            i += 1;
        }
        Err(ParseError::UnexpectedEof)
    }

    fn consume_balanced(&mut self, open: Token, close: Token) -> PResult<String> {
        let start = self.pos;
        self.expect(&open)?;
        let mut depth = 1;
        while depth > 0 {
            match self.advance() {
                Some(t) if *t == open => depth += 1,
                Some(t) if *t == close => depth -= 1,
                Some(_) => {}
                None => return Err(ParseError::UnexpectedEof),
            }
        }
        Ok(render_tokens(&self.tokens[start..self.pos]))
    }

    fn consume_raw_until_matching(&mut self, open: Token, close: Token) -> PResult<String> {
        let start = self.pos;
        let mut depth = 1;
        while depth > 0 {
            match self.advance() {
                Some(t) if *t == open => depth += 1,
                Some(t) if *t == close => depth -= 1,
                Some(_) => {}
                None => return Err(ParseError::UnexpectedEof),
            }
        }
        // exclude the closing token from the captured type text
        Ok(render_tokens(&self.tokens[start..self.pos - 1]))
    }

    // ---- statements ----

    pub fn parse_stmt_list(&mut self) -> PResult<Vec<Stmt>> {
        let mut out = Vec::new();
        self.skip_semis();
        while !self.at_end() {
            out.push(self.parse_stmt()?);
            self.skip_semis();
        }
        if out.is_empty() {
            return Err(ParseError::UnexpectedEof);
        }
        Ok(out)
    }

    fn skip_semis(&mut self) {
        while matches!(self.peek(), Some(Token::Semi)) {
            self.advance();
        }
    }

    fn parse_stmt(&mut self) -> PResult<Stmt> {
        match self.peek() {
            Some(Token::Keyword(Keyword::Var)) | Some(Token::Keyword(Keyword::Const)) | Some(Token::Keyword(Keyword::Type)) => {
                self.parse_gen_decl_stmt()
            }
            Some(Token::Keyword(Keyword::If | Keyword::For | Keyword::Switch | Keyword::Select)) => self.parse_block_headed_stmt(),
            Some(Token::Keyword(
                Keyword::Return | Keyword::Go | Keyword::Defer | Keyword::Break | Keyword::Continue | Keyword::Fallthrough | Keyword::Goto,
            )) => self.parse_simple_keyword_stmt(),
            _ => self.parse_expr_or_assign_stmt(),
        }
    }

    fn parse_gen_decl_stmt(&mut self) -> PResult<Stmt> {
        let start = self.pos;
        let keyword = match self.advance() {
            Some(Token::Keyword(Keyword::Var)) => GenKeyword::Var,
            Some(Token::Keyword(Keyword::Const)) => GenKeyword::Const,
            Some(Token::Keyword(Keyword::Type)) => GenKeyword::Type,
            _ => unreachable!(),
        };
        if matches!(self.peek(), Some(Token::LParen)) {
            // grouped declaration block: `var ( ... )` — kept fully opaque.
            let raw_group = self.consume_balanced(Token::LParen, Token::RParen)?;
            let raw = format!("{} {}", keyword.as_str(), raw_group);
            return Ok(Stmt::Decl(GenDecl { keyword, names: vec![], type_text: None, values: vec![], raw }));
        }
        if keyword == GenKeyword::Type {
            let name = self.expect_ident()?;
            let type_text = self.consume_rest_of_stmt();
            let raw = format!("type {} {}", name, type_text);
            return Ok(Stmt::Decl(GenDecl { keyword, names: vec![name], type_text: Some(type_text), values: vec![], raw }));
        }
        let mut names = vec![self.expect_ident()?];
        while matches!(self.peek(), Some(Token::Comma)) {
            self.advance();
            names.push(self.expect_ident()?);
        }
        let mut type_text = None;
        if !matches!(self.peek(), Some(Token::Op(op)) if op == "=") && !matches!(self.peek(), Some(Token::Semi) | None) {
            let ty_start = self.pos;
            while !matches!(self.peek(), Some(Token::Op(op)) if op == "=") && !matches!(self.peek(), Some(Token::Semi) | None) {
                self.advance();
            }
            type_text = Some(render_tokens(&self.tokens[ty_start..self.pos]));
        }
        let mut values = Vec::new();
        if matches!(self.peek(), Some(Token::Op(op)) if op == "=") {
            self.advance();
            values.push(self.parse_expr()?);
            while matches!(self.peek(), Some(Token::Comma)) {
                self.advance();
                values.push(self.parse_expr()?);
            }
        }
        let raw = render_tokens(&self.tokens[start..self.pos]);
        Ok(Stmt::Decl(GenDecl { keyword, names, type_text, values, raw }))
    }

    /// Consumes tokens up to (but not including) the next top-level `;` or
    /// end of input, returning their rendered text. Used for `type` RHS and
    /// other spans the engine never decomposes further.
    fn consume_rest_of_stmt(&mut self) -> String {
        let start = self.pos;
        let mut depth = 0i32;
        while let Some(t) = self.peek() {
            match t {
                Token::LBrace | Token::LParen | Token::LBracket => depth += 1,
                Token::RBrace | Token::RParen | Token::RBracket => depth -= 1,
                Token::Semi if depth <= 0 => break,
                _ => {}
            }
            self.advance();
        }
        render_tokens(&self.tokens[start..self.pos])
    }

    fn parse_block_headed_stmt(&mut self) -> PResult<Stmt> {
        let start = self.pos;
        self.advance(); // the leading keyword
        let brace_idx = self.find_top_level_lbrace()?;
        self.pos = brace_idx;
        self.consume_balanced(Token::LBrace, Token::RBrace)?;
        // allow a trailing `else ...` chain for `if`
        while matches!(self.peek(), Some(Token::Ident(s)) if s == "else") {
            self.advance();
            if matches!(self.peek(), Some(Token::Keyword(Keyword::If))) {
                self.advance();
                // condition tokens up to the next brace
                while !matches!(self.peek(), Some(Token::LBrace)) {
                    if self.advance().is_none() {
                        return Err(ParseError::UnexpectedEof);
                    }
                }
            }
            self.consume_balanced(Token::LBrace, Token::RBrace)?;
        }
        Ok(Stmt::Raw(render_tokens(&self.tokens[start..self.pos])))
    }

    fn parse_simple_keyword_stmt(&mut self) -> PResult<Stmt> {
        let start = self.pos;
        self.advance();
        let _ = self.consume_rest_of_stmt();
        Ok(Stmt::Raw(render_tokens(&self.tokens[start..self.pos])))
    }

    fn parse_expr_or_assign_stmt(&mut self) -> PResult<Stmt> {
        let first = self.parse_expr()?;
        if matches!(self.peek(), Some(Token::Comma)) || matches!(self.peek(), Some(Token::Op(op)) if op == ":=" || op == "=") {
            let mut lhs = vec![expr_as_assign_target(&first)?];
            while matches!(self.peek(), Some(Token::Comma)) {
                self.advance();
                let e = self.parse_expr()?;
                lhs.push(expr_as_assign_target(&e)?);
            }
            let define = match self.advance() {
                Some(Token::Op(op)) if op == ":=" => true,
                Some(Token::Op(op)) if op == "=" => false,
                Some(t) => return Err(ParseError::UnexpectedToken(t.clone())),
                None => return Err(ParseError::UnexpectedEof),
            };
            let mut rhs = vec![self.parse_expr()?];
            while matches!(self.peek(), Some(Token::Comma)) {
                self.advance();
                rhs.push(self.parse_expr()?);
            }
            return Ok(Stmt::Assign(AssignStmt { lhs, define, rhs }));
        }
        Ok(Stmt::Expr(first))
    }

    // ---- top-level function declaration ----

    pub fn parse_func_decl(&mut self) -> PResult<FuncDecl> {
        self.expect(&Token::Keyword(Keyword::Func))?;
        let name = self.expect_ident()?;
        let sig_start = self.pos;
        let brace_idx = self.find_top_level_lbrace().map_err(|_| ParseError::NotAFuncDecl)?;
        let signature = render_tokens(&self.tokens[sig_start..brace_idx]);
        self.pos = brace_idx;
        self.expect(&Token::LBrace)?;
        let body_start = self.pos;
        let mut depth = 1;
        let mut i = self.pos;
        while depth > 0 {
            match self.tokens.get(i) {
                Some(Token::LBrace) => depth += 1,
                Some(Token::RBrace) => depth -= 1,
                Some(_) => {}
                None => return Err(ParseError::UnexpectedEof),
            }
            i += 1;
        }
        let body_end = i - 1; // index of matching RBrace
        let body_tokens = &self.tokens[body_start..body_end];
        let body = if body_tokens.is_empty() {
            vec![]
        } else {
            let mut inner = Parser::new(body_tokens);
            inner.parse_stmt_list()?
        };
        self.pos = i;
        Ok(FuncDecl { name, signature, body })
    }
}

fn expr_as_assign_target(e: &Expr) -> PResult<String> {
    match e {
        Expr::Ident(s) => Ok(s.clone()),
        _ => Ok(e.render()),
    }
}

/// Joins tokens back into readable source text using Go's conventional
/// spacing; not meant to byte-for-byte match any particular formatter, only
/// to produce valid, reasonable text for opaque raw spans.
pub fn render_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut prev: Option<&Token> = None;
    for tok in tokens {
        if let Some(p) = prev {
            if needs_space(p, tok) {
                out.push(' ');
            }
        }
        out.push_str(&tok.render());
        prev = Some(tok);
    }
    out
}

fn needs_space(prev: &Token, next: &Token) -> bool {
    let no_space_after = matches!(prev, Token::LParen | Token::LBracket | Token::Dot);
    let no_space_before =
        matches!(next, Token::RParen | Token::RBracket | Token::RBrace | Token::Comma | Token::Semi | Token::Dot | Token::LParen | Token::LBracket);
    if no_space_after || no_space_before {
        // still separate two idents/keywords glued together, e.g. `) {`
        if matches!(prev, Token::RParen) && matches!(next, Token::LBrace) {
            return true;
        }
        false
    } else {
        true
    }
}

/// Parses `input` fully as a single expression; fails if any tokens remain.
pub fn parse_expr_complete(tokens: &[Token]) -> PResult<Expr> {
    let mut p = Parser::new(tokens);
    let e = p.parse_expr()?;
    if !p.at_end() {
        return Err(ParseError::TrailingTokens);
    }
    Ok(e)
}

pub fn parse_stmt_list_complete(tokens: &[Token]) -> PResult<Vec<Stmt>> {
    let mut p = Parser::new(tokens);
    let stmts = p.parse_stmt_list()?;
    if !p.at_end() {
        return Err(ParseError::TrailingTokens);
    }
    Ok(stmts)
}

pub fn parse_func_decl_complete(tokens: &[Token]) -> PResult<FuncDecl> {
    let mut p = Parser::new(tokens);
    let decl = p.parse_func_decl()?;
    if !p.at_end() {
        return Err(ParseError::TrailingTokens);
    }
    Ok(decl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    fn expr(src: &str) -> Expr {
        parse_expr_complete(&lex(src).unwrap()).unwrap()
    }

    #[test]
    fn parses_ident() {
        assert_eq!(expr("x"), Expr::Ident("x".into()));
    }

    #[test]
    fn parses_binary_precedence() {
        // a + b * c should bind as a + (b * c)
        let e = expr("a + b * c");
        match e {
            Expr::Binary { op, lhs, rhs } => {
                assert_eq!(op, "+");
                assert_eq!(*lhs, Expr::Ident("a".into()));
                assert!(matches!(*rhs, Expr::Binary { .. }));
            }
            _ => panic!("expected binary"),
        }
    }

    #[test]
    fn parses_call_and_selector() {
        let e = expr("json.Marshal(nil)");
        match e {
            Expr::Call(CallExpr { callee, args }) => {
                assert_eq!(*callee, Expr::Selector { recv: Box::new(Expr::Ident("json".into())), field: "Marshal".into() });
                assert_eq!(args, vec![Expr::Ident("nil".into())]);
            }
            _ => panic!("expected call"),
        }
    }

    #[test]
    fn parses_len_of_call() {
        let e = expr("f() + len(g())");
        assert!(matches!(e, Expr::Binary { .. }));
    }

    #[test]
    fn parses_composite_literal() {
        let e = expr("Point{1, 2}");
        assert_eq!(e, Expr::CompositeLit("Point{1, 2}".into()));
    }

    #[test]
    fn rejects_statement_as_expression() {
        let toks = lex("x := 10").unwrap();
        assert!(parse_expr_complete(&toks).is_err());
    }

    #[test]
    fn parses_short_assignment_statement() {
        let toks = lex("x := 10").unwrap();
        let stmts = parse_stmt_list_complete(&toks).unwrap();
        assert_eq!(stmts, vec![Stmt::Assign(AssignStmt { lhs: vec!["x".into()], define: true, rhs: vec![Expr::Literal("10".into())] })]);
    }

    #[test]
    fn parses_multi_value_assignment() {
        let toks = lex(r#"b, err := json.Marshal(nil)"#).unwrap();
        let stmts = parse_stmt_list_complete(&toks).unwrap();
        match &stmts[0] {
            Stmt::Assign(a) => {
                assert_eq!(a.lhs, vec!["b".to_string(), "err".to_string()]);
                assert!(a.define);
            }
            _ => panic!("expected assignment"),
        }
    }

    #[test]
    fn parses_func_decl() {
        let toks = lex("func f() int { return 100 }").unwrap();
        let decl = parse_func_decl_complete(&toks).unwrap();
        assert_eq!(decl.name, "f");
        assert_eq!(decl.signature, "() int");
        assert_eq!(decl.body, vec![Stmt::Raw("return 100".into())]);
    }

    #[test]
    fn parses_if_statement_as_raw() {
        let toks = lex(r#"if x > 0 { println("ok") }"#).unwrap();
        let stmts = parse_stmt_list_complete(&toks).unwrap();
        assert_eq!(stmts.len(), 1);
        assert!(matches!(stmts[0], Stmt::Raw(_)));
    }

    #[test]
    fn parses_type_decl_statement() {
        let toks = lex("type Point struct { X, Y int }").unwrap();
        let stmts = parse_stmt_list_complete(&toks).unwrap();
        match &stmts[0] {
            Stmt::Decl(d) => assert_eq!(d.keyword, GenKeyword::Type),
            _ => panic!("expected decl"),
        }
    }
}
