//! Tokenizer for the Go-subset grammar the session engine needs to recognize.
//!
//! Comments are skipped as whitespace. This is not a full Go scanner: it
//! covers identifiers, keywords, the literal forms, and the operators and
//! punctuation the parser's expression/statement grammar uses.

use nom::branch::alt;
use nom::bytes::complete::{escaped, is_not, tag, take_until, take_while, take_while1};
use nom::character::complete::{char, multispace0, one_of};
use nom::combinator::{map, recognize, value};
use nom::multi::many0;
use nom::sequence::{delimited, pair, preceded};
use nom::IResult;

#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum LexError {
    #[error("invalid token: {0:?}")]
    InvalidToken(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Func,
    Type,
    Var,
    Const,
    Return,
    If,
    Else,
    For,
    Range,
    Switch,
    Case,
    Default,
    Go,
    Defer,
    Struct,
    Interface,
    Map,
    Chan,
    Select,
    Break,
    Continue,
    Fallthrough,
    Goto,
    Package,
    Import,
}

impl Keyword {
    fn from_str(s: &str) -> Option<Keyword> {
        use Keyword::*;
        Some(match s {
            "func" => Func,
            "type" => Type,
            "var" => Var,
            "const" => Const,
            "return" => Return,
            "if" => If,
            "else" => Else,
            "for" => For,
            "range" => Range,
            "switch" => Switch,
            "case" => Case,
            "default" => Default,
            "go" => Go,
            "defer" => Defer,
            "struct" => Struct,
            "interface" => Interface,
            "map" => Map,
            "chan" => Chan,
            "select" => Select,
            "break" => Break,
            "continue" => Continue,
            "fallthrough" => Fallthrough,
            "goto" => Goto,
            "package" => Package,
            "import" => Import,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        use Keyword::*;
        match self {
            Func => "func",
            Type => "type",
            Var => "var",
            Const => "const",
            Return => "return",
            If => "if",
            Else => "else",
            For => "for",
            Range => "range",
            Switch => "switch",
            Case => "case",
            Default => "default",
            Go => "go",
            Defer => "defer",
            Struct => "struct",
            Interface => "interface",
            Map => "map",
            Chan => "chan",
            Select => "select",
            Break => "break",
            Continue => "continue",
            Fallthrough => "fallthrough",
            Goto => "goto",
            Package => "package",
            Import => "import",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Ident(String),
    Keyword(Keyword),
    Int(String),
    Float(String),
    Str(String),
    RawStr(String),
    Rune(String),
    Op(String),
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semi,
    Dot,
    Colon,
}

impl Token {
    pub fn render(&self) -> String {
        match self {
            Token::Ident(s) => s.clone(),
            Token::Keyword(k) => k.as_str().to_string(),
            Token::Int(s) | Token::Float(s) => s.clone(),
            Token::Str(s) => format!("\"{}\"", s),
            Token::RawStr(s) => format!("`{}`", s),
            Token::Rune(s) => format!("'{}'", s),
            Token::Op(s) => s.clone(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),
            Token::LBrace => "{".into(),
            Token::RBrace => "}".into(),
            Token::LBracket => "[".into(),
            Token::RBracket => "]".into(),
            Token::Comma => ",".into(),
            Token::Semi => ";".into(),
            Token::Dot => ".".into(),
            Token::Colon => ":".into(),
        }
    }
}

fn line_comment(input: &str) -> IResult<&str, ()> {
    value((), pair(tag("//"), is_not("\n")))(input)
}

fn block_comment(input: &str) -> IResult<&str, ()> {
    value((), delimited(tag("/*"), take_until("*/"), tag("*/")))(input)
}

fn skip_ws(input: &str) -> IResult<&str, ()> {
    value((), many0(alt((value((), multispace0), line_comment, block_comment))))(input)
}

fn ident_or_keyword(input: &str) -> IResult<&str, Token> {
    let (rest, text) = recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))(input)?;
    Ok((
        rest,
        match Keyword::from_str(text) {
            Some(k) => Token::Keyword(k),
            None => Token::Ident(text.to_string()),
        },
    ))
}

fn number(input: &str) -> IResult<&str, Token> {
    let (rest, int_part) = take_while1(|c: char| c.is_ascii_digit())(input)?;
    if let Ok((rest2, _)) = char::<&str, nom::error::Error<&str>>('.')(rest) {
        let (rest3, frac) = take_while(|c: char| c.is_ascii_digit())(rest2)?;
        let text = format!("{}.{}", int_part, frac);
        return Ok((rest3, Token::Float(text)));
    }
    Ok((rest, Token::Int(int_part.to_string())))
}

fn double_quoted_string(input: &str) -> IResult<&str, Token> {
    map(
        delimited(
            char('"'),
            nom::combinator::opt(escaped(is_not("\\\""), '\\', one_of("\"\\nrt"))),
            char('"'),
        ),
        |s: Option<&str>| Token::Str(s.unwrap_or("").to_string()),
    )(input)
}

fn raw_string(input: &str) -> IResult<&str, Token> {
    map(delimited(char('`'), take_until("`"), char('`')), |s: &str| Token::RawStr(s.to_string()))(input)
}

fn rune_literal(input: &str) -> IResult<&str, Token> {
    map(
        delimited(char('\''), nom::combinator::opt(escaped(is_not("\\'"), '\\', one_of("'\\nrt"))), char('\'')),
        |s: Option<&str>| Token::Rune(s.unwrap_or("").to_string()),
    )(input)
}

const MULTI_OPS: &[&str] = &[
    ":=", "==", "!=", "<=", ">=", "&&", "||", "<<=", ">>=", "&^=", "<<", ">>", "&^", "++", "--",
    "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<-",
];

fn operator(input: &str) -> IResult<&str, Token> {
    for op in MULTI_OPS {
        if let Ok((rest, matched)) = tag::<&str, &str, nom::error::Error<&str>>(*op)(input) {
            return Ok((rest, Token::Op(matched.to_string())));
        }
    }
    map(one_of("+-*/%&|^<>=!~"), |c: char| Token::Op(c.to_string()))(input)
}

fn punct(input: &str) -> IResult<&str, Token> {
    alt((
        value(Token::LParen, char('(')),
        value(Token::RParen, char(')')),
        value(Token::LBrace, char('{')),
        value(Token::RBrace, char('}')),
        value(Token::LBracket, char('[')),
        value(Token::RBracket, char(']')),
        value(Token::Comma, char(',')),
        value(Token::Semi, char(';')),
        value(Token::Colon, char(':')),
        value(Token::Dot, char('.')),
    ))(input)
}

fn one_token(input: &str) -> IResult<&str, Token> {
    alt((ident_or_keyword, number, double_quoted_string, raw_string, rune_literal, punct, operator))(input)
}

/// Tokenizes `input`, skipping whitespace and comments between tokens.
///
/// Returns `LexError::InvalidToken` on the first byte that starts none of
/// the recognized token forms, carrying that character for diagnostics
/// (spec §7: "lexical junk ... is reported verbatim").
pub fn lex(input: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut rest = input;
    loop {
        let (after_ws, _) = skip_ws(rest).unwrap_or((rest, ()));
        rest = after_ws;
        if rest.is_empty() {
            break;
        }
        match one_token(rest) {
            Ok((next, tok)) => {
                tokens.push(tok);
                rest = next;
            }
            Err(_) => {
                let bad = rest.chars().next().unwrap();
                return Err(LexError::InvalidToken(bad));
            }
        }
    }
    Ok(tokens)
}
