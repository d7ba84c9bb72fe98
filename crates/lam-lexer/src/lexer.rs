// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The lexer implementation using logos.

use lam_ast::token::{Token, TokenKind};
use lam_ast::{LineMap, Span};
use logos::Logos;

/// Raw token type for logos - literal values are parsed in a second pass.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    // === Keywords ===
    #[token("and")]
    And,
    #[token("class")]
    Class,
    #[token("else")]
    Else,
    #[token("false")]
    False,
    #[token("fun")]
    Fun,
    #[token("for")]
    For,
    #[token("if")]
    If,
    #[token("nil")]
    Nil,
    #[token("or")]
    Or,
    #[token("print")]
    Print,
    #[token("return")]
    Return,
    #[token("true")]
    True,
    #[token("var")]
    Var,
    #[token("while")]
    While,

    // === Operators (longer first) ===
    #[token("!=")]
    BangEq,
    #[token("==")]
    EqEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("!")]
    Bang,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token(".")]
    Dot,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,

    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    // === Literals ===
    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    // Strings may span lines and have no escapes.
    #[regex(r#""[^"]*""#)]
    String,

    // === Identifier (keywords take precedence) ===
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}

/// Maximum number of errors to collect before stopping.
const MAX_ERRORS: usize = 20;

/// The lexer for Lam source code.
pub struct Lexer<'a> {
    source: &'a str,
    line_map: LineMap,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, line_map: LineMap::new(source), errors: Vec::new() }
    }

    /// Tokenize the entire source, collecting multiple errors.
    ///
    /// The returned token stream always ends with `Eof`.
    pub fn tokenize(&mut self) -> LexResult {
        let mut tokens = Vec::new();
        let mut raw = RawToken::lexer(self.source);

        while let Some(result) = raw.next() {
            if self.errors.len() >= MAX_ERRORS {
                break;
            }

            let span = Span::new(raw.span().start, raw.span().end);
            let slice = raw.slice();
            let line = self.line_map.line_of(span.start);

            let kind = match result {
                Ok(tok) => match convert_token(tok, slice) {
                    Ok(kind) => kind,
                    Err(kind) => {
                        self.errors.push(LexError::new(kind, span, line));
                        continue;
                    }
                },
                Err(()) => {
                    let ch = self.source[span.start..].chars().next().unwrap_or('?');
                    if ch == '"' {
                        // Nothing after an unterminated quote can be tokenized sensibly.
                        let rest = Span::new(span.start, self.source.len());
                        self.errors.push(LexError::new(LexErrorKind::UnterminatedString, rest, line));
                        break;
                    }
                    self.errors.push(LexError::new(LexErrorKind::UnexpectedChar(ch), span, line));
                    continue;
                }
            };

            tokens.push(Token::new(kind, slice, line, span));
        }

        let end = self.source.len();
        tokens.push(Token::new(TokenKind::Eof, "", self.line_map.line_of(end), Span::new(end, end)));

        LexResult {
            tokens,
            errors: std::mem::take(&mut self.errors),
        }
    }
}

/// Convert a raw logos token to a `TokenKind`, parsing literal values.
fn convert_token(raw: RawToken, slice: &str) -> Result<TokenKind, LexErrorKind> {
    Ok(match raw {
        RawToken::And => TokenKind::And,
        RawToken::Class => TokenKind::Class,
        RawToken::Else => TokenKind::Else,
        RawToken::False => TokenKind::False,
        RawToken::Fun => TokenKind::Fun,
        RawToken::For => TokenKind::For,
        RawToken::If => TokenKind::If,
        RawToken::Nil => TokenKind::Nil,
        RawToken::Or => TokenKind::Or,
        RawToken::Print => TokenKind::Print,
        RawToken::Return => TokenKind::Return,
        RawToken::True => TokenKind::True,
        RawToken::Var => TokenKind::Var,
        RawToken::While => TokenKind::While,

        RawToken::BangEq => TokenKind::BangEq,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Bang => TokenKind::Bang,
        RawToken::Eq => TokenKind::Eq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::Gt => TokenKind::Gt,
        RawToken::Dot => TokenKind::Dot,

        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semi => TokenKind::Semi,

        RawToken::Number => {
            let value = slice.parse::<f64>().map_err(|_| LexErrorKind::InvalidNumber)?;
            TokenKind::Number(value)
        }
        RawToken::String => TokenKind::String(slice[1..slice.len() - 1].to_string()),
        RawToken::Ident => TokenKind::Ident,

        RawToken::LineComment => unreachable!("comments are skipped"),
    })
}

/// Result of lexing: tokens plus any errors found.
#[derive(Debug)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl LexResult {
    /// Returns true if lexing completed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LexErrorKind {
    UnexpectedChar(char),
    UnterminatedString,
    InvalidNumber,
}

/// A lexer error with location and friendly message.
#[derive(Debug, Clone)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
    pub line: u32,
    pub message: String,
    pub hint: Option<String>,
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for LexError {}

impl LexError {
    fn new(kind: LexErrorKind, span: Span, line: u32) -> Self {
        let (message, hint) = match &kind {
            LexErrorKind::UnexpectedChar(ch) => (format!("Unexpected character '{}'", ch), None),
            LexErrorKind::UnterminatedString => {
                ("Unterminated string".to_string(), Some("Add a closing '\"'".to_string()))
            }
            LexErrorKind::InvalidNumber => ("Invalid number".to_string(), None),
        };
        Self { kind, span, line, message, hint }
    }
}
