// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The parser implementation using Pratt parsing for expressions.

use lam_ast::decl::{ClassDecl, FunDecl};
use lam_ast::expr::{BinOp, Expr, ExprKind, Literal, LogicalOp, UnaryOp};
use lam_ast::stmt::{Stmt, StmtKind};
use lam_ast::token::{Token, TokenKind};
use lam_ast::{NodeId, Span};

/// Maximum number of errors to collect before stopping.
const MAX_ERRORS: usize = 20;

/// Maximum syntactic nesting before the parser gives up on a construct.
const MAX_NESTING: usize = 128;

/// Maximum number of call arguments or function parameters.
const MAX_ARGS: usize = 255;

/// Binding power of prefix operators.
const PREFIX_BP: u8 = 13;

/// Binding power of calls and property access.
const POSTFIX_BP: u8 = 15;

/// The parser for Lam source code.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Collected errors during parsing
    errors: Vec<ParseError>,
    /// Counter for generating unique NodeIds
    next_node_id: u32,
    /// Current syntactic nesting
    depth: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)) {
            let (end, line) = tokens.last().map(|t| (t.span.end, t.line)).unwrap_or((0, 1));
            tokens.push(Token::new(TokenKind::Eof, "", line, Span::new(end, end)));
        }
        Self { tokens, pos: 0, errors: Vec::new(), next_node_id: 0, depth: 0 }
    }

    fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    /// Record error, return if should continue.
    fn record_error(&mut self, error: ParseError) -> bool {
        self.errors.push(error);
        self.errors.len() < MAX_ERRORS
    }

    /// Skip to the next statement after an error at top level.
    fn synchronize(&mut self) {
        self.advance();
        while !self.at_end() {
            if matches!(self.previous().kind, TokenKind::Semi) {
                return;
            }
            if self.current_kind().starts_statement() {
                return;
            }
            self.advance();
        }
    }

    /// Synchronize within a block - never consumes the closing brace.
    fn synchronize_in_block(&mut self) {
        if self.check(&TokenKind::RBrace) {
            return;
        }
        self.advance();
        while !self.at_end() {
            if matches!(self.previous().kind, TokenKind::Semi) {
                return;
            }
            if self.check(&TokenKind::RBrace) || self.current_kind().starts_statement() {
                return;
            }
            self.advance();
        }
    }

    /// Run `f` one nesting level deeper, failing once the limit is hit.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, ParseError>) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::too_deep(self.current()));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    // =========================================================================
    // Token Navigation
    // =========================================================================

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1)]
    }

    fn at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn advance(&mut self) -> &Token {
        if !self.at_end() {
            self.pos += 1;
        }
        self.previous()
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<&Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::expected(kind.display_name(), self.current()))
        }
    }

    fn expect_ident(&mut self) -> Result<Token, ParseError> {
        if self.check(&TokenKind::Ident) {
            Ok(self.advance().clone())
        } else {
            Err(ParseError::expected("a name", self.current()))
        }
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.previous().span.end)
    }

    // =========================================================================
    // Top-Level Parsing
    // =========================================================================

    pub fn parse(&mut self) -> ParseResult {
        let mut stmts = Vec::new();

        while !self.at_end() {
            match self.parse_declaration() {
                Ok(stmt) => stmts.push(stmt),
                Err(e) => {
                    if !self.record_error(e) {
                        break;
                    }
                    self.synchronize();
                }
            }
        }

        ParseResult {
            stmts,
            errors: std::mem::take(&mut self.errors),
        }
    }

    fn parse_declaration(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current().span.start;
        match self.current_kind() {
            TokenKind::Var => {
                self.advance();
                let kind = self.parse_var_decl()?;
                Ok(Stmt::new(self.next_id(), kind, self.span_from(start)))
            }
            TokenKind::Fun => {
                self.advance();
                let decl = self.parse_function()?;
                Ok(Stmt::new(self.next_id(), StmtKind::Function(decl), self.span_from(start)))
            }
            TokenKind::Class => {
                self.advance();
                let decl = self.parse_class()?;
                Ok(Stmt::new(self.next_id(), StmtKind::Class(decl), self.span_from(start)))
            }
            _ => self.parse_stmt(),
        }
    }

    fn parse_var_decl(&mut self) -> Result<StmtKind, ParseError> {
        let name = self.expect_ident()?;
        let init = if self.match_token(&TokenKind::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(&TokenKind::Semi)?;
        Ok(StmtKind::Var { name, init })
    }

    /// Parse `name(params) { body }`; the `fun` keyword is already consumed.
    fn parse_function(&mut self) -> Result<FunDecl, ParseError> {
        let name = self.expect_ident()?;
        self.expect(&TokenKind::LParen)?;

        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                params.push(self.expect_ident()?);
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen)?;

        let body = self.nested(|p| p.parse_block_body())?;
        let decl = FunDecl { name, params, body };
        if decl.arity() > MAX_ARGS {
            let error = ParseError::too_many("parameters", &decl.name);
            self.record_error(error);
        }
        Ok(decl)
    }

    fn parse_class(&mut self) -> Result<ClassDecl, ParseError> {
        let name = self.expect_ident()?;
        self.expect(&TokenKind::LBrace)?;

        let mut methods = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            methods.push(self.parse_function()?);
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(ClassDecl { name, methods })
    }

    // =========================================================================
    // Statement Parsing
    // =========================================================================

    /// Parse a block body (statements inside braces), with error recovery.
    fn parse_block_body(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect(&TokenKind::LBrace)?;

        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            match self.parse_declaration() {
                Ok(stmt) => stmts.push(stmt),
                Err(e) => {
                    // Record error but stay within the block
                    if !self.record_error(e) {
                        break;
                    }
                    self.synchronize_in_block();
                }
            }
        }

        self.expect(&TokenKind::RBrace)?;
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        self.nested(|p| p.parse_stmt_inner())
    }

    fn parse_stmt_inner(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current().span.start;

        let kind = match self.current_kind() {
            TokenKind::LBrace => StmtKind::Block(self.parse_block_body()?),
            TokenKind::Print => {
                self.advance();
                let value = self.parse_expr()?;
                self.expect(&TokenKind::Semi)?;
                StmtKind::Print(value)
            }
            TokenKind::Return => {
                let keyword = self.advance().clone();
                let value = if self.check(&TokenKind::Semi) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect(&TokenKind::Semi)?;
                StmtKind::Return { keyword, value }
            }
            TokenKind::If => {
                self.advance();
                self.expect(&TokenKind::LParen)?;
                let cond = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                let then_branch = Box::new(self.parse_stmt()?);
                let else_branch = if self.match_token(&TokenKind::Else) {
                    Some(Box::new(self.parse_stmt()?))
                } else {
                    None
                };
                StmtKind::If { cond, then_branch, else_branch }
            }
            TokenKind::While => {
                self.advance();
                self.expect(&TokenKind::LParen)?;
                let cond = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                let body = Box::new(self.parse_stmt()?);
                StmtKind::While { cond, body }
            }
            TokenKind::For => return self.parse_for_stmt(),
            _ => {
                let expr = self.parse_expr()?;
                self.expect(&TokenKind::Semi)?;
                StmtKind::Expr(expr)
            }
        };

        Ok(Stmt::new(self.next_id(), kind, self.span_from(start)))
    }

    /// `for (init; cond; incr) body` lowers to
    /// `{ init; while (cond) { body; incr; } }`.
    fn parse_for_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current().span.start;
        self.advance();
        self.expect(&TokenKind::LParen)?;

        let init = if self.match_token(&TokenKind::Semi) {
            None
        } else if self.check(&TokenKind::Var) {
            let var_start = self.current().span.start;
            self.advance();
            let kind = self.parse_var_decl()?;
            Some(Stmt::new(self.next_id(), kind, self.span_from(var_start)))
        } else {
            let expr_start = self.current().span.start;
            let expr = self.parse_expr()?;
            self.expect(&TokenKind::Semi)?;
            Some(Stmt::new(self.next_id(), StmtKind::Expr(expr), self.span_from(expr_start)))
        };

        let cond = if self.check(&TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(&TokenKind::Semi)?;

        let incr = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(&TokenKind::RParen)?;

        let mut body = self.parse_stmt()?;
        let span = self.span_from(start);

        if let Some(incr) = incr {
            let incr_span = incr.span;
            let incr_stmt = Stmt::new(self.next_id(), StmtKind::Expr(incr), incr_span);
            body = Stmt::new(self.next_id(), StmtKind::Block(vec![body, incr_stmt]), span);
        }

        let cond = match cond {
            Some(cond) => cond,
            None => Expr::new(self.next_id(), ExprKind::Literal(Literal::Bool(true)), span),
        };
        let mut lowered = Stmt::new(self.next_id(), StmtKind::While { cond, body: Box::new(body) }, span);

        if let Some(init) = init {
            lowered = Stmt::new(self.next_id(), StmtKind::Block(vec![init, lowered]), span);
        }
        Ok(lowered)
    }

    // =========================================================================
    // Expression Parsing
    // =========================================================================

    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_assignment()
    }

    /// Assignment is right-associative and only valid on names and properties.
    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        let target = self.parse_expr_bp(0)?;

        if !self.check(&TokenKind::Eq) {
            return Ok(target);
        }
        let equals = self.advance().clone();
        let value = Box::new(self.nested(|p| p.parse_assignment())?);
        let span = target.span.to(value.span);

        match target.kind {
            ExprKind::Variable(name) => Ok(Expr::new(self.next_id(), ExprKind::Assign { name, value }, span)),
            ExprKind::Get { object, name } => {
                Ok(Expr::new(self.next_id(), ExprKind::Set { object, name, value }, span))
            }
            kind => {
                // Not fatal: the statement still parses.
                self.record_error(ParseError::invalid_assignment(&equals));
                Ok(Expr::new(target.id, kind, target.span))
            }
        }
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        self.nested(|p| p.parse_expr_bp_inner(min_bp))
    }

    fn parse_expr_bp_inner(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_prefix()?;

        loop {
            if self.postfix_bp().is_some_and(|bp| bp >= min_bp) {
                lhs = self.parse_postfix(lhs)?;
                continue;
            }

            if let Some((l_bp, r_bp)) = self.infix_bp() {
                if l_bp < min_bp {
                    break;
                }

                let op = self.advance().kind.clone();
                let rhs = self.parse_expr_bp(r_bp)?;
                let span = lhs.span.to(rhs.span);
                let kind = match op {
                    TokenKind::And => ExprKind::Logical { op: LogicalOp::And, left: Box::new(lhs), right: Box::new(rhs) },
                    TokenKind::Or => ExprKind::Logical { op: LogicalOp::Or, left: Box::new(lhs), right: Box::new(rhs) },
                    other => ExprKind::Binary { op: binop(&other), left: Box::new(lhs), right: Box::new(rhs) },
                };
                lhs = Expr::new(self.next_id(), kind, span);
                continue;
            }

            break;
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        let start = self.current().span.start;

        let kind = match self.current_kind().clone() {
            TokenKind::Number(n) => {
                self.advance();
                ExprKind::Literal(Literal::Number(n))
            }
            TokenKind::String(s) => {
                self.advance();
                ExprKind::Literal(Literal::String(s))
            }
            TokenKind::True => {
                self.advance();
                ExprKind::Literal(Literal::Bool(true))
            }
            TokenKind::False => {
                self.advance();
                ExprKind::Literal(Literal::Bool(false))
            }
            TokenKind::Nil => {
                self.advance();
                ExprKind::Literal(Literal::Nil)
            }
            TokenKind::Ident => ExprKind::Variable(self.advance().clone()),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                ExprKind::Grouping(Box::new(inner))
            }
            TokenKind::Minus | TokenKind::Bang => {
                let op = if self.advance().kind == TokenKind::Minus { UnaryOp::Neg } else { UnaryOp::Not };
                let operand = self.parse_expr_bp(PREFIX_BP)?;
                ExprKind::Unary { op, operand: Box::new(operand) }
            }
            _ => return Err(ParseError::expected("expression", self.current())),
        };

        Ok(Expr::new(self.next_id(), kind, self.span_from(start)))
    }

    fn parse_postfix(&mut self, lhs: Expr) -> Result<Expr, ParseError> {
        let start = lhs.span.start;

        let kind = if self.match_token(&TokenKind::LParen) {
            let args = self.parse_args()?;
            self.expect(&TokenKind::RParen)?;
            ExprKind::Call { callee: Box::new(lhs), args }
        } else {
            self.expect(&TokenKind::Dot)?;
            let name = self.expect_ident()?;
            ExprKind::Get { object: Box::new(lhs), name }
        };

        Ok(Expr::new(self.next_id(), kind, self.span_from(start)))
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if self.check(&TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            if args.len() == MAX_ARGS {
                let error = ParseError::too_many("arguments", self.current());
                self.record_error(error);
            }
            args.push(self.parse_expr()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        Ok(args)
    }

    fn postfix_bp(&self) -> Option<u8> {
        match self.current_kind() {
            TokenKind::LParen | TokenKind::Dot => Some(POSTFIX_BP),
            _ => None,
        }
    }

    fn infix_bp(&self) -> Option<(u8, u8)> {
        match self.current_kind() {
            TokenKind::Or => Some((1, 2)),
            TokenKind::And => Some((3, 4)),
            TokenKind::EqEq | TokenKind::BangEq => Some((5, 6)),
            TokenKind::Lt | TokenKind::Gt | TokenKind::LtEq | TokenKind::GtEq => Some((7, 8)),
            TokenKind::Plus | TokenKind::Minus => Some((9, 10)),
            TokenKind::Star | TokenKind::Slash => Some((11, 12)),
            _ => None,
        }
    }
}

/// Binary operator for a token already accepted by `infix_bp`.
fn binop(kind: &TokenKind) -> BinOp {
    match kind {
        TokenKind::Plus => BinOp::Add,
        TokenKind::Minus => BinOp::Sub,
        TokenKind::Star => BinOp::Mul,
        TokenKind::Slash => BinOp::Div,
        TokenKind::EqEq => BinOp::Eq,
        TokenKind::BangEq => BinOp::Ne,
        TokenKind::Lt => BinOp::Lt,
        TokenKind::LtEq => BinOp::Le,
        TokenKind::Gt => BinOp::Gt,
        _ => BinOp::Ge,
    }
}

/// Result of parsing: statements plus any errors found.
#[derive(Debug)]
pub struct ParseResult {
    pub stmts: Vec<Stmt>,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    /// Returns true if parsing completed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A parser error with location and friendly message.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub span: Span,
    pub line: u32,
    pub kind: ParseErrorKind,
    pub message: String,
    pub hint: Option<String>,
}

/// Coarse classification, used for error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    Expected,
    InvalidAssignment,
    Limit,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    fn expected(expected: &str, found: &Token) -> Self {
        let message = format_expected_message(expected, &found.kind);
        let hint = crate::hints::for_expected(expected, &found.kind).map(String::from);
        Self { span: found.span, line: found.line, kind: ParseErrorKind::Expected, message, hint }
    }

    fn invalid_assignment(equals: &Token) -> Self {
        Self {
            span: equals.span,
            line: equals.line,
            kind: ParseErrorKind::InvalidAssignment,
            message: "Invalid assignment target".to_string(),
            hint: Some("only variables and properties can be assigned to".to_string()),
        }
    }

    fn too_many(what: &str, at: &Token) -> Self {
        Self {
            span: at.span,
            line: at.line,
            kind: ParseErrorKind::Limit,
            message: format!("Can't have more than {} {}", MAX_ARGS, what),
            hint: None,
        }
    }

    fn too_deep(at: &Token) -> Self {
        Self {
            span: at.span,
            line: at.line,
            kind: ParseErrorKind::Limit,
            message: format!("Nesting is deeper than {} levels", MAX_NESTING),
            hint: Some("split the code into smaller functions".to_string()),
        }
    }
}

/// Format a user-friendly "expected X, found Y" message.
fn format_expected_message(expected: &str, found: &TokenKind) -> String {
    match expected {
        "';'" => format!("Expected ';' after statement, found {}", found.display_name()),
        "'{'" => format!("Expected '{{' to start block, found {}", found.display_name()),
        "'}'" => format!("Expected '}}' to close block, found {}", found.display_name()),
        "')'" => {
            if matches!(found, TokenKind::Eof) {
                "Unclosed '(' - missing ')'".to_string()
            } else {
                format!("Expected ')', found {}", found.display_name())
            }
        }
        "a name" => format!("Expected name, found {}", found.display_name()),
        "expression" => format!("Expected expression, found {}", found.display_name()),
        _ => format!("Expected {}, found {}", expected, found.display_name()),
    }
}
