// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Statement AST nodes.

use crate::decl::{ClassDecl, FunDecl};
use crate::expr::Expr;
use crate::token::Token;
use crate::{NodeId, Span};

/// A statement in the AST.
#[derive(Debug, Clone)]
pub struct Stmt {
    pub id: NodeId,
    pub kind: StmtKind,
    pub span: Span,
}

/// The kind of statement.
#[derive(Debug, Clone)]
pub enum StmtKind {
    /// `{ ... }`, introduces a lexical scope
    Block(Vec<Stmt>),
    /// `var name = init;`
    Var {
        name: Token,
        init: Option<Expr>,
    },
    /// `fun name(params) { body }`
    Function(FunDecl),
    /// Expression statement
    Expr(Expr),
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    Print(Expr),
    Return {
        keyword: Token,
        value: Option<Expr>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    /// `class Name { methods }`
    Class(ClassDecl),
}

impl Stmt {
    pub fn new(id: NodeId, kind: StmtKind, span: Span) -> Self {
        Self { id, kind, span }
    }
}
