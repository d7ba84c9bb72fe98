// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Callable and class declarations.

use crate::stmt::Stmt;
use crate::token::Token;

/// A function body shared by `fun` declarations and class methods.
#[derive(Debug, Clone)]
pub struct FunDecl {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Vec<Stmt>,
}

/// A class declaration.
#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: Token,
    pub methods: Vec<FunDecl>,
}

impl FunDecl {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}
