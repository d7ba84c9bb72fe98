// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Resolution error types.

use lam_ast::token::Token;
use lam_ast::Span;
use thiserror::Error;

/// A scope-discipline diagnostic. Reporting one never stops the walk.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct ResolveError {
    pub kind: ResolveErrorKind,
    /// 1-based line the diagnostic is attributed to.
    pub line: u32,
    pub span: Span,
}

impl ResolveError {
    pub fn duplicate(name: &Token, previous: Span) -> Self {
        Self {
            kind: ResolveErrorKind::DuplicateDeclaration { name: name.lexeme.clone(), previous },
            line: name.line,
            span: name.span,
        }
    }

    /// `outer` is the declaration the initializer was probably meant to read.
    pub fn self_reference(name: &Token, outer: Option<Span>) -> Self {
        Self {
            kind: ResolveErrorKind::SelfReferenceInInitializer { name: name.lexeme.clone(), outer },
            line: name.line,
            span: name.span,
        }
    }

    pub fn unused(name: String, line: u32, span: Span) -> Self {
        Self {
            kind: ResolveErrorKind::UnusedVariable { name },
            line,
            span,
        }
    }

    pub fn invalid_return(keyword: &Token) -> Self {
        Self {
            kind: ResolveErrorKind::InvalidReturnContext,
            line: keyword.line,
            span: keyword.span,
        }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// Unused locals are advisory; everything else is an error.
    pub fn is_warning(&self) -> bool {
        matches!(self.kind, ResolveErrorKind::UnusedVariable { .. })
    }
}

/// The kind of resolution error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveErrorKind {
    #[error("variable `{name}` is already declared in this scope")]
    DuplicateDeclaration { name: String, previous: Span },

    #[error("cannot read local variable `{name}` in its own initializer")]
    SelfReferenceInInitializer { name: String, outer: Option<Span> },

    #[error("local variable `{name}` is declared but never used")]
    UnusedVariable { name: String },

    #[error("cannot return from top-level code")]
    InvalidReturnContext,
}

/// The walk went deeper than the configured limit and was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("nesting exceeds the resolver limit of {limit} levels")]
pub struct NestingTooDeep {
    /// Line of the last token visited before giving up.
    pub line: u32,
    pub span: Span,
    pub limit: usize,
}
