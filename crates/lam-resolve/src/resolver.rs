// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The scope resolver implementation.

use lam_ast::decl::FunDecl;
use lam_ast::expr::{Expr, ExprKind};
use lam_ast::stmt::{Stmt, StmtKind};
use lam_ast::token::Token;
use lam_ast::{NodeId, Span};

use crate::context::{FunctionContext, FunctionContextTracker};
use crate::error::{NestingTooDeep, ResolveError};
use crate::scope::ScopeStack;
use crate::sink::{DiagnosticSink, ResolutionSink};

/// Outcome of walking one node. Only the nesting limit aborts a walk.
type Walk = Result<(), NestingTooDeep>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Deepest statement/expression nesting the walk will follow.
    pub max_depth: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { max_depth: 512 }
    }
}

pub struct Resolver<'a> {
    scopes: ScopeStack,
    functions: FunctionContextTracker,
    locals: &'a mut dyn ResolutionSink,
    diagnostics: &'a mut dyn DiagnosticSink,
    config: ResolverConfig,
    depth: usize,
    /// Line of the most recent token seen, for the abort diagnostic.
    line: u32,
}

impl<'a> Resolver<'a> {
    pub fn new(locals: &'a mut dyn ResolutionSink, diagnostics: &'a mut dyn DiagnosticSink) -> Self {
        Self::with_config(locals, diagnostics, ResolverConfig::default())
    }

    pub fn with_config(
        locals: &'a mut dyn ResolutionSink,
        diagnostics: &'a mut dyn DiagnosticSink,
        config: ResolverConfig,
    ) -> Self {
        Self {
            scopes: ScopeStack::new(),
            functions: FunctionContextTracker::new(),
            locals,
            diagnostics,
            config,
            depth: 0,
            line: 1,
        }
    }

    /// Walk the top-level statements in order.
    ///
    /// Diagnostics go to the sink and never stop the walk; the only `Err`
    /// is the nesting limit.
    pub fn resolve(&mut self, stmts: &[Stmt]) -> Result<(), NestingTooDeep> {
        self.resolve_stmts(stmts)
    }

    pub fn function_context(&self) -> FunctionContext {
        self.functions.current()
    }

    pub fn scope_depth(&self) -> usize {
        self.scopes.depth()
    }

    // =========================================================================
    // Scoped helpers
    // =========================================================================

    /// Run `f` one level deeper, refusing once the configured limit is hit.
    fn descend(&mut self, span: Span, f: impl FnOnce(&mut Self) -> Walk) -> Walk {
        if self.depth >= self.config.max_depth {
            return Err(NestingTooDeep { line: self.line, span, limit: self.config.max_depth });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Run `f` inside a fresh block frame.
    ///
    /// The frame is always popped. Unused locals are only reported when the
    /// nested walk completed, since an aborted frame was never fully seen.
    fn with_scope(&mut self, f: impl FnOnce(&mut Self) -> Walk) -> Walk {
        self.scopes.begin_scope();
        let result = f(self);
        let unused = self.scopes.end_scope();
        if result.is_ok() {
            for local in unused {
                self.diagnostics.report(ResolveError::unused(local.name, local.line, local.span));
            }
        }
        result
    }

    /// Run `f` with `kind` as the enclosing callable, restoring the previous
    /// context on every exit path.
    fn with_function(&mut self, kind: FunctionContext, f: impl FnOnce(&mut Self) -> Walk) -> Walk {
        let previous = self.functions.enter(kind);
        let result = f(self);
        self.functions.restore(previous);
        result
    }

    // =========================================================================
    // Bindings
    // =========================================================================

    fn declare(&mut self, name: &Token) {
        self.line = name.line;
        if let Err(dup) = self.scopes.declare(name) {
            self.diagnostics.report(ResolveError::duplicate(name, dup.previous.span));
        }
    }

    fn define(&mut self, name: &Token) {
        self.scopes.define(&name.lexeme);
    }

    fn resolve_local(&mut self, expr: NodeId, name: &Token) {
        if let Some(distance) = self.scopes.lookup_distance(&name.lexeme) {
            self.locals.record(expr, distance);
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn resolve_stmts(&mut self, stmts: &[Stmt]) -> Walk {
        for stmt in stmts {
            self.resolve_stmt(stmt)?;
        }
        Ok(())
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) -> Walk {
        self.descend(stmt.span, |r| r.resolve_stmt_kind(stmt))
    }

    fn resolve_stmt_kind(&mut self, stmt: &Stmt) -> Walk {
        match &stmt.kind {
            StmtKind::Block(stmts) => self.with_scope(|r| r.resolve_stmts(stmts)),
            StmtKind::Var { name, init } => {
                self.declare(name);
                if let Some(init) = init {
                    self.resolve_expr(init)?;
                }
                self.define(name);
                Ok(())
            }
            StmtKind::Function(decl) => {
                // Defined before the body so the function can call itself.
                self.declare(&decl.name);
                self.define(&decl.name);
                self.resolve_function(decl, FunctionContext::Function)
            }
            StmtKind::Expr(expr) | StmtKind::Print(expr) => self.resolve_expr(expr),
            StmtKind::If { cond, then_branch, else_branch } => {
                self.resolve_expr(cond)?;
                self.resolve_stmt(then_branch)?;
                if let Some(else_branch) = else_branch {
                    self.resolve_stmt(else_branch)?;
                }
                Ok(())
            }
            StmtKind::Return { keyword, value } => {
                self.line = keyword.line;
                if !self.functions.current().allows_return() {
                    self.diagnostics.report(ResolveError::invalid_return(keyword));
                }
                match value {
                    Some(value) => self.resolve_expr(value),
                    None => Ok(()),
                }
            }
            StmtKind::While { cond, body } => {
                self.resolve_expr(cond)?;
                self.resolve_stmt(body)
            }
            StmtKind::Class(class) => {
                self.declare(&class.name);
                self.define(&class.name);
                for method in &class.methods {
                    self.resolve_function(method, FunctionContext::Method)?;
                }
                Ok(())
            }
        }
    }

    fn resolve_function(&mut self, decl: &FunDecl, kind: FunctionContext) -> Walk {
        self.with_function(kind, |r| {
            r.with_scope(|r| {
                for param in &decl.params {
                    r.declare(param);
                    r.define(param);
                }
                r.resolve_stmts(&decl.body)
            })
        })
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn resolve_expr(&mut self, expr: &Expr) -> Walk {
        self.descend(expr.span, |r| r.resolve_expr_kind(expr))
    }

    fn resolve_expr_kind(&mut self, expr: &Expr) -> Walk {
        match &expr.kind {
            ExprKind::Literal(_) => Ok(()),
            ExprKind::Variable(name) => {
                self.line = name.line;
                if self.scopes.innermost(&name.lexeme).is_some_and(|meta| !meta.defined) {
                    let outer = self.scopes.outer(&name.lexeme).map(|meta| meta.span);
                    self.diagnostics.report(ResolveError::self_reference(name, outer));
                }
                self.scopes.mark_used(&name.lexeme);
                self.resolve_local(expr.id, name);
                Ok(())
            }
            ExprKind::Assign { name, value } => {
                self.resolve_expr(value)?;
                self.line = name.line;
                self.resolve_local(expr.id, name);
                Ok(())
            }
            ExprKind::Binary { .. } | ExprKind::Logical { .. } | ExprKind::Call { .. } | ExprKind::Get { .. } => {
                self.resolve_chain(expr)
            }
            ExprKind::Unary { operand, .. } => self.resolve_expr(operand),
            ExprKind::Grouping(inner) => self.resolve_expr(inner),
            ExprKind::Set { object, value, .. } => {
                self.resolve_expr(value)?;
                self.resolve_expr(object)
            }
        }
    }

    /// Walk a left-nested run of operators, calls and property reads.
    ///
    /// The parser builds `a + b + c` and `a.b().c` in a loop, so the length
    /// of such a run follows the source text and is not counted as nesting.
    /// Operands are still visited left to right.
    fn resolve_chain(&mut self, expr: &Expr) -> Walk {
        let mut links = Vec::new();
        let mut head = expr;
        while let Some(next) = chain_head(head) {
            links.push(head);
            head = next;
        }

        self.resolve_expr(head)?;
        for link in links.iter().rev() {
            match &link.kind {
                ExprKind::Binary { right, .. } | ExprKind::Logical { right, .. } => self.resolve_expr(right)?,
                ExprKind::Call { args, .. } => {
                    for arg in args {
                        self.resolve_expr(arg)?;
                    }
                }
                // Property names are looked up dynamically.
                _ => {}
            }
        }
        Ok(())
    }
}

/// The left operand, callee or object that `expr` continues from.
fn chain_head(expr: &Expr) -> Option<&Expr> {
    match &expr.kind {
        ExprKind::Binary { left, .. } | ExprKind::Logical { left, .. } => Some(left.as_ref()),
        ExprKind::Call { callee, .. } => Some(callee.as_ref()),
        ExprKind::Get { object, .. } => Some(object.as_ref()),
        _ => None,
    }
}
