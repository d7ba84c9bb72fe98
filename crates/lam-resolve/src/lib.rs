// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Static scope resolution for the Lam language.
//!
//! One pass over the parsed program, before anything runs. It checks that
//! locals are declared once per block, never read in their own initializer
//! and actually used, and that `return` only appears inside a callable. For
//! every local variable reference and assignment target it records how many
//! scopes out the declaration lives, keyed by the expression's `NodeId`.

mod context;
mod error;
mod resolver;
mod scope;
mod sink;

pub use context::{FunctionContext, FunctionContextTracker};
pub use error::{NestingTooDeep, ResolveError, ResolveErrorKind};
pub use resolver::{Resolver, ResolverConfig};
pub use scope::{Duplicate, ScopeStack, UnusedLocal, VariableMetadata};
pub use sink::{DiagnosticSink, Locals, ResolutionSink};

use lam_ast::stmt::Stmt;

/// The result of scope resolution.
#[derive(Debug, Default)]
pub struct ResolvedProgram {
    /// Distances for local references and assignment targets.
    pub locals: Locals,
    /// Diagnostics in the order they were found.
    pub errors: Vec<ResolveError>,
}

impl ResolvedProgram {
    /// True if any diagnostic is more than a warning.
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(|e| !e.is_warning())
    }

    pub fn warning_count(&self) -> usize {
        self.errors.iter().filter(|e| e.is_warning()).count()
    }
}

/// Resolve a whole program with the default configuration.
pub fn resolve(stmts: &[Stmt]) -> Result<ResolvedProgram, NestingTooDeep> {
    resolve_with(stmts, ResolverConfig::default())
}

pub fn resolve_with(stmts: &[Stmt], config: ResolverConfig) -> Result<ResolvedProgram, NestingTooDeep> {
    let mut program = ResolvedProgram::default();
    Resolver::with_config(&mut program.locals, &mut program.errors, config).resolve(stmts)?;
    Ok(program)
}
