// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Where the resolver sends its two kinds of output.

use std::collections::HashMap;

use lam_ast::NodeId;

use crate::error::ResolveError;

/// Receives one record per resolved local reference or assignment target.
///
/// Usually implemented by the evaluator itself, so distances go straight
/// into its side table.
pub trait ResolutionSink {
    fn record(&mut self, expr: NodeId, distance: usize);
}

/// Receives diagnostics as the walk finds them.
pub trait DiagnosticSink {
    fn report(&mut self, error: ResolveError);
}

impl DiagnosticSink for Vec<ResolveError> {
    fn report(&mut self, error: ResolveError) {
        self.push(error);
    }
}

/// Resolution distances keyed by expression node.
///
/// Expressions with no entry are global references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Locals {
    distances: HashMap<NodeId, usize>,
}

impl Locals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, expr: NodeId) -> Option<usize> {
        self.distances.get(&expr).copied()
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Records sorted by node id, for stable output.
    pub fn sorted(&self) -> Vec<(NodeId, usize)> {
        let mut entries: Vec<_> = self.distances.iter().map(|(&id, &d)| (id, d)).collect();
        entries.sort();
        entries
    }
}

impl ResolutionSink for Locals {
    fn record(&mut self, expr: NodeId, distance: usize) {
        self.distances.insert(expr, distance);
    }
}
