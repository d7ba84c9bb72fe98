// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Stack of lexical block scopes.
//!
//! The bottom of the stack is the outermost *local* block. Globals are never
//! tracked: an empty stack means "at top level", and every operation that
//! would touch a frame is a no-op there.

use indexmap::IndexMap;
use lam_ast::token::Token;
use lam_ast::Span;

/// What the resolver knows about one local declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableMetadata {
    /// Initializer finished; reads are legal.
    pub defined: bool,
    /// Read at least once.
    pub used: bool,
    /// Declaration line.
    pub line: u32,
    pub span: Span,
}

impl VariableMetadata {
    fn declared_at(name: &Token) -> Self {
        Self { defined: false, used: false, line: name.line, span: name.span }
    }
}

/// A local that was never read, reported when its frame is popped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnusedLocal {
    pub name: String,
    pub line: u32,
    pub span: Span,
}

/// A name was declared twice in the same frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duplicate {
    /// Metadata of the declaration that was replaced.
    pub previous: VariableMetadata,
}

/// One block's bindings, in declaration order.
type ScopeFrame = IndexMap<String, VariableMetadata>;

#[derive(Debug, Default)]
pub struct ScopeStack {
    frames: Vec<ScopeFrame>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_scope(&mut self) {
        self.frames.push(ScopeFrame::new());
    }

    /// Pop the innermost frame, returning its never-read entries in
    /// declaration order.
    pub fn end_scope(&mut self) -> Vec<UnusedLocal> {
        let Some(frame) = self.frames.pop() else {
            return Vec::new();
        };
        frame
            .into_iter()
            .filter(|(_, meta)| !meta.used)
            .map(|(name, meta)| UnusedLocal { name, line: meta.line, span: meta.span })
            .collect()
    }

    /// Declare `name` in the innermost frame.
    ///
    /// A redeclaration still replaces the earlier entry; the caller decides
    /// what to do with the returned `Duplicate`.
    pub fn declare(&mut self, name: &Token) -> Result<(), Duplicate> {
        let Some(frame) = self.frames.last_mut() else {
            return Ok(());
        };
        match frame.insert(name.lexeme.clone(), VariableMetadata::declared_at(name)) {
            Some(previous) => Err(Duplicate { previous }),
            None => Ok(()),
        }
    }

    pub fn define(&mut self, name: &str) {
        if let Some(meta) = self.frames.last_mut().and_then(|frame| frame.get_mut(name)) {
            meta.defined = true;
        }
    }

    /// Number of frames between the innermost one and the frame declaring
    /// `name`. `None` means the name is global (or undeclared).
    pub fn lookup_distance(&self, name: &str) -> Option<usize> {
        self.frames.iter().rev().position(|frame| frame.contains_key(name))
    }

    /// Mark `name` as read if the innermost frame declares it.
    ///
    /// Declarations in enclosing frames are left alone, so a local read only
    /// from nested blocks is still reported unused.
    pub fn mark_used(&mut self, name: &str) -> bool {
        match self.frames.last_mut().and_then(|frame| frame.get_mut(name)) {
            Some(meta) => {
                meta.used = true;
                true
            }
            None => false,
        }
    }

    /// Metadata for `name` in the innermost frame only.
    pub fn innermost(&self, name: &str) -> Option<&VariableMetadata> {
        self.frames.last().and_then(|frame| frame.get(name))
    }

    /// Nearest declaration of `name` outside the innermost frame.
    pub fn outer(&self, name: &str) -> Option<&VariableMetadata> {
        let enclosing = self.frames.len().checked_sub(1)?;
        self.frames[..enclosing].iter().rev().find_map(|frame| frame.get(name))
    }

    pub fn is_global(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}
