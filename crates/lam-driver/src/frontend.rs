// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Front end pipeline (scan → parse → resolve) and the evaluator seam.

use std::path::Path;

use lam_ast::stmt::Stmt;
use lam_lexer::{LexError, Lexer};
use lam_parser::{ParseError, Parser};
use lam_resolve::{Locals, NestingTooDeep, ResolutionSink, ResolveError, Resolver, ResolverConfig};

use crate::error::DriverError;
use crate::gate::ExecutionGate;

/// Something that can run a resolved program.
///
/// The resolver records distances into the evaluator before `interpret` is
/// called, so the evaluator's side table is complete by then.
pub trait Evaluator: ResolutionSink {
    type Error;

    fn interpret(&mut self, program: &[Stmt]) -> Result<(), Self::Error>;
}

/// The phase an analysis stopped at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lex,
    Parse,
    Resolve,
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Phase::Lex => "lex",
            Phase::Parse => "parse",
            Phase::Resolve => "resolve",
        }
    }
}

/// Everything the front end learned about one source text.
#[derive(Debug, Default)]
pub struct Analysis {
    pub program: Vec<Stmt>,
    pub lex_errors: Vec<LexError>,
    pub parse_errors: Vec<ParseError>,
    /// Empty unless scanning and parsing were clean.
    pub resolve_errors: Vec<ResolveError>,
    /// Set when the resolver gave up on deep nesting.
    pub aborted: Option<NestingTooDeep>,
    pub may_execute: bool,
}

impl Analysis {
    /// The furthest phase that ran.
    pub fn phase(&self) -> Phase {
        if !self.lex_errors.is_empty() {
            Phase::Lex
        } else if !self.parse_errors.is_empty() {
            Phase::Parse
        } else {
            Phase::Resolve
        }
    }

    pub fn error_count(&self) -> usize {
        self.lex_errors.len()
            + self.parse_errors.len()
            + self.resolve_errors.iter().filter(|e| !e.is_warning()).count()
            + usize::from(self.aborted.is_some())
    }

    pub fn warning_count(&self) -> usize {
        self.resolve_errors.iter().filter(|e| e.is_warning()).count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}

/// What happened when a program was handed to an evaluator.
#[derive(Debug, PartialEq, Eq)]
pub enum Execution<E> {
    /// The gate held the program back.
    Skipped,
    Completed,
    Failed(E),
}

#[derive(Debug)]
pub struct Run<E> {
    pub analysis: Analysis,
    pub execution: Execution<E>,
}

/// Front end configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Frontend {
    pub gate: ExecutionGate,
    pub resolver: ResolverConfig,
}

impl Frontend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gate(mut self, gate: ExecutionGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.resolver.max_depth = max_depth;
        self
    }

    /// Analyze `source`, collecting resolution distances into a fresh table.
    pub fn analyze(&self, source: &str) -> (Analysis, Locals) {
        let mut locals = Locals::new();
        let analysis = self.analyze_into(source, &mut locals);
        (analysis, locals)
    }

    /// Analyze `source`, sending resolution distances to `sink`.
    ///
    /// The resolver only runs on a program that scanned and parsed cleanly.
    pub fn analyze_into(&self, source: &str, sink: &mut dyn ResolutionSink) -> Analysis {
        let lexed = Lexer::new(source).tokenize();
        let parsed = Parser::new(lexed.tokens).parse();

        let mut analysis = Analysis {
            program: parsed.stmts,
            lex_errors: lexed.errors,
            parse_errors: parsed.errors,
            ..Analysis::default()
        };

        if analysis.lex_errors.is_empty() && analysis.parse_errors.is_empty() {
            let mut diagnostics: Vec<ResolveError> = Vec::new();
            let walked = Resolver::with_config(sink, &mut diagnostics, self.resolver).resolve(&analysis.program);
            analysis.resolve_errors = diagnostics;
            analysis.aborted = walked.err();
        }

        analysis.may_execute = self.permits(&analysis);
        analysis
    }

    /// Analyze `source` into `evaluator` and run it if the gate allows.
    pub fn run<E: Evaluator>(&self, source: &str, evaluator: &mut E) -> Run<E::Error> {
        let analysis = self.analyze_into(source, evaluator);
        let execution = if !analysis.may_execute {
            Execution::Skipped
        } else {
            match evaluator.interpret(&analysis.program) {
                Ok(()) => Execution::Completed,
                Err(e) => Execution::Failed(e),
            }
        };
        Run { analysis, execution }
    }

    /// Read and analyze a file.
    pub fn analyze_file(&self, path: &Path) -> Result<(String, Analysis, Locals), DriverError> {
        let source = read_source(path)?;
        let (analysis, locals) = self.analyze(&source);
        Ok((source, analysis, locals))
    }

    fn permits(&self, analysis: &Analysis) -> bool {
        if !analysis.lex_errors.is_empty() || !analysis.parse_errors.is_empty() || analysis.aborted.is_some() {
            return false;
        }
        let warnings = analysis.warning_count();
        self.gate.permits(analysis.resolve_errors.len() - warnings, warnings)
    }
}

pub fn read_source(path: &Path) -> Result<String, DriverError> {
    std::fs::read_to_string(path).map_err(|source| DriverError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_is_the_first_failing_one() {
        let frontend = Frontend::new();
        assert_eq!(frontend.analyze("var a = #;").0.phase(), Phase::Lex);
        assert_eq!(frontend.analyze("var = 1;").0.phase(), Phase::Parse);
        assert_eq!(frontend.analyze("return 1;").0.phase(), Phase::Resolve);
    }

    #[test]
    fn parse_errors_skip_resolution() {
        let (analysis, locals) = Frontend::new().analyze("{ var a = a; } print ;");
        assert_eq!(analysis.parse_errors.len(), 1);
        assert!(analysis.resolve_errors.is_empty());
        assert!(locals.is_empty());
        assert!(!analysis.may_execute);
    }

    #[test]
    fn counts_split_errors_and_warnings() {
        let (analysis, _) = Frontend::new().analyze("{ var u; var x = 1; var x = 2; print x; }");
        assert_eq!(analysis.error_count(), 1);
        assert_eq!(analysis.warning_count(), 1);
        assert!(analysis.has_errors());
    }
}
