// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Execution gating, observed through an evaluator that records what the
//! resolver told it and whether it was asked to run.

use std::io::Write;

use lam_ast::stmt::Stmt;
use lam_ast::NodeId;
use lam_driver::{read_source, DriverError, Evaluator, Execution, ExecutionGate, Frontend, ResolutionSink};

#[derive(Default)]
struct Recording {
    records: Vec<(NodeId, usize)>,
    runs: usize,
    statements: usize,
    fail: bool,
}

impl ResolutionSink for Recording {
    fn record(&mut self, expr: NodeId, distance: usize) {
        self.records.push((expr, distance));
    }
}

impl Evaluator for Recording {
    type Error = String;

    fn interpret(&mut self, program: &[Stmt]) -> Result<(), String> {
        self.runs += 1;
        self.statements = program.len();
        if self.fail {
            return Err("boom".to_string());
        }
        Ok(())
    }
}

fn run(gate: ExecutionGate, source: &str) -> (Recording, Execution<String>) {
    let mut evaluator = Recording::default();
    let run = Frontend::new().with_gate(gate).run(source, &mut evaluator);
    (evaluator, run.execution)
}

#[test]
fn clean_program_runs_with_distances_already_recorded() {
    let (eval, execution) = run(
        ExecutionGate::default(),
        "fun add(a, b) { return a + b; } print add(1, 2);",
    );
    assert_eq!(execution, Execution::Completed);
    assert_eq!(eval.runs, 1);
    assert_eq!(eval.statements, 2);
    // `a` and `b` inside the body, one frame each (the parameter frame).
    let distances: Vec<usize> = eval.records.iter().map(|&(_, d)| d).collect();
    assert_eq!(distances, vec![0, 0]);
}

#[test]
fn default_gate_blocks_on_errors() {
    let (eval, execution) = run(ExecutionGate::default(), "{ var a = a; }");
    assert_eq!(execution, Execution::Skipped);
    assert_eq!(eval.runs, 0);
}

#[test]
fn warnings_pass_the_default_gate_but_not_the_strict_one() {
    let source = "{ var unused = 1; } print 2;";

    let (eval, execution) = run(ExecutionGate::BlockOnErrors, source);
    assert_eq!(execution, Execution::Completed);
    assert_eq!(eval.runs, 1);

    let (eval, execution) = run(ExecutionGate::BlockOnAny, source);
    assert_eq!(execution, Execution::Skipped);
    assert_eq!(eval.runs, 0);
}

#[test]
fn always_runs_despite_resolution_errors() {
    let (eval, execution) = run(ExecutionGate::Always, "return 1;");
    assert_eq!(execution, Execution::Completed);
    assert_eq!(eval.runs, 1);
}

#[test]
fn syntax_errors_block_every_gate() {
    for gate in [ExecutionGate::Always, ExecutionGate::BlockOnErrors, ExecutionGate::BlockOnAny] {
        let (eval, execution) = run(gate, "print (1;");
        assert_eq!(execution, Execution::Skipped, "gate {}", gate);
        assert!(eval.records.is_empty());

        let (_, execution) = run(gate, "print @;");
        assert_eq!(execution, Execution::Skipped, "gate {}", gate);
    }
}

#[test]
fn resolver_abort_blocks_every_gate() {
    let mut evaluator = Recording::default();
    let source = format!("print {}1{};", "(".repeat(40), ")".repeat(40));
    let run = Frontend::new()
        .with_gate(ExecutionGate::Always)
        .with_max_depth(16)
        .run(&source, &mut evaluator);

    assert!(run.analysis.aborted.is_some());
    assert_eq!(run.analysis.aborted.map(|a| a.limit), Some(16));
    assert_eq!(run.execution, Execution::Skipped);
    assert_eq!(evaluator.runs, 0);
}

#[test]
fn evaluator_failure_is_reported() {
    let mut evaluator = Recording { fail: true, ..Recording::default() };
    let run = Frontend::new().run("print 1;", &mut evaluator);
    assert_eq!(run.execution, Execution::Failed("boom".to_string()));
    assert!(run.analysis.may_execute);
}

#[test]
fn analyze_file_reads_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{{ var y = 5; }}").unwrap();

    let (source, analysis, locals) = Frontend::new().analyze_file(file.path()).unwrap();
    assert!(source.starts_with("{ var y"));
    assert_eq!(analysis.warning_count(), 1);
    assert!(analysis.may_execute);
    assert!(locals.is_empty());
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.lam");
    let err = read_source(&missing).unwrap_err();
    assert!(matches!(err, DriverError::Io { ref path, .. } if path == &missing));
    assert!(err.to_string().starts_with("reading "));
}
