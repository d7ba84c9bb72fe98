// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Front end phase inspection commands: lex, parse, resolve, check.

use std::collections::HashMap;
use std::path::Path;
use std::process;

use lam_ast::expr::{Expr, ExprKind};
use lam_ast::stmt::{Stmt, StmtKind};
use lam_ast::NodeId;
use lam_diagnostics::{Diagnostic, ToDiagnostic};
use lam_driver::{Analysis, Frontend};

use crate::{output, show_diagnostics, Format};

fn read_or_exit(path: &str) -> String {
    match lam_driver::read_source(Path::new(path)) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("{}: {}", output::error_label(), e);
            process::exit(1);
        }
    }
}

/// Every diagnostic the analysis produced, in phase order.
fn diagnostics(analysis: &Analysis) -> Vec<Diagnostic> {
    let mut diags: Vec<Diagnostic> = Vec::new();
    diags.extend(analysis.lex_errors.iter().map(|e| e.to_diagnostic()));
    diags.extend(analysis.parse_errors.iter().map(|e| e.to_diagnostic()));
    diags.extend(analysis.resolve_errors.iter().map(|e| e.to_diagnostic()));
    diags.extend(analysis.aborted.iter().map(|e| e.to_diagnostic()));
    diags
}

pub fn cmd_lex(path: &str, format: Format) {
    let source = read_or_exit(path);
    let result = lam_lexer::Lexer::new(&source).tokenize();

    let diags: Vec<Diagnostic> = result.errors.iter().map(|e| e.to_diagnostic()).collect();
    show_diagnostics(&diags, &source, path, "lex", format);

    if !result.is_ok() {
        if format == Format::Human {
            eprintln!("\n{}", output::banner_fail("Lex", result.errors.len()));
        }
        process::exit(1);
    }

    if format == Format::Human {
        println!("{}\n", output::section(&format!("Tokens ({})", result.tokens.len())));
        for tok in &result.tokens {
            println!("{:4} {:<16} {}", tok.line, tok.kind.display_name(), tok.lexeme);
        }
        println!("\n{}", output::banner_ok(&format!("Lex: {} tokens", result.tokens.len())));
    }
}

pub fn cmd_parse(path: &str, format: Format) {
    let source = read_or_exit(path);

    let lex_result = lam_lexer::Lexer::new(&source).tokenize();
    let token_count = lex_result.tokens.len();
    let mut all_diags: Vec<Diagnostic> = Vec::new();

    // One lex error per line; the rest are usually fallout.
    let mut last_line: Option<u32> = None;
    for error in &lex_result.errors {
        if last_line != Some(error.line) {
            all_diags.push(error.to_diagnostic());
            last_line = Some(error.line);
        }
    }

    let parse_result = lam_parser::Parser::new(lex_result.tokens).parse();
    all_diags.extend(parse_result.errors.iter().map(|e| e.to_diagnostic()));

    show_diagnostics(&all_diags, &source, path, "parse", format);
    if !all_diags.is_empty() {
        if format == Format::Human {
            eprintln!("\n{}", output::banner_fail("Parse", all_diags.len()));
        }
        process::exit(1);
    }

    if format == Format::Human {
        println!("{}\n", output::section(&format!("Lexed {} tokens", token_count)));
        println!("{}\n", output::section(&format!("AST ({} statements)", parse_result.stmts.len())));
        for (i, stmt) in parse_result.stmts.iter().enumerate() {
            println!("--- Statement {} ---", i + 1);
            println!("{:#?}", stmt);
            println!();
        }
        println!("{}", output::banner_ok("Parse"));
    }
}

pub fn cmd_resolve(path: &str, frontend: &Frontend, format: Format) {
    let source = read_or_exit(path);
    let (analysis, locals) = frontend.analyze(&source);
    let phase = analysis.phase().name();

    show_diagnostics(&diagnostics(&analysis), &source, path, phase, format);

    if analysis.has_errors() {
        if format == Format::Human {
            let title = match phase {
                "lex" => "Lex",
                "parse" => "Parse",
                _ => "Resolve",
            };
            eprintln!("\n{}", output::banner_fail(title, analysis.error_count()));
        }
        process::exit(1);
    }

    if format == Format::Human {
        let names = reference_names(&analysis.program);
        println!("{}\n", output::section(&format!("Resolutions ({})", locals.len())));
        for (id, distance) in locals.sorted() {
            match names.get(&id) {
                Some((name, line)) => println!("  line {:<4} {:<12} {} -> {}", line, name, id, distance),
                None => println!("  {:<22} {} -> {}", "", id, distance),
            }
        }
        println!("\n{}", output::banner_ok_with_warnings("Resolve", analysis.warning_count()));
    }
}

/// Run the whole front end and report whether the program may execute
/// under the configured gate.
pub fn cmd_check(path: &str, frontend: &Frontend, format: Format) {
    let source = read_or_exit(path);
    let (analysis, _) = frontend.analyze(&source);

    show_diagnostics(&diagnostics(&analysis), &source, path, analysis.phase().name(), format);

    if analysis.may_execute {
        if format == Format::Human {
            println!("{}", output::banner_ok_with_warnings("Check", analysis.warning_count()));
        }
        return;
    }

    if format == Format::Human {
        let errors = analysis.error_count();
        if errors > 0 {
            eprintln!("\n{}", output::banner_fail("Check", errors));
        } else {
            let reason = format!("{} warning(s) under gate `{}`", analysis.warning_count(), frontend.gate);
            eprintln!("\n{}", output::banner_blocked("Check", &reason));
        }
    }
    process::exit(1);
}

/// Name and line of every variable read and assignment target, by node.
fn reference_names(stmts: &[Stmt]) -> HashMap<NodeId, (String, u32)> {
    let mut names = HashMap::new();
    for stmt in stmts {
        collect_stmt(stmt, &mut names);
    }
    names
}

fn collect_stmt(stmt: &Stmt, names: &mut HashMap<NodeId, (String, u32)>) {
    match &stmt.kind {
        StmtKind::Block(stmts) => stmts.iter().for_each(|s| collect_stmt(s, names)),
        StmtKind::Var { init, .. } => init.iter().for_each(|e| collect_expr(e, names)),
        StmtKind::Function(decl) => decl.body.iter().for_each(|s| collect_stmt(s, names)),
        StmtKind::Class(class) => class
            .methods
            .iter()
            .flat_map(|m| m.body.iter())
            .for_each(|s| collect_stmt(s, names)),
        StmtKind::Expr(expr) | StmtKind::Print(expr) => collect_expr(expr, names),
        StmtKind::Return { value, .. } => value.iter().for_each(|e| collect_expr(e, names)),
        StmtKind::If { cond, then_branch, else_branch } => {
            collect_expr(cond, names);
            collect_stmt(then_branch, names);
            if let Some(else_branch) = else_branch {
                collect_stmt(else_branch, names);
            }
        }
        StmtKind::While { cond, body } => {
            collect_expr(cond, names);
            collect_stmt(body, names);
        }
    }
}

fn collect_expr(expr: &Expr, names: &mut HashMap<NodeId, (String, u32)>) {
    match &expr.kind {
        ExprKind::Literal(_) => {}
        ExprKind::Variable(name) => {
            names.insert(expr.id, (name.lexeme.clone(), name.line));
        }
        ExprKind::Assign { name, value } => {
            names.insert(expr.id, (name.lexeme.clone(), name.line));
            collect_expr(value, names);
        }
        ExprKind::Binary { left, right, .. } | ExprKind::Logical { left, right, .. } => {
            collect_expr(left, names);
            collect_expr(right, names);
        }
        ExprKind::Unary { operand, .. } => collect_expr(operand, names),
        ExprKind::Grouping(inner) => collect_expr(inner, names),
        ExprKind::Call { callee, args } => {
            collect_expr(callee, names);
            args.iter().for_each(|a| collect_expr(a, names));
        }
        ExprKind::Get { object, .. } => collect_expr(object, names),
        ExprKind::Set { object, value, .. } => {
            collect_expr(object, names);
            collect_expr(value, names);
        }
    }
}
