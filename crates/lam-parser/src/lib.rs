// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parser for the Lam scripting language.
//!
//! Transforms a token stream into an abstract syntax tree.

mod hints;
mod parser;

pub use parser::{ParseError, ParseErrorKind, ParseResult, Parser};

#[cfg(test)]
mod tests {
    use super::*;
    use lam_ast::expr::{ExprKind, Literal, LogicalOp};
    use lam_ast::stmt::{Stmt, StmtKind};
    use std::collections::HashSet;

    fn parse(src: &str) -> ParseResult {
        let lex_result = lam_lexer::Lexer::new(src).tokenize();
        assert!(lex_result.is_ok(), "Lex errors: {:?}", lex_result.errors);
        Parser::new(lex_result.tokens).parse()
    }

    fn parse_ok(src: &str) -> Vec<Stmt> {
        let result = parse(src);
        assert!(result.is_ok(), "Parse errors: {:?}", result.errors);
        result.stmts
    }

    #[test]
    fn var_with_and_without_initializer() {
        let stmts = parse_ok("var a; var b = 1;");
        assert_eq!(stmts.len(), 2);
        match &stmts[0].kind {
            StmtKind::Var { name, init } => {
                assert_eq!(name.lexeme, "a");
                assert!(init.is_none());
            }
            other => panic!("Expected var, got {:?}", other),
        }
        match &stmts[1].kind {
            StmtKind::Var { init: Some(init), .. } => {
                assert!(matches!(init.kind, ExprKind::Literal(Literal::Number(n)) if n == 1.0));
            }
            other => panic!("Expected var with initializer, got {:?}", other),
        }
    }

    #[test]
    fn precedence_of_logical_and_arithmetic() {
        let stmts = parse_ok("print a or b and 1 + 2 * 3 < 4;");
        let StmtKind::Print(expr) = &stmts[0].kind else { panic!("Expected print") };
        let ExprKind::Logical { op, right, .. } = &expr.kind else { panic!("Expected or at root") };
        assert_eq!(*op, LogicalOp::Or);
        assert!(matches!(right.kind, ExprKind::Logical { op: LogicalOp::And, .. }));
    }

    #[test]
    fn assignment_targets() {
        let stmts = parse_ok("a = b = 1; obj.field = 2;");
        let StmtKind::Expr(first) = &stmts[0].kind else { panic!("Expected expression statement") };
        let ExprKind::Assign { name, value } = &first.kind else { panic!("Expected assign") };
        assert_eq!(name.lexeme, "a");
        assert!(matches!(value.kind, ExprKind::Assign { .. }));

        let StmtKind::Expr(second) = &stmts[1].kind else { panic!("Expected expression statement") };
        assert!(matches!(second.kind, ExprKind::Set { .. }));
    }

    #[test]
    fn invalid_assignment_target_is_reported() {
        let result = parse("1 + 2 = 3;");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, ParseErrorKind::InvalidAssignment);
        assert_eq!(result.stmts.len(), 1);
    }

    #[test]
    fn calls_and_property_chains() {
        let stmts = parse_ok("a.b(1, 2).c;");
        let StmtKind::Expr(expr) = &stmts[0].kind else { panic!("Expected expression statement") };
        let ExprKind::Get { object, name } = &expr.kind else { panic!("Expected get") };
        assert_eq!(name.lexeme, "c");
        let ExprKind::Call { args, .. } = &object.kind else { panic!("Expected call") };
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn function_and_class_declarations() {
        let stmts = parse_ok("fun add(a, b) { return a + b; } class Point { init(x) { } len() { return 0; } }");
        let StmtKind::Function(fun) = &stmts[0].kind else { panic!("Expected function") };
        assert_eq!(fun.name.lexeme, "add");
        assert_eq!(fun.arity(), 2);
        assert_eq!(fun.body.len(), 1);

        let StmtKind::Class(class) = &stmts[1].kind else { panic!("Expected class") };
        assert_eq!(class.name.lexeme, "Point");
        let names: Vec<_> = class.methods.iter().map(|m| m.name.lexeme.as_str()).collect();
        assert_eq!(names, vec!["init", "len"]);
    }

    #[test]
    fn return_keeps_keyword_line() {
        let stmts = parse_ok("fun f() {\n\n  return;\n}");
        let StmtKind::Function(fun) = &stmts[0].kind else { panic!("Expected function") };
        let StmtKind::Return { keyword, value } = &fun.body[0].kind else { panic!("Expected return") };
        assert_eq!(keyword.line, 3);
        assert!(value.is_none());
    }

    #[test]
    fn for_loop_lowers_to_block_and_while() {
        let stmts = parse_ok("for (var i = 0; i < 3; i = i + 1) print i;");
        let StmtKind::Block(outer) = &stmts[0].kind else { panic!("Expected block") };
        assert!(matches!(outer[0].kind, StmtKind::Var { .. }));
        let StmtKind::While { body, .. } = &outer[1].kind else { panic!("Expected while") };
        let StmtKind::Block(inner) = &body.kind else { panic!("Expected body block") };
        assert!(matches!(inner[0].kind, StmtKind::Print(_)));
        assert!(matches!(inner[1].kind, StmtKind::Expr(_)));
    }

    #[test]
    fn empty_for_clauses_loop_forever() {
        let stmts = parse_ok("for (;;) print 1;");
        let StmtKind::While { cond, body } = &stmts[0].kind else { panic!("Expected bare while") };
        assert!(matches!(cond.kind, ExprKind::Literal(Literal::Bool(true))));
        assert!(matches!(body.kind, StmtKind::Print(_)));
    }

    #[test]
    fn node_ids_are_unique() {
        fn collect_stmt(stmt: &Stmt, ids: &mut Vec<u32>) {
            ids.push(stmt.id.0);
            match &stmt.kind {
                StmtKind::Block(stmts) => stmts.iter().for_each(|s| collect_stmt(s, ids)),
                StmtKind::Var { init: Some(e), .. } | StmtKind::Expr(e) | StmtKind::Print(e) => collect_expr(e, ids),
                StmtKind::While { cond, body } => {
                    collect_expr(cond, ids);
                    collect_stmt(body, ids);
                }
                StmtKind::Function(fun) => fun.body.iter().for_each(|s| collect_stmt(s, ids)),
                _ => {}
            }
        }
        fn collect_expr(expr: &lam_ast::expr::Expr, ids: &mut Vec<u32>) {
            ids.push(expr.id.0);
            match &expr.kind {
                ExprKind::Binary { left, right, .. } | ExprKind::Logical { left, right, .. } => {
                    collect_expr(left, ids);
                    collect_expr(right, ids);
                }
                ExprKind::Assign { value, .. } => collect_expr(value, ids),
                ExprKind::Grouping(inner) | ExprKind::Unary { operand: inner, .. } => collect_expr(inner, ids),
                _ => {}
            }
        }

        let stmts = parse_ok("var a = 1; { var a = a + (2 * -a); print a; } for (;a;) a = a - 1; fun f() { print a; }");
        let mut ids = Vec::new();
        stmts.iter().for_each(|s| collect_stmt(s, &mut ids));
        let unique: HashSet<_> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn recovers_and_collects_multiple_errors() {
        let result = parse("var = 1;\nprint 2;\nvar b = ;\nprint 3;");
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[0].line, 1);
        assert_eq!(result.errors[1].line, 3);
        assert_eq!(result.stmts.len(), 2);
    }

    #[test]
    fn recovery_stays_inside_block() {
        let result = parse("{ print ; var a = 1; print a; }");
        assert_eq!(result.errors.len(), 1);
        let StmtKind::Block(stmts) = &result.stmts[0].kind else { panic!("Expected block") };
        assert_eq!(stmts.len(), 2);
    }

    #[test]
    fn missing_semicolon_before_brace_has_hint() {
        let result = parse("{ print 1 }");
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].message.contains("';'"));
        assert!(result.errors[0].hint.as_deref().unwrap().contains("last one"));
    }

    #[test]
    fn deep_nesting_is_an_error_not_a_crash() {
        let src = format!("print {}1{};", "(".repeat(1000), ")".repeat(1000));
        let result = parse(&src);
        assert!(!result.is_ok());
        assert!(result.errors.iter().any(|e| e.kind == ParseErrorKind::Limit));
    }

    #[test]
    fn error_cap_stops_parsing() {
        let src = "var ;".repeat(50);
        let result = parse(&src);
        assert_eq!(result.errors.len(), 20);
    }
}
