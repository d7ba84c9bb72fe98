// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Conversions from phase error types to `Diagnostic`.

use crate::{Diagnostic, ToDiagnostic};
use lam_lexer::LexErrorKind;
use lam_parser::ParseErrorKind;
use lam_resolve::{NestingTooDeep, ResolveError, ResolveErrorKind};

// ============================================================================
// Lex Errors
// ============================================================================

impl ToDiagnostic for lam_lexer::LexError {
    fn to_diagnostic(&self) -> Diagnostic {
        let (code, label) = match self.kind {
            LexErrorKind::UnexpectedChar(_) => ("E0001", "unexpected character"),
            LexErrorKind::UnterminatedString => ("E0002", "string starts here"),
            LexErrorKind::InvalidNumber => ("E0003", "not a number"),
        };
        // Unterminated strings run to end of file; only mark the quote.
        let span = match self.kind {
            LexErrorKind::UnterminatedString => lam_ast::Span::new(self.span.start, self.span.start + 1),
            _ => self.span,
        };

        let mut diag = Diagnostic::error(&self.message).with_code(code).with_primary(span, label);
        if let Some(ref hint) = self.hint {
            diag = diag.with_help(hint.as_str());
        }
        diag
    }
}

// ============================================================================
// Parse Errors
// ============================================================================

impl ToDiagnostic for lam_parser::ParseError {
    fn to_diagnostic(&self) -> Diagnostic {
        let code = match self.kind {
            ParseErrorKind::Expected => "E0100",
            ParseErrorKind::InvalidAssignment => "E0101",
            ParseErrorKind::Limit => "E0102",
        };

        let mut diag = Diagnostic::error(&self.message).with_code(code).with_primary(self.span, "here");
        if let Some(ref hint) = self.hint {
            diag = diag.with_help(hint.as_str());
        }
        diag
    }
}

// ============================================================================
// Resolve Errors
// ============================================================================

impl ToDiagnostic for ResolveError {
    fn to_diagnostic(&self) -> Diagnostic {
        let message = self.to_string();

        match &self.kind {
            ResolveErrorKind::DuplicateDeclaration { previous, .. } => Diagnostic::error(message)
                .with_code("E0200")
                .with_primary(self.span, "declared again here")
                .with_secondary(*previous, "first declared here")
                .with_help("rename one of them, or assign to the existing variable"),

            ResolveErrorKind::SelfReferenceInInitializer { name, outer } => {
                let diag = Diagnostic::error(message)
                    .with_code("E0201")
                    .with_primary(self.span, "read before its initializer finishes");
                match outer {
                    Some(outer) => diag
                        .with_secondary(*outer, format!("outer `{}` declared here", name))
                        .with_note(format!("the outer `{}` is shadowed by this declaration", name))
                        .with_help("give the new variable a different name"),
                    None => diag,
                }
            }

            ResolveErrorKind::UnusedVariable { name } => Diagnostic::warning(message)
                .with_code("E0202")
                .with_primary(self.span, "declared here")
                .with_help(format!("remove `{}`, or read it before the block ends", name)),

            ResolveErrorKind::InvalidReturnContext => Diagnostic::error(message)
                .with_code("E0203")
                .with_primary(self.span, "not inside a function"),
        }
    }
}

impl ToDiagnostic for NestingTooDeep {
    fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.to_string())
            .with_code("E0204")
            .with_primary(self.span, "resolution stopped here")
            .with_note("diagnostics after this point were not computed")
            .with_help("split the code into smaller functions, or raise the limit with `--max-depth`")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LabelStyle, Severity};
    use lam_ast::token::Token;
    use lam_ast::Span;

    fn tok(name: &str, start: usize) -> Token {
        Token::new(lam_ast::token::TokenKind::Ident, name, 1, Span::new(start, start + name.len()))
    }

    #[test]
    fn unused_is_a_warning() {
        let diag = ResolveError::unused("y".into(), 1, Span::new(6, 7)).to_diagnostic();
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.code.map(|c| c.0), Some("E0202".to_string()));
        assert_eq!(diag.message, "local variable `y` is declared but never used");
    }

    #[test]
    fn duplicate_points_at_both_declarations() {
        let diag = ResolveError::duplicate(&tok("x", 20), Span::new(6, 7)).to_diagnostic();
        assert!(diag.is_error());
        assert_eq!(diag.primary_span(), Some(Span::new(20, 21)));
        assert_eq!(diag.labels.len(), 2);
        assert_eq!(diag.labels[1].style, LabelStyle::Secondary);
        assert_eq!(diag.labels[1].span, Span::new(6, 7));
    }

    #[test]
    fn self_reference_notes_shadowing_only_when_outer_exists() {
        let plain = ResolveError::self_reference(&tok("a", 10), None).to_diagnostic();
        assert!(plain.notes.is_empty());
        assert_eq!(plain.labels.len(), 1);

        let shadowed = ResolveError::self_reference(&tok("a", 10), Some(Span::new(4, 5))).to_diagnostic();
        assert_eq!(shadowed.notes, vec!["the outer `a` is shadowed by this declaration".to_string()]);
        assert_eq!(shadowed.labels.len(), 2);
    }

    #[test]
    fn phase_error_codes() {
        let lex = lam_lexer::Lexer::new("var a = 1 # 2;").tokenize();
        assert_eq!(lex.errors[0].to_diagnostic().code.map(|c| c.0), Some("E0001".to_string()));

        let lex = lam_lexer::Lexer::new("print \"open").tokenize();
        let diag = lex.errors[0].to_diagnostic();
        assert_eq!(diag.code.clone().map(|c| c.0), Some("E0002".to_string()));
        assert_eq!(diag.primary_span(), Some(Span::new(6, 7)));
        assert!(diag.help.is_some());

        let lex = lam_lexer::Lexer::new("1 = 2;").tokenize();
        let parse = lam_parser::Parser::new(lex.tokens).parse();
        assert_eq!(parse.errors[0].to_diagnostic().code.map(|c| c.0), Some("E0101".to_string()));
    }
}
