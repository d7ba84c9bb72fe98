// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error code registry.
//!
//! Maps error codes (E0001, E0201, etc.) to titles and categories.
//! Used by `lam explain <code>` and for JSON output.

use std::collections::HashMap;

/// Registry of all known error codes.
pub struct ErrorCodeRegistry {
    codes: HashMap<&'static str, ErrorCodeInfo>,
}

/// Information about a single error code.
pub struct ErrorCodeInfo {
    pub code: &'static str,
    pub title: &'static str,
    pub category: ErrorCategory,
    /// Longer explanation shown by `lam explain`.
    pub explanation: &'static str,
}

/// Error category for grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Syntax,
    Resolution,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Syntax => write!(f, "Syntax"),
            ErrorCategory::Resolution => write!(f, "Resolution"),
        }
    }
}

macro_rules! register_codes {
    ($($code:literal => ($title:literal, $cat:expr, $explanation:literal)),* $(,)?) => {{
        let mut map = HashMap::new();
        $(
            map.insert($code, ErrorCodeInfo {
                code: $code,
                title: $title,
                category: $cat,
                explanation: $explanation,
            });
        )*
        map
    }};
}

impl Default for ErrorCodeRegistry {
    fn default() -> Self {
        use ErrorCategory::*;

        Self {
            codes: register_codes! {
                // Lexer errors (E00xx)
                "E0001" => ("unexpected character", Syntax,
                    "The scanner found a character that cannot start any token."),
                "E0002" => ("unterminated string literal", Syntax,
                    "A string literal was opened with '\"' but never closed. Strings may span lines."),
                "E0003" => ("invalid number format", Syntax,
                    "A numeric literal could not be read as a number."),

                // Parser errors (E01xx)
                "E0100" => ("expected token not found", Syntax,
                    "The parser expected a particular token, such as ';' or ')', and found something else."),
                "E0101" => ("invalid assignment target", Syntax,
                    "Only variables (`a = 1`) and properties (`obj.field = 1`) can be assigned to."),
                "E0102" => ("syntax limit exceeded", Syntax,
                    "Too many arguments or parameters, or constructs nested too deeply to parse."),

                // Resolver errors (E02xx)
                "E0200" => ("duplicate declaration", Resolution,
                    "A local variable was declared twice in the same block. Globals may be redeclared; locals may not."),
                "E0201" => ("variable read in its own initializer", Resolution,
                    "`var a = a;` inside a block reads the new, not-yet-initialized `a`. Use a different name to read an outer variable."),
                "E0202" => ("unused local variable", Resolution,
                    "A local variable is never read before its block ends. Assigning to it does not count as a use. This is a warning."),
                "E0203" => ("return outside of function", Resolution,
                    "`return` is only allowed inside a function or method body."),
                "E0204" => ("nesting too deep", Resolution,
                    "The program nests statements or expressions deeper than the resolver's limit. Resolution stops at this point."),
            },
        }
    }
}

impl ErrorCodeRegistry {
    pub fn get(&self, code: &str) -> Option<&ErrorCodeInfo> {
        self.codes.get(code)
    }

    pub fn all(&self) -> impl Iterator<Item = &ErrorCodeInfo> {
        self.codes.values()
    }

    /// All codes, in numeric order.
    pub fn sorted(&self) -> Vec<&ErrorCodeInfo> {
        let mut infos: Vec<_> = self.all().collect();
        infos.sort_by_key(|info| info.code);
        infos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolver_codes_are_registered() {
        let registry = ErrorCodeRegistry::default();
        for code in ["E0200", "E0201", "E0202", "E0203", "E0204"] {
            let info = registry.get(code).unwrap_or_else(|| panic!("{} missing", code));
            assert_eq!(info.category, ErrorCategory::Resolution);
        }
        assert_eq!(registry.get("E0001").map(|i| i.category), Some(ErrorCategory::Syntax));
        assert!(registry.get("E9999").is_none());
    }

    #[test]
    fn sorted_is_numeric() {
        let registry = ErrorCodeRegistry::default();
        let codes: Vec<_> = registry.sorted().iter().map(|i| i.code).collect();
        assert_eq!(codes.first(), Some(&"E0001"));
        assert_eq!(codes.last(), Some(&"E0204"));
        assert_eq!(codes.len(), 11);
    }
}
