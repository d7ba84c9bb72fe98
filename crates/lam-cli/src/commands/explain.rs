// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! `lam explain`: error code documentation.

use std::process;

use lam_diagnostics::codes::ErrorCodeRegistry;
use lam_diagnostics::suggestions::did_you_mean;

use crate::output;

pub fn cmd_explain(code: &str) {
    let registry = ErrorCodeRegistry::default();
    let normalized = code.trim().to_ascii_uppercase();

    let Some(info) = registry.get(&normalized) else {
        eprintln!("{}: unknown error code `{}`", output::error_label(), code);
        let known: Vec<&str> = registry.sorted().iter().map(|info| info.code).collect();
        if let Some(suggestion) = did_you_mean(&normalized, known) {
            eprintln!("  {}", output::hint_text(&suggestion));
        }
        process::exit(1);
    };

    println!("{}: {}", output::code(info.code), output::title(info.title));
    println!("{}: {}", output::section_header("category"), info.category);
    println!();
    println!("{}", info.explanation);
}

/// List every known code.
pub fn cmd_list() {
    let registry = ErrorCodeRegistry::default();
    for info in registry.sorted() {
        println!("  {}  {:<11} {}", output::code(info.code), info.category.to_string(), info.title);
    }
}
