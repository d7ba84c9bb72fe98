// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Help text for CLI commands.

use crate::output;

pub fn print_usage() {
    println!(
        "{} {} - scope checking for Lam programs",
        output::title("Lam"),
        output::version(env!("CARGO_PKG_VERSION"))
    );
    println!();
    println!(
        "{}: {} {} {} {}",
        output::section_header("Usage"),
        output::command("lam"),
        output::arg("<command>"),
        output::arg("[args]"),
        output::arg("[options]")
    );
    println!();
    println!("{}", output::section_header("Commands:"));
    println!("  {} {}       Tokenize a file and print tokens", output::command("lex"), output::arg("<file>"));
    println!("  {} {}     Parse a file and print the syntax tree", output::command("parse"), output::arg("<file>"));
    println!("  {} {}   Resolve scopes and print variable distances", output::command("resolve"), output::arg("<file>"));
    println!("  {} {}     Run all checks and report whether the program may run", output::command("check"), output::arg("<file>"));
    println!("  {} {}   Explain an error code (no code lists them all)", output::command("explain"), output::arg("[code]"));
    println!("  {}             Show this help", output::command("help"));
    println!("  {}          Show version", output::command("version"));
    println!();
    println!("{}", output::section_header("Options:"));
    println!("  {} {}    Diagnostic output format", output::arg("--format"), output::arg("human|json"));
    println!(
        "  {} {} Which resolver diagnostics block execution (default: errors, env LAM_GATE)",
        output::arg("--gate"),
        output::arg("always|errors|any")
    );
    println!("  {} {}        Resolver nesting limit (default: 512)", output::arg("--max-depth"), output::arg("<n>"));
}
