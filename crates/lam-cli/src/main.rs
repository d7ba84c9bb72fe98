// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lam CLI - scan, parse and scope-check Lam programs.

mod commands;
mod help;
mod output;

use std::env;
use std::process;

use lam_diagnostics::formatter::DiagnosticFormatter;
use lam_diagnostics::json;
use lam_diagnostics::suggestions::did_you_mean;
use lam_diagnostics::Diagnostic;
use lam_driver::{ExecutionGate, Frontend};

/// Output format for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Human,
    Json,
}

pub const COMMANDS: [&str; 7] = ["lex", "parse", "resolve", "check", "explain", "help", "version"];

/// Parsed command line: flags may appear anywhere.
struct Args {
    positional: Vec<String>,
    format: Format,
    frontend: Frontend,
}

fn main() {
    output::init();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}: {}", output::error_label(), msg);
            process::exit(1);
        }
    };

    let Some(cmd) = args.positional.first() else {
        help::print_usage();
        return;
    };
    let operand = args.positional.get(1).map(String::as_str);

    match cmd.as_str() {
        "lex" => commands::phase::cmd_lex(require_file(cmd, operand), args.format),
        "parse" => commands::phase::cmd_parse(require_file(cmd, operand), args.format),
        "resolve" => commands::phase::cmd_resolve(require_file(cmd, operand), &args.frontend, args.format),
        "check" => commands::phase::cmd_check(require_file(cmd, operand), &args.frontend, args.format),
        "explain" => match operand {
            Some(code) => commands::explain::cmd_explain(code),
            None => commands::explain::cmd_list(),
        },
        "help" | "--help" | "-h" => help::print_usage(),
        "version" | "--version" | "-V" => println!("lam {}", env!("CARGO_PKG_VERSION")),
        other => {
            // Treat as filename
            if other.ends_with(".lam") {
                commands::phase::cmd_check(other, &args.frontend, args.format);
                return;
            }
            eprintln!("{}: unknown command `{}`", output::error_label(), other);
            if let Some(suggestion) = did_you_mean(other, COMMANDS) {
                eprintln!("  {}", output::hint_text(&suggestion));
            }
            eprintln!();
            help::print_usage();
            process::exit(1);
        }
    }
}

fn parse_args(mut raw: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut format = Format::Human;
    let mut frontend = Frontend::new();

    if let Some(gate) = env::var("LAM_GATE").ok().filter(|g| !g.is_empty()) {
        frontend.gate = gate.parse::<ExecutionGate>().map_err(|e| format!("LAM_GATE: {}", e))?;
    }

    while let Some(arg) = raw.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if arg.starts_with("--") => (flag.to_string(), Some(value.to_string())),
            _ => (arg.clone(), None),
        };
        let mut value = |name: &str| -> Result<String, String> {
            inline
                .clone()
                .or_else(|| raw.next())
                .ok_or_else(|| format!("{} needs a value", name))
        };

        match flag.as_str() {
            "--format" => {
                format = match value("--format")?.as_str() {
                    "human" => Format::Human,
                    "json" => Format::Json,
                    other => return Err(format!("unknown format `{}` (expected human or json)", other)),
                };
            }
            "--gate" => {
                frontend.gate = value("--gate")?.parse::<ExecutionGate>().map_err(|e| e.to_string())?;
            }
            "--max-depth" => {
                let raw_depth = value("--max-depth")?;
                let depth = raw_depth
                    .parse::<usize>()
                    .ok()
                    .filter(|&d| d > 0)
                    .ok_or_else(|| format!("--max-depth expects a positive number, got `{}`", raw_depth))?;
                frontend = frontend.with_max_depth(depth);
            }
            _ => positional.push(arg),
        }
    }

    Ok(Args { positional, format, frontend })
}

fn require_file<'a>(cmd: &str, operand: Option<&'a str>) -> &'a str {
    match operand {
        Some(path) => path,
        None => {
            eprintln!("Usage: lam {} {}", cmd, output::arg("<file.lam>"));
            process::exit(1);
        }
    }
}

/// Print diagnostics in the chosen format.
///
/// Human output goes to stderr; a JSON report goes to stdout so it can be
/// piped.
pub fn show_diagnostics(diags: &[Diagnostic], source: &str, path: &str, phase: &str, format: Format) {
    match format {
        Format::Human => {
            if diags.is_empty() {
                return;
            }
            let formatter = DiagnosticFormatter::new(source).with_file_name(path);
            eprintln!("{}", formatter.format_all(diags));
        }
        Format::Json => {
            let report = json::to_json_report(diags, source, path, phase);
            println!("{}", json::to_json_string(&report));
        }
    }
}
