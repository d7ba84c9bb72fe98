// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Policy for running a program that has resolution diagnostics.

use std::fmt;
use std::str::FromStr;

use crate::error::DriverError;

/// Which resolution diagnostics stop execution.
///
/// Scan errors, parse errors and a resolver abort block execution under
/// every gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionGate {
    /// Run regardless of resolution diagnostics.
    Always,
    /// Run unless a resolution diagnostic is an error. Warnings pass.
    #[default]
    BlockOnErrors,
    /// Run only when the resolver reported nothing at all.
    BlockOnAny,
}

impl ExecutionGate {
    pub const NAMES: [&'static str; 3] = ["always", "errors", "any"];

    /// `errors` and `warnings` are the number of each in the resolver output.
    pub fn permits(self, errors: usize, warnings: usize) -> bool {
        match self {
            ExecutionGate::Always => true,
            ExecutionGate::BlockOnErrors => errors == 0,
            ExecutionGate::BlockOnAny => errors == 0 && warnings == 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ExecutionGate::Always => "always",
            ExecutionGate::BlockOnErrors => "errors",
            ExecutionGate::BlockOnAny => "any",
        }
    }
}

impl fmt::Display for ExecutionGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExecutionGate {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(ExecutionGate::Always),
            "errors" => Ok(ExecutionGate::BlockOnErrors),
            "any" => Ok(ExecutionGate::BlockOnAny),
            _ => Err(DriverError::UnknownGate(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permits_by_gate() {
        assert!(ExecutionGate::Always.permits(3, 1));
        assert!(ExecutionGate::BlockOnErrors.permits(0, 2));
        assert!(!ExecutionGate::BlockOnErrors.permits(1, 0));
        assert!(!ExecutionGate::BlockOnAny.permits(0, 1));
        assert!(ExecutionGate::BlockOnAny.permits(0, 0));
    }

    #[test]
    fn parses_names() {
        for name in ExecutionGate::NAMES {
            let gate: ExecutionGate = name.parse().unwrap();
            assert_eq!(gate.name(), name);
        }
        assert_eq!("ANY".parse::<ExecutionGate>().unwrap(), ExecutionGate::BlockOnAny);
        assert!(matches!("never".parse::<ExecutionGate>(), Err(DriverError::UnknownGate(ref s)) if s == "never"));
    }
}
