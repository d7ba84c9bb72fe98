// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The Lam front end as one call: scan, parse, resolve, then decide whether
//! the program may be handed to an evaluator.
//!
//! The resolver writes its distances straight into whatever implements
//! [`ResolutionSink`], which is usually the evaluator itself.

mod error;
mod frontend;
mod gate;

pub use error::DriverError;
pub use frontend::{read_source, Analysis, Evaluator, Execution, Frontend, Phase, Run};
pub use gate::ExecutionGate;

pub use lam_resolve::{Locals, ResolutionSink, ResolverConfig};
