// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Driver errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown execution gate `{0}` (expected always, errors or any)")]
    UnknownGate(String),
}
