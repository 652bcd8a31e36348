//! C++ code generation from opgen tables.
//!
//! Two generators live here:
//!
//! - [`instructions`] turns an instruction descriptor table into an
//!   instruction class hierarchy (header, `accept` definitions and the
//!   visitor interface).
//! - [`operators`] turns binary and unary operator tables into the
//!   type-checker declaration tables and the interpreter lambda tables.
//!
//! Emitters are pure functions of the parsed table and a
//! [`GeneratorConfig`]. File I/O only happens in [`driver`] and [`artifact`].

pub mod artifact;
pub mod config;
pub mod driver;
pub mod instructions;
pub mod operators;

pub use artifact::{write_all_atomically, write_atomically, Artifact};
pub use config::{GeneratorConfig, InstructionConfig, OperatorConfig};
pub use driver::{read_table, Generation, Generator, Mode};

use opgen_tables::TableError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during a generation pass.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("{0}")]
    Table(#[from] TableError),

    #[error("formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl GenerateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenerateError::Io {
            path: path.into(),
            source,
        }
    }
}
