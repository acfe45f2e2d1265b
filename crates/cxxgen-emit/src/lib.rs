//! C++ concrete-instantiation emission.
//!
//! [`emit_concrete`] renders a [`ConcreteUnit`] into an in-memory
//! header/source pair; [`GeneratedFiles::write_to`] puts the pair on disk
//! atomically.

mod concrete;
mod unit;
mod writer;

pub use concrete::*;
pub use unit::*;
pub use writer::*;

use std::path::PathBuf;

use cxxgen_types::TypeError;
use thiserror::Error;

/// Emission errors.
#[derive(Error, Debug)]
pub enum EmitError {
    #[error(transparent)]
    Type(#[from] TypeError),
    #[error("duplicate wrapper symbol '{0}'")]
    DuplicateSymbol(String),
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EmitError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, EmitError>;
