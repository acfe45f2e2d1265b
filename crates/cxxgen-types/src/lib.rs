//! Type tags, type signatures and function descriptors for cxxgen.
//!
//! A type signature such as `"dd->d"` lists single-character input type
//! tags, then `->`, then exactly one output tag. The [`TypeMap`] resolves
//! tags to C spellings and `NumPy` type ids; [`Func`] binds validated
//! signatures to a dispatch name and a templated implementation.

mod func;
mod signature;
mod type_map;

pub use func::*;
pub use signature::*;
pub use type_map::*;

use thiserror::Error;

/// Descriptor and signature validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("unexpected file extension for header file '{0}'")]
    UnsupportedHeaderExtension(String),
    #[error("header '{0}' must be a file name without directory components")]
    HeaderPath(String),
    #[error("malformed type signature '{0}': expected '<inputs>-><output>' with one output tag")]
    MalformedSignature(String),
    #[error("unknown type tag '{0}'")]
    UnknownTypeTag(char),
    #[error("type tag must be a single character, got '{0}'")]
    InvalidTypeTag(String),
    #[error("function '{func}': signature '{signature}' has {actual} inputs, expected {expected}")]
    ArityMismatch {
        func: String,
        signature: String,
        expected: usize,
        actual: usize,
    },
    #[error("function '{func}': duplicate signature '{signature}'")]
    DuplicateSignature { func: String, signature: String },
}

pub type Result<T> = std::result::Result<T, TypeError>;
