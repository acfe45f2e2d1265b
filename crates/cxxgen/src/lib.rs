//! cxxgen - concrete instantiations of templated ufunc kernels.
//!
//! Turns a declarative description of templated C++ functions into a
//! `<root>_concrete.h` / `<root>_concrete.cxx` pair of `extern "C"` wrappers,
//! one per type signature, that a ufunc dispatch table can take plain
//! function pointers to.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use cxxgen::{ConcreteUnit, Func, TypeMap, generate};
//!
//! let add = Func::new("add", "cxx_add", ["ff->f", "dd->d"])?;
//! let unit = ConcreteUnit::new("add.h", vec![add]);
//! generate(&unit, &TypeMap::numpy(), Path::new("src/add/generated"))?;
//! # Ok::<(), cxxgen::Error>(())
//! ```

// Re-export from sub-crates
pub use cxxgen_emit::{
    ConcreteUnit, DEFAULT_OUTPUT_DIR, EmitError, GeneratedFile, GeneratedFiles, emit_concrete,
    include_guard,
};
pub use cxxgen_types::{
    Func, HEADER_EXTENSIONS, TypeEntry, TypeError, TypeMap, TypeSignature,
    derive_generated_names, mangle, split_signature,
};

pub mod descriptor;
mod driver;
mod error;

pub use descriptor::{DESCRIPTOR_FILE, Descriptor, load_type_entries};
pub use driver::*;
pub use error::*;
