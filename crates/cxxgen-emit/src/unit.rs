//! Emission input: one header and the functions it templates.

use cxxgen_types::Func;

/// Directory generated files are placed in, relative to the header.
pub const DEFAULT_OUTPUT_DIR: &str = "generated";

/// One header and its ordered function descriptors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConcreteUnit {
    /// Header file name, e.g. `log_expit.h`.
    pub header: String,
    /// Path written into the `#include` line of both generated files.
    pub include: String,
    /// Functions in emission order.
    pub funcs: Vec<Func>,
}

impl ConcreteUnit {
    /// Create a unit whose generated files include `../<header>`.
    #[must_use]
    pub fn new(header: impl Into<String>, funcs: Vec<Func>) -> Self {
        let header = header.into();
        let include = default_include(&header);
        Self {
            header,
            include,
            funcs,
        }
    }

    /// Override the `#include` path.
    #[must_use]
    pub fn with_include(mut self, include: impl Into<String>) -> Self {
        self.include = include.into();
        self
    }

    /// Total number of wrappers the unit produces.
    #[must_use]
    pub fn num_wrappers(&self) -> usize {
        self.funcs.iter().map(|f| f.signatures().len()).sum()
    }
}

/// Include path for a header one directory above the generated files.
#[must_use]
pub fn default_include(header: &str) -> String {
    format!("../{header}")
}
