//! CLI definitions.

use std::path::PathBuf;

use clap::Parser;

/// Exit code for success.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for failure.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Parser, Debug)]
#[command(name = "cxxgen")]
#[command(about = "Generate extern \"C\" concrete instantiations of templated ufunc kernels")]
#[command(version)]
pub struct Cli {
    /// Directories containing a cxxgen.toml descriptor
    #[arg(value_name = "DIR", required = true)]
    pub dirs: Vec<PathBuf>,

    /// Write nothing; fail if any generated file is missing or out of date
    #[arg(long)]
    pub check: bool,

    /// TOML file with a [types] table extending the standard type map
    #[arg(long, value_name = "FILE")]
    pub types: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress output (only show warnings and errors)
    #[arg(short, long, conflicts_with = "verbose")]
    pub silent: bool,
}

impl Cli {
    /// Default log directive for the selected verbosity.
    #[must_use]
    pub const fn log_directive(&self) -> &'static str {
        if self.verbose {
            "cxxgen=debug"
        } else if self.silent {
            "cxxgen=warn"
        } else {
            "cxxgen=info"
        }
    }
}
