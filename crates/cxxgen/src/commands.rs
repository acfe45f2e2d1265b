//! Command implementation.

use cxxgen::{Driver, TypeMap, load_type_entries};
use tracing::{error, info, warn};

use crate::cli::{Cli, EXIT_FAILURE, EXIT_SUCCESS};

/// Run the generator for the parsed command line.
pub fn run_command(cli: &Cli) -> i32 {
    let mut types = TypeMap::numpy();
    if let Some(path) = &cli.types {
        match load_type_entries(path) {
            Ok(entries) => types.extend(entries),
            Err(e) => {
                error!(error = %e, "invalid type map");
                return EXIT_FAILURE;
            }
        }
    }
    let driver = Driver::new(types);

    if cli.check {
        cmd_check(&driver, cli)
    } else {
        cmd_generate(&driver, cli)
    }
}

fn cmd_generate(driver: &Driver, cli: &Cli) -> i32 {
    match driver.run(&cli.dirs) {
        Ok(written) => {
            info!(dirs = cli.dirs.len(), files = written.len(), "done");
            EXIT_SUCCESS
        }
        Err(e) => {
            error!(error = %e, "generation failed");
            EXIT_FAILURE
        }
    }
}

fn cmd_check(driver: &Driver, cli: &Cli) -> i32 {
    match driver.check(&cli.dirs) {
        Ok(stale) if stale.is_empty() => {
            info!(dirs = cli.dirs.len(), "generated files are up to date");
            EXIT_SUCCESS
        }
        Ok(stale) => {
            for path in &stale {
                warn!(path = %path.display(), "stale generated file");
            }
            EXIT_FAILURE
        }
        Err(e) => {
            error!(error = %e, "check failed");
            EXIT_FAILURE
        }
    }
}
