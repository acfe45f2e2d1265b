//! Directory driver.
//!
//! Runs in two phases. Planning loads every directory's descriptor and
//! renders its files in memory; committing writes them. A failure while
//! planning any directory leaves every directory untouched. Each unit is
//! written atomically, but units already committed stay in place if a
//! later unit fails to write.

use std::fs;
use std::path::{Path, PathBuf};

use cxxgen_emit::{ConcreteUnit, GeneratedFiles, emit_concrete};
use cxxgen_types::TypeMap;
use tracing::{debug, info};

use crate::descriptor::Descriptor;
use crate::{Error, Result};

/// A directory's generated files, rendered but not yet written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedUnit {
    /// Absolute source directory.
    pub dir: PathBuf,
    /// Absolute destination directory.
    pub dest_dir: PathBuf,
    pub files: GeneratedFiles,
    pub num_wrappers: usize,
}

/// Drives generation over a list of directories.
#[derive(Clone, Debug)]
pub struct Driver {
    types: TypeMap,
}

impl Default for Driver {
    fn default() -> Self {
        Self::new(TypeMap::numpy())
    }
}

impl Driver {
    /// Create a driver using `types` as the base type map.
    #[must_use]
    pub const fn new(types: TypeMap) -> Self {
        Self { types }
    }

    #[must_use]
    pub const fn types(&self) -> &TypeMap {
        &self.types
    }

    /// Load and render one directory.
    ///
    /// # Errors
    ///
    /// Returns the descriptor or emission error, wrapped in
    /// [`Error::Directory`].
    pub fn plan_dir(&self, dir: &Path) -> Result<PlannedUnit> {
        let dir = std::path::absolute(dir).map_err(|e| Error::io(dir, e))?;
        self.plan_abs(&dir).map_err(|source| Error::Directory {
            dir,
            source: Box::new(source),
        })
    }

    fn plan_abs(&self, dir: &Path) -> Result<PlannedUnit> {
        let desc = Descriptor::load(dir)?;

        let files = if desc.types.is_empty() {
            emit_concrete(&desc.unit, &self.types)?
        } else {
            let mut types = self.types.clone();
            types.extend(desc.types);
            emit_concrete(&desc.unit, &types)?
        };

        debug!(
            dir = %dir.display(),
            header = %desc.unit.header,
            funcs = desc.unit.funcs.len(),
            "planned unit"
        );
        Ok(PlannedUnit {
            dir: dir.to_path_buf(),
            dest_dir: desc.output_dir,
            num_wrappers: desc.unit.num_wrappers(),
            files,
        })
    }

    /// Load and render every directory, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// See [`Driver::plan_dir`].
    pub fn plan<P: AsRef<Path>>(&self, dirs: &[P]) -> Result<Vec<PlannedUnit>> {
        dirs.iter().map(|dir| self.plan_dir(dir.as_ref())).collect()
    }

    /// Generate files for every directory.
    ///
    /// Returns the paths written, in directory order.
    ///
    /// # Errors
    ///
    /// Planning errors (nothing written) or I/O errors while committing.
    pub fn run<P: AsRef<Path>>(&self, dirs: &[P]) -> Result<Vec<PathBuf>> {
        let planned = self.plan(dirs)?;
        let mut written = Vec::new();
        for unit in &planned {
            written.extend(commit(unit)?);
        }
        Ok(written)
    }

    /// Generated files that are missing or out of date. Writes nothing.
    ///
    /// # Errors
    ///
    /// Planning errors, or I/O errors reading existing files.
    pub fn check<P: AsRef<Path>>(&self, dirs: &[P]) -> Result<Vec<PathBuf>> {
        let mut stale = Vec::new();
        for unit in self.plan(dirs)? {
            let unit_stale = unit.files.stale_files(&unit.dest_dir)?;
            debug!(dir = %unit.dir.display(), stale = unit_stale.len(), "checked unit");
            stale.extend(unit_stale);
        }
        Ok(stale)
    }
}

fn commit(unit: &PlannedUnit) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(&unit.dest_dir).map_err(|e| Error::io(&unit.dest_dir, e))?;
    let written = unit.files.write_to(&unit.dest_dir)?;
    info!(
        dir = %unit.dir.display(),
        header = %unit.files.header.name,
        source = %unit.files.source.name,
        wrappers = unit.num_wrappers,
        "generated"
    );
    Ok(written)
}

/// Emit `unit` and write its files into `dest_dir`.
///
/// The single-unit path: no descriptor file, no directory creation.
///
/// # Errors
///
/// Any emission error (nothing written) or an I/O error while writing.
pub fn generate(unit: &ConcreteUnit, types: &TypeMap, dest_dir: &Path) -> Result<Vec<PathBuf>> {
    let files = emit_concrete(unit, types)?;
    Ok(files.write_to(dest_dir)?)
}
