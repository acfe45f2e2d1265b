//! Writing generated files to disk.
//!
//! Each file is written to a temporary file in the destination directory and
//! renamed into place only after both halves of the pair were written, so a
//! failed run never leaves a truncated file under a generated name.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, trace};

use crate::{EmitError, Result};

/// One generated file held in memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedFile {
    /// File name relative to the destination directory.
    pub name: String,
    pub contents: String,
}

impl GeneratedFile {
    #[must_use]
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }

    /// Whether `dest_dir` already holds this file with identical contents.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError::Io`] if an existing file cannot be read.
    pub fn is_current(&self, dest_dir: &Path) -> Result<bool> {
        let path = dest_dir.join(&self.name);
        match fs::read(&path) {
            Ok(existing) => Ok(existing == self.contents.as_bytes()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(EmitError::io(path, e)),
        }
    }

    /// Permissions of the file this one replaces, if it exists.
    fn existing_permissions(&self, dest_dir: &Path) -> Result<Option<fs::Permissions>> {
        let path = dest_dir.join(&self.name);
        match fs::metadata(&path) {
            Ok(meta) => Ok(Some(meta.permissions())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(EmitError::io(path, e)),
        }
    }

    fn stage(&self, dest_dir: &Path) -> Result<NamedTempFile> {
        let existing = self.existing_permissions(dest_dir)?;
        let mut tmp = create_temp(dest_dir).map_err(|e| EmitError::io(dest_dir, e))?;
        let tmp_path = tmp.path().to_path_buf();
        if let Some(perms) = existing {
            tmp.as_file()
                .set_permissions(perms)
                .map_err(|e| EmitError::io(&tmp_path, e))?;
        }
        tmp.write_all(self.contents.as_bytes())
            .map_err(|e| EmitError::io(&tmp_path, e))?;
        tmp.flush().map_err(|e| EmitError::io(&tmp_path, e))?;
        Ok(tmp)
    }
}

/// Temporary file in `dest_dir` created with the mode a plain `open` would
/// use (0666 less the umask), not the owner-only default of `tempfile`.
#[cfg(unix)]
fn create_temp(dest_dir: &Path) -> io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    tempfile::Builder::new()
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dest_dir)
}

#[cfg(not(unix))]
fn create_temp(dest_dir: &Path) -> io::Result<NamedTempFile> {
    NamedTempFile::new_in(dest_dir)
}

/// The header/source pair generated for one header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedFiles {
    pub header: GeneratedFile,
    pub source: GeneratedFile,
}

impl GeneratedFiles {
    /// Both files, header first.
    #[must_use]
    pub fn files(&self) -> [&GeneratedFile; 2] {
        [&self.header, &self.source]
    }

    /// Write both files into `dest_dir`, replacing existing files.
    ///
    /// Returns the paths written, header first. Existing files are never
    /// read; a replaced file keeps its permissions. Nothing is replaced
    /// unless both files were staged successfully.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError::Io`] if staging or renaming fails.
    pub fn write_to(&self, dest_dir: &Path) -> Result<Vec<PathBuf>> {
        let staged = self
            .files()
            .into_iter()
            .map(|file| file.stage(dest_dir).map(|tmp| (file, tmp)))
            .collect::<Result<Vec<_>>>()?;

        let mut written = Vec::with_capacity(staged.len());
        for (file, tmp) in staged {
            let path = dest_dir.join(&file.name);
            tmp.persist(&path)
                .map_err(|e| EmitError::io(&path, e.error))?;
            trace!(path = %path.display(), bytes = file.contents.len(), "wrote generated file");
            written.push(path);
        }
        debug!(dir = %dest_dir.display(), "unit written");
        Ok(written)
    }

    /// Paths under `dest_dir` that are missing or differ from this pair.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError::Io`] if an existing file cannot be read.
    pub fn stale_files(&self, dest_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut stale = Vec::new();
        for file in self.files() {
            if !file.is_current(dest_dir)? {
                stale.push(dest_dir.join(&file.name));
            }
        }
        Ok(stale)
    }
}
