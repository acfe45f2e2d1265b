//! Per-directory descriptor files.
//!
//! Each target directory holds a `cxxgen.toml`:
//!
//! ```toml
//! header = "log_expit.h"
//!
//! [[funcs]]
//! name = "log_expit"
//! cxxname = "log_expit"
//! types = ["f->f", "d->d", "g->g"]
//! ```
//!
//! Optional keys: `output_dir` (default `generated`), `include` (default
//! `../<header>`) and a `[types]` table adding tags to the type map.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use cxxgen_emit::{ConcreteUnit, DEFAULT_OUTPUT_DIR};
use cxxgen_types::{Func, TypeEntry, parse_type_tag, validate_header_name};
use serde::Deserialize;
use tracing::debug;

use crate::{Error, Result};

/// Descriptor file name inside each target directory.
pub const DESCRIPTOR_FILE: &str = "cxxgen.toml";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDescriptor {
    header: String,
    output_dir: Option<String>,
    include: Option<String>,
    #[serde(default)]
    types: BTreeMap<String, RawType>,
    #[serde(default)]
    funcs: Vec<RawFunc>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawType {
    ctype: String,
    npy: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFunc {
    name: String,
    cxxname: String,
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTypesFile {
    #[serde(default)]
    types: BTreeMap<String, RawType>,
}

/// A loaded, validated descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Descriptor {
    /// Directory holding the descriptor.
    pub dir: PathBuf,
    /// Where generated files go.
    pub output_dir: PathBuf,
    /// Type map additions, applied before emission.
    pub types: Vec<(char, TypeEntry)>,
    pub unit: ConcreteUnit,
}

impl Descriptor {
    /// Load `<dir>/cxxgen.toml`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, [`Error::Descriptor`]
    /// if it is not valid TOML for this schema, and [`Error::Type`] for a bad
    /// header name, type tag or signature.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(DESCRIPTOR_FILE);
        let text = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        debug!(path = %path.display(), "loaded descriptor");
        Self::parse(dir, &path, &text)
    }

    /// Parse descriptor text; `path` is used for error messages only.
    ///
    /// # Errors
    ///
    /// See [`Descriptor::load`].
    pub fn parse(dir: &Path, path: &Path, text: &str) -> Result<Self> {
        let raw: RawDescriptor = toml::from_str(text).map_err(|source| Error::Descriptor {
            path: path.to_path_buf(),
            source,
        })?;

        validate_header_name(&raw.header)?;
        let types = convert_types(raw.types)?;
        let funcs = raw
            .funcs
            .into_iter()
            .map(|f| Func::new(f.name, f.cxxname, f.types))
            .collect::<cxxgen_types::Result<Vec<_>>>()?;

        let mut unit = ConcreteUnit::new(raw.header, funcs);
        if let Some(include) = raw.include {
            unit = unit.with_include(include);
        }
        let output_dir = dir.join(raw.output_dir.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR));

        Ok(Self {
            dir: dir.to_path_buf(),
            output_dir,
            types,
            unit,
        })
    }
}

/// Load a standalone `[types]` table, e.g. for `--types`.
///
/// # Errors
///
/// Returns [`Error::Io`], [`Error::Descriptor`] or [`Error::Type`] for a key
/// that is not a single character.
pub fn load_type_entries(path: &Path) -> Result<Vec<(char, TypeEntry)>> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let raw: RawTypesFile = toml::from_str(&text).map_err(|source| Error::Descriptor {
        path: path.to_path_buf(),
        source,
    })?;
    convert_types(raw.types)
}

fn convert_types(raw: BTreeMap<String, RawType>) -> Result<Vec<(char, TypeEntry)>> {
    raw.into_iter()
        .map(|(key, ty)| -> Result<_> {
            Ok((parse_type_tag(&key)?, TypeEntry::new(ty.ctype, ty.npy)))
        })
        .collect()
}
