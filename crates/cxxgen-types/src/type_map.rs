//! Type tag table.
//!
//! Maps single-character `NumPy` type tags to the C spelling used in generated
//! prototypes and to the `NPY_*` type id used by dispatch tables.

use rustc_hash::FxHashMap;

use crate::{Result, TypeError};

/// One type map entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeEntry {
    /// C/C++ spelling, e.g. `long double`.
    pub ctype: String,
    /// `NumPy` type id, e.g. `NPY_LONGDOUBLE`.
    pub npy: String,
}

impl TypeEntry {
    #[must_use]
    pub fn new(ctype: impl Into<String>, npy: impl Into<String>) -> Self {
        Self {
            ctype: ctype.into(),
            npy: npy.into(),
        }
    }
}

/// Standard `NumPy` type characters: (tag, C spelling, `NumPy` id).
const NUMPY_TYPES: &[(char, &str, &str)] = &[
    ('?', "npy_bool", "NPY_BOOL"),
    ('b', "signed char", "NPY_BYTE"),
    ('B', "unsigned char", "NPY_UBYTE"),
    ('h', "short", "NPY_SHORT"),
    ('H', "unsigned short", "NPY_USHORT"),
    ('i', "int", "NPY_INT"),
    ('I', "unsigned int", "NPY_UINT"),
    ('l', "long", "NPY_LONG"),
    ('L', "unsigned long", "NPY_ULONG"),
    ('q', "long long", "NPY_LONGLONG"),
    ('Q', "unsigned long long", "NPY_ULONGLONG"),
    ('f', "float", "NPY_FLOAT"),
    ('d', "double", "NPY_DOUBLE"),
    ('g', "long double", "NPY_LONGDOUBLE"),
];

/// Tag → type association.
///
/// Passed explicitly to the emitter and driver; there is no process-wide
/// table. Lookups of tags without an entry fail with
/// [`TypeError::UnknownTypeTag`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeMap {
    entries: FxHashMap<char, TypeEntry>,
}

impl TypeMap {
    /// Map with no entries.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Standard `NumPy` integer, bool and floating point types.
    #[must_use]
    pub fn numpy() -> Self {
        let mut map = Self::empty();
        for &(tag, ctype, npy) in NUMPY_TYPES {
            map.insert(tag, TypeEntry::new(ctype, npy));
        }
        map
    }

    /// Add or replace the entry for `tag`.
    pub fn insert(&mut self, tag: char, entry: TypeEntry) -> Option<TypeEntry> {
        self.entries.insert(tag, entry)
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, tag: char, ctype: &str, npy: &str) -> Self {
        self.insert(tag, TypeEntry::new(ctype, npy));
        self
    }

    /// Overlay entries, replacing existing tags.
    pub fn extend(&mut self, entries: impl IntoIterator<Item = (char, TypeEntry)>) {
        self.entries.extend(entries);
    }

    /// Look up the full entry for `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::UnknownTypeTag`] if `tag` has no entry.
    pub fn get(&self, tag: char) -> Result<&TypeEntry> {
        self.entries.get(&tag).ok_or(TypeError::UnknownTypeTag(tag))
    }

    /// C spelling for `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::UnknownTypeTag`] if `tag` has no entry.
    pub fn ctype(&self, tag: char) -> Result<&str> {
        self.get(tag).map(|e| e.ctype.as_str())
    }

    /// `NumPy` type id for `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::UnknownTypeTag`] if `tag` has no entry.
    pub fn npy_type(&self, tag: char) -> Result<&str> {
        self.get(tag).map(|e| e.npy.as_str())
    }

    #[must_use]
    pub fn contains(&self, tag: char) -> bool {
        self.entries.contains_key(&tag)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse a type tag key from configuration.
///
/// # Errors
///
/// Returns [`TypeError::InvalidTypeTag`] unless `key` is exactly one character.
pub fn parse_type_tag(key: &str) -> Result<char> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(tag), None) => Ok(tag),
        _ => Err(TypeError::InvalidTypeTag(key.to_string())),
    }
}
