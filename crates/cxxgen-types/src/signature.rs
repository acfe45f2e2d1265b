//! Type signature parsing and name mangling.
//!
//! Signatures use `NumPy` ufunc notation: input tags, `->`, one output tag.
//! - `"fff->f"` splits into inputs `['f', 'f', 'f']` and output `'f'`
//! - the symbol suffix replaces the separator: `"fff->f"` → `"fff_f"`

use std::fmt;
use std::str::FromStr;

use crate::{Result, TypeError};

/// Separator between input and output tags.
pub const SIGNATURE_SEPARATOR: &str = "->";

/// Header extensions accepted by [`derive_generated_names`].
pub const HEADER_EXTENSIONS: &[&str] = &["h", "hh", "hpp", "h++"];

/// Suffix appended to the header root for generated files.
pub const CONCRETE_SUFFIX: &str = "_concrete";

/// Symbol suffix for a signature: every `->` replaced with `_`.
///
/// Accepts any string; validity is the caller's concern.
#[must_use]
pub fn mangle(signature: &str) -> String {
    signature.replace(SIGNATURE_SEPARATOR, "_")
}

/// Split a signature into input tags and the output tag.
///
/// # Errors
///
/// Returns [`TypeError::MalformedSignature`] unless the signature contains
/// exactly one `->` followed by exactly one character.
pub fn split_signature(signature: &str) -> Result<(Vec<char>, char)> {
    let malformed = || TypeError::MalformedSignature(signature.to_string());

    let (inputs, output) = signature
        .split_once(SIGNATURE_SEPARATOR)
        .ok_or_else(malformed)?;
    if output.contains(SIGNATURE_SEPARATOR) {
        return Err(malformed());
    }

    let mut out_chars = output.chars();
    let (Some(out), None) = (out_chars.next(), out_chars.next()) else {
        return Err(malformed());
    };

    Ok((inputs.chars().collect(), out))
}

/// Generated file names for a header: `(<root>_concrete.h, <root>_concrete.cxx)`.
///
/// The extension is taken after the last `.` of the final path component,
/// ignoring leading dots (`.h` has no extension).
///
/// # Errors
///
/// Returns [`TypeError::UnsupportedHeaderExtension`] unless the extension is
/// one of [`HEADER_EXTENSIONS`].
pub fn derive_generated_names(header: &str) -> Result<(String, String)> {
    let root = header_root(header)?;
    Ok((
        format!("{root}{CONCRETE_SUFFIX}.h"),
        format!("{root}{CONCRETE_SUFFIX}.cxx"),
    ))
}

/// Check that `header` is a bare file name with a recognized extension.
///
/// Generated files are placed next to each other in one output directory,
/// so the name may not contain `/` or `\`.
///
/// # Errors
///
/// Returns [`TypeError::HeaderPath`] for a name with directory components,
/// otherwise as [`header_root`].
pub fn validate_header_name(header: &str) -> Result<()> {
    if header.contains(['/', '\\']) {
        return Err(TypeError::HeaderPath(header.to_string()));
    }
    header_root(header).map(|_| ())
}

/// Header name without its extension.
///
/// # Errors
///
/// Returns [`TypeError::UnsupportedHeaderExtension`] unless the extension is
/// one of [`HEADER_EXTENSIONS`].
pub fn header_root(header: &str) -> Result<&str> {
    match split_extension(header) {
        (root, Some(ext)) if HEADER_EXTENSIONS.contains(&ext) => Ok(root),
        _ => Err(TypeError::UnsupportedHeaderExtension(header.to_string())),
    }
}

/// Split `name` into root and extension (without the dot).
fn split_extension(name: &str) -> (&str, Option<&str>) {
    let base_start = name.rfind(['/', '\\']).map_or(0, |i| i + 1);
    let base = &name[base_start..];
    let stem_start = base_start + (base.len() - base.trim_start_matches('.').len());

    match name[stem_start..].rfind('.') {
        Some(dot) => {
            let dot = stem_start + dot;
            (&name[..dot], Some(&name[dot + 1..]))
        }
        None => (name, None),
    }
}

/// A validated type signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeSignature {
    text: String,
    inputs: Vec<char>,
    output: char,
}

impl TypeSignature {
    /// Parse and validate a signature.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::MalformedSignature`] as [`split_signature`] does.
    pub fn parse(text: &str) -> Result<Self> {
        let (inputs, output) = split_signature(text)?;
        Ok(Self {
            text: text.to_string(),
            inputs,
            output,
        })
    }

    /// Source text, e.g. `"dd->d"`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn inputs(&self) -> &[char] {
        &self.inputs
    }

    #[must_use]
    pub const fn output(&self) -> char {
        self.output
    }

    /// Number of inputs.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.inputs.len()
    }

    /// Symbol suffix, e.g. `"dd_d"`.
    #[must_use]
    pub fn mangled(&self) -> String {
        mangle(&self.text)
    }
}

impl FromStr for TypeSignature {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mangle() {
        assert_eq!(mangle("fff->f"), "fff_f");
        assert_eq!(mangle("dd->d"), "dd_d");
        assert_eq!(mangle("no separator"), "no separator");
        assert_eq!(mangle("a->b->c"), "a_b_c");
    }

    #[test]
    fn test_split_signature() {
        assert_eq!(split_signature("fff->f").unwrap(), (vec!['f', 'f', 'f'], 'f'));
        assert_eq!(split_signature("fd->g").unwrap(), (vec!['f', 'd'], 'g'));
        assert_eq!(split_signature("->d").unwrap(), (vec![], 'd'));
    }

    #[test]
    fn test_split_signature_malformed() {
        for bad in ["ff->fd", "ff->", "ff", "", "f->f->f", "f-f"] {
            assert_eq!(
                split_signature(bad),
                Err(TypeError::MalformedSignature(bad.to_string())),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_derive_generated_names() {
        for header in ["foo.h", "foo.hh", "foo.hpp", "foo.h++"] {
            assert_eq!(
                derive_generated_names(header).unwrap(),
                ("foo_concrete.h".to_string(), "foo_concrete.cxx".to_string()),
                "{header}"
            );
        }
    }

    #[test]
    fn test_derive_generated_names_keeps_dotted_root() {
        assert_eq!(
            derive_generated_names("log_expit.v2.h").unwrap(),
            (
                "log_expit.v2_concrete.h".to_string(),
                "log_expit.v2_concrete.cxx".to_string()
            )
        );
        assert_eq!(
            derive_generated_names("sub.dir/step.hpp").unwrap(),
            (
                "sub.dir/step_concrete.h".to_string(),
                "sub.dir/step_concrete.cxx".to_string()
            )
        );
    }

    #[test]
    fn test_derive_generated_names_rejects() {
        for header in ["foo.c", "foo.cxx", "foo", ".h", "foo.H", "dir.h/foo"] {
            assert_eq!(
                derive_generated_names(header),
                Err(TypeError::UnsupportedHeaderExtension(header.to_string())),
                "{header}"
            );
        }
    }

    #[test]
    fn test_header_root() {
        assert_eq!(header_root("yeo_johnson.h"), Ok("yeo_johnson"));
        assert_eq!(header_root("step.h++"), Ok("step"));
        assert!(header_root("step.cpp").is_err());
    }

    #[test]
    fn test_validate_header_name() {
        assert_eq!(validate_header_name("add.h"), Ok(()));
        assert_eq!(validate_header_name("log_expit.v2.hpp"), Ok(()));
        for header in ["sub/add.h", "../x.h", "..\\x.h", "/abs/add.h"] {
            assert_eq!(
                validate_header_name(header),
                Err(TypeError::HeaderPath(header.to_string())),
                "{header}"
            );
        }
        assert_eq!(
            validate_header_name("add.c"),
            Err(TypeError::UnsupportedHeaderExtension("add.c".to_string()))
        );
    }

    #[test]
    fn test_type_signature() {
        let sig: TypeSignature = "dd->d".parse().unwrap();
        assert_eq!(sig.inputs(), &['d', 'd']);
        assert_eq!(sig.output(), 'd');
        assert_eq!(sig.arity(), 2);
        assert_eq!(sig.mangled(), "dd_d");
        assert_eq!(sig.to_string(), "dd->d");
        assert!("ff->fd".parse::<TypeSignature>().is_err());
    }
}
