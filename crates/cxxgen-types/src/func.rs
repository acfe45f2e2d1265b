//! Function descriptors.

use crate::{Result, TypeError, TypeSignature};

/// A templated function and the concrete signatures to instantiate.
///
/// Signatures are validated on construction: each must parse, all must share
/// one arity, and none may repeat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Func {
    name: String,
    cxxname: String,
    signatures: Vec<TypeSignature>,
}

impl Func {
    /// Create a descriptor.
    ///
    /// * `name` - dispatch name, the prefix of every wrapper symbol.
    /// * `cxxname` - templated implementation the wrappers forward to.
    /// * `signatures` - type signatures, in emission order.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::MalformedSignature`], [`TypeError::ArityMismatch`]
    /// or [`TypeError::DuplicateSignature`].
    pub fn new<S: AsRef<str>>(
        name: impl Into<String>,
        cxxname: impl Into<String>,
        signatures: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        let name = name.into();
        let mut parsed: Vec<TypeSignature> = Vec::new();

        for text in signatures {
            let sig = TypeSignature::parse(text.as_ref())?;
            if let Some(expected) = parsed.first().map(TypeSignature::arity) {
                if expected != sig.arity() {
                    return Err(TypeError::ArityMismatch {
                        func: name,
                        signature: sig.to_string(),
                        expected,
                        actual: sig.arity(),
                    });
                }
            }
            if parsed.contains(&sig) {
                return Err(TypeError::DuplicateSignature {
                    func: name,
                    signature: sig.to_string(),
                });
            }
            parsed.push(sig);
        }

        Ok(Self {
            name,
            cxxname: cxxname.into(),
            signatures: parsed,
        })
    }

    /// Dispatch name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Templated implementation name.
    #[must_use]
    pub fn cxxname(&self) -> &str {
        &self.cxxname
    }

    #[must_use]
    pub fn signatures(&self) -> &[TypeSignature] {
        &self.signatures
    }

    /// Input count shared by all signatures, or `None` without signatures.
    #[must_use]
    pub fn arity(&self) -> Option<usize> {
        self.signatures.first().map(TypeSignature::arity)
    }

    /// Wrapper symbol for `sig`: `<name>_<mangled signature>`.
    #[must_use]
    pub fn wrapper_name(&self, sig: &TypeSignature) -> String {
        format!("{}_{}", self.name, sig.mangled())
    }
}
