//! Concrete instantiation generation.
//!
//! For a header `foo.h` generates:
//! - `foo_concrete.h`: one `extern "C"` prototype per (func, signature)
//! - `foo_concrete.cxx`: matching definitions forwarding to the template
//!
//! Wrappers appear in func order, then signature order within each func.

use std::collections::HashSet;
use std::fmt::Write;

use cxxgen_types::{
    Func, TypeMap, TypeSignature, derive_generated_names, header_root, validate_header_name,
};
use tracing::trace;

use crate::{ConcreteUnit, EmitError, GeneratedFile, GeneratedFiles, Result};

/// Closing lines shared by both generated files.
const EPILOGUE: &str = "}  // extern \"C\"\n\n#endif\n";

/// Which half of the pair is being rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FileKind {
    Header,
    Source,
}

/// A wrapper with its types resolved to C spellings.
struct Wrapper<'a> {
    name: String,
    cxxname: &'a str,
    out_ctype: &'a str,
    in_ctypes: Vec<&'a str>,
}

impl<'a> Wrapper<'a> {
    fn resolve(func: &'a Func, sig: &TypeSignature, types: &'a TypeMap) -> Result<Self> {
        let in_ctypes = sig
            .inputs()
            .iter()
            .map(|&tag| types.ctype(tag))
            .collect::<cxxgen_types::Result<Vec<_>>>()?;
        Ok(Self {
            name: func.wrapper_name(sig),
            cxxname: func.cxxname(),
            out_ctype: types.ctype(sig.output())?,
            in_ctypes,
        })
    }

    /// `<out> <name>(<in0> x0, <in1> x1, ...)`
    fn signature(&self) -> String {
        let params = self
            .in_ctypes
            .iter()
            .enumerate()
            .map(|(k, ctype)| format!("{ctype} x{k}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} {}({params})", self.out_ctype, self.name)
    }

    fn render_prototype(&self, s: &mut String) {
        writeln!(s, "{};", self.signature()).unwrap();
        s.push('\n');
    }

    fn render_definition(&self, s: &mut String) {
        let args = (0..self.in_ctypes.len())
            .map(|k| format!("x{k}"))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(s, "{}", self.signature()).unwrap();
        s.push_str("{\n");
        writeln!(s, "    return {}({args});", self.cxxname).unwrap();
        s.push_str("}\n\n");
    }
}

/// Include guard macro for a header root: `GENERATED_<ROOT>_H_`.
///
/// Characters that are not ASCII alphanumerics become `_` and letters are
/// uppercased, so distinct roots can share a guard (`a-b`, `a_b` and `A_B`
/// all give `GENERATED_A_B_H_`). Units whose generated headers are included
/// in one translation unit need roots that differ after this mapping.
#[must_use]
pub fn include_guard(root: &str) -> String {
    let ident: String = root
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("GENERATED_{ident}_H_")
}

fn gen_preamble(kind: FileKind, unit: &ConcreteUnit, guard: &str) -> String {
    let qualifier = match kind {
        FileKind::Header => " function prototypes for the",
        FileKind::Source => "",
    };
    format!(
        r#"// Do not edit this file!
// This file was generated automatically.
// It contains the{qualifier} concrete instantiations of the
// templated functions in {header}.
// These are the functions that will be called in the ufunc loops.

#ifndef {guard}
#define {guard}

#include "{include}"

extern "C" {{

"#,
        header = unit.header,
        include = unit.include,
    )
}

/// Generate the concrete header/source pair for `unit`.
///
/// Pure: nothing is written. Output is fully determined by the unit and the
/// type map, so repeated calls produce identical text.
///
/// # Errors
///
/// - [`cxxgen_types::TypeError::UnsupportedHeaderExtension`] or
///   [`cxxgen_types::TypeError::HeaderPath`] for a bad header name
/// - [`cxxgen_types::TypeError::UnknownTypeTag`] for a tag missing from `types`
/// - [`EmitError::DuplicateSymbol`] if two wrappers share a name
pub fn emit_concrete(unit: &ConcreteUnit, types: &TypeMap) -> Result<GeneratedFiles> {
    validate_header_name(&unit.header)?;
    let (header_name, source_name) = derive_generated_names(&unit.header)?;
    let guard = include_guard(header_root(&unit.header)?);

    let mut header = gen_preamble(FileKind::Header, unit, &guard);
    let mut source = gen_preamble(FileKind::Source, unit, &guard);
    let mut seen = HashSet::new();

    for func in &unit.funcs {
        for sig in func.signatures() {
            let wrapper = Wrapper::resolve(func, sig, types)?;
            if !seen.insert(wrapper.name.clone()) {
                return Err(EmitError::DuplicateSymbol(wrapper.name));
            }
            trace!(wrapper = %wrapper.name, cxxname = wrapper.cxxname, "emitting wrapper");
            wrapper.render_prototype(&mut header);
            wrapper.render_definition(&mut source);
        }
    }

    header.push_str(EPILOGUE);
    source.push_str(EPILOGUE);

    Ok(GeneratedFiles {
        header: GeneratedFile::new(header_name, header),
        source: GeneratedFile::new(source_name, source),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cxxgen_types::TypeError;

    fn add_unit() -> ConcreteUnit {
        let add = Func::new("add", "cxx_add", ["ff->f", "dd->d"]).unwrap();
        ConcreteUnit::new("add.h", vec![add])
    }

    #[test]
    fn test_include_guard() {
        assert_eq!(include_guard("log_expit"), "GENERATED_LOG_EXPIT_H_");
        assert_eq!(include_guard("a.b-c"), "GENERATED_A_B_C_H_");
        // Lossy: these roots need distinct names if included together.
        assert_eq!(include_guard("a-b"), include_guard("a_b"));
    }

    #[test]
    fn test_emit_add_header() {
        let files = emit_concrete(&add_unit(), &TypeMap::numpy()).unwrap();
        assert_eq!(files.header.name, "add_concrete.h");
        assert_eq!(
            files.header.contents,
            r#"// Do not edit this file!
// This file was generated automatically.
// It contains the function prototypes for the concrete instantiations of the
// templated functions in add.h.
// These are the functions that will be called in the ufunc loops.

#ifndef GENERATED_ADD_H_
#define GENERATED_ADD_H_

#include "../add.h"

extern "C" {

float add_ff_f(float x0, float x1);

double add_dd_d(double x0, double x1);

}  // extern "C"

#endif
"#
        );
    }

    #[test]
    fn test_emit_add_source() {
        let files = emit_concrete(&add_unit(), &TypeMap::numpy()).unwrap();
        assert_eq!(files.source.name, "add_concrete.cxx");
        assert_eq!(
            files.source.contents,
            r#"// Do not edit this file!
// This file was generated automatically.
// It contains the concrete instantiations of the
// templated functions in add.h.
// These are the functions that will be called in the ufunc loops.

#ifndef GENERATED_ADD_H_
#define GENERATED_ADD_H_

#include "../add.h"

extern "C" {

float add_ff_f(float x0, float x1)
{
    return cxx_add(x0, x1);
}

double add_dd_d(double x0, double x1)
{
    return cxx_add(x0, x1);
}

}  // extern "C"

#endif
"#
        );
    }

    #[test]
    fn test_emit_mixed_types() {
        let func = Func::new("scale", "scale_impl", ["fd->g", "Bi->q"]).unwrap();
        let unit = ConcreteUnit::new("scale.hpp", vec![func]).with_include("scale.hpp");
        let files = emit_concrete(&unit, &TypeMap::numpy()).unwrap();
        assert!(files.header.contents.contains("#include \"scale.hpp\"\n"));
        assert!(
            files
                .header
                .contents
                .contains("long double scale_fd_g(float x0, double x1);\n")
        );
        assert!(
            files
                .source
                .contents
                .contains("long long scale_Bi_q(unsigned char x0, int x1)\n{\n    return scale_impl(x0, x1);\n}\n")
        );
    }

    #[test]
    fn test_emit_unary_and_ternary() {
        let funcs = vec![
            Func::new("log_expit", "log_expit", ["f->f"]).unwrap(),
            Func::new("deadzone", "deadzone", ["ddd->d"]).unwrap(),
        ];
        let unit = ConcreteUnit::new("multi.h", funcs);
        let files = emit_concrete(&unit, &TypeMap::numpy()).unwrap();
        assert!(files.header.contents.contains("float log_expit_f_f(float x0);\n"));
        assert!(files.source.contents.contains("    return log_expit(x0);\n"));
        assert!(
            files
                .header
                .contents
                .contains("double deadzone_ddd_d(double x0, double x1, double x2);\n")
        );
        assert!(files.source.contents.contains("    return deadzone(x0, x1, x2);\n"));
    }

    #[test]
    fn test_emit_idempotent() {
        let unit = add_unit();
        let types = TypeMap::numpy();
        let first = emit_concrete(&unit, &types).unwrap();
        let second = emit_concrete(&unit, &types).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_emit_reorder_only_moves_definitions() {
        let types = TypeMap::numpy();
        let a = Func::new("a", "ia", ["f->f", "d->d"]).unwrap();
        let b = Func::new("b", "ib", ["dd->d"]).unwrap();
        let a_rev = Func::new("a", "ia", ["d->d", "f->f"]).unwrap();

        let forward = emit_concrete(&ConcreteUnit::new("x.h", vec![a, b.clone()]), &types).unwrap();
        let reordered =
            emit_concrete(&ConcreteUnit::new("x.h", vec![b, a_rev]), &types).unwrap();

        let mut lines_fwd: Vec<_> = forward.source.contents.lines().collect();
        let mut lines_rev: Vec<_> = reordered.source.contents.lines().collect();
        assert_ne!(lines_fwd, lines_rev);
        lines_fwd.sort_unstable();
        lines_rev.sort_unstable();
        assert_eq!(lines_fwd, lines_rev);

        let order: Vec<_> = reordered
            .header
            .contents
            .lines()
            .filter(|l| l.ends_with(");"))
            .collect();
        assert_eq!(
            order,
            [
                "double b_dd_d(double x0, double x1);",
                "double a_d_d(double x0);",
                "float a_f_f(float x0);",
            ]
        );
    }

    #[test]
    fn test_emit_unknown_tag() {
        let func = Func::new("add", "cxx_add", ["zz->z"]).unwrap();
        let unit = ConcreteUnit::new("add.h", vec![func]);
        let err = emit_concrete(&unit, &TypeMap::numpy()).unwrap_err();
        assert!(matches!(err, EmitError::Type(TypeError::UnknownTypeTag('z'))));
    }

    #[test]
    fn test_emit_minimal_type_map() {
        let types = TypeMap::empty().with('d', "double", "NPY_DOUBLE");
        assert!(emit_concrete(&ConcreteUnit::new("add.h", vec![]), &types).is_ok());
        let err = emit_concrete(&add_unit(), &types).unwrap_err();
        assert!(matches!(err, EmitError::Type(TypeError::UnknownTypeTag('f'))));
    }

    #[test]
    fn test_emit_bad_header() {
        let unit = ConcreteUnit::new("add.cpp", vec![]);
        let err = emit_concrete(&unit, &TypeMap::numpy()).unwrap_err();
        assert!(matches!(
            err,
            EmitError::Type(TypeError::UnsupportedHeaderExtension(ref h)) if h == "add.cpp"
        ));
    }

    #[test]
    fn test_emit_rejects_header_path() {
        for header in ["sub/add.h", "../add.h"] {
            let unit = ConcreteUnit::new(header, vec![]);
            let err = emit_concrete(&unit, &TypeMap::numpy()).unwrap_err();
            assert!(
                matches!(err, EmitError::Type(TypeError::HeaderPath(ref h)) if h == header),
                "{header}"
            );
        }
    }

    #[test]
    fn test_emit_duplicate_symbol() {
        let funcs = vec![
            Func::new("add", "cxx_add", ["ff->f"]).unwrap(),
            Func::new("add", "other_add", ["ff->f"]).unwrap(),
        ];
        let err = emit_concrete(&ConcreteUnit::new("add.h", funcs), &TypeMap::numpy()).unwrap_err();
        assert!(matches!(err, EmitError::DuplicateSymbol(ref s) if s == "add_ff_f"));
    }

    #[test]
    fn test_emit_empty_unit() {
        let files = emit_concrete(&ConcreteUnit::new("empty.h", vec![]), &TypeMap::numpy()).unwrap();
        assert!(files.header.contents.ends_with("extern \"C\" {\n\n}  // extern \"C\"\n\n#endif\n"));
        assert!(files.source.contents.ends_with("extern \"C\" {\n\n}  // extern \"C\"\n\n#endif\n"));
    }
}
