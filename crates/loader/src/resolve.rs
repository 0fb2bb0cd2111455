use std::path::{Path, PathBuf};

use aidl_ir_model::QName;

/// The three source extensions the loader will probe, in probe order (§4.1:
/// `.aidl`, then `.java`, then a precompiled `.json` unit).
pub const EXTENSIONS: [&str; 3] = ["aidl", "java", "json"];

/// Turns a dotted qualified name into the relative, extension-less file path
/// the loader should look for under each search root.
///
/// AIDL nested types are addressed as `pkg.Outer.Inner`, but live on disk as
/// `pkg/Outer.aidl` (or `.java`) with `Inner` resolved against `Outer`'s
/// parsed body, never as `pkg/Outer/Inner`. So rather than naively joining
/// every segment with `/`, we find the contiguous run of upper-case-initial
/// segments trailing the name (`k`, at least 1: the leaf type itself) and
/// collapse all but the first of that run into the file stem, e.g.
/// `a.b.Outer.Inner` (`k` = 2) becomes `a/b/Outer`, with `Inner` left for the
/// caller to resolve against the loaded `Outer` unit.
pub fn qname_to_relative_base(qname: &QName) -> String {
    let segments: Vec<&str> = qname.segments().collect();
    debug_assert!(!segments.is_empty());

    let mut k = 0usize;
    for seg in segments.iter().rev() {
        if starts_uppercase(seg) {
            k += 1;
        } else {
            break;
        }
    }
    let k = k.max(1);

    let strip = if k <= 1 { 0 } else { k - 1 };
    let keep = segments.len() - strip;
    segments[..keep].join("/")
}

fn starts_uppercase(segment: &str) -> bool {
    segment.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Probes `search_path` for `<root>/<base>.<ext>` in [`EXTENSIONS`] order,
/// returning the first existing file along with the extension it matched.
pub fn find_unit_file(search_path: &[PathBuf], base: &str) -> Option<(PathBuf, &'static str)> {
    for root in search_path {
        for ext in EXTENSIONS {
            let candidate = root.join(format!("{base}.{ext}"));
            if candidate.is_file() {
                return Some((candidate, ext));
            }
        }
    }
    None
}

/// Probes for a sibling file with the same base but a different extension,
/// used to find a hand-written `.java` parcelable body for an AIDL forward
/// declaration (§4.1).
pub fn find_sibling(dir_file: &Path, ext: &'static str) -> Option<PathBuf> {
    let candidate = dir_file.with_extension(ext);
    candidate.is_file().then_some(candidate)
}

/// Lists every regular file directly inside `dir` whose extension is one of
/// [`EXTENSIONS`], for resolving a `pkg.*` wildcard import (§4.1, S6).
pub fn list_unit_files(dir: &Path) -> Vec<(PathBuf, &'static str)> {
    let mut out = Vec::new();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return out;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if let Some(known) = EXTENSIONS.iter().find(|e| **e == ext) {
                out.push((path, *known));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qn(s: &str) -> QName {
        QName::new(s).unwrap()
    }

    #[test]
    fn simple_top_level_type() {
        assert_eq!(qname_to_relative_base(&qn("com.example.Foo")), "com/example/Foo");
    }

    #[test]
    fn nested_class_collapses_to_outer() {
        assert_eq!(qname_to_relative_base(&qn("com.example.Outer.Inner")), "com/example/Outer");
    }

    #[test]
    fn doubly_nested_class_collapses_to_outer() {
        assert_eq!(
            qname_to_relative_base(&qn("com.example.Outer.Middle.Inner")),
            "com/example/Outer"
        );
    }

    #[test]
    fn no_package() {
        assert_eq!(qname_to_relative_base(&qn("Foo")), "Foo");
    }
}
