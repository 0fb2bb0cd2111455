//! Content-addressed cache and resolver over AIDL, Java-dialect, and
//! precompiled JSON source units (§4.1, "Loader" in the system design).

mod cache;
mod error;
pub mod resolve;
mod unit;

pub use cache::Loader;
pub use error::LoaderError;
pub use unit::{Unit, UnitBody};

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use aidl_ir_model::QName;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("aidl-ir-loader-test-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn loads_a_simple_interface() {
        let root = scratch_dir("interface");
        fs::write(
            root.join("IFoo.aidl"),
            "package com.example;\ninterface IFoo {\n  void bar(int a, in String b);\n}\n",
        )
        .unwrap();

        let loader = Loader::new(vec![root]);
        let unit = loader.load(&QName::new("com.example.IFoo").unwrap()).unwrap();
        assert!(matches!(&*unit.body.borrow(), UnitBody::Interface(decl) if decl.methods.len() == 1));
    }

    #[test]
    fn caches_on_second_load() {
        let root = scratch_dir("cache");
        fs::write(root.join("Foo.aidl"), "parcelable Foo { int x; }\n").unwrap();

        let loader = Loader::new(vec![root]);
        let qname = QName::new("Foo").unwrap();
        let a = loader.load(&qname).unwrap();
        let b = loader.load(&qname).unwrap();
        assert!(std::rc::Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn forward_declared_parcelable_falls_back_to_sibling_java() {
        let root = scratch_dir("forward-decl");
        fs::write(root.join("Foo.aidl"), "package com.example;\nparcelable Foo;\n").unwrap();
        fs::write(
            root.join("Foo.java"),
            "package com.example;\n\
             public class Foo implements Parcelable {\n\
             public int describeContents() { return 0; }\n\
             }\n",
        )
        .unwrap();

        let loader = Loader::new(vec![root]);
        let unit = loader.load(&QName::new("com.example.Foo").unwrap()).unwrap();
        assert!(matches!(&*unit.body.borrow(), UnitBody::JavaClass(class) if class.name == "Foo"));
    }

    #[test]
    fn wildcard_import_skips_unrecognized_extensions() {
        // S6: `foo.bar.*` over A.aidl, B.json, C.txt yields exactly two units.
        let root = scratch_dir("wildcard");
        let pkg_dir = root.join("foo").join("bar");
        fs::create_dir_all(&pkg_dir).unwrap();
        fs::write(pkg_dir.join("A.aidl"), "package foo.bar;\nparcelable A { int x; }\n").unwrap();
        fs::write(
            pkg_dir.join("B.json"),
            r#"{"qname":"foo.bar.B","type":"PARCELABLE","fields":[{}]}"#,
        )
        .unwrap();
        fs::write(pkg_dir.join("C.txt"), "not a unit").unwrap();

        let loader = Loader::new(vec![root]);
        let units = loader.resolve(&QName::new("foo.bar.*").unwrap()).unwrap();
        assert_eq!(units.len(), 2);
    }

    #[test]
    fn nested_class_resolves_against_outer_unit() {
        let root = scratch_dir("nested");
        fs::write(
            root.join("Outer.java"),
            "public class Outer implements Parcelable {\n\
             public int describeContents() { return 0; }\n\
             static class Inner {\n\
             int x;\n\
             }\n\
             }\n",
        )
        .unwrap();

        let loader = Loader::new(vec![root]);
        let unit = loader.load(&QName::new("Outer.Inner").unwrap()).unwrap();
        assert!(matches!(&*unit.body.borrow(), UnitBody::JavaClass(class) if class.name == "Inner"));
    }

    #[test]
    fn missing_inner_class_resolves_to_a_phantom_unit() {
        // §4.1's last-resort fallback: `Outer.Missing` names a class that
        // doesn't exist anywhere in Outer.java, so the loader fabricates an
        // empty phantom unit rather than failing the lookup.
        let root = scratch_dir("phantom");
        fs::write(
            root.join("Outer.java"),
            "public class Outer implements Parcelable {\n\
             public int describeContents() { return 0; }\n\
             }\n",
        )
        .unwrap();

        let loader = Loader::new(vec![root]);
        let unit = loader.load(&QName::new("Outer.Missing").unwrap()).unwrap();
        assert!(matches!(
            &*unit.body.borrow(),
            UnitBody::JavaClass(class) if class.name == "Missing" && class.fields.is_empty()
        ));
    }

    #[test]
    fn missing_unit_reports_file_not_found() {
        let root = scratch_dir("missing");
        let loader = Loader::new(vec![root]);
        let err = loader.load(&QName::new("com.example.Missing").unwrap()).unwrap_err();
        assert!(matches!(err, LoaderError::FileNotFound { .. }));
    }
}
