use aidl_ir_grammar::ast::TypeRef;

use crate::import::{ImportDefList, ImportKind};

/// Fixed mapping for complex leaf types that don't come from an import
/// (§4.4).
const COMPLEX_TABLE: &[(&str, &str)] = &[
    ("IBinder", "readStrongBinder"),
    ("android.os.IBinder", "readStrongBinder"),
    ("Bundle", "readBundle"),
    ("android.os.Bundle", "readBundle"),
];

const PRIMITIVES: &[&str] =
    &["int", "long", "short", "byte", "float", "double", "boolean", "char", "String"];

/// Maps a type AST node to a call-script operation string (§4.4).
pub struct TypeHandler<'a> {
    imports: &'a ImportDefList<'a>,
    package: Option<&'a str>,
}

impl<'a> TypeHandler<'a> {
    pub fn new(imports: &'a ImportDefList<'a>, package: Option<&'a str>) -> Self {
        TypeHandler { imports, package }
    }

    pub fn call_of(&self, type_ref: &TypeRef) -> String {
        match type_ref {
            // The `Vector` suffix belongs right after the verb and before any
            // `:qname` suffix (§4.4) - build the parts separately so an array
            // of an imported/fallback parcelable reads `readParcelableVector:Foo`,
            // not `readParcelable:FooVector`.
            TypeRef::Array(inner) => {
                let (verb, qname) = self.scalar_parts(inner);
                render(format!("{verb}Vector"), qname)
            }
            other => {
                let (verb, qname) = self.scalar_parts(other);
                render(verb, qname)
            }
        }
    }

    fn scalar_parts(&self, type_ref: &TypeRef) -> (String, Option<String>) {
        match type_ref {
            TypeRef::Array(inner) => self.scalar_parts(inner),
            TypeRef::Generic { base, args } => self.generic_parts(base, args),
            TypeRef::Named(name) => self.named_parts(name),
        }
    }

    fn named_parts(&self, name: &str) -> (String, Option<String>) {
        if let Some(verb) = primitive_verb(name) {
            return (verb, None);
        }
        let simple = simple_name(name);
        if let Some((_, verb)) = COMPLEX_TABLE.iter().find(|(n, _)| *n == name || *n == simple) {
            return (verb.to_string(), None);
        }
        if let Some(import) = self.imports.get_by_simple_name(simple) {
            return match import.kind {
                ImportKind::Binder => ("readStrongBinder".to_string(), None),
                _ => ("readParcelable".to_string(), Some(import.qname.to_string())),
            };
        }
        // Unknown reference: assume a sibling parcelable in the same package
        // directory (§4.4, "Unknown reference").
        ("readParcelable".to_string(), Some(self.qualify(simple)))
    }

    fn generic_parts(&self, base: &str, args: &[TypeRef]) -> (String, Option<String>) {
        match simple_name(base) {
            "List" => match args.first() {
                None => ("readParcelable".to_string(), Some("java.util.List".to_string())),
                Some(arg) => ("readList".to_string(), Some(self.element_type_name(arg))),
            },
            "ParceledListSlice" => match args.first() {
                None => (
                    "readParcelable".to_string(),
                    Some("android.content.pm.ParceledListSlice".to_string()),
                ),
                Some(arg) => ("readParceledListSlice".to_string(), Some(self.element_type_name(arg))),
            },
            _ => self.named_parts(base),
        }
    }

    /// The QName (or complex-table verb target) backing a `List<T>`/
    /// `ParceledListSlice<T>` type argument.
    fn element_type_name(&self, type_ref: &TypeRef) -> String {
        let name = type_ref.simple_name();
        if let Some((_, verb)) = COMPLEX_TABLE.iter().find(|(n, _)| simple_name(n) == name) {
            return verb.to_string();
        }
        if let Some(import) = self.imports.get_by_simple_name(name) {
            return import.qname.to_string();
        }
        name.to_string()
    }

    fn qualify(&self, simple: &str) -> String {
        match self.package {
            Some(pkg) => format!("{pkg}.{simple}"),
            None => simple.to_string(),
        }
    }
}

fn render(verb: String, qname: Option<String>) -> String {
    match qname {
        Some(qname) => format!("{verb}:{qname}"),
        None => verb,
    }
}

fn simple_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

fn primitive_verb(name: &str) -> Option<String> {
    if !PRIMITIVES.contains(&name) {
        return None;
    }
    let mut chars = name.chars();
    let first = chars.next()?.to_ascii_uppercase();
    Some(format!("read{first}{}", chars.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aidl_ir_loader::Loader;

    fn handler<'a>(imports: &'a ImportDefList<'a>) -> TypeHandler<'a> {
        TypeHandler::new(imports, Some("com.example"))
    }

    #[test]
    fn primitive_types_map_to_capitalized_read_verb() {
        let loader = Loader::new(vec![]);
        let imports = ImportDefList::new(&loader);
        let h = handler(&imports);
        assert_eq!(h.call_of(&TypeRef::Named("int".into())), "readInt");
        assert_eq!(h.call_of(&TypeRef::Named("String".into())), "readString");
        assert_eq!(h.call_of(&TypeRef::Named("boolean".into())), "readBoolean");
    }

    #[test]
    fn array_appends_vector_suffix() {
        let loader = Loader::new(vec![]);
        let imports = ImportDefList::new(&loader);
        let h = handler(&imports);
        let ty = TypeRef::Array(Box::new(TypeRef::Named("int".into())));
        assert_eq!(h.call_of(&ty), "readIntVector");
    }

    #[test]
    fn ibinder_maps_through_complex_table() {
        let loader = Loader::new(vec![]);
        let imports = ImportDefList::new(&loader);
        let h = handler(&imports);
        assert_eq!(h.call_of(&TypeRef::Named("IBinder".into())), "readStrongBinder");
    }

    #[test]
    fn bundle_maps_through_complex_table() {
        let loader = Loader::new(vec![]);
        let imports = ImportDefList::new(&loader);
        let h = handler(&imports);
        assert_eq!(h.call_of(&TypeRef::Named("Bundle".into())), "readBundle");
        assert_eq!(h.call_of(&TypeRef::Named("android.os.Bundle".into())), "readBundle");
    }

    #[test]
    fn bare_list_with_no_argument_maps_to_java_util_list() {
        let loader = Loader::new(vec![]);
        let imports = ImportDefList::new(&loader);
        let h = handler(&imports);
        let ty = TypeRef::Generic { base: "List".into(), args: vec![] };
        assert_eq!(h.call_of(&ty), "readParcelable:java.util.List");
    }

    #[test]
    fn array_of_unresolved_parcelable_inserts_vector_before_the_qname_suffix() {
        // Regression: the `Vector` suffix must land right after the verb,
        // not at the end of the whole `verb:qname` string - otherwise the
        // qname itself gets corrupted (`FooVector` instead of `Foo`).
        let loader = Loader::new(vec![]);
        let imports = ImportDefList::new(&loader);
        let h = handler(&imports);
        let ty = TypeRef::Array(Box::new(TypeRef::Named("Foo".into())));
        assert_eq!(h.call_of(&ty), "readParcelableVector:com.example.Foo");
    }

    #[test]
    fn unresolved_reference_falls_back_to_enclosing_package() {
        let loader = Loader::new(vec![]);
        let imports = ImportDefList::new(&loader);
        let h = handler(&imports);
        assert_eq!(
            h.call_of(&TypeRef::Named("Unknown".into())),
            "readParcelable:com.example.Unknown"
        );
    }
}
