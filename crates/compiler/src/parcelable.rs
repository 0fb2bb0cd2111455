use aidl_ir_grammar::ast::{AidlFieldDecl, Block, ClassDecl, Expr, Stmt};
use aidl_ir_model::{ParcelableDef, QName, UnitType};

use crate::error::CompileError;
use crate::import::ImportDefList;
use crate::node_visitor::NodeVisitor;
use crate::preprocess::Preprocessor;
use crate::type_handler::TypeHandler;

/// Translates an AIDL `parcelable Foo { ... }` inline field list into a
/// `ParcelableDef` (§4.6, "For `PARCELABLE`").
pub fn as_parcelable(
    qname: &QName,
    fields: &[AidlFieldDecl],
    imports: &ImportDefList,
    package: Option<&str>,
) -> ParcelableDef {
    let handler = TypeHandler::new(imports, package);
    let field_defs = fields
        .iter()
        .filter(|f| !f.is_static)
        .map(|f| aidl_ir_model::Field::field(f.name.clone(), handler.call_of(&f.type_ref)))
        .collect();
    ParcelableDef::new(qname.clone(), UnitType::Parcelable, field_defs)
}

/// Translates a `PARCELABLE_JAVA` class (a `CREATOR`/constructor/
/// `readFromParcel` pattern) into a `ParcelableDef` (§4.6, "For
/// `PARCELABLE_JAVA`").
pub fn as_parcelable_java(
    qname: &QName,
    class: &ClassDecl,
    imports: &ImportDefList,
    package: Option<&str>,
) -> Result<ParcelableDef, CompileError> {
    let pre = Preprocessor::new(class);
    let types = TypeHandler::new(imports, package);
    let visitor = NodeVisitor::new(class, &pre, imports, &types);

    let (body, tracker) = entry_point(&pre, class)
        .ok_or_else(|| CompileError::NoEntryPoint { qname: qname.as_str().to_string() })?;

    let fields = visitor.translate_block(body, tracker);
    Ok(ParcelableDef::new(qname.clone(), UnitType::ParcelableJava, fields))
}

/// Pick the parcelable's translation entry point (§4.6): prefer
/// `createFromParcel` when it is itself a one-line constructor delegate
/// (swap straight to the constructor), otherwise use `createFromParcel`
/// directly, otherwise fall back to the bare `(Parcel)` constructor.
fn entry_point<'a>(pre: &Preprocessor<'a>, class: &'a ClassDecl) -> Option<(&'a Block, &'a str)> {
    if let Some((_, create_from_parcel)) = pre.get_creator() {
        if let Some(body) = &create_from_parcel.body {
            let tracker = &create_from_parcel.params[0].name;
            if is_constructor_delegate(body, tracker) {
                if let Some(ctor) = pre.get_parcel_constructor() {
                    return Some((&ctor.body, &ctor.params[0].name));
                }
            }
            return Some((body, tracker));
        }
    }
    pre.get_parcel_constructor().map(|ctor| (&ctor.body, ctor.params[0].name.as_str()))
}

/// A `createFromParcel` whose entire body is `return new Class(tracker);`
/// (§4.6: "prefer `createFromParcel` if it is a constructor delegate ...").
fn is_constructor_delegate(body: &Block, tracker: &str) -> bool {
    let [Stmt::Return(Some(Expr::New { args, .. }))] = body.as_slice() else { return false };
    args.len() == 1 && args[0].is_ident(tracker)
}

#[cfg(test)]
mod tests {
    use aidl_ir_grammar::ast::TypeRef;
    use aidl_ir_grammar::parse_java;
    use aidl_ir_loader::Loader;

    use super::*;

    #[test]
    fn aidl_declared_parcelable_emits_fields_in_order_skipping_static() {
        let loader = Loader::new(vec![]);
        let imports = ImportDefList::new(&loader);
        let fields = vec![
            AidlFieldDecl { name: "x".into(), type_ref: TypeRef::Named("int".into()), is_static: false },
            AidlFieldDecl {
                name: "CONST".into(),
                type_ref: TypeRef::Named("int".into()),
                is_static: true,
            },
            AidlFieldDecl { name: "y".into(), type_ref: TypeRef::Named("String".into()), is_static: false },
        ];
        let def = as_parcelable(&QName::new("Foo").unwrap(), &fields, &imports, None);
        assert_eq!(def.fields.len(), 2);
    }

    #[test]
    fn create_from_parcel_delegate_switches_to_constructor() {
        let src = r#"
            class Foo implements Parcelable {
                int flag;
                public static final Parcelable.Creator<Foo> CREATOR = new Parcelable.Creator<Foo>() {
                    public Foo createFromParcel(Parcel in) { return new Foo(in); }
                    public Foo[] newArray(int size) { return new Foo[size]; }
                };
                private Foo(Parcel in) { flag = in.readInt(); }
            }
        "#;
        let file = parse_java("Foo.java", src).unwrap();
        let class = &file.types[0];
        let loader = Loader::new(vec![]);
        let imports = ImportDefList::new(&loader);
        let def = as_parcelable_java(&QName::new("Foo").unwrap(), class, &imports, None).unwrap();
        assert_eq!(def.fields, vec![aidl_ir_model::Field::field("flag", "readInt")]);
    }

    #[test]
    fn missing_entry_point_is_a_compile_error() {
        let src = "class Foo implements Parcelable { int flag; }";
        let file = parse_java("Foo.java", src).unwrap();
        let class = &file.types[0];
        let loader = Loader::new(vec![]);
        let imports = ImportDefList::new(&loader);
        let err = as_parcelable_java(&QName::new("Foo").unwrap(), class, &imports, None).unwrap_err();
        assert!(matches!(err, CompileError::NoEntryPoint { .. }));
    }
}
