use aidl_ir_grammar::ast::{ClassDecl, JavaConstructor, JavaField, JavaMethod};

/// Pre-indexes a Java-dialect `ClassDecl`'s members, methods, and
/// constructors for the parcelable translator (§4.3).
pub struct Preprocessor<'a> {
    pub class: &'a ClassDecl,
}

impl<'a> Preprocessor<'a> {
    pub fn new(class: &'a ClassDecl) -> Self {
        Preprocessor { class }
    }

    pub fn member(&self, name: &str) -> Option<&'a JavaField> {
        self.class.fields.iter().find(|f| f.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&'a JavaMethod> {
        self.class.methods.iter().find(|m| m.name == name)
    }

    pub fn constructors(&self) -> &'a [JavaConstructor] {
        &self.class.constructors
    }

    /// The conventional `CREATOR` field and, within its anonymous body, the
    /// `createFromParcel` method.
    pub fn get_creator(&self) -> Option<(&'a JavaField, &'a JavaMethod)> {
        let creator = self.class.fields.iter().find(|f| f.name == "CREATOR")?;
        let body = creator.anonymous_body.as_ref()?;
        let create_from_parcel = body.methods.iter().find(|m| m.name == "createFromParcel")?;
        Some((creator, create_from_parcel))
    }

    /// A constructor whose single parameter is `Parcel` (or the qualified
    /// `android.os.Parcel`).
    pub fn get_parcel_constructor(&self) -> Option<&'a JavaConstructor> {
        self.class
            .constructors
            .iter()
            .find(|c| c.params.len() == 1 && c.params[0].type_ref.simple_name() == "Parcel")
    }
}

#[cfg(test)]
mod tests {
    use aidl_ir_grammar::parse_java;

    use super::*;

    #[test]
    fn finds_creator_and_create_from_parcel() {
        let file = parse_java(
            "Foo.java",
            "public class Foo implements Parcelable {\n\
             public static final Parcelable.Creator<Foo> CREATOR = new Parcelable.Creator<Foo>() {\n\
             public Foo createFromParcel(Parcel in) { return new Foo(in); }\n\
             public Foo[] newArray(int size) { return new Foo[size]; }\n\
             };\n\
             private Foo(Parcel in) { }\n\
             public int describeContents() { return 0; }\n\
             }\n",
        )
        .unwrap();
        let class = &file.types[0];
        let pre = Preprocessor::new(class);
        let (_, create_from_parcel) = pre.get_creator().unwrap();
        assert_eq!(create_from_parcel.name, "createFromParcel");
        assert!(pre.get_parcel_constructor().is_some());
    }
}
