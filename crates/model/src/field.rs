use serde::{Deserialize, Serialize};

/// One named read operation in a parcelable's call script.
///
/// `call` is an opaque operation string: either a bare verb (`readInt`,
/// `readString`, ...) or `verb:QName` where the suffix names a parcelable
/// type or the element type of a typed list/array (§3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDef {
    pub name: String,
    pub call: String,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, call: impl Into<String>) -> FieldDef {
        FieldDef {
            name: name.into(),
            call: call.into(),
        }
    }
}

/// A runtime branch recovered from a Java `if (p.readInt() != 0) { ... } else { ... }`
/// idiom: evaluate `call`, compare against `check` with `op`, decode
/// `consequence` on a match and `alternative` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionDef {
    pub call: String,
    pub check: String,
    pub op: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consequence: Vec<Field>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternative: Vec<Field>,
}

/// Sentinel marking an unconditional `return` reached mid-translation: decoding
/// of the enclosing field list halts here without consuming further bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Stop {}

/// `FieldDef | ConditionDef | Stop`, discriminated by key presence rather
/// than an explicit tag: `{}` is a [`Stop`], a `check` key marks a
/// [`ConditionDef`], anything else is a [`FieldDef`] (§9, "Tagged variants").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Field {
    Condition(ConditionDef),
    Field(FieldDef),
    Stop(Stop),
}

impl Field {
    pub fn field(name: impl Into<String>, call: impl Into<String>) -> Field {
        Field::Field(FieldDef::new(name, call))
    }

    pub fn stop() -> Field {
        Field::Stop(Stop::default())
    }
}

impl From<FieldDef> for Field {
    fn from(value: FieldDef) -> Self {
        Field::Field(value)
    }
}

impl From<ConditionDef> for Field {
    fn from(value: ConditionDef) -> Self {
        Field::Condition(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_serializes_to_empty_object() {
        let value = Field::stop();
        assert_eq!(serde_json::to_string(&value).unwrap(), "{}");
    }

    #[test]
    fn field_round_trips() {
        let value = Field::field("flag", "readInt");
        let json = serde_json::to_string(&value).unwrap();
        let back: Field = serde_json::from_str(&json).unwrap();
        assert_eq!(value, back);
    }

    #[test]
    fn condition_round_trips_with_empty_branches() {
        let value = Field::Condition(ConditionDef {
            call: "readInt".into(),
            check: "0".into(),
            op: "!=".into(),
            consequence: vec![Field::field("name", "readString")],
            alternative: Vec::new(),
        });
        let json = serde_json::to_string(&value).unwrap();
        assert!(!json.contains("alternative"));
        let back: Field = serde_json::from_str(&json).unwrap();
        assert_eq!(value, back);
    }

    #[test]
    fn discriminates_all_three_shapes_from_json() {
        let stop: Field = serde_json::from_str("{}").unwrap();
        assert_eq!(stop, Field::stop());

        let field: Field = serde_json::from_str(r#"{"name":"a","call":"readInt"}"#).unwrap();
        assert_eq!(field, Field::field("a", "readInt"));

        let cond: Field =
            serde_json::from_str(r#"{"call":"readInt","check":"0","op":"!="}"#).unwrap();
        assert!(matches!(cond, Field::Condition(_)));
    }
}
