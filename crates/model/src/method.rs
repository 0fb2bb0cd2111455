use serde::{Deserialize, Serialize};

use crate::direction::Direction;

/// Like [`crate::FieldDef`] but carrying a [`Direction`]: one `in`/`out`/`inout`
/// binder method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterDef {
    pub name: String,
    pub call: String,
    pub direction: Direction,
}

impl ParameterDef {
    pub fn new(name: impl Into<String>, call: impl Into<String>, direction: Direction) -> Self {
        ParameterDef {
            name: name.into(),
            call: call.into(),
            direction,
        }
    }
}

/// Like [`ParameterDef`] but nameless: a method's non-`void` return value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReturnDef {
    pub call: String,
}

impl ReturnDef {
    pub fn new(call: impl Into<String>) -> Self {
        ReturnDef { call: call.into() }
    }
}

/// One entry of `retval`: the return value itself, or a promoted `out`/`inout`
/// parameter. Untagged; [`ParameterDef`] is tried first since it is a strict
/// superset of [`ReturnDef`]'s fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RetEntry {
    Param(ParameterDef),
    Return(ReturnDef),
}

impl From<ParameterDef> for RetEntry {
    fn from(value: ParameterDef) -> Self {
        RetEntry::Param(value)
    }
}

impl From<ReturnDef> for RetEntry {
    fn from(value: ReturnDef) -> Self {
        RetEntry::Return(value)
    }
}

/// One compiled binder method. `tc` is the 1-based transaction code (source
/// order unless overridden, §9 Open Questions); `arguments` holds only the
/// `in`/`inout` parameters, `retval` the return value followed by any
/// `out`/`inout` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodDef {
    pub name: String,
    pub tc: u32,
    pub oneway: bool,
    pub retval: Option<Vec<RetEntry>>,
    pub arguments: Vec<ParameterDef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ret_entry_prefers_parameter_when_shape_matches() {
        let json = r#"{"name":"b","call":"readIntVector","direction":1}"#;
        let entry: RetEntry = serde_json::from_str(json).unwrap();
        assert!(matches!(entry, RetEntry::Param(_)));
    }

    #[test]
    fn ret_entry_falls_back_to_return() {
        let json = r#"{"call":"readInt"}"#;
        let entry: RetEntry = serde_json::from_str(json).unwrap();
        assert!(matches!(entry, RetEntry::Return(_)));
    }

    #[test]
    fn method_round_trips_with_null_retval() {
        let method = MethodDef {
            name: "f".into(),
            tc: 1,
            oneway: true,
            retval: None,
            arguments: vec![ParameterDef::new("a", "readInt", Direction::In)],
        };
        let json = serde_json::to_string(&method).unwrap();
        let back: MethodDef = serde_json::from_str(&json).unwrap();
        assert_eq!(method, back);
    }
}
