use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A decoded Binder transaction value.
///
/// Only `Serialize` is implemented: values flow one way, out of a byte
/// stream and into a JSON report, never back in.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    UInt(u32),
    Long(i64),
    ULong(u64),
    Float(f32),
    Double(f64),
    Bool(bool),
    Char(char),
    Str(String),
    Bytes(Vec<u8>),
    Vector(Vec<Value>),
    StrongBinder(StrongBinder),
    Object(Fields),
    Null,
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Int(v) => serializer.serialize_i32(*v),
            Value::UInt(v) => serializer.serialize_u32(*v),
            Value::Long(v) => serializer.serialize_i64(*v),
            Value::ULong(v) => serializer.serialize_u64(*v),
            Value::Float(v) => serializer.serialize_f32(*v),
            Value::Double(v) => serializer.serialize_f64(*v),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Char(v) => serializer.serialize_u32(*v as u32),
            Value::Str(v) => serializer.serialize_str(v),
            Value::Bytes(v) => serializer.collect_seq(v.iter()),
            Value::Vector(v) => serializer.collect_seq(v.iter()),
            Value::StrongBinder(v) => v.serialize(serializer),
            Value::Object(v) => v.serialize(serializer),
            Value::Null => serializer.serialize_none(),
        }
    }
}

/// The fixed-shape struct behind `readStrongBinder` (§4.8). `status` is
/// only populated on Android >= 10.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrongBinder {
    #[serde(rename = "type")]
    pub type_: u32,
    pub flags: u32,
    pub handle: u64,
    pub cookie: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u32>,
}

/// An ordered `name -> Value` map: the decoded form of a parcelable's or
/// method call's fields. A plain `Vec` rather than a `HashMap` so field
/// order in the output JSON matches the call script's declaration order;
/// this needs a hand-written `Serialize` since serde has no derive for
/// "treat this `Vec<(String, V)>` as a JSON object".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fields(pub Vec<(String, Value)>);

impl Fields {
    pub fn new() -> Self {
        Fields(Vec::new())
    }

    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.0.push((name.into(), value));
    }
}

impl Serialize for Fields {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
