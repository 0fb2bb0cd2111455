use aidl_ir_loader::Loader;
use aidl_ir_model::{Direction, Field, QName, RetEntry};

use crate::error::DecodeError;
use crate::ops::{Op, Scalar, VERB_TABLE};
use crate::stream::Stream;
use crate::value::{Fields, StrongBinder, Value};

/// Interprets a compiled call script against a Binder transaction byte
/// stream (§4.8). Holds a cursor over the payload and a reference to the
/// `Loader` cache so nested `readParcelable` calls can resolve sibling
/// units without a separate compilation pass.
pub struct Decoder<'a, 'l> {
    stream: Stream<'a>,
    loader: &'l Loader,
    android_version: u32,
    /// Fields decoded so far for the transaction currently in progress.
    /// Updated as each named value is read so that a caller whose `decode`
    /// call returned `Err` can still inspect how far decoding got (§7:
    /// "the Decoder records the error ... rather than only returning `Err`
    /// with nothing else").
    partial: Fields,
}

impl<'a, 'l> Decoder<'a, 'l> {
    pub fn new(input: &'a [u8], loader: &'l Loader, android_version: u32) -> Self {
        Decoder { stream: Stream::new(input), loader, android_version, partial: Fields::new() }
    }

    pub fn position(&self) -> usize {
        self.stream.position()
    }

    /// The named values decoded so far for the in-progress (or most
    /// recently attempted) top-level transaction.
    pub fn partial(&self) -> &Fields {
        &self.partial
    }

    /// Decode one transaction: look up `descriptor`'s `BinderDef`, find the
    /// method by `code`, then read its `arguments` (direction `In`) or
    /// `retval` (`Out`/`InOut`) in order.
    pub fn decode(&mut self, descriptor: &QName, code: u32, direction: Direction) -> Result<Value, DecodeError> {
        self.partial = Fields::new();
        let unit = self
            .loader
            .load(descriptor)
            .map_err(|source| DecodeError::Loader { qname: descriptor.as_str().to_string(), source })?;
        let def = unit
            .compiled()
            .ok_or_else(|| DecodeError::NotCompiled { qname: descriptor.as_str().to_string() })?;
        let binder = def
            .as_binder()
            .ok_or_else(|| DecodeError::NotABinder { qname: descriptor.as_str().to_string() })?;
        let method = binder.method_by_tc(code).ok_or_else(|| DecodeError::UnknownTransactionCode {
            descriptor: descriptor.as_str().to_string(),
            code,
        })?;

        match direction {
            Direction::In => {
                for param in &method.arguments {
                    let value = self.read_call(&param.call)?;
                    self.partial.push(param.name.clone(), value);
                }
            }
            Direction::Out | Direction::InOut => {
                for entry in method.retval.iter().flatten() {
                    match entry {
                        RetEntry::Return(r) => {
                            let value = self.read_call(&r.call)?;
                            self.partial.push("return", value);
                        }
                        RetEntry::Param(p) => {
                            let value = self.read_call(&p.call)?;
                            self.partial.push(p.name.clone(), value);
                        }
                    }
                }
            }
        }
        Ok(Value::Object(self.partial.clone()))
    }

    /// Dispatch one `call` string: split on `:` into verb and optional type
    /// argument, look the verb up in [`VERB_TABLE`], and read it.
    fn read_call(&mut self, call: &str) -> Result<Value, DecodeError> {
        let (verb, type_arg) = match call.split_once(':') {
            Some((verb, arg)) => (verb, Some(arg)),
            None => (call, None),
        };
        let op = *VERB_TABLE
            .get(verb)
            .ok_or_else(|| DecodeError::UnknownVerb { verb: verb.to_string() })?;
        self.read_op(op, type_arg)
    }

    fn read_op(&mut self, op: Op, type_arg: Option<&str>) -> Result<Value, DecodeError> {
        match op {
            Op::Scalar(scalar) => self.read_scalar(scalar),
            Op::Vector(scalar) => {
                let n = self.read_count()?;
                let mut values = Vec::with_capacity(n);
                for _ in 0..n {
                    values.push(self.read_scalar(scalar)?);
                }
                Ok(Value::Vector(values))
            }
            Op::Parcelable => self.read_parcelable(type_arg),
            Op::ParcelableVector | Op::List | Op::ParceledListSlice => {
                let n = self.read_count()?;
                let mut values = Vec::with_capacity(n);
                for _ in 0..n {
                    values.push(self.read_parcelable(type_arg)?);
                }
                Ok(Value::Vector(values))
            }
            Op::Bundle => {
                let len = self.read_count()?;
                let bytes = self.stream.take(len)?;
                Ok(Value::Bytes(bytes.to_vec()))
            }
        }
    }

    fn read_count(&mut self) -> Result<usize, DecodeError> {
        Ok(self.stream.read_i32()?.max(0) as usize)
    }

    fn read_scalar(&mut self, scalar: Scalar) -> Result<Value, DecodeError> {
        match scalar {
            Scalar::Int => Ok(Value::Int(self.stream.read_i32()?)),
            Scalar::UInt => Ok(Value::UInt(self.stream.read_u32()?)),
            Scalar::Long => Ok(Value::Long(self.stream.read_i64()?)),
            Scalar::ULong => Ok(Value::ULong(self.stream.read_u64()?)),
            Scalar::Short => {
                let v = self.stream.read_i16()?;
                self.stream.align4()?;
                Ok(Value::Int(v as i32))
            }
            Scalar::Byte => {
                let v = self.stream.read_u8()?;
                self.stream.align4()?;
                Ok(Value::Int(v as i32))
            }
            Scalar::ByteUnaligned => Ok(Value::Int(self.stream.read_u8()? as i32)),
            Scalar::Float => Ok(Value::Float(self.stream.read_f32()?)),
            Scalar::Double => Ok(Value::Double(self.stream.read_f64()?)),
            Scalar::Boolean => Ok(Value::Bool(self.stream.read_i32()? != 0)),
            Scalar::Char => {
                let code = self.stream.read_i32()? as u32;
                Ok(Value::Char(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)))
            }
            Scalar::String => Ok(Value::Str(read_utf16le_string(&mut self.stream)?)),
            Scalar::String8 => Ok(Value::Str(self.read_string8()?)),
            Scalar::StrongBinder => self.read_strong_binder(),
        }
    }

    /// `int32 len`, `len` UTF-8 bytes, one NUL terminator, then pad to 4.
    fn read_string8(&mut self) -> Result<String, DecodeError> {
        let len = self.read_count()?;
        let bytes = self.stream.take(len)?.to_vec();
        self.stream.take(1)?;
        let s = String::from_utf8(bytes).map_err(|_| DecodeError::InvalidString)?;
        self.stream.align4()?;
        Ok(s)
    }

    fn read_strong_binder(&mut self) -> Result<Value, DecodeError> {
        let type_ = self.stream.read_u32()?;
        let flags = self.stream.read_u32()?;
        let handle = self.stream.read_u64()?;
        let cookie = self.stream.read_u64()?;
        let status = if self.android_version >= 10 { Some(self.stream.read_u32()?) } else { None };
        Ok(Value::StrongBinder(StrongBinder { type_, flags, handle, cookie, status }))
    }

    /// `readParcelable[:QName]`: a leading status byte gates nullability;
    /// when the QName isn't bound in the call script itself, it rides on
    /// the wire as a `readString` ahead of the fields (§4.8).
    fn read_parcelable(&mut self, type_arg: Option<&str>) -> Result<Value, DecodeError> {
        let status = self.stream.read_i32()?;
        if status != 1 {
            return Ok(Value::Null);
        }
        let qname_str = match type_arg {
            Some(bound) => bound.to_string(),
            None => read_utf16le_string(&mut self.stream)?,
        };
        let qname = QName::new(qname_str).map_err(|_| DecodeError::InvalidString)?;
        self.decode_parcelable(&qname)
    }

    fn decode_parcelable(&mut self, qname: &QName) -> Result<Value, DecodeError> {
        let unit = self
            .loader
            .load(qname)
            .map_err(|source| DecodeError::Loader { qname: qname.as_str().to_string(), source })?;
        let def = unit.compiled().ok_or_else(|| DecodeError::NotCompiled { qname: qname.as_str().to_string() })?;
        let parcelable = def
            .as_parcelable()
            .ok_or_else(|| DecodeError::MissingParcelable { qname: qname.as_str().to_string() })?;
        let fields = self.decode_fields(&parcelable.fields)?;
        Ok(Value::Object(fields))
    }

    /// Walk a parcelable's call script in order: `Stop` halts iteration,
    /// `Condition` evaluates its `call`/`op`/`check` and recurses into the
    /// chosen branch, `Field` reads a single named value (§4.8).
    fn decode_fields(&mut self, script: &[Field]) -> Result<Fields, DecodeError> {
        let mut out = Fields::new();
        for entry in script {
            match entry {
                Field::Stop(_) => break,
                Field::Field(f) => {
                    let value = self.read_call(&f.call)?;
                    out.push(f.name.clone(), value);
                }
                Field::Condition(c) => {
                    let observed = self.read_call(&c.call)?;
                    let branch = if evaluate_condition(&observed, &c.op, &c.check)? {
                        &c.consequence
                    } else {
                        &c.alternative
                    };
                    let nested = self.decode_fields(branch)?;
                    out.0.extend(nested.0);
                }
            }
        }
        Ok(out)
    }
}

/// `uint32 len` code units, then `(len*2)+2` bytes UTF-16LE (terminator
/// included), stripped of trailing NULs, then pad to 4 (§4.8).
pub(crate) fn read_utf16le_string(stream: &mut Stream) -> Result<String, DecodeError> {
    let len = stream.read_u32()? as usize;
    let byte_len = len * 2 + 2;
    let bytes = stream.take(byte_len)?;
    let mut units: Vec<u16> = bytes.chunks_exact(2).map(|c| u16::from_le_bytes([c[0], c[1]])).collect();
    while units.last() == Some(&0) {
        units.pop();
    }
    let s = String::from_utf16(&units).map_err(|_| DecodeError::InvalidString)?;
    stream.align4()?;
    Ok(s)
}

fn numeric_of(value: &Value) -> Option<i64> {
    match value {
        Value::Int(v) => Some(*v as i64),
        Value::UInt(v) => Some(*v as i64),
        Value::Long(v) => Some(*v),
        Value::ULong(v) => Some(*v as i64),
        Value::Bool(v) => Some(*v as i64),
        Value::Char(v) => Some(*v as i64),
        _ => None,
    }
}

fn evaluate_condition(value: &Value, op: &str, check: &str) -> Result<bool, DecodeError> {
    let observed = numeric_of(value).ok_or(DecodeError::InvalidString)?;
    let expected: i64 = check.parse().unwrap_or(0);
    Ok(match op {
        "!=" => observed != expected,
        "==" => observed == expected,
        "<" => observed < expected,
        ">" => observed > expected,
        "<=" => observed <= expected,
        ">=" => observed >= expected,
        _ => observed != expected,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("aidl-ir-decoder-test-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn decodes_int_then_string_arguments() {
        let root = scratch_dir("s2");
        fs::write(
            root.join("I.json"),
            r#"{"qname":"I","type":"BINDER","methods":[{"name":"f","tc":1,"oneway":true,"retval":null,
               "arguments":[{"name":"a","call":"readInt","direction":0},{"name":"b","call":"readString","direction":0}]}]}"#,
        )
        .unwrap();
        let loader = Loader::new(vec![root]);

        let bytes = [
            0x00, 0x00, 0x00, 0x00, // a = 0
            0x05, 0x00, 0x00, 0x00, // len = 5
            0x48, 0x00, 0x65, 0x00, 0x6C, 0x00, 0x6C, 0x00, 0x6F, 0x00, 0x00, 0x00, // "Hello\0"
        ];
        let mut decoder = Decoder::new(&bytes, &loader, 11);
        let value = decoder.decode(&QName::new("I").unwrap(), 1, Direction::In).unwrap();
        let Value::Object(fields) = value else { panic!("expected object") };
        assert_eq!(fields.0, vec![("a".to_string(), Value::Int(0)), ("b".to_string(), Value::Str("Hello".into()))]);
    }

    #[test]
    fn strong_binder_on_android_11_consumes_28_bytes() {
        let root = scratch_dir("s5");
        let loader = Loader::new(vec![root]);
        let mut bytes = vec![0u8; 28];
        bytes[0..4].copy_from_slice(&7u32.to_le_bytes());
        bytes[4..8].copy_from_slice(&1u32.to_le_bytes());
        bytes[8..16].copy_from_slice(&2u64.to_le_bytes());
        bytes[16..24].copy_from_slice(&3u64.to_le_bytes());
        bytes[24..28].copy_from_slice(&9u32.to_le_bytes());
        let mut decoder = Decoder::new(&bytes, &loader, 11);
        let value = decoder.read_scalar(Scalar::StrongBinder).unwrap();
        assert_eq!(decoder.position(), 28);
        match value {
            Value::StrongBinder(sb) => {
                assert_eq!(sb, StrongBinder { type_: 7, flags: 1, handle: 2, cookie: 3, status: Some(9) });
            }
            other => panic!("expected strong binder, got {other:?}"),
        }
    }

    #[test]
    fn nullable_parcelable_with_zero_status_consumes_only_the_status_word() {
        let root = scratch_dir("s8");
        let loader = Loader::new(vec![root]);
        let bytes = [0x00, 0x00, 0x00, 0x00];
        let mut decoder = Decoder::new(&bytes, &loader, 11);
        let value = decoder.read_parcelable(Some("com.example.Foo")).unwrap();
        assert_eq!(value, Value::Null);
        assert_eq!(decoder.position(), 4);
    }

    #[test]
    fn condition_selects_consequence_branch_and_stop_halts_iteration() {
        let root = scratch_dir("s3");
        fs::write(
            root.join("Foo.json"),
            r#"{"qname":"Foo","type":"PARCELABLE","fields":[
                {"name":"flag","call":"readInt"},
                {"call":"readInt","check":"0","op":"!=","consequence":[{"name":"name","call":"readString"}]},
                {}
            ]}"#,
        )
        .unwrap();
        let loader = Loader::new(vec![root]);
        let unit = loader.load(&QName::new("Foo").unwrap()).unwrap();
        let def = unit.compiled().unwrap();

        let bytes = [
            0x01, 0x00, 0x00, 0x00, // flag = 1
            0x01, 0x00, 0x00, 0x00, // condition read: 1 != 0 -> true
            0x02, 0x00, 0x00, 0x00, // len = 2
            0x68, 0x00, 0x69, 0x00, 0x00, 0x00, // "hi\0"
        ];
        let mut decoder = Decoder::new(&bytes, &loader, 11);
        let fields = decoder.decode_fields(&def.as_parcelable().unwrap().fields).unwrap();
        assert_eq!(
            fields.0,
            vec![("flag".to_string(), Value::Int(1)), ("name".to_string(), Value::Str("hi".into()))]
        );
    }

    #[test]
    fn unknown_verb_is_a_fatal_error() {
        let root = scratch_dir("unknown-verb");
        let loader = Loader::new(vec![root]);
        let bytes: [u8; 0] = [];
        let mut decoder = Decoder::new(&bytes, &loader, 11);
        let err = decoder.read_call("readFrobnicate").unwrap_err();
        assert!(matches!(err, DecodeError::UnknownVerb { .. }));
    }
}
