use aidl_ir_loader::Loader;
use aidl_ir_model::{Direction, QName};
use serde::Serialize;

use crate::decoder::{read_utf16le_string, Decoder};
use crate::error::DecodeError;
use crate::stream::Stream;
use crate::value::Value;

/// The `env` tag carried by an `IncomingMessage` on Android >= 11, a 4-byte
/// little-endian ASCII code (`examples/original_source/bshark/parcel.py`'s
/// `Environment` enum: `SYST = int.from_bytes(b"TSYS", "little")`, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Environment {
    Tsys,
    Vndk,
    Reco,
    Unkn,
}

impl TryFrom<u32> for Environment {
    type Error = DecodeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match &value.to_le_bytes() {
            b"TSYS" => Ok(Environment::Tsys),
            b"VNDK" => Ok(Environment::Vndk),
            b"RECO" => Ok(Environment::Reco),
            b"UNKN" => Ok(Environment::Unkn),
            _ => Err(DecodeError::UnknownEnvironment(value)),
        }
    }
}

/// A decoded incoming Binder transaction (§4.9). The wire descriptor
/// doubles as the lookup key into the Loader cache for the `IN` decode.
#[derive(Debug, Clone, Serialize)]
pub struct IncomingMessage {
    pub smp: u32,
    pub work_suid: Option<u32>,
    pub environment: Option<Environment>,
    pub descriptor: String,
    pub payload: Value,
}

/// Decode an `IncomingMessage` envelope. `code` is the transaction code
/// carried alongside the parcel by the driver, not inside it, so it is
/// supplied by the caller the same way `android_version` is.
pub fn decode_incoming(
    input: &[u8],
    loader: &Loader,
    code: u32,
    android_version: u32,
) -> Result<IncomingMessage, DecodeError> {
    let mut stream = Stream::new(input);
    let smp = stream.read_u32()?;

    let mut work_suid = None;
    let mut environment = None;
    if android_version >= 11 {
        work_suid = Some(stream.read_u32()?);
        environment = Some(Environment::try_from(stream.read_u32()?)?);
    } else if android_version == 10 {
        work_suid = Some(stream.read_u32()?);
    }

    let descriptor = read_utf16le_string(&mut stream)?;
    let qname = QName::new(descriptor.clone()).map_err(|_| DecodeError::InvalidString)?;

    let mut decoder = Decoder::new(stream.remaining(), loader, android_version);
    let payload = decoder.decode(&qname, code, Direction::In)?;

    Ok(IncomingMessage { smp, work_suid, environment, descriptor, payload })
}

/// A decoded outgoing (reply) Binder transaction (§4.9). `payload` is
/// `None` whenever `error_code != 0`: the remote call failed before
/// producing a reply, so there is nothing past the error code to read.
#[derive(Debug, Clone, Serialize)]
pub struct OutgoingMessage {
    pub error_code: i32,
    pub payload: Option<Value>,
}

pub fn decode_outgoing(
    input: &[u8],
    loader: &Loader,
    descriptor: &QName,
    code: u32,
    android_version: u32,
) -> Result<OutgoingMessage, DecodeError> {
    let mut stream = Stream::new(input);
    let error_code = stream.read_i32()?;

    let payload = if error_code == 0 {
        let mut decoder = Decoder::new(stream.remaining(), loader, android_version);
        Some(decoder.decode(descriptor, code, Direction::Out)?)
    } else {
        None
    };

    Ok(OutgoingMessage { error_code, payload })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("aidl-ir-decoder-transport-test-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn environment_tag_round_trips_from_ascii_bytes() {
        let code = u32::from_le_bytes(*b"TSYS");
        assert_eq!(Environment::try_from(code).unwrap(), Environment::Tsys);
    }

    #[test]
    fn unrecognized_environment_tag_is_an_error() {
        let err = Environment::try_from(0xDEAD_BEEF).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownEnvironment(_)));
    }

    #[test]
    fn incoming_message_on_android_9_omits_work_suid_and_environment() {
        let root = scratch_dir("incoming-9");
        fs::write(
            root.join("I.json"),
            r#"{"qname":"I","type":"BINDER","methods":[{"name":"f","tc":1,"oneway":true,"retval":null,
               "arguments":[{"name":"a","call":"readInt","direction":0}]}]}"#,
        )
        .unwrap();
        let loader = Loader::new(vec![root]);

        let mut bytes = vec![0u8; 4]; // smp
        bytes.extend_from_slice(&1u32.to_le_bytes()); // descriptor len = 1 ("I")
        bytes.extend_from_slice(&[0x49, 0x00, 0x00, 0x00]); // "I\0"
        bytes.extend_from_slice(&7i32.to_le_bytes()); // a = 7

        let msg = decode_incoming(&bytes, &loader, 1, 9).unwrap();
        assert!(msg.work_suid.is_none());
        assert!(msg.environment.is_none());
        assert_eq!(msg.descriptor, "I");
    }

    #[test]
    fn outgoing_message_with_nonzero_error_code_has_no_payload() {
        let root = scratch_dir("outgoing-error");
        let loader = Loader::new(vec![root]);
        let bytes = (-1i32).to_le_bytes();
        let msg = decode_outgoing(&bytes, &loader, &QName::new("I").unwrap(), 1, 11).unwrap();
        assert_eq!(msg.error_code, -1);
        assert!(msg.payload.is_none());
    }
}
