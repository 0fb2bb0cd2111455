use aidl_ir_loader::LoaderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("truncated parcel: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    #[error("unknown call verb '{verb}'")]
    UnknownVerb { verb: String },

    #[error("no method with transaction code {code} on '{descriptor}'")]
    UnknownTransactionCode { descriptor: String, code: u32 },

    #[error("'{qname}' is not a binder interface")]
    NotABinder { qname: String },

    #[error("'{qname}' did not compile to a parcelable")]
    MissingParcelable { qname: String },

    #[error("'{qname}' has no compiled call script (load a precompiled unit or compile it first)")]
    NotCompiled { qname: String },

    #[error("malformed UTF-16LE string payload")]
    InvalidString,

    #[error("failed to load '{qname}': {source}")]
    Loader {
        qname: String,
        #[source]
        source: LoaderError,
    },

    #[error("unrecognized environment tag 0x{0:08x}")]
    UnknownEnvironment(u32),
}
