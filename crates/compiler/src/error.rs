use aidl_ir_loader::LoaderError;
use thiserror::Error;

/// Translation failures (§7). Unsupported across units: `batch-compile`
/// continues past any one unit's `Err`; within a single unit, any error here
/// is fatal for that unit.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error(
        "'{qname}' has no recognizable parcelable entry point \
         (no CREATOR.createFromParcel and no Parcel constructor)"
    )]
    NoEntryPoint { qname: String },

    #[error("'{qname}' does not resolve to a binder, parcelable, or parcelable-java unit")]
    UnsupportedUnitType { qname: String },

    #[error("failed to resolve '{qname}': {source}")]
    Loader {
        qname: String,
        #[source]
        source: LoaderError,
    },
}
