use std::path::PathBuf;

use aidl_ir_grammar::GrammarError;
use aidl_ir_model::ModelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("file not found for '{qname}' under any search root (tried extensions {tried:?})")]
    FileNotFound { qname: String, tried: Vec<&'static str> },

    #[error("import not found: '{0}'")]
    ImportNotFound(String),

    #[error("{path}: {source}")]
    SyntaxError {
        path: PathBuf,
        #[source]
        source: GrammarError,
    },

    #[error("{path}: invalid precompiled JSON unit: {source}")]
    JsonError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path}: I/O error: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid qualified name: {0}")]
    InvalidQName(#[from] ModelError),

    #[error("'{qname}' does not resolve to a single unit (use wildcard resolution instead)")]
    NotAWildcard { qname: String },

    #[error("no parcelable or binder named '{0}' found in unit")]
    DeclarationNotFound(String),
}
