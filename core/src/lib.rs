//! Ties the loader, compiler and decoder crates together behind one
//! `Workspace` type (§4.10, "Core facade" in the system design).
//!
//! Mirrors the way the teacher's `Apk` facade composes `ZipEntry` + `AXML` +
//! `ARSC` behind a single curated type instead of exposing every subsystem
//! directly: here `Workspace` composes a `Loader`, `Compiler` and `Decoder`
//! the same way.

mod error;

use std::path::PathBuf;

use aidl_ir_compiler::{CompileError, Compiler};
use aidl_ir_decoder::{
    decode_incoming, decode_outgoing, DecodeError, Decoder, IncomingMessage, OutgoingMessage, Value,
};
use aidl_ir_loader::Loader;
use aidl_ir_model::{CompiledDef, Direction, QName};

pub use error::WorkspaceError;

/// Owns a `Loader` and drives the Compiler and Decoder against its cache.
///
/// `!Sync` by construction, same as the `Loader` it wraps (§5): the cache is
/// a `RefCell`, not a lock, so a `Workspace` belongs to one thread at a time.
pub struct Workspace {
    loader: Loader,
}

impl Workspace {
    pub fn new(search_path: Vec<PathBuf>) -> Workspace {
        Workspace { loader: Loader::new(search_path) }
    }

    pub fn search_path(&self) -> &[PathBuf] {
        self.loader.search_path()
    }

    /// Resolve and compile `qname` through the Loader, memoizing on the
    /// underlying `Unit` the way `Compiler::compile` already does; a second
    /// call for the same `qname` returns the cached definition untouched.
    pub fn compile(&self, qname: &QName) -> Result<CompiledDef, CompileError> {
        log::debug!("compiling {qname}");
        Compiler::new(&self.loader).compile(qname)
    }

    /// Decode a transaction payload already stripped of its outer Android
    /// envelope (§4.8). `descriptor` both names and looks up the compiled
    /// call script to interpret `bytes` against.
    pub fn decode(
        &self,
        descriptor: &QName,
        code: u32,
        bytes: &[u8],
        direction: Direction,
        android_version: u32,
    ) -> Result<Value, DecodeError> {
        log::debug!("decoding {descriptor} tc={code} ({bytes} bytes)", bytes = bytes.len());
        let mut decoder = Decoder::new(bytes, &self.loader, android_version);
        decoder.decode(descriptor, code, direction)
    }

    /// Decode a full incoming transaction envelope, descriptor and all
    /// (§4.9).
    pub fn decode_incoming(
        &self,
        bytes: &[u8],
        code: u32,
        android_version: u32,
    ) -> Result<IncomingMessage, DecodeError> {
        decode_incoming(bytes, &self.loader, code, android_version)
    }

    /// Decode a full outgoing (reply) transaction envelope (§4.9).
    pub fn decode_outgoing(
        &self,
        bytes: &[u8],
        descriptor: &QName,
        code: u32,
        android_version: u32,
    ) -> Result<OutgoingMessage, DecodeError> {
        decode_outgoing(bytes, &self.loader, descriptor, code, android_version)
    }

    /// Every unit the Loader has resolved so far that has reached its
    /// compiled form, in no particular order (§6, "JSON schema").
    pub fn catalog(&self) -> Vec<CompiledDef> {
        self.loader.cached_units().iter().filter_map(|unit| unit.compiled()).collect()
    }

    /// Serialize the current catalog as a JSON array of compiled units.
    pub fn to_json(&self) -> Result<String, WorkspaceError> {
        Ok(serde_json::to_string_pretty(&self.catalog())?)
    }

    /// Build a `Workspace` whose cache is pre-populated from a JSON catalog
    /// previously produced by `to_json`. `search_path` is still used for any
    /// qname not already present in the restored catalog.
    pub fn from_json(search_path: Vec<PathBuf>, json: &str) -> Result<Workspace, WorkspaceError> {
        let catalog: Vec<CompiledDef> = serde_json::from_str(json)?;
        let workspace = Workspace::new(search_path);
        for def in catalog {
            workspace.loader.insert_compiled(def);
        }
        Ok(workspace)
    }
}
