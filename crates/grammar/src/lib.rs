//! A restricted-dialect parser for AIDL and parcelable Java sources (§4.1,
//! "Grammar Adapter" in the system design).
//!
//! There is no external tree-sitter-style CST here: [`aidl::parse_aidl`] and
//! [`java::parse_java`] each tokenize with a small `winnow`-based lexer and
//! then build the typed [`ast`] directly via recursive descent. Downstream
//! crates (the loader, the compiler) only ever see the typed accessors in
//! [`ast`].

pub mod ast;
mod aidl;
mod cursor;
mod error;
mod java;
mod lexer;

pub use aidl::parse_aidl;
pub use error::GrammarError;
pub use java::parse_java;
pub use lexer::{Token, TokenKind, tokenize};
