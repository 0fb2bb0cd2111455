//! Interprets compiled call scripts against a live Binder transaction byte
//! stream (§4.8-§4.9, "Decoder"/"Transport Framing" in the system design).
//!
//! [`Decoder`] walks a [`aidl_ir_model::BinderDef`]/[`aidl_ir_model::ParcelableDef`]
//! call script field-by-field over a [`Stream`](stream::Stream) cursor,
//! dispatching each `call` verb through the static [`ops::VERB_TABLE`].
//! [`transport`] layers Android's outer transaction envelope on top.

mod decoder;
mod error;
mod ops;
mod stream;
mod transport;
mod value;

pub use decoder::Decoder;
pub use error::DecodeError;
pub use ops::{Op, Scalar, VERB_TABLE};
pub use transport::{decode_incoming, decode_outgoing, Environment, IncomingMessage, OutgoingMessage};
pub use value::{Fields, StrongBinder, Value};
