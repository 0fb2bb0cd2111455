//! Intermediate representation types for compiled AIDL binders and
//! parcelables (§3 of the system design).
//!
//! This crate only defines data: the call-script vocabulary (`readInt`,
//! `readString`, ...) is a convention shared by `aidl-ir-compiler` (which
//! produces it) and `aidl-ir-decoder` (which interprets it); nothing here
//! validates verb names.

mod binder;
mod direction;
mod error;
mod field;
mod method;
mod parcelable;
mod qname;
mod unit_type;

pub use binder::BinderDef;
pub use direction::Direction;
pub use error::ModelError;
pub use field::{ConditionDef, Field, FieldDef, Stop};
pub use method::{MethodDef, ParameterDef, RetEntry, ReturnDef};
pub use parcelable::ParcelableDef;
pub use qname::QName;
pub use unit_type::UnitType;

/// Either of the two top-level compiled products a [`QName`] can resolve to.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum CompiledDef {
    Binder(BinderDef),
    Parcelable(ParcelableDef),
}

impl CompiledDef {
    pub fn qname(&self) -> &QName {
        match self {
            CompiledDef::Binder(b) => &b.qname,
            CompiledDef::Parcelable(p) => &p.qname,
        }
    }

    pub fn as_binder(&self) -> Option<&BinderDef> {
        match self {
            CompiledDef::Binder(b) => Some(b),
            CompiledDef::Parcelable(_) => None,
        }
    }

    pub fn as_parcelable(&self) -> Option<&ParcelableDef> {
        match self {
            CompiledDef::Parcelable(p) => Some(p),
            CompiledDef::Binder(_) => None,
        }
    }
}
