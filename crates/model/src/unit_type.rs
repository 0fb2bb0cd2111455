use serde::{Deserialize, Serialize};

/// Tags the shape of a [`crate::Unit`]'s body (the `type` field in the
/// external JSON schema, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitType {
    /// An AIDL `parcelable Foo { ... }` declaration with an inline field list.
    Parcelable,
    /// An AIDL `parcelable Foo;` forward declaration backed by a Java class.
    ParcelableJava,
    /// An AIDL `interface` declaration.
    Binder,
}
