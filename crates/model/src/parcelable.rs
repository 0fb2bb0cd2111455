use serde::{Deserialize, Serialize};

use crate::field::Field;
use crate::qname::QName;
use crate::unit_type::UnitType;

/// A compiled parcelable: an ordered call script over its fields.
///
/// `type` is either [`UnitType::Parcelable`] (AIDL-declared, fields in
/// declaration order) or [`UnitType::ParcelableJava`] (recovered from a
/// `CREATOR`/constructor/`readFromParcel` pattern).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParcelableDef {
    pub qname: QName,
    #[serde(rename = "type")]
    pub unit_type: UnitType,
    pub fields: Vec<Field>,
}

impl ParcelableDef {
    pub fn new(qname: QName, unit_type: UnitType, fields: Vec<Field>) -> Self {
        ParcelableDef {
            qname,
            unit_type,
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let def = ParcelableDef::new(
            QName::new("com.example.Foo").unwrap(),
            UnitType::Parcelable,
            vec![Field::field("a", "readInt"), Field::stop()],
        );
        let json = serde_json::to_string(&def).unwrap();
        let back: ParcelableDef = serde_json::from_str(&json).unwrap();
        assert_eq!(def, back);
    }
}
