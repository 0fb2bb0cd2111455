use serde::{Deserialize, Serialize};

use crate::method::MethodDef;
use crate::qname::QName;
use crate::unit_type::UnitType;

/// A compiled binder interface: its methods, sorted by `tc` ascending (§8
/// property 3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BinderDef {
    pub qname: QName,
    #[serde(rename = "type")]
    pub unit_type: UnitType,
    pub methods: Vec<MethodDef>,
}

impl BinderDef {
    /// Build a `BinderDef`, sorting `methods` by `tc` as the compiler's
    /// contract requires.
    pub fn new(qname: QName, mut methods: Vec<MethodDef>) -> Self {
        methods.sort_by_key(|m| m.tc);
        BinderDef {
            qname,
            unit_type: UnitType::Binder,
            methods,
        }
    }

    pub fn method_by_tc(&self, tc: u32) -> Option<&MethodDef> {
        self.methods.iter().find(|m| m.tc == tc)
    }
}

#[cfg(test)]
mod tests {
    use crate::direction::Direction;

    use super::*;

    #[test]
    fn constructor_sorts_by_tc() {
        let methods = vec![
            MethodDef {
                name: "g".into(),
                tc: 2,
                oneway: false,
                retval: None,
                arguments: vec![],
            },
            MethodDef {
                name: "f".into(),
                tc: 1,
                oneway: true,
                retval: None,
                arguments: vec![],
            },
        ];
        let def = BinderDef::new(QName::new("I").unwrap(), methods);
        assert_eq!(def.methods[0].name, "f");
        assert_eq!(def.methods[1].name, "g");
    }

    #[test]
    fn method_by_tc_finds_entry() {
        let def = BinderDef::new(
            QName::new("I").unwrap(),
            vec![MethodDef {
                name: "f".into(),
                tc: 1,
                oneway: true,
                retval: None,
                arguments: vec![crate::ParameterDef::new("a", "readInt", Direction::In)],
            }],
        );
        assert!(def.method_by_tc(1).is_some());
        assert!(def.method_by_tc(2).is_none());
    }
}
