use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use aidl_ir_loader::{Loader, Unit, UnitBody};
use aidl_ir_model::{CompiledDef, QName, UnitType};

/// What kind of declaration an [`ImportDef`] resolved to, or [`Undefined`]
/// for a cycle-breaking placeholder / a lookup that never resolved.
///
/// [`Undefined`]: ImportKind::Undefined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Binder,
    Parcelable,
    ParcelableJava,
    Undefined,
}

/// One resolved (or placeholder) import. Equal by simple name OR by full
/// QName, so the Compiler can match an unqualified reference in translated
/// AST against an import recorded under its full name (§3).
#[derive(Debug, Clone)]
pub struct ImportDef {
    pub qname: QName,
    pub kind: ImportKind,
    pub unit: Option<Rc<Unit>>,
}

impl PartialEq for ImportDef {
    fn eq(&self, other: &Self) -> bool {
        self.qname == other.qname || self.qname.simple_name() == other.qname.simple_name()
    }
}

impl ImportDef {
    fn undefined(qname: QName) -> ImportDef {
        ImportDef { qname, kind: ImportKind::Undefined, unit: None }
    }

    fn from_unit(qname: QName, unit: Rc<Unit>) -> ImportDef {
        let kind = match &*unit.body.borrow() {
            UnitBody::Interface(_) => ImportKind::Binder,
            UnitBody::ParcelableFields(_) => ImportKind::Parcelable,
            UnitBody::JavaClass(_) => ImportKind::ParcelableJava,
            UnitBody::Compiled(CompiledDef::Binder(_)) => ImportKind::Binder,
            UnitBody::Compiled(CompiledDef::Parcelable(p)) => match p.unit_type {
                UnitType::ParcelableJava => ImportKind::ParcelableJava,
                _ => ImportKind::Parcelable,
            },
        };
        ImportDef { qname, kind, unit: Some(unit) }
    }
}

/// Per-unit import cache, populated before translation (§4.7). Cycles in the
/// AIDL package graph are broken by inserting a placeholder `ImportDef`
/// keyed on QName before recursing into the loader (§9 "Cyclic import
/// graph").
pub struct ImportDefList<'a> {
    loader: &'a Loader,
    by_qname: RefCell<HashMap<QName, Rc<ImportDef>>>,
}

impl<'a> ImportDefList<'a> {
    pub fn new(loader: &'a Loader) -> Self {
        ImportDefList { loader, by_qname: RefCell::new(HashMap::new()) }
    }

    /// Resolve and cache `qname`. Returns the existing entry (placeholder or
    /// final) if a resolution for this QName is already underway.
    pub fn resolve(&self, qname: &QName) -> Rc<ImportDef> {
        if let Some(existing) = self.by_qname.borrow().get(qname) {
            return existing.clone();
        }

        let placeholder = Rc::new(ImportDef::undefined(qname.clone()));
        self.by_qname.borrow_mut().insert(qname.clone(), placeholder);

        let resolved = match self.loader.load(qname) {
            Ok(unit) => Rc::new(ImportDef::from_unit(qname.clone(), unit)),
            Err(_) => Rc::new(ImportDef::undefined(qname.clone())),
        };
        self.by_qname.borrow_mut().insert(qname.clone(), resolved.clone());
        resolved
    }

    /// Register an inner class found locally within the current unit's own
    /// AST (§4.7 step 3): these never get a separate Loader entry (there is
    /// no sibling file to resolve), so they are inserted directly under
    /// their correctly-nested QName rather than going through `resolve`.
    /// A no-op if `qname` is already cached (an explicit import or sibling
    /// import takes priority).
    pub fn insert_local(&self, qname: QName, kind: ImportKind) {
        self.by_qname
            .borrow_mut()
            .entry(qname.clone())
            .or_insert_with(|| Rc::new(ImportDef { qname, kind, unit: None }));
    }

    /// Look up a previously-resolved import by its simple (last-segment)
    /// name, for unqualified references appearing in translated AST.
    pub fn get_by_simple_name(&self, simple_name: &str) -> Option<Rc<ImportDef>> {
        self.by_qname
            .borrow()
            .values()
            .find(|def| def.qname.simple_name() == simple_name)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_import_resolves_to_undefined_placeholder() {
        let root = std::env::temp_dir().join(format!("aidl-ir-import-test-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(&root).unwrap();
        let loader = Loader::new(vec![root]);
        let imports = ImportDefList::new(&loader);
        let def = imports.resolve(&QName::new("com.example.Missing").unwrap());
        assert_eq!(def.kind, ImportKind::Undefined);
    }
}
