use std::cell::RefCell;

use aidl_ir_grammar::ast::{AidlFieldDecl, ClassDecl, InterfaceDecl};
use aidl_ir_model::{CompiledDef, QName, UnitType};

/// Either the as-parsed AST body of a `Unit`, or the compiled definition that
/// replaces it once the Compiler has run (§3: "`ParcelableDef`/`BinderDef`
/// replace the `body` of a `Unit` after compilation").
#[derive(Debug, Clone)]
pub enum UnitBody {
    /// An AIDL `interface` declaration's methods.
    Interface(InterfaceDecl),
    /// An AIDL `parcelable Foo { ... }` declaration's inline field list.
    ParcelableFields(Vec<AidlFieldDecl>),
    /// A Java class implementing `Parcelable`, recovered by the loader from
    /// a sibling `.java` file (or a forward-declared `.aidl` parcelable).
    JavaClass(ClassDecl),
    /// Already compiled - either loaded straight from a precompiled `.json`
    /// unit, or produced by a previous `Compiler` pass over this same `Unit`.
    Compiled(CompiledDef),
}

/// A parsed compilation artifact, cached by the [`crate::Loader`] under its
/// [`QName`]. Invariant: `package + "." + name == qname` (modulo a package of
/// `None`, in which case `qname == name`).
#[derive(Debug)]
pub struct Unit {
    pub qname: QName,
    pub package: Option<String>,
    pub name: String,
    pub unit_type: UnitType,
    /// Non-static imports named directly in the unit's own source (static
    /// imports are dropped per §3); empty for JSON-sourced units.
    pub imports: Vec<String>,
    /// Interior mutability models the single AST→compiled lifecycle
    /// transition (§5: Loader/Workspace types are `RefCell`-based, not
    /// `Sync`, by design); nothing else ever mutates a cached `Unit`.
    pub body: RefCell<UnitBody>,
}

impl Unit {
    pub fn new(
        qname: QName,
        package: Option<String>,
        name: String,
        unit_type: UnitType,
        imports: Vec<String>,
        body: UnitBody,
    ) -> Unit {
        Unit {
            qname,
            package,
            name,
            unit_type,
            imports,
            body: RefCell::new(body),
        }
    }

    pub fn is_compiled(&self) -> bool {
        matches!(&*self.body.borrow(), UnitBody::Compiled(_))
    }

    pub fn compiled(&self) -> Option<CompiledDef> {
        match &*self.body.borrow() {
            UnitBody::Compiled(def) => Some(def.clone()),
            _ => None,
        }
    }

    pub fn set_compiled(&self, def: CompiledDef) {
        *self.body.borrow_mut() = UnitBody::Compiled(def);
    }
}
