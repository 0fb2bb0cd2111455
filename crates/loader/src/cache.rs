use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use aidl_ir_grammar::ast::{AidlFile, AidlItem, ClassDecl, JavaFile};
use aidl_ir_grammar::{parse_aidl, parse_java};
use aidl_ir_model::{CompiledDef, QName, UnitType};

use crate::error::LoaderError;
use crate::resolve::{find_sibling, find_unit_file, list_unit_files, qname_to_relative_base};
use crate::unit::{Unit, UnitBody};

/// Content-addressed cache over AIDL/Java/JSON units, resolved against a list
/// of search roots (`-I` directories, §4.1).
///
/// `!Sync` by construction (the cache is a plain `RefCell`): a `Loader` is
/// meant to be owned by a single `Workspace` on a single thread, not shared
/// across worker threads (§5).
pub struct Loader {
    search_path: Vec<PathBuf>,
    cache: RefCell<HashMap<QName, Rc<Unit>>>,
}

impl Loader {
    pub fn new(search_path: Vec<PathBuf>) -> Loader {
        Loader { search_path, cache: RefCell::new(HashMap::new()) }
    }

    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    pub fn get_cached(&self, qname: &QName) -> Option<Rc<Unit>> {
        self.cache.borrow().get(qname).cloned()
    }

    /// Every unit loaded so far, in no particular order. Used by `Workspace::catalog`
    /// to enumerate what has actually been compiled without tracking a
    /// separate list on top of the cache.
    pub fn cached_units(&self) -> Vec<Rc<Unit>> {
        self.cache.borrow().values().cloned().collect()
    }

    /// Insert an already-compiled definition straight into the cache,
    /// bypassing file resolution entirely. Used to restore a JSON catalog
    /// produced by a previous run (§6) without re-reading source units.
    pub fn insert_compiled(&self, def: CompiledDef) {
        let qname = def.qname().clone();
        let unit_type = match &def {
            CompiledDef::Binder(_) => UnitType::Binder,
            CompiledDef::Parcelable(p) => p.unit_type,
        };
        let (package, name) = split_qname(&qname);
        let unit = Unit::new(qname.clone(), package, name, unit_type, Vec::new(), UnitBody::Compiled(def));
        self.cache.borrow_mut().insert(qname, Rc::new(unit));
    }

    /// Resolve `qname`, dispatching to wildcard or single-unit resolution
    /// (§4.1).
    pub fn resolve(&self, qname: &QName) -> Result<Vec<Rc<Unit>>, LoaderError> {
        if qname.is_wildcard() {
            self.load_wildcard(qname)
        } else {
            self.load(qname).map(|u| vec![u])
        }
    }

    /// Load (or return the cached) unit named by a non-wildcard `qname`.
    pub fn load(&self, qname: &QName) -> Result<Rc<Unit>, LoaderError> {
        if qname.is_wildcard() {
            return Err(LoaderError::NotAWildcard { qname: qname.as_str().to_string() });
        }
        if let Some(unit) = self.get_cached(qname) {
            return Ok(unit);
        }

        let base = qname_to_relative_base(qname);
        let (path, ext) = find_unit_file(&self.search_path, &base).ok_or_else(|| {
            LoaderError::FileNotFound {
                qname: qname.as_str().to_string(),
                tried: crate::resolve::EXTENSIONS.to_vec(),
            }
        })?;

        let unit = match ext {
            "json" => self.load_json_unit(qname, &path)?,
            "aidl" => self.load_aidl_unit(qname, &path)?,
            "java" => self.load_java_unit(qname, &path)?,
            _ => unreachable!("find_unit_file only returns known extensions"),
        };

        let unit = Rc::new(unit);
        self.cache.borrow_mut().insert(qname.clone(), unit.clone());
        Ok(unit)
    }

    /// Resolve a `pkg.*` wildcard import by listing every recognized unit
    /// file directly under `pkg`'s directory (S6: unrecognized extensions are
    /// silently skipped).
    fn load_wildcard(&self, qname: &QName) -> Result<Vec<Rc<Unit>>, LoaderError> {
        let pkg = qname.as_str().trim_end_matches(".*").trim_end_matches('*');
        let pkg = pkg.trim_end_matches('.');
        let rel = pkg.replace('.', "/");

        let mut units = Vec::new();
        for root in &self.search_path {
            let dir = root.join(&rel);
            for (path, _ext) in list_unit_files(&dir) {
                let stem = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .ok_or_else(|| LoaderError::ImportNotFound(qname.as_str().to_string()))?;
                let member_qname = if pkg.is_empty() {
                    QName::new(stem)?
                } else {
                    QName::new(format!("{pkg}.{stem}"))?
                };
                units.push(self.load(&member_qname)?);
            }
        }
        Ok(units)
    }

    fn load_json_unit(&self, qname: &QName, path: &Path) -> Result<Unit, LoaderError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| LoaderError::Io { path: path.to_path_buf(), source })?;
        let def: CompiledDef = serde_json::from_str(&text)
            .map_err(|source| LoaderError::JsonError { path: path.to_path_buf(), source })?;

        let unit_type = match &def {
            CompiledDef::Binder(_) => UnitType::Binder,
            CompiledDef::Parcelable(p) => p.unit_type,
        };
        let (package, name) = split_qname(qname);
        Ok(Unit::new(qname.clone(), package, name, unit_type, Vec::new(), UnitBody::Compiled(def)))
    }

    fn load_aidl_unit(&self, qname: &QName, path: &Path) -> Result<Unit, LoaderError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| LoaderError::Io { path: path.to_path_buf(), source })?;
        let file_label = path.to_string_lossy().into_owned();
        let ast: AidlFile = parse_aidl(&file_label, &text)
            .map_err(|source| LoaderError::SyntaxError { path: path.to_path_buf(), source })?;

        let simple_name = qname.simple_name();
        let item = ast
            .items
            .into_iter()
            .find(|item| item_name(item) == simple_name)
            .ok_or_else(|| LoaderError::DeclarationNotFound(simple_name.to_string()))?;

        let (package, name) = split_qname(qname);

        match item {
            AidlItem::Interface(decl) => Ok(Unit::new(
                qname.clone(),
                package,
                name,
                UnitType::Binder,
                ast.imports,
                UnitBody::Interface(decl),
            )),
            AidlItem::Parcelable(decl) => match decl.fields {
                Some(fields) => Ok(Unit::new(
                    qname.clone(),
                    package,
                    name,
                    UnitType::Parcelable,
                    ast.imports,
                    UnitBody::ParcelableFields(fields),
                )),
                // Forward declaration: `parcelable Foo;` with the real logic
                // living in a sibling Foo.java (§4.1).
                None => {
                    let java_path = find_sibling(path, "java").ok_or_else(|| {
                        LoaderError::FileNotFound {
                            qname: qname.as_str().to_string(),
                            tried: vec!["java"],
                        }
                    })?;
                    self.load_java_unit(qname, &java_path)
                }
            },
        }
    }

    fn load_java_unit(&self, qname: &QName, path: &Path) -> Result<Unit, LoaderError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| LoaderError::Io { path: path.to_path_buf(), source })?;
        let file_label = path.to_string_lossy().into_owned();
        let ast: JavaFile = parse_java(&file_label, &text)
            .map_err(|source| LoaderError::SyntaxError { path: path.to_path_buf(), source })?;

        let simple_name = qname.simple_name();
        // §4.1: if the exact class isn't found at top level or nested within
        // this file, don't fail the whole lookup - register a phantom unit
        // (name only, no fields/methods/constructors) so callers that only
        // need a QName to resolve (e.g. an import reference) don't abort.
        let class = find_class(&ast.types, simple_name)
            .cloned()
            .unwrap_or_else(|| phantom_class(simple_name));

        let (package, name) = split_qname(qname);
        Ok(Unit::new(
            qname.clone(),
            package,
            name,
            UnitType::ParcelableJava,
            ast.imports,
            UnitBody::JavaClass(class),
        ))
    }
}

fn item_name(item: &AidlItem) -> &str {
    match item {
        AidlItem::Interface(decl) => &decl.name,
        AidlItem::Parcelable(decl) => &decl.name,
    }
}

/// Look up a (possibly nested) class by simple name among a file's top-level
/// declarations, walking inner classes. This is the "phantom unit" path: a
/// nested class like `pkg.Outer.Inner` never gets its own file, so resolution
/// bottoms out in `Outer`'s already-parsed body.
fn find_class<'a>(types: &'a [ClassDecl], simple_name: &str) -> Option<&'a ClassDecl> {
    for top in types {
        if top.name == simple_name {
            return Some(top);
        }
        if let Some(found) = top.find_inner(simple_name) {
            return Some(found);
        }
    }
    None
}

fn split_qname(qname: &QName) -> (Option<String>, String) {
    (qname.package().map(str::to_string), qname.simple_name().to_string())
}

/// §4.1's "last-resort fallback": a class carrying only a name, with no
/// fields, methods, constructors, or supertypes. Translating one yields an
/// empty field list rather than aborting compilation of the enclosing unit.
fn phantom_class(name: &str) -> ClassDecl {
    ClassDecl {
        name: name.to_string(),
        extends: None,
        implements: Vec::new(),
        fields: Vec::new(),
        methods: Vec::new(),
        constructors: Vec::new(),
        inner_classes: Vec::new(),
    }
}
