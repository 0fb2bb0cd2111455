//! Typed AST produced by the AIDL and Java-dialect parsers.
//!
//! This plays the role the system's tree-sitter-backed "Grammar Adapter"
//! plays over an external CST: everything downstream (the loader, the
//! compiler) only ever touches these typed accessors, never raw tokens.

/// A type reference as written in source: `int`, `String[]`, `List<IBinder>`,
/// `some.pkg.Outer.Inner`, ...
#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef {
    /// A bare name, possibly dotted (`IBinder`, `android.os.Bundle`).
    Named(String),
    /// `T[]`
    Array(Box<TypeRef>),
    /// `Base<Args...>` - `List<Foo>`, `ParceledListSlice<Foo>`, or a bare
    /// `List` with no type argument at all.
    Generic {
        base: String,
        args: Vec<TypeRef>,
    },
}

impl TypeRef {
    pub fn simple_name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name.rsplit('.').next().unwrap_or(name),
            TypeRef::Array(inner) => inner.simple_name(),
            TypeRef::Generic { base, .. } => base.rsplit('.').next().unwrap_or(base),
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, TypeRef::Array(_))
    }
}

/// AIDL parameter direction modifier (default is `in` when absent).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamModifier {
    In,
    Out,
    InOut,
}

impl Default for ParamModifier {
    fn default() -> Self {
        ParamModifier::In
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AidlFile {
    pub package: Option<String>,
    pub imports: Vec<String>,
    pub items: Vec<AidlItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AidlItem {
    Interface(InterfaceDecl),
    Parcelable(AidlParcelableDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub name: String,
    pub methods: Vec<AidlMethod>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AidlMethod {
    pub name: String,
    pub return_type: TypeRef,
    pub oneway: bool,
    pub params: Vec<AidlParam>,
    /// A trailing `= <int>` transaction-code attribute, when the AIDL source
    /// pins one explicitly (§9 Open Questions: tc override).
    pub tc_override: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AidlParam {
    pub name: String,
    pub type_ref: TypeRef,
    pub modifier: ParamModifier,
}

/// An AIDL `parcelable Foo { ... fields ... }` or a forward declaration
/// `parcelable Foo;` (body is `None`, meaning a sibling `.java` carries the
/// logic).
#[derive(Debug, Clone, PartialEq)]
pub struct AidlParcelableDecl {
    pub name: String,
    pub fields: Option<Vec<AidlFieldDecl>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AidlFieldDecl {
    pub name: String,
    pub type_ref: TypeRef,
    pub is_static: bool,
}

// ---- Java-dialect AST ----

#[derive(Debug, Clone, PartialEq)]
pub struct JavaFile {
    pub package: Option<String>,
    pub imports: Vec<String>,
    pub types: Vec<ClassDecl>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub extends: Option<String>,
    pub implements: Vec<String>,
    pub fields: Vec<JavaField>,
    pub methods: Vec<JavaMethod>,
    pub constructors: Vec<JavaConstructor>,
    pub inner_classes: Vec<ClassDecl>,
}

impl ClassDecl {
    pub fn implements_parcelable(&self) -> bool {
        self.implements.iter().any(|i| i == "Parcelable")
    }

    /// Recursively look up a nested class by simple name.
    pub fn find_inner(&self, name: &str) -> Option<&ClassDecl> {
        self.inner_classes.iter().find_map(|c| {
            if c.name == name {
                Some(c)
            } else {
                c.find_inner(name)
            }
        })
    }

    pub fn method(&self, name: &str) -> Option<&JavaMethod> {
        self.methods.iter().find(|m| m.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JavaField {
    pub name: String,
    pub type_ref: TypeRef,
    pub is_static: bool,
    pub is_final: bool,
    pub initializer: Option<Expr>,
    /// Populated only for the conventional `public static final Parcelable.Creator<T> CREATOR`
    /// field: the body of its anonymous `new Parcelable.Creator<T>() { ... }` class.
    pub anonymous_body: Option<Box<ClassDecl>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JavaParam {
    pub name: String,
    pub type_ref: TypeRef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JavaMethod {
    pub name: String,
    pub return_type: TypeRef,
    pub params: Vec<JavaParam>,
    pub is_static: bool,
    pub body: Option<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JavaConstructor {
    pub params: Vec<JavaParam>,
    pub body: Block,
}

pub type Block = Vec<Stmt>;

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    LocalVar {
        name: String,
        type_ref: Option<TypeRef>,
        init: Option<Expr>,
    },
    Assign {
        target: Expr,
        value: Expr,
    },
    ExprStmt(Expr),
    If {
        cond: Expr,
        then_branch: Block,
        else_branch: Option<Block>,
    },
    Return(Option<Expr>),
    Block(Block),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(String),
    This,
    FieldAccess(Box<Expr>, String),
    MethodCall {
        target: Option<Box<Expr>>,
        name: String,
        args: Vec<Expr>,
    },
    New {
        class: TypeRef,
        args: Vec<Expr>,
    },
    IntLit(String),
    StringLit(String),
    CharLit(String),
    BoolLit(bool),
    NullLit,
    Cast(TypeRef, Box<Expr>),
    Binary {
        op: String,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: String,
        expr: Box<Expr>,
    },
}

impl Expr {
    /// Flatten a `a.b.c` chain of field accesses/idents into dotted text, if
    /// the expression is purely that shape.
    pub fn as_dotted_path(&self) -> Option<String> {
        match self {
            Expr::Ident(name) => Some(name.clone()),
            Expr::FieldAccess(base, field) => {
                base.as_dotted_path().map(|b| format!("{b}.{field}"))
            }
            _ => None,
        }
    }

    /// True if this expression is exactly the identifier `name`.
    pub fn is_ident(&self, name: &str) -> bool {
        matches!(self, Expr::Ident(n) if n == name)
    }
}
