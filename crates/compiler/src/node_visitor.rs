use std::collections::HashSet;

use aidl_ir_grammar::ast::{Block, ClassDecl, Expr, Stmt};
use aidl_ir_model::{ConditionDef, Field};

use crate::const_eval::const_val_of;
use crate::import::ImportDefList;
use crate::preprocess::Preprocessor;
use crate::type_handler::TypeHandler;

/// Walks a Java-dialect method body under a single "parcel tracker"
/// parameter, producing the ordered `Field` list a `ParcelableDef` needs
/// (§4.6). One visitor instance serves the whole translation of a unit;
/// helper-method and super delegations just recurse with a different
/// tracker name and the same shared `visited` guard.
pub struct NodeVisitor<'a> {
    class: &'a ClassDecl,
    pre: &'a Preprocessor<'a>,
    imports: &'a ImportDefList<'a>,
    types: &'a TypeHandler<'a>,
}

impl<'a> NodeVisitor<'a> {
    pub fn new(
        class: &'a ClassDecl,
        pre: &'a Preprocessor<'a>,
        imports: &'a ImportDefList<'a>,
        types: &'a TypeHandler<'a>,
    ) -> Self {
        NodeVisitor { class, pre, imports, types }
    }

    pub fn translate_block(&self, block: &Block, tracker: &str) -> Vec<Field> {
        let mut out = Vec::new();
        let mut visited = HashSet::new();
        self.walk_block(block, tracker, &mut out, &mut visited);
        out
    }

    fn walk_block(
        &self,
        block: &Block,
        tracker: &str,
        out: &mut Vec<Field>,
        visited: &mut HashSet<String>,
    ) {
        for (idx, stmt) in block.iter().enumerate() {
            match stmt {
                Stmt::LocalVar { name, init: Some(expr), .. } => {
                    if expr_is_tracker_call(expr, tracker) {
                        let call = self.call_from_expr(expr, tracker);
                        let member = find_forward_assignment(&block[idx + 1..], name);
                        out.push(Field::field(member.unwrap_or_else(|| name.clone()), call));
                    }
                }
                Stmt::LocalVar { .. } => {}
                Stmt::Assign { target, value } => {
                    if let Some(member) = member_name(target) {
                        if expr_is_tracker_call(value, tracker) {
                            out.push(Field::field(member, self.call_from_expr(value, tracker)));
                        }
                    }
                }
                Stmt::ExprStmt(expr) => self.handle_expr_stmt(expr, tracker, out, visited),
                Stmt::If { cond, then_branch, else_branch } => {
                    match self.translate_condition(
                        cond,
                        tracker,
                        then_branch,
                        else_branch.as_deref(),
                    ) {
                        Some(cond_def) => out.push(Field::Condition(cond_def)),
                        None => {
                            self.walk_block(then_branch, tracker, out, visited);
                            if let Some(else_branch) = else_branch {
                                self.walk_block(else_branch, tracker, out, visited);
                            }
                        }
                    }
                }
                Stmt::Return(Some(Expr::New { class, args }))
                    if args.len() == 1 && args[0].is_ident(tracker) =>
                {
                    if class.simple_name() == self.class.name {
                        if let Some(ctor) = self.pre.get_parcel_constructor() {
                            self.walk_block(&ctor.body, &ctor.params[0].name, out, visited);
                        }
                    }
                    return;
                }
                Stmt::Return(_) => {
                    out.push(Field::stop());
                    return;
                }
                Stmt::Block(inner) => self.walk_block(inner, tracker, out, visited),
            }
        }
    }

    fn handle_expr_stmt(
        &self,
        expr: &Expr,
        tracker: &str,
        out: &mut Vec<Field>,
        visited: &mut HashSet<String>,
    ) {
        let Expr::MethodCall { target, name, args } = expr else { return };

        match target.as_deref() {
            Some(target) if target.is_ident("super") => {
                if let Some(super_name) = &self.class.extends {
                    let super_qname = self.qualify_super(super_name);
                    out.push(Field::field("_super", format!("readParcelable:{super_qname}")));
                }
            }
            Some(target) if target.is_ident(tracker) => {
                out.push(Field::field(tracker.to_string(), self.call_from_expr(expr, tracker)));
            }
            Some(target) => {
                if let Some(member) = target.as_dotted_path() {
                    if args.iter().any(|a| a.is_ident(tracker)) {
                        if let Some(field) = self.pre.member(&member) {
                            out.push(Field::field(member, self.types.call_of(&field.type_ref)));
                        }
                    }
                }
            }
            None => {
                if args.len() == 1 && args[0].is_ident(tracker) && visited.insert(name.clone()) {
                    if let Some(method) = self.pre.method(name) {
                        if let Some(body) = &method.body {
                            let helper_tracker = &method.params[0].name;
                            self.walk_block(body, helper_tracker, out, visited);
                        }
                    }
                }
            }
        }
    }

    fn translate_condition(
        &self,
        cond: &Expr,
        tracker: &str,
        then_branch: &Block,
        else_branch: Option<&Block>,
    ) -> Option<ConditionDef> {
        let Expr::Binary { op, lhs, rhs } = cond else { return None };

        let (call_expr, const_expr, op) = if expr_is_tracker_call(lhs, tracker) {
            (lhs.as_ref(), rhs.as_ref(), op.clone())
        } else if expr_is_tracker_call(rhs, tracker) {
            (rhs.as_ref(), lhs.as_ref(), flip_comparison(op))
        } else {
            return None;
        };

        let call = bare_verb(call_expr);
        let check = const_val_of(const_expr, self.class);
        let consequence = self.translate_block(then_branch, tracker);
        let alternative = else_branch.map(|b| self.translate_block(b, tracker)).unwrap_or_default();
        Some(ConditionDef { call, check, op, consequence, alternative })
    }

    /// `call_from_expr` (§4.6): derive a call-script operation string from an
    /// invocation on the tracker, unwrapping casts and recognizing the
    /// `CREATOR`-referencing typed-container idioms.
    fn call_from_expr(&self, expr: &Expr, tracker: &str) -> String {
        if let Expr::Cast(_, inner) = expr {
            return self.call_from_expr(inner, tracker);
        }
        if let Some(class_name) = creator_create_from_parcel_class(expr) {
            return format!("readParcelable:{}", self.resolve_class_name(&class_name));
        }
        if let Expr::MethodCall { target: Some(target), name, args } = expr {
            if target.is_ident(tracker) {
                return match name.as_str() {
                    "readTypedList" => format!("readList:{}", self.resolve_creator_arg(args)),
                    "readTypedObject" => {
                        format!("readParcelable:{}", self.resolve_creator_arg(args))
                    }
                    "createTypedArray" => {
                        format!("readParcelableVector:{}", self.resolve_creator_arg(args))
                    }
                    other => other.to_string(),
                };
            }
        }
        if let Expr::MethodCall { name, .. } = expr {
            return name.clone();
        }
        "unknown".to_string()
    }

    /// Resolve the class referenced by a `Class.CREATOR` argument (in
    /// `readTypedList`/`readTypedObject`/`createTypedArray`) to a QName.
    fn resolve_creator_arg(&self, args: &[Expr]) -> String {
        for arg in args {
            if let Expr::FieldAccess(base, field) = arg {
                if field == "CREATOR" {
                    if let Some(dotted) = base.as_dotted_path() {
                        return self.resolve_class_name(&dotted);
                    }
                }
            }
        }
        "unknown".to_string()
    }

    fn resolve_class_name(&self, dotted: &str) -> String {
        let simple = dotted.rsplit('.').next().unwrap_or(dotted);
        match self.imports.get_by_simple_name(simple) {
            Some(import) => import.qname.to_string(),
            None => dotted.to_string(),
        }
    }

    fn qualify_super(&self, simple: &str) -> String {
        self.resolve_class_name(simple)
    }
}

fn bare_verb(expr: &Expr) -> String {
    match expr {
        Expr::Cast(_, inner) => bare_verb(inner),
        Expr::MethodCall { name, .. } => name.clone(),
        _ => "unknown".to_string(),
    }
}

fn expr_is_tracker_call(expr: &Expr, tracker: &str) -> bool {
    match expr {
        Expr::Cast(_, inner) => expr_is_tracker_call(inner, tracker),
        Expr::MethodCall { target: Some(target), .. } => target.is_ident(tracker),
        _ => creator_create_from_parcel_class(expr).is_some(),
    }
}

fn creator_create_from_parcel_class(expr: &Expr) -> Option<String> {
    let Expr::MethodCall { target: Some(target), name, .. } = expr else { return None };
    if name != "createFromParcel" {
        return None;
    }
    let Expr::FieldAccess(base, field) = target.as_ref() else { return None };
    if field != "CREATOR" {
        return None;
    }
    base.as_dotted_path()
}

fn member_name(target: &Expr) -> Option<String> {
    match target {
        Expr::Ident(name) => Some(name.clone()),
        Expr::FieldAccess(base, field) if matches!(base.as_ref(), Expr::This) => {
            Some(field.clone())
        }
        _ => None,
    }
}

/// Find the first `<member> = var` (or `this.<member> = var`) assignment
/// following a local-variable declaration, within the same block.
fn find_forward_assignment(rest: &[Stmt], var: &str) -> Option<String> {
    rest.iter().find_map(|stmt| match stmt {
        Stmt::Assign { target, value } if value.is_ident(var) => member_name(target),
        _ => None,
    })
}

fn flip_comparison(op: &str) -> String {
    match op {
        "<" => ">".to_string(),
        ">" => "<".to_string(),
        "<=" => ">=".to_string(),
        ">=" => "<=".to_string(),
        other => other.to_string(),
    }
}
