use aidl_ir_grammar::ast::{ClassDecl, Expr};

/// Evaluates a constant expression to its textual form for a `ConditionDef`'s
/// `check` field (§4.4, `const_val_of`). Identifier references are resolved
/// one level deep against the enclosing class's field initializers.
pub fn const_val_of(expr: &Expr, class: &ClassDecl) -> String {
    match expr {
        Expr::IntLit(raw) => normalize_int_literal(raw),
        Expr::StringLit(s) | Expr::CharLit(s) => s.clone(),
        Expr::BoolLit(b) => b.to_string(),
        Expr::NullLit => "null".to_string(),
        Expr::Ident(name) => class
            .fields
            .iter()
            .find(|f| &f.name == name)
            .and_then(|f| f.initializer.as_ref())
            .map(|init| literal_text(init))
            .unwrap_or_else(|| name.clone()),
        Expr::FieldAccess(_, field) => field.clone(),
        Expr::Unary { op, expr } if op == "-" => format!("-{}", const_val_of(expr.as_ref(), class)),
        _ => "0".to_string(),
    }
}

/// One level of resolution: a field initializer is taken at face value, not
/// recursively re-resolved against further identifiers.
fn literal_text(expr: &Expr) -> String {
    match expr {
        Expr::IntLit(raw) => normalize_int_literal(raw),
        Expr::StringLit(s) | Expr::CharLit(s) => s.clone(),
        Expr::BoolLit(b) => b.to_string(),
        Expr::NullLit => "null".to_string(),
        _ => "0".to_string(),
    }
}

fn normalize_int_literal(raw: &str) -> String {
    let trimmed = raw.trim_end_matches(['L', 'l']);
    let value: i64 = if let Some(hex) = strip_prefix_ci(trimmed, "0x") {
        i64::from_str_radix(hex, 16).unwrap_or(0)
    } else if let Some(bin) = strip_prefix_ci(trimmed, "0b") {
        i64::from_str_radix(bin, 2).unwrap_or(0)
    } else if trimmed.len() > 1 && trimmed.starts_with('0') {
        i64::from_str_radix(&trimmed[1..], 8).unwrap_or(0)
    } else {
        trimmed.parse().unwrap_or(0)
    };
    value.to_string()
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if s.len() >= prefix.len() && s[..prefix.len()].eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_class() -> ClassDecl {
        ClassDecl {
            name: "Foo".into(),
            extends: None,
            implements: vec![],
            fields: vec![],
            methods: vec![],
            constructors: vec![],
            inner_classes: vec![],
        }
    }

    #[test]
    fn decimal_literal() {
        assert_eq!(const_val_of(&Expr::IntLit("0".into()), &empty_class()), "0");
    }

    #[test]
    fn hex_literal_with_suffix() {
        assert_eq!(const_val_of(&Expr::IntLit("0x1FL".into()), &empty_class()), "31");
    }

    #[test]
    fn octal_literal() {
        assert_eq!(const_val_of(&Expr::IntLit("010".into()), &empty_class()), "8");
    }
}
