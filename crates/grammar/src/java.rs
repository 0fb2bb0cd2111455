use crate::ast::{
    Block, ClassDecl, Expr, JavaConstructor, JavaField, JavaFile, JavaMethod, JavaParam, Stmt,
    TypeRef,
};
use crate::cursor::{Cursor, PResult};
use crate::error::GrammarError;
use crate::lexer::{tokenize, TokenKind};

const MODIFIER_KEYWORDS: &[&str] = &[
    "public",
    "private",
    "protected",
    "abstract",
    "native",
    "synchronized",
    "transient",
    "volatile",
    "default",
    "strictfp",
];

/// Parse a Java source file, recognizing only the restricted statement and
/// expression shapes a parcelable's `CREATOR`/constructor/`readFromParcel`
/// logic is built from (§4.5). Method bodies using anything outside that
/// dialect still parse structurally (every statement kind here is general),
/// but the Compiler may reject patterns it does not recognize.
pub fn parse_java(file: &str, source: &str) -> Result<JavaFile, GrammarError> {
    let tokens = tokenize(file, source)?;
    let mut cur = Cursor::new(file, &tokens);

    let package = parse_package(&mut cur)?;
    let imports = parse_imports(&mut cur)?;

    let mut types = Vec::new();
    loop {
        skip_modifiers(&mut cur);
        if cur.is_eof() {
            break;
        }
        if cur.eat_punct(";") {
            continue;
        }
        if cur.eat_keyword("class") {
            types.push(parse_class(&mut cur)?);
        } else if cur.eat_keyword("interface") || cur.eat_keyword("enum") {
            skip_to_brace_and_consume_block(&mut cur);
        } else {
            return Err(cur.syntax_err(format!(
                "expected a type declaration, found {:?}",
                cur.peek()
            )));
        }
    }

    Ok(JavaFile {
        package,
        imports,
        types,
    })
}

fn parse_package(cur: &mut Cursor) -> PResult<Option<String>> {
    if cur.eat_keyword("package") {
        let name = cur.parse_qualified_name()?;
        cur.expect_punct(";")?;
        Ok(Some(name))
    } else {
        Ok(None)
    }
}

fn parse_imports(cur: &mut Cursor) -> PResult<Vec<String>> {
    let mut imports = Vec::new();
    while cur.eat_keyword("import") {
        let is_static = cur.eat_keyword("static");
        let mut parts = vec![cur.expect_ident()?];
        let mut wildcard = false;
        while cur.eat_punct(".") {
            if cur.eat_punct("*") {
                wildcard = true;
                break;
            }
            parts.push(cur.expect_ident()?);
        }
        cur.expect_punct(";")?;

        // Static imports are omitted from the unit's import list (§3).
        if is_static {
            continue;
        }
        let mut name = parts.join(".");
        if wildcard {
            name.push_str(".*");
        }
        imports.push(name);
    }
    Ok(imports)
}

/// Consumes any run of access/storage modifiers and annotations preceding a
/// declaration. Returns `(is_static, is_final)`.
fn skip_modifiers(cur: &mut Cursor) -> (bool, bool) {
    let mut is_static = false;
    let mut is_final = false;
    loop {
        cur.skip_all_annotations();
        if MODIFIER_KEYWORDS.iter().any(|kw| cur.eat_keyword(kw)) {
            continue;
        }
        if cur.eat_keyword("static") {
            is_static = true;
            continue;
        }
        if cur.eat_keyword("final") {
            is_final = true;
            continue;
        }
        break;
    }
    (is_static, is_final)
}

fn skip_generic_params(cur: &mut Cursor) {
    if cur.eat_punct("<") {
        let mut depth = 1;
        while depth > 0 {
            match cur.bump() {
                TokenKind::Punct("<") => depth += 1,
                TokenKind::Punct(">") => depth -= 1,
                TokenKind::Eof => break,
                _ => {}
            }
        }
    }
}

fn parse_qualified_name_with_generics(cur: &mut Cursor) -> PResult<String> {
    let name = cur.parse_qualified_name()?;
    skip_generic_params(cur);
    Ok(name)
}

fn skip_throws(cur: &mut Cursor) {
    if cur.eat_keyword("throws") {
        loop {
            if parse_qualified_name_with_generics(cur).is_err() {
                break;
            }
            if !cur.eat_punct(",") {
                break;
            }
        }
    }
}

/// Skip tokens up to the next `{`, then skip that brace-delimited block
/// wholesale (used for nested `interface`/`enum` declarations, which carry no
/// parcelable logic of interest).
fn skip_to_brace_and_consume_block(cur: &mut Cursor) {
    while !matches!(cur.peek(), TokenKind::Punct("{")) && !cur.is_eof() {
        cur.bump();
    }
    skip_balanced_braces(cur);
}

fn skip_balanced_braces(cur: &mut Cursor) {
    if !cur.eat_punct("{") {
        return;
    }
    let mut depth = 1;
    while depth > 0 {
        match cur.bump() {
            TokenKind::Punct("{") => depth += 1,
            TokenKind::Punct("}") => depth -= 1,
            TokenKind::Eof => break,
            _ => {}
        }
    }
}

fn parse_class(cur: &mut Cursor) -> PResult<ClassDecl> {
    let name = cur.expect_ident()?;
    skip_generic_params(cur);

    let extends = if cur.eat_keyword("extends") {
        Some(parse_qualified_name_with_generics(cur)?)
    } else {
        None
    };

    let mut implements = Vec::new();
    if cur.eat_keyword("implements") {
        loop {
            implements.push(parse_qualified_name_with_generics(cur)?);
            if !cur.eat_punct(",") {
                break;
            }
        }
    }

    cur.expect_punct("{")?;
    let (fields, methods, constructors, inner_classes) = parse_class_body(cur, &name)?;

    Ok(ClassDecl {
        name,
        extends,
        implements,
        fields,
        methods,
        constructors,
        inner_classes,
    })
}

type ClassBody = (Vec<JavaField>, Vec<JavaMethod>, Vec<JavaConstructor>, Vec<ClassDecl>);

/// Parses class members up to (and consuming) the closing `}`. Shared
/// between named classes and the anonymous `Parcelable.Creator` body that
/// backs a `CREATOR` field.
fn parse_class_body(cur: &mut Cursor, class_name: &str) -> PResult<ClassBody> {
    let mut fields = Vec::new();
    let mut methods = Vec::new();
    let mut constructors = Vec::new();
    let mut inner_classes = Vec::new();

    loop {
        let (is_static, is_final) = skip_modifiers(cur);

        if cur.eat_punct("}") {
            break;
        }
        if cur.eat_punct(";") {
            continue;
        }
        if cur.eat_keyword("class") {
            inner_classes.push(parse_class(cur)?);
            continue;
        }
        if cur.eat_keyword("interface") || cur.eat_keyword("enum") {
            log::debug!("{}: skipping nested interface/enum declaration", cur.file());
            skip_to_brace_and_consume_block(cur);
            continue;
        }
        if matches!(cur.peek(), TokenKind::Punct("{")) {
            // Static or instance initializer block - has no bearing on the
            // recognized parcelable patterns.
            parse_block(cur)?;
            continue;
        }

        let is_constructor = matches!(cur.peek(), TokenKind::Ident(n) if n == class_name)
            && matches!(cur.peek_nth(1), TokenKind::Punct("("));
        if is_constructor {
            cur.bump();
            cur.expect_punct("(")?;
            let params = parse_params(cur)?;
            skip_throws(cur);
            let body = parse_block(cur)?;
            constructors.push(JavaConstructor { params, body });
            continue;
        }

        let type_ref = cur.parse_type()?;
        let mut member_name = cur.expect_ident()?;

        if cur.eat_punct("(") {
            let params = parse_params(cur)?;
            skip_throws(cur);
            let body = if cur.eat_punct(";") {
                None
            } else {
                Some(parse_block(cur)?)
            };
            methods.push(JavaMethod {
                name: member_name,
                return_type: type_ref,
                params,
                is_static,
                body,
            });
            continue;
        }

        loop {
            let mut declared_type = type_ref.clone();
            while cur.eat_punct("[") {
                cur.expect_punct("]")?;
                declared_type = TypeRef::Array(Box::new(declared_type));
            }
            let (initializer, anonymous_body) = if cur.eat_punct("=") {
                parse_field_initializer(cur)?
            } else {
                (None, None)
            };
            fields.push(JavaField {
                name: member_name,
                type_ref: declared_type,
                is_static,
                is_final,
                initializer,
                anonymous_body,
            });
            if cur.eat_punct(",") {
                member_name = cur.expect_ident()?;
                continue;
            }
            break;
        }
        cur.expect_punct(";")?;
    }

    Ok((fields, methods, constructors, inner_classes))
}

fn parse_params(cur: &mut Cursor) -> PResult<Vec<JavaParam>> {
    let mut params = Vec::new();
    if !matches!(cur.peek(), TokenKind::Punct(")")) {
        loop {
            cur.skip_all_annotations();
            let _ = cur.eat_keyword("final");
            let mut type_ref = cur.parse_type()?;
            if cur.eat_punct("...") {
                type_ref = TypeRef::Array(Box::new(type_ref));
            }
            let name = cur.expect_ident()?;
            params.push(JavaParam { name, type_ref });
            if !cur.eat_punct(",") {
                break;
            }
        }
    }
    cur.expect_punct(")")?;
    Ok(params)
}

/// Parses a field's `= ...` initializer. Special-cases `new Type(args) { ... }`
/// so the anonymous `Parcelable.Creator` body conventionally assigned to
/// `CREATOR` is captured structurally rather than discarded.
fn parse_field_initializer(cur: &mut Cursor) -> PResult<(Option<Expr>, Option<Box<ClassDecl>>)> {
    if cur.peek_is_keyword("new") {
        cur.bump();
        let class = cur.parse_type()?;
        cur.expect_punct("(")?;
        let args = parse_args(cur)?;

        if matches!(cur.peek(), TokenKind::Punct("{")) {
            cur.expect_punct("{")?;
            let anon_name = class.simple_name().to_string();
            let (fields, methods, constructors, inner_classes) =
                parse_class_body(cur, &anon_name)?;
            let decl = ClassDecl {
                name: anon_name,
                extends: None,
                implements: Vec::new(),
                fields,
                methods,
                constructors,
                inner_classes,
            };
            return Ok((Some(Expr::New { class, args }), Some(Box::new(decl))));
        }

        return Ok((Some(Expr::New { class, args }), None));
    }

    Ok((Some(parse_expr(cur)?), None))
}

fn parse_block(cur: &mut Cursor) -> PResult<Block> {
    cur.expect_punct("{")?;
    let mut stmts = Vec::new();
    while !cur.eat_punct("}") {
        if cur.is_eof() {
            return Err(cur.eof_err("block"));
        }
        stmts.push(parse_stmt(cur)?);
    }
    Ok(stmts)
}

fn parse_block_or_single(cur: &mut Cursor) -> PResult<Block> {
    if matches!(cur.peek(), TokenKind::Punct("{")) {
        parse_block(cur)
    } else {
        Ok(vec![parse_stmt(cur)?])
    }
}

fn parse_stmt(cur: &mut Cursor) -> PResult<Stmt> {
    cur.skip_all_annotations();

    if matches!(cur.peek(), TokenKind::Punct("{")) {
        return Ok(Stmt::Block(parse_block(cur)?));
    }

    if cur.eat_keyword("if") {
        cur.expect_punct("(")?;
        let cond = parse_expr(cur)?;
        cur.expect_punct(")")?;
        let then_branch = parse_block_or_single(cur)?;
        let else_branch = if cur.eat_keyword("else") {
            Some(parse_block_or_single(cur)?)
        } else {
            None
        };
        return Ok(Stmt::If {
            cond,
            then_branch,
            else_branch,
        });
    }

    if cur.eat_keyword("return") {
        if cur.eat_punct(";") {
            return Ok(Stmt::Return(None));
        }
        let expr = parse_expr(cur)?;
        cur.expect_punct(";")?;
        return Ok(Stmt::Return(Some(expr)));
    }

    if let Some(decl) = try_parse_local_var(cur)? {
        return Ok(decl);
    }

    let expr = parse_expr(cur)?;
    if cur.eat_punct("=") {
        let value = parse_expr(cur)?;
        cur.expect_punct(";")?;
        return Ok(Stmt::Assign {
            target: expr,
            value,
        });
    }
    cur.expect_punct(";")?;
    Ok(Stmt::ExprStmt(expr))
}

/// Speculatively parses `Type name (= expr)? ;`; rewinds and returns `None`
/// if the token shape doesn't match a local variable declaration (e.g. it's
/// actually `a.b = c;` or a bare method-call statement).
fn try_parse_local_var(cur: &mut Cursor) -> PResult<Option<Stmt>> {
    let mark = cur.mark();
    cur.skip_all_annotations();
    let _ = cur.eat_keyword("final");

    let Ok(mut type_ref) = cur.parse_type() else {
        cur.reset(mark);
        return Ok(None);
    };
    while cur.eat_punct("[") {
        if cur.expect_punct("]").is_err() {
            cur.reset(mark);
            return Ok(None);
        }
        type_ref = TypeRef::Array(Box::new(type_ref));
    }

    if !matches!(cur.peek(), TokenKind::Ident(_)) {
        cur.reset(mark);
        return Ok(None);
    }
    let name = cur.expect_ident().expect("checked above");

    if !matches!(cur.peek(), TokenKind::Punct("=") | TokenKind::Punct(";")) {
        cur.reset(mark);
        return Ok(None);
    }

    let init = if cur.eat_punct("=") {
        Some(parse_expr(cur)?)
    } else {
        None
    };
    cur.expect_punct(";")?;
    Ok(Some(Stmt::LocalVar {
        name,
        type_ref: Some(type_ref),
        init,
    }))
}

fn parse_expr(cur: &mut Cursor) -> PResult<Expr> {
    parse_equality(cur)
}

const COMPARISON_OPS: &[&str] = &["==", "!=", "<=", ">=", "<", ">"];

fn parse_equality(cur: &mut Cursor) -> PResult<Expr> {
    let lhs = parse_unary(cur)?;
    let op = match cur.peek() {
        TokenKind::Punct(p) if COMPARISON_OPS.contains(p) => Some(*p),
        _ => None,
    };
    let Some(op) = op else {
        return Ok(lhs);
    };
    cur.bump();
    let rhs = parse_unary(cur)?;
    Ok(Expr::Binary {
        op: op.to_string(),
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    })
}

fn parse_unary(cur: &mut Cursor) -> PResult<Expr> {
    if cur.eat_punct("!") {
        let expr = parse_unary(cur)?;
        return Ok(Expr::Unary {
            op: "!".to_string(),
            expr: Box::new(expr),
        });
    }
    if cur.eat_punct("-") {
        let expr = parse_unary(cur)?;
        return Ok(Expr::Unary {
            op: "-".to_string(),
            expr: Box::new(expr),
        });
    }
    parse_postfix(cur)
}

fn parse_postfix(cur: &mut Cursor) -> PResult<Expr> {
    let mut expr = parse_primary(cur)?;
    loop {
        if cur.eat_punct(".") {
            let name = cur.expect_ident()?;
            if cur.eat_punct("(") {
                let args = parse_args(cur)?;
                expr = Expr::MethodCall {
                    target: Some(Box::new(expr)),
                    name,
                    args,
                };
            } else {
                expr = Expr::FieldAccess(Box::new(expr), name);
            }
        } else {
            break;
        }
    }
    Ok(expr)
}

fn parse_primary(cur: &mut Cursor) -> PResult<Expr> {
    match cur.peek().clone() {
        TokenKind::IntLit(raw) => {
            cur.bump();
            Ok(Expr::IntLit(raw))
        }
        TokenKind::StringLit(s) => {
            cur.bump();
            Ok(Expr::StringLit(s))
        }
        TokenKind::CharLit(s) => {
            cur.bump();
            Ok(Expr::CharLit(s))
        }
        TokenKind::BoolLit(b) => {
            cur.bump();
            Ok(Expr::BoolLit(b))
        }
        TokenKind::NullLit => {
            cur.bump();
            Ok(Expr::NullLit)
        }
        TokenKind::Punct("(") => parse_paren_or_cast(cur),
        TokenKind::Ident(name) => {
            cur.bump();
            match name.as_str() {
                "this" => Ok(Expr::This),
                "new" => {
                    let class = cur.parse_type()?;
                    cur.expect_punct("(")?;
                    let args = parse_args(cur)?;
                    Ok(Expr::New { class, args })
                }
                _ => {
                    if cur.eat_punct("(") {
                        let args = parse_args(cur)?;
                        Ok(Expr::MethodCall {
                            target: None,
                            name,
                            args,
                        })
                    } else {
                        Ok(Expr::Ident(name))
                    }
                }
            }
        }
        _ => Err(cur.syntax_err(format!("expected expression, found {:?}", cur.peek()))),
    }
}

fn looks_like_expression_start(tok: &TokenKind) -> bool {
    matches!(
        tok,
        TokenKind::Ident(_)
            | TokenKind::IntLit(_)
            | TokenKind::StringLit(_)
            | TokenKind::CharLit(_)
            | TokenKind::BoolLit(_)
            | TokenKind::NullLit
            | TokenKind::Punct("(")
            | TokenKind::Punct("!")
    )
}

/// Disambiguates `(Type) operand` casts from plain parenthesized
/// expressions: try parsing a type, and only commit to the cast reading if
/// the token right after the closing `)` can start an expression.
fn parse_paren_or_cast(cur: &mut Cursor) -> PResult<Expr> {
    let mark = cur.mark();
    cur.expect_punct("(")?;

    if let Ok(type_ref) = cur.parse_type() {
        if cur.eat_punct(")") && looks_like_expression_start(cur.peek()) {
            let before_operand = cur.mark();
            if let Ok(operand) = parse_unary(cur) {
                return Ok(Expr::Cast(type_ref, Box::new(operand)));
            }
            cur.reset(before_operand);
        }
    }

    cur.reset(mark);
    cur.expect_punct("(")?;
    let inner = parse_expr(cur)?;
    cur.expect_punct(")")?;
    Ok(inner)
}

fn parse_args(cur: &mut Cursor) -> PResult<Vec<Expr>> {
    let mut args = Vec::new();
    if !matches!(cur.peek(), TokenKind::Punct(")")) {
        loop {
            args.push(parse_expr(cur)?);
            if !cur.eat_punct(",") {
                break;
            }
        }
    }
    cur.expect_punct(")")?;
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_package_and_imports_skipping_static() {
        let src = "package com.example; import android.os.Parcel; import static java.lang.Math.abs; class Foo {}";
        let file = parse_java("Foo.java", src).unwrap();
        assert_eq!(file.package.as_deref(), Some("com.example"));
        assert_eq!(file.imports, vec!["android.os.Parcel".to_string()]);
    }

    #[test]
    fn parses_simple_parcel_constructor() {
        let src = r#"
            package com.example;
            class Foo implements Parcelable {
                int flag;
                String name;

                Foo(Parcel p) {
                    flag = p.readInt();
                    if (flag != 0) {
                        name = p.readString();
                    }
                }
            }
        "#;
        let file = parse_java("Foo.java", src).unwrap();
        let class = &file.types[0];
        assert!(class.implements_parcelable());
        assert_eq!(class.constructors.len(), 1);
        let body = &class.constructors[0].body;
        assert_eq!(body.len(), 2);
        assert!(matches!(body[0], Stmt::Assign { .. }));
        assert!(matches!(body[1], Stmt::If { .. }));
    }

    #[test]
    fn parses_creator_anonymous_class() {
        let src = r#"
            class Foo implements Parcelable {
                public static final Parcelable.Creator<Foo> CREATOR = new Parcelable.Creator<Foo>() {
                    public Foo createFromParcel(Parcel in) {
                        return new Foo(in);
                    }
                    public Foo[] newArray(int size) {
                        return new Foo[size];
                    }
                };

                Foo(Parcel in) {
                    this.value = in.readInt();
                }

                int value;
            }
        "#;
        let file = parse_java("Foo.java", src).unwrap();
        let class = &file.types[0];
        let creator = class.fields.iter().find(|f| f.name == "CREATOR").unwrap();
        let anon = creator.anonymous_body.as_ref().unwrap();
        assert!(anon.method("createFromParcel").is_some());
        let body = anon.method("createFromParcel").unwrap().body.as_ref().unwrap();
        assert!(matches!(body[0], Stmt::Return(Some(Expr::New { .. }))));
    }

    #[test]
    fn parses_super_delegation_and_helper_call() {
        let src = r#"
            class Foo extends Base implements Parcelable {
                void readFromParcel(Parcel p) {
                    super.readFromParcel(p);
                    helper(p);
                }
            }
        "#;
        let file = parse_java("Foo.java", src).unwrap();
        let class = &file.types[0];
        let body = class.method("readFromParcel").unwrap().body.as_ref().unwrap();
        let Stmt::ExprStmt(Expr::MethodCall { target, name, .. }) = &body[0] else {
            panic!("expected super.readFromParcel call, got {:?}", body[0]);
        };
        assert_eq!(name, "readFromParcel");
        assert!(target.as_ref().unwrap().is_ident("super"));
        assert!(matches!(body[1], Stmt::ExprStmt(Expr::MethodCall { target: None, .. })));
    }

    #[test]
    fn parses_cast_expression() {
        let src = r#"
            class Foo {
                void f(Parcel p) {
                    Object o = (Object) p.readValue(null);
                }
            }
        "#;
        let file = parse_java("Foo.java", src).unwrap();
        let class = &file.types[0];
        let body = class.method("f").unwrap().body.as_ref().unwrap();
        let Stmt::LocalVar { init: Some(Expr::Cast(..)), .. } = &body[0] else {
            panic!("expected cast expression, got {:?}", body[0]);
        };
    }
}
