use crate::ast::{AidlFieldDecl, AidlFile, AidlItem, AidlMethod, AidlParam, AidlParcelableDecl, InterfaceDecl, TypeRef};
use crate::cursor::{Cursor, PResult};
use crate::error::GrammarError;
use crate::lexer::{tokenize, TokenKind};

/// Parse a full `.aidl` source file.
pub fn parse_aidl(file: &str, source: &str) -> Result<AidlFile, GrammarError> {
    let tokens = tokenize(file, source)?;
    let mut cur = Cursor::new(file, &tokens);

    let package = parse_package(&mut cur)?;
    let imports = parse_imports(&mut cur)?;

    let mut items = Vec::new();
    while !cur.is_eof() {
        cur.skip_all_annotations();
        if cur.is_eof() {
            break;
        }
        items.push(parse_item(&mut cur)?);
    }

    Ok(AidlFile {
        package,
        imports,
        items,
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

        let mut name = parts.join(".");
        if wildcard {
            name.push_str(".*");
        }
        imports.push(name);
    }
    Ok(imports)
}

fn parse_item(cur: &mut Cursor) -> PResult<AidlItem> {
    if cur.eat_keyword("interface") {
        Ok(AidlItem::Interface(parse_interface(cur)?))
    } else if cur.eat_keyword("parcelable") {
        Ok(AidlItem::Parcelable(parse_parcelable(cur)?))
    } else {
        Err(GrammarError::syntax(
            cur.file(),
            1,
            1,
            format!("expected 'interface' or 'parcelable', found {:?}", cur.peek()),
        ))
    }
}

fn parse_interface(cur: &mut Cursor) -> PResult<InterfaceDecl> {
    let name = cur.expect_ident()?;
    cur.expect_punct("{")?;

    let mut methods = Vec::new();
    let mut index = 0u32;
    while !cur.eat_punct("}") {
        cur.skip_all_annotations();
        if cur.eat_punct("}") {
            break;
        }
        index += 1;
        methods.push(parse_method(cur, index)?);
    }

    Ok(InterfaceDecl { name, methods })
}

fn parse_method(cur: &mut Cursor, index: u32) -> PResult<AidlMethod> {
    let oneway = cur.eat_keyword("oneway");
    let return_type = cur.parse_type()?;
    let name = cur.expect_ident()?;

    cur.expect_punct("(")?;
    let mut params = Vec::new();
    if !matches!(cur.peek(), TokenKind::Punct(")")) {
        loop {
            cur.skip_all_annotations();
            let modifier = cur.parse_param_modifier();
            let type_ref = cur.parse_type()?;
            let name = cur.expect_ident()?;
            params.push(AidlParam {
                name,
                type_ref,
                modifier,
            });
            if !cur.eat_punct(",") {
                break;
            }
        }
    }
    cur.expect_punct(")")?;

    let tc_override = if cur.eat_punct("=") {
        match cur.bump() {
            TokenKind::IntLit(raw) => Some(parse_plain_int(&raw).unwrap_or(index)),
            _ => None,
        }
    } else {
        None
    };

    cur.expect_punct(";")?;

    Ok(AidlMethod {
        name,
        return_type,
        oneway,
        params,
        tc_override,
    })
}

fn parse_plain_int(raw: &str) -> Option<u32> {
    raw.trim_end_matches(['L', 'l']).parse().ok()
}

fn parse_parcelable(cur: &mut Cursor) -> PResult<AidlParcelableDecl> {
    let name = cur.expect_ident()?;

    if cur.eat_punct(";") {
        return Ok(AidlParcelableDecl { name, fields: None });
    }

    cur.expect_punct("{")?;
    let mut fields = Vec::new();
    while !cur.eat_punct("}") {
        cur.skip_all_annotations();
        if cur.eat_punct("}") {
            break;
        }
        let is_static = cur.eat_keyword("static") || cur.eat_keyword("const");
        let type_ref = cur.parse_type()?;
        let field_name = cur.expect_ident()?;

        // skip a const initializer, if present - values here are never read
        // by the decoder, only field shape matters.
        if cur.eat_punct("=") {
            skip_expression_until_semicolon(cur);
        }
        cur.expect_punct(";")?;

        fields.push(AidlFieldDecl {
            name: field_name,
            type_ref,
            is_static,
        });
    }

    Ok(AidlParcelableDecl {
        name,
        fields: Some(fields),
    })
}

fn skip_expression_until_semicolon(cur: &mut Cursor) {
    let mut depth = 0i32;
    loop {
        match cur.peek() {
            TokenKind::Punct("(") | TokenKind::Punct("[") => {
                depth += 1;
                cur.bump();
            }
            TokenKind::Punct(")") | TokenKind::Punct("]") => {
                depth -= 1;
                cur.bump();
            }
            TokenKind::Punct(";") if depth <= 0 => break,
            TokenKind::Eof => break,
            _ => {
                cur.bump();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ParamModifier;

    #[test]
    fn parses_interface_with_methods() {
        let src = "package foo; interface I { void f(int a, String b); int g(in long x); }";
        let file = parse_aidl("I.aidl", src).unwrap();
        assert_eq!(file.package.as_deref(), Some("foo"));
        let AidlItem::Interface(iface) = &file.items[0] else {
            panic!("expected interface");
        };
        assert_eq!(iface.name, "I");
        assert_eq!(iface.methods.len(), 2);
        assert_eq!(iface.methods[0].name, "f");
        assert_eq!(iface.methods[0].params.len(), 2);
        assert_eq!(iface.methods[1].params[0].modifier, ParamModifier::In);
    }

    #[test]
    fn parses_out_and_inout_modifiers() {
        let src = "interface I { void h(in int a, out int[] b); }";
        let file = parse_aidl("I.aidl", src).unwrap();
        let AidlItem::Interface(iface) = &file.items[0] else {
            panic!()
        };
        assert_eq!(iface.methods[0].params[1].modifier, ParamModifier::Out);
        assert!(iface.methods[0].params[1].type_ref.is_array());
    }

    #[test]
    fn parses_parcelable_with_body() {
        let src = "parcelable Foo { int a; String b; }";
        let file = parse_aidl("Foo.aidl", src).unwrap();
        let AidlItem::Parcelable(p) = &file.items[0] else {
            panic!()
        };
        assert_eq!(p.fields.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn parses_forward_declared_parcelable() {
        let src = "parcelable Foo;";
        let file = parse_aidl("Foo.aidl", src).unwrap();
        let AidlItem::Parcelable(p) = &file.items[0] else {
            panic!()
        };
        assert!(p.fields.is_none());
    }

    #[test]
    fn parses_wildcard_import() {
        let src = "package foo; import foo.bar.*; interface I {}";
        let file = parse_aidl("I.aidl", src).unwrap();
        assert_eq!(file.imports, vec!["foo.bar.*".to_string()]);
    }

    #[test]
    fn parses_explicit_transaction_code() {
        let src = "interface I { void f() = 7; }";
        let file = parse_aidl("I.aidl", src).unwrap();
        let AidlItem::Interface(iface) = &file.items[0] else {
            panic!()
        };
        assert_eq!(iface.methods[0].tc_override, Some(7));
    }

    #[test]
    fn parses_generic_list_parameter() {
        let src = "interface I { void f(in List<IBinder> items); }";
        let file = parse_aidl("I.aidl", src).unwrap();
        let AidlItem::Interface(iface) = &file.items[0] else {
            panic!()
        };
        assert!(matches!(
            &iface.methods[0].params[0].type_ref,
            TypeRef::Generic { base, .. } if base == "List"
        ));
    }
}
