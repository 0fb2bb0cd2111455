use crate::ast::{ParamModifier, TypeRef};
use crate::error::GrammarError;
use crate::lexer::{Token, TokenKind};

/// A simple index-based cursor over a token stream, shared by the AIDL and
/// Java-dialect recursive-descent parsers.
pub struct Cursor<'a> {
    file: &'a str,
    tokens: &'a [Token],
    pos: usize,
}

pub type PResult<T> = Result<T, GrammarError>;

impl<'a> Cursor<'a> {
    pub fn new(file: &'a str, tokens: &'a [Token]) -> Self {
        Cursor { file, tokens, pos: 0 }
    }

    pub fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos.min(self.tokens.len() - 1)].kind
    }

    pub fn peek_nth(&self, n: usize) -> &TokenKind {
        let idx = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.peek(), TokenKind::Eof)
    }

    pub fn bump(&mut self) -> TokenKind {
        let tok = self.tokens[self.pos.min(self.tokens.len() - 1)].kind.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn err(&self, message: impl Into<String>) -> GrammarError {
        let tok = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        GrammarError::syntax(self.file, tok.line, tok.column, message)
    }

    /// Skip a single `@Annotation` token if one is next.
    pub fn skip_annotation(&mut self) {
        if matches!(self.peek(), TokenKind::Annotation(_)) {
            self.bump();
        }
    }

    pub fn skip_all_annotations(&mut self) {
        while matches!(self.peek(), TokenKind::Annotation(_)) {
            self.bump();
        }
    }

    pub fn eat_punct(&mut self, p: &'static str) -> bool {
        if matches!(self.peek(), TokenKind::Punct(found) if *found == p) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub fn expect_punct(&mut self, p: &'static str) -> PResult<()> {
        if self.eat_punct(p) {
            Ok(())
        } else {
            Err(self.err(format!("expected '{p}', found {:?}", self.peek())))
        }
    }

    pub fn eat_keyword(&mut self, kw: &str) -> bool {
        if matches!(self.peek(), TokenKind::Ident(found) if found == kw) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub fn peek_is_keyword(&self, kw: &str) -> bool {
        matches!(self.peek(), TokenKind::Ident(found) if found == kw)
    }

    pub fn expect_ident(&mut self) -> PResult<String> {
        match self.bump() {
            TokenKind::Ident(name) => Ok(name),
            other => Err(self.err(format!("expected identifier, found {other:?}"))),
        }
    }

    /// Parse a (possibly dotted) qualified name: `a.b.C`, stopping before a
    /// trailing `<...>` generic argument list or `[]`.
    pub fn parse_qualified_name(&mut self) -> PResult<String> {
        let mut parts = vec![self.expect_ident()?];
        while self.eat_punct(".") {
            parts.push(self.expect_ident()?);
        }
        Ok(parts.join("."))
    }

    /// Parse a type reference: qualified name, optional `<Args>`, optional
    /// trailing `[]`.
    pub fn parse_type(&mut self) -> PResult<TypeRef> {
        let base = self.parse_qualified_name()?;

        let mut ty = if self.eat_punct("<") {
            let mut args = Vec::new();
            if !matches!(self.peek(), TokenKind::Punct(">")) {
                loop {
                    args.push(self.parse_type()?);
                    if !self.eat_punct(",") {
                        break;
                    }
                }
            }
            self.close_generic()?;
            TypeRef::Generic { base, args }
        } else {
            TypeRef::Named(base)
        };

        while self.eat_punct("[") {
            self.expect_punct("]")?;
            ty = TypeRef::Array(Box::new(ty));
        }

        Ok(ty)
    }

    /// Closes a `<...>` generic argument list. The recognized container
    /// types (`List<T>`, `ParceledListSlice<T>`) never nest, so a single `>`
    /// always suffices.
    fn close_generic(&mut self) -> PResult<()> {
        self.expect_punct(">")
    }

    pub fn parse_param_modifier(&mut self) -> ParamModifier {
        if self.eat_keyword("inout") {
            ParamModifier::InOut
        } else if self.eat_keyword("in") {
            ParamModifier::In
        } else if self.eat_keyword("out") {
            ParamModifier::Out
        } else {
            ParamModifier::In
        }
    }

    pub fn file(&self) -> &str {
        self.file
    }

    pub fn eof_err(&self, context: &'static str) -> GrammarError {
        GrammarError::eof(self.file, context)
    }

    pub fn syntax_err(&self, message: impl Into<String>) -> GrammarError {
        self.err(message)
    }

    /// Save the current position for a speculative parse attempt.
    pub fn mark(&self) -> usize {
        self.pos
    }

    /// Rewind to a position previously returned by [`Cursor::mark`].
    pub fn reset(&mut self, mark: usize) {
        self.pos = mark;
    }
}
