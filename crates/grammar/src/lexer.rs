use winnow::ascii::{line_ending, multispace1};
use winnow::combinator::{alt, delimited, preceded, repeat};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{take_till, take_until, take_while};

use crate::error::GrammarError;

/// A lexical token carrying its 1-based line/column for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    /// Raw literal text (digits plus an optional `L`/`l` suffix, any base prefix retained).
    IntLit(String),
    /// Decoded string contents (escapes resolved).
    StringLit(String),
    /// Decoded char contents (escapes resolved).
    CharLit(String),
    BoolLit(bool),
    NullLit,
    /// One of the fixed punctuation/operator spellings recognized by the grammar.
    Punct(&'static str),
    /// `@Annotation` - recognized and kept so the parser can skip it positionally.
    Annotation(String),
    Eof,
}

const PUNCTUATION: &[&str] = &[
    "==", "!=", "<=", ">=", "&&", "||", "<<", ">>", "...", "::",
    "{", "}", "(", ")", "[", "]", ";", ",", ".", "=", "<", ">", "!", "+", "-", "*", "/", "%", "&",
    "|", "^", "~", "?", ":", "@",
];

fn skip_trivia(input: &mut &str) -> ModalResult<()> {
    repeat(
        0..,
        alt((
            multispace1.void(),
            line_ending.void(),
            preceded("//", take_till(0.., |c| c == '\n')).void(),
            delimited("/*", take_until(0.., "*/"), "*/").void(),
        )),
    )
    .parse_next(input)
}

type ModalResult<T> = winnow::Result<T, ErrMode<ContextError>>;

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn lex_ident(input: &mut &str) -> ModalResult<TokenKind> {
    if !input.chars().next().is_some_and(is_ident_start) {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }
    let text: &str = take_while(1.., is_ident_continue).parse_next(input)?;
    Ok(match text {
        "true" => TokenKind::BoolLit(true),
        "false" => TokenKind::BoolLit(false),
        "null" => TokenKind::NullLit,
        _ => TokenKind::Ident(text.to_string()),
    })
}

/// Reads a number literal: decimal, hex (`0x`), octal (`0` prefix) or binary
/// (`0b`), with an optional trailing `L`/`l` suffix. The raw text (including
/// any prefix/suffix) is retained for the compiler's constant evaluator.
fn lex_number(input: &mut &str) -> ModalResult<TokenKind> {
    let start = *input;
    let _: &str = take_while(1.., |c: char| {
        c.is_ascii_hexdigit() || c == 'x' || c == 'X' || c == 'b' || c == 'B' || c == 'L' || c == 'l'
    })
    .parse_next(input)?;
    let consumed = &start[..start.len() - input.len()];
    Ok(TokenKind::IntLit(consumed.to_string()))
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('0') => out.push('\0'),
                Some('\\') => out.push('\\'),
                Some('\'') => out.push('\''),
                Some('"') => out.push('"'),
                Some(other) => out.push(other),
                None => {}
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn lex_string(input: &mut &str) -> ModalResult<TokenKind> {
    let raw: &str = delimited(
        '"',
        take_while(0.., |c| c != '"'),
        '"',
    )
    .parse_next(input)?;
    Ok(TokenKind::StringLit(unescape(raw)))
}

fn lex_char(input: &mut &str) -> ModalResult<TokenKind> {
    let raw: &str = delimited('\'', take_while(0.., |c| c != '\''), '\'').parse_next(input)?;
    Ok(TokenKind::CharLit(unescape(raw)))
}

fn lex_annotation(input: &mut &str) -> ModalResult<TokenKind> {
    '@'.parse_next(input)?;
    let name: &str = take_while(1.., is_ident_continue).parse_next(input)?;
    Ok(TokenKind::Annotation(name.to_string()))
}

fn lex_punct(input: &mut &str) -> ModalResult<TokenKind> {
    for p in PUNCTUATION {
        if input.starts_with(p) {
            *input = &input[p.len()..];
            return Ok(TokenKind::Punct(p));
        }
    }
    Err(ErrMode::Backtrack(ContextError::new()))
}

/// Tokenize a full source file. `file` is only used to label diagnostics.
pub fn tokenize(file: &str, source: &str) -> Result<Vec<Token>, GrammarError> {
    let mut tokens = Vec::new();
    let mut remaining = source;

    loop {
        let _ = skip_trivia(&mut remaining);
        if remaining.is_empty() {
            break;
        }

        let (line, column) = position_of(source, remaining);
        let before = remaining;

        let c = remaining.chars().next().unwrap();
        let kind = if c == '@' {
            lex_annotation(&mut remaining)
        } else if c == '"' {
            lex_string(&mut remaining)
        } else if c == '\'' {
            lex_char(&mut remaining)
        } else if c.is_ascii_digit() {
            lex_number(&mut remaining)
        } else if is_ident_start(c) {
            lex_ident(&mut remaining)
        } else {
            lex_punct(&mut remaining)
        }
        .map_err(|_| {
            GrammarError::syntax(file, line, column, format!("unexpected character '{c}'"))
        })?;

        if remaining.len() == before.len() {
            return Err(GrammarError::syntax(
                file,
                line,
                column,
                "lexer made no progress",
            ));
        }

        tokens.push(Token { kind, line, column });
    }

    let (line, column) = position_of(source, remaining);
    tokens.push(Token {
        kind: TokenKind::Eof,
        line,
        column,
    });
    Ok(tokens)
}

fn position_of(source: &str, remaining: &str) -> (usize, usize) {
    let consumed = source.len() - remaining.len();
    let head = &source[..consumed];
    let line = head.bytes().filter(|&b| b == b'\n').count() + 1;
    let column = head.rsplit('\n').next().map(|s| s.chars().count() + 1).unwrap_or(1);
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_simple_declaration() {
        let toks = tokenize("t.aidl", "package foo; interface I { void f(int a); }").unwrap();
        let idents: Vec<_> = toks
            .iter()
            .filter_map(|t| match &t.kind {
                TokenKind::Ident(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(idents, ["package", "foo", "interface", "I", "void", "f", "int", "a"]);
    }

    #[test]
    fn strips_comments() {
        let toks = tokenize("t.aidl", "// hi\nint x; /* block */ int y;").unwrap();
        let idents: Vec<_> = toks
            .iter()
            .filter_map(|t| match &t.kind {
                TokenKind::Ident(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(idents, ["int", "x", "int", "y"]);
    }

    #[test]
    fn decodes_string_and_char_literals() {
        let toks = tokenize("t.aidl", r#""hi\n" 'a'"#).unwrap();
        assert_eq!(toks[0].kind, TokenKind::StringLit("hi\n".to_string()));
        assert_eq!(toks[1].kind, TokenKind::CharLit("a".to_string()));
    }

    #[test]
    fn keeps_raw_number_literal_text() {
        let toks = tokenize("t.aidl", "0x1F 10L 0b101").unwrap();
        let nums: Vec<_> = toks
            .iter()
            .filter_map(|t| match &t.kind {
                TokenKind::IntLit(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(nums, ["0x1F", "10L", "0b101"]);
    }

    #[test]
    fn recognizes_annotation_as_its_own_token() {
        let toks = tokenize("t.aidl", "@Override void f() {}").unwrap();
        assert_eq!(toks[0].kind, TokenKind::Annotation("Override".to_string()));
    }
}
