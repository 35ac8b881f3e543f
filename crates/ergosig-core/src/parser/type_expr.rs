//! Recursive descent parser for type expressions
//!
//! ```text
//! type      := WORD
//!            | WORD '[' type_list ']'
//! type_list := type (',' type)*
//! ```
//!
//! `list` takes exactly one argument and `dict` exactly two. Arguments are
//! split at top-level commas only, so `dict[str, dict[str, int]]` keeps the
//! inner comma with the value type.
//!
//! Unknown words, unknown generic heads, empty input and text left over after
//! a complete type all resolve to `FieldType::String`. Only broken bracket
//! structure inside a generic is an error.

use super::ast::FieldType;
use super::tokenizer::{Span, SpannedToken, Token, Tokenizer};
use crate::{Error, Result};

/// Deepest generic nesting accepted, `list[list[...]]` counting one per level
pub const MAX_TYPE_DEPTH: usize = 64;

/// Parse a type expression into a `FieldType`
///
/// # Errors
/// Returns `MalformedSpecError` with the column for an unclosed `[`, an
/// empty or surplus generic argument, a stray symbol inside brackets, or
/// nesting deeper than `MAX_TYPE_DEPTH`.
///
/// # Example
/// ```
/// use ergosig::{parse_type_expr, FieldType};
///
/// let ty = parse_type_expr("list[dict[str, int]]").unwrap();
/// assert_eq!(ty, FieldType::list(FieldType::dict(FieldType::String, FieldType::Integer)));
///
/// // unknown names degrade to str
/// assert_eq!(parse_type_expr("widget").unwrap(), FieldType::String);
/// ```
pub fn parse_type_expr(input: &str) -> Result<FieldType> {
    let tokens = Tokenizer::new(input).tokenize();
    let mut parser = TypeParser {
        input,
        tokens,
        position: 0,
    };

    if parser.check(&Token::Eof) {
        return Ok(FieldType::String);
    }
    if !matches!(parser.peek().token, Token::Word(_)) {
        tracing::debug!(
            type_expr = input.trim(),
            "type does not start with a name, defaulting to str"
        );
        return Ok(FieldType::String);
    }

    let ty = parser.parse_type(0)?;
    if !parser.check(&Token::Eof) {
        tracing::debug!(type_expr = input.trim(), "text after type, defaulting to str");
        return Ok(FieldType::String);
    }
    Ok(ty)
}

struct TypeParser<'a> {
    input: &'a str,
    tokens: Vec<SpannedToken>,
    position: usize,
}

impl TypeParser<'_> {
    // ── Token helpers ──────────────────────────────────

    fn peek(&self) -> &SpannedToken {
        // tokenize() always ends with Eof, and advance() never moves past it
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn check(&self, token: &Token) -> bool {
        &self.peek().token == token
    }

    fn advance(&mut self) -> SpannedToken {
        let tok = self.peek().clone();
        if tok.token != Token::Eof {
            self.position += 1;
        }
        tok
    }

    fn error(&self, span: Span, message: impl std::fmt::Display) -> Error {
        Error::malformed(self.input.trim(), format!("{} at {}", message, span))
    }

    // ── Grammar ────────────────────────────────────────

    /// `depth` counts the generics enclosing this type
    fn parse_type(&mut self, depth: usize) -> Result<FieldType> {
        let tok = self.advance();
        let head = match tok.token {
            Token::Word(w) => w,
            other => {
                let message = format!("expected type name, found {}", other);
                return Err(self.error(tok.span, message));
            }
        };

        if !self.check(&Token::LBracket) {
            return Ok(scalar(&head));
        }

        let open = self.advance().span;
        if depth >= MAX_TYPE_DEPTH {
            let message = format!("type nesting exceeds {} levels", MAX_TYPE_DEPTH);
            return Err(self.error(open, message));
        }

        let mut args = vec![self.parse_type(depth + 1)?];
        loop {
            let tok = self.advance();
            match tok.token {
                Token::Comma => args.push(self.parse_type(depth + 1)?),
                Token::RBracket => break,
                Token::Eof => {
                    return Err(self.error(open, format!("unclosed '[' after '{}'", head)));
                }
                other => {
                    let message = format!("expected ',' or ']', found {}", other);
                    return Err(self.error(tok.span, message));
                }
            }
        }

        generic(&head, args).map_err(|reason| self.error(open, reason))
    }
}

fn scalar(word: &str) -> FieldType {
    match FieldType::from_keyword(word) {
        Some(ty) => ty,
        None => {
            tracing::debug!(type_name = word, "unknown type name, defaulting to str");
            FieldType::String
        }
    }
}

fn generic(head: &str, mut args: Vec<FieldType>) -> std::result::Result<FieldType, String> {
    match (head, args.len()) {
        ("list", 1) => Ok(FieldType::list(args.remove(0))),
        ("dict", 2) => {
            let value = args.remove(1);
            let key = args.remove(0);
            Ok(FieldType::dict(key, value))
        }
        ("list", n) => Err(format!("list takes 1 type argument, found {}", n)),
        ("dict", n) => Err(format!("dict takes 2 type arguments, found {}", n)),
        (other, _) => {
            tracing::debug!(type_name = other, "unknown generic type, defaulting to str");
            Ok(FieldType::String)
        }
    }
}
