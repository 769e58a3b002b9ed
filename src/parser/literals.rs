//! Node values: the JSON-like literals used by traits, metadata, and
//! member defaults.
//!
//! ```text
//! value  := string | number | true | false | null | shape-id
//!         | "[" (value ","?)* "]"
//!         | "{" ((ident | string) ":" value ","?)* "}"
//! ```
//!
//! Bare shape ids are kept as strings.

use serde_json::{Map, Number, Value};

use super::errors::{ErrorCode, SyntaxError};
use super::lexer::{Token, TokenKind, unquote};
use super::parser::{IdlParser, PResult};

impl<'a> IdlParser<'a> {
    pub(crate) fn parse_value(&mut self) -> PResult<Value> {
        let tok = self.next_token("a value")?;
        self.parse_value_from(tok)
    }

    /// Parse a node value whose first token has already been read.
    pub(crate) fn parse_value_from(&mut self, tok: Token<'a>) -> PResult<Value> {
        match tok.kind {
            TokenKind::String | TokenKind::TextBlock => self.string_value(&tok).map(Value::String),
            TokenKind::Number => parse_number(&tok).map(Value::Number),
            TokenKind::Symbol => match tok.text {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                "null" => Ok(Value::Null),
                _ => self.parse_shape_id_from(tok).map(Value::String),
            },
            TokenKind::LBracket => self.parse_array(),
            TokenKind::LBrace => self.parse_object(),
            _ => Err(SyntaxError::new(
                format!("expected a value, found {}", tok.kind.describe()),
                tok.range,
                ErrorCode::E0401,
            )),
        }
    }

    fn parse_array(&mut self) -> PResult<Value> {
        let mut items = Vec::new();
        loop {
            let tok = self.next_token("']'")?;
            match tok.kind {
                TokenKind::RBracket => return Ok(Value::Array(items)),
                TokenKind::Comma => continue,
                _ => items.push(self.parse_value_from(tok)?),
            }
        }
    }

    fn parse_object(&mut self) -> PResult<Value> {
        let mut object = Map::new();
        loop {
            let tok = self.next_token("'}'")?;
            match tok.kind {
                TokenKind::RBrace => return Ok(Value::Object(object)),
                TokenKind::Comma => continue,
                TokenKind::Symbol | TokenKind::String => {
                    let key = self.key_text(&tok)?;
                    self.expect(TokenKind::Colon, "':'")?;
                    let value = self.parse_value()?;
                    object.insert(key, value);
                }
                _ => return Err(self.unexpected(&tok, "object key or '}'")),
            }
        }
    }

    /// An object key: a bare identifier or a quoted string.
    pub(crate) fn key_text(&self, tok: &Token<'_>) -> PResult<String> {
        match tok.kind {
            TokenKind::Symbol => Ok(tok.text.to_string()),
            _ => self.string_value(tok),
        }
    }

    pub(crate) fn string_value(&self, tok: &Token<'_>) -> PResult<String> {
        unquote(tok).map_err(|message| {
            let code = if matches!(tok.kind, TokenKind::String | TokenKind::TextBlock) {
                ErrorCode::E0103
            } else {
                ErrorCode::E0201
            };
            SyntaxError::new(message, tok.range, code)
        })
    }
}

/// Integers stay integers; anything with a fraction or exponent is a float.
fn parse_number(tok: &Token<'_>) -> PResult<Number> {
    let invalid = || {
        SyntaxError::new(
            format!("invalid number '{}'", tok.text),
            tok.range,
            ErrorCode::E0104,
        )
    };
    if let Ok(i) = tok.text.parse::<i64>() {
        return Ok(Number::from(i));
    }
    if let Ok(u) = tok.text.parse::<u64>() {
        return Ok(Number::from(u));
    }
    let f: f64 = tok.text.parse().map_err(|_| invalid())?;
    Number::from_f64(f).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use crate::parser::{ParserOptions, parse_str_with};
    use serde_json::json;

    fn metadata_value(text: &str) -> serde_json::Value {
        let source = format!("metadata m = {text}\n");
        let ast = parse_str_with(&source, &ParserOptions::default()).unwrap();
        ast.metadata["m"].clone()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(metadata_value("\"s\""), json!("s"));
        assert_eq!(metadata_value("12"), json!(12));
        assert_eq!(metadata_value("-1.5"), json!(-1.5));
        assert_eq!(metadata_value("true"), json!(true));
        assert_eq!(metadata_value("null"), json!(null));
        assert_eq!(metadata_value("example.a#Shape"), json!("example.a#Shape"));
    }

    #[test]
    fn test_nested_preserves_order() {
        let value = metadata_value(r#"{ zeta: [1, 2,], "alpha": { b: false } }"#);
        assert_eq!(value, json!({"zeta": [1, 2], "alpha": {"b": false}}));
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_missing_colon_is_error() {
        let err = parse_str_with("metadata m = { a 1 }", &ParserOptions::default()).unwrap_err();
        assert!(err.message.contains("':'"));
    }
}
