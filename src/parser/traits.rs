//! Trait visitors.
//!
//! Every `@name(...)` application is dispatched on the bare trait name to a
//! [`TraitVisitor`], which decides which argument forms are legal and how
//! the value lands in the trait map:
//!
//! ```text
//! @required                 Marker    → "smithy.api#required": {}
//! @pattern("^a")            Str       → "smithy.api#pattern": "^a"
//! @httpError(404)           Int       → "smithy.api#httpError": 404
//! @tags(["a"])              Tags      → "smithy.api#tags": ["a"]
//! @http(method: "GET", ..)  Args      → "smithy.api#http": {"method": "GET", ..}
//! @examples([...])          Literal   → "smithy.api#examples": [...]
//! @jsonName("x")            Generic   → "smithy.api#jsonName": "x"
//! @custom(a: 1)             Fallback  → "<ns>#custom": {"a": 1}
//! ```

use rustc_hash::FxHashMap;
use serde_json::{Map, Value};
use text_size::TextRange;

use super::errors::{ErrorCode, SyntaxError};
use super::lexer::TokenKind;
use super::parser::{IdlParser, PResult};
use crate::base::constants::{PRELUDE_NAMESPACE, PRELUDE_TRAITS};
use crate::base::shape_id::{absolute, namespace_of, strip_namespace};
use crate::model::Traits;

/// How a trait's arguments are parsed and stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraitVisitor {
    /// No arguments; stores `{}`
    Marker,
    /// A single string argument. `documentation` routes the text into the
    /// shared documentation slot instead of overwriting it.
    Str { documentation: bool },
    /// A single integer argument
    Int,
    /// A bracketed array of strings
    Tags,
    /// Named arguments, or a single bracketed array; `{}` when absent
    Args,
    /// A required node value
    Literal,
    /// Any argument form, namespaced to a fixed namespace
    Generic { namespace: String },
    /// Any argument form, namespaced through `use` statements and the
    /// file's namespace
    Fallback,
    /// Logs a deprecation warning, then delegates
    Deprecated(Box<TraitVisitor>),
}

/// Parsed contents of a trait's parentheses
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraitArgs {
    /// `key: value` pairs
    pub args: Option<Map<String, Value>>,
    /// A single node value
    pub literal: Option<Value>,
}

impl TraitArgs {
    pub fn is_empty(&self) -> bool {
        self.args.is_none() && self.literal.is_none()
    }

    /// Literal if present, else the argument object, else `{}`.
    fn into_value(self) -> Value {
        match (self.literal, self.args) {
            (Some(lit), _) => lit,
            (None, Some(args)) => Value::Object(args),
            (None, None) => Value::Object(Map::new()),
        }
    }
}

/// Bare trait name → visitor, with a `*` wildcard.
#[derive(Debug, Clone)]
pub struct TraitRegistry {
    visitors: FxHashMap<String, TraitVisitor>,
}

pub const WILDCARD: &str = "*";

impl Default for TraitRegistry {
    fn default() -> Self {
        let mut registry = Self {
            visitors: FxHashMap::default(),
        };
        for name in [
            "idempotent",
            "required",
            "httpLabel",
            "httpPayload",
            "readonly",
            "box",
            "sensitive",
            "input",
            "output",
            "httpResponseCode",
        ] {
            registry.register(name, TraitVisitor::Marker);
        }
        registry.register("documentation", TraitVisitor::Str { documentation: true });
        for name in [
            "httpQuery",
            "httpHeader",
            "error",
            "pattern",
            "title",
            "timestampFormat",
            "enumValue",
        ] {
            registry.register(name, TraitVisitor::Str { documentation: false });
        }
        registry.register("tags", TraitVisitor::Tags);
        registry.register("httpError", TraitVisitor::Int);
        for name in ["http", "length", "range", "deprecated", "paginated"] {
            registry.register(name, TraitVisitor::Args);
        }
        registry.register("enum", TraitVisitor::Deprecated(Box::new(TraitVisitor::Args)));
        registry.register("examples", TraitVisitor::Literal);
        let prelude = TraitVisitor::Generic {
            namespace: PRELUDE_NAMESPACE.to_string(),
        };
        registry.register("trait", prelude.clone());
        for name in PRELUDE_TRAITS {
            registry.register(*name, prelude.clone());
        }
        registry.register(WILDCARD, TraitVisitor::Fallback);
        registry
    }
}

impl TraitRegistry {
    /// Register (or replace) the visitor for a bare trait name.
    pub fn register(&mut self, name: impl Into<String>, visitor: TraitVisitor) {
        self.visitors.insert(name.into(), visitor);
    }

    /// Visitor for a trait as written. Prelude-qualified names use the
    /// visitor of their bare name; anything unknown gets the wildcard.
    pub fn lookup(&self, name: &str) -> &TraitVisitor {
        let bare = if namespace_of(name) == PRELUDE_NAMESPACE {
            strip_namespace(name)
        } else {
            name
        };
        self.visitors
            .get(bare)
            .or_else(|| self.visitors.get(WILDCARD))
            .unwrap_or(&TraitVisitor::Fallback)
    }

    /// Whether a bare name has a dedicated (non-wildcard) visitor.
    pub fn is_registered(&self, name: &str) -> bool {
        name != WILDCARD && self.visitors.contains_key(name)
    }
}

// ============================================================================
// VISITING
// ============================================================================

impl IdlParser<'_> {
    /// Parse one trait application (the `@` is already consumed) into `traits`.
    pub(crate) fn parse_trait(&mut self, traits: &mut Traits) -> PResult<()> {
        let first = self.expect(TokenKind::Symbol, "trait name")?;
        let name = self.parse_shape_id_from(first)?;
        let visitor = self.options.traits.lookup(&name).clone();
        self.visit_trait(&visitor, &name, first.range, traits)
    }

    fn visit_trait(
        &mut self,
        visitor: &TraitVisitor,
        name: &str,
        range: TextRange,
        traits: &mut Traits,
    ) -> PResult<()> {
        let bare = strip_namespace(name);
        let prelude = || absolute(PRELUDE_NAMESPACE, bare);
        match visitor {
            TraitVisitor::Marker => {
                self.parse_trait_args()?;
                traits.put(prelude(), Value::Object(Map::new()));
            }
            TraitVisitor::Str { documentation } => {
                let args = self.parse_trait_args()?;
                let Some(Value::String(text)) = args.literal else {
                    return Err(invalid_value(name, "a string", range));
                };
                if *documentation {
                    traits.attach_documentation(&text);
                } else {
                    traits.put(prelude(), Value::String(text));
                }
            }
            TraitVisitor::Int => {
                let args = self.parse_trait_args()?;
                match args.literal {
                    Some(Value::Number(n)) if n.is_i64() => traits.put(prelude(), Value::Number(n)),
                    _ => return Err(invalid_value(name, "an integer", range)),
                }
            }
            TraitVisitor::Tags => {
                let args = self.parse_trait_args()?;
                match args.literal {
                    Some(Value::Array(items)) if items.iter().all(Value::is_string) => {
                        traits.put(prelude(), Value::Array(items));
                    }
                    _ => return Err(invalid_value(name, "an array of strings", range)),
                }
            }
            TraitVisitor::Args => {
                let args = self.parse_trait_args()?;
                match &args.literal {
                    None | Some(Value::Array(_)) | Some(Value::Object(_)) => {}
                    Some(_) => return Err(invalid_value(name, "named arguments", range)),
                }
                traits.put(prelude(), args.into_value());
            }
            TraitVisitor::Literal => {
                let args = self.parse_trait_args()?;
                let Some(literal) = args.literal else {
                    return Err(invalid_value(name, "a literal value", range));
                };
                traits.put(prelude(), literal);
            }
            TraitVisitor::Generic { namespace } => {
                let args = self.parse_trait_args()?;
                traits.put(absolute(namespace, bare), args.into_value());
            }
            TraitVisitor::Fallback => {
                let id = self.resolve(name);
                let args = self.parse_trait_args()?;
                traits.put(id, args.into_value());
            }
            TraitVisitor::Deprecated(inner) => {
                self.warn_at(format!("@{bare} is deprecated"), range, ErrorCode::E0307);
                self.visit_trait(inner, name, range, traits)?;
            }
        }
        Ok(())
    }

    /// Parse `( key: value, ... )` or `( value )`. No parentheses means no
    /// arguments at all.
    pub(crate) fn parse_trait_args(&mut self) -> PResult<TraitArgs> {
        match self.tokens.next() {
            Some(tok) if tok.kind == TokenKind::LParen => {}
            _ => {
                self.tokens.unget();
                return Ok(TraitArgs::default());
            }
        }
        let first = self.next_token("trait argument")?;
        if first.kind == TokenKind::RParen {
            return Ok(TraitArgs {
                args: Some(Map::new()),
                literal: None,
            });
        }
        if matches!(first.kind, TokenKind::Symbol | TokenKind::String) {
            let second = self.next_token("trait argument")?;
            if second.kind == TokenKind::Colon {
                let key = self.key_text(&first)?;
                return self.parse_named_args(key).map(|args| TraitArgs {
                    args: Some(args),
                    literal: None,
                });
            }
            self.tokens.unget();
        }
        let literal = self.parse_value_from(first)?;
        self.expect(TokenKind::RParen, "')'")?;
        Ok(TraitArgs {
            args: None,
            literal: Some(literal),
        })
    }

    /// Continue `key: value, key: value )` with the first key consumed.
    fn parse_named_args(&mut self, first_key: String) -> PResult<Map<String, Value>> {
        let mut args = Map::new();
        let mut key = first_key;
        loop {
            let value = self.parse_value()?;
            args.insert(key, value);
            let mut tok = self.next_token("')'")?;
            if tok.kind == TokenKind::Comma {
                tok = self.next_token("')'")?;
            }
            match tok.kind {
                TokenKind::RParen => return Ok(args),
                TokenKind::Symbol | TokenKind::String => {
                    key = self.key_text(&tok)?;
                    self.expect(TokenKind::Colon, "':'")?;
                }
                _ => return Err(self.unexpected(&tok, "argument name or ')'")),
            }
        }
    }
}

fn invalid_value(name: &str, expected: &str, range: TextRange) -> SyntaxError {
    SyntaxError::new(
        format!("@{} expects {}", strip_namespace(name), expected),
        range,
        ErrorCode::E0307,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup() {
        let registry = TraitRegistry::default();
        assert_eq!(registry.lookup("required"), &TraitVisitor::Marker);
        assert_eq!(registry.lookup("smithy.api#required"), &TraitVisitor::Marker);
        assert_eq!(registry.lookup("httpError"), &TraitVisitor::Int);
        assert_eq!(registry.lookup("whatever"), &TraitVisitor::Fallback);
        assert_eq!(registry.lookup("other.ns#required"), &TraitVisitor::Fallback);
        assert!(matches!(registry.lookup("enum"), TraitVisitor::Deprecated(_)));
        assert_eq!(
            registry.lookup("jsonName"),
            &TraitVisitor::Generic {
                namespace: "smithy.api".into()
            }
        );
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = TraitRegistry::default();
        registry.register("custom", TraitVisitor::Marker);
        assert!(registry.is_registered("custom"));
        assert!(!registry.is_registered(WILDCARD));
        assert_eq!(registry.lookup("custom"), &TraitVisitor::Marker);
    }

    #[test]
    fn test_args_into_value() {
        assert_eq!(TraitArgs::default().into_value(), Value::Object(Map::new()));
        let lit = TraitArgs {
            args: None,
            literal: Some(Value::Bool(true)),
        };
        assert_eq!(lit.into_value(), Value::Bool(true));
    }
}
