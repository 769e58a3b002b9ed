//! Shape statements.
//!
//! One method per shape keyword. Each reads the shape name, takes the
//! pending traits and docs, parses the body, and registers the shape under
//! `namespace#name`. Operations with inline `input := { ... }` bodies
//! register the synthesized input/output structures before the operation
//! itself.

use serde_json::{Map, Value};
use text_size::TextRange;

use super::errors::{ErrorCode, SyntaxError};
use super::lexer::{Token, TokenKind};
use super::parser::{IdlParser, PResult};
use crate::base::constants::traits::{DEFAULT, ENUM, ENUM_VALUE, INPUT, OUTPUT, TAGS};
use crate::base::shape_id::{absolute, is_identifier, prelude_id};
use crate::model::{
    Member, Members, OperationShape, ResourceShape, ServiceShape, Shape, ShapeKind, ShapeRef,
    SimpleType, Traits,
};

impl<'a> IdlParser<'a> {
    pub(crate) fn parse_shape_statement(&mut self, keyword: &str, tok: Token<'a>) -> PResult<()> {
        if let Some(simple) = SimpleType::from_keyword(keyword) {
            return self.parse_simple(simple);
        }
        match keyword {
            "list" => self.parse_collection(false),
            "set" => {
                if self.version >= 2 {
                    self.warn_at(
                        "set is deprecated; use a list with @uniqueItems".to_string(),
                        tok.range,
                        ErrorCode::E0302,
                    );
                }
                self.parse_collection(true)
            }
            "map" => self.parse_map(),
            "structure" => self.parse_aggregate(false),
            "union" => self.parse_aggregate(true),
            "enum" => self.parse_enum(false),
            "intEnum" => self.parse_enum(true),
            "service" => self.parse_service(),
            "resource" => self.parse_resource(),
            "operation" => self.parse_operation(),
            _ => Err(SyntaxError::new(
                format!("Unknown shape: {keyword}"),
                tok.range,
                ErrorCode::E0302,
            )),
        }
    }

    /// Shape name plus the traits and docs waiting for it.
    fn begin_shape(&mut self) -> PResult<(Token<'a>, Traits)> {
        let name = self.expect(TokenKind::Symbol, "shape name")?;
        self.shape_id(&name)?;
        let traits = self.take_shape_traits();
        Ok((name, traits))
    }

    // =========================================================================
    // Simple shapes
    // =========================================================================

    fn parse_simple(&mut self, simple: SimpleType) -> PResult<()> {
        let (name, mut traits) = self.begin_shape()?;
        let mixins = self.parse_mixins()?;
        let enum_items = match simple {
            SimpleType::String | SimpleType::Integer => traits.get_array(ENUM).cloned(),
            _ => None,
        };
        let kind = match enum_items {
            Some(items) => {
                traits.remove(ENUM);
                enum_from_trait(simple == SimpleType::Integer, &items, name.range)?
            }
            None => ShapeKind::Simple(simple),
        };
        let mut shape = Shape::with_traits(kind, traits);
        shape.mixins = mixins;
        self.add_shape(&name, shape)
    }

    // =========================================================================
    // Collections and aggregates
    // =========================================================================

    fn parse_collection(&mut self, set: bool) -> PResult<()> {
        let (name, traits) = self.begin_shape()?;
        let id = self.shape_id(&name)?;
        let mixins = self.parse_mixins()?;
        let mut members = self.parse_members(Some(&["member"]))?;
        let Some(member) = members.remove("member") else {
            return Err(missing_member(&id, "member", name.range));
        };
        check_not_recursive(&id, &member, name.range)?;
        let kind = if set {
            ShapeKind::Set { member }
        } else {
            ShapeKind::List { member }
        };
        let mut shape = Shape::with_traits(kind, traits);
        shape.mixins = mixins;
        self.add_shape(&name, shape)
    }

    fn parse_map(&mut self) -> PResult<()> {
        let (name, traits) = self.begin_shape()?;
        let id = self.shape_id(&name)?;
        let mixins = self.parse_mixins()?;
        let mut members = self.parse_members(Some(&["key", "value"]))?;
        let key = members
            .remove("key")
            .ok_or_else(|| missing_member(&id, "key", name.range))?;
        let value = members
            .remove("value")
            .ok_or_else(|| missing_member(&id, "value", name.range))?;
        check_not_recursive(&id, &key, name.range)?;
        check_not_recursive(&id, &value, name.range)?;
        let mut shape = Shape::with_traits(ShapeKind::Map { key, value }, traits);
        shape.mixins = mixins;
        self.add_shape(&name, shape)
    }

    fn parse_aggregate(&mut self, union: bool) -> PResult<()> {
        let (name, traits) = self.begin_shape()?;
        let mixins = self.parse_mixins()?;
        let members = self.parse_members(None)?;
        let kind = if union {
            ShapeKind::Union { members }
        } else {
            ShapeKind::Structure { members }
        };
        let mut shape = Shape::with_traits(kind, traits);
        shape.mixins = mixins;
        self.add_shape(&name, shape)
    }

    fn parse_enum(&mut self, int: bool) -> PResult<()> {
        let (name, traits) = self.begin_shape()?;
        let mixins = self.parse_mixins()?;
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut members = Members::new();
        let mut pending = MemberPrefix::default();
        loop {
            let tok = self.next_token_with_docs("'}'")?;
            match tok.kind {
                TokenKind::RBrace => {
                    pending.ensure_empty()?;
                    break;
                }
                TokenKind::Comma => {}
                TokenKind::LineComment | TokenKind::At => self.parse_member_prefix(&mut pending, tok)?,
                TokenKind::Symbol => {
                    let docs = pending_docs(&mut pending);
                    let mut mtraits = std::mem::take(&mut pending).traits;
                    if self.eat(TokenKind::Equals) {
                        let value_tok = self.next_token("enum value")?;
                        let value = match (int, value_tok.kind) {
                            (true, TokenKind::Number) => {
                                match self.parse_value_from(value_tok)? {
                                    Value::Number(n) if n.is_i64() => Value::Number(n),
                                    _ => return Err(self.unexpected(&value_tok, "an integer")),
                                }
                            }
                            (false, TokenKind::String | TokenKind::TextBlock) => {
                                Value::String(self.string_value(&value_tok)?)
                            }
                            (true, _) => return Err(self.unexpected(&value_tok, "an integer")),
                            (false, _) => return Err(self.unexpected(&value_tok, "a string")),
                        };
                        mtraits.put(ENUM_VALUE, value);
                    } else if int {
                        return Err(SyntaxError::new(
                            format!("intEnum member '{}' requires a value", tok.text),
                            tok.range,
                            ErrorCode::E0307,
                        ));
                    }
                    mtraits.attach_documentation(&docs);
                    insert_member(&mut members, &tok, Member::with_traits(prelude_id("Unit"), mtraits))?;
                }
                _ => return Err(self.unexpected(&tok, "enum member or '}'")),
            }
        }
        let kind = if int {
            ShapeKind::IntEnum { members }
        } else {
            ShapeKind::Enum { members }
        };
        let mut shape = Shape::with_traits(kind, traits);
        shape.mixins = mixins;
        self.add_shape(&name, shape)
    }

    /// `{ name: Target [= default], ... }` with traits and doc comments in
    /// front of each member. `allowed` restricts the member names.
    fn parse_members(&mut self, allowed: Option<&[&str]>) -> PResult<Members> {
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut members = Members::new();
        let mut pending = MemberPrefix::default();
        loop {
            let tok = self.next_token_with_docs("'}'")?;
            match tok.kind {
                TokenKind::RBrace => {
                    pending.ensure_empty()?;
                    return Ok(members);
                }
                TokenKind::Comma => {}
                TokenKind::LineComment | TokenKind::At => self.parse_member_prefix(&mut pending, tok)?,
                TokenKind::Symbol => {
                    if let Some(allowed) = allowed {
                        if !allowed.contains(&tok.text) {
                            return Err(self.unexpected(&tok, &allowed.join(" or ")));
                        }
                    }
                    self.expect(TokenKind::Colon, "':'")?;
                    let target = self.parse_target()?;
                    let docs = pending_docs(&mut pending);
                    let mut mtraits = std::mem::take(&mut pending).traits;
                    mtraits.attach_documentation(&docs);
                    if self.eat(TokenKind::Equals) {
                        let value = self.parse_value()?;
                        mtraits.put(DEFAULT, value);
                    }
                    insert_member(&mut members, &tok, Member::with_traits(target, mtraits))?;
                }
                _ => return Err(self.unexpected(&tok, "member name or '}'")),
            }
        }
    }

    fn parse_member_prefix(&mut self, pending: &mut MemberPrefix, tok: Token<'a>) -> PResult<()> {
        if tok.kind == TokenKind::At {
            pending.first.get_or_insert(tok.range);
            self.parse_trait(&mut pending.traits)
        } else {
            pending.docs.push(tok.doc_text().to_string());
            Ok(())
        }
    }

    fn parse_mixins(&mut self) -> PResult<Vec<ShapeRef>> {
        match self.tokens.next() {
            Some(tok) if tok.kind == TokenKind::Symbol && tok.text == "with" => self.parse_ref_list(),
            _ => {
                self.tokens.unget();
                Ok(Vec::new())
            }
        }
    }

    // =========================================================================
    // Service, resource, operation
    // =========================================================================

    fn parse_service(&mut self) -> PResult<()> {
        let (name, traits) = self.begin_shape()?;
        let mixins = self.parse_mixins()?;
        let mut service = ServiceShape::default();
        self.expect(TokenKind::LBrace, "'{'")?;
        while let Some(key) = self.next_property()? {
            match key.text {
                "version" => {
                    let tok = self.next_token("version string")?;
                    service.version = self.string_value(&tok)?;
                }
                "operations" => service.operations = self.parse_ref_list()?,
                "resources" => service.resources = self.parse_ref_list()?,
                _ => self.skip_property(&key, "service")?,
            }
        }
        let mut shape = Shape::with_traits(ShapeKind::Service(service), traits);
        shape.mixins = mixins;
        self.add_shape(&name, shape)
    }

    fn parse_resource(&mut self) -> PResult<()> {
        let (name, traits) = self.begin_shape()?;
        let mixins = self.parse_mixins()?;
        let mut resource = ResourceShape::default();
        self.expect(TokenKind::LBrace, "'{'")?;
        while let Some(key) = self.next_property()? {
            match key.text {
                "identifiers" => {
                    self.expect(TokenKind::LBrace, "'{'")?;
                    loop {
                        let tok = self.next_token("'}'")?;
                        match tok.kind {
                            TokenKind::RBrace => break,
                            TokenKind::Comma => {}
                            TokenKind::Symbol | TokenKind::String => {
                                let id_name = self.key_text(&tok)?;
                                self.expect(TokenKind::Colon, "':'")?;
                                let target = self.parse_target()?;
                                resource.identifiers.put(id_name, ShapeRef::new(target));
                            }
                            _ => return Err(self.unexpected(&tok, "identifier name or '}'")),
                        }
                    }
                }
                "operations" => resource.operations = self.parse_ref_list()?,
                "collectionOperations" => resource.collection_operations = self.parse_ref_list()?,
                "resources" => resource.resources = self.parse_ref_list()?,
                keyword @ ("create" | "put" | "read" | "update" | "delete" | "list") => {
                    let target = ShapeRef::new(self.parse_target()?);
                    if let Some(slot) = resource.lifecycle_mut(keyword) {
                        *slot = Some(target);
                    }
                }
                _ => self.skip_property(&key, "resource")?,
            }
        }
        let mut shape = Shape::with_traits(ShapeKind::Resource(resource), traits);
        shape.mixins = mixins;
        self.add_shape(&name, shape)
    }

    fn parse_operation(&mut self) -> PResult<()> {
        let (name, traits) = self.begin_shape()?;
        let mixins = self.parse_mixins()?;
        let mut operation = OperationShape::default();
        self.expect(TokenKind::LBrace, "'{'")?;
        loop {
            let tok = self.next_token("'}'")?;
            let key = match tok.kind {
                TokenKind::RBrace => break,
                TokenKind::Comma => continue,
                TokenKind::Symbol => tok,
                _ => return Err(self.unexpected(&tok, "operation property or '}'")),
            };
            let colon = self.expect(TokenKind::Colon, "':' or ':='")?;
            let inline = self.eat(TokenKind::Equals);
            match key.text {
                "input" | "output" => {
                    let target = if inline {
                        self.parse_inline_io(&name, key.text, colon.range)?
                    } else {
                        self.parse_target()?
                    };
                    let slot = if key.text == "input" {
                        &mut operation.input
                    } else {
                        &mut operation.output
                    };
                    *slot = Some(ShapeRef::new(target));
                }
                "errors" if !inline => operation.errors = self.parse_ref_list()?,
                _ if inline => return Err(self.unexpected(&key, "input or output")),
                _ => self.skip_property(&key, "operation")?,
            }
        }
        let mut shape = Shape::with_traits(ShapeKind::Operation(operation), traits);
        shape.mixins = mixins;
        self.add_shape(&name, shape)
    }

    /// `input := [@trait ...] [with [...]] { members }`, registered as
    /// `<Operation>Input` (or `Output`) carrying the matching marker trait.
    fn parse_inline_io(&mut self, op: &Token<'_>, which: &str, range: TextRange) -> PResult<String> {
        if self.version < 2 {
            return Err(SyntaxError::new(
                format!("inline {which} definitions require $version: \"2.0\""),
                range,
                ErrorCode::E0306,
            ));
        }
        let (marker, suffix) = if which == "input" {
            (INPUT, "Input")
        } else {
            (OUTPUT, "Output")
        };
        let mut traits = Traits::new();
        traits.put(marker, Value::Object(Map::new()));
        while self.eat(TokenKind::At) {
            self.parse_trait(&mut traits)?;
        }
        let mixins = self.parse_mixins()?;
        let members = self.parse_members(None)?;
        let ns = self.namespace.clone().unwrap_or_default();
        let id = absolute(&ns, &format!("{}{}", op.text, suffix));
        let mut shape = Shape::with_traits(ShapeKind::Structure { members }, traits);
        shape.mixins = mixins;
        self.put_new_shape(id.clone(), shape, op.range)?;
        Ok(id)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// A resolved target shape id.
    fn parse_target(&mut self) -> PResult<String> {
        let first = self.expect(TokenKind::Symbol, "shape id")?;
        let written = self.parse_shape_id_from(first)?;
        Ok(self.resolve(&written))
    }

    /// `[A, B, ...]` of resolved shape references.
    fn parse_ref_list(&mut self) -> PResult<Vec<ShapeRef>> {
        self.expect(TokenKind::LBracket, "'['")?;
        let mut refs = Vec::new();
        loop {
            let tok = self.next_token("']'")?;
            match tok.kind {
                TokenKind::RBracket => return Ok(refs),
                TokenKind::Comma => {}
                TokenKind::Symbol => {
                    let written = self.parse_shape_id_from(tok)?;
                    refs.push(ShapeRef::new(self.resolve(&written)));
                }
                _ => return Err(self.unexpected(&tok, "shape id or ']'")),
            }
        }
    }

    /// Next `key:` of a `{ key: value ... }` body, or `None` at the closing
    /// brace.
    fn next_property(&mut self) -> PResult<Option<Token<'a>>> {
        loop {
            let tok = self.next_token("'}'")?;
            match tok.kind {
                TokenKind::RBrace => return Ok(None),
                TokenKind::Comma => {}
                TokenKind::Symbol => {
                    self.expect(TokenKind::Colon, "':'")?;
                    return Ok(Some(tok));
                }
                _ => return Err(self.unexpected(&tok, "property name or '}'")),
            }
        }
    }

    fn skip_property(&mut self, key: &Token<'_>, shape_type: &str) -> PResult<()> {
        self.parse_value()?;
        self.warn_at(
            format!("ignoring unsupported {shape_type} property '{}'", key.text),
            key.range,
            ErrorCode::E0201,
        );
        Ok(())
    }

    fn next_token_with_docs(&mut self, expected: &str) -> PResult<Token<'a>> {
        match self.tokens.next_with_docs() {
            Some(tok) => Ok(tok),
            None => self.next_token(expected),
        }
    }
}

/// Traits and docs collected in front of a member
#[derive(Default)]
struct MemberPrefix {
    traits: Traits,
    docs: Vec<String>,
    first: Option<TextRange>,
}

impl MemberPrefix {
    fn ensure_empty(&self) -> PResult<()> {
        match self.first {
            Some(range) if !self.traits.is_empty() => Err(SyntaxError::new(
                "traits must be followed by a member",
                range,
                ErrorCode::E0305,
            )),
            _ => Ok(()),
        }
    }
}

fn pending_docs(pending: &mut MemberPrefix) -> String {
    std::mem::take(&mut pending.docs).join("\n")
}

fn insert_member(members: &mut Members, name: &Token<'_>, member: Member) -> PResult<()> {
    if members.contains_key(name.text) {
        return Err(SyntaxError::new(
            format!("duplicate member '{}'", name.text),
            name.range,
            ErrorCode::E0308,
        ));
    }
    members.put(name.text, member);
    Ok(())
}

fn missing_member(id: &str, member: &str, range: TextRange) -> SyntaxError {
    SyntaxError::new(
        format!("{id} is missing its '{member}' member"),
        range,
        ErrorCode::E0304,
    )
}

fn check_not_recursive(id: &str, member: &Member, range: TextRange) -> PResult<()> {
    if member.target == id {
        return Err(SyntaxError::new(
            "Directly recursive type references not allowed",
            range,
            ErrorCode::E0303,
        ));
    }
    Ok(())
}

/// Build an enum (or intEnum) shape from the items of a v1 `@enum` trait.
fn enum_from_trait(int: bool, items: &[Value], range: TextRange) -> PResult<ShapeKind> {
    let invalid = |message: String| SyntaxError::new(message, range, ErrorCode::E0307);
    let mut members = Members::new();
    for item in items {
        let Some(def) = item.as_object() else {
            return Err(invalid("@enum entries must be objects".to_string()));
        };
        let name = def.get("name").and_then(Value::as_str);
        let mut traits = Traits::new();
        let member_name = if int {
            let value = def
                .get("value")
                .and_then(Value::as_i64)
                .ok_or_else(|| invalid("intEnum entries need an integer value".to_string()))?;
            traits.put(ENUM_VALUE, Value::from(value));
            name.ok_or_else(|| invalid("intEnum entries need a name".to_string()))?
                .to_string()
        } else {
            let value = def
                .get("value")
                .and_then(Value::as_str)
                .ok_or_else(|| invalid("@enum entries need a string value".to_string()))?;
            match name {
                Some(name) => {
                    traits.put(ENUM_VALUE, Value::from(value));
                    name.to_string()
                }
                None if is_identifier(value) => value.to_string(),
                None => return Err(invalid(format!("@enum value '{value}' needs a name"))),
            }
        };
        if let Some(tags) = def.get("tags") {
            traits.put(TAGS, tags.clone());
        }
        if let Some(doc) = def.get("documentation").and_then(Value::as_str) {
            traits.attach_documentation(doc);
        }
        members.put(member_name, Member::with_traits(prelude_id("Unit"), traits));
    }
    Ok(if int {
        ShapeKind::IntEnum { members }
    } else {
        ShapeKind::Enum { members }
    })
}
