//! Shape definitions.
//!
//! A [`Shape`] is a closed sum over the Smithy shape types. References
//! between shapes are plain absolute id strings resolved by map lookup;
//! nothing here requires a target to exist.
//!
//! The JSON AST layout is flat (`{"type": "list", "member": {...}}`), so
//! serde goes through [`RawShape`] and the type tag is validated on decode.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ordered::OrderedMap;

/// Trait id → trait value.
pub type Traits = OrderedMap<Value>;
/// Member name → member.
pub type Members = OrderedMap<Member>;
/// Absolute shape id → shape.
pub type Shapes = OrderedMap<Shape>;

// ============================================================================
// REFERENCES
// ============================================================================

/// A member of an aggregate or collection shape
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Member {
    pub target: String,
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub traits: Traits,
}

impl Member {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            traits: Traits::new(),
        }
    }

    pub fn with_traits(target: impl Into<String>, traits: Traits) -> Self {
        Self {
            target: target.into(),
            traits,
        }
    }
}

/// A bare reference to another shape
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeRef {
    pub target: String,
}

impl ShapeRef {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

impl From<&str> for ShapeRef {
    fn from(target: &str) -> Self {
        Self::new(target)
    }
}

impl From<String> for ShapeRef {
    fn from(target: String) -> Self {
        Self { target }
    }
}

// ============================================================================
// SHAPE KINDS
// ============================================================================

/// Scalar shape types without members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimpleType {
    Blob,
    Boolean,
    Document,
    String,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    BigInteger,
    BigDecimal,
    Timestamp,
}

impl SimpleType {
    pub const ALL: [SimpleType; 13] = [
        Self::Blob,
        Self::Boolean,
        Self::Document,
        Self::String,
        Self::Byte,
        Self::Short,
        Self::Integer,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::BigInteger,
        Self::BigDecimal,
        Self::Timestamp,
    ];

    /// The IDL keyword and JSON `type` tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Boolean => "boolean",
            Self::Document => "document",
            Self::String => "string",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Integer => "integer",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::BigInteger => "bigInteger",
            Self::BigDecimal => "bigDecimal",
            Self::Timestamp => "timestamp",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == keyword)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Byte
                | Self::Short
                | Self::Integer
                | Self::Long
                | Self::Float
                | Self::Double
                | Self::BigInteger
                | Self::BigDecimal
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ServiceShape {
    pub version: String,
    pub operations: Vec<ShapeRef>,
    pub resources: Vec<ShapeRef>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResourceShape {
    pub identifiers: OrderedMap<ShapeRef>,
    pub create: Option<ShapeRef>,
    pub put: Option<ShapeRef>,
    pub read: Option<ShapeRef>,
    pub update: Option<ShapeRef>,
    pub delete: Option<ShapeRef>,
    pub list: Option<ShapeRef>,
    pub operations: Vec<ShapeRef>,
    pub collection_operations: Vec<ShapeRef>,
    pub resources: Vec<ShapeRef>,
}

impl ResourceShape {
    /// Lifecycle operations in declaration order, paired with their keyword.
    pub fn lifecycle(&self) -> [(&'static str, Option<&ShapeRef>); 6] {
        [
            ("create", self.create.as_ref()),
            ("put", self.put.as_ref()),
            ("read", self.read.as_ref()),
            ("update", self.update.as_ref()),
            ("delete", self.delete.as_ref()),
            ("list", self.list.as_ref()),
        ]
    }

    pub fn lifecycle_mut(&mut self, keyword: &str) -> Option<&mut Option<ShapeRef>> {
        match keyword {
            "create" => Some(&mut self.create),
            "put" => Some(&mut self.put),
            "read" => Some(&mut self.read),
            "update" => Some(&mut self.update),
            "delete" => Some(&mut self.delete),
            "list" => Some(&mut self.list),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OperationShape {
    pub input: Option<ShapeRef>,
    pub output: Option<ShapeRef>,
    pub errors: Vec<ShapeRef>,
}

/// The type-specific payload of a shape
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Simple(SimpleType),
    List { member: Member },
    Set { member: Member },
    Map { key: Member, value: Member },
    Structure { members: Members },
    Union { members: Members },
    Enum { members: Members },
    IntEnum { members: Members },
    Service(ServiceShape),
    Resource(ResourceShape),
    Operation(OperationShape),
}

impl ShapeKind {
    /// The IDL keyword and JSON `type` tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Simple(t) => t.as_str(),
            Self::List { .. } => "list",
            Self::Set { .. } => "set",
            Self::Map { .. } => "map",
            Self::Structure { .. } => "structure",
            Self::Union { .. } => "union",
            Self::Enum { .. } => "enum",
            Self::IntEnum { .. } => "intEnum",
            Self::Service(_) => "service",
            Self::Resource(_) => "resource",
            Self::Operation(_) => "operation",
        }
    }
}

// ============================================================================
// SHAPE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawShape", into = "RawShape")]
pub struct Shape {
    pub kind: ShapeKind,
    pub traits: Traits,
    pub mixins: Vec<ShapeRef>,
}

impl Shape {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            traits: Traits::new(),
            mixins: Vec::new(),
        }
    }

    pub fn with_traits(kind: ShapeKind, traits: Traits) -> Self {
        Self {
            kind,
            traits,
            mixins: Vec::new(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Named members of structure-like shapes (structure, union, enum, intEnum).
    pub fn members(&self) -> Option<&Members> {
        match &self.kind {
            ShapeKind::Structure { members }
            | ShapeKind::Union { members }
            | ShapeKind::Enum { members }
            | ShapeKind::IntEnum { members } => Some(members),
            _ => None,
        }
    }

    /// Mutable access to any member by name, including the implicit
    /// `member`, `key` and `value` members of collections.
    pub fn member_mut(&mut self, name: &str) -> Option<&mut Member> {
        match &mut self.kind {
            ShapeKind::Structure { members }
            | ShapeKind::Union { members }
            | ShapeKind::Enum { members }
            | ShapeKind::IntEnum { members } => members.get_mut(name),
            ShapeKind::List { member } | ShapeKind::Set { member } if name == "member" => {
                Some(member)
            }
            ShapeKind::Map { key, .. } if name == "key" => Some(key),
            ShapeKind::Map { value, .. } if name == "value" => Some(value),
            _ => None,
        }
    }

    pub fn as_operation(&self) -> Option<&OperationShape> {
        match &self.kind {
            ShapeKind::Operation(op) => Some(op),
            _ => None,
        }
    }

    pub fn as_service(&self) -> Option<&ServiceShape> {
        match &self.kind {
            ShapeKind::Service(svc) => Some(svc),
            _ => None,
        }
    }

    pub fn as_resource(&self) -> Option<&ResourceShape> {
        match &self.kind {
            ShapeKind::Resource(res) => Some(res),
            _ => None,
        }
    }

    /// Every shape id this shape refers to (not including trait ids),
    /// in a stable order.
    pub fn references(&self) -> Vec<&str> {
        let mut refs: Vec<&str> = self.mixins.iter().map(|m| m.target.as_str()).collect();
        match &self.kind {
            ShapeKind::Simple(_) => {}
            ShapeKind::List { member } | ShapeKind::Set { member } => {
                refs.push(&member.target);
            }
            ShapeKind::Map { key, value } => {
                refs.push(&key.target);
                refs.push(&value.target);
            }
            ShapeKind::Structure { members }
            | ShapeKind::Union { members }
            | ShapeKind::Enum { members }
            | ShapeKind::IntEnum { members } => {
                refs.extend(members.values().map(|m| m.target.as_str()));
            }
            ShapeKind::Service(svc) => {
                refs.extend(svc.operations.iter().map(|r| r.target.as_str()));
                refs.extend(svc.resources.iter().map(|r| r.target.as_str()));
            }
            ShapeKind::Resource(res) => {
                refs.extend(res.identifiers.values().map(|r| r.target.as_str()));
                refs.extend(res.lifecycle().into_iter().filter_map(|(_, r)| r).map(|r| r.target.as_str()));
                refs.extend(res.operations.iter().map(|r| r.target.as_str()));
                refs.extend(res.collection_operations.iter().map(|r| r.target.as_str()));
                refs.extend(res.resources.iter().map(|r| r.target.as_str()));
            }
            ShapeKind::Operation(op) => {
                refs.extend(op.input.iter().map(|r| r.target.as_str()));
                refs.extend(op.output.iter().map(|r| r.target.as_str()));
                refs.extend(op.errors.iter().map(|r| r.target.as_str()));
            }
        }
        refs
    }

    /// Every trait id applied to the shape or any of its members.
    pub fn trait_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.traits.keys().map(String::as_str).collect();
        let members: Vec<&Member> = match &self.kind {
            ShapeKind::List { member } | ShapeKind::Set { member } => vec![member],
            ShapeKind::Map { key, value } => vec![key, value],
            ShapeKind::Structure { members }
            | ShapeKind::Union { members }
            | ShapeKind::Enum { members }
            | ShapeKind::IntEnum { members } => members.values().collect(),
            _ => Vec::new(),
        };
        for member in members {
            ids.extend(member.traits.keys().map(String::as_str));
        }
        ids
    }
}

// ============================================================================
// JSON LAYOUT
// ============================================================================

/// Flat JSON form of a shape. Field order is the serialized key order.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawShape {
    #[serde(rename = "type")]
    shape_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    traits: Option<Traits>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    member: Option<Member>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key: Option<Member>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<Member>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    members: Option<Members>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mixins: Option<Vec<ShapeRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    identifiers: Option<OrderedMap<ShapeRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    create: Option<ShapeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    put: Option<ShapeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    read: Option<ShapeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    update: Option<ShapeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delete: Option<ShapeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    list: Option<ShapeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    collection_operations: Option<Vec<ShapeRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    operations: Option<Vec<ShapeRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resources: Option<Vec<ShapeRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    input: Option<ShapeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    output: Option<ShapeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<ShapeRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

fn required<T>(field: Option<T>, shape_type: &str, name: &str) -> Result<T, String> {
    field.ok_or_else(|| format!("{shape_type} shape is missing required field '{name}'"))
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() { None } else { Some(items) }
}

impl TryFrom<RawShape> for Shape {
    type Error = String;

    fn try_from(raw: RawShape) -> Result<Self, Self::Error> {
        let t = raw.shape_type.as_str();
        let kind = match t {
            "list" => ShapeKind::List {
                member: required(raw.member, t, "member")?,
            },
            "set" => ShapeKind::Set {
                member: required(raw.member, t, "member")?,
            },
            "map" => ShapeKind::Map {
                key: required(raw.key, t, "key")?,
                value: required(raw.value, t, "value")?,
            },
            "structure" => ShapeKind::Structure {
                members: raw.members.unwrap_or_default(),
            },
            "union" => ShapeKind::Union {
                members: raw.members.unwrap_or_default(),
            },
            "enum" => ShapeKind::Enum {
                members: raw.members.unwrap_or_default(),
            },
            "intEnum" => ShapeKind::IntEnum {
                members: raw.members.unwrap_or_default(),
            },
            "service" => ShapeKind::Service(ServiceShape {
                version: raw.version.unwrap_or_default(),
                operations: raw.operations.unwrap_or_default(),
                resources: raw.resources.unwrap_or_default(),
            }),
            "resource" => ShapeKind::Resource(ResourceShape {
                identifiers: raw.identifiers.unwrap_or_default(),
                create: raw.create,
                put: raw.put,
                read: raw.read,
                update: raw.update,
                delete: raw.delete,
                list: raw.list,
                operations: raw.operations.unwrap_or_default(),
                collection_operations: raw.collection_operations.unwrap_or_default(),
                resources: raw.resources.unwrap_or_default(),
            }),
            "operation" => ShapeKind::Operation(OperationShape {
                input: raw.input,
                output: raw.output,
                errors: raw.errors.unwrap_or_default(),
            }),
            other => match SimpleType::from_keyword(other) {
                Some(simple) => ShapeKind::Simple(simple),
                None => return Err(format!("unknown shape type '{other}'")),
            },
        };
        Ok(Shape {
            kind,
            traits: raw.traits.unwrap_or_default(),
            mixins: raw.mixins.unwrap_or_default(),
        })
    }
}

impl From<Shape> for RawShape {
    fn from(shape: Shape) -> Self {
        let mut raw = RawShape {
            shape_type: shape.kind.type_name().to_string(),
            traits: (!shape.traits.is_empty()).then_some(shape.traits),
            mixins: non_empty(shape.mixins),
            ..RawShape::default()
        };
        match shape.kind {
            ShapeKind::Simple(_) => {}
            ShapeKind::List { member } | ShapeKind::Set { member } => raw.member = Some(member),
            ShapeKind::Map { key, value } => {
                raw.key = Some(key);
                raw.value = Some(value);
            }
            ShapeKind::Structure { members }
            | ShapeKind::Union { members }
            | ShapeKind::Enum { members }
            | ShapeKind::IntEnum { members } => raw.members = Some(members),
            ShapeKind::Service(svc) => {
                raw.version = (!svc.version.is_empty()).then_some(svc.version);
                raw.operations = non_empty(svc.operations);
                raw.resources = non_empty(svc.resources);
            }
            ShapeKind::Resource(res) => {
                raw.identifiers = (!res.identifiers.is_empty()).then_some(res.identifiers);
                raw.create = res.create;
                raw.put = res.put;
                raw.read = res.read;
                raw.update = res.update;
                raw.delete = res.delete;
                raw.list = res.list;
                raw.collection_operations = non_empty(res.collection_operations);
                raw.operations = non_empty(res.operations);
                raw.resources = non_empty(res.resources);
            }
            ShapeKind::Operation(op) => {
                raw.input = op.input;
                raw.output = op.output;
                raw.errors = non_empty(op.errors);
            }
        }
        raw
    }
}
