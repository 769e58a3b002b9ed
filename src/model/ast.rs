//! The assembled model: version marker, metadata, and shapes.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::shape::{Shape, Shapes, Traits};
use crate::base::constants::DEFAULT_VERSION;
use crate::base::constants::traits::DOCUMENTATION;
use crate::base::shape_id::{namespace_of, split_member};

/// A parsed or assembled model.
///
/// Serializes to the JSON AST layout:
/// `{"smithy": "2.0", "metadata": {...}, "shapes": {"ns#Name": {...}}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ast {
    pub smithy: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Shapes::is_empty")]
    pub shapes: Shapes,
}

impl Default for Ast {
    fn default() -> Self {
        Self::new(DEFAULT_VERSION)
    }
}

impl Ast {
    pub fn new(smithy: impl Into<String>) -> Self {
        Self {
            smithy: smithy.into(),
            metadata: Map::new(),
            shapes: Shapes::new(),
        }
    }

    /// Major IDL version: 1 for any `1.x` marker, otherwise 2.
    pub fn version(&self) -> u8 {
        if self.smithy.starts_with('1') { 1 } else { 2 }
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty() && self.metadata.is_empty()
    }

    pub fn get_shape(&self, id: &str) -> Option<&Shape> {
        self.shapes.get(id)
    }

    pub fn get_shape_mut(&mut self, id: &str) -> Option<&mut Shape> {
        self.shapes.get_mut(id)
    }

    pub fn put_shape(&mut self, id: impl Into<String>, shape: Shape) {
        self.shapes.put(id, shape);
    }

    /// Merge `traits` into an existing shape or member (`ns#Shape$member`).
    /// Returns false when the target does not exist.
    pub fn apply_traits(&mut self, target: &str, traits: &Traits) -> bool {
        let (shape_id, member) = split_member(target);
        let Some(shape) = self.shapes.get_mut(shape_id) else {
            return false;
        };
        let dest = match member {
            Some(name) => match shape.member_mut(name) {
                Some(m) => &mut m.traits,
                None => return false,
            },
            None => &mut shape.traits,
        };
        for (id, value) in traits {
            match (id.as_str(), value) {
                (DOCUMENTATION, Value::String(text)) => dest.attach_documentation(text),
                _ => dest.put(id.clone(), value.clone()),
            }
        }
        true
    }

    /// Namespaces of all shapes, in order of first appearance.
    pub fn namespaces(&self) -> Vec<String> {
        let set: IndexSet<&str> = self.shapes.keys().map(|id| namespace_of(id)).collect();
        set.into_iter().map(str::to_string).collect()
    }

    /// Ids of the shapes in `namespace`, in map order.
    pub fn shape_names(&self, namespace: &str) -> Vec<&str> {
        self.shapes
            .keys()
            .filter(|id| namespace_of(id) == namespace)
            .map(String::as_str)
            .collect()
    }

    /// The namespace of the first service, falling back to the first
    /// namespace declared.
    pub fn primary_namespace(&self) -> Option<String> {
        self.shapes
            .iter()
            .find(|(_, shape)| shape.as_service().is_some())
            .map(|(id, _)| namespace_of(id).to_string())
            .or_else(|| self.namespaces().into_iter().next())
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Pretty JSON with a two-space indent.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ServiceShape, ShapeKind, SimpleType};
    use serde_json::json;

    #[test]
    fn test_version_major() {
        assert_eq!(Ast::new("1.0").version(), 1);
        assert_eq!(Ast::new("1").version(), 1);
        assert_eq!(Ast::new("2.0").version(), 2);
        assert_eq!(Ast::default().version(), 1);
    }

    #[test]
    fn test_namespaces_first_seen_order() {
        let mut ast = Ast::new("2.0");
        ast.put_shape("b.x#One", Shape::new(ShapeKind::Simple(SimpleType::String)));
        ast.put_shape("a.y#Two", Shape::new(ShapeKind::Simple(SimpleType::String)));
        ast.put_shape("b.x#Three", Shape::new(ShapeKind::Simple(SimpleType::String)));
        assert_eq!(ast.namespaces(), vec!["b.x", "a.y"]);
        assert_eq!(ast.shape_names("b.x"), vec!["b.x#One", "b.x#Three"]);
        assert_eq!(ast.primary_namespace().as_deref(), Some("b.x"));
    }

    #[test]
    fn test_primary_namespace_prefers_service() {
        let mut ast = Ast::new("2.0");
        ast.put_shape("lib#S", Shape::new(ShapeKind::Simple(SimpleType::String)));
        ast.put_shape("app#Svc", Shape::new(ShapeKind::Service(ServiceShape::default())));
        assert_eq!(ast.primary_namespace().as_deref(), Some("app"));
    }

    #[test]
    fn test_apply_traits_to_shape_and_member() {
        use crate::model::{Member, Members};
        let mut ast = Ast::new("2.0");
        let members: Members = [("id", Member::new("smithy.api#String"))].into_iter().collect();
        ast.put_shape("a#S", Shape::new(ShapeKind::Structure { members }));
        let mut traits = Traits::new();
        traits.put("smithy.api#sensitive", json!({}));
        assert!(ast.apply_traits("a#S", &traits));
        assert!(ast.apply_traits("a#S$id", &traits));
        assert!(!ast.apply_traits("a#S$nope", &traits));
        assert!(!ast.apply_traits("a#Missing", &traits));
        let shape = ast.get_shape("a#S").unwrap();
        assert!(shape.traits.has("smithy.api#sensitive"));
        assert!(shape.members().unwrap().get("id").unwrap().traits.has("smithy.api#sensitive"));
    }

    #[test]
    fn test_json_requires_version() {
        assert!(Ast::from_json(r#"{"shapes": {}}"#).is_err());
        let ast = Ast::from_json(r#"{"smithy": "2.0"}"#).unwrap();
        assert!(ast.is_empty());
    }

    #[test]
    fn test_json_layout() {
        let mut ast = Ast::new("2.0");
        ast.metadata.insert("owner".into(), json!("team"));
        ast.put_shape("a#S", Shape::new(ShapeKind::Simple(SimpleType::String)));
        let value = serde_json::to_value(&ast).unwrap();
        assert_eq!(
            value,
            json!({"smithy": "2.0", "metadata": {"owner": "team"}, "shapes": {"a#S": {"type": "string"}}})
        );
        assert!(ast.to_json_pretty().unwrap().contains("\n  \"metadata\""));
    }
}
