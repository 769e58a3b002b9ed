//! Dependency walks over the shape graph.
//!
//! Both the tag filter and the `use` computation of the IDL writer need to
//! follow references out of a set of shapes. Cycles are common (a resource
//! lists operations whose errors point back at shared structures), so every
//! walk keeps a visited set.

use std::collections::BTreeSet;

use rustc_hash::FxHashSet;
use tracing::trace;

use super::ast::Ast;
use crate::base::shape_id::{in_prelude, namespace_of, split_member};

/// All shapes reachable from `roots`, roots included, following member
/// targets, collection and map targets, operation input/output/errors,
/// service and resource references, mixins, and trait ids. Prelude shapes
/// are never part of the closure. Ids that do not resolve are kept (the
/// caller decides what to do with them) but not expanded.
pub fn dependency_closure<'a, I>(ast: &Ast, roots: I) -> FxHashSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut visited = FxHashSet::default();
    let mut stack: Vec<String> = roots.into_iter().map(str::to_string).collect();
    while let Some(id) = stack.pop() {
        let (shape_id, _) = split_member(&id);
        if in_prelude(shape_id) || visited.contains(shape_id) {
            continue;
        }
        trace!(shape = shape_id, "visiting dependency");
        visited.insert(shape_id.to_string());
        let Some(shape) = ast.get_shape(shape_id) else {
            continue;
        };
        // reversed so the walk expands references in declaration order
        let mut next: Vec<&str> = shape.references();
        next.extend(shape.trait_ids());
        stack.extend(next.into_iter().rev().map(str::to_string));
    }
    visited
}

/// Absolute ids referenced from shapes in `namespace` that live in another
/// non-prelude namespace, sorted.
pub fn external_refs(ast: &Ast, namespace: &str) -> Vec<String> {
    let mut refs = BTreeSet::new();
    for id in ast.shape_names(namespace) {
        let Some(shape) = ast.get_shape(id) else {
            continue;
        };
        for target in shape.references().into_iter().chain(shape.trait_ids()) {
            let (target, _) = split_member(target);
            let ns = namespace_of(target);
            if ns.is_empty() || ns == namespace || in_prelude(target) {
                continue;
            }
            refs.insert(target.to_string());
        }
    }
    refs.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Member, Members, OperationShape, Shape, ShapeKind, ShapeRef, SimpleType};
    use serde_json::json;

    fn structure(targets: &[(&str, &str)]) -> Shape {
        let members: Members = targets
            .iter()
            .map(|(name, target)| (*name, Member::new(*target)))
            .collect();
        Shape::new(ShapeKind::Structure { members })
    }

    fn sample() -> Ast {
        let mut ast = Ast::new("2.0");
        ast.put_shape(
            "a#Op",
            Shape::new(ShapeKind::Operation(OperationShape {
                input: Some(ShapeRef::new("a#In")),
                output: None,
                errors: vec![ShapeRef::new("a#Err")],
            })),
        );
        ast.put_shape("a#In", structure(&[("b", "a#B"), ("s", "smithy.api#String")]));
        ast.put_shape("a#B", structure(&[("self", "a#B"), ("ext", "lib#Ext")]));
        ast.put_shape("a#Err", structure(&[]));
        ast.put_shape("a#Unused", Shape::new(ShapeKind::Simple(SimpleType::String)));
        ast
    }

    #[test]
    fn test_closure_follows_references_and_cycles() {
        let ast = sample();
        let closure = dependency_closure(&ast, ["a#Op"]);
        for id in ["a#Op", "a#In", "a#B", "a#Err", "lib#Ext"] {
            assert!(closure.contains(id), "missing {id}");
        }
        assert!(!closure.contains("a#Unused"));
        assert!(!closure.contains("smithy.api#String"));
    }

    #[test]
    fn test_closure_follows_trait_ids() {
        let mut ast = sample();
        let mut shape = Shape::new(ShapeKind::Simple(SimpleType::String));
        shape.traits.put("a#marker", json!({}));
        ast.put_shape("a#Tagged", shape);
        ast.put_shape("a#marker", structure(&[]));
        let closure = dependency_closure(&ast, ["a#Tagged"]);
        assert!(closure.contains("a#marker"));
    }

    #[test]
    fn test_external_refs() {
        let mut ast = sample();
        let mut shape = Shape::new(ShapeKind::Simple(SimpleType::String));
        shape.traits.put("aws.protocols#restJson1", json!({}));
        shape.traits.put("smithy.api#sensitive", json!({}));
        ast.put_shape("a#Secret", shape);
        assert_eq!(external_refs(&ast, "a"), vec!["aws.protocols#restJson1", "lib#Ext"]);
        assert!(external_refs(&ast, "lib").is_empty());
    }
}
