//! Assertions over assembled models.

use smithy::model::Ast;

/// Shape ids in map order.
pub fn shape_ids(ast: &Ast) -> Vec<String> {
    ast.shapes.keys().cloned().collect()
}

/// Assert two models are equal and list their shapes in the same order.
/// Map equality alone ignores order.
pub fn assert_same_model(actual: &Ast, expected: &Ast) {
    assert_eq!(shape_ids(actual), shape_ids(expected), "shape order differs");
    for (id, shape) in expected.shapes.iter() {
        let other = actual.shapes.get(id).unwrap();
        let keys: Vec<&String> = shape.traits.keys().collect();
        let other_keys: Vec<&String> = other.traits.keys().collect();
        assert_eq!(other_keys, keys, "trait order differs on {id}");
        if let (Some(members), Some(other_members)) = (shape.members(), other.members()) {
            let names: Vec<&String> = members.keys().collect();
            let other_names: Vec<&String> = other_members.keys().collect();
            assert_eq!(other_names, names, "member order differs on {id}");
        }
    }
    assert_eq!(actual, expected);
}
