//! Node values and trait applications as IDL text.

use serde_json::{Map, Value};

use crate::base::shape_id::is_identifier;
use crate::base::text::quote;

/// Render a node value on one line: `["a", "b"]`, `{key: 1, "odd key": true}`.
pub fn render_node(value: &Value) -> String {
    match value {
        Value::String(s) => quote(s),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(render_node).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Object(map) if map.is_empty() => "{}".to_string(),
        Value::Object(map) => format!("{{ {} }}", render_pairs(map)),
        other => other.to_string(),
    }
}

/// `key: value, key: value` with bare keys where the IDL allows them.
pub fn render_pairs(map: &Map<String, Value>) -> String {
    map.iter()
        .map(|(k, v)| format!("{}: {}", render_key(k), render_node(v)))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_key(key: &str) -> String {
    if is_identifier(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

/// Pretty JSON with continuation lines indented by `indent`.
pub fn render_pretty(value: &Value, indent: &str) -> String {
    let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| render_node(value));
    text.replace('\n', &format!("\n{indent}"))
}

/// `@name`, `@name(value)` or `@name(key: value, ...)`.
pub fn render_trait(name: &str, value: &Value) -> String {
    match value {
        Value::Object(map) if map.is_empty() => format!("@{name}"),
        Value::Object(map) => format!("@{name}({})", render_pairs(map)),
        other => format!("@{name}({})", render_node(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_node() {
        assert_eq!(render_node(&json!("a\"b")), "\"a\\\"b\"");
        assert_eq!(render_node(&json!(["a", 1, true, null])), "[\"a\", 1, true, null]");
        assert_eq!(render_node(&json!({"k": 1, "odd key": []})), "{ k: 1, \"odd key\": [] }");
        assert_eq!(render_node(&json!({})), "{}");
        assert_eq!(render_node(&json!(1.5)), "1.5");
    }

    #[test]
    fn test_render_trait_forms() {
        assert_eq!(render_trait("required", &json!({})), "@required");
        assert_eq!(render_trait("pattern", &json!("^a$")), "@pattern(\"^a$\")");
        assert_eq!(render_trait("httpError", &json!(404)), "@httpError(404)");
        assert_eq!(render_trait("tags", &json!(["a", "b"])), "@tags([\"a\", \"b\"])");
        assert_eq!(
            render_trait("http", &json!({"method": "GET", "uri": "/x", "code": 200})),
            "@http(method: \"GET\", uri: \"/x\", code: 200)"
        );
        assert_eq!(
            render_trait("trait", &json!({"selector": "structure", "conflicts": ["a#b"]})),
            "@trait(selector: \"structure\", conflicts: [\"a#b\"])"
        );
    }

    #[test]
    fn test_render_pretty_indents() {
        let text = render_pretty(&json!([{"value": "a"}]), "    ");
        assert!(text.starts_with("[\n      {"));
        assert!(text.ends_with("\n    ]"));
    }
}
