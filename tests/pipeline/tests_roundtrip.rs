//! Round-trip stability: parse → unparse → parse.

use rstest::rstest;
use smithy::model::Ast;
use smithy::{parse_str, unparse};

use crate::helpers::model_assertions::{assert_same_model, shape_ids};
use crate::helpers::source_fixtures::{BOOKS_V1, LIBRARY_V2};

fn reparse(ast: &Ast) -> (String, Ast) {
    let ns = ast.primary_namespace().unwrap();
    let text = unparse(ast, &ns);
    let again = parse_str(&text).unwrap_or_else(|e| panic!("{e}\n---\n{text}"));
    (text, again)
}

// ============================================================================
// Canonical sources
// ============================================================================

#[rstest]
#[case::v1(BOOKS_V1)]
#[case::v2(LIBRARY_V2)]
fn test_roundtrip_preserves_model(#[case] source: &str) {
    let first = parse_str(source).unwrap();
    let (_, second) = reparse(&first);
    assert_same_model(&second, &first);
}

#[rstest]
#[case::v1(BOOKS_V1)]
#[case::v2(LIBRARY_V2)]
fn test_unparse_is_idempotent(#[case] source: &str) {
    let first = parse_str(source).unwrap();
    let (text, second) = reparse(&first);
    let (text_again, _) = reparse(&second);
    assert_eq!(text_again, text);
}

#[test]
fn test_v1_keeps_commas_and_explicit_io() {
    let ast = parse_str(BOOKS_V1).unwrap();
    let text = unparse(&ast, "example.books");
    assert!(text.starts_with("$version: \"1\"\n"));
    assert!(text.contains("    input: GetBookInput,\n"));
    assert!(text.contains("\n@input\nstructure GetBookInput {\n"));
    assert!(!text.contains(":="));
}

#[test]
fn test_v2_inlines_io_and_imports_external_names() {
    let ast = parse_str(LIBRARY_V2).unwrap();
    let text = unparse(&ast, "example.library");
    assert!(text.contains("\nuse example.common#Isbn\n"));
    assert!(text.contains("    input := with [Audited] {\n"));
    assert!(text.contains("        days: Integer = 14\n"));
    assert!(!text.contains("structure BorrowInput"));
}

// ============================================================================
// Non-canonical order
// ============================================================================

#[test]
fn test_noncanonical_order_settles_after_one_pass() {
    let source = r#"$version: "2"
namespace ex
string Name
structure Greeting { name: Name }
operation Greet {
    input: Greeting
}
service Greeter {
    operations: [Greet]
}
"#;
    let first = parse_str(source).unwrap();
    let (_, second) = reparse(&first);
    assert_eq!(shape_ids(&second), vec!["ex#Greeter", "ex#Greet", "ex#Greeting", "ex#Name"]);
    // Same shapes, different order.
    assert_eq!(second, first);
    let (_, third) = reparse(&second);
    assert_same_model(&third, &second);
}

// ============================================================================
// Order preservation through JSON
// ============================================================================

#[test]
fn test_json_decode_encode_keeps_key_order() {
    let json = r#"{
  "smithy": "2.0",
  "metadata": {
    "zeta": 1,
    "alpha": 2
  },
  "shapes": {
    "ex#Zebra": {
      "type": "structure",
      "members": {
        "z": { "target": "smithy.api#String" },
        "a": { "target": "smithy.api#Integer" }
      },
      "traits": {
        "smithy.api#tags": ["b", "a"],
        "smithy.api#documentation": "Z first."
      }
    },
    "ex#Apple": { "type": "string" }
  }
}"#;
    let ast = Ast::from_json(json).unwrap();
    assert_eq!(shape_ids(&ast), vec!["ex#Zebra", "ex#Apple"]);
    let encoded = ast.to_json_pretty().unwrap();
    let again = Ast::from_json(&encoded).unwrap();
    assert_same_model(&again, &ast);
    let meta: Vec<&String> = again.metadata.keys().collect();
    assert_eq!(meta, vec!["zeta", "alpha"]);
    assert!(encoded.find("\"z\": {").unwrap() < encoded.find("\"a\": {").unwrap());
}
