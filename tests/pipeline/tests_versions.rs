//! IDL version handling and name resolution.

use rstest::rstest;
use smithy::parser::ErrorCode;
use smithy::{parse_str, unparse};

use crate::helpers::source_fixtures::{SCENARIO, SCENARIO_V2};

// ============================================================================
// structure A { @required id: String }
// ============================================================================

#[rstest]
#[case::v1(SCENARIO, "$version: \"1\"", "    @required\n    id: String,\n}")]
#[case::v2(SCENARIO_V2, "$version: \"2\"", "    @required\n    id: String\n}")]
fn test_required_member_scenario(#[case] source: &str, #[case] pragma: &str, #[case] member: &str) {
    let ast = parse_str(source).unwrap();
    let text = unparse(&ast, "foo");

    let version_at = text.find(pragma).unwrap();
    let namespace_at = text.find("namespace foo\n").unwrap();
    let structure_at = text.find("structure A {\n").unwrap();
    assert!(version_at < namespace_at && namespace_at < structure_at, "{text}");
    assert!(text[structure_at..].contains(member), "{text}");
}

#[test]
fn test_missing_version_means_v1() {
    let ast = parse_str(SCENARIO).unwrap();
    assert_eq!(ast.smithy, "1.0");
    assert_eq!(ast.version(), 1);
}

#[rstest]
#[case("$version: \"3\"\nnamespace foo\n")]
#[case("$version: \"banana\"\nnamespace foo\n")]
fn test_unsupported_version_rejected(#[case] source: &str) {
    assert!(parse_str(source).is_err());
}

// ============================================================================
// Name resolution
// ============================================================================

#[test]
fn test_bare_names_resolve_by_use_namespace_and_prelude() {
    let source = r#"$version: "2"
namespace mine
use other.ns#Thing
structure Holder {
    thing: Thing
    other: Other
    text: String
}
"#;
    let ast = parse_str(source).unwrap();
    let holder = ast.get_shape("mine#Holder").unwrap();
    let targets: Vec<&str> = holder.members().unwrap().values().map(|m| m.target.as_str()).collect();
    assert_eq!(targets, vec!["other.ns#Thing", "mine#Other", "smithy.api#String"]);
}

// ============================================================================
// Recursion
// ============================================================================

#[rstest]
#[case("list Foo { member: Foo }")]
#[case("map Foo { key: String, value: Foo }")]
fn test_direct_collection_recursion_rejected(#[case] decl: &str) {
    let err = parse_str(&format!("namespace ex\n{decl}\n")).unwrap_err();
    assert_eq!(err.code, ErrorCode::E0303);
}

#[test]
fn test_structure_recursion_allowed() {
    let ast = parse_str("namespace ex\nstructure Foo { member: Foo }\n").unwrap();
    let foo = ast.get_shape("ex#Foo").unwrap();
    assert_eq!(foo.members().unwrap().get("member").unwrap().target, "ex#Foo");
}

#[test]
fn test_second_namespace_rejected() {
    assert!(parse_str("namespace a\nnamespace b\n").is_err());
}
