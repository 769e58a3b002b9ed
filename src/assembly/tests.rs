#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::model::{Shape, ShapeKind, SimpleType};
use crate::parser::parse_str;
use rstest::rstest;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const NO_TAGS: &[&str] = &[];

fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, text).unwrap();
    path
}

fn string_shape() -> Shape {
    Shape::new(ShapeKind::Simple(SimpleType::String))
}

// ============================================================================
// merge
// ============================================================================

#[rstest]
#[case("1.0", "1.0", "1.0")]
#[case("2.0", "2.0", "2.0")]
#[case("1.0", "2.0", "2.0")]
#[case("2.0", "1.0", "2.0")]
fn test_merge_versions(#[case] first: &str, #[case] second: &str, #[case] expected: &str) {
    let mut dst = Ast::new(first);
    dst.put_shape("a#A", string_shape());
    let mut src = Ast::new(second);
    src.put_shape("a#B", string_shape());
    dst.merge(src).unwrap();
    assert_eq!(dst.smithy, expected);
    assert_eq!(dst.shape_names("a"), vec!["a#A", "a#B"]);
}

#[test]
fn test_merge_into_empty_adopts_version() {
    let mut dst = Ast::default();
    dst.merge(Ast::new("2.0")).unwrap();
    assert_eq!(dst.smithy, "2.0");
}

#[rstest]
#[case("3.0")]
#[case("banana")]
#[case("1.x")]
fn test_merge_rejects_unknown_version(#[case] version: &str) {
    let mut dst = Ast::new("2.0");
    let err = dst.merge(Ast::new(version)).unwrap_err();
    assert!(matches!(err, AssemblyError::UnsupportedVersion(v) if v == version));
}

#[test]
fn test_merge_duplicate_shape_fails_even_if_identical() {
    let mut dst = Ast::new("2.0");
    dst.put_shape("a#Foo", string_shape());
    let mut src = Ast::new("2.0");
    src.put_shape("a#Foo", string_shape());
    let err = dst.merge(src).unwrap_err();
    assert!(matches!(err, AssemblyError::DuplicateShape(id) if id == "a#Foo"));
}

#[test]
fn test_merge_metadata() {
    let mut dst = Ast::new("2.0");
    dst.metadata.insert("owner".into(), json!("team"));
    let mut same = Ast::new("2.0");
    same.metadata.insert("owner".into(), json!("team"));
    same.metadata.insert("extra".into(), json!([1, 2]));
    dst.merge(same).unwrap();
    assert_eq!(dst.metadata.len(), 2);

    let mut different = Ast::new("2.0");
    different.metadata.insert("owner".into(), json!("someone else"));
    let err = dst.merge(different).unwrap_err();
    assert!(matches!(err, AssemblyError::MetadataConflict(k) if k == "owner"));
    assert_eq!(dst.metadata["owner"], json!("team"));
}

#[test]
fn test_failed_merge_leaves_destination_untouched() {
    let mut dst = Ast::new("2.0");
    dst.put_shape("a#Foo", string_shape());
    let mut src = Ast::new("2.0");
    src.put_shape("a#Bar", string_shape());
    src.put_shape("a#Foo", string_shape());
    assert!(dst.merge(src).is_err());
    assert_eq!(dst.shapes.len(), 1);
}

#[rstest]
#[case("1", Some(1))]
#[case("1.0", Some(1))]
#[case("2.0", Some(2))]
#[case("2.1", Some(2))]
#[case("3.0", None)]
#[case("", None)]
fn test_major_version(#[case] smithy: &str, #[case] expected: Option<u8>) {
    assert_eq!(major_version(smithy), expected);
}

// ============================================================================
// filter
// ============================================================================

const TAGGED: &str = r#"$version: "2"
namespace ex

@tags(["t1"])
structure A {
    b: B
}

structure B {
    c: C
}

@myTrait
string C

@trait
structure myTrait {}

@tags(["t2"])
structure D {
    a: A
}

structure Orphan {}
"#;

#[test]
fn test_filter_keeps_closure_in_order() {
    let mut ast = parse_str(TAGGED).unwrap();
    ast.filter(&["t1"]);
    assert_eq!(ast.shape_names("ex"), vec!["ex#A", "ex#B", "ex#C", "ex#myTrait"]);
}

#[test]
fn test_filter_multiple_tags_and_cycles() {
    let source = r#"$version: "2"
namespace ex
@tags(["x"])
structure Node { next: Link }
structure Link { back: Node }
@tags(["y"])
string Y
string Z
"#;
    let mut ast = parse_str(source).unwrap();
    ast.filter(&["x".to_string(), "y".to_string()]);
    assert_eq!(ast.shape_names("ex"), vec!["ex#Node", "ex#Link", "ex#Y"]);
}

#[test]
fn test_filter_unknown_tag_empties_shapes() {
    let mut ast = parse_str(TAGGED).unwrap();
    ast.filter(&["nope"]);
    assert!(ast.shapes.is_empty());
}

// ============================================================================
// files
// ============================================================================

#[test]
fn test_collect_file_paths_walks_sorted() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "b.smithy", "");
    write(dir.path(), "a.json", "{}");
    write(dir.path(), "nested/c.smithy", "");
    write(dir.path(), "notes.txt", "");
    let files = collect_file_paths(&[dir.path().to_path_buf()]).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|p| p.strip_prefix(dir.path()).unwrap().display().to_string())
        .collect();
    assert_eq!(names, vec!["a.json", "b.smithy", "nested/c.smithy"]);
}

#[test]
fn test_collect_file_paths_rejects_unknown_file() {
    let dir = TempDir::new().unwrap();
    let txt = write(dir.path(), "notes.txt", "");
    let err = collect_file_paths(&[txt]).unwrap_err();
    assert!(matches!(err, AssemblyError::UnsupportedFileType(_)));
    assert!(err.to_string().contains("notes.txt"));
}

#[test]
fn test_collect_file_paths_missing_path() {
    let err = collect_file_paths(&[PathBuf::from("/definitely/not/here.smithy")]).unwrap_err();
    assert!(matches!(err, AssemblyError::Io { .. }));
}

#[test]
fn test_load_json_requires_version() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "model.json", r#"{"shapes": {}}"#);
    let err = load_file(&path, &ParserOptions::default()).unwrap_err();
    assert!(matches!(err, AssemblyError::Json { .. }));
}

#[test]
fn test_load_idl_reports_location() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "bad.smithy", "namespace ex\nstructure {}\n");
    let err = load_file(&path, &ParserOptions::default()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("bad.smithy:2:"), "{message}");
}

#[test]
fn test_assemble_idl_and_json_in_input_order() {
    let dir = TempDir::new().unwrap();
    let idl = write(
        dir.path(),
        "weather.smithy",
        r#"$version: "2"
metadata owner = "team"
namespace ex.weather
structure City { name: Name }
apply ex.common#Name @documentation("A name.")
"#,
    );
    let json = write(
        dir.path(),
        "common.json",
        r#"{"smithy": "2.0", "shapes": {"ex.common#Name": {"type": "string"}}}"#,
    );
    let ast = assemble(&[idl, json], NO_TAGS).unwrap();
    assert_eq!(ast.smithy, "2.0");
    let ids: Vec<&String> = ast.shapes.keys().collect();
    assert_eq!(ids, vec!["ex.weather#City", "ex.common#Name"]);
    assert_eq!(ast.metadata["owner"], json!("team"));
    let name = ast.get_shape("ex.common#Name").unwrap();
    assert_eq!(name.traits.documentation(), Some("A name."));
}

#[test]
fn test_assemble_duplicate_across_files() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.smithy", "namespace ex\nstring Foo\n");
    write(dir.path(), "b.smithy", "namespace ex\nstring Foo\n");
    let err = assemble(&[dir.path().to_path_buf()], NO_TAGS).unwrap_err();
    assert!(matches!(err, AssemblyError::DuplicateShape(id) if id == "ex#Foo"));
}

#[test]
fn test_assemble_with_tags() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "model.smithy", TAGGED);
    let ast = assemble(&[path], &["t2"]).unwrap();
    assert_eq!(
        ast.shape_names("ex"),
        vec!["ex#A", "ex#B", "ex#C", "ex#myTrait", "ex#D"]
    );
}

#[test]
fn test_unresolved_apply_is_dropped() {
    let options = ParserOptions::default();
    let files = vec![
        crate::parser::parse("a.smithy", "namespace ex\nstring S\n", &options).unwrap(),
        crate::parser::parse("b.smithy", "namespace ex\napply ex#Missing @sensitive\n", &options)
            .unwrap(),
    ];
    assert_eq!(files[1].applies.len(), 1);
    let ast = Assembler::new().merge_all(files).unwrap();
    assert_eq!(ast.shapes.len(), 1);
    assert!(!ast.get_shape("ex#S").unwrap().traits.has("smithy.api#sensitive"));
}

#[test]
fn test_apply_across_files_resolves_after_merge() {
    let options = ParserOptions::default();
    let files = vec![
        crate::parser::parse("b.smithy", "namespace ex\napply ex#S$id @required\n", &options).unwrap(),
        crate::parser::parse("a.smithy", "namespace ex\nstructure S { id: String }\n", &options)
            .unwrap(),
    ];
    let ast = Assembler::new().merge_all(files).unwrap();
    let shape = ast.get_shape("ex#S").unwrap();
    assert!(shape.members().unwrap().get("id").unwrap().traits.has("smithy.api#required"));
}
