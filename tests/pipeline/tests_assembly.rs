//! Assembling models from files and directories.

use smithy::assembly::{Assembler, AssemblyError};
use smithy::assemble;
use tempfile::TempDir;

use crate::helpers::model_assertions::shape_ids;
use crate::helpers::source_fixtures::{BOOKS_V1, COMMON_V2, LIBRARY_V2, write_files};

const NO_TAGS: &[&str] = &[];

#[test]
fn test_directory_assembles_in_path_order() {
    let dir = TempDir::new().unwrap();
    write_files(
        dir.path(),
        &[("b/library.smithy", LIBRARY_V2), ("a/common.smithy", COMMON_V2)],
    );
    let ast = assemble(&[dir.path().to_path_buf()], NO_TAGS).unwrap();
    assert_eq!(ast.smithy, "2.0");
    assert_eq!(ast.namespaces(), vec!["example.common", "example.library"]);
    let isbn = ast.get_shape("example.common#Isbn").unwrap();
    assert_eq!(isbn.traits.get_str("smithy.api#pattern"), Some("^[0-9-]+$"));
}

#[test]
fn test_mixed_versions_upgrade_to_v2() {
    let dir = TempDir::new().unwrap();
    let paths = write_files(dir.path(), &[("books.smithy", BOOKS_V1), ("common.smithy", COMMON_V2)]);
    let ast = Assembler::new().assemble(&paths, NO_TAGS).unwrap();
    assert_eq!(ast.smithy, "2.0");
    assert!(ast.get_shape("example.books#BookStore").is_some());
}

#[test]
fn test_same_shape_in_two_files_fails() {
    let dir = TempDir::new().unwrap();
    let paths = write_files(dir.path(), &[("one.smithy", COMMON_V2), ("two.smithy", COMMON_V2)]);
    let err = assemble(&paths, NO_TAGS).unwrap_err();
    assert!(matches!(err, AssemblyError::DuplicateShape(ref id) if id == "example.common#Isbn"));
    assert_eq!(err.to_string(), "Duplicate shape in assembly: example.common#Isbn");
}

#[test]
fn test_conflicting_metadata_fails() {
    let dir = TempDir::new().unwrap();
    let paths = write_files(
        dir.path(),
        &[
            ("one.smithy", "$version: \"2\"\nmetadata stage = \"dev\"\nnamespace a\n"),
            ("two.smithy", "$version: \"2\"\nmetadata stage = \"prod\"\nnamespace b\n"),
        ],
    );
    let err = assemble(&paths, NO_TAGS).unwrap_err();
    assert!(matches!(err, AssemblyError::MetadataConflict(ref key) if key == "stage"));
}

#[test]
fn test_syntax_error_aborts_assembly() {
    let dir = TempDir::new().unwrap();
    let paths = write_files(
        dir.path(),
        &[("good.smithy", COMMON_V2), ("bad.smithy", "namespace x\nstructure {\n")],
    );
    let err = assemble(&paths, NO_TAGS).unwrap_err();
    assert!(matches!(err, AssemblyError::Parse(_)));
}

#[test]
fn test_tag_filter_keeps_dependency_closure() {
    let source = r#"$version: "2"
namespace ex
@tags(["t1"])
structure A { b: B }
structure B { c: C }
string C
@tags(["t2"])
structure D {}
"#;
    let dir = TempDir::new().unwrap();
    let paths = write_files(dir.path(), &[("model.smithy", source)]);
    let ast = assemble(&paths, &["t1"]).unwrap();
    assert_eq!(shape_ids(&ast), vec!["ex#A", "ex#B", "ex#C"]);
}

#[test]
fn test_json_and_idl_inputs_merge() {
    let dir = TempDir::new().unwrap();
    let json = r#"{"smithy": "2.0", "shapes": {"example.common#Isbn": {"type": "string"}}}"#;
    let paths = write_files(dir.path(), &[("common.json", json), ("library.smithy", LIBRARY_V2)]);
    let ast = assemble(&paths, NO_TAGS).unwrap();
    assert_eq!(shape_ids(&ast)[0], "example.common#Isbn");
    assert!(ast.get_shape("example.library#Library").is_some());
}
