//! Generators writing to an output directory, and reading their output back.

use smithy::generate::{GenerateError, GeneratorConfig, generator_for};
use smithy::assemble;
use tempfile::TempDir;

use crate::helpers::model_assertions::assert_same_model;
use crate::helpers::source_fixtures::{COMMON_V2, LIBRARY_V2, write_files};

const NO_TAGS: &[&str] = &[];

fn out_config(dir: &TempDir) -> GeneratorConfig {
    GeneratorConfig {
        out_dir: Some(dir.path().join("out")),
        ..Default::default()
    }
}

#[test]
fn test_idl_output_reassembles_to_same_model() {
    let src = TempDir::new().unwrap();
    let paths = write_files(src.path(), &[("common.smithy", COMMON_V2), ("library.smithy", LIBRARY_V2)]);
    let ast = assemble(&paths, NO_TAGS).unwrap();

    let out = TempDir::new().unwrap();
    let config = out_config(&out);
    generator_for("idl").unwrap().generate(&ast, &config).unwrap();

    let out_dir = out.path().join("out");
    assert!(out_dir.join("example-common.smithy").is_file());
    assert!(out_dir.join("example-library.smithy").is_file());
    let again = assemble(&[out_dir], NO_TAGS).unwrap();
    assert_same_model(&again, &ast);
}

#[test]
fn test_ast_output_reassembles_to_same_model() {
    let src = TempDir::new().unwrap();
    let paths = write_files(src.path(), &[("library.smithy", LIBRARY_V2)]);
    let ast = assemble(&paths, NO_TAGS).unwrap();

    let out = TempDir::new().unwrap();
    let config = out_config(&out);
    generator_for("ast").unwrap().generate(&ast, &config).unwrap();

    let json = out.path().join("out/model.json");
    let again = assemble(&[json], NO_TAGS).unwrap();
    assert_same_model(&again, &ast);
}

#[test]
fn test_second_run_needs_force() {
    let src = TempDir::new().unwrap();
    let paths = write_files(src.path(), &[("common.smithy", COMMON_V2)]);
    let ast = assemble(&paths, NO_TAGS).unwrap();

    let out = TempDir::new().unwrap();
    let mut config = out_config(&out);
    let generator = generator_for("idl").unwrap();
    generator.generate(&ast, &config).unwrap();
    let err = generator.generate(&ast, &config).unwrap_err();
    assert!(matches!(err, GenerateError::AlreadyExists(_)));

    config.force = true;
    generator.generate(&ast, &config).unwrap();
}

#[test]
fn test_sadl_rejects_operations_without_http() {
    let src = TempDir::new().unwrap();
    let paths = write_files(src.path(), &[("library.smithy", LIBRARY_V2)]);
    let ast = assemble(&paths, NO_TAGS).unwrap();
    let out = TempDir::new().unwrap();
    let err = generator_for("sadl").unwrap().generate(&ast, &out_config(&out)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Operation without @http trait not valid for SADL: example.library#Borrow"
    );
    assert!(!out.path().join("out").exists());
}
