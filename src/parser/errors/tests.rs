//! Integration tests for the errors module

use super::*;
use text_size::{TextRange, TextSize};

#[test]
fn test_error_module_exports() {
    let _code = ErrorCode::E0201;
    let _severity = Severity::Error;

    let _err = SyntaxError::new(
        "test error",
        TextRange::empty(TextSize::new(0)),
        ErrorCode::E0201,
    );
}

#[test]
fn test_error_code_exhaustiveness() {
    let codes = [
        ErrorCode::E0101,
        ErrorCode::E0102,
        ErrorCode::E0103,
        ErrorCode::E0104,
        ErrorCode::E0201,
        ErrorCode::E0202,
        ErrorCode::E0301,
        ErrorCode::E0302,
        ErrorCode::E0303,
        ErrorCode::E0304,
        ErrorCode::E0305,
        ErrorCode::E0306,
        ErrorCode::E0307,
        ErrorCode::E0308,
        ErrorCode::E0401,
        ErrorCode::E0501,
        ErrorCode::E0502,
        ErrorCode::E0503,
        ErrorCode::E0601,
        ErrorCode::E0602,
    ];

    for code in codes {
        assert!(code.as_str().starts_with('E'));
        assert_eq!(code.as_str().len(), 5);
        assert!(!code.category_description().is_empty());
        assert!(!code.default_message().is_empty());
        assert_eq!(code.to_string(), code.as_str());
    }
}

#[test]
fn test_recursive_reference_message() {
    assert_eq!(
        ErrorCode::E0303.default_message(),
        "directly recursive type references not allowed"
    );
    assert_eq!(ErrorCode::E0601.category_description(), "control error");
}
