//! Common model sources for tests.

use std::fs;
use std::path::{Path, PathBuf};

// Single shapes
pub const SCENARIO: &str = "namespace foo\nstructure A { @required id: String }\n";

pub const SCENARIO_V2: &str = "$version: \"2\"\nnamespace foo\nstructure A { @required id: String }\n";

/// A version 1 model in canonical order, with v1 idioms (commas, `set`,
/// explicit input/output structures).
pub const BOOKS_V1: &str = r#"$version: "1"

namespace example.books

/// The book store.
service BookStore {
    version: "1.0",
    operations: [GetBook],
}

@readonly
@http(method: "GET", uri: "/books/{isbn}", code: 200)
operation GetBook {
    input: GetBookInput,
    output: GetBookOutput,
    errors: [BookNotFound],
}

@input
structure GetBookInput {
    @required
    @httpLabel
    isbn: Isbn,
}

@output
structure GetBookOutput {
    @httpPayload
    book: Book,
}

@pattern("^[0-9-]+$")
string Isbn

structure Book {
    @required
    title: String,

    authors: Authors,
}

list Authors {
    member: String,
}

@error("client")
@httpError(404)
structure BookNotFound {
    message: String,
}
"#;

/// A version 2 model in canonical order that exercises mixins, inline
/// input/output, enums, defaults and external references.
pub const LIBRARY_V2: &str = r#"$version: "2"

namespace example.library

use example.common#Isbn

service Library {
    version: "2024-01-01"
    operations: [Borrow]
}

operation Borrow {
    input := with [Audited] {
        @required
        isbn: Isbn

        days: Integer = 14
    }
    output := {
        due: Timestamp
    }
}

@mixin
structure Audited {
    requestId: String
}

enum Status {
    AVAILABLE = "available"
    ON_LOAN = "onLoan"
}

intEnum Shelf {
    TOP = 1
    BOTTOM = 2
}

map Holdings {
    key: Isbn
    value: Integer
}

union Contact {
    email: String
    phone: String
}
"#;

/// The shared namespace LIBRARY_V2 refers to.
pub const COMMON_V2: &str = r#"$version: "2"

namespace example.common

@pattern("^[0-9-]+$")
string Isbn
"#;

/// Write `files` (relative name, text) under `dir`, creating directories.
pub fn write_files(dir: &Path, files: &[(&str, &str)]) -> Vec<PathBuf> {
    files
        .iter()
        .map(|(name, text)| {
            let path = dir.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, text).unwrap();
            path
        })
        .collect()
}
