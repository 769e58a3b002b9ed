//! Helpers for `namespace#name[$member]` shape identifiers.
//!
//! Identifiers are plain strings throughout the model; these functions pick
//! them apart without allocating where they can.

use super::constants::{PRELUDE_NAMESPACE, PRELUDE_TYPES};

/// The namespace part of an absolute id, or `""` for a relative one.
pub fn namespace_of(id: &str) -> &str {
    match id.find('#') {
        Some(i) => &id[..i],
        None => "",
    }
}

/// Everything after the `#`, or the id itself when it is relative.
pub fn strip_namespace(id: &str) -> &str {
    match id.find('#') {
        Some(i) => &id[i + 1..],
        None => id,
    }
}

/// Split `ns#Shape$member` into (`ns#Shape`, `Some("member")`).
pub fn split_member(id: &str) -> (&str, Option<&str>) {
    match id.find('$') {
        Some(i) => (&id[..i], Some(&id[i + 1..])),
        None => (id, None),
    }
}

/// Join a namespace and a name into an absolute id.
pub fn absolute(namespace: &str, name: &str) -> String {
    format!("{namespace}#{name}")
}

/// Whether `name` (bare) is one of the built-in prelude shapes.
pub fn is_prelude_type(name: &str) -> bool {
    PRELUDE_TYPES.contains(&name)
}

/// Absolute id of a prelude shape or trait.
pub fn prelude_id(name: &str) -> String {
    absolute(PRELUDE_NAMESPACE, name)
}

/// Whether an absolute id lives in the prelude namespace.
pub fn in_prelude(id: &str) -> bool {
    namespace_of(id) == PRELUDE_NAMESPACE
}

/// Whether `text` is a bare identifier (`[A-Za-z_][A-Za-z0-9_]*`).
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
