//! Folding one AST into another.

use tracing::warn;

use super::error::AssemblyError;
use crate::model::Ast;

/// Major version of a `smithy` marker, if it is one we accept.
pub fn major_version(smithy: &str) -> Option<u8> {
    let (major, rest) = smithy.split_once('.').unwrap_or((smithy, ""));
    if !rest.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    match major {
        "1" => Some(1),
        "2" => Some(2),
        _ => None,
    }
}

impl Ast {
    /// Merge `src` into `self`.
    ///
    /// Versions: equal majors merge as is. Merging version 2 into version 1
    /// upgrades the result (silently while `self` is still empty); merging
    /// version 1 into version 2 keeps 2. Metadata keys must agree on their
    /// values. Shape ids must be disjoint.
    pub fn merge(&mut self, src: Ast) -> Result<(), AssemblyError> {
        let Some(src_major) = major_version(&src.smithy) else {
            return Err(AssemblyError::UnsupportedVersion(src.smithy));
        };
        let Some(dst_major) = major_version(&self.smithy) else {
            return Err(AssemblyError::UnsupportedVersion(self.smithy.clone()));
        };
        if self.is_empty() {
            self.smithy = src.smithy.clone();
        } else if dst_major < src_major {
            warn!(from = %self.smithy, to = %src.smithy, "upgrading assembly version");
            self.smithy = src.smithy.clone();
        } else if dst_major > src_major {
            warn!(version = %self.smithy, merged = %src.smithy, "merging older model version");
        }

        for (key, value) in &src.metadata {
            if let Some(existing) = self.metadata.get(key) {
                if existing != value {
                    return Err(AssemblyError::MetadataConflict(key.clone()));
                }
            }
        }
        for id in src.shapes.keys() {
            if self.shapes.contains_key(id) {
                return Err(AssemblyError::DuplicateShape(id.clone()));
            }
        }

        for (key, value) in src.metadata {
            self.metadata.insert(key, value);
        }
        for (id, shape) in src.shapes {
            self.shapes.put(id, shape);
        }
        Ok(())
    }
}
