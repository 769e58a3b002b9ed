//! Tag filtering.

use tracing::debug;

use crate::base::constants::traits::TAGS;
use crate::model::Ast;
use crate::model::deps::dependency_closure;

impl Ast {
    /// Keep only the shapes tagged with any of `tags`, plus everything they
    /// depend on. Surviving shapes keep their original order.
    pub fn filter<S: AsRef<str>>(&mut self, tags: &[S]) {
        let roots: Vec<&str> = self
            .shapes
            .iter()
            .filter(|(_, shape)| {
                shape
                    .traits
                    .get_string_array(TAGS)
                    .iter()
                    .any(|t| tags.iter().any(|want| want.as_ref() == *t))
            })
            .map(|(id, _)| id.as_str())
            .collect();
        let keep = dependency_closure(self, roots);
        debug!(kept = keep.len(), total = self.shapes.len(), "filtered by tags");
        self.shapes = std::mem::take(&mut self.shapes)
            .into_iter()
            .filter(|(id, _)| keep.contains(id))
            .collect();
    }
}
