//! End-to-end tests: text → AST → text, files → assembly → generators.

mod tests_assembly;
mod tests_generate;
mod tests_roundtrip;
mod tests_versions;
