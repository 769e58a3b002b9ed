//! Shared fixtures and assertions for the integration tests.

pub mod model_assertions;
pub mod source_fixtures;
