#[path = "helpers/mod.rs"]
mod helpers;

#[path = "pipeline/mod.rs"]
mod pipeline;
