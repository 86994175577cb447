pub(crate) mod context;
pub(crate) mod document;
pub mod errors;
pub(crate) mod factory;
pub(crate) mod graph;
pub mod metrics;
pub mod orchestrator;
pub mod prompt;
pub mod recording;
pub(crate) mod sdl;
pub(crate) mod select;
pub(crate) mod visit;

#[cfg(test)]
mod tests;
