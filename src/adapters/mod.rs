// Adapters layer: concrete implementations of the domain ports against GitHub and the runner.

pub mod download;
pub mod github;
pub mod runner;
pub mod tool_cache;
pub mod wrapper;
