//! Atlas: a local registry of projects and the paths they own.
//!
//! The registry is a hand-maintained text file listing each project's slug,
//! primary directory, repository and additional directories. Per-project
//! metadata lives in a cache directory as small documents in the same
//! restricted YAML-like grammar. Nothing is held in memory between calls:
//! every [`registry::Registry`] operation reloads from disk.

pub mod config;
pub mod error;
pub mod models;
pub mod parser;
pub mod providers;
pub mod registry;
pub mod resolver;
pub mod tools;

pub use config::AtlasConfig;
pub use error::{AtlasError, Result};
pub use registry::Registry;
