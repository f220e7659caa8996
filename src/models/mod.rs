//! Domain models for Atlas.
//!
//! - [`ProjectRecord`]: one entry of the registry file (slug, paths, repo).
//! - [`Document`] / [`Value`]: generic parsed metadata.
//! - [`Project`]: a record with its cached metadata and provider data merged in.
//! - [`Provider`]: a plugin definition that contributes per-project data.

mod document;
mod project;
mod provider;

pub use document::*;
pub use project::*;
pub use provider::*;
