//! Platform abstraction traits for the Vitrine preview engine.
//!
//! The engine never touches a network or filesystem directly; template and
//! CSS text arrives through the [`TemplateSource`] trait defined here.
//!
//! ## Available Sources
//!
//! - [`InMemoryTemplateSource`]: pre-populated in-memory storage, works in
//!   any environment including WASM
//! - `FilesystemTemplateSource`: provided by the `vitrine-source` crate

mod source;

pub use source::{InMemoryTemplateSource, SharedTemplateText, SourceError, TemplateSource};
