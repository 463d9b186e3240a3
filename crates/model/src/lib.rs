//! Shared data model for the Vitrine preview engine.
//!
//! This crate holds the plain data types that cross crate boundaries:
//!
//! - **`section`**: render-time section/block values and the
//!   [`BlockCollection`] tagged union that hides the per-theme block shape
//! - **`manifest`**: the static per-theme description loaded once per theme
//! - **`editor`**: the inbound contracts produced by the (out-of-scope)
//!   content editor
//!
//! Everything here is data. Behavior lives in the engine crates.

pub mod editor;
pub mod manifest;
pub mod section;

pub use editor::{
    ContactInfo, EditableProduct, EditorContent, EditorItem, EditorSection, EditorSectionKind,
    HeroContent, LayoutFlags, PageKind, PageState, StyleSettings,
};
pub use manifest::{LayoutPaths, SectionDefinition, ThemeManifest};
pub use section::{BlockCollection, LiquidSection, SectionBlock};
