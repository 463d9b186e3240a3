//! Storefront dialect extensions for the Vitrine template engine.
//!
//! The generic evaluator in `vitrine-liquid` knows nothing about
//! storefronts. This crate layers on the platform-specific surface the
//! bundled themes actually use:
//!
//! - **Tags**: `section`, `sections`, `render`, `content_for`, `schema`,
//!   `doc`, `style`, `stylesheet`, `javascript`, `form`
//! - **Filters**: `money`, `handleize`/`handle`, `image_url`, `asset_url`
//! - **Preprocessing**: theme-asset `<script>` stripping (the preview has
//!   no working static-asset server)
//!
//! [`ThemeRenderer`] is the assembled engine: a parser with the dialect
//! registered, bound to one theme's template store and parsed cache.

mod filters;
mod preprocess;
mod renderer;
mod state;
mod tags;

pub use preprocess::preprocess;
pub use renderer::{ThemeRenderer, build_parser};
pub use state::{ActiveBlock, ActiveSection, DialectState, SectionsData};
