//! Mock commerce object graph.
//!
//! Templates read a shop/product/collection object model the real
//! platform would provide; this crate builds that model from editor
//! state instead. Everything here is a pure function: derived, read-only
//! projections, rebuilt on every render, never cached, never persisted.
//!
//! Calling any builder twice with equal inputs yields deep-equal (not
//! identity-equal) output.

mod builders;
mod entities;

pub use builders::{base_context, mock_collection, mock_product};
pub use entities::{MockCollection, MockImage, MockProduct, MockVariant, Shop};
