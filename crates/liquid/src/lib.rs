//! A generic Liquid-style template evaluator.
//!
//! This crate supplies the tokenizing, parsing and evaluation layer the
//! storefront dialect builds on:
//!
//! - **`lexer`**: splits source into text/output/tag tokens, with
//!   whitespace control and `raw` handling
//! - **`expr`**: the `nom`-based expression sub-language (literals,
//!   variable paths, comparisons, filter chains)
//! - **`parser`**: block structure, built-in control tags, and the
//!   custom-tag dispatch seam
//! - **`engine`**: async tree-walking renderer over `serde_json::Value`
//! - **`filters`** / **`tags`**: the registries dialects extend
//!
//! The evaluator deliberately forgives: missing variables render empty,
//! unknown filters pass values through. A preview engine would rather
//! show a slightly wrong page than no page.

pub mod ast;
pub mod context;
pub mod engine;
pub mod error;
pub mod expr;
pub mod filters;
pub mod lexer;
pub mod parser;
pub mod tags;
pub mod value;

// --- Public API ---
pub use ast::{Node, Template};
pub use context::{MAX_INCLUDE_DEPTH, Registers, RenderContext};
pub use engine::{evaluate, evaluate_filtered, render, render_nodes};
pub use error::LiquidError;
pub use expr::{
    BinaryOperator, Expression, FilterCall, FilteredExpression, ForHead, PathSegment,
    parse_expression, parse_filtered, parse_tag_arguments,
};
pub use filters::{Filter, FilterArgs, FilterRegistry};
pub use parser::{EndTag, Parser, TokenStream};
pub use tags::{Tag, TagFactory, TagRegistry, TagRender};
