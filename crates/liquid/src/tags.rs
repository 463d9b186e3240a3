//! The custom-tag seam.
//!
//! The generic engine knows nothing about storefront constructs; a
//! dialect registers [`TagFactory`] objects by name, and each parsed
//! occurrence becomes a [`Tag`] trait object in the AST. Tag rendering is
//! asynchronous so a tag may fetch further templates mid-render.

use crate::context::RenderContext;
use crate::error::LiquidError;
use crate::parser::{Parser, TokenStream};
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// The boxed future a tag render returns.
pub type TagRender<'a> = Pin<Box<dyn Future<Output = Result<(), LiquidError>> + Send + 'a>>;

/// A parsed occurrence of a custom tag, ready to render.
pub trait Tag: Send + Sync + Debug {
    fn render<'a>(&'a self, ctx: &'a mut RenderContext, out: &'a mut String) -> TagRender<'a>;
}

/// Parses occurrences of one registered tag name.
///
/// Block-style tags consume their body from the token stream using
/// [`Parser::parse_until`].
pub trait TagFactory: Send + Sync {
    fn parse(
        &self,
        markup: &str,
        parser: &Parser,
        stream: &mut TokenStream,
    ) -> Result<Box<dyn Tag>, LiquidError>;
}

/// Registry of custom tag factories, keyed by tag name.
#[derive(Default, Clone)]
pub struct TagRegistry {
    factories: HashMap<String, Arc<dyn TagFactory>>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &str, factory: Arc<dyn TagFactory>) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn TagFactory>> {
        self.factories.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}

impl Debug for TagRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagRegistry")
            .field("tags", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
