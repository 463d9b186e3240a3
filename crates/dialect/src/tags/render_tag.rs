//! `{% render 'name', key: expr, ... %}` — snippet inclusion.
//!
//! Named arguments are evaluated against the calling context and become
//! one new scope over it; assignments inside the snippet do not leak
//! back. When the caller has a `block` in scope and the callee does not
//! bind one explicitly, the block is forwarded, so nested block templates
//! can read ancestor block settings.

use super::{dialect_state, placeholder};
use log::warn;
use serde_json::Map;
use vitrine_liquid::value::to_output_string;
use vitrine_liquid::{
    Expression, LiquidError, MAX_INCLUDE_DEPTH, Parser, RenderContext, Tag, TagFactory, TagRender,
    TokenStream, evaluate, parse_tag_arguments, render_nodes,
};

pub struct RenderTagFactory;

impl TagFactory for RenderTagFactory {
    fn parse(
        &self,
        markup: &str,
        _parser: &Parser,
        _stream: &mut TokenStream,
    ) -> Result<Box<dyn Tag>, LiquidError> {
        let (args, kwargs) = parse_tag_arguments(markup)?;
        let name = args
            .into_iter()
            .next()
            .ok_or_else(|| LiquidError::Parse("render needs a snippet name".to_string()))?;
        Ok(Box::new(RenderTag { name, kwargs }))
    }
}

#[derive(Debug)]
struct RenderTag {
    name: Expression,
    kwargs: Vec<(String, Expression)>,
}

impl Tag for RenderTag {
    fn render<'a>(&'a self, ctx: &'a mut RenderContext, out: &'a mut String) -> TagRender<'a> {
        Box::pin(async move {
            let name = to_output_string(&evaluate(&self.name, ctx)?);
            if ctx.depth() >= MAX_INCLUDE_DEPTH {
                return Err(LiquidError::Render(format!(
                    "include depth exceeded rendering snippet '{name}'"
                )));
            }

            // Arguments evaluate against the *calling* context.
            let mut bindings = Map::new();
            for (key, expr) in &self.kwargs {
                bindings.insert(key.clone(), evaluate(expr, ctx)?);
            }
            if !bindings.contains_key("block")
                && let Some(block) = ctx.lookup("block")
            {
                bindings.insert("block".to_string(), block.clone());
            }

            let state = dialect_state(ctx)?;
            let path = state.store.manifest().snippet_template(&name);
            let key = format!("snippet:{name}");
            let template = match state.load_template(&key, &path, ctx.parser()).await {
                Ok(template) => template,
                Err(e) => {
                    warn!("[DIALECT] snippet '{name}' unavailable: {e}");
                    placeholder(out, "snippet", &name);
                    return Ok(());
                }
            };

            let mut forked = ctx.fork_with(bindings);
            render_nodes(&template.nodes, &mut forked, out).await
        })
    }
}
