//! `{% content_for 'blocks' %}` / `{% content_for 'block', type: ..., id: ... %}`
//! — block-content injection.
//!
//! Resolves either the entire ordered child set of the active section (or
//! of the active block, one level down) or a single named block, loading
//! each child's template by its native type and binding it as the active
//! block. A child whose template cannot be found renders an inert
//! placeholder instead of aborting the parent.

use super::{dialect_state, placeholder};
use crate::state::{ActiveBlock, ActiveSection};
use log::warn;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use vitrine_liquid::value::to_output_string;
use vitrine_liquid::{
    Expression, LiquidError, MAX_INCLUDE_DEPTH, Parser, RenderContext, Tag, TagFactory, TagRender,
    TokenStream, evaluate, parse_tag_arguments, render_nodes,
};
use vitrine_model::{BlockCollection, SectionBlock};

pub struct ContentForTagFactory;

impl TagFactory for ContentForTagFactory {
    fn parse(
        &self,
        markup: &str,
        _parser: &Parser,
        _stream: &mut TokenStream,
    ) -> Result<Box<dyn Tag>, LiquidError> {
        let (args, kwargs) = parse_tag_arguments(markup)?;
        let target = args
            .into_iter()
            .next()
            .ok_or_else(|| LiquidError::Parse("content_for needs a target".to_string()))?;
        Ok(Box::new(ContentForTag { target, kwargs }))
    }
}

#[derive(Debug)]
struct ContentForTag {
    target: Expression,
    kwargs: Vec<(String, Expression)>,
}

impl ContentForTag {
    fn kwarg(&self, ctx: &RenderContext, name: &str) -> Result<Option<String>, LiquidError> {
        for (key, expr) in &self.kwargs {
            if key == name {
                return Ok(Some(to_output_string(&evaluate(expr, ctx)?)));
            }
        }
        Ok(None)
    }
}

impl Tag for ContentForTag {
    fn render<'a>(&'a self, ctx: &'a mut RenderContext, out: &'a mut String) -> TagRender<'a> {
        Box::pin(async move {
            let target = to_output_string(&evaluate(&self.target, ctx)?);
            match target.as_str() {
                "blocks" => {
                    let children = resolve_children(ctx);
                    // Declared order, missing ids already skipped by the
                    // collection accessor.
                    let ordered: Vec<SectionBlock> =
                        children.iter_ordered().cloned().collect();
                    for child in ordered {
                        render_block(ctx, out, Arc::new(child)).await?;
                    }
                    Ok(())
                }
                "block" => {
                    let Some(block_type) = self.kwarg(ctx, "type")? else {
                        warn!("[DIALECT] content_for 'block' without a type, skipping");
                        return Ok(());
                    };
                    let id = self.kwarg(ctx, "id")?;
                    let children = resolve_children(ctx);
                    let block = id
                        .as_deref()
                        .and_then(|id| children.get(id).cloned())
                        .unwrap_or_else(|| {
                            SectionBlock::new(
                                id.as_deref().unwrap_or(&block_type),
                                &block_type,
                                Map::new(),
                            )
                        });
                    render_block(ctx, out, Arc::new(block)).await
                }
                other => {
                    warn!("[DIALECT] unknown content_for target '{other}', skipping");
                    Ok(())
                }
            }
        })
    }
}

/// The child collection `content_for` iterates: the active block's nested
/// blocks when rendering inside a block template, the active section's
/// otherwise.
fn resolve_children(ctx: &RenderContext) -> BlockCollection {
    if let Some(active) = ctx.registers().get::<ActiveBlock>() {
        return active.0.blocks.clone().unwrap_or_default();
    }
    ctx.registers()
        .get::<ActiveSection>()
        .map(|active| active.0.blocks.clone())
        .unwrap_or_default()
}

/// Loads a block template by type and renders it with the block bound as
/// `block`, carrying a synthesized attribute string for the editor
/// surface.
async fn render_block(
    ctx: &mut RenderContext,
    out: &mut String,
    block: Arc<SectionBlock>,
) -> Result<(), LiquidError> {
    if ctx.depth() >= MAX_INCLUDE_DEPTH {
        return Err(LiquidError::Render(format!(
            "include depth exceeded rendering block '{}'",
            block.block_type
        )));
    }

    let state = dialect_state(ctx)?;
    let path = state.store.manifest().block_template(&block.block_type);
    let key = format!("block:{}", block.block_type);
    let template = match state.load_template(&key, &path, ctx.parser()).await {
        Ok(template) => template,
        Err(e) => {
            warn!("[DIALECT] block '{}' unavailable: {e}", block.block_type);
            placeholder(out, "block", &block.block_type);
            return Ok(());
        }
    };

    let mut value = block.to_value();
    if let Value::Object(map) = &mut value {
        map.insert(
            "attributes".to_string(),
            json!(format!(
                "data-block-id=\"{}\" data-block-type=\"{}\"",
                block.id, block.block_type
            )),
        );
    }

    let mut bindings = Map::new();
    bindings.insert("block".to_string(), value);
    let mut forked = ctx.fork_with(bindings);
    forked.registers_mut().insert(ActiveBlock(Arc::clone(&block)));
    render_nodes(&template.nodes, &mut forked, out).await
}
