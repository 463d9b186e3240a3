//! The storefront tag set, one handler module per tag family.

mod content_for;
mod form;
mod metadata;
mod render_tag;
mod section;
mod sections;
mod style;

use crate::state::{ActiveSection, DialectState, SectionsData};
use log::warn;
use serde_json::Map;
use std::sync::Arc;
use vitrine_liquid::{
    LiquidError, MAX_INCLUDE_DEPTH, Parser, RenderContext, Template, render_nodes,
};
use vitrine_model::LiquidSection;

/// Registers every dialect tag on a parser.
pub fn register_all(parser: &mut Parser) {
    parser.register_tag("section", Arc::new(section::SectionTagFactory));
    parser.register_tag("sections", Arc::new(sections::SectionGroupTagFactory));
    parser.register_tag("render", Arc::new(render_tag::RenderTagFactory));
    parser.register_tag("content_for", Arc::new(content_for::ContentForTagFactory));
    parser.register_tag("schema", Arc::new(metadata::MetadataTagFactory::new("endschema")));
    parser.register_tag("doc", Arc::new(metadata::MetadataTagFactory::new("enddoc")));
    parser.register_tag("style", Arc::new(style::WrappedBlockFactory::style("endstyle")));
    parser.register_tag(
        "stylesheet",
        Arc::new(style::WrappedBlockFactory::style("endstylesheet")),
    );
    parser.register_tag(
        "javascript",
        Arc::new(style::WrappedBlockFactory::script("endjavascript")),
    );
    parser.register_tag("form", Arc::new(form::FormTagFactory));
}

/// Writes the inert placeholder a missing template degrades to.
pub(crate) fn placeholder(out: &mut String, kind: &str, name: &str) {
    out.push_str("<!-- ");
    out.push_str(kind);
    out.push_str(" '");
    out.push_str(name);
    out.push_str("' unavailable -->");
}

/// Reads the dialect state or fails the render; a context without it was
/// never wired through a [`crate::ThemeRenderer`].
pub(crate) fn dialect_state(ctx: &RenderContext) -> Result<Arc<DialectState>, LiquidError> {
    ctx.registers()
        .get::<DialectState>()
        .ok_or_else(|| LiquidError::Render("dialect state missing from context".to_string()))
}

/// Loads, binds and renders one named section template. `data_candidates`
/// are the `sections`-map names whose editor data may feed this section;
/// the first match wins and a miss renders the empty default.
pub(crate) async fn render_named_section(
    ctx: &mut RenderContext,
    out: &mut String,
    template_name: &str,
    data_candidates: &[&str],
) -> Result<(), LiquidError> {
    let state = dialect_state(ctx)?;
    let path = state.store.manifest().section_template(template_name);
    let key = format!("section:{template_name}");

    let template = match state.load_template(&key, &path, ctx.parser()).await {
        Ok(template) => template,
        Err(e) => {
            // A single broken section degrades; the rest of the page renders.
            warn!("[DIALECT] section '{template_name}' unavailable: {e}");
            placeholder(out, "section", template_name);
            return Ok(());
        }
    };

    let entry = ctx
        .registers()
        .get::<SectionsData>()
        .and_then(|sections| sections.first_match(data_candidates))
        .unwrap_or_else(|| Arc::new(LiquidSection::empty(template_name)));

    render_section_template(ctx, out, &template, entry).await
}

/// Renders a section template with the given section bound as `section`,
/// in a forked context so bindings cannot leak back out.
pub(crate) async fn render_section_template(
    ctx: &mut RenderContext,
    out: &mut String,
    template: &Template,
    section: Arc<LiquidSection>,
) -> Result<(), LiquidError> {
    if ctx.depth() >= MAX_INCLUDE_DEPTH {
        return Err(LiquidError::Render(format!(
            "include depth exceeded rendering section '{}'",
            section.section_type
        )));
    }

    let mut bindings = Map::new();
    bindings.insert("section".to_string(), section.to_value());
    let mut forked = ctx.fork_with(bindings);
    forked
        .registers_mut()
        .insert(ActiveSection(Arc::clone(&section)));
    render_nodes(&template.nodes, &mut forked, out).await
}
