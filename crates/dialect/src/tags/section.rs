//! `{% section 'name' %}` — renders one named section template with its
//! `sections`-map entry (or an empty default) bound as the active section.

use super::render_named_section;
use vitrine_liquid::value::to_output_string;
use vitrine_liquid::{
    Expression, LiquidError, Parser, RenderContext, Tag, TagFactory, TagRender, TokenStream,
    evaluate, parse_expression,
};

pub struct SectionTagFactory;

impl TagFactory for SectionTagFactory {
    fn parse(
        &self,
        markup: &str,
        _parser: &Parser,
        _stream: &mut TokenStream,
    ) -> Result<Box<dyn Tag>, LiquidError> {
        Ok(Box::new(SectionTag {
            name: parse_expression(markup)?,
        }))
    }
}

#[derive(Debug)]
struct SectionTag {
    name: Expression,
}

impl Tag for SectionTag {
    fn render<'a>(&'a self, ctx: &'a mut RenderContext, out: &'a mut String) -> TagRender<'a> {
        Box::pin(async move {
            let name = to_output_string(&evaluate(&self.name, ctx)?);
            let candidates = [name.as_str()];
            render_named_section(ctx, out, &name, &candidates).await
        })
    }
}
