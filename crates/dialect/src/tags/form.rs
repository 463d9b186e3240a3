//! `{% form 'type' %}` — forms render as a plain container. The preview
//! never submits anything over the network.

use vitrine_liquid::value::to_output_string;
use vitrine_liquid::{
    Expression, LiquidError, Node, Parser, RenderContext, Tag, TagFactory, TagRender, TokenStream,
    evaluate, parse_tag_arguments, render_nodes,
};

pub struct FormTagFactory;

impl TagFactory for FormTagFactory {
    fn parse(
        &self,
        markup: &str,
        parser: &Parser,
        stream: &mut TokenStream,
    ) -> Result<Box<dyn Tag>, LiquidError> {
        let (args, _) = parse_tag_arguments(markup)?;
        let (body, _) = parser.parse_until(stream, &["endform"])?;
        Ok(Box::new(FormTag {
            form_type: args.into_iter().next(),
            body,
        }))
    }
}

#[derive(Debug)]
struct FormTag {
    form_type: Option<Expression>,
    body: Vec<Node>,
}

impl Tag for FormTag {
    fn render<'a>(&'a self, ctx: &'a mut RenderContext, out: &'a mut String) -> TagRender<'a> {
        Box::pin(async move {
            let form_type = match &self.form_type {
                Some(expr) => to_output_string(&evaluate(expr, ctx)?),
                None => String::new(),
            };
            out.push_str("<div class=\"preview-form\"");
            if !form_type.is_empty() {
                out.push_str(" data-form-type=\"");
                out.push_str(&form_type);
                out.push('"');
            }
            out.push('>');
            render_nodes(&self.body, ctx, out).await?;
            out.push_str("</div>");
            Ok(())
        })
    }
}
