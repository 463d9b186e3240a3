//! `{% style %}` / `{% stylesheet %}` / `{% javascript %}` — evaluated
//! bodies wrapped in literal `<style>`/`<script>` output.
//!
//! The inner Liquid still runs (themes interpolate settings into CSS
//! custom properties here); only the wrapping element is synthesized.

use vitrine_liquid::{
    LiquidError, Node, Parser, RenderContext, Tag, TagFactory, TagRender, TokenStream,
    render_nodes,
};

#[derive(Debug, Clone, Copy)]
enum WrapKind {
    Style,
    Script,
}

pub struct WrappedBlockFactory {
    closer: &'static str,
    kind: WrapKind,
}

impl WrappedBlockFactory {
    pub fn style(closer: &'static str) -> Self {
        Self {
            closer,
            kind: WrapKind::Style,
        }
    }

    pub fn script(closer: &'static str) -> Self {
        Self {
            closer,
            kind: WrapKind::Script,
        }
    }
}

impl TagFactory for WrappedBlockFactory {
    fn parse(
        &self,
        _markup: &str,
        parser: &Parser,
        stream: &mut TokenStream,
    ) -> Result<Box<dyn Tag>, LiquidError> {
        let (body, _) = parser.parse_until(stream, &[self.closer])?;
        Ok(Box::new(WrappedBlockTag {
            body,
            kind: self.kind,
        }))
    }
}

#[derive(Debug)]
struct WrappedBlockTag {
    body: Vec<Node>,
    kind: WrapKind,
}

impl Tag for WrappedBlockTag {
    fn render<'a>(&'a self, ctx: &'a mut RenderContext, out: &'a mut String) -> TagRender<'a> {
        Box::pin(async move {
            let mut inner = String::new();
            render_nodes(&self.body, ctx, &mut inner).await?;
            let (open, close) = match self.kind {
                WrapKind::Style => ("<style>", "</style>"),
                WrapKind::Script => ("<script>", "</script>"),
            };
            out.push_str(open);
            out.push_str(&inner);
            out.push_str(close);
            Ok(())
        })
    }
}
