//! `{% schema %}` / `{% doc %}` — metadata blocks, consumed and
//! discarded. Their bodies are JSON or prose, not Liquid, so the token
//! stream is skipped rather than parsed.

use vitrine_liquid::{
    LiquidError, Parser, RenderContext, Tag, TagFactory, TagRender, TokenStream,
};

pub struct MetadataTagFactory {
    closer: &'static str,
}

impl MetadataTagFactory {
    pub fn new(closer: &'static str) -> Self {
        Self { closer }
    }
}

impl TagFactory for MetadataTagFactory {
    fn parse(
        &self,
        _markup: &str,
        parser: &Parser,
        stream: &mut TokenStream,
    ) -> Result<Box<dyn Tag>, LiquidError> {
        parser.skip_until(stream, self.closer)?;
        Ok(Box::new(NoopTag))
    }
}

#[derive(Debug)]
struct NoopTag;

impl Tag for NoopTag {
    fn render<'a>(&'a self, _ctx: &'a mut RenderContext, _out: &'a mut String) -> TagRender<'a> {
        Box::pin(async { Ok(()) })
    }
}
