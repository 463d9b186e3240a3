//! `{% sections 'group' %}` — renders a fixed sequence of named sections
//! for the known layout groups.
//!
//! Themes disagree on section file names, so each slot carries a short
//! candidate list (an announcement bar may live under either of two
//! names); the first candidate whose template exists renders, and a slot
//! with no match is skipped silently.

use super::{dialect_state, render_named_section};
use log::{debug, warn};
use vitrine_liquid::value::to_output_string;
use vitrine_liquid::{
    Expression, LiquidError, Parser, RenderContext, Tag, TagFactory, TagRender, TokenStream,
    evaluate, parse_expression,
};

/// The slots each known group renders, in order.
fn group_slots(group: &str) -> Option<&'static [&'static [&'static str]]> {
    match group {
        "header-group" | "header_group" => Some(&[
            &["announcement-bar", "announcement"],
            &["header", "site-header"],
        ]),
        "footer-group" | "footer_group" => Some(&[&["footer", "site-footer"]]),
        _ => None,
    }
}

pub struct SectionGroupTagFactory;

impl TagFactory for SectionGroupTagFactory {
    fn parse(
        &self,
        markup: &str,
        _parser: &Parser,
        _stream: &mut TokenStream,
    ) -> Result<Box<dyn Tag>, LiquidError> {
        Ok(Box::new(SectionGroupTag {
            group: parse_expression(markup)?,
        }))
    }
}

#[derive(Debug)]
struct SectionGroupTag {
    group: Expression,
}

impl Tag for SectionGroupTag {
    fn render<'a>(&'a self, ctx: &'a mut RenderContext, out: &'a mut String) -> TagRender<'a> {
        Box::pin(async move {
            let group = to_output_string(&evaluate(&self.group, ctx)?);
            let Some(slots) = group_slots(&group) else {
                warn!("[DIALECT] unknown section group '{group}', skipping");
                return Ok(());
            };

            let state = dialect_state(ctx)?;
            for candidates in slots {
                let mut resolved = None;
                for candidate in *candidates {
                    let path = state.store.manifest().section_template(candidate);
                    if state.store.exists(&path).await {
                        resolved = Some(*candidate);
                        break;
                    }
                }
                match resolved {
                    Some(name) => render_named_section(ctx, out, name, candidates).await?,
                    None => debug!("[DIALECT] group '{group}': no template for {candidates:?}"),
                }
            }
            Ok(())
        })
    }
}
