//! The assembled dialect engine: a parser with the storefront tags and
//! filters registered, bound to one theme's stores.

use crate::state::{DialectState, SectionsData};
use crate::{filters, tags};
use log::warn;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use vitrine_liquid::{LiquidError, Parser, RenderContext, render_nodes};
use vitrine_model::{LiquidSection, ThemeManifest};
use vitrine_store::{ParsedTemplateCache, StoreError, TemplateStore};

/// Builds a parser with the whole storefront dialect registered.
pub fn build_parser() -> Parser {
    let mut parser = Parser::new();
    tags::register_all(&mut parser);
    filters::register(&mut parser);
    parser
}

/// One theme's dialect-extended engine: parser + raw-text store + parsed
/// cache. Cheap to clone handles around; all state is shared.
#[derive(Debug, Clone)]
pub struct ThemeRenderer {
    parser: Arc<Parser>,
    state: Arc<DialectState>,
}

impl ThemeRenderer {
    pub fn new(store: Arc<TemplateStore>, parsed: Arc<ParsedTemplateCache>) -> Self {
        Self {
            parser: Arc::new(build_parser()),
            state: Arc::new(DialectState::new(store, parsed)),
        }
    }

    pub fn manifest(&self) -> &Arc<ThemeManifest> {
        self.state.store.manifest()
    }

    pub fn store(&self) -> &Arc<TemplateStore> {
        &self.state.store
    }

    /// The combined theme CSS (global assets plus per-section files).
    pub async fn combined_css(&self) -> Result<Arc<str>, StoreError> {
        self.state.store.load_all_css().await
    }

    fn context(&self, globals: Map<String, Value>, sections: SectionsData) -> RenderContext {
        let mut ctx = RenderContext::new(Arc::clone(&self.parser), globals);
        ctx.registers_mut().insert_arc(Arc::clone(&self.state));
        ctx.registers_mut().insert(sections);
        ctx
    }

    /// Renders one section against the base context merged with
    /// section-specific extras (`product`, `collection`, ...).
    ///
    /// A missing or unparseable section template degrades to an inline
    /// placeholder comment; an evaluation error propagates so the caller
    /// can surface a page-level error state.
    pub async fn render_section(
        &self,
        section: &LiquidSection,
        globals: &Map<String, Value>,
        extra: Map<String, Value>,
    ) -> Result<String, LiquidError> {
        let mut merged = globals.clone();
        merged.extend(extra);
        let mut ctx = self.context(merged, SectionsData::default());
        let mut out = String::new();

        let path = self.manifest().section_template(&section.section_type);
        let key = format!("section:{}", section.section_type);
        match self.state.load_template(&key, &path, &self.parser).await {
            Ok(template) => {
                tags::render_section_template(
                    &mut ctx,
                    &mut out,
                    &template,
                    Arc::new(section.clone()),
                )
                .await?;
            }
            Err(e) => {
                warn!(
                    "[DIALECT] section '{}' unavailable: {e}",
                    section.section_type
                );
                tags::placeholder(&mut out, "section", &section.section_type);
            }
        }
        Ok(out)
    }

    /// Renders the theme's layout shell around already-rendered page
    /// content. A broken layout degrades to the bare content rather than
    /// taking the preview down.
    pub async fn render_layout(
        &self,
        content_for_layout: &str,
        globals: &Map<String, Value>,
        sections: SectionsData,
    ) -> Result<String, LiquidError> {
        let mut merged = globals.clone();
        merged.insert(
            "content_for_layout".to_string(),
            json!(content_for_layout),
        );
        let mut ctx = self.context(merged, sections);

        let path = self.manifest().layout.theme.clone();
        let template = match self.state.load_template("layout:theme", &path, &self.parser).await {
            Ok(template) => template,
            Err(e) => {
                warn!("[DIALECT] layout unavailable, emitting bare content: {e}");
                return Ok(content_for_layout.to_string());
            }
        };

        let mut out = String::new();
        render_nodes(&template.nodes, &mut ctx, &mut out).await?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;
    use std::collections::BTreeMap;
    use vitrine_model::{BlockCollection, SectionBlock};
    use vitrine_traits::InMemoryTemplateSource;

    fn manifest() -> Arc<ThemeManifest> {
        Arc::new(
            serde_json::from_str(
                r#"{
                    "id": "testtheme",
                    "name": "Test Theme",
                    "version": "0.0.1",
                    "sections": [],
                    "layout": {
                        "theme": "layout/theme.liquid",
                        "header": "sections/header.liquid",
                        "footer": "sections/footer.liquid"
                    }
                }"#,
            )
            .unwrap(),
        )
    }

    fn renderer_with(assets: &[(&str, &str)]) -> ThemeRenderer {
        let source = InMemoryTemplateSource::new();
        for (path, text) in assets {
            source.add(*path, *text);
        }
        let store = Arc::new(TemplateStore::new(Arc::new(source), manifest()));
        ThemeRenderer::new(store, Arc::new(ParsedTemplateCache::new()))
    }

    fn section(section_type: &str, settings: Value, blocks: BlockCollection) -> LiquidSection {
        let Value::Object(settings) = settings else {
            panic!("settings must be an object")
        };
        LiquidSection {
            id: format!("{section_type}-1"),
            section_type: section_type.to_string(),
            settings,
            blocks,
        }
    }

    fn base() -> Map<String, Value> {
        let Value::Object(map) = json!({
            "shop": {"name": "Acme", "currency": "USD"}
        }) else {
            unreachable!()
        };
        map
    }

    #[tokio::test]
    async fn test_render_section_binds_settings() {
        let renderer = renderer_with(&[(
            "sections/hero.liquid",
            "<h1>{{ section.settings.heading }}</h1>",
        )]);
        let hero = section("hero", json!({"heading": "Welcome"}), BlockCollection::default());
        let html = renderer
            .render_section(&hero, &base(), Map::new())
            .await
            .unwrap();
        assert_eq!(html, "<h1>Welcome</h1>");
    }

    #[tokio::test]
    async fn test_missing_section_degrades_to_placeholder() {
        let renderer = renderer_with(&[]);
        let ghost = section("ghost", json!({}), BlockCollection::default());
        let html = renderer
            .render_section(&ghost, &base(), Map::new())
            .await
            .unwrap();
        assert_eq!(html, "<!-- section 'ghost' unavailable -->");
    }

    #[tokio::test]
    async fn test_schema_is_consumed_and_money_formats() {
        let renderer = renderer_with(&[(
            "sections/price.liquid",
            concat!(
                "{% schema %}{ \"name\": \"Price\", \"settings\": [] }{% endschema %}",
                "<span>{{ section.settings.amount | money }}</span>",
            ),
        )]);
        let s = section("price", json!({"amount": 2999}), BlockCollection::default());
        let html = renderer.render_section(&s, &base(), Map::new()).await.unwrap();
        assert_eq!(html, "<span>$29.99</span>");
    }

    #[tokio::test]
    async fn test_render_snippet_with_isolated_bindings() {
        let renderer = renderer_with(&[
            (
                "sections/card.liquid",
                "{% assign local = 'outer' %}{% render 'label', text: section.settings.title %}|{{ local }}",
            ),
            ("snippets/label.liquid", "<b>{{ text }}</b>{% assign local = 'inner' %}"),
        ]);
        let s = section("card", json!({"title": "Hi"}), BlockCollection::default());
        let html = renderer.render_section(&s, &base(), Map::new()).await.unwrap();
        // The snippet sees its bindings; its assigns do not leak back.
        assert_eq!(html, "<b>Hi</b>|outer");
    }

    #[tokio::test]
    async fn test_missing_snippet_degrades_inline() {
        let renderer = renderer_with(&[(
            "sections/card.liquid",
            "a{% render 'nope' %}b",
        )]);
        let s = section("card", json!({}), BlockCollection::default());
        let html = renderer.render_section(&s, &base(), Map::new()).await.unwrap();
        assert_eq!(html, "a<!-- snippet 'nope' unavailable -->b");
    }

    #[tokio::test]
    async fn test_content_for_blocks_renders_in_declared_order() {
        let renderer = renderer_with(&[
            ("sections/stack.liquid", "{% content_for 'blocks' %}"),
            ("blocks/text.liquid", "<p {{ block.attributes }}>{{ block.settings.body }}</p>"),
        ]);

        let mut blocks = BTreeMap::new();
        for (id, body) in [("a", "first"), ("b", "second")] {
            let mut settings = Map::new();
            settings.insert("body".into(), json!(body));
            blocks.insert(id.to_string(), SectionBlock::new(id, "text", settings));
        }
        let coll = BlockCollection::Keyed {
            blocks,
            block_order: vec!["b".into(), "a".into(), "ghost".into()],
        };
        let s = section("stack", json!({}), coll);
        let html = renderer.render_section(&s, &base(), Map::new()).await.unwrap();

        let b = html.find("second").unwrap();
        let a = html.find("first").unwrap();
        assert!(b < a, "order list drives rendering: {html}");
        assert!(html.contains("data-block-id=\"b\""));
        assert!(html.contains("data-block-type=\"text\""));
    }

    #[tokio::test]
    async fn test_content_for_missing_block_template_is_inert() {
        let renderer = renderer_with(&[
            ("sections/stack.liquid", "{% content_for 'blocks' %}"),
            ("blocks/text.liquid", "<p>{{ block.settings.body }}</p>"),
        ]);
        let mut settings = Map::new();
        settings.insert("body".into(), json!("ok"));
        let coll = BlockCollection::List(vec![
            SectionBlock::new("a", "text", settings),
            SectionBlock::new("x", "video", Map::new()),
        ]);
        let s = section("stack", json!({}), coll);
        let html = renderer.render_section(&s, &base(), Map::new()).await.unwrap();
        assert!(html.contains("<p>ok</p>"));
        assert!(html.contains("<!-- block 'video' unavailable -->"));
    }

    #[tokio::test]
    async fn test_nested_block_auto_forwarding() {
        // A block template renders a snippet that never binds `block`
        // itself; the calling block is forwarded.
        let renderer = renderer_with(&[
            ("sections/stack.liquid", "{% content_for 'blocks' %}"),
            ("blocks/group.liquid", "{% render 'chrome' %}"),
            ("snippets/chrome.liquid", "[{{ block.settings.tone }}]"),
        ]);
        let mut settings = Map::new();
        settings.insert("tone".into(), json!("dark"));
        let coll = BlockCollection::List(vec![SectionBlock::new("g", "group", settings)]);
        let s = section("stack", json!({}), coll);
        let html = renderer.render_section(&s, &base(), Map::new()).await.unwrap();
        assert_eq!(html, "[dark]");
    }

    #[tokio::test]
    async fn test_style_block_wraps_evaluated_css() {
        let renderer = renderer_with(&[(
            "sections/themed.liquid",
            "{% style %}.hero { color: {{ section.settings.color }}; }{% endstyle %}",
        )]);
        let s = section("themed", json!({"color": "#fff"}), BlockCollection::default());
        let html = renderer.render_section(&s, &base(), Map::new()).await.unwrap();
        assert_eq!(html, "<style>.hero { color: #fff; }</style>");
    }

    #[tokio::test]
    async fn test_form_renders_as_container() {
        let renderer = renderer_with(&[(
            "sections/contact.liquid",
            "{% form 'contact' %}<input name=\"email\">{% endform %}",
        )]);
        let s = section("contact", json!({}), BlockCollection::default());
        let html = renderer.render_section(&s, &base(), Map::new()).await.unwrap();
        assert_eq!(
            html,
            "<div class=\"preview-form\" data-form-type=\"contact\"><input name=\"email\"></div>"
        );
    }

    #[tokio::test]
    async fn test_layout_wraps_content_and_sections() {
        let renderer = renderer_with(&[
            (
                "layout/theme.liquid",
                "<html><body>{% sections 'header-group' %}<main>{{ content_for_layout }}</main>{% sections 'footer-group' %}</body></html>",
            ),
            ("sections/header.liquid", "<header>{{ section.settings.title | default: 'Shop' }}</header>"),
            ("sections/footer.liquid", "<footer></footer>"),
        ]);

        let mut sections = SectionsData::default();
        let header = section("header", json!({"title": "Acme"}), BlockCollection::default());
        sections.0.insert("header".to_string(), Arc::new(header));

        let html = renderer
            .render_layout("<h1>page</h1>", &base(), sections)
            .await
            .unwrap();
        assert!(html.contains("<header>Acme</header>"));
        assert!(html.contains("<main><h1>page</h1></main>"));
        assert!(html.contains("<footer></footer>"));
        // No announcement template exists; the slot is skipped silently.
        assert!(!html.contains("announcement"));
    }

    #[tokio::test]
    async fn test_missing_layout_emits_bare_content() {
        let renderer = renderer_with(&[]);
        let html = renderer
            .render_layout("<h1>page</h1>", &base(), SectionsData::default())
            .await
            .unwrap();
        assert_eq!(html, "<h1>page</h1>");
    }

    #[tokio::test]
    async fn test_asset_scripts_are_stripped_from_templates() {
        let renderer = renderer_with(&[(
            "sections/hero.liquid",
            "<div>hi</div><script src=\"{{ 'hero.js' | asset_url }}\" defer></script>",
        )]);
        let s = section("hero", json!({}), BlockCollection::default());
        let html = renderer.render_section(&s, &base(), Map::new()).await.unwrap();
        assert_eq!(html, "<div>hi</div>");
    }
}
