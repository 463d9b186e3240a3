//! Full-page composition: resolve the page variant, map editor content
//! through the active theme's mapper, render each section, wrap with the
//! layout.
//!
//! Sections are awaited in a fixed order (hero, ordered content sections,
//! products, page extras) so output is reproducible for a given input.

use crate::orchestrator::{PreviewFrame, PreviewState};
use crate::PreviewError;
use log::{debug, warn};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use vitrine_catalog::{base_context, mock_product};
use vitrine_dialect::SectionsData;
use vitrine_mapping::{MappedSection, SectionMapper, SectionPurpose};
use vitrine_model::{
    EditorSection, EditorSectionKind, LiquidSection, PageKind,
};
use vitrine_theme::ThemeHandle;

/// Renders one full page for the given state. Section template failures
/// degrade inline; an evaluation error fails the whole page (no partial
/// output).
pub async fn compose_page(
    handle: &ThemeHandle,
    mapper: &Arc<dyn SectionMapper>,
    state: &PreviewState,
) -> Result<PreviewFrame, PreviewError> {
    let mut base = base_context(
        &state.shop_name,
        &state.content.settings,
        &state.content.products,
    );
    base.insert(
        "layout_flags".to_string(),
        serde_json::to_value(&state.page.flags).unwrap_or(Value::Null),
    );

    let mut body = String::new();
    match state.page.kind {
        PageKind::Home => compose_home(handle, mapper, state, &base, &mut body).await?,
        PageKind::Product => compose_product(handle, mapper, state, &base, &mut body).await?,
        PageKind::Contact => compose_contact(handle, mapper, state, &base, &mut body).await?,
    }

    // Page-specific extra sections render after the main flow on every
    // page variant.
    for section in state.page.extra_sections.iter().filter(|s| s.enabled) {
        render_editor_section(handle, mapper, section, &base, &mut body).await?;
    }

    let html = handle
        .renderer
        .render_layout(&body, &base, chrome_sections(state))
        .await?;

    let css = match handle.renderer.combined_css().await {
        Ok(css) => css.to_string(),
        Err(e) => {
            warn!("[COMPOSE] combined css unavailable: {e}");
            String::new()
        }
    };

    Ok(PreviewFrame { html, css })
}

async fn compose_home(
    handle: &ThemeHandle,
    mapper: &Arc<dyn SectionMapper>,
    state: &PreviewState,
    base: &Map<String, Value>,
    body: &mut String,
) -> Result<(), PreviewError> {
    let hero = mapper.map_hero(&state.content.hero);
    render_mapped(handle, &hero, base, body).await?;

    for section in state.content.sections.iter().filter(|s| s.enabled) {
        render_editor_section(handle, mapper, section, base, body).await?;
    }

    if !state.content.products.is_empty() {
        let products = mapper.map_products(&state.content.products);
        render_mapped(handle, &products, base, body).await?;
    }
    Ok(())
}

async fn compose_product(
    handle: &ThemeHandle,
    mapper: &Arc<dyn SectionMapper>,
    state: &PreviewState,
    base: &Map<String, Value>,
    body: &mut String,
) -> Result<(), PreviewError> {
    let selected = state
        .page
        .selected_product_id
        .as_deref()
        .and_then(|id| state.content.products.iter().find(|p| p.id == id))
        .or_else(|| state.content.products.first());

    let Some(product) = selected else {
        // Nothing to show yet; say so in the theme's own voice.
        let placeholder = EditorSection {
            id: "no-products".to_string(),
            kind: EditorSectionKind::Text,
            title: "No products yet".to_string(),
            enabled: true,
            items: Vec::new(),
            body: "Add a product in the editor to preview this page.".to_string(),
        };
        return render_editor_section(handle, mapper, &placeholder, base, body).await;
    };

    let section = LiquidSection::empty(mapper.section_type(SectionPurpose::MainProduct));
    let mut extra = Map::new();
    extra.insert(
        "product".to_string(),
        serde_json::to_value(mock_product(product)).unwrap_or(Value::Null),
    );
    body.push_str(
        &handle
            .renderer
            .render_section(&section, base, extra)
            .await?,
    );
    Ok(())
}

async fn compose_contact(
    handle: &ThemeHandle,
    mapper: &Arc<dyn SectionMapper>,
    state: &PreviewState,
    base: &Map<String, Value>,
    body: &mut String,
) -> Result<(), PreviewError> {
    let contact = &state.page.contact;
    let mut lines = Vec::new();
    if !contact.email.is_empty() {
        lines.push(format!("Email: {}", contact.email));
    }
    if !contact.phone.is_empty() {
        lines.push(format!("Phone: {}", contact.phone));
    }
    if !contact.address.is_empty() {
        lines.push(contact.address.clone());
    }

    let section = EditorSection {
        id: "contact-details".to_string(),
        kind: EditorSectionKind::Text,
        title: "Contact us".to_string(),
        enabled: true,
        items: Vec::new(),
        body: lines.join("\n"),
    };
    render_editor_section(handle, mapper, &section, base, body).await?;

    // The contact form renders as an inert container in preview.
    let form = LiquidSection::empty("contact-form");
    body.push_str(
        &handle
            .renderer
            .render_section(&form, base, Map::new())
            .await?,
    );
    Ok(())
}

async fn render_editor_section(
    handle: &ThemeHandle,
    mapper: &Arc<dyn SectionMapper>,
    section: &EditorSection,
    base: &Map<String, Value>,
    body: &mut String,
) -> Result<(), PreviewError> {
    match mapper.map_editor_section(section) {
        Some(mapped) => render_mapped(handle, &mapped, base, body).await,
        None => {
            debug!(
                "[COMPOSE] skipping unmapped section '{}' ({:?})",
                section.id, section.kind
            );
            Ok(())
        }
    }
}

async fn render_mapped(
    handle: &ThemeHandle,
    mapped: &MappedSection,
    base: &Map<String, Value>,
    body: &mut String,
) -> Result<(), PreviewError> {
    let mut extra = Map::new();
    if let Some(collection) = &mapped.collection {
        extra.insert(
            "collection".to_string(),
            serde_json::to_value(collection).unwrap_or(Value::Null),
        );
    }
    body.push_str(
        &handle
            .renderer
            .render_section(&mapped.section, base, extra)
            .await?,
    );
    Ok(())
}

/// Builds the `sections` map the layout's section groups read: the
/// announcement bar, header and footer entries derived from settings.
fn chrome_sections(state: &PreviewState) -> SectionsData {
    let mut sections = SectionsData::default();

    if state.page.flags.show_announcement && !state.content.settings.announcement_text.is_empty() {
        let mut announcement = LiquidSection::empty("announcement-bar");
        announcement.settings.insert(
            "text".to_string(),
            json!(state.content.settings.announcement_text),
        );
        sections
            .0
            .insert("announcement-bar".to_string(), Arc::new(announcement));
    }

    let mut header = LiquidSection::empty("header");
    header
        .settings
        .insert("title".to_string(), json!(state.shop_name));
    sections.0.insert("header".to_string(), Arc::new(header));

    let mut footer = LiquidSection::empty("footer");
    footer
        .settings
        .insert("text".to_string(), json!(format!("© {}", state.shop_name)));
    sections.0.insert("footer".to_string(), Arc::new(footer));

    sections
}
