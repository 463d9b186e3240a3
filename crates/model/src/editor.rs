//! Inbound editor contracts.
//!
//! These are the plain data records the (out-of-scope) editor hands to the
//! preview engine: hero content, typed sections, a flat product list and a
//! style settings record, plus the page selector. All of it is owned by
//! the editor; the engine only ever reads it.

use serde::{Deserialize, Serialize};

/// Everything the merchant can edit, as one snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EditorContent {
    pub hero: HeroContent,
    #[serde(default)]
    pub sections: Vec<EditorSection>,
    #[serde(default)]
    pub products: Vec<EditableProduct>,
    #[serde(default)]
    pub settings: StyleSettings,
}

/// The hero record: headline, subtitle and call to action.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HeroContent {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub cta_text: String,
    #[serde(default)]
    pub cta_url: String,
    #[serde(default)]
    pub background_image: Option<String>,
}

/// Abstract section kinds the editor produces. Anything newer than this
/// engine deserializes as `Unknown` and is skipped by the mappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorSectionKind {
    Features,
    Testimonials,
    Gallery,
    Text,
    #[serde(other)]
    Unknown,
}

/// One abstract content section, in editor order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSection {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EditorSectionKind,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub items: Vec<EditorItem>,
    /// Free-form body, used by text sections.
    #[serde(default)]
    pub body: String,
}

fn default_enabled() -> bool {
    true
}

/// One entry inside a features/testimonials/gallery section.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EditorItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image: Option<String>,
    /// Attribution, used by testimonial entries.
    #[serde(default)]
    pub author: Option<String>,
}

/// A draft product as the editor holds it. Prices are major units here;
/// the catalog derives minor units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditableProduct {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Color and typography settings applied across the preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSettings {
    pub primary_color: String,
    pub background_color: String,
    pub text_color: String,
    pub heading_font: String,
    pub body_font: String,
    #[serde(default)]
    pub announcement_text: String,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            primary_color: "#1a1a2e".to_string(),
            background_color: "#ffffff".to_string(),
            text_color: "#121212".to_string(),
            heading_font: "Georgia, serif".to_string(),
            body_font: "Helvetica, sans-serif".to_string(),
            announcement_text: String::new(),
        }
    }
}

/// Which storefront page the preview is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    #[default]
    Home,
    Product,
    Contact,
}

/// Page selector plus page-specific auxiliary state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageState {
    pub kind: PageKind,
    #[serde(default)]
    pub selected_product_id: Option<String>,
    #[serde(default)]
    pub contact: ContactInfo,
    #[serde(default)]
    pub flags: LayoutFlags,
    /// Additional sections shown only on this page.
    #[serde(default)]
    pub extra_sections: Vec<EditorSection>,
}

/// Contact details rendered on the contact-equivalent page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

/// Layout toggles for the page chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutFlags {
    pub show_announcement: bool,
    pub show_header: bool,
    pub show_footer: bool,
}

impl Default for LayoutFlags {
    fn default() -> Self {
        Self {
            show_announcement: true,
            show_header: true,
            show_footer: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_section_defaults() {
        let section: EditorSection = serde_json::from_str(
            r#"{"id": "s1", "type": "features", "items": [{"title": "Fast"}]}"#,
        )
        .unwrap();
        assert!(section.enabled);
        assert_eq!(section.kind, EditorSectionKind::Features);
        assert_eq!(section.items[0].title, "Fast");
    }

    #[test]
    fn test_page_state_roundtrip() {
        let state = PageState {
            kind: PageKind::Product,
            selected_product_id: Some("p1".into()),
            ..Default::default()
        };
        let json = serde_json::to_string(&state).unwrap();
        let back: PageState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
