//! Static per-theme description, loaded once per theme.
//!
//! The manifest is deserialized from a JSON document fetched through the
//! theme's template source. It is immutable after load and owned by the
//! theme registry.

use serde::Deserialize;

/// A theme's static description: identity, sections, layout and assets.
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeManifest {
    pub id: String,
    pub name: String,
    pub version: String,
    pub sections: Vec<SectionDefinition>,
    pub layout: LayoutPaths,
    #[serde(default)]
    pub snippets: Vec<String>,
    /// Global CSS asset paths, unioned with per-section CSS by the store.
    #[serde(default)]
    pub css: Vec<String>,
}

impl ThemeManifest {
    /// Finds the definition for a native section type, if the theme has one.
    pub fn section(&self, section_type: &str) -> Option<&SectionDefinition> {
        self.sections
            .iter()
            .find(|s| s.section_type == section_type)
    }

    /// The template path for a native section type, following the theme's
    /// `sections/<type>.liquid` convention when no definition overrides it.
    pub fn section_template(&self, section_type: &str) -> String {
        self.section(section_type)
            .map(|s| s.template.clone())
            .unwrap_or_else(|| format!("sections/{section_type}.liquid"))
    }

    /// The template path for a snippet name.
    pub fn snippet_template(&self, name: &str) -> String {
        format!("snippets/{name}.liquid")
    }

    /// The template path for a block type used by `content_for`.
    pub fn block_template(&self, block_type: &str) -> String {
        format!("blocks/{block_type}.liquid")
    }
}

/// One native section a theme ships.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionDefinition {
    /// Native section type, e.g. `image-banner`.
    #[serde(rename = "type")]
    pub section_type: String,
    /// Human-readable name shown in the editor.
    pub name: String,
    /// Logical template path under the theme root.
    pub template: String,
    /// The abstract editor type this section renders, if any.
    #[serde(default)]
    pub editor_type: Option<String>,
    /// Optional section-scoped CSS asset.
    #[serde(default)]
    pub css: Option<String>,
}

/// Layout template paths: the theme shell plus header and footer.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutPaths {
    pub theme: String,
    pub header: String,
    pub footer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "id": "aurora",
        "name": "Aurora",
        "version": "1.2.0",
        "sections": [
            {
                "type": "image-banner",
                "name": "Image banner",
                "template": "sections/image-banner.liquid",
                "editor_type": "hero",
                "css": "assets/section-image-banner.css"
            },
            {
                "type": "rich-text",
                "name": "Rich text",
                "template": "sections/rich-text.liquid"
            }
        ],
        "layout": {
            "theme": "layout/theme.liquid",
            "header": "sections/header.liquid",
            "footer": "sections/footer.liquid"
        },
        "snippets": ["snippets/button.liquid"],
        "css": ["assets/base.css"]
    }"#;

    #[test]
    fn test_manifest_deserializes() {
        let manifest: ThemeManifest = serde_json::from_str(MANIFEST).unwrap();
        assert_eq!(manifest.id, "aurora");
        assert_eq!(manifest.sections.len(), 2);
        assert_eq!(manifest.layout.theme, "layout/theme.liquid");
        assert_eq!(
            manifest.section("image-banner").unwrap().css.as_deref(),
            Some("assets/section-image-banner.css")
        );
    }

    #[test]
    fn test_section_template_falls_back_to_convention() {
        let manifest: ThemeManifest = serde_json::from_str(MANIFEST).unwrap();
        assert_eq!(
            manifest.section_template("rich-text"),
            "sections/rich-text.liquid"
        );
        assert_eq!(
            manifest.section_template("unlisted"),
            "sections/unlisted.liquid"
        );
    }
}
