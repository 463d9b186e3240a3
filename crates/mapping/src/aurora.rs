//! The Aurora theme's mapper (the default theme).
//!
//! Aurora sections carry their blocks as an ordered list.

use crate::mapper::{MappedSection, SectionMapper, SectionPurpose};
use serde_json::{Map, Value, json};
use vitrine_catalog::{mock_collection, mock_product};
use vitrine_model::{
    BlockCollection, EditableProduct, EditorSection, EditorSectionKind, HeroContent,
    LiquidSection, SectionBlock,
};

/// Columns shown side by side max out at four regardless of item count.
const MAX_COLUMNS: usize = 4;

pub struct AuroraMapper;

impl AuroraMapper {
    fn section(id: &str, section_type: &str, settings: Map<String, Value>, blocks: Vec<SectionBlock>) -> LiquidSection {
        LiquidSection {
            id: id.to_string(),
            section_type: section_type.to_string(),
            settings,
            blocks: BlockCollection::List(blocks),
        }
    }
}

fn settings(pairs: &[(&str, Value)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (key, value) in pairs {
        map.insert((*key).to_string(), value.clone());
    }
    map
}

fn block(id: &str, block_type: &str, pairs: &[(&str, Value)]) -> SectionBlock {
    SectionBlock::new(id, block_type, settings(pairs))
}

impl SectionMapper for AuroraMapper {
    fn theme_id(&self) -> &'static str {
        "aurora"
    }

    fn section_type(&self, purpose: SectionPurpose) -> &'static str {
        match purpose {
            SectionPurpose::Hero => "image-banner",
            SectionPurpose::FeaturedCollection => "featured-collection",
            SectionPurpose::RichText => "rich-text",
            SectionPurpose::MainProduct => "main-product",
        }
    }

    fn map_hero(&self, hero: &HeroContent) -> MappedSection {
        let mut blocks = Vec::new();
        if !hero.title.is_empty() {
            blocks.push(block("hero-heading", "heading", &[("heading", json!(hero.title))]));
        }
        if !hero.subtitle.is_empty() {
            blocks.push(block("hero-text", "text", &[("text", json!(hero.subtitle))]));
        }
        if !hero.cta_text.is_empty() {
            blocks.push(block(
                "hero-buttons",
                "buttons",
                &[
                    ("button_label", json!(hero.cta_text)),
                    ("button_link", json!(hero.cta_url)),
                ],
            ));
        }

        let section_settings = settings(&[
            ("image", json!(hero.background_image.clone().unwrap_or_default())),
            ("image_overlay_opacity", json!(30)),
            ("banner_height", json!("medium")),
        ]);
        MappedSection::plain(Self::section("hero", "image-banner", section_settings, blocks))
    }

    fn map_products(&self, products: &[EditableProduct]) -> MappedSection {
        let mocked: Vec<_> = products.iter().map(mock_product).collect();
        let collection = mock_collection("featured", "Featured products", mocked);
        let section_settings = settings(&[
            ("title", json!("Featured products")),
            ("products_to_show", json!(collection.products_count.min(8))),
            ("collection", json!(collection.handle)),
        ]);
        MappedSection::with_collection(
            Self::section("featured", "featured-collection", section_settings, Vec::new()),
            collection,
        )
    }

    fn map_editor_section(&self, section: &EditorSection) -> Option<MappedSection> {
        match section.kind {
            EditorSectionKind::Features => {
                let blocks: Vec<SectionBlock> = section
                    .items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        block(
                            &format!("{}-col-{i}", section.id),
                            "column",
                            &[
                                ("title", json!(item.title)),
                                ("text", json!(item.text)),
                                ("image", json!(item.image.clone().unwrap_or_default())),
                            ],
                        )
                    })
                    .collect();
                let section_settings = settings(&[
                    ("title", json!(section.title)),
                    ("columns_desktop", json!(blocks.len().min(MAX_COLUMNS))),
                ]);
                Some(MappedSection::plain(Self::section(
                    &section.id,
                    "multicolumn",
                    section_settings,
                    blocks,
                )))
            }
            EditorSectionKind::Testimonials => {
                let blocks: Vec<SectionBlock> = section
                    .items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        block(
                            &format!("{}-quote-{i}", section.id),
                            "testimonial",
                            &[
                                ("quote", json!(item.text)),
                                ("author", json!(item.author.clone().unwrap_or_default())),
                            ],
                        )
                    })
                    .collect();
                let section_settings = settings(&[("title", json!(section.title))]);
                Some(MappedSection::plain(Self::section(
                    &section.id,
                    "testimonials",
                    section_settings,
                    blocks,
                )))
            }
            EditorSectionKind::Gallery => {
                let blocks: Vec<SectionBlock> = section
                    .items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        block(
                            &format!("{}-img-{i}", section.id),
                            "image",
                            &[
                                ("image", json!(item.image.clone().unwrap_or_default())),
                                ("caption", json!(item.title)),
                            ],
                        )
                    })
                    .collect();
                let section_settings = settings(&[("title", json!(section.title))]);
                Some(MappedSection::plain(Self::section(
                    &section.id,
                    "collage",
                    section_settings,
                    blocks,
                )))
            }
            EditorSectionKind::Text => {
                let mut blocks = Vec::new();
                if !section.title.is_empty() {
                    blocks.push(block(
                        &format!("{}-heading", section.id),
                        "heading",
                        &[("heading", json!(section.title))],
                    ));
                }
                blocks.push(block(
                    &format!("{}-body", section.id),
                    "text",
                    &[("text", json!(section.body))],
                ));
                Some(MappedSection::plain(Self::section(
                    &section.id,
                    "rich-text",
                    Map::new(),
                    blocks,
                )))
            }
            EditorSectionKind::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_model::EditorItem;

    #[test]
    fn test_hero_with_title_only_yields_one_heading_block() {
        let hero = HeroContent {
            title: "Acme".to_string(),
            subtitle: String::new(),
            cta_text: String::new(),
            ..Default::default()
        };
        let mapped = AuroraMapper.map_hero(&hero);
        assert_eq!(mapped.section_type, "image-banner");
        assert_eq!(mapped.section.blocks.len(), 1);
        let only = mapped.section.blocks.iter_ordered().next().unwrap();
        assert_eq!(only.block_type, "heading");
    }

    #[test]
    fn test_hero_with_everything_yields_three_blocks() {
        let hero = HeroContent {
            title: "Acme".to_string(),
            subtitle: "Fine goods".to_string(),
            cta_text: "Shop now".to_string(),
            cta_url: "/collections/all".to_string(),
            background_image: Some("bg.jpg".to_string()),
        };
        let mapped = AuroraMapper.map_hero(&hero);
        let types: Vec<&str> = mapped
            .section
            .blocks
            .iter_ordered()
            .map(|b| b.block_type.as_str())
            .collect();
        assert_eq!(types, vec!["heading", "text", "buttons"]);
        assert_eq!(mapped.section.settings["image"], "bg.jpg");
    }

    #[test]
    fn test_features_cap_columns_at_four() {
        let section = EditorSection {
            id: "features-1".to_string(),
            kind: EditorSectionKind::Features,
            title: "Why us".to_string(),
            enabled: true,
            items: (0..6)
                .map(|i| EditorItem {
                    title: format!("Feature {i}"),
                    ..Default::default()
                })
                .collect(),
            body: String::new(),
        };
        let mapped = AuroraMapper.map_editor_section(&section).unwrap();
        assert_eq!(mapped.section_type, "multicolumn");
        assert_eq!(mapped.section.settings["columns_desktop"], 4);
        assert_eq!(mapped.section.blocks.len(), 6);
    }

    #[test]
    fn test_unknown_kind_maps_to_none() {
        let section = EditorSection {
            id: "x".to_string(),
            kind: EditorSectionKind::Unknown,
            title: String::new(),
            enabled: true,
            items: Vec::new(),
            body: String::new(),
        };
        assert!(AuroraMapper.map_editor_section(&section).is_none());
    }

    #[test]
    fn test_products_map_with_collection() {
        let products = vec![EditableProduct {
            id: "p1".to_string(),
            title: "Mug".to_string(),
            description: String::new(),
            price: 12.0,
            image: None,
            vendor: String::new(),
            tags: Vec::new(),
        }];
        let mapped = AuroraMapper.map_products(&products);
        assert_eq!(mapped.section_type, "featured-collection");
        let collection = mapped.collection.unwrap();
        assert_eq!(collection.products_count, 1);
        assert_eq!(collection.products[0].price, 1200);
    }
}
