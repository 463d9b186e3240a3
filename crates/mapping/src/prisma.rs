//! The Prisma theme's mapper.
//!
//! Prisma sections carry their blocks as an id-keyed map plus an explicit
//! order list, and lean harder on section settings than Aurora does. The
//! registry contract makes that invisible to callers.

use crate::mapper::{MappedSection, SectionMapper, SectionPurpose};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use vitrine_catalog::{mock_collection, mock_product};
use vitrine_model::{
    BlockCollection, EditableProduct, EditorSection, EditorSectionKind, HeroContent,
    LiquidSection, SectionBlock,
};

pub struct PrismaMapper;

fn settings(pairs: &[(&str, Value)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (key, value) in pairs {
        map.insert((*key).to_string(), value.clone());
    }
    map
}

/// Builds the keyed shape from blocks in order.
fn keyed(blocks: Vec<SectionBlock>) -> BlockCollection {
    let block_order: Vec<String> = blocks.iter().map(|b| b.id.clone()).collect();
    let blocks: BTreeMap<String, SectionBlock> =
        blocks.into_iter().map(|b| (b.id.clone(), b)).collect();
    BlockCollection::Keyed {
        blocks,
        block_order,
    }
}

impl PrismaMapper {
    fn section(
        id: &str,
        section_type: &str,
        section_settings: Map<String, Value>,
        blocks: Vec<SectionBlock>,
    ) -> LiquidSection {
        LiquidSection {
            id: id.to_string(),
            section_type: section_type.to_string(),
            settings: section_settings,
            blocks: keyed(blocks),
        }
    }
}

impl SectionMapper for PrismaMapper {
    fn theme_id(&self) -> &'static str {
        "prisma"
    }

    fn section_type(&self, purpose: SectionPurpose) -> &'static str {
        match purpose {
            SectionPurpose::Hero => "hero-banner",
            SectionPurpose::FeaturedCollection => "product-grid",
            SectionPurpose::RichText => "prose",
            SectionPurpose::MainProduct => "product-page",
        }
    }

    fn map_hero(&self, hero: &HeroContent) -> MappedSection {
        // Prisma's hero is settings-driven; empty strings mean "absent"
        // and the template guards on them.
        let section_settings = settings(&[
            ("heading", json!(hero.title)),
            ("subheading", json!(hero.subtitle)),
            ("cta_label", json!(hero.cta_text)),
            ("cta_target", json!(hero.cta_url)),
            ("backdrop", json!(hero.background_image.clone().unwrap_or_default())),
        ]);
        MappedSection::plain(Self::section("hero", "hero-banner", section_settings, Vec::new()))
    }

    fn map_products(&self, products: &[EditableProduct]) -> MappedSection {
        let mocked: Vec<_> = products.iter().map(mock_product).collect();
        let collection = mock_collection("featured", "Shop all", mocked);
        let section_settings = settings(&[
            ("heading", json!("Shop all")),
            ("max_items", json!(collection.products_count.min(8))),
        ]);
        MappedSection::with_collection(
            Self::section("featured", "product-grid", section_settings, Vec::new()),
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
                        SectionBlock::new(
                            &format!("feature-{i}"),
                            "feature",
                            settings(&[
                                ("label", json!(item.title)),
                                ("body", json!(item.text)),
                                ("icon", json!(item.image.clone().unwrap_or_default())),
                            ]),
                        )
                    })
                    .collect();
                let section_settings = settings(&[
                    ("heading", json!(section.title)),
                    ("layout", json!("grid")),
                ]);
                Some(MappedSection::plain(Self::section(
                    &section.id,
                    "feature-grid",
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
                        SectionBlock::new(
                            &format!("quote-{i}"),
                            "quote",
                            settings(&[
                                ("body", json!(item.text)),
                                ("attribution", json!(item.author.clone().unwrap_or_default())),
                            ]),
                        )
                    })
                    .collect();
                let section_settings = settings(&[("heading", json!(section.title))]);
                Some(MappedSection::plain(Self::section(
                    &section.id,
                    "quote-wall",
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
                        SectionBlock::new(
                            &format!("media-{i}"),
                            "media",
                            settings(&[
                                ("source", json!(item.image.clone().unwrap_or_default())),
                                ("caption", json!(item.title)),
                            ]),
                        )
                    })
                    .collect();
                let section_settings = settings(&[("heading", json!(section.title))]);
                Some(MappedSection::plain(Self::section(
                    &section.id,
                    "media-gallery",
                    section_settings,
                    blocks,
                )))
            }
            EditorSectionKind::Text => {
                let section_settings = settings(&[
                    ("heading", json!(section.title)),
                    ("body", json!(section.body)),
                ]);
                Some(MappedSection::plain(Self::section(
                    &section.id,
                    "prose",
                    section_settings,
                    Vec::new(),
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

    fn features(count: usize) -> EditorSection {
        EditorSection {
            id: "features-1".to_string(),
            kind: EditorSectionKind::Features,
            title: "Why us".to_string(),
            enabled: true,
            items: (0..count)
                .map(|i| EditorItem {
                    title: format!("Feature {i}"),
                    text: format!("Body {i}"),
                    ..Default::default()
                })
                .collect(),
            body: String::new(),
        }
    }

    #[test]
    fn test_features_use_keyed_shape_with_order() {
        let mapped = PrismaMapper.map_editor_section(&features(3)).unwrap();
        assert_eq!(mapped.section_type, "feature-grid");
        match &mapped.section.blocks {
            BlockCollection::Keyed {
                blocks,
                block_order,
            } => {
                assert_eq!(blocks.len(), 3);
                assert_eq!(block_order, &["feature-0", "feature-1", "feature-2"]);
            }
            other => panic!("expected keyed blocks, got {other:?}"),
        }
        // The projection carries the derived count.
        let value = mapped.section.to_value();
        assert_eq!(value["block_count"], 3);
    }

    #[test]
    fn test_same_input_differs_materially_from_aurora() {
        let input = features(2);
        let prisma = PrismaMapper.map_editor_section(&input).unwrap();
        let aurora = crate::AuroraMapper.map_editor_section(&input).unwrap();

        assert_ne!(prisma.section_type, aurora.section_type);
        assert!(matches!(prisma.section.blocks, BlockCollection::Keyed { .. }));
        assert!(matches!(aurora.section.blocks, BlockCollection::List(_)));
        // Same logical item count through the uniform accessor.
        assert_eq!(prisma.section.blocks.len(), aurora.section.blocks.len());
    }

    #[test]
    fn test_hero_is_settings_driven() {
        let hero = HeroContent {
            title: "Acme".to_string(),
            subtitle: "Fine goods".to_string(),
            ..Default::default()
        };
        let mapped = PrismaMapper.map_hero(&hero);
        assert_eq!(mapped.section.settings["heading"], "Acme");
        assert!(mapped.section.blocks.is_empty());
    }
}
