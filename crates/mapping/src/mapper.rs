//! The mapper strategy contract.

use vitrine_catalog::MockCollection;
use vitrine_model::{EditableProduct, EditorSection, HeroContent, LiquidSection};

/// The four fixed purposes a page composer asks a theme about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionPurpose {
    Hero,
    FeaturedCollection,
    RichText,
    MainProduct,
}

/// A theme-native section plus the auxiliary data it renders with.
/// Ephemeral: rebuilt on every render, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedSection {
    pub section: LiquidSection,
    pub section_type: String,
    pub collection: Option<MockCollection>,
}

impl MappedSection {
    pub fn plain(section: LiquidSection) -> Self {
        Self {
            section_type: section.section_type.clone(),
            section,
            collection: None,
        }
    }

    pub fn with_collection(section: LiquidSection, collection: MockCollection) -> Self {
        Self {
            section_type: section.section_type.clone(),
            section,
            collection: Some(collection),
        }
    }
}

/// A per-theme translation strategy from abstract editor content to the
/// theme's native section/block shape.
///
/// `map_editor_section` dispatches on the abstract section's own type tag
/// and returns `None` for anything it does not understand; callers skip
/// `None` results rather than fail.
pub trait SectionMapper: Send + Sync {
    /// The theme this mapper serves.
    fn theme_id(&self) -> &'static str;

    /// The native section type used for one of the fixed purposes.
    fn section_type(&self, purpose: SectionPurpose) -> &'static str;

    fn map_hero(&self, hero: &HeroContent) -> MappedSection;

    fn map_products(&self, products: &[EditableProduct]) -> MappedSection;

    fn map_editor_section(&self, section: &EditorSection) -> Option<MappedSection>;
}
