//! Per-theme section mapping.
//!
//! Abstract editor content (a hero, a feature list, testimonials) has no
//! theme-native shape of its own. Each theme registers a
//! [`SectionMapper`] strategy that translates editor records into that
//! theme's section/block layout; the [`MapperRegistry`] resolves theme
//! ids and falls back to the default theme's mapper for ids it has never
//! heard of.
//!
//! The two bundled mappers intentionally produce materially different
//! native shapes for identical input: Aurora carries blocks as an ordered
//! list, Prisma as an id-keyed map with an explicit order list.

mod aurora;
mod mapper;
mod prisma;
mod registry;

pub use aurora::AuroraMapper;
pub use mapper::{MappedSection, SectionMapper, SectionPurpose};
pub use prisma::PrismaMapper;
pub use registry::MapperRegistry;
