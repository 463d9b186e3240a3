//! The bundled themes, embedded at compile time.
//!
//! Aurora and Prisma ship inside the crate so the engine renders
//! end-to-end with no asset server. Each theme is loaded into an
//! in-memory template source keyed by the same logical paths a remote
//! source would use.

use std::sync::Arc;
use vitrine_theme::ThemeRegistry;
use vitrine_traits::InMemoryTemplateSource;

/// The default theme's id.
pub const DEFAULT_THEME: &str = "aurora";

macro_rules! theme_asset {
    ($source:expr, $theme:literal, $path:literal) => {
        $source.add($path, include_str!(concat!("../themes/", $theme, "/", $path)));
    };
}

/// The Aurora theme (the default): array-shaped blocks, block templates
/// driven through `content_for`.
pub fn aurora_source() -> InMemoryTemplateSource {
    let source = InMemoryTemplateSource::new();
    theme_asset!(source, "aurora", "manifest.json");
    theme_asset!(source, "aurora", "layout/theme.liquid");
    theme_asset!(source, "aurora", "sections/announcement-bar.liquid");
    theme_asset!(source, "aurora", "sections/header.liquid");
    theme_asset!(source, "aurora", "sections/footer.liquid");
    theme_asset!(source, "aurora", "sections/image-banner.liquid");
    theme_asset!(source, "aurora", "sections/multicolumn.liquid");
    theme_asset!(source, "aurora", "sections/testimonials.liquid");
    theme_asset!(source, "aurora", "sections/collage.liquid");
    theme_asset!(source, "aurora", "sections/rich-text.liquid");
    theme_asset!(source, "aurora", "sections/featured-collection.liquid");
    theme_asset!(source, "aurora", "sections/main-product.liquid");
    theme_asset!(source, "aurora", "sections/contact-form.liquid");
    theme_asset!(source, "aurora", "snippets/button.liquid");
    theme_asset!(source, "aurora", "snippets/price.liquid");
    theme_asset!(source, "aurora", "snippets/product-card.liquid");
    theme_asset!(source, "aurora", "blocks/heading.liquid");
    theme_asset!(source, "aurora", "blocks/text.liquid");
    theme_asset!(source, "aurora", "blocks/buttons.liquid");
    theme_asset!(source, "aurora", "assets/base.css");
    theme_asset!(source, "aurora", "assets/section-header.css");
    theme_asset!(source, "aurora", "assets/section-image-banner.css");
    theme_asset!(source, "aurora", "assets/section-featured-collection.css");
    source
}

/// The Prisma theme: keyed-map blocks with an explicit order list,
/// settings-driven hero.
pub fn prisma_source() -> InMemoryTemplateSource {
    let source = InMemoryTemplateSource::new();
    theme_asset!(source, "prisma", "manifest.json");
    theme_asset!(source, "prisma", "layout/theme.liquid");
    theme_asset!(source, "prisma", "sections/announcement.liquid");
    theme_asset!(source, "prisma", "sections/site-header.liquid");
    theme_asset!(source, "prisma", "sections/footer.liquid");
    theme_asset!(source, "prisma", "sections/hero-banner.liquid");
    theme_asset!(source, "prisma", "sections/feature-grid.liquid");
    theme_asset!(source, "prisma", "sections/quote-wall.liquid");
    theme_asset!(source, "prisma", "sections/media-gallery.liquid");
    theme_asset!(source, "prisma", "sections/prose.liquid");
    theme_asset!(source, "prisma", "sections/product-grid.liquid");
    theme_asset!(source, "prisma", "sections/product-page.liquid");
    theme_asset!(source, "prisma", "sections/contact-form.liquid");
    theme_asset!(source, "prisma", "snippets/cta.liquid");
    theme_asset!(source, "prisma", "snippets/money-tag.liquid");
    theme_asset!(source, "prisma", "snippets/product-tile.liquid");
    theme_asset!(source, "prisma", "assets/prisma.css");
    theme_asset!(source, "prisma", "assets/hero-banner.css");
    source
}

/// A theme registry with both bundled themes registered and Aurora as
/// the default.
pub fn theme_registry() -> ThemeRegistry {
    let registry = ThemeRegistry::new(DEFAULT_THEME);
    registry.register_source("aurora", Arc::new(aurora_source()));
    registry.register_source("prisma", Arc::new(prisma_source()));
    registry
}
