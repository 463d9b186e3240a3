//! Pure builders from editor state to the mock object graph.

use crate::entities::{MockCollection, MockImage, MockProduct, MockVariant, Shop};
use serde_json::{Map, Value, json};
use vitrine_model::{EditableProduct, StyleSettings};

/// Converts one editable product into the mock product shape: derived
/// handle, minor-unit price, a single default variant.
pub fn mock_product(product: &EditableProduct) -> MockProduct {
    let handle = slug::slugify(&product.title);
    let price = to_minor_units(product.price);
    let images: Vec<MockImage> = product
        .image
        .as_deref()
        .map(|src| vec![MockImage::new(src, &product.title)])
        .unwrap_or_default();

    MockProduct {
        id: product.id.clone(),
        url: format!("/products/{handle}"),
        handle,
        title: product.title.clone(),
        description: product.description.clone(),
        price,
        price_min: price,
        price_max: price,
        available: true,
        vendor: product.vendor.clone(),
        tags: product.tags.clone(),
        featured_image: images.first().cloned(),
        images,
        variants: vec![MockVariant {
            id: format!("{}-default", product.id),
            title: "Default Title".to_string(),
            price,
            available: true,
            sku: String::new(),
        }],
    }
}

/// Builds a collection from a product list.
pub fn mock_collection(id: &str, title: &str, products: Vec<MockProduct>) -> MockCollection {
    let handle = slug::slugify(title);
    MockCollection {
        id: id.to_string(),
        title: title.to_string(),
        url: format!("/collections/{handle}"),
        handle,
        products_count: products.len(),
        products,
    }
}

/// Builds the base render context: shop, settings, request metadata, the
/// `collections` map and the handle-keyed `all_products` map.
pub fn base_context(
    shop_name: &str,
    settings: &StyleSettings,
    products: &[EditableProduct],
) -> Map<String, Value> {
    let shop = Shop::named(shop_name);
    let mocked: Vec<MockProduct> = products.iter().map(mock_product).collect();
    let all = mock_collection("all", "All products", mocked.clone());

    let mut all_products = Map::new();
    for product in &mocked {
        all_products.insert(product.handle.clone(), to_value(product));
    }

    let mut collections = Map::new();
    collections.insert("all".to_string(), to_value(&all));

    let mut context = Map::new();
    context.insert("shop".to_string(), to_value(&shop));
    context.insert("settings".to_string(), to_value(settings));
    context.insert(
        "request".to_string(),
        json!({
            "design_mode": true,
            "host": "preview.local",
            "path": "/",
        }),
    );
    context.insert("collections".to_string(), Value::Object(collections));
    context.insert("all_products".to_string(), Value::Object(all_products));
    context
}

fn to_minor_units(major: f64) -> i64 {
    (major * 100.0).round() as i64
}

// Serialization of these plain structs cannot fail; the fallback is for
// type-level completeness only.
fn to_value<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> EditableProduct {
        EditableProduct {
            id: "p1".to_string(),
            title: "Enamel Mug".to_string(),
            description: "A mug.".to_string(),
            price: 29.99,
            image: Some("https://cdn.example/mug.jpg".to_string()),
            vendor: "Acme".to_string(),
            tags: vec!["kitchen".to_string()],
        }
    }

    #[test]
    fn test_mock_product_derives_handle_and_minor_units() {
        let mock = mock_product(&product());
        assert_eq!(mock.handle, "enamel-mug");
        assert_eq!(mock.price, 2999);
        assert_eq!(mock.url, "/products/enamel-mug");
        assert_eq!(mock.variants.len(), 1);
        assert_eq!(mock.variants[0].price, 2999);
        assert!(mock.available);
    }

    #[test]
    fn test_mock_product_without_image() {
        let mut p = product();
        p.image = None;
        let mock = mock_product(&p);
        assert!(mock.images.is_empty());
        assert!(mock.featured_image.is_none());
    }

    #[test]
    fn test_handle_strips_non_alphanumerics() {
        let mut p = product();
        p.title = "Café Noir!  Deluxe".to_string();
        let mock = mock_product(&p);
        assert_eq!(mock.handle, "cafe-noir-deluxe");
        assert!(mock.handle.chars().all(|c| c.is_ascii_lowercase()
            || c.is_ascii_digit()
            || c == '-'));
    }

    #[test]
    fn test_mock_collection_counts_products() {
        let products = vec![mock_product(&product())];
        let collection = mock_collection("all", "All products", products);
        assert_eq!(collection.products_count, 1);
        assert_eq!(collection.handle, "all-products");
    }

    #[test]
    fn test_base_context_shape() {
        let settings = StyleSettings::default();
        let context = base_context("Acme Outfitters", &settings, &[product()]);

        assert_eq!(context["shop"]["name"], "Acme Outfitters");
        assert_eq!(context["shop"]["currency"], "USD");
        assert_eq!(context["collections"]["all"]["products_count"], 1);
        assert_eq!(
            context["all_products"]["enamel-mug"]["title"],
            "Enamel Mug"
        );
        assert_eq!(context["request"]["design_mode"], true);
    }

    #[test]
    fn test_builders_are_deterministic() {
        let settings = StyleSettings::default();
        let products = [product()];
        let first = base_context("Acme", &settings, &products);
        let second = base_context("Acme", &settings, &products);
        // Deep-equal, freshly built each time.
        assert_eq!(first, second);
    }

    #[test]
    fn test_rounding_of_fractional_prices() {
        let mut p = product();
        p.price = 10.005;
        assert_eq!(mock_product(&p).price, 1001);
        p.price = 0.0;
        assert_eq!(mock_product(&p).price, 0);
    }
}
