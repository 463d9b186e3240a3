//! Shared fixtures for the integration suites.

use std::time::Duration;
use vitrine::{
    EditableProduct, EditorContent, EditorItem, EditorSection, EditorSectionKind, HeroContent,
    PreviewEvent, PreviewFrame, PreviewState,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A populated editor snapshot: hero, two features, one testimonial, one
/// product.
pub fn sample_state(theme_id: &str) -> PreviewState {
    PreviewState {
        shop_name: "Acme Outfitters".to_string(),
        theme_id: theme_id.to_string(),
        content: EditorContent {
            hero: HeroContent {
                title: "Gear for the long way round".to_string(),
                subtitle: "Field-tested goods".to_string(),
                cta_text: "Shop the catalog".to_string(),
                cta_url: "/collections/all".to_string(),
                background_image: None,
            },
            sections: vec![
                EditorSection {
                    id: "why-us".to_string(),
                    kind: EditorSectionKind::Features,
                    title: "Why Acme".to_string(),
                    enabled: true,
                    items: vec![
                        EditorItem {
                            title: "Built to last".to_string(),
                            text: "Every seam double-stitched.".to_string(),
                            ..Default::default()
                        },
                        EditorItem {
                            title: "Fair prices".to_string(),
                            text: "Direct from the workshop.".to_string(),
                            ..Default::default()
                        },
                    ],
                    body: String::new(),
                },
                EditorSection {
                    id: "press".to_string(),
                    kind: EditorSectionKind::Testimonials,
                    title: "Word of mouth".to_string(),
                    enabled: true,
                    items: vec![EditorItem {
                        text: "The mug outlived my car.".to_string(),
                        author: Some("A happy camper".to_string()),
                        ..Default::default()
                    }],
                    body: String::new(),
                },
            ],
            products: vec![EditableProduct {
                id: "p1".to_string(),
                title: "Enamel Mug".to_string(),
                description: "Holds coffee. Survives drops.".to_string(),
                price: 29.99,
                image: Some("https://cdn.example/mug.jpg".to_string()),
                vendor: "Acme".to_string(),
                tags: vec!["camp".to_string()],
            }],
            settings: Default::default(),
        },
        page: Default::default(),
    }
}

/// Receives the next frame or panics with the error event's message.
pub async fn expect_frame(rx: &async_channel::Receiver<PreviewEvent>) -> PreviewFrame {
    match tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for a preview event")
        .expect("event channel closed")
    {
        PreviewEvent::Frame(frame) => frame,
        PreviewEvent::Error { message } => panic!("unexpected error event: {message}"),
    }
}
