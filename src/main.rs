//! Renders a sample storefront preview to stdout.
//!
//! Usage: `vitrine [theme-id]` — defaults to the bundled `aurora` theme.
//! The emitted document inlines the combined theme CSS so it can be
//! opened directly in a browser.

use vitrine::{
    EditableProduct, EditorContent, EditorItem, EditorSection, EditorSectionKind, HeroContent,
    PreviewBuilder, PreviewEvent, PreviewState,
};

fn sample_state(theme_id: &str) -> PreviewState {
    PreviewState {
        shop_name: "Acme Outfitters".to_string(),
        theme_id: theme_id.to_string(),
        content: EditorContent {
            hero: HeroContent {
                title: "Gear for the long way round".to_string(),
                subtitle: "Field-tested goods for people who go outside".to_string(),
                cta_text: "Shop the catalog".to_string(),
                cta_url: "/collections/all".to_string(),
                background_image: None,
            },
            sections: vec![EditorSection {
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
            }],
            products: vec![EditableProduct {
                id: "p1".to_string(),
                title: "Enamel Mug".to_string(),
                description: "Holds coffee. Survives drops.".to_string(),
                price: 29.99,
                image: None,
                vendor: "Acme".to_string(),
                tags: vec!["camp".to_string()],
            }],
            settings: Default::default(),
        },
        page: Default::default(),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    let theme_id = std::env::args().nth(1).unwrap_or_else(|| "aurora".to_string());
    let preview = PreviewBuilder::new()
        .initial_state(sample_state(&theme_id))
        .build();

    preview.orchestrator.render_now().await;
    match preview.events.recv().await {
        Ok(PreviewEvent::Frame(frame)) => {
            // Inline the CSS so the document stands alone.
            let html = frame.html.replace(
                "</head>",
                &format!("<style>{}</style></head>", frame.css),
            );
            println!("{html}");
        }
        Ok(PreviewEvent::Error { message }) => {
            eprintln!("preview failed: {message}");
            std::process::exit(1);
        }
        Err(_) => {
            eprintln!("preview produced no output");
            std::process::exit(1);
        }
    }
}
