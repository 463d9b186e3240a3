//! Raw-source preprocessing applied before lexing.
//!
//! The preview runs without a static-asset server, so `<script>` elements
//! that point at theme-hosted files would only produce console noise (or
//! worse, hung loads) inside the display surface. They are stripped
//! textually; inline scripts written through `{% javascript %}` survive,
//! because that tag produces its own literal output.

use once_cell::sync::Lazy;
use regex::Regex;

static ASSET_SCRIPT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<script\b[^>]*\bsrc\s*=[^>]*(?:asset_url|assets/)[^>]*>\s*</script>"#)
        .expect("asset script pattern")
});

/// Strips `<script src=...>` elements that reference theme-hosted assets.
/// Everything else passes through untouched.
pub fn preprocess(source: &str) -> String {
    ASSET_SCRIPT.replace_all(source, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_asset_url_scripts() {
        let source = r#"<div>x</div>
<script src="{{ 'cart.js' | asset_url }}" defer></script>
<p>y</p>"#;
        let out = preprocess(source);
        assert!(!out.contains("<script"));
        assert!(out.contains("<div>x</div>"));
        assert!(out.contains("<p>y</p>"));
    }

    #[test]
    fn test_strips_plain_asset_path_scripts() {
        let source = r#"<script type="module" src="assets/slider.js"></script>"#;
        assert_eq!(preprocess(source).trim(), "");
    }

    #[test]
    fn test_keeps_inline_and_external_scripts() {
        let inline = "<script>console.log('hi')</script>";
        assert_eq!(preprocess(inline), inline);

        let external = r#"<script src="https://cdn.example.com/widget.js"></script>"#;
        assert_eq!(preprocess(external), external);
    }
}
