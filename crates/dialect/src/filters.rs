//! Storefront filters.

use serde_json::{Value, json};
use vitrine_liquid::{FilterArgs, LiquidError, Parser, RenderContext};
use vitrine_liquid::value::{to_number, to_output_string};

/// Registers the storefront filters on a parser.
pub fn register(parser: &mut Parser) {
    parser.register_filter("money", money);
    parser.register_filter("money_with_currency", money_with_currency);
    parser.register_filter("handleize", handleize);
    parser.register_filter("handle", handleize);
    parser.register_filter("image_url", image_url);
    parser.register_filter("img_url", image_url);
    parser.register_filter("asset_url", asset_url);
}

/// Formats an integer minor-unit amount: divide by 100, two decimals,
/// currency prefix. `money(2999) == "$29.99"`.
fn money(input: Value, _args: &FilterArgs, _ctx: &RenderContext) -> Result<Value, LiquidError> {
    let amount = to_number(&input) / 100.0;
    Ok(json!(format!("${amount:.2}")))
}

fn money_with_currency(
    input: Value,
    args: &FilterArgs,
    ctx: &RenderContext,
) -> Result<Value, LiquidError> {
    let base = money(input, args, ctx)?;
    let currency = ctx
        .lookup("shop")
        .and_then(|shop| shop.get("currency"))
        .and_then(Value::as_str)
        .unwrap_or("USD");
    Ok(json!(format!("{} {currency}", to_output_string(&base))))
}

/// Slugifies a string: lowercase, `[a-z0-9-]` only, no leading/trailing
/// hyphen. Non-ASCII input is transliterated (`é` → `e`).
fn handleize(input: Value, _args: &FilterArgs, _ctx: &RenderContext) -> Result<Value, LiquidError> {
    Ok(json!(slug::slugify(to_output_string(&input))))
}

/// Returns the string form of an image reference: a bare string passes
/// through, an object yields its `src` (or `url`) property.
fn image_url(input: Value, _args: &FilterArgs, _ctx: &RenderContext) -> Result<Value, LiquidError> {
    Ok(json!(url_from(&input)))
}

/// Asset URLs resolve under the theme's `assets/` prefix. The preview
/// passes them through without a CDN rewrite.
fn asset_url(input: Value, _args: &FilterArgs, _ctx: &RenderContext) -> Result<Value, LiquidError> {
    let name = url_from(&input);
    if name.starts_with("assets/") || name.contains("://") {
        Ok(json!(name))
    } else {
        Ok(json!(format!("assets/{name}")))
    }
}

fn url_from(value: &Value) -> String {
    match value {
        Value::Object(map) => map
            .get("src")
            .or_else(|| map.get("url"))
            .map(to_output_string)
            .unwrap_or_default(),
        other => to_output_string(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;
    use std::sync::Arc;

    fn ctx() -> RenderContext {
        RenderContext::new(Arc::new(Parser::new()), Map::new())
    }

    fn no_args() -> FilterArgs {
        FilterArgs::default()
    }

    #[test]
    fn test_money_divides_and_formats() {
        assert_eq!(money(json!(2999), &no_args(), &ctx()).unwrap(), json!("$29.99"));
        assert_eq!(money(json!(0), &no_args(), &ctx()).unwrap(), json!("$0.00"));
        assert_eq!(money(json!(100), &no_args(), &ctx()).unwrap(), json!("$1.00"));
        assert_eq!(money(json!(5), &no_args(), &ctx()).unwrap(), json!("$0.05"));
    }

    #[test]
    fn test_handleize_policy() {
        let cases = [
            ("Café Noir!", "cafe-noir"),
            ("  Spaced   Out  ", "spaced-out"),
            ("UPPER_case-mix 99", "upper-case-mix-99"),
            ("--edges--", "edges"),
        ];
        for (input, expected) in cases {
            let out = handleize(json!(input), &no_args(), &ctx()).unwrap();
            assert_eq!(out, json!(expected));
            let s = out.as_str().unwrap();
            assert!(!s.starts_with('-') && !s.ends_with('-'));
            assert!(s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        }
    }

    #[test]
    fn test_image_url_accepts_string_or_object() {
        assert_eq!(
            image_url(json!("https://cdn.example/a.jpg"), &no_args(), &ctx()).unwrap(),
            json!("https://cdn.example/a.jpg")
        );
        assert_eq!(
            image_url(json!({"src": "/img/b.jpg", "alt": "B"}), &no_args(), &ctx()).unwrap(),
            json!("/img/b.jpg")
        );
        assert_eq!(
            image_url(json!({"url": "/img/c.jpg"}), &no_args(), &ctx()).unwrap(),
            json!("/img/c.jpg")
        );
    }

    #[test]
    fn test_asset_url_prefixes_bare_names() {
        assert_eq!(
            asset_url(json!("base.css"), &no_args(), &ctx()).unwrap(),
            json!("assets/base.css")
        );
        assert_eq!(
            asset_url(json!("assets/base.css"), &no_args(), &ctx()).unwrap(),
            json!("assets/base.css")
        );
    }
}
