//! Error types for template parsing and rendering.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LiquidError {
    #[error("Template parsing failed: {0}")]
    Parse(String),

    #[error("Failed to parse expression '{0}': {1}")]
    ExprParse(String, String),

    #[error("Unknown tag '{{% {0} %}}'")]
    UnknownTag(String),

    #[error("Tag '{{% {0} %}}' was never closed")]
    UnclosedTag(String),

    #[error("Unexpected '{{% {0} %}}'")]
    UnexpectedTag(String),

    #[error("Unknown filter '{0}'")]
    UnknownFilter(String),

    #[error("Filter '{name}' failed: {message}")]
    Filter { name: String, message: String },

    #[error("Render failed: {0}")]
    Render(String),

    #[error("Failed to include '{path}': {message}")]
    Include { path: String, message: String },
}
