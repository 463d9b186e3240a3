//! Render orchestration: page composition, update classification and
//! render scheduling.
//!
//! The orchestrator owns the latest editor state and decides when to
//! re-render: `style` changes never render (the display surface recolors
//! itself), `content` changes render after a debounce window, and
//! `structural` changes render immediately. Completed output that is
//! byte-identical to the last emission is suppressed, as is output from a
//! render that a newer one has overtaken.

mod compose;
mod orchestrator;

pub use compose::compose_page;
pub use orchestrator::{
    OrchestratorConfig, PreviewEvent, PreviewFrame, PreviewState, RenderOrchestrator, UpdateKind,
};

use thiserror::Error;
use vitrine_theme::ThemeError;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error(transparent)]
    Theme(#[from] ThemeError),

    #[error("Page render failed: {0}")]
    Render(#[from] vitrine_liquid::LiquidError),
}
