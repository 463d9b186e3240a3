//! The render scheduler: update classification, debounce, cancellation
//! and stale suppression.

use crate::compose::compose_page;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use vitrine_mapping::MapperRegistry;
use vitrine_model::{EditorContent, PageState};
use vitrine_theme::ThemeRegistry;

/// How an externally observed change is classified. Drives scheduling
/// policy; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    /// Visual-only; the display surface handles it without a re-render.
    Style,
    /// Text-level edits; re-render after the debounce window.
    Content,
    /// Layout-level changes; re-render immediately.
    Structural,
}

/// Everything a render reads, snapshotted per run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PreviewState {
    pub shop_name: String,
    pub theme_id: String,
    pub content: EditorContent,
    pub page: PageState,
}

/// One emitted preview: the full document HTML plus combined theme CSS.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewFrame {
    pub html: String,
    pub css: String,
}

/// What the orchestrator emits to the display surface.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewEvent {
    Frame(PreviewFrame),
    /// A page-level failure; no partial output accompanies it.
    Error { message: String },
}

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Debounce window for content-classified updates.
    pub debounce_window: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            debounce_window: Duration::from_millis(150),
        }
    }
}

/// Per-session render scheduler. `idle → rendering → idle`, with a
/// pending-debounce sub-state; the debounce task is the only thing that
/// ever gets cancelled.
pub struct RenderOrchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    themes: Arc<ThemeRegistry>,
    mappers: Arc<MapperRegistry>,
    config: OrchestratorConfig,
    state: Mutex<PreviewState>,
    /// The armed debounce task, if any.
    pending: Mutex<Option<JoinHandle<()>>>,
    /// Monotonic render generation for stale suppression.
    generation: AtomicU64,
    /// Serializes render runs; previews never render in parallel.
    render_gate: tokio::sync::Mutex<()>,
    last_html: Mutex<Option<String>>,
    events: async_channel::Sender<PreviewEvent>,
}

impl RenderOrchestrator {
    /// Creates an orchestrator and the event stream it emits on.
    pub fn new(
        themes: Arc<ThemeRegistry>,
        mappers: Arc<MapperRegistry>,
        config: OrchestratorConfig,
    ) -> (Self, async_channel::Receiver<PreviewEvent>) {
        let (tx, rx) = async_channel::unbounded();
        let orchestrator = Self {
            inner: Arc::new(Inner {
                themes,
                mappers,
                config,
                state: Mutex::new(PreviewState::default()),
                pending: Mutex::new(None),
                generation: AtomicU64::new(0),
                render_gate: tokio::sync::Mutex::new(()),
                last_html: Mutex::new(None),
                events: tx,
            }),
        };
        (orchestrator, rx)
    }

    /// Replaces the state without scheduling anything (initial load).
    pub fn set_state(&self, state: PreviewState) {
        if let Ok(mut current) = self.inner.state.lock() {
            *current = state;
        }
    }

    /// Applies a classified update: store the new state, then schedule
    /// according to the classification.
    pub async fn apply_update(&self, kind: UpdateKind, state: PreviewState) {
        self.set_state(state);
        match kind {
            UpdateKind::Style => {
                debug!("[ORCHESTRATOR] style update, no render scheduled");
            }
            UpdateKind::Content => self.schedule_debounced(),
            UpdateKind::Structural => {
                self.cancel_pending();
                Inner::run_render(Arc::clone(&self.inner)).await;
            }
        }
    }

    /// Forced, non-debounced render: initial load and explicit retry.
    pub async fn render_now(&self) {
        self.cancel_pending();
        Inner::run_render(Arc::clone(&self.inner)).await;
    }

    /// True while a debounce is armed.
    pub fn has_pending_render(&self) -> bool {
        self.inner
            .pending
            .lock()
            .map(|p| p.as_ref().is_some_and(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    fn schedule_debounced(&self) {
        // Restart the window: only the last event before it elapses
        // triggers a render.
        self.cancel_pending();
        let inner = Arc::clone(&self.inner);
        let window = inner.config.debounce_window;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            Inner::run_render(inner).await;
        });
        if let Ok(mut pending) = self.inner.pending.lock() {
            *pending = Some(handle);
        }
    }

    fn cancel_pending(&self) {
        if let Ok(mut pending) = self.inner.pending.lock()
            && let Some(handle) = pending.take()
        {
            handle.abort();
        }
    }
}

impl Drop for RenderOrchestrator {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

impl Inner {
    async fn run_render(inner: Arc<Inner>) {
        let generation = inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let _gate = inner.render_gate.lock().await;

        let state = match inner.state.lock() {
            Ok(state) => state.clone(),
            Err(_) => return,
        };
        info!(
            "[ORCHESTRATOR] render #{generation} ({:?}, theme '{}')",
            state.page.kind, state.theme_id
        );

        let result = async {
            let handle = inner.themes.activate(&state.theme_id).await?;
            let mapper = inner.mappers.resolve(&state.theme_id);
            compose_page(&handle, &mapper, &state).await
        }
        .await;

        match result {
            Ok(frame) => {
                // A newer render has started; this output is stale.
                if inner.generation.load(Ordering::SeqCst) != generation {
                    debug!("[ORCHESTRATOR] render #{generation} superseded, dropping");
                    return;
                }
                // Unchanged output suppresses a visible update.
                let unchanged = inner
                    .last_html
                    .lock()
                    .map(|last| last.as_deref() == Some(frame.html.as_str()))
                    .unwrap_or(false);
                if unchanged {
                    debug!("[ORCHESTRATOR] render #{generation} unchanged, suppressing");
                    return;
                }
                if let Ok(mut last) = inner.last_html.lock() {
                    *last = Some(frame.html.clone());
                }
                let _ = inner.events.send(PreviewEvent::Frame(frame)).await;
            }
            Err(e) => {
                warn!("[ORCHESTRATOR] render #{generation} failed: {e}");
                let _ = inner
                    .events
                    .send(PreviewEvent::Error {
                        message: e.to_string(),
                    })
                    .await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use vitrine_model::{EditorContent, HeroContent};
    use vitrine_traits::InMemoryTemplateSource;

    const MANIFEST: &str = r#"{
        "id": "aurora",
        "name": "Aurora",
        "version": "1.0.0",
        "sections": [],
        "layout": {
            "theme": "layout/theme.liquid",
            "header": "sections/header.liquid",
            "footer": "sections/footer.liquid"
        }
    }"#;

    fn test_theme_source() -> InMemoryTemplateSource {
        let source = InMemoryTemplateSource::new();
        source.add("manifest.json", MANIFEST);
        source.add(
            "layout/theme.liquid",
            "<html><body>{{ content_for_layout }}</body></html>",
        );
        source.add("sections/image-banner.liquid", "{% content_for 'blocks' %}");
        source.add("blocks/heading.liquid", "<h1>{{ block.settings.heading }}</h1>");
        source.add("blocks/text.liquid", "<p>{{ block.settings.text }}</p>");
        source.add(
            "blocks/buttons.liquid",
            "<a href=\"{{ block.settings.button_link }}\">{{ block.settings.button_label }}</a>",
        );
        source
    }

    fn orchestrator(window_ms: u64) -> (RenderOrchestrator, async_channel::Receiver<PreviewEvent>) {
        let themes = Arc::new(ThemeRegistry::new("aurora"));
        themes.register_source("aurora", Arc::new(test_theme_source()));
        let mappers = Arc::new(MapperRegistry::with_bundled_themes());
        RenderOrchestrator::new(
            themes,
            mappers,
            OrchestratorConfig {
                debounce_window: Duration::from_millis(window_ms),
            },
        )
    }

    fn state_with_title(title: &str) -> PreviewState {
        PreviewState {
            shop_name: "Acme".to_string(),
            theme_id: "aurora".to_string(),
            content: EditorContent {
                hero: HeroContent {
                    title: title.to_string(),
                    ..Default::default()
                },
                ..Default::default()
            },
            page: Default::default(),
        }
    }

    async fn expect_frame(rx: &async_channel::Receiver<PreviewEvent>) -> PreviewFrame {
        match tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("timed out waiting for a preview event")
            .expect("event channel closed")
        {
            PreviewEvent::Frame(frame) => frame,
            PreviewEvent::Error { message } => panic!("unexpected error event: {message}"),
        }
    }

    #[tokio::test]
    async fn test_forced_render_emits_frame() {
        let (orchestrator, rx) = orchestrator(150);
        orchestrator.set_state(state_with_title("Acme Goods"));
        orchestrator.render_now().await;

        let frame = expect_frame(&rx).await;
        assert!(frame.html.contains("<h1>Acme Goods</h1>"));
        assert!(frame.html.starts_with("<html>"));
    }

    #[tokio::test]
    async fn test_content_events_coalesce_into_one_render() {
        let (orchestrator, rx) = orchestrator(60);
        for title in ["A", "Ab", "Abc"] {
            orchestrator
                .apply_update(UpdateKind::Content, state_with_title(title))
                .await;
        }
        assert!(orchestrator.has_pending_render());

        let frame = expect_frame(&rx).await;
        assert!(frame.html.contains("<h1>Abc</h1>"));

        // No second render arrives.
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(rx.is_empty());
    }

    #[tokio::test]
    async fn test_structural_bypasses_pending_debounce() {
        let (orchestrator, rx) = orchestrator(5_000);
        orchestrator
            .apply_update(UpdateKind::Content, state_with_title("slow"))
            .await;
        // With a five-second window the debounce cannot be what renders.
        orchestrator
            .apply_update(UpdateKind::Structural, state_with_title("fast"))
            .await;

        let frame = expect_frame(&rx).await;
        assert!(frame.html.contains("<h1>fast</h1>"));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rx.is_empty(), "the cancelled debounce must not fire");
    }

    #[tokio::test]
    async fn test_style_updates_never_render() {
        let (orchestrator, rx) = orchestrator(30);
        orchestrator
            .apply_update(UpdateKind::Style, state_with_title("tinted"))
            .await;
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(rx.is_empty());
        assert!(!orchestrator.has_pending_render());
    }

    #[tokio::test]
    async fn test_unchanged_output_is_suppressed() {
        let (orchestrator, rx) = orchestrator(30);
        orchestrator.set_state(state_with_title("Same"));
        orchestrator.render_now().await;
        let first = expect_frame(&rx).await;

        orchestrator.render_now().await;
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rx.is_empty(), "identical output must not re-emit");

        orchestrator.set_state(state_with_title("Different"));
        orchestrator.render_now().await;
        let second = expect_frame(&rx).await;
        assert_ne!(first.html, second.html);
    }

    #[tokio::test]
    async fn test_render_is_idempotent_for_equal_state() {
        let (orchestrator, rx) = orchestrator(30);
        orchestrator.set_state(state_with_title("Stable"));
        orchestrator.render_now().await;
        let first = expect_frame(&rx).await;

        // Force a fresh render of byte-equal state by clearing the
        // suppression baseline through a different state.
        orchestrator.set_state(state_with_title("Else"));
        orchestrator.render_now().await;
        let _ = expect_frame(&rx).await;

        orchestrator.set_state(state_with_title("Stable"));
        orchestrator.render_now().await;
        let third = expect_frame(&rx).await;
        assert_eq!(first.html, third.html);
    }

    #[tokio::test]
    async fn test_render_error_surfaces_as_event() {
        // A registry whose default theme has no manifest cannot
        // initialize; the orchestrator reports instead of crashing.
        let themes = Arc::new(ThemeRegistry::new("aurora"));
        themes.register_source("aurora", Arc::new(InMemoryTemplateSource::new()));
        let mappers = Arc::new(MapperRegistry::with_bundled_themes());
        let (orchestrator, rx) =
            RenderOrchestrator::new(themes, mappers, OrchestratorConfig::default());

        orchestrator.set_state(state_with_title("x"));
        orchestrator.render_now().await;

        match tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap()
        {
            PreviewEvent::Error { message } => assert!(message.contains("not ready")),
            PreviewEvent::Frame(_) => panic!("expected an error event"),
        }
    }
}
