use crate::app::{Message, Session};
use crate::compose;
use crate::render::{RenderOutcome, RenderSurface};
use crate::settings::DurableStore;

impl<S: RenderSurface, D: DurableStore> Session<S, D> {
    pub(super) fn handle_message_side_effects(
        &mut self,
        msg: &Message,
        now_ms: u64,
    ) -> Option<RenderOutcome> {
        match msg {
            Message::BufferChanged(kind, _) => {
                self.debouncer.trigger(*kind, now_ms);
                tracing::debug!(%kind, now_ms, "preview render scheduled");
                None
            }
            Message::Tick => {
                let kind = self.debouncer.take_ready(now_ms)?;
                Some(self.render_now(kind.label()))
            }
            Message::RunRequested => Some(self.render_now("run")),
            Message::Reset => {
                tracing::info!("code reset to default template");
                Some(self.render_now("reset"))
            }
            Message::ImportFile { name, .. } => match self.model.last_import.clone() {
                Some(Ok(kind)) => {
                    tracing::info!(file = %name, %kind, "file imported");
                    Some(self.render_now("import"))
                }
                _ => {
                    tracing::warn!(file = %name, "import rejected");
                    None
                }
            },
            Message::ImportCancelled => {
                tracing::debug!("import cancelled");
                None
            }
            Message::SettingsLoaded(_) | Message::SettingsApplied(_) | Message::DismissNotice => {
                None
            }
        }
    }

    /// Compose the current buffers and install them in the surface.
    pub(super) fn render_now(&mut self, reason: &str) -> RenderOutcome {
        let document = {
            let _scope = crate::perf::scope("compose");
            compose::compose_buffers(&self.model.buffers)
        };
        crate::perf::log_event(
            "compose",
            format!("reason={reason} bytes={}", document.len()),
        );
        self.sink.render(&document)
    }
}
