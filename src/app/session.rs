use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::app::{Message, Model, NoticeLevel, update};
use crate::buffer::{BufferKind, SourceBuffers};
use crate::compose;
use crate::debounce::Debouncer;
use crate::import::ImportError;
use crate::render::{RenderOutcome, RenderSink, RenderSurface};
use crate::settings::{
    DurableStore, RawSettings, Settings, SettingsError, SettingsStore, StoreError,
};

#[derive(Debug, Error)]
pub enum SettingsApplyError {
    #[error("invalid settings: {0}")]
    Invalid(#[from] SettingsError),
    #[error("could not save settings: {0}")]
    Persist(#[from] StoreError),
}

/// Owns the editor state and is its only writer.
///
/// Every handler takes `&mut self`, so edits, renders and settings changes
/// are applied one at a time in arrival order.
pub struct Session<S, D> {
    pub(super) model: Model,
    pub(super) debouncer: Debouncer<BufferKind>,
    pub(super) sink: RenderSink<S>,
    pub(super) settings: SettingsStore<D>,
}

impl<S, D> std::fmt::Debug for Session<S, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("model", &self.model)
            .field("render_pending", &self.debouncer.is_pending())
            .finish_non_exhaustive()
    }
}

impl<S: RenderSurface, D: DurableStore> Session<S, D> {
    /// Create a session over `buffers` with default settings.
    ///
    /// Call [`Self::start`] to load persisted settings and paint the first
    /// preview.
    pub fn new(surface: S, store: D, buffers: SourceBuffers, delay_ms: u64) -> Self {
        Self {
            model: Model::new(buffers),
            debouncer: Debouncer::new(delay_ms),
            sink: RenderSink::new(surface),
            settings: SettingsStore::new(store),
        }
    }

    /// Load persisted settings and render the initial preview.
    pub fn start(&mut self) -> RenderOutcome {
        let loaded = self.settings.load_onto(self.model.settings.clone());
        self.dispatch(Message::SettingsLoaded(loaded), 0);
        self.render_now("start")
    }

    /// Feed one message through update and its side effects.
    ///
    /// Returns the render outcome when the message caused a render.
    pub fn dispatch(&mut self, msg: Message, now_ms: u64) -> Option<RenderOutcome> {
        let side_msg = msg.clone();
        self.model = update(std::mem::take(&mut self.model), msg);
        self.handle_message_side_effects(&side_msg, now_ms)
    }

    /// Record an edit and schedule a debounced render.
    pub fn on_buffer_changed(&mut self, kind: BufferKind, text: impl Into<String>, now_ms: u64) {
        self.dispatch(Message::BufferChanged(kind, text.into()), now_ms);
    }

    /// Render immediately, bypassing the debounce.
    pub fn on_run_requested(&mut self) -> RenderOutcome {
        self.dispatch(Message::RunRequested, 0)
            .unwrap_or(RenderOutcome::Failed)
    }

    /// Route an imported file into its buffer and render immediately.
    ///
    /// # Errors
    /// Returns [`ImportError::UnsupportedType`] when the file name has no
    /// supported suffix; the buffers are left untouched.
    pub fn on_import_file(
        &mut self,
        name: &str,
        content: &[u8],
    ) -> Result<BufferKind, ImportError> {
        self.dispatch(
            Message::ImportFile {
                name: name.to_string(),
                content: content.to_vec(),
            },
            0,
        );
        self.model.last_import.clone().unwrap_or_else(|| {
            Err(ImportError::UnsupportedType {
                name: name.to_string(),
            })
        })
    }

    /// The user dismissed the file picker.
    pub fn on_import_cancelled(&mut self) {
        self.dispatch(Message::ImportCancelled, 0);
    }

    /// Current applied settings, for pre-populating a settings form.
    pub fn on_settings_opened(&self) -> Settings {
        self.model.settings.clone()
    }

    /// Validate, persist, then reflect a settings form submission.
    ///
    /// # Errors
    /// Returns an error if validation or persistence fails; the applied
    /// settings are unchanged in that case.
    pub fn on_settings_apply_requested(
        &mut self,
        raw: &RawSettings,
    ) -> Result<Settings, SettingsApplyError> {
        let outcome = Settings::from_raw(raw)
            .map_err(SettingsApplyError::from)
            .and_then(|candidate| {
                self.settings.apply(&candidate)?;
                Ok(candidate)
            });
        match &outcome {
            Ok(settings) => {
                self.dispatch(Message::SettingsApplied(settings.clone()), 0);
            }
            Err(err) => {
                tracing::warn!("settings not applied: {err}");
                self.model.show_notice(NoticeLevel::Error, err.to_string());
            }
        }
        outcome
    }

    /// Restore the default templates and render immediately.
    pub fn reset(&mut self) -> RenderOutcome {
        self.dispatch(Message::Reset, 0)
            .unwrap_or(RenderOutcome::Failed)
    }

    /// Advance the debounce clock; renders if the quiet window has elapsed.
    ///
    /// Returns true when a render was attempted.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        self.dispatch(Message::Tick, now_ms).is_some()
    }

    /// Write the standalone export document into `dir`.
    ///
    /// The file is named after the project and always lands directly in
    /// `dir`.
    ///
    /// # Errors
    /// Returns an error if `dir` cannot be created or the file cannot be
    /// written.
    pub fn export_to(&self, dir: &Path) -> Result<PathBuf> {
        let title = &self.model.settings.project_name;
        let path = dir.join(compose::export_file_name(title));
        let document = compose::export_document(&self.model.buffers, title);
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create export dir {}", dir.display()))?;
        fs::write(&path, document)
            .with_context(|| format!("Failed to write export {}", path.display()))?;
        tracing::info!(file = %path.display(), "project exported");
        Ok(path)
    }

    pub fn dismiss_notice(&mut self) {
        self.dispatch(Message::DismissNotice, 0);
    }

    pub const fn model(&self) -> &Model {
        &self.model
    }

    pub const fn buffers(&self) -> &SourceBuffers {
        &self.model.buffers
    }

    pub fn buffer(&self, kind: BufferKind) -> &str {
        self.model.buffers.get(kind)
    }

    pub const fn settings(&self) -> &Settings {
        &self.model.settings
    }

    pub fn active_notice(&self) -> Option<(&str, NoticeLevel)> {
        self.model.active_notice()
    }

    pub const fn sink(&self) -> &RenderSink<S> {
        &self.sink
    }

    pub const fn sink_mut(&mut self) -> &mut RenderSink<S> {
        &mut self.sink
    }

    pub const fn settings_store(&self) -> &SettingsStore<D> {
        &self.settings
    }

    pub const fn is_render_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Milliseconds until the pending render is due, if one is scheduled.
    pub fn render_due_in(&self, now_ms: u64) -> Option<u64> {
        self.debouncer.remaining_ms(now_ms)
    }
}
