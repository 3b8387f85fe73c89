//! Editor state and the live-preview loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete editor state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`Session`]: Owns the model and runs side effects for each message
//! - [`App::run`]: Watch loop driving a session from file edits

mod effects;
mod event_loop;
mod model;
mod session;
mod update;

pub use model::{Model, NoticeLevel};
pub use session::{Session, SettingsApplyError};
pub use update::{Message, update};

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::buffer::BufferKind;
use crate::debounce::PREVIEW_DEBOUNCE_MS;
use crate::project::Project;
use crate::render::{FileSurface, RenderOutcome};
use crate::settings::FileStore;

/// A session previewing a project directory into a file.
pub type ProjectSession = Session<FileSurface, FileStore>;

/// Main application struct: a project directory plus how to preview it.
pub struct App {
    project_dir: PathBuf,
    preview_path: Option<PathBuf>,
    settings_path: PathBuf,
    delay_ms: u64,
}

impl App {
    /// Create an application for the given project directory.
    pub fn new(project_dir: PathBuf) -> Self {
        Self {
            project_dir,
            preview_path: None,
            settings_path: crate::config::settings_store_path(),
            delay_ms: PREVIEW_DEBOUNCE_MS,
        }
    }

    /// Write the preview somewhere other than `<project>/.livepen/preview.html`.
    #[must_use]
    pub fn with_preview_path(mut self, path: Option<PathBuf>) -> Self {
        self.preview_path = path;
        self
    }

    /// Set the durable settings file.
    #[must_use]
    pub fn with_settings_path(mut self, path: PathBuf) -> Self {
        self.settings_path = path;
        self
    }

    /// Set the debounce window for live preview.
    #[must_use]
    pub const fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Open the project and build a started session over it.
    ///
    /// # Errors
    /// Returns an error if the project directory or its files cannot be read
    /// or created.
    pub fn open(&self) -> Result<(Project, ProjectSession)> {
        let project = Project::open(&self.project_dir)?;
        let buffers = project.load_buffers()?;
        let preview_path = self
            .preview_path
            .clone()
            .unwrap_or_else(|| project.default_preview_path());
        if let Some(parent) = preview_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create preview dir {}", parent.display()))?;
        }
        let mut session = Session::new(
            FileSurface::new(preview_path),
            FileStore::open(&self.settings_path),
            buffers,
            self.delay_ms,
        );
        session.start();
        Ok((project, session))
    }

    /// Compose and render the project once.
    ///
    /// # Errors
    /// Returns an error if the project cannot be opened or the preview could
    /// not be written.
    pub fn render_once(&self) -> Result<PathBuf> {
        let (_, session) = self.open()?;
        let surface = session.sink().surface();
        if let Some(err) = session.sink().last_error() {
            anyhow::bail!("Preview not written to {}: {err}", surface.path().display());
        }
        Ok(surface.path().to_path_buf())
    }

    /// Import `file` into the matching project buffer and re-render.
    ///
    /// # Errors
    /// Returns an error for unsupported file types or I/O failures; the
    /// project files are untouched on rejection.
    pub fn import(&self, file: &Path) -> Result<BufferKind> {
        let (project, mut session) = self.open()?;
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content =
            std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
        let kind = session.on_import_file(&name, &content)?;
        project.write_buffer(kind, session.buffer(kind))?;
        Ok(kind)
    }

    /// Overwrite the project files with the default templates and re-render.
    ///
    /// # Errors
    /// Returns an error if the project files cannot be written.
    pub fn reset(&self) -> Result<RenderOutcome> {
        let (project, mut session) = self.open()?;
        let outcome = session.reset();
        project.write_all(session.buffers())?;
        Ok(outcome)
    }

    /// Export the project as a standalone document into `to` (default: the
    /// project directory).
    ///
    /// # Errors
    /// Returns an error if the export file cannot be written.
    pub fn export(&self, to: Option<&Path>) -> Result<PathBuf> {
        let (project, session) = self.open()?;
        session.export_to(to.unwrap_or_else(|| project.dir()))
    }
}
