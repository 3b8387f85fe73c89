//! Render sink: installs composed documents into a preview surface.
//!
//! A surface is replaced wholesale. Failures are logged and swallowed so a
//! broken preview never takes the editor down with it.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("preview surface unavailable: {0}")]
    Unavailable(String),
    #[error("failed to write preview {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Something a composed document can be installed into.
pub trait RenderSurface {
    /// Replace the entire content of the surface with `document`.
    ///
    /// On error the previous content must still be in place.
    ///
    /// # Errors
    /// Returns an error if the surface is unavailable or the write fails.
    fn replace(&mut self, document: &str) -> Result<(), RenderError>;

    /// Human-readable description used in logs.
    fn describe(&self) -> String;
}

/// Preview surface backed by a file a browser can keep open.
///
/// Each replace writes a sibling temp file and renames it over the target,
/// so readers see either the old or the new document.
#[derive(Debug, Clone)]
pub struct FileSurface {
    path: PathBuf,
}

impl FileSurface {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RenderSurface for FileSurface {
    fn replace(&mut self, document: &str) -> Result<(), RenderError> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        if !parent.is_dir() {
            return Err(RenderError::Unavailable(format!(
                "directory {} does not exist",
                parent.display()
            )));
        }
        let tmp = self.temp_path();
        let write = |path: &Path| -> std::io::Result<()> {
            let mut file = fs::File::create(path)?;
            file.write_all(document.as_bytes())?;
            file.sync_all()
        };
        if let Err(source) = write(&tmp).and_then(|()| fs::rename(&tmp, &self.path)) {
            let _ = fs::remove_file(&tmp);
            return Err(RenderError::Write {
                path: self.path.clone(),
                source,
            });
        }
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory surface for headless sessions.
#[derive(Debug, Default, Clone)]
pub struct MemorySurface {
    content: Option<String>,
    unavailable: bool,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently installed document, if any.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Make subsequent replaces fail as if the surface had gone away.
    pub const fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }
}

impl RenderSurface for MemorySurface {
    fn replace(&mut self, document: &str) -> Result<(), RenderError> {
        if self.unavailable {
            return Err(RenderError::Unavailable("memory surface detached".into()));
        }
        self.content = Some(document.to_string());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered,
    Failed,
}

/// Serializes documents into a surface and absorbs its failures.
#[derive(Debug)]
pub struct RenderSink<S> {
    surface: S,
    renders: u64,
    failures: u64,
    last_error: Option<String>,
}

impl<S: RenderSurface> RenderSink<S> {
    pub const fn new(surface: S) -> Self {
        Self {
            surface,
            renders: 0,
            failures: 0,
            last_error: None,
        }
    }

    /// Install `document` into the surface.
    ///
    /// Errors are logged and recorded in [`Self::last_error`], never
    /// returned; the surface keeps its last good content.
    pub fn render(&mut self, document: &str) -> RenderOutcome {
        let _scope = crate::perf::scope("render");
        match self.surface.replace(document) {
            Ok(()) => {
                self.renders += 1;
                self.last_error = None;
                tracing::debug!(
                    surface = %self.surface.describe(),
                    bytes = document.len(),
                    "preview rendered"
                );
                crate::perf::log_event(
                    "render.ok",
                    format!("surface={} bytes={}", self.surface.describe(), document.len()),
                );
                RenderOutcome::Rendered
            }
            Err(err) => {
                self.failures += 1;
                tracing::error!(surface = %self.surface.describe(), "preview render failed: {err}");
                crate::perf::log_event(
                    "render.error",
                    format!("surface={} err={err}", self.surface.describe()),
                );
                self.last_error = Some(err.to_string());
                RenderOutcome::Failed
            }
        }
    }

    pub const fn surface(&self) -> &S {
        &self.surface
    }

    pub const fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub const fn renders(&self) -> u64 {
        self.renders
    }

    pub const fn failures(&self) -> u64 {
        self.failures
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_surface_replaces_whole_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("preview.html");
        std::fs::write(&path, "a much longer previous document").expect("write");

        let mut surface = FileSurface::new(&path);
        surface.replace("<p>new</p>").expect("replace");

        assert_eq!(std::fs::read_to_string(&path).expect("read"), "<p>new</p>");
        assert!(!surface.temp_path().exists(), "temp file should be renamed away");
    }

    #[test]
    fn test_file_surface_missing_directory_is_unavailable() {
        let dir = tempdir().expect("tempdir");
        let mut surface = FileSurface::new(dir.path().join("gone").join("preview.html"));
        assert!(matches!(
            surface.replace("<p>x</p>"),
            Err(RenderError::Unavailable(_))
        ));
    }

    #[test]
    fn test_sink_swallows_failure_and_keeps_last_good_content() {
        let mut sink = RenderSink::new(MemorySurface::new());
        assert_eq!(sink.render("first"), RenderOutcome::Rendered);

        sink.surface_mut().set_unavailable(true);
        assert_eq!(sink.render("second"), RenderOutcome::Failed);
        assert_eq!(sink.surface().content(), Some("first"));
        assert!(sink.last_error().is_some());

        sink.surface_mut().set_unavailable(false);
        assert_eq!(sink.render("third"), RenderOutcome::Rendered);
        assert_eq!(sink.surface().content(), Some("third"));
        assert!(sink.last_error().is_none());
        assert_eq!(sink.renders(), 2);
        assert_eq!(sink.failures(), 1);
    }

    #[test]
    fn test_sink_over_missing_file_directory_does_not_panic() {
        let dir = tempdir().expect("tempdir");
        let mut sink = RenderSink::new(FileSurface::new(dir.path().join("nope/preview.html")));
        assert_eq!(sink.render("<p>x</p>"), RenderOutcome::Failed);
        assert_eq!(sink.failures(), 1);
    }
}
