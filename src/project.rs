//! A project directory holding the three source files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::buffer::{BufferKind, SourceBuffers};

/// Directory, relative to the project, for generated files.
pub const OUTPUT_DIR: &str = ".livepen";

#[derive(Debug, Clone)]
pub struct Project {
    dir: PathBuf,
}

impl Project {
    /// Open `dir` as a project, creating it if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create project dir {}", dir.display()))?;
        // Canonicalize so watcher event paths compare equal to ours.
        let dir = dir
            .canonicalize()
            .with_context(|| format!("Failed to resolve project dir {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub const fn file_name(kind: BufferKind) -> &'static str {
        match kind {
            BufferKind::Markup => "index.html",
            BufferKind::Style => "style.css",
            BufferKind::Script => "script.js",
        }
    }

    pub fn path_for(&self, kind: BufferKind) -> PathBuf {
        self.dir.join(Self::file_name(kind))
    }

    /// Map a project file path back to the buffer it holds.
    pub fn kind_for_path(path: &Path) -> Option<BufferKind> {
        let name = path.file_name()?;
        BufferKind::ALL
            .into_iter()
            .find(|kind| name == Self::file_name(*kind))
    }

    pub fn default_preview_path(&self) -> PathBuf {
        self.dir.join(OUTPUT_DIR).join("preview.html")
    }

    /// Read all three buffers, seeding any missing file with its template.
    pub fn load_buffers(&self) -> Result<SourceBuffers> {
        let mut buffers = SourceBuffers::defaults();
        for kind in BufferKind::ALL {
            let path = self.path_for(kind);
            if path.exists() {
                buffers.replace(kind, self.read_buffer(kind)?);
            } else {
                tracing::info!(file = %path.display(), "creating {kind} file from template");
                self.write_buffer(kind, kind.default_template())?;
            }
        }
        Ok(buffers)
    }

    pub fn read_buffer(&self, kind: BufferKind) -> Result<String> {
        let path = self.path_for(kind);
        let bytes = fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(crate::import::decode(&bytes))
    }

    pub fn write_buffer(&self, kind: BufferKind, text: &str) -> Result<()> {
        let path = self.path_for(kind);
        fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))
    }

    pub fn write_all(&self, buffers: &SourceBuffers) -> Result<()> {
        for kind in BufferKind::ALL {
            self.write_buffer(kind, buffers.get(kind))?;
        }
        Ok(())
    }
}
