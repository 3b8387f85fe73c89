//! File watching for live preview.
//!
//! Uses notify for cross-platform file system events. The watcher only
//! reports which buffers changed; debouncing belongs to the session.
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::buffer::BufferKind;
use crate::project::Project;

/// Watches a project directory for edits to its source files.
pub struct ProjectWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    root: PathBuf,
}

impl ProjectWatcher {
    /// Watch the directory of `project`.
    ///
    /// # Errors
    /// Returns an error if the watcher cannot be created or the directory
    /// cannot be watched.
    pub fn new(project: &Project) -> notify::Result<Self> {
        let root = project.dir().to_path_buf();
        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        watcher.watch(&root, RecursiveMode::NonRecursive)?;

        Ok(Self {
            _watcher: watcher,
            rx,
            root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Drain pending events and return the buffers they touch, in first-seen order.
    pub fn take_changes(&mut self) -> Vec<BufferKind> {
        let mut changed = Vec::new();
        let mut total_events = 0u32;
        while let Ok(event) = self.rx.try_recv() {
            total_events += 1;
            match event {
                Ok(ev) => {
                    for kind in self.kinds_for_event(&ev) {
                        if !changed.contains(&kind) {
                            changed.push(kind);
                        }
                    }
                }
                Err(err) => {
                    tracing::warn!("watch error: {err}");
                    crate::perf::log_event("watcher.error", format!("{err}"));
                }
            }
        }

        if total_events > 0 {
            crate::perf::log_event(
                "watcher.poll",
                format!(
                    "total={total_events} changed={changed:?} root={}",
                    self.root.display()
                ),
            );
        }
        changed
    }

    /// Buffers affected by `event`.
    ///
    /// Directory-level events (reported by some backends instead of
    /// per-file events) count for every buffer.
    fn kinds_for_event(&self, event: &Event) -> Vec<BufferKind> {
        if event.paths.iter().any(|path| path == &self.root) {
            return BufferKind::ALL.to_vec();
        }
        let mut kinds = Vec::new();
        for kind in event
            .paths
            .iter()
            .filter(|path| path.parent() == Some(self.root.as_path()))
            .filter_map(|path| Project::kind_for_path(path))
        {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::EventKind;
    use std::time::{Duration, Instant};
    use tempfile::tempdir;

    fn event(paths: Vec<PathBuf>) -> Event {
        Event {
            kind: EventKind::Any,
            paths,
            attrs: notify::event::EventAttributes::new(),
        }
    }

    #[test]
    fn test_directory_level_event_touches_every_buffer() {
        let dir = tempdir().expect("tempdir");
        let project = Project::open(dir.path()).expect("project");
        let watcher = ProjectWatcher::new(&project).expect("watcher");

        let kinds = watcher.kinds_for_event(&event(vec![project.dir().to_path_buf()]));
        assert_eq!(kinds, BufferKind::ALL.to_vec());
    }

    #[test]
    fn test_file_events_map_to_their_buffer() {
        let dir = tempdir().expect("tempdir");
        let project = Project::open(dir.path()).expect("project");
        let watcher = ProjectWatcher::new(&project).expect("watcher");

        let kinds = watcher.kinds_for_event(&event(vec![
            project.path_for(BufferKind::Style),
            project.dir().join("style.css.swp"),
            project.path_for(BufferKind::Style),
            project.dir().join(".livepen"),
        ]));
        assert_eq!(kinds, vec![BufferKind::Style]);
    }

    #[test]
    fn test_files_outside_the_project_are_ignored() {
        let dir = tempdir().expect("tempdir");
        let project = Project::open(dir.path()).expect("project");
        let watcher = ProjectWatcher::new(&project).expect("watcher");

        let kinds = watcher.kinds_for_event(&event(vec![
            project.dir().join("nested").join("index.html"),
        ]));
        assert!(kinds.is_empty());
    }

    #[test]
    fn test_real_file_modification_detected() {
        let dir = tempdir().expect("tempdir");
        let project = Project::open(dir.path()).expect("project");
        project.load_buffers().expect("seed");

        let mut watcher = ProjectWatcher::new(&project).expect("watcher");

        // Give FSEvents time to register the watch
        std::thread::sleep(Duration::from_millis(500));

        project
            .write_buffer(BufferKind::Script, "console.log(2)")
            .expect("write");

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut detected = false;
        while Instant::now() < deadline {
            if watcher.take_changes().contains(&BufferKind::Script) {
                detected = true;
                break;
            }
            std::thread::sleep(Duration::from_millis(50));
        }

        assert!(
            detected,
            "watcher should detect script edits within 5 seconds"
        );
    }
}
