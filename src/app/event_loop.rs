use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::app::{App, NoticeLevel, ProjectSession};
use crate::project::Project;
use crate::watcher::ProjectWatcher;

/// Longest sleep between polls while nothing is scheduled.
const IDLE_POLL_MS: u64 = 100;

impl App {
    /// Run the watch loop until interrupted.
    ///
    /// # Errors
    ///
    /// Returns an error if the project cannot be opened, the watcher cannot
    /// be created, or signal handlers cannot be installed.
    pub fn run(&self) -> Result<()> {
        let shutdown = Arc::new(AtomicBool::new(false));
        for signal in [signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM] {
            signal_hook::flag::register(signal, Arc::clone(&shutdown))
                .context("Failed to install signal handler")?;
        }
        self.run_until(&shutdown)
    }

    /// Run the watch loop until `shutdown` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the project cannot be opened or watched.
    pub fn run_until(&self, shutdown: &AtomicBool) -> Result<()> {
        let _run_scope = crate::perf::scope("app.run.total");
        let (project, mut session) = self.open()?;
        let mut watcher = ProjectWatcher::new(&project)
            .with_context(|| format!("Failed to watch {}", project.dir().display()))?;

        tracing::info!(
            project = %project.dir().display(),
            preview = %session.sink().surface().path().display(),
            name = %session.settings().project_name,
            "watching for edits"
        );

        let start = Instant::now();
        while !shutdown.load(Ordering::Relaxed) {
            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            Self::apply_disk_edits(&project, &mut session, &mut watcher, now_ms);

            if session.tick(now_ms) {
                tracing::info!(renders = session.sink().renders(), "preview updated");
            }
            Self::report_notice(&mut session);

            // Wake up right when a pending render is due.
            let poll_ms = session
                .render_due_in(now_ms)
                .map_or(IDLE_POLL_MS, |due| due.clamp(1, IDLE_POLL_MS));
            std::thread::sleep(Duration::from_millis(poll_ms));
        }

        tracing::info!("stopped watching");
        Ok(())
    }

    fn apply_disk_edits(
        project: &Project,
        session: &mut ProjectSession,
        watcher: &mut ProjectWatcher,
        now_ms: u64,
    ) {
        for kind in watcher.take_changes() {
            match project.read_buffer(kind) {
                Ok(text) if text != session.buffer(kind) => {
                    session.on_buffer_changed(kind, text, now_ms);
                }
                Ok(_) => {}
                Err(err) => {
                    // Editors that save by delete+rename leave brief gaps.
                    tracing::debug!(%kind, "skipping unreadable edit: {err:#}");
                }
            }
        }
    }

    fn report_notice(session: &mut ProjectSession) {
        let Some((message, level)) = session.active_notice() else {
            return;
        };
        match level {
            NoticeLevel::Info => tracing::info!("{message}"),
            NoticeLevel::Warning => tracing::warn!("{message}"),
            NoticeLevel::Error => tracing::error!("{message}"),
        }
        session.dismiss_notice();
    }
}
