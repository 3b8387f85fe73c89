// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. settings::SettingsStore)
    clippy::module_name_repetitions
)]

//! # livepen
//!
//! A live-preview playground for a markup, a style and a script file.
//!
//! livepen keeps three source buffers side by side and, whenever one of them
//! changes, recomposes them into a single HTML document and installs it in a
//! preview surface:
//! - Edits are debounced so a burst of keystrokes renders once
//! - Imports and explicit runs render immediately
//! - Preview failures are logged and never stop the editor
//! - Editor settings persist across sessions
//!
//! ## Architecture
//!
//! livepen uses The Elm Architecture (TEA) pattern:
//! - **Model**: Editor state (buffers, applied settings, notices)
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **Session**: Owns the model and runs side effects
//!
//! ## Modules
//!
//! - [`app`]: Session, messages and the watch loop
//! - [`buffer`]: The three source buffers and their templates
//! - [`compose`]: Document composition and export
//! - [`debounce`]: Debounced scheduling on an injected clock
//! - [`render`]: Render sink and preview surfaces
//! - [`settings`]: Settings model and durable storage
//! - [`import`]: File import routing
//! - [`project`]: Project directory layout
//! - [`watcher`]: File watching

pub mod app;
pub mod buffer;
pub mod compose;
pub mod config;
pub mod debounce;
pub mod import;
pub mod perf;
pub mod project;
pub mod render;
pub mod settings;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model, Session};
    pub use crate::buffer::{BufferKind, SourceBuffers};
    pub use crate::render::{RenderOutcome, RenderSurface};
    pub use crate::settings::{DurableStore, Settings};
}
