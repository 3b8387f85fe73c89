use crate::buffer::{BufferKind, SourceBuffers};
use crate::import::ImportError;
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Notice {
    level: NoticeLevel,
    message: String,
}

/// The complete editor state.
///
/// All mutable state lives here and is only touched by the session that
/// owns it.
#[derive(Debug, Clone, Default)]
pub struct Model {
    /// The markup, style and script buffers
    pub buffers: SourceBuffers,
    /// Applied settings, as reflected on the editor chrome
    pub settings: Settings,
    /// Result of the most recent import, cleared when a selection is cancelled
    pub last_import: Option<Result<BufferKind, ImportError>>,
    notice: Option<Notice>,
}

impl Model {
    pub fn new(buffers: SourceBuffers) -> Self {
        Self {
            buffers,
            ..Self::default()
        }
    }

    pub(super) fn show_notice(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notice = Some(Notice {
            level,
            message: message.into(),
        });
    }

    pub(super) fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn active_notice(&self) -> Option<(&str, NoticeLevel)> {
        self.notice
            .as_ref()
            .map(|notice| (notice.message.as_str(), notice.level))
    }
}
