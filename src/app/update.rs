use crate::app::Model;
use crate::app::model::NoticeLevel;
use crate::buffer::BufferKind;
use crate::import;
use crate::settings::Settings;

/// All events the editor core reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Buffers
    /// A buffer was edited; carries its full new text
    BufferChanged(BufferKind, String),
    /// Recompose and render right away
    RunRequested,
    /// Overwrite all buffers with the default templates
    Reset,
    /// Debounce clock advanced
    Tick,

    // Import
    /// A file was picked for import
    ImportFile { name: String, content: Vec<u8> },
    /// The file picker was dismissed without a selection
    ImportCancelled,

    // Settings
    /// Settings were read from the durable store
    SettingsLoaded(Settings),
    /// Settings were persisted and should be reflected on the chrome
    SettingsApplied(Settings),

    /// Dismiss the current notice
    DismissNotice,
}

/// Pure function that updates the model based on a message.
///
/// Rendering, scheduling and persistence happen in the session's side
/// effects, never here.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        Message::BufferChanged(kind, text) => {
            model.buffers.replace(kind, text);
        }
        Message::RunRequested | Message::Tick => {}
        Message::Reset => {
            model.buffers.reset();
            model.show_notice(NoticeLevel::Info, "Code reset to default template");
        }
        Message::ImportFile { name, content } => {
            let result = import::classify(&name);
            match &result {
                Ok(kind) => {
                    model.buffers.replace(*kind, import::decode(&content));
                    model.show_notice(NoticeLevel::Info, format!("Imported {name} into {kind}"));
                }
                Err(err) => model.show_notice(NoticeLevel::Error, err.to_string()),
            }
            model.last_import = Some(result);
        }
        Message::ImportCancelled => {
            model.last_import = None;
        }
        Message::SettingsLoaded(settings) => {
            model.settings = settings;
        }
        Message::SettingsApplied(settings) => {
            model.show_notice(
                NoticeLevel::Info,
                format!("Settings applied to {}", settings.project_name),
            );
            model.settings = settings;
        }
        Message::DismissNotice => model.clear_notice(),
    }
    model
}
