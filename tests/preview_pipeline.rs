use livepen::app::{App, Session};
use livepen::buffer::{BufferKind, SourceBuffers};
use livepen::compose::compose;
use livepen::render::{FileSurface, MemorySurface, RenderOutcome};
use livepen::settings::{FileStore, Layout, MemoryStore, RawSettings, SettingsStore, Theme};

#[test]
fn test_end_to_end_composition_order() {
    let doc = compose("<p>hi</p>", "p{color:red}", "console.log(1)");

    let style = doc.find("<style>p{color:red}</style>").unwrap();
    let body = doc.find("<body>").unwrap();
    let markup = doc.find("<p>hi</p>").unwrap();
    let script = doc.find("<script>console.log(1)</script>").unwrap();

    assert!(style < body);
    assert!(body < markup);
    assert!(markup < script);
}

#[test]
fn test_session_renders_into_file_surface() {
    let dir = tempfile::tempdir().unwrap();
    let preview = dir.path().join("preview.html");
    let buffers = SourceBuffers::new("<p>hi</p>", "p{color:red}", "console.log(1)");
    let mut session = Session::new(
        FileSurface::new(&preview),
        MemoryStore::new(),
        buffers,
        300,
    );
    assert_eq!(session.start(), RenderOutcome::Rendered);

    session.on_buffer_changed(BufferKind::Markup, "<p>bye</p>", 10);
    session.on_buffer_changed(BufferKind::Markup, "<p>bye!</p>", 20);
    assert!(!session.tick(200));
    let before = std::fs::read_to_string(&preview).unwrap();
    assert!(before.contains("<p>hi</p>"), "preview waits for the quiet window");

    assert!(session.tick(320));
    let after = std::fs::read_to_string(&preview).unwrap();
    assert!(after.contains("<p>bye!</p>"));
    assert_eq!(session.sink().renders(), 2);
}

#[test]
fn test_settings_survive_a_restart_through_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let settings_path = dir.path().join("settings.json");

    let mut first = Session::new(
        MemorySurface::new(),
        FileStore::open(&settings_path),
        SourceBuffers::defaults(),
        300,
    );
    first.start();
    let applied = first
        .on_settings_apply_requested(&RawSettings {
            theme: "light".to_string(),
            font_size: "16".to_string(),
            project_name: "Landing Page".to_string(),
            layout: "rows".to_string(),
        })
        .unwrap();
    assert_eq!(applied.font_size.to_string(), "16px");

    let mut second = Session::new(
        MemorySurface::new(),
        FileStore::open(&settings_path),
        SourceBuffers::defaults(),
        300,
    );
    second.start();
    assert_eq!(second.settings(), &applied);
    assert_eq!(second.settings().theme, Theme::Light);
    assert_eq!(second.settings().layout, Layout::Rows);

    let direct = SettingsStore::new(FileStore::open(&settings_path)).load();
    assert_eq!(direct, applied);
}

#[test]
fn test_app_reset_and_export() {
    let dir = tempfile::tempdir().unwrap();
    let project_dir = dir.path().join("pen");
    let app = App::new(project_dir.clone()).with_settings_path(dir.path().join("settings.json"));

    std::fs::create_dir_all(&project_dir).unwrap();
    std::fs::write(project_dir.join("index.html"), "<p>custom</p>").unwrap();

    assert_eq!(app.reset().unwrap(), RenderOutcome::Rendered);
    assert_eq!(
        std::fs::read_to_string(project_dir.join("index.html")).unwrap(),
        BufferKind::Markup.default_template()
    );

    let out = dir.path().join("dist");
    let exported = app.export(Some(&out)).unwrap();
    assert_eq!(exported, out.join("untitled-pen.html"));
    let content = std::fs::read_to_string(exported).unwrap();
    assert!(content.contains("<title>Untitled Pen</title>"));
    assert!(content.contains(BufferKind::Script.default_template()));
}
