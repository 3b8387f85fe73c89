use std::path::PathBuf;

use livepen::config::{ConfigFlags, load_config_flags, parse_flag_tokens};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".livepenrc");
    let content = r#"
# comment
--perf

--delay 120
   
--debug-log=events.log
"#;
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.perf);
    assert_eq!(flags.delay_ms, Some(120));
    assert_eq!(flags.debug_log, Some(PathBuf::from("events.log")));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".livepenrc");
    let content = "--perf\n--delay 500\n--out site/preview.html\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "livepen".to_string(),
        "--delay".to_string(),
        "50".to_string(),
        "watch".to_string(),
        "pen".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.perf, "file flags should remain enabled");
    assert_eq!(effective.delay_ms, Some(50), "cli should override delay");
    assert_eq!(
        effective.out,
        Some(PathBuf::from("site/preview.html")),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_parse_flag_tokens_handles_equals_syntax() {
    let args = vec![
        "livepen".to_string(),
        "--delay=75".to_string(),
        "--out=preview.html".to_string(),
    ];
    let flags = parse_flag_tokens(&args);
    assert_eq!(flags.delay_ms, Some(75));
    assert_eq!(flags.out, Some(PathBuf::from("preview.html")));
}

#[test]
fn test_missing_config_file_is_default() {
    let dir = tempfile::tempdir().unwrap();
    let flags = load_config_flags(&dir.path().join("absent")).unwrap();
    assert_eq!(flags, ConfigFlags::default());
}
