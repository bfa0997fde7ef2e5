use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use uci_bridge::{AppError, EngineConfig};

fn sample_toml() -> &'static str {
    r#"
path = "/usr/local/bin/stockfish"
args = ["--threads", "1"]
log_protocol = true

[timeouts]
init_ms = 750
shutdown_grace_ms = 250
sync_ms = 400

[search]
default_movetime_ms = 200
deadline_slack_ms = 25
max_search_ms = 3000
"#
}

#[test]
fn full_config_parses() {
    let config = EngineConfig::from_toml_str(sample_toml()).expect("valid config");

    assert_eq!(config.path, PathBuf::from("/usr/local/bin/stockfish"));
    assert_eq!(config.args, vec!["--threads", "1"]);
    assert!(config.log_protocol);
    assert_eq!(config.timeouts.init(), Duration::from_millis(750));
    assert_eq!(config.timeouts.shutdown_grace(), Duration::from_millis(250));
    assert_eq!(config.timeouts.sync(), Duration::from_millis(400));
    assert_eq!(config.search.default_movetime_ms, 200);
    assert_eq!(config.search.deadline_slack_ms, 25);
    assert_eq!(config.search.max_search_ms, 3000);
}

#[test]
fn minimal_config_uses_defaults() {
    let config = EngineConfig::from_toml_str(r#"path = "engine""#).expect("valid config");

    assert!(config.args.is_empty());
    assert!(!config.log_protocol);
    assert_eq!(config.timeouts.init_ms, 500);
    assert_eq!(config.timeouts.shutdown_grace_ms, 500);
    assert_eq!(config.search.default_movetime_ms, 100);
    assert_eq!(config.search.deadline_slack_ms, 10);
    assert_eq!(config, EngineConfig::new("engine"));
}

#[test]
fn missing_path_is_rejected() {
    let err = EngineConfig::from_toml_str("log_protocol = true").unwrap_err();
    assert!(matches!(err, AppError::Config(_)), "got {err:?}");
}

#[test]
fn empty_path_is_rejected() {
    match EngineConfig::from_toml_str(r#"path = """#) {
        Err(AppError::Config(msg)) => assert!(msg.contains("path")),
        other => panic!("expected Err(AppError::Config), got: {other:?}"),
    }
}

#[test]
fn zero_timeout_is_rejected() {
    let raw = r#"
path = "engine"

[timeouts]
init_ms = 0
"#;
    match EngineConfig::from_toml_str(raw) {
        Err(AppError::Config(msg)) => assert!(msg.contains("timeouts.init_ms"), "got: {msg}"),
        other => panic!("expected Err(AppError::Config), got: {other:?}"),
    }
}

#[test]
fn zero_default_movetime_is_rejected() {
    let mut config = EngineConfig::new("engine");
    config.search.default_movetime_ms = 0;
    assert!(config.validate().is_err());
}

#[test]
fn load_from_path_reads_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(sample_toml().as_bytes()).expect("write");

    let config = EngineConfig::load_from_path(file.path()).expect("load");
    assert_eq!(config.timeouts.init_ms, 750);
}

#[test]
fn load_from_missing_path_is_config_error() {
    let err = EngineConfig::load_from_path("/definitely/not/here/engine.toml").unwrap_err();
    assert!(err.to_string().starts_with("config: failed to read config"));
}
