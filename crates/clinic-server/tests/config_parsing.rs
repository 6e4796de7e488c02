use std::{env, fs};

use clinic_server::config::loader::load_config;
use clinic_storage::StorageBackend;

#[test]
fn config_parsing_and_env_overrides_and_validation() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("clinic.toml");

    let toml_content = r#"
[server]
host = "127.0.0.1"
port = 8081
body_limit_bytes = 2048

[storage]
backend = "memory"

[pagination]
default_limit = 5
max_limit = 20

[logging]
level = "debug"
"#;
    fs::write(&path, toml_content).expect("write toml");

    // 1) Valid config parses
    let cfg = load_config(path.to_str()).expect("should parse config");
    assert_eq!(cfg.server.port, 8081);
    assert_eq!(cfg.server.body_limit_bytes, 2048);
    assert_eq!(cfg.storage.backend, StorageBackend::Memory);
    assert_eq!(cfg.pagination.default_limit, 5);
    assert_eq!(cfg.pagination.max_limit, 20);
    assert_eq!(cfg.logging.level, "debug");

    // 2) Env override wins over file
    unsafe {
        env::set_var("CLINIC__PAGINATION__DEFAULT_LIMIT", "9");
    }
    let cfg_env = load_config(path.to_str()).expect("should parse config with env overrides");
    assert_eq!(cfg_env.pagination.default_limit, 9);
    unsafe {
        env::remove_var("CLINIC__PAGINATION__DEFAULT_LIMIT");
    }

    // 3) Invalid values are rejected
    let bad = r#"
[pagination]
default_limit = 50
max_limit = 10
"#;
    fs::write(&path, bad).expect("write bad toml");
    let err = load_config(path.to_str()).unwrap_err();
    assert!(err.contains("default_limit"), "unexpected error: {err}");

    // 4) Missing file falls back to defaults
    let cfg = load_config(dir.path().join("absent.toml").to_str()).expect("defaults");
    assert_eq!(cfg.server.port, 3000);
    assert_eq!(cfg.storage.backend, StorageBackend::File);
}
