// Config loading tests - AppConfig::load against files on disk

use glymph_core::config::{AppConfig, ConfigError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("glymph.toml");
    fs::write(&path, content).expect("Failed to write config");
    path
}

#[test]
fn returns_error_when_file_not_found() {
    let result = AppConfig::load(Some(Path::new("/nonexistent/path/glymph.toml")));
    assert!(matches!(result, Err(ConfigError::NotFound { .. })));
}

#[test]
fn loads_every_section_from_file() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"
[server]
bind = "127.0.0.1:9100"
cors_origins = ["http://localhost:5173"]

[database]
url = "sqlite::memory:"

[auth]
secret = "file-secret"
access_token_minutes = 5
protect_resources = false

[agent]
max_tool_steps = 3
fallback_message = "Try again later."
"#,
    );

    let config = AppConfig::load(Some(&path)).expect("config");
    assert_eq!(config.server.bind.port(), 9100);
    assert_eq!(config.server.cors_origins, vec!["http://localhost:5173"]);
    assert_eq!(config.auth.secret, "file-secret");
    assert_eq!(config.auth.access_ttl.num_minutes(), 5);
    assert!(!config.auth.protect_resources);
    assert_eq!(config.agent.max_tool_steps, 3);
    assert_eq!(config.agent.fallback_message, "Try again later.");
}

#[test]
fn rejects_malformed_toml() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(dir.path(), "[server\nbind = ");
    let result = AppConfig::load(Some(&path));
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}

#[test]
fn rejects_invalid_bind_address() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"
[server]
bind = "not-an-address"

[auth]
secret = "s"
"#,
    );
    let result = AppConfig::load(Some(&path));
    assert!(matches!(result, Err(ConfigError::InvalidBind { .. })));
}

#[test]
fn missing_secret_is_reported_with_its_variable() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"
[auth]
secret_env = "GLYMPH_TEST_SECRET_THAT_IS_NEVER_SET"
"#,
    );
    match AppConfig::load(Some(&path)) {
        Err(ConfigError::MissingJwtSecret { env }) => {
            assert_eq!(env, "GLYMPH_TEST_SECRET_THAT_IS_NEVER_SET");
        }
        other => panic!("expected MissingJwtSecret, got {other:?}"),
    }
}

#[test]
fn rejects_zero_pool_size() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"
[database]
max_connections = 0

[auth]
secret = "s"
"#,
    );
    let result = AppConfig::load(Some(&path));
    assert!(matches!(
        result,
        Err(ConfigError::InvalidValue {
            field: "database.max_connections",
            ..
        })
    ));
}
