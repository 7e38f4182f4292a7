//! Shared test fixtures

use tempfile::TempDir;
use tienda_server::{Config, ServerState};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin-password";

/// Fresh server state backed by an on-disk SQLite file in a temp dir.
/// The directory must stay alive for the duration of the test.
pub async fn test_state() -> (TempDir, ServerState) {
    let dir = TempDir::new().expect("create temp dir");
    let db_path = dir.path().join("test.db");

    let config = Config {
        db_path: db_path.to_string_lossy().into_owned(),
        http_port: 0,
        jwt_secret: Some("integration-test-secret".into()),
        access_token_minutes: 30,
        environment: "test".into(),
        admin_email: Some(ADMIN_EMAIL.into()),
        admin_password: Some(ADMIN_PASSWORD.into()),
        admin_username: "admin".into(),
        request_timeout_ms: 30_000,
    };

    let state = ServerState::initialize(config)
        .await
        .expect("initialize server state");
    (dir, state)
}
