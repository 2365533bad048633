mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use common::{
    accepted, header, json_response, mount_collect, mount_status_rounds, received, status_json,
};
use predicates::prelude::*;
use std::process::Command;
use wiremock::MockServer;

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_amounts_rejected_before_any_request() {
    let server = MockServer::start().await;

    for amount in ["0", "-5", "abc", "0.000", "10.5", "12345678901234.56789"] {
        let mut cmd = Command::new(cargo_bin!("campay-collect"));
        cmd.env("API_KEY", "test-key")
            .env("CAMPAY_BASE_URL", server.uri())
            .args(["--phone", "237670000000", "--amount", amount])
            .args(["--description", "Test payment"]);

        cmd.assert()
            .failure()
            .stderr(predicate::str::contains("Invalid amount"));
    }

    assert!(received(&server).await.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_phone_rejected_before_any_request() {
    let server = MockServer::start().await;

    let mut cmd = Command::new(cargo_bin!("campay-collect"));
    cmd.env("API_KEY", "test-key")
        .env("CAMPAY_BASE_URL", server.uri())
        .args(["--phone", "67-00-00", "--amount", "100"])
        .args(["--description", "Test payment"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("digits only"));

    assert!(received(&server).await.is_empty());
}

#[test]
fn test_missing_api_key_is_fatal() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::new(cargo_bin!("campay-collect"));
    cmd.current_dir(dir.path())
        .env_remove("API_KEY")
        .args(["--phone", "237670000000", "--amount", "100"])
        .args(["--description", "Test payment"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("API_KEY not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_api_key_loaded_from_dotenv_file() {
    let server = MockServer::start().await;
    mount_collect(&server, json_response(200, accepted("ref-env"))).await;
    mount_status_rounds(
        &server,
        "ref-env",
        vec![json_response(200, status_json("ref-env", "SUCCESSFUL", None))],
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".env"),
        format!(
            "API_KEY=from-dotenv\nCAMPAY_BASE_URL={}\nPOLL_INTERVAL_SECS=0\n",
            server.uri()
        ),
    )
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("campay-collect"));
    cmd.current_dir(dir.path())
        .env_remove("API_KEY")
        .env_remove("CAMPAY_BASE_URL")
        .env_remove("POLL_INTERVAL_SECS")
        .args(["--phone", "237670000000", "--amount", "100"])
        .args(["--description", "Test payment"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("TRANSACTION SUCCESSFUL"));

    let requests = received(&server).await;
    assert_eq!(header(&requests[0], "authorization"), Some("Token from-dotenv"));
}
