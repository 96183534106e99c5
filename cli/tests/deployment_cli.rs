use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::{tempdir, TempDir};

fn deployctl_cmd(server: &MockServer, tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("deployctl").expect("deployctl binary");
    cmd.env_remove("DEPLOYCTL_WORKSPACE_URL")
        .env_remove("DEPLOYCTL_TOKEN")
        .arg("--config")
        .arg(tmp.path().join("config.json"))
        .arg("--workspace-url")
        .arg(server.base_url())
        .arg("--token")
        .arg("test-token");
    cmd
}

#[test]
fn ip_of_single_replica_deployment() {
    let server = MockServer::start();
    let tmp = tempdir().expect("tempdir");
    let replicas = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/deployments/web/replicas")
            .header("authorization", "Bearer test-token");
        then.status(200).json_body_obj(&serde_json::json!([
            {"metadata": {"id": "web-0"}, "status": {"state": "ready", "public_ip": "203.0.113.7"}}
        ]));
    });

    deployctl_cmd(&server, &tmp)
        .args(["deployment", "ip", "web"])
        .assert()
        .success()
        .stdout(contains("203.0.113.7"));

    replicas.assert();
}

#[test]
fn abbreviated_subcommands_dispatch_to_full_names() {
    let server = MockServer::start();
    let tmp = tempdir().expect("tempdir");
    let replicas = server.mock(|when, then| {
        when.method(GET).path("/api/v1/deployments/web/replicas");
        then.status(200)
            .json_body_obj(&serde_json::json!([{"status": {}}]));
    });

    deployctl_cmd(&server, &tmp)
        .args(["dep", "i", "web"])
        .assert()
        .success()
        .stdout(contains("Deployment web has no public IP."));

    deployctl_cmd(&server, &tmp)
        .args(["dpl", "rep", "web"])
        .assert()
        .success()
        .stdout(contains("\"status\""));

    assert_eq!(replicas.hits(), 2);
}

#[test]
fn ambiguous_subcommand_is_a_usage_error() {
    let server = MockServer::start();
    let tmp = tempdir().expect("tempdir");

    deployctl_cmd(&server, &tmp)
        .args(["deployment", "r", "web"])
        .assert()
        .code(2)
        .stderr(contains("'r' is ambiguous: remove, replicas"));

    deployctl_cmd(&server, &tmp)
        .args(["lo"])
        .assert()
        .code(2)
        .stderr(contains("'lo' is ambiguous: login, logout"));
}

#[test]
fn more_than_one_replica_is_rejected() {
    let server = MockServer::start();
    let tmp = tempdir().expect("tempdir");
    let replicas = server.mock(|when, then| {
        when.method(GET).path("/api/v1/deployments/web/replicas");
        then.status(200).json_body_obj(&serde_json::json!([
            {"status": {"public_ip": "203.0.113.7"}},
            {"status": {"public_ip": "203.0.113.8"}}
        ]));
    });

    deployctl_cmd(&server, &tmp)
        .args(["deployment", "ip", "web"])
        .assert()
        .code(1)
        .stdout(contains("203.0.113").not())
        .stderr(contains(
            "Pod web has more than one replica. This is not supported.",
        ));

    replicas.assert();
}

#[test]
fn zero_replicas_is_rejected() {
    let server = MockServer::start();
    let tmp = tempdir().expect("tempdir");
    let replicas = server.mock(|when, then| {
        when.method(GET).path("/api/v1/deployments/web/replicas");
        then.status(200).json_body_obj(&serde_json::json!([]));
    });

    deployctl_cmd(&server, &tmp)
        .args(["deployment", "ip", "web"])
        .assert()
        .code(1)
        .stdout(contains("no public IP").not())
        .stderr(contains(
            "Pod web has more than one replica. This is not supported.",
        ));

    replicas.assert();
}

#[test]
fn replica_lookup_failure_reports_api_error() {
    let server = MockServer::start();
    let tmp = tempdir().expect("tempdir");
    let replicas = server.mock(|when, then| {
        when.method(GET).path("/api/v1/deployments/ghost/replicas");
        then.status(404).json_body_obj(&serde_json::json!({
            "code": "DeploymentNotFound",
            "message": "deployment ghost not found"
        }));
    });

    deployctl_cmd(&server, &tmp)
        .args(["deployment", "ip", "ghost"])
        .assert()
        .code(1)
        .stderr(contains("404 DeploymentNotFound: deployment ghost not found"))
        .stderr(contains(
            "Cannot obtain replica info for ghost. See error above.",
        ));

    replicas.assert();
}

#[test]
fn remove_missing_deployment_reports_without_failing() {
    let server = MockServer::start();
    let tmp = tempdir().expect("tempdir");
    let delete = server.mock(|when, then| {
        when.method(DELETE).path("/api/v1/deployments/ghost");
        then.status(404)
            .json_body_obj(&serde_json::json!({"code": "X", "message": "Y"}));
    });

    deployctl_cmd(&server, &tmp)
        .args(["deployment", "remove", "ghost"])
        .assert()
        .success()
        .stdout(contains(
            "404 X: Y\nDeployment ghost does not exist or cannot be removed.",
        ));

    delete.assert();
}

#[test]
fn remove_server_error_fails() {
    let server = MockServer::start();
    let tmp = tempdir().expect("tempdir");
    let delete = server.mock(|when, then| {
        when.method(DELETE).path("/api/v1/deployments/web");
        then.status(500).body("internal error");
    });

    deployctl_cmd(&server, &tmp)
        .args(["deployment", "rm", "web"])
        .assert()
        .code(1)
        .stderr(contains(
            "500: internal error\nFailed to remove deployment web.",
        ));

    delete.assert();
}

#[test]
fn remove_success_prints_confirmation() {
    let server = MockServer::start();
    let tmp = tempdir().expect("tempdir");
    let delete = server.mock(|when, then| {
        when.method(DELETE).path("/api/v1/deployments/web");
        then.status(200).json_body_obj(&serde_json::json!({}));
    });

    deployctl_cmd(&server, &tmp)
        .args(["deployment", "remove", "web"])
        .assert()
        .success()
        .stdout(contains("Deployment web deleted."));

    delete.assert();
}

#[test]
fn storage_du_formats_size() {
    let server = MockServer::start();
    let tmp = tempdir().expect("tempdir");
    let du = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/storage/du")
            .query_param("path", "/models");
        then.status(200)
            .json_body_obj(&serde_json::json!({"path": "/models", "size_bytes": 1536}));
    });

    deployctl_cmd(&server, &tmp)
        .args(["st", "du", "/models"])
        .assert()
        .success()
        .stdout(contains("/models: 1.5KiB"));

    du.assert();
}
