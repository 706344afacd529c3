//! End-to-end handler tests: each request is driven through the real router
//! with `tower::ServiceExt::oneshot`, backed by a stub chronyc executable and
//! a throwaway conf file.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrony_bridge::{router, BridgeConfig, ChronyManager};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// Test fixture: stub chronyc + temp conf file + router over them.
struct Fixture {
    _dir: TempDir,
    conf_path: PathBuf,
    app: Router,
}

/// Stub script answering like a healthy daemon.
const HEALTHY_STUB: &str = r#"
case "$1" in
  tracking)
    echo "Reference ID    : C0A80101 (ntp.local)"
    echo "Stratum         : 2"
    ;;
  sources)
    echo "MS Name/IP address         Stratum Poll Reach LastRx Last sample"
    echo "==============================================================================="
    echo "^* 198.18.5.209   2   6   377    19   +625us[ -117us] +/-   25ms"
    ;;
  activity)
    echo "1 sources online"
    echo "0 sources offline"
    ;;
  clients)
    echo "Hostname                      NTP   Drop Int IntL Last     Cmd   Drop Int  Last"
    echo "==============================================================================="
    echo "localhost                      127      0   6   -    32       0      0   -     -"
    ;;
  delete)
    echo "200 OK"
    ;;
  add)
    echo "added $3"
    ;;
  --version)
    echo "chronyc (chrony) version 4.5"
    ;;
esac
"#;

async fn fixture(stub_body: &str, conf_content: &str) -> Fixture {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().expect("create temp dir");
    let stub = dir.path().join("chronyc-stub");
    tokio::fs::write(&stub, format!("#!/bin/sh\n{stub_body}"))
        .await
        .expect("write stub");
    let mut perms = tokio::fs::metadata(&stub)
        .await
        .expect("stat stub")
        .permissions();
    perms.set_mode(0o755);
    tokio::fs::set_permissions(&stub, perms)
        .await
        .expect("chmod stub");

    let conf_path = dir.path().join("chrony.conf");
    tokio::fs::write(&conf_path, conf_content)
        .await
        .expect("write conf");

    let config = BridgeConfig {
        chronyc_command: stub.display().to_string(),
        conf_path: conf_path.clone(),
        default_servers: vec!["pool.ntp.org".to_string()],
    };
    let app = router(Arc::new(ChronyManager::new(&config)));
    Fixture {
        _dir: dir,
        conf_path,
        app,
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("request handled");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    };
    (status, body)
}

fn get(path: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .body(Body::empty())
        .expect("build request")
}

fn put_json(path: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

#[tokio::test]
async fn test_health_endpoint() {
    let fx = fixture(HEALTHY_STUB, "").await;
    let (status, body) = send(fx.app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));
}

#[tokio::test]
async fn test_app_version_endpoint() {
    let fx = fixture(HEALTHY_STUB, "").await;
    let (status, body) = send(fx.app, get("/version")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["build_datetime"].is_string());
}

#[tokio::test]
async fn test_chronyc_version_passthrough() {
    let fx = fixture(HEALTHY_STUB, "").await;
    let (status, body) = send(fx.app, get("/chrony/version")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], "chronyc (chrony) version 4.5");
    assert_eq!(body["error"], Value::Null);
}

#[tokio::test]
async fn test_list_servers_returns_raw_output() {
    let fx = fixture(HEALTHY_STUB, "").await;
    let (status, body) = send(fx.app, get("/chrony/servers")).await;
    assert_eq!(status, StatusCode::OK);
    let raw = body["servers"].as_str().unwrap();
    assert!(raw.contains("198.18.5.209"));
    assert_eq!(body["error"], Value::Null);
}

#[tokio::test]
async fn test_status_aggregates_every_section() {
    let fx = fixture(HEALTHY_STUB, "allow 0.0.0.0/0\n").await;
    let (status, body) = send(fx.app, get("/chrony/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["server_mode_enabled"], true);
    assert_eq!(body["tracking"]["Stratum"], "2");
    assert_eq!(body["tracking_error"], Value::Null);
    assert_eq!(body["sources"][0]["name"], "198.18.5.209");
    assert_eq!(body["activity"]["ok_count"], "1");
    assert_eq!(body["clients"][0]["address"], "localhost");
}

#[tokio::test]
async fn test_status_with_failing_daemon_still_returns_200() {
    let fx = fixture("echo \"506 Cannot talk to daemon\" >&2\nexit 1\n", "").await;
    let (status, body) = send(fx.app, get("/chrony/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["server_mode_enabled"], false);
    assert_eq!(body["tracking_error"], "506 Cannot talk to daemon");
    assert_eq!(body["sources_error"], "506 Cannot talk to daemon");
    assert!(body["tracking"].as_object().unwrap().is_empty());
    assert!(body["sources"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_set_servers_reports_per_server_results() {
    let fx = fixture(HEALTHY_STUB, "").await;
    let request = put_json(
        "/chrony/servers",
        r#"{"servers": ["a.ntp.org", "b.ntp.org"]}"#,
    );
    let (status, body) = send(fx.app, request).await;
    assert_eq!(status, StatusCode::OK);
    let result = body["result"].as_array().unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(result[0]["server"], "a.ntp.org");
    assert_eq!(result[0]["output"], "added a.ntp.org");
    assert_eq!(result[0]["error"], Value::Null);
    assert_eq!(result[1]["server"], "b.ntp.org");
}

#[tokio::test]
async fn test_set_servers_empty_list_is_400() {
    let fx = fixture(HEALTHY_STUB, "").await;
    let (status, body) = send(fx.app, put_json("/chrony/servers", r#"{"servers": []}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "servers must be a non-empty list");
}

#[tokio::test]
async fn test_set_servers_missing_field_is_400() {
    let fx = fixture(HEALTHY_STUB, "").await;
    let (status, _) = send(fx.app, put_json("/chrony/servers", r#"{}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_set_servers_non_list_is_400() {
    let fx = fixture(HEALTHY_STUB, "").await;
    let (status, _) = send(
        fx.app,
        put_json("/chrony/servers", r#"{"servers": "pool.ntp.org"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_set_servers_malformed_json_is_400() {
    let fx = fixture(HEALTHY_STUB, "").await;
    let (status, _) = send(fx.app, put_json("/chrony/servers", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_servers() {
    let fx = fixture(HEALTHY_STUB, "").await;
    let request = Request::builder()
        .method("DELETE")
        .uri("/chrony/servers")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(fx.app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["output"], "200 OK");
    assert_eq!(body["error"], Value::Null);
}

#[tokio::test]
async fn test_set_default_servers() {
    let fx = fixture(HEALTHY_STUB, "").await;
    let (status, body) = send(fx.app, put_json("/chrony/servers/default", "")).await;
    assert_eq!(status, StatusCode::OK);
    let result = body["result"].as_array().unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0]["server"], "pool.ntp.org");
    assert_eq!(result[0]["output"], "added pool.ntp.org");
}

#[tokio::test]
async fn test_get_server_mode_reflects_conf_file() {
    let fx = fixture(HEALTHY_STUB, "allow 10.0.0.0/8\n").await;
    let (status, body) = send(fx.app, get("/chrony/server-mode")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["server_mode_enabled"], true);
}

#[tokio::test]
async fn test_put_server_mode_enables_directive() {
    let fx = fixture(HEALTHY_STUB, "pool pool.ntp.org iburst\n").await;
    let conf_path = fx.conf_path.clone();

    let (status, body) = send(fx.app, put_json("/chrony/server-mode", r#"{"enabled": true}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["server_mode_enabled"], true);

    let conf = tokio::fs::read_to_string(&conf_path).await.unwrap();
    assert_eq!(conf, "pool pool.ntp.org iburst\nallow 0.0.0.0/0\n");
}

#[tokio::test]
async fn test_put_server_mode_disables_directive() {
    let fx = fixture(HEALTHY_STUB, "allow 0.0.0.0/0\npool pool.ntp.org iburst\n").await;
    let conf_path = fx.conf_path.clone();

    let (status, body) = send(
        fx.app,
        put_json("/chrony/server-mode", r#"{"enabled": false}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["server_mode_enabled"], false);

    let conf = tokio::fs::read_to_string(&conf_path).await.unwrap();
    assert_eq!(conf, "pool pool.ntp.org iburst\n");
}

#[tokio::test]
async fn test_put_server_mode_non_bool_is_400() {
    let fx = fixture(HEALTHY_STUB, "").await;
    let (status, body) = send(
        fx.app,
        put_json("/chrony/server-mode", r#"{"enabled": "yes"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "'enabled' must be a boolean");
}

#[tokio::test]
async fn test_put_server_mode_missing_field_is_400() {
    let fx = fixture(HEALTHY_STUB, "").await;
    let (status, _) = send(fx.app, put_json("/chrony/server-mode", r#"{}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_put_server_mode_echoes_requested_value_on_write_failure() {
    // Conf path points at a missing directory: the rewrite fails, success is
    // false, but the echoed state still reflects the request.
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let stub = dir.path().join("chronyc-stub");
    tokio::fs::write(&stub, "#!/bin/sh\nexit 0\n").await.unwrap();
    let mut perms = tokio::fs::metadata(&stub).await.unwrap().permissions();
    perms.set_mode(0o755);
    tokio::fs::set_permissions(&stub, perms).await.unwrap();

    let config = BridgeConfig {
        chronyc_command: stub.display().to_string(),
        conf_path: dir.path().join("missing").join("chrony.conf"),
        default_servers: vec!["pool.ntp.org".to_string()],
    };
    let app = router(Arc::new(ChronyManager::new(&config)));

    let (status, body) = send(app, put_json("/chrony/server-mode", r#"{"enabled": true}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["server_mode_enabled"], true);
}
