//! Endpoint handlers and their request/response bodies.
//!
//! Request bodies are taken as `Option<Json<Value>>` and validated by hand so
//! every malformed input — bad JSON, missing field, wrong type — comes back
//! as a 400 with a short `{error}` message instead of axum's default
//! rejection.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;

use crate::http::AppState;
use crate::manager::{ServerOutcome, StatusReport};

/// Timestamp injected at build time; falls back when the build does not set it.
const BUILD_DATETIME: &str = match option_env!("BUILD_DATETIME") {
    Some(dt) => dt,
    None => "unknown",
};

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct RawSourcesResponse {
    servers: String,
    error: Option<String>,
}

#[derive(Serialize)]
struct DeleteSourcesResponse {
    output: String,
    error: Option<String>,
}

#[derive(Serialize)]
struct ReplaceServersResponse {
    result: Vec<ServerOutcome>,
}

#[derive(Serialize)]
struct ChronycVersionResponse {
    version: String,
    error: Option<String>,
}

#[derive(Serialize)]
pub struct ServerModeResponse {
    server_mode_enabled: bool,
}

#[derive(Serialize)]
struct SetServerModeResponse {
    success: bool,
    server_mode_enabled: bool,
}

#[derive(Serialize)]
pub struct AppVersionResponse {
    version: &'static str,
    build_datetime: &'static str,
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// GET /chrony/servers — raw sources report, errors in-band.
pub async fn list_servers(State(manager): State<AppState>) -> Response {
    let output = manager.list_sources().await;
    let error = output.error();
    Json(RawSourcesResponse {
        servers: output.stdout,
        error,
    })
    .into_response()
}

/// PUT /chrony/servers — replace all sources with the requested list.
pub async fn set_servers(State(manager): State<AppState>, body: Option<Json<Value>>) -> Response {
    let Some(Json(body)) = body else {
        return bad_request("invalid JSON body");
    };

    let servers = match body.get("servers") {
        Some(Value::Array(items)) => {
            let mut servers = Vec::with_capacity(items.len());
            for item in items {
                match item.as_str() {
                    Some(s) => servers.push(s.to_string()),
                    None => return bad_request("servers must be a list of strings"),
                }
            }
            servers
        }
        _ => return bad_request("servers must be a non-empty list"),
    };

    match manager.replace_servers(&servers).await {
        Ok(result) => Json(ReplaceServersResponse { result }).into_response(),
        Err(e) => bad_request(&e.to_string()),
    }
}

/// DELETE /chrony/servers — delete every configured source.
pub async fn reset_servers(State(manager): State<AppState>) -> Response {
    let output = manager.delete_sources().await;
    let error = output.error();
    Json(DeleteSourcesResponse {
        output: output.stdout,
        error,
    })
    .into_response()
}

/// PUT /chrony/servers/default — replace all sources with the default list.
pub async fn set_default_servers(State(manager): State<AppState>) -> Response {
    let result = manager.restore_defaults().await;
    Json(ReplaceServersResponse { result }).into_response()
}

/// GET /chrony/status — consolidated daemon status. Always 200.
pub async fn status(State(manager): State<AppState>) -> Json<StatusReport> {
    Json(manager.status().await)
}

/// GET /chrony/version — chronyc `--version` passthrough.
pub async fn chronyc_version(State(manager): State<AppState>) -> Response {
    let output = manager.version().await;
    let error = output.error();
    Json(ChronycVersionResponse {
        version: output.stdout,
        error,
    })
    .into_response()
}

/// GET /chrony/server-mode — current `allow` directive state.
pub async fn server_mode(State(manager): State<AppState>) -> Json<ServerModeResponse> {
    Json(ServerModeResponse {
        server_mode_enabled: manager.conf().server_mode_enabled().await,
    })
}

/// PUT /chrony/server-mode — toggle the `allow` directive.
///
/// `success` reflects whether the conf rewrite succeeded;
/// `server_mode_enabled` echoes the requested value regardless.
pub async fn set_server_mode(
    State(manager): State<AppState>,
    body: Option<Json<Value>>,
) -> Response {
    let Some(Json(body)) = body else {
        return bad_request("invalid JSON body");
    };
    let Some(enabled) = body.get("enabled").and_then(Value::as_bool) else {
        return bad_request("'enabled' must be a boolean");
    };

    let success = manager.conf().set_server_mode(enabled).await;
    Json(SetServerModeResponse {
        success,
        server_mode_enabled: enabled,
    })
    .into_response()
}

/// GET /health — liveness probe.
pub async fn health() -> &'static str {
    "OK"
}

/// GET /version — the bridge's own version, not the daemon's.
pub async fn app_version() -> Json<AppVersionResponse> {
    Json(AppVersionResponse {
        version: env!("CARGO_PKG_VERSION"),
        build_datetime: BUILD_DATETIME,
    })
}
