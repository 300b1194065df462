use axum::Json;
use axum::http::StatusCode;
use serde_json::{Map, Value};

/// Liveness check for `GET /healthz`.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Build a `/readyz` response from named dependency probes.
///
/// 200 when every probe passed, 503 otherwise. Body: `{"<name>": "ok" | "unavailable"}`.
pub fn readiness(checks: &[(&str, bool)]) -> (StatusCode, Json<Value>) {
    let mut body = Map::new();
    for (name, ok) in checks {
        let state = if *ok { "ok" } else { "unavailable" };
        body.insert((*name).to_owned(), Value::from(state));
    }
    let status = if checks.iter().all(|(_, ok)| *ok) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(Value::Object(body)))
}
